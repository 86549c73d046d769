//! `lopdf`-backed page text extraction.

use super::PageExtractor;
use log::debug;
use lopdf::Document;
use std::panic::{catch_unwind, AssertUnwindSafe};

/// Extracts page text with `lopdf`.
#[derive(Debug, Clone, Copy, Default)]
pub struct LopdfPageExtractor;

impl PageExtractor for LopdfPageExtractor {
    fn leading_pages(&self, bytes: &[u8], max_pages: usize) -> Result<Vec<String>, String> {
        // The parser can panic on hostile input; contain it like any parse error.
        catch_unwind(AssertUnwindSafe(|| read_leading_pages(bytes, max_pages)))
            .unwrap_or_else(|_| Err("parser panicked on malformed document".to_string()))
    }
}

fn read_leading_pages(bytes: &[u8], max_pages: usize) -> Result<Vec<String>, String> {
    let doc = Document::load_mem(bytes).map_err(|err| err.to_string())?;
    let pages = doc
        .get_pages()
        .into_keys()
        .take(max_pages)
        .map(|page_number| match doc.extract_text(&[page_number]) {
            Ok(text) => text,
            Err(err) => {
                debug!(
                    "event=pdf_page_text module=summary status=empty page={} error={}",
                    page_number, err
                );
                String::new()
            }
        })
        .collect();
    Ok(pages)
}

//! Bounded text summaries for uploaded files.
//!
//! # Responsibility
//! - Decide whether a file is eligible for extraction (`.pdf` only).
//! - Turn extracted page text into a bounded, normalized summary.
//!
//! # Invariants
//! - Extraction never fails the caller: failures become placeholder text.
//! - Non-PDF files never reach the page extractor.
//! - A finalized summary is at most `MAX_SUMMARY_CHARS` characters plus
//!   `TRUNCATION_MARKER`, and never empty.

mod pdf;

pub use pdf::LopdfPageExtractor;

use log::{debug, warn};

/// Maximum summary length in characters, before the truncation marker.
pub const MAX_SUMMARY_CHARS: usize = 500;
/// Number of leading pages read from a PDF.
pub const MAX_SUMMARY_PAGES: usize = 3;
/// Appended when a summary was cut at `MAX_SUMMARY_CHARS`.
pub const TRUNCATION_MARKER: &str = "...";
/// Summary recorded for files that are not PDFs.
pub const NO_SUMMARY_SENTINEL: &str = "[no summary: not a PDF]";
/// Summary recorded when extraction produced no text.
pub const NO_CONTENT_SENTINEL: &str = "[no content]";
/// Prefix of the placeholder recorded when a PDF could not be parsed.
pub const PARSE_FAILURE_PREFIX: &str = "[PDF parsing failed]";

/// Reads page text out of a document.
pub trait PageExtractor: Send + Sync {
    /// Returns text of at most `max_pages` leading pages. A page without
    /// extractable text yields an empty string.
    fn leading_pages(&self, bytes: &[u8], max_pages: usize) -> Result<Vec<String>, String>;
}

/// Raw extraction outcome before summary post-processing.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Extraction {
    /// File type is not eligible for extraction.
    NotApplicable,
    /// Concatenated page text.
    Text(String),
    /// Open/parse failure with a human-readable reason.
    Failed(String),
}

/// Derives summaries through a pluggable page extractor.
pub struct SummaryExtractor<E: PageExtractor = LopdfPageExtractor> {
    pages: E,
}

impl Default for SummaryExtractor<LopdfPageExtractor> {
    fn default() -> Self {
        Self::new(LopdfPageExtractor)
    }
}

impl<E: PageExtractor> SummaryExtractor<E> {
    pub fn new(pages: E) -> Self {
        Self { pages }
    }

    /// Runs extraction for `filename` without post-processing.
    pub fn extract(&self, filename: &str, bytes: &[u8]) -> Extraction {
        if !is_pdf_name(filename) {
            return Extraction::NotApplicable;
        }
        match self.pages.leading_pages(bytes, MAX_SUMMARY_PAGES) {
            Ok(pages) => Extraction::Text(pages.join("\n")),
            Err(reason) => Extraction::Failed(reason),
        }
    }

    /// Produces the summary text persisted next to `filename`.
    pub fn summarize(&self, filename: &str, bytes: &[u8]) -> String {
        match self.extract(filename, bytes) {
            Extraction::NotApplicable => {
                debug!("event=summary_extract module=summary status=skipped reason=not_pdf");
                NO_SUMMARY_SENTINEL.to_string()
            }
            Extraction::Text(text) => finalize_summary(&text),
            Extraction::Failed(reason) => {
                warn!(
                    "event=summary_extract module=summary status=degraded bytes={} reason_len={}",
                    bytes.len(),
                    reason.chars().count()
                );
                finalize_summary(&format!("{PARSE_FAILURE_PREFIX} {reason}"))
            }
        }
    }
}

/// Whether `filename` ends with `.pdf`, ignoring ASCII case.
pub fn is_pdf_name(filename: &str) -> bool {
    filename.trim().to_ascii_lowercase().ends_with(".pdf")
}

/// Normalizes line endings, trims, caps length and substitutes the
/// no-content sentinel for empty text.
pub fn finalize_summary(raw: &str) -> String {
    let normalized = raw.replace("\r\n", "\n").replace('\r', "\n");
    let trimmed = normalized.trim();
    if trimmed.is_empty() {
        return NO_CONTENT_SENTINEL.to_string();
    }
    if trimmed.chars().count() <= MAX_SUMMARY_CHARS {
        return trimmed.to_string();
    }
    let mut capped: String = trimmed.chars().take(MAX_SUMMARY_CHARS).collect();
    capped.push_str(TRUNCATION_MARKER);
    capped
}

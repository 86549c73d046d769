mod common;

use lecture_sorter_core::{
    Extraction, LopdfPageExtractor, PageExtractor, SummaryExtractor, MAX_SUMMARY_CHARS,
    NO_CONTENT_SENTINEL, NO_SUMMARY_SENTINEL, PARSE_FAILURE_PREFIX, TRUNCATION_MARKER,
};

type PdfSummaries = SummaryExtractor<LopdfPageExtractor>;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

struct CountingExtractor {
    calls: Arc<AtomicUsize>,
    pages: Result<Vec<String>, String>,
}

impl PageExtractor for CountingExtractor {
    fn leading_pages(&self, _bytes: &[u8], max_pages: usize) -> Result<Vec<String>, String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.pages
            .clone()
            .map(|pages| pages.into_iter().take(max_pages).collect())
    }
}

fn counting(
    pages: Result<Vec<String>, String>,
) -> (SummaryExtractor<CountingExtractor>, Arc<AtomicUsize>) {
    let calls = Arc::new(AtomicUsize::new(0));
    let extractor = SummaryExtractor::new(CountingExtractor {
        calls: Arc::clone(&calls),
        pages,
    });
    (extractor, calls)
}

#[test]
fn non_pdf_files_never_reach_the_page_extractor() {
    let (extractor, calls) = counting(Ok(vec!["should not be read".to_string()]));

    assert_eq!(extractor.extract("notes.txt", b"plain"), Extraction::NotApplicable);
    assert_eq!(extractor.summarize("notes.txt", b"plain"), NO_SUMMARY_SENTINEL);
    assert_eq!(extractor.summarize("slides.pdf.bak", b"%PDF"), NO_SUMMARY_SENTINEL);
    assert_eq!(calls.load(Ordering::SeqCst), 0);
}

#[test]
fn uppercase_pdf_suffix_triggers_extraction() {
    let (extractor, calls) = counting(Ok(vec!["Intro".to_string()]));
    assert_eq!(extractor.summarize("LECTURE.PDF", b""), "Intro");
    assert_eq!(calls.load(Ordering::SeqCst), 1);
}

#[test]
fn pages_are_joined_with_newlines_and_empty_pages_contribute_nothing() {
    let (extractor, _) = counting(Ok(vec![
        "First".to_string(),
        String::new(),
        "Third".to_string(),
        "Fourth".to_string(),
    ]));
    assert_eq!(
        extractor.extract("a.pdf", b""),
        Extraction::Text("First\n\nThird".to_string())
    );
}

#[test]
fn long_text_is_capped_with_marker() {
    let (extractor, _) = counting(Ok(vec!["x".repeat(2 * MAX_SUMMARY_CHARS)]));
    let summary = extractor.summarize("a.pdf", b"");
    assert!(summary.ends_with(TRUNCATION_MARKER));
    assert_eq!(
        summary.chars().count(),
        MAX_SUMMARY_CHARS + TRUNCATION_MARKER.len()
    );
}

#[test]
fn extraction_failure_degrades_to_bounded_placeholder() {
    let (extractor, _) = counting(Err("x".repeat(4 * MAX_SUMMARY_CHARS)));
    let summary = extractor.summarize("a.pdf", b"");
    assert!(summary.starts_with(PARSE_FAILURE_PREFIX));
    assert!(summary.chars().count() <= MAX_SUMMARY_CHARS + TRUNCATION_MARKER.len());
}

#[test]
fn garbage_bytes_with_pdf_name_produce_placeholder() {
    let extractor = PdfSummaries::default();
    assert!(matches!(
        extractor.extract("broken.pdf", b"definitely not a pdf"),
        Extraction::Failed(_)
    ));
    let summary = extractor.summarize("broken.pdf", b"definitely not a pdf");
    assert!(summary.starts_with(PARSE_FAILURE_PREFIX));
}

#[test]
fn real_pdf_reads_only_first_three_pages() {
    let bytes = common::sample_pdf(&["Alpha", "Bravo", "Charlie", "Delta", "Echo"]);
    let summary = PdfSummaries::default().summarize("deck.pdf", &bytes);

    assert!(summary.contains("Alpha"), "summary was {summary:?}");
    assert!(summary.contains("Charlie"), "summary was {summary:?}");
    assert!(!summary.contains("Delta"));
    assert!(!summary.contains("Echo"));
}

#[test]
fn pdf_without_text_records_no_content_sentinel() {
    let bytes = common::sample_pdf(&["", ""]);
    let summary = PdfSummaries::default().summarize("blank.pdf", &bytes);
    assert_eq!(summary, NO_CONTENT_SENTINEL);
}

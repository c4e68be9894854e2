//! crates/stress_analysis_core/src/extract.rs
//!
//! Best-effort text extraction from an uploaded document.
//!
//! This is deliberately not a PDF/DOCX parser. Binary formats are scanned
//! byte-by-byte for printable ASCII, which recovers enough of the embedded
//! text streams for the analysis model to work with while staying dependency
//! free. Real structure-aware parsing is delegated to nobody; garbled input
//! degrades the analysis, it does not break the pipeline.

use crate::sanitize::truncate_chars;

/// Upper bound on extracted text, in characters.
pub const MAX_EXTRACTED_CHARS: usize = 200_000;

/// Only the head of a binary file is scanned; text past this offset is
/// overwhelmingly compressed streams that yield garbage.
const MAX_SCANNED_BYTES: usize = 2 * 1024 * 1024;

/// Below this many recovered characters the extraction is considered to have
/// failed and a fixed preamble is prepended so the model still receives
/// something anchored to the upload.
const MIN_USEFUL_CHARS: usize = 50;

/// Converts uploaded file bytes into a bounded plain-text approximation.
pub fn extract_text(bytes: &[u8], file_name: &str) -> String {
    if is_plain_text_name(file_name) {
        let text = String::from_utf8_lossy(bytes);
        return truncate_chars(&text, MAX_EXTRACTED_CHARS);
    }

    let scanned = &bytes[..bytes.len().min(MAX_SCANNED_BYTES)];
    let mut raw = String::with_capacity(scanned.len() / 4);
    for &byte in scanned {
        match byte {
            0x20..=0x7E => raw.push(byte as char),
            b'\n' | b'\r' => raw.push('\n'),
            _ => {}
        }
    }

    let collapsed = collapse_whitespace(&raw);
    let text = truncate_chars(collapsed.trim(), MAX_EXTRACTED_CHARS);

    if text.chars().count() < MIN_USEFUL_CHARS {
        return format!(
            "Academic Portfolio: {file_name}\n\nNote: This document was uploaded for stress \
             analysis. The system will analyze based on the document structure and any \
             extractable content.\n\n{text}"
        );
    }
    text
}

fn is_plain_text_name(file_name: &str) -> bool {
    file_name.to_ascii_lowercase().ends_with(".txt")
}

fn collapse_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut in_whitespace = false;
    for c in text.chars() {
        if c.is_whitespace() {
            if !in_whitespace {
                out.push(' ');
            }
            in_whitespace = true;
        } else {
            out.push(c);
            in_whitespace = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_files_are_decoded_directly() {
        let body = "Semester report.\nThree exams in one week.";
        assert_eq!(extract_text(body.as_bytes(), "notes.txt"), body);
    }

    #[test]
    fn binary_input_keeps_only_printable_runs() {
        let mut bytes = vec![0x00, 0x01, 0xFF];
        bytes.extend_from_slice(b"Deadlines are stacking up across all five courses this month.");
        bytes.extend_from_slice(&[0x02, 0x9C]);
        let text = extract_text(&bytes, "report.pdf");
        assert_eq!(
            text,
            "Deadlines are stacking up across all five courses this month."
        );
    }

    #[test]
    fn whitespace_runs_are_collapsed() {
        let bytes = b"too   many\n\n\nspaces      here between all these scattered words";
        let text = extract_text(bytes, "report.docx");
        assert!(!text.contains("  "));
        assert!(text.contains("too many spaces here"));
    }

    #[test]
    fn unreadable_binary_gets_the_fallback_preamble() {
        let bytes = vec![0x00; 4096];
        let text = extract_text(&bytes, "scan.pdf");
        assert!(text.starts_with("Academic Portfolio: scan.pdf"));
    }

    #[test]
    fn output_is_bounded_for_text_files() {
        let body = "a".repeat(MAX_EXTRACTED_CHARS + 1000);
        let text = extract_text(body.as_bytes(), "big.txt");
        assert_eq!(text.chars().count(), MAX_EXTRACTED_CHARS);
    }
}

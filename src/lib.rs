//! # undoc
//!
//! Document text extraction and normalization for Rust.
//!
//! This library turns raw PDF or DOCX bytes into one normalized plain-text
//! artifact: repeated headers and footers stripped, tables linearized into a
//! pipe-separated inline form, whitespace and hard line wraps repaired. The
//! result carries extraction statistics alongside the text.
//!
//! ## Quick Start
//!
//! ```no_run
//! use undoc::extract_file;
//!
//! fn main() -> undoc::Result<()> {
//!     let result = extract_file("contract.pdf")?;
//!     println!("{}", result.text);
//!     println!(
//!         "{} pages, {} tables, {} blocks removed",
//!         result.page_or_section_count, result.table_count, result.removed_block_count
//!     );
//!     Ok(())
//! }
//! ```
//!
//! ## Features
//!
//! - **PDF and DOCX input**: detected from magic bytes, extension as fallback
//! - **Boilerplate removal**: repetition and page-position heuristics
//! - **Table linearization**: `[TABLE START]` / `[TABLE END]` inline form
//! - **Line normalization**: NFC, whitespace collapse, continuation joins
//! - **Pure invocations**: no shared state, safe to call from many threads

pub mod detect;
pub mod error;
pub mod extract;
pub mod filter;
pub mod linearize;
pub mod model;
pub mod normalize;
pub mod options;
pub mod pipeline;

// Re-export commonly used types
pub use detect::{detect_format, DocFormat};
pub use error::{Error, Result};
pub use extract::{BlockExtractor, BlockStream, DocxBlockExtractor, PdfBlockExtractor};
pub use linearize::{TABLE_END, TABLE_START};
pub use model::{Block, BlockKind, Classification, ClassifiedBlock, ExtractionResult};
pub use options::{ExtractOptions, TableDetectConfig};

use std::path::Path;

/// Extract normalized text from document bytes.
///
/// The format is detected from the leading bytes; `filename_hint` is only
/// consulted when the magic bytes are inconclusive.
///
/// # Arguments
///
/// * `data` - The document bytes
/// * `filename_hint` - Original filename, used as a format hint
///
/// # Example
///
/// ```no_run
/// use undoc::extract;
///
/// let data = std::fs::read("offer.docx").unwrap();
/// let result = extract(&data, "offer.docx").unwrap();
/// println!("{}", result.text);
/// ```
pub fn extract(data: &[u8], filename_hint: &str) -> Result<ExtractionResult> {
    pipeline::run(data, filename_hint, &ExtractOptions::default())
}

/// Extract normalized text with custom thresholds.
///
/// # Example
///
/// ```no_run
/// use undoc::{extract_with_options, ExtractOptions};
///
/// let data = std::fs::read("report.pdf").unwrap();
/// let options = ExtractOptions::new()
///     .with_boundary_zones(0.1)
///     .with_repeat_threshold(2);
/// let result = extract_with_options(&data, "report.pdf", options).unwrap();
/// ```
pub fn extract_with_options(
    data: &[u8],
    filename_hint: &str,
    options: ExtractOptions,
) -> Result<ExtractionResult> {
    pipeline::run(data, filename_hint, &options)
}

/// Extract normalized text from a file on disk.
///
/// The file name doubles as the format hint.
pub fn extract_file<P: AsRef<Path>>(path: P) -> Result<ExtractionResult> {
    extract_file_with_options(path, ExtractOptions::default())
}

/// Extract normalized text from a file with custom thresholds.
pub fn extract_file_with_options<P: AsRef<Path>>(
    path: P,
    options: ExtractOptions,
) -> Result<ExtractionResult> {
    let path = path.as_ref();
    let data = std::fs::read(path)?;
    let hint = path
        .file_name()
        .and_then(|name| name.to_str())
        .unwrap_or_default();
    pipeline::run(&data, hint, &options)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_empty_data() {
        let data: [u8; 0] = [];
        let result = extract(&data, "anything.pdf");
        assert!(matches!(result, Err(Error::UnsupportedFormat)));
    }

    #[test]
    fn test_extract_unknown_magic() {
        let data = b"<!DOCTYPE html><html></html>";
        let result = extract(data, "page.html");
        assert!(matches!(result, Err(Error::UnsupportedFormat)));
    }

    #[test]
    fn test_extract_truncated_pdf_is_corrupt() {
        // The magic bytes pass detection but the container will not open.
        let result = extract(b"%PDF-1.7\n", "broken.pdf");
        assert!(matches!(result, Err(Error::Corrupt(_))));
    }

    #[test]
    fn test_extract_file_missing_path() {
        let result = extract_file("/nonexistent/path/file.pdf");
        assert!(matches!(result, Err(Error::Io(_))));
    }
}

//! Input format detection.
//!
//! Magic bytes are the authoritative check; the filename extension is only a
//! fallback hint for inputs whose header is ambiguous or damaged. A format
//! accepted here can still fail later if the container does not open.

use crate::error::{Error, Result};

/// Supported document formats.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DocFormat {
    /// Portable Document Format.
    Pdf,
    /// Office Open XML word-processing package.
    Docx,
}

impl std::fmt::Display for DocFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DocFormat::Pdf => write!(f, "PDF"),
            DocFormat::Docx => write!(f, "DOCX"),
        }
    }
}

/// PDF magic bytes at offset 0.
const PDF_MAGIC: &[u8] = b"%PDF-";

/// ZIP signatures: local file header plus the empty and spanned-archive
/// variants some producers emit first.
const ZIP_MAGICS: [&[u8]; 3] = [b"PK\x03\x04", b"PK\x05\x06", b"PK\x07\x08"];

/// Detect the document format from leading bytes, with the filename as hint.
///
/// # Arguments
/// * `data` - The document bytes
/// * `filename_hint` - Original filename; only its extension is consulted,
///   and only when the magic bytes are inconclusive
///
/// # Returns
/// * `Ok(DocFormat)` when either the magic bytes or the extension identify
///   a supported format
/// * `Err(Error::UnsupportedFormat)` otherwise
pub fn detect_format(data: &[u8], filename_hint: &str) -> Result<DocFormat> {
    if data.is_empty() {
        return Err(Error::UnsupportedFormat);
    }

    if data.starts_with(PDF_MAGIC) {
        return Ok(DocFormat::Pdf);
    }
    if ZIP_MAGICS.iter().any(|magic| data.starts_with(magic)) {
        return Ok(DocFormat::Docx);
    }

    match extension_hint(filename_hint) {
        Some(format) => {
            log::debug!(
                "magic bytes inconclusive, falling back to extension of {:?}",
                filename_hint
            );
            Ok(format)
        }
        None => Err(Error::UnsupportedFormat),
    }
}

/// Map a filename's extension to a format, if recognized.
fn extension_hint(filename: &str) -> Option<DocFormat> {
    let ext = filename.rsplit('.').next()?.to_ascii_lowercase();
    match ext.as_str() {
        "pdf" => Some(DocFormat::Pdf),
        "docx" | "doc" => Some(DocFormat::Docx),
        _ => None,
    }
}

/// Check whether bytes carry a PDF header.
pub fn is_pdf_bytes(data: &[u8]) -> bool {
    data.starts_with(PDF_MAGIC)
}

/// Check whether bytes carry a ZIP container header.
pub fn is_zip_bytes(data: &[u8]) -> bool {
    ZIP_MAGICS.iter().any(|magic| data.starts_with(magic))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_detect_pdf_magic() {
        let data = b"%PDF-1.7\n%\xe2\xe3\xcf\xd3";
        assert_eq!(detect_format(data, "document.pdf").unwrap(), DocFormat::Pdf);
    }

    #[test]
    fn test_detect_docx_magic() {
        let data = b"PK\x03\x04\x14\x00\x00\x00";
        assert_eq!(detect_format(data, "offer.docx").unwrap(), DocFormat::Docx);
    }

    #[test]
    fn test_magic_wins_over_extension() {
        // PDF bytes named .docx are still a PDF.
        let data = b"%PDF-1.4\ncontent";
        assert_eq!(detect_format(data, "report.docx").unwrap(), DocFormat::Pdf);
    }

    #[test]
    fn test_extension_fallback() {
        let data = b"\x00\x01garbage header";
        assert_eq!(detect_format(data, "scan.pdf").unwrap(), DocFormat::Pdf);
        assert_eq!(detect_format(data, "notes.docx").unwrap(), DocFormat::Docx);
        assert_eq!(detect_format(data, "legacy.doc").unwrap(), DocFormat::Docx);
    }

    #[test]
    fn test_empty_input_unsupported() {
        let data: [u8; 0] = [];
        let result = detect_format(&data, "anything.pdf");
        assert!(matches!(result, Err(Error::UnsupportedFormat)));
    }

    #[test]
    fn test_unknown_bytes_and_extension() {
        let data = b"<!DOCTYPE html><html></html>";
        let result = detect_format(data, "page.html");
        assert!(matches!(result, Err(Error::UnsupportedFormat)));
    }

    #[test]
    fn test_byte_probes() {
        assert!(is_pdf_bytes(b"%PDF-1.4\n"));
        assert!(!is_pdf_bytes(b"Not a PDF"));
        assert!(is_zip_bytes(b"PK\x03\x04rest"));
        assert!(!is_zip_bytes(b"PK\x01\x02rest"));
    }
}

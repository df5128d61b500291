//! Pipeline output with extraction statistics.

use serde::{Deserialize, Serialize};

/// The pipeline's output: assembled text plus extraction statistics.
///
/// Constructed once per invocation and returned to the caller; the pipeline
/// never mutates or retains it afterward.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Final assembled plain text.
    pub text: String,

    /// Pages (PDF) or sections (DOCX) the document yielded.
    pub page_or_section_count: u32,

    /// Table regions found by the extractor, before any filtering.
    pub table_count: u32,

    /// Blocks the noise filter discarded.
    pub removed_block_count: u32,

    /// Recovered partial failures and notices, in document order.
    pub warnings: Vec<String>,
}

impl ExtractionResult {
    /// Check if extraction produced no text at all.
    pub fn is_empty(&self) -> bool {
        self.text.is_empty()
    }

    /// Content length in bytes.
    pub fn text_len(&self) -> usize {
        self.text.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_is_empty() {
        let result = ExtractionResult::default();
        assert!(result.is_empty());
        assert_eq!(result.page_or_section_count, 0);
        assert!(result.warnings.is_empty());
    }

    #[test]
    fn test_serde_round_trip() {
        let result = ExtractionResult {
            text: "hello".to_string(),
            page_or_section_count: 3,
            table_count: 1,
            removed_block_count: 7,
            warnings: vec!["page 2 unreadable".to_string()],
        };
        let json = serde_json::to_string(&result).unwrap();
        let back: ExtractionResult = serde_json::from_str(&json).unwrap();
        assert_eq!(back.text, "hello");
        assert_eq!(back.removed_block_count, 7);
        assert_eq!(back.warnings.len(), 1);
    }
}

//! Block types produced by the extractors and annotated by the noise filter.

use serde::{Deserialize, Serialize};

/// One unit of extracted content, before noise classification.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Block {
    /// Content payload.
    pub kind: BlockKind,

    /// Source page (PDF) or section (DOCX), 1-based.
    pub page: u32,

    /// Vertical offset from the page top, normalized to [0, 1].
    ///
    /// Only the PDF path supplies this; `None` is the DOCX sentinel, since
    /// sections carry no page geometry.
    pub position: Option<f32>,
}

impl Block {
    /// Create a text-line block.
    pub fn text_line(page: u32, position: Option<f32>, content: impl Into<String>) -> Self {
        Self {
            kind: BlockKind::TextLine(content.into()),
            page,
            position,
        }
    }

    /// Create a table block from a row-major cell grid.
    pub fn table(page: u32, rows: Vec<Vec<String>>) -> Self {
        Self {
            kind: BlockKind::Table(rows),
            page,
            position: None,
        }
    }

    /// Check if this block is a table.
    pub fn is_table(&self) -> bool {
        matches!(self.kind, BlockKind::Table(_))
    }

    /// Check if this block is a text line.
    pub fn is_text_line(&self) -> bool {
        matches!(self.kind, BlockKind::TextLine(_))
    }
}

/// The content carried by a [`Block`].
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", content = "content", rename_all = "snake_case")]
pub enum BlockKind {
    /// One visually distinct line of text (PDF) or one paragraph (DOCX).
    TextLine(String),

    /// A table as a row-major grid of cell strings; empty cell = empty string.
    Table(Vec<Vec<String>>),
}

/// Why the noise filter kept or discarded a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Classification {
    /// Content; survives into the output.
    Kept,
    /// Identical normalized content recurs across enough pages/sections.
    RepeatedBoilerplate,
    /// Falls in the page-top zone, or recurs as a section's first paragraph.
    HeaderZone,
    /// Falls in the page-bottom zone, or recurs as a section's last paragraph.
    FooterZone,
    /// Empty or whitespace-only.
    Empty,
}

/// A [`Block`] annotated with the filter's verdict.
///
/// Every block entering the filter yields exactly one of these; sibling
/// order within a page/section is preserved.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifiedBlock {
    /// The underlying block.
    pub block: Block,

    /// The filter's verdict.
    pub reason: Classification,
}

impl ClassifiedBlock {
    /// Create a classified block.
    pub fn new(block: Block, reason: Classification) -> Self {
        Self { block, reason }
    }

    /// Whether the block survives into the output.
    pub fn retain(&self) -> bool {
        self.reason == Classification::Kept
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_block_constructors() {
        let line = Block::text_line(1, Some(0.5), "hello");
        assert!(line.is_text_line());
        assert!(!line.is_table());
        assert_eq!(line.page, 1);

        let table = Block::table(2, vec![vec!["A".into(), "B".into()]]);
        assert!(table.is_table());
        assert_eq!(table.position, None);
    }

    #[test]
    fn test_retain_only_for_kept() {
        let block = Block::text_line(1, None, "x");
        assert!(ClassifiedBlock::new(block.clone(), Classification::Kept).retain());
        for reason in [
            Classification::RepeatedBoilerplate,
            Classification::HeaderZone,
            Classification::FooterZone,
            Classification::Empty,
        ] {
            assert!(!ClassifiedBlock::new(block.clone(), reason).retain());
        }
    }

    #[test]
    fn test_classification_serde_names() {
        let json = serde_json::to_string(&Classification::RepeatedBoilerplate).unwrap();
        assert_eq!(json, "\"repeated-boilerplate\"");
        let json = serde_json::to_string(&Classification::HeaderZone).unwrap();
        assert_eq!(json, "\"header-zone\"");
    }
}

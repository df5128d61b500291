//! Format-specific block extraction.
//!
//! Each supported format has an extractor that turns raw document bytes into
//! an ordered stream of text-line and table blocks. Everything downstream of
//! this module is format-agnostic.

mod docx;
mod pdf;

pub use docx::DocxBlockExtractor;
pub use pdf::PdfBlockExtractor;

use crate::detect::DocFormat;
use crate::error::Result;
use crate::model::Block;
use crate::options::ExtractOptions;

/// The ordered output of one extractor run.
#[derive(Debug)]
pub struct BlockStream {
    /// Blocks in document order, grouped by ascending page/section.
    pub blocks: Vec<Block>,
    /// Pages (PDF) or sections (DOCX) the document yielded.
    pub page_or_section_count: u32,
    /// Recovered partial failures, in document order.
    pub warnings: Vec<String>,
}

/// Turns document bytes into a block stream.
pub trait BlockExtractor {
    /// Extract all blocks. Fails only on conditions that make the whole
    /// document unreadable; partial losses become warnings in the stream.
    fn extract(&self, data: &[u8], options: &ExtractOptions) -> Result<BlockStream>;
}

/// Select the extractor for a detected format.
pub fn extractor_for(format: DocFormat) -> Box<dyn BlockExtractor> {
    match format {
        DocFormat::Pdf => Box::new(PdfBlockExtractor::new()),
        DocFormat::Docx => Box::new(DocxBlockExtractor::new()),
    }
}

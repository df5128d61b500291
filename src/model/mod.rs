//! Data model for the extraction pipeline.
//!
//! Blocks are the unit of extracted content between the format-specific
//! extractors and the noise filter; the filter annotates each one with a
//! classification, and the orchestrator assembles the kept ones into the
//! final [`ExtractionResult`].

mod block;
mod result;

pub use block::{Block, BlockKind, Classification, ClassifiedBlock};
pub use result::ExtractionResult;

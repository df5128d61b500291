//! Noise classification.
//!
//! Consumes the complete ordered block stream for one document and decides,
//! per block, whether it is content or boilerplate. Two heuristics combine:
//!
//! 1. Repetition (both formats): a line whose normalized content recurs on
//!    enough distinct pages/sections is a running header, footer, page
//!    number, or banner. Tables participate via their serialized cells.
//! 2. Position (PDF only): lines in the top/bottom zone of a page are
//!    header/footer material, unless the same content also shows up in the
//!    interior of another page (which protects section headings that merely
//!    start near a page top).
//!
//! DOCX blocks carry no geometry, so the first and last paragraph of each
//! section stand in as header/footer candidates, promoted only when they
//! recur across sections.

use std::collections::{BTreeSet, HashMap};

use crate::linearize::serialize_rows;
use crate::model::{Block, BlockKind, Classification, ClassifiedBlock};
use crate::normalize::normalized_key;
use crate::options::ExtractOptions;

/// Classifies extracted blocks as content vs. noise.
pub struct NoiseFilter<'a> {
    options: &'a ExtractOptions,
}

impl<'a> NoiseFilter<'a> {
    /// Create a filter using the invocation's thresholds.
    pub fn new(options: &'a ExtractOptions) -> Self {
        Self { options }
    }

    /// Classify every block, preserving order. Exactly one classified block
    /// comes out per block in.
    pub fn classify(&self, blocks: Vec<Block>) -> Vec<ClassifiedBlock> {
        let keys: Vec<Option<String>> = blocks.iter().map(block_key).collect();

        // Pages/sections each key occurs on, for the repetition heuristic.
        let mut occurrences: HashMap<&str, BTreeSet<u32>> = HashMap::new();
        // Pages where a key occurs outside the boundary zones (PDF only),
        // for the zone-override protection.
        let mut interior: HashMap<&str, BTreeSet<u32>> = HashMap::new();
        for (block, key) in blocks.iter().zip(&keys) {
            let Some(key) = key.as_deref() else { continue };
            occurrences.entry(key).or_default().insert(block.page);
            if let Some(position) = block.position {
                if !self.in_header_zone(position) && !self.in_footer_zone(position) {
                    interior.entry(key).or_default().insert(block.page);
                }
            }
        }

        let boundaries = SectionBoundaries::collect(&blocks, &keys, self.options.repeat_threshold);

        blocks
            .into_iter()
            .zip(keys.iter())
            .enumerate()
            .map(|(index, (block, key))| {
                let reason = self.classify_one(index, &block, key.as_deref(), &occurrences, &interior, &boundaries);
                ClassifiedBlock::new(block, reason)
            })
            .collect()
    }

    fn classify_one(
        &self,
        index: usize,
        block: &Block,
        key: Option<&str>,
        occurrences: &HashMap<&str, BTreeSet<u32>>,
        interior: &HashMap<&str, BTreeSet<u32>>,
        boundaries: &SectionBoundaries,
    ) -> Classification {
        match &block.kind {
            BlockKind::TextLine(_) => {
                let Some(key) = key else {
                    return Classification::Empty;
                };
                if self.is_repeated(key, occurrences) {
                    return Classification::RepeatedBoilerplate;
                }
                if let Some(position) = block.position {
                    let protected = interior
                        .get(key)
                        .map(|pages| pages.iter().any(|&p| p != block.page))
                        .unwrap_or(false);
                    if !protected {
                        if self.in_header_zone(position) {
                            return Classification::HeaderZone;
                        }
                        if self.in_footer_zone(position) {
                            return Classification::FooterZone;
                        }
                    }
                } else if let Some(reason) = boundaries.verdict(index) {
                    return reason;
                }
                Classification::Kept
            }
            // Tables are only ever dropped as repeated boilerplate.
            BlockKind::Table(_) => match key {
                Some(key) if self.is_repeated(key, occurrences) => {
                    Classification::RepeatedBoilerplate
                }
                _ => Classification::Kept,
            },
        }
    }

    fn is_repeated(&self, key: &str, occurrences: &HashMap<&str, BTreeSet<u32>>) -> bool {
        occurrences
            .get(key)
            .map(|pages| pages.len() >= self.options.repeat_threshold)
            .unwrap_or(false)
    }

    fn in_header_zone(&self, position: f32) -> bool {
        position <= self.options.header_zone
    }

    fn in_footer_zone(&self, position: f32) -> bool {
        position >= 1.0 - self.options.footer_zone
    }
}

/// Identity key for repetition matching: case-folded normalized content for
/// text lines, serialized cells for tables. `None` means empty.
fn block_key(block: &Block) -> Option<String> {
    let key = match &block.kind {
        BlockKind::TextLine(content) => normalized_key(content),
        BlockKind::Table(rows) => serialize_rows(rows),
    };
    if key.is_empty() {
        None
    } else {
        Some(key)
    }
}

/// First/last non-empty paragraph per DOCX section, promoted to
/// header/footer when the same content holds that position in enough
/// sections.
struct SectionBoundaries {
    header_indices: BTreeSet<usize>,
    footer_indices: BTreeSet<usize>,
}

impl SectionBoundaries {
    fn collect(blocks: &[Block], keys: &[Option<String>], threshold: usize) -> Self {
        // (first, last) non-empty sentinel-position text line per section.
        let mut per_section: HashMap<u32, (usize, usize)> = HashMap::new();
        for (index, (block, key)) in blocks.iter().zip(keys).enumerate() {
            if !block.is_text_line() || block.position.is_some() || key.is_none() {
                continue;
            }
            per_section
                .entry(block.page)
                .and_modify(|(_, last)| *last = index)
                .or_insert((index, index));
        }

        let mut first_sections: HashMap<&str, BTreeSet<u32>> = HashMap::new();
        let mut last_sections: HashMap<&str, BTreeSet<u32>> = HashMap::new();
        for (&section, &(first, last)) in &per_section {
            if let Some(key) = keys[first].as_deref() {
                first_sections.entry(key).or_default().insert(section);
            }
            if let Some(key) = keys[last].as_deref() {
                last_sections.entry(key).or_default().insert(section);
            }
        }

        let mut header_indices = BTreeSet::new();
        let mut footer_indices = BTreeSet::new();
        for &(first, last) in per_section.values() {
            if let Some(key) = keys[first].as_deref() {
                if first_sections[key].len() >= threshold {
                    header_indices.insert(first);
                }
            }
            if let Some(key) = keys[last].as_deref() {
                if last_sections[key].len() >= threshold {
                    footer_indices.insert(last);
                }
            }
        }
        Self {
            header_indices,
            footer_indices,
        }
    }

    fn verdict(&self, index: usize) -> Option<Classification> {
        if self.header_indices.contains(&index) {
            return Some(Classification::HeaderZone);
        }
        if self.footer_indices.contains(&index) {
            return Some(Classification::FooterZone);
        }
        None
    }
}

//! Pipeline orchestration.
//!
//! Sequences detection, extraction, noise filtering, and assembly into the
//! final [`ExtractionResult`]. Fatal conditions (unrecognized input, a
//! container that will not open, encryption) surface as errors; everything
//! partial is a warning carried in the result.

use crate::detect::detect_format;
use crate::error::Result;
use crate::extract::extractor_for;
use crate::filter::NoiseFilter;
use crate::linearize::linearize;
use crate::model::{BlockKind, ClassifiedBlock, ExtractionResult};
use crate::normalize::{join_continuations, normalize_line};
use crate::options::ExtractOptions;

/// Run the full pipeline over one document.
pub fn run(data: &[u8], filename_hint: &str, options: &ExtractOptions) -> Result<ExtractionResult> {
    let format = detect_format(data, filename_hint)?;
    log::debug!("detected {} input, {} bytes", format, data.len());

    let stream = extractor_for(format).extract(data, options)?;
    let table_count = stream.blocks.iter().filter(|b| b.is_table()).count() as u32;
    let mut warnings = stream.warnings;

    let classified = NoiseFilter::new(options).classify(stream.blocks);
    let removed_block_count = classified.iter().filter(|c| !c.retain()).count() as u32;
    log::debug!(
        "classified {} blocks, {} removed",
        classified.len(),
        removed_block_count
    );

    let text = assemble(&classified);
    if text.is_empty() {
        warnings.push("no extractable text found".to_string());
    }

    Ok(ExtractionResult {
        text,
        page_or_section_count: stream.page_or_section_count,
        table_count,
        removed_block_count,
        warnings,
    })
}

/// Assemble kept blocks into the output text: one physical line per text
/// line or table row, pages/sections separated by one blank line.
///
/// Continuation joining runs over maximal runs of text lines; a table block
/// or a page boundary ends the run.
pub(crate) fn assemble(classified: &[ClassifiedBlock]) -> String {
    let mut pages: Vec<Vec<String>> = Vec::new();
    let mut lines: Vec<String> = Vec::new();
    let mut run: Vec<String> = Vec::new();
    let mut current_page: Option<u32> = None;

    fn flush_run(run: &mut Vec<String>, lines: &mut Vec<String>) {
        if !run.is_empty() {
            lines.extend(join_continuations(std::mem::take(run)));
        }
    }

    for item in classified.iter().filter(|c| c.retain()) {
        if current_page != Some(item.block.page) {
            flush_run(&mut run, &mut lines);
            if !lines.is_empty() {
                pages.push(std::mem::take(&mut lines));
            }
            current_page = Some(item.block.page);
        }
        match &item.block.kind {
            BlockKind::TextLine(content) => run.push(normalize_line(content)),
            BlockKind::Table(rows) => {
                flush_run(&mut run, &mut lines);
                lines.extend(linearize(rows));
            }
        }
    }
    flush_run(&mut run, &mut lines);
    if !lines.is_empty() {
        pages.push(lines);
    }

    pages
        .iter()
        .map(|lines| lines.join("\n"))
        .collect::<Vec<_>>()
        .join("\n\n")
}

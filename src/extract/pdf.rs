//! PDF block extraction using lopdf.
//!
//! Walks each page's content stream tracking the text matrix, decodes shown
//! strings through the page's font encodings, groups the resulting spans
//! into baseline lines, and runs column-alignment analysis over the line
//! geometry to find table regions. Geometry leaves this module reduced to a
//! single normalized top-down position per line.

use lopdf::content::Content;
use lopdf::{Document, Object, ObjectId};

use crate::error::{Error, Result};
use crate::model::Block;
use crate::options::{ExtractOptions, TableDetectConfig};

use super::{BlockExtractor, BlockStream};

/// Letter-size fallback when a page carries no usable MediaBox.
const DEFAULT_PAGE_HEIGHT: f32 = 792.0;

/// TJ adjustments past this magnitude (1/1000 text-space units) are word
/// breaks rather than kerning.
const TJ_SPACE_THRESHOLD: f32 = 200.0;

/// PDF extractor backed by lopdf.
pub struct PdfBlockExtractor;

impl PdfBlockExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for PdfBlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockExtractor for PdfBlockExtractor {
    fn extract(&self, data: &[u8], options: &ExtractOptions) -> Result<BlockStream> {
        let doc = Document::load_mem(data)?;
        if doc.is_encrypted() {
            return Err(Error::Encrypted);
        }

        let pages = doc.get_pages();
        let page_count = pages.len() as u32;
        let mut blocks = Vec::new();
        let mut warnings = Vec::new();

        for (&page_num, &page_id) in &pages {
            match extract_page(&doc, page_id, page_num, &options.table_detect) {
                Ok(mut page_blocks) => blocks.append(&mut page_blocks),
                Err(e) => {
                    log::warn!("failed to read page {}: {}", page_num, e);
                    warnings.push(format!("page {} unreadable", page_num));
                }
            }
        }

        log::debug!("extracted {} blocks from {} pages", blocks.len(), page_count);
        Ok(BlockStream {
            blocks,
            page_or_section_count: page_count,
            warnings,
        })
    }
}

/// A positioned piece of shown text, before line grouping.
#[derive(Debug, Clone)]
struct Span {
    text: String,
    x: f32,
    y: f32,
    width: f32,
    font_size: f32,
}

impl Span {
    fn new(text: String, x: f32, y: f32, font_size: f32) -> Self {
        // No glyph metrics at this level; half the font size per character
        // is a serviceable width estimate for gap analysis.
        let width = text.chars().count() as f32 * font_size * 0.5;
        Self {
            text,
            x,
            y,
            width,
            font_size,
        }
    }

    fn right(&self) -> f32 {
        self.x + self.width
    }
}

/// Spans sharing a baseline, sorted left to right.
#[derive(Debug, Clone)]
struct Line {
    y: f32,
    spans: Vec<Span>,
}

impl Line {
    /// Full line text with spaces inserted at visible gaps.
    fn text(&self) -> String {
        join_spans(&self.spans)
    }

    /// Split the line into cells at horizontal gaps wider than `min_gap`.
    /// Returns each cell's left edge with its text.
    fn cells(&self, min_gap: f32) -> Vec<(f32, String)> {
        let mut cells: Vec<(f32, Vec<Span>)> = Vec::new();
        for span in &self.spans {
            match cells.last_mut() {
                Some((_, group)) if span.x - group.last().map(Span::right).unwrap_or(0.0) <= min_gap => {
                    group.push(span.clone());
                }
                _ => cells.push((span.x, vec![span.clone()])),
            }
        }
        cells
            .into_iter()
            .map(|(x, group)| (x, join_spans(&group)))
            .collect()
    }
}

/// Join spans, inserting a space where the horizontal gap exceeds a fifth of
/// the estimated character width.
fn join_spans(spans: &[Span]) -> String {
    let mut out = String::new();
    for (i, span) in spans.iter().enumerate() {
        if i > 0 {
            let prev = &spans[i - 1];
            let gap = span.x - prev.right();
            let char_width = span.font_size * 0.5;
            if gap > char_width * 0.2 && !out.ends_with(' ') && !span.text.starts_with(' ') {
                out.push(' ');
            }
        }
        out.push_str(&span.text);
    }
    out
}

fn extract_page(
    doc: &Document,
    page_id: ObjectId,
    page_num: u32,
    config: &TableDetectConfig,
) -> Result<Vec<Block>> {
    let height = page_height(doc, page_id);
    let spans = extract_spans(doc, page_id)?;
    let lines = group_into_lines(spans);
    Ok(assemble_blocks(lines, page_num, height, config))
}

/// Page height from the MediaBox, defaulting to Letter.
fn page_height(doc: &Document, page_id: ObjectId) -> f32 {
    if let Ok(page_dict) = doc.get_dictionary(page_id) {
        if let Ok(media_box) = page_dict.get(b"MediaBox") {
            if let Ok(array) = media_box.as_array() {
                if array.len() >= 4 {
                    let lower = array[1].as_float().unwrap_or(0.0);
                    let upper = array[3].as_float().unwrap_or(DEFAULT_PAGE_HEIGHT);
                    if upper > lower {
                        return upper - lower;
                    }
                }
            }
        }
    }
    DEFAULT_PAGE_HEIGHT
}

/// Walk the page's content stream and collect positioned text spans.
fn extract_spans(doc: &Document, page_id: ObjectId) -> Result<Vec<Span>> {
    let fonts = doc.get_page_fonts(page_id)?;
    let content = doc.get_page_content(page_id)?;
    let content = Content::decode(&content).map_err(|e| Error::Corrupt(e.to_string()))?;

    let mut spans = Vec::new();
    let mut cursor = TextCursor::default();
    let mut font_name: Vec<u8> = Vec::new();
    let mut font_size: f32 = 12.0;
    let mut in_text = false;

    for op in content.operations {
        match op.operator.as_str() {
            "BT" => {
                in_text = true;
                cursor = TextCursor::default();
            }
            "ET" => in_text = false,
            "Tf" => {
                if op.operands.len() >= 2 {
                    if let Object::Name(name) = &op.operands[0] {
                        font_name = name.clone();
                    }
                    font_size = number(&op.operands[1]).unwrap_or(12.0);
                }
            }
            "Td" => {
                if op.operands.len() >= 2 {
                    let tx = number(&op.operands[0]).unwrap_or(0.0);
                    let ty = number(&op.operands[1]).unwrap_or(0.0);
                    cursor.translate(tx, ty);
                }
            }
            "TD" => {
                if op.operands.len() >= 2 {
                    let tx = number(&op.operands[0]).unwrap_or(0.0);
                    let ty = number(&op.operands[1]).unwrap_or(0.0);
                    cursor.leading = -ty;
                    cursor.translate(tx, ty);
                }
            }
            "TL" => {
                if let Some(leading) = op.operands.first().and_then(number) {
                    cursor.leading = leading;
                }
            }
            "Tm" => {
                if op.operands.len() >= 6 {
                    cursor.set(
                        number(&op.operands[0]).unwrap_or(1.0),
                        number(&op.operands[1]).unwrap_or(0.0),
                        number(&op.operands[2]).unwrap_or(0.0),
                        number(&op.operands[3]).unwrap_or(1.0),
                        number(&op.operands[4]).unwrap_or(0.0),
                        number(&op.operands[5]).unwrap_or(0.0),
                    );
                }
            }
            "T*" => cursor.next_line(),
            "Tj" | "TJ" => {
                if in_text {
                    let encoding = fonts
                        .get(&font_name)
                        .and_then(|f| f.get_font_encoding(doc).ok());

                    let text = if op.operator == "TJ" {
                        decode_tj_array(op.operands.first(), encoding.as_ref())
                    } else if let Some(Object::String(bytes, _)) = op.operands.first() {
                        decode_string(bytes, encoding.as_ref())
                    } else {
                        String::new()
                    };

                    if !text.trim().is_empty() {
                        let (x, y) = cursor.position();
                        spans.push(Span::new(text, x, y, font_size * cursor.scale()));
                    }
                }
            }
            "'" | "\"" => {
                cursor.next_line();
                if in_text {
                    let text_idx = if op.operator == "\"" { 2 } else { 0 };
                    if let Some(Object::String(bytes, _)) = op.operands.get(text_idx) {
                        let encoding = fonts
                            .get(&font_name)
                            .and_then(|f| f.get_font_encoding(doc).ok());
                        let text = decode_string(bytes, encoding.as_ref());
                        if !text.trim().is_empty() {
                            let (x, y) = cursor.position();
                            spans.push(Span::new(text, x, y, font_size * cursor.scale()));
                        }
                    }
                }
            }
            _ => {}
        }
    }

    Ok(spans)
}

/// Decode a TJ operand array: strings interleaved with kerning adjustments,
/// where large negative adjustments stand in for word spaces.
fn decode_tj_array(
    operand: Option<&Object>,
    encoding: Option<&lopdf::Encoding>,
) -> String {
    let Some(Object::Array(items)) = operand else {
        return String::new();
    };
    let mut combined = String::new();
    for item in items {
        match item {
            Object::String(bytes, _) => combined.push_str(&decode_string(bytes, encoding)),
            Object::Integer(n) => {
                if -(*n as f32) > TJ_SPACE_THRESHOLD && !combined.ends_with(' ') && !combined.is_empty() {
                    combined.push(' ');
                }
            }
            Object::Real(n) => {
                if -n > TJ_SPACE_THRESHOLD && !combined.ends_with(' ') && !combined.is_empty() {
                    combined.push(' ');
                }
            }
            _ => {}
        }
    }
    combined
}

fn decode_string(bytes: &[u8], encoding: Option<&lopdf::Encoding>) -> String {
    match encoding {
        Some(enc) => Document::decode_text(enc, bytes).unwrap_or_else(|_| decode_text_simple(bytes)),
        None => decode_text_simple(bytes),
    }
}

/// Decoding fallback when no font encoding is available: UTF-16BE with BOM,
/// then UTF-8, then Latin-1.
fn decode_text_simple(bytes: &[u8]) -> String {
    if bytes.len() >= 2 && bytes[0] == 0xFE && bytes[1] == 0xFF {
        let utf16: Vec<u16> = bytes[2..]
            .chunks_exact(2)
            .map(|c| u16::from_be_bytes([c[0], c[1]]))
            .collect();
        return String::from_utf16(&utf16).unwrap_or_default();
    }
    match String::from_utf8(bytes.to_vec()) {
        Ok(s) => s,
        Err(_) => bytes.iter().map(|&b| b as char).collect(),
    }
}

/// Group spans into baseline lines: sort top-down then left-right, merge
/// spans whose Y positions differ by less than a fraction of the font size.
fn group_into_lines(mut spans: Vec<Span>) -> Vec<Line> {
    spans.sort_by(|a, b| {
        b.y.partial_cmp(&a.y)
            .unwrap_or(std::cmp::Ordering::Equal)
            .then(a.x.partial_cmp(&b.x).unwrap_or(std::cmp::Ordering::Equal))
    });

    let mut lines: Vec<Line> = Vec::new();
    for span in spans {
        let tolerance = span.font_size * 0.3;
        match lines.last_mut() {
            Some(line) if (span.y - line.y).abs() <= tolerance => line.spans.push(span),
            _ => lines.push(Line {
                y: span.y,
                spans: vec![span],
            }),
        }
    }
    lines
}

/// Turn lines into blocks: consecutive lines splitting into the same aligned
/// cells become one table block; the rest become positioned text lines.
fn assemble_blocks(
    lines: Vec<Line>,
    page: u32,
    page_height: f32,
    config: &TableDetectConfig,
) -> Vec<Block> {
    let splits: Vec<Vec<(f32, String)>> = lines
        .iter()
        .map(|line| line.cells(config.min_column_gap))
        .collect();

    let mut blocks = Vec::new();
    let mut i = 0;
    while i < lines.len() {
        let run = table_run_len(&splits, i, config);
        if run >= config.min_rows {
            let rows = splits[i..i + run]
                .iter()
                .map(|cells| cells.iter().map(|(_, text)| text.clone()).collect())
                .collect();
            blocks.push(Block::table(page, rows));
            i += run;
        } else {
            let position = ((page_height - lines[i].y) / page_height).clamp(0.0, 1.0);
            blocks.push(Block::text_line(page, Some(position), lines[i].text()));
            i += 1;
        }
    }
    blocks
}

/// Length of the aligned-cell run starting at `start`: lines with the same
/// cell count whose column starts match within tolerance.
fn table_run_len(splits: &[Vec<(f32, String)>], start: usize, config: &TableDetectConfig) -> usize {
    let first = &splits[start];
    if first.len() < config.min_columns || first.len() > config.max_columns {
        return 0;
    }
    let mut len = 1;
    while start + len < splits.len() {
        let next = &splits[start + len];
        if next.len() != first.len() {
            break;
        }
        let aligned = first
            .iter()
            .zip(next)
            .all(|((a, _), (b, _))| (a - b).abs() <= config.column_tolerance);
        if !aligned {
            break;
        }
        len += 1;
    }
    len
}

/// Text matrix state while walking a content stream.
#[derive(Debug, Clone)]
struct TextCursor {
    a: f32,
    b: f32,
    c: f32,
    d: f32,
    e: f32,
    f: f32,
    leading: f32,
}

impl Default for TextCursor {
    fn default() -> Self {
        Self {
            a: 1.0,
            b: 0.0,
            c: 0.0,
            d: 1.0,
            e: 0.0,
            f: 0.0,
            leading: 12.0,
        }
    }
}

impl TextCursor {
    fn set(&mut self, a: f32, b: f32, c: f32, d: f32, e: f32, f: f32) {
        self.a = a;
        self.b = b;
        self.c = c;
        self.d = d;
        self.e = e;
        self.f = f;
    }

    fn translate(&mut self, tx: f32, ty: f32) {
        self.e += tx * self.a + ty * self.c;
        self.f += tx * self.b + ty * self.d;
    }

    fn next_line(&mut self) {
        self.f -= self.leading * self.d;
    }

    fn position(&self) -> (f32, f32) {
        (self.e, self.f)
    }

    fn scale(&self) -> f32 {
        (self.a * self.a + self.c * self.c).sqrt()
    }
}

fn number(obj: &Object) -> Option<f32> {
    match obj {
        Object::Integer(i) => Some(*i as f32),
        Object::Real(r) => Some(*r),
        _ => None,
    }
}

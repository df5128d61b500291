//! DOCX block extraction.
//!
//! Opens the OOXML package with `zip` and streams `word/document.xml`
//! through `quick-xml`, tracking just enough state to emit paragraphs and
//! tables in document order. A running section counter stands in for page
//! numbers: `w:sectPr` inside a paragraph's properties closes the section
//! after that paragraph, while the body-final `sectPr` closes nothing.
//! Nested tables are flattened into the containing cell's text.

use std::io::{Cursor, Read};

use quick_xml::events::Event;
use quick_xml::Reader;

use crate::error::{Error, Result};
use crate::model::Block;
use crate::options::ExtractOptions;

use super::{BlockExtractor, BlockStream};

/// DOCX extractor backed by zip + quick-xml.
pub struct DocxBlockExtractor;

impl DocxBlockExtractor {
    pub fn new() -> Self {
        Self
    }
}

impl Default for DocxBlockExtractor {
    fn default() -> Self {
        Self::new()
    }
}

impl BlockExtractor for DocxBlockExtractor {
    fn extract(&self, data: &[u8], _options: &ExtractOptions) -> Result<BlockStream> {
        let mut archive = zip::ZipArchive::new(Cursor::new(data))?;
        let xml = {
            let mut entry = match archive.by_name("word/document.xml") {
                Ok(entry) => entry,
                // A ZIP without the main document part is not a DOCX at all.
                Err(zip::result::ZipError::FileNotFound) => {
                    return Err(Error::UnsupportedFormat)
                }
                Err(e) => return Err(e.into()),
            };
            let mut xml = Vec::with_capacity(entry.size() as usize);
            entry.read_to_end(&mut xml)?;
            xml
        };

        let mut parser = BodyParser::new();
        parser.run(&xml);
        let section_count = parser.blocks.iter().map(|b| b.page).max().unwrap_or(0);

        log::debug!(
            "extracted {} blocks from {} sections",
            parser.blocks.len(),
            section_count
        );
        Ok(BlockStream {
            blocks: parser.blocks,
            page_or_section_count: section_count,
            warnings: parser.warnings,
        })
    }
}

/// Streaming state machine over the document body.
struct BodyParser {
    blocks: Vec<Block>,
    warnings: Vec<String>,
    /// 1-based running section counter.
    section: u32,
    /// Set by a paragraph-level `w:sectPr`; applied after the paragraph.
    pending_section_break: bool,
    in_paragraph: bool,
    in_text: bool,
    paragraph: String,
    /// Nesting depth of `w:tbl`; content below depth 1 flattens upward.
    table_depth: usize,
    in_cell: bool,
    rows: Vec<Vec<String>>,
    row: Vec<String>,
    cell: String,
}

impl BodyParser {
    fn new() -> Self {
        Self {
            blocks: Vec::new(),
            warnings: Vec::new(),
            section: 1,
            pending_section_break: false,
            in_paragraph: false,
            in_text: false,
            paragraph: String::new(),
            table_depth: 0,
            in_cell: false,
            rows: Vec::new(),
            row: Vec::new(),
            cell: String::new(),
        }
    }

    fn run(&mut self, xml: &[u8]) {
        let mut reader = Reader::from_reader(xml);
        let mut buf = Vec::new();
        loop {
            match reader.read_event_into(&mut buf) {
                Ok(Event::Start(e)) => self.open(local_name(e.name().as_ref())),
                Ok(Event::Empty(e)) => {
                    let name = local_name(e.name().as_ref()).to_vec();
                    self.open(&name);
                    self.close(&name);
                }
                Ok(Event::End(e)) => self.close(local_name(e.name().as_ref())),
                Ok(Event::Text(t)) => {
                    if self.in_text {
                        if let Ok(text) = t.unescape() {
                            self.push_text(&text);
                        }
                    }
                }
                Ok(Event::Eof) => break,
                Ok(_) => {}
                Err(e) => {
                    // Truncated or malformed XML: keep what was parsed.
                    log::warn!("document.xml parse stopped early: {}", e);
                    self.warnings.push("document body truncated".to_string());
                    break;
                }
            }
            buf.clear();
        }
    }

    fn open(&mut self, name: &[u8]) {
        match name {
            b"p" => {
                self.in_paragraph = true;
                if !self.in_cell {
                    self.paragraph.clear();
                }
            }
            b"t" => self.in_text = true,
            b"tab" => self.push_text("\t"),
            b"br" | b"cr" => self.push_text("\n"),
            b"sectPr" => {
                // Only paragraph-level section properties end a section; the
                // body-final sectPr sits outside any paragraph.
                if self.in_paragraph && self.table_depth == 0 {
                    self.pending_section_break = true;
                }
            }
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.rows.clear();
                }
            }
            b"tr" => {
                if self.table_depth == 1 {
                    self.row.clear();
                }
            }
            b"tc" => {
                if self.table_depth == 1 {
                    self.in_cell = true;
                    self.cell.clear();
                }
            }
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"p" => {
                self.in_paragraph = false;
                if self.in_cell {
                    // Paragraph breaks inside a cell become soft separators.
                    self.cell.push(' ');
                } else {
                    self.flush_paragraph();
                    if self.pending_section_break {
                        self.section += 1;
                        self.pending_section_break = false;
                    }
                }
            }
            b"t" => self.in_text = false,
            b"tc" => {
                if self.table_depth == 1 {
                    self.in_cell = false;
                    self.row.push(std::mem::take(&mut self.cell));
                }
            }
            b"tr" => {
                if self.table_depth == 1 && !self.row.is_empty() {
                    self.rows.push(std::mem::take(&mut self.row));
                }
            }
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 && !self.rows.is_empty() {
                    self.blocks
                        .push(Block::table(self.section, std::mem::take(&mut self.rows)));
                }
            }
            _ => {}
        }
    }

    fn push_text(&mut self, text: &str) {
        if self.in_cell {
            self.cell.push_str(text);
        } else if self.in_paragraph {
            self.paragraph.push_str(text);
        }
    }

    /// Emit the accumulated paragraph, one block per explicit line break.
    fn flush_paragraph(&mut self) {
        let paragraph = std::mem::take(&mut self.paragraph);
        for segment in paragraph.split('\n') {
            self.blocks
                .push(Block::text_line(self.section, None, segment));
        }
    }
}

/// Strip the namespace prefix from a qualified XML name.
fn local_name(name: &[u8]) -> &[u8] {
    match name.iter().position(|&b| b == b':') {
        Some(i) => &name[i + 1..],
        None => name,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::BlockKind;
    use std::io::Write;

    /// Build a minimal DOCX package around the given body XML.
    fn docx_with_body(body: &str) -> Vec<u8> {
        let document = format!(
            "<?xml version=\"1.0\" encoding=\"UTF-8\" standalone=\"yes\"?>\
             <w:document xmlns:w=\"http://schemas.openxmlformats.org/wordprocessingml/2006/main\">\
             <w:body>{body}</w:body></w:document>"
        );
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer
            .start_file("[Content_Types].xml", options)
            .unwrap();
        writer
            .write_all(b"<?xml version=\"1.0\"?><Types xmlns=\"http://schemas.openxmlformats.org/package/2006/content-types\"/>")
            .unwrap();
        writer.start_file("word/document.xml", options).unwrap();
        writer.write_all(document.as_bytes()).unwrap();
        writer.finish().unwrap().into_inner()
    }

    fn extract(body: &str) -> BlockStream {
        DocxBlockExtractor::new()
            .extract(&docx_with_body(body), &ExtractOptions::default())
            .unwrap()
    }

    fn p(text: &str) -> String {
        format!("<w:p><w:r><w:t>{text}</w:t></w:r></w:p>")
    }

    #[test]
    fn test_paragraphs_in_order() {
        let stream = extract(&format!("{}{}", p("First"), p("Second")));
        assert_eq!(stream.blocks.len(), 2);
        assert_eq!(stream.blocks[0].kind, BlockKind::TextLine("First".to_string()));
        assert_eq!(stream.blocks[1].kind, BlockKind::TextLine("Second".to_string()));
        assert!(stream.blocks.iter().all(|b| b.position.is_none()));
        assert_eq!(stream.page_or_section_count, 1);
    }

    #[test]
    fn test_tab_and_break() {
        let stream = extract(
            "<w:p><w:r><w:t>left</w:t><w:tab/><w:t>right</w:t><w:br/><w:t>next line</w:t></w:r></w:p>",
        );
        assert_eq!(stream.blocks.len(), 2);
        assert_eq!(stream.blocks[0].kind, BlockKind::TextLine("left\tright".to_string()));
        assert_eq!(stream.blocks[1].kind, BlockKind::TextLine("next line".to_string()));
    }

    #[test]
    fn test_section_break_increments_after_paragraph() {
        let body = format!(
            "{}<w:p><w:pPr><w:sectPr/></w:pPr><w:r><w:t>last of one</w:t></w:r></w:p>{}",
            p("body one"),
            p("body two"),
        );
        let stream = extract(&body);
        assert_eq!(stream.blocks[0].page, 1);
        // The paragraph carrying the break still belongs to the old section.
        assert_eq!(stream.blocks[1].page, 1);
        assert_eq!(stream.blocks[2].page, 2);
        assert_eq!(stream.page_or_section_count, 2);
    }

    #[test]
    fn test_body_final_sectpr_ignored() {
        let body = format!("{}<w:sectPr><w:pgSz/></w:sectPr>", p("only paragraph"));
        let stream = extract(&body);
        assert_eq!(stream.page_or_section_count, 1);
    }

    #[test]
    fn test_table_rows_and_cells() {
        let body = "<w:tbl>\
            <w:tr><w:tc><w:p><w:r><w:t>Item</w:t></w:r></w:p></w:tc>\
                  <w:tc><w:p><w:r><w:t>Qty</w:t></w:r></w:p></w:tc></w:tr>\
            <w:tr><w:tc><w:p><w:r><w:t>Bolt</w:t></w:r></w:p></w:tc>\
                  <w:tc><w:p><w:r><w:t>40</w:t></w:r></w:p></w:tc></w:tr>\
            </w:tbl>";
        let stream = extract(body);
        assert_eq!(stream.blocks.len(), 1);
        match &stream.blocks[0].kind {
            BlockKind::Table(rows) => {
                assert_eq!(rows.len(), 2);
                assert_eq!(rows[0][0].trim(), "Item");
                assert_eq!(rows[1][1].trim(), "40");
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_nested_table_flattens_into_cell() {
        let body = "<w:tbl><w:tr><w:tc>\
            <w:p><w:r><w:t>outer</w:t></w:r></w:p>\
            <w:tbl><w:tr><w:tc><w:p><w:r><w:t>inner</w:t></w:r></w:p></w:tc></w:tr></w:tbl>\
            </w:tc></w:tr></w:tbl>";
        let stream = extract(body);
        assert_eq!(stream.blocks.len(), 1);
        match &stream.blocks[0].kind {
            BlockKind::Table(rows) => {
                assert_eq!(rows.len(), 1);
                assert!(rows[0][0].contains("outer"));
                assert!(rows[0][0].contains("inner"));
            }
            other => panic!("expected table, got {:?}", other),
        }
    }

    #[test]
    fn test_cell_paragraphs_do_not_emit_blocks() {
        let body = format!(
            "<w:tbl><w:tr><w:tc>{}</w:tc></w:tr></w:tbl>{}",
            p("in cell"),
            p("after table"),
        );
        let stream = extract(&body);
        assert_eq!(stream.blocks.len(), 2);
        assert!(stream.blocks[0].is_table());
        assert_eq!(stream.blocks[1].kind, BlockKind::TextLine("after table".to_string()));
    }

    #[test]
    fn test_empty_body_yields_no_sections() {
        let stream = extract("");
        assert!(stream.blocks.is_empty());
        assert_eq!(stream.page_or_section_count, 0);
        assert!(stream.warnings.is_empty());
    }

    #[test]
    fn test_zip_without_document_part_unsupported() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        writer
            .start_file("mimetype", zip::write::SimpleFileOptions::default())
            .unwrap();
        writer.write_all(b"application/epub+zip").unwrap();
        let data = writer.finish().unwrap().into_inner();

        let result = DocxBlockExtractor::new().extract(&data, &ExtractOptions::default());
        assert!(matches!(result, Err(Error::UnsupportedFormat)));
    }

    #[test]
    fn test_truncated_xml_is_a_warning() {
        let mut writer = zip::ZipWriter::new(Cursor::new(Vec::new()));
        let options = zip::write::SimpleFileOptions::default();
        writer.start_file("word/document.xml", options).unwrap();
        writer
            .write_all(b"<w:document><w:body><w:p><w:r><w:t>kept</w:t></w:r></w:p><w:p><w:r")
            .unwrap();
        let data = writer.finish().unwrap().into_inner();

        let stream = DocxBlockExtractor::new()
            .extract(&data, &ExtractOptions::default())
            .unwrap();
        assert_eq!(stream.blocks.len(), 1);
        assert_eq!(stream.warnings.len(), 1);
    }
}

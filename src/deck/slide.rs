/// Slide text scanning and byte-span rewriting.
///
/// A slide part is scanned once into text units: the runs of every shape
/// text body, and the cells of every table. Each run remembers the exact
/// byte span of its `<a:t>` content inside the slide XML, so rewriting a
/// run splices new escaped text into that span and leaves every other byte
/// of the part untouched.
use quick_xml::Reader;
use quick_xml::events::Event;
use smallvec::SmallVec;

use crate::common::error::{Error, Result};
use crate::common::xml::{escape_xml, resolve_entity};

/// Byte range of one `<a:t>` element's content inside the slide XML.
///
/// `empty_tag` marks a self-closing `<a:t/>`; its span covers the whole
/// tag, which is expanded to `<a:t>..</a:t>` when text is written into it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    pub start: usize,
    pub end: usize,
    pub empty_tag: bool,
}

/// One text run: its content span and decoded text.
#[derive(Debug, Clone)]
pub struct RunSpan {
    pub span: Span,
    pub text: String,
}

/// One table cell: its runs plus the cell text as python-pptx renders it,
/// runs concatenated within a paragraph and paragraphs joined with `\n`.
#[derive(Debug, Clone)]
pub struct CellText {
    pub runs: SmallVec<[RunSpan; 4]>,
    pub text: String,
}

/// A visitable unit of slide text.
#[derive(Debug, Clone)]
pub enum TextUnit {
    /// Runs of one shape text body, in document order.
    Body(Vec<RunSpan>),
    /// Cells of one table, row-major.
    Table(Vec<CellText>),
}

/// A replacement to apply to one run span.
#[derive(Debug, Clone)]
pub struct RunEdit {
    pub span: Span,
    pub text: String,
}

/// A scanned slide part.
pub struct SlideXml {
    xml: Vec<u8>,
    units: Vec<TextUnit>,
}

impl SlideXml {
    /// Scan a slide part into its text units.
    ///
    /// Only `<a:t>` inside `<a:r>` participates; field runs (`<a:fld>`)
    /// carry generated text and are skipped. Tables group their cells into
    /// one unit; everything else contributes per-run units through the
    /// enclosing text body.
    pub fn parse(xml: Vec<u8>) -> Result<Self> {
        let units = scan_units(&xml)?;
        Ok(Self { xml, units })
    }

    /// The text units in document order.
    #[inline]
    pub fn units(&self) -> &[TextUnit] {
        &self.units
    }

    /// Apply edits and return the rewritten slide bytes.
    ///
    /// Edits are applied in reverse span order so earlier spans stay valid.
    /// Text is XML-escaped on the way in; bytes outside the edited spans
    /// are preserved exactly.
    pub fn splice(&self, mut edits: Vec<RunEdit>) -> Vec<u8> {
        edits.sort_by(|a, b| b.span.start.cmp(&a.span.start));
        let mut out = self.xml.clone();
        for edit in edits {
            let escaped = escape_xml(&edit.text);
            let replacement = if edit.span.empty_tag {
                if edit.text.is_empty() {
                    continue;
                }
                format!("<a:t>{escaped}</a:t>").into_bytes()
            } else {
                escaped.into_bytes()
            };
            out.splice(edit.span.start..edit.span.end, replacement);
        }
        out
    }
}

/// Streaming scan state for one slide part.
struct Scanner {
    units: Vec<TextUnit>,
    body_runs: Option<Vec<RunSpan>>,
    table_depth: usize,
    table_cells: Option<Vec<CellText>>,
    cell_runs: SmallVec<[RunSpan; 4]>,
    cell_paragraphs: Vec<String>,
    current_paragraph: String,
    in_run: bool,
    field_depth: usize,
    capture: Option<Capture>,
}

struct Capture {
    start: usize,
    text: String,
}

impl Scanner {
    fn new() -> Self {
        Self {
            units: Vec::new(),
            body_runs: None,
            table_depth: 0,
            table_cells: None,
            cell_runs: SmallVec::new(),
            cell_paragraphs: Vec::new(),
            current_paragraph: String::new(),
            in_run: false,
            field_depth: 0,
            capture: None,
        }
    }

    fn open(&mut self, name: &[u8]) {
        match name {
            b"txBody" if self.table_depth == 0 => self.body_runs = Some(Vec::new()),
            b"tbl" => {
                self.table_depth += 1;
                if self.table_depth == 1 {
                    self.table_cells = Some(Vec::new());
                }
            }
            b"tc" if self.table_depth > 0 => {
                self.cell_runs = SmallVec::new();
                self.cell_paragraphs = Vec::new();
                self.current_paragraph = String::new();
            }
            b"r" => self.in_run = true,
            b"fld" => self.field_depth += 1,
            _ => {}
        }
    }

    fn close(&mut self, name: &[u8]) {
        match name {
            b"txBody" if self.table_depth == 0 => {
                if let Some(runs) = self.body_runs.take() {
                    if !runs.is_empty() {
                        self.units.push(TextUnit::Body(runs));
                    }
                }
            }
            b"tbl" => {
                self.table_depth = self.table_depth.saturating_sub(1);
                if self.table_depth == 0 {
                    if let Some(cells) = self.table_cells.take() {
                        self.units.push(TextUnit::Table(cells));
                    }
                }
            }
            b"p" if self.table_depth > 0 => {
                let paragraph = std::mem::take(&mut self.current_paragraph);
                self.cell_paragraphs.push(paragraph);
            }
            b"tc" if self.table_depth > 0 => {
                let runs = std::mem::take(&mut self.cell_runs);
                let text = self.cell_paragraphs.join("\n");
                self.cell_paragraphs.clear();
                if let Some(cells) = self.table_cells.as_mut() {
                    cells.push(CellText { runs, text });
                }
            }
            b"r" => self.in_run = false,
            b"fld" => self.field_depth = self.field_depth.saturating_sub(1),
            _ => {}
        }
    }

    fn run_text_allowed(&self) -> bool {
        self.in_run && self.field_depth == 0
    }

    fn finish_run(&mut self, span: Span, text: String) {
        if self.table_depth > 0 {
            self.current_paragraph.push_str(&text);
            self.cell_runs.push(RunSpan { span, text });
        } else if let Some(runs) = self.body_runs.as_mut() {
            runs.push(RunSpan { span, text });
        }
    }
}

fn scan_units(xml: &[u8]) -> Result<Vec<TextUnit>> {
    let mut reader = Reader::from_reader(xml);
    let mut buf = Vec::new();
    let mut scanner = Scanner::new();
    let mut last_pos = reader.buffer_position() as usize;

    loop {
        let event = reader.read_event_into(&mut buf);
        let pos = reader.buffer_position() as usize;
        match event {
            Ok(Event::Start(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"t" && scanner.run_text_allowed() {
                    scanner.capture = Some(Capture {
                        start: pos,
                        text: String::new(),
                    });
                } else {
                    scanner.open(name.as_ref());
                }
            }
            Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"t" && scanner.run_text_allowed() {
                    let span = Span {
                        start: last_pos,
                        end: pos,
                        empty_tag: true,
                    };
                    scanner.finish_run(span, String::new());
                }
            }
            Ok(Event::End(e)) => {
                let name = e.local_name();
                if name.as_ref() == b"t" {
                    if let Some(capture) = scanner.capture.take() {
                        let span = Span {
                            start: capture.start,
                            end: last_pos,
                            empty_tag: false,
                        };
                        scanner.finish_run(span, capture.text);
                    }
                } else {
                    scanner.close(name.as_ref());
                }
            }
            Ok(Event::Text(e)) => {
                if let Some(capture) = scanner.capture.as_mut() {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| Error::TemplateLoad(format!("invalid slide text: {e}")))?;
                    capture.text.push_str(text);
                }
            }
            Ok(Event::CData(e)) => {
                if let Some(capture) = scanner.capture.as_mut() {
                    let text = std::str::from_utf8(&e)
                        .map_err(|e| Error::TemplateLoad(format!("invalid slide text: {e}")))?;
                    capture.text.push_str(text);
                }
            }
            Ok(Event::GeneralRef(e)) => {
                if let Some(capture) = scanner.capture.as_mut() {
                    let name = std::str::from_utf8(&e)
                        .map_err(|e| Error::TemplateLoad(format!("invalid slide text: {e}")))?;
                    match resolve_entity(name) {
                        Some(resolved) => capture.text.push_str(&resolved),
                        None => {
                            capture.text.push('&');
                            capture.text.push_str(name);
                            capture.text.push(';');
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::TemplateLoad(format!("invalid slide XML: {e}"))),
            _ => {}
        }
        last_pos = pos;
        buf.clear();
    }

    Ok(scanner.units)
}

#[cfg(test)]
mod tests {
    use super::*;

    const NS: &str = r#"xmlns:a="http://schemas.openxmlformats.org/drawingml/2006/main" xmlns:p="http://schemas.openxmlformats.org/presentationml/2006/main""#;

    fn slide_with(body: &str) -> Vec<u8> {
        format!(
            "<p:sld {NS}><p:cSld><p:spTree>{body}</p:spTree></p:cSld></p:sld>"
        )
        .into_bytes()
    }

    fn body_runs(slide: &SlideXml) -> &[RunSpan] {
        match &slide.units()[0] {
            TextUnit::Body(runs) => runs,
            other => panic!("expected body unit, got {other:?}"),
        }
    }

    #[test]
    fn test_scan_single_run() {
        let xml = slide_with(
            "<p:sp><p:txBody><a:p><a:r><a:t>Hello {{PROJECT_NAME}}</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = SlideXml::parse(xml).unwrap();
        assert_eq!(slide.units().len(), 1);
        let runs = body_runs(&slide);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "Hello {{PROJECT_NAME}}");
    }

    #[test]
    fn test_scan_decodes_entities() {
        let xml = slide_with(
            "<p:sp><p:txBody><a:p><a:r><a:t>A &amp; B &#x21;</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = SlideXml::parse(xml).unwrap();
        assert_eq!(body_runs(&slide)[0].text, "A & B !");
    }

    #[test]
    fn test_field_runs_are_skipped() {
        let xml = slide_with(
            "<p:sp><p:txBody><a:p>\
             <a:fld id=\"{1234}\" type=\"slidenum\"><a:t>7</a:t></a:fld>\
             <a:r><a:t>kept</a:t></a:r>\
             </a:p></p:txBody></p:sp>",
        );
        let slide = SlideXml::parse(xml).unwrap();
        let runs = body_runs(&slide);
        assert_eq!(runs.len(), 1);
        assert_eq!(runs[0].text, "kept");
    }

    #[test]
    fn test_splice_rewrites_only_the_span() {
        let xml = slide_with(
            "<p:sp><p:txBody><a:p><a:r><a:rPr lang=\"en-US\" b=\"1\"/><a:t>{{CLIENT}}</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = SlideXml::parse(xml.clone()).unwrap();
        let run = body_runs(&slide)[0].clone();
        let out = slide.splice(vec![RunEdit {
            span: run.span,
            text: "Tom & Jerry".into(),
        }]);
        let out_str = String::from_utf8(out).unwrap();
        assert!(out_str.contains("<a:t>Tom &amp; Jerry</a:t>"));
        assert!(out_str.contains("<a:rPr lang=\"en-US\" b=\"1\"/>"));
        // Everything before the span is untouched
        let xml_str = String::from_utf8(xml).unwrap();
        assert_eq!(
            &out_str[..run.span.start],
            &xml_str[..run.span.start]
        );
    }

    #[test]
    fn test_splice_expands_empty_tag() {
        let xml = slide_with(
            "<p:sp><p:txBody><a:p><a:r><a:t/></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = SlideXml::parse(xml).unwrap();
        let run = body_runs(&slide)[0].clone();
        assert!(run.span.empty_tag);
        let out = slide.splice(vec![RunEdit {
            span: run.span,
            text: "filled".into(),
        }]);
        assert!(String::from_utf8(out).unwrap().contains("<a:t>filled</a:t>"));
    }

    #[test]
    fn test_splice_without_edits_is_identity() {
        let xml = slide_with(
            "<p:sp><p:txBody><a:p><a:r><a:t>unchanged</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = SlideXml::parse(xml.clone()).unwrap();
        assert_eq!(slide.splice(Vec::new()), xml);
    }

    #[test]
    fn test_table_cells_are_row_major_and_joined() {
        let xml = slide_with(
            "<p:graphicFrame><a:graphic><a:graphicData>\
             <a:tbl>\
             <a:tr>\
             <a:tc><a:txBody><a:p><a:r><a:t>{{PRO</a:t></a:r><a:r><a:t>JECT_NAME}}</a:t></a:r></a:p></a:txBody></a:tc>\
             <a:tc><a:txBody><a:p><a:r><a:t>first</a:t></a:r></a:p><a:p><a:r><a:t>second</a:t></a:r></a:p></a:txBody></a:tc>\
             </a:tr>\
             </a:tbl>\
             </a:graphicData></a:graphic></p:graphicFrame>",
        );
        let slide = SlideXml::parse(xml).unwrap();
        assert_eq!(slide.units().len(), 1);
        let cells = match &slide.units()[0] {
            TextUnit::Table(cells) => cells,
            other => panic!("expected table unit, got {other:?}"),
        };
        assert_eq!(cells.len(), 2);
        assert_eq!(cells[0].text, "{{PROJECT_NAME}}");
        assert_eq!(cells[0].runs.len(), 2);
        assert_eq!(cells[1].text, "first\nsecond");
    }

    #[test]
    fn test_body_inside_table_is_not_a_body_unit() {
        let xml = slide_with(
            "<p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tr>\
             <a:tc><a:txBody><a:p><a:r><a:t>cell</a:t></a:r></a:p></a:txBody></a:tc>\
             </a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>\
             <p:sp><p:txBody><a:p><a:r><a:t>shape</a:t></a:r></a:p></p:txBody></p:sp>",
        );
        let slide = SlideXml::parse(xml).unwrap();
        assert_eq!(slide.units().len(), 2);
        assert!(matches!(slide.units()[0], TextUnit::Table(_)));
        assert!(matches!(slide.units()[1], TextUnit::Body(_)));
    }
}

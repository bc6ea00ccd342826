/// Visitor-driven traversal of a package's slide text.
use std::collections::BTreeMap;

use tracing::debug;

use crate::common::error::Result;
use crate::deck::package::DeckPackage;
use crate::deck::slide::{RunEdit, SlideXml, TextUnit};

/// Receives each text unit of a walked package and decides its new text.
///
/// A unit is either one run of a shape text body or the whole text of a
/// table cell. Returning `None` leaves the unit unchanged; returning the
/// same string is treated the same as `None`.
pub trait TextUnitVisitor {
    fn visit_text_unit(&mut self, text: &str) -> Option<String>;
}

/// Walk every slide of `package` in presentation order and collect the
/// rewritten slide parts.
///
/// Shape text bodies are visited run by run. Table cells are visited
/// atomically: the visitor sees the full cell text, and a changed cell is
/// written back into the cell's first run while the remaining non-empty
/// runs are cleared. Slides whose text is untouched are absent from the
/// result, so an empty map means the output equals the input.
pub fn walk<V: TextUnitVisitor>(
    package: &DeckPackage,
    visitor: &mut V,
) -> Result<BTreeMap<String, Vec<u8>>> {
    let mut replaced = BTreeMap::new();

    for part_name in package.slide_parts() {
        let xml = package.part_bytes(part_name)?;
        let slide = SlideXml::parse(xml)?;
        let mut edits = Vec::new();

        for unit in slide.units() {
            match unit {
                TextUnit::Body(runs) => {
                    for run in runs {
                        if let Some(new_text) = visitor.visit_text_unit(&run.text) {
                            if new_text != run.text {
                                edits.push(RunEdit {
                                    span: run.span,
                                    text: new_text,
                                });
                            }
                        }
                    }
                }
                TextUnit::Table(cells) => {
                    for cell in cells {
                        let Some(new_text) = visitor.visit_text_unit(&cell.text) else {
                            continue;
                        };
                        if new_text == cell.text {
                            continue;
                        }
                        let mut runs = cell.runs.iter();
                        let Some(first) = runs.next() else {
                            continue;
                        };
                        edits.push(RunEdit {
                            span: first.span,
                            text: new_text,
                        });
                        for run in runs {
                            if !run.text.is_empty() {
                                edits.push(RunEdit {
                                    span: run.span,
                                    text: String::new(),
                                });
                            }
                        }
                    }
                }
            }
        }

        if !edits.is_empty() {
            debug!(part = %part_name, edits = edits.len(), "slide rewritten");
            replaced.insert(part_name.clone(), slide.splice(edits));
        }
    }

    Ok(replaced)
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Upper-cases every unit containing a marker, for traversal tests.
    struct UpcaseMarked;

    impl TextUnitVisitor for UpcaseMarked {
        fn visit_text_unit(&mut self, text: &str) -> Option<String> {
            text.contains('!').then(|| text.to_uppercase())
        }
    }

    #[test]
    fn test_cell_rewrite_lands_in_first_run() {
        let xml = format!(
            "<p:sld xmlns:a=\"a\" xmlns:p=\"p\"><p:cSld><p:spTree>\
             <p:graphicFrame><a:graphic><a:graphicData><a:tbl><a:tr>\
             <a:tc><a:txBody><a:p><a:r><a:t>he!</a:t></a:r><a:r><a:t>llo</a:t></a:r></a:p></a:txBody></a:tc>\
             </a:tr></a:tbl></a:graphicData></a:graphic></p:graphicFrame>\
             </p:spTree></p:cSld></p:sld>"
        )
        .into_bytes();
        let slide = SlideXml::parse(xml).unwrap();

        let mut edits = Vec::new();
        let mut visitor = UpcaseMarked;
        for unit in slide.units() {
            if let TextUnit::Table(cells) = unit {
                for cell in cells {
                    if let Some(new_text) = visitor.visit_text_unit(&cell.text) {
                        let mut runs = cell.runs.iter();
                        let first = runs.next().unwrap();
                        edits.push(RunEdit {
                            span: first.span,
                            text: new_text,
                        });
                        for run in runs {
                            edits.push(RunEdit {
                                span: run.span,
                                text: String::new(),
                            });
                        }
                    }
                }
            }
        }
        let out = String::from_utf8(slide.splice(edits)).unwrap();
        assert!(out.contains("<a:t>HE!LLO</a:t>"));
        assert!(out.contains("<a:t></a:t>"));
    }
}

/// Package access for presentation templates.
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Write};
use std::path::Path;

use quick_xml::Reader;
use quick_xml::events::Event;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipArchive, ZipWriter};

use crate::common::error::{Error, Result};

/// Content type of the main presentation part.
pub const PRESENTATION_MAIN: &str =
    "application/vnd.openxmlformats-officedocument.presentationml.presentation.main+xml";
/// Content type of the main part of a macro-enabled presentation.
pub const PRESENTATION_MACRO_MAIN: &str =
    "application/vnd.ms-powerpoint.presentation.macroEnabled.main+xml";

const CONTENT_TYPES_PART: &str = "[Content_Types].xml";
const PRESENTATION_PART: &str = "ppt/presentation.xml";
const PRESENTATION_RELS_PART: &str = "ppt/_rels/presentation.xml.rels";
const SLIDE_REL_TYPE: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships/slide";

/// A presentation (.pptx) package held in memory.
///
/// This is the entry point for working with deck templates. Opening a
/// package verifies the declared content type and resolves the slide parts
/// in presentation order; the raw bytes stay untouched so a rewrite can
/// copy every unchanged entry verbatim.
///
/// # Examples
///
/// ```rust,no_run
/// use casedeck::deck::DeckPackage;
///
/// let pkg = DeckPackage::open("template.pptx")?;
/// println!("Template has {} slides", pkg.slide_parts().len());
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
pub struct DeckPackage {
    /// The original package bytes
    data: Vec<u8>,
    /// Slide part names in presentation order
    slide_parts: Vec<String>,
}

impl DeckPackage {
    /// Open a package from a file path.
    pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
        let data = std::fs::read(path)
            .map_err(|e| Error::TemplateLoad(format!("read template file: {e}")))?;
        Self::from_bytes(data)
    }

    /// Open a package from bytes already in memory.
    ///
    /// Verifies that the archive declares a presentation main part (regular
    /// or macro-enabled) and that every slide referenced by the slide id
    /// list resolves to an existing part.
    pub fn from_bytes(data: Vec<u8>) -> Result<Self> {
        let mut archive = ZipArchive::new(Cursor::new(data.as_slice()))
            .map_err(|e| Error::TemplateLoad(format!("not a ZIP package: {e}")))?;

        let content_types = read_entry(&mut archive, CONTENT_TYPES_PART)?;
        verify_presentation_content_type(&content_types)?;

        let presentation = read_entry(&mut archive, PRESENTATION_PART)?;
        let rel_ids = slide_rel_ids(&presentation)?;

        let rels = read_entry(&mut archive, PRESENTATION_RELS_PART)?;
        let targets = slide_rel_targets(&rels)?;

        let mut slide_parts = Vec::with_capacity(rel_ids.len());
        for rel_id in &rel_ids {
            let target = targets.get(rel_id).ok_or_else(|| {
                Error::TemplateLoad(format!("unresolved slide relationship: {rel_id}"))
            })?;
            let part_name = resolve_target(target);
            if archive.by_name(&part_name).is_err() {
                return Err(Error::TemplateLoad(format!(
                    "missing slide part: {part_name}"
                )));
            }
            slide_parts.push(part_name);
        }

        Ok(Self { data, slide_parts })
    }

    /// Slide part names in presentation order.
    #[inline]
    pub fn slide_parts(&self) -> &[String] {
        &self.slide_parts
    }

    /// The raw package bytes.
    #[inline]
    pub fn as_bytes(&self) -> &[u8] {
        &self.data
    }

    /// Read the bytes of a single package part.
    pub fn part_bytes(&self, name: &str) -> Result<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(self.data.as_slice()))
            .map_err(|e| Error::TemplateLoad(format!("not a ZIP package: {e}")))?;
        read_entry(&mut archive, name)
    }

    /// Serialize a copy of the package with the given parts replaced.
    ///
    /// Entries not named in `replaced` are raw-copied without
    /// recompression, so they stay byte-identical to the original.
    pub fn rewrite(&self, replaced: &BTreeMap<String, Vec<u8>>) -> Result<Vec<u8>> {
        let mut archive = ZipArchive::new(Cursor::new(self.data.as_slice()))
            .map_err(|e| Error::ExportWrite(format!("reopen package: {e}")))?;
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);

        for index in 0..archive.len() {
            let entry = archive
                .by_index_raw(index)
                .map_err(|e| Error::ExportWrite(format!("read package entry {index}: {e}")))?;
            match replaced.get(entry.name()) {
                Some(bytes) => {
                    let name = entry.name().to_owned();
                    drop(entry);
                    writer
                        .start_file(name, options)
                        .map_err(|e| Error::ExportWrite(format!("write package entry: {e}")))?;
                    writer
                        .write_all(bytes)
                        .map_err(|e| Error::ExportWrite(format!("write package entry: {e}")))?;
                }
                None => {
                    writer
                        .raw_copy_file(entry)
                        .map_err(|e| Error::ExportWrite(format!("copy package entry: {e}")))?;
                }
            }
        }

        let cursor = writer
            .finish()
            .map_err(|e| Error::ExportWrite(format!("finish package: {e}")))?;
        Ok(cursor.into_inner())
    }
}

fn read_entry<R: Read + std::io::Seek>(archive: &mut ZipArchive<R>, name: &str) -> Result<Vec<u8>> {
    let mut entry = archive
        .by_name(name)
        .map_err(|e| Error::TemplateLoad(format!("missing package part {name}: {e}")))?;
    let mut bytes = Vec::with_capacity(entry.size() as usize);
    entry
        .read_to_end(&mut bytes)
        .map_err(|e| Error::TemplateLoad(format!("corrupt package part {name}: {e}")))?;
    Ok(bytes)
}

/// Check the content type declared for `/ppt/presentation.xml`.
fn verify_presentation_content_type(xml: &[u8]) -> Result<()> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut declared: Option<String> = None;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Override" {
                    let mut part_name = None;
                    let mut content_type = None;
                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map_err(|e| Error::TemplateLoad(format!("invalid content types: {e}")))?
                            .into_owned();
                        match attr.key.as_ref() {
                            b"PartName" => part_name = Some(value),
                            b"ContentType" => content_type = Some(value),
                            _ => {}
                        }
                    }
                    if part_name.as_deref() == Some("/ppt/presentation.xml") {
                        declared = content_type;
                        break;
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::TemplateLoad(format!("invalid content types: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    match declared {
        Some(ct) if ct == PRESENTATION_MAIN || ct == PRESENTATION_MACRO_MAIN => Ok(()),
        Some(ct) => Err(Error::TemplateLoad(format!(
            "invalid presentation content type: {ct}"
        ))),
        None => Err(Error::TemplateLoad(
            "package declares no presentation part".into(),
        )),
    }
}

/// Relationship ids of the `<p:sldId>` entries, in document order.
fn slide_rel_ids(xml: &[u8]) -> Result<Vec<String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut ids = Vec::new();
    let mut in_list = false;

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"sldIdLst" {
                    in_list = true;
                } else if in_list && e.local_name().as_ref() == b"sldId" {
                    for attr in e.attributes().flatten() {
                        if attr.key.as_ref() == b"r:id" {
                            let value = attr
                                .unescape_value()
                                .map_err(|e| Error::TemplateLoad(format!("invalid presentation part: {e}")))?;
                            ids.push(value.into_owned());
                        }
                    }
                }
            }
            Ok(Event::End(e)) if e.local_name().as_ref() == b"sldIdLst" => break,
            Ok(Event::Eof) => break,
            Err(e) => {
                return Err(Error::TemplateLoad(format!("invalid presentation part: {e}")));
            }
            _ => {}
        }
        buf.clear();
    }

    Ok(ids)
}

/// Map of relationship id to target for slide relationships.
fn slide_rel_targets(xml: &[u8]) -> Result<BTreeMap<String, String>> {
    let mut reader = Reader::from_reader(xml);
    reader.config_mut().trim_text(true);

    let mut buf = Vec::new();
    let mut targets = BTreeMap::new();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) | Ok(Event::Empty(e)) => {
                if e.local_name().as_ref() == b"Relationship" {
                    let mut id = None;
                    let mut rel_type = None;
                    let mut target = None;
                    for attr in e.attributes().flatten() {
                        let value = attr
                            .unescape_value()
                            .map_err(|e| Error::TemplateLoad(format!("invalid relationships: {e}")))?
                            .into_owned();
                        match attr.key.as_ref() {
                            b"Id" => id = Some(value),
                            b"Type" => rel_type = Some(value),
                            b"Target" => target = Some(value),
                            _ => {}
                        }
                    }
                    if rel_type.as_deref() == Some(SLIDE_REL_TYPE) {
                        if let (Some(id), Some(target)) = (id, target) {
                            targets.insert(id, target);
                        }
                    }
                }
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::TemplateLoad(format!("invalid relationships: {e}"))),
            _ => {}
        }
        buf.clear();
    }

    Ok(targets)
}

/// Resolve a relationship target relative to `ppt/` into a part name.
///
/// Absolute targets (leading `/`) name the part directly; relative targets
/// may climb with `..` segments.
fn resolve_target(target: &str) -> String {
    if let Some(absolute) = target.strip_prefix('/') {
        return absolute.to_string();
    }
    let mut segments: Vec<&str> = vec!["ppt"];
    for segment in target.split('/') {
        match segment {
            "" | "." => {}
            ".." => {
                segments.pop();
            }
            other => segments.push(other),
        }
    }
    segments.join("/")
}

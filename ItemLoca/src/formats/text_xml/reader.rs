//! Text XML reader

use std::borrow::Cow;
use std::fs;
use std::path::Path;

use encoding_rs::{Encoding, UTF_8, UTF_16BE, UTF_16LE};
use quick_xml::Reader;
use quick_xml::events::{BytesStart, Event};

use super::{
    ENTRY_ELEMENT, KEY_ATTRIBUTE, LocalizationDocument, VALUE_ATTRIBUTE, VALUE_CHILD_INDEX,
};
use crate::error::{Error, Result};

/// An `entry` element whose children are still being read
struct PendingEntry {
    /// Position among all entries in document order
    order: usize,
    key: Option<String>,
    /// Nesting level of the entry element itself (root = 1)
    level: usize,
    /// Direct child elements seen so far
    children: usize,
    value: Option<String>,
}

/// Entries of one document, in the order they are read
#[derive(Default)]
struct EntryStack {
    open: Vec<PendingEntry>,
    closed: Vec<PendingEntry>,
    opened: usize,
}

/// Read and parse a localization document from disk.
///
/// Any failure (missing file, undecodable bytes, malformed XML) is reported
/// as [`Error::LocalizationLoad`] carrying the offending path.
///
/// # Errors
/// Returns an error if the file cannot be read or is not a well-formed
/// document.
pub fn read_localization<P: AsRef<Path>>(path: P) -> Result<LocalizationDocument> {
    let path = path.as_ref();

    let load = || -> Result<LocalizationDocument> {
        let bytes = fs::read(path)?;
        parse_localization_bytes(&bytes)
    };

    let mut document = load().map_err(|source| Error::LocalizationLoad {
        path: path.to_path_buf(),
        source: Box::new(source),
    })?;
    document.set_source(path);

    tracing::debug!(
        "Loaded {} localization entries from {} ({} skipped)",
        document.len(),
        path.display(),
        document.skipped()
    );
    Ok(document)
}

/// Parse a localization document from raw file bytes.
///
/// The encoding comes from a byte order mark, then from the XML
/// declaration, and defaults to UTF-8.
///
/// # Errors
/// Returns an error if the bytes are not valid in the detected encoding or
/// the decoded text is not a well-formed document.
pub fn parse_localization_bytes(bytes: &[u8]) -> Result<LocalizationDocument> {
    let content = decode_document(bytes)?;
    parse_localization_str(&content)
}

fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>> {
    let (encoding, bom_length) = Encoding::for_bom(bytes)
        .unwrap_or_else(|| (declared_encoding(bytes).unwrap_or(UTF_8), 0));

    let (content, malformed) = encoding.decode_without_bom_handling(&bytes[bom_length..]);
    if malformed {
        return Err(Error::InvalidDocument(format!(
            "content is not valid {}",
            encoding.name()
        )));
    }
    if encoding != UTF_8 {
        tracing::debug!("Decoded localization document from {}", encoding.name());
    }
    Ok(content)
}

/// Encoding named by the XML declaration of a document without a BOM
fn declared_encoding(bytes: &[u8]) -> Option<&'static Encoding> {
    if bytes.starts_with(b"<\0?\0") {
        return Some(UTF_16LE);
    }
    if bytes.starts_with(b"\0<\0?") {
        return Some(UTF_16BE);
    }

    let declaration = bytes.strip_prefix(b"<?xml")?;
    let end = declaration.windows(2).position(|w| w == b"?>")?;
    let declaration = std::str::from_utf8(&declaration[..end]).ok()?;

    let (_, rest) = declaration.split_once("encoding")?;
    let rest = rest.trim_start().strip_prefix('=')?.trim_start();
    let quote = rest.chars().next().filter(|c| *c == '"' || *c == '\'')?;
    let label = rest[1..].split(quote).next()?;

    // A UTF-16 label on ASCII bytes is a stale declaration
    Encoding::for_label(label.as_bytes()).filter(|encoding| encoding.is_ascii_compatible())
}

/// Parse a localization document from an XML string.
///
/// Every `entry` element is indexed, at any depth, including entries nested
/// inside other entries.
///
/// # Errors
/// Returns an error if the XML is malformed, has no root element, has
/// content after the root element, or ends with unclosed elements.
pub fn parse_localization_str(content: &str) -> Result<LocalizationDocument> {
    let content = content.strip_prefix('\u{feff}').unwrap_or(content);
    let mut reader = Reader::from_str(content);
    reader.trim_text(true);

    let mut buf = Vec::new();
    let mut depth = 0usize;
    let mut saw_root = false;
    let mut entries = EntryStack::default();

    loop {
        match reader.read_event_into(&mut buf) {
            Ok(Event::Start(e)) => {
                check_single_root(depth, saw_root)?;
                depth += 1;
                saw_root = true;
                entries.open_element(&e, depth)?;
            }
            Ok(Event::Empty(e)) => {
                // <child value="..."/> opens and closes on the same level
                check_single_root(depth, saw_root)?;
                saw_root = true;
                entries.open_element(&e, depth + 1)?;
                entries.close_element(depth + 1);
            }
            Ok(Event::End(_)) => {
                entries.close_element(depth);
                depth = depth.saturating_sub(1);
            }
            Ok(Event::Text(text))
                if depth == 0 && !text.iter().all(u8::is_ascii_whitespace) =>
            {
                return Err(Error::InvalidDocument(
                    "text outside the root element".to_string(),
                ));
            }
            Ok(Event::Eof) => break,
            Err(e) => return Err(Error::XmlError(e)),
            _ => {}
        }
        buf.clear();
    }

    if !saw_root {
        return Err(Error::InvalidDocument("no root element".to_string()));
    }
    if depth != 0 {
        return Err(Error::InvalidDocument(format!(
            "unexpected end of document with {depth} unclosed element(s)"
        )));
    }

    Ok(entries.into_document())
}

fn check_single_root(depth: usize, saw_root: bool) -> Result<()> {
    if depth == 0 && saw_root {
        return Err(Error::InvalidDocument(
            "junk after document element".to_string(),
        ));
    }
    Ok(())
}

impl EntryStack {
    fn open_element(&mut self, element: &BytesStart<'_>, level: usize) -> Result<()> {
        if let Some(parent) = self.open.last_mut() {
            if level == parent.level + 1 {
                if parent.children == VALUE_CHILD_INDEX {
                    parent.value = attribute_value(element, VALUE_ATTRIBUTE)?;
                }
                parent.children += 1;
            }
        }

        if element.name().as_ref() == ENTRY_ELEMENT {
            self.open.push(PendingEntry {
                order: self.opened,
                key: attribute_value(element, KEY_ATTRIBUTE)?,
                level,
                children: 0,
                value: None,
            });
            self.opened += 1;
        }
        Ok(())
    }

    fn close_element(&mut self, level: usize) {
        if self.open.last().is_some_and(|entry| entry.level == level) {
            self.closed.extend(self.open.pop());
        }
    }

    /// Inner entries close before their parent; index in opening order.
    fn into_document(mut self) -> LocalizationDocument {
        self.closed.sort_by_key(|entry| entry.order);

        let mut document = LocalizationDocument::new();
        for entry in self.closed {
            finish_entry(entry, &mut document);
        }
        document
    }
}

fn finish_entry(entry: PendingEntry, document: &mut LocalizationDocument) {
    match (entry.key, entry.value) {
        (Some(key), Some(value)) => {
            if !document.insert_first(key.clone(), value) {
                tracing::debug!("Duplicate localization key {key}, keeping first occurrence");
                document.mark_skipped();
            }
        }
        (Some(key), None) => {
            tracing::warn!(
                "Localization entry {key} has no value on child #{} ({} children), skipping",
                VALUE_CHILD_INDEX + 1,
                entry.children
            );
            document.mark_skipped();
        }
        (None, _) => {
            tracing::warn!("Localization entry without a key attribute, skipping");
            document.mark_skipped();
        }
    }
}

fn attribute_value(element: &BytesStart<'_>, name: &[u8]) -> Result<Option<String>> {
    for attr in element.attributes() {
        let attr = attr?;
        if attr.key.as_ref() == name {
            return Ok(Some(attr.unescape_value()?.into_owned()));
        }
    }
    Ok(None)
}

//! Project file parsing.
//!
//! A project file is a gzip-compressed XML document. The parser walks every
//! element of the document in order, collecting plugin references from three
//! kinds of evidence:
//!
//! - library paths (`*.dll`) appearing in element text or attribute values;
//! - `BrowserContentPath` values of the shape
//!   `query:Plugins#VST:<manufacturer>:<plugin>`;
//! - plugin descriptor elements (`PluginDesc`, `VstPluginInfo`,
//!   `Vst3PluginInfo`) carrying a `Name` attribute or short child text.
//!
//! No schema is assumed. Anything that fails here is reported as a
//! [`ParseError`] so the caller can drop the file and keep scanning.

use std::collections::HashMap;
use std::fs::File;
use std::io::{BufReader, Read};
use std::path::Path;

use flate2::read::GzDecoder;
use quick_xml::events::{BytesStart, Event};
use quick_xml::Reader;

use crate::resolve;

/// Substring that marks a value as a plugin library reference.
const PLUGIN_LIBRARY_MARKER: &str = ".dll";

/// Element tags that describe a plugin device directly.
const DESCRIPTOR_TAGS: &[&str] = &["VstPluginInfo", "Vst3PluginInfo", "PluginDesc"];

/// Browser content paths carrying this marker encode a manufacturer.
const BROWSER_VST_MARKER: &str = "Plugins#VST";

/// Child text longer than this is never treated as a plugin name.
const MAX_NAME_TEXT_LEN: usize = 100;

#[derive(Debug, thiserror::Error)]
pub enum ParseError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("invalid project xml: {0}")]
    Xml(#[from] quick_xml::Error),
}

/// Plugin evidence extracted from a single project file.
#[derive(Debug, Default)]
pub struct ParsedProject {
    /// Deduplicated plugin references, in discovery order.
    pub plugins: Vec<String>,
    /// File-local manufacturer evidence keyed by reference. Path-derived
    /// entries are first-match-wins; browser-path evidence overwrites them.
    pub path_manufacturers: HashMap<String, String>,
}

impl ParsedProject {
    /// Appends a reference unless it is empty or already known.
    fn push_reference(&mut self, name: &str) -> bool {
        if name.is_empty() || self.plugins.iter().any(|p| p == name) {
            return false;
        }
        self.plugins.push(name.to_string());
        true
    }

    /// Records a library path: the base filename becomes a reference and the
    /// directory part is mined for a manufacturer. Only the first sighting
    /// of a reference contributes evidence.
    fn record_library_path(&mut self, raw: &str) {
        let dll_path = raw.trim();
        let dll_name = basename(dll_path);
        if !self.push_reference(dll_name) {
            return;
        }
        if let Some(manufacturer) = resolve::manufacturer_from_path(dll_path) {
            self.path_manufacturers
                .entry(dll_name.to_string())
                .or_insert(manufacturer);
        }
    }

    /// Applies a `query:Plugins#VST:<manufacturer>:<plugin>` browser path.
    /// `%20` stands for a literal space in both decoded fields. Every
    /// already-discovered reference matching the plugin name as a
    /// case-insensitive substring (either direction) is re-attributed to the
    /// decoded manufacturer, overwriting path-derived evidence.
    fn apply_browser_path(&mut self, browser_path: &str) {
        if !browser_path.contains(BROWSER_VST_MARKER) || !browser_path.contains(':') {
            return;
        }
        let fields: Vec<&str> = browser_path.split(':').collect();
        if fields.len() < 4 {
            return;
        }
        let manufacturer = fields[2].replace("%20", " ");
        let plugin_name = fields[3].replace("%20", " ");
        let needle = plugin_name.to_lowercase();

        for reference in &self.plugins {
            let existing = reference.to_lowercase();
            if existing.contains(&needle) || needle.contains(&existing) {
                self.path_manufacturers
                    .insert(reference.clone(), manufacturer.clone());
            }
        }
    }
}

/// Decompresses and parses one project file.
///
/// Malformed UTF-8 in the payload is replaced rather than rejected; bad gzip
/// framing or broken XML surfaces as an error for the caller to log.
pub fn parse_project_file(path: &Path) -> Result<ParsedProject, ParseError> {
    let file = File::open(path)?;
    let mut decoder = GzDecoder::new(BufReader::new(file));
    let mut raw = Vec::new();
    decoder.read_to_end(&mut raw)?;
    let content = String::from_utf8_lossy(&raw);
    parse_project_xml(&content)
}

/// Walks the document events, tracking the open-element stack so text nodes
/// can be attributed to their element and parent.
pub(crate) fn parse_project_xml(content: &str) -> Result<ParsedProject, ParseError> {
    let mut reader = Reader::from_str(content);
    let mut parsed = ParsedProject::default();
    let mut stack: Vec<String> = Vec::new();

    loop {
        match reader.read_event()? {
            Event::Start(start) => {
                let tag = tag_name(&start);
                scan_element_attributes(&start, &tag, &mut parsed)?;
                stack.push(tag);
            }
            Event::Empty(start) => {
                let tag = tag_name(&start);
                scan_element_attributes(&start, &tag, &mut parsed)?;
            }
            Event::End(_) => {
                stack.pop();
            }
            Event::Text(text) => {
                let text = text.unescape()?;
                scan_element_text(&text, &stack, &mut parsed);
            }
            Event::CData(data) => {
                let text = String::from_utf8_lossy(&data.into_inner()).into_owned();
                scan_element_text(&text, &stack, &mut parsed);
            }
            Event::Eof => break,
            _ => {}
        }
    }

    Ok(parsed)
}

fn scan_element_attributes(
    start: &BytesStart,
    tag: &str,
    parsed: &mut ParsedProject,
) -> Result<(), ParseError> {
    let mut name_attr: Option<String> = None;

    for attr in start.attributes() {
        let attr = attr.map_err(quick_xml::Error::InvalidAttr)?;
        let value = attr.unescape_value()?;
        if contains_library_marker(&value) {
            parsed.record_library_path(&value);
        }
        if attr.key.local_name().as_ref() == b"Name" {
            name_attr = Some(value.into_owned());
        }
    }

    if DESCRIPTOR_TAGS.contains(&tag) {
        if let Some(name) = name_attr {
            if !ends_with_library_ext(&name) {
                parsed.push_reference(&name);
            }
        }
    }

    Ok(())
}

fn scan_element_text(text: &str, stack: &[String], parsed: &mut ParsedProject) {
    if contains_library_marker(text) {
        parsed.record_library_path(text);
    }

    let current = stack.last().map(String::as_str);
    let parent = stack
        .len()
        .checked_sub(2)
        .and_then(|i| stack.get(i))
        .map(String::as_str);

    if current == Some("Value") && parent == Some("BrowserContentPath") {
        parsed.apply_browser_path(text);
    }

    if let Some(parent) = parent {
        if DESCRIPTOR_TAGS.contains(&parent)
            && text.chars().count() < MAX_NAME_TEXT_LEN
            && !ends_with_library_ext(text.trim())
        {
            parsed.push_reference(text.trim());
        }
    }
}

/// Final path component. Project files carry Windows-style paths, so both
/// separator styles count.
fn basename(path: &str) -> &str {
    path.rsplit(['/', '\\']).next().unwrap_or(path)
}

fn contains_library_marker(value: &str) -> bool {
    value.to_ascii_lowercase().contains(PLUGIN_LIBRARY_MARKER)
}

fn ends_with_library_ext(value: &str) -> bool {
    value.to_ascii_lowercase().ends_with(PLUGIN_LIBRARY_MARKER)
}

fn tag_name(start: &BytesStart) -> String {
    String::from_utf8_lossy(start.local_name().as_ref()).into_owned()
}

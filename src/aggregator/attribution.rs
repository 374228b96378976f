//! Byte-level attribution of a bundle to its original sources.
//!
//! Source map breakpoints are projected onto the bundle's byte axis. Every
//! byte from one breakpoint up to the next belongs to the earlier
//! breakpoint's source, so the per-source totals always add up to the
//! bundle length exactly.

use super::rank::WeightedTally;
use crate::parser::SourceMap;
use crate::utils::error::SourceMapError;
use log::debug;
use serde::{Deserialize, Serialize};

/// Bytes of a bundle attributed to one source (`None` = unattributed)
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceBytes {
    pub source: Option<String>,
    pub bytes: u64,
}

impl SourceBytes {
    pub fn new(source: Option<&str>, bytes: u64) -> Self {
        Self {
            source: source.map(str::to_string),
            bytes,
        }
    }
}

/// A delivered script and where its bytes came from
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BundleRecord {
    pub url: String,
    pub total_bytes: u64,
    pub attribution: Vec<SourceBytes>,
}

impl BundleRecord {
    /// Bytes no source claims
    pub fn unattributed_bytes(&self) -> u64 {
        self.attribution
            .iter()
            .filter(|entry| entry.source.is_none())
            .map(|entry| entry.bytes)
            .sum()
    }
}

/// Attribute a bundle and wrap the result with its url
pub fn attribute_bundle(
    url: impl Into<String>,
    content: &str,
    map: &SourceMap,
) -> Result<BundleRecord, SourceMapError> {
    let url = url.into();
    let attribution = attribute(content, map)?;
    debug!("Attributed {} to {} sources", url, attribution.len());

    Ok(BundleRecord {
        url,
        total_bytes: content.len() as u64,
        attribution,
    })
}

/// Attribute every byte of `content` to a source of `map`
///
/// **Public** - main entry point for attribution
///
/// Entries are ordered by first appearance in the bundle. A map without
/// mappings attributes the whole bundle to `None`.
///
/// # Errors
/// * `SourceMapError::InvalidSourceMap` - A mapping names a source index the map does not declare
pub fn attribute(content: &str, map: &SourceMap) -> Result<Vec<SourceBytes>, SourceMapError> {
    let total = content.len();

    if map.mappings.is_empty() {
        return Ok(vec![SourceBytes::new(None, total as u64)]);
    }

    let breakpoints = byte_breakpoints(content, map)?;

    let mut tally: WeightedTally<Option<&str>, u64> = WeightedTally::new();
    let mut add = |source, start: usize, end: usize| {
        if end > start {
            tally.add(source, (end - start) as u64);
        }
    };

    // Anything before the first breakpoint has no source
    add(None, 0, breakpoints[0].0);

    for (i, &(start, source)) in breakpoints.iter().enumerate() {
        let end = breakpoints.get(i + 1).map_or(total, |next| next.0);
        let name = source.map(|index| map.sources[index].as_str());
        add(name, start, end);
    }

    Ok(tally
        .into_entries()
        .into_iter()
        .map(|(source, bytes)| SourceBytes::new(source, bytes))
        .collect())
}

/// Project breakpoints onto byte offsets, sorted ascending
///
/// **Private** - offsets are clamped to the line (or text) they fall in
fn byte_breakpoints(
    content: &str,
    map: &SourceMap,
) -> Result<Vec<(usize, Option<usize>)>, SourceMapError> {
    let lines = LineIndex::new(content);
    let mut cursor = ColumnCursor::default();
    let mut breakpoints = Vec::with_capacity(map.mappings.len());

    for mapping in &map.mappings {
        if let Some(index) = mapping.source {
            if index >= map.sources.len() {
                return Err(SourceMapError::InvalidSourceMap(format!(
                    "mapping at {}:{} references source {} but only {} sources are declared",
                    mapping.generated_line,
                    mapping.generated_column,
                    index,
                    map.sources.len()
                )));
            }
        }

        let offset = match lines.line(mapping.generated_line as usize) {
            Some((start, text)) => {
                start + cursor.byte_offset(mapping.generated_line, text, mapping.generated_column)
            }
            None => content.len(),
        };
        breakpoints.push((offset, mapping.source));
    }

    // Mappings are normally emitted in order already; stable keeps ties as written
    breakpoints.sort_by_key(|(offset, _)| *offset);
    Ok(breakpoints)
}

/// Byte offsets of line starts
struct LineIndex<'a> {
    content: &'a str,
    starts: Vec<usize>,
}

impl<'a> LineIndex<'a> {
    fn new(content: &'a str) -> Self {
        let starts = std::iter::once(0)
            .chain(content.match_indices('\n').map(|(i, _)| i + 1))
            .collect();
        Self { content, starts }
    }

    /// Start offset and text (without the newline) of a line
    fn line(&self, line: usize) -> Option<(usize, &'a str)> {
        let start = *self.starts.get(line)?;
        let end = self
            .starts
            .get(line + 1)
            .map_or(self.content.len(), |next| next - 1);
        Some((start, &self.content[start..end]))
    }
}

/// Converts UTF-16 columns to byte offsets, resuming from the last
/// position when columns on a line increase (the common case for
/// minified single-line bundles).
#[derive(Default)]
struct ColumnCursor {
    line: Option<u32>,
    column: u32,
    byte: usize,
}

impl ColumnCursor {
    fn byte_offset(&mut self, line: u32, text: &str, column: u32) -> usize {
        if self.line != Some(line) || column < self.column {
            self.line = Some(line);
            self.column = 0;
            self.byte = 0;
        }

        for ch in text[self.byte..].chars() {
            if self.column >= column {
                break;
            }
            self.column += ch.len_utf16() as u32;
            self.byte += ch.len_utf8();
        }

        self.byte
    }
}

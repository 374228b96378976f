//! Source Map v3 decoding.
//!
//! The `mappings` field is decoded by the `sourcemap` crate; this module
//! checks the document header, applies `sourceRoot`, and flattens the
//! tokens into generated-position breakpoints. Names and original
//! positions are not retained, since attribution only needs the source
//! index.

use crate::utils::error::SourceMapError;
use log::debug;
use serde::Deserialize;

/// A generated-code breakpoint
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mapping {
    /// Zero-based line in the generated file
    pub generated_line: u32,

    /// Zero-based column in UTF-16 code units
    pub generated_column: u32,

    /// Index into `SourceMap::sources`, `None` for unmapped segments
    pub source: Option<usize>,
}

impl Mapping {
    pub fn new(generated_line: u32, generated_column: u32, source: Option<usize>) -> Self {
        Self {
            generated_line,
            generated_column,
            source,
        }
    }
}

/// A decoded source map
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SourceMap {
    /// Source paths, with `sourceRoot` already applied
    pub sources: Vec<String>,

    /// Breakpoints in the order they appear in `mappings`
    pub mappings: Vec<Mapping>,
}

impl SourceMap {
    pub fn new(sources: Vec<String>, mappings: Vec<Mapping>) -> Self {
        Self { sources, mappings }
    }

    /// Decode a source map from JSON text
    pub fn from_json(text: &str) -> Result<Self, SourceMapError> {
        Self::from_slice(text.as_bytes())
    }

    /// Decode a source map from an already-parsed JSON value
    pub fn from_value(value: &serde_json::Value) -> Result<Self, SourceMapError> {
        Self::from_slice(&serde_json::to_vec(value)?)
    }

    /// Decode a source map from raw JSON bytes
    ///
    /// # Errors
    /// * `SourceMapError::JsonError` - Not a JSON object
    /// * `SourceMapError::InvalidSourceMap` - Unsupported version, an indexed
    ///   map, undecodable `mappings`, or a token naming an undeclared source
    pub fn from_slice(bytes: &[u8]) -> Result<Self, SourceMapError> {
        let header: SourceMapHeader = serde_json::from_slice(bytes)?;
        header.check()?;

        let decoded = sourcemap::SourceMap::from_slice(bytes)
            .map_err(|e| SourceMapError::InvalidSourceMap(e.to_string()))?;

        let root = header.source_root.unwrap_or_default();
        let sources: Vec<String> = header
            .sources
            .into_iter()
            .map(|source| join_source_root(&root, &source.unwrap_or_default()))
            .collect();

        let mappings = decoded
            .tokens()
            .map(|token| {
                let source = (token.get_src_id() != NO_SOURCE).then(|| token.get_src_id() as usize);
                if let Some(index) = source {
                    if index >= sources.len() {
                        return Err(SourceMapError::InvalidSourceMap(format!(
                            "token at {}:{} references source {} but only {} sources are declared",
                            token.get_dst_line(),
                            token.get_dst_col(),
                            index,
                            sources.len()
                        )));
                    }
                }
                Ok(Mapping::new(token.get_dst_line(), token.get_dst_col(), source))
            })
            .collect::<Result<Vec<_>, _>>()?;

        debug!("Decoded {} source map breakpoints", mappings.len());

        Ok(Self { sources, mappings })
    }
}

/// Source id the decoder gives tokens of one-field (unmapped) segments
const NO_SOURCE: u32 = !0;

/// Header fields checked before decoding
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SourceMapHeader {
    #[serde(default)]
    version: Option<u32>,

    #[serde(default)]
    sources: Vec<Option<String>>,

    #[serde(default)]
    source_root: Option<String>,

    #[serde(default)]
    sections: Option<serde_json::Value>,
}

impl SourceMapHeader {
    fn check(&self) -> Result<(), SourceMapError> {
        if let Some(version) = self.version {
            if version != 3 {
                return Err(SourceMapError::InvalidSourceMap(format!(
                    "unsupported source map version {}",
                    version
                )));
            }
        }
        if self.sections.is_some() {
            return Err(SourceMapError::InvalidSourceMap(
                "indexed source maps (sections) are not supported".to_string(),
            ));
        }
        Ok(())
    }
}

fn join_source_root(root: &str, source: &str) -> String {
    if root.is_empty() {
        source.to_string()
    } else if root.ends_with('/') {
        format!("{}{}", root, source)
    } else {
        format!("{}/{}", root, source)
    }
}

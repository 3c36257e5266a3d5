//! factory::extract
//!
//! Endpoint extraction from a snapshot of the factory repository.
//!
//! # Documents
//!
//! Configuration documents are the `*.xml` files at the top level of the
//! snapshot. Entries live at `<root>/entries/entry`. Documents whose file
//! name contains `-itb` describe the integration test bed and are left out
//! when only production endpoints are wanted.
//!
//! # Malformed Documents
//!
//! Documents are decoded by their byte order mark, else by the encoding
//! named in their XML declaration, else as UTF-8.
//!
//! A document that fails to decode or parse is reported as
//! [`ExtractError::Parse`].
//! [`OnMalformed`] lets the caller choose between failing the extraction
//! and skipping that document with a warning.

use std::fs;
use std::borrow::Cow;
use std::path::{Path, PathBuf};

use encoding_rs::{Encoding, UTF_8};
use thiserror::Error;
use tracing::{debug, warn};

use super::entry::ConfigEntry;
use crate::core::types::EndpointSet;

/// File name marker of non-production documents.
pub const NON_PRODUCTION_MARKER: &str = "-itb";

/// Errors from configuration extraction.
#[derive(Debug, Error)]
pub enum ExtractError {
    #[error("failed to list configuration documents in '{path}': {source}")]
    ReadDir {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to read configuration document '{path}': {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to parse configuration document '{path}': {message}")]
    Parse { path: PathBuf, message: String },
}

/// What to do with a document that fails to parse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OnMalformed {
    /// Abort the extraction with the parse error
    #[default]
    Fail,
    /// Log a warning and continue with the remaining documents
    Skip,
}

impl OnMalformed {
    /// Policy from a "skip malformed" flag.
    pub fn from_skip(skip: bool) -> Self {
        if skip {
            OnMalformed::Skip
        } else {
            OnMalformed::Fail
        }
    }
}

/// List the configuration documents of a snapshot, sorted by path.
pub fn config_documents(dir: &Path, production_only: bool) -> Result<Vec<PathBuf>, ExtractError> {
    let read_dir_err = |source| ExtractError::ReadDir {
        path: dir.to_path_buf(),
        source,
    };

    let mut documents = Vec::new();
    for entry in fs::read_dir(dir).map_err(read_dir_err)? {
        let path = entry.map_err(read_dir_err)?.path();
        if !path.is_file() || path.extension().map_or(true, |ext| ext != "xml") {
            continue;
        }
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        if production_only && name.contains(NON_PRODUCTION_MARKER) {
            debug!(document = %name, "skipping non-production document");
            continue;
        }
        documents.push(path);
    }

    documents.sort();
    Ok(documents)
}

/// Parse one document and collect the endpoints of its admitted entries.
pub fn parse_document(path: &Path) -> Result<EndpointSet, ExtractError> {
    let bytes = fs::read(path).map_err(|e| ExtractError::Read {
        path: path.to_path_buf(),
        source: e,
    })?;
    decode_document(&bytes)
        .and_then(|text| parse_document_str(&text))
        .map_err(|message| ExtractError::Parse {
            path: path.to_path_buf(),
            message,
        })
}

/// Decode document bytes to text.
///
/// A byte order mark wins over the declared encoding. Bytes that are
/// invalid in the chosen encoding are an error, never replaced.
pub fn decode_document(bytes: &[u8]) -> Result<Cow<'_, str>, String> {
    let (encoding, body) = match Encoding::for_bom(bytes) {
        Some((encoding, bom_len)) => (encoding, &bytes[bom_len..]),
        None => {
            let declared = declared_encoding(bytes).and_then(Encoding::for_label);
            (declared.unwrap_or(UTF_8), bytes)
        }
    };

    encoding
        .decode_without_bom_handling_and_without_replacement(body)
        .ok_or_else(|| format!("document is not valid {}", encoding.name()))
}

/// The `encoding` pseudo-attribute of a leading XML declaration.
fn declared_encoding(bytes: &[u8]) -> Option<&[u8]> {
    let declaration = bytes.strip_prefix(b"<?xml")?;
    let end = declaration.windows(2).position(|w| w == b"?>")?;
    let declaration = &declaration[..end];

    let at = declaration
        .windows(b"encoding".len())
        .position(|w| w == b"encoding")?;
    let rest = skip_space(&declaration[at + b"encoding".len()..]);
    let rest = skip_space(rest.strip_prefix(b"=")?);
    let (&quote, value) = rest.split_first()?;
    if quote != b'"' && quote != b'\'' {
        return None;
    }
    let len = value.iter().position(|b| *b == quote)?;
    Some(&value[..len])
}

fn skip_space(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

/// Parse document text and collect the endpoints of its admitted entries.
pub fn parse_document_str(text: &str) -> Result<EndpointSet, String> {
    let options = roxmltree::ParsingOptions {
        allow_dtd: true,
        ..roxmltree::ParsingOptions::default()
    };
    let doc = roxmltree::Document::parse_with_options(text, options).map_err(|e| e.to_string())?;

    let endpoints = doc
        .root_element()
        .children()
        .filter(|n| n.has_tag_name("entries"))
        .flat_map(|entries| entries.children().filter(|n| n.has_tag_name("entry")))
        .filter_map(|node| ConfigEntry::from_node(node).admit())
        .collect();

    Ok(endpoints)
}

/// Union the endpoints of every configuration document in `dir`.
pub fn extract_endpoints(
    dir: &Path,
    production_only: bool,
    on_malformed: OnMalformed,
) -> Result<EndpointSet, ExtractError> {
    let mut endpoints = EndpointSet::new();

    for document in config_documents(dir, production_only)? {
        match parse_document(&document) {
            Ok(found) => {
                debug!(document = %document.display(), count = found.len(), "parsed document");
                endpoints.extend(found);
            }
            Err(err @ ExtractError::Parse { .. }) if on_malformed == OnMalformed::Skip => {
                warn!("{}", err);
            }
            Err(err) => return Err(err),
        }
    }

    Ok(endpoints)
}

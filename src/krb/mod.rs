//! KRB document decoding.
//!
//! ```text
//! bytes ──decode──▶ Document ──Forest::build──▶ Forest ──resolve──▶ attributes
//! ```
//!
//! [`load`] runs the whole chain. The individual stages are public so tools
//! can stop early (dump the raw model) or re-encode with [`encode`].

mod cursor;
mod error;
mod model;
mod reader;
mod resolve;
mod tree;
mod writer;

use std::path::Path;

pub use error::{DecodeError, Error, PropertyOwner, Result, StructureError};
pub use model::{
    Document, DocumentHeader, ELEMENT_HEADER_SIZE, ElementHeader, ElementType, FORMAT_VERSION,
    HEADER_SIZE, MAGIC, PropertyEntry, PropertyId, PropertyValue, StringTable, Style, ValueType,
    strip_quotes,
};
pub use reader::decode;
pub use resolve::{
    BorderWidths, DEFAULT_BACKGROUND, DEFAULT_BORDER_COLOR, DEFAULT_FOREGROUND, Diagnostic,
    ResolvedAttributes, resolve,
};
pub use tree::{Element, ElementId, Forest, build};
pub use writer::encode;

/// A decoded document together with its resolved forest.
#[derive(Debug, Clone)]
pub struct LoadedDocument {
    pub document: Document,
    pub forest: Forest,
    /// Non-fatal conditions met while resolving.
    pub diagnostics: Vec<Diagnostic>,
}

/// Decode, build and resolve in one go.
pub fn load(bytes: &[u8]) -> Result<LoadedDocument> {
    let document = decode(bytes)?;
    let mut forest = Forest::build(&document.elements)?;
    let diagnostics = resolve(&mut forest, &document);
    Ok(LoadedDocument {
        document,
        forest,
        diagnostics,
    })
}

/// Read a file and [`load`] it.
pub fn read_file(path: impl AsRef<Path>) -> Result<LoadedDocument> {
    let bytes = std::fs::read(path)?;
    load(&bytes)
}

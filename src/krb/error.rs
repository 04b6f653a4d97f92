use thiserror::Error;

/// Why a byte stream could not be decoded into a [`Document`](super::Document).
///
/// Every variant is terminal: the reader never hands back a partial model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum DecodeError {
    #[error("truncated header: need {need} bytes, have {have}")]
    TruncatedHeader { need: usize, have: usize },

    #[error("invalid magic: expected \"KRB1\", found {found:?}")]
    BadMagic { found: [u8; 4] },

    #[error("unsupported format version {version} (newest supported is {supported})")]
    UnsupportedVersion { version: u16, supported: u16 },

    #[error("element table truncated at element {index} (offset {offset:#x})")]
    TruncatedElements { index: usize, offset: usize },

    #[error("style table truncated at style {index} (offset {offset:#x})")]
    TruncatedStyles { index: usize, offset: usize },

    #[error("property {index} of {owner} truncated (offset {offset:#x})")]
    TruncatedProperty {
        owner: PropertyOwner,
        index: usize,
        offset: usize,
    },

    #[error("string table truncated at string {index} (offset {offset:#x})")]
    TruncatedStrings { index: usize, offset: usize },

    #[error("element {element} references style {style_id}, but only {style_count} styles exist")]
    InvalidStyleReference {
        element: usize,
        style_id: u8,
        style_count: usize,
    },
}

/// Which list a truncated property entry belonged to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyOwner {
    Style(usize),
    Element(usize),
}

impl std::fmt::Display for PropertyOwner {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            PropertyOwner::Style(i) => write!(f, "style {i}"),
            PropertyOwner::Element(i) => write!(f, "element {i}"),
        }
    }
}

/// The flat element array does not describe a well-formed forest.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum StructureError {
    #[error("element {element} declares {missing} more child subtree(s) than the array holds")]
    Overrun { element: usize, missing: usize },
}

/// Anything that can go wrong between a file path and a resolved tree.
#[derive(Debug, Error)]
pub enum Error {
    #[error("decode failed: {0}")]
    Decode(#[from] DecodeError),

    #[error("malformed element tree: {0}")]
    Structure(#[from] StructureError),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, Error>;

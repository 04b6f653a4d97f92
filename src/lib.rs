//! # krb-view
//!
//! Decoder and viewers for KRB, a compact binary UI description format.
//!
//! ## Architecture
//!
//! ```text
//! bytes → krb::decode → Document → Forest::build → krb::resolve → backend::walk
//! ```
//!
//! The [`krb`] core is pure: it returns values and structured errors and
//! never logs or draws. Backends pull from the resolved forest.
//!
//! ## Modules
//!
//! - [`types`] - Shared value types (Rgba, Cell, ClipRect, BorderStyle)
//! - [`krb`] - Binary reader/writer, tree builder, property resolver
//! - [`backend`] - Render adapter trait plus terminal and pixel backends
//! - [`renderer`] - Cell frame buffer and ANSI output
//! - [`config`] - Backend geometry and environment overrides

pub mod backend;
pub mod config;
pub mod krb;
pub mod renderer;
pub mod types;

pub use types::*;

pub use krb::{
    DecodeError, Diagnostic, Document, Element, ElementId, Error, Forest, LoadedDocument,
    ResolvedAttributes, StructureError, decode, encode, load, read_file, resolve,
};

pub use backend::{DrawCommand, ElementView, PixelBackend, RenderAdapter, TerminalBackend, walk};
pub use config::{PixelConfig, TerminalConfig};

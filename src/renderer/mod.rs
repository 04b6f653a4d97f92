//! Terminal renderer - the "blind" output layer.
//!
//! The renderer knows only about cells. It doesn't understand elements,
//! styles or documents. It takes a filled [`FrameBuffer`] and produces ANSI
//! escape sequences.

pub mod ansi;
pub mod buffer;
pub mod output;

pub use crate::types::ClipRect;
pub use buffer::{FrameBuffer, char_width};
pub use output::{OutputBuffer, StatefulCellRenderer};

//! Style and property resolution.
//!
//! Per element, in order:
//!
//! 1. the referenced style's properties, in list order
//! 2. the element's own properties, in list order (override step 1)
//! 3. colors still unset inherit the parent's resolved color; roots fall
//!    back to the global defaults
//!
//! Border widths and text never inherit. Entries whose `(id, type, size)`
//! combination is not recognised are skipped.

use super::model::{Document, PropertyEntry, PropertyId, PropertyValue, StringTable};
use super::tree::{ElementId, Forest};
use crate::types::Rgba;

/// Background of a root with no background of its own.
pub const DEFAULT_BACKGROUND: Rgba = Rgba::BLACK;
/// Foreground of a root with no foreground of its own.
pub const DEFAULT_FOREGROUND: Rgba = Rgba::WHITE;
/// Border color of a root with no border color of its own.
pub const DEFAULT_BORDER_COLOR: Rgba = Rgba::GRAY;

// =============================================================================
// Types
// =============================================================================

/// Border widths in document units.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BorderWidths {
    pub top: u8,
    pub right: u8,
    pub bottom: u8,
    pub left: u8,
}

impl BorderWidths {
    /// Same width on every side.
    pub const fn all(width: u8) -> Self {
        Self {
            top: width,
            right: width,
            bottom: width,
            left: width,
        }
    }

    /// From `[top, right, bottom, left]`.
    pub const fn from_array([top, right, bottom, left]: [u8; 4]) -> Self {
        Self { top, right, bottom, left }
    }

    pub const fn to_array(&self) -> [u8; 4] {
        [self.top, self.right, self.bottom, self.left]
    }

    pub const fn is_zero(&self) -> bool {
        self.top == 0 && self.right == 0 && self.bottom == 0 && self.left == 0
    }

    pub fn max(&self) -> u8 {
        self.top.max(self.right).max(self.bottom).max(self.left)
    }
}

/// Final visual attributes of one element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedAttributes {
    pub background: Rgba,
    pub foreground: Rgba,
    pub border_color: Rgba,
    pub border_widths: BorderWidths,
    pub text: Option<String>,
}

impl Default for ResolvedAttributes {
    fn default() -> Self {
        Self {
            background: DEFAULT_BACKGROUND,
            foreground: DEFAULT_FOREGROUND,
            border_color: DEFAULT_BORDER_COLOR,
            border_widths: BorderWidths::default(),
            text: None,
        }
    }
}

/// A non-fatal problem noticed while resolving.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Diagnostic {
    /// A TextRef pointed past the end of the string table.
    MissingString {
        element: ElementId,
        index: u8,
        string_count: usize,
    },
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Diagnostic::MissingString {
                element,
                index,
                string_count,
            } => write!(
                f,
                "element {} references string {} but the table holds {}",
                element.index(),
                index,
                string_count
            ),
        }
    }
}

// =============================================================================
// Resolution
// =============================================================================

/// Values set by style or element properties. `None` = not set.
#[derive(Debug, Default)]
struct Overrides {
    background: Option<Rgba>,
    foreground: Option<Rgba>,
    border_color: Option<Rgba>,
    border_widths: Option<BorderWidths>,
    text: Option<String>,
}

#[derive(Clone, Copy, PartialEq, Eq)]
enum Source {
    Style,
    Element,
}

impl Overrides {
    fn apply(
        &mut self,
        entry: &PropertyEntry,
        source: Source,
        strings: &StringTable,
        element: ElementId,
        diagnostics: &mut Vec<Diagnostic>,
    ) {
        let Some(value) = entry.value() else {
            return;
        };
        match (entry.id, value) {
            (PropertyId::BackgroundColor, PropertyValue::Color(c)) => self.background = Some(c),
            (PropertyId::ForegroundColor, PropertyValue::Color(c)) => self.foreground = Some(c),
            (PropertyId::BorderColor, PropertyValue::Color(c)) => self.border_color = Some(c),
            (PropertyId::BorderWidth, PropertyValue::UInt8(w)) => {
                self.border_widths = Some(BorderWidths::all(w));
            }
            (PropertyId::BorderWidth, PropertyValue::UInt8x4(edges)) => {
                self.border_widths = Some(BorderWidths::from_array(edges));
            }
            (PropertyId::TextRef, PropertyValue::StringIndex(index)) if source == Source::Element => {
                match strings.text(index as usize) {
                    Some(text) => self.text = Some(text.to_string()),
                    None => diagnostics.push(Diagnostic::MissingString {
                        element,
                        index,
                        string_count: strings.len(),
                    }),
                }
            }
            _ => {}
        }
    }
}

/// Fill in the resolved attributes of every element in `forest`.
///
/// `forest` must have been built from `doc.elements`. Returns the non-fatal
/// conditions met on the way; resolution itself cannot fail.
pub fn resolve(forest: &mut Forest, doc: &Document) -> Vec<Diagnostic> {
    let mut diagnostics = Vec::new();

    let overrides: Vec<Overrides> = forest
        .iter()
        .map(|element| {
            let id = element.id();
            let mut set = Overrides::default();
            if let Some(style) = doc.style(element.header().style_id) {
                for entry in &style.properties {
                    set.apply(entry, Source::Style, &doc.strings, id, &mut diagnostics);
                }
            }
            for entry in doc.element_properties(id.index()) {
                set.apply(entry, Source::Element, &doc.strings, id, &mut diagnostics);
            }
            set
        })
        .collect();

    // Pre-order storage: every parent sits before its children, so a single
    // forward pass sees resolved parents.
    let elements = forest.elements_mut();
    for (index, set) in overrides.into_iter().enumerate() {
        let inherited = match elements[index].parent() {
            Some(parent) => {
                let p = &elements[parent.index()].attributes;
                (p.background, p.foreground, p.border_color)
            }
            None => (DEFAULT_BACKGROUND, DEFAULT_FOREGROUND, DEFAULT_BORDER_COLOR),
        };

        elements[index].attributes = ResolvedAttributes {
            background: set.background.unwrap_or(inherited.0),
            foreground: set.foreground.unwrap_or(inherited.1),
            border_color: set.border_color.unwrap_or(inherited.2),
            border_widths: set.border_widths.unwrap_or_default(),
            text: set.text,
        };
    }

    diagnostics
}

// =============================================================================
// Tests
// =============================================================================

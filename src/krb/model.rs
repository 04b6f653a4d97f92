//! The decoded, validated document.
//!
//! Nothing here interprets properties beyond their declared type and size;
//! that is the resolver's job.

use crate::types::Rgba;

/// File magic.
pub const MAGIC: [u8; 4] = *b"KRB1";

/// Newest format version the reader understands.
pub const FORMAT_VERSION: u16 = 1;

/// Size of the fixed document header in bytes.
pub const HEADER_SIZE: usize = 12;

/// Size of one element header in bytes.
pub const ELEMENT_HEADER_SIZE: usize = 12;

// =============================================================================
// Enumerations
// =============================================================================

/// Element kind tag.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ElementType {
    App,
    Container,
    Text,
    Image,
    Canvas,
    Button,
    Input,
    Unknown(u8),
}

impl From<u8> for ElementType {
    fn from(value: u8) -> Self {
        match value {
            0x00 => Self::App,
            0x01 => Self::Container,
            0x02 => Self::Text,
            0x03 => Self::Image,
            0x04 => Self::Canvas,
            0x10 => Self::Button,
            0x11 => Self::Input,
            other => Self::Unknown(other),
        }
    }
}

impl From<ElementType> for u8 {
    fn from(value: ElementType) -> Self {
        match value {
            ElementType::App => 0x00,
            ElementType::Container => 0x01,
            ElementType::Text => 0x02,
            ElementType::Image => 0x03,
            ElementType::Canvas => 0x04,
            ElementType::Button => 0x10,
            ElementType::Input => 0x11,
            ElementType::Unknown(other) => other,
        }
    }
}

/// Property identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyId {
    BackgroundColor,
    ForegroundColor,
    BorderColor,
    BorderWidth,
    BorderRadius,
    LayoutFlags,
    TextRef,
    FontSize,
    Other(u8),
}

impl From<u8> for PropertyId {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::BackgroundColor,
            0x02 => Self::ForegroundColor,
            0x03 => Self::BorderColor,
            0x04 => Self::BorderWidth,
            0x05 => Self::BorderRadius,
            0x06 => Self::LayoutFlags,
            0x08 => Self::TextRef,
            0x09 => Self::FontSize,
            other => Self::Other(other),
        }
    }
}

impl From<PropertyId> for u8 {
    fn from(value: PropertyId) -> Self {
        match value {
            PropertyId::BackgroundColor => 0x01,
            PropertyId::ForegroundColor => 0x02,
            PropertyId::BorderColor => 0x03,
            PropertyId::BorderWidth => 0x04,
            PropertyId::BorderRadius => 0x05,
            PropertyId::LayoutFlags => 0x06,
            PropertyId::TextRef => 0x08,
            PropertyId::FontSize => 0x09,
            PropertyId::Other(other) => other,
        }
    }
}

/// Declared encoding of a property value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueType {
    UInt8,
    UInt16,
    Color32,
    StringIndex,
    UInt8x4,
    Other(u8),
}

impl ValueType {
    /// Byte size this encoding must have, if it is a known one.
    pub const fn expected_size(&self) -> Option<usize> {
        match self {
            Self::UInt8 | Self::StringIndex => Some(1),
            Self::UInt16 => Some(2),
            Self::Color32 | Self::UInt8x4 => Some(4),
            Self::Other(_) => None,
        }
    }
}

impl From<u8> for ValueType {
    fn from(value: u8) -> Self {
        match value {
            0x01 => Self::UInt8,
            0x02 => Self::UInt16,
            0x03 => Self::Color32,
            0x04 => Self::StringIndex,
            0x08 => Self::UInt8x4,
            other => Self::Other(other),
        }
    }
}

impl From<ValueType> for u8 {
    fn from(value: ValueType) -> Self {
        match value {
            ValueType::UInt8 => 0x01,
            ValueType::UInt16 => 0x02,
            ValueType::Color32 => 0x03,
            ValueType::StringIndex => 0x04,
            ValueType::UInt8x4 => 0x08,
            ValueType::Other(other) => other,
        }
    }
}

// =============================================================================
// Properties
// =============================================================================

/// A property value whose declared size matched its declared type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PropertyValue {
    UInt8(u8),
    UInt16(u16),
    Color(Rgba),
    StringIndex(u8),
    UInt8x4([u8; 4]),
}

/// One `(id, type, size, bytes)` record, kept exactly as stored.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PropertyEntry {
    pub id: PropertyId,
    pub value_type: ValueType,
    /// Raw value bytes; the declared size is `raw.len()`.
    pub raw: Vec<u8>,
}

impl PropertyEntry {
    pub fn new(id: PropertyId, value_type: ValueType, raw: impl Into<Vec<u8>>) -> Self {
        Self {
            id,
            value_type,
            raw: raw.into(),
        }
    }

    /// A Color32 entry holding `0xRRGGBBAA`.
    pub fn color(id: PropertyId, rgba: u32) -> Self {
        Self::new(id, ValueType::Color32, rgba.to_le_bytes())
    }

    /// Declared byte size.
    pub fn size(&self) -> usize {
        self.raw.len()
    }

    /// Interpret the raw bytes.
    ///
    /// Returns `None` when the value type is unknown or the stored size does
    /// not match the size the type implies. Such entries stay in the document
    /// but carry no meaning.
    pub fn value(&self) -> Option<PropertyValue> {
        if self.value_type.expected_size()? != self.raw.len() {
            return None;
        }
        let raw = self.raw.as_slice();
        Some(match self.value_type {
            ValueType::UInt8 => PropertyValue::UInt8(raw[0]),
            ValueType::StringIndex => PropertyValue::StringIndex(raw[0]),
            ValueType::UInt16 => PropertyValue::UInt16(u16::from_le_bytes([raw[0], raw[1]])),
            ValueType::Color32 => {
                PropertyValue::Color(Rgba::from_rgba_u32(u32::from_le_bytes([raw[0], raw[1], raw[2], raw[3]])))
            }
            ValueType::UInt8x4 => PropertyValue::UInt8x4([raw[0], raw[1], raw[2], raw[3]]),
            ValueType::Other(_) => return None,
        })
    }
}

/// A shared, ordered list of properties referenced by `style_id`.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Style {
    pub properties: Vec<PropertyEntry>,
}

// =============================================================================
// Headers
// =============================================================================

/// Counts bounding the rest of the document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentHeader {
    pub version: u16,
    pub element_count: u16,
    pub style_count: u16,
    pub string_count: u16,
}

/// Fixed-size per-element record from the flat pre-order array.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ElementHeader {
    pub element_type: ElementType,
    pub pos_x: u16,
    pub pos_y: u16,
    pub width: u16,
    pub height: u16,
    /// 0 = no style, otherwise a 1-based index into the style table.
    pub style_id: u8,
    pub property_count: u8,
    pub child_count: u8,
}

impl ElementHeader {
    pub fn new(element_type: ElementType) -> Self {
        Self {
            element_type,
            pos_x: 0,
            pos_y: 0,
            width: 0,
            height: 0,
            style_id: 0,
            property_count: 0,
            child_count: 0,
        }
    }
}

// =============================================================================
// String table
// =============================================================================

/// Ordered text values referenced by 0-based index.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StringTable {
    strings: Vec<String>,
}

impl StringTable {
    pub fn new(strings: Vec<String>) -> Self {
        Self { strings }
    }

    pub fn len(&self) -> usize {
        self.strings.len()
    }

    pub fn is_empty(&self) -> bool {
        self.strings.is_empty()
    }

    /// Raw stored value, quotes included.
    pub fn get(&self, index: usize) -> Option<&str> {
        self.strings.get(index).map(String::as_str)
    }

    /// Stored value with one pair of surrounding double quotes removed.
    pub fn text(&self, index: usize) -> Option<&str> {
        self.get(index).map(strip_quotes)
    }

    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.strings.iter().map(String::as_str)
    }
}

/// Remove one pair of surrounding `"` if both ends carry one.
pub fn strip_quotes(s: &str) -> &str {
    if s.len() >= 2 && s.starts_with('"') && s.ends_with('"') {
        &s[1..s.len() - 1]
    } else {
        s
    }
}

// =============================================================================
// Document
// =============================================================================

/// Immutable result of decoding one KRB byte stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Document {
    pub header: DocumentHeader,
    /// Flat pre-order element array.
    pub elements: Vec<ElementHeader>,
    pub styles: Vec<Style>,
    /// Per-element property lists, parallel to `elements`.
    pub properties: Vec<Vec<PropertyEntry>>,
    pub strings: StringTable,
}

impl Document {
    /// Look up a style by its 1-based id. Id 0 means "no style".
    pub fn style(&self, style_id: u8) -> Option<&Style> {
        let index = (style_id as usize).checked_sub(1)?;
        self.styles.get(index)
    }

    /// Properties owned by the element at `index`.
    pub fn element_properties(&self, index: usize) -> &[PropertyEntry] {
        self.properties.get(index).map(Vec::as_slice).unwrap_or(&[])
    }
}

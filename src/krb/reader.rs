//! Binary reader: bytes in, validated [`Document`] out.
//!
//! # Section order
//!
//! ```text
//! header │ element headers │ styles │ element properties │ string table
//! ```
//!
//! Every shortfall aborts with the error naming the section being read.

use super::cursor::Cursor;
use super::error::{DecodeError, PropertyOwner};
use super::model::{
    Document, DocumentHeader, ELEMENT_HEADER_SIZE, ElementHeader, ElementType, FORMAT_VERSION,
    HEADER_SIZE, MAGIC, PropertyEntry, PropertyId, Style, StringTable, ValueType,
};

/// Decode a complete KRB document.
pub fn decode(bytes: &[u8]) -> Result<Document, DecodeError> {
    let mut cursor = Cursor::new(bytes);

    let header = read_header(&mut cursor)?;

    let mut elements = Vec::with_capacity(header.element_count as usize);
    for index in 0..header.element_count as usize {
        let offset = cursor.position();
        let element =
            read_element_header(&mut cursor).ok_or(DecodeError::TruncatedElements { index, offset })?;
        if element.style_id as usize > header.style_count as usize {
            return Err(DecodeError::InvalidStyleReference {
                element: index,
                style_id: element.style_id,
                style_count: header.style_count as usize,
            });
        }
        elements.push(element);
    }

    let mut styles = Vec::with_capacity(header.style_count as usize);
    for index in 0..header.style_count as usize {
        let offset = cursor.position();
        let count = cursor
            .read_u8()
            .ok_or(DecodeError::TruncatedStyles { index, offset })?;
        let properties = read_properties(&mut cursor, count as usize, PropertyOwner::Style(index))?;
        styles.push(Style { properties });
    }

    let mut properties = Vec::with_capacity(elements.len());
    for (index, element) in elements.iter().enumerate() {
        properties.push(read_properties(
            &mut cursor,
            element.property_count as usize,
            PropertyOwner::Element(index),
        )?);
    }

    let mut strings = Vec::with_capacity(header.string_count as usize);
    for index in 0..header.string_count as usize {
        let offset = cursor.position();
        let text = read_string(&mut cursor).ok_or(DecodeError::TruncatedStrings { index, offset })?;
        strings.push(text);
    }

    Ok(Document {
        header,
        elements,
        styles,
        properties,
        strings: StringTable::new(strings),
    })
}

fn read_header(cursor: &mut Cursor<'_>) -> Result<DocumentHeader, DecodeError> {
    let have = cursor.remaining();
    let truncated = DecodeError::TruncatedHeader { need: HEADER_SIZE, have };
    let raw = cursor.read_bytes(HEADER_SIZE).ok_or(truncated)?;

    let mut fields = Cursor::new(raw);
    let magic = fields.read_array::<4>().ok_or(truncated)?;
    if magic != MAGIC {
        return Err(DecodeError::BadMagic { found: magic });
    }

    let version = fields.read_u16().ok_or(truncated)?;
    if version > FORMAT_VERSION {
        return Err(DecodeError::UnsupportedVersion {
            version,
            supported: FORMAT_VERSION,
        });
    }

    Ok(DocumentHeader {
        version,
        element_count: fields.read_u16().ok_or(truncated)?,
        style_count: fields.read_u16().ok_or(truncated)?,
        string_count: fields.read_u16().ok_or(truncated)?,
    })
}

fn read_element_header(cursor: &mut Cursor<'_>) -> Option<ElementHeader> {
    // Read the whole record up front so a short record consumes nothing.
    let mut c = Cursor::new(cursor.read_bytes(ELEMENT_HEADER_SIZE)?);
    Some(ElementHeader {
        element_type: ElementType::from(c.read_u8()?),
        pos_x: c.read_u16()?,
        pos_y: c.read_u16()?,
        width: c.read_u16()?,
        height: c.read_u16()?,
        style_id: c.read_u8()?,
        property_count: c.read_u8()?,
        child_count: c.read_u8()?,
    })
}

fn read_properties(
    cursor: &mut Cursor<'_>,
    count: usize,
    owner: PropertyOwner,
) -> Result<Vec<PropertyEntry>, DecodeError> {
    let mut properties = Vec::with_capacity(count);
    for index in 0..count {
        let offset = cursor.position();
        let entry = read_property(cursor).ok_or(DecodeError::TruncatedProperty { owner, index, offset })?;
        properties.push(entry);
    }
    Ok(properties)
}

fn read_property(cursor: &mut Cursor<'_>) -> Option<PropertyEntry> {
    let [id, value_type, size] = cursor.read_array::<3>()?;
    let raw = cursor.read_bytes(size as usize)?;
    Some(PropertyEntry {
        id: PropertyId::from(id),
        value_type: ValueType::from(value_type),
        raw: raw.to_vec(),
    })
}

fn read_string(cursor: &mut Cursor<'_>) -> Option<String> {
    let len = cursor.read_u8()? as usize;
    let bytes = cursor.read_bytes(len)?;
    Some(String::from_utf8_lossy(bytes).into_owned())
}

// =============================================================================
// Tests
// =============================================================================

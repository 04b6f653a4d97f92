//! Conforming writer for the KRB format read by [`decode`](super::decode).
//!
//! Counts are taken from the vectors, entry sizes from the raw value length.
//! The header counts and per-element `property_count` stored in the document
//! are ignored in favour of what is actually present.

use super::model::{Document, ElementHeader, MAGIC, PropertyEntry};

/// Serialise a document.
pub fn encode(doc: &Document) -> Vec<u8> {
    let mut out = Vec::new();

    out.extend_from_slice(&MAGIC);
    out.extend_from_slice(&doc.header.version.to_le_bytes());
    put_count(&mut out, doc.elements.len());
    put_count(&mut out, doc.styles.len());
    put_count(&mut out, doc.strings.len());

    for (index, element) in doc.elements.iter().enumerate() {
        let props = doc.element_properties(index).len();
        put_element(&mut out, element, props);
    }

    for style in &doc.styles {
        out.push(clamp_u8(style.properties.len()));
        for entry in style.properties.iter().take(u8::MAX as usize) {
            put_property(&mut out, entry);
        }
    }

    for index in 0..doc.elements.len() {
        for entry in doc.element_properties(index).iter().take(u8::MAX as usize) {
            put_property(&mut out, entry);
        }
    }

    for text in doc.strings.iter() {
        let bytes = text.as_bytes();
        let len = bytes.len().min(u8::MAX as usize);
        out.push(len as u8);
        out.extend_from_slice(&bytes[..len]);
    }

    out
}

fn put_count(out: &mut Vec<u8>, count: usize) {
    out.extend_from_slice(&(count.min(u16::MAX as usize) as u16).to_le_bytes());
}

fn clamp_u8(n: usize) -> u8 {
    n.min(u8::MAX as usize) as u8
}

fn put_element(out: &mut Vec<u8>, element: &ElementHeader, property_count: usize) {
    out.push(element.element_type.into());
    for v in [element.pos_x, element.pos_y, element.width, element.height] {
        out.extend_from_slice(&v.to_le_bytes());
    }
    out.push(element.style_id);
    out.push(clamp_u8(property_count));
    out.push(element.child_count);
}

fn put_property(out: &mut Vec<u8>, entry: &PropertyEntry) {
    let len = entry.raw.len().min(u8::MAX as usize);
    out.push(entry.id.into());
    out.push(entry.value_type.into());
    out.push(len as u8);
    out.extend_from_slice(&entry.raw[..len]);
}

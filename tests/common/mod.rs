//! Shared document builders for integration tests.

#![allow(dead_code)]

use krb_view::krb::{
    Document, DocumentHeader, ElementHeader, ElementType, FORMAT_VERSION, PropertyEntry,
    PropertyId, StringTable, Style, ValueType, encode,
};

pub fn header(kind: ElementType, x: u16, y: u16, w: u16, h: u16, children: u8) -> ElementHeader {
    let mut e = ElementHeader::new(kind);
    e.pos_x = x;
    e.pos_y = y;
    e.width = w;
    e.height = h;
    e.child_count = children;
    e
}

pub fn styled(mut e: ElementHeader, style_id: u8) -> ElementHeader {
    e.style_id = style_id;
    e
}

pub fn color(id: PropertyId, rgba: u32) -> PropertyEntry {
    PropertyEntry::color(id, rgba)
}

pub fn border(width: u8) -> PropertyEntry {
    PropertyEntry::new(PropertyId::BorderWidth, ValueType::UInt8, [width])
}

pub fn text_ref(index: u8) -> PropertyEntry {
    PropertyEntry::new(PropertyId::TextRef, ValueType::StringIndex, [index])
}

#[derive(Debug, Default)]
pub struct DocBuilder {
    elements: Vec<ElementHeader>,
    properties: Vec<Vec<PropertyEntry>>,
    styles: Vec<Style>,
    strings: Vec<String>,
}

impl DocBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn element(mut self, mut header: ElementHeader, props: Vec<PropertyEntry>) -> Self {
        header.property_count = props.len() as u8;
        self.elements.push(header);
        self.properties.push(props);
        self
    }

    pub fn style(mut self, props: Vec<PropertyEntry>) -> Self {
        self.styles.push(Style { properties: props });
        self
    }

    pub fn string(mut self, s: &str) -> Self {
        self.strings.push(s.to_string());
        self
    }

    pub fn document(&self) -> Document {
        Document {
            header: DocumentHeader {
                version: FORMAT_VERSION,
                element_count: self.elements.len() as u16,
                style_count: self.styles.len() as u16,
                string_count: self.strings.len() as u16,
            },
            elements: self.elements.clone(),
            styles: self.styles.clone(),
            properties: self.properties.clone(),
            strings: StringTable::new(self.strings.clone()),
        }
    }

    pub fn bytes(&self) -> Vec<u8> {
        encode(&self.document())
    }
}

/// A panel holding a bordered box with a label, plus a second root.
pub fn sample() -> DocBuilder {
    DocBuilder::new()
        .style(vec![color(PropertyId::BackgroundColor, 0x202040FF), border(1)])
        .string("\"Hello\"")
        .string("World")
        .element(
            styled(header(ElementType::App, 0, 0, 160, 128, 2), 1),
            vec![color(PropertyId::ForegroundColor, 0xFFCC00FF)],
        )
        .element(header(ElementType::Container, 8, 16, 80, 64, 1), vec![border(2)])
        .element(header(ElementType::Text, 8, 16, 48, 16, 0), vec![text_ref(0)])
        .element(header(ElementType::Text, 96, 16, 48, 16, 0), vec![text_ref(1)])
        .element(header(ElementType::Container, 0, 128, 16, 16, 0), vec![])
}

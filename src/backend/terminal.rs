//! Terminal backend.
//!
//! Maps document units onto a cell grid (8×16 units per cell by default)
//! and paints into a [`FrameBuffer`]. [`TerminalBackend::print_frame`] emits
//! the whole frame once; there is no event loop.
//!
//! Every element is clipped to its parent's content area. A bordered edge
//! takes a whole cell, so content starts at least one cell inside it.

use std::io::{self, Write};

use log::debug;

use super::{ElementView, RenderAdapter, is_container, walk};
use crate::config::TerminalConfig;
use crate::krb::{BorderWidths, ElementType, Forest};
use crate::renderer::{FrameBuffer, OutputBuffer, StatefulCellRenderer, ansi};
use crate::types::{BorderStyle, ClipRect};

#[derive(Debug)]
pub struct TerminalBackend {
    config: TerminalConfig,
    buffer: FrameBuffer,
    /// Content area of each element on the current path.
    clips: Vec<ClipRect>,
}

impl TerminalBackend {
    /// Backend with a frame sized by `config`.
    pub fn new(config: TerminalConfig) -> Self {
        let (cols, rows) = config.resolved_frame_size();
        Self {
            config,
            buffer: FrameBuffer::new(cols, rows),
            clips: Vec::new(),
        }
    }

    pub fn config(&self) -> &TerminalConfig {
        &self.config
    }

    pub fn buffer(&self) -> &FrameBuffer {
        &self.buffer
    }

    /// Paint `forest` into a fresh frame.
    pub fn render(&mut self, forest: &Forest) -> &FrameBuffer {
        self.render_at(forest, (0, 0))
    }

    /// Paint `forest` into a fresh frame with its roots placed relative to
    /// `origin` (document units).
    pub fn render_at(&mut self, forest: &Forest, origin: (u32, u32)) -> &FrameBuffer {
        self.buffer = FrameBuffer::new(self.buffer.width(), self.buffer.height());
        self.clips.clear();
        walk(forest, origin, self);
        &self.buffer
    }

    /// Write the current frame: clear screen, every cell, reset, newline.
    pub fn print_frame<W: Write>(&self, out: &mut W) -> io::Result<()> {
        let mut output = OutputBuffer::new();
        ansi::begin_sync(&mut output)?;
        ansi::clear_screen(&mut output)?;

        let mut renderer = StatefulCellRenderer::new();
        renderer.render_buffer(&mut output, &self.buffer);

        ansi::reset(&mut output)?;
        ansi::end_sync(&mut output)?;
        output.write_str("\r\n");
        output.flush_to(out)
    }

    /// The frame as plain text, one line per row, trailing spaces trimmed.
    pub fn plain_text(&self) -> String {
        (0..self.buffer.height())
            .map(|y| self.buffer.row_text(y).trim_end().to_string())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn cell_rect(&self, view: &ElementView<'_>) -> ClipRect {
        let cw = self.config.cell_width.max(1) as u32;
        let ch = self.config.cell_height.max(1) as u32;
        ClipRect::new(
            to_u16(view.x / cw),
            to_u16(view.y / ch),
            to_u16(view.width().div_ceil(cw).max(1)),
            to_u16(view.height().div_ceil(ch).max(1)),
        )
    }

    fn frame_rect(&self) -> ClipRect {
        ClipRect::new(0, 0, self.buffer.width(), self.buffer.height())
    }
}

fn to_u16(v: u32) -> u16 {
    u16::try_from(v).unwrap_or(u16::MAX)
}

/// Cells taken by each bordered edge: (top, right, bottom, left).
fn border_cells(widths: &BorderWidths) -> (u16, u16, u16, u16) {
    let cell = |w: u8| u16::from(w > 0);
    (cell(widths.top), cell(widths.right), cell(widths.bottom), cell(widths.left))
}

impl RenderAdapter for TerminalBackend {
    fn enter(&mut self, view: &ElementView<'_>) -> bool {
        let element = view.element;
        let attrs = element.attributes();
        let rect = self.cell_rect(view);
        let parent = self.clips.last().copied().unwrap_or_else(|| self.frame_rect());

        debug!(
            "element {} {:?} at cell ({}, {}) size {}x{}",
            element.id().index(),
            element.element_type(),
            rect.x,
            rect.y,
            rect.width,
            rect.height
        );

        let Some(clip) = rect.intersect(&parent) else {
            // completely clipped, and so is everything inside it
            self.clips.push(ClipRect::new(rect.x, rect.y, 0, 0));
            return false;
        };

        let kind = element.element_type();
        if is_container(kind) {
            self.buffer
                .fill_rect(rect.x, rect.y, rect.width, rect.height, attrs.background, Some(&clip));
            let widths = attrs.border_widths;
            if self.config.draw_borders && !widths.is_zero() {
                self.buffer.draw_border(
                    rect.x,
                    rect.y,
                    rect.width,
                    rect.height,
                    BorderStyle::for_width(widths.max()),
                    attrs.border_color,
                    None,
                    Some(&clip),
                );
            }
            let (top, right, bottom, left) = border_cells(&widths);
            let content = rect.inset(top, right, bottom, left);
            self.clips
                .push(content.intersect(&clip).unwrap_or(ClipRect::new(content.x, content.y, 0, 0)));
            return true;
        }

        if kind == ElementType::Text {
            if let Some(text) = &attrs.text {
                self.buffer
                    .fill_rect(rect.x, rect.y, rect.width, rect.height, attrs.background, Some(&clip));
                self.buffer
                    .draw_text(rect.x, rect.y, text, attrs.foreground, None, Some(&clip));
            }
        }
        self.clips.push(clip);
        false
    }

    fn leave(&mut self, _view: &ElementView<'_>) {
        self.clips.pop();
    }

    fn content_offset(&self, view: &ElementView<'_>) -> (u32, u32) {
        let widths = view.element.attributes().border_widths;
        let edge = |w: u8, cell: u16| if w > 0 { u32::from(w).max(u32::from(cell)) } else { 0 };
        (
            edge(widths.left, self.config.cell_width),
            edge(widths.top, self.config.cell_height),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::krb::{
        Document, DocumentHeader, ElementHeader, FORMAT_VERSION, PropertyEntry, PropertyId,
        StringTable, ValueType, resolve,
    };
    use crate::types::Rgba;

    fn sample() -> Forest {
        let mut panel = ElementHeader::new(ElementType::Container);
        panel.width = 80;
        panel.height = 64;
        panel.child_count = 1;
        panel.property_count = 2;

        let mut label = ElementHeader::new(ElementType::Text);
        label.pos_x = 8;
        label.pos_y = 16;
        label.width = 40;
        label.height = 16;
        label.property_count = 1;

        let doc = Document {
            header: DocumentHeader {
                version: FORMAT_VERSION,
                element_count: 2,
                style_count: 0,
                string_count: 1,
            },
            elements: vec![panel, label],
            styles: Vec::new(),
            properties: vec![
                vec![
                    PropertyEntry::color(PropertyId::BackgroundColor, 0x0000FFFF),
                    PropertyEntry::new(PropertyId::BorderWidth, ValueType::UInt8, [1]),
                ],
                vec![PropertyEntry::new(PropertyId::TextRef, ValueType::StringIndex, [0])],
            ],
            strings: StringTable::new(vec!["\"Hello\"".to_string()]),
        };
        let mut forest = Forest::build(&doc.elements).unwrap();
        resolve(&mut forest, &doc);
        forest
    }

    fn backend() -> TerminalBackend {
        TerminalBackend::new(TerminalConfig::default().with_frame_size(12, 5))
    }

    #[test]
    fn test_render_container_and_text() {
        let mut term = backend();
        let frame = term.render(&sample());

        // 80×64 units -> 10×4 cells; the border pushes content one cell in,
        // so the label lands at ((8 + 8) / 8, (16 + 16) / 16)
        assert_eq!(frame.get(0, 0).unwrap().char, '┌' as u32);
        assert_eq!(frame.get(9, 3).unwrap().char, '┘' as u32);
        assert_eq!(frame.get(2, 2).unwrap().char, 'H' as u32);
        assert_eq!(frame.get(2, 2).unwrap().fg, Rgba::WHITE);
        assert_eq!(frame.get(2, 2).unwrap().bg, Rgba::BLUE);
        assert_eq!(frame.get(0, 0).unwrap().fg, Rgba::GRAY);
        assert_eq!(frame.get(10, 0).unwrap().bg, Rgba::TERMINAL_DEFAULT);

        assert_eq!(
            term.plain_text(),
            "┌────────┐\n│        │\n│ Hello  │\n└────────┘\n"
        );
    }

    #[test]
    fn test_thin_border_keeps_child_off_the_edge() {
        let mut outer = ElementHeader::new(ElementType::Container);
        outer.width = 32;
        outer.height = 48;
        outer.child_count = 1;
        let mut inner = ElementHeader::new(ElementType::Container);
        inner.width = 8;
        inner.height = 16;

        let doc = Document {
            header: DocumentHeader {
                version: FORMAT_VERSION,
                element_count: 2,
                style_count: 0,
                string_count: 0,
            },
            elements: vec![outer, inner],
            styles: Vec::new(),
            properties: vec![
                vec![PropertyEntry::new(PropertyId::BorderWidth, ValueType::UInt8, [1])],
                vec![PropertyEntry::color(PropertyId::BackgroundColor, 0xFF0000FF)],
            ],
            strings: StringTable::default(),
        };
        let mut forest = Forest::build(&doc.elements).unwrap();
        resolve(&mut forest, &doc);

        let mut term = TerminalBackend::new(TerminalConfig::default().with_frame_size(4, 3));
        let frame = term.render(&forest);
        assert_eq!(frame.get(0, 0).unwrap().char, '┌' as u32);
        assert_eq!(frame.get(1, 1).unwrap().bg, Rgba::RED);
        assert_eq!(frame.get(0, 1).unwrap().char, '│' as u32);
    }

    #[test]
    fn test_render_at_offsets_roots() {
        let mut term = TerminalBackend::new(TerminalConfig::default().with_frame_size(14, 6));
        term.render_at(&sample(), (16, 16));
        assert_eq!(term.buffer().get(2, 1).unwrap().char, '┌' as u32);
        assert_eq!(term.buffer().get(4, 3).unwrap().char, 'H' as u32);
        assert_eq!(term.buffer().get(0, 0).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_borders_can_be_disabled() {
        let config = TerminalConfig {
            draw_borders: false,
            ..TerminalConfig::default().with_frame_size(12, 5)
        };
        let mut term = TerminalBackend::new(config);
        term.render(&sample());
        assert_eq!(term.buffer().get(0, 0).unwrap().char, ' ' as u32);
        assert_eq!(term.buffer().get(0, 0).unwrap().bg, Rgba::BLUE);
    }

    #[test]
    fn test_print_frame_wraps_with_clear_and_reset() {
        let mut term = backend();
        term.render(&sample());
        let mut out = Vec::new();
        term.print_frame(&mut out).unwrap();
        let text = String::from_utf8(out).unwrap();
        assert!(text.starts_with("\x1b[?2026h\x1b[2J\x1b[3J\x1b[H"));
        assert!(text.contains("Hello"));
        assert!(text.contains("\x1b[48;2;0;0;255m"));
        assert!(text.ends_with("\x1b[0m\x1b[?2026l\r\n"));
    }

    #[test]
    fn test_render_replaces_previous_frame() {
        let mut term = backend();
        term.render(&sample());
        term.render(&Forest::default());
        assert!(term.plain_text().trim().is_empty());
    }
}

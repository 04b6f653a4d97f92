//! FrameBuffer and drawing primitives.
//!
//! The FrameBuffer is a 2D grid of Cells. The terminal backend paints
//! element backgrounds, borders and text into it, then the output layer
//! turns it into escape sequences.
//!
//! # Design Decisions
//!
//! - **Flat storage**: Uses `Vec<Cell>` with row-major indexing.
//! - **Clipping**: All drawing functions accept an optional `ClipRect`.
//! - **Alpha blending**: Translucent backgrounds blend with existing cells.
//! - **Wide characters**: CJK and emoji use a continuation marker (char 0).

use unicode_width::UnicodeWidthChar;

use crate::types::{BorderStyle, Cell, ClipRect, Rgba};

// =============================================================================
// FrameBuffer
// =============================================================================

/// A 2D buffer of terminal cells.
///
/// Uses flat storage with row-major indexing: `index = y * width + x`
#[derive(Debug, Clone, PartialEq)]
pub struct FrameBuffer {
    width: u16,
    height: u16,
    cells: Vec<Cell>,
}

impl FrameBuffer {
    /// Create a new buffer filled with default cells.
    pub fn new(width: u16, height: u16) -> Self {
        let size = width as usize * height as usize;
        Self {
            width,
            height,
            cells: vec![Cell::default(); size],
        }
    }

    #[inline]
    pub fn width(&self) -> u16 {
        self.width
    }

    #[inline]
    pub fn height(&self) -> u16 {
        self.height
    }

    #[inline]
    fn index(&self, x: u16, y: u16) -> usize {
        y as usize * self.width as usize + x as usize
    }

    #[inline]
    pub fn in_bounds(&self, x: u16, y: u16) -> bool {
        x < self.width && y < self.height
    }

    /// Get a cell reference (returns None if out of bounds).
    #[inline]
    pub fn get(&self, x: u16, y: u16) -> Option<&Cell> {
        if self.in_bounds(x, y) {
            Some(&self.cells[self.index(x, y)])
        } else {
            None
        }
    }

    #[inline]
    fn get_mut(&mut self, x: u16, y: u16) -> Option<&mut Cell> {
        if self.in_bounds(x, y) {
            let idx = self.index(x, y);
            Some(&mut self.cells[idx])
        } else {
            None
        }
    }

    /// Raw cells, row-major.
    #[inline]
    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    /// Iterate over cells with their coordinates.
    pub fn iter(&self) -> impl Iterator<Item = (u16, u16, &Cell)> {
        let width = self.width.max(1) as usize;
        self.cells.iter().enumerate().map(move |(i, cell)| {
            let x = (i % width) as u16;
            let y = (i / width) as u16;
            (x, y, cell)
        })
    }

    /// Characters of row `y`, continuation cells skipped.
    pub fn row_text(&self, y: u16) -> String {
        if y >= self.height {
            return String::new();
        }
        let start = self.index(0, y);
        self.cells[start..start + self.width as usize]
            .iter()
            .filter(|c| c.char != 0)
            .filter_map(|c| char::from_u32(c.char))
            .collect()
    }

    // =========================================================================
    // Drawing Primitives
    // =========================================================================

    /// Set a single cell with optional clipping.
    ///
    /// Returns true if the cell was set.
    pub fn set_cell(&mut self, x: u16, y: u16, char: u32, fg: Rgba, bg: Rgba, clip: Option<&ClipRect>) -> bool {
        if !self.in_bounds(x, y) {
            return false;
        }
        if let Some(clip) = clip {
            if !clip.contains(x, y) {
                return false;
            }
        }

        let idx = self.index(x, y);
        let cell = &mut self.cells[idx];

        let blended_bg = if bg.is_opaque() || bg.is_terminal_default() {
            bg
        } else {
            Rgba::blend(bg, cell.bg)
        };

        cell.char = char;
        cell.fg = fg;
        cell.bg = blended_bg;

        true
    }

    /// Fill a rectangle with a background color.
    pub fn fill_rect(&mut self, x: u16, y: u16, width: u16, height: u16, bg: Rgba, clip: Option<&ClipRect>) {
        let x1 = x;
        let y1 = y;
        let x2 = x.saturating_add(width).min(self.width);
        let y2 = y.saturating_add(height).min(self.height);

        let (x1, y1, x2, y2) = if let Some(clip) = clip {
            let cx2 = clip.x.saturating_add(clip.width);
            let cy2 = clip.y.saturating_add(clip.height);
            (x1.max(clip.x), y1.max(clip.y), x2.min(cx2), y2.min(cy2))
        } else {
            (x1, y1, x2, y2)
        };

        if x2 <= x1 || y2 <= y1 {
            return;
        }

        let is_opaque = bg.is_opaque() || bg.is_terminal_default();

        for row in y1..y2 {
            let row_start = self.index(x1, row);
            let row_end = row_start + (x2 - x1) as usize;
            for cell in &mut self.cells[row_start..row_end] {
                if is_opaque {
                    cell.bg = bg;
                } else {
                    cell.bg = Rgba::blend(bg, cell.bg);
                }
                cell.char = b' ' as u32;
            }
        }
    }

    /// Draw a single character. `bg: None` keeps the cell's background.
    pub fn draw_char(&mut self, x: u16, y: u16, char: char, fg: Rgba, bg: Option<Rgba>, clip: Option<&ClipRect>) -> bool {
        let bg = bg.unwrap_or(Rgba::TRANSPARENT);
        self.set_cell(x, y, char as u32, fg, bg, clip)
    }

    /// Draw text at a position.
    ///
    /// Returns the number of columns used. Zero-width characters (combining
    /// marks, joiners) take no cell of their own.
    pub fn draw_text(&mut self, x: u16, y: u16, text: &str, fg: Rgba, bg: Option<Rgba>, clip: Option<&ClipRect>) -> u16 {
        let bg = bg.unwrap_or(Rgba::TRANSPARENT);
        let mut col = x;

        for ch in text.chars() {
            if col >= self.width {
                break;
            }

            let char_width = char_width(ch);
            if char_width == 0 {
                continue;
            }

            if self.set_cell(col, y, ch as u32, fg, bg, clip) && char_width == 2 && col + 1 < self.width {
                let next_visible = clip.is_none_or(|c| c.contains(col + 1, y));
                if let Some(next) = self.get_mut(col + 1, y) {
                    if next_visible {
                        next.char = 0;
                        next.fg = fg;
                        if !bg.is_transparent() {
                            next.bg = Rgba::blend(bg, next.bg);
                        }
                    }
                }
            }

            col = col.saturating_add(char_width as u16);
        }

        col.saturating_sub(x)
    }

    /// Draw a border around a rectangle.
    #[allow(clippy::too_many_arguments)]
    pub fn draw_border(
        &mut self,
        x: u16,
        y: u16,
        width: u16,
        height: u16,
        style: BorderStyle,
        color: Rgba,
        bg: Option<Rgba>,
        clip: Option<&ClipRect>,
    ) {
        if width < 2 || height < 2 || style == BorderStyle::None {
            return;
        }

        let (horiz, vert, tl, tr, br, bl) = style.chars();
        let x2 = x.saturating_add(width - 1);
        let y2 = y.saturating_add(height - 1);

        self.draw_char(x, y, tl, color, bg, clip);
        self.draw_char(x2, y, tr, color, bg, clip);
        self.draw_char(x2, y2, br, color, bg, clip);
        self.draw_char(x, y2, bl, color, bg, clip);

        for col in (x + 1)..x2 {
            self.draw_char(col, y, horiz, color, bg, clip);
            self.draw_char(col, y2, horiz, color, bg, clip);
        }

        for row in (y + 1)..y2 {
            self.draw_char(x, row, vert, color, bg, clip);
            self.draw_char(x2, row, vert, color, bg, clip);
        }
    }
}

// =============================================================================
// Text Width Utilities
// =============================================================================

/// Display width of a character in terminal cells.
///
/// - `0` for control characters, combining marks, zero-width characters
/// - `1` for normal-width characters
/// - `2` for wide characters (CJK, fullwidth forms, emoji)
#[inline]
pub fn char_width(c: char) -> usize {
    if c.is_control() {
        return 0;
    }
    // Emoji blocks render wide in practice, whatever East Asian Width says
    match c as u32 {
        0x2600..=0x27BF => 2,
        0x1F300..=0x1F5FF => 2,
        0x1F600..=0x1F64F => 2,
        0x1F680..=0x1F6FF => 2,
        0x1F900..=0x1F9FF => 2,
        0x1FA70..=0x1FAFF => 2,
        _ => c.width().unwrap_or(0),
    }
}

// =============================================================================
// Tests
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_framebuffer_creation() {
        let buffer = FrameBuffer::new(80, 24);
        assert_eq!(buffer.width(), 80);
        assert_eq!(buffer.height(), 24);
        assert_eq!(buffer.cells().len(), 80 * 24);
    }

    #[test]
    fn test_framebuffer_set_cell() {
        let mut buffer = FrameBuffer::new(10, 10);
        buffer.set_cell(5, 5, 'X' as u32, Rgba::RED, Rgba::BLACK, None);

        let cell = buffer.get(5, 5).unwrap();
        assert_eq!(cell.char, 'X' as u32);
        assert_eq!(cell.fg, Rgba::RED);
        assert_eq!(cell.bg, Rgba::BLACK);

        assert!(!buffer.set_cell(10, 0, 'Y' as u32, Rgba::RED, Rgba::BLACK, None));
    }

    #[test]
    fn test_framebuffer_fill_rect() {
        let mut buffer = FrameBuffer::new(20, 20);
        buffer.fill_rect(5, 5, 10, 10, Rgba::BLUE, None);

        assert_eq!(buffer.get(5, 5).unwrap().bg, Rgba::BLUE);
        assert_eq!(buffer.get(14, 14).unwrap().bg, Rgba::BLUE);
        assert_eq!(buffer.get(4, 5).unwrap().bg, Rgba::TERMINAL_DEFAULT);
        assert_eq!(buffer.get(15, 5).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_fill_rect_clips_to_buffer_and_clip() {
        let mut buffer = FrameBuffer::new(10, 10);
        buffer.fill_rect(8, 8, 100, 100, Rgba::RED, None);
        assert_eq!(buffer.get(9, 9).unwrap().bg, Rgba::RED);

        let clip = ClipRect::new(0, 0, 2, 2);
        buffer.fill_rect(0, 0, 5, 5, Rgba::GREEN, Some(&clip));
        assert_eq!(buffer.get(1, 1).unwrap().bg, Rgba::GREEN);
        assert_eq!(buffer.get(2, 2).unwrap().bg, Rgba::TERMINAL_DEFAULT);
    }

    #[test]
    fn test_draw_text_keeps_background() {
        let mut buffer = FrameBuffer::new(20, 5);
        buffer.fill_rect(0, 0, 20, 5, Rgba::BLUE, None);
        let used = buffer.draw_text(1, 0, "Hello", Rgba::WHITE, None, None);

        assert_eq!(used, 5);
        assert_eq!(buffer.get(1, 0).unwrap().char, 'H' as u32);
        assert_eq!(buffer.get(5, 0).unwrap().char, 'o' as u32);
        assert_eq!(buffer.get(1, 0).unwrap().bg, Rgba::BLUE);
        assert_eq!(buffer.row_text(0), " Hello              ");
    }

    #[test]
    fn test_draw_text_wide_char() {
        let mut buffer = FrameBuffer::new(6, 1);
        let used = buffer.draw_text(0, 0, "中a", Rgba::WHITE, None, None);
        assert_eq!(used, 3);
        assert_eq!(buffer.get(1, 0).unwrap().char, 0);
        assert_eq!(buffer.get(2, 0).unwrap().char, 'a' as u32);
    }

    #[test]
    fn test_draw_border() {
        let mut buffer = FrameBuffer::new(4, 3);
        buffer.draw_border(0, 0, 4, 3, BorderStyle::Single, Rgba::GRAY, None, None);
        assert_eq!(buffer.row_text(0), "┌──┐");
        assert_eq!(buffer.row_text(1), "│  │");
        assert_eq!(buffer.row_text(2), "└──┘");
        assert_eq!(buffer.get(0, 0).unwrap().fg, Rgba::GRAY);
    }

    #[test]
    fn test_char_width() {
        assert_eq!(char_width('a'), 1);
        assert_eq!(char_width('\n'), 0);
        assert_eq!(char_width('中'), 2);
        assert_eq!(char_width('🚀'), 2);
        assert_eq!(char_width('\u{0301}'), 0);
        assert_eq!(char_width('\u{200B}'), 0);
    }

    #[test]
    fn test_draw_text_combining_mark_shares_cell() {
        let mut buffer = FrameBuffer::new(4, 1);
        let used = buffer.draw_text(0, 0, "e\u{301}x", Rgba::WHITE, None, None);
        assert_eq!(used, 2);
        assert_eq!(buffer.get(1, 0).unwrap().char, 'x' as u32);
        assert_eq!(buffer.row_text(0), "ex  ");
    }

    #[test]
    fn test_draw_text_respects_clip() {
        let mut buffer = FrameBuffer::new(10, 1);
        let clip = ClipRect::new(2, 0, 3, 1);
        buffer.draw_text(0, 0, "abcdefgh", Rgba::WHITE, None, Some(&clip));
        assert_eq!(buffer.row_text(0), "  cde     ");
    }
}

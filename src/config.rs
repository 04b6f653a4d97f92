//! Backend configuration.
//!
//! Both configs default to the reference geometry. `from_env()` layers the
//! `KRB_*` environment variables on top; values that do not parse are
//! ignored.

use std::str::FromStr;

/// Cell width in document units.
pub const ENV_CELL_WIDTH: &str = "KRB_CELL_WIDTH";
/// Cell height in document units.
pub const ENV_CELL_HEIGHT: &str = "KRB_CELL_HEIGHT";
/// Pixel scale factor.
pub const ENV_SCALE: &str = "KRB_SCALE";

/// Frame size used when the terminal size cannot be queried.
pub const FALLBACK_FRAME_SIZE: (u16, u16) = (80, 24);

// =============================================================================
// Terminal
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TerminalConfig {
    /// Document units per terminal column.
    pub cell_width: u16,
    /// Document units per terminal row.
    pub cell_height: u16,
    /// Fixed frame size in cells; `None` asks the terminal.
    pub frame_size: Option<(u16, u16)>,
    pub draw_borders: bool,
}

impl Default for TerminalConfig {
    fn default() -> Self {
        Self {
            cell_width: 8,
            cell_height: 16,
            frame_size: None,
            draw_borders: true,
        }
    }
}

impl TerminalConfig {
    /// Defaults overridden by `KRB_CELL_WIDTH` / `KRB_CELL_HEIGHT`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Same as [`from_env`](Self::from_env) with a custom variable source.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(w) = parse_positive(lookup(ENV_CELL_WIDTH)) {
            config.cell_width = w;
        }
        if let Some(h) = parse_positive(lookup(ENV_CELL_HEIGHT)) {
            config.cell_height = h;
        }
        config
    }

    pub fn with_frame_size(mut self, columns: u16, rows: u16) -> Self {
        self.frame_size = Some((columns, rows));
        self
    }

    /// Frame size in cells: the override, else the live terminal, else 80×24.
    pub fn resolved_frame_size(&self) -> (u16, u16) {
        if let Some(size) = self.frame_size {
            return size;
        }
        match crossterm::terminal::size() {
            Ok((cols, rows)) if cols > 0 && rows > 0 => (cols, rows),
            _ => FALLBACK_FRAME_SIZE,
        }
    }
}

// =============================================================================
// Pixel
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PixelConfig {
    /// Multiplier from document units to pixels.
    pub scale: f32,
    pub min_width: u32,
    pub min_height: u32,
    /// Inset of text from its element's top-left corner.
    pub text_padding: u32,
    pub font_size: u32,
}

impl Default for PixelConfig {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_width: 10,
            min_height: 6,
            text_padding: 2,
            font_size: 20,
        }
    }
}

impl PixelConfig {
    /// Defaults overridden by `KRB_SCALE`.
    pub fn from_env() -> Self {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let mut config = Self::default();
        if let Some(scale) = parse::<f32>(lookup(ENV_SCALE)).filter(|s| s.is_finite() && *s > 0.0) {
            config.scale = scale;
        }
        config
    }
}

fn parse<T: FromStr>(value: Option<String>) -> Option<T> {
    value?.trim().parse().ok()
}

fn parse_positive(value: Option<String>) -> Option<u16> {
    parse::<u16>(value).filter(|v| *v > 0)
}

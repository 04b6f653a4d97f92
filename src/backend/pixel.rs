//! Pixel-surface backend.
//!
//! Produces a display list instead of drawing: a graphics front end replays
//! the [`DrawCommand`]s in order. Geometry follows the reference window
//! renderer (minimum 10×6 px boxes, 2 px text inset, 20 px font).

use std::fmt;

use log::debug;

use super::{ElementView, RenderAdapter, is_container, walk};
use crate::config::PixelConfig;
use crate::krb::{ElementType, Forest};
use crate::types::Rgba;

/// One primitive draw call in pixel space.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawCommand {
    FillRect {
        x: i32,
        y: i32,
        width: u32,
        height: u32,
        color: Rgba,
    },
    Text {
        x: i32,
        y: i32,
        text: String,
        font_size: u32,
        color: Rgba,
    },
}

impl fmt::Display for DrawCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DrawCommand::FillRect {
                x,
                y,
                width,
                height,
                color,
            } => write!(f, "fill {x} {y} {width}x{height} {color}"),
            DrawCommand::Text {
                x,
                y,
                text,
                font_size,
                color,
            } => write!(f, "text {x} {y} {font_size}px {color} {text:?}"),
        }
    }
}

/// Builds a display list from a resolved forest.
#[derive(Debug, Default)]
pub struct PixelBackend {
    config: PixelConfig,
    commands: Vec<DrawCommand>,
}

impl PixelBackend {
    pub fn new(config: PixelConfig) -> Self {
        Self {
            config,
            commands: Vec::new(),
        }
    }

    pub fn config(&self) -> &PixelConfig {
        &self.config
    }

    /// Replace the display list with the drawing of `forest`.
    pub fn render(&mut self, forest: &Forest) -> &[DrawCommand] {
        self.render_at(forest, (0, 0))
    }

    /// Like [`render`](Self::render), with roots placed relative to `origin`
    /// (document units).
    pub fn render_at(&mut self, forest: &Forest, origin: (u32, u32)) -> &[DrawCommand] {
        self.commands.clear();
        walk(forest, origin, self);
        debug!("display list: {} commands", self.commands.len());
        &self.commands
    }

    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    pub fn into_commands(self) -> Vec<DrawCommand> {
        self.commands
    }

    fn px(&self, units: u32) -> i32 {
        let scaled = (units as f64 * self.config.scale as f64).round();
        scaled.clamp(i32::MIN as f64, i32::MAX as f64) as i32
    }

    /// Scaled length, capped so it always fits an `i32` coordinate.
    fn extent(&self, units: u32) -> u32 {
        (units as f64 * self.config.scale as f64).round().clamp(0.0, i32::MAX as f64) as u32
    }

    fn fill(&mut self, x: i32, y: i32, width: u32, height: u32, color: Rgba) {
        self.commands.push(DrawCommand::FillRect {
            x,
            y,
            width,
            height,
            color,
        });
    }
}

impl RenderAdapter for PixelBackend {
    fn enter(&mut self, view: &ElementView<'_>) -> bool {
        let element = view.element;
        let attrs = element.attributes();

        let x = self.px(view.x);
        let y = self.px(view.y);
        let width = self.extent(view.width()).max(self.config.min_width);
        let height = self.extent(view.height()).max(self.config.min_height);

        debug!(
            "element {} {:?} at ({x}, {y}) size {width}x{height}",
            element.id().index(),
            element.element_type()
        );

        let kind = element.element_type();
        if is_container(kind) {
            self.fill(x, y, width, height, attrs.background);

            let widths = attrs.border_widths;
            let top = self.extent(widths.top as u32);
            let right = self.extent(widths.right as u32);
            let bottom = self.extent(widths.bottom as u32);
            let left = self.extent(widths.left as u32);
            let color = attrs.border_color;

            if top > 0 {
                self.fill(x, y, width, top, color);
            }
            if bottom > 0 {
                let by = y.saturating_add(signed(height)).saturating_sub(signed(bottom));
                self.fill(x, by, width, bottom, color);
            }
            if left > 0 {
                self.fill(x, y, left, height, color);
            }
            if right > 0 {
                let rx = x.saturating_add(signed(width)).saturating_sub(signed(right));
                self.fill(rx, y, right, height, color);
            }
            return true;
        }

        if kind == ElementType::Text {
            if let Some(text) = &attrs.text {
                self.fill(x, y, width, height, attrs.background);
                let pad = self.px(self.config.text_padding);
                self.commands.push(DrawCommand::Text {
                    x: x.saturating_add(pad),
                    y: y.saturating_add(pad),
                    text: text.clone(),
                    font_size: self.config.font_size,
                    color: attrs.foreground,
                });
            }
        }
        false
    }

    fn content_offset(&self, view: &ElementView<'_>) -> (u32, u32) {
        let widths = view.element.attributes().border_widths;
        (widths.left as u32, widths.top as u32)
    }
}

fn signed(v: u32) -> i32 {
    i32::try_from(v).unwrap_or(i32::MAX)
}

/// Display list for `forest` with the given geometry.
pub fn display_list(forest: &Forest, config: PixelConfig) -> Vec<DrawCommand> {
    let mut backend = PixelBackend::new(config);
    backend.render(forest);
    backend.into_commands()
}

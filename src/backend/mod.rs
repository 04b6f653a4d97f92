//! Render adapters.
//!
//! Backends pull from a resolved [`Forest`]; nothing in [`crate::krb`] calls
//! back into them. [`walk`] does the traversal and absolute positioning, a
//! [`RenderAdapter`] decides what to draw for each element.
//!
//! Coordinates handed to adapters are absolute document units. Each backend
//! maps units to its own space (pixels, terminal cells).

pub mod pixel;
pub mod terminal;

pub use pixel::{DrawCommand, PixelBackend};
pub use terminal::TerminalBackend;

use log::{info, warn};

use crate::krb::{Element, ElementId, ElementType, Forest, LoadedDocument};

/// One element as seen by an adapter.
#[derive(Debug, Clone, Copy)]
pub struct ElementView<'a> {
    pub element: &'a Element,
    /// Absolute x in document units.
    pub x: u32,
    /// Absolute y in document units.
    pub y: u32,
    /// Number of ancestors.
    pub depth: usize,
}

impl ElementView<'_> {
    pub fn width(&self) -> u32 {
        u32::from(self.element.size().0)
    }

    pub fn height(&self) -> u32 {
        u32::from(self.element.size().1)
    }
}

/// Backend hooks driven by [`walk`].
pub trait RenderAdapter {
    /// Draw `view`. Returns whether its children should be visited.
    fn enter(&mut self, view: &ElementView<'_>) -> bool;

    /// Called after `view` and all visited descendants.
    fn leave(&mut self, _view: &ElementView<'_>) {}

    /// Offset from an element's origin to where its children are placed.
    fn content_offset(&self, _view: &ElementView<'_>) -> (u32, u32) {
        (0, 0)
    }
}

/// Whether backends treat `kind` as a box that holds children.
pub fn is_container(kind: ElementType) -> bool {
    matches!(kind, ElementType::App | ElementType::Container)
}

enum Step {
    Enter { id: ElementId, origin: (u32, u32), depth: usize },
    Leave { id: ElementId, at: (u32, u32), depth: usize },
}

/// Visit every root of `forest` in order, pre-order within each tree,
/// placing roots relative to `origin`.
///
/// Iterative, so arbitrarily deep documents do not grow the call stack.
pub fn walk<A: RenderAdapter + ?Sized>(forest: &Forest, origin: (u32, u32), adapter: &mut A) {
    let mut stack: Vec<Step> = forest
        .roots()
        .iter()
        .rev()
        .map(|&id| Step::Enter { id, origin, depth: 0 })
        .collect();

    while let Some(step) = stack.pop() {
        match step {
            Step::Enter { id, origin, depth } => {
                let element = forest.element(id);
                let (px, py) = element.position();
                let view = ElementView {
                    element,
                    x: origin.0.saturating_add(u32::from(px)),
                    y: origin.1.saturating_add(u32::from(py)),
                    depth,
                };

                let descend = adapter.enter(&view);
                stack.push(Step::Leave {
                    id,
                    at: (view.x, view.y),
                    depth,
                });
                if descend {
                    let (dx, dy) = adapter.content_offset(&view);
                    let inner = (view.x.saturating_add(dx), view.y.saturating_add(dy));
                    stack.extend(element.children().iter().rev().map(|&child| Step::Enter {
                        id: child,
                        origin: inner,
                        depth: depth + 1,
                    }));
                }
            }
            Step::Leave { id, at, depth } => {
                let view = ElementView {
                    element: forest.element(id),
                    x: at.0,
                    y: at.1,
                    depth,
                };
                adapter.leave(&view);
            }
        }
    }
}

/// Log what a backend is about to draw: counts at info, every resolution
/// diagnostic at warn.
pub fn log_loaded(source: &str, loaded: &LoadedDocument) {
    let header = &loaded.document.header;
    info!(
        "{source}: format v{}, {} elements ({} roots), {} styles, {} strings",
        header.version,
        header.element_count,
        loaded.forest.roots().len(),
        header.style_count,
        header.string_count
    );
    for diagnostic in &loaded.diagnostics {
        warn!("{source}: {diagnostic}");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::krb::{ElementHeader, build};

    #[derive(Default)]
    struct Recorder {
        events: Vec<String>,
        skip: Option<usize>,
    }

    impl RenderAdapter for Recorder {
        fn enter(&mut self, view: &ElementView<'_>) -> bool {
            let index = view.element.id().index();
            self.events.push(format!("+{index}@{},{}d{}", view.x, view.y, view.depth));
            self.skip != Some(index)
        }

        fn leave(&mut self, view: &ElementView<'_>) {
            self.events.push(format!("-{}", view.element.id().index()));
        }

        fn content_offset(&self, _view: &ElementView<'_>) -> (u32, u32) {
            (1, 2)
        }
    }

    fn node(children: u8, x: u16, y: u16) -> ElementHeader {
        let mut h = ElementHeader::new(ElementType::Container);
        h.child_count = children;
        h.pos_x = x;
        h.pos_y = y;
        h
    }

    #[test]
    fn test_visits_pre_order_with_absolute_positions() {
        let forest = build(&[node(1, 10, 10), node(1, 5, 5), node(0, 1, 1), node(0, 0, 0)]).unwrap();
        let mut rec = Recorder::default();
        walk(&forest, (100, 0), &mut rec);
        assert_eq!(
            rec.events,
            vec![
                "+0@110,10d0",
                "+1@116,17d1",
                "+2@118,20d2",
                "-2",
                "-1",
                "-0",
                "+3@100,0d0",
                "-3",
            ]
        );
    }

    #[test]
    fn test_declined_children_are_skipped() {
        let forest = build(&[node(1, 0, 0), node(1, 0, 0), node(0, 0, 0)]).unwrap();
        let mut rec = Recorder {
            skip: Some(1),
            ..Default::default()
        };
        walk(&forest, (0, 0), &mut rec);
        assert_eq!(rec.events, vec!["+0@0,0d0", "+1@1,2d1", "-1", "-0"]);
    }

    #[test]
    fn test_deep_documents_walk_iteratively() {
        let mut headers = vec![node(1, 1, 0); 20_000];
        headers.push(node(0, 0, 0));
        let forest = build(&headers).unwrap();
        let mut rec = Recorder::default();
        walk(&forest, (0, 0), &mut rec);
        assert_eq!(rec.events.len(), 2 * forest.len());
    }
}

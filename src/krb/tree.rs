//! Flat pre-order array → forest.
//!
//! The document stores elements depth-first: each element is followed by the
//! complete encodings of its child subtrees. A single forward cursor consumes
//! one whole subtree per child, so grandchildren never get attributed to the
//! wrong parent.
//!
//! # Ownership
//!
//! The [`Forest`] owns every element in one arena, in document order. Parent
//! and child links are [`ElementId`]s into that arena, never shared pointers.
//! Because the order is pre-order, a parent's id is always smaller than its
//! children's ids.

use super::error::StructureError;
use super::model::{ElementHeader, ElementType};
use super::resolve::ResolvedAttributes;

/// Index of an element in its forest (equal to its position in the document).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(usize);

impl ElementId {
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// One node of the reconstructed tree.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Element {
    id: ElementId,
    header: ElementHeader,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    pub(crate) attributes: ResolvedAttributes,
}

impl Element {
    pub fn id(&self) -> ElementId {
        self.id
    }

    pub fn header(&self) -> &ElementHeader {
        &self.header
    }

    pub fn element_type(&self) -> ElementType {
        self.header.element_type
    }

    /// Position relative to the parent's content origin, in document units.
    pub fn position(&self) -> (u16, u16) {
        (self.header.pos_x, self.header.pos_y)
    }

    /// Size in document units.
    pub fn size(&self) -> (u16, u16) {
        (self.header.width, self.header.height)
    }

    pub fn parent(&self) -> Option<ElementId> {
        self.parent
    }

    pub fn children(&self) -> &[ElementId] {
        &self.children
    }

    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Resolved visual attributes. Meaningful once the forest went through
    /// [`resolve`](super::resolve::resolve).
    pub fn attributes(&self) -> &ResolvedAttributes {
        &self.attributes
    }
}

/// An ordered sequence of element trees.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Forest {
    elements: Vec<Element>,
    roots: Vec<ElementId>,
}

struct Frame {
    id: ElementId,
    remaining: usize,
}

impl Forest {
    /// Rebuild the forest encoded by a flat pre-order header array.
    pub fn build(headers: &[ElementHeader]) -> Result<Self, StructureError> {
        let mut forest = Forest {
            elements: Vec::with_capacity(headers.len()),
            roots: Vec::new(),
        };
        let mut stack: Vec<Frame> = Vec::new();
        let mut cursor = 0;

        while cursor < headers.len() {
            let root = forest.push(headers[cursor], None);
            cursor += 1;
            forest.roots.push(root);
            stack.push(Frame {
                id: root,
                remaining: headers[root.0].child_count as usize,
            });

            while let Some(top) = stack.last_mut() {
                if top.remaining == 0 {
                    stack.pop();
                    continue;
                }
                if cursor >= headers.len() {
                    return Err(StructureError::Overrun {
                        element: top.id.0,
                        missing: top.remaining,
                    });
                }
                top.remaining -= 1;
                let parent = top.id;

                let child = forest.push(headers[cursor], Some(parent));
                cursor += 1;
                forest.elements[parent.0].children.push(child);
                stack.push(Frame {
                    id: child,
                    remaining: headers[child.0].child_count as usize,
                });
            }
        }

        Ok(forest)
    }

    fn push(&mut self, header: ElementHeader, parent: Option<ElementId>) -> ElementId {
        let id = ElementId(self.elements.len());
        self.elements.push(Element {
            id,
            header,
            parent,
            children: Vec::with_capacity(header.child_count as usize),
            attributes: ResolvedAttributes::default(),
        });
        id
    }

    pub fn len(&self) -> usize {
        self.elements.len()
    }

    pub fn is_empty(&self) -> bool {
        self.elements.is_empty()
    }

    pub fn roots(&self) -> &[ElementId] {
        &self.roots
    }

    pub fn get(&self, id: ElementId) -> Option<&Element> {
        self.elements.get(id.0)
    }

    /// Element by id. Ids handed out by this forest are always valid.
    pub fn element(&self, id: ElementId) -> &Element {
        &self.elements[id.0]
    }

    pub fn parent(&self, id: ElementId) -> Option<&Element> {
        self.get(id)?.parent.map(|p| self.element(p))
    }

    pub fn children(&self, id: ElementId) -> impl Iterator<Item = &Element> {
        self.get(id)
            .map(|e| e.children.as_slice())
            .unwrap_or(&[])
            .iter()
            .map(|&c| self.element(c))
    }

    /// All elements in document (pre-)order.
    pub fn iter(&self) -> impl Iterator<Item = &Element> {
        self.elements.iter()
    }

    pub(crate) fn elements_mut(&mut self) -> &mut [Element] {
        &mut self.elements
    }

    /// Number of ancestors above `id`.
    pub fn depth(&self, id: ElementId) -> usize {
        let mut depth = 0;
        let mut current = self.get(id).and_then(|e| e.parent);
        while let Some(p) = current {
            depth += 1;
            current = self.element(p).parent;
        }
        depth
    }

    /// Flatten back to a pre-order header array with exact child counts.
    pub fn flatten(&self) -> Vec<ElementHeader> {
        let mut out = Vec::with_capacity(self.elements.len());
        let mut stack: Vec<ElementId> = self.roots.iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let element = self.element(id);
            let mut header = element.header;
            header.child_count = element.children.len().min(u8::MAX as usize) as u8;
            out.push(header);
            stack.extend(element.children.iter().rev().copied());
        }
        out
    }
}

/// Rebuild the forest encoded by a flat pre-order header array.
pub fn build(headers: &[ElementHeader]) -> Result<Forest, StructureError> {
    Forest::build(headers)
}

// =============================================================================
// Tests
// =============================================================================

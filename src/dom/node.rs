//! Tree records: elements and their attribute chains.
//!
//! Nodes and attributes live in flat per-document stores and refer to each
//! other by `u32` id, never by reference. All strings are arena spans.

use crate::arena::Span;

/// Compact node identifier (index into the document's node store).
pub type NodeId = u32;

/// Compact attribute identifier (index into the document's attribute store).
pub type AttrId = u32;

/// One element: name, a single content slot, tree links, attribute chain.
#[derive(Debug, Clone)]
pub struct Node {
    /// Element name.
    pub name: Span,
    /// Text content; empty when no text run was recorded.
    pub content: Span,
    /// Parent element, `None` for the root.
    pub parent: Option<NodeId>,
    /// First node in the child chain.
    pub first_child: Option<NodeId>,
    /// Previous sibling under the same parent.
    pub prev_sibling: Option<NodeId>,
    /// Next sibling under the same parent.
    pub next_sibling: Option<NodeId>,
    /// First attribute in the chain.
    pub attrs: Option<AttrId>,
    /// Number of nodes in the child chain.
    pub child_count: u32,
    /// Number of attributes in the chain.
    pub attr_count: u32,
}

impl Node {
    /// Fresh element with no links or attributes yet.
    pub(crate) fn element(name: Span, parent: Option<NodeId>) -> Node {
        Node {
            name,
            content: Span::EMPTY,
            parent,
            first_child: None,
            prev_sibling: None,
            next_sibling: None,
            attrs: None,
            child_count: 0,
            attr_count: 0,
        }
    }

    /// Whether a text run was recorded for this element.
    #[inline]
    pub fn has_content(&self) -> bool {
        !self.content.is_empty()
    }

    #[inline]
    pub fn has_children(&self) -> bool {
        self.first_child.is_some()
    }

    #[inline]
    pub fn has_attributes(&self) -> bool {
        self.attr_count > 0
    }
}

/// One key/value pair in an element's attribute chain.
#[derive(Debug, Clone)]
pub struct Attr {
    pub key: Span,
    /// Empty when the attribute appeared without `=` or recovery dropped
    /// the value.
    pub value: Span,
    /// Next attribute in the chain.
    pub next: Option<AttrId>,
}

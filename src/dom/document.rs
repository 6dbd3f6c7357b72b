//! Parsed document: flat node and attribute stores plus the arena that
//! owns every string in them.
//!
//! Storage model:
//! - Nodes and attributes in `Vec`s, addressed by `u32` id
//! - Strings as arena spans, resolved through the document's accessors
//! - The first recorded error and the source encoding ride along
//!
//! Dropping the document drops the arena and with it every string in the
//! tree; `into_arena` recycles the buckets for another parse instead.

use super::node::{Attr, AttrId, Node, NodeId};
use crate::arena::{Arena, Span};
use crate::codec::{self, Encoding};
use crate::error::{ErrorKind, ParseError};
use crate::parser::{self, ParseOptions};

/// Result of one parse. Never an `Err`: structural problems are recorded
/// on [`Document::error`] and the tree holds whatever was recovered.
pub struct Document {
    pub(crate) encoding: Encoding,
    pub(crate) error: Option<ParseError>,
    pub(crate) root: Option<NodeId>,
    pub(crate) nodes: Vec<Node>,
    pub(crate) attrs: Vec<Attr>,
    pub(crate) arena: Arena,
}

impl Document {
    /// Parses a byte slice with lenient defaults.
    pub fn parse(bytes: &[u8]) -> Document {
        Self::parse_with(bytes, &ParseOptions::default())
    }

    /// Parses in strict mode: a missing `<?xml ` prolog fails with
    /// [`ErrorKind::NoProlog`] and no root.
    pub fn parse_strict(bytes: &[u8]) -> Document {
        let options = ParseOptions {
            strict: true,
            ..ParseOptions::default()
        };
        Self::parse_with(bytes, &options)
    }

    /// Parses with explicit options.
    pub fn parse_with(bytes: &[u8], options: &ParseOptions) -> Document {
        match Arena::new(options.bucket_capacity) {
            Ok(arena) => parser::run(arena, bytes, options),
            Err(_) => Document::exhausted(options),
        }
    }

    /// Parses into a recycled arena. The arena is reset first and keeps
    /// the bucket capacity it was created with.
    pub fn parse_in(mut arena: Arena, bytes: &[u8], options: &ParseOptions) -> Document {
        arena.reset();
        parser::run(arena, bytes, options)
    }

    /// Tears the tree down and hands the arena back for reuse.
    pub fn into_arena(mut self) -> Arena {
        self.arena.reset();
        self.arena
    }

    /// Document shell for the case where even the initial bucket could not
    /// be reserved.
    fn exhausted(options: &ParseOptions) -> Document {
        Document {
            encoding: Encoding::Utf8,
            error: Some(ParseError::new(ErrorKind::OutOfMemory, 0)),
            root: None,
            nodes: Vec::new(),
            attrs: Vec::new(),
            arena: Arena::empty(options.bucket_capacity),
        }
    }

    /// First error recorded during the parse, `None` when it was clean.
    #[inline]
    pub fn error(&self) -> Option<ParseError> {
        self.error
    }

    /// Source encoding tag.
    #[inline]
    pub fn encoding(&self) -> Encoding {
        self.encoding
    }

    /// Root element id, `None` when no top-level element was found.
    #[inline]
    pub fn root(&self) -> Option<NodeId> {
        self.root
    }

    /// Node record by id.
    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id as usize)
    }

    /// Attribute record by id.
    pub fn attr(&self, id: AttrId) -> Option<&Attr> {
        self.attrs.get(id as usize)
    }

    /// Total number of nodes in the document.
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Element name as raw code points.
    pub fn name(&self, id: NodeId) -> &[u32] {
        match self.node(id) {
            Some(node) => self.resolve(node.name),
            None => &[],
        }
    }

    /// Element name re-encoded to UTF-8.
    pub fn name_str(&self, id: NodeId) -> String {
        string_from_cps(self.name(id))
    }

    /// Element text content as raw code points.
    pub fn content(&self, id: NodeId) -> &[u32] {
        match self.node(id) {
            Some(node) => self.resolve(node.content),
            None => &[],
        }
    }

    /// Element text content re-encoded to UTF-8.
    pub fn content_str(&self, id: NodeId) -> String {
        string_from_cps(self.content(id))
    }

    /// Value of the named attribute, re-encoded. `Some("")` means the
    /// attribute is present without a value.
    pub fn attribute(&self, id: NodeId, key: &str) -> Option<String> {
        for attr_id in self.attributes(id) {
            let attr = self.attr(attr_id)?;
            if codec::eq_str(self.resolve(attr.key), key) {
                return Some(string_from_cps(self.resolve(attr.value)));
            }
        }
        None
    }

    /// Attribute key re-encoded to UTF-8.
    pub fn attr_key_str(&self, id: AttrId) -> String {
        match self.attr(id) {
            Some(attr) => string_from_cps(self.resolve(attr.key)),
            None => String::new(),
        }
    }

    /// Attribute value re-encoded to UTF-8.
    pub fn attr_value_str(&self, id: AttrId) -> String {
        match self.attr(id) {
            Some(attr) => string_from_cps(self.resolve(attr.value)),
            None => String::new(),
        }
    }

    /// Child ids in document order.
    pub fn children(&self, id: NodeId) -> ChildIter<'_> {
        let first = self.node(id).and_then(|n| n.first_child);
        ChildIter { doc: self, next: first }
    }

    /// Attribute ids in document order.
    pub fn attributes(&self, id: NodeId) -> AttrIter<'_> {
        let first = self.node(id).and_then(|n| n.attrs);
        AttrIter { doc: self, next: first }
    }

    /// Descendant ids in preorder, the node itself excluded.
    pub fn descendants(&self, id: NodeId) -> DescendantIter<'_> {
        let first = self.node(id).and_then(|n| n.first_child);
        DescendantIter {
            doc: self,
            root: id,
            next: first,
        }
    }

    /// Number of children, by the parent's counter.
    pub fn child_count(&self, id: NodeId) -> u32 {
        self.node(id).map_or(0, |n| n.child_count)
    }

    /// Number of attributes, by the element's counter.
    pub fn attr_count(&self, id: NodeId) -> u32 {
        self.node(id).map_or(0, |n| n.attr_count)
    }

    /// Resolves any span issued by this document's arena.
    #[inline]
    pub fn resolve(&self, span: Span) -> &[u32] {
        &self.arena[span]
    }
}

/// Re-encode arena code points for display. Tree strings only ever hold
/// scalar values that survive validation, so the lossy step never actually
/// replaces anything.
fn string_from_cps(cps: &[u32]) -> String {
    String::from_utf8_lossy(&codec::encode_utf8(cps)).into_owned()
}

/// Iterator over a node's children via the sibling links.
pub struct ChildIter<'a> {
    doc: &'a Document,
    next: Option<NodeId>,
}

impl Iterator for ChildIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.node(current).and_then(|n| n.next_sibling);
        Some(current)
    }
}

/// Iterator over an element's attribute chain.
pub struct AttrIter<'a> {
    doc: &'a Document,
    next: Option<AttrId>,
}

impl Iterator for AttrIter<'_> {
    type Item = AttrId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.doc.attr(current).and_then(|a| a.next);
        Some(current)
    }
}

/// Iterator over descendants in preorder, walking the tree links directly
/// so no stack allocation is needed.
pub struct DescendantIter<'a> {
    doc: &'a Document,
    root: NodeId,
    next: Option<NodeId>,
}

impl Iterator for DescendantIter<'_> {
    type Item = NodeId;

    fn next(&mut self) -> Option<Self::Item> {
        let current = self.next?;
        self.next = self.successor(current);
        Some(current)
    }
}

impl DescendantIter<'_> {
    /// Preorder successor: first child, else next sibling, else the next
    /// sibling of the nearest ancestor still inside the iteration root.
    fn successor(&self, id: NodeId) -> Option<NodeId> {
        let node = self.doc.node(id)?;
        if let Some(child) = node.first_child {
            return Some(child);
        }
        let mut cur = id;
        loop {
            if cur == self.root {
                return None;
            }
            let node = self.doc.node(cur)?;
            if let Some(sibling) = node.next_sibling {
                return Some(sibling);
            }
            cur = node.parent?;
        }
    }
}

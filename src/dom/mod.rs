//! Tree model.
//!
//! - Flat node and attribute stores, addressed by `u32` id
//! - Parent, sibling, and child links as optional ids
//! - All strings held as arena spans, resolved through the document

pub mod document;
pub mod node;

pub use document::{AttrIter, ChildIter, DescendantIter, Document};
pub use node::{Attr, AttrId, Node, NodeId};

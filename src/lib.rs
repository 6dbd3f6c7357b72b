//! xmlgrove - non-validating, in-memory XML parsing
//!
//! Pipeline:
//! - UTF-8 decodes into 32-bit code points, U+FFFD for anything malformed (codec)
//! - every parse-time string lives in one bump arena (arena)
//! - a recursive-descent pass records the first structural error and
//!   recovers locally instead of aborting (parser)
//! - the tree is flat stores addressed by u32 ids (dom)
//!
//! Parsing never fails as a `Result`: the document always comes back, with
//! whatever tree could be recovered and the first error recorded on it.
//!
//! ```
//! use xmlgrove::Document;
//!
//! let doc = Document::parse(b"<greeting lang=\"en\">hi</greeting>");
//! let root = doc.root().unwrap();
//! assert_eq!(doc.name_str(root), "greeting");
//! assert_eq!(doc.attribute(root, "lang").as_deref(), Some("en"));
//! assert_eq!(doc.content_str(root), "hi");
//! assert!(doc.error().is_none());
//! ```

mod arena;
mod codec;
mod dom;
mod error;
mod parser;

pub use arena::{Arena, ArenaError, Span, DEFAULT_BUCKET_CAPACITY};
pub use codec::{decode_into, encode_utf8, eq_str, validate, Encoding, REPLACEMENT};
pub use dom::{Attr, AttrId, AttrIter, ChildIter, DescendantIter, Document, Node, NodeId};
pub use error::{ErrorKind, ParseError};
pub use parser::{ParseOptions, DEFAULT_MAX_DEPTH};

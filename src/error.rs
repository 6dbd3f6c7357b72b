//! Parse error surface.
//!
//! Structural errors are recorded on the document, never thrown: the first
//! one wins and parsing continues after resynchronizing. Only resource
//! exhaustion is fatal.

use thiserror::Error;

/// Classes of parse failure surfaced on a document.
///
/// `InvalidEofOrChar` and `UnexpectedText` are reserved for interface
/// parity and never produced here; `FileNotFound` belongs to file-loading
/// front ends, not the parsing core.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ErrorKind {
    #[error("missing xml prolog")]
    NoProlog,
    #[error("invalid attribute value")]
    InvalidAttrValue,
    #[error("invalid closing tag")]
    InvalidClosingTag,
    #[error("nesting depth limit exceeded")]
    DepthLimitExceeded,
    #[error("out of memory")]
    OutOfMemory,
    #[error("invalid end of input or character")]
    InvalidEofOrChar,
    #[error("unexpected text")]
    UnexpectedText,
    #[error("file not found")]
    FileNotFound,
}

/// The first error recorded during a parse. `offset` indexes the decoded
/// code point buffer (the same as a byte offset for ASCII input).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("{kind} at offset {offset}")]
pub struct ParseError {
    pub kind: ErrorKind,
    pub offset: u32,
}

impl ParseError {
    pub fn new(kind: ErrorKind, offset: u32) -> ParseError {
        ParseError { kind, offset }
    }
}

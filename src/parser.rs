//! Recursive-descent parser with local error recovery.
//!
//! All state rides in an explicit context: the arena, the decoded buffer,
//! one cursor position, the stores under construction, and the first
//! recorded error. Grammar problems resynchronize at the next `<` or `>`
//! and parsing carries on; only resource exhaustion and the nesting depth
//! bound stop a parse outright.

use tracing::{debug, trace};

use crate::arena::{Arena, ArenaError, Span, DEFAULT_BUCKET_CAPACITY};
use crate::codec::{self, Encoding};
use crate::dom::{Attr, AttrId, Document, Node, NodeId};
use crate::error::{ErrorKind, ParseError};

/// Default element nesting bound. Deep enough for any real document, small
/// enough that recursion cannot exhaust the stack on adversarial input.
pub const DEFAULT_MAX_DEPTH: u32 = 512;

/// Knobs for one parse. The default is lenient, with the standard depth
/// bound and bucket capacity.
#[derive(Debug, Clone)]
pub struct ParseOptions {
    /// Require the `<?xml ` prolog; without it the parse fails with
    /// `NoProlog` and no root.
    pub strict: bool,
    /// Maximum number of nested elements before the parse stops.
    pub max_depth: u32,
    /// Arena bucket capacity in code point cells.
    pub bucket_capacity: u32,
}

impl Default for ParseOptions {
    fn default() -> ParseOptions {
        ParseOptions {
            strict: false,
            max_depth: DEFAULT_MAX_DEPTH,
            bucket_capacity: DEFAULT_BUCKET_CAPACITY,
        }
    }
}

/// Fatal conditions. Everything else is recorded and recovered from.
enum Stop {
    OutOfMemory,
    TooDeep,
}

impl From<ArenaError> for Stop {
    fn from(_: ArenaError) -> Stop {
        Stop::OutOfMemory
    }
}

/// Everything one parse carries. No globals, reentrant by construction.
struct ParseCx<'o> {
    arena: Arena,
    /// Decoded code point buffer; `pos` indexes into it.
    buf: Span,
    pos: usize,
    nodes: Vec<Node>,
    attrs: Vec<Attr>,
    error: Option<ParseError>,
    options: &'o ParseOptions,
}

/// Decodes `bytes` into the arena and parses the document, consuming the
/// arena. Always returns a document; see [`Document::error`].
pub(crate) fn run(mut arena: Arena, bytes: &[u8], options: &ParseOptions) -> Document {
    trace!(len = bytes.len(), strict = options.strict, "parsing document");
    let buf = match codec::decode_into(&mut arena, bytes) {
        Ok(span) => span,
        Err(_) => {
            return Document {
                encoding: Encoding::Utf8,
                error: Some(ParseError::new(ErrorKind::OutOfMemory, 0)),
                root: None,
                nodes: Vec::new(),
                attrs: Vec::new(),
                arena,
            }
        }
    };
    let mut cx = ParseCx {
        arena,
        buf,
        pos: 0,
        nodes: Vec::new(),
        attrs: Vec::new(),
        error: None,
        options,
    };
    let root = match cx.parse_document() {
        Ok(root) => root,
        Err(stop) => {
            match stop {
                Stop::OutOfMemory => {
                    debug!(pos = cx.pos, "parse stopped: out of memory");
                    // exhaustion overrides any structural error seen earlier
                    cx.error = Some(ParseError::new(ErrorKind::OutOfMemory, cx.pos as u32));
                }
                Stop::TooDeep => debug!(pos = cx.pos, "parse stopped: depth limit"),
            }
            // the first node pushed is always the top-level element
            if cx.nodes.is_empty() {
                None
            } else {
                Some(0)
            }
        }
    };
    trace!(
        nodes = cx.nodes.len(),
        attrs = cx.attrs.len(),
        error = ?cx.error,
        "parse finished"
    );
    Document {
        encoding: Encoding::Utf8,
        error: cx.error,
        root,
        nodes: cx.nodes,
        attrs: cx.attrs,
        arena: cx.arena,
    }
}

impl ParseCx<'_> {
    fn parse_document(&mut self) -> Result<Option<NodeId>, Stop> {
        self.skip_bom();
        let has_prolog = self.skip_prolog();
        if self.options.strict && !has_prolog {
            self.record_error(ErrorKind::NoProlog, 0);
            return Ok(None);
        }
        self.parse_node(None, false, 0)
    }

    /// Parses one node at the cursor. `Ok(None)` means no node starts
    /// here: a closing tag (cursor left on its `<`), the end of input, or
    /// stray text where content is not allowed.
    fn parse_node(
        &mut self,
        parent: Option<NodeId>,
        allow_content: bool,
        depth: u32,
    ) -> Result<Option<NodeId>, Stop> {
        loop {
            self.skip_whitespace();
            let c = self.cur();
            if c == 0 {
                return Ok(None);
            }
            if c != '<' as u32 {
                if !allow_content {
                    return Ok(None);
                }
                self.parse_content(parent)?;
                continue;
            }
            if self.peek(1) == '!' as u32 {
                self.pos += 2;
                self.skip_comment();
                continue;
            }
            if self.peek(1) == '/' as u32 {
                return Ok(None);
            }
            if depth >= self.options.max_depth {
                self.record_error(ErrorKind::DepthLimitExceeded, self.pos as u32);
                return Err(Stop::TooDeep);
            }
            self.pos += 1;
            return self.parse_element(parent, depth).map(Some);
        }
    }

    /// Parses an element; the cursor sits just past its `<`.
    fn parse_element(&mut self, parent: Option<NodeId>, depth: u32) -> Result<NodeId, Stop> {
        let name = self.parse_name()?;
        let id = self.push_node(Node::element(name, parent))?;
        self.parse_attributes(id)?;
        if self.at('>') {
            self.pos += 1;
        }
        let mut last_child: Option<NodeId> = None;
        while let Some(child) = self.parse_node(Some(id), true, depth + 1)? {
            self.link_child(id, child, last_child);
            last_child = Some(child);
        }
        self.parse_closing(id);
        Ok(id)
    }

    /// A name runs until the end of input, whitespace, `=`, or `>`. `/` is
    /// an ordinary name character: self-closing tags are not part of this
    /// grammar.
    fn parse_name(&mut self) -> Result<Span, Stop> {
        let start = self.pos;
        loop {
            let c = self.cur();
            if c == 0 || is_whitespace(c) || c == '=' as u32 || c == '>' as u32 {
                break;
            }
            self.pos += 1;
        }
        self.copy_range(start, self.pos)
    }

    /// Parses `key="value"` pairs until `>` or the end of input. A bare
    /// key keeps an empty value. A value that is not quoted records
    /// `InvalidAttrValue` and resynchronizes at the tag's `>`.
    fn parse_attributes(&mut self, node: NodeId) -> Result<(), Stop> {
        let mut last_attr: Option<AttrId> = None;
        loop {
            self.skip_whitespace();
            let c = self.cur();
            if c == '>' as u32 || c == 0 {
                return Ok(());
            }
            let key = self.parse_name()?;
            let mut value = Span::EMPTY;
            self.skip_whitespace();
            if self.at('=') {
                self.pos += 1;
                self.skip_whitespace();
                let q = self.cur();
                if q == '"' as u32 || q == '\'' as u32 {
                    self.pos += 1;
                    value = self.parse_quoted(q)?;
                } else {
                    self.record_error(ErrorKind::InvalidAttrValue, self.pos as u32);
                    self.push_attr(node, key, value, last_attr)?;
                    self.seek('>' as u32);
                    return Ok(());
                }
            }
            let id = self.push_attr(node, key, value, last_attr)?;
            last_attr = Some(id);
        }
    }

    /// Everything up to the closing quote (or the end of input) is the
    /// value, whitespace included.
    fn parse_quoted(&mut self, quote: u32) -> Result<Span, Stop> {
        let start = self.pos;
        while self.cur() != 0 && self.cur() != quote {
            self.pos += 1;
        }
        let value = self.copy_range(start, self.pos)?;
        if self.cur() == quote {
            self.pos += 1;
        }
        Ok(value)
    }

    /// A text run reaches to the next `<` or the end of input and lands in
    /// the parent's single content slot; a later run overwrites an earlier
    /// one.
    fn parse_content(&mut self, parent: Option<NodeId>) -> Result<(), Stop> {
        let start = self.pos;
        while self.cur() != 0 && !self.at('<') {
            self.pos += 1;
        }
        let content = self.copy_range(start, self.pos)?;
        if let Some(id) = parent {
            self.nodes[id as usize].content = content;
        }
        Ok(())
    }

    /// Matches `</name>` against the element's name. A mismatch records
    /// `InvalidClosingTag` and resynchronizes at the next `<`, handing the
    /// unmatched tag to an enclosing element. At the end of input the
    /// branch just ends, silently.
    fn parse_closing(&mut self, id: NodeId) {
        if self.cur() == 0 {
            return;
        }
        // cursor sits on the '<' of '</'
        self.pos += 2;
        let start = self.pos;
        loop {
            let c = self.cur();
            if c == 0 || is_whitespace(c) || c == '>' as u32 {
                break;
            }
            self.pos += 1;
        }
        let name = self.nodes[id as usize].name;
        if self.range_equals(name, start, self.pos) {
            self.skip_past('>' as u32);
        } else {
            self.record_error(ErrorKind::InvalidClosingTag, start as u32);
            self.seek('<' as u32);
        }
    }

    /// Consumes `<?xml ...>` when present, returning whether it was. A
    /// prolog that never closes before the end of input counts as missing.
    fn skip_prolog(&mut self) -> bool {
        if !self.match_lit("<?xml ") {
            return false;
        }
        self.seek('>' as u32);
        if !self.at('>') {
            return false;
        }
        self.pos += 1;
        true
    }

    /// A leading byte order mark decodes to U+FEFF; skip it.
    fn skip_bom(&mut self) {
        if self.cur() == codec::BOM {
            self.pos += 1;
        }
    }

    /// Cursor sits just past `<!`. The next two characters are skipped
    /// unexamined, then everything through `-->` is discarded. An
    /// unterminated comment swallows the rest of the input.
    fn skip_comment(&mut self) {
        self.pos += 2;
        loop {
            self.seek('-' as u32);
            if self.cur() == 0 {
                return;
            }
            if self.match_lit("-->") {
                return;
            }
            self.pos += 1;
        }
    }

    /// First error wins; later ones are dropped.
    fn record_error(&mut self, kind: ErrorKind, offset: u32) {
        debug!(?kind, offset, "parse error");
        if self.error.is_none() {
            self.error = Some(ParseError::new(kind, offset));
        }
    }

    /// Appends a child to the parent's chain and bumps its counter.
    fn link_child(&mut self, parent: NodeId, child: NodeId, last: Option<NodeId>) {
        match last {
            Some(prev) => {
                self.nodes[prev as usize].next_sibling = Some(child);
                self.nodes[child as usize].prev_sibling = Some(prev);
            }
            None => self.nodes[parent as usize].first_child = Some(child),
        }
        self.nodes[parent as usize].child_count += 1;
    }

    fn push_node(&mut self, node: Node) -> Result<NodeId, Stop> {
        self.nodes.try_reserve(1).map_err(|_| Stop::OutOfMemory)?;
        let id = self.nodes.len() as NodeId;
        self.nodes.push(node);
        Ok(id)
    }

    fn push_attr(
        &mut self,
        node: NodeId,
        key: Span,
        value: Span,
        last: Option<AttrId>,
    ) -> Result<AttrId, Stop> {
        self.attrs.try_reserve(1).map_err(|_| Stop::OutOfMemory)?;
        let id = self.attrs.len() as AttrId;
        self.attrs.push(Attr {
            key,
            value,
            next: None,
        });
        match last {
            Some(prev) => self.attrs[prev as usize].next = Some(id),
            None => self.nodes[node as usize].attrs = Some(id),
        }
        self.nodes[node as usize].attr_count += 1;
        Ok(id)
    }

    /// Copies buffer cells `[start, end)` into a fresh arena string.
    fn copy_range(&mut self, start: usize, end: usize) -> Result<Span, Stop> {
        let span = self
            .arena
            .alloc_copy(self.buf, start as u32, (end - start) as u32)?;
        Ok(span)
    }

    /// Compares an arena string against buffer cells `[start, end)`.
    fn range_equals(&self, name: Span, start: usize, end: usize) -> bool {
        let buf = &self.arena[self.buf];
        let name = &self.arena[name];
        name.len() == end - start && name == &buf[start..end]
    }

    /// Code point at the cursor; 0 past the end of the buffer.
    #[inline]
    fn cur(&self) -> u32 {
        let buf = &self.arena[self.buf];
        buf.get(self.pos).copied().unwrap_or(0)
    }

    /// Code point `ahead` positions past the cursor; 0 past the end.
    #[inline]
    fn peek(&self, ahead: usize) -> u32 {
        let buf = &self.arena[self.buf];
        buf.get(self.pos + ahead).copied().unwrap_or(0)
    }

    #[inline]
    fn at(&self, ch: char) -> bool {
        self.cur() == ch as u32
    }

    fn skip_whitespace(&mut self) {
        while is_whitespace(self.cur()) {
            self.pos += 1;
        }
    }

    /// Matches an ASCII literal at the cursor, consuming it on success and
    /// restoring the position on failure.
    fn match_lit(&mut self, lit: &str) -> bool {
        let start = self.pos;
        for b in lit.bytes() {
            if self.cur() != b as u32 {
                self.pos = start;
                return false;
            }
            self.pos += 1;
        }
        true
    }

    /// Scans forward to `c`, leaving the cursor on it, or at the end of
    /// input when it never appears.
    fn seek(&mut self, c: u32) {
        while self.cur() != 0 && self.cur() != c {
            self.pos += 1;
        }
    }

    /// Scans forward to `c` and one past it when found.
    fn skip_past(&mut self, c: u32) {
        self.seek(c);
        if self.cur() == c {
            self.pos += 1;
        }
    }
}

#[inline]
fn is_whitespace(c: u32) -> bool {
    matches!(c, 0x20 | 0x09 | 0x0D | 0x0A)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn cx_over<'o>(arena: Arena, bytes: &[u8], options: &'o ParseOptions) -> ParseCx<'o> {
        let mut arena = arena;
        let buf = codec::decode_into(&mut arena, bytes).unwrap();
        ParseCx {
            arena,
            buf,
            pos: 0,
            nodes: Vec::new(),
            attrs: Vec::new(),
            error: None,
            options,
        }
    }

    #[test]
    fn test_match_lit_restores_on_failure() {
        let options = ParseOptions::default();
        let mut cx = cx_over(Arena::new(64).unwrap(), b"<?xmlX", &options);
        assert!(!cx.match_lit("<?xml "));
        assert_eq!(cx.pos, 0);
        assert!(cx.match_lit("<?xml"));
        assert_eq!(cx.pos, 5);
    }

    #[test]
    fn test_seek_lands_on_target_or_end() {
        let options = ParseOptions::default();
        let mut cx = cx_over(Arena::new(64).unwrap(), b"abc>def", &options);
        cx.seek('>' as u32);
        assert!(cx.at('>'));
        cx.seek('!' as u32);
        assert_eq!(cx.cur(), 0);
    }

    #[test]
    fn test_cursor_synthesizes_terminator() {
        let options = ParseOptions::default();
        let mut cx = cx_over(Arena::new(64).unwrap(), b"ab", &options);
        cx.pos = 5;
        assert_eq!(cx.cur(), 0);
        assert_eq!(cx.peek(3), 0);
    }

    #[test]
    fn test_skip_comment_empty_and_padded() {
        let options = ParseOptions::default();
        // cursor starts past "<!"
        let mut cx = cx_over(Arena::new(64).unwrap(), b"----->rest", &options);
        cx.skip_comment();
        assert!(cx.at('r'));

        let mut cx = cx_over(Arena::new(64).unwrap(), b"-- a-b -->rest", &options);
        cx.skip_comment();
        assert!(cx.at('r'));
    }

    #[test]
    fn test_skip_comment_unterminated_swallows_input() {
        let options = ParseOptions::default();
        let mut cx = cx_over(Arena::new(64).unwrap(), b"-- never closed", &options);
        cx.skip_comment();
        assert_eq!(cx.cur(), 0);
    }

    #[test]
    fn test_prolog_requires_exact_prefix() {
        let options = ParseOptions::default();
        let mut cx = cx_over(Arena::new(64).unwrap(), b"<?xml version=\"1.0\"?><r>", &options);
        assert!(cx.skip_prolog());
        assert!(cx.at('<'));

        let mut cx = cx_over(Arena::new(64).unwrap(), b"<?XML ?>", &options);
        assert!(!cx.skip_prolog());
        assert_eq!(cx.pos, 0);
    }

    #[test]
    fn test_record_error_keeps_first() {
        let options = ParseOptions::default();
        let mut cx = cx_over(Arena::new(64).unwrap(), b"", &options);
        cx.record_error(ErrorKind::InvalidAttrValue, 7);
        cx.record_error(ErrorKind::InvalidClosingTag, 9);
        let err = cx.error.unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidAttrValue);
        assert_eq!(err.offset, 7);
    }

    #[test]
    fn test_name_stops_at_delimiters() {
        let options = ParseOptions::default();
        let mut cx = cx_over(Arena::new(64).unwrap(), b"ab/cd=rest", &options);
        let name = cx.parse_name().ok().unwrap();
        assert_eq!(&cx.arena[name], &['a' as u32, 'b' as u32, '/' as u32, 'c' as u32, 'd' as u32]);
        assert!(cx.at('='));
    }

    #[test]
    fn test_minimal_element() {
        let doc = Document::parse(b"<x></x>");
        let root = doc.root().unwrap();
        assert_eq!(doc.name_str(root), "x");
        assert_eq!(doc.child_count(root), 0);
        assert_eq!(doc.attr_count(root), 0);
        assert!(doc.content(root).is_empty());
        assert!(doc.error().is_none());
        assert_eq!(doc.encoding(), Encoding::Utf8);
    }

    #[test]
    fn test_attributes_and_content() {
        let doc = Document::parse(b"<a k=\"v\">hi</a>");
        let root = doc.root().unwrap();
        assert_eq!(doc.attribute(root, "k").as_deref(), Some("v"));
        assert_eq!(doc.content_str(root), "hi");
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_mismatched_closing_tag() {
        let doc = Document::parse(b"<a></b>");
        let err = doc.error().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidClosingTag);
        assert_eq!(err.offset, 5);
        // the tree built so far is kept
        let root = doc.root().unwrap();
        assert_eq!(doc.name_str(root), "a");
    }

    #[test]
    fn test_strict_missing_prolog() {
        let doc = Document::parse_strict(b"<a></a>");
        let err = doc.error().unwrap();
        assert_eq!(err.kind, ErrorKind::NoProlog);
        assert_eq!(err.offset, 0);
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_strict_with_prolog() {
        let doc = Document::parse_strict(b"<?xml version=\"1.0\"?><r></r>");
        assert!(doc.error().is_none());
        assert_eq!(doc.name_str(doc.root().unwrap()), "r");
    }

    #[test]
    fn test_strict_unterminated_prolog() {
        let doc = Document::parse_strict(b"<?xml version=\"1.0\"");
        let err = doc.error().unwrap();
        assert_eq!(err.kind, ErrorKind::NoProlog);
        assert_eq!(err.offset, 0);
        assert!(doc.root().is_none());

        // lenient mode: the input holds no element either way
        let doc = Document::parse(b"<?xml version=\"1.0\"");
        assert!(doc.error().is_none());
        assert!(doc.root().is_none());
    }

    #[test]
    fn test_bom_before_prolog() {
        let doc = Document::parse_strict(b"\xEF\xBB\xBF<?xml version=\"1.0\"?><r></r>");
        assert!(doc.error().is_none());
        assert_eq!(doc.name_str(doc.root().unwrap()), "r");
    }

    #[test]
    fn test_comments_between_elements() {
        let doc = Document::parse(b"<!-- head --><r><!----><a></a><!-- tail --></r>");
        let root = doc.root().unwrap();
        assert_eq!(doc.name_str(root), "r");
        assert_eq!(doc.child_count(root), 1);
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_last_text_run_wins() {
        let doc = Document::parse(b"<a>one<b></b>two</a>");
        let root = doc.root().unwrap();
        assert_eq!(doc.content_str(root), "two");
        assert_eq!(doc.child_count(root), 1);
    }

    #[test]
    fn test_attribute_without_value() {
        let doc = Document::parse(b"<a flag k=\"v\"></a>");
        let root = doc.root().unwrap();
        assert_eq!(doc.attribute(root, "flag").as_deref(), Some(""));
        assert_eq!(doc.attribute(root, "k").as_deref(), Some("v"));
        assert_eq!(doc.attr_count(root), 2);
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_attr_count_matches_long_chain() {
        // enough bare attributes to outgrow a 16-bit counter
        let mut xml = String::from("<a");
        for i in 0..70_000 {
            xml.push_str(&format!(" k{i}"));
        }
        xml.push('>');
        let doc = Document::parse(xml.as_bytes());
        let root = doc.root().unwrap();
        assert_eq!(doc.attributes(root).count(), 70_000);
        assert_eq!(doc.attr_count(root), 70_000);
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_single_quotes_and_spaced_equals() {
        let doc = Document::parse(b"<a k = 'v w'></a>");
        let root = doc.root().unwrap();
        assert_eq!(doc.attribute(root, "k").as_deref(), Some("v w"));
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_unquoted_value_recovers_into_children() {
        let doc = Document::parse(b"<a k=5>text</a>");
        let err = doc.error().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidAttrValue);
        let root = doc.root().unwrap();
        // the key survives with an empty value and the element still parses
        assert_eq!(doc.attribute(root, "k").as_deref(), Some(""));
        assert_eq!(doc.content_str(root), "text");
    }

    #[test]
    fn test_bad_closing_hands_rest_to_parent() {
        let doc = Document::parse(b"<r><a></x><b></b></r>");
        let err = doc.error().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidClosingTag);
        let root = doc.root().unwrap();
        let names: Vec<String> = doc.children(root).map(|id| doc.name_str(id)).collect();
        assert_eq!(names, ["a", "b"]);
    }

    #[test]
    fn test_first_error_wins_over_later_ones() {
        let doc = Document::parse(b"<a x=1></b>");
        let err = doc.error().unwrap();
        assert_eq!(err.kind, ErrorKind::InvalidAttrValue);
        assert_eq!(err.offset, 5);
    }

    #[test]
    fn test_stray_top_level_text_gives_no_root() {
        let doc = Document::parse(b"hello <a></a>");
        assert!(doc.root().is_none());
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_only_first_top_level_element_parses() {
        let doc = Document::parse(b"<a></a><b></b>");
        let root = doc.root().unwrap();
        assert_eq!(doc.name_str(root), "a");
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_unclosed_elements_end_silently() {
        let doc = Document::parse(b"<a><b>");
        assert!(doc.error().is_none());
        let root = doc.root().unwrap();
        assert_eq!(doc.child_count(root), 1);
        let b = doc.children(root).next().unwrap();
        assert_eq!(doc.name_str(b), "b");
    }

    #[test]
    fn test_depth_limit_stops_with_partial_tree() {
        let options = ParseOptions {
            max_depth: 2,
            ..ParseOptions::default()
        };
        let doc = Document::parse_with(b"<a><b><c></c></b></a>", &options);
        let err = doc.error().unwrap();
        assert_eq!(err.kind, ErrorKind::DepthLimitExceeded);
        assert_eq!(err.offset, 6);
        assert_eq!(doc.name_str(doc.root().unwrap()), "a");

        let relaxed = ParseOptions {
            max_depth: 3,
            ..ParseOptions::default()
        };
        let doc = Document::parse_with(b"<a><b><c></c></b></a>", &relaxed);
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_multibyte_names_and_values() {
        let xml = "<caf\u{e9} l\u{e4}ng=\"s\u{fc}\u{df}\">t\u{20ac}xt</caf\u{e9}>";
        let doc = Document::parse(xml.as_bytes());
        let root = doc.root().unwrap();
        assert_eq!(doc.name_str(root), "caf\u{e9}");
        assert_eq!(doc.attribute(root, "l\u{e4}ng").as_deref(), Some("s\u{fc}\u{df}"));
        assert_eq!(doc.content_str(root), "t\u{20ac}xt");
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_malformed_bytes_surface_as_replacement() {
        let doc = Document::parse(b"<a>\xFFx</a>");
        let root = doc.root().unwrap();
        assert_eq!(doc.content_str(root), "\u{FFFD}x");
        assert!(doc.error().is_none());
    }

    #[test]
    fn test_embedded_nul_ends_input() {
        let doc = Document::parse(b"<a>x\0</a>ignored");
        let root = doc.root().unwrap();
        assert_eq!(doc.content_str(root), "x");
        assert!(doc.error().is_none());
        assert_eq!(doc.node_count(), 1);
    }

    #[test]
    fn test_empty_input() {
        let doc = Document::parse(b"");
        assert!(doc.root().is_none());
        assert!(doc.error().is_none());
        assert_eq!(doc.node_count(), 0);
    }

    #[test]
    fn test_error_display() {
        let doc = Document::parse(b"<a></b>");
        let err = doc.error().unwrap();
        assert_eq!(err.to_string(), "invalid closing tag at offset 5");
    }
}

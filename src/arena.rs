//! Bump-style region allocator for parse-time strings.
//!
//! Storage model:
//! - Fixed-capacity buckets of `u32` code point cells, appended as they fill
//! - `Span` handles (bucket, start, len) instead of raw pointers
//! - Single-level rollback supporting the worst-case-then-shrink pattern
//! - `reset` keeps the first bucket so an arena can carry over to a new parse
//!
//! Nothing is freed per allocation; the whole region is dropped or reset at
//! once.

use std::ops::{Index, IndexMut};

use thiserror::Error;
use tracing::trace;

/// Bucket capacity used by the default parse options: 512 KiB of cells.
pub const DEFAULT_BUCKET_CAPACITY: u32 = 128 * 1024;

/// Allocation failure. Bucket storage is reserved with `try_reserve_exact`,
/// so running out of host memory surfaces here instead of aborting.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum ArenaError {
    #[error("out of memory reserving an arena bucket of {requested} cells")]
    OutOfMemory { requested: u32 },
}

/// Handle to one arena allocation: `len` cells at `start` in bucket `bucket`.
///
/// String allocations carry one terminator cell (0) beyond `len`; the span
/// never exposes it. A span is only meaningful to the arena that issued it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Span {
    bucket: u32,
    start: u32,
    len: u32,
}

impl Span {
    /// The zero-length span; resolves to an empty slice in any arena.
    pub const EMPTY: Span = Span {
        bucket: 0,
        start: 0,
        len: 0,
    };

    /// Length in cells, terminator excluded for string allocations.
    #[inline]
    pub fn len(self) -> u32 {
        self.len
    }

    #[inline]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }

    /// Shortens the view onto an allocation; cells past `len` stay allocated.
    #[inline]
    pub fn truncate(self, len: u32) -> Span {
        debug_assert!(len <= self.len);
        Span { len, ..self }
    }
}

/// One fixed-capacity cell region. `used` is the bump cursor.
struct Bucket {
    cells: Vec<u32>,
    used: u32,
}

impl Bucket {
    fn new(capacity: u32) -> Result<Bucket, ArenaError> {
        let mut cells = Vec::new();
        cells
            .try_reserve_exact(capacity as usize)
            .map_err(|_| ArenaError::OutOfMemory {
                requested: capacity,
            })?;
        cells.resize(capacity as usize, 0);
        Ok(Bucket { cells, used: 0 })
    }

    #[inline]
    fn capacity(&self) -> u32 {
        self.cells.len() as u32
    }

    #[inline]
    fn remaining(&self) -> u32 {
        self.capacity() - self.used
    }
}

/// Bump allocator over a growable list of fixed-capacity buckets.
pub struct Arena {
    buckets: Vec<Bucket>,
    bucket_capacity: u32,
    /// Owning bucket and length of the most recent allocation, for `undo_last`.
    last: Option<(u32, u32)>,
}

impl Arena {
    /// Creates an arena with one bucket of `bucket_capacity` cells.
    pub fn new(bucket_capacity: u32) -> Result<Arena, ArenaError> {
        Ok(Arena {
            buckets: vec![Bucket::new(bucket_capacity)?],
            bucket_capacity,
            last: None,
        })
    }

    /// Arena with no backing store; the first `alloc` opens a bucket. Used
    /// for the document shell when even the initial bucket cannot be
    /// reserved.
    pub(crate) fn empty(bucket_capacity: u32) -> Arena {
        Arena {
            buckets: Vec::new(),
            bucket_capacity,
            last: None,
        }
    }

    /// Bumps the current bucket's cursor by `len` cells. When the request
    /// does not fit, a new bucket is appended: the standard capacity, or a
    /// dedicated bucket sized to fit for oversized requests, so one
    /// allocation never straddles two buckets.
    pub fn alloc(&mut self, len: u32) -> Result<Span, ArenaError> {
        if self.buckets.is_empty() || self.current().remaining() < len {
            self.grow(len)?;
        }
        let bucket_idx = (self.buckets.len() - 1) as u32;
        let bucket = &mut self.buckets[bucket_idx as usize];
        let start = bucket.used;
        bucket.used += len;
        self.last = Some((bucket_idx, len));
        Ok(Span {
            bucket: bucket_idx,
            start,
            len,
        })
    }

    /// Copies `len` cells at `offset` within `src` into a fresh
    /// terminator-backed string allocation, returning the `len`-cell span.
    pub fn alloc_copy(&mut self, src: Span, offset: u32, len: u32) -> Result<Span, ArenaError> {
        debug_assert!(offset + len <= src.len);
        let dst = self.alloc(len + 1)?;
        let src_start = (src.start + offset) as usize;
        let n = len as usize;
        if src.bucket == dst.bucket {
            // dst sits above src in the same bucket, so the borrow splits
            // cleanly at dst.start.
            let cells = &mut self.buckets[dst.bucket as usize].cells;
            let (lo, hi) = cells.split_at_mut(dst.start as usize);
            hi[..n].copy_from_slice(&lo[src_start..src_start + n]);
            hi[n] = 0;
        } else {
            // dst was opened after src, so its bucket index is the larger.
            let (lo, hi) = self.buckets.split_at_mut(dst.bucket as usize);
            let src_cells = &lo[src.bucket as usize].cells;
            let dst_cells = &mut hi[0].cells;
            let d = dst.start as usize;
            dst_cells[d..d + n].copy_from_slice(&src_cells[src_start..src_start + n]);
            dst_cells[d + n] = 0;
        }
        Ok(dst.truncate(len))
    }

    /// Rolls the cursor back by exactly the most recent allocation's length.
    /// One level only: calling it again without an intervening `alloc` does
    /// nothing. Cell contents are left untouched, which is what lets the
    /// worst-case-then-shrink pattern re-allocate over its own data.
    pub fn undo_last(&mut self) {
        if let Some((bucket, len)) = self.last.take() {
            self.buckets[bucket as usize].used -= len;
        }
    }

    /// Discards every bucket except the first and rewinds its cursor.
    /// Every span issued before the reset is stale afterwards.
    pub fn reset(&mut self) {
        self.buckets.truncate(1);
        if let Some(first) = self.buckets.first_mut() {
            first.used = 0;
        }
        self.last = None;
    }

    /// Number of buckets currently backing the arena.
    #[inline]
    pub fn bucket_count(&self) -> usize {
        self.buckets.len()
    }

    fn grow(&mut self, len: u32) -> Result<(), ArenaError> {
        let capacity = self.bucket_capacity.max(len);
        trace!(
            capacity,
            buckets = self.buckets.len() + 1,
            "appending arena bucket"
        );
        self.buckets
            .try_reserve(1)
            .map_err(|_| ArenaError::OutOfMemory {
                requested: capacity,
            })?;
        self.buckets.push(Bucket::new(capacity)?);
        Ok(())
    }

    #[inline]
    fn current(&self) -> &Bucket {
        &self.buckets[self.buckets.len() - 1]
    }
}

impl Index<Span> for Arena {
    type Output = [u32];

    #[inline]
    fn index(&self, span: Span) -> &[u32] {
        if span.len == 0 {
            return &[];
        }
        let start = span.start as usize;
        &self.buckets[span.bucket as usize].cells[start..start + span.len as usize]
    }
}

impl IndexMut<Span> for Arena {
    #[inline]
    fn index_mut(&mut self, span: Span) -> &mut [u32] {
        if span.len == 0 {
            return &mut [];
        }
        let start = span.start as usize;
        &mut self.buckets[span.bucket as usize].cells[start..start + span.len as usize]
    }
}

//! UTF-8 codec over 32-bit code points.
//!
//! Decoding is lossy with defined fallback: malformed input becomes U+FFFD,
//! one replacement per maximal broken sequence, and scanning resumes at the
//! offending byte. Encoding is the exact reverse, with the documented `?`
//! degradation for scalars at or above 0x200000.

use memchr::memchr;

use crate::arena::{Arena, ArenaError, Span};

/// U+FFFD, substituted for malformed input during decoding.
pub const REPLACEMENT: u32 = 0xFFFD;

/// The byte-order mark as a decoded code point.
pub(crate) const BOM: u32 = 0xFEFF;

/// Source encoding tag carried on a parsed document. The core only ever
/// decodes UTF-8; `Iso8859_1` is reserved for front ends that transcode
/// before handing bytes over.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    #[default]
    Utf8,
    Iso8859_1,
}

/// Decodes UTF-8 input into a terminator-backed code point string in the
/// arena. Stops at the first embedded 0 byte and never reads past it.
///
/// The allocation uses the worst-case-then-shrink pattern: one cell per
/// input byte plus the terminator is reserved up front, then `undo_last`
/// plus an exact re-allocation trims it to the real size.
pub fn decode_into(arena: &mut Arena, bytes: &[u8]) -> Result<Span, ArenaError> {
    let end = memchr(0, bytes).unwrap_or(bytes.len());
    // spans address cells with u32; input past that range is not examined
    let end = end.min(u32::MAX as usize - 1);
    let bytes = &bytes[..end];

    let scratch = arena.alloc(bytes.len() as u32 + 1)?;
    let mut n = 0usize;
    {
        let out = &mut arena[scratch];
        let mut i = 0usize;
        while i < bytes.len() {
            let lead = bytes[i];
            if lead <= 0x7F {
                out[n] = lead as u32;
                n += 1;
                i += 1;
                continue;
            }
            let (bits, want) = if lead & 0xE0 == 0xC0 {
                ((lead & 0x1F) as u32, 1)
            } else if lead & 0xF0 == 0xE0 {
                ((lead & 0x0F) as u32, 2)
            } else if lead & 0xF8 == 0xF0 {
                ((lead & 0x07) as u32, 3)
            } else {
                // unrecognized lead byte: one replacement, skip one byte
                out[n] = REPLACEMENT;
                n += 1;
                i += 1;
                continue;
            };
            let mut cp = bits;
            let mut j = i + 1;
            let mut complete = true;
            for _ in 0..want {
                match bytes.get(j) {
                    Some(&c) if c & 0xC0 == 0x80 => {
                        cp = (cp << 6) | (c & 0x3F) as u32;
                        j += 1;
                    }
                    _ => {
                        complete = false;
                        break;
                    }
                }
            }
            // A broken sequence collapses to one replacement covering the
            // lead plus whatever continuations matched; scanning resumes at
            // the offending byte. Complete sequences still have to carry a
            // real scalar (no surrogates, nothing past U+10FFFF, and no
            // overlong NUL that would poke a hole in the terminator rule).
            out[n] = if complete && cp != 0 && validate(cp) {
                cp
            } else {
                REPLACEMENT
            };
            n += 1;
            i = j;
        }
        out[n] = 0;
    }
    arena.undo_last();
    let exact = arena.alloc(n as u32 + 1)?;
    Ok(exact.truncate(n as u32))
}

/// Re-encodes code points to UTF-8 bytes. Scalars below 0x200000 emit one
/// to four bytes with standard continuation marking; anything at or above
/// degrades to a single literal `?`. The degradation is part of the
/// contract, preserved rather than fixed.
pub fn encode_utf8(cps: &[u32]) -> Vec<u8> {
    let mut out = Vec::with_capacity(cps.len());
    for &cp in cps {
        if cp < 0x80 {
            out.push(cp as u8);
        } else if cp < 0x800 {
            out.push(0xC0 | (cp >> 6) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        } else if cp < 0x10000 {
            out.push(0xE0 | (cp >> 12) as u8);
            out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        } else if cp < 0x20_0000 {
            out.push(0xF0 | (cp >> 18) as u8);
            out.push(0x80 | ((cp >> 12) & 0x3F) as u8);
            out.push(0x80 | ((cp >> 6) & 0x3F) as u8);
            out.push(0x80 | (cp & 0x3F) as u8);
        } else {
            out.push(b'?');
        }
    }
    out
}

/// Validates one scalar by reconstructing the byte pattern its UTF-8
/// encoding would produce and checking range plus continuation masks.
/// ASCII is always valid; the UTF-16 surrogate range (as it maps into the
/// three-byte pattern space) and anything beyond U+10FFFF are rejected.
pub fn validate(cp: u32) -> bool {
    if cp <= 0x7F {
        return true;
    }
    if cp > 0x10FFFF {
        return false;
    }
    let packed = pack_utf8(cp);
    if (0xC280..=0xDFBF).contains(&packed) {
        return packed & 0xE0C0 == 0xC080;
    }
    if (0x00ED_A080..=0x00ED_BFBF).contains(&packed) {
        return false;
    }
    if (0x00E0_A080..=0x00EF_BFBF).contains(&packed) {
        return packed & 0x00F0_C0C0 == 0x00E0_8080;
    }
    if (0xF090_8080..=0xF48F_BFBF).contains(&packed) {
        return packed & 0xF8C0_C0C0 == 0xF080_8080;
    }
    false
}

/// Packs a scalar into the big-endian byte pattern of its UTF-8 encoding.
/// Only called for 0x80..=0x10FFFF.
fn pack_utf8(cp: u32) -> u32 {
    if cp < 0x800 {
        0xC080 | ((cp & 0x7C0) << 2) | (cp & 0x3F)
    } else if cp < 0x10000 {
        0x00E0_8080 | ((cp & 0xF000) << 4) | ((cp & 0xFC0) << 2) | (cp & 0x3F)
    } else {
        0xF080_8080
            | ((cp & 0x1C_0000) << 6)
            | ((cp & 0x3_F000) << 4)
            | ((cp & 0xFC0) << 2)
            | (cp & 0x3F)
    }
}

/// Compares a code point string against a Rust string: length first, then
/// elementwise scalars. Never a byte comparison.
pub fn eq_str(cps: &[u32], s: &str) -> bool {
    let mut chars = s.chars();
    for &cp in cps {
        match chars.next() {
            Some(c) if c as u32 == cp => {}
            _ => return false,
        }
    }
    chars.next().is_none()
}

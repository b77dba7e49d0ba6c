//! Structural scanning over raw JSON text.
//!
//! Stateless cursor-advancing functions that locate value, key and separator
//! boundaries without building a parse tree. Positions are plain byte
//! indices; every boundary is a `[start, end)` half-open range and every
//! advance is checked against the end of the buffer, so malformed input
//! surfaces [`Error::MalformedValue`] instead of reading out of bounds.
//!
//! These functions delimit values, they do not validate grammar: a scan that
//! completes says nothing about the content between the boundaries.

use memchr::memchr2;

use crate::error::{Error, Result};

/// Half-open `[start, end)` byte range inside a buffer.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Range {
    pub start: usize,
    pub end: usize,
}

impl Range {
    /// Create a range. Empty ranges (`start == end`) are fine; inverted ones
    /// are a caller bug and collapse to empty.
    #[inline]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self { start, end }
    }

    /// Range length in bytes.
    #[inline]
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Whether the range covers no bytes.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Advance past insignificant whitespace. Total, cannot fail.
#[inline]
pub fn skip_whitespace(input: &[u8], mut pos: usize) -> usize {
    // Direct comparison is faster than a table lookup for simple whitespace.
    while pos < input.len() {
        let c = input[pos];
        if c != b' ' && c != b'\n' && c != b'\r' && c != b'\t' {
            break;
        }
        pos += 1;
    }
    pos
}

/// Advance past exactly one complete JSON value starting at `pos`, stopping
/// immediately after its last byte.
///
/// Nested objects, arrays and strings (including escaped quotes) are skipped
/// whole; the structural separator that follows the value is not consumed.
pub fn skip_to_next_value(input: &[u8], pos: usize) -> Result<usize> {
    let pos = skip_whitespace(input, pos);
    let Some(&first) = input.get(pos) else {
        return Err(Error::malformed(pos, "expected a value, found end of input"));
    };

    match first {
        b'{' | b'[' => skip_container(input, pos),
        b'"' => skip_string(input, pos),
        b'-' | b'0'..=b'9' => Ok(skip_number(input, pos)),
        b't' => skip_literal(input, pos, b"true"),
        b'f' => skip_literal(input, pos, b"false"),
        b'n' => skip_literal(input, pos, b"null"),
        _ => Err(Error::malformed(pos, "byte does not start a JSON value")),
    }
}

/// Advance past one quoted key token and its `:` separator, stopping on the
/// first byte after the colon.
pub fn skip_key(input: &[u8], pos: usize) -> Result<usize> {
    let pos = skip_whitespace(input, pos);
    if input.get(pos) != Some(&b'"') {
        return Err(Error::malformed(pos, "expected a quoted key"));
    }
    let after_key = skip_string(input, pos)?;
    let colon = skip_whitespace(input, after_key);
    if input.get(colon) != Some(&b':') {
        return Err(Error::malformed(colon, "expected ':' after key"));
    }
    Ok(colon + 1)
}

/// Count the top-level comma-separated elements in `input[start..end]`.
///
/// "Top-level" excludes separators nested inside child objects, arrays and
/// strings. A blank range counts zero elements.
pub fn count_value_elements(input: &[u8], start: usize, end: usize) -> Result<usize> {
    let end = end.min(input.len());
    let mut pos = skip_whitespace(input, start);
    if pos >= end {
        return Ok(0);
    }

    let mut count = 1;
    while pos < end {
        let next = match input[pos] {
            b'"' => skip_string(input, pos)?,
            b'{' | b'[' => skip_container(input, pos)?,
            b',' => {
                count += 1;
                pos + 1
            }
            _ => pos + 1,
        };
        if next > end {
            return Err(Error::malformed(pos, "value extends past container boundary"));
        }
        pos = next;
    }
    Ok(count)
}

/// Advance past one quoted string, `pos` sitting on the opening quote.
/// Stops immediately after the closing quote.
pub fn skip_string(input: &[u8], pos: usize) -> Result<usize> {
    debug_assert_eq!(input.get(pos), Some(&b'"'));
    let mut cursor = pos + 1;
    loop {
        if cursor > input.len() {
            return Err(Error::malformed(pos, "unterminated string"));
        }
        match memchr2(b'"', b'\\', &input[cursor..]) {
            Some(offset) if input[cursor + offset] == b'"' => {
                return Ok(cursor + offset + 1);
            }
            // Backslash: hop over the escaped byte and keep looking.
            Some(offset) => cursor += offset + 2,
            None => return Err(Error::malformed(pos, "unterminated string")),
        }
    }
}

/// Advance past one object or array, `pos` sitting on the opening bracket.
/// Tracks nesting depth and skips strings wholesale so brackets inside them
/// don't count.
fn skip_container(input: &[u8], pos: usize) -> Result<usize> {
    let mut depth = 0usize;
    let mut cursor = pos;
    while cursor < input.len() {
        match input[cursor] {
            b'"' => cursor = skip_string(input, cursor)?,
            b'{' | b'[' => {
                depth += 1;
                cursor += 1;
            }
            b'}' | b']' => {
                depth -= 1;
                cursor += 1;
                if depth == 0 {
                    return Ok(cursor);
                }
            }
            _ => cursor += 1,
        }
    }
    Err(Error::malformed(pos, "unterminated object or array"))
}

/// Advance past a numeric token. Total: stops at the first byte that cannot
/// be part of a number.
fn skip_number(input: &[u8], pos: usize) -> usize {
    let mut cursor = pos + 1;
    while cursor < input.len() {
        match input[cursor] {
            b'0'..=b'9' | b'.' | b'-' | b'+' | b'e' | b'E' => cursor += 1,
            _ => break,
        }
    }
    cursor
}

fn skip_literal(input: &[u8], pos: usize, literal: &'static [u8]) -> Result<usize> {
    if input[pos..].starts_with(literal) {
        Ok(pos + literal.len())
    } else {
        Err(Error::malformed(pos, "invalid literal"))
    }
}

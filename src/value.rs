//! The lazy JSON value.
//!
//! [`RawJson`] owns the text of exactly one JSON value and defers all
//! structural interpretation: no parse tree is built or cached, and every
//! object/array materialization re-scans the stored bytes. Children handed
//! out by materialization are independently owned copies of sub-ranges, so
//! no aliasing into the parent buffer survives the conversion call.

use std::borrow::Cow;
use std::fmt;

use ahash::AHashMap;
use smallvec::SmallVec;

use crate::alloc::AlignedBytes;
use crate::error::{Error, Result};
use crate::kind::{kind_of, JsonKind};
use crate::number;
use crate::scan::{self, Range};

/// Object view: text key (quotes stripped) to lazy value. Last write wins
/// for duplicate keys; insertion order is not preserved.
pub type ObjectMap = AHashMap<String, RawJson>;

/// Array view: lazy values in source order.
pub type ArrayVec = Vec<RawJson>;

/// One JSON value's raw text, interpreted on demand.
///
/// For objects and arrays the text includes the enclosing `{}`/`[]`; for
/// scalars it includes quotes and literal characters exactly as they appear
/// in source.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RawJson {
    text: AlignedBytes,
}

impl RawJson {
    /// The unset value: empty text, kind [`JsonKind::Unset`].
    #[inline]
    pub const fn new() -> Self {
        Self {
            text: AlignedBytes::new(),
        }
    }

    /// Wrap a slice of raw JSON text. The bytes are copied into a fresh
    /// aligned buffer; nothing is scanned yet.
    #[inline]
    pub fn from_slice(text: &[u8]) -> Self {
        Self {
            text: AlignedBytes::from_slice(text),
        }
    }

    /// Classify the stored text by its first byte. No parsing happens.
    #[inline]
    pub fn kind(&self) -> JsonKind {
        kind_of(&self.text)
    }

    /// The stored text, unmodified.
    #[inline]
    pub fn raw_json(&self) -> &[u8] {
        &self.text
    }

    /// Byte-for-byte equality with the literal `true`.
    ///
    /// Everything else — including the literal `false` and garbage — yields
    /// `false`. This is the long-standing conversion rule for raw values and
    /// is kept as-is; use [`kind`](Self::kind) to tell a Bool apart from
    /// junk first.
    #[inline]
    pub fn as_bool(&self) -> bool {
        self.text.as_slice() == b"true"
    }

    /// String content with the surrounding quotes stripped.
    ///
    /// One leading `"` and one trailing `"` are removed when present; escape
    /// sequences are left as they appear in source. Borrowed unless the
    /// content is not valid UTF-8.
    pub fn as_str(&self) -> Cow<'_, str> {
        let mut content = self.text.as_slice();
        if let [b'"', rest @ ..] = content {
            content = rest;
        }
        if let [rest @ .., b'"'] = content {
            content = rest;
        }
        String::from_utf8_lossy(content)
    }

    /// Parse the text as a double. Empty text yields `0.0`.
    #[inline]
    pub fn as_f64(&self) -> f64 {
        number::parse_f64(&self.text)
    }

    /// Parse the text as an unsigned 64-bit integer. Empty text yields 0.
    #[inline]
    pub fn as_u64(&self) -> u64 {
        number::parse_u64(&self.text)
    }

    /// Parse the text as a signed 64-bit integer. Empty text yields 0.
    #[inline]
    pub fn as_i64(&self) -> i64 {
        number::parse_i64(&self.text)
    }

    /// Materialize the object view.
    ///
    /// Empty text yields an empty map. Text of any other kind than Object is
    /// a [`Error::TypeMismatch`]; boundaries that cannot be computed surface
    /// the scanner's [`Error::MalformedValue`]. The result owns fresh copies
    /// of each value's slice, with structural separators excluded.
    pub fn to_object(&self) -> Result<ObjectMap> {
        if self.text.is_empty() {
            return Ok(ObjectMap::new());
        }
        self.check_kind(JsonKind::Object)?;

        let input = self.text.as_slice();
        let interior = container_interior(input)?;
        let count = scan::count_value_elements(input, interior.start, interior.end)?;

        // Collect [start, end) field boundaries first, then copy slices out.
        let mut fields: SmallVec<[(Range, Range); 8]> = SmallVec::new();
        let mut pos = interior.start;
        for _ in 0..count {
            let key_start = scan::skip_whitespace(input, pos);
            if input.get(key_start) != Some(&b'"') {
                return Err(Error::malformed(key_start, "expected a quoted key"));
            }
            let key_end = scan::skip_string(input, key_start)?;
            let key = Range::new(key_start + 1, key_end - 1);

            let after_key = scan::skip_key(input, key_start)?;
            let value_start = scan::skip_whitespace(input, after_key);
            let value_end = scan::skip_to_next_value(input, value_start)?;
            if value_end > interior.end {
                return Err(Error::malformed(value_start, "value extends past container boundary"));
            }
            fields.push((key, Range::new(value_start, value_end)));

            pos = scan::skip_whitespace(input, value_end);
            if input.get(pos) == Some(&b',') {
                pos += 1;
            }
        }

        let mut results = ObjectMap::with_capacity(count);
        for (key, value) in fields {
            results.insert(
                String::from_utf8_lossy(&input[key.start..key.end]).into_owned(),
                Self::from_slice(&input[value.start..value.end]),
            );
        }
        Ok(results)
    }

    /// Materialize the array view.
    ///
    /// Mirrors [`to_object`](Self::to_object) without the key step: empty
    /// text yields an empty vector, elements keep source order, and each
    /// element's slice excludes the trailing `,` or closing `]`.
    pub fn to_array(&self) -> Result<ArrayVec> {
        if self.text.is_empty() {
            return Ok(ArrayVec::new());
        }
        self.check_kind(JsonKind::Array)?;

        let input = self.text.as_slice();
        let interior = container_interior(input)?;
        let count = scan::count_value_elements(input, interior.start, interior.end)?;

        let mut elements: SmallVec<[Range; 16]> = SmallVec::new();
        let mut pos = interior.start;
        for _ in 0..count {
            let value_start = scan::skip_whitespace(input, pos);
            let value_end = scan::skip_to_next_value(input, value_start)?;
            if value_end > interior.end {
                return Err(Error::malformed(value_start, "value extends past container boundary"));
            }
            elements.push(Range::new(value_start, value_end));

            pos = scan::skip_whitespace(input, value_end);
            if input.get(pos) == Some(&b',') {
                pos += 1;
            }
        }

        Ok(elements
            .into_iter()
            .map(|range| Self::from_slice(&input[range.start..range.end]))
            .collect())
    }

    #[inline]
    fn check_kind(&self, expected: JsonKind) -> Result<()> {
        let found = self.kind();
        if found == expected {
            Ok(())
        } else {
            Err(Error::TypeMismatch { expected, found })
        }
    }
}

/// Interior `[start, end)` of a container's text: the bytes between the
/// opening bracket and its matching closing bracket.
///
/// The buffer may carry trailing bytes belonging to an enclosing structure;
/// scanning for the true end boundary trims them off.
fn container_interior(input: &[u8]) -> Result<Range> {
    let end = scan::skip_to_next_value(input, 0)?;
    debug_assert!(end >= 2);
    Ok(Range::new(1, end - 1))
}

// Construction from scalar inputs serializes the value to its canonical
// JSON token text.

impl From<bool> for RawJson {
    #[inline]
    fn from(value: bool) -> Self {
        Self::from_slice(if value { b"true" } else { b"false" })
    }
}

impl From<f64> for RawJson {
    #[inline]
    fn from(value: f64) -> Self {
        Self::from_slice(number::format_f64(value).as_bytes())
    }
}

impl From<i64> for RawJson {
    #[inline]
    fn from(value: i64) -> Self {
        Self::from_slice(number::format_i64(value).as_bytes())
    }
}

impl From<&str> for RawJson {
    /// Wraps the text verbatim; the caller supplies quoting.
    #[inline]
    fn from(value: &str) -> Self {
        Self::from_slice(value.as_bytes())
    }
}

impl From<String> for RawJson {
    #[inline]
    fn from(value: String) -> Self {
        Self::from_slice(value.as_bytes())
    }
}

impl fmt::Display for RawJson {
    /// Streams the stored text, unmodified (lossy on invalid UTF-8).
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&String::from_utf8_lossy(&self.text))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn raw(text: &str) -> RawJson {
        RawJson::from(text)
    }

    #[test]
    fn test_scalar_construction() {
        assert_eq!(RawJson::from(true).raw_json(), b"true");
        assert_eq!(RawJson::from(false).raw_json(), b"false");
        assert_eq!(RawJson::from(42i64).raw_json(), b"42");
        assert_eq!(RawJson::from(-7i64).raw_json(), b"-7");
        assert_eq!(RawJson::from(2.5f64).raw_json(), b"2.5");
        assert_eq!(raw("\"x\"").raw_json(), b"\"x\"");
    }

    #[test]
    fn test_kind_discrimination() {
        assert_eq!(RawJson::new().kind(), JsonKind::Unset);
        assert_eq!(raw("{}").kind(), JsonKind::Object);
        assert_eq!(raw("[]").kind(), JsonKind::Array);
        assert_eq!(raw("\"s\"").kind(), JsonKind::String);
        assert_eq!(raw("-1").kind(), JsonKind::Number);
        assert_eq!(raw("7").kind(), JsonKind::Number);
        assert_eq!(raw("true").kind(), JsonKind::Bool);
        assert_eq!(raw("false").kind(), JsonKind::Bool);
        assert_eq!(raw("null").kind(), JsonKind::Null);
    }

    #[test]
    fn test_bool_conversion_is_exact_match() {
        assert!(raw("true").as_bool());
        // Only the exact literal `true` converts to true.
        assert!(!raw("false").as_bool());
        assert!(!raw("truex").as_bool());
        assert!(!raw("garbage").as_bool());
        assert!(!RawJson::new().as_bool());
    }

    #[test]
    fn test_string_dequoting() {
        assert_eq!(raw("\"hello\"").as_str(), "hello");
        assert_eq!(raw("\"\"").as_str(), "");
        // Escapes stay as they appear in source.
        assert_eq!(raw(r#""a\"b""#).as_str(), r#"a\"b"#);
        assert_eq!(RawJson::new().as_str(), "");
    }

    #[test]
    fn test_numeric_conversions() {
        assert_eq!(raw("42").as_i64(), 42);
        assert_eq!(raw("-42").as_i64(), -42);
        assert_eq!(raw("42").as_u64(), 42);
        assert_eq!(raw("2.5").as_f64(), 2.5);
        // Empty text yields the type's zero.
        assert_eq!(RawJson::new().as_f64(), 0.0);
        assert_eq!(RawJson::new().as_i64(), 0);
        assert_eq!(RawJson::new().as_u64(), 0);
    }

    #[test]
    fn test_equality_is_textual() {
        assert_eq!(raw("1"), raw("1"));
        // Semantic equality does not apply.
        assert_ne!(raw("1.0"), raw("1"));
        assert_eq!(RawJson::from(true), raw("true"));
    }

    #[test]
    fn test_object_round_trip() {
        let value = raw(r#"{"a":1,"b":[2,3],"c":"x"}"#);
        let object = value.to_object().unwrap();
        assert_eq!(object.len(), 3);
        assert_eq!(object["a"].raw_json(), b"1");
        assert_eq!(object["c"].raw_json(), b"\"x\"");

        let b = object["b"].to_array().unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b[0].raw_json(), b"2");
        assert_eq!(b[1].raw_json(), b"3");
    }

    #[test]
    fn test_array_slices_exclude_separators() {
        let elements = raw("[1,2,3]").to_array().unwrap();
        assert_eq!(elements.len(), 3);
        assert_eq!(elements[0].raw_json(), b"1");
        assert_eq!(elements[1].raw_json(), b"2");
        assert_eq!(elements[2].raw_json(), b"3");
    }

    #[test]
    fn test_nested_isolation() {
        let object = raw(r#"{"x":{"y":1}}"#).to_object().unwrap();
        assert_eq!(object["x"].raw_json(), br#"{"y":1}"#);

        let inner = object["x"].to_object().unwrap();
        assert_eq!(inner["y"].raw_json(), b"1");
    }

    #[test]
    fn test_empty_containers() {
        assert!(raw("{}").to_object().unwrap().is_empty());
        assert!(raw("[]").to_array().unwrap().is_empty());
        // Degenerate: the unset value materializes to both.
        assert!(RawJson::new().to_object().unwrap().is_empty());
        assert!(RawJson::new().to_array().unwrap().is_empty());
    }

    #[test]
    fn test_type_mismatch_is_reported() {
        assert!(matches!(
            raw("[1]").to_object(),
            Err(Error::TypeMismatch {
                expected: JsonKind::Object,
                found: JsonKind::Array,
            })
        ));
        assert!(matches!(
            raw("{\"a\":1}").to_array(),
            Err(Error::TypeMismatch { .. })
        ));
        assert!(raw("12").to_object().is_err());
    }

    #[test]
    fn test_malformed_text_is_reported() {
        assert!(matches!(
            raw("{\"a\":1").to_object(),
            Err(Error::MalformedValue { .. })
        ));
        assert!(raw(r#"{"a"1}"#).to_object().is_err());
        assert!(raw("{1:2}").to_object().is_err());
        assert!(raw("[1,").to_array().is_err());
    }

    #[test]
    fn test_duplicate_keys_last_write_wins() {
        let object = raw(r#"{"k":1,"k":2}"#).to_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["k"].raw_json(), b"2");
    }

    #[test]
    fn test_whitespace_tolerant_materialization() {
        let object = raw("{ \"a\" : 1 , \"b\" : [ 2 , 3 ] }").to_object().unwrap();
        assert_eq!(object.len(), 2);
        assert_eq!(object["a"].raw_json(), b"1");

        let b = object["b"].to_array().unwrap();
        assert_eq!(b.len(), 2);
        assert_eq!(b[1].raw_json(), b"3");
    }

    #[test]
    fn test_materialization_is_idempotent() {
        let value = raw(r#"{"a":1,"b":"x"}"#);
        let first = value.to_object().unwrap();
        let second = value.to_object().unwrap();
        assert_eq!(first, second);
        // The source value is untouched.
        assert_eq!(value.raw_json(), br#"{"a":1,"b":"x"}"#);
    }

    #[test]
    fn test_display_streams_raw_text() {
        let value = raw(r#"{"a":1}"#);
        assert_eq!(value.to_string(), r#"{"a":1}"#);
        assert_eq!(RawJson::new().to_string(), "");
    }

    #[test]
    fn test_trailing_bytes_are_trimmed() {
        // A buffer can carry bytes belonging to an enclosing structure; the
        // end boundary is computed from the text itself.
        let value = RawJson::from_slice(b"{\"a\":1},\"rest\":2");
        let object = value.to_object().unwrap();
        assert_eq!(object.len(), 1);
        assert_eq!(object["a"].raw_json(), b"1");
    }
}

//! First-byte type discrimination.
//!
//! A JSON value's kind is fully determined by its first significant byte, so
//! classification is a single table lookup with no parsing, no allocation and
//! no grammar validation. The table is built at compile time; there is no
//! runtime-initialized map.

/// Kind tag for a raw JSON slice.
///
/// Discriminant values match the byte that introduces each kind in source
/// text, which makes the tag cheap to derive and debug.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum JsonKind {
    /// Empty or unrecognized slice.
    Unset = 0,
    /// `{`
    Object = b'{',
    /// `[`
    Array = b'[',
    /// `"`
    String = b'"',
    /// `-` or a digit
    Number = b'-',
    /// `t` or `f`
    Bool = b't',
    /// `n`
    Null = b'n',
}

/// Lookup table for first-byte classification.
///
/// 256 entries for all possible byte values. `f` and the digits `0`-`9` are
/// mapped here even though name-based lookup in older code left them out:
/// `false` is a Bool and a positive number is a Number.
static KIND_TABLE: [JsonKind; 256] = {
    let mut table = [JsonKind::Unset; 256];

    table[b'{' as usize] = JsonKind::Object;
    table[b'[' as usize] = JsonKind::Array;
    table[b'"' as usize] = JsonKind::String;
    table[b't' as usize] = JsonKind::Bool;
    table[b'f' as usize] = JsonKind::Bool;
    table[b'n' as usize] = JsonKind::Null;

    table[b'-' as usize] = JsonKind::Number;
    let mut digit = b'0';
    while digit <= b'9' {
        table[digit as usize] = JsonKind::Number;
        digit += 1;
    }

    table
};

/// Classify a raw slice by its first byte.
///
/// Pure and total: an empty slice is [`JsonKind::Unset`], as is any slice
/// whose first byte introduces no JSON value.
#[inline]
pub fn kind_of(bytes: &[u8]) -> JsonKind {
    match bytes.first() {
        Some(&first) => KIND_TABLE[first as usize],
        None => JsonKind::Unset,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_table() {
        assert_eq!(kind_of(b"{\"a\":1}"), JsonKind::Object);
        assert_eq!(kind_of(b"[1,2]"), JsonKind::Array);
        assert_eq!(kind_of(b"\"hi\""), JsonKind::String);
        assert_eq!(kind_of(b"-12"), JsonKind::Number);
        assert_eq!(kind_of(b"true"), JsonKind::Bool);
        assert_eq!(kind_of(b"null"), JsonKind::Null);
        assert_eq!(kind_of(b""), JsonKind::Unset);
    }

    #[test]
    fn test_closed_discrimination_gap() {
        // `false` and positive numbers classify too.
        assert_eq!(kind_of(b"false"), JsonKind::Bool);
        assert_eq!(kind_of(b"0"), JsonKind::Number);
        assert_eq!(kind_of(b"9e3"), JsonKind::Number);
    }

    #[test]
    fn test_unrecognized_first_bytes() {
        assert_eq!(kind_of(b" {}"), JsonKind::Unset);
        assert_eq!(kind_of(b"x"), JsonKind::Unset);
        assert_eq!(kind_of(&[0xFF]), JsonKind::Unset);
    }
}

//! Numeric text-to-value and value-to-text conversion.
//!
//! Parsing is best-effort over raw token bytes: a leading digit run is
//! consumed and anything after it is ignored, and input that yields no
//! number at all produces the type's zero. Callers that need a strict
//! verdict should check the token boundary first with the scanner.
//!
//! Formatting goes through `ryu`/`itoa`, which produce the canonical JSON
//! token text without any `format!` machinery.

/// Parse a decimal floating-point token.
///
/// Empty or malformed input yields `0.0`.
#[inline]
pub fn parse_f64(bytes: &[u8]) -> f64 {
    if bytes.is_empty() {
        return 0.0;
    }
    fast_float::parse(bytes).unwrap_or(0.0)
}

/// Parse an unsigned integer token.
///
/// Consumes the leading digit run and ignores the rest (so `"42abc"` is 42
/// and `"1.9"` is 1). Empty input, a leading non-digit, or overflow past
/// `u64::MAX` yields 0.
#[inline]
pub fn parse_u64(bytes: &[u8]) -> u64 {
    let digits = leading_digits(bytes);

    // Fast path: 18 digits always fit in a u64, no overflow checks needed.
    if digits.len() <= 18 {
        let mut value: u64 = 0;
        for &b in digits {
            value = value * 10 + u64::from(b - b'0');
        }
        return value;
    }

    // Fallback for very large integers.
    std::str::from_utf8(digits)
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(0)
}

/// Parse a signed integer token, same rules as [`parse_u64`] plus an
/// optional leading `-`.
#[inline]
pub fn parse_i64(bytes: &[u8]) -> i64 {
    match bytes.first() {
        Some(b'-') => {
            let magnitude = parse_u64(&bytes[1..]);
            if magnitude <= i64::MAX as u64 {
                -(magnitude as i64)
            } else if magnitude == i64::MAX as u64 + 1 {
                i64::MIN
            } else {
                0
            }
        }
        _ => {
            let magnitude = parse_u64(bytes);
            if magnitude <= i64::MAX as u64 {
                magnitude as i64
            } else {
                0
            }
        }
    }
}

#[inline]
fn leading_digits(bytes: &[u8]) -> &[u8] {
    let end = bytes
        .iter()
        .position(|b| !b.is_ascii_digit())
        .unwrap_or(bytes.len());
    &bytes[..end]
}

/// Format a double as its decimal JSON token text.
#[inline]
pub fn format_f64(value: f64) -> String {
    ryu::Buffer::new().format(value).to_owned()
}

/// Format a signed integer as its decimal JSON token text.
#[inline]
pub fn format_i64(value: i64) -> String {
    itoa::Buffer::new().format(value).to_owned()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_f64() {
        assert_eq!(parse_f64(b"3.25"), 3.25);
        assert_eq!(parse_f64(b"-2.5e10"), -2.5e10);
        assert_eq!(parse_f64(b"0"), 0.0);
        // Zero value for empty and garbage input.
        assert_eq!(parse_f64(b""), 0.0);
        assert_eq!(parse_f64(b"xyz"), 0.0);
    }

    #[test]
    fn test_parse_u64() {
        assert_eq!(parse_u64(b"0"), 0);
        assert_eq!(parse_u64(b"42"), 42);
        assert_eq!(parse_u64(b"18446744073709551615"), u64::MAX);
        // Leading digit run only.
        assert_eq!(parse_u64(b"42abc"), 42);
        assert_eq!(parse_u64(b"1.9"), 1);
        assert_eq!(parse_u64(b""), 0);
        assert_eq!(parse_u64(b"-1"), 0);
        // Overflow yields zero, not a wrapped value.
        assert_eq!(parse_u64(b"99999999999999999999999"), 0);
    }

    #[test]
    fn test_parse_i64() {
        assert_eq!(parse_i64(b"42"), 42);
        assert_eq!(parse_i64(b"-123"), -123);
        assert_eq!(parse_i64(b"9223372036854775807"), i64::MAX);
        assert_eq!(parse_i64(b"-9223372036854775808"), i64::MIN);
        assert_eq!(parse_i64(b""), 0);
        assert_eq!(parse_i64(b"-"), 0);
    }

    #[test]
    fn test_format_round_trip() {
        assert_eq!(format_i64(0), "0");
        assert_eq!(format_i64(-17), "-17");
        assert_eq!(format_f64(2.5), "2.5");
        assert_eq!(parse_f64(format_f64(1234.5678).as_bytes()), 1234.5678);
    }
}

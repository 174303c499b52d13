//! Data-attribute parsing.
//!
//! Numbers in `data-*` attributes are read the way `parseInt(value, 10)`
//! reads them: leading whitespace is skipped, an optional sign is accepted,
//! and parsing stops at the first non-digit (`"250ms"` is 250). Anything
//! without leading digits is malformed.

/// Parse the leading base-10 integer of `raw`.
///
/// Returns `None` when there are no leading digits. Values beyond the `i64`
/// range saturate.
#[must_use]
pub fn parse_int_prefix(raw: &str) -> Option<i64> {
    let s = raw.trim_start();
    let (negative, digits) = match s.as_bytes().first() {
        Some(b'-') => (true, &s[1..]),
        Some(b'+') => (false, &s[1..]),
        _ => (false, s),
    };

    let mut value: i64 = 0;
    let mut seen = false;
    for b in digits.bytes() {
        if !b.is_ascii_digit() {
            break;
        }
        seen = true;
        let d = i64::from(b - b'0');
        value = value.saturating_mul(10).saturating_add(d);
    }

    if !seen {
        return None;
    }
    Some(if negative { -value } else { value })
}

/// Delay in milliseconds: absent, malformed or negative values are 0.
#[must_use]
pub fn parse_delay_ms(raw: Option<&str>) -> u32 {
    raw.and_then(parse_int_prefix)
        .map_or(0, |v| u32::try_from(v.max(0)).unwrap_or(u32::MAX))
}

/// Counter target: `None` when the attribute is absent or empty, 0 when
/// malformed.
#[must_use]
pub fn parse_target(raw: Option<&str>) -> Option<u64> {
    raw.filter(|s| !s.is_empty()).map(|s| {
        parse_int_prefix(s).map_or(0, |v| u64::try_from(v.max(0)).unwrap_or(0))
    })
}

/// Carousel indicator index: malformed or absent values are 0. Negative
/// values are kept; the carousel normalises them.
#[must_use]
pub fn parse_index(raw: Option<&str>) -> i64 {
    raw.and_then(parse_int_prefix).unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::*;

    // =========================================================================
    // parse_int_prefix
    // =========================================================================

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_int_prefix("120"), Some(120));
    }

    #[test]
    fn test_parse_stops_at_suffix() {
        assert_eq!(parse_int_prefix("250ms"), Some(250));
        assert_eq!(parse_int_prefix("3.7"), Some(3));
    }

    #[test]
    fn test_parse_leading_whitespace_and_sign() {
        assert_eq!(parse_int_prefix("  42"), Some(42));
        assert_eq!(parse_int_prefix("-7"), Some(-7));
        assert_eq!(parse_int_prefix("+9"), Some(9));
    }

    #[test]
    fn test_parse_rejects_non_numeric() {
        assert_eq!(parse_int_prefix(""), None);
        assert_eq!(parse_int_prefix("abc"), None);
        assert_eq!(parse_int_prefix("-"), None);
        assert_eq!(parse_int_prefix("ms250"), None);
    }

    #[test]
    fn test_parse_saturates() {
        assert_eq!(parse_int_prefix("99999999999999999999999"), Some(i64::MAX));
    }

    // =========================================================================
    // Typed helpers
    // =========================================================================

    #[test]
    fn test_delay_defaults() {
        assert_eq!(parse_delay_ms(None), 0);
        assert_eq!(parse_delay_ms(Some("soon")), 0);
        assert_eq!(parse_delay_ms(Some("-200")), 0);
        assert_eq!(parse_delay_ms(Some("150")), 150);
    }

    #[test]
    fn test_target_absent_vs_malformed() {
        assert_eq!(parse_target(None), None);
        assert_eq!(parse_target(Some("")), None);
        assert_eq!(parse_target(Some(" ")), Some(0));
        assert_eq!(parse_target(Some("lots")), Some(0));
        assert_eq!(parse_target(Some("1500")), Some(1500));
        assert_eq!(parse_target(Some("-3")), Some(0));
    }

    #[test]
    fn test_index_keeps_sign() {
        assert_eq!(parse_index(Some("2")), 2);
        assert_eq!(parse_index(Some("-1")), -1);
        assert_eq!(parse_index(Some("x")), 0);
        assert_eq!(parse_index(None), 0);
    }
}

// Money is carried as i64 minor units (paise). Ledger imports arrive as
// free text, so parsing is lenient: anything unparseable degrades to 0
// rather than failing the row.

/// Parse a human-entered amount string into minor units.
///
/// Accepts optional currency markers (`₹`, `Rs`, `Rs.`), thousands
/// separators, and up to two decimal places. Empty or unparseable input
/// yields 0. A third decimal digit and beyond is truncated.
///
/// `parse_amount("1,234.50") == 123_450`
pub fn parse_amount(raw: &str) -> i64 {
    let mut s = raw.trim();
    for prefix in ["₹", "Rs.", "Rs", "rs.", "rs", "INR"] {
        s = s.strip_prefix(prefix).unwrap_or(s).trim_start();
    }

    let negative = s.starts_with('-');
    let s = s.trim_start_matches(['-', '+']);

    let mut major: i64 = 0;
    let mut minor: i64 = 0;
    let mut minor_digits = 0usize;
    let mut seen_digit = false;
    let mut in_fraction = false;

    for ch in s.chars() {
        match ch {
            '0'..='9' => {
                seen_digit = true;
                let d = (ch as u8 - b'0') as i64;
                if in_fraction {
                    if minor_digits < 2 {
                        minor = minor * 10 + d;
                        minor_digits += 1;
                    }
                } else {
                    major = major.saturating_mul(10).saturating_add(d);
                }
            }
            ',' if !in_fraction => {}
            '.' if !in_fraction => in_fraction = true,
            c if c.is_whitespace() => {}
            _ => return 0,
        }
    }

    if !seen_digit {
        return 0;
    }

    // Single decimal digit means tenths: "12.5" -> 1250
    if minor_digits == 1 {
        minor *= 10;
    }

    let total = major.saturating_mul(100).saturating_add(minor);
    if negative {
        -total
    } else {
        total
    }
}

/// Render minor units as a major-unit decimal string ("1234.50").
pub fn format_major(minor: i64) -> String {
    let sign = if minor < 0 { "-" } else { "" };
    let abs = minor.unsigned_abs();
    format!("{sign}{}.{:02}", abs / 100, abs % 100)
}

/// Minor units as an f64 in major units, for spreadsheet cells.
pub fn to_major_f64(minor: i64) -> f64 {
    minor as f64 / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_amounts() {
        assert_eq!(parse_amount("1000"), 100_000);
        assert_eq!(parse_amount("1234.50"), 123_450);
        assert_eq!(parse_amount("12.5"), 1_250);
        assert_eq!(parse_amount("0"), 0);
    }

    #[test]
    fn separators_and_currency() {
        assert_eq!(parse_amount("1,234.50"), 123_450);
        assert_eq!(parse_amount("₹ 2,500"), 250_000);
        assert_eq!(parse_amount("Rs. 99.99"), 9_999);
        assert_eq!(parse_amount(" 10 "), 1_000);
    }

    #[test]
    fn garbage_degrades_to_zero() {
        assert_eq!(parse_amount(""), 0);
        assert_eq!(parse_amount("n/a"), 0);
        assert_eq!(parse_amount("10kg"), 0);
        assert_eq!(parse_amount("₹"), 0);
    }

    #[test]
    fn negative_preserved_at_parse_layer() {
        // Clamping happens in the derivation, not here.
        assert_eq!(parse_amount("-50"), -5_000);
    }

    #[test]
    fn extra_decimals_truncated() {
        assert_eq!(parse_amount("1.999"), 199);
    }

    #[test]
    fn round_trip_display() {
        assert_eq!(format_major(123_450), "1234.50");
        assert_eq!(format_major(-5), "-0.05");
        assert_eq!(format_major(0), "0.00");
    }
}

//! Text and number formatting for terminal output.
//!
//! Truncation counts characters rather than bytes so Arabic names are cut
//! on character boundaries.

/// Truncate a string to a maximum length, handling multi-byte characters properly.
/// Appends "..." if truncated.
pub fn truncate_string(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else if max_len <= 3 {
        s.chars().take(max_len).collect()
    } else {
        let truncated: String = s.chars().take(max_len.saturating_sub(3)).collect();
        format!("{truncated}...")
    }
}

/// Shortest plain rendering of a number: `850000`, `120.5`.
pub fn format_plain(value: f64) -> String {
    value.to_string()
}

/// Number with comma thousands separators and at most three decimals:
/// `1,250,000`, `1,234.5`.
pub fn format_grouped(value: f64) -> String {
    let rounded = (value * 1000.0).round() / 1000.0;
    let plain = format_plain(rounded.abs());
    let (integer, fraction) = match plain.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (plain.as_str(), None),
    };

    let digits: Vec<char> = integer.chars().collect();
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, digit) in digits.iter().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(*digit);
    }

    let sign = if rounded < 0.0 { "-" } else { "" };
    match fraction {
        Some(f) => format!("{sign}{grouped}.{f}"),
        None => format!("{sign}{grouped}"),
    }
}

/// Keep only ASCII digits (`"1,250,000"` becomes `"1250000"`).
pub fn digits_only(s: &str) -> String {
    s.chars().filter(|c| c.is_ascii_digit()).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_string_short() {
        assert_eq!(truncate_string("Hello", 10), "Hello");
    }

    #[test]
    fn test_truncate_string_long() {
        assert_eq!(truncate_string("Hello World", 8), "Hello...");
    }

    #[test]
    fn test_truncate_string_very_short_max() {
        assert_eq!(truncate_string("Hello World", 3), "Hel");
    }

    #[test]
    fn test_truncate_string_arabic() {
        assert_eq!(truncate_string("مشروع النزهة السكني", 8), "مشروع...");
    }

    #[test]
    fn test_format_grouped() {
        assert_eq!(format_grouped(1_250_000.0), "1,250,000");
        assert_eq!(format_grouped(950.0), "950");
        assert_eq!(format_grouped(1000.0), "1,000");
        assert_eq!(format_grouped(1234.5), "1,234.5");
        assert_eq!(format_grouped(0.0), "0");
        assert_eq!(format_grouped(-45000.0), "-45,000");
        assert_eq!(format_grouped(10.123456), "10.123");
    }

    #[test]
    fn test_format_plain() {
        assert_eq!(format_plain(850_000.0), "850000");
        assert_eq!(format_plain(120.5), "120.5");
    }

    #[test]
    fn test_digits_only() {
        assert_eq!(digits_only("1,250,000"), "1250000");
        assert_eq!(digits_only("-"), "");
    }
}

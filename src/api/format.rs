//! Display formatting for card and table values. This layer only
//! formats — aggregate tables stay numeric, and "N/A" / "Unknown"
//! placeholders appear here and nowhere earlier.

use rust_decimal::Decimal;

/// Thousands separators: 1234567 → "1,234,567".
pub fn thousands(n: i64) -> String {
    if n < 0 {
        return format!("-{}", group_digits(&n.unsigned_abs().to_string()));
    }
    group_digits(&n.to_string())
}

/// USD with a dollar prefix and exactly two decimals: "$1,234.50".
pub fn usd(value: Decimal) -> String {
    let sign = if value.is_sign_negative() { "-" } else { "" };
    let rounded = value.abs().round_dp(2);
    let text = rounded.to_string();
    let (int_part, frac_part) = text.split_once('.').unwrap_or((text.as_str(), ""));
    format!("{sign}${}.{:0<2}", group_digits(int_part), frac_part)
}

/// Fixed decimal places, no separators — fee columns and medians.
pub fn fixed(value: Decimal, places: u32) -> String {
    let mut rounded = value.round_dp(places);
    rounded.rescale(places);
    rounded.to_string()
}

/// Native volume in billions: "12.34 B".
pub fn billions(value: Decimal) -> String {
    format!("{} B", fixed(value / Decimal::from(1_000_000_000), 2))
}

/// Formatted optional value, "N/A" when null.
pub fn or_na(value: Option<String>) -> String {
    value.unwrap_or_else(|| "N/A".to_string())
}

fn group_digits(digits: &str) -> String {
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    let len = digits.len();
    for (i, c) in digits.chars().enumerate() {
        if i > 0 && (len - i) % 3 == 0 {
            out.push(',');
        }
        out.push(c);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_thousands() {
        assert_eq!(thousands(0), "0");
        assert_eq!(thousands(999), "999");
        assert_eq!(thousands(1_000), "1,000");
        assert_eq!(thousands(1_234_567), "1,234,567");
        assert_eq!(thousands(-42_000), "-42,000");
    }

    #[test]
    fn test_usd() {
        assert_eq!(usd(Decimal::new(123_450, 2)), "$1,234.50");
        assert_eq!(usd(Decimal::from(5)), "$5.00");
        assert_eq!(usd(Decimal::new(5, 1)), "$0.50");
        assert_eq!(usd(Decimal::new(-75, 1)), "-$7.50");
    }

    #[test]
    fn test_fixed_and_billions() {
        assert_eq!(fixed(Decimal::new(12_345, 4), 4), "1.2345");
        assert_eq!(fixed(Decimal::ONE, 3), "1.000");
        assert_eq!(billions(Decimal::from(2_500_000_000i64)), "2.50 B");
    }

    #[test]
    fn test_or_na() {
        assert_eq!(or_na(None), "N/A");
        assert_eq!(or_na(Some("$1.00".into())), "$1.00");
    }
}

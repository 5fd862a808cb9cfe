//! Electrical sentinels and SI prefix handling.

/// Stand-in for a literal zero resistance. Anything at or below this value
/// contributes nothing to a series sum.
pub const ZERO_RESISTANCE: f64 = 1e-9;

/// Stand-in for an open (infinite) resistance.
pub const INFINITE_RESISTANCE: f64 = 1e12;

/// Currents below this magnitude count as "no current".
pub const CURRENT_EPSILON: f64 = 1e-9;

/// Absolute zero in degrees Celsius.
pub const ABSOLUTE_ZERO: f64 = -273.15;

/// Whether a resistance should be treated as a short.
pub fn is_zero_resistance(r: f64) -> bool {
    r <= ZERO_RESISTANCE
}

/// Parse a value with optional SI suffix, e.g. `4.7k` or `100m`.
///
/// Supported suffixes: G, M (mega), k, m (milli), u, n, p. `M` and `m` are
/// distinct; only `k`/`K` is case insensitive.
pub fn parse_value(s: &str) -> Option<f64> {
    let s = s.trim();

    if let Ok(v) = s.parse::<f64>() {
        return Some(v);
    }

    let num_end = s
        .find(|c: char| !c.is_ascii_digit() && c != '.' && c != '-' && c != '+' && c != 'e')
        .unwrap_or(s.len());

    if num_end == 0 {
        return None;
    }

    let (num_str, suffix) = s.split_at(num_end);
    let value: f64 = num_str.parse().ok()?;

    let multiplier = match suffix {
        "G" => 1e9,
        "M" => 1e6,
        "k" | "K" => 1e3,
        "" => 1.0,
        "m" => 1e-3,
        "u" | "µ" => 1e-6,
        "n" => 1e-9,
        "p" => 1e-12,
        _ => return None,
    };

    Some(value * multiplier)
}

/// Format a value with an SI prefix and unit symbol, e.g. `1.200 A`.
pub fn format_value(value: f64, unit: &str) -> String {
    if value.is_nan() {
        return format!("NaN {unit}");
    }
    let abs_value = value.abs();

    if abs_value >= INFINITE_RESISTANCE {
        return format!("∞ {unit}");
    }

    let (scaled, prefix) = if abs_value >= 1e9 {
        (value / 1e9, "G")
    } else if abs_value >= 1e6 {
        (value / 1e6, "M")
    } else if abs_value >= 1e3 {
        (value / 1e3, "k")
    } else if abs_value >= 1.0 || abs_value == 0.0 {
        (value, "")
    } else if abs_value >= 1e-3 {
        (value * 1e3, "m")
    } else if abs_value >= 1e-6 {
        (value * 1e6, "u")
    } else if abs_value >= 1e-9 {
        (value * 1e9, "n")
    } else {
        (0.0, "")
    };

    format!("{scaled:.3} {prefix}{unit}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_plain_number() {
        assert_eq!(parse_value("1.5"), Some(1.5));
        assert_eq!(parse_value("-2.5"), Some(-2.5));
        assert_eq!(parse_value("1e-3"), Some(1e-3));
    }

    #[test]
    fn test_parse_with_suffix() {
        fn approx_eq(a: Option<f64>, b: f64) -> bool {
            a.is_some_and(|v| (v - b).abs() < b.abs() * 1e-10 + 1e-20)
        }

        assert!(approx_eq(parse_value("1k"), 1e3));
        assert!(approx_eq(parse_value("4.7K"), 4.7e3));
        assert!(approx_eq(parse_value("10m"), 10e-3));
        assert!(approx_eq(parse_value("10M"), 10e6));
        assert!(approx_eq(parse_value("100n"), 100e-9));
        assert!(approx_eq(parse_value("1u"), 1e-6));
    }

    #[test]
    fn test_parse_invalid() {
        assert_eq!(parse_value("abc"), None);
        assert_eq!(parse_value(""), None);
        assert_eq!(parse_value("3x"), None);
    }

    #[test]
    fn test_format_value() {
        assert_eq!(format_value(1000.0, "Ω"), "1.000 kΩ");
        assert_eq!(format_value(1.2, "A"), "1.200 A");
        assert_eq!(format_value(0.005, "A"), "5.000 mA");
        assert_eq!(format_value(0.0, "V"), "0.000 V");
        assert_eq!(format_value(INFINITE_RESISTANCE, "Ω"), "∞ Ω");
    }

    #[test]
    fn test_format_nan_is_visible() {
        assert_eq!(format_value(f64::NAN, "A"), "NaN A");
    }
}

//! Numeric answer equivalence.
//!
//! Math answers arrive in many textual shapes ("0.5", "1/2", "50%",
//! "5e-1"). Both sides are scanned for their first number and the values
//! are compared under a small tolerance instead of as text.

/// Relative error below which two values match.
const RELATIVE_TOLERANCE: f64 = 0.005;

/// Absolute error below which two values match. Covers answers near
/// zero, where relative error is meaningless.
const ABSOLUTE_TOLERANCE: f64 = 0.05;

/// Whether two answers are numerically equivalent.
///
/// Returns false when either side has no extractable number. Values
/// match when they agree within relative or absolute tolerance, or
/// round to the same value at two decimal places.
pub fn is_numerically_equal(a: &str, b: &str) -> bool {
    match (extract_number(a), extract_number(b)) {
        (Some(x), Some(y)) => values_match(x, y),
        _ => false,
    }
}

/// Extract the first number that appears in a normalized answer.
///
/// Recognizes an optional sign, decimals, integer fractions ("3/4"),
/// scientific notation ("1.2e-3"), and a trailing percent sign, which
/// divides the value by 100.
pub fn extract_number(s: &str) -> Option<f64> {
    let chars: Vec<char> = s.chars().collect();
    for start in 0..chars.len() {
        if chars[start].is_ascii_digit() || matches!(chars[start], '-' | '+') {
            if let Some(value) = parse_number_at(&chars, start) {
                return Some(value);
            }
        }
    }
    None
}

fn parse_number_at(chars: &[char], start: usize) -> Option<f64> {
    let mut text = String::new();
    let mut i = start;
    if matches!(chars.get(i), Some('-') | Some('+')) {
        text.push(chars[i]);
        i += 1;
    }
    let digits_start = i;
    i = take_digits(chars, i, &mut text);
    if i == digits_start {
        return None;
    }

    // Integer fraction: evaluate "a/b" as a division.
    if chars.get(i) == Some(&'/') {
        let mut denominator = String::new();
        let j = take_digits(chars, i + 1, &mut denominator);
        let denominator_value: f64 = denominator.parse().unwrap_or(0.0);
        if denominator_value != 0.0 {
            let numerator: f64 = text.parse().ok()?;
            return Some(apply_percent(numerator / denominator_value, chars.get(j)));
        }
    }

    if chars.get(i) == Some(&'.') && matches!(chars.get(i + 1), Some(c) if c.is_ascii_digit()) {
        text.push('.');
        i = take_digits(chars, i + 1, &mut text);
    }

    if chars.get(i) == Some(&'e') {
        let mut exponent = String::new();
        let mut j = i + 1;
        if matches!(chars.get(j), Some('-') | Some('+')) {
            exponent.push(chars[j]);
            j += 1;
        }
        let exponent_end = take_digits(chars, j, &mut exponent);
        if exponent_end > j {
            text.push('e');
            text.push_str(&exponent);
            i = exponent_end;
        }
    }

    let value: f64 = text.parse().ok()?;
    Some(apply_percent(value, chars.get(i)))
}

fn take_digits(chars: &[char], mut i: usize, out: &mut String) -> usize {
    while i < chars.len() && chars[i].is_ascii_digit() {
        out.push(chars[i]);
        i += 1;
    }
    i
}

fn apply_percent(value: f64, next: Option<&char>) -> f64 {
    if next == Some(&'%') {
        value / 100.0
    } else {
        value
    }
}

fn values_match(x: f64, y: f64) -> bool {
    let abs_err = (x - y).abs();
    if abs_err < ABSOLUTE_TOLERANCE {
        return true;
    }
    let magnitude = x.abs().max(y.abs());
    if magnitude > 0.0 && abs_err / magnitude < RELATIVE_TOLERANCE {
        return true;
    }
    round_to_cents(x) == round_to_cents(y)
}

fn round_to_cents(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extracts_plain_and_embedded_numbers() {
        assert_eq!(extract_number("42"), Some(42.0));
        assert_eq!(extract_number("x=3.5"), Some(3.5));
        assert_eq!(extract_number("answeris-7"), Some(-7.0));
        assert_eq!(extract_number("no numbers here"), None);
        assert_eq!(extract_number(""), None);
    }

    #[test]
    fn test_extracts_fractions() {
        assert_eq!(extract_number("1/2"), Some(0.5));
        assert_eq!(extract_number("-3/4"), Some(-0.75));
        // Division by zero falls back to the integer part.
        assert_eq!(extract_number("1/0"), Some(1.0));
    }

    #[test]
    fn test_extracts_scientific_notation() {
        assert_eq!(extract_number("1.5e3"), Some(1500.0));
        assert_eq!(extract_number("2e-2"), Some(0.02));
        // A bare trailing "e" is not an exponent.
        assert_eq!(extract_number("5e"), Some(5.0));
    }

    #[test]
    fn test_extracts_percentages() {
        assert_eq!(extract_number("50%"), Some(0.5));
        assert_eq!(extract_number("0.5%"), Some(0.005));
    }

    #[test]
    fn test_fraction_equals_decimal() {
        assert!(is_numerically_equal("1/2", "0.5"));
        assert!(is_numerically_equal("50%", "0.5"));
        assert!(is_numerically_equal("5e-1", "0.5"));
    }

    #[test]
    fn test_relative_tolerance() {
        assert!(is_numerically_equal("1000", "1004"));
        assert!(!is_numerically_equal("1000", "1006"));
    }

    #[test]
    fn test_absolute_tolerance_near_zero() {
        assert!(is_numerically_equal("0.001", "0.04"));
        assert!(is_numerically_equal("0", "0.049"));
        assert!(!is_numerically_equal("0", "0.2"));
    }

    #[test]
    fn test_currency_style_rounding() {
        assert!(is_numerically_equal("19.999", "20"));
        assert!(is_numerically_equal("3.141", "3.14159"));
    }

    #[test]
    fn test_comparison_is_symmetric() {
        let pairs = [("1000", "1004"), ("0", "0.049"), ("1/2", "0.5"), ("7", "9")];
        for (a, b) in pairs {
            assert_eq!(is_numerically_equal(a, b), is_numerically_equal(b, a));
        }
    }

    #[test]
    fn test_missing_number_is_never_equal() {
        assert!(!is_numerically_equal("abc", "5"));
        assert!(!is_numerically_equal("5", "abc"));
        assert!(!is_numerically_equal("", ""));
    }
}

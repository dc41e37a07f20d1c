//! Answer normalization.
//!
//! Free-text answers are folded into a canonical form before comparison
//! so that "  5 KG " and "5kg" and "5" all read the same. The pipeline
//! is idempotent: normalizing an already-normalized string is a no-op.

/// Punctuation stripped from the end of an answer.
const TRAILING_PUNCTUATION: &[char] = &['.', ',', ';', '?', '!', '\'', '"'];

/// Base unit tokens recognized after a digit.
const BASE_UNITS: &[&str] = &[
    "m", "g", "s", "l", "n", "a", "v", "w", "j", "b", "hz", "pa", "mol", "cd",
];

/// Single-character metric prefixes accepted before a base unit.
const METRIC_PREFIXES: &[char] = &['n', 'u', 'µ', 'm', 'c', 'd', 'h', 'k'];

/// Normalize a free-text answer for comparison.
///
/// Lowercases, removes whitespace, strips trailing punctuation, folds
/// multiplication and division symbols to `*` and `/`, drops a trailing
/// unit suffix after a digit, collapses integer fractions to decimals,
/// and canonicalizes boolean words to "true"/"false".
pub fn normalize_answer(raw: &str) -> String {
    let lowered: String = raw.to_lowercase().chars().filter(|c| !c.is_whitespace()).collect();
    let stripped = strip_trailing_punctuation(&lowered);
    let folded = fold_math_symbols(&stripped);
    // Units come off before fraction collapsing so "1/2kg" settles to
    // "0.5" in a single pass.
    let unitless = strip_unit_suffix(&folded);
    let collapsed = collapse_fraction(&unitless);
    map_boolean_token(&collapsed)
}

/// Strip trailing punctuation unless the character before it is a digit,
/// which keeps a bare decimal like "3." intact.
fn strip_trailing_punctuation(s: &str) -> String {
    let mut chars: Vec<char> = s.chars().collect();
    while let Some(&last) = chars.last() {
        if !TRAILING_PUNCTUATION.contains(&last) {
            break;
        }
        let before = chars.len().checked_sub(2).map(|i| chars[i]);
        if matches!(before, Some(c) if c.is_ascii_digit()) {
            break;
        }
        chars.pop();
    }
    chars.into_iter().collect()
}

fn fold_math_symbols(s: &str) -> String {
    s.chars()
        .map(|c| match c {
            '×' | '⋅' => '*',
            '÷' => '/',
            other => other,
        })
        .collect()
}

/// Strip one trailing unit token (optionally metric-prefixed) that
/// directly follows a digit: "5kg" becomes "5".
fn strip_unit_suffix(s: &str) -> String {
    let chars: Vec<char> = s.chars().collect();
    let mut start = chars.len();
    while start > 0 && chars[start - 1].is_alphabetic() {
        start -= 1;
    }
    if start == 0 || start == chars.len() || !chars[start - 1].is_ascii_digit() {
        return s.to_string();
    }
    let suffix: String = chars[start..].iter().collect();
    if is_unit_token(&suffix) {
        chars[..start].iter().collect()
    } else {
        s.to_string()
    }
}

fn is_unit_token(token: &str) -> bool {
    if BASE_UNITS.contains(&token) {
        return true;
    }
    let mut chars = token.chars();
    match chars.next() {
        Some(prefix) if METRIC_PREFIXES.contains(&prefix) => BASE_UNITS.contains(&chars.as_str()),
        _ => false,
    }
}

/// Collapse a whole-string integer fraction like "3/4" to its decimal
/// value. Anything else, including division by zero, is left untouched.
fn collapse_fraction(s: &str) -> String {
    let body = s.strip_prefix('-').unwrap_or(s);
    let (numerator, denominator) = match body.split_once('/') {
        Some(parts) => parts,
        None => return s.to_string(),
    };
    if !is_integer(numerator) || !is_integer(denominator) {
        return s.to_string();
    }
    match (numerator.parse::<i64>(), denominator.parse::<i64>()) {
        (Ok(n), Ok(d)) if d != 0 => {
            let mut value = n as f64 / d as f64;
            if s.starts_with('-') {
                value = -value;
            }
            value.to_string()
        }
        _ => s.to_string(),
    }
}

fn is_integer(part: &str) -> bool {
    !part.is_empty() && part.chars().all(|c| c.is_ascii_digit())
}

/// Map whole-string boolean words onto their canonical form.
fn map_boolean_token(s: &str) -> String {
    match s {
        "true" | "yes" | "correct" | "t" | "y" => "true".to_string(),
        "false" | "no" | "incorrect" | "f" | "n" => "false".to_string(),
        _ => s.to_string(),
    }
}

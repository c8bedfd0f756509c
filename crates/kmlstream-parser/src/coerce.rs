//! Typed coercion of `<SimpleData>` text.
//!
//! Numeric parsing is permissive: the longest valid numeric prefix is used and
//! text with no numeric prefix becomes NaN instead of being rejected.

use kmlstream_core::{FieldType, PropertyValue};

/// Coerces raw text according to a declared field type.
///
/// Returns `None` when the value must be dropped: a bool that is not one of
/// `true`/`false`/`1`/`0`, or a string that cleans to nothing.
pub fn coerce_value(field_type: FieldType, raw: &str) -> Option<PropertyValue> {
    if field_type.is_integer() {
        return Some(PropertyValue::Number(parse_int_lenient(raw)));
    }
    if field_type.is_float() {
        return Some(PropertyValue::Number(parse_float_lenient(raw)));
    }

    match field_type {
        FieldType::Bool => match raw {
            "true" | "1" => Some(PropertyValue::Bool(true)),
            "false" | "0" => Some(PropertyValue::Bool(false)),
            _ => None,
        },
        FieldType::String => {
            let cleaned = clean_string(raw);
            if cleaned.is_empty() {
                None
            } else {
                Some(PropertyValue::String(cleaned))
            }
        }
        _ => None,
    }
}

/// Normalizes a string field value.
///
/// A value made only of newline, carriage-return and tab characters is
/// emptied, literal `\\` becomes `\`, then literal `\r`, `\n` and `\t` become
/// the control characters, and finally surrounding whitespace is trimmed.
pub fn clean_string(raw: &str) -> String {
    let is_control_ws = |c: char| matches!(c, '\n' | '\r' | '\t');
    if raw.chars().count() >= 2 && raw.chars().all(is_control_ws) {
        return String::new();
    }

    let unescaped = raw.replace("\\\\", "\\");

    let mut out = String::with_capacity(unescaped.len());
    let mut chars = unescaped.chars().peekable();
    while let Some(c) = chars.next() {
        if c == '\\' {
            let replacement = match chars.peek() {
                Some('r') => Some('\r'),
                Some('n') => Some('\n'),
                Some('t') => Some('\t'),
                _ => None,
            };
            if let Some(r) = replacement {
                out.push(r);
                chars.next();
                continue;
            }
        }
        out.push(c);
    }

    out.trim().to_string()
}

/// Parses the leading base-10 integer of `raw`, or NaN if there is none.
pub fn parse_int_lenient(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }
    let digits_start = end;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
    }
    if end == digits_start {
        return f64::NAN;
    }
    s[..end].parse().unwrap_or(f64::NAN)
}

/// Parses the leading decimal number of `raw` (with optional fraction and
/// exponent, or `Infinity`), or NaN if there is none.
pub fn parse_float_lenient(raw: &str) -> f64 {
    let s = raw.trim_start();
    let bytes = s.as_bytes();
    let mut end = 0;
    let negative = bytes.first() == Some(&b'-');
    if matches!(bytes.first(), Some(b'+') | Some(b'-')) {
        end = 1;
    }

    if s[end..].starts_with("Infinity") {
        return if negative { f64::NEG_INFINITY } else { f64::INFINITY };
    }

    let mut mantissa_digits = 0;
    while end < bytes.len() && bytes[end].is_ascii_digit() {
        end += 1;
        mantissa_digits += 1;
    }
    if end < bytes.len() && bytes[end] == b'.' {
        end += 1;
        while end < bytes.len() && bytes[end].is_ascii_digit() {
            end += 1;
            mantissa_digits += 1;
        }
    }
    if mantissa_digits == 0 {
        return f64::NAN;
    }

    // Exponent only counts when at least one digit follows it
    if end < bytes.len() && matches!(bytes[end], b'e' | b'E') {
        let mut exp_end = end + 1;
        if exp_end < bytes.len() && matches!(bytes[exp_end], b'+' | b'-') {
            exp_end += 1;
        }
        let exp_digits_start = exp_end;
        while exp_end < bytes.len() && bytes[exp_end].is_ascii_digit() {
            exp_end += 1;
        }
        if exp_end > exp_digits_start {
            end = exp_end;
        }
    }

    s[..end].parse().unwrap_or(f64::NAN)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_int_lenient() {
        assert_eq!(parse_int_lenient("42"), 42.0);
        assert_eq!(parse_int_lenient("  -17abc"), -17.0);
        assert_eq!(parse_int_lenient("12.9"), 12.0);
        assert_eq!(parse_int_lenient("+5"), 5.0);
        assert!(parse_int_lenient("abc").is_nan());
        assert!(parse_int_lenient("-").is_nan());
        assert!(parse_int_lenient("").is_nan());
    }

    #[test]
    fn test_parse_float_lenient() {
        assert_eq!(parse_float_lenient("3.25"), 3.25);
        assert_eq!(parse_float_lenient(" -0.5m"), -0.5);
        assert_eq!(parse_float_lenient(".5"), 0.5);
        assert_eq!(parse_float_lenient("5."), 5.0);
        assert_eq!(parse_float_lenient("1e3"), 1000.0);
        assert_eq!(parse_float_lenient("2e"), 2.0);
        assert_eq!(parse_float_lenient("2e+x"), 2.0);
        assert_eq!(parse_float_lenient("-Infinity"), f64::NEG_INFINITY);
        assert!(parse_float_lenient(".").is_nan());
        assert!(parse_float_lenient("n/a").is_nan());
    }

    #[test]
    fn test_clean_string() {
        assert_eq!(clean_string("  hello  "), "hello");
        assert_eq!(clean_string("\n\t"), "");
        assert_eq!(clean_string(r"line one\nline two"), "line one\nline two");
        assert_eq!(clean_string(r"a\tb\rc"), "a\tb\rc");
        // `\\` collapses first, so the resulting `\t` becomes a tab
        assert_eq!(clean_string(r"C:\\temp"), "C:\temp");
        assert_eq!(clean_string(r"keep \x as is"), r"keep \x as is");
        // Escaped backslash followed by n unescapes twice
        assert_eq!(clean_string(r"a\\nb"), "a\nb");
    }

    #[test]
    fn test_coerce_bool() {
        assert_eq!(coerce_value(FieldType::Bool, "1"), Some(PropertyValue::Bool(true)));
        assert_eq!(coerce_value(FieldType::Bool, "true"), Some(PropertyValue::Bool(true)));
        assert_eq!(coerce_value(FieldType::Bool, "0"), Some(PropertyValue::Bool(false)));
        assert_eq!(coerce_value(FieldType::Bool, "false"), Some(PropertyValue::Bool(false)));
        assert_eq!(coerce_value(FieldType::Bool, "maybe"), None);
        assert_eq!(coerce_value(FieldType::Bool, "TRUE"), None);
    }

    #[test]
    fn test_coerce_numbers() {
        assert_eq!(coerce_value(FieldType::Ushort, "7"), Some(PropertyValue::Number(7.0)));
        assert_eq!(coerce_value(FieldType::Double, "7.5"), Some(PropertyValue::Number(7.5)));

        match coerce_value(FieldType::Int, "seven") {
            Some(PropertyValue::Number(n)) => assert!(n.is_nan()),
            other => panic!("expected NaN number, got {:?}", other),
        }
    }

    #[test]
    fn test_coerce_string() {
        assert_eq!(
            coerce_value(FieldType::String, " Main St "),
            Some(PropertyValue::from("Main St"))
        );
        assert_eq!(coerce_value(FieldType::String, "   "), None);
    }
}

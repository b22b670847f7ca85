/*
 * text.rs
 * Copyright (c) 2025 Posit, PBC
 */

//! Canonical text forms for primitive values.
//!
//! Output must be identical regardless of host, so every primitive has an
//! explicit rendering here rather than relying on `Display`. Numbers follow
//! ECMAScript's `Number::toString` (radix 10):
//!
//! | value               | text          |
//! |---------------------|---------------|
//! | `NaN`               | `NaN`         |
//! | `+0`, `-0`          | `0`           |
//! | `±∞`                | `Infinity`, `-Infinity` |
//! | `1e21`              | `1e+21`       |
//! | `1e-7`              | `1e-7`        |
//! | `0.000001`          | `0.000001`    |
//! | `123.5`             | `123.5`       |

use crate::error::{StreamError, StreamResult};
use crate::value::Value;

/// Render a scalar value as text.
///
/// Returns `None` for values that are not scalars (deferred, callable,
/// sequential, or object values); the resolver handles those itself.
pub fn scalar_text(value: &Value) -> Option<StreamResult<String>> {
    let text = match value {
        Value::Undefined => "undefined".to_string(),
        Value::Null => "null".to_string(),
        Value::Bool(true) => "true".to_string(),
        Value::Bool(false) => "false".to_string(),
        Value::Number(n) => number_text(*n),
        Value::BigInt(n) => n.to_string(),
        Value::String(s) => s.clone(),
        Value::Symbol(symbol) => {
            return Some(Err(StreamError::SymbolConversion {
                description: symbol.to_string(),
            }));
        }
        _ => return None,
    };
    Some(Ok(text))
}

/// Format a number the way ECMAScript's `Number.prototype.toString` does.
pub fn number_text(n: f64) -> String {
    if n.is_nan() {
        return "NaN".to_string();
    }
    if n == 0.0 {
        return "0".to_string();
    }
    if n.is_infinite() {
        return if n > 0.0 { "Infinity" } else { "-Infinity" }.to_string();
    }

    let sign = if n < 0.0 { "-" } else { "" };

    // `{:e}` yields the shortest round-tripping digits, e.g. "1.2345e2".
    let scientific = format!("{:e}", n.abs());
    let (mantissa, exponent) = scientific.split_once('e').unwrap_or((scientific.as_str(), "0"));
    let exponent: i32 = exponent.parse().unwrap_or(0);
    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();

    // k digits with the decimal point after `point` of them
    let k = digits.len() as i32;
    let point = exponent + 1;

    let body = if k <= point && point <= 21 {
        format!("{digits}{}", "0".repeat((point - k) as usize))
    } else if 0 < point && point <= 21 {
        let (int, frac) = digits.split_at(point as usize);
        format!("{int}.{frac}")
    } else if -6 < point && point <= 0 {
        format!("0.{}{digits}", "0".repeat((-point) as usize))
    } else {
        let e = point - 1;
        let e_sign = if e >= 0 { '+' } else { '-' };
        let (first, rest) = digits.split_at(1);
        if rest.is_empty() {
            format!("{first}e{e_sign}{}", e.abs())
        } else {
            format!("{first}.{rest}e{e_sign}{}", e.abs())
        }
    };

    format!("{sign}{body}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::value::PlainObject;

    fn text(value: Value) -> String {
        scalar_text(&value).unwrap().unwrap()
    }

    #[test]
    fn test_primitive_forms() {
        assert_eq!(text(Value::Undefined), "undefined");
        assert_eq!(text(Value::Null), "null");
        assert_eq!(text(Value::Bool(false)), "false");
        assert_eq!(text(Value::Bool(true)), "true");
        assert_eq!(text(Value::BigInt(0)), "0");
        assert_eq!(
            text(Value::BigInt(i128::MIN)),
            "-170141183460469231731687303715884105728"
        );
        assert_eq!(text(Value::from("")), "");
    }

    #[test]
    fn test_special_numbers() {
        assert_eq!(number_text(f64::NAN), "NaN");
        assert_eq!(number_text(0.0), "0");
        assert_eq!(number_text(-0.0), "0");
        assert_eq!(number_text(f64::INFINITY), "Infinity");
        assert_eq!(number_text(f64::NEG_INFINITY), "-Infinity");
    }

    #[test]
    fn test_integral_numbers() {
        assert_eq!(number_text(1.0), "1");
        assert_eq!(number_text(-42.0), "-42");
        assert_eq!(number_text(100.0), "100");
        assert_eq!(number_text(9_007_199_254_740_992.0), "9007199254740992");
        assert_eq!(number_text(1e20), "100000000000000000000");
    }

    #[test]
    fn test_fractional_numbers() {
        assert_eq!(number_text(0.1), "0.1");
        assert_eq!(number_text(123.456), "123.456");
        assert_eq!(number_text(-1.5), "-1.5");
        assert_eq!(number_text(0.1 + 0.2), "0.30000000000000004");
        assert_eq!(number_text(0.000001), "0.000001");
    }

    #[test]
    fn test_exponent_numbers() {
        assert_eq!(number_text(1e21), "1e+21");
        assert_eq!(number_text(1.5e300), "1.5e+300");
        assert_eq!(number_text(1e-7), "1e-7");
        assert_eq!(number_text(-2.5e-8), "-2.5e-8");
        assert_eq!(number_text(f64::MAX), "1.7976931348623157e+308");
        assert_eq!(number_text(5e-324), "5e-324");
    }

    #[test]
    fn test_symbol_fails() {
        let result = scalar_text(&Value::symbol("tag")).unwrap();
        assert!(matches!(
            result,
            Err(StreamError::SymbolConversion { description }) if description == "Symbol(tag)"
        ));
    }

    #[test]
    fn test_non_scalars_are_skipped() {
        assert!(scalar_text(&Value::object(PlainObject)).is_none());
        assert!(scalar_text(&Value::iter(Vec::<String>::new())).is_none());
    }
}

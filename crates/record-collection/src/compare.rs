//! Loose and strict value comparison.
//!
//! Filtering compares field values the way a dynamically typed host
//! language would. Loose comparison coerces across types:
//!
//! | Left / right                  | Rule                                        |
//! |-------------------------------|---------------------------------------------|
//! | `null` / `null`               | equal                                       |
//! | `bool` / anything             | compare truthiness (`false < true`)         |
//! | `null` / string               | compare `""` with the string                |
//! | `null` / anything else        | compare truthiness                          |
//! | number / number               | numeric                                     |
//! | number / numeric string       | numeric (`5 == "5"`, `5 == "5.0"`)          |
//! | number / other string         | number's JSON text against the string       |
//! | string / string               | numeric when both are numeric, else bytes   |
//! | array / array                 | length, then element by element             |
//! | object / object               | size, then each key of the left side        |
//! | array or object / scalar      | the container is greater                    |
//!
//! Anything else (an array against an object, an object missing one of the
//! other side's keys) is uncomparable: every ordering operator is false.
//!
//! Strict comparison is structural equality with no coercion: `1` and
//! `1.0` differ, `"1"` and `1` differ, object key order is irrelevant.

use std::cmp::Ordering;

use serde_json::{Number, Value};

use crate::value::{is_truthy, number_text, parse_numeric};

/// Compares two values with type coercion.
///
/// Returns `None` when the values are uncomparable.
pub fn loose_cmp(a: &Value, b: &Value) -> Option<Ordering> {
    match (a, b) {
        (Value::Null, Value::Null) => Some(Ordering::Equal),

        (Value::Bool(x), _) => Some(x.cmp(&is_truthy(b))),
        (_, Value::Bool(y)) => Some(is_truthy(a).cmp(y)),

        (Value::Null, Value::String(s)) => Some("".cmp(s.as_str())),
        (Value::String(s), Value::Null) => Some(s.as_str().cmp("")),
        (Value::Null, _) => Some(false.cmp(&is_truthy(b))),
        (_, Value::Null) => Some(is_truthy(a).cmp(&false)),

        (Value::Number(x), Value::Number(y)) => Some(compare_numbers(x, y)),
        (Value::Number(n), Value::String(s)) => number_to_string(n, s),
        (Value::String(s), Value::Number(n)) => number_to_string(n, s).map(Ordering::reverse),
        (Value::String(x), Value::String(y)) => match (parse_numeric(x), parse_numeric(y)) {
            (Some(fx), Some(fy)) => fx.partial_cmp(&fy),
            _ => Some(x.cmp(y)),
        },

        (Value::Array(xs), Value::Array(ys)) => {
            if xs.len() != ys.len() {
                return Some(xs.len().cmp(&ys.len()));
            }
            for (x, y) in xs.iter().zip(ys) {
                match loose_cmp(x, y)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(Ordering::Equal)
        }
        (Value::Object(xs), Value::Object(ys)) => {
            if xs.len() != ys.len() {
                return Some(xs.len().cmp(&ys.len()));
            }
            for (key, x) in xs {
                match loose_cmp(x, ys.get(key)?)? {
                    Ordering::Equal => continue,
                    other => return Some(other),
                }
            }
            Some(Ordering::Equal)
        }
        (Value::Array(_), Value::Object(_)) | (Value::Object(_), Value::Array(_)) => None,

        (Value::Array(_) | Value::Object(_), _) => Some(Ordering::Greater),
        (_, Value::Array(_) | Value::Object(_)) => Some(Ordering::Less),
    }
}

/// Loose equality (`==`).
pub fn loose_eq(a: &Value, b: &Value) -> bool {
    loose_cmp(a, b) == Some(Ordering::Equal)
}

/// Strict equality (`===`): same type and same value.
pub fn strict_eq(a: &Value, b: &Value) -> bool {
    a == b
}

/// Compares two JSON numbers exactly.
///
/// Integers never round through `f64`, so the result is a total order even
/// for integers above 2^53 mixed with floats.
pub(crate) fn compare_numbers(a: &Number, b: &Number) -> Ordering {
    match (integer(a), integer(b)) {
        (Some(x), Some(y)) => x.cmp(&y),
        (Some(x), None) => compare_integer_float(x, float(b)),
        (None, Some(y)) => compare_integer_float(y, float(a)).reverse(),
        (None, None) => float(a).partial_cmp(&float(b)).unwrap_or(Ordering::Equal),
    }
}

fn integer(n: &Number) -> Option<i128> {
    n.as_i64()
        .map(i128::from)
        .or_else(|| n.as_u64().map(i128::from))
}

fn float(n: &Number) -> f64 {
    n.as_f64().unwrap_or(0.0)
}

// JSON integers lie in [-2^63, 2^64).
const FLOAT_ABOVE_INTEGERS: f64 = 18_446_744_073_709_551_616.0;
const FLOAT_BELOW_INTEGERS: f64 = -9_223_372_036_854_775_808.0;

fn compare_integer_float(i: i128, f: f64) -> Ordering {
    if f >= FLOAT_ABOVE_INTEGERS {
        return Ordering::Less;
    }
    if f < FLOAT_BELOW_INTEGERS {
        return Ordering::Greater;
    }
    let whole = f.trunc();
    i.cmp(&(whole as i128)).then_with(|| {
        if f > whole {
            Ordering::Less
        } else if f < whole {
            Ordering::Greater
        } else {
            Ordering::Equal
        }
    })
}

fn number_to_string(n: &Number, s: &str) -> Option<Ordering> {
    match parse_numeric(s) {
        Some(parsed) => n.as_f64()?.partial_cmp(&parsed),
        None => Some(number_text(n).as_str().cmp(s)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn numeric_string_equals_number() {
        assert!(loose_eq(&json!("5"), &json!(5)));
        assert!(loose_eq(&json!(5), &json!("5.0")));
        assert!(loose_eq(&json!(" 5"), &json!(5)));
        assert!(!loose_eq(&json!("5a"), &json!(5)));
        assert!(!strict_eq(&json!("5"), &json!(5)));
    }

    #[test]
    fn numeric_strings_compare_numerically() {
        assert!(loose_eq(&json!("10"), &json!("1e1")));
        assert_eq!(loose_cmp(&json!("9"), &json!("10")), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!("a9"), &json!("a10")), Some(Ordering::Greater));
    }

    #[test]
    fn number_against_text() {
        assert!(!loose_eq(&json!(0), &json!("abc")));
        assert_eq!(loose_cmp(&json!(1), &json!("abc")), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!("abc"), &json!(1)), Some(Ordering::Greater));
    }

    #[test]
    fn bools_compare_by_truthiness() {
        assert!(loose_eq(&json!(true), &json!("yes")));
        assert!(loose_eq(&json!(1), &json!(true)));
        assert!(loose_eq(&json!(false), &json!("0")));
        assert!(loose_eq(&json!(false), &json!(null)));
        assert!(!loose_eq(&json!(true), &json!(0)));
    }

    #[test]
    fn null_coercions() {
        assert!(loose_eq(&json!(null), &json!(null)));
        assert!(loose_eq(&json!(null), &json!("")));
        assert!(!loose_eq(&json!(null), &json!("0")));
        assert!(loose_eq(&json!(null), &json!(0)));
        assert!(loose_eq(&json!(null), &json!([])));
        assert_eq!(loose_cmp(&json!(null), &json!(5)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!(-5), &json!(null)), Some(Ordering::Greater));
    }

    #[test]
    fn integers_compare_exactly() {
        let big = json!(9_007_199_254_740_993i64);
        let near = json!(9_007_199_254_740_992i64);
        assert_eq!(loose_cmp(&big, &near), Some(Ordering::Greater));
        assert!(loose_eq(&json!(1), &json!(1.0)));
        assert!(!strict_eq(&json!(1), &json!(1.0)));
    }

    #[test]
    fn integers_and_floats_compare_exactly_above_2_pow_53() {
        let odd = json!(9_007_199_254_740_993i64);
        let float = json!(9_007_199_254_740_992.0);
        let even = json!(9_007_199_254_740_992i64);
        assert_eq!(loose_cmp(&odd, &float), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&float, &odd), Some(Ordering::Less));
        assert!(loose_eq(&float, &even));
        assert_eq!(loose_cmp(&json!(u64::MAX), &json!(1e30)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!(i64::MIN), &json!(-1e30)), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&json!(-2), &json!(-1.5)), Some(Ordering::Less));
        assert_eq!(loose_cmp(&json!(-1), &json!(-1.5)), Some(Ordering::Greater));
        assert!(loose_eq(&json!(0), &json!(-0.0)));
    }

    #[test]
    fn containers() {
        assert!(loose_eq(&json!([1, "2"]), &json!(["1", 2])));
        assert_eq!(loose_cmp(&json!([1]), &json!([1, 2])), Some(Ordering::Less));
        assert!(loose_eq(&json!({"a": 1, "b": "2"}), &json!({"b": 2, "a": "1"})));
        assert_eq!(loose_cmp(&json!({"a": 1}), &json!({"b": 1})), None);
        assert_eq!(loose_cmp(&json!([1]), &json!({"a": 1})), None);
        assert_eq!(loose_cmp(&json!([1]), &json!(100)), Some(Ordering::Greater));
        assert_eq!(loose_cmp(&json!("z"), &json!({"a": 1})), Some(Ordering::Less));
    }

    #[test]
    fn strict_object_equality_ignores_key_order() {
        assert!(strict_eq(&json!({"a": 1, "b": 2}), &json!({"b": 2, "a": 1})));
        assert!(!strict_eq(&json!({"a": 1}), &json!({"a": "1"})));
    }
}

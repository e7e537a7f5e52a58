//! Record representation and value helpers.
//!
//! A [`Record`] is a JSON object: string keys mapped to dynamically typed
//! [`Value`]s. The helpers here are the building blocks the comparison,
//! grouping, and matching code shares: missing-field lookup, truthiness,
//! numeric-string coercion, and the string forms used by `like` and
//! `group_by`.

use std::borrow::Cow;

use serde_json::{Number, Value};

/// One element of a collection.
///
/// With the default `preserve_order` feature, keys keep insertion order.
pub type Record = serde_json::Map<String, Value>;

static NULL: Value = Value::Null;

/// Looks up `key` in a record, treating a missing key as `null`.
///
/// # Example
///
/// ```
/// use record_collection::{field, Record, Value};
/// use serde_json::json;
///
/// let record: Record = json!({"id": 1}).as_object().cloned().unwrap();
/// assert_eq!(field(&record, "id"), &json!(1));
/// assert_eq!(field(&record, "name"), &Value::Null);
/// ```
pub fn field<'a>(record: &'a Record, key: &str) -> &'a Value {
    record.get(key).unwrap_or(&NULL)
}

/// Returns a short name for the value's type, used in error messages.
pub fn type_name(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "bool",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}

/// Truthiness of a value.
///
/// `null`, `false`, `0`, `0.0`, `""`, `"0"`, `[]`, and `{}` are falsy;
/// everything else is truthy.
pub fn is_truthy(value: &Value) -> bool {
    match value {
        Value::Null => false,
        Value::Bool(b) => *b,
        Value::Number(n) => n.as_f64().is_some_and(|f| f != 0.0),
        Value::String(s) => !(s.is_empty() || s == "0"),
        Value::Array(items) => !items.is_empty(),
        Value::Object(map) => !map.is_empty(),
    }
}

/// Parses a numeric string such as `"42"`, `" -1.5 "`, or `"1e3"`.
///
/// Surrounding whitespace is allowed. Words that Rust's float parser
/// accepts (`"inf"`, `"NaN"`) are not numeric strings.
pub fn parse_numeric(s: &str) -> Option<f64> {
    let trimmed = s.trim();
    let plausible = trimmed.bytes().any(|b| b.is_ascii_digit())
        && trimmed
            .bytes()
            .all(|b| b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E'));
    if !plausible {
        return None;
    }
    trimmed.parse::<f64>().ok()
}

/// The text form of a number.
///
/// Integral floats below 10^15 drop the fractional part, so `1.0` is `"1"`
/// like the integer `1`. Other numbers use their JSON text.
pub fn number_text(n: &Number) -> String {
    match n.as_f64() {
        Some(f) if n.is_f64() && f.fract() == 0.0 && f.abs() < 1e15 => format!("{f:.0}"),
        _ => n.to_string(),
    }
}

/// The text a scalar value is matched against.
///
/// Strings are borrowed; numbers render through [`number_text`] and booleans
/// to `"true"`/`"false"`.
/// `null` and containers have no text form.
pub fn scalar_text(value: &Value) -> Option<Cow<'_, str>> {
    match value {
        Value::String(s) => Some(Cow::Borrowed(s.as_str())),
        Value::Number(n) => Some(Cow::Owned(number_text(n))),
        Value::Bool(b) => Some(Cow::Borrowed(if *b { "true" } else { "false" })),
        Value::Null | Value::Array(_) | Value::Object(_) => None,
    }
}

/// The map key a value groups under.
///
/// Strings are used as-is and `null` becomes `""`. Numbers use
/// [`number_text`]; everything else uses its compact JSON text.
pub fn group_key(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::String(s) => s.clone(),
        Value::Number(n) => number_text(n),
        other => other.to_string(),
    }
}

/// Converts an arbitrary JSON value into a record, if it is an object.
pub(crate) fn into_record(value: Value) -> std::result::Result<Record, &'static str> {
    match value {
        Value::Object(map) => Ok(map),
        other => Err(type_name(&other)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn record(value: Value) -> Record {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn field_lookup() {
        let r = record(json!({"name": "Al", "age": 30}));
        assert_eq!(field(&r, "name"), &json!("Al"));
        assert_eq!(field(&r, "age"), &json!(30));
        assert!(field(&r, "missing").is_null());
    }

    #[test]
    fn truthiness() {
        assert!(!is_truthy(&json!(null)));
        assert!(!is_truthy(&json!(false)));
        assert!(!is_truthy(&json!(0)));
        assert!(!is_truthy(&json!(0.0)));
        assert!(!is_truthy(&json!("")));
        assert!(!is_truthy(&json!("0")));
        assert!(!is_truthy(&json!([])));
        assert!(!is_truthy(&json!({})));

        assert!(is_truthy(&json!(true)));
        assert!(is_truthy(&json!(-1)));
        assert!(is_truthy(&json!("0.0")));
        assert!(is_truthy(&json!("false")));
        assert!(is_truthy(&json!([0])));
    }

    #[test]
    fn numeric_strings() {
        assert_eq!(parse_numeric("42"), Some(42.0));
        assert_eq!(parse_numeric(" -1.5 "), Some(-1.5));
        assert_eq!(parse_numeric("1e3"), Some(1000.0));
        assert_eq!(parse_numeric(".5"), Some(0.5));

        assert_eq!(parse_numeric(""), None);
        assert_eq!(parse_numeric("abc"), None);
        assert_eq!(parse_numeric("12abc"), None);
        assert_eq!(parse_numeric("inf"), None);
        assert_eq!(parse_numeric("NaN"), None);
        assert_eq!(parse_numeric("1-2"), None);
    }

    #[test]
    fn scalar_text_forms() {
        assert_eq!(scalar_text(&json!("Al")).as_deref(), Some("Al"));
        assert_eq!(scalar_text(&json!(12)).as_deref(), Some("12"));
        assert_eq!(scalar_text(&json!(1.0)).as_deref(), Some("1"));
        assert_eq!(scalar_text(&json!(-3.0)).as_deref(), Some("-3"));
        assert_eq!(scalar_text(&json!(2.5)).as_deref(), Some("2.5"));
        assert_eq!(scalar_text(&json!(true)).as_deref(), Some("true"));
        assert_eq!(scalar_text(&json!(null)), None);
        assert_eq!(scalar_text(&json!([1])), None);
    }

    #[test]
    fn group_keys() {
        assert_eq!(group_key(&json!("Al")), "Al");
        assert_eq!(group_key(&json!(3)), "3");
        assert_eq!(group_key(&json!(3.0)), "3");
        assert_eq!(group_key(&json!(1e20)), "1e20");
        assert_eq!(group_key(&json!(false)), "false");
        assert_eq!(group_key(&json!(null)), "");
        assert_eq!(group_key(&json!([1, 2])), "[1,2]");
    }

    #[test]
    fn type_names() {
        assert_eq!(type_name(&json!(null)), "null");
        assert_eq!(type_name(&json!("x")), "string");
        assert_eq!(type_name(&json!({})), "object");
        assert_eq!(into_record(json!(5)), Err("number"));
        assert!(into_record(json!({"a": 1})).is_ok());
    }
}

//! Property readers that tolerate the mixed typing of the source exports.
//!
//! The same property may be a JSON number in one file and a string in
//! another (ids exported as `5.0`, values exported as `"1250000"`). These
//! readers accept both and treat `null`, an empty string and an absent key
//! alike.

use geojson::JsonObject;
use serde_json::Value;

/// Reads an identifier. Strings are trimmed; numbers are stringified with
/// integral floats written without a fractional part (`5.0` becomes `"5"`).
#[must_use]
pub fn read_id(props: &JsonObject, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => non_empty(s),
        Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                return Some(i.to_string());
            }
            if let Some(u) = n.as_u64() {
                return Some(u.to_string());
            }
            let f = n.as_f64()?;
            if f.is_finite() && f.fract() == 0.0 && f.abs() < 1e15 {
                #[allow(clippy::cast_possible_truncation)]
                let i = f as i64;
                Some(i.to_string())
            } else {
                Some(f.to_string())
            }
        }
        _ => None,
    }
}

/// Reads a free-text label. Numbers are stringified.
#[must_use]
pub fn read_text(props: &JsonObject, key: &str) -> Option<String> {
    match props.get(key)? {
        Value::String(s) => non_empty(s),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

/// Reads a finite number from a JSON number or a numeric string.
#[must_use]
pub fn read_f64(props: &JsonObject, key: &str) -> Option<f64> {
    let value = match props.get(key)? {
        Value::Number(n) => n.as_f64()?,
        Value::String(s) => s.trim().parse::<f64>().ok()?,
        _ => return None,
    };
    value.is_finite().then_some(value)
}

/// Reads a whole number that fits `T`. Non-integral values are rejected.
#[must_use]
pub fn read_integer<T: TryFrom<i64>>(props: &JsonObject, key: &str) -> Option<T> {
    let value = read_f64(props, key)?;
    if value.fract() != 0.0 || value.abs() >= 9.0e15 {
        return None;
    }
    #[allow(clippy::cast_possible_truncation)]
    let whole = value as i64;
    T::try_from(whole).ok()
}

fn non_empty(s: &str) -> Option<String> {
    let trimmed = s.trim();
    (!trimmed.is_empty()).then(|| trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn props(value: Value) -> JsonObject {
        match value {
            Value::Object(map) => map,
            _ => panic!("expected an object"),
        }
    }

    #[test]
    fn ids_from_strings_and_numbers() {
        let p = props(serde_json::json!({
            "a": " M-001 ",
            "b": 17,
            "c": 5.0,
            "d": 2.5,
            "e": "",
            "f": null,
        }));
        assert_eq!(read_id(&p, "a").as_deref(), Some("M-001"));
        assert_eq!(read_id(&p, "b").as_deref(), Some("17"));
        assert_eq!(read_id(&p, "c").as_deref(), Some("5"));
        assert_eq!(read_id(&p, "d").as_deref(), Some("2.5"));
        assert_eq!(read_id(&p, "e"), None);
        assert_eq!(read_id(&p, "f"), None);
        assert_eq!(read_id(&p, "missing"), None);
    }

    #[test]
    fn numbers_from_numeric_strings() {
        let p = props(serde_json::json!({
            "a": 1250000.5,
            "b": " 980000 ",
            "c": "n/a",
            "d": true,
        }));
        assert_eq!(read_f64(&p, "a"), Some(1_250_000.5));
        assert_eq!(read_f64(&p, "b"), Some(980_000.0));
        assert_eq!(read_f64(&p, "c"), None);
        assert_eq!(read_f64(&p, "d"), None);
    }

    #[test]
    fn integers_must_be_whole_and_in_range() {
        let p = props(serde_json::json!({
            "stratum": 3.0,
            "schools": "12",
            "half": 2.5,
            "negative": -1,
            "big": 300,
        }));
        assert_eq!(read_integer::<u8>(&p, "stratum"), Some(3));
        assert_eq!(read_integer::<u32>(&p, "schools"), Some(12));
        assert_eq!(read_integer::<u32>(&p, "half"), None);
        assert_eq!(read_integer::<u32>(&p, "negative"), None);
        assert_eq!(read_integer::<u8>(&p, "big"), None);
    }

    #[test]
    fn text_accepts_numbers() {
        let p = props(serde_json::json!({"label": "Alta", "code": 12}));
        assert_eq!(read_text(&p, "label").as_deref(), Some("Alta"));
        assert_eq!(read_text(&p, "code").as_deref(), Some("12"));
    }
}

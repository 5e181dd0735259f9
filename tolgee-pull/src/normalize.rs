//! Replacing untranslated (null) values with format defaults.
//!
//! Tolgee exports keys without a translation as `null`. Neither output format
//! may contain a literal null, so:
//!
//! - the JSON output replaces every null, at any depth, with `""`
//!   ([`normalize_catalog`]);
//! - the Android output coalesces top-level nulls to `""` before it filters
//!   for string values ([`coalesce`]), so the key stays in the document as an
//!   empty `<string>` instead of disappearing.

use crate::types::{Catalog, Value};

/// Returns a copy of the catalog with every null leaf replaced by `""`.
///
/// Key order and the shape of nested maps and lists are unchanged; text and
/// scalar leaves are copied as they are.
pub fn normalize_catalog(catalog: &Catalog) -> Catalog {
    catalog
        .iter()
        .map(|(key, value)| (key.to_string(), normalize_value(value)))
        .collect()
}

/// Recursively replaces null leaves inside a single value.
pub fn normalize_value(value: &Value) -> Value {
    match value {
        Value::Null => Value::Text(String::new()),
        Value::Map(catalog) => Value::Map(normalize_catalog(catalog)),
        Value::List(items) => Value::List(items.iter().map(normalize_value).collect()),
        Value::Text(_) | Value::Scalar(_) => value.clone(),
    }
}

/// Text view of a top-level value for the resource document.
///
/// Null counts as the empty string; maps, lists and scalars have no text view.
pub fn coalesce(value: &Value) -> Option<&str> {
    match value {
        Value::Text(text) => Some(text),
        Value::Null => Some(""),
        Value::Map(_) | Value::List(_) | Value::Scalar(_) => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traits::Parser;

    #[test]
    fn test_normalize_replaces_nested_nulls() {
        let catalog = Catalog::from_str(
            r#"{"a": null, "b": {"c": null, "d": "x"}, "e": [null, "y", {"f": null}]}"#,
        )
        .unwrap();
        let normalized = normalize_catalog(&catalog);

        assert!(!normalized.contains_null());
        assert_eq!(
            serde_json::to_string(&normalized).unwrap(),
            r#"{"a":"","b":{"c":"","d":"x"},"e":["","y",{"f":""}]}"#
        );
    }

    #[test]
    fn test_normalize_keeps_order_and_scalars() {
        let catalog = Catalog::from_str(r#"{"z": 1, "y": true, "x": "text"}"#).unwrap();
        let normalized = normalize_catalog(&catalog);
        assert_eq!(normalized, catalog);
        assert_eq!(normalized.keys().collect::<Vec<_>>(), vec!["z", "y", "x"]);
    }

    #[test]
    fn test_coalesce() {
        assert_eq!(coalesce(&Value::from("hi")), Some("hi"));
        assert_eq!(coalesce(&Value::Null), Some(""));
        assert_eq!(coalesce(&Value::List(vec![])), None);
        assert_eq!(coalesce(&Value::Map(Catalog::new())), None);
        assert_eq!(coalesce(&Value::Scalar(serde_json::json!(42))), None);
    }
}

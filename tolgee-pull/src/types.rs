//! Core catalog types for tolgee-pull.
//! Export files decode into these; the output formats serialize from these.

use std::{
    collections::HashMap,
    io::{BufRead, Read, Write},
};

use serde::{
    Deserialize, Deserializer, Serialize, Serializer,
    ser::{SerializeMap, SerializeSeq},
};

use crate::{error::Error, traits::Parser};

/// One exported locale/file: an ordered mapping from key to [`Value`].
///
/// Keys are unique within one nesting level. Insertion order is kept so that
/// every output format lists keys in the order the export listed them.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Catalog {
    entries: Vec<(String, Value)>,
    /// Position of every key in `entries`.
    index: HashMap<String, usize>,
}

/// A single value inside a [`Catalog`].
#[derive(Debug, Clone, PartialEq)]
pub enum Value {
    /// A translated text.
    Text(String),

    /// A key without a translation.
    Null,

    /// A nested catalog (structured exports).
    Map(Catalog),

    /// A sequence of values.
    List(Vec<Value>),

    /// Numbers and booleans. Carried through untouched.
    Scalar(serde_json::Value),
}

impl Catalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Inserts a value, replacing (in place) any previous value with the same key.
    pub fn insert(&mut self, key: impl Into<String>, value: Value) {
        let key = key.into();
        match self.index.get(&key) {
            Some(&position) => self.entries[position].1 = value,
            None => {
                self.index.insert(key.clone(), self.entries.len());
                self.entries.push((key, value));
            }
        }
    }

    pub fn get(&self, key: &str) -> Option<&Value> {
        self.index
            .get(key)
            .map(|&position| &self.entries[position].1)
    }

    /// Iterates over all entries in insertion order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &Value)> {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(k, _)| k.as_str())
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Returns `true` if a null value appears anywhere in the catalog.
    pub fn contains_null(&self) -> bool {
        self.entries.iter().any(|(_, value)| value.contains_null())
    }
}

impl Value {
    pub fn as_text(&self) -> Option<&str> {
        match self {
            Value::Text(text) => Some(text),
            _ => None,
        }
    }

    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    fn kind(&self) -> &'static str {
        match self {
            Value::Text(_) => "a string",
            Value::Null => "null",
            Value::Map(_) => "an object",
            Value::List(_) => "an array",
            Value::Scalar(_) => "a scalar",
        }
    }

    fn contains_null(&self) -> bool {
        match self {
            Value::Null => true,
            Value::Map(catalog) => catalog.contains_null(),
            Value::List(items) => items.iter().any(Value::contains_null),
            Value::Text(_) | Value::Scalar(_) => false,
        }
    }
}

impl FromIterator<(String, Value)> for Catalog {
    fn from_iter<I: IntoIterator<Item = (String, Value)>>(iter: I) -> Self {
        let iter = iter.into_iter();
        let (capacity, _) = iter.size_hint();
        let mut catalog = Catalog {
            entries: Vec::with_capacity(capacity),
            index: HashMap::with_capacity(capacity),
        };
        for (key, value) in iter {
            catalog.insert(key, value);
        }
        catalog
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl From<String> for Value {
    fn from(value: String) -> Self {
        Value::Text(value)
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Value::Null,
            serde_json::Value::String(text) => Value::Text(text),
            serde_json::Value::Array(items) => {
                Value::List(items.into_iter().map(Value::from).collect())
            }
            serde_json::Value::Object(map) => Value::Map(
                map.into_iter()
                    .map(|(key, value)| (key, Value::from(value)))
                    .collect(),
            ),
            serde_json::Value::Number(number) => Value::Scalar(integral_number(number)),
            flag @ serde_json::Value::Bool(_) => Value::Scalar(flag),
        }
    }
}

/// Largest integer an f64 holds exactly (2^53).
const MAX_EXACT_INTEGER: f64 = 9_007_199_254_740_992.0;

/// Whole floats (`1.0`, `-0.0`) become integers so they print as `1` and `0`.
fn integral_number(number: serde_json::Number) -> serde_json::Value {
    match number.as_f64() {
        Some(float)
            if number.is_f64() && float.fract() == 0.0 && float.abs() <= MAX_EXACT_INTEGER =>
        {
            serde_json::Value::from(float as i64)
        }
        _ => serde_json::Value::Number(number),
    }
}

impl TryFrom<serde_json::Value> for Catalog {
    type Error = Error;

    fn try_from(value: serde_json::Value) -> Result<Self, Self::Error> {
        match Value::from(value) {
            Value::Map(catalog) => Ok(catalog),
            other => Err(Error::InvalidCatalog(format!(
                "expected a JSON object at the top level, found {}",
                other.kind()
            ))),
        }
    }
}

impl Serialize for Catalog {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.entries.len()))?;
        for (key, value) in &self.entries {
            map.serialize_entry(key, value)?;
        }
        map.end()
    }
}

impl Serialize for Value {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        match self {
            Value::Text(text) => serializer.serialize_str(text),
            Value::Null => serializer.serialize_unit(),
            Value::Map(catalog) => catalog.serialize(serializer),
            Value::List(items) => {
                let mut seq = serializer.serialize_seq(Some(items.len()))?;
                for item in items {
                    seq.serialize_element(item)?;
                }
                seq.end()
            }
            Value::Scalar(scalar) => scalar.serialize(serializer),
        }
    }
}

impl<'de> Deserialize<'de> for Catalog {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = serde_json::Value::deserialize(deserializer)?;
        Catalog::try_from(raw).map_err(serde::de::Error::custom)
    }
}

impl Parser for Catalog {
    /// Parse from any reader. A byte order mark (UTF-8 or UTF-16) is honoured.
    fn from_reader<R: BufRead>(reader: R) -> Result<Self, Error> {
        let mut decoder = encoding_rs_io::DecodeReaderBytesBuilder::new()
            .bom_override(true)
            .strip_bom(true)
            .build(reader);

        let mut decoded = String::new();
        decoder.read_to_string(&mut decoded).map_err(Error::Io)?;

        let raw: serde_json::Value =
            serde_json::from_str(decoded.trim_start_matches('\u{feff}'))?;
        Catalog::try_from(raw)
    }

    /// Write to any writer as compact JSON.
    fn to_writer<W: Write>(&self, mut writer: W) -> Result<(), Error> {
        serde_json::to_writer(&mut writer, self).map_err(Error::Parse)
    }
}

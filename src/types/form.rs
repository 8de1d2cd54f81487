//! Ordered form content and the payload trait every request implements.

use serde_json::{Map, Value};

use crate::error::ValidationError;

/// An ordered sequence of key-value string pairs.
///
/// Keys may repeat (`o:tag`, `action`, `url`); order is preserved exactly as
/// pushed so the wire body matches the order in which fields were rendered.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FormContent {
    pairs: Vec<(String, String)>,
}

impl FormContent {
    /// Create empty form content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a pair.
    pub fn push(&mut self, key: impl Into<String>, value: impl Into<String>) {
        self.pairs.push((key.into(), value.into()));
    }

    /// Append a pair when the value is present.
    pub fn push_opt<V: Into<String>>(&mut self, key: impl Into<String>, value: Option<V>) {
        if let Some(value) = value {
            self.push(key, value);
        }
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Returns true if no pairs were pushed.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }

    /// First value recorded under `key`.
    pub fn get(&self, key: &str) -> Option<&str> {
        self.pairs
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Every value recorded under `key`, in order.
    pub fn get_all(&self, key: &str) -> Vec<&str> {
        self.pairs
            .iter()
            .filter(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
            .collect()
    }

    /// Iterate over the pairs in order.
    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.pairs.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }

    /// Keys in order, including repeats.
    pub fn keys(&self) -> Vec<&str> {
        self.pairs.iter().map(|(k, _)| k.as_str()).collect()
    }

    /// Consume into the underlying pairs.
    pub fn into_pairs(self) -> Vec<(String, String)> {
        self.pairs
    }

    /// Render as a JSON object carrying the same information.
    ///
    /// A key seen once maps to a string; a repeated key maps to an array of
    /// strings in push order.
    pub fn to_json(&self) -> Value {
        let mut object = Map::new();
        for (key, value) in &self.pairs {
            match object.get_mut(key) {
                Some(Value::Array(values)) => values.push(Value::String(value.clone())),
                Some(existing) => {
                    let first = existing.take();
                    *existing = Value::Array(vec![first, Value::String(value.clone())]);
                }
                None => {
                    object.insert(key.clone(), Value::String(value.clone()));
                }
            }
        }
        Value::Object(object)
    }
}

impl IntoIterator for FormContent {
    type Item = (String, String);
    type IntoIter = std::vec::IntoIter<(String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.into_iter()
    }
}

impl<'a> IntoIterator for &'a FormContent {
    type Item = &'a (String, String);
    type IntoIter = std::slice::Iter<'a, (String, String)>;

    fn into_iter(self) -> Self::IntoIter {
        self.pairs.iter()
    }
}

/// A request value object that renders to a wire payload.
///
/// `to_json` is derived from `to_form_content` so both encodings always
/// carry identical information.
pub trait FormPayload {
    /// Render as ordered form content.
    fn to_form_content(&self) -> Result<FormContent, ValidationError>;

    /// Render as a JSON object with the same keys and string values.
    fn to_json(&self) -> Result<Value, ValidationError> {
        Ok(self.to_form_content()?.to_json())
    }
}

/// Render a batch of payloads as a JSON array, for endpoints that accept
/// several entries in one request.
pub fn to_json_batch<T: FormPayload>(items: &[T]) -> Result<Value, ValidationError> {
    items
        .iter()
        .map(FormPayload::to_json)
        .collect::<Result<Vec<_>, _>>()
        .map(Value::Array)
}

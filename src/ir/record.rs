//! Lenient accessors over a JSON object.

use serde_json::{Map, Value};

/// A borrowed view over one JSON object in the corpus.
///
/// Every accessor is total: a missing field or a field of the wrong shape
/// reads as `None` (or an empty slice), never as an error.
#[derive(Debug, Clone, Copy)]
pub struct Record<'a> {
    map: &'a Map<String, Value>,
}

impl<'a> Record<'a> {
    /// Wrap an object.
    pub fn new(map: &'a Map<String, Value>) -> Self {
        Self { map }
    }

    /// View a value as a record if it is an object.
    pub fn from_value(value: &'a Value) -> Option<Self> {
        value.as_object().map(Self::new)
    }

    /// The underlying object.
    pub fn map(&self) -> &'a Map<String, Value> {
        self.map
    }

    /// Raw field access.
    pub fn get(&self, key: &str) -> Option<&'a Value> {
        self.map.get(key).filter(|v| !v.is_null())
    }

    /// Whether the field is present and not null.
    pub fn has(&self, key: &str) -> bool {
        self.get(key).is_some()
    }

    /// A string field. Empty strings read as `None`.
    pub fn str(&self, key: &str) -> Option<&'a str> {
        self.get(key)
            .and_then(Value::as_str)
            .filter(|s| !s.trim().is_empty())
    }

    /// A scalar field rendered as text (strings, numbers and booleans).
    pub fn text(&self, key: &str) -> Option<String> {
        self.get(key).and_then(scalar_text)
    }

    /// An integer field. Accepts integral floats and numeric strings.
    pub fn i64(&self, key: &str) -> Option<i64> {
        self.get(key).and_then(value_i64)
    }

    /// A floating point field.
    pub fn f64(&self, key: &str) -> Option<f64> {
        match self.get(key)? {
            Value::Number(n) => n.as_f64(),
            Value::String(s) => s.trim().parse().ok(),
            _ => None,
        }
    }

    /// A boolean field. Absent reads as `false`.
    pub fn flag(&self, key: &str) -> bool {
        match self.get(key) {
            Some(Value::Bool(b)) => *b,
            Some(Value::String(s)) => !s.is_empty(),
            Some(Value::Number(n)) => n.as_f64().is_some_and(|f| f != 0.0),
            Some(Value::Object(_)) | Some(Value::Array(_)) => true,
            _ => false,
        }
    }

    /// An array field. Missing or non-array fields read as empty.
    pub fn array(&self, key: &str) -> &'a [Value] {
        self.get(key)
            .and_then(Value::as_array)
            .map(Vec::as_slice)
            .unwrap_or(&[])
    }

    /// An array of strings, skipping non-string elements.
    pub fn strings(&self, key: &str) -> Vec<&'a str> {
        self.array(key).iter().filter_map(Value::as_str).collect()
    }

    /// A nested object field.
    pub fn object(&self, key: &str) -> Option<Record<'a>> {
        self.get(key).and_then(Record::from_value)
    }

    /// The record's display name.
    pub fn name(&self) -> Option<&'a str> {
        self.str("name")
    }

    /// The record's source book code.
    pub fn source(&self) -> Option<&'a str> {
        self.str("source")
    }

    /// The page number within the source book.
    pub fn page(&self) -> Option<u32> {
        self.i64("page")
            .filter(|p| *p > 0)
            .and_then(|p| u32::try_from(p).ok())
    }

    /// The node `type` discriminator.
    pub fn type_name(&self) -> Option<&'a str> {
        self.str("type")
    }

    /// Nested children, looked up under the field names used by the corpus.
    pub fn children(&self) -> Option<&'a Value> {
        ["entries", "items", "entry"]
            .into_iter()
            .find_map(|key| self.get(key))
    }
}

/// Render a scalar JSON value as text.
pub(crate) fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) if !s.trim().is_empty() => Some(s.clone()),
        Value::Number(n) => Some(number_text(n)),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}

/// Format a JSON number without a trailing `.0` for integral floats.
pub(crate) fn number_text(n: &serde_json::Number) -> String {
    if let Some(i) = n.as_i64() {
        return i.to_string();
    }
    match n.as_f64() {
        Some(f) if f.fract() == 0.0 && f.abs() < 1e15 => format!("{}", f as i64),
        Some(f) => f.to_string(),
        None => n.to_string(),
    }
}

/// Read an integer from a number or numeric string.
pub(crate) fn value_i64(value: &Value) -> Option<i64> {
    match value {
        Value::Number(n) => n
            .as_i64()
            .or_else(|| n.as_f64().filter(|f| f.fract() == 0.0).map(|f| f as i64)),
        Value::String(s) => s.trim().trim_start_matches('+').parse().ok(),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_missing_fields_are_lenient() {
        let value = json!({"name": "Goblin", "page": "x", "entries": null});
        let rec = Record::from_value(&value).unwrap();
        assert_eq!(rec.name(), Some("Goblin"));
        assert_eq!(rec.page(), None);
        assert!(rec.array("entries").is_empty());
        assert!(!rec.has("entries"));
        assert_eq!(rec.source(), None);
    }

    #[test]
    fn test_empty_name_reads_as_none() {
        let value = json!({"name": "  "});
        let rec = Record::from_value(&value).unwrap();
        assert_eq!(rec.name(), None);
    }

    #[test]
    fn test_numeric_text() {
        let value = json!({"a": 3, "b": 2.0, "c": 0.5, "d": "+4"});
        let rec = Record::from_value(&value).unwrap();
        assert_eq!(rec.text("a").as_deref(), Some("3"));
        assert_eq!(rec.text("b").as_deref(), Some("2"));
        assert_eq!(rec.text("c").as_deref(), Some("0.5"));
        assert_eq!(rec.i64("d"), Some(4));
    }

    #[test]
    fn test_children_lookup_order() {
        let value = json!({"items": ["a"], "entry": "b"});
        let rec = Record::from_value(&value).unwrap();
        assert_eq!(rec.children(), Some(&json!(["a"])));
    }
}

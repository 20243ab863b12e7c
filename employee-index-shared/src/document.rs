//! Dynamic employee document.
//!
//! The set of fields sent to the search engine depends on the CSV header
//! row and on which column a run excludes, so documents are kept as an
//! ordered map of field name to JSON value rather than a fixed struct.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// A document ready to be indexed, or returned as a hit's `_source`.
///
/// Field order follows insertion order, which keeps the CSV column order
/// when a document is shaped from a row.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct EmployeeDocument {
    fields: Map<String, Value>,
}

impl EmployeeDocument {
    /// Create an empty document.
    pub fn new() -> Self {
        Self { fields: Map::new() }
    }

    /// Set a field, replacing any previous value.
    pub fn insert(&mut self, field: impl Into<String>, value: impl Into<Value>) {
        self.fields.insert(field.into(), value.into());
    }

    /// Remove a field and return its value. Removing an absent field is a no-op.
    pub fn remove(&mut self, field: &str) -> Option<Value> {
        self.fields.shift_remove(field)
    }

    pub fn get(&self, field: &str) -> Option<&Value> {
        self.fields.get(field)
    }

    /// The field's value when it is a JSON string.
    pub fn get_str(&self, field: &str) -> Option<&str> {
        self.fields.get(field).and_then(Value::as_str)
    }

    pub fn contains(&self, field: &str) -> bool {
        self.fields.contains_key(field)
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Field names in document order.
    pub fn fields(&self) -> impl Iterator<Item = &str> {
        self.fields.keys().map(String::as_str)
    }

    /// Convert into the JSON object sent as the request body.
    pub fn into_value(self) -> Value {
        Value::Object(self.fields)
    }
}

impl From<Map<String, Value>> for EmployeeDocument {
    fn from(fields: Map<String, Value>) -> Self {
        Self { fields }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_insert_and_remove() {
        let mut document = EmployeeDocument::new();
        document.insert("Department", "IT");
        document.insert("Gender", "Female");

        assert_eq!(document.remove("Department"), Some(json!("IT")));
        assert!(!document.contains("Department"));
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_remove_absent_field() {
        let mut document = EmployeeDocument::new();
        document.insert("Gender", "Female");

        assert!(document.remove("Department").is_none());
        assert_eq!(document.len(), 1);
    }

    #[test]
    fn test_field_order_is_preserved() {
        let mut document = EmployeeDocument::new();
        document.insert("Employee ID", "E02002");
        document.insert("Full Name", "Kai Le");
        document.insert("Age", 47);
        document.remove("Full Name");
        document.insert("City", "Columbus");

        let names: Vec<&str> = document.fields().collect();
        assert_eq!(names, vec!["Employee ID", "Age", "City"]);
    }

    #[test]
    fn test_serializes_as_plain_object() {
        let mut document = EmployeeDocument::new();
        document.insert("Employee ID", "E02002");
        document.insert("Exit Date", Value::Null);

        let value = serde_json::to_value(&document).unwrap();
        assert_eq!(value, json!({"Employee ID": "E02002", "Exit Date": null}));

        let back: EmployeeDocument = serde_json::from_value(value).unwrap();
        assert_eq!(back, document);
    }
}

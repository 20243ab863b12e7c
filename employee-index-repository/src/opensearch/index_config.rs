//! OpenSearch index mappings.
//!
//! This module defines the mappings used when creating employee indices and
//! answers questions about them, such as which field name to aggregate on.

use serde_json::{json, Value};

use employee_index_shared::fields;

/// Body of an index creation request.
#[derive(Debug, Clone, PartialEq)]
pub struct IndexMapping {
    body: Value,
}

impl IndexMapping {
    /// Wrap an arbitrary index creation body.
    pub fn from_value(body: Value) -> Self {
        Self { body }
    }

    /// Mapping for the full employee index.
    ///
    /// - **keyword** for the ID and the low-cardinality demographic fields
    /// - **text** for names, titles and locations
    /// - **text** for salary and bonus, which keep their `$` and `%` formatting
    /// - **date** in `MM/dd/yyyy` for hire and exit dates
    pub fn full_employee() -> Self {
        Self::from_value(json!({
            "mappings": {
                "properties": {
                    (fields::EMPLOYEE_ID): { "type": "keyword" },
                    (fields::FULL_NAME): { "type": "text" },
                    (fields::JOB_TITLE): { "type": "text" },
                    (fields::DEPARTMENT): { "type": "text" },
                    (fields::BUSINESS_UNIT): { "type": "text" },
                    (fields::GENDER): { "type": "keyword" },
                    (fields::ETHNICITY): { "type": "keyword" },
                    (fields::AGE): { "type": "integer" },
                    (fields::HIRE_DATE): { "type": "date", "format": "MM/dd/yyyy" },
                    (fields::ANNUAL_SALARY): { "type": "text" },
                    (fields::BONUS_PCT): { "type": "text" },
                    (fields::COUNTRY): { "type": "text" },
                    (fields::CITY): { "type": "text" },
                    (fields::EXIT_DATE): {
                        "type": "date",
                        "format": "MM/dd/yyyy",
                        "null_value": "NULL"
                    }
                }
            }
        }))
    }

    /// Mapping for the smaller per-collection indices.
    ///
    /// Only four fields are declared; every other CSV column is mapped
    /// dynamically by the engine on first use.
    pub fn collection() -> Self {
        Self::from_value(json!({
            "mappings": {
                "properties": {
                    (fields::EMPLOYEE_ID_SNAKE): { "type": "keyword" },
                    (fields::NAME): { "type": "text" },
                    (fields::DEPARTMENT): { "type": "keyword" },
                    (fields::GENDER): { "type": "keyword" }
                }
            }
        }))
    }

    /// The JSON body sent with the create request.
    pub fn body(&self) -> &Value {
        &self.body
    }

    /// Declared type of a field, if the mapping declares it.
    pub fn field_type(&self, field: &str) -> Option<&str> {
        self.body["mappings"]["properties"][field]["type"].as_str()
    }

    /// Name to use when aggregating on a field.
    ///
    /// Declared `keyword` fields aggregate on themselves. Anything else is
    /// either `text` or dynamically mapped, and the engine only aggregates
    /// on its `.keyword` sub-field.
    pub fn facet_field(&self, field: &str) -> String {
        match self.field_type(field) {
            Some("keyword") => field.to_string(),
            _ => format!("{}.keyword", field),
        }
    }
}

//! Runtime settings.
//!
//! Values are looked up by environment variable name. The CLI resolves each
//! one from its flag or, failing that, from the variable of the same name.

use std::path::PathBuf;
use std::time::Duration;

use crate::IndexingError;

pub const OPENSEARCH_URL: &str = "OPENSEARCH_URL";
pub const OPENSEARCH_TIMEOUT_SECS: &str = "OPENSEARCH_TIMEOUT_SECS";
pub const EMPLOYEE_CSV: &str = "EMPLOYEE_CSV";
pub const EMPLOYEE_INDEX: &str = "EMPLOYEE_INDEX";
pub const NAME_COLLECTION: &str = "NAME_COLLECTION";
pub const PHONE_COLLECTION: &str = "PHONE_COLLECTION";

/// Default OpenSearch URL.
const DEFAULT_OPENSEARCH_URL: &str = "http://localhost:9200";

/// Default request timeout in seconds.
const DEFAULT_TIMEOUT_SECS: u64 = 60;

/// Default path of the employee CSV file.
const DEFAULT_CSV_PATH: &str = "employee_data.csv";

/// Default name of the fully mapped employee index.
const DEFAULT_EMPLOYEE_INDEX: &str = "employee_index";

/// Default names of the two collections used by the collection tasks.
const DEFAULT_NAME_COLLECTION: &str = "jai_hash";
const DEFAULT_PHONE_COLLECTION: &str = "2706";

/// Settings shared by every subcommand.
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub opensearch_url: String,
    pub request_timeout: Duration,
    pub csv_path: PathBuf,
    pub employee_index: String,
    pub name_collection: String,
    pub phone_collection: String,
}

impl Settings {
    /// Build settings from a lookup by variable name, applying defaults for
    /// absent keys.
    ///
    /// # Keys
    ///
    /// - `OPENSEARCH_URL`: OpenSearch server URL (default: http://localhost:9200)
    /// - `OPENSEARCH_TIMEOUT_SECS`: request timeout in seconds (default: 60)
    /// - `EMPLOYEE_CSV`: path of the employee CSV file (default: employee_data.csv)
    /// - `EMPLOYEE_INDEX`: full employee index name (default: employee_index)
    /// - `NAME_COLLECTION`: first collection name (default: jai_hash)
    /// - `PHONE_COLLECTION`: second collection name (default: 2706)
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, IndexingError> {
        let get = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        let timeout_secs = match lookup(OPENSEARCH_TIMEOUT_SECS) {
            Some(raw) => raw.trim().parse::<u64>().map_err(|e| {
                IndexingError::config(format!("Invalid {} '{}': {}", OPENSEARCH_TIMEOUT_SECS, raw, e))
            })?,
            None => DEFAULT_TIMEOUT_SECS,
        };

        Ok(Self {
            opensearch_url: get(OPENSEARCH_URL, DEFAULT_OPENSEARCH_URL),
            request_timeout: Duration::from_secs(timeout_secs),
            csv_path: PathBuf::from(get(EMPLOYEE_CSV, DEFAULT_CSV_PATH)),
            employee_index: get(EMPLOYEE_INDEX, DEFAULT_EMPLOYEE_INDEX),
            name_collection: get(NAME_COLLECTION, DEFAULT_NAME_COLLECTION),
            phone_collection: get(PHONE_COLLECTION, DEFAULT_PHONE_COLLECTION),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup(vars: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let vars: HashMap<String, String> = vars
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| vars.get(key).cloned()
    }

    #[test]
    fn test_defaults() {
        let settings = Settings::from_lookup(lookup(&[])).unwrap();

        assert_eq!(settings.opensearch_url, "http://localhost:9200");
        assert_eq!(settings.request_timeout, Duration::from_secs(60));
        assert_eq!(settings.csv_path, PathBuf::from("employee_data.csv"));
        assert_eq!(settings.employee_index, "employee_index");
        assert_eq!(settings.name_collection, "jai_hash");
        assert_eq!(settings.phone_collection, "2706");
    }

    #[test]
    fn test_overrides() {
        let settings = Settings::from_lookup(lookup(&[
            ("OPENSEARCH_URL", "http://search:9200"),
            ("OPENSEARCH_TIMEOUT_SECS", "5"),
            ("NAME_COLLECTION", "staff"),
        ]))
        .unwrap();

        assert_eq!(settings.opensearch_url, "http://search:9200");
        assert_eq!(settings.request_timeout, Duration::from_secs(5));
        assert_eq!(settings.name_collection, "staff");
        assert_eq!(settings.phone_collection, "2706");
    }

    #[test]
    fn test_invalid_timeout() {
        let result = Settings::from_lookup(lookup(&[("OPENSEARCH_TIMEOUT_SECS", "soon")]));
        assert!(matches!(result, Err(IndexingError::ConfigError(_))));
    }
}

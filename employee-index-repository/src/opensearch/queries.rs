//! OpenSearch query builders.
//!
//! This module provides functions to build the request bodies for the
//! match, count, delete-by-query and terms aggregation requests.

use serde_json::{json, Value};

/// Name of the aggregation used for department facets.
pub const DEPARTMENT_FACET: &str = "department_count";

/// Build a full-text `match` query on one field.
///
/// `size` caps the number of returned hits; `None` leaves the engine
/// default (10).
pub fn build_match_query(field: &str, value: &str, size: Option<usize>) -> Value {
    let mut query = json!({
        "query": {
            "match": {
                field: value
            }
        }
    });

    if let Some(size) = size {
        query["size"] = json!(size);
    }

    query
}

/// Build the body of a count over every document.
pub fn build_count_query() -> Value {
    json!({
        "query": {
            "match_all": {}
        }
    })
}

/// Build the body for deleting every document whose field matches a value.
///
/// Delete-by-query only accepts the `query` part, so no size is set.
pub fn build_delete_by_match_query(field: &str, value: &str) -> Value {
    build_match_query(field, value, None)
}

/// Build a terms aggregation over one field.
///
/// Hits are not needed, so `size` is 0 and only the aggregation is returned.
pub fn build_terms_facet_query(aggregation: &str, field: &str, buckets: usize) -> Value {
    json!({
        "size": 0,
        "aggs": {
            aggregation: {
                "terms": {
                    "field": field,
                    "size": buckets
                }
            }
        }
    })
}

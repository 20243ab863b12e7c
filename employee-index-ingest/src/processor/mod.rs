//! Processor module for the employee index ingest.
//!
//! Cleans decoded CSV rows and shapes them into documents for indexing.

mod dates;
mod shaper;

pub use dates::normalize_date;
pub use shaper::{CleanTable, DocumentShaper, ShapeOptions};

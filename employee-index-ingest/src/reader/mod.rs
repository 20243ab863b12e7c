//! Reader module for the employee index ingest.
//!
//! Reads the employee CSV file and decodes it into rows.

mod csv_reader;

pub use csv_reader::{EmployeeCsv, SourceEncoding};

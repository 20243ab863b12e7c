//! CSV reader with an encoding fallback.
//!
//! Exports of the employee sheet are not always UTF-8. The file is decoded as
//! UTF-8 first and, when that fails, as ISO-8859-1: every byte maps to the
//! code point of the same value, C1 controls included.

use std::path::Path;

use csv::{ReaderBuilder, StringRecord};
use encoding_rs::mem::decode_latin1;
use tracing::{debug, info, instrument, warn};

use crate::errors::IngestError;
use employee_index_shared::EmployeeRecord;

const UTF8_BOM: char = '\u{feff}';

/// Text encoding the CSV file was decoded with.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SourceEncoding {
    Utf8,
    Latin1,
}

/// Decoded employee CSV: header row plus raw string cells.
#[derive(Debug, Clone)]
pub struct EmployeeCsv {
    headers: StringRecord,
    rows: Vec<StringRecord>,
    encoding: SourceEncoding,
}

impl EmployeeCsv {
    /// Read and decode a CSV file from disk.
    #[instrument(skip_all, fields(path = %path.as_ref().display()))]
    pub async fn load(path: impl AsRef<Path>) -> Result<Self, IngestError> {
        let path = path.as_ref();
        let bytes = tokio::fs::read(path)
            .await
            .map_err(|e| IngestError::read(format!("{}: {}", path.display(), e)))?;

        let csv = Self::from_bytes(&bytes)?;
        info!(
            rows = csv.rows.len(),
            encoding = ?csv.encoding,
            "Loaded employee CSV"
        );
        Ok(csv)
    }

    /// Decode and parse CSV content held in memory.
    ///
    /// Every row must have as many cells as the header row.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self, IngestError> {
        let (text, encoding) = decode(bytes);

        let mut reader = ReaderBuilder::new()
            .has_headers(true)
            .from_reader(text.as_bytes());

        let headers = reader.headers()?.clone();
        let rows = reader.records().collect::<Result<Vec<_>, _>>()?;

        debug!(columns = headers.len(), rows = rows.len(), "Parsed CSV");
        Ok(Self {
            headers,
            rows,
            encoding,
        })
    }

    /// Column names in file order.
    pub fn headers(&self) -> Vec<&str> {
        self.headers.iter().collect()
    }

    pub fn has_column(&self, column: &str) -> bool {
        self.headers.iter().any(|h| h == column)
    }

    /// Raw rows in file order.
    pub fn rows(&self) -> &[StringRecord] {
        &self.rows
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn encoding(&self) -> SourceEncoding {
        self.encoding
    }

    /// Deserialize every row into an `EmployeeRecord`.
    ///
    /// All fourteen employee columns must be present in the header; extra
    /// columns are ignored.
    pub fn records(&self) -> Result<Vec<EmployeeRecord>, IngestError> {
        let missing: Vec<&str> = EmployeeRecord::HEADERS
            .iter()
            .copied()
            .filter(|column| !self.has_column(column))
            .collect();
        if !missing.is_empty() {
            return Err(IngestError::missing_column(missing.join(", ")));
        }

        self.rows
            .iter()
            .enumerate()
            .map(|(i, row)| {
                row.deserialize(Some(&self.headers))
                    .map_err(|e| IngestError::parse(format!("row {}: {}", i + 1, e)))
            })
            .collect()
    }
}

/// Decode bytes as UTF-8, falling back to ISO-8859-1.
fn decode(bytes: &[u8]) -> (String, SourceEncoding) {
    match std::str::from_utf8(bytes) {
        Ok(text) => (
            text.strip_prefix(UTF8_BOM).unwrap_or(text).to_string(),
            SourceEncoding::Utf8,
        ),
        Err(e) => {
            warn!(
                valid_up_to = e.valid_up_to(),
                "CSV is not valid UTF-8, decoding as ISO-8859-1"
            );
            (decode_latin1(bytes).into_owned(), SourceEncoding::Latin1)
        }
    }
}

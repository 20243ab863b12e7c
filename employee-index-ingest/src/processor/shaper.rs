//! Document shaper implementation.
//!
//! Turns decoded CSV rows into `EmployeeDocument`s: resolves the employee ID
//! column, drops incomplete rows, normalizes dates, types numeric cells and
//! removes the column a collection excludes.

use serde_json::{Number, Value};
use tracing::{debug, info, instrument};

use crate::errors::IngestError;
use crate::processor::dates::normalize_date;
use crate::reader::EmployeeCsv;
use employee_index_shared::{fields, EmployeeDocument, EmployeeRecord};

/// Cell values read as missing, besides the empty string.
///
/// These are the markers spreadsheet exports and dataframe tools commonly
/// write for "no value".
const MISSING_MARKERS: [&str; 19] = [
    "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND", "1.#QNAN",
    "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null", "",
];

fn is_missing(cell: &str) -> bool {
    MISSING_MARKERS.contains(&cell)
}

/// Options controlling how rows become documents.
#[derive(Debug, Clone)]
pub struct ShapeOptions {
    /// Candidate ID columns, in lookup order. The first present one is used.
    pub id_columns: Vec<String>,
    /// Columns normalized as `MM/DD/YYYY` dates.
    pub date_columns: Vec<String>,
    /// Drop rows with any missing cell.
    pub drop_incomplete: bool,
    /// Store integer and decimal cells as JSON numbers instead of text.
    pub infer_types: bool,
}

impl Default for ShapeOptions {
    fn default() -> Self {
        Self {
            id_columns: fields::ID_COLUMNS.iter().map(|c| c.to_string()).collect(),
            date_columns: fields::DATE_COLUMNS.iter().map(|c| c.to_string()).collect(),
            drop_incomplete: true,
            infer_types: true,
        }
    }
}

impl ShapeOptions {
    /// Keep rows that have missing cells.
    pub fn keep_incomplete(mut self) -> Self {
        self.drop_incomplete = false;
        self
    }

    /// Keep every cell as text.
    pub fn without_type_inference(mut self) -> Self {
        self.infer_types = false;
        self
    }
}

/// Rows left after cleaning, with the resolved ID column.
#[derive(Debug, Clone)]
pub struct CleanTable {
    pub headers: Vec<String>,
    pub rows: Vec<Vec<String>>,
    /// Name of the column holding the employee ID.
    pub id_column: String,
    /// Number of rows removed for having missing cells.
    pub dropped: usize,
}

impl CleanTable {
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Shapes CSV rows into documents for indexing.
pub struct DocumentShaper {
    options: ShapeOptions,
}

impl DocumentShaper {
    /// Create a shaper with the given options.
    pub fn new(options: ShapeOptions) -> Self {
        Self { options }
    }

    /// Find the employee ID column among the candidates.
    pub fn resolve_id_column<'a>(
        &self,
        headers: impl IntoIterator<Item = &'a str>,
    ) -> Result<String, IngestError> {
        let headers: Vec<&str> = headers.into_iter().collect();
        self.options
            .id_columns
            .iter()
            .find(|candidate| headers.contains(&candidate.as_str()))
            .cloned()
            .ok_or_else(|| {
                IngestError::missing_column(
                    "The column for employee ID is not found in the dataset.",
                )
            })
    }

    /// Resolve the ID column and drop incomplete rows.
    #[instrument(skip(self, csv), fields(rows = csv.len()))]
    pub fn clean(&self, csv: &EmployeeCsv) -> Result<CleanTable, IngestError> {
        let headers: Vec<String> = csv.headers().into_iter().map(str::to_string).collect();
        info!(columns = ?headers, "CSV columns");

        let id_column = self.resolve_id_column(headers.iter().map(String::as_str))?;

        let mut rows = Vec::with_capacity(csv.len());
        let mut dropped = 0;
        for row in csv.rows() {
            if self.options.drop_incomplete && row.iter().any(is_missing) {
                dropped += 1;
                continue;
            }
            rows.push(row.iter().map(str::to_string).collect());
        }

        if dropped > 0 {
            info!(dropped = dropped, kept = rows.len(), "Dropped rows with missing values");
        }

        Ok(CleanTable {
            headers,
            rows,
            id_column,
            dropped,
        })
    }

    /// Shape one row, leaving out `exclude` if given.
    pub fn shape_row(
        &self,
        headers: &[String],
        row: &[String],
        id_column: &str,
        exclude: Option<&str>,
    ) -> Result<EmployeeDocument, IngestError> {
        let mut document = EmployeeDocument::new();

        for (column, cell) in headers.iter().zip(row) {
            if exclude == Some(column.as_str()) {
                continue;
            }

            let value = if column == id_column {
                Value::String(cell.clone())
            } else if self.options.date_columns.contains(column) {
                self.date_value(cell)?
            } else {
                self.cell_value(cell)
            };
            document.insert(column.clone(), value);
        }

        Ok(document)
    }

    /// Shape every row of a cleaned table, leaving out `exclude` if given.
    #[instrument(skip(self, table), fields(rows = table.len()))]
    pub fn shape_all(
        &self,
        table: &CleanTable,
        exclude: Option<&str>,
    ) -> Result<Vec<EmployeeDocument>, IngestError> {
        let documents = table
            .rows
            .iter()
            .map(|row| self.shape_row(&table.headers, row, &table.id_column, exclude))
            .collect::<Result<Vec<_>, _>>()?;

        debug!(documents = documents.len(), exclude = ?exclude, "Shaped documents");
        Ok(documents)
    }

    /// Shape a typed record for the full employee index.
    ///
    /// Values stay text apart from the dates, which are normalized or set to
    /// null when blank; the index mapping does the remaining type coercion.
    pub fn shape_record(&self, record: &EmployeeRecord) -> Result<EmployeeDocument, IngestError> {
        let mut document = EmployeeDocument::from(record);

        for column in &self.options.date_columns {
            let Some(raw) = document.get_str(column) else {
                continue;
            };
            let value = match normalize_date(raw)? {
                Some(date) => Value::String(date),
                None => Value::Null,
            };
            document.insert(column.clone(), value);
        }

        Ok(document)
    }

    fn date_value(&self, cell: &str) -> Result<Value, IngestError> {
        if is_missing(cell) {
            return Ok(Value::Null);
        }
        Ok(normalize_date(cell)?.map_or(Value::Null, Value::String))
    }

    fn cell_value(&self, cell: &str) -> Value {
        if is_missing(cell) {
            return Value::Null;
        }
        if !self.options.infer_types {
            return Value::String(cell.to_string());
        }
        if let Ok(n) = cell.parse::<i64>() {
            return Value::Number(n.into());
        }
        if let Some(n) = cell.parse::<f64>().ok().and_then(Number::from_f64) {
            return Value::Number(n);
        }
        Value::String(cell.to_string())
    }
}

impl Default for DocumentShaper {
    fn default() -> Self {
        Self::new(ShapeOptions::default())
    }
}

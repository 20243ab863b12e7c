//! Date normalization for `Hire Date` and `Exit Date`.

use chrono::NaiveDate;

use crate::errors::IngestError;
use employee_index_shared::fields::DATE_FORMAT;

/// Normalize a `MM/DD/YYYY` date to its zero-padded form.
///
/// Blank cells mean "no date" and yield `None`. Single-digit months and days
/// are accepted (`2/5/2022` becomes `02/05/2022`), which is the form the
/// index mapping's `MM/dd/yyyy` format expects. The year must have exactly
/// four digits; `2/5/22` is rejected rather than read as year 22.
pub fn normalize_date(raw: &str) -> Result<Option<String>, IngestError> {
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        return Ok(None);
    }

    let year = trimmed.rsplit('/').next().unwrap_or_default();
    if year.len() != 4 || !year.bytes().all(|b| b.is_ascii_digit()) {
        return Err(IngestError::invalid_date(
            trimmed,
            "year must have four digits",
        ));
    }

    let date = NaiveDate::parse_from_str(trimmed, DATE_FORMAT)
        .map_err(|e| IngestError::invalid_date(trimmed, e))?;

    Ok(Some(date.format(DATE_FORMAT).to_string()))
}

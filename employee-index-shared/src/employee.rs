//! The employee record as it appears in the CSV file.

use serde::{Deserialize, Serialize};

use crate::document::EmployeeDocument;
use crate::fields;

/// One row of the employee CSV file.
///
/// Every column is kept as text. Salary and bonus are formatted strings
/// (`$141,604`, `15%`) and stay that way; `Age` and the date columns are
/// coerced by the search engine through the index mapping.
///
/// Deserializing from a CSV reader with headers fails when any of the
/// columns is missing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct EmployeeRecord {
    #[serde(rename = "Employee ID")]
    pub employee_id: String,
    #[serde(rename = "Full Name")]
    pub full_name: String,
    #[serde(rename = "Job Title")]
    pub job_title: String,
    #[serde(rename = "Department")]
    pub department: String,
    #[serde(rename = "Business Unit")]
    pub business_unit: String,
    #[serde(rename = "Gender")]
    pub gender: String,
    #[serde(rename = "Ethnicity")]
    pub ethnicity: String,
    #[serde(rename = "Age")]
    pub age: String,
    #[serde(rename = "Hire Date")]
    pub hire_date: String,
    #[serde(rename = "Annual Salary")]
    pub annual_salary: String,
    #[serde(rename = "Bonus %")]
    pub bonus_pct: String,
    #[serde(rename = "Country")]
    pub country: String,
    #[serde(rename = "City")]
    pub city: String,
    #[serde(rename = "Exit Date")]
    pub exit_date: String,
}

impl EmployeeRecord {
    /// CSV headers a file must carry to be read as employee records.
    pub const HEADERS: [&'static str; 14] = [
        fields::EMPLOYEE_ID,
        fields::FULL_NAME,
        fields::JOB_TITLE,
        fields::DEPARTMENT,
        fields::BUSINESS_UNIT,
        fields::GENDER,
        fields::ETHNICITY,
        fields::AGE,
        fields::HIRE_DATE,
        fields::ANNUAL_SALARY,
        fields::BONUS_PCT,
        fields::COUNTRY,
        fields::CITY,
        fields::EXIT_DATE,
    ];

    /// Pairs of (column name, value) in CSV column order.
    pub fn columns(&self) -> [(&'static str, &str); 14] {
        [
            (fields::EMPLOYEE_ID, &self.employee_id),
            (fields::FULL_NAME, &self.full_name),
            (fields::JOB_TITLE, &self.job_title),
            (fields::DEPARTMENT, &self.department),
            (fields::BUSINESS_UNIT, &self.business_unit),
            (fields::GENDER, &self.gender),
            (fields::ETHNICITY, &self.ethnicity),
            (fields::AGE, &self.age),
            (fields::HIRE_DATE, &self.hire_date),
            (fields::ANNUAL_SALARY, &self.annual_salary),
            (fields::BONUS_PCT, &self.bonus_pct),
            (fields::COUNTRY, &self.country),
            (fields::CITY, &self.city),
            (fields::EXIT_DATE, &self.exit_date),
        ]
    }
}

impl From<&EmployeeRecord> for EmployeeDocument {
    fn from(record: &EmployeeRecord) -> Self {
        let mut document = EmployeeDocument::new();
        for (column, value) in record.columns() {
            document.insert(column, value);
        }
        document
    }
}

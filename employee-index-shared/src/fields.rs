//! Column and field names used across the workspace.
//!
//! The CSV headers double as document field names, so these constants
//! are used both when reading the file and when building queries.

pub const EMPLOYEE_ID: &str = "Employee ID";
pub const EMPLOYEE_ID_SNAKE: &str = "employee_id";
pub const FULL_NAME: &str = "Full Name";
pub const NAME: &str = "Name";
pub const JOB_TITLE: &str = "Job Title";
pub const DEPARTMENT: &str = "Department";
pub const BUSINESS_UNIT: &str = "Business Unit";
pub const GENDER: &str = "Gender";
pub const ETHNICITY: &str = "Ethnicity";
pub const AGE: &str = "Age";
pub const HIRE_DATE: &str = "Hire Date";
pub const ANNUAL_SALARY: &str = "Annual Salary";
pub const BONUS_PCT: &str = "Bonus %";
pub const COUNTRY: &str = "Country";
pub const CITY: &str = "City";
pub const EXIT_DATE: &str = "Exit Date";

/// Date format of `Hire Date` and `Exit Date`, in `chrono` notation.
///
/// Matches the `MM/dd/yyyy` format declared in the index mapping.
pub const DATE_FORMAT: &str = "%m/%d/%Y";

/// Columns holding dates.
pub const DATE_COLUMNS: [&str; 2] = [HIRE_DATE, EXIT_DATE];

/// Candidate names for the employee identifier column, in lookup order.
pub const ID_COLUMNS: [&str; 2] = [EMPLOYEE_ID_SNAKE, EMPLOYEE_ID];

//! Date convention at the backend boundary.
//!
//! Date pickers and most displayed dates use `YYYY-MM-DD`; the grade and
//! absence endpoints expect `DD-MM-YYYY`.

use chrono::NaiveDate;

pub const UI_FORMAT: &str = "%Y-%m-%d";
pub const BACKEND_FORMAT: &str = "%d-%m-%Y";

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum DateError {
    #[error("invalid date '{0}', expected YYYY-MM-DD")]
    InvalidUiDate(String),
    #[error("invalid date '{0}', expected DD-MM-YYYY")]
    InvalidBackendDate(String),
}

/// Convert a `YYYY-MM-DD` value into the backend's `DD-MM-YYYY` form
pub fn ui_to_backend(value: &str) -> Result<String, DateError> {
    let date = NaiveDate::parse_from_str(value.trim(), UI_FORMAT)
        .map_err(|_| DateError::InvalidUiDate(value.to_string()))?;
    Ok(date.format(BACKEND_FORMAT).to_string())
}

/// Convert a backend `DD-MM-YYYY` value into `YYYY-MM-DD`
pub fn backend_to_ui(value: &str) -> Result<String, DateError> {
    let date = NaiveDate::parse_from_str(value.trim(), BACKEND_FORMAT)
        .map_err(|_| DateError::InvalidBackendDate(value.to_string()))?;
    Ok(date.format(UI_FORMAT).to_string())
}

/// Parse a date returned by the backend, which may use either form
pub fn parse_any(value: &str) -> Option<NaiveDate> {
    let value = value.trim();
    NaiveDate::parse_from_str(value, UI_FORMAT)
        .or_else(|_| NaiveDate::parse_from_str(value, BACKEND_FORMAT))
        .ok()
}

//! services/api/src/web/validate.rs
//!
//! Request field validation helpers. The mobile client sends partial
//! payloads freely, so a missing field, a null, and an empty string all
//! read as "not provided".

use crate::error::ApiError;

/// The standard "Campo X é obrigatório" rejection.
pub fn missing_field(field: &str) -> ApiError {
    ApiError::Validation(format!("Campo {field} é obrigatório"))
}

/// A required text field.
pub fn required<'a>(value: &'a Option<String>, field: &str) -> Result<&'a str, ApiError> {
    match value.as_deref() {
        Some(v) if !v.is_empty() => Ok(v),
        _ => Err(missing_field(field)),
    }
}

/// A required id field. Zero reads as "not provided".
pub fn required_id(value: Option<i64>, field: &str) -> Result<i64, ApiError> {
    match value {
        Some(v) if v != 0 => Ok(v),
        _ => Err(missing_field(field)),
    }
}

//! Field-level payload checks shared by the write endpoints.
//!
//! Only presence and basic JSON type are checked; values themselves are
//! stored as given.

use libreria_http::AppError;
use serde_json::{json, Map, Value};

/// One offending field and the reason it was rejected
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FieldError {
    pub field: &'static str,
    pub error: &'static str,
}

/// Errors collected while reading a payload
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FieldErrors(Vec<FieldError>);

impl FieldErrors {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, field: &'static str, error: &'static str) {
        self.0.push(FieldError { field, error });
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn errors(&self) -> &[FieldError] {
        &self.0
    }

    /// `Ok(value)` when nothing was collected
    pub fn finish<T>(self, value: impl FnOnce() -> T) -> Result<T, FieldErrors> {
        if self.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    pub fn into_app_error(self, message: impl Into<String>) -> AppError {
        let details = self
            .0
            .iter()
            .map(|e| json!({ "field": e.field, "error": e.error }))
            .collect();
        AppError::validation(details, message)
    }
}

/// A string that must be present and non-null
pub fn required_string(
    payload: &Map<String, Value>,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match payload.get(field) {
        None => {
            errors.push(field, "required");
            None
        }
        Some(Value::Null) => {
            errors.push(field, "null");
            None
        }
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            errors.push(field, "invalid_type");
            None
        }
    }
}

/// A string that may be absent or null
pub fn optional_string(
    payload: &Map<String, Value>,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<String> {
    match payload.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::String(value)) => Some(value.clone()),
        Some(_) => {
            errors.push(field, "invalid_type");
            None
        }
    }
}

/// An integer that may be absent or null; fractional numbers are rejected
pub fn optional_integer(
    payload: &Map<String, Value>,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Option<i64> {
    match payload.get(field) {
        None | Some(Value::Null) => None,
        Some(Value::Number(number)) => match number.as_i64() {
            Some(value) => Some(value),
            None => {
                errors.push(field, "invalid_type");
                None
            }
        },
        Some(_) => {
            errors.push(field, "invalid_type");
            None
        }
    }
}

/// A list of strings; absent or null reads as empty
pub fn string_list(
    payload: &Map<String, Value>,
    field: &'static str,
    errors: &mut FieldErrors,
) -> Vec<String> {
    match payload.get(field) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(items)) => {
            let names: Option<Vec<String>> = items
                .iter()
                .map(|item| item.as_str().map(str::to_owned))
                .collect();
            names.unwrap_or_else(|| {
                errors.push(field, "invalid_list");
                Vec::new()
            })
        }
        Some(_) => {
            errors.push(field, "invalid_list");
            Vec::new()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn payload(value: Value) -> Map<String, Value> {
        value.as_object().cloned().unwrap()
    }

    #[test]
    fn required_string_reports_each_failure_kind() {
        let mut errors = FieldErrors::new();
        let body = payload(json!({ "b": null, "c": 3, "d": "ok" }));

        assert_eq!(required_string(&body, "a", &mut errors), None);
        assert_eq!(required_string(&body, "b", &mut errors), None);
        assert_eq!(required_string(&body, "c", &mut errors), None);
        assert_eq!(required_string(&body, "d", &mut errors).as_deref(), Some("ok"));

        let reasons: Vec<_> = errors.errors().iter().map(|e| (e.field, e.error)).collect();
        assert_eq!(
            reasons,
            vec![("a", "required"), ("b", "null"), ("c", "invalid_type")]
        );
    }

    #[test]
    fn optional_integer_rejects_fractions_and_strings() {
        let mut errors = FieldErrors::new();
        let body = payload(json!({ "a": 412, "b": 1.5, "c": "300", "d": null }));

        assert_eq!(optional_integer(&body, "a", &mut errors), Some(412));
        assert_eq!(optional_integer(&body, "b", &mut errors), None);
        assert_eq!(optional_integer(&body, "c", &mut errors), None);
        assert_eq!(optional_integer(&body, "d", &mut errors), None);
        assert_eq!(optional_integer(&body, "e", &mut errors), None);
        assert_eq!(errors.errors().len(), 2);
    }

    #[test]
    fn string_list_defaults_to_empty() {
        let mut errors = FieldErrors::new();
        let body = payload(json!({ "ok": ["a", "b"], "mixed": ["a", 1], "scalar": "a" }));

        assert!(string_list(&body, "missing", &mut errors).is_empty());
        assert_eq!(string_list(&body, "ok", &mut errors), vec!["a", "b"]);
        assert!(string_list(&body, "mixed", &mut errors).is_empty());
        assert!(string_list(&body, "scalar", &mut errors).is_empty());

        let fields: Vec<_> = errors.errors().iter().map(|e| e.field).collect();
        assert_eq!(fields, vec!["mixed", "scalar"]);
    }

    #[test]
    fn app_error_lists_fields() {
        let mut errors = FieldErrors::new();
        errors.push("titulo", "required");

        match errors.into_app_error("Libro inválido") {
            AppError::Validation { details, .. } => {
                assert_eq!(details, vec![json!({"field": "titulo", "error": "required"})]);
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }
}

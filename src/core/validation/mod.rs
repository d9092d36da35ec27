//! Boundary validation
//!
//! Payloads are checked with `validator` derive rules before they reach the
//! coordinator. This module turns `validator` reports into the crate's
//! [`ValidationError`] shape, using the camelCase field names clients send.

pub mod extractor;

pub use extractor::ValidatedJson;

use crate::core::error::{FieldValidationError, ValidationError};

/// Flatten a `validator` report into per-field errors, sorted by field name
pub fn field_errors(errors: &validator::ValidationErrors) -> ValidationError {
    let mut fields: Vec<FieldValidationError> = errors
        .field_errors()
        .into_iter()
        .flat_map(|(field, errs)| {
            let field = camel_case(&field);
            errs.iter().map(move |e| FieldValidationError {
                field: field.clone(),
                message: e
                    .message
                    .as_ref()
                    .map(|m| m.to_string())
                    .unwrap_or_else(|| e.code.to_string()),
            })
        })
        .collect();
    fields.sort_by(|a, b| a.field.cmp(&b.field));

    ValidationError::FieldErrors(fields)
}

fn camel_case(field: &str) -> String {
    let mut out = String::with_capacity(field.len());
    let mut upper = false;
    for c in field.chars() {
        if c == '_' {
            upper = true;
        } else if upper {
            out.extend(c.to_uppercase());
            upper = false;
        } else {
            out.push(c);
        }
    }
    out
}

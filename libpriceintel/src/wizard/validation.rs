//! Field validation
//!
//! Pure and synchronous: nothing here looks at submission state or does I/O.
//! Rules run in declaration order and the first failing rule produces the
//! field's error. Format rules skip empty optional fields.

use serde::Serialize;
use std::collections::BTreeMap;

use super::form::{FieldSpec, FormSpec, RuleKind};

/// Validation errors keyed by field name
pub type FieldErrors = BTreeMap<String, FieldError>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    /// Catalog key for the localized message
    pub message_key: String,
    /// English message
    pub message: String,
}

impl std::fmt::Display for FieldError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.message)
    }
}

/// Validate one value against a field's rules
pub fn validate_field(field: &FieldSpec, value: Option<&str>) -> Option<FieldError> {
    let value = value.unwrap_or_default();
    let blank = value.trim().is_empty();

    for rule in &field.rules {
        let passed = match &rule.kind {
            RuleKind::Required => !blank,
            _ if blank => true,
            RuleKind::Email => is_valid_email(value.trim()),
            RuleKind::OneOf { options } => options.iter().any(|o| o == value.trim()),
            RuleKind::Length { min, max } => {
                let count = value.trim().chars().count();
                count >= *min && count <= *max
            }
        };
        if !passed {
            return Some(FieldError {
                message_key: rule.message_key.clone(),
                message: rule.message.clone(),
            });
        }
    }
    None
}

/// Validate the fields owned by 1-based step `step`
pub fn validate_step(form: &FormSpec, step: u8, values: &BTreeMap<String, String>) -> FieldErrors {
    form.step(step)
        .map(|s| validate_fields(&s.fields, values))
        .unwrap_or_default()
}

/// Validate every field of every step
pub fn validate_all(form: &FormSpec, values: &BTreeMap<String, String>) -> FieldErrors {
    form.steps
        .iter()
        .flat_map(|s| validate_fields(&s.fields, values))
        .collect()
}

fn validate_fields(fields: &[FieldSpec], values: &BTreeMap<String, String>) -> FieldErrors {
    fields
        .iter()
        .filter_map(|f| {
            validate_field(f, values.get(&f.name).map(String::as_str))
                .map(|e| (f.name.clone(), e))
        })
        .collect()
}

/// Accepts `local@domain.tld`: one `@`, no whitespace, a dot inside the domain
pub fn is_valid_email(value: &str) -> bool {
    if value.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = value.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    match domain.rsplit_once('.') {
        Some((host, tld)) => {
            !host.is_empty()
                && !tld.is_empty()
                && !domain.starts_with('.')
                && !domain.contains("..")
        }
        None => false,
    }
}

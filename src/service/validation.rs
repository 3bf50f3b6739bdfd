//! Create-body validation against the fixed demon schema.

use crate::error::AppError;
use crate::record::{Alignment, NewRecord};
use serde_json::{Map, Value};

/// Constraints for one body field. All fields are JSON strings.
#[derive(Clone, Debug, Default)]
pub struct ValidationRule {
    pub required: bool,
    pub min_length: Option<usize>,
    pub max_length: Option<usize>,
    pub allowed: Option<Vec<&'static str>>,
    pub format: Option<Format>,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Format {
    Uri,
}

/// Rules for `POST /demons`, in the order errors are reported.
pub fn create_rules() -> Vec<(&'static str, ValidationRule)> {
    vec![
        (
            "name",
            ValidationRule {
                required: true,
                min_length: Some(1),
                max_length: Some(100),
                ..Default::default()
            },
        ),
        (
            "race",
            ValidationRule {
                required: true,
                max_length: Some(50),
                ..Default::default()
            },
        ),
        (
            "alignment",
            ValidationRule {
                required: true,
                allowed: Some(Alignment::ALL.iter().map(|a| a.as_str()).collect()),
                ..Default::default()
            },
        ),
        (
            "description",
            ValidationRule {
                max_length: Some(500),
                ..Default::default()
            },
        ),
        (
            "imageUrl",
            ValidationRule {
                format: Some(Format::Uri),
                ..Default::default()
            },
        ),
    ]
}

pub struct RequestValidator;

impl RequestValidator {
    /// Validate a create body and turn it into an insert payload. Unknown keys are ignored.
    pub fn validate_create(body: Value) -> Result<NewRecord, AppError> {
        let Value::Object(body) = body else {
            return Err(AppError::Validation("body must be a JSON object".into()));
        };
        Self::validate(&body, &create_rules())?;
        Ok(NewRecord {
            name: text(&body, "name"),
            description: text(&body, "description"),
            race: text(&body, "race"),
            alignment: text(&body, "alignment"),
            image_url: text(&body, "imageUrl"),
        })
    }

    /// Validate body against per-field rules. Null counts as absent.
    pub fn validate(body: &Map<String, Value>, rules: &[(&'static str, ValidationRule)]) -> Result<(), AppError> {
        for (field, rule) in rules {
            match body.get(*field) {
                None | Some(Value::Null) => {
                    if rule.required {
                        return Err(AppError::Validation(format!("{} is required", field)));
                    }
                }
                Some(v) => validate_field(field, v, rule)?,
            }
        }
        Ok(())
    }
}

fn text(body: &Map<String, Value>, field: &str) -> String {
    body.get(field).and_then(Value::as_str).unwrap_or_default().to_string()
}

fn validate_field(field: &str, v: &Value, rule: &ValidationRule) -> Result<(), AppError> {
    let Some(s) = v.as_str() else {
        return Err(AppError::Validation(format!("{} must be a string", field)));
    };
    let len = s.chars().count();
    if let Some(min) = rule.min_length {
        if len < min {
            return Err(AppError::Validation(format!(
                "{} must be at least {} characters",
                field, min
            )));
        }
    }
    if let Some(max) = rule.max_length {
        if len > max {
            return Err(AppError::Validation(format!(
                "{} must be at most {} characters",
                field, max
            )));
        }
    }
    if let Some(ref allowed) = rule.allowed {
        if !allowed.iter().any(|a| *a == s) {
            return Err(AppError::Validation(format!(
                "{} must be one of: {}",
                field,
                allowed.join(", ")
            )));
        }
    }
    if let Some(Format::Uri) = rule.format {
        if url::Url::parse(s).is_err() {
            return Err(AppError::Validation(format!("{} must be a valid URI", field)));
        }
    }
    Ok(())
}

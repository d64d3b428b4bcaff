//! Payload validation.
//!
//! Every create operation starts from the raw JSON body and turns it into a
//! typed parameter set. All offending fields are reported together.
//!
//! A required field counts as missing when it is absent or "falsy": `null`,
//! `false`, `0`, `""`, `[]` or `{}`.

use std::fmt;

use serde::Serialize;
use serde_json::{Map, Value};

use crate::RecordFilter;

/// A single rejected field.
#[derive(Clone, Debug, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

/// The list of rejected fields of one payload.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct ValidationErrors(Vec<FieldError>);

impl ValidationErrors {
    fn push(&mut self, field: &str, message: impl Into<String>) {
        self.0.push(FieldError {
            field: field.to_string(),
            message: message.into(),
        });
    }

    pub(crate) fn single(field: &str, message: impl Into<String>) -> Self {
        let mut errors = Self::default();
        errors.push(field, message);
        errors
    }

    fn into_result<T>(self, value: impl FnOnce() -> T) -> Result<T, Self> {
        if self.0.is_empty() {
            Ok(value())
        } else {
            Err(self)
        }
    }

    pub fn fields(&self) -> &[FieldError] {
        &self.0
    }
}

impl fmt::Display for ValidationErrors {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.0.as_slice() {
            [] => write!(f, "invalid payload"),
            [only] => write!(f, "{}", only.message),
            many => {
                let messages: Vec<&str> = many.iter().map(|e| e.message.as_str()).collect();
                write!(f, "{}", messages.join("; "))
            }
        }
    }
}

/// Parameters of `create_user`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewUser {
    pub name: String,
}

/// Parameters of `create_category`.
#[derive(Clone, Debug, PartialEq)]
pub struct NewCategory {
    pub name: String,
}

/// Identifies a category to delete.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CategoryRef {
    pub id: i32,
}

/// Parameters of `create_record`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct NewRecord {
    pub user_id: i32,
    pub category_id: i32,
    pub amount: f64,
}

/// Parameters of `deposit`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Deposit {
    pub amount: f64,
}

impl NewUser {
    pub fn parse(payload: &Value) -> Result<Self, ValidationErrors> {
        let fields = object(payload)?;
        let mut errors = ValidationErrors::default();
        let name = name_field(fields, "name", &mut errors);
        errors.into_result(|| Self {
            name: name.unwrap_or_default(),
        })
    }
}

impl NewCategory {
    pub fn parse(payload: &Value) -> Result<Self, ValidationErrors> {
        let fields = object(payload)?;
        let mut errors = ValidationErrors::default();
        let name = name_field(fields, "name", &mut errors);
        errors.into_result(|| Self {
            name: name.unwrap_or_default(),
        })
    }
}

impl CategoryRef {
    pub fn parse(payload: &Value) -> Result<Self, ValidationErrors> {
        let fields = object(payload)?;
        let mut errors = ValidationErrors::default();
        let id = id_field(fields, "id", &mut errors);
        errors.into_result(|| Self {
            id: id.unwrap_or_default(),
        })
    }
}

impl NewRecord {
    pub fn parse(payload: &Value) -> Result<Self, ValidationErrors> {
        let fields = object(payload)?;
        let mut errors = ValidationErrors::default();
        let user_id = id_field(fields, "user_id", &mut errors);
        let category_id = id_field(fields, "category_id", &mut errors);
        let amount = amount_field(fields, "amount", &mut errors);
        errors.into_result(|| Self {
            user_id: user_id.unwrap_or_default(),
            category_id: category_id.unwrap_or_default(),
            amount: amount.unwrap_or_default(),
        })
    }
}

impl Deposit {
    pub fn parse(payload: &Value) -> Result<Self, ValidationErrors> {
        let fields = object(payload)?;
        let mut errors = ValidationErrors::default();
        let amount = amount_field(fields, "amount", &mut errors);
        errors.into_result(|| Self {
            amount: amount.unwrap_or_default(),
        })
    }
}

impl RecordFilter {
    /// Build a filter from raw query parameters. Empty values count as absent.
    pub fn parse(
        user_id: Option<&str>,
        category_id: Option<&str>,
    ) -> Result<Self, ValidationErrors> {
        let mut errors = ValidationErrors::default();
        let user_id = query_id(user_id, "user_id", &mut errors);
        let category_id = query_id(category_id, "category_id", &mut errors);
        errors.into_result(|| Self {
            user_id,
            category_id,
        })
    }
}

fn object(payload: &Value) -> Result<&Map<String, Value>, ValidationErrors> {
    payload.as_object().ok_or_else(|| {
        let mut errors = ValidationErrors::default();
        errors.push("body", "request body must be a JSON object");
        errors
    })
}

fn is_falsy(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(b) => !b,
        Value::Number(n) => n.as_f64() == Some(0.0),
        Value::String(s) => s.is_empty(),
        Value::Array(a) => a.is_empty(),
        Value::Object(o) => o.is_empty(),
    }
}

fn required<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<&'a Value> {
    match fields.get(key) {
        Some(value) if !is_falsy(value) => Some(value),
        _ => {
            errors.push(key, format!("{key} is required"));
            None
        }
    }
}

fn name_field(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<String> {
    let value = required(fields, key, errors)?;
    let Some(text) = value.as_str() else {
        errors.push(key, format!("{key} must be a string"));
        return None;
    };
    let trimmed = text.trim();
    if trimmed.is_empty() {
        errors.push(key, format!("{key} must not be empty"));
        return None;
    }
    Some(trimmed.to_string())
}

fn id_field(fields: &Map<String, Value>, key: &str, errors: &mut ValidationErrors) -> Option<i32> {
    let value = required(fields, key, errors)?;
    let parsed = match value {
        Value::Number(n) => n.as_i64().and_then(|id| i32::try_from(id).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    };
    match parsed {
        Some(id) if id > 0 => Some(id),
        _ => {
            errors.push(key, format!("{key} must be a positive integer"));
            None
        }
    }
}

fn amount_field(
    fields: &Map<String, Value>,
    key: &str,
    errors: &mut ValidationErrors,
) -> Option<f64> {
    let value = required(fields, key, errors)?;
    let parsed = match value {
        Value::Number(n) => n.as_f64(),
        Value::String(s) => s.trim().parse::<f64>().ok(),
        _ => None,
    };
    match parsed {
        Some(amount) if !amount.is_finite() => {
            errors.push(key, format!("{key} must be a number"));
            None
        }
        Some(amount) if amount <= 0.0 => {
            errors.push(key, format!("{key} must be greater than 0"));
            None
        }
        Some(amount) => Some(amount),
        None => {
            errors.push(key, format!("{key} must be a number"));
            None
        }
    }
}

fn query_id(raw: Option<&str>, key: &str, errors: &mut ValidationErrors) -> Option<i32> {
    let raw = raw.map(str::trim).filter(|value| !value.is_empty())?;
    match raw.parse::<i32>() {
        Ok(id) if id > 0 => Some(id),
        _ => {
            errors.push(key, format!("{key} must be a positive integer"));
            None
        }
    }
}

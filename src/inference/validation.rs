//! Boundary validation turning untrusted JSON into a typed [`PredictRequest`].
//!
//! Every field is checked independently so a single response can report all
//! problems at once instead of stopping at the first.

use chrono::{DateTime, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::{Map, Value};
use uuid::Uuid;

use super::schema::{PredictRequest, Transaction, UNKNOWN_CATEGORY};

/// Problem with a single input field, addressed by dotted path.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub issue: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            issue: issue.into(),
        }
    }
}

/// All field errors found while validating one request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, thiserror::Error)]
#[error("request failed validation ({} field error(s))", .field_errors.len())]
pub struct ValidationError {
    pub field_errors: Vec<FieldError>,
}

impl ValidationError {
    pub fn single(field: impl Into<String>, issue: impl Into<String>) -> Self {
        Self {
            field_errors: vec![FieldError::new(field, issue)],
        }
    }

    pub fn mentions(&self, field: &str) -> bool {
        self.field_errors.iter().any(|error| error.field == field)
    }
}

/// Parse a raw request body into JSON, reporting syntax errors as a validation failure.
pub fn parse_body(body: &[u8]) -> Result<Value, ValidationError> {
    serde_json::from_slice(body)
        .map_err(|err| ValidationError::single("body", format!("malformed JSON: {err}")))
}

/// Validate a decoded JSON document against the predict request schema.
pub fn validate_request(payload: &Value) -> Result<PredictRequest, ValidationError> {
    let Some(root) = payload.as_object() else {
        return Err(ValidationError::single("body", "expected a JSON object"));
    };

    let mut errors = Vec::new();

    let request_id = collect(&mut errors, request_id(root));
    let event_time = collect(&mut errors, event_time(root));
    let transaction = match root.get("transaction") {
        Some(Value::Object(fields)) => transaction(fields, &mut errors),
        Some(_) => {
            errors.push(FieldError::new("transaction", "expected an object"));
            None
        }
        None => {
            errors.push(FieldError::new("transaction", "field required"));
            None
        }
    };

    match (request_id, event_time, transaction) {
        (Some(request_id), Some(event_time), Some(transaction)) if errors.is_empty() => {
            Ok(PredictRequest {
                request_id,
                event_time,
                transaction,
            })
        }
        _ => Err(ValidationError {
            field_errors: errors,
        }),
    }
}

fn collect<T>(errors: &mut Vec<FieldError>, result: Result<T, FieldError>) -> Option<T> {
    match result {
        Ok(value) => Some(value),
        Err(error) => {
            errors.push(error);
            None
        }
    }
}

fn transaction(fields: &Map<String, Value>, errors: &mut Vec<FieldError>) -> Option<Transaction> {
    let transaction_id = collect(errors, identifier(fields, "transaction_id"));
    let user_id = collect(errors, identifier(fields, "user_id"));
    let amount = collect(errors, amount(fields));
    let currency = collect(errors, letter_code(fields, "currency", 3, "ISO currency"));
    let country = collect(errors, letter_code(fields, "country", 2, "ISO country"));
    let merchant_category = collect(errors, optional_category(fields, "merchant_category"));
    let device_type = collect(errors, optional_category(fields, "device_type"));

    Some(Transaction {
        transaction_id: transaction_id?,
        user_id: user_id?,
        amount: amount?,
        currency: currency?,
        country: country?,
        merchant_category: merchant_category?,
        device_type: device_type?,
    })
}

fn required_str<'a>(
    fields: &'a Map<String, Value>,
    key: &str,
    path: &str,
) -> Result<&'a str, FieldError> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value),
        Some(Value::Null) | None => Err(FieldError::new(path, "field required")),
        Some(_) => Err(FieldError::new(path, "expected a string")),
    }
}

fn request_id(root: &Map<String, Value>) -> Result<String, FieldError> {
    let raw = required_str(root, "request_id", "request_id")?;
    Uuid::parse_str(raw)
        .map(|_| raw.to_string())
        .map_err(|_| FieldError::new("request_id", "request_id must be a valid UUID string"))
}

fn event_time(root: &Map<String, Value>) -> Result<DateTime<Utc>, FieldError> {
    let raw = required_str(root, "event_time", "event_time")?.trim();
    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }
    // Timestamps without an offset are taken as UTC.
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|_| FieldError::new("event_time", "event_time must be an ISO-8601 date-time"))
}

fn identifier(fields: &Map<String, Value>, key: &str) -> Result<String, FieldError> {
    let path = format!("transaction.{key}");
    let raw = required_str(fields, key, &path)?;
    if raw.trim().is_empty() {
        return Err(FieldError::new(path, format!("{key} must not be empty")));
    }
    Ok(raw.to_string())
}

fn amount(fields: &Map<String, Value>) -> Result<f64, FieldError> {
    const PATH: &str = "transaction.amount";
    let value = match fields.get("amount") {
        Some(Value::Number(number)) => number
            .as_f64()
            .ok_or_else(|| FieldError::new(PATH, "amount is not representable"))?,
        Some(Value::Null) | None => return Err(FieldError::new(PATH, "field required")),
        Some(_) => return Err(FieldError::new(PATH, "expected a number")),
    };

    if value.is_finite() && value > 0.0 {
        Ok(value)
    } else {
        Err(FieldError::new(PATH, "transaction amount must be positive"))
    }
}

fn letter_code(
    fields: &Map<String, Value>,
    key: &str,
    len: usize,
    kind: &str,
) -> Result<String, FieldError> {
    let path = format!("transaction.{key}");
    let raw = required_str(fields, key, &path)?;
    if raw.chars().count() == len && raw.chars().all(|c| c.is_ascii_alphabetic()) {
        Ok(raw.to_string())
    } else {
        Err(FieldError::new(
            path,
            format!("{key} must be a {len}-letter {kind} code"),
        ))
    }
}

fn optional_category(fields: &Map<String, Value>, key: &str) -> Result<String, FieldError> {
    match fields.get(key) {
        Some(Value::String(value)) => Ok(value.clone()),
        Some(Value::Null) | None => Ok(UNKNOWN_CATEGORY.to_string()),
        Some(_) => Err(FieldError::new(
            format!("transaction.{key}"),
            "expected a string or null",
        )),
    }
}

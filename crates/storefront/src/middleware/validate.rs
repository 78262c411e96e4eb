use axum::{
    extract::{FromRequest, Request},
    http::StatusCode,
};
use serde::de::DeserializeOwned;
use serde_json::{Value, json};
use validator::{Validate, ValidationError, ValidationErrors};

/// Json extractor that runs `validator` rules before the handler sees the
/// body. Schema mismatches and rule violations both answer 400 with a field
/// breakdown, so no business logic ever runs on malformed input.
pub struct SimpleValidatedJson<T>(pub T);

impl<S, T> FromRequest<S> for SimpleValidatedJson<T>
where
    T: DeserializeOwned + Validate + Send,
    S: Send + Sync,
{
    type Rejection = (StatusCode, axum::Json<Value>);

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let axum::Json(json_value) =
            axum::Json::<T>::from_request(req, state)
                .await
                .map_err(|rejection| {
                    let payload = json!({
                        "error": "Invalid JSON",
                        "message": rejection.body_text(),
                    });
                    (rejection.status(), axum::Json(payload))
                })?;

        json_value.validate().map_err(|validation_errors| {
            let payload = json!({
                "error": "Validation failed",
                "message": flatten_errors(&validation_errors),
                "details": error_details(&validation_errors),
            });
            (StatusCode::BAD_REQUEST, axum::Json(payload))
        })?;

        Ok(Self(json_value))
    }
}

fn describe(field: &str, error: &ValidationError) -> String {
    match error.message.as_ref() {
        Some(message) => format!("{field}: {message}"),
        None => match error.code.as_ref() {
            "length" => format!("{field}: invalid length"),
            "range" => format!("{field}: value out of range"),
            _ => format!("{field}: invalid value"),
        },
    }
}

fn flatten_errors(errors: &ValidationErrors) -> String {
    let mut messages = Vec::new();

    for (field, field_errors) in errors.field_errors() {
        for error in field_errors {
            messages.push(describe(&field, error));
        }
    }

    if messages.is_empty() {
        "Validation failed".to_string()
    } else {
        messages.sort();
        messages.join("; ")
    }
}

fn error_details(errors: &ValidationErrors) -> Value {
    let mut error_map = serde_json::Map::new();

    for (field, field_errors) in errors.field_errors() {
        let messages: Vec<String> = field_errors.iter().map(|e| describe(&field, e)).collect();
        error_map.insert(field.to_string(), json!(messages));
    }

    json!(error_map)
}

//! JSON request bodies whose rejections render as field-keyed validation errors.

use axum::async_trait;
use axum::extract::rejection::JsonRejection;
use axum::extract::{FromRequest, Request};
use axum::Json;

use crate::error::ServiceError;
use crate::validation::ValidationErrors;

const DATA_ERROR_PREFIX: &str = "Failed to deserialize the JSON body into the target type: ";

/// [`Json`] body extractor answering bad payloads with `400 {"errors": {field: message}}`.
#[derive(Debug, Clone, Copy, Default)]
pub struct Payload<T>(pub T);

#[async_trait]
impl<T, S> FromRequest<S> for Payload<T>
where
    Json<T>: FromRequest<S, Rejection = JsonRejection>,
    S: Send + Sync,
{
    type Rejection = ServiceError;

    async fn from_request(request: Request, state: &S) -> Result<Self, Self::Rejection> {
        match Json::<T>::from_request(request, state).await {
            Ok(Json(value)) => Ok(Self(value)),
            Err(rejection) => {
                tracing::debug!(error = %rejection.body_text(), "request body rejected");
                Err(ServiceError::Validation(rejection_errors(&rejection)))
            }
        }
    }
}

fn rejection_errors(rejection: &JsonRejection) -> ValidationErrors {
    match rejection {
        JsonRejection::JsonDataError(error) => {
            let text = error.body_text();
            let detail = text.strip_prefix(DATA_ERROR_PREFIX).unwrap_or(&text);
            let (field, message) = field_error(detail);
            ValidationErrors::single(field, message)
        }
        other => ValidationErrors::single("detail", other.body_text()),
    }
}

/// Deserializer messages read `path: message`; a field missing at the top level is
/// only named inside backticks.
fn field_error(detail: &str) -> (String, String) {
    if let Some((path, message)) = detail.split_once(": ") {
        if !path.is_empty() && !path.contains(char::is_whitespace) {
            return (path.to_string(), message.to_string());
        }
    }
    let missing = detail
        .strip_prefix("missing field `")
        .and_then(|rest| rest.split('`').next());
    match missing {
        Some(field) => (field.to_string(), "This field is required.".to_string()),
        None => ("detail".to_string(), detail.to_string()),
    }
}

use axum::{
    Json,
    extract::{FromRequest, Request, rejection::JsonRejection},
};
use carepoint_core::AppError;
use serde::de::DeserializeOwned;
use validator::{Validate, ValidationErrors};

/// Maps validator output onto the error taxonomy. A missing required field
/// wins over any format problem, so a half-filled form always reads
/// "Please Fill Full Form!".
pub fn validation_error(errors: &ValidationErrors) -> AppError {
    let field_errors = errors.field_errors();

    let missing = field_errors
        .values()
        .flat_map(|errors| errors.iter())
        .any(|error| error.code == "required");
    if missing {
        return AppError::incomplete_form();
    }

    let mut fields: Vec<_> = field_errors.iter().collect();
    fields.sort_by(|a, b| a.0.cmp(b.0));

    let message = fields
        .into_iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field))
            })
        })
        .collect::<Vec<_>>()
        .join(", ");

    AppError::validation(message)
}

pub fn validate_request<T: Validate>(value: &T) -> Result<(), AppError> {
    value.validate().map_err(|errors| validation_error(&errors))
}

fn json_rejection_error(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::MissingJsonContentType(_) => {
            AppError::validation("Missing 'Content-Type: application/json' header")
        }
        JsonRejection::JsonDataError(err) => {
            tracing::debug!(error = %err.body_text(), "Request body has invalid field values");
            AppError::validation("Invalid field value in request")
        }
        other => {
            tracing::debug!(error = %other.body_text(), "Request body is not valid JSON");
            AppError::validation("Invalid request body")
        }
    }
}

/// JSON body extractor that runs `validator` rules before the handler sees
/// the value.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection_error)?;

        validate_request(&value)?;

        Ok(ValidatedJson(value))
    }
}

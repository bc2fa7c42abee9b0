//! Application error type and the global error translator.
//!
//! Every failure raised by a service, extractor or middleware is an
//! [`AppError`]: an [`ErrorCode`] that fixes the HTTP status, plus an
//! [`anyhow::Error`] carrying the message. Rendering happens in one place,
//! [`IntoResponse for AppError`](AppError#impl-IntoResponse-for-AppError),
//! which logs the failure and produces the uniform envelope:
//!
//! ```json
//! { "success": false, "message": "Please Fill Full Form!" }
//! ```
//!
//! Internal faults never leak their details; they render as
//! `"Internal Server Error"`.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use utoipa::ToSchema;

const INTERNAL_MESSAGE: &str = "Internal Server Error";
const INVALID_TOKEN_MESSAGE: &str = "Invalid token. Please log in again.";

/// Failure taxonomy. Each code maps to exactly one HTTP status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
    /// Malformed input (bad email, short password, unsupported file type).
    ValidationError,
    /// A required field is missing or empty.
    IncompleteForm,
    DuplicateEmail,
    /// Credentials were right but the submitted role is not the stored one.
    RoleMismatch,
    InvalidCredentials,
    /// No session cookie for the gate's namespace.
    AuthRequired,
    InvalidToken,
    Expired,
    /// Token was valid but the principal is gone or holds another role.
    AuthorizationFailed,
    RoleNotAuthorized,
    AvatarUploadFailed,
    Internal,
}

impl ErrorCode {
    pub fn status(self) -> StatusCode {
        match self {
            Self::ValidationError
            | Self::IncompleteForm
            | Self::DuplicateEmail
            | Self::RoleMismatch => StatusCode::BAD_REQUEST,
            Self::InvalidCredentials | Self::AuthRequired | Self::InvalidToken | Self::Expired => {
                StatusCode::UNAUTHORIZED
            }
            Self::AuthorizationFailed | Self::RoleNotAuthorized => StatusCode::FORBIDDEN,
            Self::AvatarUploadFailed | Self::Internal => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Error envelope returned for every failed request.
#[derive(Debug, Serialize, ToSchema)]
pub struct ErrorResponse {
    pub success: bool,
    pub message: String,
}

#[derive(Debug)]
pub struct AppError {
    pub code: ErrorCode,
    pub error: Error,
}

impl AppError {
    pub fn new<E>(code: ErrorCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            code,
            error: err.into(),
        }
    }

    fn message(code: ErrorCode, message: impl Into<String>) -> Self {
        Self::new(code, anyhow::anyhow!(message.into()))
    }

    pub fn status(&self) -> StatusCode {
        self.code.status()
    }

    pub fn is(&self, code: ErrorCode) -> bool {
        self.code == code
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(ErrorCode::Internal, err)
    }

    pub fn internal_error(message: impl Into<String>) -> Self {
        Self::message(ErrorCode::Internal, message)
    }

    pub fn validation(message: impl Into<String>) -> Self {
        Self::message(ErrorCode::ValidationError, message)
    }

    pub fn incomplete_form() -> Self {
        Self::message(ErrorCode::IncompleteForm, "Please Fill Full Form!")
    }

    pub fn incomplete_with(message: impl Into<String>) -> Self {
        Self::message(ErrorCode::IncompleteForm, message)
    }

    pub fn duplicate_email(message: impl Into<String>) -> Self {
        Self::message(ErrorCode::DuplicateEmail, message)
    }

    pub fn invalid_credentials() -> Self {
        Self::message(ErrorCode::InvalidCredentials, "Invalid Email Or Password!")
    }

    pub fn role_mismatch() -> Self {
        Self::message(ErrorCode::RoleMismatch, "User Not Found With This Role!")
    }

    /// `context` is the gate's role label, e.g. `"Admin"`.
    pub fn auth_required(context: &str) -> Self {
        Self::message(
            ErrorCode::AuthRequired,
            format!("{context} authentication required. Please log in."),
        )
    }

    pub fn invalid_token() -> Self {
        Self::message(ErrorCode::InvalidToken, INVALID_TOKEN_MESSAGE)
    }

    /// Rendered with the same message as [`AppError::invalid_token`] so a
    /// client cannot tell which check failed.
    pub fn expired() -> Self {
        Self::message(ErrorCode::Expired, INVALID_TOKEN_MESSAGE)
    }

    pub fn authorization_failed(context: &str) -> Self {
        Self::message(
            ErrorCode::AuthorizationFailed,
            format!("{context} authorization failed. Invalid credentials."),
        )
    }

    pub fn role_not_authorized(role: &str) -> Self {
        Self::message(
            ErrorCode::RoleNotAuthorized,
            format!("Role '{role}' is not authorized to access this resource!"),
        )
    }

    pub fn avatar_upload_failed<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(
            ErrorCode::AvatarUploadFailed,
            err.into().context("Failed To Upload Doctor Avatar"),
        )
    }

    /// Message safe to show to the client.
    pub fn public_message(&self) -> String {
        match self.code {
            ErrorCode::Internal => INTERNAL_MESSAGE.to_string(),
            // Display of an anyhow chain is its outermost context only.
            _ => self.error.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();

        if status.is_server_error() {
            tracing::error!(code = ?self.code, status = %status.as_u16(), error = ?self.error, "Request failed");
        } else {
            tracing::warn!(code = ?self.code, status = %status.as_u16(), error = %self.error, "Request rejected");
        }

        let body = Json(ErrorResponse {
            success: false,
            message: self.public_message(),
        });

        (status, body).into_response()
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

use axum::{
    extract::rejection::JsonRejection,
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

use crate::auth::password::PasswordError;

#[derive(Error, Debug)]
pub enum AuthError {
    #[error("Invalid credentials")]
    InvalidCredentials,
    #[error("Username or email already exists")]
    AccountExists,
    #[error("Invalid token")]
    InvalidToken,
    #[error("Token expired")]
    TokenExpired,
    #[error("Missing authorization header")]
    MissingAuthHeader,
    #[error("Invalid authorization header format")]
    InvalidAuthHeaderFormat,
    #[error("Insufficient permissions")]
    InsufficientPermissions,
    #[error("Validation failed: {0}")]
    Validation(String),
    #[error("Password validation failed: {0}")]
    PasswordValidation(String),
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),
    #[error("JWT error: {0}")]
    Jwt(#[from] jsonwebtoken::errors::Error),
    #[error("Password hashing error: {0}")]
    PasswordHashing(PasswordError),
}

impl From<PasswordError> for AuthError {
    fn from(err: PasswordError) -> Self {
        if err.is_policy_violation() {
            AuthError::PasswordValidation(err.to_string())
        } else {
            AuthError::PasswordHashing(err)
        }
    }
}

impl From<validator::ValidationErrors> for AuthError {
    fn from(errors: validator::ValidationErrors) -> Self {
        AuthError::Validation(errors.to_string())
    }
}

impl From<JsonRejection> for AuthError {
    fn from(rejection: JsonRejection) -> Self {
        AuthError::Validation(rejection.body_text())
    }
}

impl AuthError {
    pub fn status(&self) -> StatusCode {
        match self {
            AuthError::InvalidCredentials
            | AuthError::InvalidToken
            | AuthError::TokenExpired
            | AuthError::MissingAuthHeader
            | AuthError::InvalidAuthHeaderFormat
            | AuthError::Jwt(_) => StatusCode::UNAUTHORIZED,
            AuthError::AccountExists => StatusCode::CONFLICT,
            AuthError::InsufficientPermissions => StatusCode::FORBIDDEN,
            AuthError::Validation(_) | AuthError::PasswordValidation(_) => StatusCode::BAD_REQUEST,
            AuthError::Database(_) | AuthError::PasswordHashing(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let status = self.status();
        let (kind, detail) = match &self {
            AuthError::InvalidCredentials => ("invalid_credentials", self.to_string()),
            AuthError::AccountExists => ("account_exists", self.to_string()),
            AuthError::InvalidToken => ("invalid_token", self.to_string()),
            AuthError::TokenExpired => ("token_expired", self.to_string()),
            AuthError::MissingAuthHeader => ("unauthorized", self.to_string()),
            AuthError::InvalidAuthHeaderFormat => ("unauthorized", self.to_string()),
            AuthError::InsufficientPermissions => ("forbidden", self.to_string()),
            AuthError::Validation(_) => ("validation_error", self.to_string()),
            AuthError::PasswordValidation(_) => ("validation_error", self.to_string()),
            AuthError::Jwt(_) => ("invalid_token", "Token could not be processed".to_string()),
            AuthError::Database(err) => {
                tracing::error!(error = %err, "database error during authentication");
                ("database_error", "A database error occurred".to_string())
            }
            AuthError::PasswordHashing(err) => {
                tracing::error!(error = %err, "password hashing failed");
                ("internal_error", "Password could not be processed".to_string())
            }
        };

        let body = Json(json!({
            "error": kind,
            "message": detail,
        }));

        (status, body).into_response()
    }
}

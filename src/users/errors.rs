//! Credential error types
//!
//! Payload-free kinds; the HTTP layer matches on them to decide what the user
//! sees. `IncorrectCredentials` deliberately covers both an unknown email and
//! a wrong password.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::utils::responses::ResponseBuilder;

/// Errors returned by the [`CredentialStore`](super::CredentialStore)
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum CredentialError {
    /// No user with the requested id
    #[error("No user has been found.")]
    UserNotFound,

    /// Another user already registered this email
    #[error("A user has already registered with that email address.")]
    EmailAlreadyRegistered,

    /// Password and confirmation differ
    #[error("Passwords do not match.")]
    PasswordMismatch,

    /// Unknown email or wrong password
    #[error("Incorrect Email or Password.")]
    IncorrectCredentials,

    /// The password could not be hashed; nothing was stored
    #[error("Unable to process password.")]
    HashingFailed,
}

impl CredentialError {
    /// Machine-readable code used in JSON error bodies
    #[must_use]
    pub const fn error_code(self) -> &'static str {
        match self {
            Self::UserNotFound => "user_not_found",
            Self::EmailAlreadyRegistered => "email_already_registered",
            Self::PasswordMismatch => "password_mismatch",
            Self::IncorrectCredentials => "incorrect_credentials",
            Self::HashingFailed => "server_error",
        }
    }
}

impl ResponseError for CredentialError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        use actix_web::http::StatusCode;
        match self {
            Self::UserNotFound => StatusCode::NOT_FOUND,
            Self::EmailAlreadyRegistered => StatusCode::CONFLICT,
            Self::PasswordMismatch => StatusCode::BAD_REQUEST,
            Self::IncorrectCredentials => StatusCode::UNAUTHORIZED,
            Self::HashingFailed => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let builder = match self {
            Self::UserNotFound => ResponseBuilder::not_found(),
            Self::EmailAlreadyRegistered => ResponseBuilder::conflict(),
            Self::PasswordMismatch => ResponseBuilder::bad_request(),
            Self::IncorrectCredentials => ResponseBuilder::unauthorized(),
            // Internal details stay in the logs
            Self::HashingFailed => return ResponseBuilder::internal_server_error().build(),
        };
        builder
            .with_error_code(self.error_code())
            .with_message(&self.to_string())
            .build()
    }
}

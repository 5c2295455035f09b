//! Session error types
//!
//! A closed set of payload-free kinds. The HTTP layer matches on them to pick
//! a status code; nothing here carries a token or user id.

use actix_web::{HttpResponse, ResponseError};
use thiserror::Error;

use crate::utils::responses::ResponseBuilder;

/// Errors returned by [`SessionStore`](super::SessionStore) lookups
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum SessionError {
    /// No record exists for the token
    #[error("Session does not exist")]
    NotFound,

    /// The record existed but outlived the maximum session age; it has been removed
    #[error("Session has expired")]
    Expired,
}

impl ResponseError for SessionError {
    fn status_code(&self) -> actix_web::http::StatusCode {
        actix_web::http::StatusCode::UNAUTHORIZED
    }

    fn error_response(&self) -> HttpResponse {
        match self {
            Self::NotFound => ResponseBuilder::unauthorized().build(),
            Self::Expired => ResponseBuilder::unauthorized()
                .with_error_code("session_expired")
                .with_message(&self.to_string())
                .build(),
        }
    }
}

//! HTTP response handling
//!
//! One entry point for the responses the handlers produce: JSON errors, 303
//! redirects carrying session cookies, JSON bodies and small HTML pages.
//! Error bodies have the shape `{"error": <code>, "message": <text>}`.

use actix_web::{cookie::Cookie, http::header, http::StatusCode, HttpResponse};
use serde_json::{json, Value};

// ===============================
// CACHED RESPONSES
// ===============================

/// Pre-serialized bodies for uncustomized errors
static CACHED_RESPONSES: std::sync::LazyLock<CachedResponses> =
    std::sync::LazyLock::new(CachedResponses::new);

struct CachedResponses {
    invalid_request: String,
    unauthorized: String,
    not_found: String,
    conflict: String,
    server_error: String,
}

impl CachedResponses {
    fn new() -> Self {
        Self {
            invalid_request: Self::create_json(&ErrorType::BadRequest),
            unauthorized: Self::create_json(&ErrorType::Unauthorized),
            not_found: Self::create_json(&ErrorType::NotFound),
            conflict: Self::create_json(&ErrorType::Conflict),
            server_error: Self::create_json(&ErrorType::InternalServerError),
        }
    }

    fn create_json(error_type: &ErrorType) -> String {
        json!({
            "error": error_type.default_error_code(),
            "message": error_type.default_message(),
        })
        .to_string()
    }

    fn body(&self, error_type: &ErrorType) -> String {
        match error_type {
            ErrorType::BadRequest => self.invalid_request.clone(),
            ErrorType::Unauthorized => self.unauthorized.clone(),
            ErrorType::NotFound => self.not_found.clone(),
            ErrorType::Conflict => self.conflict.clone(),
            ErrorType::InternalServerError => self.server_error.clone(),
        }
    }
}

/// Unified response builder
pub struct ResponseBuilder;

impl ResponseBuilder {
    // ===============================
    // ERROR RESPONSE METHODS
    // ===============================

    /// `BadRequest` (400) error response
    #[must_use]
    pub fn bad_request() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::BadRequest)
    }

    /// `Unauthorized` (401) error response
    #[must_use]
    pub fn unauthorized() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::Unauthorized)
    }

    /// `NotFound` (404) error response
    #[must_use]
    pub fn not_found() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::NotFound)
    }

    /// `Conflict` (409) error response
    #[must_use]
    pub fn conflict() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::Conflict)
    }

    /// `InternalServerError` (500) error response
    #[must_use]
    pub fn internal_server_error() -> ErrorResponseBuilder {
        ErrorResponseBuilder::new(ErrorType::InternalServerError)
    }

    // ===============================
    // SUCCESS RESPONSE METHODS
    // ===============================

    /// Redirect (303 See Other) so a form POST is followed by a GET
    #[must_use]
    pub fn redirect(location: &str) -> RedirectBuilder {
        RedirectBuilder::new(location)
    }

    /// OK (200) response with JSON content
    #[must_use]
    pub fn ok() -> JsonResponseBuilder {
        JsonResponseBuilder::new(StatusCode::OK)
    }

    /// HTML page response
    #[must_use]
    pub fn page(status: StatusCode) -> PageBuilder {
        PageBuilder::new(status)
    }
}

// ===============================
// BUILDER TYPES
// ===============================

/// Builder for error responses with fluent interface
pub struct ErrorResponseBuilder {
    error_type: ErrorType,
    error_code: Option<String>,
    message: Option<String>,
    additional_fields: Option<Value>,
}

/// Builder for redirect responses
pub struct RedirectBuilder {
    location: String,
    cookies: Vec<Cookie<'static>>,
}

/// Builder for JSON responses
pub struct JsonResponseBuilder {
    status: StatusCode,
    cookies: Vec<Cookie<'static>>,
}

/// Builder for HTML pages
pub struct PageBuilder {
    status: StatusCode,
}

#[derive(Clone)]
enum ErrorType {
    BadRequest,
    Unauthorized,
    NotFound,
    Conflict,
    InternalServerError,
}

impl ErrorType {
    const fn status(&self) -> StatusCode {
        match self {
            Self::BadRequest => StatusCode::BAD_REQUEST,
            Self::Unauthorized => StatusCode::UNAUTHORIZED,
            Self::NotFound => StatusCode::NOT_FOUND,
            Self::Conflict => StatusCode::CONFLICT,
            Self::InternalServerError => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    const fn default_error_code(&self) -> &'static str {
        match self {
            Self::BadRequest => "invalid_request",
            Self::Unauthorized => "unauthorized",
            Self::NotFound => "not_found",
            Self::Conflict => "conflict",
            Self::InternalServerError => "server_error",
        }
    }

    const fn default_message(&self) -> &'static str {
        match self {
            Self::BadRequest => "The request is malformed or invalid",
            Self::Unauthorized => "Authentication is required to access this resource",
            Self::NotFound => "The requested resource was not found",
            Self::Conflict => "The request conflicts with existing data",
            Self::InternalServerError => "An internal server error occurred",
        }
    }
}

// ===============================
// ERROR RESPONSE BUILDER IMPL
// ===============================

impl ErrorResponseBuilder {
    const fn new(error_type: ErrorType) -> Self {
        Self {
            error_type,
            error_code: None,
            message: None,
            additional_fields: None,
        }
    }

    /// Set a custom error code (e.g., "`session_expired`")
    #[must_use]
    pub fn with_error_code(mut self, code: &str) -> Self {
        self.error_code = Some(code.to_string());
        self
    }

    /// Set a custom error message
    #[must_use]
    pub fn with_message(mut self, message: &str) -> Self {
        self.message = Some(message.to_string());
        self
    }

    /// Add additional JSON fields to the response
    #[must_use]
    pub fn with_additional_fields(mut self, fields: Value) -> Self {
        self.additional_fields = Some(fields);
        self
    }

    /// Build the final `HttpResponse`
    #[must_use]
    pub fn build(self) -> HttpResponse {
        if self.error_code.is_none() && self.message.is_none() && self.additional_fields.is_none() {
            return HttpResponse::build(self.error_type.status())
                .insert_header((header::CONTENT_TYPE, "application/json"))
                .body(CACHED_RESPONSES.body(&self.error_type));
        }

        let mut json_body = json!({
            "error": self
                .error_code
                .unwrap_or_else(|| self.error_type.default_error_code().to_string()),
            "message": self
                .message
                .unwrap_or_else(|| self.error_type.default_message().to_string()),
        });

        if let Some(Value::Object(map)) = self.additional_fields {
            for (key, value) in map {
                json_body[key] = value;
            }
        }

        HttpResponse::build(self.error_type.status()).json(json_body)
    }
}

// ===============================
// REDIRECT BUILDER IMPL
// ===============================

impl RedirectBuilder {
    fn new(location: &str) -> Self {
        Self {
            location: location.to_string(),
            cookies: Vec::new(),
        }
    }

    /// Add a cookie to the redirect response
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Add a cookie when one is present
    #[must_use]
    pub fn with_optional_cookie(self, cookie: Option<Cookie<'static>>) -> Self {
        match cookie {
            Some(cookie) => self.with_cookie(cookie),
            None => self,
        }
    }

    /// Build the final redirect response
    #[must_use]
    pub fn build(self) -> HttpResponse {
        let mut builder = HttpResponse::SeeOther();
        for cookie in self.cookies {
            builder.cookie(cookie);
        }
        builder
            .insert_header((header::LOCATION, self.location))
            .finish()
    }
}

// ===============================
// JSON RESPONSE BUILDER IMPL
// ===============================

impl JsonResponseBuilder {
    const fn new(status: StatusCode) -> Self {
        Self {
            status,
            cookies: Vec::new(),
        }
    }

    /// Attach a cookie, typically the refreshed session cookie
    #[must_use]
    pub fn with_cookie(mut self, cookie: Cookie<'static>) -> Self {
        self.cookies.push(cookie);
        self
    }

    /// Build the response with JSON content
    #[must_use]
    pub fn json<T: serde::Serialize>(self, data: &T) -> HttpResponse {
        let mut builder = HttpResponse::build(self.status);
        for cookie in self.cookies {
            builder.cookie(cookie);
        }
        builder.json(data)
    }
}

// ===============================
// PAGE BUILDER IMPL
// ===============================

impl PageBuilder {
    const fn new(status: StatusCode) -> Self {
        Self { status }
    }

    #[must_use]
    pub fn body(self, html: String) -> HttpResponse {
        HttpResponse::build(self.status)
            .insert_header((header::CONTENT_TYPE, "text/html; charset=utf-8"))
            .body(html)
    }
}

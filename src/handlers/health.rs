use actix_web::{HttpResponse, Result};

use crate::models::HealthResponse;

/// Health check endpoint
///
/// # Errors
///
/// This function does not return errors under normal circumstances
pub async fn health() -> Result<HttpResponse> {
    let response = HealthResponse {
        status: "ok".to_string(),
        message: "Sesame is running".to_string(),
    };
    Ok(HttpResponse::Ok().json(response))
}

/// Browsers ask for it on every page; there is none
pub async fn favicon() -> HttpResponse {
    HttpResponse::NotFound().finish()
}

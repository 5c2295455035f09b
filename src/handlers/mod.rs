// HTTP request handlers for sign-up, login and account pages
pub mod account;
pub mod auth;
pub mod health;
pub mod pages;


use actix_web::web;

// Re-export the main handler functions
pub use account::{account, index};
pub use auth::{login, login_page, logout, signup, signup_page};
pub use health::{favicon, health};

/// Register every route
///
/// Expects `web::Data<SessionManager>` and `web::Data<CredentialStore>` to be
/// registered as app data.
pub fn configure_services(cfg: &mut web::ServiceConfig) {
    cfg.route("/", web::get().to(index))
        .route("/favicon.ico", web::get().to(favicon))
        .route("/signup", web::get().to(signup_page))
        .route("/signup", web::post().to(signup))
        .route("/login", web::get().to(login_page))
        .route("/login", web::post().to(login))
        .route("/logout", web::get().to(logout))
        .route("/account", web::get().to(account))
        .route("/ping", web::get().to(health));
}

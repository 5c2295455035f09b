#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

use actix_web::{middleware::Compress, middleware::Logger, web, App, HttpServer};
use std::sync::Arc;

use sesame::{
    configure_services, AppSettings, CredentialStore, PasswordHasher, SessionManager,
    SessionStore, VERSION,
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
    // Load configuration from Settings.toml and environment variables
    // This also loads .env file and initializes the logger
    let settings = AppSettings::load()
        .map_err(|e| std::io::Error::other(format!("Failed to load settings: {e:#}")))?;

    start_server(settings).await
}

/// Build the shared stores and serve until shutdown
///
/// # Errors
///
/// Returns an error if:
/// - The password hasher cannot be configured
/// - Server binding fails
async fn start_server(settings: AppSettings) -> std::io::Result<()> {
    let hasher = PasswordHasher::new(settings.passwords.iterations)
        .map_err(|e| std::io::Error::other(format!("Invalid password settings: {e}")))?;
    let credentials = web::Data::from(Arc::new(CredentialStore::new(hasher)));

    let session_store = Arc::new(SessionStore::new(settings.session.max_age_seconds));
    let session_manager = SessionManager::new(session_store, settings.cookies.secure);

    let bind_address = settings.get_bind_address();
    print_startup_info(&bind_address, &settings);

    HttpServer::new(move || {
        App::new()
            .app_data(web::Data::new(session_manager.clone()))
            .app_data(credentials.clone())
            .wrap(Logger::default())
            .wrap(Compress::default())
            .configure(configure_services)
    })
    .bind(&bind_address)?
    .run()
    .await
}

fn print_startup_info(bind_address: &str, settings: &AppSettings) {
    println!("Starting Sesame v{VERSION} on http://{bind_address}");
    println!(
        "Sessions: in-memory, {}s sliding expiry",
        settings.session.max_age_seconds
    );
    println!(
        "Passwords: PBKDF2-HMAC-SHA256, {} iterations",
        settings.passwords.iterations
    );
    println!();
    println!("Endpoints:");
    println!("  GET      /         - Login status");
    println!("  GET|POST /signup   - Create an account");
    println!("  GET|POST /login    - Sign in");
    println!("  GET      /logout   - End the session");
    println!("  GET      /account  - Profile and session details");
    println!("  GET      /ping     - Health check");
    if !settings.cookies.secure {
        println!();
        println!("⚠️  Secure cookies disabled; use only for local HTTP development");
    }
}

#![warn(clippy::pedantic)]
#![warn(clippy::cargo)]
#![allow(clippy::multiple_crate_versions)]

/// Version of the sesame application
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

pub mod clock;
pub mod handlers;
pub mod models;
pub mod session;
pub mod settings;
pub mod users;
pub mod utils;

#[cfg(any(test, feature = "testing"))]
pub mod testing;

/// Re-export commonly used items
pub use clock::{Clock, SystemClock};
pub use handlers::configure_services;
pub use models::UserId;
pub use session::{SessionError, SessionManager, SessionStore};
pub use settings::AppSettings;
pub use users::{CredentialError, CredentialStore, PasswordHasher};

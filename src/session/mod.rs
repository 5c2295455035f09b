//! Session Management Module
//!
//! Server-side sessions identified by an opaque token carried in the
//! `session` cookie.
//!
//! # Modules
//!
//! - [`store`] - Token to session mapping with sliding expiry
//! - [`manager`] - Cookie adapter used by the HTTP handlers
//! - [`cookie`] - Cookie construction and extraction
//! - [`errors`] - Session error kinds

pub mod cookie;
pub mod errors;
pub mod manager;
pub mod store;

// Re-export commonly used items for convenience
pub use cookie::{CookieFactory, CookieOptions, COOKIE_NAME};
pub use errors::SessionError;
pub use manager::{AuthenticatedSession, SessionManager};
pub use store::{Session, SessionStore, DEFAULT_MAX_SESSION_AGE_SECS};

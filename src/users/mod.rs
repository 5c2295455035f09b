//! Users and credentials
//!
//! Registration, login and profile lookup over an in-memory store with salted
//! PBKDF2 password hashes.

pub mod errors;
pub mod password;
pub mod store;
pub mod types;

pub use errors::CredentialError;
pub use password::{PasswordHash, PasswordHasher, SaltSource, DEFAULT_HASH_ITERATIONS};
pub use store::CredentialStore;
pub use types::{Registration, User};

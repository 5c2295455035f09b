//! Testing utilities shared by unit and integration tests
//!
//! Compiled for `cfg(test)` and behind the `testing` feature so that the
//! integration tests under `tests/` can use them.
//!
//! - [`fixtures`] - Manual clock, fast-hashing stores and settings
//! - [`requests`] - HTTP request builders for testing handlers
//!
//! ```rust,ignore
//! use sesame::testing::{TestFixtures, RequestBuilder};
//!
//! let manager = TestFixtures::session_manager();
//! let req = RequestBuilder::new().build();
//! assert!(!manager.is_authenticated(&req));
//! ```

pub mod fixtures;
pub mod requests;

pub use fixtures::{fast_credential_store, registration, ManualClock, TestFixtures};
pub use requests::RequestBuilder;

/// Common test constants
pub mod constants {
    /// Default test email address
    pub const TEST_EMAIL: &str = "test@example.com";

    pub const TEST_PASSWORD: &str = "correct horse battery staple";

    pub const TEST_FIRST_NAME: &str = "Test";

    pub const TEST_LAST_NAME: &str = "User";

    /// PBKDF2 rounds used by test stores
    pub const TEST_HASH_ITERATIONS: u32 = 1_000;
}

//! Test fixtures providing pre-built test objects
//!
//! Stores here hash passwords with a tiny work factor so tests stay fast, and
//! sessions run on a [`ManualClock`] so expiry can be stepped through without
//! sleeping.

use chrono::{DateTime, TimeDelta, Utc};
use parking_lot::Mutex;
use std::sync::Arc;

use super::constants::{
    TEST_EMAIL, TEST_FIRST_NAME, TEST_HASH_ITERATIONS, TEST_LAST_NAME, TEST_PASSWORD,
};
use crate::clock::Clock;
use crate::session::{SessionManager, SessionStore, DEFAULT_MAX_SESSION_AGE_SECS};
use crate::users::{CredentialStore, PasswordHasher, Registration};

/// Clock that only moves when told to
#[derive(Debug)]
pub struct ManualClock {
    now: Mutex<DateTime<Utc>>,
}

impl ManualClock {
    #[must_use]
    pub fn new(start: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(start),
        }
    }

    /// Current reading
    #[must_use]
    pub fn now(&self) -> DateTime<Utc> {
        *self.now.lock()
    }

    /// Move the clock by `delta` (negative values move it backwards)
    pub fn advance(&self, delta: TimeDelta) {
        let mut now = self.now.lock();
        *now += delta;
    }

    pub fn set(&self, instant: DateTime<Utc>) {
        *self.now.lock() = instant;
    }
}

impl Default for ManualClock {
    /// Starts at 2024-01-01T00:00:00Z
    fn default() -> Self {
        Self::new(DateTime::from_timestamp(1_704_067_200, 0).unwrap_or_default())
    }
}

impl Clock for ManualClock {
    fn now(&self) -> DateTime<Utc> {
        Self::now(self)
    }
}

/// Credential store with a fast hasher
#[must_use]
pub fn fast_credential_store() -> CredentialStore {
    match PasswordHasher::new(TEST_HASH_ITERATIONS) {
        Ok(hasher) => CredentialStore::new(hasher),
        Err(_) => CredentialStore::default(),
    }
}

/// Registration form with matching passwords and the default test names
#[must_use]
pub fn registration(email: &str, password: &str) -> Registration {
    Registration {
        email: email.to_string(),
        first_name: TEST_FIRST_NAME.to_string(),
        last_name: TEST_LAST_NAME.to_string(),
        password: password.to_string(),
        confirm_password: password.to_string(),
    }
}

/// Central fixture provider for all test data
pub struct TestFixtures;

impl TestFixtures {
    /// Credential store shared the way the server shares it
    #[must_use]
    pub fn credential_store() -> Arc<CredentialStore> {
        Arc::new(fast_credential_store())
    }

    /// Credential store already holding the default test user
    #[must_use]
    pub fn credential_store_with_user() -> Arc<CredentialStore> {
        let store = fast_credential_store();
        if let Err(e) = store.register(&Self::registration()) {
            panic!("failed to register fixture user: {e}");
        }
        Arc::new(store)
    }

    /// Registration for the default test user
    #[must_use]
    pub fn registration() -> Registration {
        registration(TEST_EMAIL, TEST_PASSWORD)
    }

    /// Session manager on the system clock with insecure cookies
    #[must_use]
    pub fn session_manager() -> SessionManager {
        SessionManager::new(
            Arc::new(SessionStore::new(DEFAULT_MAX_SESSION_AGE_SECS)),
            false,
        )
    }

    /// Session manager whose store runs on the returned clock
    #[must_use]
    pub fn session_manager_with_clock(max_age_secs: u64) -> (SessionManager, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let store = Arc::new(SessionStore::with_clock(max_age_secs, clock.clone()));
        (SessionManager::new(store, false), clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manual_clock_moves_only_when_told() {
        let clock = ManualClock::default();
        let start = clock.now();

        assert_eq!(clock.now(), start);
        clock.advance(TimeDelta::seconds(5));
        assert_eq!(clock.now(), start + TimeDelta::seconds(5));
        clock.advance(TimeDelta::seconds(-10));
        assert_eq!(clock.now(), start - TimeDelta::seconds(5));

        clock.set(start);
        assert_eq!(Clock::now(&clock), start);
    }

    #[test]
    fn test_fixture_user_can_log_in() {
        let store = TestFixtures::credential_store_with_user();
        let user = store.login(TEST_EMAIL, TEST_PASSWORD).unwrap();

        assert_eq!(user.first_name, TEST_FIRST_NAME);
        assert_eq!(store.hasher().iterations(), TEST_HASH_ITERATIONS);
    }
}

//! In-memory session store
//!
//! Maps opaque tokens to session records behind a single reader/writer lock.
//! Liveness is enforced server-side with a sliding window: a session is live
//! while less than `max_age` has elapsed since it was created or last
//! extended. Stale records are dropped lazily when they are next touched, or
//! in bulk by [`SessionStore::purge_expired`].

use chrono::{DateTime, Utc};
use log::{debug, warn};
use parking_lot::RwLock;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::Duration;

use super::errors::SessionError;
use crate::clock::{Clock, SystemClock};
use crate::models::UserId;
use crate::utils::crypto::{generate_session_token, token_preview};

/// Default maximum session age in seconds
pub const DEFAULT_MAX_SESSION_AGE_SECS: u64 = 300;

/// A session record
///
/// Values handed out by the store are snapshots; changing one has no effect on
/// the stored record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Session {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
}

impl Session {
    /// Whether `max_age` has fully elapsed since the last refresh
    ///
    /// A clock that moved backwards never expires a session.
    #[must_use]
    pub fn is_expired_at(&self, now: DateTime<Utc>, max_age: Duration) -> bool {
        now.signed_duration_since(self.refreshed_at)
            .to_std()
            .is_ok_and(|elapsed| elapsed >= max_age)
    }

    /// Instant after which the session stops being live unless extended
    #[must_use]
    pub fn expires_at(&self, max_age: Duration) -> DateTime<Utc> {
        chrono::Duration::from_std(max_age)
            .ok()
            .and_then(|age| self.refreshed_at.checked_add_signed(age))
            .unwrap_or(DateTime::<Utc>::MAX_UTC)
    }
}

/// Thread-safe token -> session mapping
pub struct SessionStore {
    sessions: RwLock<HashMap<String, Session>>,
    max_age: Duration,
    clock: Arc<dyn Clock>,
}

impl SessionStore {
    /// Create a store using the system clock
    #[must_use]
    pub fn new(max_age_secs: u64) -> Self {
        Self::with_clock(max_age_secs, Arc::new(SystemClock))
    }

    /// Create a store with an explicit time source
    #[must_use]
    pub fn with_clock(max_age_secs: u64, clock: Arc<dyn Clock>) -> Self {
        Self {
            sessions: RwLock::new(HashMap::new()),
            max_age: Duration::from_secs(max_age_secs),
            clock,
        }
    }

    /// Maximum idle age of a session
    #[must_use]
    pub const fn max_age(&self) -> Duration {
        self.max_age
    }

    /// Issue a new session for `user_id` and return its token
    ///
    /// The user id is not checked against any credential store.
    pub fn create(&self, user_id: UserId) -> String {
        let now = self.clock.now();
        let token = generate_session_token();
        let session = Session {
            token: token.clone(),
            user_id,
            created_at: now,
            refreshed_at: now,
        };

        self.sessions.write().insert(token.clone(), session);
        debug!(
            "Created session {} for user {user_id}",
            token_preview(&token)
        );
        token
    }

    /// Look up a live session
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] if the token is unknown
    /// - [`SessionError::Expired`] if the session outlived `max_age`; the
    ///   record is removed
    pub fn get(&self, token: &str) -> Result<Session, SessionError> {
        let now = self.clock.now();
        {
            let sessions = self.sessions.read();
            let session = sessions.get(token).ok_or(SessionError::NotFound)?;
            if !session.is_expired_at(now, self.max_age) {
                return Ok(session.clone());
            }
        }

        // Re-check under the write lock: a concurrent extend or delete may
        // have run between the two lock acquisitions.
        let mut sessions = self.sessions.write();
        match sessions.get(token) {
            None => Err(SessionError::NotFound),
            Some(session) if !session.is_expired_at(now, self.max_age) => Ok(session.clone()),
            Some(_) => {
                sessions.remove(token);
                debug!("Removed expired session {}", token_preview(token));
                Err(SessionError::Expired)
            }
        }
    }

    /// Slide the session window forward to now
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] if there is nothing to extend
    /// - [`SessionError::Expired`] if the session already lapsed; it is removed
    ///   rather than revived
    pub fn extend(&self, token: &str) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let session = sessions.get_mut(token).ok_or(SessionError::NotFound)?;

        if session.is_expired_at(now, self.max_age) {
            sessions.remove(token);
            debug!("Refused to extend expired session {}", token_preview(token));
            return Err(SessionError::Expired);
        }

        session.refreshed_at = now;
        Ok(session.clone())
    }

    /// Remove a session; returns whether a record was present
    ///
    /// Deleting an unknown token is not an error.
    pub fn delete(&self, token: &str) -> bool {
        let removed = self.sessions.write().remove(token).is_some();
        if removed {
            debug!("Deleted session {}", token_preview(token));
        }
        removed
    }

    /// Validate a token and slide its window
    ///
    /// The lookup and the extension happen under one write guard.
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] if the token is unknown
    /// - [`SessionError::Expired`] if the session outlived `max_age`; the
    ///   record is removed
    pub fn authenticate(&self, token: &str) -> Result<Session, SessionError> {
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let Some(session) = sessions.get_mut(token) else {
            debug!("Unknown session {}", token_preview(token));
            return Err(SessionError::NotFound);
        };

        if session.is_expired_at(now, self.max_age) {
            sessions.remove(token);
            warn!("Rejected expired session {}", token_preview(token));
            return Err(SessionError::Expired);
        }

        session.refreshed_at = now;
        Ok(session.clone())
    }

    /// Whether the token belongs to a live session; extends it when it does
    #[must_use]
    pub fn is_authenticated(&self, token: &str) -> bool {
        self.authenticate(token).is_ok()
    }

    /// Drop every expired record and return how many were removed
    pub fn purge_expired(&self) -> usize {
        let now = self.clock.now();
        let mut sessions = self.sessions.write();
        let before = sessions.len();
        sessions.retain(|_, session| !session.is_expired_at(now, self.max_age));
        let purged = before - sessions.len();
        if purged > 0 {
            debug!("Purged {purged} expired sessions");
        }
        purged
    }

    /// Number of stored records, live or not yet purged
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.read().len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.read().is_empty()
    }
}

impl Default for SessionStore {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_SESSION_AGE_SECS)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::ManualClock;
    use chrono::TimeDelta;

    fn store_with_clock() -> (SessionStore, Arc<ManualClock>) {
        let clock = Arc::new(ManualClock::default());
        let store = SessionStore::with_clock(DEFAULT_MAX_SESSION_AGE_SECS, clock.clone());
        (store, clock)
    }

    #[test]
    fn test_create_then_get_returns_matching_user() {
        let (store, _) = store_with_clock();
        let token = store.create(UserId(7));

        let session = store.get(&token).unwrap();
        assert_eq!(session.user_id, UserId(7));
        assert_eq!(session.token, token);
        assert_eq!(session.created_at, session.refreshed_at);
    }

    #[test]
    fn test_create_issues_distinct_tokens() {
        let (store, _) = store_with_clock();
        let first = store.create(UserId(1));
        let second = store.create(UserId(1));

        assert_ne!(first, second);
        assert_eq!(store.len(), 2);
    }

    #[test]
    fn test_get_unknown_token_is_not_found() {
        let (store, _) = store_with_clock();
        assert_eq!(store.get("missing"), Err(SessionError::NotFound));
    }

    #[test]
    fn test_delete_then_get_is_not_found() {
        let (store, _) = store_with_clock();
        let token = store.create(UserId(3));

        assert!(store.delete(&token));
        assert_eq!(store.get(&token), Err(SessionError::NotFound));
    }

    #[test]
    fn test_delete_is_idempotent() {
        let (store, _) = store_with_clock();
        let token = store.create(UserId(3));

        assert!(store.delete(&token));
        assert!(!store.delete(&token));
        assert!(!store.delete("never-issued"));
    }

    #[test]
    fn test_session_expires_after_max_age_without_extend() {
        let (store, clock) = store_with_clock();
        let token = store.create(UserId(1));

        clock.advance(TimeDelta::seconds(299));
        assert!(store.get(&token).is_ok());

        clock.advance(TimeDelta::seconds(1));
        assert_eq!(store.get(&token), Err(SessionError::Expired));

        // The stale record is gone after the failed lookup
        assert_eq!(store.get(&token), Err(SessionError::NotFound));
        assert!(store.is_empty());
    }

    #[test]
    fn test_extend_keeps_session_alive_past_original_deadline() {
        let (store, clock) = store_with_clock();
        let token = store.create(UserId(1));

        clock.advance(TimeDelta::seconds(290));
        let extended = store.extend(&token).unwrap();
        assert_eq!(extended.refreshed_at, clock.now());

        // Past the original 300s boundary but within the new window
        clock.advance(TimeDelta::seconds(200));
        assert!(store.get(&token).is_ok());

        clock.advance(TimeDelta::seconds(100));
        assert_eq!(store.get(&token), Err(SessionError::Expired));
    }

    #[test]
    fn test_extend_missing_token_is_not_found() {
        let (store, _) = store_with_clock();
        assert_eq!(store.extend("missing"), Err(SessionError::NotFound));
    }

    #[test]
    fn test_extend_does_not_revive_expired_session() {
        let (store, clock) = store_with_clock();
        let token = store.create(UserId(1));

        clock.advance(TimeDelta::seconds(301));
        assert_eq!(store.extend(&token), Err(SessionError::Expired));
        assert_eq!(store.get(&token), Err(SessionError::NotFound));
    }

    #[test]
    fn test_is_authenticated_slides_window() {
        let (store, clock) = store_with_clock();
        let token = store.create(UserId(1));

        clock.advance(TimeDelta::seconds(295));
        assert!(store.is_authenticated(&token));

        // Would be past the original boundary; the authentication reset it
        clock.advance(TimeDelta::seconds(10));
        assert!(store.get(&token).is_ok());
        assert!(store.is_authenticated(&token));
    }

    #[test]
    fn test_is_authenticated_false_for_unknown_and_expired() {
        let (store, clock) = store_with_clock();
        assert!(!store.is_authenticated("missing"));

        let token = store.create(UserId(1));
        clock.advance(TimeDelta::seconds(300));
        assert!(!store.is_authenticated(&token));
    }

    #[test]
    fn test_authenticate_returns_refreshed_snapshot() {
        let (store, clock) = store_with_clock();
        let token = store.create(UserId(9));
        let created = store.get(&token).unwrap();

        clock.advance(TimeDelta::seconds(60));
        let session = store.authenticate(&token).unwrap();

        assert_eq!(session.user_id, UserId(9));
        assert_eq!(session.created_at, created.created_at);
        assert_eq!(session.refreshed_at, created.refreshed_at + TimeDelta::seconds(60));
    }

    #[test]
    fn test_authenticate_after_delete_is_not_found() {
        let (store, _) = store_with_clock();
        let token = store.create(UserId(4));

        assert!(store.authenticate(&token).is_ok());
        assert!(store.delete(&token));
        assert_eq!(store.authenticate(&token), Err(SessionError::NotFound));
        assert!(store.is_empty());
    }

    #[test]
    fn test_authenticate_expired_session_removes_it() {
        let (store, clock) = store_with_clock();
        let token = store.create(UserId(4));

        clock.advance(TimeDelta::seconds(300));
        assert_eq!(store.authenticate(&token), Err(SessionError::Expired));
        assert!(store.is_empty());
    }

    #[test]
    fn test_snapshot_mutation_does_not_touch_store() {
        let (store, _) = store_with_clock();
        let token = store.create(UserId(1));

        let mut snapshot = store.get(&token).unwrap();
        snapshot.user_id = UserId(99);

        assert_eq!(store.get(&token).unwrap().user_id, UserId(1));
    }

    #[test]
    fn test_purge_expired_only_removes_stale_sessions() {
        let (store, clock) = store_with_clock();
        let stale = store.create(UserId(1));

        clock.advance(TimeDelta::seconds(200));
        let fresh = store.create(UserId(2));

        clock.advance(TimeDelta::seconds(150));
        assert_eq!(store.purge_expired(), 1);
        assert_eq!(store.get(&stale), Err(SessionError::NotFound));
        assert!(store.get(&fresh).is_ok());
    }

    #[test]
    fn test_backwards_clock_does_not_expire() {
        let (store, clock) = store_with_clock();
        let token = store.create(UserId(1));

        clock.advance(TimeDelta::seconds(-3600));
        assert!(store.get(&token).is_ok());
    }

    #[test]
    fn test_expires_at_is_refresh_plus_max_age() {
        let (store, _) = store_with_clock();
        let token = store.create(UserId(1));
        let session = store.get(&token).unwrap();

        assert_eq!(
            session.expires_at(store.max_age()),
            session.refreshed_at + TimeDelta::seconds(300)
        );
    }
}

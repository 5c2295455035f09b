use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

use crate::session::Session;
use crate::users::User;

/// Identity of a registered user
///
/// Assigned sequentially from 1 by the credential store. Sessions refer to
/// users only through this id, so a session may outlive the user it names.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct UserId(pub u64);

impl fmt::Display for UserId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

#[derive(Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub message: String,
}

/// Session timestamps exposed to the account owner
#[derive(Serialize, Debug)]
pub struct SessionView {
    pub created_at: DateTime<Utc>,
    pub refreshed_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

impl SessionView {
    #[must_use]
    pub fn new(session: &Session, max_age: std::time::Duration) -> Self {
        Self {
            created_at: session.created_at,
            refreshed_at: session.refreshed_at,
            expires_at: session.expires_at(max_age),
        }
    }
}

/// Body of the `/account` and `/` responses
#[derive(Serialize, Debug)]
pub struct AccountResponse {
    pub logged_in: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user: Option<User>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub session: Option<SessionView>,
}

impl AccountResponse {
    /// Response for a visitor without a live session
    #[must_use]
    pub const fn anonymous() -> Self {
        Self {
            logged_in: false,
            user: None,
            session: None,
        }
    }

    #[must_use]
    pub fn signed_in(user: User, session: SessionView) -> Self {
        Self {
            logged_in: true,
            user: Some(user),
            session: Some(session),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_id_serializes_as_number() {
        assert_eq!(serde_json::to_string(&UserId(42)).unwrap(), "42");
        assert_eq!(UserId(42).to_string(), "42");
    }

    #[test]
    fn test_anonymous_account_omits_user() {
        let json = serde_json::to_value(AccountResponse::anonymous()).unwrap();
        assert_eq!(json, serde_json::json!({ "logged_in": false }));
    }
}

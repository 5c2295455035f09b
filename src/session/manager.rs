//! Session Manager - cookie adapter over the session store
//!
//! The `SessionManager` is the only place where HTTP requests meet the
//! [`SessionStore`]. It pulls the token out of the `session` cookie, asks the
//! store for a verdict and hands back the cookie the response must carry:
//!
//! - **start**: new token, cookie with the full `Max-Age`
//! - **authenticate**: lookup plus sliding extension, cookie re-issued
//! - **end**: record removed, expiring cookie carrying the old token
//!
//! A missing or unreadable cookie is never an error here; it simply means the
//! request is anonymous.

use actix_web::cookie::Cookie;
use actix_web::HttpRequest;
use std::sync::Arc;

use super::cookie::{log_cookies, token_from_request, CookieFactory};
use super::errors::SessionError;
use super::store::{Session, SessionStore};
use crate::models::UserId;

/// A live session together with the refreshed cookie for the response
#[derive(Debug)]
pub struct AuthenticatedSession {
    pub session: Session,
    pub cookie: Cookie<'static>,
}

/// Session Manager for cookie-carried sessions
#[derive(Clone)]
pub struct SessionManager {
    store: Arc<SessionStore>,
    cookie_factory: CookieFactory,
}

impl SessionManager {
    /// Create a session manager; cookie lifetime follows the store's max age
    #[must_use]
    pub fn new(store: Arc<SessionStore>, cookie_secure: bool) -> Self {
        let cookie_factory = CookieFactory::new(cookie_secure, store.max_age().as_secs());
        Self {
            store,
            cookie_factory,
        }
    }

    /// Issue a session for `user_id` and return the cookie to set
    #[must_use]
    pub fn start_session(&self, user_id: UserId) -> Cookie<'static> {
        let token = self.store.create(user_id);
        self.cookie_factory.session_cookie(&token)
    }

    /// Authenticate the request from its session cookie
    ///
    /// Returns `None` when the cookie is absent or the session is unknown or
    /// expired. On success the session has been extended and the returned
    /// cookie carries a fresh `Max-Age`.
    #[must_use]
    pub fn authenticate(&self, req: &HttpRequest) -> Option<AuthenticatedSession> {
        log_cookies(req);
        let token = token_from_request(req)?;

        match self.store.authenticate(&token) {
            Ok(session) => Some(AuthenticatedSession {
                cookie: self.cookie_factory.session_cookie(&token),
                session,
            }),
            Err(e) => {
                log::debug!("Session cookie rejected: {e}");
                None
            }
        }
    }

    /// Whether the request carries a live session (extends it if so)
    #[must_use]
    pub fn is_authenticated(&self, req: &HttpRequest) -> bool {
        token_from_request(req).is_some_and(|token| self.store.is_authenticated(&token))
    }

    /// Extend the request's session and return the refreshed cookie
    ///
    /// # Errors
    ///
    /// - [`SessionError::NotFound`] when the request has no session cookie or
    ///   the token is unknown
    /// - [`SessionError::Expired`] when the session already lapsed
    pub fn extend_session(&self, req: &HttpRequest) -> Result<Cookie<'static>, SessionError> {
        let token = token_from_request(req).ok_or(SessionError::NotFound)?;
        self.store.extend(&token)?;
        Ok(self.cookie_factory.session_cookie(&token))
    }

    /// Delete the request's session and return the expiring replacement cookie
    ///
    /// Returns `None` when the request carries no session cookie. The store
    /// delete is idempotent, so an already-deleted token still gets an
    /// expiring cookie.
    #[must_use]
    pub fn end_session(&self, req: &HttpRequest) -> Option<Cookie<'static>> {
        let token = token_from_request(req)?;
        if !self.store.delete(&token) {
            log::debug!("Ending a session that was already gone");
        }
        Some(self.cookie_factory.expired_session_cookie(&token))
    }

    /// Get reference to the underlying store
    #[must_use]
    pub fn store(&self) -> &SessionStore {
        &self.store
    }

    /// Get reference to cookie factory for direct cookie operations
    #[must_use]
    pub const fn cookie_factory(&self) -> &CookieFactory {
        &self.cookie_factory
    }

    /// Check if cookies should be marked as secure
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_factory.cookie_secure()
    }
}

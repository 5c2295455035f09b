use actix_web::cookie::{time::Duration, Cookie, SameSite};
use actix_web::HttpRequest;

/// Name of the single cookie carrying the session token
pub const COOKIE_NAME: &str = "session";

/// Options for cookie creation
pub struct CookieOptions {
    pub http_only: bool,
    pub secure: bool,
    pub same_site: SameSite,
    pub path: String,
    pub max_age: Duration,
}

impl Default for CookieOptions {
    fn default() -> Self {
        Self {
            http_only: true,
            secure: true,
            same_site: SameSite::Lax,
            path: "/".to_string(),
            max_age: Duration::seconds(
                i64::try_from(crate::session::store::DEFAULT_MAX_SESSION_AGE_SECS)
                    .unwrap_or(300),
            ),
        }
    }
}

/// Cookie factory for the session cookie
///
/// Every cookie the application sets goes through here so the name, flags
/// and lifetime stay consistent between create, extend and delete.
#[derive(Clone)]
pub struct CookieFactory {
    cookie_secure: bool,
    max_age_secs: u64,
}

impl CookieFactory {
    /// Create a new cookie factory with the specified configuration
    #[must_use]
    pub const fn new(cookie_secure: bool, max_age_secs: u64) -> Self {
        Self {
            cookie_secure,
            max_age_secs,
        }
    }

    /// Generic method to build a session-named cookie
    #[must_use]
    pub fn create_cookie(&self, value: String, options: CookieOptions) -> Cookie<'static> {
        Cookie::build(COOKIE_NAME, value)
            .http_only(options.http_only)
            .secure(self.cookie_secure && options.secure)
            .same_site(options.same_site)
            .path(options.path)
            .max_age(options.max_age)
            .finish()
    }

    /// Cookie carrying a freshly issued or freshly extended token
    ///
    /// `Max-Age` is the full session age, so the client and server windows
    /// restart together.
    #[must_use]
    pub fn session_cookie(&self, token: &str) -> Cookie<'static> {
        self.create_cookie(
            token.to_owned(),
            CookieOptions {
                max_age: Duration::seconds(i64::try_from(self.max_age_secs).unwrap_or(i64::MAX)),
                ..Default::default()
            },
        )
    }

    /// Replacement cookie that tells the client to drop the session
    ///
    /// Keeps the prior token as its value with a negative `Max-Age`.
    #[must_use]
    pub fn expired_session_cookie(&self, token: &str) -> Cookie<'static> {
        self.create_cookie(
            token.to_owned(),
            CookieOptions {
                max_age: Duration::seconds(-1),
                ..Default::default()
            },
        )
    }

    /// Check if cookies should be marked as secure
    #[must_use]
    pub const fn cookie_secure(&self) -> bool {
        self.cookie_secure
    }

    #[must_use]
    pub const fn max_age_secs(&self) -> u64 {
        self.max_age_secs
    }
}

/// Read the session token from the request
///
/// A missing, empty or unparseable cookie header all mean "no session".
#[must_use]
pub fn token_from_request(req: &HttpRequest) -> Option<String> {
    req.cookie(COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
        .filter(|value| !value.is_empty())
}

/// Helper function to log which cookies arrived with a request
pub fn log_cookies(req: &HttpRequest) {
    if let Ok(cookies) = req.cookies() {
        for cookie in cookies.iter() {
            log::debug!(
                "Found cookie: name='{}', secure={:?}",
                cookie.name(),
                cookie.secure()
            );
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    #[test]
    fn test_session_cookie_attributes() {
        let factory = CookieFactory::new(true, 300);
        let cookie = factory.session_cookie("tok");

        assert_eq!(cookie.name(), "session");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.max_age(), Some(Duration::seconds(300)));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
    }

    #[test]
    fn test_insecure_factory_clears_secure_flag() {
        let factory = CookieFactory::new(false, 300);
        let cookie = factory.session_cookie("tok");

        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.http_only(), Some(true));
    }

    #[test]
    fn test_expired_cookie_keeps_token_with_negative_max_age() {
        let factory = CookieFactory::new(true, 300);
        let cookie = factory.expired_session_cookie("old-token");

        assert_eq!(cookie.name(), COOKIE_NAME);
        assert_eq!(cookie.value(), "old-token");
        assert_eq!(cookie.max_age(), Some(Duration::seconds(-1)));
    }

    #[test]
    fn test_token_from_request() {
        let req = TestRequest::default()
            .cookie(Cookie::new(COOKIE_NAME, "abc"))
            .to_http_request();
        assert_eq!(token_from_request(&req), Some("abc".to_string()));

        let req = TestRequest::default().to_http_request();
        assert_eq!(token_from_request(&req), None);

        let req = TestRequest::default()
            .cookie(Cookie::new(COOKIE_NAME, ""))
            .to_http_request();
        assert_eq!(token_from_request(&req), None);
    }
}

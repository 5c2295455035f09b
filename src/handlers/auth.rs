// Authentication handlers: sign-up, login and logout
use actix_web::{web, HttpRequest, HttpResponse};
use log::{debug, error, info};
use serde::Deserialize;
use std::fmt;

use super::pages::{form_error, form_page, FormPage};
use crate::session::SessionManager;
use crate::users::{CredentialError, CredentialStore, Registration};
use crate::utils::responses::ResponseBuilder;

/// Where signed-in users are sent
pub const ACCOUNT_PATH: &str = "/account";

#[derive(Deserialize)]
pub struct LoginForm {
    pub email: String,
    pub password: String,
}

impl fmt::Debug for LoginForm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("LoginForm")
            .field("email", &self.email)
            .field("password", &"<redacted>")
            .finish()
    }
}

/// Redirect already signed-in visitors to their account
fn redirect_if_signed_in(req: &HttpRequest, session_manager: &SessionManager) -> Option<HttpResponse> {
    session_manager.authenticate(req).map(|authenticated| {
        ResponseBuilder::redirect(ACCOUNT_PATH)
            .with_cookie(authenticated.cookie)
            .build()
    })
}

/// `GET /signup`
pub async fn signup_page(
    req: HttpRequest,
    session_manager: web::Data<SessionManager>,
) -> HttpResponse {
    redirect_if_signed_in(&req, &session_manager).unwrap_or_else(|| form_page(FormPage::Signup))
}

/// `POST /signup`
///
/// Registers the user, starts a session and redirects to the account page.
/// Failures re-render the form with the error message.
pub async fn signup(
    req: HttpRequest,
    form: web::Form<Registration>,
    session_manager: web::Data<SessionManager>,
    credentials: web::Data<CredentialStore>,
) -> HttpResponse {
    if let Some(response) = redirect_if_signed_in(&req, &session_manager) {
        return response;
    }

    let registration = form.into_inner();
    if let Err(e) = credentials.check_email_exists(&registration.email) {
        debug!("Sign-up rejected: {e}");
        return form_error(FormPage::Signup, e);
    }

    // Hashing is CPU-bound; keep it off the async workers
    let store = credentials.into_inner();
    let result = web::block(move || store.register(&registration)).await;

    match result {
        Ok(Ok(user_id)) => {
            info!("User {user_id} signed up");
            ResponseBuilder::redirect(ACCOUNT_PATH)
                .with_cookie(session_manager.start_session(user_id))
                .build()
        }
        Ok(Err(e)) => {
            debug!("Sign-up rejected: {e}");
            form_error(FormPage::Signup, e)
        }
        Err(e) => {
            error!("Registration task failed: {e}");
            form_error(FormPage::Signup, CredentialError::HashingFailed)
        }
    }
}

/// `GET /login`
pub async fn login_page(
    req: HttpRequest,
    session_manager: web::Data<SessionManager>,
) -> HttpResponse {
    redirect_if_signed_in(&req, &session_manager).unwrap_or_else(|| form_page(FormPage::Login))
}

/// `POST /login`
pub async fn login(
    req: HttpRequest,
    form: web::Form<LoginForm>,
    session_manager: web::Data<SessionManager>,
    credentials: web::Data<CredentialStore>,
) -> HttpResponse {
    if let Some(response) = redirect_if_signed_in(&req, &session_manager) {
        return response;
    }

    let LoginForm { email, password } = form.into_inner();
    let store = credentials.into_inner();
    let result = web::block(move || store.login(&email, &password)).await;

    match result {
        Ok(Ok(user)) => {
            info!("User {} logged in", user.user_id);
            ResponseBuilder::redirect(ACCOUNT_PATH)
                .with_cookie(session_manager.start_session(user.user_id))
                .build()
        }
        Ok(Err(e)) => form_error(FormPage::Login, e),
        Err(e) => {
            error!("Login task failed: {e}");
            form_error(FormPage::Login, CredentialError::HashingFailed)
        }
    }
}

/// `GET /logout`
///
/// Always lands on `/`. A request carrying a session cookie gets it expired,
/// whether or not the session was still live.
pub async fn logout(req: HttpRequest, session_manager: web::Data<SessionManager>) -> HttpResponse {
    let cookie = session_manager.end_session(&req);
    if cookie.is_some() {
        info!("Session ended by logout");
    }
    ResponseBuilder::redirect("/")
        .with_optional_cookie(cookie)
        .build()
}

// Account views: the index summary and the account page
use actix_web::{web, HttpRequest, HttpResponse};
use log::error;

use crate::models::{AccountResponse, SessionView};
use crate::session::{AuthenticatedSession, SessionManager};
use crate::users::CredentialStore;
use crate::utils::responses::ResponseBuilder;

/// Profile and session view for an authenticated request
///
/// A session pointing at a user that no longer exists is a server fault.
fn signed_in_response(
    authenticated: AuthenticatedSession,
    session_manager: &SessionManager,
    credentials: &CredentialStore,
) -> HttpResponse {
    let AuthenticatedSession { session, cookie } = authenticated;
    match credentials.get(session.user_id) {
        Ok(user) => {
            let view = SessionView::new(&session, session_manager.store().max_age());
            ResponseBuilder::ok()
                .with_cookie(cookie)
                .json(&AccountResponse::signed_in(user, view))
        }
        Err(e) => {
            error!("Session for user {} has no matching user: {e}", session.user_id);
            ResponseBuilder::internal_server_error().build()
        }
    }
}

/// `GET /`
pub async fn index(
    req: HttpRequest,
    session_manager: web::Data<SessionManager>,
    credentials: web::Data<CredentialStore>,
) -> HttpResponse {
    match session_manager.authenticate(&req) {
        Some(authenticated) => signed_in_response(authenticated, &session_manager, &credentials),
        None => ResponseBuilder::ok().json(&AccountResponse::anonymous()),
    }
}

/// `GET /account`
pub async fn account(
    req: HttpRequest,
    session_manager: web::Data<SessionManager>,
    credentials: web::Data<CredentialStore>,
) -> HttpResponse {
    match session_manager.authenticate(&req) {
        Some(authenticated) => signed_in_response(authenticated, &session_manager, &credentials),
        None => ResponseBuilder::unauthorized().build(),
    }
}

use actix_web::{http::header, HttpRequest, HttpResponse};

use super::model::{Area, GuardDecision, SessionUser, SIGN_IN_PATH};
use super::session::guard;
use crate::{AppState, ErrorResponse};

/// Extract the bearer token from the Authorization header
pub fn extract_token(req: &HttpRequest) -> Option<String> {
    req.headers()
        .get(header::AUTHORIZATION)
        .and_then(|h| h.to_str().ok())
        .and_then(|auth| auth.strip_prefix("Bearer "))
        .map(|token| token.trim().to_string())
        .filter(|token| !token.is_empty())
}

/// Run the area guard for a request.
///
/// A missing session becomes 401 and a wrong area 403. Both bodies carry the redirect path.
pub async fn require_area(
    state: &AppState,
    req: &HttpRequest,
    area: Area,
) -> Result<SessionUser, HttpResponse> {
    let token = extract_token(req);
    match guard(state.sessions.as_ref(), token.as_deref(), area).await {
        GuardDecision::Allow(user) => Ok(user),
        GuardDecision::Redirect(path) if path == SIGN_IN_PATH => {
            log::warn!("Rejected {} {}: no session", req.method(), req.path());
            Err(HttpResponse::Unauthorized()
                .json(ErrorResponse::unauthorized("Sign in to continue").redirect_to(path)))
        }
        GuardDecision::Redirect(path) => {
            log::warn!("Rejected {} {}: wrong area", req.method(), req.path());
            Err(HttpResponse::Forbidden().json(
                ErrorResponse::forbidden("This area is not available for your role")
                    .redirect_to(path),
            ))
        }
    }
}

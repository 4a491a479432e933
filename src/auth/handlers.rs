use actix_web::{web, HttpRequest, HttpResponse, Responder};

use super::middleware::extract_token;
use super::model::LandingResponse;
use super::session::landing;
use crate::AppState;

/// Where the sign-in page should send the visitor
#[utoipa::path(
    get,
    path = "/api/session/landing",
    tag = "Session",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Landing decision", body = LandingResponse)
    )
)]
pub async fn get_landing(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    let token = extract_token(&req);
    let redirect = landing(state.sessions.as_ref(), token.as_deref()).await;
    log::info!("Landing decision: {:?}", redirect);
    HttpResponse::Ok().json(LandingResponse {
        redirect: redirect.map(String::from),
    })
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(web::resource("/session/landing").route(web::get().to(get_landing)));
}

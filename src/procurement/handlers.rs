use actix_web::http::header;
use actix_web::{web, HttpRequest, HttpResponse, Responder};
use uuid::Uuid;

use super::editor::{Editor, EditorError};
use super::model::{
    ProcurementRequest, RecordSummary, RequestStatus, UpdateLineItemRequest,
    UpdateProcurementRequest,
};
use super::store::UpsertOutcome;
use super::validation::ValidationErrors;
use crate::auth::{require_area, Area};
use crate::documents::{
    ExportError, GeneratedDocument, PreviewRenderer, PrintOutcome, PrintRenderer, Renderer,
};
use crate::{AppState, ErrorResponse};

fn not_found(id: &Uuid) -> HttpResponse {
    HttpResponse::NotFound().json(ErrorResponse::not_found(&format!(
        "Procurement request {} not found",
        id
    )))
}

fn rejected(errors: &ValidationErrors) -> HttpResponse {
    HttpResponse::BadRequest().json(ErrorResponse::bad_request(&errors.to_message()))
}

fn export_failed(e: &ExportError) -> HttpResponse {
    log::error!("Export failed: {}", e);
    HttpResponse::InternalServerError().json(ErrorResponse::internal_error(&e.to_string()))
}

fn editor_failed(e: &EditorError) -> HttpResponse {
    match e {
        EditorError::Validation(errors) => rejected(errors),
        EditorError::Export(e) => export_failed(e),
    }
}

fn file_response(document: GeneratedDocument, disposition: &str) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(document.mime_type.as_str())
        .insert_header((
            header::CONTENT_DISPOSITION,
            format!("{}; filename=\"{}\"", disposition, document.filename),
        ))
        .body(document.bytes)
}

fn saved_copy(state: &AppState, id: &Uuid) -> Option<ProcurementRequest> {
    state.store.read().get(id).cloned()
}

/// Open a saved request, apply `edit`, and save it back.
///
/// `edit` returns false when the thing it should change does not exist; the request is then
/// left untouched and the response is 404.
fn edit_saved<F>(state: &AppState, id: Uuid, edit: F) -> HttpResponse
where
    F: FnOnce(&mut Editor) -> bool,
{
    let mut store = state.store.write();
    let Some(existing) = store.get(&id) else {
        return not_found(&id);
    };

    let mut editor = Editor::open(Some(existing));
    if !edit(&mut editor) {
        return HttpResponse::NotFound().json(ErrorResponse::not_found("Line item not found"));
    }

    match editor.save(&mut store) {
        Ok((saved, _)) => HttpResponse::Ok().json(saved),
        Err(errors) => rejected(&errors),
    }
}

/// List saved requests, most recent first
#[utoipa::path(
    get,
    path = "/api/procurement",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Saved requests", body = Vec<RecordSummary>),
        (status = 401, description = "No session", body = ErrorResponse),
        (status = 403, description = "Wrong area for this role", body = ErrorResponse)
    )
)]
pub async fn list_requests(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let summaries = state.store.read().summaries();
    log::info!("Listing {} procurement requests", summaries.len());
    HttpResponse::Ok().json(summaries)
}

/// A fresh request to start editing
#[utoipa::path(
    get,
    path = "/api/procurement/new",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    responses(
        (status = 200, description = "Empty request with one blank line", body = ProcurementRequest)
    )
)]
pub async fn new_request(state: web::Data<AppState>, req: HttpRequest) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    HttpResponse::Ok().json(Editor::open(None).record())
}

/// Status labels, in display order
#[utoipa::path(
    get,
    path = "/api/procurement/statuses",
    tag = "Procurement",
    responses(
        (status = 200, description = "Status labels", body = Vec<String>)
    )
)]
pub async fn list_statuses() -> impl Responder {
    let labels: Vec<&str> = RequestStatus::ALL.iter().map(|s| s.label()).collect();
    HttpResponse::Ok().json(labels)
}

/// Save a full request. Existing ids are replaced in place, new ids go first.
#[utoipa::path(
    post,
    path = "/api/procurement",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    request_body = ProcurementRequest,
    responses(
        (status = 201, description = "Request created", body = ProcurementRequest),
        (status = 200, description = "Request updated", body = ProcurementRequest),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
pub async fn save_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    body: web::Json<ProcurementRequest>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }

    let record = body.into_inner();
    let mut editor = Editor::open(Some(&record));
    let result = editor.save(&mut state.store.write());
    match result {
        Ok((saved, UpsertOutcome::Inserted)) => HttpResponse::Created().json(saved),
        Ok((saved, UpsertOutcome::Updated)) => HttpResponse::Ok().json(saved),
        Err(errors) => rejected(&errors),
    }
}

/// Get one saved request
#[utoipa::path(
    get,
    path = "/api/procurement/{id}",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "The request", body = ProcurementRequest),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn get_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let id = path.into_inner();
    match saved_copy(&state, &id) {
        Some(record) => HttpResponse::Ok().json(record),
        None => not_found(&id),
    }
}

/// Update header fields or status of a saved request
#[utoipa::path(
    patch,
    path = "/api/procurement/{id}",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    request_body = UpdateProcurementRequest,
    responses(
        (status = 200, description = "Updated request", body = ProcurementRequest),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn update_request(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
    body: web::Json<UpdateProcurementRequest>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    edit_saved(&state, path.into_inner(), |editor| {
        editor.apply(&body);
        true
    })
}

/// Append a blank line item
#[utoipa::path(
    post,
    path = "/api/procurement/{id}/items",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Request with the new line", body = ProcurementRequest),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn add_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    edit_saved(&state, path.into_inner(), |editor| {
        editor.add_item();
        true
    })
}

/// Update fields of one line item
#[utoipa::path(
    patch,
    path = "/api/procurement/{id}/items/{item_id}",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Request ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    request_body = UpdateLineItemRequest,
    responses(
        (status = 200, description = "Updated request", body = ProcurementRequest),
        (status = 404, description = "Request or line not found", body = ErrorResponse)
    )
)]
pub async fn update_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
    body: web::Json<UpdateLineItemRequest>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let (id, item_id) = path.into_inner();
    edit_saved(&state, id, |editor| {
        if !editor.record().items.iter().any(|item| item.id == item_id) {
            return false;
        }
        for (column, value) in body.column_changes() {
            editor.update_item(item_id, column, value);
        }
        true
    })
}

/// Remove a line item. The last line of a request is kept.
#[utoipa::path(
    delete,
    path = "/api/procurement/{id}/items/{item_id}",
    tag = "Procurement",
    security(("bearer_auth" = [])),
    params(
        ("id" = Uuid, Path, description = "Request ID"),
        ("item_id" = Uuid, Path, description = "Line item ID")
    ),
    responses(
        (status = 200, description = "Updated request", body = ProcurementRequest),
        (status = 404, description = "Request or line not found", body = ErrorResponse)
    )
)]
pub async fn remove_item(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<(Uuid, Uuid)>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let (id, item_id) = path.into_inner();
    edit_saved(&state, id, |editor| {
        if !editor.record().items.iter().any(|item| item.id == item_id) {
            return false;
        }
        if !editor.remove_item(item_id) {
            log::info!("Kept line {} of request {}: it is the only line", item_id, id);
        }
        true
    })
}

/// Screen preview markup
#[utoipa::path(
    get,
    path = "/api/procurement/{id}/preview",
    tag = "Procurement Export",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "HTML fragment", body = String, content_type = "text/html"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn preview(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let id = path.into_inner();
    let Some(record) = saved_copy(&state, &id) else {
        return not_found(&id);
    };
    match PreviewRenderer::new(&state.layout).render(&record) {
        Ok(html) => HttpResponse::Ok()
            .content_type("text/html; charset=utf-8")
            .body(html),
        Err(e) => export_failed(&e),
    }
}

/// Self-printing HTML document
#[utoipa::path(
    get,
    path = "/api/procurement/{id}/print",
    tag = "Procurement Export",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Printable document", body = String, content_type = "text/html"),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn print_document(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let id = path.into_inner();
    let Some(record) = saved_copy(&state, &id) else {
        return not_found(&id);
    };
    match PrintRenderer::new(&state.layout).render(&record) {
        Ok(document) => {
            log::info!("Serving print document {}", document.filename);
            file_response(document, "inline")
        }
        Err(e) => export_failed(&e),
    }
}

/// Print on the server's own print surface, or save a download when it is blocked
#[utoipa::path(
    post,
    path = "/api/procurement/{id}/print",
    tag = "Procurement Export",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Print outcome", body = PrintOutcome),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "Not found", body = ErrorResponse)
    )
)]
pub async fn print_on_host(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let id = path.into_inner();
    let Some(record) = saved_copy(&state, &id) else {
        return not_found(&id);
    };

    let layout = state.layout.clone();
    let surface = state.print_surface.clone();
    let result =
        web::block(move || Editor::open(Some(&record)).print(&layout, surface.as_ref())).await;

    match result {
        Ok(Ok(outcome)) => HttpResponse::Ok().json(outcome),
        Ok(Err(e)) => editor_failed(&e),
        Err(e) => {
            log::error!("Print task failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Print task failed"))
        }
    }
}

/// Spreadsheet workbook
#[utoipa::path(
    get,
    path = "/api/procurement/{id}/xlsx",
    tag = "Procurement Export",
    security(("bearer_auth" = [])),
    params(("id" = Uuid, Path, description = "Request ID")),
    responses(
        (status = 200, description = "Workbook attachment", body = Vec<u8>,
            content_type = "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"),
        (status = 404, description = "Not found", body = ErrorResponse),
        (status = 500, description = "Spreadsheet writer unavailable", body = ErrorResponse)
    )
)]
pub async fn export_xlsx(
    state: web::Data<AppState>,
    req: HttpRequest,
    path: web::Path<Uuid>,
) -> impl Responder {
    if let Err(response) = require_area(&state, &req, Area::EndUser).await {
        return response;
    }
    let id = path.into_inner();
    let Some(record) = saved_copy(&state, &id) else {
        return not_found(&id);
    };

    let layout = state.layout.clone();
    let result =
        web::block(move || Editor::open(Some(&record)).export_spreadsheet(&layout)).await;

    match result {
        Ok(Ok(document)) => file_response(document, "attachment"),
        Ok(Err(e)) => editor_failed(&e),
        Err(e) => {
            log::error!("Workbook task failed: {}", e);
            HttpResponse::InternalServerError()
                .json(ErrorResponse::internal_error("Workbook task failed"))
        }
    }
}

pub fn config(cfg: &mut web::ServiceConfig) {
    cfg.service(
        web::resource("/procurement")
            .route(web::get().to(list_requests))
            .route(web::post().to(save_request)),
    )
    .service(web::resource("/procurement/new").route(web::get().to(new_request)))
    .service(web::resource("/procurement/statuses").route(web::get().to(list_statuses)))
    .service(
        web::resource("/procurement/{id}")
            .route(web::get().to(get_request))
            .route(web::patch().to(update_request)),
    )
    .service(web::resource("/procurement/{id}/items").route(web::post().to(add_item)))
    .service(
        web::resource("/procurement/{id}/items/{item_id}")
            .route(web::patch().to(update_item))
            .route(web::delete().to(remove_item)),
    )
    .service(web::resource("/procurement/{id}/preview").route(web::get().to(preview)))
    .service(
        web::resource("/procurement/{id}/print")
            .route(web::get().to(print_document))
            .route(web::post().to(print_on_host)),
    )
    .service(web::resource("/procurement/{id}/xlsx").route(web::get().to(export_xlsx)));
}

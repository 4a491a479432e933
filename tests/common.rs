#![allow(dead_code)]

use std::path::Path;
use std::sync::Arc;

use procurement_server::auth::{Role, SessionUser, StaticSessionProvider};
use procurement_server::documents::DirectorySurface;
use procurement_server::procurement::{LineItem, ProcurementRequest};
use procurement_server::{AppConfig, AppState};

pub const END_USER_TOKEN: &str = "end-user-token";
pub const ADMIN_TOKEN: &str = "admin-token";

/// Sessions for one end user and one admin.
pub fn test_sessions() -> StaticSessionProvider {
    StaticSessionProvider::new()
        .with_session(END_USER_TOKEN, SessionUser::new("end-user-1"), Role::EndUser)
        .with_session(ADMIN_TOKEN, SessionUser::new("admin-1"), Role::Admin)
}

/// App state whose print surface writes downloads into `export_dir`.
pub fn test_state(export_dir: &Path) -> AppState {
    let config = AppConfig {
        export_dir: export_dir.to_path_buf(),
        ..AppConfig::default()
    };
    AppState::new(
        config,
        Arc::new(test_sessions()),
        Arc::new(DirectorySurface::new(export_dir)),
    )
}

pub fn bearer(token: &str) -> (&'static str, String) {
    ("Authorization", format!("Bearer {}", token))
}

pub fn item(description: &str, quantity: &str, unit_cost: &str) -> LineItem {
    let mut item = LineItem::blank();
    item.description = description.to_string();
    item.unit = "pc".to_string();
    item.quantity = quantity.into();
    item.unit_cost = unit_cost.into();
    item
}

/// A request whose two lines total 100.00 and 250.00.
pub fn sample_request(request_number: &str) -> ProcurementRequest {
    let mut record = ProcurementRequest::new_empty();
    record.request_number = request_number.to_string();
    record.entity_name = "Municipal Government".to_string();
    record.office = "General Services".to_string();
    record.purpose = "Replenish office supplies".to_string();
    record.items = vec![
        item("Bond paper, A4", "1", "100"),
        item("Toner cartridge", "2", "125"),
    ];
    record
}

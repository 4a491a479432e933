//! Derived totals. Nothing here is stored; every figure is recomputed from the items.

use super::model::{LineItem, ProcurementRequest, RecordSummary};

pub fn line_total(item: &LineItem) -> f64 {
    item.quantity.value() * item.unit_cost.value()
}

pub fn grand_total(items: &[LineItem]) -> f64 {
    items.iter().map(line_total).sum()
}

pub fn total_quantity(items: &[LineItem]) -> f64 {
    items.iter().map(|item| item.quantity.value()).sum()
}

/// Build the records-table row for a request.
pub fn summarize(record: &ProcurementRequest) -> RecordSummary {
    let first_description = record
        .items
        .first()
        .map(|item| item.description.trim())
        .filter(|d| !d.is_empty())
        .unwrap_or("—")
        .to_string();

    RecordSummary {
        id: record.id,
        request_number: record.request_number.clone(),
        first_description,
        office: record.office.clone(),
        total_quantity: total_quantity(&record.items),
        grand_total: grand_total(&record.items),
        date: record.date.clone(),
        status: record.status,
        saved_at: record.saved_at,
    }
}

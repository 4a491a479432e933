//! Resolution of template bindings against a record.
//!
//! All renderers go through [`CellValue::resolve`], so a given record shows the same values and
//! totals on screen, on paper and in the workbook.

use super::common::format_number;
use super::layout::{CellContent, ItemBinding, LabelPlacement};
use crate::procurement::model::{ItemColumn, ProcurementRequest};
use crate::procurement::totals::{grand_total, line_total};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NumberFormat {
    General,
    TwoDecimals,
}

impl NumberFormat {
    /// Spreadsheet number format code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::General => "General",
            Self::TwoDecimals => "0.00",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellValue {
    Blank,
    Text(String),
    /// A caption followed by a value, inline or on the next line.
    Labeled {
        label: &'static str,
        value: String,
        placement: LabelPlacement,
    },
    Number {
        value: f64,
        format: NumberFormat,
    },
}

impl CellValue {
    pub fn resolve(content: &CellContent, record: &ProcurementRequest) -> CellValue {
        match content {
            CellContent::Empty => CellValue::Blank,
            CellContent::Label(text) => CellValue::Text((*text).to_string()),
            CellContent::Field {
                label: Some(label),
                field,
                placement,
            } => CellValue::Labeled {
                label: *label,
                value: record.field(*field).to_string(),
                placement: *placement,
            },
            CellContent::Field {
                label: None, field, ..
            } => text_or_blank(record.field(*field)),
            CellContent::Item { index, binding } => {
                let item = record.item_or_blank(*index);
                match binding {
                    ItemBinding::Column(ItemColumn::Quantity) => {
                        nonzero(item.quantity.parsed(), NumberFormat::General)
                    }
                    ItemBinding::Column(ItemColumn::UnitCost) => {
                        nonzero(item.unit_cost.parsed(), NumberFormat::TwoDecimals)
                    }
                    ItemBinding::Column(column) => text_or_blank(item.text(*column)),
                    ItemBinding::LineTotal => {
                        let total = line_total(&item);
                        if total > 0.0 {
                            CellValue::Number {
                                value: total,
                                format: NumberFormat::TwoDecimals,
                            }
                        } else {
                            CellValue::Blank
                        }
                    }
                }
            }
            CellContent::GrandTotal => CellValue::Number {
                value: grand_total(&record.items),
                format: NumberFormat::TwoDecimals,
            },
        }
    }

    /// The value as plain text, the way the preview and the print document show it.
    pub fn display(&self) -> String {
        match self {
            CellValue::Blank => String::new(),
            CellValue::Text(text) => text.clone(),
            CellValue::Labeled {
                label,
                value,
                placement,
            } => labeled_text(label, value, *placement),
            CellValue::Number { value, format } => format_number(*value, *format),
        }
    }
}

pub(crate) fn labeled_text(label: &str, value: &str, placement: LabelPlacement) -> String {
    match placement {
        LabelPlacement::Inline if value.is_empty() => label.to_string(),
        LabelPlacement::Inline => format!("{} {}", label, value),
        LabelPlacement::Stacked => format!("{}\n{}", label, value),
    }
}

fn text_or_blank(text: &str) -> CellValue {
    if text.is_empty() {
        CellValue::Blank
    } else {
        CellValue::Text(text.to_string())
    }
}

fn nonzero(value: Option<f64>, format: NumberFormat) -> CellValue {
    match value {
        Some(value) if value != 0.0 => CellValue::Number { value, format },
        _ => CellValue::Blank,
    }
}

//! Shared helpers for filenames, markup escaping and number display.

use super::values::NumberFormat;
use crate::procurement::model::ProcurementRequest;

const FILENAME_FALLBACK: &str = "export";

/// `PR_<requestNumber>.<ext>`, or `PR_export.<ext>` when the number is blank or unusable.
pub fn export_filename(request_number: &str, extension: &str) -> String {
    let base = sanitize_filename::sanitize(request_number.trim());
    let base = base.trim();
    let base = if base.is_empty() {
        FILENAME_FALLBACK
    } else {
        base
    };
    format!("PR_{}.{}", base, extension)
}

/// Escape text for HTML element content and attribute values.
pub fn escape_html(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    for ch in value.chars() {
        match ch {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(ch),
        }
    }
    out
}

/// Escaped text with line breaks turned into `<br/>`.
pub fn html_lines(value: &str) -> String {
    escape_html(value).replace('\n', "<br/>")
}

/// Warn when a record has more items than the form has rows. The extra items still count
/// toward the grand total.
pub(crate) fn warn_on_hidden_items(record: &ProcurementRequest, capacity: usize) {
    if record.items.len() > capacity {
        log::warn!(
            "Request {} has {} items; only the first {} fit on the form",
            record.id,
            record.items.len(),
            capacity
        );
    }
}

pub fn format_number(value: f64, format: NumberFormat) -> String {
    match format {
        NumberFormat::General => format!("{}", value),
        NumberFormat::TwoDecimals => format!("{:.2}", value),
    }
}

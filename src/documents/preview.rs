//! Screen preview: the form as an HTML table fragment.

use std::fmt::Write;

use super::common::{escape_html, html_lines, warn_on_hidden_items};
use super::layout::{Borders, HAlign, LabelPlacement, LayoutCell, LayoutTemplate, VAlign};
use super::layout::{COLUMN_COUNT, FONT_NAME, ITEM_ROWS, ROW_COUNT};
use super::traits::Renderer;
use super::values::CellValue;
use super::ExportError;
use crate::procurement::model::ProcurementRequest;

const BORDER: &str = "1px solid #000";

/// Renders the live preview shown next to the editor.
pub struct PreviewRenderer<'a> {
    layout: &'a LayoutTemplate,
}

impl<'a> PreviewRenderer<'a> {
    pub fn new(layout: &'a LayoutTemplate) -> Self {
        Self { layout }
    }

    /// The `<table>` element for the record.
    ///
    /// Every template row is emitted, so item rows past the record's items come out as blank
    /// cells rather than being left out.
    pub fn table_markup(&self, record: &ProcurementRequest) -> String {
        let layout = self.layout;
        warn_on_hidden_items(record, ITEM_ROWS);
        let mut html = String::with_capacity(32 * 1024);

        let _ = write!(
            html,
            "<table style=\"width:100%;border-collapse:collapse;table-layout:fixed;color:#000;font-family:'{}',Times,serif\">",
            FONT_NAME
        );
        html.push_str("<colgroup>");
        for width in layout.column_percentages() {
            let _ = write!(html, "<col style=\"width:{:.2}%\"/>", width);
        }
        html.push_str("</colgroup><tbody>");

        for row in 0..ROW_COUNT {
            let height = layout.row_heights()[row as usize];
            let _ = write!(html, "<tr style=\"height:{}pt\">", height);
            for col in 0..COLUMN_COUNT {
                match layout.covering(row, col) {
                    Some(cell) if cell.row == row && cell.col == col => {
                        let value = CellValue::resolve(&cell.content, record);
                        write_cell(&mut html, cell, &value);
                    }
                    Some(_) => {}
                    None => html.push_str("<td></td>"),
                }
            }
            html.push_str("</tr>");
        }

        html.push_str("</tbody></table>");
        html
    }
}

impl Renderer for PreviewRenderer<'_> {
    type Output = String;

    fn render(&self, record: &ProcurementRequest) -> Result<String, ExportError> {
        log::debug!("Rendering preview for request {}", record.id);
        Ok(format!(
            "<div class=\"pr-preview\" style=\"font-family:'{}',Times,serif;font-size:9pt;color:#000\">{}</div>",
            FONT_NAME,
            self.table_markup(record)
        ))
    }
}

fn write_cell(html: &mut String, cell: &LayoutCell, value: &CellValue) {
    html.push_str("<td");
    if cell.row_span > 1 {
        let _ = write!(html, " rowspan=\"{}\"", cell.row_span);
    }
    if cell.col_span > 1 {
        let _ = write!(html, " colspan=\"{}\"", cell.col_span);
    }
    let _ = write!(html, " style=\"{}\">", cell_style(cell));

    match value {
        CellValue::Blank => {}
        CellValue::Labeled {
            label,
            value,
            placement,
        } => {
            html.push_str(&html_lines(label));
            if !value.is_empty() {
                html.push_str(match placement {
                    LabelPlacement::Inline => " ",
                    LabelPlacement::Stacked => "<br/>",
                });
                let _ = write!(
                    html,
                    "<span style=\"font-weight:normal\">{}</span>",
                    escape_html(value)
                );
            }
        }
        other => html.push_str(&html_lines(&other.display())),
    }

    html.push_str("</td>");
}

/// Inline CSS for one cell. Borders are written per edge.
pub(crate) fn cell_style(cell: &LayoutCell) -> String {
    let mut style = String::new();
    style.push_str(&border_style(cell.borders));
    let _ = write!(style, "font-size:{}pt;", cell.font.size);
    if cell.font.bold {
        style.push_str("font-weight:bold;");
    }
    if cell.font.italic {
        style.push_str("font-style:italic;");
    }
    let _ = write!(
        style,
        "text-align:{};vertical-align:{};",
        match cell.h_align {
            HAlign::Left => "left",
            HAlign::Center => "center",
            HAlign::Right => "right",
        },
        match cell.v_align {
            VAlign::Top => "top",
            VAlign::Middle => "middle",
            VAlign::Bottom => "bottom",
        }
    );
    style.push_str("padding:1px 3px;overflow:hidden;");
    if cell.wrap {
        style.push_str("white-space:normal;word-wrap:break-word;");
    } else {
        style.push_str("white-space:nowrap;");
    }
    style
}

fn border_style(borders: Borders) -> String {
    let mut style = String::new();
    for (present, edge) in [
        (borders.top, "top"),
        (borders.bottom, "bottom"),
        (borders.left, "left"),
        (borders.right, "right"),
    ] {
        if present {
            let _ = write!(style, "border-{}:{};", edge, BORDER);
        }
    }
    style
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::procurement::model::LineItem;

    #[test]
    fn test_preview_emits_every_row() {
        let layout = LayoutTemplate::appendix_60();
        let record = ProcurementRequest::new_empty();
        let html = PreviewRenderer::new(&layout).render(&record).unwrap();
        assert_eq!(html.matches("<tr ").count(), ROW_COUNT as usize);
    }

    #[test]
    fn test_preview_escapes_user_text() {
        let layout = LayoutTemplate::appendix_60();
        let mut record = ProcurementRequest::new_empty();
        record.entity_name = "<script>alert(1)</script>".to_string();
        let html = PreviewRenderer::new(&layout).render(&record).unwrap();
        assert!(!html.contains("<script>"));
        assert!(html.contains("&lt;script&gt;"));
    }

    #[test]
    fn test_preview_shows_line_and_grand_totals() {
        let layout = LayoutTemplate::appendix_60();
        let mut record = ProcurementRequest::new_empty();
        let mut item = LineItem::blank();
        item.quantity = "3".into();
        item.unit_cost = "150.5".into();
        record.items = vec![item];

        let html = PreviewRenderer::new(&layout).render(&record).unwrap();
        assert_eq!(html.matches("451.50").count(), 2);
        assert!(html.contains("150.50"));
    }

    #[test]
    fn test_cell_style_writes_each_border_edge() {
        let layout = LayoutTemplate::appendix_60();
        let pr_number = layout.anchored_at(3, 2).unwrap();
        let style = cell_style(pr_number);
        assert!(style.contains("border-top:"));
        assert!(style.contains("border-left:"));
        assert!(style.contains("border-right:"));
        assert!(!style.contains("border-bottom:"));
        assert!(style.contains("font-weight:bold;"));
    }
}

//! Spreadsheet export: one styled worksheet laid out cell for cell like the printed form.
//!
//! Rendering happens in two steps. [`SheetPlan::build`] resolves every template region against
//! the record; the writer then turns the plan into an `.xlsx` workbook. The writer needs the
//! `xlsx` feature. Without it the export fails with [`ExportError::SpreadsheetUnavailable`].

use super::common::{export_filename, warn_on_hidden_items};
use super::layout::{LayoutCell, LayoutTemplate, COLUMN_COUNT, ITEM_ROWS, ROW_COUNT, SHEET_NAME};
use super::traits::Renderer;
use super::values::CellValue;
use super::{ExportError, GeneratedDocument};
use crate::procurement::model::ProcurementRequest;

/// A template region with its resolved value.
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCell {
    pub region: LayoutCell,
    pub value: CellValue,
}

/// Everything the workbook writer needs, with no reference back to the record.
#[derive(Debug, Clone, PartialEq)]
pub struct SheetPlan {
    pub sheet_name: String,
    pub row_heights: Vec<f64>,
    pub column_widths: Vec<f64>,
    pub margin_cm: f64,
    pub cells: Vec<PlannedCell>,
}

impl SheetPlan {
    pub fn build(record: &ProcurementRequest, layout: &LayoutTemplate) -> Self {
        warn_on_hidden_items(record, ITEM_ROWS);
        let cells = layout
            .cells()
            .iter()
            .map(|region| PlannedCell {
                region: region.clone(),
                value: CellValue::resolve(&region.content, record),
            })
            .collect();

        Self {
            sheet_name: SHEET_NAME.to_string(),
            row_heights: layout.row_heights().to_vec(),
            column_widths: layout.column_widths().to_vec(),
            margin_cm: layout.page().margin_cm,
            cells,
        }
    }

    /// The used range in A1 notation.
    pub fn range_ref(&self) -> String {
        let last_col = (b'A' + (COLUMN_COUNT - 1) as u8) as char;
        format!("A1:{}{}", last_col, ROW_COUNT)
    }

    /// Merged regions as (first_row, first_col, last_row, last_col).
    pub fn merges(&self) -> Vec<(u32, u16, u32, u16)> {
        self.cells
            .iter()
            .filter(|c| c.region.is_merged())
            .map(|c| {
                (
                    c.region.row,
                    c.region.col,
                    c.region.last_row(),
                    c.region.last_col(),
                )
            })
            .collect()
    }

    /// The planned cell anchored at (row, col).
    pub fn cell(&self, row: u32, col: u16) -> Option<&PlannedCell> {
        self.cells
            .iter()
            .find(|c| c.region.row == row && c.region.col == col)
    }
}

pub struct SpreadsheetRenderer<'a> {
    layout: &'a LayoutTemplate,
}

impl<'a> SpreadsheetRenderer<'a> {
    pub fn new(layout: &'a LayoutTemplate) -> Self {
        Self { layout }
    }

    pub fn plan(&self, record: &ProcurementRequest) -> SheetPlan {
        SheetPlan::build(record, self.layout)
    }
}

impl Renderer for SpreadsheetRenderer<'_> {
    type Output = GeneratedDocument;

    fn render(&self, record: &ProcurementRequest) -> Result<GeneratedDocument, ExportError> {
        log::debug!("Rendering workbook for request {}", record.id);
        let plan = self.plan(record);
        let bytes = write_workbook(&plan)?;
        Ok(GeneratedDocument::new(
            export_filename(&record.request_number, "xlsx"),
            bytes,
        ))
    }
}

#[cfg(feature = "xlsx")]
fn write_workbook(plan: &SheetPlan) -> Result<Vec<u8>, ExportError> {
    use super::layout::LabelPlacement;
    use rust_xlsxwriter::Workbook;

    const PAPER_A4: u8 = 9;

    let mut workbook = Workbook::new();
    let sheet = workbook.add_worksheet();
    sheet.set_name(&plan.sheet_name)?;
    sheet.set_paper_size(PAPER_A4);
    let margin = plan.margin_cm / 2.54;
    sheet.set_margins(margin, margin, margin, margin, 0.3, 0.3);

    for (col, width) in plan.column_widths.iter().enumerate() {
        sheet.set_column_width(col as u16, *width)?;
    }
    for (row, height) in plan.row_heights.iter().enumerate() {
        sheet.set_row_height(row as u32, *height)?;
    }

    for cell in &plan.cells {
        let region = &cell.region;
        let (row, col) = (region.row, region.col);
        let mut format = xlsx::cell_format(region);
        if let CellValue::Number { format: number, .. } = &cell.value {
            format = format.set_num_format(number.code());
        }

        if region.is_merged() {
            sheet.merge_range(row, col, region.last_row(), region.last_col(), "", &format)?;
        }

        match &cell.value {
            CellValue::Blank => {
                if !region.is_merged() {
                    sheet.write_blank(row, col, &format)?;
                }
            }
            CellValue::Text(text) => {
                sheet.write_string_with_format(row, col, text, &format)?;
            }
            CellValue::Labeled { label, value, .. } if value.is_empty() => {
                sheet.write_string_with_format(row, col, *label, &format)?;
            }
            CellValue::Labeled {
                label,
                value,
                placement,
            } => {
                let caption = match placement {
                    LabelPlacement::Inline => format!("{} ", label),
                    LabelPlacement::Stacked => format!("{}\n", label),
                };
                let caption_font = xlsx::font_format(region, region.font.bold);
                let value_font = xlsx::font_format(region, false);
                let segments = [
                    (&caption_font, caption.as_str()),
                    (&value_font, value.as_str()),
                ];
                sheet.write_rich_string_with_format(row, col, &segments, &format)?;
            }
            CellValue::Number { value, .. } => {
                sheet.write_number_with_format(row, col, *value, &format)?;
            }
        }
    }

    let bytes = workbook.save_to_buffer()?;
    log::info!(
        "Built workbook '{}' ({} bytes, {} merged regions)",
        plan.sheet_name,
        bytes.len(),
        plan.merges().len()
    );
    Ok(bytes)
}

#[cfg(not(feature = "xlsx"))]
fn write_workbook(_plan: &SheetPlan) -> Result<Vec<u8>, ExportError> {
    log::error!("Spreadsheet export requested but the xlsx writer is not compiled in");
    Err(ExportError::SpreadsheetUnavailable)
}

#[cfg(feature = "xlsx")]
mod xlsx {
    use rust_xlsxwriter::{Format, FormatAlign, FormatBorder};

    use crate::documents::layout::{HAlign, LayoutCell, VAlign, FONT_NAME};

    /// Font-only format, used for the segments of a rich string.
    pub(super) fn font_format(region: &LayoutCell, bold: bool) -> Format {
        let mut format = Format::new()
            .set_font_name(FONT_NAME)
            .set_font_size(region.font.size);
        if bold {
            format = format.set_bold();
        }
        if region.font.italic {
            format = format.set_italic();
        }
        format
    }

    pub(super) fn cell_format(region: &LayoutCell) -> Format {
        let mut format = font_format(region, region.font.bold)
            .set_align(match region.h_align {
                HAlign::Left => FormatAlign::Left,
                HAlign::Center => FormatAlign::Center,
                HAlign::Right => FormatAlign::Right,
            })
            .set_align(match region.v_align {
                VAlign::Top => FormatAlign::Top,
                VAlign::Middle => FormatAlign::VerticalCenter,
                VAlign::Bottom => FormatAlign::Bottom,
            });
        if region.wrap {
            format = format.set_text_wrap();
        }

        let borders = region.borders;
        if borders.top {
            format = format.set_border_top(FormatBorder::Thin);
        }
        if borders.bottom {
            format = format.set_border_bottom(FormatBorder::Thin);
        }
        if borders.left {
            format = format.set_border_left(FormatBorder::Thin);
        }
        if borders.right {
            format = format.set_border_right(FormatBorder::Thin);
        }
        format
    }
}

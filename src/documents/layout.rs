//! The Appendix 60 "Purchase Request" form as data.
//!
//! Every renderer walks the same [`LayoutTemplate`]: row heights, column widths, merged regions,
//! border edges, fonts and bindings are defined here once and nowhere else.

use crate::procurement::model::{HeaderField, ItemColumn};

pub const ROW_COUNT: u32 = 42;
pub const COLUMN_COUNT: u16 = 6;
pub const ITEM_ROWS: usize = 30;
pub const FIRST_ITEM_ROW: u32 = 6;
pub const FONT_NAME: &str = "Times New Roman";
pub const SHEET_NAME: &str = "Table 1";

const HEADER_ROW_HEIGHTS: [f64; 6] = [27.0, 34.0, 21.0, 14.0, 15.0, 22.5];
const ITEM_ROW_HEIGHT: f64 = 16.0;
const FOOTER_ROW_HEIGHTS: [f64; 6] = [17.0, 30.0, 12.0, 12.0, 12.0, 14.75];

/// Stock/property number, unit, description, quantity, unit cost, total cost.
const COLUMN_WIDTHS: [f64; 6] = [12.67, 8.0, 45.33, 10.0, 15.11, 16.22];

const ITEM_HEADERS: [&str; 6] = [
    "Stock/\nProperty No.",
    "Unit",
    "Item Description",
    "Quantity",
    "Unit Cost",
    "Total Cost",
];

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Borders {
    pub top: bool,
    pub bottom: bool,
    pub left: bool,
    pub right: bool,
}

impl Borders {
    pub const NONE: Borders = Borders::new(false, false, false, false);
    pub const ALL: Borders = Borders::new(true, true, true, true);
    pub const TOP: Borders = Borders::new(true, false, false, false);
    pub const BOTTOM: Borders = Borders::new(false, true, false, false);
    pub const LEFT: Borders = Borders::new(false, false, true, false);
    pub const RIGHT: Borders = Borders::new(false, false, false, true);

    pub const fn new(top: bool, bottom: bool, left: bool, right: bool) -> Self {
        Self {
            top,
            bottom,
            left,
            right,
        }
    }

    pub const fn with(self, other: Borders) -> Self {
        Self {
            top: self.top || other.top,
            bottom: self.bottom || other.bottom,
            left: self.left || other.left,
            right: self.right || other.right,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAlign {
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAlign {
    Top,
    Middle,
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Font {
    pub size: f64,
    pub bold: bool,
    pub italic: bool,
}

/// Where a field's caption sits relative to its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelPlacement {
    /// `Caption: value` on one line.
    Inline,
    /// Caption on the first line, value below it.
    Stacked,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ItemBinding {
    Column(ItemColumn),
    LineTotal,
}

#[derive(Debug, Clone, PartialEq)]
pub enum CellContent {
    Empty,
    Label(&'static str),
    /// A request field. The caption uses the cell's font; the value is never bold.
    Field {
        label: Option<&'static str>,
        field: HeaderField,
        placement: LabelPlacement,
    },
    /// A column of the item at `index` in the padded item grid.
    Item { index: usize, binding: ItemBinding },
    GrandTotal,
}

/// One anchored region of the form.
#[derive(Debug, Clone, PartialEq)]
pub struct LayoutCell {
    pub row: u32,
    pub col: u16,
    pub row_span: u32,
    pub col_span: u16,
    pub borders: Borders,
    pub font: Font,
    pub h_align: HAlign,
    pub v_align: VAlign,
    pub wrap: bool,
    pub content: CellContent,
}

impl LayoutCell {
    fn at(row: u32, col: u16) -> Self {
        Self {
            row,
            col,
            row_span: 1,
            col_span: 1,
            borders: Borders::NONE,
            font: Font {
                size: 8.0,
                bold: false,
                italic: false,
            },
            h_align: HAlign::Left,
            v_align: VAlign::Middle,
            wrap: false,
            content: CellContent::Empty,
        }
    }

    fn span(mut self, rows: u32, cols: u16) -> Self {
        self.row_span = rows;
        self.col_span = cols;
        self
    }

    fn borders(mut self, borders: Borders) -> Self {
        self.borders = borders;
        self
    }

    fn size(mut self, size: f64) -> Self {
        self.font.size = size;
        self
    }

    fn bold(mut self) -> Self {
        self.font.bold = true;
        self
    }

    fn italic(mut self) -> Self {
        self.font.italic = true;
        self
    }

    fn align(mut self, h_align: HAlign, v_align: VAlign) -> Self {
        self.h_align = h_align;
        self.v_align = v_align;
        self
    }

    fn wrap(mut self) -> Self {
        self.wrap = true;
        self
    }

    fn label(mut self, text: &'static str) -> Self {
        self.content = CellContent::Label(text);
        self
    }

    fn field(mut self, label: &'static str, field: HeaderField) -> Self {
        self.content = CellContent::Field {
            label: Some(label),
            field,
            placement: LabelPlacement::Inline,
        };
        self
    }

    fn stacked(mut self, label: &'static str, field: HeaderField) -> Self {
        self.content = CellContent::Field {
            label: Some(label),
            field,
            placement: LabelPlacement::Stacked,
        };
        self.v_align = VAlign::Top;
        self.wrap = true;
        self
    }

    fn value(mut self, field: HeaderField) -> Self {
        self.content = CellContent::Field {
            label: None,
            field,
            placement: LabelPlacement::Inline,
        };
        self
    }

    fn content(mut self, content: CellContent) -> Self {
        self.content = content;
        self
    }

    pub fn last_row(&self) -> u32 {
        self.row + self.row_span - 1
    }

    pub fn last_col(&self) -> u16 {
        self.col + self.col_span - 1
    }

    pub fn is_merged(&self) -> bool {
        self.row_span > 1 || self.col_span > 1
    }

    pub fn covers(&self, row: u32, col: u16) -> bool {
        (self.row..=self.last_row()).contains(&row) && (self.col..=self.last_col()).contains(&col)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PageSetup {
    /// CSS `@page` size keyword.
    pub size: &'static str,
    pub margin_cm: f64,
}

#[derive(Debug, Clone)]
pub struct LayoutTemplate {
    row_heights: Vec<f64>,
    column_widths: [f64; COLUMN_COUNT as usize],
    cells: Vec<LayoutCell>,
    page: PageSetup,
}

impl LayoutTemplate {
    pub fn appendix_60() -> Self {
        let row_heights = HEADER_ROW_HEIGHTS
            .iter()
            .copied()
            .chain(std::iter::repeat(ITEM_ROW_HEIGHT).take(ITEM_ROWS))
            .chain(FOOTER_ROW_HEIGHTS.iter().copied())
            .collect();

        let mut cells = header_block();
        cells.extend(item_grid());
        cells.extend(purpose_block());
        cells.extend(signature_block());

        Self {
            row_heights,
            column_widths: COLUMN_WIDTHS,
            cells,
            page: PageSetup {
                size: "A4",
                margin_cm: 1.5,
            },
        }
    }

    pub fn row_heights(&self) -> &[f64] {
        &self.row_heights
    }

    pub fn column_widths(&self) -> &[f64] {
        &self.column_widths
    }

    /// Column widths as percentages of the full table width.
    pub fn column_percentages(&self) -> Vec<f64> {
        let total: f64 = self.column_widths.iter().sum();
        self.column_widths.iter().map(|w| w / total * 100.0).collect()
    }

    pub fn cells(&self) -> &[LayoutCell] {
        &self.cells
    }

    pub fn page(&self) -> &PageSetup {
        &self.page
    }

    /// The region anchored exactly at (row, col).
    pub fn anchored_at(&self, row: u32, col: u16) -> Option<&LayoutCell> {
        self.cells.iter().find(|c| c.row == row && c.col == col)
    }

    /// The region covering (row, col), whether anchored there or spanning over it.
    pub fn covering(&self, row: u32, col: u16) -> Option<&LayoutCell> {
        self.cells.iter().find(|c| c.covers(row, col))
    }

    pub fn merged_regions(&self) -> impl Iterator<Item = &LayoutCell> {
        self.cells.iter().filter(|c| c.is_merged())
    }

    /// Distinct item indices bound by the template, in row order.
    pub fn item_indices(&self) -> Vec<usize> {
        let mut indices: Vec<usize> = self
            .cells
            .iter()
            .filter_map(|c| match c.content {
                CellContent::Item { index, .. } => Some(index),
                _ => None,
            })
            .collect();
        indices.dedup();
        indices
    }
}

impl Default for LayoutTemplate {
    fn default() -> Self {
        Self::appendix_60()
    }
}

fn header_block() -> Vec<LayoutCell> {
    let mut cells = vec![
        LayoutCell::at(0, 0)
            .span(1, 6)
            .label("Appendix 60")
            .size(10.0)
            .align(HAlign::Right, VAlign::Bottom),
        LayoutCell::at(1, 0)
            .span(1, 6)
            .label("PURCHASE REQUEST")
            .size(12.0)
            .bold()
            .align(HAlign::Center, VAlign::Middle),
        LayoutCell::at(2, 0)
            .span(1, 2)
            .field("Entity Name:", HeaderField::EntityName)
            .bold()
            .borders(Borders::BOTTOM),
        LayoutCell::at(2, 2).borders(Borders::BOTTOM),
        LayoutCell::at(2, 3)
            .span(1, 3)
            .field("Fund Cluster:", HeaderField::FundCluster)
            .bold()
            .borders(Borders::BOTTOM),
        LayoutCell::at(3, 0)
            .span(2, 2)
            .stacked("Office/Section :", HeaderField::Office)
            .borders(Borders::ALL),
        LayoutCell::at(3, 2)
            .span(1, 2)
            .field("PR No.:", HeaderField::RequestNumber)
            .bold()
            .borders(Borders::TOP.with(Borders::LEFT).with(Borders::RIGHT)),
        LayoutCell::at(3, 4)
            .span(2, 2)
            .stacked("Date:", HeaderField::Date)
            .bold()
            .borders(Borders::ALL),
        LayoutCell::at(4, 2)
            .span(1, 2)
            .field(
                "Responsibility Center Code :",
                HeaderField::ResponsibilityCenterCode,
            )
            .bold()
            .borders(Borders::BOTTOM.with(Borders::LEFT).with(Borders::RIGHT)),
    ];

    for (col, header) in ITEM_HEADERS.iter().enumerate() {
        let mut cell = LayoutCell::at(5, col as u16)
            .label(*header)
            .bold()
            .align(HAlign::Center, VAlign::Middle)
            .borders(Borders::ALL);
        if header.contains('\n') {
            cell = cell.wrap();
        }
        cells.push(cell);
    }

    cells
}

fn item_grid() -> Vec<LayoutCell> {
    let columns = [
        (ItemBinding::Column(ItemColumn::StockOrPropertyNumber), HAlign::Center),
        (ItemBinding::Column(ItemColumn::Unit), HAlign::Center),
        (ItemBinding::Column(ItemColumn::Description), HAlign::Left),
        (ItemBinding::Column(ItemColumn::Quantity), HAlign::Center),
        (ItemBinding::Column(ItemColumn::UnitCost), HAlign::Right),
        (ItemBinding::LineTotal, HAlign::Right),
    ];

    (0..ITEM_ROWS)
        .flat_map(|index| {
            columns
                .iter()
                .enumerate()
                .map(move |(col, (binding, h_align))| {
                    LayoutCell::at(FIRST_ITEM_ROW + index as u32, col as u16)
                        .content(CellContent::Item {
                            index,
                            binding: *binding,
                        })
                        .align(*h_align, VAlign::Middle)
                        .borders(Borders::ALL)
                })
        })
        .collect()
}

fn purpose_block() -> Vec<LayoutCell> {
    let row = FIRST_ITEM_ROW + ITEM_ROWS as u32;
    vec![
        LayoutCell::at(row, 0)
            .span(1, 6)
            .field("Purpose:", HeaderField::Purpose)
            .bold()
            .size(8.5)
            .borders(Borders::TOP.with(Borders::LEFT).with(Borders::RIGHT)),
        LayoutCell::at(row + 1, 0)
            .span(1, 4)
            .borders(Borders::BOTTOM.with(Borders::LEFT)),
        LayoutCell::at(row + 1, 4)
            .label("Grand Total:")
            .bold()
            .size(8.5)
            .align(HAlign::Right, VAlign::Middle)
            .borders(Borders::BOTTOM),
        LayoutCell::at(row + 1, 5)
            .content(CellContent::GrandTotal)
            .bold()
            .size(8.5)
            .align(HAlign::Right, VAlign::Middle)
            .borders(Borders::BOTTOM.with(Borders::RIGHT)),
    ]
}

fn signature_block() -> Vec<LayoutCell> {
    let row = FIRST_ITEM_ROW + ITEM_ROWS as u32 + 2;
    vec![
        LayoutCell::at(row, 0).borders(Borders::TOP.with(Borders::LEFT)),
        LayoutCell::at(row, 1)
            .span(1, 2)
            .label("Requested by:")
            .italic()
            .size(8.5)
            .borders(Borders::TOP),
        LayoutCell::at(row, 3)
            .span(1, 2)
            .label("Approved by:")
            .italic()
            .size(8.5)
            .borders(Borders::TOP),
        LayoutCell::at(row, 5).borders(Borders::TOP.with(Borders::RIGHT)),
        LayoutCell::at(row + 1, 0)
            .span(1, 2)
            .label("Signature :")
            .size(8.5)
            .borders(Borders::LEFT),
        LayoutCell::at(row + 1, 5).borders(Borders::RIGHT),
        LayoutCell::at(row + 2, 0)
            .span(1, 2)
            .label("Printed Name :")
            .size(8.5)
            .borders(Borders::LEFT),
        LayoutCell::at(row + 2, 2)
            .value(HeaderField::RequestedByName)
            .size(8.5),
        LayoutCell::at(row + 2, 3)
            .span(1, 2)
            .value(HeaderField::ApprovedByName)
            .size(8.5),
        LayoutCell::at(row + 2, 5).borders(Borders::RIGHT),
        LayoutCell::at(row + 3, 0)
            .span(1, 2)
            .label("Designation :")
            .size(8.5)
            .borders(Borders::BOTTOM.with(Borders::LEFT)),
        LayoutCell::at(row + 3, 2)
            .value(HeaderField::RequestedByDesignation)
            .size(8.5)
            .borders(Borders::BOTTOM),
        LayoutCell::at(row + 3, 3)
            .span(1, 2)
            .value(HeaderField::ApprovedByDesignation)
            .size(8.5)
            .borders(Borders::BOTTOM),
        LayoutCell::at(row + 3, 5).borders(Borders::BOTTOM.with(Borders::RIGHT)),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_row_heights_cover_every_row() {
        let layout = LayoutTemplate::appendix_60();
        assert_eq!(layout.row_heights().len(), ROW_COUNT as usize);
        assert_eq!(layout.row_heights()[5], 22.5);
        assert_eq!(layout.row_heights()[41], 14.75);
        assert!(layout.row_heights()[6..36].iter().all(|h| *h == ITEM_ROW_HEIGHT));
    }

    #[test]
    fn test_regions_stay_in_bounds() {
        let layout = LayoutTemplate::appendix_60();
        for cell in layout.cells() {
            assert!(cell.last_row() < ROW_COUNT, "{:?} overflows rows", cell);
            assert!(cell.last_col() < COLUMN_COUNT, "{:?} overflows columns", cell);
        }
    }

    #[test]
    fn test_regions_never_overlap() {
        let layout = LayoutTemplate::appendix_60();
        for row in 0..ROW_COUNT {
            for col in 0..COLUMN_COUNT {
                let owners = layout.cells().iter().filter(|c| c.covers(row, col)).count();
                assert!(owners <= 1, "({}, {}) is covered {} times", row, col, owners);
            }
        }
    }

    #[test]
    fn test_item_grid_is_thirty_full_rows() {
        let layout = LayoutTemplate::appendix_60();
        assert_eq!(layout.item_indices(), (0..ITEM_ROWS).collect::<Vec<_>>());

        let item_cells = layout
            .cells()
            .iter()
            .filter(|c| matches!(c.content, CellContent::Item { .. }))
            .count();
        assert_eq!(item_cells, ITEM_ROWS * COLUMN_COUNT as usize);
    }

    #[test]
    fn test_date_block_spans_two_rows_and_columns() {
        let layout = LayoutTemplate::appendix_60();
        let date = layout.anchored_at(3, 4).unwrap();
        assert_eq!((date.row_span, date.col_span), (2, 2));
        assert!(layout.covering(4, 5).is_some_and(|c| c.row == 3 && c.col == 4));
    }

    #[test]
    fn test_purpose_row_spans_all_columns() {
        let layout = LayoutTemplate::appendix_60();
        let purpose = layout.anchored_at(36, 0).unwrap();
        assert_eq!(purpose.col_span, COLUMN_COUNT);
        assert!(matches!(
            purpose.content,
            CellContent::Field {
                field: HeaderField::Purpose,
                ..
            }
        ));
    }

    #[test]
    fn test_column_percentages_sum_to_hundred() {
        let layout = LayoutTemplate::appendix_60();
        let sum: f64 = layout.column_percentages().iter().sum();
        assert!((sum - 100.0).abs() < 1e-9);
    }
}

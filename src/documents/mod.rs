//! Document rendering for purchase requests.
//!
//! Three renderers read the same [`LayoutTemplate`]:
//! - `PreviewRenderer` - HTML markup for live display
//! - `PrintRenderer` - a standalone, self-printing HTML document
//! - `SpreadsheetRenderer` - an `.xlsx` workbook with one styled sheet

pub mod common;
pub mod layout;
pub mod preview;
pub mod print;
pub mod spreadsheet;
pub mod surface;
pub mod traits;
pub mod values;

pub use layout::LayoutTemplate;
pub use preview::PreviewRenderer;
pub use print::{print_or_download, PrintOutcome, PrintRenderer};
pub use spreadsheet::{SheetPlan, SpreadsheetRenderer};
pub use surface::{DesktopSurface, DirectorySurface, PrintSurface, SurfaceError};
pub use traits::Renderer;
pub use values::CellValue;

use thiserror::Error;

/// Errors that can occur while exporting a document.
#[derive(Debug, Error)]
pub enum ExportError {
    #[error("XLSX library not loaded.")]
    SpreadsheetUnavailable,
    #[cfg(feature = "xlsx")]
    #[error("failed to build workbook: {0}")]
    Workbook(#[from] rust_xlsxwriter::XlsxError),
    #[error(transparent)]
    Surface(#[from] SurfaceError),
}

/// A rendered file, ready to be printed, downloaded or served.
#[derive(Debug, Clone)]
pub struct GeneratedDocument {
    pub filename: String,
    pub mime_type: String,
    pub bytes: Vec<u8>,
}

impl GeneratedDocument {
    pub fn new(filename: String, bytes: Vec<u8>) -> Self {
        let mime_type = mime_guess::from_path(&filename)
            .first_or_octet_stream()
            .essence_str()
            .to_string();
        Self {
            filename,
            mime_type,
            bytes,
        }
    }
}

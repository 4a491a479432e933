//! Print export: a standalone HTML document that prints itself when opened.

use serde::Serialize;
use utoipa::ToSchema;

use super::common::{escape_html, export_filename};
use super::layout::{LayoutTemplate, FONT_NAME};
use super::preview::PreviewRenderer;
use super::surface::{PrintSurface, SurfaceError};
use super::traits::Renderer;
use super::{ExportError, GeneratedDocument};
use crate::procurement::model::ProcurementRequest;

const PRINT_DELAY_MS: u32 = 300;

/// What happened to a print export.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, ToSchema)]
#[serde(tag = "outcome", rename_all = "camelCase")]
pub enum PrintOutcome {
    /// The host opened a view of the document, which prints itself on load.
    Opened { filename: String },
    /// The host refused to open a view; the document was offered as a file instead.
    /// `location` is relative to the export directory.
    Downloaded { location: String },
}

pub struct PrintRenderer<'a> {
    layout: &'a LayoutTemplate,
}

impl<'a> PrintRenderer<'a> {
    pub fn new(layout: &'a LayoutTemplate) -> Self {
        Self { layout }
    }

    /// The complete HTML source. It needs no external stylesheet.
    pub fn document_source(&self, record: &ProcurementRequest) -> String {
        let page = self.layout.page();
        let table = PreviewRenderer::new(self.layout).table_markup(record);
        let title = escape_html(&format!("PR_{}", record.request_number.trim()));

        format!(
            r#"<!DOCTYPE html>
<html>
<head>
<meta charset="UTF-8"/>
<title>{title}</title>
<style>
*{{box-sizing:border-box;margin:0;padding:0;}}
body{{font-family:'{font}',Times,serif;font-size:9pt;color:#000;}}
table{{width:100%;border-collapse:collapse;}}
@page{{size:{size};margin:{margin}cm;}}
@media print{{body{{-webkit-print-color-adjust:exact;print-color-adjust:exact;}}}}
</style>
</head>
<body>
{table}
<script>
window.onload=function(){{setTimeout(function(){{window.print();}},{delay});}};
</script>
</body>
</html>
"#,
            title = title,
            font = FONT_NAME,
            size = page.size,
            margin = page.margin_cm,
            table = table,
            delay = PRINT_DELAY_MS,
        )
    }
}

impl Renderer for PrintRenderer<'_> {
    type Output = GeneratedDocument;

    fn render(&self, record: &ProcurementRequest) -> Result<GeneratedDocument, ExportError> {
        log::debug!("Rendering print document for request {}", record.id);
        let filename = export_filename(&record.request_number, "html");
        Ok(GeneratedDocument::new(
            filename,
            self.document_source(record).into_bytes(),
        ))
    }
}

/// Hand a print document to the host, falling back to a download when the view is blocked.
pub fn print_or_download(
    document: &GeneratedDocument,
    surface: &dyn PrintSurface,
) -> Result<PrintOutcome, ExportError> {
    match surface.open_view(document) {
        Ok(()) => {
            log::info!("Opened print view for {}", document.filename);
            Ok(PrintOutcome::Opened {
                filename: document.filename.clone(),
            })
        }
        Err(SurfaceError::Blocked(reason)) => {
            log::info!(
                "Print view blocked ({}), offering {} as a download",
                reason,
                document.filename
            );
            let location = surface.offer_download(document)?;
            Ok(PrintOutcome::Downloaded { location })
        }
        Err(e) => Err(e.into()),
    }
}

//! Common interface of the form renderers.

use super::ExportError;
use crate::procurement::model::ProcurementRequest;

/// A consumer of (record, layout template) producing one rendering of the form.
pub trait Renderer {
    type Output;

    /// Render the record. Renderers hold no state between calls.
    fn render(&self, record: &ProcurementRequest) -> Result<Self::Output, ExportError>;
}

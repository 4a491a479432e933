//! One edit session over a private working copy of a request.

use chrono::Utc;
use thiserror::Error;
use uuid::Uuid;

use super::model::{HeaderField, ItemColumn, LineItem, ProcurementRequest, RequestStatus};
use super::model::UpdateProcurementRequest;
use super::store::{RecordStore, UpsertOutcome};
use super::validation::{validate_required, ValidationErrors};
use crate::documents::{
    print_or_download, ExportError, GeneratedDocument, LayoutTemplate, PrintOutcome,
    PrintRenderer, PrintSurface, Renderer, SpreadsheetRenderer,
};

#[derive(Debug, Error)]
pub enum EditorError {
    #[error("{0}")]
    Validation(#[from] ValidationErrors),
    #[error(transparent)]
    Export(#[from] ExportError),
}

/// Holds the working record. Nothing reaches a store until [`Editor::save`] succeeds.
#[derive(Debug, Clone)]
pub struct Editor {
    working: ProcurementRequest,
}

impl Editor {
    /// Start editing a copy of `existing`, or a fresh request when there is none.
    ///
    /// A record without line items gets one blank item.
    pub fn open(existing: Option<&ProcurementRequest>) -> Self {
        let mut working = match existing {
            Some(record) => record.clone(),
            None => ProcurementRequest::new_empty(),
        };
        if working.items.is_empty() {
            log::debug!("Request {} had no items, adding a blank one", working.id);
            working.items.push(LineItem::blank());
        }
        Self { working }
    }

    pub fn record(&self) -> &ProcurementRequest {
        &self.working
    }

    pub fn set_field(&mut self, field: HeaderField, value: impl Into<String>) {
        self.working.set_field(field, value);
    }

    pub fn set_status(&mut self, status: RequestStatus) {
        self.working.status = status;
    }

    /// Apply every field present in a partial update.
    pub fn apply(&mut self, update: &UpdateProcurementRequest) {
        for (field, value) in update.header_changes() {
            self.working.set_field(field, value);
        }
        if let Some(status) = update.status {
            self.working.status = status;
        }
    }

    pub fn add_item(&mut self) -> Uuid {
        let item = LineItem::blank();
        let id = item.id;
        self.working.items.push(item);
        id
    }

    /// Returns false when no item has `id`.
    pub fn update_item(&mut self, id: Uuid, column: ItemColumn, value: impl Into<String>) -> bool {
        match self.working.items.iter_mut().find(|item| item.id == id) {
            Some(item) => {
                item.set(column, value);
                true
            }
            None => false,
        }
    }

    /// Remove the item with `id`. The last remaining item is never removed.
    pub fn remove_item(&mut self, id: Uuid) -> bool {
        if self.working.items.len() <= 1 {
            return false;
        }
        let before = self.working.items.len();
        self.working.items.retain(|item| item.id != id);
        self.working.items.len() != before
    }

    fn validate(&self) -> Result<(), ValidationErrors> {
        let mut errors = ValidationErrors::new();
        validate_required(
            &self.working.request_number,
            "requestNumber",
            "PR Number",
            &mut errors,
        );
        errors.into_result()
    }

    /// Validate, stamp the save time and upsert into `store`.
    ///
    /// On a validation failure the store is left untouched.
    pub fn save(
        &mut self,
        store: &mut RecordStore,
    ) -> Result<(ProcurementRequest, UpsertOutcome), ValidationErrors> {
        if let Err(errors) = self.validate() {
            log::warn!(
                "Rejected save of request {}: {}",
                self.working.id,
                errors.to_message()
            );
            return Err(errors);
        }

        self.working.saved_at = Utc::now();
        let saved = self.working.clone();
        let outcome = store.upsert(saved.clone());
        log::info!(
            "Saved request {} ({:?}, {} items)",
            saved.request_number,
            outcome,
            saved.items.len()
        );
        Ok((saved, outcome))
    }

    /// Render the print document and hand it to `surface`.
    pub fn print(
        &self,
        layout: &LayoutTemplate,
        surface: &dyn PrintSurface,
    ) -> Result<PrintOutcome, EditorError> {
        self.validate()?;
        let document = PrintRenderer::new(layout).render(&self.working)?;
        Ok(print_or_download(&document, surface)?)
    }

    pub fn export_spreadsheet(
        &self,
        layout: &LayoutTemplate,
    ) -> Result<GeneratedDocument, EditorError> {
        self.validate()?;
        let document = SpreadsheetRenderer::new(layout).render(&self.working)?;
        log::info!("Exported {}", document.filename);
        Ok(document)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::documents::DirectorySurface;

    fn saved_record(store: &mut RecordStore) -> ProcurementRequest {
        let mut editor = Editor::open(None);
        editor.set_field(HeaderField::RequestNumber, "PR-100");
        editor.save(store).unwrap().0
    }

    #[test]
    fn test_open_none_starts_fresh() {
        let editor = Editor::open(None);
        assert_eq!(editor.record().items.len(), 1);
        assert_eq!(editor.record().status, RequestStatus::Pending);
        assert!(editor.record().request_number.is_empty());
    }

    #[test]
    fn test_open_record_without_items_gets_a_blank_item() {
        let mut record = ProcurementRequest::new_empty();
        record.request_number = "PR-101".to_string();
        record.items.clear();

        let mut store = RecordStore::new();
        let (saved, _) = Editor::open(Some(&record)).save(&mut store).unwrap();
        assert_eq!(saved.items.len(), 1);
        assert!(saved.items[0].description.is_empty());
        assert_eq!(store.get(&saved.id).unwrap().items.len(), 1);
    }

    #[test]
    fn test_open_and_save_without_edits_keeps_fields() {
        let mut store = RecordStore::new();
        let original = saved_record(&mut store);

        let mut editor = Editor::open(store.get(&original.id));
        let (resaved, outcome) = editor.save(&mut store).unwrap();

        assert_eq!(outcome, UpsertOutcome::Updated);
        assert!(resaved.saved_at >= original.saved_at);
        let mut expected = original.clone();
        expected.saved_at = resaved.saved_at;
        assert_eq!(resaved, expected);
        assert_eq!(store.len(), 1);
    }

    #[test]
    fn test_working_copy_does_not_alias_store() {
        let mut store = RecordStore::new();
        let original = saved_record(&mut store);

        let mut editor = Editor::open(store.get(&original.id));
        editor.set_field(HeaderField::Purpose, "Office supplies");
        assert_eq!(store.get(&original.id).unwrap().purpose, "");
    }

    #[test]
    fn test_save_rejects_missing_request_number() {
        let mut store = RecordStore::new();
        let mut editor = Editor::open(None);
        editor.set_field(HeaderField::RequestNumber, "   ");

        let err = editor.save(&mut store).unwrap_err();
        assert_eq!(err.errors()[0].field, "requestNumber");
        assert_eq!(err.to_message(), "PR Number is required.");
        assert!(store.is_empty());
    }

    #[test]
    fn test_line_operations() {
        let mut editor = Editor::open(None);
        let first = editor.record().items[0].id;
        let second = editor.add_item();
        assert_eq!(editor.record().items.len(), 2);

        assert!(editor.update_item(second, ItemColumn::Quantity, "4"));
        assert!(!editor.update_item(Uuid::new_v4(), ItemColumn::Unit, "pc"));
        assert_eq!(editor.record().items[1].quantity.value(), 4.0);

        assert!(editor.remove_item(first));
        assert!(!editor.remove_item(second));
        assert!(!editor.remove_item(second));
        assert_eq!(editor.record().items.len(), 1);
        assert_eq!(editor.record().items[0].id, second);
    }

    #[test]
    fn test_apply_partial_update() {
        let mut editor = Editor::open(None);
        let update = UpdateProcurementRequest {
            office: Some("Accounting".to_string()),
            status: Some(RequestStatus::Approved),
            ..Default::default()
        };
        editor.apply(&update);
        assert_eq!(editor.record().office, "Accounting");
        assert_eq!(editor.record().status, RequestStatus::Approved);
        assert_eq!(editor.record().entity_name, "");
    }

    #[test]
    fn test_print_requires_request_number() {
        let dir = tempfile::tempdir().unwrap();
        let surface = DirectorySurface::new(dir.path());
        let layout = LayoutTemplate::appendix_60();
        let editor = Editor::open(None);

        let result = editor.print(&layout, &surface);
        assert!(matches!(result, Err(EditorError::Validation(_))));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_print_falls_back_to_download() {
        let dir = tempfile::tempdir().unwrap();
        let surface = DirectorySurface::new(dir.path());
        let layout = LayoutTemplate::appendix_60();
        let mut editor = Editor::open(None);
        editor.set_field(HeaderField::RequestNumber, "PR-55");

        match editor.print(&layout, &surface).unwrap() {
            PrintOutcome::Downloaded { location } => assert_eq!(location, "PR_PR-55.html"),
            other => panic!("expected a download, got {:?}", other),
        }
    }
}

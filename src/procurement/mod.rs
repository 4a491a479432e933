//! Purchase requests: the record model, derived totals, the saved-record store and the editor.

pub mod editor;
pub mod handlers;
pub mod model;
pub mod store;
pub mod totals;
pub mod validation;

pub use editor::{Editor, EditorError};
pub use model::{LineItem, ProcurementRequest, RequestStatus};
pub use store::{RecordStore, UpsertOutcome};

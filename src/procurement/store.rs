//! In-memory store of saved requests, most recent first.

use uuid::Uuid;

use super::model::{ProcurementRequest, RecordSummary};
use super::totals::summarize;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpsertOutcome {
    Inserted,
    Updated,
}

#[derive(Debug, Default)]
pub struct RecordStore {
    records: Vec<ProcurementRequest>,
}

impl RecordStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the record with the same id where it stands, or put a new one at the front.
    pub fn upsert(&mut self, record: ProcurementRequest) -> UpsertOutcome {
        match self.records.iter().position(|r| r.id == record.id) {
            Some(idx) => {
                self.records[idx] = record;
                UpsertOutcome::Updated
            }
            None => {
                self.records.insert(0, record);
                UpsertOutcome::Inserted
            }
        }
    }

    pub fn get(&self, id: &Uuid) -> Option<&ProcurementRequest> {
        self.records.iter().find(|r| &r.id == id)
    }

    pub fn list(&self) -> &[ProcurementRequest] {
        &self.records
    }

    pub fn summaries(&self) -> Vec<RecordSummary> {
        self.records.iter().map(summarize).collect()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

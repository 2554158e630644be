use std::collections::HashSet;

use serde::Serialize;

use super::student::Student;

/// Load phase of the list view. Stale data is never shown: a re-fetch
/// moves back to `Loading` before anything else happens.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "kind", content = "value", rename_all = "snake_case")]
pub enum ListPhase {
    Loading,
    Ready(Vec<Student>),
    Failed(String),
}

/// The client-held snapshot of the record collection plus the per-row
/// delete marks. Only two writers exist: the fetch-all success handler
/// (full replace) and the delete success handler (single removal).
#[derive(Debug, Clone, Serialize)]
pub struct ListState {
    pub phase: ListPhase,
    deleting: HashSet<String>,
}

impl ListState {
    /// The list view issues a read-all on mount, so it starts loading.
    pub fn new() -> Self {
        Self {
            phase: ListPhase::Loading,
            deleting: HashSet::new(),
        }
    }

    pub fn begin_fetch(&mut self) {
        self.phase = ListPhase::Loading;
        self.deleting.clear();
    }

    /// Full snapshot replace, store order preserved as returned.
    pub fn fetch_ok(&mut self, records: Vec<Student>) {
        self.phase = ListPhase::Ready(records);
    }

    pub fn fetch_err(&mut self, message: String) {
        self.phase = ListPhase::Failed(message);
    }

    /// Mark one row as deleting. Rows that are unknown, or already marked,
    /// are refused; other rows stay interactive.
    pub fn begin_delete(&mut self, id: &str) -> bool {
        let known = matches!(
            &self.phase,
            ListPhase::Ready(records) if records.iter().any(|record| record.id == id)
        );
        if !known || self.deleting.contains(id) {
            return false;
        }
        self.deleting.insert(id.to_string());
        true
    }

    pub fn is_deleting(&self, id: &str) -> bool {
        self.deleting.contains(id)
    }

    /// Remove exactly the deleted record, no re-fetch.
    pub fn delete_ok(&mut self, id: &str) {
        if let ListPhase::Ready(records) = &mut self.phase {
            records.retain(|record| record.id != id);
        }
        self.deleting.remove(id);
    }

    /// A failed delete leaves the snapshot untouched; only the mark clears.
    pub fn delete_err(&mut self, id: &str) {
        self.deleting.remove(id);
    }

    pub fn records(&self) -> Option<&[Student]> {
        match &self.phase {
            ListPhase::Ready(records) => Some(records),
            _ => None,
        }
    }
}

impl Default for ListState {
    fn default() -> Self {
        Self::new()
    }
}

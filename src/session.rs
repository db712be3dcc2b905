//! Session-scoped context for one uploaded workbook.
//!
//! The workbook is read-only after upload; the dataset is read-only after
//! sheet selection. Only the selection state (sheet, filters) mutates, under
//! the store's write lock. Sessions live in memory for the process lifetime.

use crate::dataset::Dataset;
use crate::error::AppError;
use crate::filter::FilterSelection;
use crate::sheet_parser::Workbook;
use std::collections::HashMap;
use std::sync::{Arc, RwLock};
use uuid::Uuid;

pub struct Session {
    pub id: String,
    pub workbook: Workbook,
    pub dataset: Option<Dataset>,
    pub filters: FilterSelection,
}

impl Session {
    fn new(workbook: Workbook) -> Self {
        Self {
            id: format!("sess_{}", Uuid::new_v4().simple()),
            workbook,
            dataset: None,
            filters: FilterSelection::default(),
        }
    }

    /// The ingested dataset; selecting a sheet is a hard precondition for
    /// every downstream stage.
    pub fn dataset(&self) -> Result<&Dataset, AppError> {
        self.dataset.as_ref().ok_or(AppError::SheetNotSelected)
    }

    /// Ingest the named sheet. Switching sheets resets the filter selection,
    /// since its values belong to the previous dataset.
    pub fn select_sheet(&mut self, name: &str) -> Result<&Dataset, AppError> {
        let sheet = self
            .workbook
            .sheet(name)
            .ok_or_else(|| AppError::UnknownSheet(name.to_string()))?;
        let dataset = Dataset::ingest(sheet)?;
        self.filters = FilterSelection::default();
        Ok(self.dataset.insert(dataset))
    }
}

/// In-memory session store shared across handlers.
#[derive(Clone, Default)]
pub struct SessionStore {
    inner: Arc<RwLock<HashMap<String, Session>>>,
}

impl SessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a session for a freshly parsed workbook; returns its id.
    pub fn create(&self, workbook: Workbook) -> String {
        let session = Session::new(workbook);
        let id = session.id.clone();
        self.inner.write().unwrap().insert(id.clone(), session);
        tracing::info!("Created session {}", id);
        id
    }

    /// Run `f` with read access to a session.
    pub fn with<R>(
        &self,
        id: &str,
        f: impl FnOnce(&Session) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let sessions = self.inner.read().unwrap();
        let session = sessions
            .get(id)
            .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;
        f(session)
    }

    /// Run `f` with write access to a session.
    pub fn with_mut<R>(
        &self,
        id: &str,
        f: impl FnOnce(&mut Session) -> Result<R, AppError>,
    ) -> Result<R, AppError> {
        let mut sessions = self.inner.write().unwrap();
        let session = sessions
            .get_mut(id)
            .ok_or_else(|| AppError::SessionNotFound(id.to_string()))?;
        f(session)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dataset::columns;
    use crate::sheet_parser::RawSheet;

    fn workbook() -> Workbook {
        let headers: Vec<String> = columns::ALL.iter().map(|s| s.to_string()).collect();
        let mut row = vec![String::new(); headers.len()];
        row[0] = "Alice".to_string();
        Workbook {
            source_file: "test.xlsx".to_string(),
            sheets: vec![RawSheet {
                name: "Q3".to_string(),
                headers,
                rows: vec![row],
            }],
        }
    }

    #[test]
    fn test_session_lifecycle() {
        let store = SessionStore::new();
        let id = store.create(workbook());
        assert!(id.starts_with("sess_"));

        // Dataset access before sheet selection halts.
        let err = store.with(&id, |s| s.dataset().map(|d| d.len()));
        assert!(matches!(err, Err(AppError::SheetNotSelected)));

        let rows = store
            .with_mut(&id, |s| s.select_sheet("Q3").map(|d| d.len()))
            .unwrap();
        assert_eq!(rows, 1);

        let rows = store.with(&id, |s| s.dataset().map(|d| d.len())).unwrap();
        assert_eq!(rows, 1);
    }

    #[test]
    fn test_unknown_sheet_and_session() {
        let store = SessionStore::new();
        let id = store.create(workbook());

        let err = store.with_mut(&id, |s| s.select_sheet("Nope").map(|_| ()));
        assert!(matches!(err, Err(AppError::UnknownSheet(_))));

        let err = store.with("sess_missing", |_| Ok(()));
        assert!(matches!(err, Err(AppError::SessionNotFound(_))));
    }

    #[test]
    fn test_switching_sheets_resets_filters() {
        let store = SessionStore::new();
        let id = store.create(workbook());

        store
            .with_mut(&id, |s| {
                s.select_sheet("Q3")?;
                s.filters.business_group = Some("Tech".to_string());
                s.select_sheet("Q3")?;
                assert!(s.filters.is_empty());
                Ok(())
            })
            .unwrap();
    }
}

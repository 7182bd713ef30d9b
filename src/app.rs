use camino::Utf8PathBuf;
use serde::Serialize;

use crate::catalog::{Aggregator, CategorySummary, UpdateResult, parse_category_summaries, today};
use crate::error::CatalogError;
use crate::record::RecordEntry;
use crate::search::{SearchCriteria, filter};
use crate::store::{LoadFailure, Store};
use crate::validate::{ValidationSummary, validate_store};

#[derive(Debug, Clone, Serialize)]
pub struct SearchResult {
    pub criteria: SearchCriteria,
    /// Records loaded before filtering.
    pub total_loaded: usize,
    pub matches: Vec<RecordEntry>,
    pub skipped: Vec<LoadFailure>,
}

#[derive(Debug, Clone, Serialize)]
pub struct CategoryListResult {
    pub catalog_path: Utf8PathBuf,
    pub categories: Vec<CategorySummary>,
}

#[derive(Debug, Clone)]
pub struct ProgressEvent {
    pub message: String,
}

impl ProgressEvent {
    pub fn new(message: impl Into<String>) -> Self {
        Self {
            message: message.into(),
        }
    }
}

pub trait ProgressSink {
    fn event(&self, event: ProgressEvent);
}

/// The three catalog tools over one databases root.
#[derive(Debug, Clone)]
pub struct App {
    store: Store,
    catalog_version: String,
}

impl App {
    pub fn new(store: Store, catalog_version: impl Into<String>) -> Self {
        Self {
            store,
            catalog_version: catalog_version.into(),
        }
    }

    pub fn store(&self) -> &Store {
        &self.store
    }

    pub fn search(
        &self,
        criteria: SearchCriteria,
        sink: &dyn ProgressSink,
    ) -> Result<SearchResult, CatalogError> {
        let report = self.store.load_records()?;
        for failure in &report.failures {
            sink.event(ProgressEvent::new(format!(
                "Warning: Could not load {}: {}",
                failure.path, failure.message
            )));
        }
        let total_loaded = report.records.len();
        let matches = filter(&report.records, &criteria)
            .into_iter()
            .cloned()
            .collect();
        Ok(SearchResult {
            criteria,
            total_loaded,
            matches,
            skipped: report.failures,
        })
    }

    /// Category metadata from the catalog file alone; records are not read.
    pub fn list_categories(&self) -> Result<CategoryListResult, CatalogError> {
        let text = self.store.read_catalog_text()?;
        Ok(CategoryListResult {
            catalog_path: self.store.catalog_path().to_path_buf(),
            categories: parse_category_summaries(&text)?,
        })
    }

    pub fn update_catalog(&self, sink: &dyn ProgressSink) -> Result<UpdateResult, CatalogError> {
        self.update_catalog_dated(&today(), sink)
    }

    pub fn update_catalog_dated(
        &self,
        last_updated: &str,
        sink: &dyn ProgressSink,
    ) -> Result<UpdateResult, CatalogError> {
        Aggregator::new(&self.store, self.catalog_version.clone()).run(last_updated, sink)
    }

    pub fn validate(&self, sink: &dyn ProgressSink) -> Result<ValidationSummary, CatalogError> {
        self.store.ensure_root()?;
        validate_store(&self.store, sink)
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;

    use super::*;

    #[derive(Default)]
    struct Recorder {
        messages: RefCell<Vec<String>>,
    }

    impl ProgressSink for Recorder {
        fn event(&self, event: ProgressEvent) {
            self.messages.borrow_mut().push(event.message);
        }
    }

    #[test]
    fn search_reports_unparseable_files() {
        let temp = tempfile::tempdir().unwrap();
        let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
        std::fs::create_dir_all(root.join("genomics")).unwrap();
        std::fs::write(root.join("genomics/ok.json"), br#"{"name": "Ensembl"}"#).unwrap();
        std::fs::write(root.join("genomics/bad.json"), b"{ nope").unwrap();

        let app = App::new(Store::new(root), "1.0.0");
        let sink = Recorder::default();
        let result = app.search(SearchCriteria::default(), &sink).unwrap();

        assert_eq!(result.total_loaded, 1);
        assert_eq!(result.skipped.len(), 1);
        let messages = sink.messages.borrow();
        assert_eq!(messages.len(), 1);
        assert!(messages[0].starts_with("Warning: Could not load"));
        assert!(messages[0].contains("bad.json"));
    }
}

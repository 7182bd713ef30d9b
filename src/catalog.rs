use std::collections::BTreeMap;

use camino::Utf8PathBuf;
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use tracing::{debug, info, warn};

use crate::app::{ProgressEvent, ProgressSink};
use crate::domain::{default_category_description, default_category_name, title_case};
use crate::error::CatalogError;
use crate::record::{CATALOG_FIELDS, RecordEntry};
use crate::store::{FailureKind, LoadFailure, Store};

pub const CATALOG_VERSION: &str = "1.0.0";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Catalog {
    pub version: String,
    pub last_updated: String,
    pub total_databases: usize,
    pub categories: BTreeMap<String, CatalogCategory>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogCategory {
    pub name: String,
    pub description: String,
    pub count: usize,
    pub databases: Vec<Map<String, Value>>,
}

/// The part of a category that survives a rebuild.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategoryMeta {
    pub name: String,
    pub description: String,
}

/// One category as listed in an existing catalog file.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CategorySummary {
    pub id: String,
    pub name: String,
    pub description: String,
    pub count: Option<u64>,
}

/// Categories of a catalog document, in file order. A missing `name`
/// falls back to the title-cased id and a missing `description` to "".
/// Malformed category entries are skipped; the rest are kept.
pub fn parse_category_summaries(text: &str) -> Result<Vec<CategorySummary>, CatalogError> {
    let document: Value =
        serde_json::from_str(text).map_err(|err| CatalogError::CatalogParse(err.to_string()))?;
    let Value::Object(document) = document else {
        return Err(CatalogError::CatalogParse(
            "catalog must be a JSON object".to_string(),
        ));
    };
    let categories = match document.get("categories") {
        None => return Ok(Vec::new()),
        Some(Value::Object(categories)) => categories,
        Some(_) => {
            return Err(CatalogError::CatalogParse(
                "`categories` must be an object".to_string(),
            ));
        }
    };

    Ok(categories
        .iter()
        .filter_map(|(id, info)| match category_summary(id, info) {
            Ok(summary) => Some(summary),
            Err(reason) => {
                warn!(category = %id, reason, "ignoring malformed catalog category");
                None
            }
        })
        .collect())
}

fn category_summary(id: &str, info: &Value) -> Result<CategorySummary, &'static str> {
    let Value::Object(info) = info else {
        return Err("not an object");
    };
    let name = match info.get("name") {
        None => title_case(id),
        Some(Value::String(name)) => name.clone(),
        Some(_) => return Err("non-string name"),
    };
    let description = match info.get("description") {
        None => String::new(),
        Some(Value::String(description)) => description.clone(),
        Some(_) => return Err("non-string description"),
    };
    Ok(CategorySummary {
        id: id.to_string(),
        name,
        description,
        count: info.get("count").and_then(Value::as_u64),
    })
}

pub fn preserved_metadata(text: &str) -> Result<BTreeMap<String, CategoryMeta>, CatalogError> {
    Ok(parse_category_summaries(text)?
        .into_iter()
        .map(|summary| {
            (
                summary.id,
                CategoryMeta {
                    name: summary.name,
                    description: summary.description,
                },
            )
        })
        .collect())
}

/// Builds the catalog from scanned records. Every key of `scanned` becomes
/// a category, empty ones included.
pub fn build_catalog(
    scanned: BTreeMap<String, Vec<RecordEntry>>,
    previous: &BTreeMap<String, CategoryMeta>,
    version: &str,
    last_updated: &str,
) -> Catalog {
    let mut categories = BTreeMap::new();
    let mut total_databases = 0;

    for (id, mut entries) in scanned {
        entries.sort_by_key(|entry| entry.record.name().to_lowercase());
        let meta = previous.get(&id).cloned().unwrap_or_else(|| CategoryMeta {
            name: default_category_name(&id),
            description: default_category_description(&id),
        });
        total_databases += entries.len();
        categories.insert(
            id,
            CatalogCategory {
                name: meta.name,
                description: meta.description,
                count: entries.len(),
                databases: entries.into_iter().map(|entry| entry.document).collect(),
            },
        );
    }

    Catalog {
        version: version.to_string(),
        last_updated: last_updated.to_string(),
        total_databases,
        categories,
    }
}

pub fn render_catalog(catalog: &Catalog) -> Result<Vec<u8>, CatalogError> {
    serde_json::to_vec_pretty(catalog)
        .map_err(|err| CatalogError::CatalogSerialize(err.to_string()))
}

pub fn today() -> String {
    chrono::Local::now().format("%Y-%m-%d").to_string()
}

#[derive(Debug, Clone, Serialize)]
pub struct UpdateResult {
    pub catalog_path: Utf8PathBuf,
    pub version: String,
    pub last_updated: String,
    pub total_databases: usize,
    pub categories: BTreeMap<String, usize>,
    pub skipped: Vec<LoadFailure>,
    pub previous_catalog_error: Option<String>,
}

/// Rebuilds and rewrites the catalog file of `store`.
pub struct Aggregator<'a> {
    store: &'a Store,
    version: String,
}

impl<'a> Aggregator<'a> {
    pub fn new(store: &'a Store, version: impl Into<String>) -> Self {
        Self {
            store,
            version: version.into(),
        }
    }

    pub fn run(
        &self,
        last_updated: &str,
        sink: &dyn ProgressSink,
    ) -> Result<UpdateResult, CatalogError> {
        self.store.ensure_root()?;
        sink.event(ProgressEvent::new("Scanning database files..."));

        let (previous, previous_catalog_error) = self.previous_metadata(sink);

        let mut scanned = BTreeMap::new();
        let mut skipped = Vec::new();
        for category in self.store.category_dirs()? {
            let report = self.store.load_category(&category);
            for failure in report.failures {
                sink.event(ProgressEvent::new(format!("Error: {failure}")));
                skipped.push(failure);
            }
            let mut kept = Vec::with_capacity(report.records.len());
            for entry in report.records {
                let missing = entry.missing_fields(&CATALOG_FIELDS);
                if missing.is_empty() {
                    kept.push(entry);
                    continue;
                }
                let failure = LoadFailure {
                    path: self.store.record_path(&entry.location),
                    kind: FailureKind::Incomplete,
                    message: format!("[{}]", missing.join(", ")),
                };
                debug!(
                    path = %failure.path,
                    missing = %failure.message,
                    "record left out of catalog"
                );
                sink.event(ProgressEvent::new(format!("Warning: {failure}")));
                skipped.push(failure);
            }
            scanned.insert(category, kept);
        }

        let catalog = build_catalog(scanned, &previous, &self.version, last_updated);
        for (id, category) in &catalog.categories {
            sink.event(ProgressEvent::new(format!(
                "  {id}: {} database(s)",
                category.count
            )));
        }

        sink.event(ProgressEvent::new(format!(
            "Writing catalog to {}...",
            self.store.catalog_path()
        )));
        let bytes = render_catalog(&catalog)?;
        self.store.write_catalog_atomic(&bytes)?;
        info!(
            total = catalog.total_databases,
            categories = catalog.categories.len(),
            "catalog written"
        );

        Ok(UpdateResult {
            catalog_path: self.store.catalog_path().to_path_buf(),
            version: catalog.version,
            last_updated: catalog.last_updated,
            total_databases: catalog.total_databases,
            categories: catalog
                .categories
                .iter()
                .map(|(id, category)| (id.clone(), category.count))
                .collect(),
            skipped,
            previous_catalog_error,
        })
    }

    fn previous_metadata(
        &self,
        sink: &dyn ProgressSink,
    ) -> (BTreeMap<String, CategoryMeta>, Option<String>) {
        if !self.store.catalog_exists() {
            return (BTreeMap::new(), None);
        }
        let parsed = self
            .store
            .read_catalog_text()
            .and_then(|text| preserved_metadata(&text));
        match parsed {
            Ok(previous) => (previous, None),
            Err(err) => {
                debug!(error = %err, "existing catalog ignored");
                sink.event(ProgressEvent::new(format!(
                    "Warning: Could not load existing catalog: {err}"
                )));
                (BTreeMap::new(), Some(err.to_string()))
            }
        }
    }
}

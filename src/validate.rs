use camino::Utf8PathBuf;
use serde::Serialize;
use tracing::debug;
use url::Url;

use crate::app::{ProgressEvent, ProgressSink};
use crate::domain::Category;
use crate::error::CatalogError;
use crate::record::{Field, RecordEntry, is_blank};
use crate::store::{FailureKind, Store};

pub const DESCRIPTION_MIN_CHARS: usize = 50;
pub const DESCRIPTION_MAX_CHARS: usize = 1000;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Error,
    Warning,
}

/// Errors and warnings for one record, in rule order.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Findings {
    pub errors: Vec<String>,
    pub warnings: Vec<String>,
}

impl Findings {
    fn push(&mut self, severity: Severity, message: impl Into<String>) {
        match severity {
            Severity::Error => self.errors.push(message.into()),
            Severity::Warning => self.warnings.push(message.into()),
        }
    }

    pub fn is_clean(&self) -> bool {
        self.errors.is_empty() && self.warnings.is_empty()
    }
}

trait Blank {
    fn is_blank(&self) -> bool;
}

impl Blank for String {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

impl Blank for Vec<String> {
    fn is_blank(&self) -> bool {
        self.is_empty()
    }
}

enum Presence {
    Missing,
    Empty,
    Filled,
}

fn presence<T: Blank>(field: &Field<T>) -> Presence {
    match field {
        Field::Missing => Presence::Missing,
        Field::Value(value) if value.is_blank() => Presence::Empty,
        Field::Malformed(raw) if is_blank(raw) => Presence::Empty,
        _ => Presence::Filled,
    }
}

/// `Ok` when `value` is an absolute URL with a scheme, `//` and a host.
pub fn validate_url(value: &str) -> Result<(), String> {
    let has_authority = value
        .split_once(':')
        .is_some_and(|(_, rest)| rest.starts_with("//"));
    match Url::parse(value) {
        Ok(url)
            if has_authority
                && !url.scheme().is_empty()
                && url.host_str().is_some_and(|h| !h.is_empty()) =>
        {
            Ok(())
        }
        _ => Err("Invalid URL format".to_string()),
    }
}

fn check_url(field: &Field<String>) -> Option<String> {
    match field {
        Field::Missing => None,
        Field::Value(value) => validate_url(value).err(),
        Field::Malformed(_) => Some("URL validation error: expected a string".to_string()),
    }
}

fn render(field: &Field<String>) -> String {
    match field {
        Field::Value(value) => value.clone(),
        Field::Malformed(raw) => raw.to_string(),
        Field::Missing => String::new(),
    }
}

/// Runs every field rule against one parsed record.
pub fn validate_record(entry: &RecordEntry) -> Findings {
    let record = &entry.record;
    let mut findings = Findings::default();

    let required = [
        ("name", presence(&record.name)),
        ("url", presence(&record.url)),
        ("description", presence(&record.description)),
        ("category", presence(&record.category)),
        ("data_types", presence(&record.data_types)),
    ];
    for (field, state) in required {
        match state {
            Presence::Missing => {
                findings.push(Severity::Error, format!("Missing required field: {field}"))
            }
            Presence::Empty => {
                findings.push(Severity::Error, format!("Empty required field: {field}"))
            }
            Presence::Filled => {}
        }
    }

    let recommended = [
        ("abbreviation", record.abbreviation.is_present()),
        ("access", record.access.is_present()),
        ("license", record.license.is_present()),
        ("organism", record.organism.is_present()),
        ("updated", record.updated.is_present()),
        ("documentation", record.documentation.is_present()),
        ("api_docs", record.api_docs.is_present()),
    ];
    for (field, present) in recommended {
        if !present {
            findings.push(
                Severity::Warning,
                format!("Missing recommended field: {field}"),
            );
        }
    }

    if record.category.is_present() {
        let declared = render(&record.category);
        let known = record
            .category
            .value()
            .is_some_and(|value| value.parse::<Category>().is_ok());
        if !known {
            findings.push(Severity::Error, format!("Invalid category: {declared}"));
        }
        let directory = &entry.location.category_dir;
        if *directory != declared {
            findings.push(
                Severity::Warning,
                format!("Category mismatch: file in {directory}/ but category is {declared}"),
            );
        }
    }

    if let Some(message) = check_url(&record.url) {
        findings.push(Severity::Error, format!("Invalid main URL: {message}"));
    }
    if let Some(message) = check_url(&record.documentation) {
        findings.push(
            Severity::Warning,
            format!("Invalid documentation URL: {message}"),
        );
    }
    if let Some(message) = check_url(&record.api_docs) {
        findings.push(Severity::Warning, format!("Invalid API docs URL: {message}"));
    }

    match &record.data_types {
        Field::Value(items) if items.is_empty() => {
            findings.push(Severity::Error, "data_types list is empty")
        }
        Field::Malformed(raw) if !raw.is_array() => {
            findings.push(Severity::Error, "data_types must be a list")
        }
        _ => {}
    }

    if let Field::Malformed(raw) = &record.access {
        if !raw.is_array() {
            findings.push(Severity::Error, "access must be a list");
        }
    }

    if let Field::Value(description) = &record.description {
        let length = description.chars().count();
        if length < DESCRIPTION_MIN_CHARS {
            findings.push(
                Severity::Warning,
                format!("Description is very short (< {DESCRIPTION_MIN_CHARS} characters)"),
            );
        } else if length > DESCRIPTION_MAX_CHARS {
            findings.push(
                Severity::Warning,
                format!("Description is very long (> {DESCRIPTION_MAX_CHARS} characters)"),
            );
        }
    }

    findings
}

/// Findings for one file, with its path relative to the databases root.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FileReport {
    pub path: Utf8PathBuf,
    /// The file could not be read or parsed; no field rules ran.
    pub unreadable: bool,
    #[serde(flatten)]
    pub findings: Findings,
}

#[derive(Debug, Clone, Default, Serialize)]
pub struct ValidationSummary {
    pub total_files: usize,
    pub errors: usize,
    pub warnings: usize,
    /// Files with at least one finding, in visit order.
    pub reports: Vec<FileReport>,
}

impl ValidationSummary {
    pub fn passed(&self) -> bool {
        self.errors == 0
    }

    pub fn exit_code(&self) -> u8 {
        if self.passed() { 0 } else { 1 }
    }

    fn record(&mut self, report: FileReport) {
        self.total_files += 1;
        self.errors += report.findings.errors.len();
        self.warnings += report.findings.warnings.len();
        if !report.findings.is_clean() {
            self.reports.push(report);
        }
    }
}

/// Validates every record file under the store root, sorted by category
/// and file name.
pub fn validate_store(
    store: &Store,
    sink: &dyn ProgressSink,
) -> Result<ValidationSummary, CatalogError> {
    sink.event(ProgressEvent::new("Validating database files..."));
    let mut summary = ValidationSummary::default();

    for category in store.category_dirs()? {
        let locations = match store.record_files(&category) {
            Ok(locations) => locations,
            Err(failure) => {
                summary.errors += 1;
                summary.reports.push(FileReport {
                    path: Utf8PathBuf::from(category.as_str()),
                    unreadable: true,
                    findings: Findings {
                        errors: vec![format!("Error reading directory: {}", failure.message)],
                        warnings: Vec::new(),
                    },
                });
                continue;
            }
        };
        for location in locations {
            let path = location.relative_path();
            let report = match store.read_record(&location) {
                Ok(entry) => FileReport {
                    path,
                    unreadable: false,
                    findings: validate_record(&entry),
                },
                Err(failure) => {
                    let message = match failure.kind {
                        FailureKind::Read => format!("Error reading file: {}", failure.message),
                        _ => format!("Invalid JSON: {}", failure.message),
                    };
                    FileReport {
                        path,
                        unreadable: true,
                        findings: Findings {
                            errors: vec![message],
                            warnings: Vec::new(),
                        },
                    }
                }
            };
            debug!(
                path = %report.path,
                errors = report.findings.errors.len(),
                warnings = report.findings.warnings.len(),
                "validated"
            );
            summary.record(report);
        }
    }

    Ok(summary)
}

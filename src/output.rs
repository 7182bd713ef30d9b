use std::io::{self, Write};

use serde::Serialize;

use crate::app::{CategoryListResult, ProgressEvent, ProgressSink, SearchResult};
use crate::catalog::UpdateResult;
use crate::record::Record;
use crate::validate::{FileReport, ValidationSummary};

#[derive(Debug, Clone, Copy)]
pub enum OutputMode {
    Text,
    Json,
}

const RULE_WIDTH: usize = 70;

fn rule() -> String {
    "=".repeat(RULE_WIDTH)
}

/// Plain terminal output. Progress events go to stdout as they happen.
pub struct TextOutput;

impl TextOutput {
    pub fn print_search(result: &SearchResult, detailed: bool) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "{}", render_search(result, detailed))?;
        Ok(())
    }

    pub fn print_categories(result: &CategoryListResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\nAvailable Categories:")?;
        writeln!(stdout, "{}", rule())?;
        for category in &result.categories {
            writeln!(stdout, "\n{} ({})", category.name, category.id)?;
            writeln!(stdout, "  {}", category.description)?;
        }
        Ok(())
    }

    pub fn print_update(result: &UpdateResult) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        writeln!(stdout, "\nCatalog updated successfully!")?;
        writeln!(stdout, "Total databases: {}", result.total_databases)?;
        writeln!(stdout, "Categories: {}", result.categories.len())?;
        Ok(())
    }

    pub fn print_validation(summary: &ValidationSummary) -> io::Result<()> {
        let mut stdout = io::stdout().lock();
        write!(stdout, "{}", render_validation(summary))?;
        Ok(())
    }
}

impl ProgressSink for TextOutput {
    fn event(&self, event: ProgressEvent) {
        println!("{}", event.message);
    }
}

pub fn render_search(result: &SearchResult, detailed: bool) -> String {
    if result.total_loaded == 0 {
        return "No databases found in the catalog.".to_string();
    }
    if result.matches.is_empty() {
        return "No databases found matching your criteria.".to_string();
    }

    let mut out = format!("\nFound {} database(s):", result.matches.len());
    for entry in &result.matches {
        out.push('\n');
        out.push_str(&render_record(&entry.record, detailed));
    }
    out.push_str(&format!(
        "\n\n{}\nTotal: {} database(s)",
        rule(),
        result.matches.len()
    ));
    out
}

/// One result block. Fields absent from the record are left out.
pub fn render_record(record: &Record, detailed: bool) -> String {
    let mut lines = Vec::new();

    let name = record.name.value().map(String::as_str).unwrap_or("Unknown");
    let abbreviation = record.abbreviation();
    let mut header = format!("\n{}\n", rule());
    if !abbreviation.is_empty() && abbreviation != name {
        header.push_str(&format!("{name} ({abbreviation})\n"));
    } else {
        header.push_str(&format!("{name}\n"));
    }
    header.push_str(&rule());
    lines.push(header);

    if record.url.is_present() {
        lines.push(format!("URL: {}", record.url()));
    }
    let category = record.category.value().map(String::as_str).unwrap_or("Unknown");
    lines.push(format!("Category: {category}"));
    if record.description.is_present() {
        lines.push(format!("\nDescription:\n{}", record.description()));
    }

    if detailed {
        if record.data_types.is_present() {
            lines.push(format!("\nData Types:\n  - {}", record.data_types().join("\n  - ")));
        }
        if record.access.is_present() {
            lines.push(format!("\nAccess: {}", record.access().join(", ")));
        }
        if record.organism.is_present() {
            lines.push(format!("Organisms: {}", record.organism()));
        }
        if record.license.is_present() {
            lines.push(format!("License: {}", record.license()));
        }
        if record.format.is_present() {
            lines.push(format!("Formats: {}", record.formats().join(", ")));
        }
        if record.documentation.is_present() {
            lines.push(format!("\nDocumentation: {}", record.documentation()));
        }
        if record.api_docs.is_present() {
            lines.push(format!("API Documentation: {}", record.api_docs()));
        }
        if record.use_cases.is_present() {
            lines.push(format!("\nUse Cases:\n  - {}", record.use_cases().join("\n  - ")));
        }
    }

    lines.join("\n")
}

fn render_file_report(out: &mut String, report: &FileReport) {
    out.push_str(&format!("{}\n{}\n{}\n", rule(), report.path, rule()));
    if report.unreadable {
        for error in &report.findings.errors {
            out.push_str(&format!("  ❌ {error}\n"));
        }
        out.push('\n');
        return;
    }
    if !report.findings.errors.is_empty() {
        out.push_str("\nERRORS:\n");
        for error in &report.findings.errors {
            out.push_str(&format!("  ❌ {error}\n"));
        }
    }
    if !report.findings.warnings.is_empty() {
        out.push_str("\nWARNINGS:\n");
        for warning in &report.findings.warnings {
            out.push_str(&format!("  ⚠️  {warning}\n"));
        }
    }
    out.push('\n');
}

pub fn render_validation(summary: &ValidationSummary) -> String {
    let mut out = String::new();
    for report in &summary.reports {
        render_file_report(&mut out, report);
    }

    out.push_str(&format!("{}\nVALIDATION SUMMARY\n{}\n", rule(), rule()));
    out.push_str(&format!("Total files: {}\n", summary.total_files));
    out.push_str(&format!("Errors: {}\n", summary.errors));
    out.push_str(&format!("Warnings: {}\n", summary.warnings));

    if summary.errors == 0 && summary.warnings == 0 {
        out.push_str("\n✅ All database files are valid!\n");
    } else if summary.errors == 0 {
        out.push_str(&format!(
            "\n⚠️  Validation completed with {} warning(s)\n",
            summary.warnings
        ));
    } else {
        out.push_str(&format!(
            "\n❌ Validation failed with {} error(s)\n",
            summary.errors
        ));
    }
    out
}

/// Machine-readable output: one pretty JSON document per command.
pub struct JsonOutput;

impl JsonOutput {
    pub fn print_search(result: &SearchResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_categories(result: &CategoryListResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_update(result: &UpdateResult) -> io::Result<()> {
        Self::print_json(result)
    }

    pub fn print_validation(summary: &ValidationSummary) -> io::Result<()> {
        Self::print_json(summary)
    }

    fn print_json<T: Serialize>(value: &T) -> io::Result<()> {
        let json = serde_json::to_string_pretty(value).map_err(io::Error::other)?;
        let mut stdout = io::stdout();
        stdout.write_all(json.as_bytes())?;
        stdout.write_all(b"\n")?;
        Ok(())
    }
}

impl ProgressSink for JsonOutput {
    fn event(&self, _event: ProgressEvent) {}
}

#[cfg(test)]
mod tests {
    use serde_json::{Value, json};

    use super::*;
    use crate::domain::RecordLocation;
    use crate::record::RecordEntry;
    use crate::search::SearchCriteria;

    fn entry(value: Value) -> RecordEntry {
        let Value::Object(map) = value else {
            panic!("fixture must be an object")
        };
        RecordEntry::new(RecordLocation::new("proteomics", "uniprot.json"), map)
    }

    #[test]
    fn header_shows_distinct_abbreviation() {
        let record = entry(json!({
            "name": "Universal Protein Resource",
            "abbreviation": "UniProt",
            "url": "https://www.uniprot.org",
            "category": "proteomics",
        }))
        .record;
        let block = render_record(&record, false);
        assert!(block.contains("Universal Protein Resource (UniProt)\n"));
        assert!(block.contains("URL: https://www.uniprot.org"));
        assert!(block.contains("Category: proteomics"));
        assert!(!block.contains("Description:"));
    }

    #[test]
    fn detailed_block_lists_data_types() {
        let record = entry(json!({
            "name": "UniProt",
            "abbreviation": "UniProt",
            "data_types": ["sequences", "annotations"],
            "access": ["web", "API"],
        }))
        .record;
        let block = render_record(&record, true);
        assert!(block.contains("\nUniProt\n"));
        assert!(block.contains("Data Types:\n  - sequences\n  - annotations"));
        assert!(block.contains("Access: web, API"));
        assert!(block.contains("Category: Unknown"));
    }

    #[test]
    fn empty_results_messages() {
        let empty = SearchResult {
            criteria: SearchCriteria::default(),
            total_loaded: 0,
            matches: Vec::new(),
            skipped: Vec::new(),
        };
        assert_eq!(render_search(&empty, false), "No databases found in the catalog.");

        let no_match = SearchResult {
            total_loaded: 3,
            ..empty
        };
        assert_eq!(
            render_search(&no_match, false),
            "No databases found matching your criteria."
        );
    }

    #[test]
    fn validation_summary_wording() {
        let summary = ValidationSummary {
            total_files: 2,
            errors: 0,
            warnings: 1,
            reports: Vec::new(),
        };
        let text = render_validation(&summary);
        assert!(text.contains("Total files: 2\nErrors: 0\nWarnings: 1\n"));
        assert!(text.contains("Validation completed with 1 warning(s)"));
    }
}

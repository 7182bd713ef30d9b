use serde_json::{Value, json};

use bioawesome_catalog::domain::RecordLocation;
use bioawesome_catalog::record::RecordEntry;
use bioawesome_catalog::search::{SearchCriteria, filter};

fn entry(category: &str, file: &str, value: Value) -> RecordEntry {
    let Value::Object(map) = value else {
        panic!("fixture must be an object")
    };
    RecordEntry::new(RecordLocation::new(category, file), map)
}

fn fixtures() -> Vec<RecordEntry> {
    vec![
        entry(
            "proteomics",
            "uniprot.json",
            json!({
                "name": "UniProt",
                "abbreviation": "UniProtKB",
                "description": "Comprehensive resource of protein sequence and function.",
                "category": "proteomics",
                "subcategories": ["sequences", "Annotation"],
                "data_types": ["Protein sequences", "functional annotation"],
                "organism": "All organisms",
                "access": ["web", "API", "download"],
            }),
        ),
        entry(
            "genomics",
            "gnomad.json",
            json!({
                "name": "gnomAD",
                "description": "Genome Aggregation Database of human variation.",
                "category": "genomics",
                "data_types": ["variants", "allele frequencies"],
                "organism": "Homo sapiens (human)",
                "access": ["web", "download"],
            }),
        ),
        entry(
            "model-organisms",
            "flybase.json",
            json!({
                "name": "FlyBase",
                "description": "Drosophila genes and genomes.",
                "category": "model-organisms",
                "data_types": ["genes", "expression"],
                "organism": "Drosophila melanogaster",
            }),
        ),
    ]
}

fn names(result: &[&RecordEntry]) -> Vec<String> {
    result.iter().map(|e| e.record.name().to_string()).collect()
}

#[test]
fn no_criteria_returns_input_unchanged() {
    let entries = fixtures();
    let result = filter(&entries, &SearchCriteria::default());
    assert_eq!(names(&result), vec!["UniProt", "gnomAD", "FlyBase"]);
}

#[test]
fn keyword_matches_name_description_abbreviation_and_data_types() {
    let entries = fixtures();
    let by = |keyword: &str| {
        let criteria = SearchCriteria {
            keyword: Some(keyword.to_string()),
            ..SearchCriteria::default()
        };
        names(&filter(&entries, &criteria))
    };
    assert_eq!(by("PROTEIN"), vec!["UniProt"]);
    assert_eq!(by("uniprotkb"), vec!["UniProt"]);
    assert_eq!(by("Aggregation"), vec!["gnomAD"]);
    assert_eq!(by("EXPRESSION"), vec!["FlyBase"]);
    assert_eq!(by("gen"), vec!["gnomAD", "FlyBase"]);
}

#[test]
fn category_matches_category_or_subcategory_exactly() {
    let entries = fixtures();
    let by = |category: &str| {
        let criteria = SearchCriteria {
            category: Some(category.to_string()),
            ..SearchCriteria::default()
        };
        names(&filter(&entries, &criteria))
    };
    assert_eq!(by("GENOMICS"), vec!["gnomAD"]);
    assert_eq!(by("annotation"), vec!["UniProt"]);
    assert!(by("genom").is_empty());
}

#[test]
fn access_method_is_exact_and_organism_is_substring() {
    let entries = fixtures();
    let criteria = SearchCriteria {
        access_method: Some("api".to_string()),
        ..SearchCriteria::default()
    };
    assert_eq!(names(&filter(&entries, &criteria)), vec!["UniProt"]);

    let criteria = SearchCriteria {
        access_method: Some("dow".to_string()),
        ..SearchCriteria::default()
    };
    assert!(filter(&entries, &criteria).is_empty());

    let criteria = SearchCriteria {
        organism: Some("HUMAN".to_string()),
        ..SearchCriteria::default()
    };
    assert_eq!(names(&filter(&entries, &criteria)), vec!["gnomAD"]);
}

#[test]
fn criteria_combine_with_and() {
    let entries = fixtures();
    let criteria = SearchCriteria {
        access_method: Some("download".to_string()),
        data_type: Some("variant".to_string()),
        ..SearchCriteria::default()
    };
    let result = filter(&entries, &criteria);
    assert_eq!(names(&result), vec!["gnomAD"]);
    for entry in result {
        assert!(criteria.matches(&entry.record));
    }
}

#[test]
fn missing_fields_never_match_and_never_fail() {
    let entries = vec![entry("misc", "bare.json", json!({}))];
    let criteria = SearchCriteria {
        keyword: Some("x".to_string()),
        ..SearchCriteria::default()
    };
    assert!(filter(&entries, &criteria).is_empty());
    assert_eq!(filter(&entries, &SearchCriteria::default()).len(), 1);
}

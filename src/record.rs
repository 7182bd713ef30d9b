use serde::de::DeserializeOwned;
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::{Map, Value};

use crate::domain::RecordLocation;

/// Fields a record needs to be listed in the catalog.
pub const CATALOG_FIELDS: [&str; 4] = ["name", "url", "description", "category"];

/// State of one record field as found in the file.
#[derive(Debug, Clone, PartialEq)]
pub enum Field<T> {
    Missing,
    Value(T),
    /// Present, but not of the expected JSON type (`null` included).
    Malformed(Value),
}

impl<T> Default for Field<T> {
    fn default() -> Self {
        Field::Missing
    }
}

impl<T> Field<T> {
    pub fn is_present(&self) -> bool {
        !matches!(self, Field::Missing)
    }

    pub fn value(&self) -> Option<&T> {
        match self {
            Field::Value(value) => Some(value),
            _ => None,
        }
    }
}

impl<'de, T: DeserializeOwned> Deserialize<'de> for Field<T> {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let raw = Value::deserialize(deserializer)?;
        match serde_json::from_value::<T>(raw.clone()) {
            Ok(value) => Ok(Field::Value(value)),
            Err(_) => Ok(Field::Malformed(raw)),
        }
    }
}

/// A database descriptor with every known field spelled out.
#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct Record {
    pub name: Field<String>,
    pub url: Field<String>,
    pub description: Field<String>,
    pub category: Field<String>,
    pub data_types: Field<Vec<String>>,

    pub abbreviation: Field<String>,
    pub access: Field<Vec<String>>,
    pub license: Field<String>,
    pub organism: Field<String>,
    pub updated: Field<String>,
    pub documentation: Field<String>,
    pub api_docs: Field<String>,

    pub subcategories: Field<Vec<String>>,
    pub references: Field<Value>,
    pub funding: Field<Value>,
    pub contact: Field<Value>,
    pub tutorials: Field<Value>,
    pub use_cases: Field<Vec<String>>,
    pub format: Field<Vec<String>>,

    pub parent: Field<Value>,
    pub member_of: Field<Value>,
    pub curated_from: Field<Value>,
    pub integrates: Field<Value>,
    pub mirrors: Field<Value>,
    pub related_to: Field<Value>,
    pub data_type_analog: Field<Value>,
    pub database_type: Field<Value>,
}

impl Record {
    /// Types the known fields of a JSON object. Never fails: fields of the
    /// wrong type become [`Field::Malformed`].
    pub fn from_document(document: &Map<String, Value>) -> Self {
        serde_json::from_value(Value::Object(document.clone())).unwrap_or_default()
    }

    pub fn name(&self) -> &str {
        text(&self.name)
    }

    pub fn url(&self) -> &str {
        text(&self.url)
    }

    pub fn description(&self) -> &str {
        text(&self.description)
    }

    pub fn category(&self) -> &str {
        text(&self.category)
    }

    pub fn abbreviation(&self) -> &str {
        text(&self.abbreviation)
    }

    pub fn organism(&self) -> &str {
        text(&self.organism)
    }

    pub fn license(&self) -> &str {
        text(&self.license)
    }

    pub fn documentation(&self) -> &str {
        text(&self.documentation)
    }

    pub fn api_docs(&self) -> &str {
        text(&self.api_docs)
    }

    pub fn data_types(&self) -> &[String] {
        list(&self.data_types)
    }

    pub fn access(&self) -> &[String] {
        list(&self.access)
    }

    pub fn subcategories(&self) -> &[String] {
        list(&self.subcategories)
    }

    pub fn use_cases(&self) -> &[String] {
        list(&self.use_cases)
    }

    pub fn formats(&self) -> &[String] {
        list(&self.format)
    }
}

fn text(field: &Field<String>) -> &str {
    field.value().map(String::as_str).unwrap_or("")
}

fn list(field: &Field<Vec<String>>) -> &[String] {
    field.value().map(Vec::as_slice).unwrap_or(&[])
}

/// A record loaded from disk, with the JSON object it came from.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RecordEntry {
    pub location: RecordLocation,
    #[serde(skip)]
    pub record: Record,
    pub document: Map<String, Value>,
}

impl RecordEntry {
    pub fn new(location: RecordLocation, document: Map<String, Value>) -> Self {
        let record = Record::from_document(&document);
        Self {
            location,
            record,
            document,
        }
    }

    /// Keys of `fields` absent from the document.
    pub fn missing_fields(&self, fields: &[&str]) -> Vec<String> {
        fields
            .iter()
            .filter(|field| !self.document.contains_key(**field))
            .map(|field| field.to_string())
            .collect()
    }
}

/// JSON falsiness: `null`, `false`, `0`, and empty strings, arrays and objects.
pub fn is_blank(value: &Value) -> bool {
    match value {
        Value::Null => true,
        Value::Bool(flag) => !flag,
        Value::Number(number) => number.as_f64() == Some(0.0),
        Value::String(text) => text.is_empty(),
        Value::Array(items) => items.is_empty(),
        Value::Object(map) => map.is_empty(),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn record(value: Value) -> Record {
        match value {
            Value::Object(map) => Record::from_document(&map),
            _ => panic!("fixture must be an object"),
        }
    }

    #[test]
    fn missing_and_malformed_are_distinct() {
        let rec = record(json!({ "name": "UniProt", "url": null, "data_types": "proteins" }));
        assert_eq!(rec.name, Field::Value("UniProt".to_string()));
        assert_eq!(rec.url, Field::Malformed(Value::Null));
        assert_eq!(rec.data_types, Field::Malformed(json!("proteins")));
        assert_eq!(rec.description, Field::Missing);
    }

    #[test]
    fn accessors_default_to_empty() {
        let rec = record(json!({ "access": "web", "organism": 9606 }));
        assert_eq!(rec.name(), "");
        assert_eq!(rec.organism(), "");
        assert!(rec.access().is_empty());
        assert!(rec.data_types().is_empty());
    }

    #[test]
    fn blank_follows_json_truthiness() {
        assert!(is_blank(&json!("")));
        assert!(is_blank(&json!([])));
        assert!(is_blank(&json!({})));
        assert!(is_blank(&json!(0)));
        assert!(is_blank(&json!(false)));
        assert!(!is_blank(&json!("x")));
        assert!(!is_blank(&json!([1])));
        assert!(!is_blank(&json!(0.5)));
    }

    #[test]
    fn entry_reports_missing_keys() {
        let Value::Object(map) = json!({ "name": "GO", "url": null }) else {
            unreachable!()
        };
        let entry = RecordEntry::new(RecordLocation::new("ontologies", "go.json"), map);
        assert_eq!(
            entry.missing_fields(&CATALOG_FIELDS),
            vec!["description".to_string(), "category".to_string()]
        );
    }
}

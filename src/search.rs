use serde::Serialize;

use crate::record::{Record, RecordEntry};

/// Optional filters, combined with AND. Empty strings count as unset.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct SearchCriteria {
    pub keyword: Option<String>,
    pub category: Option<String>,
    pub data_type: Option<String>,
    pub organism: Option<String>,
    pub access_method: Option<String>,
}

impl SearchCriteria {
    pub fn is_empty(&self) -> bool {
        self.needles().iter().all(Option::is_none)
    }

    fn needles(&self) -> [Option<String>; 5] {
        [
            needle(&self.keyword),
            needle(&self.category),
            needle(&self.data_type),
            needle(&self.organism),
            needle(&self.access_method),
        ]
    }

    pub fn matches(&self, record: &Record) -> bool {
        let [keyword, category, data_type, organism, access_method] = self.needles();

        if let Some(keyword) = keyword {
            let hit = contains(record.name(), &keyword)
                || contains(record.description(), &keyword)
                || contains(record.abbreviation(), &keyword)
                || record.data_types().iter().any(|dt| contains(dt, &keyword));
            if !hit {
                return false;
            }
        }

        if let Some(category) = category {
            let hit = equals(record.category(), &category)
                || record.subcategories().iter().any(|sc| equals(sc, &category));
            if !hit {
                return false;
            }
        }

        if let Some(data_type) = data_type {
            if !record.data_types().iter().any(|dt| contains(dt, &data_type)) {
                return false;
            }
        }

        if let Some(organism) = organism {
            if !contains(record.organism(), &organism) {
                return false;
            }
        }

        if let Some(access_method) = access_method {
            if !record.access().iter().any(|acc| equals(acc, &access_method)) {
                return false;
            }
        }

        true
    }
}

/// Lowercased criterion, or `None` when it is unset or empty.
fn needle(value: &Option<String>) -> Option<String> {
    value
        .as_deref()
        .filter(|value| !value.is_empty())
        .map(str::to_lowercase)
}

fn contains(haystack: &str, lowered_needle: &str) -> bool {
    haystack.to_lowercase().contains(lowered_needle)
}

fn equals(value: &str, lowered_needle: &str) -> bool {
    value.to_lowercase() == lowered_needle
}

/// Entries matching every criterion, in input order.
pub fn filter<'a>(entries: &'a [RecordEntry], criteria: &SearchCriteria) -> Vec<&'a RecordEntry> {
    entries
        .iter()
        .filter(|entry| criteria.matches(&entry.record))
        .collect()
}

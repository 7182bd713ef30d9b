use std::fmt;
use std::str::FromStr;

use camino::{Utf8Path, Utf8PathBuf};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Category {
    Genomics,
    Proteomics,
    Pathways,
    Metabolomics,
    Ontologies,
    Literature,
    ClinicalMedical,
    ModelOrganisms,
    StructuralBiology,
    ToolsResources,
}

impl Category {
    pub const ALL: [Category; 10] = [
        Category::Genomics,
        Category::Proteomics,
        Category::Pathways,
        Category::Metabolomics,
        Category::Ontologies,
        Category::Literature,
        Category::ClinicalMedical,
        Category::ModelOrganisms,
        Category::StructuralBiology,
        Category::ToolsResources,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Category::Genomics => "genomics",
            Category::Proteomics => "proteomics",
            Category::Pathways => "pathways",
            Category::Metabolomics => "metabolomics",
            Category::Ontologies => "ontologies",
            Category::Literature => "literature",
            Category::ClinicalMedical => "clinical-medical",
            Category::ModelOrganisms => "model-organisms",
            Category::StructuralBiology => "structural-biology",
            Category::ToolsResources => "tools-resources",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownCategory(pub String);

impl fmt::Display for UnknownCategory {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown category: {}", self.0)
    }
}

impl std::error::Error for UnknownCategory {}

impl FromStr for Category {
    type Err = UnknownCategory;

    /// Exact match only; `Genomics` is not a category id.
    fn from_str(value: &str) -> Result<Self, Self::Err> {
        Category::ALL
            .into_iter()
            .find(|category| category.as_str() == value)
            .ok_or_else(|| UnknownCategory(value.to_string()))
    }
}

/// Where a record lives: its category directory and file name.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct RecordLocation {
    pub category_dir: String,
    pub file_name: String,
}

impl RecordLocation {
    pub fn new(category_dir: impl Into<String>, file_name: impl Into<String>) -> Self {
        Self {
            category_dir: category_dir.into(),
            file_name: file_name.into(),
        }
    }

    pub fn relative_path(&self) -> Utf8PathBuf {
        Utf8PathBuf::from(&self.category_dir).join(&self.file_name)
    }

    pub fn resolve(&self, root: &Utf8Path) -> Utf8PathBuf {
        root.join(self.relative_path())
    }
}

impl fmt::Display for RecordLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{}", self.category_dir, self.file_name)
    }
}

/// Display name used when the catalog has none for a category yet.
pub fn default_category_name(id: &str) -> String {
    title_case(&id.replace('-', " "))
}

pub fn default_category_description(id: &str) -> String {
    format!("Databases in the {id} category")
}

/// Uppercases the first letter of every run of letters and lowercases the
/// rest, so `3d-viewer` becomes `3D-Viewer`.
pub fn title_case(value: &str) -> String {
    let mut out = String::with_capacity(value.len());
    let mut previous_is_letter = false;
    for ch in value.chars() {
        if ch.is_alphabetic() {
            if previous_is_letter {
                out.extend(ch.to_lowercase());
            } else {
                out.extend(ch.to_uppercase());
            }
            previous_is_letter = true;
        } else {
            out.push(ch);
            previous_is_letter = false;
        }
    }
    out
}

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn category_round_trips_through_str() {
        for category in Category::ALL {
            assert_eq!(category.as_str().parse::<Category>(), Ok(category));
        }
    }

    #[test]
    fn category_parse_is_case_sensitive() {
        assert_matches!("Genomics".parse::<Category>(), Err(UnknownCategory(_)));
        assert_matches!("clinical_medical".parse::<Category>(), Err(_));
    }

    #[test]
    fn default_names() {
        assert_eq!(default_category_name("clinical-medical"), "Clinical Medical");
        assert_eq!(default_category_name("genomics"), "Genomics");
        assert_eq!(default_category_name("3d-structures"), "3D Structures");
        assert_eq!(
            default_category_description("pathways"),
            "Databases in the pathways category"
        );
    }

    #[test]
    fn title_case_lowercases_tail() {
        assert_eq!(title_case("hELLO wORLD"), "Hello World");
        assert_eq!(title_case("rna-seq"), "Rna-Seq");
    }
}

use std::fs;

use assert_matches::assert_matches;
use camino::Utf8PathBuf;

use bioawesome_catalog::app::{App, ProgressEvent, ProgressSink};
use bioawesome_catalog::error::CatalogError;
use bioawesome_catalog::output::{JsonOutput, render_search};
use bioawesome_catalog::search::SearchCriteria;
use bioawesome_catalog::store::Store;

struct NoopSink;

impl ProgressSink for NoopSink {
    fn event(&self, _event: ProgressEvent) {}
}

fn temp_root() -> (tempfile::TempDir, Utf8PathBuf) {
    let temp = tempfile::tempdir().unwrap();
    let root = Utf8PathBuf::from_path_buf(temp.path().to_path_buf()).unwrap();
    (temp, root)
}

fn write(root: &Utf8PathBuf, relative: &str, content: &str) {
    let path = root.join(relative);
    fs::create_dir_all(path.parent().unwrap().as_std_path()).unwrap();
    fs::write(path.as_std_path(), content).unwrap();
}

#[test]
fn list_categories_reads_only_the_catalog() {
    let (_temp, root) = temp_root();
    write(&root, "genomics/broken.json", "{");
    write(
        &root,
        "catalog.json",
        r#"{"categories": {
            "proteomics": {"name": "Proteomics", "description": "Proteins", "count": 4},
            "genomics": {"name": "Genomics", "description": "Genomes"}
        }}"#,
    );

    let app = App::new(Store::new(root), "1.0.0");
    let result = app.list_categories().unwrap();
    let ids: Vec<_> = result.categories.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(ids, vec!["proteomics", "genomics"]);
    assert_eq!(result.categories[0].count, Some(4));
    assert_eq!(result.categories[1].description, "Genomes");
}

#[test]
fn list_categories_without_catalog() {
    let (_temp, root) = temp_root();
    fs::create_dir_all(root.as_std_path()).unwrap();
    let app = App::new(Store::new(root), "1.0.0");
    assert_matches!(app.list_categories(), Err(CatalogError::MissingCatalog(_)));
}

#[test]
fn search_then_render() {
    let (_temp, root) = temp_root();
    write(
        &root,
        "pathways/kegg.json",
        r#"{"name": "KEGG", "url": "https://www.kegg.jp", "category": "pathways",
            "description": "Kyoto Encyclopedia of Genes and Genomes.", "access": ["web", "API"]}"#,
    );
    write(
        &root,
        "pathways/reactome.json",
        r#"{"name": "Reactome", "url": "https://reactome.org", "category": "pathways",
            "description": "Curated pathways.", "access": ["web"]}"#,
    );

    let app = App::new(Store::new(root), "1.0.0");
    let criteria = SearchCriteria {
        access_method: Some("API".to_string()),
        ..SearchCriteria::default()
    };
    let result = app.search(criteria, &JsonOutput).unwrap();
    assert_eq!(result.total_loaded, 2);
    assert_eq!(result.matches.len(), 1);

    let text = render_search(&result, false);
    assert!(text.starts_with("\nFound 1 database(s):\n"));
    assert!(text.contains("\nKEGG\n"));
    assert!(text.ends_with("Total: 1 database(s)"));
}

#[test]
fn search_with_missing_root() {
    let (_temp, root) = temp_root();
    let app = App::new(Store::new(root.join("databases")), "1.0.0");
    assert_matches!(
        app.search(SearchCriteria::default(), &NoopSink),
        Err(CatalogError::MissingRoot(_))
    );
}

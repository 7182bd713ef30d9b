use std::path::PathBuf;

use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CatalogError {
    #[error("databases directory not found at {0}")]
    #[diagnostic(help("pass --root or set BIOAWESOME_ROOT"))]
    MissingRoot(PathBuf),

    #[error("config file not found at {0}")]
    MissingConfig(PathBuf),

    #[error("failed to read config file at {0}")]
    ConfigRead(PathBuf),

    #[error("failed to parse JSON config: {0}")]
    ConfigParse(String),

    #[error("catalog not found at {0}")]
    MissingCatalog(PathBuf),

    #[error("failed to parse catalog: {0}")]
    CatalogParse(String),

    #[error("failed to serialize catalog: {0}")]
    CatalogSerialize(String),

    #[error("filesystem error: {0}")]
    Filesystem(String),
}

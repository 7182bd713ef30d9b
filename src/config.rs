use std::fs;
use std::path::PathBuf;

use camino::Utf8PathBuf;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::catalog::CATALOG_VERSION;
use crate::error::CatalogError;
use crate::store::{CATALOG_FILE, Store};

pub const ROOT_ENV: &str = "BIOAWESOME_ROOT";
pub const CONFIG_FILE: &str = "bioawesome.json";
const DEFAULT_DATABASES_DIR: &str = "databases";

#[derive(Debug, Default, Deserialize, Serialize)]
pub struct Config {
    #[serde(default)]
    pub schema_version: Option<u32>,
    #[serde(default)]
    pub databases_dir: Option<String>,
    #[serde(default)]
    pub catalog_file: Option<String>,
    #[serde(default)]
    pub catalog_version: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResolvedConfig {
    pub schema_version: u32,
    pub databases_dir: Utf8PathBuf,
    pub catalog_path: Utf8PathBuf,
    pub catalog_version: String,
}

impl ResolvedConfig {
    pub fn store(&self) -> Store {
        Store::new_with_paths(self.databases_dir.clone(), self.catalog_path.clone())
    }
}

pub struct ConfigLoader;

impl ConfigLoader {
    /// Resolves the databases root with `--root` first, then
    /// `BIOAWESOME_ROOT`, then the config file, then discovery.
    pub fn resolve(path: Option<&str>, root: Option<&str>) -> Result<ResolvedConfig, CatalogError> {
        let config = Self::load(path)?;
        let root_override = root
            .map(str::to_string)
            .or_else(|| std::env::var(ROOT_ENV).ok().filter(|value| !value.is_empty()));
        Ok(Self::resolve_config(config, root_override, discover_root()))
    }

    /// Reads `path` if given (it must exist), else `bioawesome.json` in the
    /// current directory, else the user config file. No file means defaults.
    pub fn load(path: Option<&str>) -> Result<Config, CatalogError> {
        let config_path = match path {
            Some(path) => {
                let path = PathBuf::from(path);
                if !path.exists() {
                    return Err(CatalogError::MissingConfig(path));
                }
                path
            }
            None => match default_config_path() {
                Some(path) => path,
                None => return Ok(Config::default()),
            },
        };

        debug!(path = %config_path.display(), "loading config");
        let content = fs::read_to_string(&config_path)
            .map_err(|_| CatalogError::ConfigRead(config_path.clone()))?;
        serde_json::from_str(&content).map_err(|err| CatalogError::ConfigParse(err.to_string()))
    }

    pub fn resolve_config(
        config: Config,
        root_override: Option<String>,
        discovered: Option<Utf8PathBuf>,
    ) -> ResolvedConfig {
        let databases_dir = root_override
            .or(config.databases_dir)
            .map(Utf8PathBuf::from)
            .or(discovered)
            .unwrap_or_else(|| Utf8PathBuf::from(DEFAULT_DATABASES_DIR));
        let catalog_path =
            databases_dir.join(config.catalog_file.as_deref().unwrap_or(CATALOG_FILE));

        ResolvedConfig {
            schema_version: config.schema_version.unwrap_or(1),
            databases_dir,
            catalog_path,
            catalog_version: config
                .catalog_version
                .unwrap_or_else(|| CATALOG_VERSION.to_string()),
        }
    }
}

fn default_config_path() -> Option<PathBuf> {
    let local = PathBuf::from(CONFIG_FILE);
    if local.is_file() {
        return Some(local);
    }
    ProjectDirs::from("org", "bioawesome", "bioawesome")
        .map(|dirs| dirs.config_dir().join("config.json"))
        .filter(|path| path.is_file())
}

/// First `databases/` directory found walking up from the executable.
fn discover_root() -> Option<Utf8PathBuf> {
    let exe = std::env::current_exe().ok()?;
    exe.parent()?
        .ancestors()
        .map(|dir| dir.join(DEFAULT_DATABASES_DIR))
        .find(|candidate| candidate.is_dir())
        .and_then(|found| Utf8PathBuf::from_path_buf(found).ok())
}

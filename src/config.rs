//! Runtime configuration: API key, endpoints and the on-disk layout.
//!
//! A [`Config`] is built once at startup and passed to everything that needs
//! it. Nothing in the crate reads the environment on its own.

use std::fs::create_dir_all;
use std::path::{Path, PathBuf};

use crate::error::AppError;

pub const API_KEY_VAR: &str = "NASS_API_KEY";

pub const DEFAULT_DATA_URL: &str = "https://quickstats.nass.usda.gov/api/api_GET/";
pub const DEFAULT_PARAMS_URL: &str = "https://quickstats.nass.usda.gov/api/get_param_values/";

/// Output directories relative to a project root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Directories {
    pub root: PathBuf,
    /// Parameter lists and the collated metadata CSV.
    pub metadata: PathBuf,
    /// Options reports only; everything here is read back by `collate`.
    pub options: PathBuf,
    /// Cached bulk CSV snapshots.
    pub raw: PathBuf,
    pub figures: PathBuf,
}

impl Directories {
    pub fn resolve(root: impl Into<PathBuf>) -> Self {
        let root = root.into();
        let data = root.join("data");
        let metadata = data.join("metadata");
        Self {
            options: metadata.join("options"),
            metadata,
            raw: data.join("raw"),
            figures: root.join("outputs").join("figures"),
            root,
        }
    }

    /// Create every directory that does not exist yet.
    pub fn ensure(&self) -> Result<(), AppError> {
        for dir in [&self.metadata, &self.options, &self.raw, &self.figures] {
            create_dir_all(dir).map_err(|e| {
                AppError::io(format!("Failed to create directory '{}': {e}", dir.display()))
            })?;
        }
        Ok(())
    }
}

#[derive(Clone)]
pub struct Config {
    pub api_key: String,
    pub data_url: String,
    pub params_url: String,
    pub dirs: Directories,
}

impl Config {
    pub fn new(api_key: impl Into<String>, root: impl Into<PathBuf>) -> Self {
        Self {
            api_key: api_key.into(),
            data_url: DEFAULT_DATA_URL.to_string(),
            params_url: DEFAULT_PARAMS_URL.to_string(),
            dirs: Directories::resolve(root),
        }
    }

    /// Load `.env` (if any) and read the configuration from the environment.
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    ///
    /// `NASS_API_KEY` is required; `NASS_API_URL`, `NASS_PARAMS_URL` and
    /// `NASS_PROJECT_ROOT` are optional overrides.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(API_KEY_VAR)
            .map(|v| v.trim().to_string())
            .filter(|v| !v.is_empty())
            .ok_or_else(|| {
                AppError::config(format!("Missing {API_KEY_VAR} in environment (.env)."))
            })?;

        let root = lookup("NASS_PROJECT_ROOT")
            .filter(|v| !v.trim().is_empty())
            .map(PathBuf::from)
            .unwrap_or_else(|| PathBuf::from("."));

        let mut config = Self::new(api_key, root);
        if let Some(url) = lookup("NASS_API_URL").filter(|v| !v.trim().is_empty()) {
            config.data_url = url;
        }
        if let Some(url) = lookup("NASS_PARAMS_URL").filter(|v| !v.trim().is_empty()) {
            config.params_url = url;
        }
        Ok(config)
    }

    pub fn metadata_dir(&self) -> &Path {
        &self.dirs.metadata
    }

    pub fn options_dir(&self) -> &Path {
        &self.dirs.options
    }

    pub fn raw_dir(&self) -> &Path {
        &self.dirs.raw
    }
}

// Keep the key out of debug output.
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("api_key", &"<redacted>")
            .field("data_url", &self.data_url)
            .field("params_url", &self.params_url)
            .field("dirs", &self.dirs)
            .finish()
    }
}

use serde::Deserialize;
use std::{fs, path::Path, path::PathBuf};

use crate::error::PushError;

const CONFIG_FILE_NAME: &str = ".push_commits.toml";
const DEFAULT_BRANCH: &str = "master";
const DEFAULT_REVIEWBOARD_URL: &str = "https://reviews.apache.org";

#[derive(Debug, Deserialize, Clone, PartialEq, Eq)]
#[serde(default, deny_unknown_fields)]
pub struct PushConfig {
    /// Long-lived branch that commits are pushed from and to.
    pub integration_branch: String,
    /// ReviewBoard server whose `r/<id>` URLs appear in commit messages.
    pub reviewboard_url: String,
    /// Review client executable used to close reviews.
    pub review_client: String,
}

impl Default for PushConfig {
    fn default() -> Self {
        Self {
            integration_branch: DEFAULT_BRANCH.to_string(),
            reviewboard_url: DEFAULT_REVIEWBOARD_URL.to_string(),
            review_client: default_review_client().to_string(),
        }
    }
}

// Windows command name must have the `cmd` extension.
fn default_review_client() -> &'static str {
    if cfg!(windows) { "rbt.cmd" } else { "rbt" }
}

impl PushConfig {
    /// Location used when `--config` is not given.
    pub fn default_path() -> Option<PathBuf> {
        dirs::home_dir().map(|home| home.join(CONFIG_FILE_NAME))
    }

    /// Reads `toml_path` if it exists, otherwise falls back to defaults.
    pub fn create_or_load(toml_path: &Path) -> Result<Self, PushError> {
        if toml_path.exists() {
            return Self::read_toml(toml_path);
        }
        tracing::debug!(path = %toml_path.display(), "no config file, using defaults");
        Ok(Self::default())
    }

    /// Resolves the config for an optional explicit path.
    pub fn resolve(explicit: Option<&Path>) -> Result<Self, PushError> {
        match explicit.map(Path::to_path_buf).or_else(Self::default_path) {
            Some(path) => Self::create_or_load(&path),
            None => Ok(Self::default()),
        }
    }

    fn read_toml(toml_path: &Path) -> Result<Self, PushError> {
        let content = fs::read_to_string(toml_path).map_err(|source| PushError::ConfigRead {
            path: toml_path.to_path_buf(),
            source,
        })?;
        let config: Self = toml::from_str(&content).map_err(|source| PushError::ConfigParse {
            path: toml_path.to_path_buf(),
            source,
        })?;
        tracing::debug!(path = %toml_path.display(), ?config, "loaded config");
        Ok(config)
    }
}

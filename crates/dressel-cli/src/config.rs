use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// Top-level application configuration. Every field is optional; command-line
/// flags take precedence over anything set here.
#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct AppConfig {
    /// Archive host that path suffixes are appended to.
    pub base_url: Option<String>,
    /// Local directory the archive is mirrored into.
    pub mirror_root: Option<PathBuf>,
    /// File holding the bearer token.
    pub token_path: Option<PathBuf>,
    /// Skip entries whose artifact already exists locally.
    pub skip_existing: Option<bool>,
}

impl AppConfig {
    pub fn base_url(&self) -> &str {
        self.base_url
            .as_deref()
            .unwrap_or(dressel_earthdata::DEFAULT_BASE_URL)
    }

    pub fn mirror_root(&self) -> Option<PathBuf> {
        match &self.mirror_root {
            Some(root) => Some(expand_home(root)),
            None => default_mirror_root(),
        }
    }

    pub fn token_path(&self) -> Option<PathBuf> {
        match &self.token_path {
            Some(path) => Some(expand_home(path)),
            None => dressel_earthdata::default_token_path().ok(),
        }
    }

    pub fn skip_existing(&self) -> bool {
        self.skip_existing.unwrap_or(true)
    }
}

/// Config file path: `dressel/config.toml` under the platform config directory.
pub fn config_path() -> Option<PathBuf> {
    dirs::config_dir().map(|d| d.join("dressel").join("config.toml"))
}

/// Default mirror root: `~/datasets`
pub fn default_mirror_root() -> Option<PathBuf> {
    dirs::home_dir().map(|d| d.join("datasets"))
}

/// Load config from file, falling back to defaults if missing.
pub fn load_config() -> AppConfig {
    if let Some(path) = config_path()
        && let Ok(contents) = std::fs::read_to_string(&path)
    {
        match toml::from_str::<AppConfig>(&contents) {
            Ok(config) => return config,
            Err(e) => tracing::warn!(
                "failed to parse config at {}, using defaults: {e}",
                path.display()
            ),
        }
    }

    AppConfig::default()
}

/// Replace a leading `~` with the home directory.
pub fn expand_home(path: &Path) -> PathBuf {
    match (path.strip_prefix("~"), dirs::home_dir()) {
        (Ok(rest), Some(home)) => home.join(rest),
        _ => path.to_path_buf(),
    }
}

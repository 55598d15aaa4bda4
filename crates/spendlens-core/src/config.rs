use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::analytics::policy::PatternPolicy;
use crate::ledger::NormalizeOptions;
use crate::{EngineError, EngineResult};

pub const HOME_ENV_VAR: &str = "SPENDLENS_HOME";
pub const CONFIG_FILE_NAME: &str = "config.json";

pub const DEFAULT_CATEGORIES: [&str; 11] = [
    "Food & Beverages",
    "Books & Literature",
    "Gaming",
    "Digital Subscriptions",
    "Movies & Media",
    "Music & Audio",
    "Electronics & Accessories",
    "Clothing & Apparel",
    "Health & Personal Care",
    "Collectibles",
    "Miscellaneous",
];

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    pub categories: Vec<String>,
    /// Collapse categories outside `categories` to `Miscellaneous` on load.
    pub enforce_categories: bool,
    pub patterns: PatternPolicy,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            categories: DEFAULT_CATEGORIES
                .iter()
                .map(|category| category.to_string())
                .collect(),
            enforce_categories: false,
            patterns: PatternPolicy::default(),
        }
    }
}

impl AnalysisConfig {
    pub fn normalize_options(&self) -> NormalizeOptions {
        NormalizeOptions {
            canonical_categories: self.enforce_categories.then(|| self.categories.clone()),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoadedConfig {
    pub config: AnalysisConfig,
    /// File the settings came from; `None` when defaults were used.
    pub path: Option<PathBuf>,
}

pub fn resolve_config_home(home_override: Option<&Path>) -> Option<PathBuf> {
    if let Some(path) = home_override {
        return Some(path.to_path_buf());
    }
    if let Some(override_path) = std::env::var_os(HOME_ENV_VAR) {
        return Some(PathBuf::from(override_path));
    }
    home::home_dir().map(|home_path| home_path.join(".spendlens"))
}

pub fn load_config(home_override: Option<&Path>) -> EngineResult<LoadedConfig> {
    let Some(home) = resolve_config_home(home_override) else {
        debug!("no home directory; using default configuration");
        return Ok(defaults());
    };
    load_config_file(&home.join(CONFIG_FILE_NAME))
}

pub fn load_config_file(path: &Path) -> EngineResult<LoadedConfig> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(error) if error.kind() == ErrorKind::NotFound => {
            debug!(path = %path.display(), "config file absent; using defaults");
            return Ok(defaults());
        }
        Err(error) => return Err(EngineError::config_invalid(path, &error.to_string())),
    };

    let config = serde_json::from_str::<AnalysisConfig>(&body)
        .map_err(|error| EngineError::config_invalid(path, &error.to_string()))?;
    debug!(path = %path.display(), "loaded configuration");
    Ok(LoadedConfig {
        config,
        path: Some(path.to_path_buf()),
    })
}

fn defaults() -> LoadedConfig {
    LoadedConfig {
        config: AnalysisConfig::default(),
        path: None,
    }
}

//! Suggestion settings: persistent config for the menu and the corpus.
//!
//! User-level config: `~/.quicksuggest/config.yaml`
//! Project-level config: `.quicksuggest/config.yaml` (overrides per field)
//!
//! Resolution: CLI flag → project config → user config → built-in default.

use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::warn;

use crate::menu::MenuSettings;

const DEFAULT_DELAY_MS: u64 = 150;
const DEFAULT_MAX_RESULTS: usize = 8;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("cannot determine home directory")]
    NoHomeDir,

    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Fully resolved settings.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuggestConfig {
    /// Milliseconds a highlight must stay put before the preview loads.
    pub activation_delay_ms: u64,
    /// "Use current page for suggestions".
    pub context_enabled: bool,
    /// "Preview highlighted terms".
    pub preview_enabled: bool,
    /// Suggestion corpus file. None = built-in corpus.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub corpus: Option<PathBuf>,
    /// Cap per result list.
    pub max_results: usize,
}

impl Default for SuggestConfig {
    fn default() -> Self {
        Self {
            activation_delay_ms: DEFAULT_DELAY_MS,
            context_enabled: true,
            preview_enabled: true,
            corpus: None,
            max_results: DEFAULT_MAX_RESULTS,
        }
    }
}

/// One config file. Every field is optional so files can be layered.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
struct ConfigLayer {
    #[serde(skip_serializing_if = "Option::is_none")]
    activation_delay_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    context_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    preview_enabled: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    corpus: Option<PathBuf>,
    #[serde(skip_serializing_if = "Option::is_none")]
    max_results: Option<usize>,
}

/// Path to `~/.quicksuggest/`.
pub fn dirs_path() -> Option<PathBuf> {
    #[cfg(windows)]
    {
        std::env::var("USERPROFILE")
            .ok()
            .map(|p| PathBuf::from(p).join(".quicksuggest"))
    }
    #[cfg(not(windows))]
    {
        std::env::var("HOME")
            .ok()
            .map(|p| PathBuf::from(p).join(".quicksuggest"))
    }
}

/// Path to the user-level config file.
fn user_config_path() -> Option<PathBuf> {
    dirs_path().map(|p| p.join("config.yaml"))
}

/// Path to the project-level config file.
fn project_config_path() -> PathBuf {
    PathBuf::from(".quicksuggest").join("config.yaml")
}

impl SuggestConfig {
    /// Load user config, then overlay project config.
    pub fn load() -> Self {
        Self::load_from(user_config_path().as_deref(), Some(&project_config_path()))
    }

    /// Layer the given files over the defaults. Missing files are skipped;
    /// unreadable or malformed ones are logged and skipped.
    pub fn load_from(user: Option<&Path>, project: Option<&Path>) -> Self {
        let mut config = Self::default();
        for path in [user, project].into_iter().flatten() {
            if let Some(layer) = read_layer(path) {
                config.apply(layer);
            }
        }
        config
    }

    fn apply(&mut self, layer: ConfigLayer) {
        if let Some(v) = layer.activation_delay_ms {
            self.activation_delay_ms = v;
        }
        if let Some(v) = layer.context_enabled {
            self.context_enabled = v;
        }
        if let Some(v) = layer.preview_enabled {
            self.preview_enabled = v;
        }
        if layer.corpus.is_some() {
            self.corpus = layer.corpus;
        }
        if let Some(v) = layer.max_results {
            self.max_results = v;
        }
    }

    /// Save to `~/.quicksuggest/config.yaml`.
    pub fn save(&self) -> ConfigResult<()> {
        let dir = dirs_path().ok_or(ConfigError::NoHomeDir)?;
        self.save_to(&dir.join("config.yaml"))
    }

    pub fn save_to(&self, path: &Path) -> ConfigResult<()> {
        if let Some(dir) = path.parent() {
            std::fs::create_dir_all(dir).map_err(|source| ConfigError::Io {
                path: dir.to_path_buf(),
                source,
            })?;
        }
        let yaml = serde_yaml::to_string(self)?;
        std::fs::write(path, yaml).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })
    }

    /// The menu-facing part of the config.
    pub fn menu_settings(&self) -> MenuSettings {
        MenuSettings {
            activation_delay: Duration::from_millis(self.activation_delay_ms),
            context_enabled: self.context_enabled,
            preview_enabled: self.preview_enabled,
        }
    }
}

fn read_layer(path: &Path) -> Option<ConfigLayer> {
    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return None,
        Err(e) => {
            warn!(path = %path.display(), "unreadable config, using defaults: {e}");
            return None;
        }
    };
    match serde_yaml::from_str(&content) {
        Ok(layer) => Some(layer),
        Err(e) => {
            warn!(path = %path.display(), "malformed config, using defaults: {e}");
            None
        }
    }
}

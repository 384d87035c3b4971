use std::env;
use std::path::{Path, PathBuf};
use std::sync::LazyLock;

use config::{Config, Environment, File};
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

use crate::storage::{FsStorage, Storage};

/// Ollama's model cache in the form shown to users. Printed paths keep this
/// prefix so they carry no account specific information.
pub const CLEAN_MODEL_DIR: &str = "~/.ollama/models";

/// Name used in suggestions when the running executable can't be determined
pub const DEFAULT_COMMAND_NAME: &str = "ollama-find";

/// [`CLEAN_MODEL_DIR`] expanded once for the lifetime of the process.
pub static MODEL_DIR: LazyLock<PathBuf> = LazyLock::new(|| {
    FsStorage::new()
        .expand_path(Path::new(CLEAN_MODEL_DIR))
        .unwrap_or_else(|_| PathBuf::from(CLEAN_MODEL_DIR))
});

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration error: {0}")]
    ConfigError(String),
    #[error("Unable to expand models directory {0}: {1}")]
    ModelsDir(String, std::io::Error),
}

impl From<config::ConfigError> for ConfigError {
    fn from(err: config::ConfigError) -> Self {
        ConfigError::ConfigError(err.to_string())
    }
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct FinderConfig {
    /// Root of the model cache, `~` is allowed
    #[serde(default = "default_models_dir")]
    pub models_dir: String,
    /// Command shown when suggesting another tag
    #[serde(default)]
    pub command_name: Option<String>,
}

fn default_models_dir() -> String {
    CLEAN_MODEL_DIR.to_string()
}

impl FinderConfig {
    pub fn load() -> Result<Self, ConfigError> {
        let mut builder = Config::builder().set_default("models_dir", CLEAN_MODEL_DIR)?;

        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("ollama-find").join("config");
            builder = builder.add_source(File::with_name(&path.to_string_lossy()).required(false));
        }

        if let Ok(path) = env::var("OLLAMA_FIND_CONFIG") {
            builder = builder.add_source(File::with_name(&path).required(true));
        }

        // OLLAMA_FIND_MODELS_DIR, OLLAMA_FIND_COMMAND_NAME
        builder = builder.add_source(
            Environment::with_prefix("OLLAMA_FIND")
                .prefix_separator("_")
                .separator("__"),
        );

        let config = builder.build()?;
        let config: Self = config.try_deserialize()?;
        debug!("loaded configuration: {:?}", config);
        Ok(config)
    }

    /// Command name for suggestions, preferring the configured one
    pub fn command_name(&self) -> String {
        self.command_name
            .clone()
            .or_else(current_command_name)
            .unwrap_or_else(|| DEFAULT_COMMAND_NAME.to_string())
    }

    /// Resolve the configured models directory against `storage`
    pub fn models_dir(&self, storage: &impl Storage) -> Result<ModelsDir, ConfigError> {
        let expanded = storage
            .expand_path(Path::new(&self.models_dir))
            .map_err(|e| ConfigError::ModelsDir(self.models_dir.clone(), e))?;
        Ok(ModelsDir::new(PathBuf::from(&self.models_dir), expanded))
    }
}

impl Default for FinderConfig {
    fn default() -> Self {
        Self {
            models_dir: default_models_dir(),
            command_name: None,
        }
    }
}

fn current_command_name() -> Option<String> {
    let argv0 = env::args_os().next()?;
    Path::new(&argv0)
        .file_stem()
        .map(|name| name.to_string_lossy().into_owned())
}

/// The model cache root, both as shown to users and as used for lookups
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ModelsDir {
    /// Symbolic form used to build printed blob paths
    pub clean: PathBuf,
    /// Absolute form used to read manifests
    pub expanded: PathBuf,
}

impl ModelsDir {
    pub fn new(clean: PathBuf, expanded: PathBuf) -> Self {
        Self { clean, expanded }
    }
}

impl Default for ModelsDir {
    fn default() -> Self {
        Self {
            clean: PathBuf::from(CLEAN_MODEL_DIR),
            expanded: MODEL_DIR.clone(),
        }
    }
}

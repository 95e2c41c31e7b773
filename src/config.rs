use anyhow::{Context, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use tracing::info;

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct DossierConfig {
    pub server: ServerConfig,
    pub storage: StorageConfig,
    pub embedding: EmbeddingConfig,
    pub retrieval: RetrievalConfig,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct ServerConfig {
    pub log_level: String,
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct StorageConfig {
    pub db_path: String,
    /// Project namespace used when the caller does not name one.
    /// Defaults to the working-directory name.
    pub default_project: String,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct EmbeddingConfig {
    /// `"remote"` enables vector search via an external provider; `"none"` disables it.
    pub provider: String,
    pub endpoint: String,
    pub model: String,
    pub timeout_secs: u64,
}

#[derive(Debug, Deserialize, Clone)]
#[serde(default)]
pub struct RetrievalConfig {
    pub default_max_results: usize,
    pub list_limit: usize,
}

impl Default for DossierConfig {
    fn default() -> Self {
        Self {
            server: ServerConfig::default(),
            storage: StorageConfig::default(),
            embedding: EmbeddingConfig::default(),
            retrieval: RetrievalConfig::default(),
        }
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            log_level: "info".into(),
            host: "127.0.0.1".into(),
            port: 8000,
        }
    }
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            db_path: default_dossier_dir()
                .join("contexts.db")
                .to_string_lossy()
                .into_owned(),
            default_project: working_dir_project(),
        }
    }
}

impl Default for EmbeddingConfig {
    fn default() -> Self {
        Self {
            provider: "none".into(),
            endpoint: "http://localhost:11434/v1/embeddings".into(),
            model: "all-minilm".into(),
            timeout_secs: 10,
        }
    }
}

impl Default for RetrievalConfig {
    fn default() -> Self {
        Self {
            default_max_results: 5,
            list_limit: 20,
        }
    }
}

fn home_dir() -> PathBuf {
    dirs::home_dir().expect("home directory must exist")
}

/// Returns `~/.dossier/`
pub fn default_dossier_dir() -> PathBuf {
    home_dir().join(".dossier")
}

/// Returns the default config file path: `~/.dossier/config.toml`
pub fn default_config_path() -> PathBuf {
    default_dossier_dir().join("config.toml")
}

/// The working-directory name, used as the implicit project namespace.
fn working_dir_project() -> String {
    std::env::current_dir()
        .ok()
        .and_then(|p| p.file_name().map(|n| n.to_string_lossy().into_owned()))
        .unwrap_or_else(|| "default".into())
}

impl DossierConfig {
    /// Load from `~/.dossier/config.toml` with env var overrides applied.
    pub fn load() -> Result<Self> {
        Self::load_from(default_config_path())
    }

    /// Load from a specific TOML file, falling back to defaults when the file
    /// does not exist, then apply env var overrides.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let mut config = match std::fs::read_to_string(path) {
            Ok(contents) => toml::from_str(&contents)
                .with_context(|| format!("failed to parse {}", path.display()))?,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                info!(path = %path.display(), "no config file, using defaults");
                Self::default()
            }
            Err(e) => {
                return Err(e).with_context(|| format!("failed to read {}", path.display()));
            }
        };
        config.apply_env_overrides();
        Ok(config)
    }

    /// `DOSSIER_DB`, `DOSSIER_PROJECT`, and `DOSSIER_LOG_LEVEL` win over the file.
    fn apply_env_overrides(&mut self) {
        for (var, slot) in [
            ("DOSSIER_DB", &mut self.storage.db_path),
            ("DOSSIER_PROJECT", &mut self.storage.default_project),
            ("DOSSIER_LOG_LEVEL", &mut self.server.log_level),
        ] {
            if let Ok(value) = std::env::var(var) {
                *slot = value;
            }
        }
    }

    /// The database path with a leading `~` expanded.
    pub fn resolved_db_path(&self) -> PathBuf {
        expand_tilde(&self.storage.db_path)
    }

    /// `true` when an embedding provider is configured.
    pub fn vector_search_enabled(&self) -> bool {
        self.embedding.provider != "none"
    }
}

pub fn expand_tilde(path: &str) -> PathBuf {
    match path.strip_prefix("~/") {
        Some(rest) => home_dir().join(rest),
        None => PathBuf::from(path),
    }
}

//! Configuration management for review-insight using the prefer crate.
//!
//! Precedence, lowest first: built-in defaults, the config file,
//! environment variables, then command-line flags.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::classifier::ClassifierConfig;
use crate::repository::{DbContext, DbError};

/// Default database URL.
pub const DEFAULT_DATABASE_URL: &str = "sqlite:review-insight.db";

/// Default HTTP port.
pub const DEFAULT_PORT: u16 = 8080;

/// Application settings.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Review store URL: a SQLite path (optionally `sqlite:`-prefixed) or a
    /// `postgres://` URL.
    pub database_url: String,
    /// Address to bind the HTTP server to.
    pub host: String,
    pub port: u16,
    /// Directory holding the front-end files.
    pub static_dir: PathBuf,
    /// Prediction service settings.
    pub classifier: ClassifierConfig,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            database_url: DEFAULT_DATABASE_URL.to_string(),
            host: "0.0.0.0".to_string(),
            port: DEFAULT_PORT,
            static_dir: PathBuf::from("public"),
            classifier: ClassifierConfig::default(),
        }
    }
}

impl Settings {
    /// Create a database context for the configured store.
    pub fn create_db_context(&self) -> Result<DbContext, DbError> {
        DbContext::from_url(&self.database_url)
    }

    /// Apply environment variable overrides.
    ///
    /// Supported env vars:
    /// - `DATABASE_URL`: review store URL
    /// - `HOST`: bind host
    /// - `PORT`: bind port
    /// - `STATIC_DIR`: front-end directory
    ///
    /// Classifier variables are handled by [`ClassifierConfig::with_env_overrides`].
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(val) = std::env::var("DATABASE_URL") {
            self.database_url = val;
        }
        if let Ok(val) = std::env::var("HOST") {
            self.host = val;
        }
        if let Ok(val) = std::env::var("PORT") {
            match val.parse() {
                Ok(port) => self.port = port,
                Err(_) => tracing::warn!("Ignoring invalid PORT={}", val),
            }
        }
        if let Ok(val) = std::env::var("STATIC_DIR") {
            self.static_dir = PathBuf::from(shellexpand::tilde(&val).as_ref());
        }
        self.classifier = self.classifier.with_env_overrides();
        self
    }
}

/// Configuration file structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize, prefer::FromValue)]
pub struct Config {
    /// Review store URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub database_url: Option<String>,
    /// Bind host.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub host: Option<String>,
    /// Bind port.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub port: Option<u64>,
    /// Front-end directory, relative to the config file.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub static_dir: Option<String>,
    /// Prediction service configuration.
    #[serde(default, skip_serializing_if = "ClassifierConfig::is_default")]
    #[prefer(default)]
    pub classifier: ClassifierConfig,
    /// Path to the config file this was loaded from (not serialized).
    #[serde(skip)]
    #[prefer(skip)]
    pub source_path: Option<PathBuf>,
}

impl Config {
    /// Load configuration using prefer crate for discovery.
    /// Automatically discovers review-insight config files in standard locations.
    ///
    /// No config file is not an error; a file that fails to parse is.
    pub async fn load() -> Result<Self, String> {
        match prefer::load("review-insight").await {
            Ok(pref_config) => match pref_config.source_path() {
                Some(path) => Self::load_from_path(path).await,
                None => Ok(Self::default()),
            },
            Err(_) => Ok(Self::default()),
        }
    }

    /// Load configuration from a specific file path.
    /// Supports JSON, TOML and YAML based on file extension.
    pub async fn load_from_path(path: &Path) -> Result<Self, String> {
        let contents = tokio::fs::read_to_string(path)
            .await
            .map_err(|e| format!("Failed to read config file {}: {}", path.display(), e))?;

        let ext = path.extension().and_then(|e| e.to_str()).unwrap_or("json");

        let mut config: Config = match ext {
            "toml" => toml::from_str(&contents)
                .map_err(|e| format!("Failed to parse TOML config: {}", e))?,
            "yaml" | "yml" => serde_yaml::from_str(&contents)
                .map_err(|e| format!("Failed to parse YAML config: {}", e))?,
            _ => serde_json::from_str(&contents)
                .map_err(|e| format!("Failed to parse JSON config: {}", e))?,
        };

        config.source_path = Some(path.to_path_buf());
        Ok(config)
    }

    /// Get the base directory for resolving relative paths.
    /// Returns the config file's parent directory if available, otherwise None.
    pub fn base_dir(&self) -> Option<PathBuf> {
        self.source_path
            .as_ref()
            .and_then(|p| p.parent().map(|p| p.to_path_buf()))
    }

    /// Resolve a path that may be relative to the config file.
    /// - Absolute paths are returned as-is
    /// - Paths starting with ~ are expanded
    /// - Relative paths are resolved relative to `base_dir`
    pub fn resolve_path(&self, path_str: &str, base_dir: &Path) -> PathBuf {
        let expanded = shellexpand::tilde(path_str);
        let path = Path::new(expanded.as_ref());

        if path.is_absolute() {
            path.to_path_buf()
        } else {
            base_dir.join(path)
        }
    }

    /// Apply configuration to settings.
    /// `base_dir` is used to resolve relative paths (typically config file dir or CWD).
    pub fn apply_to_settings(&self, settings: &mut Settings, base_dir: &Path) {
        if let Some(ref url) = self.database_url {
            settings.database_url = url.clone();
        }
        if let Some(ref host) = self.host {
            settings.host = host.clone();
        }
        if let Some(port) = self.port {
            match u16::try_from(port) {
                Ok(port) => settings.port = port,
                Err(_) => tracing::warn!("Ignoring out-of-range port {} in config", port),
            }
        }
        if let Some(ref dir) = self.static_dir {
            settings.static_dir = self.resolve_path(dir, base_dir);
        }
        settings.classifier = self.classifier.clone();
    }

    /// Build effective settings: defaults, then this file, then the environment.
    pub fn into_settings(self) -> Settings {
        let base_dir = self
            .base_dir()
            .unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")));

        let mut settings = Settings::default();
        self.apply_to_settings(&mut settings, &base_dir);
        settings.with_env_overrides()
    }
}

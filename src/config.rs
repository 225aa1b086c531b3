use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main PACE configuration
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub paths: PathsConfig,
    pub default_template: String,
    pub log_level: LogLevel,
}

/// Directory roots for each record kind plus the output sink
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PathsConfig {
    pub personas: PathBuf,
    pub traits: PathBuf,
    pub content: PathBuf,
    pub templates: PathBuf,
    pub output: PathBuf,
}

/// Log verbosity, overridable with RUST_LOG
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum LogLevel {
    Trace,
    Debug,
    Info,
    Warn,
    Error,
    Off,
}

impl LogLevel {
    pub fn as_filter(&self) -> &'static str {
        match self {
            LogLevel::Trace => "trace",
            LogLevel::Debug => "debug",
            LogLevel::Info => "info",
            LogLevel::Warn => "warn",
            LogLevel::Error => "error",
            LogLevel::Off => "off",
        }
    }
}

impl Default for Config {
    fn default() -> Self {
        Self {
            paths: PathsConfig::default(),
            default_template: "agent".to_string(),
            log_level: LogLevel::Info,
        }
    }
}

impl Default for PathsConfig {
    fn default() -> Self {
        let pace_dir = Config::pace_dir();

        Self {
            personas: pace_dir.join("personas"),
            traits: pace_dir.join("traits"),
            content: pace_dir.join("content"),
            templates: pace_dir.join("templates"),
            output: pace_dir.join("output"),
        }
    }
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        // If explicit config path provided, try to load it
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Check PACE_CONFIG env var
        if let Ok(env_path) = std::env::var("PACE_CONFIG") {
            let path = PathBuf::from(env_path);
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from PACE_CONFIG: {}", e);
                    }
                }
            }
        }

        // Try PACE_DIR/pace.yaml
        if let Ok(pace_dir) = std::env::var("PACE_DIR") {
            let path = PathBuf::from(pace_dir).join("pace.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from PACE_DIR: {}", e);
                    }
                }
            }
        }

        // Try ~/.config/pace/pace.yaml
        if let Some(config_dir) = dirs::config_dir() {
            let path = config_dir.join("pace").join("pace.yaml");
            if path.exists() {
                match Self::load_from_file(&path) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        log::warn!("Failed to load config from {}: {}", path.display(), e);
                    }
                }
            }
        }

        // Try ./pace.yaml (for development)
        let local_config = PathBuf::from("pace.yaml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    log::warn!("Failed to load local config: {}", e);
                }
            }
        }

        // No config file found, use defaults
        log::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;

        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;

        log::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }

    /// Get the PACE directory (where personas, traits, etc. live)
    pub fn pace_dir() -> PathBuf {
        std::env::var("PACE_DIR")
            .map(PathBuf::from)
            .unwrap_or_else(|_| dirs::config_dir().unwrap_or_else(|| PathBuf::from(".")).join("pace"))
    }

    /// Expand a path that may contain ~ or env vars
    pub fn expand_path(path: &Path) -> PathBuf {
        let path_str = path.to_string_lossy();
        let expanded = shellexpand::full(&path_str).unwrap_or_else(|_| path_str.clone());
        PathBuf::from(expanded.as_ref())
    }
}

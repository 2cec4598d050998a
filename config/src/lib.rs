//! Quorum Configuration
//!
//! Handles loading configuration from:
//! 1. QUORUM_CONFIG env var (explicit path)
//! 2. ./quorum.toml (current directory)
//! 3. ~/.quorum/quorum.toml (user home)
//!
//! Environment variables take precedence over TOML config. The loaded value
//! is handed to callers explicitly; there is no process-wide instance.

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::{env, fs};

const CONFIG_FILE_NAME: &str = "quorum.toml";
const CONFIG_DIR_NAME: &str = ".quorum";

/// Env var naming an explicit config file
pub const CONFIG_ENV: &str = "QUORUM_CONFIG";

// ============================================================================
// Default Constants
// ============================================================================

const DEFAULT_LOG_LEVEL: &str = "info";
const DEFAULT_INPUT_FILES: [&str; 2] = ["testcase1.json", "testcase2.json"];

// ============================================================================
// Config Structs
// ============================================================================

/// Root configuration structure (matches TOML layout)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct QuorumConfig {
    #[serde(default = "default_log_level")]
    pub log_level: String,
    #[serde(default)]
    pub engine: EngineConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub inputs: InputConfig,
}

impl Default for QuorumConfig {
    fn default() -> Self {
        Self {
            log_level: DEFAULT_LOG_LEVEL.into(),
            engine: EngineConfig::default(),
            output: OutputConfig::default(),
            inputs: InputConfig::default(),
        }
    }
}

fn default_log_level() -> String {
    DEFAULT_LOG_LEVEL.into()
}

/// Reconstruction engine limits
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct EngineConfig {
    /// Refuse share sets whose C(n, k) exceeds this
    #[serde(default)]
    pub max_combinations: Option<u64>,
}

/// Output rendering
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OutputConfig {
    #[serde(default)]
    pub format: OutputFormat,
    /// Print every candidate with its vote count
    #[serde(default)]
    pub show_tally: bool,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    #[default]
    Text,
    Json,
}

impl OutputFormat {
    fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_lowercase().as_str() {
            "text" => Some(Self::Text),
            "json" => Some(Self::Json),
            _ => None,
        }
    }
}

/// Share documents processed when none are named on the command line
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct InputConfig {
    #[serde(default = "default_input_files")]
    pub files: Vec<String>,
}

impl Default for InputConfig {
    fn default() -> Self {
        Self {
            files: default_input_files(),
        }
    }
}

fn default_input_files() -> Vec<String> {
    DEFAULT_INPUT_FILES.iter().map(|f| f.to_string()).collect()
}

// ============================================================================
// Environment Variable Helpers
// ============================================================================

/// Set field from env var if present
fn env_string(key: &str, field: &mut String) {
    if let Ok(v) = env::var(key) {
        *field = v;
    }
}

/// Set Option<T> from env var if present and parseable
fn env_parse_option<T: std::str::FromStr>(key: &str, field: &mut Option<T>) {
    if let Ok(v) = env::var(key) {
        if let Ok(parsed) = v.parse() {
            *field = Some(parsed);
        }
    }
}

/// Check if env var is set to a truthy value ("1" or "true")
fn env_bool(key: &str) -> Option<bool> {
    env::var(key)
        .ok()
        .map(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

// ============================================================================
// Implementation
// ============================================================================

impl QuorumConfig {
    /// Load configuration from config file with env var overrides.
    ///
    /// Fails if `QUORUM_CONFIG` names a file that does not exist.
    pub fn load() -> Result<Self> {
        let mut config = match Self::find_config_file()? {
            Some(path) => {
                log::info!("Loading config from: {}", path.display());
                Self::read(&path)?
            }
            None => {
                log::info!("No config file found, using defaults and environment variables");
                Self::default()
            }
        };

        config.apply_env_overrides();
        Ok(config)
    }

    /// Load configuration from a specific file path
    pub fn load_from(path: &Path) -> Result<Self> {
        let mut config = Self::read(path)?;
        config.apply_env_overrides();
        Ok(config)
    }

    /// Parse a TOML document without consulting the environment
    pub fn from_toml(contents: &str) -> Result<Self> {
        toml::from_str(contents).context("Failed to parse config")
    }

    fn read(path: &Path) -> Result<Self> {
        let contents = fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&contents)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }

    /// Find the config file path
    fn find_config_file() -> Result<Option<PathBuf>> {
        // 1. Check QUORUM_CONFIG env var
        if let Ok(path) = env::var(CONFIG_ENV) {
            let path = PathBuf::from(path);
            if !path.exists() {
                bail!("{} points at missing file: {}", CONFIG_ENV, path.display());
            }
            return Ok(Some(path));
        }

        // 2. Check ./quorum.toml (current directory)
        let local_path = PathBuf::from(CONFIG_FILE_NAME);
        if local_path.exists() {
            return Ok(Some(local_path));
        }

        // 3. Check ~/.quorum/quorum.toml
        Ok(Self::default_config_path().filter(|p| p.exists()))
    }

    /// Apply environment variable overrides
    fn apply_env_overrides(&mut self) {
        env_string("QUORUM_LOG_LEVEL", &mut self.log_level);
        env_parse_option("QUORUM_MAX_COMBINATIONS", &mut self.engine.max_combinations);

        if let Ok(v) = env::var("QUORUM_OUTPUT_FORMAT") {
            match OutputFormat::parse(&v) {
                Some(format) => self.output.format = format,
                None => log::warn!("Ignoring unknown QUORUM_OUTPUT_FORMAT={}", v),
            }
        }
        if let Some(v) = env_bool("QUORUM_SHOW_TALLY") {
            self.output.show_tally = v;
        }
    }

    /// Get the default config file path
    pub fn default_config_path() -> Option<PathBuf> {
        dirs::home_dir().map(|h| h.join(CONFIG_DIR_NAME).join(CONFIG_FILE_NAME))
    }

    /// Generate a sample config file
    pub fn generate_sample() -> String {
        let mut sample = Self::default();
        sample.engine.max_combinations = Some(1_000_000);
        toml::to_string_pretty(&sample).unwrap_or_default()
    }
}

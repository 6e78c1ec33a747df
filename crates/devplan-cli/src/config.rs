//! Configuration file management for devplan.
//!
//! Provides a TOML-based config file at `~/.config/devplan/config.toml` and a
//! resolution chain: CLI flag > env var > config file > default.

use std::path::PathBuf;

use anyhow::{Context, Result, bail};
use serde::{Deserialize, Serialize};

use devplan_core::llm::OpenRouterConfig;

/// Environment variable holding the OpenRouter API key.
pub const API_KEY_ENV: &str = "OPENROUTER_API_KEY";
/// Environment variable overriding the model.
pub const MODEL_ENV: &str = "OPENROUTER_MODEL";

const DEFAULT_PLANS_DIR: &str = "plans";
const DEFAULT_DOCS_DIR: &str = "docs";

// -----------------------------------------------------------------------
// Config file types
// -----------------------------------------------------------------------

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ConfigFile {
    #[serde(default)]
    pub openrouter: OpenRouterSection,
    #[serde(default)]
    pub output: OutputSection,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OpenRouterSection {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub temperature: Option<f32>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct OutputSection {
    /// Directory for generated plan JSON files.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub plans_dir: Option<PathBuf>,
    /// Directory for rendered HTML and Markdown documents.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub docs_dir: Option<PathBuf>,
}

// -----------------------------------------------------------------------
// Paths
// -----------------------------------------------------------------------

/// Return the devplan config directory.
///
/// Always uses XDG layout: `$XDG_CONFIG_HOME/devplan` or `~/.config/devplan`.
pub fn config_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CONFIG_HOME") {
        return PathBuf::from(xdg).join("devplan");
    }
    dirs::home_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(".config")
        .join("devplan")
}

/// Return the path to the devplan config file.
pub fn config_path() -> PathBuf {
    config_dir().join("config.toml")
}

// -----------------------------------------------------------------------
// Read / write
// -----------------------------------------------------------------------

/// Load and parse the config file. Returns an error if it does not exist.
pub fn load_config() -> Result<ConfigFile> {
    let path = config_path();
    let contents = std::fs::read_to_string(&path)
        .with_context(|| format!("failed to read config file at {}", path.display()))?;
    let config: ConfigFile = toml::from_str(&contents).context("failed to parse config file")?;
    Ok(config)
}

/// Serialize and write the config file, creating parent dirs as needed.
/// Sets file permissions to 0600 on Unix since it may hold the API key.
pub fn save_config(config: &ConfigFile) -> Result<()> {
    let path = config_path();
    let dir = config_dir();
    std::fs::create_dir_all(&dir)
        .with_context(|| format!("failed to create config directory {}", dir.display()))?;

    let contents = toml::to_string_pretty(config).context("failed to serialize config")?;
    std::fs::write(&path, &contents)
        .with_context(|| format!("failed to write config file at {}", path.display()))?;

    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        let perms = std::fs::Permissions::from_mode(0o600);
        std::fs::set_permissions(&path, perms)
            .with_context(|| format!("failed to set permissions on {}", path.display()))?;
    }

    Ok(())
}

// -----------------------------------------------------------------------
// Resolved config
// -----------------------------------------------------------------------

/// Output directories, resolved against the config file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputDirs {
    pub plans_dir: PathBuf,
    pub docs_dir: PathBuf,
}

impl OutputDirs {
    /// Directories from the config file, or `plans` and `docs` relative to
    /// the working directory.
    pub fn resolve() -> Self {
        let output = load_config().map(|c| c.output).unwrap_or_default();
        Self {
            plans_dir: output
                .plans_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_PLANS_DIR)),
            docs_dir: output
                .docs_dir
                .unwrap_or_else(|| PathBuf::from(DEFAULT_DOCS_DIR)),
        }
    }
}

/// Fully resolved configuration, ready for use.
#[derive(Debug)]
pub struct DevplanConfig {
    pub openrouter: OpenRouterConfig,
    pub output: OutputDirs,
}

impl DevplanConfig {
    /// Resolve configuration using the chain: CLI flag > env var > config file > default.
    ///
    /// - API key: `OPENROUTER_API_KEY` env > `openrouter.api_key` > error
    /// - Model: `cli_model` > `OPENROUTER_MODEL` env > `openrouter.model` > `OpenRouterConfig::DEFAULT_MODEL`
    /// - Base URL and temperature: config file > default
    pub fn resolve(cli_model: Option<&str>) -> Result<Self> {
        let file_config = load_config().ok();
        let section = file_config.as_ref().map(|c| &c.openrouter);

        let api_key = match non_empty_env(API_KEY_ENV) {
            Some(key) => key,
            None => match section.and_then(|s| s.api_key.clone()) {
                Some(key) if !key.trim().is_empty() => key,
                _ => bail!(
                    "OpenRouter API key not found; set {API_KEY_ENV} or run `devplan init --api-key <KEY>`"
                ),
            },
        };

        let model = if let Some(model) = cli_model {
            model.to_string()
        } else if let Some(model) = non_empty_env(MODEL_ENV) {
            model
        } else if let Some(model) = section.and_then(|s| s.model.clone()) {
            model
        } else {
            OpenRouterConfig::DEFAULT_MODEL.to_string()
        };

        let mut openrouter = OpenRouterConfig::new(api_key, model);
        if let Some(url) = section.and_then(|s| s.base_url.clone()) {
            openrouter.base_url = url;
        }
        if let Some(temperature) = section.and_then(|s| s.temperature) {
            openrouter.temperature = temperature;
        }

        Ok(Self {
            openrouter,
            output: OutputDirs::resolve(),
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name).ok().filter(|v| !v.trim().is_empty())
}

// -----------------------------------------------------------------------
// Tests
// -----------------------------------------------------------------------

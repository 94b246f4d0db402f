use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;

use crate::api::EndpointProfile;
use crate::cli::Cli;
use crate::types::{LlmOptions, ModelChoice, DEFAULT_BACKEND_URL, DEFAULT_TYPING_DELAY_MS};

/// Config file looked up in the working directory when --config is not given
pub const DEFAULT_CONFIG_FILE: &str = "copilot.toml";

/// Settings read from the TOML config file. Every field is optional.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct FileConfig {
    pub backend_url: Option<String>,
    pub profile: Option<String>,
    pub model: Option<String>,
    pub temperature: Option<f32>,
    pub typing_delay_ms: Option<u64>,
    pub animation: Option<bool>,
    pub log_dir: Option<PathBuf>,
}

impl FileConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;
        toml::from_str(&content)
            .with_context(|| format!("Failed to parse config file: {}", path.display()))
    }
}

/// Resolved configuration for one run
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub backend_url: String,
    pub profile: EndpointProfile,
    pub options: LlmOptions,
    pub typing_delay: Duration,
    pub animate: bool,
    /// None when logging is disabled
    pub log_dir: Option<PathBuf>,
    pub verbose: bool,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            backend_url: DEFAULT_BACKEND_URL.to_string(),
            profile: EndpointProfile::default(),
            options: LlmOptions::default(),
            typing_delay: Duration::from_millis(DEFAULT_TYPING_DELAY_MS),
            animate: true,
            log_dir: None,
            verbose: false,
        }
    }
}

impl ClientConfig {
    /// Merge CLI flags (which already include environment variables) over the
    /// config file over the built-in defaults.
    pub fn resolve(cli: &Cli, file: FileConfig, default_log_dir: Option<PathBuf>) -> Result<Self> {
        let mut config = Self::default();

        if let Some(url) = cli.backend_url.clone().or(file.backend_url) {
            config.backend_url = normalize_backend_url(&url);
        }

        if let Some(profile) = cli.profile.as_deref().or(file.profile.as_deref()) {
            config.profile = EndpointProfile::from_str(profile).with_context(|| {
                format!("Unknown endpoint profile: {}. Available: 'ingest', 'chat'", profile)
            })?;
        }

        if let Some(model) = cli.model.as_deref().or(file.model.as_deref()) {
            config.options.model = parse_model(model)?;
        }

        if let Some(temperature) = cli.temperature.or(file.temperature) {
            config.options.set_temperature(temperature)?;
        }

        if let Some(ms) = cli.typing_delay_ms.or(file.typing_delay_ms) {
            config.typing_delay = Duration::from_millis(ms);
        }

        config.animate = !cli.no_animation && file.animation.unwrap_or(true);

        config.log_dir = if cli.no_log {
            None
        } else {
            cli.log_dir.clone().or(file.log_dir).or(default_log_dir)
        };

        config.verbose = cli.verbose;

        Ok(config)
    }
}

/// Parse a model name, listing the available ones on failure
pub fn parse_model(name: &str) -> Result<ModelChoice> {
    ModelChoice::parse(name).with_context(|| {
        format!("Unknown model: {}. Available: {}", name, ModelChoice::available())
    })
}

/// Normalize a backend base URL: trims whitespace and trailing slashes, and
/// assumes https when no scheme is given.
pub fn normalize_backend_url(url: &str) -> String {
    let url = url.trim().trim_end_matches('/');
    if url.starts_with("http://") || url.starts_with("https://") {
        url.to_string()
    } else {
        format!("https://{}", url)
    }
}

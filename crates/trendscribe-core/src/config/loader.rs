//! Config loader — reads `~/.trendscribe/config.json` and merges env vars.
//!
//! # Loading precedence
//! 1. Defaults (from `Config::default()`)
//! 2. JSON file at `~/.trendscribe/config.json`
//! 3. Environment variables `TRENDSCRIBE_<SECTION>__<FIELD>` (override JSON)
//! 4. Credential variables `GEMINI_API_KEY`, `REDDIT_CLIENT_ID`, `REDDIT_CLIENT_SECRET`

use std::fmt;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use super::schema::{Config, ModelConfig};
use crate::error::ConfigError;

/// Default config file path.
pub fn get_config_path() -> PathBuf {
    crate::utils::get_data_path().join("config.json")
}

/// Load configuration from the given path (or the default one) + env vars.
///
/// Falls back to `Config::default()` if the file doesn't exist or can't be parsed.
pub fn load_config(path: Option<&Path>) -> Config {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);
    let config = load_config_from_path(&config_path);
    apply_env_overrides(config, |key| std::env::var(key).ok())
}

/// Load config from a specific file path, without env overrides.
fn load_config_from_path(path: &Path) -> Config {
    if !path.exists() {
        info!("No config file found at {}, using defaults", path.display());
        return Config::default();
    }

    debug!("Loading config from {}", path.display());

    let content = match std::fs::read_to_string(path) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to read config file {}: {}", path.display(), e);
            return Config::default();
        }
    };

    match serde_json::from_str(&content) {
        Ok(c) => c,
        Err(e) => {
            warn!("Failed to parse config {}: {}", path.display(), e);
            Config::default()
        }
    }
}

/// Save configuration to disk (pretty-printed JSON with camelCase keys).
pub fn save_config(config: &Config, path: Option<&Path>) -> std::io::Result<()> {
    let config_path = path.map(PathBuf::from).unwrap_or_else(get_config_path);

    if let Some(parent) = config_path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let json = serde_json::to_string_pretty(config).map_err(std::io::Error::other)?;

    std::fs::write(&config_path, json)?;
    debug!("Config saved to {}", config_path.display());
    Ok(())
}

/// Apply environment overrides on top of a loaded config.
///
/// Env var format: `TRENDSCRIBE_<SECTION>__<FIELD>` (double underscore as delimiter).
///
/// Supported overrides:
/// - `TRENDSCRIBE_RESEARCH__MODEL__NAME` / `__TEMPERATURE` / `__MAX_TOKENS`
/// - `TRENDSCRIBE_RESEARCH__MAX_ROUNDS`
/// - `TRENDSCRIBE_CONTENT__MODEL__NAME` / `__TEMPERATURE` / `__MAX_TOKENS`
/// - `TRENDSCRIBE_CONTENT__MAX_ROUNDS`
/// - `TRENDSCRIBE_PROVIDERS__GEMINI__API_KEY` / `__API_BASE`
/// - `TRENDSCRIBE_PROVIDERS__REDDIT__CLIENT_ID` / `__CLIENT_SECRET` / `__USER_AGENT`
/// - `TRENDSCRIBE_PATHS__LOGS_DIR` / `TRENDSCRIBE_PATHS__OUTPUT_ROOT`
///
/// The plain credential variables are applied last.
fn apply_env_overrides(mut config: Config, var: impl Fn(&str) -> Option<String>) -> Config {
    apply_model_env(&mut config.research.model, "RESEARCH", &var);
    if let Some(n) = var("TRENDSCRIBE_RESEARCH__MAX_ROUNDS").and_then(|v| v.parse().ok()) {
        config.research.max_rounds = n;
    }

    apply_model_env(&mut config.content.model, "CONTENT", &var);
    if let Some(n) = var("TRENDSCRIBE_CONTENT__MAX_ROUNDS").and_then(|v| v.parse().ok()) {
        config.content.max_rounds = n;
    }

    // Providers
    let gemini = &mut config.providers.gemini;
    if let Some(val) = var("TRENDSCRIBE_PROVIDERS__GEMINI__API_KEY") {
        gemini.api_key = val;
    }
    if let Some(val) = var("TRENDSCRIBE_PROVIDERS__GEMINI__API_BASE") {
        gemini.api_base = val;
    }

    let reddit = &mut config.providers.reddit;
    if let Some(val) = var("TRENDSCRIBE_PROVIDERS__REDDIT__CLIENT_ID") {
        reddit.client_id = val;
    }
    if let Some(val) = var("TRENDSCRIBE_PROVIDERS__REDDIT__CLIENT_SECRET") {
        reddit.client_secret = val;
    }
    if let Some(val) = var("TRENDSCRIBE_PROVIDERS__REDDIT__USER_AGENT") {
        reddit.user_agent = val;
    }

    // Paths
    if let Some(val) = var("TRENDSCRIBE_PATHS__LOGS_DIR") {
        config.paths.logs_dir = val;
    }
    if let Some(val) = var("TRENDSCRIBE_PATHS__OUTPUT_ROOT") {
        config.paths.output_root = val;
    }

    // Plain credential variables
    if let Some(val) = var("GEMINI_API_KEY").filter(|v| !v.is_empty()) {
        config.providers.gemini.api_key = val;
    }
    if let Some(val) = var("REDDIT_CLIENT_ID").filter(|v| !v.is_empty()) {
        config.providers.reddit.client_id = val;
    }
    if let Some(val) = var("REDDIT_CLIENT_SECRET").filter(|v| !v.is_empty()) {
        config.providers.reddit.client_secret = val;
    }

    config
}

/// Apply env var overrides for one agent's model settings.
fn apply_model_env(model: &mut ModelConfig, section: &str, var: &impl Fn(&str) -> Option<String>) {
    if let Some(val) = var(&format!("TRENDSCRIBE_{section}__MODEL__NAME")) {
        model.name = val;
    }
    if let Some(t) = var(&format!("TRENDSCRIBE_{section}__MODEL__TEMPERATURE")).and_then(|v| v.parse().ok()) {
        model.temperature = t;
    }
    if let Some(n) = var(&format!("TRENDSCRIBE_{section}__MODEL__MAX_TOKENS")).and_then(|v| v.parse().ok()) {
        model.max_tokens = Some(n);
    }
}

// ─────────────────────────────────────────────
// Credentials
// ─────────────────────────────────────────────

/// Validated credentials. Agents cannot be built without one.
#[derive(Clone)]
pub struct Credentials {
    pub gemini_api_key: String,
    pub reddit_client_id: String,
    pub reddit_client_secret: String,
}

impl Credentials {
    /// Check that every required credential is present.
    ///
    /// Fails on the first empty value with the name of its env var.
    pub fn from_config(config: &Config) -> Result<Self, ConfigError> {
        let required = [
            ("GEMINI_API_KEY", &config.providers.gemini.api_key),
            ("REDDIT_CLIENT_ID", &config.providers.reddit.client_id),
            ("REDDIT_CLIENT_SECRET", &config.providers.reddit.client_secret),
        ];
        for (name, value) in required {
            if value.trim().is_empty() {
                return Err(ConfigError::MissingCredential(name.to_string()));
            }
        }

        Ok(Self {
            gemini_api_key: config.providers.gemini.api_key.clone(),
            reddit_client_id: config.providers.reddit.client_id.clone(),
            reddit_client_secret: config.providers.reddit.client_secret.clone(),
        })
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("gemini_api_key", &"***")
            .field("reddit_client_id", &self.reddit_client_id)
            .field("reddit_client_secret", &"***")
            .finish()
    }
}

// ─────────────────────────────────────────────
// Tests
// ─────────────────────────────────────────────

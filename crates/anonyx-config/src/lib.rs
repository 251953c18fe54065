//! Configuration loading for anonyx.
//! Reads anonyx.toml from the current directory or the path in the ANONYX_CONFIG env var.
//! The classifier credential never lives in the file; it is resolved from the
//! environment (and `.env`) by name.

use std::path::Path;

use anonyx_common::{AnonyxError, Result};
use secrecy::SecretString;
use serde::{Deserialize, Serialize};
use tracing::debug;

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AnonyxConfig {
    #[serde(default)]
    pub classifier: ClassifierConfig,
    #[serde(default)]
    pub detectors: DetectorConfig,
    #[serde(default)]
    pub resolver: ResolverSection,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ClassifierConfig {
    #[serde(default = "default_model_id")]
    pub model_id: String,
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Name of the environment variable holding the bearer token.
    #[serde(default = "default_token_env")]
    pub token_env: String,
}

fn default_model_id()     -> String { "dbmdz/bert-large-cased-finetuned-conll03-english".to_string() }
fn default_api_base_url() -> String { "https://api-inference.huggingface.co/models".to_string() }
fn default_timeout_secs() -> u64    { 30 }
fn default_token_env()    -> String { "HF_TOKENS".to_string() }

impl Default for ClassifierConfig {
    fn default() -> Self {
        Self {
            model_id: default_model_id(),
            api_base_url: default_api_base_url(),
            timeout_secs: default_timeout_secs(),
            token_env: default_token_env(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct DetectorConfig {
    #[serde(default = "bool_true")]
    pub email: bool,
    #[serde(default = "bool_true")]
    pub phone: bool,
}

impl Default for DetectorConfig {
    fn default() -> Self {
        Self { email: true, phone: true }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResolverSection {
    /// Drop PHONE spans nested inside another PHONE span before rewriting.
    #[serde(default = "bool_true")]
    pub dedupe_phone_spans: bool,
}

impl Default for ResolverSection {
    fn default() -> Self {
        Self { dedupe_phone_spans: true }
    }
}

fn bool_true() -> bool { true }

impl ClassifierConfig {
    /// Inference endpoint for the configured model.
    pub fn endpoint(&self) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), self.model_id)
    }

    /// Resolve the bearer token from `.env` and the process environment.
    pub fn resolve_token(&self) -> Result<SecretString> {
        // A missing .env file is fine; the variable may be exported directly.
        if let Err(e) = dotenvy::dotenv() {
            debug!("No .env loaded: {e}");
        }
        self.resolve_token_with(|name| std::env::var(name).ok())
    }

    /// Resolve the bearer token through `lookup` instead of the environment.
    pub fn resolve_token_with<F>(&self, lookup: F) -> Result<SecretString>
    where
        F: Fn(&str) -> Option<String>,
    {
        match lookup(&self.token_env) {
            Some(token) if !token.trim().is_empty() => Ok(SecretString::from(token.trim().to_string())),
            _ => Err(AnonyxError::Config(format!(
                "{} not found; set it in the environment or in a .env file",
                self.token_env
            ))),
        }
    }
}

impl AnonyxConfig {
    /// Load configuration from anonyx.toml.
    /// Checks ANONYX_CONFIG first, then the current directory. A missing file yields defaults.
    pub fn load() -> Result<Self> {
        let path = std::env::var("ANONYX_CONFIG")
            .unwrap_or_else(|_| "anonyx.toml".to_string());

        if !Path::new(&path).exists() {
            debug!("Config file {path} not found, using defaults");
            return Ok(Self::default());
        }
        Self::load_from(&path)
    }

    /// Load configuration from an explicit path; the file must exist.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .map_err(|e| AnonyxError::Config(format!("Cannot read {}: {e}", path.display())))?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        toml::from_str(content).map_err(|e| AnonyxError::Config(format!("Invalid config: {e}")))
    }
}

//! Configuration management for mirad.
//!
//! Loads settings from /etc/mira/config.toml (or $MIRA_CONFIG) when present,
//! then applies the deployment's environment variables on top. Every field
//! has a default, so the daemon runs with no configuration at all.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing::{info, warn};

/// Config file path.
pub const CONFIG_PATH: &str = "/etc/mira/config.toml";

/// Daemon configuration.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct MiraConfig {
    #[serde(default)]
    pub server: ServerConfig,

    #[serde(default)]
    pub generator: GeneratorConfig,

    #[serde(default)]
    pub model: ModelConfig,
}

/// HTTP server configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    /// Bind address for the API server.
    #[serde(default = "default_bind")]
    pub bind: String,
}

fn default_bind() -> String {
    "0.0.0.0:5001".to_string()
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
        }
    }
}

/// Remote question-generation configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GeneratorConfig {
    /// Generation API endpoint. Unset means every attempt fails over to the
    /// local question bank.
    #[serde(default)]
    pub api_url: Option<String>,

    /// Bearer token for the generation API.
    #[serde(default)]
    pub api_key: Option<String>,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum new tokens per generated question.
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,

    /// Request timeout in seconds.
    #[serde(default = "default_generator_timeout")]
    pub timeout_secs: u64,

    /// Remote attempts before falling back to the question bank.
    #[serde(default = "default_max_attempts")]
    pub max_attempts: usize,
}

fn default_temperature() -> f32 {
    0.7
}

fn default_max_tokens() -> u32 {
    100
}

fn default_generator_timeout() -> u64 {
    30
}

fn default_max_attempts() -> usize {
    3
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            api_url: None,
            api_key: None,
            temperature: default_temperature(),
            max_tokens: default_max_tokens(),
            timeout_secs: default_generator_timeout(),
            max_attempts: default_max_attempts(),
        }
    }
}

/// Emotion model configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ModelConfig {
    /// Candidate weight files, probed in order; the first loadable one wins.
    #[serde(default = "default_model_paths")]
    pub candidate_paths: Vec<String>,
}

fn default_model_paths() -> Vec<String> {
    vec![
        "emotion_cnn.safetensors".to_string(),
        "./models/emotion_cnn.safetensors".to_string(),
        "../emotion_cnn.safetensors".to_string(),
        "/var/lib/mira/models/emotion_cnn.safetensors".to_string(),
    ]
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            candidate_paths: default_model_paths(),
        }
    }
}

impl MiraConfig {
    /// Load configuration: TOML file when present, environment on top.
    pub fn load() -> Self {
        let path = std::env::var("MIRA_CONFIG").unwrap_or_else(|_| CONFIG_PATH.to_string());
        let mut config = Self::load_from(Path::new(&path));
        config.apply_env();
        config
    }

    /// Parse one TOML file, falling back to defaults when it is missing or
    /// invalid.
    pub fn load_from(path: &Path) -> Self {
        match fs::read_to_string(path) {
            Ok(raw) => match toml::from_str(&raw) {
                Ok(config) => {
                    info!("Loaded config from {}", path.display());
                    config
                }
                Err(e) => {
                    warn!("Invalid config at {}: {} - using defaults", path.display(), e);
                    MiraConfig::default()
                }
            },
            Err(_) => MiraConfig::default(),
        }
    }

    /// Apply the deployment's environment variables on top of the loaded
    /// values. Unparseable numeric values keep the previous value.
    pub fn apply_env(&mut self) {
        if let Ok(url) = std::env::var("LLAMA_API_URL") {
            if !url.is_empty() {
                self.generator.api_url = Some(url);
            }
        }
        if let Ok(key) = std::env::var("LLAMA_API_KEY") {
            if !key.is_empty() {
                self.generator.api_key = Some(key);
            }
        }
        if let Ok(raw) = std::env::var("LLAMA_TEMPERATURE") {
            match raw.parse() {
                Ok(value) => self.generator.temperature = value,
                Err(_) => warn!("Ignoring unparseable LLAMA_TEMPERATURE: {raw}"),
            }
        }
        if let Ok(raw) = std::env::var("LLAMA_MAX_TOKENS") {
            match raw.parse() {
                Ok(value) => self.generator.max_tokens = value,
                Err(_) => warn!("Ignoring unparseable LLAMA_MAX_TOKENS: {raw}"),
            }
        }
    }
}

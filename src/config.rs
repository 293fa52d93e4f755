use std::fs::File;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::error::{SummarizerError, SummarizerResult};

pub const DEFAULT_CONFIG_PATH: &str = "config.json";

// Config struct for the inference token and model selection
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    pub token: Option<String>,
    pub api_base_url: String,
    pub summarization_model: String,
    pub punctuation_model: String,
    pub transcript_language: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            token: None,
            api_base_url: "https://api-inference.huggingface.co/models".to_string(),
            summarization_model: "sshleifer/distilbart-cnn-12-6".to_string(),
            punctuation_model: "oliverguhr/fullstop-punctuation-multilang-large".to_string(),
            transcript_language: "en".to_string(),
        }
    }
}

impl Config {
    pub fn model_url(&self, model: &str) -> String {
        format!("{}/{}", self.api_base_url.trim_end_matches('/'), model)
    }

    /// Token for the inference API, required only once a model handle is built.
    pub fn require_token(&self) -> SummarizerResult<&str> {
        self.token
            .as_deref()
            .filter(|token| !token.trim().is_empty())
            .ok_or_else(|| {
                SummarizerError::Config(
                    "an inference API token is required (set `token` or HF_API_TOKEN)".to_owned(),
                )
            })
    }
}

/// Reads the JSON config at `path`, falling back to defaults when the file
/// does not exist, then applies environment overrides.
pub fn read_config(path: &Path) -> SummarizerResult<Config> {
    let mut config = if path.exists() {
        let file = File::open(path)?;
        serde_json::from_reader(file)?
    } else {
        tracing::debug!(path = %path.display(), "config file not found, using defaults");
        Config::default()
    };

    apply_env_overrides(&mut config);
    validate(&config)?;
    Ok(config)
}

fn apply_env_overrides(config: &mut Config) {
    if let Some(value) = env_value("HF_API_TOKEN") {
        config.token = Some(value);
    }
    if let Some(value) = env_value("YTS_SUMMARIZATION_MODEL") {
        config.summarization_model = value;
    }
    if let Some(value) = env_value("YTS_PUNCTUATION_MODEL") {
        config.punctuation_model = value;
    }
    if let Some(value) = env_value("YTS_LANGUAGE") {
        config.transcript_language = value;
    }
}

fn env_value(key: &str) -> Option<String> {
    std::env::var(key)
        .ok()
        .map(|value| value.trim().to_string())
        .filter(|value| !value.is_empty())
}

fn validate(config: &Config) -> SummarizerResult<()> {
    let required = [
        ("api_base_url", &config.api_base_url),
        ("summarization_model", &config.summarization_model),
        ("punctuation_model", &config.punctuation_model),
        ("transcript_language", &config.transcript_language),
    ];
    for (name, value) in required {
        if value.trim().is_empty() {
            return Err(SummarizerError::Config(format!("{name} must not be empty")));
        }
    }
    Ok(())
}

use anyhow::{Context, Result, bail};
use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

/// LLM provider the evaluation service should use for generation and judging.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    #[value(name = "openai")]
    OpenAI,
    #[value(name = "gemini")]
    Gemini,
}

impl Provider {
    /// Wire identifier used in the request body.
    pub fn model_type(self) -> &'static str {
        match self {
            Provider::OpenAI => "openai",
            Provider::Gemini => "gemini",
        }
    }

    /// Fixed catalog of model identifiers recognized for this provider.
    pub fn model_catalog(self) -> &'static [&'static str] {
        match self {
            Provider::OpenAI => &["gpt-4o-mini", "gpt-4-turbo", "gpt-3.5-turbo"],
            Provider::Gemini => &[
                "gemini-2.5-flash",
                "gemini-2.0-flash",
                "gemini-1.5-flash",
                "gemini-1.5-pro",
            ],
        }
    }

    pub fn default_model(self) -> &'static str {
        self.model_catalog()[0]
    }
}

/// Provider/model selection for a single evaluation run.
#[derive(Debug, Clone)]
pub struct EvaluationConfig {
    pub provider: Provider,
    pub model: String,
}

impl EvaluationConfig {
    /// Create a config, rejecting models outside the provider's catalog.
    pub fn new(provider: Provider, model: String) -> Result<Self> {
        if !provider.model_catalog().contains(&model.as_str()) {
            bail!(
                "model '{}' is not available for provider '{}' (choose one of: {})",
                model,
                provider.model_type(),
                provider.model_catalog().join(", ")
            );
        }
        Ok(Self { provider, model })
    }
}

/// Settings for reaching the evaluation service, loadable from a TOML file.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct ServiceConfig {
    /// Evaluation service endpoint
    #[serde(default = "default_endpoint")]
    pub endpoint: String,
    /// Request timeout in seconds. The backend runs a full generation plus
    /// judgment cycle synchronously, so this defaults to tens of seconds.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
    /// Optional OpenAI key override, forwarded as the X-OpenAI-Key header
    #[serde(default)]
    pub openai_api_key: Option<String>,
    /// Optional Google key override, forwarded as the X-Google-Key header
    #[serde(default)]
    pub google_api_key: Option<String>,
}

fn default_endpoint() -> String {
    "http://localhost:8000/evaluate".to_string()
}

fn default_timeout_secs() -> u64 {
    50
}

impl Default for ServiceConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            timeout_secs: default_timeout_secs(),
            openai_api_key: None,
            google_api_key: None,
        }
    }
}

impl ServiceConfig {
    /// Load service settings from a TOML file.
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read config file: {}", path.display()))?;

        toml::from_str(&content)
            .with_context(|| format!("Failed to parse TOML config: {}", path.display()))
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_model_type_mapping() {
        assert_eq!(Provider::OpenAI.model_type(), "openai");
        assert_eq!(Provider::Gemini.model_type(), "gemini");
    }

    #[test]
    fn test_catalog_models_accepted() {
        for provider in [Provider::OpenAI, Provider::Gemini] {
            for model in provider.model_catalog() {
                let config = EvaluationConfig::new(provider, model.to_string()).unwrap();
                assert_eq!(config.model, *model);
            }
        }
    }

    #[test]
    fn test_uncataloged_model_rejected() {
        let result = EvaluationConfig::new(Provider::OpenAI, "gemini-1.5-pro".to_string());
        assert!(result.is_err());
        let message = result.unwrap_err().to_string();
        assert!(message.contains("gemini-1.5-pro"));
        assert!(message.contains("gpt-4o-mini"));
    }

    #[test]
    fn test_default_model_is_in_catalog() {
        for provider in [Provider::OpenAI, Provider::Gemini] {
            assert!(provider.model_catalog().contains(&provider.default_model()));
        }
    }

    #[test]
    fn test_service_config_parsing() {
        let toml_content = r#"
endpoint = "https://eval.example.com/evaluate"
timeout_secs = 90
openai_api_key = "sk-test"
"#;

        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "{}", toml_content).unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.endpoint, "https://eval.example.com/evaluate");
        assert_eq!(config.timeout_secs, 90);
        assert_eq!(config.openai_api_key.as_deref(), Some("sk-test"));
        assert!(config.google_api_key.is_none());
    }

    #[test]
    fn test_service_config_defaults() {
        let mut temp_file = NamedTempFile::new().unwrap();
        write!(temp_file, "").unwrap();

        let config = ServiceConfig::from_file(temp_file.path()).unwrap();
        assert_eq!(config.endpoint, "http://localhost:8000/evaluate");
        assert_eq!(config.timeout(), Duration::from_secs(50));
        assert!(config.openai_api_key.is_none());
        assert!(config.google_api_key.is_none());
    }

    #[test]
    fn test_service_config_missing_file() {
        let result = ServiceConfig::from_file(Path::new("/nonexistent/evalflow.toml"));
        assert!(result.is_err());
        assert!(
            result
                .unwrap_err()
                .to_string()
                .contains("Failed to read config file")
        );
    }
}

//! Bloom configuration types and loading

use eyre::{Context, Result};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// Main Bloom configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Generation service configuration
    pub llm: LlmConfig,

    /// Concurrency limits
    pub concurrency: ConcurrencyConfig,

    /// Reference data location
    pub data: DataConfig,

    /// Prompt template overrides
    pub prompts: PromptsConfig,
}

impl Config {
    /// Load configuration with fallback chain
    pub fn load(config_path: Option<&PathBuf>) -> Result<Self> {
        if let Some(path) = config_path {
            return Self::load_from_file(path).context(format!("Failed to load config from {}", path.display()));
        }

        // Project-local config: ./bloom.yml
        let local_config = PathBuf::from("bloom.yml");
        if local_config.exists() {
            match Self::load_from_file(&local_config) {
                Ok(config) => return Ok(config),
                Err(e) => {
                    tracing::warn!("Failed to load config from {}: {}", local_config.display(), e);
                }
            }
        }

        // User config: ~/.config/bloom/bloom.yml
        if let Some(config_dir) = dirs::config_dir() {
            let user_config = config_dir.join("bloom").join("bloom.yml");
            if user_config.exists() {
                match Self::load_from_file(&user_config) {
                    Ok(config) => return Ok(config),
                    Err(e) => {
                        tracing::warn!("Failed to load config from {}: {}", user_config.display(), e);
                    }
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        Ok(Self::default())
    }

    fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path).context("Failed to read config file")?;
        let config: Self = serde_yaml::from_str(&content).context("Failed to parse config file")?;
        tracing::info!("Loaded config from: {}", path.as_ref().display());
        Ok(config)
    }
}

/// Generation service configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LlmConfig {
    /// Provider name: together, openrouter or openai
    pub provider: String,

    /// Model identifier
    pub model: String,

    /// Environment variable containing the API key
    #[serde(rename = "api-key-env")]
    pub api_key_env: String,

    /// API base URL, provider default when unset
    #[serde(rename = "base-url", skip_serializing_if = "Option::is_none")]
    pub base_url: Option<String>,

    /// Maximum tokens per response
    #[serde(rename = "max-tokens")]
    pub max_tokens: u32,

    /// Request timeout in milliseconds
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for LlmConfig {
    fn default() -> Self {
        Self {
            provider: "together".to_string(),
            model: "meta-llama/Llama-3.3-70B-Instruct-Turbo-Free".to_string(),
            api_key_env: "TOGETHER_API_KEY".to_string(),
            base_url: None,
            max_tokens: 4096,
            timeout_ms: 120_000,
        }
    }
}

impl LlmConfig {
    /// Default endpoint for a provider
    pub fn default_base_url(provider: &str) -> Option<&'static str> {
        match provider {
            "together" => Some("https://api.together.xyz/v1"),
            "openrouter" => Some("https://openrouter.ai/api/v1"),
            "openai" => Some("https://api.openai.com/v1"),
            _ => None,
        }
    }

    /// Read the API key from the environment and resolve the endpoint
    pub fn resolve(&self) -> Result<ResolvedLlmConfig> {
        let api_key = std::env::var(&self.api_key_env).context(format!(
            "LLM API key not found. Set the {} environment variable.",
            self.api_key_env
        ))?;
        self.resolve_with_key(api_key)
    }

    /// Resolve with an already-known API key
    pub fn resolve_with_key(&self, api_key: impl Into<String>) -> Result<ResolvedLlmConfig> {
        let base_url = match &self.base_url {
            Some(url) => url.clone(),
            None => Self::default_base_url(&self.provider)
                .ok_or_else(|| eyre::eyre!("No base-url configured for provider '{}'", self.provider))?
                .to_string(),
        };

        Ok(ResolvedLlmConfig {
            provider: self.provider.clone(),
            model: self.model.clone(),
            api_key: api_key.into(),
            base_url,
            max_tokens: self.max_tokens,
            timeout_ms: self.timeout_ms,
        })
    }
}

/// Fully resolved LLM settings, API key included
#[derive(Clone)]
pub struct ResolvedLlmConfig {
    pub provider: String,
    pub model: String,
    pub api_key: String,
    pub base_url: String,
    pub max_tokens: u32,
    pub timeout_ms: u64,
}

impl std::fmt::Debug for ResolvedLlmConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResolvedLlmConfig")
            .field("provider", &self.provider)
            .field("model", &self.model)
            .field("api_key", &"<redacted>")
            .field("base_url", &self.base_url)
            .field("max_tokens", &self.max_tokens)
            .field("timeout_ms", &self.timeout_ms)
            .finish()
    }
}

/// Concurrency limits
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct ConcurrencyConfig {
    /// Maximum generation calls in flight at once
    #[serde(rename = "max-parallel-calls")]
    pub max_parallel_calls: usize,
}

impl Default for ConcurrencyConfig {
    fn default() -> Self {
        Self { max_parallel_calls: 6 }
    }
}

/// Reference data location
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DataConfig {
    pub dir: PathBuf,
}

impl Default for DataConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("data"),
        }
    }
}

/// Prompt template overrides
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PromptsConfig {
    /// Directory searched for `<name>.pmt` before the built-in templates
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dir: Option<PathBuf>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = Config::default();

        assert_eq!(config.llm.provider, "together");
        assert_eq!(config.llm.api_key_env, "TOGETHER_API_KEY");
        assert_eq!(config.concurrency.max_parallel_calls, 6);
        assert_eq!(config.data.dir, PathBuf::from("data"));
        assert!(config.prompts.dir.is_none());
    }

    #[test]
    fn test_deserialize_config() {
        let yaml = r#"
llm:
  provider: openrouter
  model: meta-llama/llama-3.3-70b-instruct
  api-key-env: OPENROUTER_API_KEY
  max-tokens: 2048
  timeout-ms: 60000

concurrency:
  max-parallel-calls: 2

data:
  dir: /srv/bloom/data

prompts:
  dir: ./prompts
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.provider, "openrouter");
        assert_eq!(config.llm.api_key_env, "OPENROUTER_API_KEY");
        assert_eq!(config.llm.max_tokens, 2048);
        assert_eq!(config.concurrency.max_parallel_calls, 2);
        assert_eq!(config.data.dir, PathBuf::from("/srv/bloom/data"));
        assert_eq!(config.prompts.dir, Some(PathBuf::from("./prompts")));
    }

    #[test]
    fn test_partial_config_uses_defaults() {
        let yaml = r#"
llm:
  model: mixtral
"#;

        let config: Config = serde_yaml::from_str(yaml).unwrap();

        assert_eq!(config.llm.model, "mixtral");
        assert_eq!(config.llm.provider, "together");
        assert_eq!(config.concurrency.max_parallel_calls, 6);
    }

    #[test]
    fn test_resolve_uses_provider_base_url() {
        let config = LlmConfig {
            provider: "openrouter".to_string(),
            ..LlmConfig::default()
        };
        let resolved = config.resolve_with_key("secret").unwrap();
        assert_eq!(resolved.base_url, "https://openrouter.ai/api/v1");
        assert_eq!(resolved.api_key, "secret");
        assert!(!format!("{:?}", resolved).contains("secret"));
    }

    #[test]
    fn test_resolve_explicit_base_url_and_unknown_provider() {
        let config = LlmConfig {
            provider: "local".to_string(),
            ..LlmConfig::default()
        };
        assert!(config.resolve_with_key("k").is_err());

        let config = LlmConfig {
            provider: "local".to_string(),
            base_url: Some("http://localhost:8080/v1".to_string()),
            ..LlmConfig::default()
        };
        assert_eq!(config.resolve_with_key("k").unwrap().base_url, "http://localhost:8080/v1");
    }

    #[test]
    fn test_resolve_missing_env_var() {
        let config = LlmConfig {
            api_key_env: "BLOOM_TEST_KEY_THAT_IS_NEVER_SET".to_string(),
            ..LlmConfig::default()
        };
        let err = config.resolve().unwrap_err();
        assert!(err.to_string().contains("BLOOM_TEST_KEY_THAT_IS_NEVER_SET"));
    }

    #[test]
    fn test_load_explicit_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bloom.yml");
        fs::write(&path, "concurrency:\n  max-parallel-calls: 3\n").unwrap();
        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.concurrency.max_parallel_calls, 3);
    }

    #[test]
    fn test_load_explicit_missing_file_fails() {
        let path = PathBuf::from("/nonexistent/bloom.yml");
        assert!(Config::load(Some(&path)).is_err());
    }
}

use crate::backoff::RetryPolicy;
use crate::errors::{GenerationError, GenerationResult};
use crate::types::GenerationConfig;
use serde::{Deserialize, Serialize};
use std::env;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-09-2025";
pub const DEFAULT_API_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Retry settings as written in the config file
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq)]
pub struct RetrySettings {
    pub retries: u32,
    pub base_delay_ms: u64,
}

impl Default for RetrySettings {
    fn default() -> Self {
        Self {
            retries: 3,
            base_delay_ms: 700,
        }
    }
}

impl RetrySettings {
    pub fn to_policy(&self) -> GenerationResult<RetryPolicy> {
        RetryPolicy::new(self.retries, Duration::from_millis(self.base_delay_ms))
    }
}

/// Configuration struct for MindMirror
#[derive(Debug, Serialize, Deserialize, Clone, Default, PartialEq)]
pub struct MindMirrorConfig {
    pub api_key: Option<String>,
    pub model_name: Option<String>,
    pub api_base_url: Option<String>,
    pub log_level: Option<String>,
    pub retry: Option<RetrySettings>,
    pub report_generation: Option<GenerationConfig>,
    pub chat_generation: Option<GenerationConfig>,
}

impl MindMirrorConfig {
    /// Loads configuration from a file if it exists, otherwise returns the default config
    pub fn load_from_file(path: &Path) -> GenerationResult<Self> {
        if path.exists() {
            let content = fs::read_to_string(path).map_err(|e| {
                GenerationError::ConfigError(format!("Failed to read config file: {}", e))
            })?;

            let config: Self = toml::from_str(&content).map_err(|e| {
                GenerationError::ConfigError(format!("Failed to parse config file: {}", e))
            })?;

            Ok(config)
        } else {
            Ok(Self::default())
        }
    }

    /// Saves configuration to a file
    pub fn save_to_file(&self, path: &Path) -> GenerationResult<()> {
        let content = toml::to_string(self).map_err(|e| {
            GenerationError::ConfigError(format!("Failed to serialize config: {}", e))
        })?;

        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).map_err(|e| {
                GenerationError::ConfigError(format!("Failed to create config directory: {}", e))
            })?;
        }

        fs::write(path, content).map_err(|e| {
            GenerationError::ConfigError(format!("Failed to write config file: {}", e))
        })?;

        Ok(())
    }

    /// Values picked up from the process environment (and a `.env` file, if present)
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        Self {
            api_key: env::var("GEMINI_API_KEY").ok().filter(|k| !k.is_empty()),
            model_name: env::var("MINDMIRROR_MODEL").ok(),
            api_base_url: env::var("MINDMIRROR_API_BASE").ok(),
            log_level: env::var("MINDMIRROR_LOG_LEVEL").ok(),
            ..Self::default()
        }
    }

    /// Default file, then environment
    pub fn load(path: Option<&Path>) -> GenerationResult<Self> {
        let file_config = match path {
            Some(p) => Self::load_from_file(p)?,
            None => Self::load_from_file(&get_default_config_file("mindmirror")?)?,
        };
        Ok(file_config.merge(&Self::from_env()))
    }

    /// Merges this config with another config, preferring values from the other config if present
    pub fn merge(&self, other: &Self) -> Self {
        Self {
            api_key: other.api_key.clone().or_else(|| self.api_key.clone()),
            model_name: other.model_name.clone().or_else(|| self.model_name.clone()),
            api_base_url: other
                .api_base_url
                .clone()
                .or_else(|| self.api_base_url.clone()),
            log_level: other.log_level.clone().or_else(|| self.log_level.clone()),
            retry: other.retry.or(self.retry),
            report_generation: other
                .report_generation
                .clone()
                .or_else(|| self.report_generation.clone()),
            chat_generation: other
                .chat_generation
                .clone()
                .or_else(|| self.chat_generation.clone()),
        }
    }

    /// Checks the values that cannot be defaulted away
    pub fn validate(&self) -> GenerationResult<()> {
        match self.api_key.as_deref() {
            Some(key) if !key.trim().is_empty() => {}
            _ => {
                return Err(GenerationError::ConfigError(
                    "API key is required; set GEMINI_API_KEY or api_key in the config file"
                        .to_string(),
                ))
            }
        }
        self.retry_policy()?;
        Ok(())
    }

    pub fn model_name(&self) -> &str {
        self.model_name.as_deref().unwrap_or(DEFAULT_MODEL)
    }

    pub fn api_base_url(&self) -> &str {
        self.api_base_url
            .as_deref()
            .unwrap_or(DEFAULT_API_BASE_URL)
            .trim_end_matches('/')
    }

    pub fn retry_policy(&self) -> GenerationResult<RetryPolicy> {
        self.retry.unwrap_or_default().to_policy()
    }

    pub fn report_generation(&self) -> GenerationConfig {
        self.report_generation
            .clone()
            .unwrap_or_else(GenerationConfig::report)
    }

    pub fn chat_generation(&self) -> GenerationConfig {
        self.chat_generation
            .clone()
            .unwrap_or_else(GenerationConfig::chat)
    }
}

/// Helper function to get default config directory
pub fn get_default_config_dir(app_name: &str) -> GenerationResult<PathBuf> {
    let home_dir = dirs::home_dir().ok_or_else(|| {
        GenerationError::ConfigError("Could not determine home directory".to_string())
    })?;

    Ok(home_dir.join(".config").join(app_name))
}

/// Helper function to get default config file path
pub fn get_default_config_file(app_name: &str) -> GenerationResult<PathBuf> {
    let config_dir = get_default_config_dir(app_name)?;
    Ok(config_dir.join("config.toml"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn test_missing_file_yields_defaults() {
        let dir = tempdir().unwrap();
        let config = MindMirrorConfig::load_from_file(&dir.path().join("nope.toml")).unwrap();
        assert_eq!(config, MindMirrorConfig::default());
        assert_eq!(config.model_name(), DEFAULT_MODEL);
        assert_eq!(config.retry_policy().unwrap(), RetryPolicy::default());
        assert_eq!(config.report_generation(), GenerationConfig::report());
        assert_eq!(config.chat_generation(), GenerationConfig::chat());
    }

    #[test]
    fn test_save_and_load_round_trip() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let config = MindMirrorConfig {
            api_key: Some("secret".to_string()),
            model_name: Some("gemini-test".to_string()),
            retry: Some(RetrySettings {
                retries: 5,
                base_delay_ms: 250,
            }),
            ..MindMirrorConfig::default()
        };

        config.save_to_file(&path).unwrap();
        let loaded = MindMirrorConfig::load_from_file(&path).unwrap();
        assert_eq!(loaded, config);
        assert_eq!(loaded.retry_policy().unwrap().retries(), 5);
    }

    #[test]
    fn test_parses_generation_overrides() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            r#"
api_key = "k"
api_base_url = "http://localhost:9999/v1beta/"

[chat_generation]
temperature = 0.2
top_p = 0.5
max_output_tokens = 128

[report_generation]
temperature = 0.8
topP = 0.95
topK = 20
maxOutputTokens = 2048
"#,
        )
        .unwrap();

        let config = MindMirrorConfig::load_from_file(&path).unwrap();
        let chat = config.chat_generation();
        assert_eq!(chat.max_output_tokens, 128);
        assert_eq!(chat.top_p, 0.5);
        assert_eq!(chat.top_k, None);
        assert_eq!(config.api_base_url(), "http://localhost:9999/v1beta");
        let report = config.report_generation();
        assert_eq!(report.top_k, Some(20));
        assert_eq!(report.max_output_tokens, 2048);
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "api_key = [").unwrap();
        let err = MindMirrorConfig::load_from_file(&path).unwrap_err();
        assert!(matches!(err, GenerationError::ConfigError(_)));
    }

    #[test]
    fn test_merge_prefers_other() {
        let base = MindMirrorConfig {
            api_key: Some("file-key".to_string()),
            model_name: Some("file-model".to_string()),
            ..MindMirrorConfig::default()
        };
        let overrides = MindMirrorConfig {
            api_key: Some("env-key".to_string()),
            ..MindMirrorConfig::default()
        };

        let merged = base.merge(&overrides);
        assert_eq!(merged.api_key.as_deref(), Some("env-key"));
        assert_eq!(merged.model_name(), "file-model");
    }

    #[test]
    fn test_validate() {
        assert!(MindMirrorConfig::default().validate().is_err());

        let blank = MindMirrorConfig {
            api_key: Some("  ".to_string()),
            ..MindMirrorConfig::default()
        };
        assert!(blank.validate().is_err());

        let zero_retries = MindMirrorConfig {
            api_key: Some("k".to_string()),
            retry: Some(RetrySettings {
                retries: 0,
                base_delay_ms: 700,
            }),
            ..MindMirrorConfig::default()
        };
        assert!(zero_retries.validate().is_err());

        let ok = MindMirrorConfig {
            api_key: Some("k".to_string()),
            ..MindMirrorConfig::default()
        };
        assert!(ok.validate().is_ok());
    }
}

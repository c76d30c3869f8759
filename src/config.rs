use std::path::{Path, PathBuf};
use std::time::Duration;

use log::debug;
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;
use crate::generate::DEFAULT_MODEL;
use crate::pipeline::DEFAULT_LANGUAGES;
use crate::retry::{DEFAULT_INITIAL_DELAY, DEFAULT_MAX_RETRIES, RetryPolicy};
use crate::summarize::DEFAULT_PROMPT;

/// Environment variables checked for the Gemini API key, in order
pub const API_KEY_VARS: [&str; 2] = ["GOOGLE_API_KEY", "GEMINI_API_KEY"];

const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

#[derive(Debug, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub model: Option<String>,
    pub languages: Option<Vec<String>>,
    pub max_retries: Option<u32>,
    pub initial_delay_secs: Option<f64>,
    pub request_timeout_secs: Option<u64>,
    pub prompt: Option<String>,
}

impl Config {
    /// Load config from ~/.config/ytnotes/config.toml if it exists
    pub fn load() -> Result<Self, ConfigError> {
        Self::load_from(&config_path())
    }

    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if path.exists() {
            debug!("Loading config from {}", path.display());
            let content = std::fs::read_to_string(path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            debug!("No config file found at {}", path.display());
            Ok(Config::default())
        }
    }
}

pub fn config_path() -> PathBuf {
    dirs::config_dir()
        .unwrap_or_else(|| PathBuf::from(".config"))
        .join("ytnotes")
        .join("config.toml")
}

/// Values given on the command line; these win over the config file
#[derive(Debug, Default, Clone)]
pub struct Overrides {
    pub model: Option<String>,
    pub languages: Vec<String>,
    pub max_retries: Option<u32>,
    pub initial_delay_secs: Option<f64>,
}

/// Fully resolved settings for a session
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    pub model: String,
    pub languages: Vec<String>,
    pub retry: RetryPolicy,
    pub request_timeout: Duration,
    pub prompt: String,
}

impl Settings {
    pub fn resolve(config: Config, overrides: Overrides) -> Result<Self, ConfigError> {
        let languages = if !overrides.languages.is_empty() {
            overrides.languages
        } else {
            config
                .languages
                .unwrap_or_else(|| DEFAULT_LANGUAGES.iter().map(|s| s.to_string()).collect())
        };
        if languages.is_empty() {
            return Err(ConfigError::Invalid("at least one caption language is required".to_string()));
        }

        let max_retries = overrides
            .max_retries
            .or(config.max_retries)
            .unwrap_or(DEFAULT_MAX_RETRIES);
        if max_retries == 0 {
            return Err(ConfigError::Invalid("max_retries must be at least 1".to_string()));
        }

        let initial_delay = match overrides.initial_delay_secs.or(config.initial_delay_secs) {
            Some(secs) => Duration::try_from_secs_f64(secs)
                .map_err(|_| ConfigError::Invalid(format!("initial delay must be a non-negative number, got {secs}")))?,
            None => DEFAULT_INITIAL_DELAY,
        };

        let request_timeout = match config.request_timeout_secs {
            Some(0) => return Err(ConfigError::Invalid("request_timeout_secs must be at least 1".to_string())),
            Some(secs) => Duration::from_secs(secs),
            None => DEFAULT_REQUEST_TIMEOUT,
        };

        Ok(Settings {
            model: overrides
                .model
                .or(config.model)
                .unwrap_or_else(|| DEFAULT_MODEL.to_string()),
            languages,
            retry: RetryPolicy {
                max_retries,
                initial_delay,
            },
            request_timeout,
            prompt: config.prompt.unwrap_or_else(|| DEFAULT_PROMPT.to_string()),
        })
    }
}

/// Read the API key from the process environment
pub fn api_key() -> Result<String, ConfigError> {
    api_key_from(|name| std::env::var(name).ok())
}

pub fn api_key_from(lookup: impl Fn(&str) -> Option<String>) -> Result<String, ConfigError> {
    API_KEY_VARS
        .iter()
        .filter_map(|&name| lookup(name))
        .map(|key| key.trim().to_string())
        .find(|key| !key.is_empty())
        .ok_or(ConfigError::MissingApiKey(API_KEY_VARS[0]))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_config() {
        let toml_str = r#"
model = "gemini-1.5-flash"
languages = ["de", "en"]
max_retries = 5
initial_delay_secs = 0.5
request_timeout_secs = 30
prompt = "Summarize: "
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.model.as_deref(), Some("gemini-1.5-flash"));
        assert_eq!(config.languages, Some(vec!["de".to_string(), "en".to_string()]));
        assert_eq!(config.max_retries, Some(5));
        assert_eq!(config.initial_delay_secs, Some(0.5));
        assert_eq!(config.request_timeout_secs, Some(30));
        assert_eq!(config.prompt.as_deref(), Some("Summarize: "));
    }

    #[test]
    fn test_parse_empty_config() {
        let config: Config = toml::from_str("").unwrap();
        assert!(config.model.is_none());
        assert!(config.languages.is_none());
    }

    #[test]
    fn test_load_missing_file_is_default() {
        let config = Config::load_from(Path::new("/nonexistent/ytnotes/config.toml")).unwrap();
        assert!(config.max_retries.is_none());
    }

    #[test]
    fn test_resolve_defaults() {
        let settings = Settings::resolve(Config::default(), Overrides::default()).unwrap();
        assert_eq!(settings.model, "gemini-pro");
        assert_eq!(settings.languages, vec!["en", "en-US", "en-GB"]);
        assert_eq!(settings.retry, RetryPolicy::default());
        assert_eq!(settings.prompt, DEFAULT_PROMPT);
    }

    #[test]
    fn test_overrides_beat_config() {
        let config = Config {
            model: Some("from-config".to_string()),
            languages: Some(vec!["fr".to_string()]),
            max_retries: Some(7),
            initial_delay_secs: Some(1.0),
            ..Config::default()
        };
        let overrides = Overrides {
            model: Some("from-cli".to_string()),
            languages: vec!["es".to_string()],
            max_retries: None,
            initial_delay_secs: Some(2.0),
        };
        let settings = Settings::resolve(config, overrides).unwrap();
        assert_eq!(settings.model, "from-cli");
        assert_eq!(settings.languages, vec!["es"]);
        assert_eq!(settings.retry.max_retries, 7);
        assert_eq!(settings.retry.initial_delay, Duration::from_secs(2));
    }

    #[test]
    fn test_resolve_rejects_bad_values() {
        let zero_retries = Overrides {
            max_retries: Some(0),
            ..Overrides::default()
        };
        assert!(matches!(
            Settings::resolve(Config::default(), zero_retries),
            Err(ConfigError::Invalid(_))
        ));

        let negative_delay = Overrides {
            initial_delay_secs: Some(-1.0),
            ..Overrides::default()
        };
        assert!(Settings::resolve(Config::default(), negative_delay).is_err());

        let no_languages = Config {
            languages: Some(vec![]),
            ..Config::default()
        };
        assert!(Settings::resolve(no_languages, Overrides::default()).is_err());
    }

    #[test]
    fn test_resolve_rejects_zero_timeout() {
        let zero_timeout = Config {
            request_timeout_secs: Some(0),
            ..Config::default()
        };
        assert!(matches!(
            Settings::resolve(zero_timeout, Overrides::default()),
            Err(ConfigError::Invalid(_))
        ));

        let short_timeout = Config {
            request_timeout_secs: Some(1),
            ..Config::default()
        };
        let settings = Settings::resolve(short_timeout, Overrides::default()).unwrap();
        assert_eq!(settings.request_timeout, Duration::from_secs(1));
    }

    #[test]
    fn test_api_key_lookup_order() {
        let key = api_key_from(|name| match name {
            "GOOGLE_API_KEY" => Some("google".to_string()),
            "GEMINI_API_KEY" => Some("gemini".to_string()),
            _ => None,
        });
        assert_eq!(key.unwrap(), "google");

        let key = api_key_from(|name| (name == "GEMINI_API_KEY").then(|| "gemini".to_string()));
        assert_eq!(key.unwrap(), "gemini");
    }

    #[test]
    fn test_api_key_missing_or_blank() {
        assert!(matches!(api_key_from(|_| None), Err(ConfigError::MissingApiKey("GOOGLE_API_KEY"))));
        assert!(api_key_from(|_| Some("   ".to_string())).is_err());
    }
}

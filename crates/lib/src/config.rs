//! Configuration types and loading.
//!
//! Config is loaded from a JSON file (e.g. `~/.commentbot/config.json`) and environment.
//! Secrets normally come from the environment (or a `.env` file loaded by the CLI);
//! [`Settings::resolve`] merges both and refuses to continue when a required value is missing.

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Top-level application config.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP listener settings.
    #[serde(default)]
    pub server: ServerConfig,

    /// Completion provider (OpenAI) settings.
    #[serde(default)]
    pub completion: CompletionConfig,

    /// LinkedIn API and webhook settings.
    #[serde(default)]
    pub linkedin: LinkedInConfig,
}

/// Bind address and port for the webhook listener.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServerConfig {
    /// Port for HTTP (default 3000). Overridden by PORT env.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Bind address (default "0.0.0.0"; the platform must reach the webhook).
    #[serde(default = "default_bind")]
    pub bind: String,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompletionConfig {
    /// Overridden by OPENAI_API_KEY env.
    pub api_key: Option<String>,
    /// Completion model id. Overridden by OPENAI_MODEL env.
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: u32,
    /// API root up to and including the version segment. Overridden by OPENAI_BASE_URL env.
    #[serde(default = "default_completion_base_url")]
    pub base_url: String,
    #[serde(default = "default_completion_timeout_secs")]
    pub timeout_secs: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LinkedInConfig {
    /// OAuth access token for the organization page. Overridden by LINKEDIN_ACCESS_TOKEN env.
    pub access_token: Option<String>,
    /// Numeric organization id; replies are posted as `urn:li:organization:<id>`.
    /// Overridden by LINKEDIN_ORGANIZATION_ID env.
    pub organization_id: Option<String>,
    /// App client secret, used as the webhook challenge key. Overridden by LINKEDIN_CLIENT_SECRET env.
    pub client_secret: Option<String>,
    /// Overridden by LINKEDIN_API_BASE env.
    #[serde(default = "default_linkedin_api_base")]
    pub api_base: String,
    #[serde(default = "default_posting_timeout_secs")]
    pub timeout_secs: u64,
}

fn default_port() -> u16 {
    3000
}

fn default_bind() -> String {
    "0.0.0.0".to_string()
}

fn default_model() -> String {
    "gpt-3.5-turbo-instruct".to_string()
}

fn default_max_tokens() -> u32 {
    100
}

fn default_completion_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_completion_timeout_secs() -> u64 {
    30
}

fn default_linkedin_api_base() -> String {
    "https://api.linkedin.com".to_string()
}

fn default_posting_timeout_secs() -> u64 {
    15
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind: default_bind(),
        }
    }
}

impl Default for CompletionConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            model: default_model(),
            max_tokens: default_max_tokens(),
            base_url: default_completion_base_url(),
            timeout_secs: default_completion_timeout_secs(),
        }
    }
}

impl Default for LinkedInConfig {
    fn default() -> Self {
        Self {
            access_token: None,
            organization_id: None,
            client_secret: None,
            api_base: default_linkedin_api_base(),
            timeout_secs: default_posting_timeout_secs(),
        }
    }
}

/// Fully resolved runtime settings: config merged with env, all required secrets present.
#[derive(Debug, Clone)]
pub struct Settings {
    pub bind: String,
    pub port: u16,
    pub openai_api_key: String,
    pub openai_model: String,
    pub openai_base_url: String,
    pub max_tokens: u32,
    pub completion_timeout: Duration,
    pub linkedin_access_token: String,
    pub linkedin_organization_id: String,
    pub linkedin_api_base: String,
    pub webhook_secret: String,
    pub posting_timeout: Duration,
}

impl Settings {
    /// Merge config with process environment.
    pub fn resolve(config: &Config) -> Result<Self> {
        Self::resolve_with(config, |key| std::env::var(key).ok())
    }

    /// Merge config with values from `env`. Env wins over config; blank values count as unset.
    pub fn resolve_with<F>(config: &Config, env: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let lookup = |key: &str| non_empty(env(key));

        let port = match lookup("PORT") {
            Some(p) => p
                .parse::<u16>()
                .with_context(|| format!("invalid PORT value: {}", p))?,
            None => config.server.port,
        };
        let bind = lookup("COMMENTBOT_BIND").unwrap_or_else(|| config.server.bind.trim().to_string());

        let openai_api_key = lookup("OPENAI_API_KEY")
            .or_else(|| non_empty(config.completion.api_key.clone()))
            .context("missing completion API key (set OPENAI_API_KEY or completion.apiKey)")?;
        let linkedin_access_token = lookup("LINKEDIN_ACCESS_TOKEN")
            .or_else(|| non_empty(config.linkedin.access_token.clone()))
            .context("missing LinkedIn access token (set LINKEDIN_ACCESS_TOKEN or linkedin.accessToken)")?;
        let linkedin_organization_id = lookup("LINKEDIN_ORGANIZATION_ID")
            .or_else(|| non_empty(config.linkedin.organization_id.clone()))
            .context(
                "missing LinkedIn organization id (set LINKEDIN_ORGANIZATION_ID or linkedin.organizationId)",
            )?;
        let webhook_secret = lookup("LINKEDIN_CLIENT_SECRET")
            .or_else(|| non_empty(config.linkedin.client_secret.clone()))
            .context("missing LinkedIn client secret (set LINKEDIN_CLIENT_SECRET or linkedin.clientSecret)")?;

        let completion_timeout = positive_secs(config.completion.timeout_secs, "completion.timeoutSecs")?;
        let posting_timeout = positive_secs(config.linkedin.timeout_secs, "linkedin.timeoutSecs")?;

        Ok(Self {
            bind,
            port,
            openai_api_key,
            openai_model: lookup("OPENAI_MODEL").unwrap_or_else(|| config.completion.model.clone()),
            openai_base_url: lookup("OPENAI_BASE_URL")
                .unwrap_or_else(|| config.completion.base_url.clone()),
            max_tokens: config.completion.max_tokens,
            completion_timeout,
            linkedin_access_token,
            linkedin_organization_id,
            linkedin_api_base: lookup("LINKEDIN_API_BASE")
                .unwrap_or_else(|| config.linkedin.api_base.clone()),
            webhook_secret,
            posting_timeout,
        })
    }

    pub fn bind_addr(&self) -> String {
        format!("{}:{}", self.bind, self.port)
    }
}

/// A zero deadline would fail every request.
fn positive_secs(secs: u64, key: &str) -> Result<Duration> {
    if secs == 0 {
        anyhow::bail!("invalid {} value: 0 (must be at least 1 second)", key);
    }
    Ok(Duration::from_secs(secs))
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
}

/// Resolve the webhook secret alone (env LINKEDIN_CLIENT_SECRET overrides config).
/// Used by the CLI challenge helper, which needs no other credentials.
pub fn resolve_webhook_secret(config: &Config) -> Option<String> {
    non_empty(std::env::var("LINKEDIN_CLIENT_SECRET").ok())
        .or_else(|| non_empty(config.linkedin.client_secret.clone()))
}

/// Resolve config path from env or default.
pub fn default_config_path() -> PathBuf {
    std::env::var("COMMENTBOT_CONFIG_PATH")
        .map(PathBuf::from)
        .unwrap_or_else(|_| {
            dirs::home_dir()
                .map(|h| h.join(".commentbot").join("config.json"))
                .unwrap_or_else(|| PathBuf::from("config.json"))
        })
}

/// Load config from the given path, COMMENTBOT_CONFIG_PATH, or the default. Missing file => default config.
pub fn load_config(path: Option<PathBuf>) -> Result<(Config, PathBuf)> {
    let path = path.unwrap_or_else(default_config_path);
    let config = if !path.exists() {
        log::debug!("config file not found, using defaults: {}", path.display());
        Config::default()
    } else {
        let s = std::fs::read_to_string(&path)
            .with_context(|| format!("reading config from {}", path.display()))?;
        serde_json::from_str(&s)
            .with_context(|| format!("parsing config from {}", path.display()))?
    };
    Ok((config, path))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: &[(&str, &str)] = &[
        ("OPENAI_API_KEY", "sk-test"),
        ("LINKEDIN_ACCESS_TOKEN", "li-token"),
        ("LINKEDIN_ORGANIZATION_ID", "12345"),
        ("LINKEDIN_CLIENT_SECRET", "topsecret"),
    ];

    #[test]
    fn default_server_port_and_bind() {
        let s = ServerConfig::default();
        assert_eq!(s.port, 3000);
        assert_eq!(s.bind, "0.0.0.0");
    }

    #[test]
    fn empty_json_uses_defaults() {
        let config: Config = serde_json::from_str("{}").unwrap();
        assert_eq!(config.server.port, 3000);
        assert_eq!(config.completion.max_tokens, 100);
        assert_eq!(config.completion.timeout_secs, 30);
        assert_eq!(config.linkedin.api_base, "https://api.linkedin.com");
        assert_eq!(config.linkedin.timeout_secs, 15);
    }

    #[test]
    fn camel_case_fields_parse() {
        let config: Config = serde_json::from_str(
            r#"{"server":{"port":8080},"linkedin":{"organizationId":"99","clientSecret":"s"},"completion":{"maxTokens":42}}"#,
        )
        .unwrap();
        assert_eq!(config.server.port, 8080);
        assert_eq!(config.linkedin.organization_id.as_deref(), Some("99"));
        assert_eq!(config.linkedin.client_secret.as_deref(), Some("s"));
        assert_eq!(config.completion.max_tokens, 42);
    }

    #[test]
    fn resolve_takes_secrets_from_env() {
        let settings = Settings::resolve_with(&Config::default(), env_from(REQUIRED)).unwrap();
        assert_eq!(settings.openai_api_key, "sk-test");
        assert_eq!(settings.linkedin_organization_id, "12345");
        assert_eq!(settings.webhook_secret, "topsecret");
        assert_eq!(settings.port, 3000);
        assert_eq!(settings.completion_timeout, Duration::from_secs(30));
        assert_eq!(settings.bind_addr(), "0.0.0.0:3000");
    }

    #[test]
    fn resolve_env_overrides_config() {
        let mut config = Config::default();
        config.completion.api_key = Some("from-config".to_string());
        config.server.port = 4000;
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "5050"));
        let settings = Settings::resolve_with(&config, env_from(&pairs)).unwrap();
        assert_eq!(settings.openai_api_key, "sk-test");
        assert_eq!(settings.port, 5050);
    }

    #[test]
    fn resolve_falls_back_to_config_when_env_blank() {
        let mut config = Config::default();
        config.linkedin.client_secret = Some("config-secret".to_string());
        let pairs: Vec<(&str, &str)> = REQUIRED
            .iter()
            .map(|&(k, v)| if k == "LINKEDIN_CLIENT_SECRET" { (k, "  ") } else { (k, v) })
            .collect();
        let settings = Settings::resolve_with(&config, env_from(&pairs)).unwrap();
        assert_eq!(settings.webhook_secret, "config-secret");
    }

    #[test]
    fn resolve_fails_without_required_secret() {
        let pairs: Vec<(&str, &str)> = REQUIRED
            .iter()
            .copied()
            .filter(|(k, _)| *k != "OPENAI_API_KEY")
            .collect();
        let err = Settings::resolve_with(&Config::default(), env_from(&pairs)).unwrap_err();
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn resolve_rejects_bad_port() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("PORT", "not-a-port"));
        assert!(Settings::resolve_with(&Config::default(), env_from(&pairs)).is_err());
    }

    #[test]
    fn resolve_rejects_zero_timeouts() {
        let mut config = Config::default();
        config.completion.timeout_secs = 0;
        let err = Settings::resolve_with(&config, env_from(REQUIRED)).unwrap_err();
        assert!(err.to_string().contains("completion.timeoutSecs"));

        let mut config = Config::default();
        config.linkedin.timeout_secs = 0;
        let err = Settings::resolve_with(&config, env_from(REQUIRED)).unwrap_err();
        assert!(err.to_string().contains("linkedin.timeoutSecs"));
    }

    #[test]
    fn load_config_missing_file_is_default() {
        let path = std::env::temp_dir().join("commentbot-missing-config-does-not-exist.json");
        let (config, used) = load_config(Some(path.clone())).unwrap();
        assert_eq!(used, path);
        assert_eq!(config.server.port, 3000);
    }
}

//! Configuration loading, validation, and management for calagent.
//!
//! Loads configuration from `~/.calagent/config.toml` with environment
//! variable overrides. Validates all settings at startup.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::path::{Path, PathBuf};

/// The root configuration structure.
///
/// Maps directly to `~/.calagent/config.toml`.
#[derive(Clone, Serialize, Deserialize)]
pub struct AppConfig {
    /// API key (can be overridden per-provider)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Default LLM provider
    #[serde(default = "default_provider")]
    pub default_provider: String,

    /// Default model
    #[serde(default = "default_model")]
    pub default_model: String,

    /// Default temperature
    #[serde(default = "default_temperature")]
    pub default_temperature: f32,

    /// Default max tokens per LLM response
    #[serde(default = "default_max_tokens")]
    pub default_max_tokens: u32,

    /// Reasoning loop settings
    #[serde(default)]
    pub agent: AgentConfig,

    /// Gateway configuration
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Calendar service settings
    #[serde(default)]
    pub calendar: CalendarConfig,

    /// Credentials for the calendar service
    #[serde(default)]
    pub credentials: CredentialsConfig,

    /// Provider-specific configurations
    #[serde(default)]
    pub providers: HashMap<String, ProviderConfig>,
}

fn default_provider() -> String {
    "openai".into()
}
fn default_model() -> String {
    "gpt-4o-mini".into()
}
fn default_temperature() -> f32 {
    0.0
}
fn default_max_tokens() -> u32 {
    1024
}

/// Providers served locally that accept requests without a key.
const KEYLESS_PROVIDERS: &[&str] = &["ollama", "vllm", "llamacpp", "llama.cpp"];

/// Redact a secret string for Debug output.
fn redact(s: &Option<String>) -> &'static str {
    match s {
        Some(_) => "[REDACTED]",
        None => "None",
    }
}

impl std::fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppConfig")
            .field("api_key", &redact(&self.api_key))
            .field("default_provider", &self.default_provider)
            .field("default_model", &self.default_model)
            .field("default_temperature", &self.default_temperature)
            .field("default_max_tokens", &self.default_max_tokens)
            .field("agent", &self.agent)
            .field("gateway", &self.gateway)
            .field("calendar", &self.calendar)
            .field("credentials", &self.credentials)
            .field("providers", &self.providers)
            .finish()
    }
}

impl std::fmt::Debug for ProviderConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ProviderConfig")
            .field("api_key", &redact(&self.api_key))
            .field("api_url", &self.api_url)
            .field("default_model", &self.default_model)
            .finish()
    }
}

impl std::fmt::Debug for CredentialsConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CredentialsConfig")
            .field("tenant_id", &self.tenant_id)
            .field("client_id", &self.client_id)
            .field("client_secret", &redact(&self.client_secret))
            .field("access_token", &redact(&self.access_token))
            .field("authority_url", &self.authority_url)
            .finish()
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Model calls allowed per turn before the loop gives up
    #[serde(default = "default_max_steps")]
    pub max_steps: u32,

    /// Upper bound on a single model call
    #[serde(default = "default_model_timeout")]
    pub model_timeout_secs: u64,
}

fn default_max_steps() -> u32 {
    5
}
fn default_model_timeout() -> u64 {
    60
}

impl Default for AgentConfig {
    fn default() -> Self {
        Self {
            max_steps: default_max_steps(),
            model_timeout_secs: default_model_timeout(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GatewayConfig {
    #[serde(default = "default_port")]
    pub port: u16,

    #[serde(default = "default_host")]
    pub host: String,

    /// Origins allowed by CORS (the chat front end)
    #[serde(default = "default_allowed_origins")]
    pub allowed_origins: Vec<String>,
}

fn default_port() -> u16 {
    8000
}
fn default_host() -> String {
    "127.0.0.1".into()
}
fn default_allowed_origins() -> Vec<String> {
    vec!["http://localhost:8501".into()]
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            host: default_host(),
            allowed_origins: default_allowed_origins(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CalendarConfig {
    /// Base URL of the calendar API
    #[serde(default = "default_graph_url")]
    pub graph_url: String,

    /// Mailbox whose free/busy schedule is checked
    #[serde(default = "default_mailbox")]
    pub mailbox: String,

    /// IANA timezone sent with every timestamp
    #[serde(default = "default_timezone")]
    pub timezone: String,

    /// Granularity of the free/busy view
    #[serde(default = "default_availability_interval")]
    pub availability_interval_minutes: u32,

    /// Create meetings as online meetings
    #[serde(default = "default_true")]
    pub online_meeting: bool,

    /// Upper bound on a single calendar request
    #[serde(default = "default_calendar_timeout")]
    pub timeout_secs: u64,
}

fn default_graph_url() -> String {
    "https://graph.microsoft.com/v1.0".into()
}
fn default_mailbox() -> String {
    "me@outlook.com".into()
}
fn default_timezone() -> String {
    "America/Chicago".into()
}
fn default_availability_interval() -> u32 {
    60
}
fn default_calendar_timeout() -> u64 {
    30
}
fn default_true() -> bool {
    true
}

impl Default for CalendarConfig {
    fn default() -> Self {
        Self {
            graph_url: default_graph_url(),
            mailbox: default_mailbox(),
            timezone: default_timezone(),
            availability_interval_minutes: default_availability_interval(),
            online_meeting: true,
            timeout_secs: default_calendar_timeout(),
        }
    }
}

#[derive(Clone, Default, Serialize, Deserialize)]
pub struct CredentialsConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tenant_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_id: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub client_secret: Option<String>,

    /// A ready bearer token; takes precedence over the client credentials
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub access_token: Option<String>,

    /// OAuth authority, defaults to the Microsoft identity platform
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub authority_url: Option<String>,
}

impl CredentialsConfig {
    /// Whether the client-credentials triple is complete.
    pub fn has_client_credentials(&self) -> bool {
        self.tenant_id.is_some() && self.client_id.is_some() && self.client_secret.is_some()
    }
}

#[derive(Clone, Serialize, Deserialize)]
pub struct ProviderConfig {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_url: Option<String>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_model: Option<String>,
}

impl AppConfig {
    /// Load configuration from the default path (~/.calagent/config.toml).
    pub fn load() -> Result<Self, ConfigError> {
        let config_path = Self::config_dir().join("config.toml");
        Self::load_with_env(&config_path)
    }

    /// Load from `path`, then apply environment variable overrides.
    ///
    /// API key lookup order:
    /// - `CALAGENT_API_KEY` (highest priority)
    /// - `OPENAI_API_KEY`
    /// - `OPENROUTER_API_KEY`
    ///
    /// Calendar credentials: `TENANT_ID`, `CLIENT_ID`, `CLIENT_SECRET`,
    /// `GRAPH_ACCESS_TOKEN`.
    pub fn load_with_env(path: &Path) -> Result<Self, ConfigError> {
        let mut config = Self::load_from(path)?;
        config.apply_env(|key| std::env::var(key).ok());
        config.validate()?;
        Ok(config)
    }

    /// Load configuration from a specific file path.
    pub fn load_from(path: &Path) -> Result<Self, ConfigError> {
        if !path.exists() {
            tracing::info!("No config file found at {}, using defaults", path.display());
            return Ok(Self::default());
        }

        let content = std::fs::read_to_string(path).map_err(|e| ConfigError::ReadError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        let config: Self = toml::from_str(&content).map_err(|e| ConfigError::ParseError {
            path: path.to_path_buf(),
            reason: e.to_string(),
        })?;

        config.validate()?;
        Ok(config)
    }

    /// Apply overrides from an environment lookup.
    fn apply_env(&mut self, env: impl Fn(&str) -> Option<String>) {
        if self.api_key.is_none() {
            self.api_key = env("CALAGENT_API_KEY")
                .or_else(|| env("OPENAI_API_KEY"))
                .or_else(|| env("OPENROUTER_API_KEY"));
        }

        if let Some(provider) = env("CALAGENT_PROVIDER") {
            self.default_provider = provider;
        }

        if let Some(model) = env("CALAGENT_MODEL") {
            self.default_model = model;
        }

        let creds = &mut self.credentials;
        if let Some(v) = env("TENANT_ID") {
            creds.tenant_id = Some(v);
        }
        if let Some(v) = env("CLIENT_ID") {
            creds.client_id = Some(v);
        }
        if let Some(v) = env("CLIENT_SECRET") {
            creds.client_secret = Some(v);
        }
        if let Some(v) = env("GRAPH_ACCESS_TOKEN") {
            creds.access_token = Some(v);
        }
    }

    /// Get the configuration directory path.
    pub fn config_dir() -> PathBuf {
        dirs_home().join(".calagent")
    }

    /// Validate the configuration.
    fn validate(&self) -> Result<(), ConfigError> {
        if self.default_temperature < 0.0 || self.default_temperature > 2.0 {
            return Err(ConfigError::ValidationError(
                "default_temperature must be between 0.0 and 2.0".into(),
            ));
        }

        if self.agent.max_steps == 0 {
            return Err(ConfigError::ValidationError(
                "agent.max_steps must be at least 1".into(),
            ));
        }

        if self.agent.model_timeout_secs == 0 || self.calendar.timeout_secs == 0 {
            return Err(ConfigError::ValidationError(
                "timeouts must be greater than zero".into(),
            ));
        }

        Ok(())
    }

    /// Check if the default provider can authenticate.
    ///
    /// A key may come from the top level (config or environment) or from the
    /// provider's own section. Local servers need no key.
    pub fn has_api_key(&self) -> bool {
        if KEYLESS_PROVIDERS.contains(&self.default_provider.as_str()) {
            return true;
        }
        self.api_key.is_some()
            || self
                .providers
                .get(&self.default_provider)
                .is_some_and(|p| p.api_key.is_some())
    }

    /// Generate a default config TOML string.
    pub fn default_toml() -> String {
        let config = Self::default();
        toml::to_string_pretty(&config).unwrap_or_default()
    }
}

impl Default for AppConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            default_provider: default_provider(),
            default_model: default_model(),
            default_temperature: default_temperature(),
            default_max_tokens: default_max_tokens(),
            agent: AgentConfig::default(),
            gateway: GatewayConfig::default(),
            calendar: CalendarConfig::default(),
            credentials: CredentialsConfig::default(),
            providers: HashMap::new(),
        }
    }
}

/// Get the user's home directory.
fn dirs_home() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        std::env::var("USERPROFILE")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("C:\\Users\\Default"))
    }
    #[cfg(not(target_os = "windows"))]
    {
        std::env::var("HOME")
            .map(PathBuf::from)
            .unwrap_or_else(|_| PathBuf::from("/tmp"))
    }
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Failed to read config file at {path}: {reason}")]
    ReadError { path: PathBuf, reason: String },

    #[error("Failed to parse config file at {path}: {reason}")]
    ParseError { path: PathBuf, reason: String },

    #[error("Configuration validation failed: {0}")]
    ValidationError(String),
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn default_config_is_valid() {
        let config = AppConfig::default();
        assert_eq!(config.default_provider, "openai");
        assert_eq!(config.gateway.port, 8000);
        assert_eq!(config.agent.max_steps, 5);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn config_roundtrip_toml() {
        let config = AppConfig::default();
        let toml_str = toml::to_string_pretty(&config).unwrap();
        let parsed: AppConfig = toml::from_str(&toml_str).unwrap();
        assert_eq!(parsed.default_model, config.default_model);
        assert_eq!(parsed.calendar.timezone, "America/Chicago");
    }

    #[test]
    fn invalid_temperature_rejected() {
        let config = AppConfig {
            default_temperature: 5.0,
            ..AppConfig::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn zero_step_budget_rejected() {
        let mut config = AppConfig::default();
        config.agent.max_steps = 0;
        assert!(config.validate().is_err());
    }

    #[test]
    fn missing_config_file_returns_defaults() {
        let config = AppConfig::load_from(Path::new("/nonexistent/config.toml")).unwrap();
        assert_eq!(config.default_provider, "openai");
    }

    #[test]
    fn partial_file_keeps_defaults() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(
            file,
            "default_model = \"gpt-4o\"\n[agent]\nmax_steps = 3\n[calendar]\nmailbox = \"team@example.com\""
        )
        .unwrap();

        let config = AppConfig::load_from(file.path()).unwrap();
        assert_eq!(config.default_model, "gpt-4o");
        assert_eq!(config.agent.max_steps, 3);
        assert_eq!(config.agent.model_timeout_secs, 60);
        assert_eq!(config.calendar.mailbox, "team@example.com");
        assert_eq!(config.calendar.timezone, "America/Chicago");
    }

    #[test]
    fn malformed_file_is_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "default_model = ").unwrap();
        let err = AppConfig::load_from(file.path()).unwrap_err();
        assert!(matches!(err, ConfigError::ParseError { .. }));
    }

    #[test]
    fn env_overrides_apply() {
        let mut config = AppConfig::default();
        config.apply_env(|key| match key {
            "OPENAI_API_KEY" => Some("sk-test".into()),
            "CALAGENT_MODEL" => Some("gpt-4o".into()),
            "TENANT_ID" => Some("tenant".into()),
            "CLIENT_ID" => Some("client".into()),
            "CLIENT_SECRET" => Some("secret".into()),
            _ => None,
        });
        assert_eq!(config.api_key.as_deref(), Some("sk-test"));
        assert_eq!(config.default_model, "gpt-4o");
        assert!(config.credentials.has_client_credentials());
    }

    #[test]
    fn file_api_key_wins_over_env() {
        let mut config = AppConfig {
            api_key: Some("from-file".into()),
            ..AppConfig::default()
        };
        config.apply_env(|key| (key == "OPENAI_API_KEY").then(|| "from-env".to_string()));
        assert_eq!(config.api_key.as_deref(), Some("from-file"));
    }

    #[test]
    fn provider_section_key_counts() {
        let mut config = AppConfig::default();
        assert!(!config.has_api_key());

        config.providers.insert(
            "openai".into(),
            ProviderConfig {
                api_key: Some("sk-section".into()),
                api_url: None,
                default_model: None,
            },
        );
        assert!(config.has_api_key());

        // A key under another provider's section does not help the default.
        config.default_provider = "groq".into();
        assert!(!config.has_api_key());
    }

    #[test]
    fn local_provider_needs_no_key() {
        let mut config = AppConfig::default();
        config.default_provider = "ollama".into();
        assert!(config.api_key.is_none());
        assert!(config.has_api_key());
    }

    #[test]
    fn debug_output_redacts_secrets() {
        let mut config = AppConfig {
            api_key: Some("sk-secret".into()),
            ..AppConfig::default()
        };
        config.credentials.client_secret = Some("very-secret".into());
        let debug = format!("{config:?}");
        assert!(!debug.contains("sk-secret"));
        assert!(!debug.contains("very-secret"));
        assert!(debug.contains("[REDACTED]"));
    }

    #[test]
    fn default_toml_generation() {
        let toml_str = AppConfig::default_toml();
        assert!(toml_str.contains("gpt-4o-mini"));
        assert!(toml_str.contains("8000"));
    }
}

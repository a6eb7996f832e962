use crate::Error;
use reqwest::Url;
use std::fmt;
use std::time::Duration;

pub const DEFAULT_API_VERSION: &str = "2024-10-21";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;
pub const DEFAULT_MAX_TEXT_LENGTH: usize = 16_384;
pub const DEFAULT_PORT: u16 = 8080;

/// Connection settings for the Azure OpenAI deployment.
///
/// Built once at startup and shared read-only afterwards.
#[derive(Clone)]
pub struct AzureOpenAiConfig {
    pub endpoint: Url,
    pub api_key: String,
    pub deployment: String,
    pub api_version: String,
    pub timeout: Duration,
}

impl AzureOpenAiConfig {
    /// Create configuration with the default API version and timeout.
    ///
    /// Fails when the endpoint is not an absolute http(s) URL or when the
    /// key or deployment is blank.
    pub fn new(endpoint: &str, api_key: impl Into<String>, deployment: impl Into<String>) -> Result<Self, Error> {
        let endpoint = parse_endpoint(endpoint)?;
        let api_key = require_non_blank("AZURE_OPENAI_API_KEY", api_key.into())?;
        let deployment = require_non_blank("AZURE_OPENAI_DEPLOYMENT", deployment.into())?;

        Ok(Self {
            endpoint,
            api_key,
            deployment,
            api_version: DEFAULT_API_VERSION.to_string(),
            timeout: Duration::from_secs(DEFAULT_TIMEOUT_SECS),
        })
    }

    pub fn with_api_version(mut self, api_version: impl Into<String>) -> Self {
        self.api_version = api_version.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Create configuration from environment variables.
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Create configuration from an arbitrary key lookup.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let endpoint = lookup("AZURE_OPENAI_ENDPOINT")
            .ok_or_else(|| Error::config("AZURE_OPENAI_ENDPOINT environment variable is required"))?;
        let api_key = lookup("AZURE_OPENAI_API_KEY")
            .ok_or_else(|| Error::config("AZURE_OPENAI_API_KEY environment variable is required"))?;
        let deployment = lookup("AZURE_OPENAI_DEPLOYMENT")
            .ok_or_else(|| Error::config("AZURE_OPENAI_DEPLOYMENT environment variable is required"))?;

        let mut config = Self::new(&endpoint, api_key, deployment)?;

        if let Some(version) = lookup("AZURE_OPENAI_API_VERSION") {
            config = config.with_api_version(require_non_blank("AZURE_OPENAI_API_VERSION", version)?);
        }
        if let Some(secs) = parse_var::<u64>(&lookup, "AZURE_OPENAI_TIMEOUT_SECS")? {
            if secs == 0 {
                return Err(Error::config("AZURE_OPENAI_TIMEOUT_SECS must be greater than zero"));
            }
            config.timeout = Duration::from_secs(secs);
        }

        Ok(config)
    }

    /// Full chat-completions URL for the configured deployment.
    pub fn chat_completions_url(&self) -> String {
        format!(
            "{}/openai/deployments/{}/chat/completions?api-version={}",
            self.endpoint.as_str().trim_end_matches('/'),
            self.deployment,
            self.api_version
        )
    }
}

impl fmt::Debug for AzureOpenAiConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AzureOpenAiConfig")
            .field("endpoint", &self.endpoint.as_str())
            .field("api_key", &"<redacted>")
            .field("deployment", &self.deployment)
            .field("api_version", &self.api_version)
            .field("timeout", &self.timeout)
            .finish()
    }
}

/// Deployment environment. Development mode exposes raw failure text in
/// 500 responses; production never does.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Environment {
    Development,
    #[default]
    Production,
}

impl Environment {
    pub fn parse(value: &str) -> Self {
        match value.trim().to_lowercase().as_str() {
            "development" | "dev" => Environment::Development,
            _ => Environment::Production,
        }
    }

    pub fn is_development(&self) -> bool {
        matches!(self, Environment::Development)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogFormat {
    #[default]
    Text,
    Json,
}

/// Process-wide settings for the HTTP service.
#[derive(Debug, Clone)]
pub struct ServiceConfig {
    pub host: String,
    pub port: u16,
    pub environment: Environment,
    pub max_text_length: usize,
    pub log_level: String,
    pub log_format: LogFormat,
    pub azure: AzureOpenAiConfig,
}

impl ServiceConfig {
    pub fn from_env() -> Result<Self, Error> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    pub fn from_lookup<F>(lookup: F) -> Result<Self, Error>
    where
        F: Fn(&str) -> Option<String>,
    {
        let azure = AzureOpenAiConfig::from_lookup(&lookup)?;

        let host = lookup("HOST").unwrap_or_else(|| "0.0.0.0".to_string());
        let port = parse_var::<u16>(&lookup, "PORT")?.unwrap_or(DEFAULT_PORT);
        let environment = lookup("APP_ENV")
            .map(|value| Environment::parse(&value))
            .unwrap_or_default();
        let max_text_length =
            parse_var::<usize>(&lookup, "MAX_TEXT_LENGTH")?.unwrap_or(DEFAULT_MAX_TEXT_LENGTH);
        if max_text_length == 0 {
            return Err(Error::config("MAX_TEXT_LENGTH must be greater than zero"));
        }
        let log_level = lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string());
        let log_format = match lookup("LOG_FORMAT").as_deref().map(str::trim) {
            Some("json") => LogFormat::Json,
            _ => LogFormat::Text,
        };

        Ok(Self {
            host,
            port,
            environment,
            max_text_length,
            log_level,
            log_format,
            azure,
        })
    }

    /// Log the effective configuration without secrets.
    pub fn log_summary(&self) {
        tracing::info!(
            host = %self.host,
            port = self.port,
            environment = ?self.environment,
            max_text_length = self.max_text_length,
            endpoint = %self.azure.endpoint,
            deployment = %self.azure.deployment,
            api_version = %self.azure.api_version,
            api_key = if self.azure.api_key.is_empty() { "missing" } else { "set" },
            "configuration loaded"
        );
    }
}

fn parse_endpoint(raw: &str) -> Result<Url, Error> {
    let url = Url::parse(raw.trim())
        .map_err(|err| Error::config(format!("AZURE_OPENAI_ENDPOINT is not a valid URL: {err}")))?;
    if !matches!(url.scheme(), "http" | "https") || url.cannot_be_a_base() {
        return Err(Error::config(format!(
            "AZURE_OPENAI_ENDPOINT must be an absolute http(s) URL, got '{raw}'"
        )));
    }
    Ok(url)
}

fn require_non_blank(name: &str, value: String) -> Result<String, Error> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(Error::config(format!("{name} must not be empty")));
    }
    Ok(trimmed.to_string())
}

fn parse_var<T: std::str::FromStr>(
    lookup: &impl Fn(&str) -> Option<String>,
    name: &str,
) -> Result<Option<T>, Error> {
    match lookup(name) {
        Some(raw) => raw
            .trim()
            .parse::<T>()
            .map(Some)
            .map_err(|_| Error::config(format!("{name} has an invalid value '{raw}'"))),
        None => Ok(None),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    const REQUIRED: [(&str, &str); 3] = [
        ("AZURE_OPENAI_ENDPOINT", "https://test.openai.azure.com/"),
        ("AZURE_OPENAI_API_KEY", "test-api-key"),
        ("AZURE_OPENAI_DEPLOYMENT", "test-deployment"),
    ];

    #[test]
    fn test_azure_config_from_lookup() {
        let config = AzureOpenAiConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.deployment, "test-deployment");
        assert_eq!(config.api_version, DEFAULT_API_VERSION);
        assert_eq!(config.timeout, Duration::from_secs(DEFAULT_TIMEOUT_SECS));
        assert_eq!(
            config.chat_completions_url(),
            "https://test.openai.azure.com/openai/deployments/test-deployment/chat/completions?api-version=2024-10-21"
        );
    }

    #[test]
    fn test_api_version_override() {
        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AZURE_OPENAI_API_VERSION", "2025-01-01-preview"));
        let config = AzureOpenAiConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.api_version, "2025-01-01-preview");
        assert!(config.chat_completions_url().ends_with("?api-version=2025-01-01-preview"));

        let mut blank = REQUIRED.to_vec();
        blank.push(("AZURE_OPENAI_API_VERSION", "  "));
        assert!(AzureOpenAiConfig::from_lookup(lookup_from(&blank)).is_err());
    }

    #[test]
    fn test_missing_required_values_fail_fast() {
        for missing in ["AZURE_OPENAI_ENDPOINT", "AZURE_OPENAI_API_KEY", "AZURE_OPENAI_DEPLOYMENT"] {
            let pairs: Vec<_> = REQUIRED.iter().copied().filter(|(k, _)| *k != missing).collect();
            let err = AzureOpenAiConfig::from_lookup(lookup_from(&pairs)).unwrap_err();
            assert!(matches!(err, Error::Config(_)));
            assert!(err.to_string().contains(missing), "{err} should name {missing}");
        }
    }

    #[test]
    fn test_malformed_values_are_rejected() {
        assert!(AzureOpenAiConfig::new("not a url", "key", "dep").is_err());
        assert!(AzureOpenAiConfig::new("ftp://example.com", "key", "dep").is_err());
        assert!(AzureOpenAiConfig::new("https://example.com", "   ", "dep").is_err());
        assert!(AzureOpenAiConfig::new("https://example.com", "key", "").is_err());

        let mut pairs = REQUIRED.to_vec();
        pairs.push(("AZURE_OPENAI_TIMEOUT_SECS", "soon"));
        assert!(AzureOpenAiConfig::from_lookup(lookup_from(&pairs)).is_err());
    }

    #[test]
    fn test_debug_redacts_api_key() {
        let config = AzureOpenAiConfig::new("https://example.com", "super-secret", "dep").unwrap();
        let debug = format!("{config:?}");
        assert!(!debug.contains("super-secret"));
        assert!(debug.contains("<redacted>"));
    }

    #[test]
    fn test_service_config_defaults() {
        let config = ServiceConfig::from_lookup(lookup_from(&REQUIRED)).unwrap();
        assert_eq!(config.host, "0.0.0.0");
        assert_eq!(config.port, DEFAULT_PORT);
        assert_eq!(config.environment, Environment::Production);
        assert_eq!(config.max_text_length, 16_384);
        assert_eq!(config.log_format, LogFormat::Text);
    }

    #[test]
    fn test_service_config_overrides() {
        let mut pairs = REQUIRED.to_vec();
        pairs.extend([
            ("PORT", "9000"),
            ("APP_ENV", "Development"),
            ("MAX_TEXT_LENGTH", "100"),
            ("LOG_FORMAT", "json"),
        ]);
        let config = ServiceConfig::from_lookup(lookup_from(&pairs)).unwrap();
        assert_eq!(config.port, 9000);
        assert!(config.environment.is_development());
        assert_eq!(config.max_text_length, 100);
        assert_eq!(config.log_format, LogFormat::Json);

        let mut bad = REQUIRED.to_vec();
        bad.push(("PORT", "http"));
        assert!(ServiceConfig::from_lookup(lookup_from(&bad)).is_err());
    }
}

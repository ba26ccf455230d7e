use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize, Serializer};
use std::env;
use std::time::Duration;

pub const API_URL: &str = "https://api.bitfinex.com";

/// Default request timeout in milliseconds
pub const BASE_TIMEOUT_MS: u64 = 15_000;

const MAX_TIMEOUT_MS: u64 = 3_600_000;

/// Raw client construction options.
///
/// Every field is optional; [`ClientOptions::resolve`] fills in defaults and
/// produces the immutable [`ClientConfig`] the clients run on.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ClientOptions {
    pub api_key: Option<String>,
    pub api_secret: Option<String>,
    pub auth_token: Option<String>,
    pub url: Option<String>,
    #[serde(rename = "urlV1")]
    pub url_v1: Option<String>,
    pub transform: Option<bool>,
    /// Proxy URL used for every connection, e.g. `socks5://127.0.0.1:9050`
    pub agent: Option<String>,
    /// Request timeout in milliseconds
    pub timeout: Option<u64>,
    pub aff_code: Option<String>,
    pub company: Option<String>,
}

impl ClientOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with_credentials(mut self, api_key: String, api_secret: String) -> Self {
        self.api_key = Some(api_key);
        self.api_secret = Some(api_secret);
        self
    }

    #[must_use]
    pub fn with_auth_token(mut self, auth_token: String) -> Self {
        self.auth_token = Some(auth_token);
        self
    }

    #[must_use]
    pub fn with_url(mut self, url: String) -> Self {
        self.url = Some(url);
        self
    }

    #[must_use]
    pub fn with_url_v1(mut self, url: String) -> Self {
        self.url_v1 = Some(url);
        self
    }

    #[must_use]
    pub const fn with_transform(mut self, transform: bool) -> Self {
        self.transform = Some(transform);
        self
    }

    #[must_use]
    pub fn with_agent(mut self, proxy_url: String) -> Self {
        self.agent = Some(proxy_url);
        self
    }

    #[must_use]
    pub const fn with_timeout(mut self, timeout_ms: u64) -> Self {
        self.timeout = Some(timeout_ms);
        self
    }

    #[must_use]
    pub fn with_aff_code(mut self, aff_code: String) -> Self {
        self.aff_code = Some(aff_code);
        self
    }

    #[must_use]
    pub fn with_company(mut self, company: String) -> Self {
        self.company = Some(company);
        self
    }

    /// Read options from environment variables
    ///
    /// Recognised variables (all optional):
    /// - `{PREFIX}_API_KEY`, `{PREFIX}_API_SECRET`, `{PREFIX}_AUTH_TOKEN`
    /// - `{PREFIX}_URL`, `{PREFIX}_URL_V1`, `{PREFIX}_AGENT`
    /// - `{PREFIX}_TRANSFORM` (`true`/`false`)
    /// - `{PREFIX}_TIMEOUT` (milliseconds)
    /// - `{PREFIX}_AFF_CODE`, `{PREFIX}_COMPANY`
    pub fn from_env(prefix: &str) -> Result<Self, ConfigError> {
        let prefix = prefix.to_uppercase();
        let var = |name: &str| env::var(format!("{}_{}", prefix, name)).ok();

        let transform = match var("TRANSFORM") {
            Some(raw) => Some(raw.parse::<bool>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "{}_TRANSFORM must be true or false, got '{}'",
                    prefix, raw
                ))
            })?),
            None => None,
        };

        let timeout = match var("TIMEOUT") {
            Some(raw) => Some(raw.parse::<u64>().map_err(|_| {
                ConfigError::InvalidConfiguration(format!(
                    "{}_TIMEOUT must be an integer number of milliseconds, got '{}'",
                    prefix, raw
                ))
            })?),
            None => None,
        };

        Ok(Self {
            api_key: var("API_KEY"),
            api_secret: var("API_SECRET"),
            auth_token: var("AUTH_TOKEN"),
            url: var("URL"),
            url_v1: var("URL_V1"),
            transform,
            agent: var("AGENT"),
            timeout,
            aff_code: var("AFF_CODE"),
            company: var("COMPANY"),
        })
    }

    /// Load a `.env` file (if present) and then read options from the environment
    ///
    /// **Security Warning**: Never commit .env files to version control!
    #[cfg(feature = "env-file")]
    pub fn from_env_file(prefix: &str, env_file_path: &str) -> Result<Self, ConfigError> {
        match dotenv::from_path(env_file_path) {
            Ok(()) => {}
            Err(dotenv::Error::Io(io_err)) if io_err.kind() == std::io::ErrorKind::NotFound => {}
            Err(e) => {
                return Err(ConfigError::InvalidConfiguration(format!(
                    "Failed to load .env file '{}': {}",
                    env_file_path, e
                )));
            }
        }

        Self::from_env(prefix)
    }

    /// Apply defaults and validate, producing the immutable client configuration
    pub fn resolve(self) -> Result<ClientConfig, ConfigError> {
        let timeout_ms = self.timeout.unwrap_or(BASE_TIMEOUT_MS);
        if timeout_ms == 0 || timeout_ms > MAX_TIMEOUT_MS {
            return Err(ConfigError::InvalidConfiguration(format!(
                "timeout must be between 1 and {} ms, got {}",
                MAX_TIMEOUT_MS, timeout_ms
            )));
        }

        let url = non_empty(self.url).unwrap_or_else(|| API_URL.to_string());
        let url_v1 = non_empty(self.url_v1).unwrap_or_else(|| url.clone());

        Ok(ClientConfig {
            api_key: Secret::new(self.api_key.unwrap_or_default()),
            api_secret: Secret::new(self.api_secret.unwrap_or_default()),
            auth_token: Secret::new(self.auth_token.unwrap_or_default()),
            url: url.trim_end_matches('/').to_string(),
            url_v1: url_v1.trim_end_matches('/').to_string(),
            transform: self.transform.unwrap_or(false),
            agent: non_empty(self.agent),
            timeout: Duration::from_millis(timeout_ms),
            aff_code: non_empty(self.aff_code),
            company: non_empty(self.company),
        })
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}

/// Fully resolved client configuration, shared read-only by every call
#[derive(Debug, Clone)]
pub struct ClientConfig {
    api_key: Secret<String>,
    api_secret: Secret<String>,
    auth_token: Secret<String>,
    url: String,
    url_v1: String,
    transform: bool,
    agent: Option<String>,
    timeout: Duration,
    aff_code: Option<String>,
    company: Option<String>,
}

// Never expose secrets in serialization
impl Serialize for ClientConfig {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: Serializer,
    {
        use serde::ser::SerializeStruct;
        let redact = |secret: &Secret<String>| {
            if secret.expose_secret().is_empty() {
                ""
            } else {
                "[REDACTED]"
            }
        };

        let mut state = serializer.serialize_struct("ClientConfig", 10)?;
        state.serialize_field("apiKey", redact(&self.api_key))?;
        state.serialize_field("apiSecret", redact(&self.api_secret))?;
        state.serialize_field("authToken", redact(&self.auth_token))?;
        state.serialize_field("url", &self.url)?;
        state.serialize_field("urlV1", &self.url_v1)?;
        state.serialize_field("transform", &self.transform)?;
        state.serialize_field("agent", &self.agent)?;
        state.serialize_field("timeout", &(self.timeout.as_millis() as u64))?;
        state.serialize_field("affCode", &self.aff_code)?;
        state.serialize_field("company", &self.company)?;
        state.end()
    }
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            api_key: Secret::new(String::new()),
            api_secret: Secret::new(String::new()),
            auth_token: Secret::new(String::new()),
            url: API_URL.to_string(),
            url_v1: API_URL.to_string(),
            transform: false,
            agent: None,
            timeout: Duration::from_millis(BASE_TIMEOUT_MS),
            aff_code: None,
            company: None,
        }
    }
}

impl ClientConfig {
    /// True when either a key/secret pair or an auth token is configured
    pub fn has_credentials(&self) -> bool {
        self.has_key_pair() || self.has_auth_token()
    }

    pub fn has_key_pair(&self) -> bool {
        !self.api_key.expose_secret().is_empty() && !self.api_secret.expose_secret().is_empty()
    }

    pub fn has_auth_token(&self) -> bool {
        !self.auth_token.expose_secret().is_empty()
    }

    /// Get API key (use carefully - exposes secret)
    pub fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }

    /// Get API secret (use carefully - exposes secret)
    pub fn api_secret(&self) -> &str {
        self.api_secret.expose_secret()
    }

    /// Get auth token (use carefully - exposes secret)
    pub fn auth_token(&self) -> &str {
        self.auth_token.expose_secret()
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn url_v1(&self) -> &str {
        &self.url_v1
    }

    pub const fn transform(&self) -> bool {
        self.transform
    }

    pub fn agent(&self) -> Option<&str> {
        self.agent.as_deref()
    }

    pub fn uses_agent(&self) -> bool {
        self.agent.is_some()
    }

    pub const fn timeout(&self) -> Duration {
        self.timeout
    }

    pub fn aff_code(&self) -> Option<&str> {
        self.aff_code.as_deref()
    }

    pub fn company(&self) -> Option<&str> {
        self.company.as_deref()
    }
}

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("Invalid configuration: {0}")]
    InvalidConfiguration(String),
}

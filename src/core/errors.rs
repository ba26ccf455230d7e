use thiserror::Error;

/// Remediation text appended to "nonce too small" API failures.
pub const NONCE_TOO_SMALL_HINT: &str =
    "see https://github.com/bitfinexcom/bitfinex-api-node/blob/master/README.md#nonce-too-small for help";

/// API error code the v2 endpoints report for a stale nonce.
pub const NONCE_TOO_SMALL_CODE: i64 = 10114;

pub type BfxResult<T> = Result<T, BfxError>;

#[derive(Error, Debug)]
pub enum BfxError {
    #[error("missing api key or secret")]
    MissingCredentials,

    #[error("Invalid argument: {0}")]
    InvalidArgument(String),

    #[error("Transport failure: {0}")]
    TransportFailure(#[source] Box<dyn std::error::Error + Send + Sync>),

    #[error("{message}")]
    ApiFailure {
        status: u16,
        status_text: String,
        code: Option<i64>,
        response: Option<String>,
        message: String,
    },

    #[error("Malformed response: {0}")]
    MalformedResponse(String),

    #[error("JSON serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Configuration error: {0}")]
    Configuration(#[from] crate::core::config::ConfigError),
}

impl BfxError {
    pub fn transport<E>(err: E) -> Self
    where
        E: std::error::Error + Send + Sync + 'static,
    {
        Self::TransportFailure(Box::new(err))
    }

    /// HTTP status carried by an API failure.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::ApiFailure { status, .. } => Some(*status),
            _ => None,
        }
    }

    /// Numeric error code extracted from the server's error envelope.
    pub fn api_code(&self) -> Option<i64> {
        match self {
            Self::ApiFailure { code, .. } => *code,
            _ => None,
        }
    }

    pub fn is_nonce_too_small(&self) -> bool {
        match self {
            Self::ApiFailure { code, message, .. } => {
                *code == Some(NONCE_TOO_SMALL_CODE) || message.contains(NONCE_TOO_SMALL_HINT)
            }
            _ => false,
        }
    }

    pub fn is_timeout(&self) -> bool {
        match self {
            Self::TransportFailure(source) => source
                .downcast_ref::<reqwest::Error>()
                .is_some_and(reqwest::Error::is_timeout),
            _ => false,
        }
    }
}

use crate::core::kernel::transform::Transformer;
use reqwest::Method;
use serde_json::{Map, Value};
use std::collections::HashMap;
use std::fmt;
use std::time::Duration;

/// Generation of the HTTP API a request targets
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ApiVersion {
    V1,
    V2,
}

impl ApiVersion {
    /// Statuses whose body is handed on for parsing.
    ///
    /// v1 reports structured errors with a 400 body, so 400 is accepted there
    /// and the body decides the outcome.
    pub fn accepts(self, status: u16) -> bool {
        match self {
            Self::V1 => status == 200 || status == 400,
            Self::V2 => (200..300).contains(&status),
        }
    }
}

impl fmt::Display for ApiVersion {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::V1 => write!(f, "v1"),
            Self::V2 => write!(f, "v2"),
        }
    }
}

/// How a request reaches the server
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RequestKind {
    /// GET with filters in the query string
    Public,
    /// POST with a JSON body and no identity
    PublicPost,
    /// Signed POST with a JSON body
    Authenticated,
}

/// Everything one endpoint call hands to the pipeline
#[derive(Clone)]
pub struct Request {
    pub path: String,
    pub payload: Map<String, Value>,
    pub kind: RequestKind,
    pub transformer: Transformer,
}

impl Request {
    pub fn public(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            payload: Map::new(),
            kind: RequestKind::Public,
            transformer: Transformer::None,
        }
    }

    pub fn public_post(path: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            payload,
            kind: RequestKind::PublicPost,
            transformer: Transformer::None,
        }
    }

    pub fn authenticated(path: impl Into<String>, payload: Map<String, Value>) -> Self {
        Self {
            path: path.into(),
            payload,
            kind: RequestKind::Authenticated,
            transformer: Transformer::None,
        }
    }

    #[must_use]
    pub fn with_transformer(mut self, transformer: Transformer) -> Self {
        self.transformer = transformer;
        self
    }

    /// Append URL-encoded query filters to the path, skipping absent values
    #[must_use]
    pub fn with_query(mut self, params: &[(&str, Option<String>)]) -> Self {
        self.path = append_query(&self.path, params);
        self
    }
}

impl fmt::Debug for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Request")
            .field("path", &self.path)
            .field("kind", &self.kind)
            .field("payload_keys", &self.payload.keys().collect::<Vec<_>>())
            .finish_non_exhaustive()
    }
}

/// Append `key=value` pairs to a path, keeping any query it already has
pub fn append_query(path: &str, params: &[(&str, Option<String>)]) -> String {
    let Ok(mut url) = reqwest::Url::parse("http://query.invalid/") else {
        return path.to_string();
    };
    {
        let mut pairs = url.query_pairs_mut();
        for (key, value) in params {
            if let Some(value) = value {
                pairs.append_pair(key, value);
            }
        }
    }
    let encoded = url.query().unwrap_or_default();

    if encoded.is_empty() {
        path.to_string()
    } else if path.contains('?') {
        format!("{}&{}", path, encoded)
    } else {
        format!("{}?{}", path, encoded)
    }
}

/// Fully built HTTP request, ready for a transport
#[derive(Debug, Clone)]
pub struct HttpRequest {
    pub method: Method,
    pub url: String,
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
    pub timeout: Duration,
}

/// Status and body of one HTTP exchange
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawResponse {
    pub status: u16,
    pub status_text: String,
    pub body: String,
}

impl RawResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        let status_text = reqwest::StatusCode::from_u16(status)
            .ok()
            .and_then(|code| code.canonical_reason())
            .unwrap_or_default()
            .to_string();

        Self {
            status,
            status_text,
            body: body.into(),
        }
    }
}

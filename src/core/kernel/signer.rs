use crate::core::errors::{BfxError, BfxResult};
use crate::core::types::ApiVersion;
use base64::engine::general_purpose;
use base64::Engine;
use hmac::{Hmac, Mac};
use secrecy::{ExposeSecret, Secret};
use serde_json::{Map, Value};
use sha2::Sha384;
use std::collections::HashMap;
use std::fmt;

type HmacSha384 = Hmac<Sha384>;

/// Headers and body produced by signing one authenticated request
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SignedRequest {
    pub headers: HashMap<String, String>,
    pub body: Option<String>,
}

pub type SignatureResult = BfxResult<SignedRequest>;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SignatureAlgorithm {
    HmacSha384,
}

impl fmt::Display for SignatureAlgorithm {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::HmacSha384 => write!(f, "HMAC-SHA384"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthSignature {
    pub signature: String,
    pub algorithm: SignatureAlgorithm,
}

/// HMAC-SHA384 over `payload`, hex encoded. Pure function of its inputs.
pub fn sign(secret: &str, payload: &str) -> BfxResult<AuthSignature> {
    let mut mac = HmacSha384::new_from_slice(secret.as_bytes())
        .map_err(|e| BfxError::InvalidArgument(format!("Invalid secret key: {}", e)))?;
    mac.update(payload.as_bytes());

    Ok(AuthSignature {
        signature: hex::encode(mac.finalize().into_bytes()),
        algorithm: SignatureAlgorithm::HmacSha384,
    })
}

/// Payload with every null-valued key removed
pub fn sanitize_payload(payload: &Map<String, Value>) -> Map<String, Value> {
    payload
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

/// The exact string a v2 signature is computed over
pub fn v2_canonical_string(path: &str, nonce: u64, body: &str) -> String {
    format!("/api/v2{}{}{}", path, nonce, body)
}

/// The base64 JSON envelope a v1 signature is computed over
pub fn v1_canonical_payload(
    path: &str,
    nonce: u64,
    params: &Map<String, Value>,
) -> BfxResult<String> {
    let mut envelope = Map::new();
    envelope.insert("request".to_string(), Value::String(format!("/v1/{}", path)));
    envelope.insert("nonce".to_string(), Value::String(nonce.to_string()));
    for (key, value) in params {
        envelope.insert(key.clone(), value.clone());
    }

    let json = serde_json::to_string(&Value::Object(envelope))?;
    Ok(general_purpose::STANDARD.encode(json))
}

/// Signer trait for request authentication
///
/// Implementations turn a path, nonce and sanitized payload into the headers
/// (and body, where the protocol sends one) of an authenticated request.
pub trait Signer: Send + Sync {
    fn sign_request(&self, path: &str, nonce: u64, payload: &Map<String, Value>)
        -> SignatureResult;
}

/// HMAC-SHA384 key/secret signer for both API generations
#[derive(Debug)]
pub struct HmacSigner {
    api_key: Secret<String>,
    api_secret: Secret<String>,
    version: ApiVersion,
}

impl HmacSigner {
    pub fn new(api_key: String, api_secret: String, version: ApiVersion) -> Self {
        Self {
            api_key: Secret::new(api_key),
            api_secret: Secret::new(api_secret),
            version,
        }
    }

    fn sign_v2(&self, path: &str, nonce: u64, payload: &Map<String, Value>) -> SignatureResult {
        let body = serde_json::to_string(payload)?;
        let AuthSignature { signature, .. } =
            sign(self.api_secret.expose_secret(), &v2_canonical_string(path, nonce, &body))?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("bfx-nonce".to_string(), nonce.to_string());
        headers.insert(
            "bfx-apikey".to_string(),
            self.api_key.expose_secret().clone(),
        );
        headers.insert("bfx-signature".to_string(), signature);

        Ok(SignedRequest {
            headers,
            body: Some(body),
        })
    }

    fn sign_v1(&self, path: &str, nonce: u64, payload: &Map<String, Value>) -> SignatureResult {
        let encoded = v1_canonical_payload(path, nonce, payload)?;
        let AuthSignature { signature, .. } = sign(self.api_secret.expose_secret(), &encoded)?;

        let mut headers = HashMap::new();
        headers.insert(
            "X-BFX-APIKEY".to_string(),
            self.api_key.expose_secret().clone(),
        );
        headers.insert("X-BFX-PAYLOAD".to_string(), encoded);
        headers.insert("X-BFX-SIGNATURE".to_string(), signature);

        Ok(SignedRequest {
            headers,
            body: None,
        })
    }
}

impl Signer for HmacSigner {
    fn sign_request(
        &self,
        path: &str,
        nonce: u64,
        payload: &Map<String, Value>,
    ) -> SignatureResult {
        match self.version {
            ApiVersion::V2 => self.sign_v2(path, nonce, payload),
            ApiVersion::V1 => self.sign_v1(path, nonce, payload),
        }
    }
}

/// Bearer-style token signer for v2 (`bfx-token`)
#[derive(Debug)]
pub struct TokenSigner {
    token: Secret<String>,
}

impl TokenSigner {
    pub fn new(token: String) -> Self {
        Self {
            token: Secret::new(token),
        }
    }
}

impl Signer for TokenSigner {
    fn sign_request(
        &self,
        _path: &str,
        nonce: u64,
        payload: &Map<String, Value>,
    ) -> SignatureResult {
        let body = serde_json::to_string(payload)?;

        let mut headers = HashMap::new();
        headers.insert("content-type".to_string(), "application/json".to_string());
        headers.insert("bfx-nonce".to_string(), nonce.to_string());
        headers.insert("bfx-token".to_string(), self.token.expose_secret().clone());

        Ok(SignedRequest {
            headers,
            body: Some(body),
        })
    }
}

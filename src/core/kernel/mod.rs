/// Request pipeline kernel shared by every endpoint method
///
/// The kernel turns a [`Request`](crate::core::types::Request) into a settled
/// result. It knows nothing about individual endpoints: callers hand it a
/// path, a payload and a transformer, and it does the rest.
///
/// # Architecture
///
/// ## Authentication
/// - `NonceGenerator`: strictly increasing nonces (`MonotonicNonce` by default)
/// - `Signer`: pluggable request signing
/// - `HmacSigner`: HMAC-SHA384 key/secret signing for v1 and v2
/// - `TokenSigner`: `bfx-token` authentication for v2
///
/// ## Transport
/// - `Transport`: one HTTP exchange, no retries
/// - `ReqwestTransport`: reqwest implementation with timeout and proxy support
///
/// ## Response handling
/// - `classify`: status/body to JSON or a typed error
/// - `transform`: positional arrays to named-field records
/// - `complete` / `settle`: single settlement point for awaited and callback completion
///
/// # Example
///
/// ```rust,no_run
/// use bfx_rest::core::kernel::*;
/// use bfx_rest::core::config::ClientOptions;
/// use bfx_rest::core::types::ApiVersion;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let config = ClientOptions::new().resolve()?;
/// let transport = ReqwestTransport::new(&config)?;
/// let signer = HmacSigner::new("key".to_string(), "secret".to_string(), ApiVersion::V2);
/// let nonce = MonotonicNonce::new();
///
/// let signed = signer.sign_request("/auth/r/wallets", nonce.next_nonce(), &Default::default())?;
/// assert!(signed.headers.contains_key("bfx-signature"));
/// # let _ = transport;
/// # Ok(())
/// # }
/// ```
pub mod classify;
pub mod dispatch;
pub mod nonce;
pub mod rest;
pub mod signer;
pub mod transform;

// Re-export key types for convenience
pub use classify::{classify, parse_error_envelope, ErrorEnvelope};
pub use dispatch::{complete, settle, LegacyCallback};
pub use nonce::{MonotonicNonce, NonceGenerator};
pub use rest::{ReqwestTransport, Transport, TransportBuilder, TransportConfig};
pub use signer::{
    sanitize_payload, sign, AuthSignature, HmacSigner, SignatureAlgorithm, SignatureResult,
    SignedRequest, Signer, TokenSigner,
};
pub use transform::{build_records, transform, RecordBuilder, TransformFn, Transformer};

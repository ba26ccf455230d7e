use crate::core::config::ClientConfig;
use crate::core::errors::{BfxError, BfxResult};
use crate::core::kernel::{
    classify, sanitize_payload, settle, HmacSigner, LegacyCallback, NonceGenerator,
    ReqwestTransport, Signer, Transport,
};
use crate::core::types::{ApiVersion, HttpRequest};
use reqwest::Method;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the legacy v1 HTTP API
///
/// Authenticated calls are POSTs carrying the signed base64 envelope in
/// headers and no body. Only key/secret credentials are supported.
pub struct RestV1<T: Transport = ReqwestTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    nonce: Arc<dyn NonceGenerator>,
    signer: Option<Arc<dyn Signer>>,
}

impl<T: Transport> Clone for RestV1<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            nonce: Arc::clone(&self.nonce),
            signer: self.signer.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for RestV1<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestV1")
            .field("url", &self.config.url_v1())
            .field("authenticated", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RestV1<T> {
    pub(crate) fn from_parts(
        config: Arc<ClientConfig>,
        transport: Arc<T>,
        nonce: Arc<dyn NonceGenerator>,
    ) -> Self {
        let signer: Option<Arc<dyn Signer>> = config.has_key_pair().then(|| {
            Arc::new(HmacSigner::new(
                config.api_key().to_string(),
                config.api_secret().to_string(),
                ApiVersion::V1,
            )) as Arc<dyn Signer>
        });

        Self {
            config,
            transport,
            nonce,
            signer,
        }
    }

    pub fn url(&self) -> &str {
        self.config.url_v1()
    }

    /// Signed POST to `/v1/{path}`
    #[instrument(skip(self, params), fields(path = %path))]
    pub async fn make_request(&self, path: &str, params: Map<String, Value>) -> BfxResult<Value> {
        let signer = self.signer.as_ref().ok_or(BfxError::MissingCredentials)?;
        let signed =
            signer.sign_request(path, self.nonce.next_nonce(), &sanitize_payload(&params))?;

        self.send(Method::POST, path, signed.headers, signed.body)
            .await
    }

    /// Unsigned GET of `/v1/{path}`
    #[instrument(skip(self), fields(path = %path))]
    pub async fn make_public_request(&self, path: &str) -> BfxResult<Value> {
        self.send(Method::GET, path, HashMap::new(), None).await
    }

    async fn send(
        &self,
        method: Method,
        path: &str,
        headers: HashMap<String, String>,
        body: Option<String>,
    ) -> BfxResult<Value> {
        let url = format!("{}/v1/{}", self.config.url_v1(), path);
        debug!("{} {}", method, url);

        let raw = self
            .transport
            .send(HttpRequest {
                method,
                url,
                headers,
                body,
                timeout: self.config.timeout(),
            })
            .await?;

        classify(ApiVersion::V1, raw)
    }

    /// Run any v1 call and also report its outcome to a legacy callback
    pub async fn with_callback<F>(
        &self,
        call: F,
        callback: Option<LegacyCallback<'_, Value>>,
    ) -> BfxResult<Value>
    where
        F: std::future::Future<Output = BfxResult<Value>>,
    {
        settle(call, callback).await
    }

    pub async fn ticker(&self, symbol: &str) -> BfxResult<Value> {
        self.make_public_request(&format!("pubticker/{}", symbol))
            .await
    }

    pub async fn stats(&self, symbol: &str) -> BfxResult<Value> {
        self.make_public_request(&format!("stats/{}", symbol)).await
    }

    pub async fn symbols(&self) -> BfxResult<Value> {
        self.make_public_request("symbols").await
    }

    pub async fn symbols_details(&self) -> BfxResult<Value> {
        self.make_public_request("symbols_details").await
    }

    pub async fn account_infos(&self) -> BfxResult<Value> {
        self.make_request("account_infos", Map::new()).await
    }

    pub async fn wallet_balances(&self) -> BfxResult<Value> {
        self.make_request("balances", Map::new()).await
    }

    pub async fn new_order(&self, order: &LegacyOrderRequest) -> BfxResult<Value> {
        self.make_request("order/new", order.to_params()?).await
    }

    pub async fn cancel_order(&self, order_id: u64) -> BfxResult<Value> {
        self.make_request("order/cancel", params(json!({ "order_id": order_id })))
            .await
    }

    pub async fn order_status(&self, order_id: u64) -> BfxResult<Value> {
        self.make_request("order/status", params(json!({ "order_id": order_id })))
            .await
    }

    pub async fn active_orders(&self) -> BfxResult<Value> {
        self.make_request("orders", Map::new()).await
    }

    pub async fn active_positions(&self) -> BfxResult<Value> {
        self.make_request("positions", Map::new()).await
    }
}

fn params(value: Value) -> Map<String, Value> {
    match value {
        Value::Object(map) => map,
        _ => Map::new(),
    }
}

/// `order/new` parameters
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LegacyOrderRequest {
    pub symbol: String,
    pub amount: String,
    pub price: String,
    pub exchange: String,
    /// `buy` or `sell`
    pub side: String,
    #[serde(rename = "type")]
    pub order_type: String,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub is_hidden: bool,
    #[serde(skip_serializing_if = "std::ops::Not::not", default)]
    pub post_only: bool,
}

impl LegacyOrderRequest {
    pub fn exchange_limit(
        symbol: impl Into<String>,
        amount: impl ToString,
        price: impl ToString,
        side: impl Into<String>,
    ) -> Self {
        Self {
            symbol: symbol.into(),
            amount: amount.to_string(),
            price: price.to_string(),
            exchange: "bitfinex".to_string(),
            side: side.into(),
            order_type: "exchange limit".to_string(),
            is_hidden: false,
            post_only: false,
        }
    }

    #[must_use]
    pub const fn hidden(mut self) -> Self {
        self.is_hidden = true;
        self
    }

    #[must_use]
    pub const fn post_only(mut self) -> Self {
        self.post_only = true;
        self
    }

    fn to_params(&self) -> BfxResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(map) => Ok(map),
            other => Err(BfxError::InvalidArgument(format!(
                "order parameters are not an object: {}",
                other
            ))),
        }
    }
}

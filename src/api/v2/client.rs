use crate::api::v1::RestV1;
use crate::core::config::ClientConfig;
use crate::core::errors::{BfxError, BfxResult};
use crate::core::kernel::{
    classify, sanitize_payload, settle, transform, HmacSigner, LegacyCallback, NonceGenerator,
    ReqwestTransport, Signer, TokenSigner, Transport,
};
use crate::core::types::{ApiVersion, HttpRequest, Request, RequestKind};
use reqwest::Method;
use serde_json::Value;
use std::collections::HashMap;
use std::sync::Arc;
use tracing::{debug, instrument};

/// Client for the v2 HTTP API
///
/// Every endpoint method builds a [`Request`] and runs it through
/// [`RestV2::execute`]: sign (authenticated calls only), send, classify,
/// transform. Clones share configuration, transport and nonce generator.
pub struct RestV2<T: Transport = ReqwestTransport> {
    config: Arc<ClientConfig>,
    transport: Arc<T>,
    nonce: Arc<dyn NonceGenerator>,
    signer: Option<Arc<dyn Signer>>,
    v1: RestV1<T>,
}

impl<T: Transport> Clone for RestV2<T> {
    fn clone(&self) -> Self {
        Self {
            config: Arc::clone(&self.config),
            transport: Arc::clone(&self.transport),
            nonce: Arc::clone(&self.nonce),
            signer: self.signer.clone(),
            v1: self.v1.clone(),
        }
    }
}

impl<T: Transport> std::fmt::Debug for RestV2<T> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestV2")
            .field("url", &self.config.url())
            .field("transform", &self.config.transform())
            .field("authenticated", &self.signer.is_some())
            .finish_non_exhaustive()
    }
}

impl<T: Transport> RestV2<T> {
    pub(crate) fn from_parts(
        config: Arc<ClientConfig>,
        transport: Arc<T>,
        nonce: Arc<dyn NonceGenerator>,
    ) -> Self {
        // a token wins over a key pair
        let signer: Option<Arc<dyn Signer>> = if config.has_auth_token() {
            Some(Arc::new(TokenSigner::new(config.auth_token().to_string())))
        } else if config.has_key_pair() {
            Some(Arc::new(HmacSigner::new(
                config.api_key().to_string(),
                config.api_secret().to_string(),
                ApiVersion::V2,
            )))
        } else {
            None
        };

        let v1 = RestV1::from_parts(
            Arc::clone(&config),
            Arc::clone(&transport),
            Arc::clone(&nonce),
        );

        Self {
            config,
            transport,
            nonce,
            signer,
            v1,
        }
    }

    /// Base URL requests are issued against
    pub fn url(&self) -> &str {
        self.config.url()
    }

    pub fn uses_agent(&self) -> bool {
        self.config.uses_agent()
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// The v1 client sharing this client's configuration, transport and nonces
    pub fn legacy(&self) -> &RestV1<T> {
        &self.v1
    }

    /// Run one request through the pipeline
    #[instrument(skip(self, request), fields(path = %request.path, kind = ?request.kind))]
    pub async fn execute(&self, request: Request) -> BfxResult<Value> {
        let http = self.prepare(&request)?;
        debug!("{} {}", http.method, http.url);

        let raw = self.transport.send(http).await?;
        let data = classify(ApiVersion::V2, raw)?;

        transform(data, &request.transformer, self.config.transform())
    }

    /// [`RestV2::execute`], also reporting the outcome to a legacy callback
    pub async fn execute_with_callback(
        &self,
        request: Request,
        callback: Option<LegacyCallback<'_, Value>>,
    ) -> BfxResult<Value> {
        settle(self.execute(request), callback).await
    }

    /// Run any endpoint call and also report its outcome to a legacy callback
    ///
    /// ```rust,no_run
    /// # async fn example(rest: bfx_rest::api::RestV2) {
    /// let result = rest
    ///     .with_callback(
    ///         rest.ticker("tBTCUSD"),
    ///         Some(Box::new(|err, ticker| println!("{:?} {:?}", err, ticker))),
    ///     )
    ///     .await;
    /// # let _ = result;
    /// # }
    /// ```
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

    /// Build the HTTP request; fails before any I/O when credentials are missing
    fn prepare(&self, request: &Request) -> BfxResult<HttpRequest> {
        let url = format!("{}/v2{}", self.config.url(), request.path);

        let (method, headers, body) = match request.kind {
            RequestKind::Public => (Method::GET, HashMap::new(), None),
            RequestKind::PublicPost => {
                let body = serde_json::to_string(&sanitize_payload(&request.payload))?;
                let mut headers = HashMap::new();
                headers.insert("content-type".to_string(), "application/json".to_string());
                (Method::POST, headers, Some(body))
            }
            RequestKind::Authenticated => {
                let signer = self.signer.as_ref().ok_or(BfxError::MissingCredentials)?;
                let payload = sanitize_payload(&request.payload);
                let signed =
                    signer.sign_request(&request.path, self.nonce.next_nonce(), &payload)?;
                (Method::POST, signed.headers, signed.body)
            }
        };

        Ok(HttpRequest {
            method,
            url,
            headers,
            body,
            timeout: self.config.timeout(),
        })
    }

    pub(crate) fn transform_enabled(&self) -> bool {
        self.config.transform()
    }
}

use crate::core::config::ClientConfig;
use crate::core::errors::{BfxError, BfxResult};
use crate::core::types::{HttpRequest, RawResponse};
use async_trait::async_trait;
use reqwest::{Client, Proxy};
use std::time::Duration;
use tracing::{instrument, trace};

/// Issues one HTTP exchange and reports its status and body
///
/// No retries; redirects follow the underlying HTTP stack's defaults. Any
/// failure to obtain a response is a `TransportFailure`.
#[async_trait]
pub trait Transport: Send + Sync {
    async fn send(&self, request: HttpRequest) -> BfxResult<RawResponse>;
}

/// Configuration for the reqwest transport
#[derive(Clone, Debug)]
pub struct TransportConfig {
    /// Default timeout, overridden per request
    pub timeout: Duration,
    /// Proxy URL applied to every connection
    pub proxy: Option<String>,
    /// User agent string to include in requests
    pub user_agent: String,
}

impl TransportConfig {
    pub fn new(timeout: Duration) -> Self {
        Self {
            timeout,
            proxy: None,
            user_agent: concat!("bfx-rest/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }

    pub fn from_client_config(config: &ClientConfig) -> Self {
        let mut transport = Self::new(config.timeout());
        transport.proxy = config.agent().map(str::to_string);
        transport
    }

    /// Route every connection through a proxy
    pub fn with_proxy(mut self, proxy: String) -> Self {
        self.proxy = Some(proxy);
        self
    }
}

/// Builder for the reqwest transport
pub struct TransportBuilder {
    config: TransportConfig,
}

impl TransportBuilder {
    pub fn new(config: TransportConfig) -> Self {
        Self { config }
    }

    pub fn build(self) -> BfxResult<ReqwestTransport> {
        let mut builder = Client::builder()
            .timeout(self.config.timeout)
            .user_agent(&self.config.user_agent);

        if let Some(proxy) = &self.config.proxy {
            let proxy = Proxy::all(proxy).map_err(|e| {
                BfxError::InvalidArgument(format!("Invalid proxy URL '{}': {}", proxy, e))
            })?;
            builder = builder.proxy(proxy);
        }

        let client = builder.build().map_err(BfxError::transport)?;

        Ok(ReqwestTransport {
            client,
            config: self.config,
        })
    }
}

/// Implementation of `Transport` using reqwest
#[derive(Clone)]
pub struct ReqwestTransport {
    client: Client,
    config: TransportConfig,
}

impl std::fmt::Debug for ReqwestTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ReqwestTransport")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl ReqwestTransport {
    pub fn new(config: &ClientConfig) -> BfxResult<Self> {
        TransportBuilder::new(TransportConfig::from_client_config(config)).build()
    }

    pub fn uses_proxy(&self) -> bool {
        self.config.proxy.is_some()
    }
}

#[async_trait]
impl Transport for ReqwestTransport {
    #[instrument(skip(self, request), fields(method = %request.method, url = %request.url))]
    async fn send(&self, request: HttpRequest) -> BfxResult<RawResponse> {
        let mut builder = self
            .client
            .request(request.method, &request.url)
            .timeout(request.timeout);

        for (key, value) in &request.headers {
            builder = builder.header(key, value);
        }

        if let Some(body) = request.body {
            builder = builder.body(body);
        }

        let response = builder.send().await.map_err(BfxError::transport)?;
        let status = response.status();
        let body = response.text().await.map_err(BfxError::transport)?;

        trace!(status = status.as_u16(), "Response body: {}", body);

        Ok(RawResponse {
            status: status.as_u16(),
            status_text: status.canonical_reason().unwrap_or_default().to_string(),
            body,
        })
    }
}

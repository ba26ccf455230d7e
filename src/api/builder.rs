use crate::api::v1::RestV1;
use crate::api::v2::RestV2;
use crate::core::config::{ClientConfig, ClientOptions};
use crate::core::errors::BfxResult;
use crate::core::kernel::{MonotonicNonce, NonceGenerator, ReqwestTransport, Transport};
use std::sync::Arc;

/// Resolves options once and assembles v1/v2 clients from them
///
/// ```rust,no_run
/// use bfx_rest::api::ClientBuilder;
/// use bfx_rest::core::config::ClientOptions;
///
/// # fn example() -> Result<(), bfx_rest::core::errors::BfxError> {
/// let rest = ClientBuilder::new(ClientOptions::new().with_transform(true)).build_v2()?;
/// assert_eq!(rest.url(), "https://api.bitfinex.com");
/// # Ok(())
/// # }
/// ```
pub struct ClientBuilder {
    options: ClientOptions,
    nonce: Option<Arc<dyn NonceGenerator>>,
}

impl ClientBuilder {
    pub fn new(options: ClientOptions) -> Self {
        Self {
            options,
            nonce: None,
        }
    }

    /// Replace the default microsecond clock, e.g. with a counter shared
    /// between processes using the same key
    #[must_use]
    pub fn with_nonce_generator<N>(mut self, nonce: N) -> Self
    where
        N: NonceGenerator + 'static,
    {
        self.nonce = Some(Arc::new(nonce));
        self
    }

    fn into_parts(self) -> BfxResult<(Arc<ClientConfig>, Arc<dyn NonceGenerator>)> {
        let config = Arc::new(self.options.resolve()?);
        let nonce = self
            .nonce
            .unwrap_or_else(|| Arc::new(MonotonicNonce::new()));
        Ok((config, nonce))
    }

    pub fn build_v2(self) -> BfxResult<RestV2> {
        let (config, nonce) = self.into_parts()?;
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(RestV2::from_parts(config, transport, nonce))
    }

    /// Build over a caller-supplied transport
    pub fn build_v2_with_transport<T: Transport>(self, transport: T) -> BfxResult<RestV2<T>> {
        let (config, nonce) = self.into_parts()?;
        Ok(RestV2::from_parts(config, Arc::new(transport), nonce))
    }

    pub fn build_v1(self) -> BfxResult<RestV1> {
        let (config, nonce) = self.into_parts()?;
        let transport = Arc::new(ReqwestTransport::new(&config)?);
        Ok(RestV1::from_parts(config, transport, nonce))
    }

    pub fn build_v1_with_transport<T: Transport>(self, transport: T) -> BfxResult<RestV1<T>> {
        let (config, nonce) = self.into_parts()?;
        Ok(RestV1::from_parts(config, Arc::new(transport), nonce))
    }
}

/// Build a v2 client over the default reqwest transport
pub fn build_client(options: ClientOptions) -> BfxResult<RestV2> {
    ClientBuilder::new(options).build_v2()
}

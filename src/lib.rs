pub mod api;
pub mod core;

pub use api::{ClientBuilder, RestV1, RestV2};
pub use core::config::{ClientConfig, ClientOptions};
pub use core::errors::{BfxError, BfxResult};
pub use core::kernel::{LegacyCallback, MonotonicNonce, NonceGenerator, Transformer, Transport};
pub use core::types::{ApiVersion, Request};

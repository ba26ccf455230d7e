#![allow(dead_code)]

use async_trait::async_trait;
use bfx_rest::api::{ClientBuilder, RestV1, RestV2};
use bfx_rest::core::config::ClientOptions;
use bfx_rest::core::errors::{BfxError, BfxResult};
use bfx_rest::core::kernel::Transport;
use bfx_rest::core::types::{HttpRequest, RawResponse};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

pub const TEST_URL: &str = "http://bfx.test";
pub const TEST_URL_V1: &str = "http://bfx-v1.test";
pub const TEST_KEY: &str = "test_api_key";
pub const TEST_SECRET: &str = "test_secret_key";

enum Scripted {
    Response(RawResponse),
    Failure(String),
}

/// In-memory transport: replays scripted responses and records every request
#[derive(Clone, Default)]
pub struct MockTransport {
    script: Arc<Mutex<VecDeque<Scripted>>>,
    requests: Arc<Mutex<Vec<HttpRequest>>>,
}

impl MockTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Queue a response with the given status and body
    pub fn respond(&self, status: u16, body: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Response(RawResponse::new(status, body)));
        self
    }

    /// Queue a connection-level failure
    pub fn fail(&self, reason: &str) -> &Self {
        self.script
            .lock()
            .unwrap()
            .push_back(Scripted::Failure(reason.to_string()));
        self
    }

    pub fn call_count(&self) -> usize {
        self.requests.lock().unwrap().len()
    }

    pub fn requests(&self) -> Vec<HttpRequest> {
        self.requests.lock().unwrap().clone()
    }

    pub fn last_request(&self) -> HttpRequest {
        self.requests
            .lock()
            .unwrap()
            .last()
            .cloned()
            .expect("no request was sent")
    }
}

#[async_trait]
impl Transport for MockTransport {
    async fn send(&self, request: HttpRequest) -> BfxResult<RawResponse> {
        self.requests.lock().unwrap().push(request);

        match self.script.lock().unwrap().pop_front() {
            Some(Scripted::Response(raw)) => Ok(raw),
            Some(Scripted::Failure(reason)) => Err(BfxError::transport(std::io::Error::new(
                std::io::ErrorKind::ConnectionRefused,
                reason,
            ))),
            None => Err(BfxError::transport(std::io::Error::new(
                std::io::ErrorKind::Other,
                "unexpected request",
            ))),
        }
    }
}

pub fn with_credentials(options: ClientOptions) -> ClientOptions {
    options.with_credentials(TEST_KEY.to_string(), TEST_SECRET.to_string())
}

/// Nonces 1, 2, 3, ... so signatures are reproducible
pub fn counter_nonce() -> impl Fn() -> u64 + Send + Sync + 'static {
    let counter = Arc::new(AtomicU64::new(0));
    move || counter.fetch_add(1, Ordering::SeqCst) + 1
}

pub fn v2_client(options: ClientOptions, transport: &MockTransport) -> RestV2<MockTransport> {
    ClientBuilder::new(
        options
            .with_url(TEST_URL.to_string())
            .with_url_v1(TEST_URL_V1.to_string()),
    )
    .with_nonce_generator(counter_nonce())
    .build_v2_with_transport(transport.clone())
    .expect("failed to build v2 client")
}

pub fn v1_client(options: ClientOptions, transport: &MockTransport) -> RestV1<MockTransport> {
    ClientBuilder::new(options.with_url_v1(TEST_URL_V1.to_string()))
        .with_nonce_generator(counter_nonce())
        .build_v1_with_transport(transport.clone())
        .expect("failed to build v1 client")
}

/// A 21-field funding offer row
pub fn funding_offer_row(id: u64, symbol: &str, rate: f64, period: u32) -> serde_json::Value {
    serde_json::json!([
        id, symbol, 1_573_912_039_000_u64, 1_573_912_039_000_u64, 1000.0, 1000.0, "LIMIT",
        null, null, 0, "ACTIVE", null, null, null, rate, period, 0, 0, null, 0, 0
    ])
}

mod common;

use bfx_rest::api::models::FUNDING_OFFER;
use bfx_rest::core::config::ClientOptions;
use bfx_rest::core::errors::{BfxError, NONCE_TOO_SMALL_HINT};
use bfx_rest::core::kernel::signer::{sign, v2_canonical_string};
use bfx_rest::core::kernel::{LegacyCallback, Transformer};
use bfx_rest::core::types::Request;
use common::{funding_offer_row, v2_client, with_credentials, MockTransport, TEST_KEY, TEST_SECRET};
use reqwest::Method;
use serde_json::{json, Map, Value};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

const TICKER_BODY: &str = "[1765.3,0.568,1767.6,1.3874,-62.2,-0.034,1765.3,14063.5,1834.2,1726.3]";

#[cfg(test)]
mod scenarios {
    use super::*;

    #[tokio::test]
    async fn test_missing_credentials_makes_no_network_call() {
        let transport = MockTransport::new();
        let rest = v2_client(ClientOptions::new(), &transport);

        let result = rest.wallets().await;

        assert!(matches!(result, Err(BfxError::MissingCredentials)));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_untransformed_ticker_is_returned_as_parsed() {
        let transport = MockTransport::new();
        transport.respond(200, TICKER_BODY);
        let rest = v2_client(ClientOptions::new().with_transform(false), &transport);

        let result = rest.ticker("tBTCUSD").await.unwrap();

        let expected: Value = serde_json::from_str(TICKER_BODY).unwrap();
        assert_eq!(result, expected);
        assert_eq!(transport.last_request().url, "http://bfx.test/v2/ticker/tBTCUSD");
    }

    #[tokio::test]
    async fn test_server_error_preserves_status() {
        let transport = MockTransport::new();
        transport.respond(500, "Internal Server Error");
        let rest = v2_client(ClientOptions::new(), &transport);

        let err = rest.status().await.unwrap_err();

        assert_eq!(err.status(), Some(500));
        match err {
            BfxError::ApiFailure {
                status_text,
                response,
                code,
                ..
            } => {
                assert_eq!(status_text, "Internal Server Error");
                assert_eq!(response.as_deref(), Some("Internal Server Error"));
                assert_eq!(code, None);
            }
            other => panic!("expected ApiFailure, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_funding_offer_rows_become_records() {
        let transport = MockTransport::new();
        let rows = json!([
            funding_offer_row(41_238_905, "fUSD", 0.0024, 2),
            funding_offer_row(41_238_906, "fUSD", 0.0031, 30)
        ]);
        transport.respond(200, &rows.to_string());
        let rest = v2_client(
            with_credentials(ClientOptions::new().with_transform(true)),
            &transport,
        );

        let offers = rest.funding_offers("fUSD").await.unwrap();

        let offers = offers.as_array().unwrap();
        assert_eq!(offers.len(), 2);
        assert_eq!(offers[0]["id"], 41_238_905);
        assert_eq!(offers[0]["symbol"], "fUSD");
        assert_eq!(offers[0]["rate"], 0.0024);
        assert_eq!(offers[1]["id"], 41_238_906);
        assert_eq!(offers[1]["period"], 30);

        let typed: bfx_rest::api::FundingOffer =
            bfx_rest::api::from_record(offers[1].clone()).unwrap();
        assert_eq!(typed.status.as_deref(), Some("ACTIVE"));
    }

    #[tokio::test]
    async fn test_nonce_too_small_is_enriched() {
        let transport = MockTransport::new();
        transport.respond(500, r#"[1573912039000,"error",10114,"nonce: small"]"#);
        let rest = v2_client(with_credentials(ClientOptions::new()), &transport);

        let err = rest.wallets().await.unwrap_err();

        assert!(err.is_nonce_too_small());
        assert_eq!(err.api_code(), Some(10114));
        let message = err.to_string();
        assert!(message.contains("nonce: small"));
        assert!(message.contains(NONCE_TOO_SMALL_HINT));
        assert_eq!(transport.call_count(), 1);
    }
}

#[cfg(test)]
mod request_building {
    use super::*;

    #[tokio::test]
    async fn test_authenticated_request_is_signed_over_sanitized_body() {
        let transport = MockTransport::new();
        transport.respond(200, "[]");
        let rest = v2_client(with_credentials(ClientOptions::new()), &transport);

        let mut payload = Map::new();
        payload.insert("start".to_string(), json!(1));
        payload.insert("end".to_string(), Value::Null);
        payload.insert("limit".to_string(), json!(25));
        rest.execute(Request::authenticated("/auth/r/trades/hist", payload))
            .await
            .unwrap();

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://bfx.test/v2/auth/r/trades/hist");

        let body = request.body.unwrap();
        assert_eq!(body, r#"{"start":1,"limit":25}"#);
        assert_eq!(request.headers["bfx-nonce"], "1");
        assert_eq!(request.headers["bfx-apikey"], TEST_KEY);
        assert_eq!(request.headers["content-type"], "application/json");

        let expected = sign(
            TEST_SECRET,
            &v2_canonical_string("/auth/r/trades/hist", 1, &body),
        )
        .unwrap();
        assert_eq!(request.headers["bfx-signature"], expected.signature);
    }

    #[tokio::test]
    async fn test_identical_inputs_sign_identically() {
        let first = MockTransport::new();
        first.respond(200, "[]");
        let second = MockTransport::new();
        second.respond(200, "[]");

        // both clients start their nonce counters at 1
        v2_client(with_credentials(ClientOptions::new()), &first)
            .alert_list("price")
            .await
            .unwrap();
        v2_client(with_credentials(ClientOptions::new()), &second)
            .alert_list("price")
            .await
            .unwrap();

        assert_eq!(
            first.last_request().headers["bfx-signature"],
            second.last_request().headers["bfx-signature"]
        );
    }

    #[tokio::test]
    async fn test_concurrent_calls_draw_distinct_nonces() {
        let transport = MockTransport::new();
        for _ in 0..3 {
            transport.respond(200, "[]");
        }
        let rest = v2_client(with_credentials(ClientOptions::new()), &transport);

        let results = futures::future::join_all((0..3).map(|_| rest.wallets())).await;
        assert!(results.iter().all(Result::is_ok));

        let mut nonces: Vec<String> = transport
            .requests()
            .into_iter()
            .map(|request| request.headers["bfx-nonce"].clone())
            .collect();
        nonces.sort();
        assert_eq!(nonces, vec!["1", "2", "3"]);
    }

    #[tokio::test]
    async fn test_token_auth_sends_token_header() {
        let transport = MockTransport::new();
        transport.respond(200, "[]");
        let rest = v2_client(
            ClientOptions::new().with_auth_token("session-token".to_string()),
            &transport,
        );

        rest.wallets().await.unwrap();

        let request = transport.last_request();
        assert_eq!(request.headers["bfx-token"], "session-token");
        assert!(!request.headers.contains_key("bfx-signature"));
        assert!(request.headers.contains_key("bfx-nonce"));
    }

    #[tokio::test]
    async fn test_request_carries_configured_timeout() {
        let transport = MockTransport::new();
        transport.respond(200, "[1]");
        let rest = v2_client(ClientOptions::new().with_timeout(2_500), &transport);

        rest.status().await.unwrap();

        assert_eq!(
            transport.last_request().timeout,
            std::time::Duration::from_millis(2_500)
        );
    }
}

#[cfg(test)]
mod classification {
    use super::*;

    #[tokio::test]
    async fn test_transport_failure_is_not_an_api_failure() {
        let transport = MockTransport::new();
        transport.fail("connection refused");
        let rest = v2_client(ClientOptions::new(), &transport);

        let err = rest.status().await.unwrap_err();

        assert!(matches!(err, BfxError::TransportFailure(_)));
        assert!(err.to_string().contains("connection refused"));
        assert_eq!(err.status(), None);
    }

    #[tokio::test]
    async fn test_invalid_json_on_success_is_malformed() {
        let transport = MockTransport::new();
        transport.respond(200, "<html>maintenance</html>");
        let rest = v2_client(ClientOptions::new(), &transport);

        let err = rest.status().await.unwrap_err();

        assert!(matches!(err, BfxError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_error_envelope_on_success_status_fails() {
        let transport = MockTransport::new();
        transport.respond(200, r#"["error",10020,"symbol: invalid"]"#);
        let rest = v2_client(ClientOptions::new(), &transport);

        let err = rest.ticker("tNOPE").await.unwrap_err();

        assert_eq!(err.api_code(), Some(10020));
        assert!(err.to_string().contains("symbol: invalid"));
        assert!(!err.is_nonce_too_small());
    }
}

#[cfg(test)]
mod transform_and_dispatch {
    use super::*;

    #[tokio::test]
    async fn test_row_detection() {
        let transport = MockTransport::new();
        transport.respond(200, "[[1,2],[3,4]]");
        transport.respond(200, "[1,2]");
        transport.respond(200, "[]");
        let rest = v2_client(ClientOptions::new().with_transform(true), &transport);
        let request = || Request::public("/rows").with_transformer(FUNDING_OFFER.into());

        let many = rest.execute(request()).await.unwrap();
        assert_eq!(many, json!([{"id": 1, "symbol": 2}, {"id": 3, "symbol": 4}]));

        let one = rest.execute(request()).await.unwrap();
        assert_eq!(one, json!({"id": 1, "symbol": 2}));

        let none = rest.execute(request()).await.unwrap();
        assert_eq!(none, json!([]));
    }

    #[tokio::test]
    async fn test_disabled_transform_ignores_transformer() {
        let transport = MockTransport::new();
        transport.respond(200, "[[1,2],[3,4]]");
        let rest = v2_client(ClientOptions::new(), &transport);

        let called = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&called);
        let request = Request::public("/rows").with_transformer(Transformer::function(move |data| {
            seen.fetch_add(1, Ordering::SeqCst);
            Ok(data)
        }));

        let result = rest.execute(request).await.unwrap();

        assert_eq!(result, json!([[1, 2], [3, 4]]));
        assert_eq!(called.load(Ordering::SeqCst), 0);
    }

    #[tokio::test]
    async fn test_function_transformer_errors_reject() {
        let transport = MockTransport::new();
        transport.respond(200, "[1]");
        let rest = v2_client(ClientOptions::new().with_transform(true), &transport);
        let request = Request::public("/rows").with_transformer(Transformer::function(|_| {
            Err(BfxError::MalformedResponse("unexpected shape".to_string()))
        }));

        let err = rest.execute(request).await.unwrap_err();

        assert!(matches!(err, BfxError::MalformedResponse(_)));
    }

    #[tokio::test]
    async fn test_callback_and_result_agree_on_success() {
        let transport = MockTransport::new();
        transport.respond(200, "[1]");
        let rest = v2_client(ClientOptions::new(), &transport);

        let calls = AtomicUsize::new(0);
        let seen = Mutex::new(None);
        let callback: LegacyCallback<'_, Value> = Box::new(|err, res| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(err.is_none());
            *seen.lock().unwrap() = res.cloned();
        });

        let result = rest
            .execute_with_callback(Request::public("/platform/status"), Some(callback))
            .await
            .unwrap();

        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(result, json!([1]));
        assert_eq!(seen.lock().unwrap().clone(), Some(json!([1])));
    }

    #[tokio::test]
    async fn test_callback_and_result_agree_on_failure() {
        let transport = MockTransport::new();
        let rest = v2_client(ClientOptions::new(), &transport);

        let calls = AtomicUsize::new(0);
        let seen = Mutex::new(String::new());
        let callback: LegacyCallback<'_, Value> = Box::new(|err, res| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(res.is_none());
            *seen.lock().unwrap() = err.map(ToString::to_string).unwrap_or_default();
        });

        let err = rest
            .with_callback(rest.wallets(), Some(callback))
            .await
            .unwrap_err();

        assert!(matches!(err, BfxError::MissingCredentials));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
        assert_eq!(*seen.lock().unwrap(), err.to_string());
        assert_eq!(transport.call_count(), 0);
    }
}

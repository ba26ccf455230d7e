mod common;

use base64::engine::general_purpose;
use base64::Engine;
use bfx_rest::api::LegacyOrderRequest;
use bfx_rest::core::config::ClientOptions;
use bfx_rest::core::errors::{BfxError, NONCE_TOO_SMALL_HINT};
use bfx_rest::core::kernel::signer::sign;
use bfx_rest::core::kernel::LegacyCallback;
use common::{v1_client, with_credentials, MockTransport, TEST_KEY, TEST_SECRET};
use reqwest::Method;
use serde_json::{json, Value};
use std::sync::atomic::{AtomicUsize, Ordering};

#[cfg(test)]
mod v1_pipeline {
    use super::*;

    #[tokio::test]
    async fn test_signed_request_carries_envelope_in_headers() {
        let transport = MockTransport::new();
        transport.respond(200, r#"{"order_id":448364249,"is_cancelled":true}"#);
        let rest = v1_client(with_credentials(ClientOptions::new()), &transport);

        let result = rest.cancel_order(448_364_249).await.unwrap();
        assert_eq!(result["is_cancelled"], true);

        let request = transport.last_request();
        assert_eq!(request.method, Method::POST);
        assert_eq!(request.url, "http://bfx-v1.test/v1/order/cancel");
        assert!(request.body.is_none());
        assert_eq!(request.headers["X-BFX-APIKEY"], TEST_KEY);

        let encoded = &request.headers["X-BFX-PAYLOAD"];
        let envelope: Value =
            serde_json::from_slice(&general_purpose::STANDARD.decode(encoded).unwrap()).unwrap();
        assert_eq!(
            envelope,
            json!({"request": "/v1/order/cancel", "nonce": "1", "order_id": 448_364_249})
        );
        assert_eq!(
            request.headers["X-BFX-SIGNATURE"],
            sign(TEST_SECRET, encoded).unwrap().signature
        );
    }

    #[tokio::test]
    async fn test_public_request_is_unsigned_get() {
        let transport = MockTransport::new();
        transport.respond(200, r#"{"mid":"9000.5","bid":"9000.0","ask":"9001.0"}"#);
        let rest = v1_client(ClientOptions::new(), &transport);

        let ticker = rest.ticker("btcusd").await.unwrap();

        assert_eq!(ticker["mid"], "9000.5");
        let request = transport.last_request();
        assert_eq!(request.method, Method::GET);
        assert_eq!(request.url, "http://bfx-v1.test/v1/pubticker/btcusd");
        assert!(request.headers.is_empty());
    }

    #[tokio::test]
    async fn test_order_and_position_queries_are_signed_posts() {
        let transport = MockTransport::new();
        transport.respond(200, r#"{"id":448411365,"is_live":false}"#);
        transport.respond(200, "[]");
        transport.respond(200, "[]");
        let rest = v1_client(with_credentials(ClientOptions::new()), &transport);

        let status = rest.order_status(448_411_365).await.unwrap();
        assert_eq!(status["is_live"], false);
        rest.active_orders().await.unwrap();
        rest.active_positions().await.unwrap();

        let requests = transport.requests();
        let urls: Vec<&str> = requests.iter().map(|r| r.url.as_str()).collect();
        assert_eq!(
            urls,
            vec![
                "http://bfx-v1.test/v1/order/status",
                "http://bfx-v1.test/v1/orders",
                "http://bfx-v1.test/v1/positions"
            ]
        );
        assert!(requests.iter().all(|r| r.method == Method::POST));

        let envelope: Value = serde_json::from_slice(
            &general_purpose::STANDARD
                .decode(&requests[0].headers["X-BFX-PAYLOAD"])
                .unwrap(),
        )
        .unwrap();
        assert_eq!(envelope["order_id"], 448_411_365);
        assert_eq!(envelope["nonce"], "1");
    }

    #[tokio::test]
    async fn test_token_is_not_enough_for_v1() {
        let transport = MockTransport::new();
        let rest = v1_client(
            ClientOptions::new().with_auth_token("token".to_string()),
            &transport,
        );

        let err = rest.wallet_balances().await.unwrap_err();

        assert!(matches!(err, BfxError::MissingCredentials));
        assert_eq!(transport.call_count(), 0);
    }

    #[tokio::test]
    async fn test_message_body_on_400_is_an_api_failure() {
        let transport = MockTransport::new();
        transport.respond(400, r#"{"message":"Invalid order: not enough balance"}"#);
        let rest = v1_client(with_credentials(ClientOptions::new()), &transport);

        let order = LegacyOrderRequest::exchange_limit("btcusd", 10, 9000, "buy");
        let err = rest.new_order(&order).await.unwrap_err();

        assert_eq!(err.status(), Some(400));
        assert!(err.to_string().contains("not enough balance"));
        assert!(!err.is_nonce_too_small());
    }

    #[tokio::test]
    async fn test_stale_nonce_message_is_enriched() {
        let transport = MockTransport::new();
        transport.respond(200, r#"{"message":"Nonce is too small."}"#);
        let rest = v1_client(with_credentials(ClientOptions::new()), &transport);

        let err = rest.account_infos().await.unwrap_err();

        assert!(err.is_nonce_too_small());
        assert!(err.to_string().contains(NONCE_TOO_SMALL_HINT));
    }

    #[tokio::test]
    async fn test_unaccepted_status_fails() {
        let transport = MockTransport::new();
        transport.respond(502, "Bad Gateway");
        let rest = v1_client(ClientOptions::new(), &transport);

        let err = rest.symbols().await.unwrap_err();

        assert_eq!(err.status(), Some(502));
    }

    #[tokio::test]
    async fn test_callback_sees_v1_result() {
        let transport = MockTransport::new();
        transport.respond(200, r#"["btcusd","ethusd"]"#);
        let rest = v1_client(ClientOptions::new(), &transport);

        let calls = AtomicUsize::new(0);
        let callback: LegacyCallback<'_, Value> = Box::new(|err, res| {
            calls.fetch_add(1, Ordering::SeqCst);
            assert!(err.is_none());
            assert_eq!(res, Some(&json!(["btcusd", "ethusd"])));
        });

        let symbols = rest
            .with_callback(rest.symbols(), Some(callback))
            .await
            .unwrap();

        assert_eq!(symbols, json!(["btcusd", "ethusd"]));
        assert_eq!(calls.load(Ordering::SeqCst), 1);
    }
}

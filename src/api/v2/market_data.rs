use crate::api::converters::{currencies_transformer, ticker_transformer, tickers_transformer};
use crate::api::models::{CANDLE, PUBLIC_TRADE, STATUS_MESSAGES_DERIV};
use crate::api::types::HistoryQuery;
use crate::api::v2::RestV2;
use crate::core::errors::BfxResult;
use crate::core::kernel::{Transformer, Transport};
use crate::core::types::Request;
use serde_json::{Map, Value};

const CURRENCY_CONFIG_KEYS: [&str; 6] = [
    "pub:list:currency",
    "pub:map:currency:sym",
    "pub:map:currency:label",
    "pub:map:currency:pool",
    "pub:map:currency:explorer",
    "pub:map:currency:wfx",
];

fn symbol_list(symbols: &[&str]) -> String {
    if symbols.is_empty() {
        "ALL".to_string()
    } else {
        symbols.join(",")
    }
}

impl<T: Transport> RestV2<T> {
    /// Platform status: `[1]` when operative, `[0]` during maintenance
    pub async fn status(&self) -> BfxResult<Value> {
        self.execute(Request::public("/platform/status")).await
    }

    pub async fn ticker(&self, symbol: &str) -> BfxResult<Value> {
        let request = Request::public(format!("/ticker/{}", symbol))
            .with_transformer(ticker_transformer(symbol));
        self.execute(request).await
    }

    /// Tickers for the given symbols, or for every symbol when empty
    pub async fn tickers(&self, symbols: &[&str]) -> BfxResult<Value> {
        let request = Request::public(format!("/tickers?symbols={}", symbol_list(symbols)))
            .with_transformer(tickers_transformer());
        self.execute(request).await
    }

    pub async fn order_book(&self, symbol: &str, precision: &str) -> BfxResult<Value> {
        self.execute(Request::public(format!("/book/{}/{}", symbol, precision)))
            .await
    }

    pub async fn trades(&self, symbol: &str, query: &HistoryQuery) -> BfxResult<Value> {
        let request = Request::public(format!("/trades/{}/hist", symbol))
            .with_query(&query.query_pairs())
            .with_transformer(PUBLIC_TRADE.into());
        self.execute(request).await
    }

    /// Candles for `trade:{timeframe}:{symbol}`; `section` is `last` or `hist`
    pub async fn candles(
        &self,
        timeframe: &str,
        symbol: &str,
        section: &str,
        query: &HistoryQuery,
    ) -> BfxResult<Value> {
        let request = Request::public(format!(
            "/candles/trade:{}:{}/{}",
            timeframe, symbol, section
        ))
        .with_query(&query.query_pairs())
        .with_transformer(CANDLE.into());
        self.execute(request).await
    }

    pub async fn stats(&self, key: &str, context: &str) -> BfxResult<Value> {
        self.execute(Request::public(format!("/stats1/{}/{}", key, context)))
            .await
    }

    /// Config tables by key. No keys, no request: completes with `[]`.
    pub async fn conf(&self, keys: &[&str]) -> BfxResult<Value> {
        if keys.is_empty() {
            return Ok(Value::Array(Vec::new()));
        }

        self.execute(Request::public(format!("/conf/{}", keys.join(","))))
            .await
    }

    /// Currency list joined from the six currency config tables
    pub async fn currencies(&self) -> BfxResult<Value> {
        let suffix = self
            .config()
            .company()
            .map(|company| format!(":{}", company))
            .unwrap_or_default();
        let keys: Vec<String> = CURRENCY_CONFIG_KEYS
            .iter()
            .map(|key| format!("{}{}", key, suffix))
            .collect();

        let request = Request::public(format!("/conf/{}", keys.join(",")))
            .with_transformer(currencies_transformer());
        self.execute(request).await
    }

    /// Exchange pair names
    pub async fn symbols(&self) -> BfxResult<Value> {
        let request = Request::public("/conf/pub:list:pair:exchange").with_transformer(
            Transformer::function(|data| Ok(data.get(0).cloned().unwrap_or(Value::Null))),
        );
        self.execute(request).await
    }

    /// Status messages of one type (`deriv` by default) for the given keys
    pub async fn status_messages(&self, status_type: &str, keys: &[&str]) -> BfxResult<Value> {
        let transformer = if status_type == "deriv" {
            STATUS_MESSAGES_DERIV.into()
        } else {
            Transformer::None
        };

        let request = Request::public(format!(
            "/status/{}?keys={}",
            status_type,
            symbol_list(keys)
        ))
        .with_transformer(transformer);
        self.execute(request).await
    }

    /// Average execution price for an amount; a public POST with filters in the query
    pub async fn market_average_price(
        &self,
        symbol: &str,
        amount: &str,
        period: Option<u32>,
        rate_limit: Option<&str>,
    ) -> BfxResult<Value> {
        let request = Request::public_post("/calc/trade/avg", Map::new()).with_query(&[
            ("symbol", Some(symbol.to_string())),
            ("amount", Some(amount.to_string())),
            ("period", period.map(|p| p.to_string())),
            ("rate_limit", rate_limit.map(str::to_string)),
        ]);
        self.execute(request).await
    }

    /// Served by the v1 API
    pub async fn symbol_details(&self) -> BfxResult<Value> {
        self.legacy().symbols_details().await
    }
}

use crate::api::models::{
    ALERT, FUNDING_CREDIT, FUNDING_LOAN, FUNDING_OFFER, INVOICE, LEDGER_ENTRY, ORDER, POSITION,
    TRADE, USER_INFO, WALLET,
};
use crate::api::types::HistoryQuery;
use crate::api::v2::RestV2;
use crate::core::errors::BfxResult;
use crate::core::kernel::Transport;
use crate::core::types::Request;
use serde_json::{json, Map, Value};

/// Default page size of the ledger history
const LEDGER_LIMIT: u32 = 25;

fn history_path(base: &str, filter: Option<&str>) -> String {
    match filter.filter(|value| !value.is_empty()) {
        Some(value) => format!("/auth/r/{}/{}/hist", base, value),
        None => format!("/auth/r/{}/hist", base),
    }
}

impl<T: Transport> RestV2<T> {
    pub async fn wallets(&self) -> BfxResult<Value> {
        let request =
            Request::authenticated("/auth/r/wallets", Map::new()).with_transformer(WALLET.into());
        self.execute(request).await
    }

    pub async fn user_info(&self) -> BfxResult<Value> {
        let request = Request::authenticated("/auth/r/info/user", Map::new())
            .with_transformer(USER_INFO.into());
        self.execute(request).await
    }

    pub async fn active_orders(&self) -> BfxResult<Value> {
        let request =
            Request::authenticated("/auth/r/orders", Map::new()).with_transformer(ORDER.into());
        self.execute(request).await
    }

    /// Closed orders, for one symbol or across all of them
    pub async fn order_history(
        &self,
        symbol: Option<&str>,
        query: &HistoryQuery,
    ) -> BfxResult<Value> {
        let request = Request::authenticated(history_path("orders", symbol), query.to_payload())
            .with_transformer(ORDER.into());
        self.execute(request).await
    }

    pub async fn positions(&self) -> BfxResult<Value> {
        let request = Request::authenticated("/auth/r/positions", Map::new())
            .with_transformer(POSITION.into());
        self.execute(request).await
    }

    pub async fn funding_offers(&self, symbol: &str) -> BfxResult<Value> {
        let request =
            Request::authenticated(format!("/auth/r/funding/offers/{}", symbol), Map::new())
                .with_transformer(FUNDING_OFFER.into());
        self.execute(request).await
    }

    pub async fn funding_credits(&self, symbol: &str) -> BfxResult<Value> {
        let request =
            Request::authenticated(format!("/auth/r/funding/credits/{}", symbol), Map::new())
                .with_transformer(FUNDING_CREDIT.into());
        self.execute(request).await
    }

    pub async fn funding_loans(&self, symbol: &str) -> BfxResult<Value> {
        let request =
            Request::authenticated(format!("/auth/r/funding/loans/{}", symbol), Map::new())
                .with_transformer(FUNDING_LOAN.into());
        self.execute(request).await
    }

    /// Ledger entries, optionally for one currency and category
    pub async fn ledgers(
        &self,
        currency: Option<&str>,
        category: Option<u32>,
        query: &HistoryQuery,
    ) -> BfxResult<Value> {
        let mut payload = query.to_payload();
        payload.insert("limit".to_string(), json!(query.limit.unwrap_or(LEDGER_LIMIT)));
        payload.insert("category".to_string(), json!(category));

        let request = Request::authenticated(history_path("ledgers", currency), payload)
            .with_transformer(LEDGER_ENTRY.into());
        self.execute(request).await
    }

    /// Own trades, for one symbol or across all of them
    pub async fn account_trades(
        &self,
        symbol: Option<&str>,
        query: &HistoryQuery,
    ) -> BfxResult<Value> {
        let request = Request::authenticated(history_path("trades", symbol), query.to_payload())
            .with_transformer(TRADE.into());
        self.execute(request).await
    }

    /// Alerts of one type, e.g. `price`
    pub async fn alert_list(&self, alert_type: &str) -> BfxResult<Value> {
        let mut payload = Map::new();
        payload.insert("type".to_string(), json!(alert_type));

        let request =
            Request::authenticated("/auth/r/alerts", payload).with_transformer(ALERT.into());
        self.execute(request).await
    }

    /// Lightning deposit invoice
    pub async fn generate_invoice(
        &self,
        currency: &str,
        wallet: &str,
        amount: &str,
    ) -> BfxResult<Value> {
        let mut payload = Map::new();
        payload.insert("currency".to_string(), json!(currency));
        payload.insert("wallet".to_string(), json!(wallet));
        payload.insert("amount".to_string(), json!(amount));

        let request = Request::authenticated("/auth/w/deposit/invoice", payload)
            .with_transformer(INVOICE.into());
        self.execute(request).await
    }

    /// Served by the v1 API
    pub async fn account_infos(&self) -> BfxResult<Value> {
        self.legacy().account_infos().await
    }
}

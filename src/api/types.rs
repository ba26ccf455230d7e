use crate::core::errors::{BfxError, BfxResult};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use serde_json::{json, Map, Value};

/// Deserialize named-field records produced with transform enabled
pub fn from_record<T: DeserializeOwned>(value: Value) -> BfxResult<T> {
    serde_json::from_value(value).map_err(|e| {
        BfxError::MalformedResponse(format!("Failed to deserialize record: {}", e))
    })
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TradingTicker {
    pub symbol: String,
    pub bid: f64,
    pub bid_size: f64,
    pub ask: f64,
    pub ask_size: f64,
    pub daily_change: f64,
    pub daily_change_perc: f64,
    pub last_price: f64,
    pub volume: f64,
    pub high: f64,
    pub low: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingTicker {
    pub symbol: String,
    pub frr: f64,
    pub bid: f64,
    pub bid_period: u32,
    pub bid_size: f64,
    pub ask: f64,
    pub ask_period: u32,
    pub ask_size: f64,
    pub daily_change: f64,
    pub daily_change_perc: f64,
    pub last_price: f64,
    pub volume: f64,
    pub high: f64,
    pub low: f64,
    pub frr_amount_available: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Candle {
    pub mts: u64,
    pub open: f64,
    pub close: f64,
    pub high: f64,
    pub low: f64,
    pub volume: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FundingOffer {
    pub id: u64,
    pub symbol: String,
    pub mts_create: Option<u64>,
    pub mts_update: Option<u64>,
    pub amount: f64,
    pub amount_orig: Option<f64>,
    #[serde(rename = "type")]
    pub offer_type: Option<String>,
    pub flags: Option<u64>,
    pub status: Option<String>,
    pub rate: f64,
    pub period: u32,
    /// `1` when set; the wire carries these flags as integers
    pub notify: Option<u8>,
    pub hidden: Option<u8>,
    pub renew: Option<u8>,
    pub rate_real: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Order {
    pub id: u64,
    pub gid: Option<u64>,
    pub cid: Option<u64>,
    pub symbol: String,
    pub mts_create: Option<u64>,
    pub mts_update: Option<u64>,
    pub amount: f64,
    pub amount_orig: Option<f64>,
    #[serde(rename = "type")]
    pub order_type: Option<String>,
    pub flags: Option<u64>,
    pub status: Option<String>,
    pub price: Option<f64>,
    pub price_avg: Option<f64>,
    pub hidden: Option<u8>,
    pub meta: Option<Value>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Position {
    pub symbol: String,
    pub status: String,
    pub amount: f64,
    pub base_price: Option<f64>,
    pub pl: Option<f64>,
    pub leverage: Option<f64>,
    pub id: Option<u64>,
    pub mts_create: Option<u64>,
    pub mts_update: Option<u64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Wallet {
    #[serde(rename = "type")]
    pub wallet_type: String,
    pub currency: String,
    pub balance: f64,
    pub unsettled_interest: Option<f64>,
    pub balance_available: Option<f64>,
}

/// New-order packet for `/auth/w/order/submit` and multi-op `on` entries
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    #[serde(rename = "type")]
    pub order_type: String,
    pub symbol: String,
    /// Positive to buy, negative to sell
    pub amount: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub gid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cid: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_trailing: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_aux_limit: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price_oco_stop: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tif: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub lev: Option<u32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl OrderRequest {
    pub fn market(symbol: impl Into<String>, amount: impl ToString) -> Self {
        Self {
            order_type: "MARKET".to_string(),
            symbol: symbol.into(),
            amount: amount.to_string(),
            ..Self::default()
        }
    }

    pub fn exchange_limit(
        symbol: impl Into<String>,
        amount: impl ToString,
        price: impl ToString,
    ) -> Self {
        Self {
            order_type: "EXCHANGE LIMIT".to_string(),
            symbol: symbol.into(),
            amount: amount.to_string(),
            price: Some(price.to_string()),
            ..Self::default()
        }
    }

    #[must_use]
    pub const fn with_flags(mut self, flags: u64) -> Self {
        self.flags = Some(flags);
        self
    }

    #[must_use]
    pub const fn with_cid(mut self, cid: u64) -> Self {
        self.cid = Some(cid);
        self
    }

    /// Wire packet, tagged with the affiliate code unless it already carries one
    pub fn to_packet(&self, aff_code: Option<&str>) -> BfxResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(mut packet) => {
                apply_aff_code(&mut packet, aff_code);
                Ok(packet)
            }
            other => Err(BfxError::InvalidArgument(format!(
                "order packet is not an object: {}",
                other
            ))),
        }
    }
}

/// New-offer packet for `/auth/w/funding/offer/submit`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FundingOfferRequest {
    #[serde(rename = "type")]
    pub offer_type: String,
    pub symbol: String,
    pub amount: String,
    pub rate: String,
    pub period: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub flags: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub meta: Option<Map<String, Value>>,
}

impl FundingOfferRequest {
    pub fn limit(
        symbol: impl Into<String>,
        amount: impl ToString,
        rate: impl ToString,
        period: u32,
    ) -> Self {
        Self {
            offer_type: "LIMIT".to_string(),
            symbol: symbol.into(),
            amount: amount.to_string(),
            rate: rate.to_string(),
            period,
            flags: None,
            meta: None,
        }
    }

    pub fn to_packet(&self, aff_code: Option<&str>) -> BfxResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(mut packet) => {
                apply_aff_code(&mut packet, aff_code);
                Ok(packet)
            }
            other => Err(BfxError::InvalidArgument(format!(
                "offer packet is not an object: {}",
                other
            ))),
        }
    }
}

/// Normalise a caller-built order object into a new-order packet
///
/// Null fields are dropped and numeric amounts and prices are sent as
/// strings, the way [`OrderRequest`] serializes them.
pub fn new_order_packet(order: &Map<String, Value>, aff_code: Option<&str>) -> Map<String, Value> {
    const DECIMAL_FIELDS: [&str; 5] = [
        "amount",
        "price",
        "price_trailing",
        "price_aux_limit",
        "price_oco_stop",
    ];

    let mut packet: Map<String, Value> = order
        .iter()
        .filter(|(_, value)| !value.is_null())
        .map(|(key, value)| {
            let value = match value {
                Value::Number(number) if DECIMAL_FIELDS.contains(&key.as_str()) => {
                    Value::String(number.to_string())
                }
                other => other.clone(),
            };
            (key.clone(), value)
        })
        .collect();

    apply_aff_code(&mut packet, aff_code);
    packet
}

/// `start`/`end`/`limit`/`sort` filters shared by the history endpoints
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct HistoryQuery {
    pub start: Option<u64>,
    pub end: Option<u64>,
    pub limit: Option<u32>,
    /// `1` for oldest first, `-1` for newest first
    pub sort: Option<i8>,
}

impl HistoryQuery {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub const fn with_start(mut self, start: u64) -> Self {
        self.start = Some(start);
        self
    }

    #[must_use]
    pub const fn with_end(mut self, end: u64) -> Self {
        self.end = Some(end);
        self
    }

    #[must_use]
    pub const fn with_limit(mut self, limit: u32) -> Self {
        self.limit = Some(limit);
        self
    }

    #[must_use]
    pub const fn with_sort(mut self, sort: i8) -> Self {
        self.sort = Some(sort);
        self
    }

    /// Query-string form for public GET endpoints
    pub fn query_pairs(&self) -> Vec<(&'static str, Option<String>)> {
        vec![
            ("start", self.start.map(|v| v.to_string())),
            ("end", self.end.map(|v| v.to_string())),
            ("limit", self.limit.map(|v| v.to_string())),
            ("sort", self.sort.map(|v| v.to_string())),
        ]
    }

    /// Body form for authenticated endpoints; unset filters become nulls
    /// and are stripped when the request is signed
    pub fn to_payload(&self) -> Map<String, Value> {
        let mut payload = Map::new();
        payload.insert("start".to_string(), json!(self.start));
        payload.insert("end".to_string(), json!(self.end));
        payload.insert("limit".to_string(), json!(self.limit));
        payload.insert("sort".to_string(), json!(self.sort));
        payload
    }
}

/// Wallet-to-wallet transfer packet for `/auth/w/transfer`
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransferRequest {
    pub from: String,
    pub to: String,
    pub currency: String,
    /// Set when the transfer converts between currencies
    #[serde(skip_serializing_if = "Option::is_none")]
    pub currency_to: Option<String>,
    pub amount: String,
}

impl TransferRequest {
    pub fn new(
        from: impl Into<String>,
        to: impl Into<String>,
        currency: impl Into<String>,
        amount: impl ToString,
    ) -> Self {
        Self {
            from: from.into(),
            to: to.into(),
            currency: currency.into(),
            currency_to: None,
            amount: amount.to_string(),
        }
    }

    #[must_use]
    pub fn with_currency_to(mut self, currency_to: impl Into<String>) -> Self {
        self.currency_to = Some(currency_to.into());
        self
    }

    pub fn to_payload(&self) -> BfxResult<Map<String, Value>> {
        match serde_json::to_value(self)? {
            Value::Object(payload) => Ok(payload),
            other => Err(BfxError::InvalidArgument(format!(
                "transfer packet is not an object: {}",
                other
            ))),
        }
    }
}

/// Set `meta.aff_code` unless the packet already carries a non-empty one
pub fn apply_aff_code(packet: &mut Map<String, Value>, aff_code: Option<&str>) {
    let Some(aff_code) = aff_code else {
        return;
    };

    let meta = packet
        .entry("meta")
        .or_insert_with(|| Value::Object(Map::new()));
    if meta.is_null() {
        *meta = Value::Object(Map::new());
    }

    if let Value::Object(meta) = meta {
        let current = meta.entry("aff_code").or_insert(Value::Null);
        let unset = match current {
            Value::Null => true,
            Value::String(code) => code.is_empty(),
            _ => false,
        };
        if unset {
            *current = Value::String(aff_code.to_string());
        }
    }
}

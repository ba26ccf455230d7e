use crate::api::converters::first_notified_row;
use crate::api::models::{NOTIFICATION, ORDER, ORDER_FLAG_POS_CLOSE, POSITION};
use crate::api::types::{
    from_record, new_order_packet, FundingOfferRequest, OrderRequest, Position, TransferRequest,
};
use crate::api::v2::RestV2;
use crate::core::errors::{BfxError, BfxResult};
use crate::core::kernel::{transform, Transformer, Transport};
use crate::core::types::Request;
use serde_json::{json, Map, Value};
use tracing::debug;

const ORDER_MULTI_PATH: &str = "/auth/w/order/multi";

/// Check a multi-op list and normalise its `on` entries into new-order packets
fn prepare_ops(ops: Value, aff_code: Option<&str>) -> BfxResult<Value> {
    let Value::Array(ops) = ops else {
        return Err(BfxError::InvalidArgument("ops should be an array".to_string()));
    };

    if !ops.iter().all(Value::is_array) {
        return Err(BfxError::InvalidArgument(
            "ops should contain only arrays".to_string(),
        ));
    }

    let ops = ops
        .into_iter()
        .map(|op| match op {
            Value::Array(mut op) => {
                let is_new_order = op.first().and_then(Value::as_str) == Some("on");
                if is_new_order {
                    if let Some(Value::Object(order)) = op.get(1) {
                        let packet = new_order_packet(order, aff_code);
                        op[1] = Value::Object(packet);
                    }
                }
                Value::Array(op)
            }
            other => other,
        })
        .collect();

    Ok(Value::Array(ops))
}

impl<T: Transport> RestV2<T> {
    /// Notification endpoints yield a Notification record, or the raw
    /// notification array when transform is disabled
    fn notification_request(path: &str, payload: Map<String, Value>) -> Request {
        Request::authenticated(path, payload).with_transformer(NOTIFICATION.into())
    }

    /// Submit one order; yields the first order echoed in the notification
    pub async fn submit_order(&self, order: &OrderRequest) -> BfxResult<Value> {
        let packet = order.to_packet(self.config().aff_code())?;
        let notification = self
            .execute(Request::authenticated("/auth/w/order/submit", packet))
            .await?;

        // an OCO submission echoes two orders; only the first is returned
        let row = first_notified_row(&notification);
        transform(row, &Transformer::from(ORDER), self.transform_enabled())
    }

    /// Update a live order identified by the `id` in `changes`
    ///
    /// Returns the raw notification array when transform is disabled.
    pub async fn update_order(&self, changes: Map<String, Value>) -> BfxResult<Value> {
        self.execute(Self::notification_request("/auth/w/order/update", changes))
            .await
    }

    /// Returns the raw notification array when transform is disabled
    pub async fn cancel_order(&self, id: u64) -> BfxResult<Value> {
        let mut payload = Map::new();
        payload.insert("id".to_string(), json!(id));
        self.execute(Self::notification_request("/auth/w/order/cancel", payload))
            .await
    }

    /// Cancel several orders in one multi-op; raw notification array when
    /// transform is disabled
    pub async fn cancel_orders(&self, ids: &[u64]) -> BfxResult<Value> {
        let mut payload = Map::new();
        payload.insert("ops".to_string(), json!([["oc_multi", { "id": ids }]]));
        self.execute(Self::notification_request(ORDER_MULTI_PATH, payload))
            .await
    }

    /// Batch of `on` / `ou` / `oc` / `oc_multi` operations in one request
    ///
    /// `ops` must be a list of lists; anything else fails before a request
    /// is built. New-order entries are normalised and tagged with the
    /// affiliate code. Yields the raw notification array when transform is
    /// disabled.
    pub async fn order_multi_op(&self, ops: Value) -> BfxResult<Value> {
        let ops = prepare_ops(ops, self.config().aff_code())?;

        let mut payload = Map::new();
        payload.insert("ops".to_string(), ops);
        self.execute(Self::notification_request(ORDER_MULTI_PATH, payload))
            .await
    }

    /// Close an active position with a reduce-only market order
    pub async fn close_position(&self, position_id: u64) -> BfxResult<Value> {
        let positions = self.positions().await?;
        let rows = positions.as_array().map(Vec::as_slice).unwrap_or_default();

        let position = rows
            .iter()
            .map(|row| POSITION.build(row))
            .find(|record| {
                record.get("id").and_then(Value::as_u64) == Some(position_id)
                    && record.get("status").and_then(Value::as_str) == Some("ACTIVE")
            })
            .ok_or_else(|| BfxError::InvalidArgument("position not found".to_string()))?;
        let position: Position = from_record(position)?;

        debug!(
            position_id,
            symbol = %position.symbol,
            amount = position.amount,
            "Closing position"
        );

        let order = OrderRequest::market(position.symbol, -position.amount)
            .with_flags(ORDER_FLAG_POS_CLOSE);
        self.submit_order(&order).await
    }

    /// Returns the raw notification array when transform is disabled
    pub async fn submit_funding_offer(&self, offer: &FundingOfferRequest) -> BfxResult<Value> {
        let packet = offer.to_packet(self.config().aff_code())?;
        self.execute(Self::notification_request(
            "/auth/w/funding/offer/submit",
            packet,
        ))
        .await
    }

    /// Returns the raw notification array when transform is disabled
    pub async fn cancel_funding_offer(&self, id: u64) -> BfxResult<Value> {
        let mut payload = Map::new();
        payload.insert("id".to_string(), json!(id));
        self.execute(Self::notification_request(
            "/auth/w/funding/offer/cancel",
            payload,
        ))
        .await
    }

    /// Returns the raw notification array when transform is disabled
    pub async fn transfer(&self, transfer: &TransferRequest) -> BfxResult<Value> {
        self.execute(Self::notification_request(
            "/auth/w/transfer",
            transfer.to_payload()?,
        ))
        .await
    }
}

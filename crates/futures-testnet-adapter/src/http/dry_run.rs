/*
[INPUT]:  Fully built order parameters
[OUTPUT]: Synthetic order record, no network I/O
[POS]:    HTTP layer - Dispatch substitute for dry-run mode
[UPDATE]: When the synthetic response shape changes
*/

use async_trait::async_trait;
use reqwest::Method;
use serde_json::{Map, Value};
use tracing::info;

use crate::http::Result;
use crate::http::dispatch::Dispatch;
use crate::types::QueryParams;

/// Order id reported for every dry-run order
pub const DRY_RUN_ORDER_ID: i64 = 999_999_999;

/// Client order id reported for every dry-run order
pub const DRY_RUN_CLIENT_ORDER_ID: &str = "dry-run";

/// Answers every request with a synthetic `NEW` order; never signs or sends
#[derive(Debug, Clone, Copy, Default)]
pub struct DryRunDispatcher;

impl DryRunDispatcher {
    pub fn new() -> Self {
        Self
    }

    fn synthetic_order(params: &QueryParams) -> Value {
        let echo = |key: &str| params.get(key).map(|value| value.to_json()).unwrap_or(Value::Null);

        let mut order = Map::new();
        order.insert("orderId".to_string(), Value::from(DRY_RUN_ORDER_ID));
        order.insert("symbol".to_string(), echo("symbol"));
        order.insert("status".to_string(), Value::from("NEW"));
        order.insert("side".to_string(), echo("side"));
        order.insert("type".to_string(), echo("type"));
        order.insert("origQty".to_string(), echo("quantity"));
        order.insert(
            "price".to_string(),
            params
                .get("price")
                .map(|value| value.to_json())
                .unwrap_or_else(|| Value::from("")),
        );
        order.insert("clientOrderId".to_string(), Value::from(DRY_RUN_CLIENT_ORDER_ID));
        Value::Object(order)
    }
}

#[async_trait]
impl Dispatch for DryRunDispatcher {
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        signed: bool,
    ) -> Result<Value> {
        info!(method = %method, path, params = %params, signed, "DRY-RUN");
        Ok(Self::synthetic_order(&params))
    }
}

/*
[INPUT]:  Order requests / order queries and a Dispatch implementation
[OUTPUT]: Exchange order records
[POS]:    HTTP layer - trading endpoints (all signed)
[UPDATE]: When adding new trading endpoints or changing order flow
*/

use reqwest::Method;
use rust_decimal::Decimal;
use tracing::info;

use crate::http::Result;
use crate::http::dispatch::Dispatch;
use crate::types::{OrderQuery, OrderRequest, OrderResponse, Side};

/// Place, query and cancel share one path; the method selects the action
pub const ORDER_PATH: &str = "/fapi/v1/order";

/// Order operations over any dispatcher.
///
/// Building and validating requests happens here; how they are sent (or not)
/// is entirely up to `D`.
#[derive(Debug, Clone)]
pub struct OrderClient<D> {
    dispatcher: D,
}

impl<D: Dispatch> OrderClient<D> {
    pub fn new(dispatcher: D) -> Self {
        Self { dispatcher }
    }

    pub fn dispatcher(&self) -> &D {
        &self.dispatcher
    }

    pub fn into_dispatcher(self) -> D {
        self.dispatcher
    }

    /// Place any order
    ///
    /// POST /fapi/v1/order (signed)
    pub async fn place_order(&self, req: &OrderRequest) -> Result<OrderResponse> {
        req.validate()?;
        info!(
            symbol = %req.symbol,
            side = %req.side,
            order_type = %req.order_type,
            quantity = %req.quantity,
            "placing order"
        );
        let body = self
            .dispatcher
            .dispatch(Method::POST, ORDER_PATH, req.to_params(), true)
            .await?;
        Ok(OrderResponse::from(body))
    }

    /// Place a MARKET order
    pub async fn place_market_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
    ) -> Result<OrderResponse> {
        self.place_order(&OrderRequest::market(symbol, side, quantity))
            .await
    }

    /// Place a GTC LIMIT order
    pub async fn place_limit_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
    ) -> Result<OrderResponse> {
        self.place_order(&OrderRequest::limit(symbol, side, quantity, price))
            .await
    }

    /// Place a GTC stop-limit (`STOP`) order
    pub async fn place_stop_limit_order(
        &self,
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> Result<OrderResponse> {
        self.place_order(&OrderRequest::stop_limit(
            symbol, side, quantity, price, stop_price,
        ))
        .await
    }

    /// Query an order
    ///
    /// GET /fapi/v1/order (signed)
    pub async fn get_order(&self, query: &OrderQuery) -> Result<OrderResponse> {
        query.validate()?;
        let body = self
            .dispatcher
            .dispatch(Method::GET, ORDER_PATH, query.to_params(), true)
            .await?;
        Ok(OrderResponse::from(body))
    }

    /// Cancel an order
    ///
    /// DELETE /fapi/v1/order (signed)
    pub async fn cancel_order(&self, query: &OrderQuery) -> Result<OrderResponse> {
        query.validate()?;
        info!(symbol = %query.symbol, order_id = ?query.order_id, "cancelling order");
        let body = self
            .dispatcher
            .dispatch(Method::DELETE, ORDER_PATH, query.to_params(), true)
            .await?;
        Ok(OrderResponse::from(body))
    }
}

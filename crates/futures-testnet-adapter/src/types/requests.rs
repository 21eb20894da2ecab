/*
[INPUT]:  Order fields from CLI, dashboard, or library callers
[OUTPUT]: Validated order/query requests and their wire parameters
[POS]:    Data layer - request construction for /fapi/v1/order
[UPDATE]: When API schema changes or new order fields are supported
*/

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::enums::{OrderType, Side, TimeInForce};
use super::params::QueryParams;
use crate::http::{FuturesError, Result};

/// A single order placement on `POST /fapi/v1/order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderRequest {
    pub symbol: String,
    pub side: Side,
    pub order_type: OrderType,
    #[serde(with = "rust_decimal::serde::str")]
    pub quantity: Decimal,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<Decimal>,
    #[serde(with = "rust_decimal::serde::str_option")]
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stop_price: Option<Decimal>,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub client_order_id: Option<String>,
}

impl OrderRequest {
    fn new(symbol: &str, side: Side, order_type: OrderType, quantity: Decimal) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            side,
            order_type,
            quantity,
            price: None,
            stop_price: None,
            time_in_force: TimeInForce::default(),
            reduce_only: false,
            client_order_id: None,
        }
    }

    pub fn market(symbol: &str, side: Side, quantity: Decimal) -> Self {
        Self::new(symbol, side, OrderType::Market, quantity)
    }

    pub fn limit(symbol: &str, side: Side, quantity: Decimal, price: Decimal) -> Self {
        Self {
            price: Some(price),
            ..Self::new(symbol, side, OrderType::Limit, quantity)
        }
    }

    /// Stop-limit order: rests at `price` once `stop_price` trades
    pub fn stop_limit(
        symbol: &str,
        side: Side,
        quantity: Decimal,
        price: Decimal,
        stop_price: Decimal,
    ) -> Self {
        Self {
            price: Some(price),
            stop_price: Some(stop_price),
            ..Self::new(symbol, side, OrderType::Stop, quantity)
        }
    }

    #[must_use]
    pub fn with_time_in_force(mut self, time_in_force: TimeInForce) -> Self {
        self.time_in_force = time_in_force;
        self
    }

    #[must_use]
    pub fn with_reduce_only(mut self, reduce_only: bool) -> Self {
        self.reduce_only = reduce_only;
        self
    }

    #[must_use]
    pub fn with_client_order_id(mut self, client_order_id: impl Into<String>) -> Self {
        self.client_order_id = Some(client_order_id.into());
        self
    }

    /// Reject orders the exchange would refuse for missing or non-positive fields
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(FuturesError::Validation("symbol must not be empty".to_string()));
        }
        if self.quantity <= Decimal::ZERO {
            return Err(FuturesError::Validation(format!(
                "quantity must be positive, got {}",
                self.quantity
            )));
        }

        match self.order_type {
            OrderType::Market => Ok(()),
            OrderType::Limit => require_positive("price", self.price, "limit"),
            OrderType::Stop => {
                require_positive("price", self.price, "stop-limit")?;
                require_positive("stop price", self.stop_price, "stop-limit")
            }
        }
    }

    /// Wire parameters in the order the exchange documents them.
    ///
    /// Prices go out as text and quantity as a decimal number; neither passes
    /// through a float, so no exponent or trailing-digit artifacts appear.
    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new()
            .with("symbol", self.symbol.to_uppercase())
            .with("side", self.side.as_str())
            .with("type", self.order_type.as_str());

        if self.order_type.is_priced() {
            params.insert("timeInForce", self.time_in_force.as_str());
            if let Some(price) = self.price {
                params.insert("price", price.to_string());
            }
        }
        if self.order_type == OrderType::Stop {
            if let Some(stop_price) = self.stop_price {
                params.insert("stopPrice", stop_price.to_string());
            }
        }

        params.insert("quantity", self.quantity);
        params.insert("reduceOnly", if self.reduce_only { "true" } else { "false" });

        if let Some(client_order_id) = &self.client_order_id {
            params.insert("newClientOrderId", client_order_id.as_str());
        }
        params
    }
}

fn require_positive(field: &str, value: Option<Decimal>, kind: &str) -> Result<()> {
    match value {
        Some(value) if value > Decimal::ZERO => Ok(()),
        Some(value) => Err(FuturesError::Validation(format!(
            "{field} must be positive, got {value}"
        ))),
        None => Err(FuturesError::Validation(format!(
            "{kind} orders require a {field}"
        ))),
    }
}

/// Lookup or cancellation key for `GET`/`DELETE /fapi/v1/order`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct OrderQuery {
    pub symbol: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orig_client_order_id: Option<String>,
}

impl OrderQuery {
    /// A blank client order id counts as absent
    pub fn new(symbol: &str, order_id: Option<i64>, orig_client_order_id: Option<String>) -> Self {
        Self {
            symbol: symbol.to_uppercase(),
            order_id,
            orig_client_order_id: orig_client_order_id
                .map(|id| id.trim().to_string())
                .filter(|id| !id.is_empty()),
        }
    }

    pub fn by_order_id(symbol: &str, order_id: i64) -> Self {
        Self::new(symbol, Some(order_id), None)
    }

    pub fn by_client_order_id(symbol: &str, client_order_id: impl Into<String>) -> Self {
        Self::new(symbol, None, Some(client_order_id.into()))
    }

    /// At least one of order id / client order id must be present
    pub fn validate(&self) -> Result<()> {
        if self.symbol.trim().is_empty() {
            return Err(FuturesError::Validation("symbol must not be empty".to_string()));
        }
        if self.order_id.is_none() && self.client_order_id().is_none() {
            return Err(FuturesError::Validation(
                "either an order id or a client order id is required".to_string(),
            ));
        }
        Ok(())
    }

    pub fn to_params(&self) -> QueryParams {
        let mut params = QueryParams::new().with("symbol", self.symbol.to_uppercase());
        if let Some(order_id) = self.order_id {
            params.insert("orderId", order_id);
        }
        if let Some(client_order_id) = self.client_order_id() {
            params.insert("origClientOrderId", client_order_id);
        }
        params
    }

    fn client_order_id(&self) -> Option<&str> {
        self.orig_client_order_id
            .as_deref()
            .map(str::trim)
            .filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::str::FromStr;

    fn dec(value: &str) -> Decimal {
        Decimal::from_str(value).unwrap()
    }

    #[test]
    fn test_market_order_params() {
        let side: Side = "buy".parse().unwrap();
        let req = OrderRequest::market("btcusdt", side, dec("0.01"));

        assert!(req.validate().is_ok());
        assert_eq!(
            req.to_params().to_query_string(),
            "symbol=BTCUSDT&side=BUY&type=MARKET&quantity=0.01&reduceOnly=false"
        );
    }

    #[test]
    fn test_limit_order_params() {
        let req = OrderRequest::limit("ETHUSDT", Side::Sell, dec("1.5"), dec("3000.25"));
        let params = req.to_params();

        assert_eq!(params.get("price").and_then(|v| v.as_text()), Some("3000.25"));
        assert_eq!(params.get("timeInForce").and_then(|v| v.as_text()), Some("GTC"));
        assert_eq!(params.get("quantity").and_then(|v| v.as_decimal()), Some(dec("1.5")));
        assert_eq!(
            params.keys().collect::<Vec<_>>(),
            ["symbol", "side", "type", "timeInForce", "price", "quantity", "reduceOnly"]
        );
    }

    #[test]
    fn test_stop_limit_order_params() {
        let req = OrderRequest::stop_limit("btcusdt", Side::Buy, dec("0.002"), dec("65000"), dec("64900.5"))
            .with_time_in_force(TimeInForce::Ioc)
            .with_reduce_only(true)
            .with_client_order_id("stop-1");

        assert_eq!(
            req.to_params().to_query_string(),
            "symbol=BTCUSDT&side=BUY&type=STOP&timeInForce=IOC&price=65000&stopPrice=64900.5\
             &quantity=0.002&reduceOnly=true&newClientOrderId=stop-1"
        );
    }

    #[test]
    fn test_limit_without_price_is_rejected() {
        let mut req = OrderRequest::limit("BTCUSDT", Side::Buy, dec("1"), dec("100"));
        req.price = None;

        let err = req.validate().unwrap_err();
        assert!(err.is_validation());
        assert!(err.to_string().contains("limit orders require a price"));
    }

    #[test]
    fn test_stop_limit_requires_stop_price() {
        let mut req = OrderRequest::stop_limit("BTCUSDT", Side::Sell, dec("1"), dec("100"), dec("99"));
        req.stop_price = None;

        let err = req.validate().unwrap_err();
        assert!(err.to_string().contains("stop-limit orders require a stop price"));
    }

    #[test]
    fn test_non_positive_quantity_is_rejected() {
        let req = OrderRequest::market("BTCUSDT", Side::Buy, Decimal::ZERO);
        assert!(req.validate().unwrap_err().is_validation());

        let req = OrderRequest::limit("BTCUSDT", Side::Buy, dec("1"), dec("-5"));
        assert!(req.validate().unwrap_err().to_string().contains("price must be positive"));
    }

    #[test]
    fn test_market_order_ignores_price_fields() {
        let mut req = OrderRequest::market("BTCUSDT", Side::Buy, dec("1"));
        req.price = Some(dec("10"));

        let params = req.to_params();
        assert!(!params.contains_key("price"));
        assert!(!params.contains_key("timeInForce"));
    }

    #[test]
    fn test_order_query_params() {
        let query = OrderQuery::new("btcusdt", Some(42), Some("abc".to_string()));
        assert_eq!(
            query.to_params().to_query_string(),
            "symbol=BTCUSDT&orderId=42&origClientOrderId=abc"
        );

        let query = OrderQuery::by_client_order_id("ethusdt", "my-id");
        assert_eq!(query.to_params().to_query_string(), "symbol=ETHUSDT&origClientOrderId=my-id");
    }

    #[test]
    fn test_order_query_requires_an_id() {
        let query = OrderQuery::new("BTCUSDT", None, None);
        assert!(query.validate().unwrap_err().is_validation());
        assert!(OrderQuery::by_order_id("BTCUSDT", 1).validate().is_ok());
    }

    #[test]
    fn test_blank_client_order_id_counts_as_absent() {
        let query = OrderQuery::new("BTCUSDT", None, Some("   ".to_string()));
        assert_eq!(query.orig_client_order_id, None);
        assert!(query.validate().unwrap_err().is_validation());

        let query = OrderQuery {
            symbol: "BTCUSDT".to_string(),
            order_id: Some(9),
            orig_client_order_id: Some(String::new()),
        };
        assert!(query.validate().is_ok());
        assert_eq!(query.to_params().to_query_string(), "symbol=BTCUSDT&orderId=9");

        let query = OrderQuery::by_client_order_id("BTCUSDT", "  my-id ");
        assert_eq!(query.to_params().to_query_string(), "symbol=BTCUSDT&origClientOrderId=my-id");
    }
}

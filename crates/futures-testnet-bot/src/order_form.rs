/*
[INPUT]:  Order fields collected by the CLI or the dashboard
[OUTPUT]: Validated adapter OrderRequest and the dispatcher to send it with
[POS]:    Shared front-end logic between CLI and dashboard
[UPDATE]: When adding order kinds or order options
*/

use std::fmt;
use std::str::FromStr;

use anyhow::{Context, Result};
use clap::ValueEnum;
use futures_testnet_adapter::{
    Dispatch, DryRunDispatcher, FuturesClient, FuturesError, OrderRequest, Side, TimeInForce,
};
use rust_decimal::Decimal;
use tracing::{info, warn};

use crate::config::BotConfig;

/// Order kinds offered to the user
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum OrderKind {
    Market,
    Limit,
    #[value(name = "stop-limit", alias = "stop_limit", alias = "stop")]
    StopLimit,
}

impl OrderKind {
    pub const ALL: [OrderKind; 3] = [OrderKind::Market, OrderKind::Limit, OrderKind::StopLimit];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderKind::Market => "market",
            OrderKind::Limit => "limit",
            OrderKind::StopLimit => "stop-limit",
        }
    }

    pub fn needs_price(&self) -> bool {
        !matches!(self, OrderKind::Market)
    }

    pub fn needs_stop_price(&self) -> bool {
        matches!(self, OrderKind::StopLimit)
    }
}

impl fmt::Display for OrderKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fields both front-ends collect before an order is built
#[derive(Debug, Clone, PartialEq)]
pub struct OrderForm {
    pub kind: OrderKind,
    pub side: Side,
    pub symbol: String,
    pub quantity: Decimal,
    pub price: Option<Decimal>,
    pub stop_price: Option<Decimal>,
    pub time_in_force: TimeInForce,
    pub reduce_only: bool,
    pub client_order_id: Option<String>,
}

impl OrderForm {
    pub fn new(kind: OrderKind, side: Side, symbol: impl Into<String>, quantity: Decimal) -> Self {
        Self {
            kind,
            side,
            symbol: symbol.into(),
            quantity,
            price: None,
            stop_price: None,
            time_in_force: TimeInForce::default(),
            reduce_only: false,
            client_order_id: None,
        }
    }

    /// Build and validate the adapter request
    pub fn into_request(self) -> futures_testnet_adapter::Result<OrderRequest> {
        let request = match self.kind {
            OrderKind::Market => {
                if self.price.is_some() || self.stop_price.is_some() {
                    warn!(symbol = %self.symbol, "price ignored for market order");
                }
                OrderRequest::market(&self.symbol, self.side, self.quantity)
            }
            OrderKind::Limit => {
                let price = self
                    .price
                    .ok_or_else(|| FuturesError::Validation("limit orders require a price".to_string()))?;
                OrderRequest::limit(&self.symbol, self.side, self.quantity, price)
                    .with_time_in_force(self.time_in_force)
            }
            OrderKind::StopLimit => {
                let price = self.price.ok_or_else(|| {
                    FuturesError::Validation("stop-limit orders require a price".to_string())
                })?;
                let stop_price = self.stop_price.ok_or_else(|| {
                    FuturesError::Validation("stop-limit orders require a stop price".to_string())
                })?;
                OrderRequest::stop_limit(&self.symbol, self.side, self.quantity, price, stop_price)
                    .with_time_in_force(self.time_in_force)
            }
        };

        let mut request = request.with_reduce_only(self.reduce_only);
        if let Some(id) = self.client_order_id.filter(|id| !id.trim().is_empty()) {
            request = request.with_client_order_id(id.trim());
        }
        request.validate()?;
        Ok(request)
    }
}

/// Parse a strictly positive decimal (quantity, price, stop price)
pub fn parse_positive_decimal(input: &str) -> std::result::Result<Decimal, String> {
    let value = Decimal::from_str(input.trim()).map_err(|err| format!("invalid number {input:?}: {err}"))?;
    if value <= Decimal::ZERO {
        return Err(format!("must be positive, got {value}"));
    }
    Ok(value)
}

/// Dry run swaps only the dispatcher; no credentials are needed for it
pub fn build_dispatcher(config: &BotConfig, dry_run: bool) -> Result<Box<dyn Dispatch>> {
    if dry_run {
        info!("dry-run mode: requests are logged, not sent");
        return Ok(Box::new(DryRunDispatcher::new()));
    }

    let credentials = config.credentials()?;
    let client = FuturesClient::with_config_and_base_url(
        credentials,
        config.client_config(),
        &config.base_url,
    )
    .context("build futures client")?;
    info!(base_url = %config.base_url, "futures client ready");
    Ok(Box::new(client))
}

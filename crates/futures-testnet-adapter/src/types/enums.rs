/*
[INPUT]:  Order fields as typed by users or sent by the exchange
[OUTPUT]: Typed order enums with wire rendering and lenient parsing
[POS]:    Data layer - order vocabulary shared by requests and CLI
[UPDATE]: When the exchange adds order types or time-in-force values
*/

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::http::FuturesError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Side {
    Buy,
    Sell,
}

impl Side {
    pub fn as_str(&self) -> &'static str {
        match self {
            Side::Buy => "BUY",
            Side::Sell => "SELL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum OrderType {
    Market,
    Limit,
    /// Stop-limit: triggers at `stopPrice`, then rests at `price`
    Stop,
}

impl OrderType {
    pub fn as_str(&self) -> &'static str {
        match self {
            OrderType::Market => "MARKET",
            OrderType::Limit => "LIMIT",
            OrderType::Stop => "STOP",
        }
    }

    /// Whether the order carries `price` and `timeInForce`
    pub fn is_priced(&self) -> bool {
        matches!(self, OrderType::Limit | OrderType::Stop)
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum TimeInForce {
    #[default]
    Gtc,
    Ioc,
    Fok,
    /// Good-till-crossing (post only)
    Gtx,
}

impl TimeInForce {
    pub fn as_str(&self) -> &'static str {
        match self {
            TimeInForce::Gtc => "GTC",
            TimeInForce::Ioc => "IOC",
            TimeInForce::Fok => "FOK",
            TimeInForce::Gtx => "GTX",
        }
    }
}

impl fmt::Display for Side {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for OrderType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for TimeInForce {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Side {
    type Err = FuturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "BUY" => Ok(Side::Buy),
            "SELL" => Ok(Side::Sell),
            other => Err(FuturesError::Validation(format!(
                "invalid side `{other}`; expected BUY or SELL"
            ))),
        }
    }
}

impl FromStr for OrderType {
    type Err = FuturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().replace('_', "-").as_str() {
            "MARKET" => Ok(OrderType::Market),
            "LIMIT" => Ok(OrderType::Limit),
            "STOP" | "STOP-LIMIT" => Ok(OrderType::Stop),
            other => Err(FuturesError::Validation(format!(
                "invalid order type `{other}`; expected MARKET, LIMIT or STOP"
            ))),
        }
    }
}

impl FromStr for TimeInForce {
    type Err = FuturesError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_uppercase().as_str() {
            "GTC" => Ok(TimeInForce::Gtc),
            "IOC" => Ok(TimeInForce::Ioc),
            "FOK" => Ok(TimeInForce::Fok),
            "GTX" => Ok(TimeInForce::Gtx),
            other => Err(FuturesError::Validation(format!(
                "invalid time in force `{other}`; expected GTC, IOC, FOK or GTX"
            ))),
        }
    }
}

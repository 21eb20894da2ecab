/*
[INPUT]:  HTTP method, endpoint path, query parameters, signed flag
[OUTPUT]: Parsed JSON response or FuturesError
[POS]:    HTTP layer - the single seam between order building and transport
[UPDATE]: When the dispatch contract changes
*/

use async_trait::async_trait;
use reqwest::Method;
use serde_json::Value;

use crate::http::Result;
use crate::types::QueryParams;

/// Sends one request and returns the parsed body.
///
/// [`FuturesClient`](crate::http::FuturesClient) talks to the exchange;
/// [`DryRunDispatcher`](crate::http::DryRunDispatcher) and test doubles
/// substitute a synthetic response without touching the order-building code.
#[async_trait]
pub trait Dispatch: Send + Sync {
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        signed: bool,
    ) -> Result<Value>;
}

#[async_trait]
impl<D: Dispatch + ?Sized> Dispatch for Box<D> {
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        signed: bool,
    ) -> Result<Value> {
        (**self).dispatch(method, path, params, signed).await
    }
}

#[async_trait]
impl<D: Dispatch + ?Sized> Dispatch for &D {
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        signed: bool,
    ) -> Result<Value> {
        (**self).dispatch(method, path, params, signed).await
    }
}

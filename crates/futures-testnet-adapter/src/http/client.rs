/*
[INPUT]:  Credentials, base URL, timeouts and recvWindow
[OUTPUT]: Signed HTTP round trips against the futures REST API
[POS]:    HTTP layer - core client implementation
[UPDATE]: When adding connection options or changing client behavior
*/

use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use reqwest::{Client, Method, Url};
use secrecy::SecretString;
use serde_json::Value;
use tracing::{debug, error};

use crate::http::dispatch::Dispatch;
use crate::http::signature::{DEFAULT_RECV_WINDOW, RequestSigner};
use crate::http::{FuturesError, Result};
use crate::types::QueryParams;

/// USDT-M futures testnet
pub const TESTNET_BASE_URL: &str = "https://testnet.binancefuture.com";

/// Header carrying the plain API key on every request (`X-MBX-APIKEY`)
pub const API_KEY_HEADER: &str = "x-mbx-apikey";

/// HTTP client configuration
#[derive(Debug, Clone)]
pub struct ClientConfig {
    pub timeout: Duration,
    pub connect_timeout: Duration,
    /// Server-side tolerance for request timestamps, in milliseconds
    pub recv_window: u64,
}

impl Default for ClientConfig {
    fn default() -> Self {
        Self {
            timeout: Duration::from_secs(10),
            connect_timeout: Duration::from_secs(5),
            recv_window: DEFAULT_RECV_WINDOW,
        }
    }
}

/// Exchange credentials. The secret only ever keys the HMAC.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub api_key: String,
    pub api_secret: SecretString,
}

impl Credentials {
    pub fn new(api_key: impl Into<String>, api_secret: impl Into<String>) -> Self {
        Self {
            api_key: api_key.into(),
            api_secret: SecretString::from(api_secret.into()),
        }
    }
}

/// Signed REST client for the futures API
#[derive(Debug)]
pub struct FuturesClient {
    http_client: Client,
    base_url: Url,
    api_key: String,
    signer: RequestSigner,
}

impl FuturesClient {
    /// Create a testnet client with default configuration
    pub fn new(credentials: Credentials) -> Result<Self> {
        Self::with_config(credentials, ClientConfig::default())
    }

    /// Create a testnet client with custom configuration
    pub fn with_config(credentials: Credentials, config: ClientConfig) -> Result<Self> {
        Self::with_config_and_base_url(credentials, config, TESTNET_BASE_URL)
    }

    /// Create a client against an arbitrary base URL (mainnet, mock servers)
    pub fn with_config_and_base_url(
        credentials: Credentials,
        config: ClientConfig,
        base_url: &str,
    ) -> Result<Self> {
        let base_url = Url::parse(base_url.trim_end_matches('/'))?;

        let api_key = HeaderValue::from_str(&credentials.api_key)
            .map_err(|err| FuturesError::Config(format!("invalid API key header: {err}")))?;
        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static(API_KEY_HEADER), api_key);

        let http_client = Client::builder()
            .timeout(config.timeout)
            .connect_timeout(config.connect_timeout)
            .default_headers(headers)
            .build()
            .map_err(|err| FuturesError::Config(format!("failed to build HTTP client: {err}")))?;

        Ok(Self {
            http_client,
            base_url,
            api_key: credentials.api_key,
            signer: RequestSigner::new(credentials.api_secret, config.recv_window),
        })
    }

    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    pub fn signer(&self) -> &RequestSigner {
        &self.signer
    }

    /// Add `timestamp`, `recvWindow` and `signature` to a copy of `params`
    pub fn sign(&self, params: &QueryParams) -> QueryParams {
        self.signer.sign(params)
    }

    /// Build the full URL for an endpoint path, keeping any base path prefix
    fn endpoint(&self, path: &str, params: &QueryParams) -> Result<Url> {
        let base = self.base_url.as_str().trim_end_matches('/');
        let mut url = Url::parse(&format!("{base}{path}"))?;
        if !params.is_empty() {
            url.set_query(Some(&params.to_query_string()));
        }
        Ok(url)
    }
}

#[async_trait]
impl Dispatch for FuturesClient {
    async fn dispatch(
        &self,
        method: Method,
        path: &str,
        params: QueryParams,
        signed: bool,
    ) -> Result<Value> {
        let params = if signed { self.sign(&params) } else { params };
        let url = self.endpoint(path, &params)?;

        debug!(method = %method, url = %url, params = %params, "request");

        let response = match self
            .http_client
            .request(method.clone(), url.clone())
            .send()
            .await
        {
            Ok(response) => response,
            Err(err) => {
                error!(method = %method, url = %url, error = %err, "HTTP error");
                return Err(FuturesError::transport(&err));
            }
        };

        let status = response.status();
        let body = match response.text().await {
            Ok(body) => body,
            Err(err) => {
                error!(method = %method, url = %url, status = status.as_u16(), error = %err, "HTTP error");
                return Err(FuturesError::transport(&err));
            }
        };

        debug!(url = %url, status = status.as_u16(), body = %body, "response");

        if !status.is_success() {
            error!(method = %method, url = %url, status = status.as_u16(), body = %body, "HTTP error");
            return Err(FuturesError::http_status(status, body));
        }

        match serde_json::from_str(&body) {
            Ok(value) => Ok(value),
            Err(err) => {
                error!(method = %method, url = %url, status = status.as_u16(), body = %body, error = %err, "HTTP error");
                Err(err.into())
            }
        }
    }
}

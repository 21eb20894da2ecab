/*
[INPUT]:  HTTP client configuration and API endpoints
[OUTPUT]: HTTP responses and typed API results
[POS]:    HTTP layer - REST API communication
[UPDATE]: When adding new endpoints or changing client behavior
*/

pub mod client;
pub mod dispatch;
pub mod dry_run;
pub mod error;
pub mod signature;
pub mod trade;

pub use error::{FuturesError, Result};
pub use signature::{DEFAULT_RECV_WINDOW, RequestSigner};

pub use client::{API_KEY_HEADER, ClientConfig, Credentials, FuturesClient, TESTNET_BASE_URL};
pub use dispatch::Dispatch;
pub use dry_run::{DRY_RUN_CLIENT_ORDER_ID, DRY_RUN_ORDER_ID, DryRunDispatcher};
pub use trade::{ORDER_PATH, OrderClient};

/*
[INPUT]:  Crate modules and public type definitions
[OUTPUT]: Public futures testnet adapter crate surface
[POS]:    Crate root - module wiring
[UPDATE]: When public modules or exports change
*/

pub mod http;
pub mod types;

// Re-export commonly used types from http
pub use http::{
    ClientConfig,
    Credentials,
    Dispatch,
    DryRunDispatcher,
    FuturesClient,
    FuturesError,
    OrderClient,
    RequestSigner,
    Result,
};

// Re-export all types
pub use types::*;

/*
[INPUT]:  Public API exports for futures-testnet-bot crate
[OUTPUT]: Module declarations and public re-exports
[POS]:    Crate root - library entry point
[UPDATE]: When adding new modules or public exports
*/

pub mod config;
pub mod logging;
pub mod order_form;

// Re-export main types for convenience
pub use config::BotConfig;
pub use logging::{LogBuffer, LogBufferHandle, LogWriterFactory, init_tracing};
pub use order_form::{OrderForm, OrderKind, build_dispatcher};

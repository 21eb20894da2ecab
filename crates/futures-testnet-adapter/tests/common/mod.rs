/*
[INPUT]:  Test configuration and mock server requirements
[OUTPUT]: Shared test utilities, fixtures, and log capture
[POS]:    Test infrastructure - shared across all test modules
[UPDATE]: When adding new test patterns or fixtures
*/

//! Common test utilities for futures-testnet-adapter tests

use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use futures_testnet_adapter::{ClientConfig, Credentials, FuturesClient};
use tracing::subscriber::DefaultGuard;
use tracing_subscriber::fmt::MakeWriter;
use wiremock::MockServer;

pub const TEST_API_KEY: &str = "test-api-key";
pub const TEST_API_SECRET: &str = "test-api-secret";

/// Setup a mock HTTP server for testing
pub async fn setup_mock_server() -> MockServer {
    MockServer::start().await
}

pub fn test_credentials() -> Credentials {
    Credentials::new(TEST_API_KEY, TEST_API_SECRET)
}

/// Client pointed at the mock server
#[allow(dead_code)]
pub fn client_for(server: &MockServer) -> FuturesClient {
    FuturesClient::with_config_and_base_url(test_credentials(), ClientConfig::default(), &server.uri())
        .expect("client init")
}

/// Log lines written while the guard is alive
#[derive(Clone, Default)]
pub struct CapturedLogs {
    buffer: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl CapturedLogs {
    pub fn contents(&self) -> String {
        let guard = self.buffer.lock().expect("log capture lock");
        String::from_utf8_lossy(&guard).into_owned()
    }
}

pub struct CapturedWriter {
    buffer: Arc<Mutex<Vec<u8>>>,
}

impl Write for CapturedWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut guard = self.buffer.lock().expect("log capture lock");
        guard.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl<'a> MakeWriter<'a> for CapturedLogs {
    type Writer = CapturedWriter;

    fn make_writer(&'a self) -> Self::Writer {
        CapturedWriter {
            buffer: self.buffer.clone(),
        }
    }
}

/// Capture DEBUG and above on the current thread
#[allow(dead_code)]
pub fn capture_logs() -> (CapturedLogs, DefaultGuard) {
    let logs = CapturedLogs::default();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(logs.clone())
        .with_max_level(tracing::Level::DEBUG)
        .with_ansi(false)
        .finish();
    let guard = tracing::subscriber::set_default(subscriber);
    (logs, guard)
}

use std::path::PathBuf;
use std::process::{Command, Output};

use serde_json::json;
use wiremock::matchers::{header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

const BINARY: &str = env!("CARGO_BIN_EXE_futures-testnet-bot");

/// Fresh working directory so no stray .env or bot.log is picked up
fn scratch_dir(name: &str) -> PathBuf {
    let dir = std::env::temp_dir().join(format!(
        "futures-testnet-bot-{name}-{}",
        std::process::id()
    ));
    std::fs::create_dir_all(&dir).expect("create scratch dir");
    dir
}

fn bot(dir: &PathBuf) -> Command {
    let mut command = Command::new(BINARY);
    command
        .current_dir(dir)
        .env_remove("BINANCE_API_KEY")
        .env_remove("BINANCE_API_SECRET")
        .env_remove("BOT_LOG_FILE")
        .env_remove("RUST_LOG");
    command
}

fn describe(output: &Output) -> String {
    format!(
        "status: {}\nstdout: {}\nstderr: {}",
        output.status,
        String::from_utf8_lossy(&output.stdout),
        String::from_utf8_lossy(&output.stderr)
    )
}

#[test]
fn dry_run_market_order_needs_no_credentials() {
    let dir = scratch_dir("dry-run");
    let log_file = dir.join("session.log");

    let output = bot(&dir)
        .args(["order", "market", "BUY", "btcusdt", "0.01", "--dry-run", "--log-file"])
        .arg(&log_file)
        .output()
        .expect("Failed to start futures-testnet-bot binary");

    assert!(output.status.success(), "{}", describe(&output));
    let stdout = String::from_utf8_lossy(&output.stdout);
    assert!(stdout.contains("999999999"), "{}", describe(&output));
    assert!(stdout.contains("BTCUSDT"), "{}", describe(&output));

    let logged = std::fs::read_to_string(&log_file).expect("log file written");
    assert!(logged.contains("DRY-RUN"), "log file:\n{logged}");
}

#[test]
fn live_order_without_credentials_fails() {
    let dir = scratch_dir("no-creds");

    let output = bot(&dir)
        .args(["order", "market", "BUY", "BTCUSDT", "0.01", "--log-file"])
        .arg(dir.join("session.log"))
        .output()
        .expect("Failed to start futures-testnet-bot binary");

    assert!(!output.status.success(), "{}", describe(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("missing API credentials"), "{}", describe(&output));
}

#[test]
fn limit_order_without_price_fails() {
    let dir = scratch_dir("no-price");

    let output = bot(&dir)
        .args(["order", "limit", "SELL", "ETHUSDT", "1", "--dry-run", "--log-file"])
        .arg(dir.join("session.log"))
        .output()
        .expect("Failed to start futures-testnet-bot binary");

    assert!(!output.status.success(), "{}", describe(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(stderr.contains("limit orders require a price"), "{}", describe(&output));
}

#[test]
fn cancel_with_blank_client_order_id_fails() {
    let dir = scratch_dir("blank-id");

    let output = bot(&dir)
        .args(["cancel", "BTCUSDT", "--client-order-id", "", "--dry-run", "--log-file"])
        .arg(dir.join("session.log"))
        .output()
        .expect("Failed to start futures-testnet-bot binary");

    assert!(!output.status.success(), "{}", describe(&output));
    let stderr = String::from_utf8_lossy(&output.stderr);
    assert!(
        stderr.contains("either an order id or a client order id is required"),
        "{}",
        describe(&output)
    );
}

#[tokio::test(flavor = "multi_thread")]
async fn live_order_hits_configured_base_url() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/fapi/v1/order"))
        .and(header("x-mbx-apikey", "cli-key"))
        .and(query_param("symbol", "ETHUSDT"))
        .and(query_param("type", "LIMIT"))
        .and(query_param("price", "3000.25"))
        .and(query_param("timeInForce", "GTC"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "orderId": 8_389_765_519_i64,
            "symbol": "ETHUSDT",
            "status": "NEW",
            "clientOrderId": "cli-test"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let dir = scratch_dir("live");
    let mut command = bot(&dir);
    command
        .args(["order", "limit", "SELL", "ETHUSDT", "1.5", "--price", "3000.25"])
        .args(["--api-key", "cli-key", "--api-secret", "cli-secret"])
        .args(["--base-url", &server.uri()])
        .arg("--log-file")
        .arg(dir.join("session.log"));

    let output = tokio::task::spawn_blocking(move || command.output())
        .await
        .expect("join")
        .expect("Failed to start futures-testnet-bot binary");

    assert!(output.status.success(), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stdout).contains("8389765519"));
}

#[tokio::test(flavor = "multi_thread")]
async fn exchange_rejection_exits_non_zero() {
    let server = MockServer::start().await;
    Mock::given(method("DELETE"))
        .and(path("/fapi/v1/order"))
        .respond_with(
            ResponseTemplate::new(400)
                .set_body_raw(r#"{"code":-2011,"msg":"Unknown order sent."}"#, "application/json"),
        )
        .expect(1)
        .mount(&server)
        .await;

    let dir = scratch_dir("rejected");
    let log_file = dir.join("session.log");
    let mut command = bot(&dir);
    command
        .args(["cancel", "BTCUSDT", "--order-id", "1"])
        .args(["--api-key", "cli-key", "--api-secret", "cli-secret"])
        .args(["--base-url", &server.uri()])
        .arg("--log-file")
        .arg(&log_file);

    let output = tokio::task::spawn_blocking(move || command.output())
        .await
        .expect("join")
        .expect("Failed to start futures-testnet-bot binary");

    assert!(!output.status.success(), "{}", describe(&output));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Unknown order sent."));

    let logged = std::fs::read_to_string(&log_file).expect("log file written");
    assert!(logged.contains("status=400"), "log file:\n{logged}");
}

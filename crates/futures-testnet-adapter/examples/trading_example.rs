/*
[INPUT]:  Order parameters, optional BINANCE_API_KEY / BINANCE_API_SECRET
[OUTPUT]: Signed query preview and order responses (dry run unless credentials are set)
[POS]:    Examples - trading operations
[UPDATE]: When trading API changes
*/

use futures_testnet_adapter::*;
use rust_decimal::Decimal;
use std::str::FromStr;

/// Example: placing and cancelling orders
///
/// Without credentials in the environment every call goes through
/// `DryRunDispatcher`; with them, through a testnet `FuturesClient`.
#[tokio::main]
async fn main() {
    println!("=== Futures Testnet Trading Example ===\n");

    let order_req = OrderRequest::limit(
        "BTCUSDT",
        Side::Buy,
        Decimal::from_str("0.01").unwrap_or_default(),
        Decimal::from_str("50000").unwrap_or_default(),
    );
    println!("Order request:\n  {}", order_req.to_params());

    let signer = RequestSigner::new("demo-secret".to_string().into(), 5000);
    println!("Signed query:\n  {}\n", signer.sign(&order_req.to_params()));

    let dispatcher: Box<dyn Dispatch> = match (
        std::env::var("BINANCE_API_KEY"),
        std::env::var("BINANCE_API_SECRET"),
    ) {
        (Ok(key), Ok(secret)) => match FuturesClient::new(Credentials::new(key, secret)) {
            Ok(client) => {
                println!("✓ Testnet client created (LIVE)");
                Box::new(client)
            }
            Err(e) => {
                eprintln!("Failed to create client: {}", e);
                return;
            }
        },
        _ => {
            println!("✓ No credentials found, using dry run");
            Box::new(DryRunDispatcher::new())
        }
    };
    let orders = OrderClient::new(dispatcher);

    let placed = match orders.place_order(&order_req).await {
        Ok(resp) => resp,
        Err(e) => {
            eprintln!("Order failed: {}", e);
            return;
        }
    };
    println!("\nPlaced: {:?}", placed);

    if let Some(order_id) = placed.order_id() {
        match orders
            .cancel_order(&OrderQuery::by_order_id("BTCUSDT", order_id))
            .await
        {
            Ok(resp) => println!("Cancelled: {:?}", resp.status()),
            Err(e) => eprintln!("Cancel failed: {}", e),
        }
    }

    println!("\n✓ Trading example complete");
}

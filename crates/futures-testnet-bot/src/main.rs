/*
[INPUT]:  CLI arguments, YAML configuration file, environment / .env
[OUTPUT]: Placed, queried or cancelled orders printed as JSON
[POS]:    Binary entry point
[UPDATE]: When changing CLI flags, subcommands, or startup flow
*/

mod cli;

use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::{Context, Result};
use clap::{Args, Parser, Subcommand};
use console::style;
use rust_decimal::Decimal;
use tracing::{error, info};

use futures_testnet_adapter::{OrderClient, OrderQuery, OrderResponse, Side, TimeInForce};
use futures_testnet_bot::logging::LOG_BUFFER_CAPACITY;
use futures_testnet_bot::order_form::parse_positive_decimal;
use futures_testnet_bot::{BotConfig, LogBuffer, OrderForm, OrderKind, build_dispatcher, init_tracing};

#[derive(Parser, Debug)]
#[command(name = "futures-testnet-bot", version, about = "Binance USDT-M futures testnet order bot")]
struct Cli {
    #[arg(long, global = true, value_name = "KEY")]
    api_key: Option<String>,
    #[arg(long, global = true, value_name = "SECRET")]
    api_secret: Option<String>,
    #[arg(long, global = true, value_name = "URL")]
    base_url: Option<String>,
    #[arg(long = "config", global = true, value_name = "PATH")]
    config_path: Option<PathBuf>,
    #[arg(long, global = true, value_name = "PATH")]
    log_file: Option<PathBuf>,
    #[arg(long, global = true, value_name = "LEVEL")]
    log_level: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Place a market, limit or stop-limit order
    Order(OrderArgs),
    /// Look up an order by id or client order id
    Query(LookupArgs),
    /// Cancel an order by id or client order id
    Cancel(LookupArgs),
    /// Interactive order form
    Dashboard,
}

#[derive(Args, Debug)]
struct OrderArgs {
    #[arg(value_enum)]
    kind: OrderKind,
    /// BUY or SELL
    side: Side,
    symbol: String,
    #[arg(value_parser = parse_positive_decimal)]
    quantity: Decimal,
    #[arg(long, value_parser = parse_positive_decimal)]
    price: Option<Decimal>,
    #[arg(long, value_parser = parse_positive_decimal)]
    stop_price: Option<Decimal>,
    #[arg(long, default_value = "GTC")]
    time_in_force: TimeInForce,
    #[arg(long)]
    reduce_only: bool,
    #[arg(long)]
    client_order_id: Option<String>,
    /// Log the request instead of sending it
    #[arg(long)]
    dry_run: bool,
}

#[derive(Args, Debug)]
struct LookupArgs {
    symbol: String,
    #[arg(long)]
    order_id: Option<i64>,
    #[arg(long)]
    client_order_id: Option<String>,
    #[arg(long)]
    dry_run: bool,
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenv::dotenv().ok();
    let args = Cli::parse();

    let config = match resolve_config(&args) {
        Ok(config) => config,
        Err(err) => return report(&err),
    };

    let log_buffer = matches!(args.command, Command::Dashboard)
        .then(|| LogBuffer::handle(LOG_BUFFER_CAPACITY));
    let _guard = match init_tracing(&config.log_file, &config.log_level, log_buffer.clone()) {
        Ok(guard) => guard,
        Err(err) => return report(&err),
    };

    info!(log_file = %config.log_file.display(), base_url = %config.base_url, "starting futures-testnet-bot");

    let result = match args.command {
        Command::Order(order) => run_order(&config, order).await,
        Command::Query(lookup) => run_query(&config, lookup).await,
        Command::Cancel(lookup) => run_cancel(&config, lookup).await,
        Command::Dashboard => {
            cli::dashboard::run_dashboard(config, log_buffer.unwrap_or_else(|| LogBuffer::handle(0)))
                .await
        }
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!(error = %format!("{err:#}"), "command failed");
            report(&err)
        }
    }
}

fn report(err: &anyhow::Error) -> ExitCode {
    eprintln!("{} {err:#}", style("Error:").red().bold());
    ExitCode::FAILURE
}

/// Defaults < YAML file < environment < flags
fn resolve_config(args: &Cli) -> Result<BotConfig> {
    let mut config = BotConfig::load(args.config_path.as_deref()).context("load config")?;
    if let Some(key) = &args.api_key {
        config.api_key = Some(key.clone());
    }
    if let Some(secret) = &args.api_secret {
        config.api_secret = Some(secret.clone());
    }
    if let Some(url) = &args.base_url {
        config.base_url = url.clone();
    }
    if let Some(path) = &args.log_file {
        config.log_file = path.clone();
    }
    if let Some(level) = &args.log_level {
        config.log_level = level.clone();
    }
    Ok(config)
}

async fn run_order(config: &BotConfig, args: OrderArgs) -> Result<()> {
    let form = OrderForm {
        kind: args.kind,
        side: args.side,
        symbol: args.symbol,
        quantity: args.quantity,
        price: args.price,
        stop_price: args.stop_price,
        time_in_force: args.time_in_force,
        reduce_only: args.reduce_only,
        client_order_id: args.client_order_id,
    };
    let request = form.into_request().context("invalid order")?;

    let orders = OrderClient::new(build_dispatcher(config, args.dry_run)?);
    let response = orders.place_order(&request).await.context("place order")?;
    print_response(&response)
}

async fn run_query(config: &BotConfig, args: LookupArgs) -> Result<()> {
    let query = OrderQuery::new(&args.symbol, args.order_id, args.client_order_id);
    let orders = OrderClient::new(build_dispatcher(config, args.dry_run)?);
    let response = orders.get_order(&query).await.context("query order")?;
    print_response(&response)
}

async fn run_cancel(config: &BotConfig, args: LookupArgs) -> Result<()> {
    let query = OrderQuery::new(&args.symbol, args.order_id, args.client_order_id);
    let orders = OrderClient::new(build_dispatcher(config, args.dry_run)?);
    let response = orders.cancel_order(&query).await.context("cancel order")?;
    print_response(&response)
}

fn print_response(response: &OrderResponse) -> Result<()> {
    let value = response.as_value();
    let rendered = serde_json::to_string_pretty(value)?;
    info!(response = %value, "order response");
    println!("{rendered}");
    Ok(())
}

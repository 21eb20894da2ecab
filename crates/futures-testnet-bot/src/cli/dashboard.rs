/*
[INPUT]:  Resolved configuration, session log buffer, user input via terminal
[OUTPUT]: Orders placed / queried / cancelled, responses and recent logs printed
[POS]:    CLI interactive dashboard
[UPDATE]: When changing dashboard prompts or actions
*/

use std::sync::PoisonError;

use anyhow::{Context, Result};
use console::style;
use dialoguer::{Confirm, Input, Password, Select, theme::ColorfulTheme};
use rust_decimal::Decimal;
use tracing::{error, info};

use futures_testnet_adapter::{
    Dispatch, OrderClient, OrderQuery, OrderResponse, Side, TimeInForce,
};
use futures_testnet_bot::order_form::parse_positive_decimal;
use futures_testnet_bot::{BotConfig, LogBufferHandle, OrderForm, OrderKind, build_dispatcher};

const LOG_TAIL_LINES: usize = 20;

pub async fn run_dashboard(mut config: BotConfig, logs: LogBufferHandle) -> Result<()> {
    let theme = ColorfulTheme::default();
    println!("{}", style("Binance Futures Testnet Bot").bold().cyan());

    prompt_connection(&mut config, &theme)?;
    let mut dry_run = Confirm::with_theme(&theme)
        .with_prompt("Dry run (log requests, send nothing)?")
        .default(true)
        .interact()?;

    let mut orders = connect(&config, dry_run)?;

    loop {
        let mode = if dry_run {
            style("DRY-RUN").yellow().to_string()
        } else {
            style("LIVE").red().bold().to_string()
        };
        let actions = [
            "Place order",
            "Query order",
            "Cancel order",
            "Toggle dry run",
            "Exit",
        ];
        let selection = Select::with_theme(&theme)
            .with_prompt(format!("Select action [{mode}]"))
            .items(&actions)
            .default(0)
            .interact()?;

        let outcome = match selection {
            0 => place_order(&orders, &theme).await,
            1 => lookup_order(&orders, &theme, false).await,
            2 => lookup_order(&orders, &theme, true).await,
            3 => {
                match connect(&config, !dry_run) {
                    Ok(next) => {
                        dry_run = !dry_run;
                        orders = next;
                        info!(dry_run, "dispatch mode changed");
                    }
                    Err(err) => print_error(&err),
                }
                continue;
            }
            _ => return Ok(()),
        };

        match outcome {
            Ok(Some(response)) => print_response(&response)?,
            Ok(None) => {}
            Err(err) => {
                error!(error = %format!("{err:#}"), "dashboard action failed");
                print_error(&err);
            }
        }
        print_log_tail(&logs, LOG_TAIL_LINES);
    }
}

fn connect(config: &BotConfig, dry_run: bool) -> Result<OrderClient<Box<dyn Dispatch>>> {
    Ok(OrderClient::new(build_dispatcher(config, dry_run)?))
}

fn prompt_connection(config: &mut BotConfig, theme: &ColorfulTheme) -> Result<()> {
    let api_key: String = Input::with_theme(theme)
        .with_prompt("API key")
        .with_initial_text(config.api_key.clone().unwrap_or_default())
        .allow_empty(true)
        .interact_text()?;
    if !api_key.trim().is_empty() {
        config.api_key = Some(api_key.trim().to_string());
    }

    let secret_prompt = if config.api_secret.is_some() {
        "API secret (blank keeps the configured one)"
    } else {
        "API secret"
    };
    let api_secret = Password::with_theme(theme)
        .with_prompt(secret_prompt)
        .allow_empty_password(true)
        .interact()?;
    if !api_secret.is_empty() {
        config.api_secret = Some(api_secret);
    }

    config.base_url = Input::with_theme(theme)
        .with_prompt("Base URL")
        .default(config.base_url.clone())
        .interact_text()?;
    Ok(())
}

async fn place_order(
    orders: &OrderClient<Box<dyn Dispatch>>,
    theme: &ColorfulTheme,
) -> Result<Option<OrderResponse>> {
    let kinds = OrderKind::ALL;
    let kind = kinds[Select::with_theme(theme)
        .with_prompt("Order type")
        .items(&kinds)
        .default(0)
        .interact()?];

    let sides = [Side::Buy, Side::Sell];
    let side = sides[Select::with_theme(theme)
        .with_prompt("Side")
        .items(&sides)
        .default(0)
        .interact()?];

    let symbol: String = Input::with_theme(theme)
        .with_prompt("Symbol")
        .default("BTCUSDT".to_string())
        .interact_text()?;
    let quantity = prompt_decimal(theme, "Quantity")?;

    let mut form = OrderForm::new(kind, side, symbol, quantity);
    if kind.needs_price() {
        form.price = Some(prompt_decimal(theme, "Price")?);
    }
    if kind.needs_stop_price() {
        form.stop_price = Some(prompt_decimal(theme, "Stop price")?);
    }
    if kind.needs_price() {
        let choices = [TimeInForce::Gtc, TimeInForce::Ioc, TimeInForce::Fok, TimeInForce::Gtx];
        form.time_in_force = choices[Select::with_theme(theme)
            .with_prompt("Time in force")
            .items(&choices)
            .default(0)
            .interact()?];
    }
    form.reduce_only = Confirm::with_theme(theme)
        .with_prompt("Reduce only?")
        .default(false)
        .interact()?;
    let client_order_id: String = Input::with_theme(theme)
        .with_prompt("Client order id (optional)")
        .allow_empty(true)
        .interact_text()?;
    form.client_order_id = Some(client_order_id);

    let request = form.into_request().context("invalid order")?;
    let confirmed = Confirm::with_theme(theme)
        .with_prompt(format!(
            "Send {} {} {} {}?",
            request.order_type, request.side, request.quantity, request.symbol
        ))
        .default(true)
        .interact()?;
    if !confirmed {
        println!("{}", style("Order discarded.").yellow());
        return Ok(None);
    }

    let response = orders.place_order(&request).await.context("place order")?;
    Ok(Some(response))
}

async fn lookup_order(
    orders: &OrderClient<Box<dyn Dispatch>>,
    theme: &ColorfulTheme,
    cancel: bool,
) -> Result<Option<OrderResponse>> {
    let symbol: String = Input::with_theme(theme)
        .with_prompt("Symbol")
        .default("BTCUSDT".to_string())
        .interact_text()?;
    let order_id: String = Input::with_theme(theme)
        .with_prompt("Order id (blank to use client order id)")
        .allow_empty(true)
        .validate_with(|input: &String| -> std::result::Result<(), String> {
            if input.trim().is_empty() || input.trim().parse::<i64>().is_ok() {
                Ok(())
            } else {
                Err("order id must be an integer".to_string())
            }
        })
        .interact_text()?;
    let order_id = order_id.trim().parse::<i64>().ok();

    let client_order_id = if order_id.is_none() {
        let id: String = Input::with_theme(theme)
            .with_prompt("Client order id")
            .interact_text()?;
        Some(id.trim().to_string())
    } else {
        None
    };

    let query = OrderQuery::new(&symbol, order_id, client_order_id);
    let response = if cancel {
        orders.cancel_order(&query).await.context("cancel order")?
    } else {
        orders.get_order(&query).await.context("query order")?
    };
    Ok(Some(response))
}

fn prompt_decimal(theme: &ColorfulTheme, prompt: &str) -> Result<Decimal> {
    let raw: String = Input::with_theme(theme)
        .with_prompt(prompt)
        .validate_with(|input: &String| parse_positive_decimal(input).map(|_| ()))
        .interact_text()?;
    parse_positive_decimal(&raw).map_err(anyhow::Error::msg)
}

fn print_response(response: &OrderResponse) -> Result<()> {
    let value = response.as_value();
    info!(response = %value, "order response");
    println!("{}", style("Response").bold().green());
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

fn print_error(err: &anyhow::Error) {
    println!("{} {err:#}", style("Error:").red().bold());
}

fn print_log_tail(logs: &LogBufferHandle, count: usize) {
    let lines = recent_lines(logs, count);
    if lines.is_empty() {
        return;
    }
    println!("{}", style("Recent log").bold());
    for line in lines {
        println!("  {}", style(line).dim());
    }
}

fn recent_lines(logs: &LogBufferHandle, count: usize) -> Vec<String> {
    logs.lock().unwrap_or_else(PoisonError::into_inner).tail(count)
}

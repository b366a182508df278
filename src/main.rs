//! Polymarket copy bot
//!
//! Mirrors the latest qualifying bet of a target account with a fixed USDC
//! amount, unless the operator already holds that position.

mod api;
mod bot;
mod error;
mod models;
mod trading;

use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing::{error, info, Level};
use tracing_subscriber::FmtSubscriber;

use crate::api::{ClobClient, DataClient, HoldingsSource};
use crate::bot::{print_holdings, CopyBot};
use crate::error::CopyError;
use crate::trading::{ConfigArgs, CopyConfig, TitleFilter};

/// Polymarket copy-trading bot CLI.
#[derive(Parser)]
#[command(name = "polymirror")]
#[command(about = "Copy the latest bet of a Polymarket trader", long_about = None)]
struct Cli {
    /// Log level (trace, debug, info, warn, error)
    #[arg(short, long, default_value = "warn")]
    log_level: String,

    #[command(flatten)]
    config: ConfigArgs,

    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Copy the target's latest bet once (default)
    Run,

    /// Show current configuration
    Config,

    /// List an account's current positions
    Positions {
        /// Wallet address (defaults to the funder address)
        address: Option<String>,
    },
}

#[tokio::main]
async fn main() -> ExitCode {
    dotenvy::dotenv().ok();
    let cli = Cli::parse();

    // Setup logging
    let log_level = match cli.log_level.to_lowercase().as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();
    if let Err(e) = tracing::subscriber::set_global_default(subscriber) {
        eprintln!("Failed to install logger: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(error = %e, "Run failed");
            println!("\n{}", error_report(&e));
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = cli.config.into_config()?;

    match cli.command.unwrap_or(Commands::Run) {
        Commands::Run => {
            info!(
                target = %config.target_address,
                dry_run = config.dry_run,
                "Starting copy run"
            );

            let data = DataClient::new(&config)?;
            let bot = CopyBot::new(&config, &data);
            let evaluation = bot.evaluate().await?;
            info!(
                target_name = %evaluation.target_name,
                history = evaluation.history.len(),
                holdings = evaluation.holdings.len(),
                decision = %evaluation.decision,
                "Decision reached"
            );

            if evaluation.decision.is_place_order() && !config.dry_run {
                let clob = ClobClient::connect(&config).await?;
                bot.execute(&evaluation, Some(&clob)).await?;
            } else {
                bot.execute::<ClobClient>(&evaluation, None).await?;
            }
        }

        Commands::Config => print_config(&config),

        Commands::Positions { address } => {
            let address = address.unwrap_or_else(|| config.funder_address.clone());
            let data = DataClient::new(&config)?;
            let positions = data.get_positions(&address).await?;

            println!("\n=== Positions: {} ===", address);
            print_holdings(&positions);
            for pos in positions.iter().filter(|p| !p.is_closed()) {
                println!(
                    "      {} #{} {:.2} shares",
                    pos.market_id, pos.outcome_index, pos.size
                );
            }
        }
    }

    Ok(())
}

/// Operator-facing message for a failed run.
///
/// Every upstream read failure (non-2xx, timeout, undecodable body) is
/// reported as an API error.
fn error_report(e: &anyhow::Error) -> String {
    match e.downcast_ref::<CopyError>() {
        Some(CopyError::Fetch { status, body, .. }) => {
            format!("Polymarket API Error: {} - {}", status, body)
        }
        Some(err) if err.is_fetch_failure() => format!("Polymarket API Error: {}", err),
        _ => format!("Error: {}", e),
    }
}

fn print_config(config: &CopyConfig) {
    println!("\n=== Copy Configuration ===\n");
    println!("Accounts:");
    println!("  Target:               {}", config.target_address);
    println!("  Funder:               {}", config.funder_address);
    println!("  Signature Type:       {}", config.signature_type);
    println!(
        "  Private Key:          {}",
        if config.private_key.is_some() { "set" } else { "not set" }
    );

    println!("\nTrading:");
    println!("  Bet Amount:           ${}", config.bet_amount);
    println!("  Mode:                 {}", config.mode_label());
    match &config.title_filter {
        TitleFilter::Any => println!("  Title Filter:         off"),
        TitleFilter::Prefix(prefix) => println!("  Title Filter:         \"{}\"", prefix),
    }

    println!("\nFeeds:");
    println!("  Activity Window:      {}", config.activity_limit);
    println!("  History Window:       {}", config.history_limit);
    println!("  Show History:         {}", config.show_history);
    println!("  Data API:             {}", config.data_api_url);
    println!("  Gamma API:            {}", config.gamma_api_url);
    println!("  CLOB API:             {}", config.clob_api_url);
    println!("  Chain ID:             {}", config.chain_id);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fetch_error_report() {
        let err = anyhow::Error::from(CopyError::Fetch {
            endpoint: "Activity",
            status: 502,
            body: "bad gateway".to_string(),
        });
        assert_eq!(error_report(&err), "Polymarket API Error: 502 - bad gateway");
    }

    #[tokio::test]
    async fn test_transport_error_reported_as_api_error() {
        let transport = reqwest::Client::new()
            .get("http://127.0.0.1:9/activity")
            .send()
            .await
            .unwrap_err();
        let err = anyhow::Error::from(CopyError::from(transport));

        assert!(error_report(&err).starts_with("Polymarket API Error: "));
    }

    #[test]
    fn test_other_errors_reported_plainly() {
        let err = anyhow::Error::from(CopyError::MissingCredential("POLYMARKET_PRIVATE_KEY"));
        assert!(error_report(&err).starts_with("Error: Missing POLYMARKET_PRIVATE_KEY"));

        let err = anyhow::anyhow!("boom");
        assert_eq!(error_report(&err), "Error: boom");
    }
}

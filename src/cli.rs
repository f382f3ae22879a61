//! CLI definition and dispatch.

use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use tracing::info;

use crate::adapters::csv_adapter::CsvTradeAdapter;
use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::json_report_adapter::JsonReportAdapter;
use crate::domain::error::GbceError;
use crate::domain::market::Market;
use crate::domain::sample_data::sample_market;
use crate::domain::security::{MAX_VWSP_WINDOW_SECS, vwsp_window_from_secs};
use crate::domain::trade::{TradeRecord, parse_direction};
use crate::domain::universe;
use crate::ports::report_port::ReportPort;
use crate::ports::trade_port::TradeSourcePort;

#[derive(Parser, Debug)]
#[command(name = "gbce", about = "Dividend, VWSP and All Share Index calculator")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// List the securities in the universe
    Securities {
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Dividend yield and P/E ratio at a given price
    Quote {
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, allow_negative_numbers = true)]
        price: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Record a trade in a trade file
    Record {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        symbol: String,
        #[arg(short, long, allow_negative_numbers = true)]
        quantity: i64,
        #[arg(short, long)]
        direction: String,
        #[arg(short, long, allow_negative_numbers = true)]
        price: f64,
        #[arg(short, long)]
        config: Option<PathBuf>,
    },
    /// Volume weighted price per security and the All Share Index
    Index {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        /// Reference time (RFC 3339), defaults to now
        #[arg(long)]
        at: Option<DateTime<Utc>>,
        #[arg(long, value_parser = clap::value_parser!(i64).range(1..=MAX_VWSP_WINDOW_SECS))]
        window_secs: Option<i64>,
    },
    /// Write a JSON market snapshot
    Report {
        #[arg(short, long)]
        trades: PathBuf,
        #[arg(short, long)]
        output: PathBuf,
        #[arg(short, long)]
        config: Option<PathBuf>,
        #[arg(long)]
        at: Option<DateTime<Utc>>,
    },
    /// Validate a universe configuration
    Validate {
        #[arg(short, long)]
        config: PathBuf,
    },
}

pub fn run(cli: Cli) -> ExitCode {
    let result = match cli.command {
        Command::Securities { config } => run_securities(config.as_deref()),
        Command::Quote {
            symbol,
            price,
            config,
        } => run_quote(&symbol, price, config.as_deref()),
        Command::Record {
            trades,
            symbol,
            quantity,
            direction,
            price,
            config,
        } => run_record(
            &trades,
            &symbol,
            quantity,
            &direction,
            price,
            config.as_deref(),
        ),
        Command::Index {
            trades,
            config,
            at,
            window_secs,
        } => run_index(
            &trades,
            config.as_deref(),
            at.unwrap_or_else(Utc::now),
            window_secs,
        ),
        Command::Report {
            trades,
            output,
            config,
            at,
        } => run_report(
            &trades,
            &output,
            config.as_deref(),
            at.unwrap_or_else(Utc::now),
        ),
        Command::Validate { config } => run_validate(&config),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {e}");
            (&e).into()
        }
    }
}

pub fn load_config(path: &Path) -> Result<FileConfigAdapter, GbceError> {
    FileConfigAdapter::from_file(path).map_err(|e| GbceError::ConfigParse {
        file: path.display().to_string(),
        reason: e.to_string(),
    })
}

/// The configured universe, or the sample securities when no config is given.
pub fn load_market(config_path: Option<&Path>) -> Result<Market, GbceError> {
    match config_path {
        Some(path) => {
            info!(path = %path.display(), "loading universe");
            universe::load_market(&load_config(path)?)
        }
        None => {
            info!("no config given, using sample securities");
            sample_market()
        }
    }
}

/// Universe plus every trade in the trade file.
pub fn load_market_with_trades(
    config_path: Option<&Path>,
    trades_path: &Path,
) -> Result<Market, GbceError> {
    let mut market = load_market(config_path)?;
    let records = CsvTradeAdapter::new(trades_path.to_path_buf()).fetch_trades()?;
    market.replay(&records)?;
    Ok(market)
}

/// One line per security followed by the index line.
pub fn render_index(market: &Market, now: DateTime<Utc>) -> Result<Vec<String>, GbceError> {
    let mut lines = Vec::with_capacity(market.len() + 1);
    for security in market.securities() {
        let vwsp = market.volume_weighted_price(security.symbol(), now)?;
        lines.push(match vwsp {
            Some(v) => format!("{}: {:.4}", security.symbol(), v),
            None => format!("{}: no recent trades", security.symbol()),
        });
    }
    lines.push(match market.all_share_index(now)? {
        Some(index) => format!("All Share Index: {index:.4}"),
        None => "All Share Index: Not available".to_string(),
    });
    Ok(lines)
}

fn print_json<T: serde::Serialize>(value: &T) -> Result<(), GbceError> {
    let json = serde_json::to_string_pretty(value).map_err(|e| GbceError::Io(e.into()))?;
    println!("{json}");
    Ok(())
}

fn run_securities(config_path: Option<&Path>) -> Result<(), GbceError> {
    let market = load_market(config_path)?;
    let snapshot = market.snapshot(Utc::now())?;
    print_json(&snapshot.securities)
}

fn run_quote(symbol: &str, price: f64, config_path: Option<&Path>) -> Result<(), GbceError> {
    let market = load_market(config_path)?;
    print_json(&market.quote(symbol, price)?)
}

pub fn run_record(
    trades_path: &Path,
    symbol: &str,
    quantity: i64,
    direction: &str,
    price: f64,
    config_path: Option<&Path>,
) -> Result<(), GbceError> {
    let direction = parse_direction(symbol, direction)?;
    let mut market = load_market_with_trades(config_path, trades_path)?;
    market.record_trade(symbol, quantity, direction, price)?;

    let trade = market
        .security(symbol)?
        .trades()
        .last()
        .cloned()
        .ok_or_else(|| GbceError::TradeData {
            reason: format!("trade for {symbol} was not retained"),
        })?;
    let record = TradeRecord {
        symbol: symbol.to_string(),
        trade,
    };
    CsvTradeAdapter::new(trades_path.to_path_buf()).append_trade(&record)?;

    eprintln!(
        "Recorded {} {} {} @ {}",
        record.trade.direction, record.trade.quantity, symbol, record.trade.price
    );
    Ok(())
}

fn run_index(
    trades_path: &Path,
    config_path: Option<&Path>,
    now: DateTime<Utc>,
    window_secs: Option<i64>,
) -> Result<(), GbceError> {
    let mut market = load_market_with_trades(config_path, trades_path)?;
    if let Some(secs) = window_secs {
        let window = vwsp_window_from_secs(secs).ok_or_else(|| GbceError::ConfigInvalid {
            section: "index".to_string(),
            key: "window-secs".to_string(),
            reason: format!("expected 1 to {MAX_VWSP_WINDOW_SECS} seconds, got {secs}"),
        })?;
        market.set_vwsp_window(window);
    }

    for line in render_index(&market, now)? {
        println!("{line}");
    }
    Ok(())
}

pub fn run_report(
    trades_path: &Path,
    output_path: &Path,
    config_path: Option<&Path>,
    now: DateTime<Utc>,
) -> Result<(), GbceError> {
    let market = load_market_with_trades(config_path, trades_path)?;
    let snapshot = market.snapshot(now)?;
    JsonReportAdapter::new(true).write(&snapshot, output_path)?;
    eprintln!(
        "Report written to: {} ({} of {} securities traded in window)",
        output_path.display(),
        snapshot.active_count(),
        snapshot.securities.len()
    );
    Ok(())
}

pub fn run_validate(config_path: &Path) -> Result<(), GbceError> {
    eprintln!("Validating universe: {}", config_path.display());
    let market = load_market(Some(config_path))?;
    for security in market.securities() {
        eprintln!(
            "  {}: {} [OK]",
            security.symbol(),
            security.classification().label()
        );
    }
    eprintln!(
        "\n{} securities, VWSP window {}s. Configuration is valid.",
        market.len(),
        market.vwsp_window().num_seconds()
    );
    Ok(())
}

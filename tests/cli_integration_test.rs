//! CLI integration tests.
//!
//! Tests cover:
//! - Universe loading from INI files and the sample fallback
//! - Recording trades into a CSV trade file
//! - Index rendering from a replayed trade file
//! - JSON report output
//! - Argument parsing and exit codes

mod common;

use clap::Parser;
use common::*;
use gbce::cli::{self, Cli, Command};
use gbce::domain::error::GbceError;
use gbce::domain::security::MAX_VWSP_WINDOW_SECS;
use gbce::domain::trade::TradeDirection;
use std::fs;
use std::process::ExitCode;
use tempfile::TempDir;

const TRADES_CSV: &str = "timestamp,symbol,quantity,direction,price\n\
2023-11-14T22:10:00Z,POP,100,BUY,50\n\
2023-11-14T22:12:00Z,GIN,200,SELL,100\n\
2023-11-14T22:13:00Z,POP,100,SELL,54\n";

mod universe_loading {
    use super::*;

    #[test]
    fn sample_universe_without_config() {
        let market = cli::load_market(None).unwrap();
        assert_eq!(market.len(), 5);
    }

    #[test]
    fn universe_from_ini_file() {
        let file = write_temp_file(SAMPLE_UNIVERSE_INI);
        let market = cli::load_market(Some(file.path())).unwrap();
        assert_eq!(market.len(), 5);
        assert_eq!(market.security("GIN").unwrap().classification().label(), "Preferred");
    }

    #[test]
    fn missing_config_file_is_parse_error() {
        let err = cli::load_market(Some(std::path::Path::new("/nonexistent/universe.ini")))
            .unwrap_err();
        assert!(matches!(err, GbceError::ConfigParse { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(2));
    }

    #[test]
    fn validate_accepts_sample_universe() {
        let file = write_temp_file(SAMPLE_UNIVERSE_INI);
        assert!(cli::run_validate(file.path()).is_ok());
    }

    #[test]
    fn validate_rejects_broken_universe() {
        let file = write_temp_file("[security.GIN]\ntype = Preferred\nlast_dividend = 8\npar_value = 100\n");
        assert!(matches!(
            cli::run_validate(file.path()),
            Err(GbceError::InvalidSecurity { .. })
        ));
    }
}

mod trade_file {
    use super::*;

    #[test]
    fn replay_trade_file_into_market() {
        let trades = write_temp_file(TRADES_CSV);
        let market = cli::load_market_with_trades(None, trades.path()).unwrap();
        assert_eq!(market.security("POP").unwrap().trades().len(), 2);
        assert_eq!(market.security("GIN").unwrap().trades().len(), 1);
    }

    #[test]
    fn trade_for_unknown_symbol_fails_replay() {
        let trades = write_temp_file(
            "timestamp,symbol,quantity,direction,price\n2023-11-14T22:10:00Z,XYZ,1,BUY,1\n",
        );
        let err = cli::load_market_with_trades(None, trades.path()).unwrap_err();
        assert!(matches!(err, GbceError::UnknownSymbol { .. }));
    }

    #[test]
    fn record_appends_to_trade_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");

        cli::run_record(&path, "POP", 100, "buy", 50.0, None).unwrap();
        cli::run_record(&path, "TEA", 20, "SELL", 12.5, None).unwrap();

        let market = cli::load_market_with_trades(None, &path).unwrap();
        let pop = market.security("POP").unwrap();
        assert_eq!(pop.trades().len(), 1);
        assert_eq!(pop.trades().as_slice()[0].direction, TradeDirection::Buy);
        assert_eq!(market.security("TEA").unwrap().trades().len(), 1);
    }

    #[test]
    fn record_rejects_invalid_trade_without_writing() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("trades.csv");

        let err = cli::run_record(&path, "POP", 0, "BUY", 50.0, None).unwrap_err();
        assert!(matches!(err, GbceError::InvalidTrade { .. }));
        let err = cli::run_record(&path, "POP", 10, "HOLD", 50.0, None).unwrap_err();
        assert!(matches!(err, GbceError::InvalidTrade { .. }));
        let err = cli::run_record(&path, "XYZ", 10, "BUY", 50.0, None).unwrap_err();
        assert!(matches!(err, GbceError::UnknownSymbol { .. }));
        assert_eq!(ExitCode::from(&err), ExitCode::from(5));

        assert!(!path.exists());
    }
}

mod index_and_report {
    use super::*;
    use chrono::{DateTime, Utc};

    fn as_of() -> DateTime<Utc> {
        "2023-11-14T22:14:00Z".parse().unwrap()
    }

    #[test]
    fn render_index_lines() {
        let trades = write_temp_file(TRADES_CSV);
        let market = cli::load_market_with_trades(None, trades.path()).unwrap();
        let lines = cli::render_index(&market, as_of()).unwrap();

        assert_eq!(lines.len(), 6);
        assert!(lines.contains(&"POP: 52.0000".to_string()));
        assert!(lines.contains(&"GIN: 100.0000".to_string()));
        assert!(lines.contains(&"TEA: no recent trades".to_string()));
        // sqrt(52 * 100)
        let expected = format!("All Share Index: {:.4}", (52.0_f64 * 100.0).sqrt());
        assert_eq!(lines.last().unwrap(), &expected);
    }

    #[test]
    fn render_index_not_available() {
        let market = cli::load_market(None).unwrap();
        let lines = cli::render_index(&market, as_of()).unwrap();
        assert_eq!(lines.last().unwrap(), "All Share Index: Not available");
    }

    #[test]
    fn report_writes_json_snapshot() {
        let dir = TempDir::new().unwrap();
        let trades = write_temp_file(TRADES_CSV);
        let output = dir.path().join("report.json");

        cli::run_report(trades.path(), &output, None, as_of()).unwrap();

        let value: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(&output).unwrap()).unwrap();
        assert_eq!(value["window_secs"], 300);
        assert_eq!(value["securities"].as_array().unwrap().len(), 5);
        let index = value["all_share_index"].as_f64().unwrap();
        assert!((index - (52.0_f64 * 100.0).sqrt()).abs() < 1e-9);
    }
}

mod argument_parsing {
    use super::*;

    #[test]
    fn parses_quote() {
        let cli = Cli::try_parse_from(["gbce", "quote", "--symbol", "POP", "--price", "50"]).unwrap();
        match cli.command {
            Command::Quote { symbol, price, config } => {
                assert_eq!(symbol, "POP");
                assert!((price - 50.0).abs() < f64::EPSILON);
                assert!(config.is_none());
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn parses_index_with_reference_time() {
        let cli = Cli::try_parse_from([
            "gbce",
            "index",
            "--trades",
            "trades.csv",
            "--at",
            "2023-11-14T22:14:00Z",
            "--window-secs",
            "600",
        ])
        .unwrap();
        match cli.command {
            Command::Index { at, window_secs, .. } => {
                assert_eq!(at.unwrap().timestamp(), 1_700_000_040);
                assert_eq!(window_secs, Some(600));
            }
            other => panic!("unexpected command: {other:?}"),
        }
    }

    #[test]
    fn rejects_zero_window() {
        let result = Cli::try_parse_from([
            "gbce", "index", "--trades", "t.csv", "--window-secs", "0",
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn rejects_window_beyond_representable_span() {
        let too_wide = (MAX_VWSP_WINDOW_SECS + 1).to_string();
        let result = Cli::try_parse_from([
            "gbce", "index", "--trades", "t.csv", "--window-secs", too_wide.as_str(),
        ]);
        assert!(result.is_err());
    }

    #[test]
    fn widest_window_at_earliest_time_runs_cleanly() {
        let trades = write_temp_file(TRADES_CSV);
        let widest = MAX_VWSP_WINDOW_SECS.to_string();
        let cli = Cli::try_parse_from([
            "gbce",
            "index",
            "--trades",
            trades.path().to_str().unwrap(),
            "--at",
            "0001-01-01T00:00:00Z",
            "--window-secs",
            widest.as_str(),
        ])
        .unwrap();
        assert_eq!(cli::run(cli), ExitCode::SUCCESS);
    }

    #[test]
    fn record_accepts_negative_quantity_for_domain_rejection() {
        let cli = Cli::try_parse_from([
            "gbce", "record", "-t", "t.csv", "-s", "POP", "-q", "-5", "-d", "BUY", "-p", "1",
        ])
        .unwrap();
        assert!(matches!(cli.command, Command::Record { quantity: -5, .. }));
    }

    #[test]
    fn run_reports_unknown_symbol_exit_code() {
        let cli = Cli::try_parse_from(["gbce", "quote", "-s", "XYZ", "-p", "50"]).unwrap();
        assert_eq!(cli::run(cli), ExitCode::from(5));
    }

    #[test]
    fn run_quote_succeeds_for_sample_symbol() {
        let cli = Cli::try_parse_from(["gbce", "quote", "-s", "POP", "-p", "50"]).unwrap();
        assert_eq!(cli::run(cli), ExitCode::SUCCESS);
    }
}

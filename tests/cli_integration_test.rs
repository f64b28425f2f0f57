//! CLI integration tests for the interactive shell and one-shot commands.

mod common;

use common::*;
use clap::Parser;
use rust_decimal_macros::dec;
use std::fs;
use std::path::PathBuf;
use stocktrader::cli::{self, Cli, Command};
use stocktrader::domain::trading::Trader;
use stocktrader::domain::catalog::Catalog;
use tempfile::TempDir;

fn run_session(trader: &mut Trader<MemoryHoldingsPort>, script: &str) -> String {
    let mut out = Vec::new();
    cli::run_shell(trader, script.as_bytes(), &mut out).unwrap();
    String::from_utf8(out).unwrap()
}

mod shell {
    use super::*;

    #[test]
    fn greets_and_exits() {
        let mut trader = make_trader();
        let out = run_session(&mut trader, "4\n");
        assert!(out.starts_with("Welcome to the Stock Trading Platform!"));
        assert!(out.contains("1. Buy Stocks"));
        assert!(out.trim_end().ends_with("Exiting the trading platform. Goodbye!"));
    }

    #[test]
    fn end_of_input_exits_cleanly() {
        let mut trader = make_trader();
        let out = run_session(&mut trader, "");
        assert!(out.contains("Goodbye!"));
    }

    #[test]
    fn invalid_menu_choice() {
        let mut trader = make_trader();
        let out = run_session(&mut trader, "9\nabc\n4\n");
        assert_eq!(
            out.matches("Invalid choice! Please select a valid option.").count(),
            2
        );
    }

    #[test]
    fn buy_with_help_and_retry() {
        let mut trader = make_trader();
        let out = run_session(&mut trader, "1\nhelp\nibm\naapl\n10\n4\n");

        assert!(out.contains("Here are some common stock symbols:"));
        assert!(out.contains("- NVDA → NVIDIA Corporation"));
        assert!(out.contains("Invalid stock symbol. Try again or type 'help' for assistance."));
        assert!(out.contains("You selected: Apple Inc. (AAPL) - Price: $175.30"));
        assert!(out.contains("Successfully bought 10 shares of Apple Inc."));
        assert_eq!(summary(&trader), vec![("AAPL".to_string(), 10)]);
        assert_eq!(trader.store().saves.get(), 1);
    }

    #[test]
    fn buy_reprompts_for_bad_quantity() {
        let mut trader = make_trader();
        let out = run_session(&mut trader, "1\nTSLA\nzero\n0\n-4\n3\n4\n");

        assert_eq!(out.matches("Please enter a positive whole number.").count(), 3);
        assert_eq!(summary(&trader), vec![("TSLA".to_string(), 3)]);
    }

    #[test]
    fn sell_on_empty_portfolio() {
        let mut trader = make_trader();
        let out = run_session(&mut trader, "2\n4\n");
        assert!(out.contains("Your portfolio is empty! Buy stocks first."));
        assert!(!out.contains("Enter stock symbol to sell"));
    }

    #[test]
    fn sell_unknown_symbol() {
        let mut trader = make_trader();
        trader.buy("AAPL", 10).unwrap();
        let out = run_session(&mut trader, "2\nmsft\n4\n");

        assert!(out.contains("AAPL - Apple Inc. | Price: $175.30 | Quantity: 10"));
        assert!(out.contains("Stock not found in your portfolio."));
        assert!(!out.contains("Enter quantity to sell"));
        assert_eq!(summary(&trader), vec![("AAPL".to_string(), 10)]);
    }

    #[test]
    fn sell_partial_and_all() {
        let mut trader = make_trader();
        trader.buy("AAPL", 10).unwrap();
        let out = run_session(&mut trader, "2\naapl\n4\n2\nAAPL\n50\n3\n4\n");

        assert!(out.contains("Sold 4 shares of Apple Inc."));
        assert!(out.contains("Sold all shares of Apple Inc."));
        assert!(out.contains("Your portfolio is empty."));
        assert!(trader.holdings().is_empty());
    }

    #[test]
    fn view_lists_lots_in_order() {
        let store = MemoryHoldingsPort::new().with_lots(vec![
            make_lot("TSLA", "Tesla Inc.", dec!(205.50), 5),
            make_lot("AAPL", "Apple Inc.", dec!(175.30), 10),
        ]);
        let mut trader = Trader::new(Catalog::default(), store);
        trader.load().unwrap();

        let out = run_session(&mut trader, "3\n4\n");
        let tesla = out.find("TSLA - Tesla Inc. | Price: $205.50 | Quantity: 5").unwrap();
        let apple = out.find("AAPL - Apple Inc. | Price: $175.30 | Quantity: 10").unwrap();
        assert!(tesla < apple);
    }

    #[test]
    fn save_failure_is_shown_and_session_continues() {
        let mut trader = make_trader();
        trader.store().fail_saves.set(true);
        let out = run_session(&mut trader, "1\nNFLX\n1\n3\n4\n");

        assert!(out.contains("Error saving portfolio: disk full"));
        assert!(out.contains("NFLX - Netflix Inc. | Price: $412.15 | Quantity: 1"));
    }

    #[test]
    fn input_ending_mid_buy_quits() {
        let mut trader = make_trader();
        let out = run_session(&mut trader, "1\nAAPL\n");
        assert!(out.contains("Goodbye!"));
        assert!(trader.holdings().is_empty());
    }
}

mod one_shot {
    use super::*;
    use stocktrader::adapters::flat_file_adapter::FlatFileAdapter;
    use stocktrader::domain::error::TraderError;

    fn file_trader(dir: &TempDir) -> Trader<FlatFileAdapter> {
        let mut trader = Trader::new(
            Catalog::default(),
            FlatFileAdapter::new(dir.path().join("portfolio.txt")),
        );
        trader.load().unwrap();
        trader
    }

    fn command(args: &[&str]) -> Command {
        let mut argv = vec!["stocktrader"];
        argv.extend_from_slice(args);
        Cli::parse_from(argv).command.unwrap()
    }

    #[test]
    fn buy_then_sell_persists_between_runs() {
        let dir = TempDir::new().unwrap();

        cli::execute(&mut file_trader(&dir), command(&["buy", "aapl", "10"])).unwrap();
        cli::execute(&mut file_trader(&dir), command(&["buy", "AAPL", "5"])).unwrap();
        cli::execute(&mut file_trader(&dir), command(&["sell", "AAPL", "12"])).unwrap();

        let content = fs::read_to_string(dir.path().join("portfolio.txt")).unwrap();
        assert_eq!(content.lines().collect::<Vec<_>>(), vec!["AAPL,Apple Inc.,175.30,5"]);
    }

    #[test]
    fn invalid_trades_are_errors_and_write_nothing() {
        let dir = TempDir::new().unwrap();

        let err = cli::execute(&mut file_trader(&dir), command(&["buy", "XYZ", "1"])).unwrap_err();
        assert!(matches!(err, TraderError::InvalidSymbol { .. }));
        let err = cli::execute(&mut file_trader(&dir), command(&["buy", "AAPL", "-1"])).unwrap_err();
        assert!(matches!(err, TraderError::InvalidQuantity { quantity: -1 }));
        let err = cli::execute(&mut file_trader(&dir), command(&["sell", "AAPL", "1"])).unwrap_err();
        assert!(matches!(err, TraderError::EmptyPortfolio));

        assert!(!dir.path().join("portfolio.txt").exists());
    }

    #[test]
    fn save_failure_is_returned_after_trade() {
        let mut trader = make_trader();
        trader.store().fail_saves.set(true);

        let err = cli::execute(&mut trader, command(&["buy", "NVDA", "2"])).unwrap_err();
        assert!(matches!(err, TraderError::Io(_)));
        assert_eq!(summary(&trader), vec![("NVDA".to_string(), 2)]);
    }

    #[test]
    fn view_and_symbols_succeed() {
        let mut trader = make_trader();
        cli::execute(&mut trader, command(&["view"])).unwrap();
        cli::execute(&mut trader, command(&["symbols"])).unwrap();
        assert_eq!(trader.store().saves.get(), 0);
    }

    #[test]
    fn portfolio_path_from_config_file() {
        let dir = TempDir::new().unwrap();
        let target = dir.path().join("holdings.txt");
        let ini = dir.path().join("stocktrader.ini");
        fs::write(&ini, format!("[portfolio]\nfile = {}\n", target.display())).unwrap();

        let path = cli::resolve_portfolio_path(None, Some(&ini)).unwrap();
        assert_eq!(path, target);

        let flag = PathBuf::from("override.txt");
        let path = cli::resolve_portfolio_path(Some(flag.clone()), Some(&ini)).unwrap();
        assert_eq!(path, flag);
    }

    #[test]
    fn missing_config_file_is_an_error() {
        let missing = PathBuf::from("/nonexistent/stocktrader.ini");
        assert!(cli::resolve_portfolio_path(None, Some(&missing)).is_err());
    }

    #[test]
    fn parses_subcommands() {
        let cli = Cli::parse_from(["stocktrader", "--config", "c.ini", "view"]);
        assert_eq!(cli.config, Some(PathBuf::from("c.ini")));
        assert!(matches!(cli.command, Some(Command::View)));
    }
}

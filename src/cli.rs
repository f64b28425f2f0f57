//! CLI definition, dispatch, and the interactive trading shell.

use clap::{Parser, Subcommand};
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use crate::adapters::file_config_adapter::FileConfigAdapter;
use crate::adapters::flat_file_adapter::FlatFileAdapter;
use crate::domain::catalog::{normalize_symbol, Catalog};
use crate::domain::error::TraderError;
use crate::domain::trading::{TradeKind, TradeReceipt, Trader};
use crate::ports::config_port::{ConfigPort, DEFAULT_PORTFOLIO_FILE};
use crate::ports::holdings_port::HoldingsPort;

#[derive(Parser, Debug)]
#[command(name = "stocktrader", about = "Stock portfolio tracker")]
pub struct Cli {
    /// INI settings file
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
    /// Portfolio file, overrides `[portfolio] file` from the config
    #[arg(short, long, global = true)]
    pub portfolio: Option<PathBuf>,
    /// Runs the interactive shell when omitted
    #[command(subcommand)]
    pub command: Option<Command>,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Buy shares at the catalog price
    Buy {
        symbol: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Sell shares from the first lot held for a symbol
    Sell {
        symbol: String,
        #[arg(allow_negative_numbers = true)]
        quantity: i64,
    },
    /// Show current holdings
    View,
    /// List tradable symbols
    Symbols,
}

/// Outcome of one shell action.
enum Flow {
    Continue,
    Quit,
}

pub fn run(cli: Cli) -> ExitCode {
    let path = match resolve_portfolio_path(cli.portfolio, cli.config.as_ref()) {
        Ok(p) => p,
        Err(code) => return code,
    };
    let mut trader = Trader::new(Catalog::default(), FlatFileAdapter::new(path));

    match cli.command {
        None => {
            if let Err(e) = trader.load() {
                eprintln!("Error loading portfolio: {e}");
            }
            let stdin = io::stdin();
            let stdout = io::stdout();
            match run_shell(&mut trader, stdin.lock(), stdout.lock()) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: {e}");
                    ExitCode::from(1)
                }
            }
        }
        Some(command) => {
            // A one-shot trade would overwrite an unreadable file with a
            // single lot, so load failures are fatal here.
            if let Err(e) = trader.load() {
                eprintln!("error: {e}");
                return (&e).into();
            }
            match execute(&mut trader, command) {
                Ok(()) => ExitCode::SUCCESS,
                Err(e) => {
                    eprintln!("error: {e}");
                    (&e).into()
                }
            }
        }
    }
}

pub fn load_config(path: &PathBuf) -> Result<FileConfigAdapter, ExitCode> {
    FileConfigAdapter::from_file(path).map_err(|e| {
        let err = TraderError::ConfigParse {
            file: path.display().to_string(),
            reason: e.to_string(),
        };
        eprintln!("error: {err}");
        ExitCode::from(&err)
    })
}

/// Flag first, then `[portfolio] file`, then `portfolio.txt`.
pub fn resolve_portfolio_path(
    flag: Option<PathBuf>,
    config_path: Option<&PathBuf>,
) -> Result<PathBuf, ExitCode> {
    let from_config = match config_path {
        Some(path) => load_config(path)?.portfolio_file(),
        None => None,
    };
    Ok(flag
        .or(from_config)
        .unwrap_or_else(|| PathBuf::from(DEFAULT_PORTFOLIO_FILE)))
}

/// Runs one non-interactive command. Trade receipts go to stdout; a failed
/// save after a successful trade is returned as the error.
pub fn execute<S: HoldingsPort>(trader: &mut Trader<S>, command: Command) -> Result<(), TraderError> {
    let receipt = match command {
        Command::Buy { symbol, quantity } => trader.buy(&symbol, quantity)?,
        Command::Sell { symbol, quantity } => trader.sell(&symbol, quantity)?,
        Command::View => {
            match trader.view_portfolio() {
                Some(lots) => lots.iter().for_each(|lot| println!("{lot}")),
                None => println!("Your portfolio is empty."),
            }
            return Ok(());
        }
        Command::Symbols => {
            for (symbol, name) in trader.catalog().list_all() {
                println!("{symbol} → {name}");
            }
            return Ok(());
        }
    };

    println!("{}", receipt_line(&receipt));
    match receipt.save_error {
        Some(e) => Err(e),
        None => Ok(()),
    }
}

pub fn receipt_line(receipt: &TradeReceipt) -> String {
    match receipt.kind {
        TradeKind::Bought => format!(
            "Successfully bought {} shares of {}",
            receipt.quantity, receipt.company_name
        ),
        TradeKind::SoldAll => format!("Sold all shares of {}", receipt.company_name),
        TradeKind::SoldPartial { .. } => format!(
            "Sold {} shares of {}",
            receipt.quantity, receipt.company_name
        ),
    }
}

/// Runs the menu loop until Exit is chosen or input ends.
pub fn run_shell<S, R, W>(trader: &mut Trader<S>, mut input: R, mut out: W) -> io::Result<()>
where
    S: HoldingsPort,
    R: BufRead,
    W: Write,
{
    writeln!(out, "Welcome to the Stock Trading Platform!")?;

    loop {
        writeln!(out, "\nChoose an option:")?;
        writeln!(out, "1. Buy Stocks")?;
        writeln!(out, "2. Sell Stocks")?;
        writeln!(out, "3. View Portfolio")?;
        writeln!(out, "4. Exit")?;

        let flow = match read_line(&mut input)? {
            None => Flow::Quit,
            Some(choice) => match choice.trim() {
                "1" => shell_buy(trader, &mut input, &mut out)?,
                "2" => shell_sell(trader, &mut input, &mut out)?,
                "3" => {
                    print_portfolio(trader, &mut out)?;
                    Flow::Continue
                }
                "4" => Flow::Quit,
                _ => {
                    writeln!(out, "Invalid choice! Please select a valid option.")?;
                    Flow::Continue
                }
            },
        };

        if let Flow::Quit = flow {
            writeln!(out, "Exiting the trading platform. Goodbye!")?;
            return out.flush();
        }
    }
}

fn shell_buy<S, R, W>(trader: &mut Trader<S>, input: &mut R, out: &mut W) -> io::Result<Flow>
where
    S: HoldingsPort,
    R: BufRead,
    W: Write,
{
    let symbol = loop {
        let Some(line) = prompt(
            input,
            out,
            "Enter stock symbol to buy (or type 'help' to see common stocks): ",
        )?
        else {
            return Ok(Flow::Quit);
        };
        let symbol = normalize_symbol(&line);

        if symbol == "HELP" {
            print_catalog(trader.catalog(), out)?;
            continue;
        }
        match trader.catalog().lookup(&symbol) {
            Some(entry) => {
                writeln!(
                    out,
                    "You selected: {} ({}) - Price: ${}",
                    entry.company_name, entry.symbol, entry.unit_price
                )?;
                break symbol;
            }
            None => writeln!(
                out,
                "Invalid stock symbol. Try again or type 'help' for assistance."
            )?,
        }
    };

    let Some(quantity) = prompt_quantity(input, out, "Enter quantity to buy: ")? else {
        return Ok(Flow::Quit);
    };
    let result = trader.buy(&symbol, quantity);
    report(result, out)?;
    Ok(Flow::Continue)
}

fn shell_sell<S, R, W>(trader: &mut Trader<S>, input: &mut R, out: &mut W) -> io::Result<Flow>
where
    S: HoldingsPort,
    R: BufRead,
    W: Write,
{
    if trader.holdings().is_empty() {
        writeln!(out, "Your portfolio is empty! Buy stocks first.")?;
        return Ok(Flow::Continue);
    }
    print_portfolio(trader, out)?;

    let Some(line) = prompt(input, out, "Enter stock symbol to sell: ")? else {
        return Ok(Flow::Quit);
    };
    let symbol = normalize_symbol(&line);
    if !trader.holdings().holds(&symbol) {
        writeln!(out, "Stock not found in your portfolio.")?;
        return Ok(Flow::Continue);
    }

    let Some(quantity) = prompt_quantity(input, out, "Enter quantity to sell: ")? else {
        return Ok(Flow::Quit);
    };
    let result = trader.sell(&symbol, quantity);
    report(result, out)?;
    Ok(Flow::Continue)
}

fn report<W: Write>(result: Result<TradeReceipt, TraderError>, out: &mut W) -> io::Result<()> {
    match result {
        Ok(receipt) => {
            writeln!(out, "{}", receipt_line(&receipt))?;
            if let Some(e) = receipt.save_error {
                writeln!(out, "Error saving portfolio: {e}")?;
            }
            Ok(())
        }
        Err(e) => writeln!(out, "error: {e}"),
    }
}

fn print_portfolio<S: HoldingsPort, W: Write>(trader: &Trader<S>, out: &mut W) -> io::Result<()> {
    match trader.view_portfolio() {
        None => writeln!(out, "Your portfolio is empty."),
        Some(lots) => {
            writeln!(out, "\nYour Portfolio:")?;
            for lot in lots {
                writeln!(out, "{lot}")?;
            }
            Ok(())
        }
    }
}

fn print_catalog<W: Write>(catalog: &Catalog, out: &mut W) -> io::Result<()> {
    writeln!(out, "\nHere are some common stock symbols:")?;
    for (symbol, name) in catalog.list_all() {
        writeln!(out, "- {symbol} → {name}")?;
    }
    writeln!(out)
}

/// Re-prompts until a positive whole number is entered. `None` on end of
/// input.
fn prompt_quantity<R: BufRead, W: Write>(
    input: &mut R,
    out: &mut W,
    text: &str,
) -> io::Result<Option<i64>> {
    loop {
        let Some(line) = prompt(input, out, text)? else {
            return Ok(None);
        };
        match line.trim().parse::<i64>() {
            Ok(q) if q > 0 => return Ok(Some(q)),
            _ => writeln!(out, "Please enter a positive whole number.")?,
        }
    }
}

fn prompt<R: BufRead, W: Write>(input: &mut R, out: &mut W, text: &str) -> io::Result<Option<String>> {
    write!(out, "{text}")?;
    out.flush()?;
    read_line(input)
}

fn read_line<R: BufRead>(input: &mut R) -> io::Result<Option<String>> {
    let mut buf = String::new();
    if input.read_line(&mut buf)? == 0 {
        return Ok(None);
    }
    Ok(Some(buf.trim_end_matches(['\r', '\n']).to_string()))
}

//! Command implementations for the `shopledger` binary.
//!
//! Every subcommand lives in its own module exposing a clap `Args`
//! struct and a `run` function that writes to a generic writer, so
//! tests can drive commands against a temporary ledger file and
//! capture their output.

pub mod add_product;
pub mod check;
pub mod completions;
pub mod delete_product;
pub mod delete_sale;
pub mod export;
pub mod import;
pub mod kardex;
pub mod purchase;
pub mod sell;
pub mod stock;
pub mod suggest_price;

use std::env;
use std::fmt::Display;
use std::io::{self, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use anyhow::Result;
use clap::{Parser, Subcommand, ValueEnum};
use rustyline::error::ReadlineError;
use rustyline::history::DefaultHistory;
use rustyline::{DefaultEditor, Editor};
use tracing_subscriber::EnvFilter;

use shopledger_core::{LedgerStore, Product};
use shopledger_store::JsonStore;

/// Lot-tracked inventory ledger for small shops.
#[derive(Parser, Debug)]
#[command(name = "shopledger")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Ledger file (default: $SHOPLEDGER_FILE, else the platform data directory)
    #[arg(long, global = true, value_name = "PATH")]
    file: Option<PathBuf>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Answer yes to every confirmation prompt
    #[arg(short = 'y', long, global = true)]
    yes: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Register a new product
    AddProduct(add_product::Args),

    /// Record a purchase lot for a product
    Purchase(purchase::Args),

    /// Record a sale, costing it against open lots
    Sell(sell::Args),

    /// Show stock on hand and prices for every product
    Stock(stock::Args),

    /// Print the movement ledger (kardex) of a product
    Kardex(kardex::Args),

    /// Compute a sell price from a unit cost and a target margin
    SuggestPrice(suggest_price::Args),

    /// Delete the most recent sale of a product
    DeleteSale(delete_sale::Args),

    /// Delete a product and all of its movements
    DeleteProduct(delete_product::Args),

    /// Write the whole ledger to a backup file
    Export(export::Args),

    /// Replace the ledger with the contents of a backup file
    Import(import::Args),

    /// Audit the ledger for consistency errors
    Check(check::Args),

    /// Generate shell completions
    Completions(completions::Args),
}

/// Output format for report-style commands.
#[derive(Debug, Clone, Copy, Default, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable text output (default)
    #[default]
    Text,
    /// JSON output for tooling integration
    Json,
}

/// State shared by every command besides its own arguments.
#[derive(Debug)]
pub struct CmdContext {
    /// Ledger file commands load from and save to.
    pub ledger_path: PathBuf,
    /// Skip confirmation prompts and proceed.
    pub assume_yes: bool,
}

impl CmdContext {
    pub(crate) fn store(&self) -> JsonStore {
        JsonStore::new(&self.ledger_path)
    }
}

/// Main entry point for the shopledger binary.
pub fn main() -> ExitCode {
    let cli = Cli::parse();

    if cli.verbose {
        let filter =
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("debug"));
        tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_writer(io::stderr)
            .init();
    }

    match run(cli) {
        Ok(exit_code) => exit_code,
        Err(e) => {
            eprintln!("error: {e:#}");
            ExitCode::from(2)
        }
    }
}

fn run(cli: Cli) -> Result<ExitCode> {
    let ctx = CmdContext {
        ledger_path: resolve_ledger_path(cli.file),
        assume_yes: cli.yes,
    };
    tracing::debug!(ledger = %ctx.ledger_path.display(), "resolved ledger path");

    let mut stdout = io::stdout().lock();
    match cli.command {
        Command::AddProduct(args) => add_product::run(&ctx, &args, &mut stdout),
        Command::Purchase(args) => purchase::run(&ctx, &args, &mut stdout),
        Command::Sell(args) => sell::run(&ctx, &args, &mut stdout),
        Command::Stock(args) => stock::run(&ctx, &args, &mut stdout),
        Command::Kardex(args) => kardex::run(&ctx, &args, &mut stdout),
        Command::SuggestPrice(args) => suggest_price::run(&args, &mut stdout),
        Command::DeleteSale(args) => delete_sale::run(&ctx, &args, &mut stdout),
        Command::DeleteProduct(args) => delete_product::run(&ctx, &args, &mut stdout),
        Command::Export(args) => export::run(&ctx, &args, &mut stdout),
        Command::Import(args) => import::run(&ctx, &args, &mut stdout),
        Command::Check(args) => check::run(&ctx, &args, &mut stdout),
        Command::Completions(args) => completions::run(&args, &mut stdout),
    }
}

/// Pick the ledger file: `--file`, then `SHOPLEDGER_FILE`, then the
/// platform data directory.
fn resolve_ledger_path(flag: Option<PathBuf>) -> PathBuf {
    if let Some(path) = flag {
        return path;
    }
    if let Some(path) = env::var_os("SHOPLEDGER_FILE") {
        return PathBuf::from(path);
    }
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("shopledger")
        .join("ledger.json")
}

/// Report a domain failure on the writer and exit with code 1.
pub(crate) fn fail<W: Write>(writer: &mut W, message: impl Display) -> Result<ExitCode> {
    writeln!(writer, "error: {message}")?;
    Ok(ExitCode::from(1))
}

/// Resolve a `PRODUCT` argument that is either an id or a name.
pub(crate) fn resolve_product(store: &LedgerStore, selector: &str) -> Result<Product, String> {
    if let Ok(id) = selector.parse::<u64>() {
        return store
            .product(id)
            .cloned()
            .ok_or_else(|| format!("no product with id {id}"));
    }
    store
        .product_by_name(selector)
        .cloned()
        .ok_or_else(|| format!("no product named \"{selector}\""))
}

/// Ask for confirmation on the terminal. `--yes` skips the prompt;
/// Ctrl-C and Ctrl-D decline.
pub(crate) fn confirm(prompt: &str, assume_yes: bool) -> Result<bool> {
    if assume_yes {
        return Ok(true);
    }
    let mut rl: Editor<(), DefaultHistory> = DefaultEditor::new()?;
    match rl.readline(&format!("{prompt} [y/N] ")) {
        Ok(line) => Ok(matches!(line.trim().to_lowercase().as_str(), "y" | "yes")),
        Err(ReadlineError::Interrupted | ReadlineError::Eof) => Ok(false),
        Err(e) => Err(e.into()),
    }
}

//! # stockcast
//!
//! Command-line front end: fetch prices, backtest an echo state network or
//! ARIMA, and project a series forward.

use algorithm::regression::Arima;
use algorithm::reservoir::{EchoStateNetwork, EsnConfig};
use anyhow::{Context, Result};
use backtest::holdout::split_index;
use backtest::{project, run_backtest, BacktestConfig, BacktestResult};
use clap::{ArgGroup, Args, Parser, Subcommand};
use data::{
    adj_closing_prices, closing_prices, DataSource, FetchRequest, YahooFinance, DEFAULT_BASE_URL,
};
use std::fs::File;
use std::path::PathBuf;
use tracing::Level;

mod input;

/// Training-window length of the echo state network
const ECHO_TRAIN_LEN: usize = 100;
/// Iterations of the echo state network backtest
const ECHO_ITERATIONS: usize = 100;

#[derive(Parser)]
#[command(name = "stockcast")]
#[command(about = "Stock price forecasting CLI", long_about = None)]
struct Cli {
    /// Log model fitting and data fetching to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Print closing prices of a symbol as JSON
    Fetch {
        #[command(flatten)]
        query: Query,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Fixed-window echo state network backtest
    Echo {
        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        esn: EsnArgs,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Expanding-window ARIMA(5,1,0) backtest of one-step forecasts
    Arima {
        #[command(flatten)]
        series: SeriesArgs,

        /// Share of the series used for the first training window
        #[arg(long, default_value = "0.66")]
        split: f64,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Forecast past the end of a series with an echo state network
    Project {
        #[command(flatten)]
        series: SeriesArgs,

        #[command(flatten)]
        esn: EsnArgs,

        /// Output file (optional)
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
}

/// Remote series selection.
#[derive(Args, Clone)]
struct Query {
    /// Ticker symbol
    #[arg(short, long)]
    symbol: String,

    /// First date (YYYY-MM-DD)
    #[arg(long)]
    start: String,

    /// End date, exclusive (YYYY-MM-DD)
    #[arg(long)]
    end: String,

    /// Bar interval (1m, 5m, 15m, 30m, 1h, 1d, 1wk, 1mo)
    #[arg(long, default_value = "1d")]
    interval: String,

    /// Chart API endpoint
    #[arg(long, env = "YAHOO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

/// Series from a file or from the market data provider.
#[derive(Args)]
#[command(group(ArgGroup::new("source").required(true).args(["input", "symbol"])))]
struct SeriesArgs {
    /// Input file (CSV or JSON)
    #[arg(short, long)]
    input: Option<PathBuf>,

    /// Column name or index for CSV input
    #[arg(short, long, requires = "input")]
    column: Option<String>,

    /// Ticker symbol
    #[arg(short, long, requires_all = ["start", "end"])]
    symbol: Option<String>,

    /// First date (YYYY-MM-DD)
    #[arg(long)]
    start: Option<String>,

    /// End date, exclusive (YYYY-MM-DD)
    #[arg(long)]
    end: Option<String>,

    /// Bar interval
    #[arg(long, default_value = "1d")]
    interval: String,

    /// Use adjusted closes for remote series
    #[arg(long)]
    adjusted: bool,

    /// Chart API endpoint
    #[arg(long, env = "YAHOO_BASE_URL", default_value = DEFAULT_BASE_URL)]
    base_url: String,
}

#[derive(Args)]
struct EsnArgs {
    /// Reservoir size
    #[arg(long, default_value = "500")]
    reservoir_size: usize,

    /// Spectral radius of the recurrent weights
    #[arg(long, default_value = "1.2")]
    spectral_radius: f64,

    /// State noise during training
    #[arg(long, default_value = "0.005")]
    noise: f64,

    /// Forecast horizon
    #[arg(short, long, default_value = "5")]
    window: usize,
}

impl EsnArgs {
    fn config(&self) -> EsnConfig {
        EsnConfig::default()
            .with_reservoir_size(self.reservoir_size)
            .with_spectral_radius(self.spectral_radius)
            .with_noise(self.noise)
    }
}

fn fetch_closes(request: &FetchRequest, base_url: &str, adjusted: bool) -> Result<Vec<f64>> {
    let quotes = YahooFinance::new()
        .with_base_url(base_url)
        .fetch_request(request)
        .with_context(|| format!("failed to fetch {}", request.symbol))?;
    Ok(if adjusted {
        adj_closing_prices(&quotes)
    } else {
        closing_prices(&quotes)
    })
}

impl Query {
    fn request(&self) -> Result<FetchRequest> {
        Ok(FetchRequest::parse(
            &self.symbol,
            &self.start,
            &self.end,
            &self.interval,
        )?)
    }
}

impl SeriesArgs {
    fn load(&self) -> Result<Vec<f64>> {
        if let Some(path) = &self.input {
            let data = input::load_data(path, self.column.as_deref())?;
            tracing::info!(count = data.len(), path = %path.display(), "loaded series");
            return Ok(data);
        }

        // clap guarantees the symbol and both dates when no input file is given
        let symbol = self.symbol.as_deref().context("missing --symbol")?;
        let start = self.start.as_deref().context("missing --start")?;
        let end = self.end.as_deref().context("missing --end")?;
        let request = FetchRequest::parse(symbol, start, end, &self.interval)?;
        fetch_closes(&request, &self.base_url, self.adjusted)
    }
}

/// Write JSON to a file or stdout.
fn write_json(value: &serde_json::Value, output: Option<&PathBuf>) -> Result<()> {
    match output {
        Some(path) => {
            let mut file = File::create(path)
                .with_context(|| format!("failed to create {}", path.display()))?;
            serde_json::to_writer_pretty(&mut file, value)?;
            eprintln!("Results written to {}", path.display());
        }
        None => println!("{}", serde_json::to_string_pretty(value)?),
    }
    Ok(())
}

fn summary(result: &BacktestResult) -> serde_json::Value {
    serde_json::json!({
        "mse": result.mse,
        "predictions": result.forecasts,
        "expected": result.expected,
        "forecasts": result.matrix.to_rows(),
    })
}

fn run_echo(series: &SeriesArgs, esn: &EsnArgs, output: Option<PathBuf>) -> Result<()> {
    let data = series.load()?;
    let esn_config = esn.config();
    esn_config.validate()?;

    let config = BacktestConfig::new(ECHO_TRAIN_LEN, esn.window, ECHO_ITERATIONS)
        .with_fit_log_level(Some(Level::DEBUG));
    let result = run_backtest(&data, &config, || EchoStateNetwork::new(esn_config.clone()))?;

    eprintln!("Echo state network MSE: {:.6}", result.mse);
    write_json(&summary(&result), output.as_ref())
}

fn run_arima(series: &SeriesArgs, split: f64, output: Option<PathBuf>) -> Result<()> {
    let data = series.load()?;
    let size = split_index(data.len(), split)?;

    let config = BacktestConfig::expanding(size, 1, data.len() - size)
        .with_fit_log_level(Some(Level::DEBUG));
    let result = run_backtest(&data, &config, || Ok(Arima::default()))?;

    eprintln!("ARIMA(5,1,0) MSE over {} points: {:.6}", result.forecasts.len(), result.mse);
    write_json(&summary(&result), output.as_ref())
}

fn run_project(series: &SeriesArgs, esn: &EsnArgs, output: Option<PathBuf>) -> Result<()> {
    let data = series.load()?;
    let model = EchoStateNetwork::new(esn.config())?;
    let forecast = project(&data, ECHO_TRAIN_LEN, esn.window, model)?;

    write_json(&serde_json::json!({ "result": forecast }), output.as_ref())
}

fn init_tracing(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(default));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    match cli.command {
        Commands::Fetch { query, output } => {
            let closes = fetch_closes(&query.request()?, &query.base_url, false)?;
            write_json(&serde_json::json!({ "result": closes }), output.as_ref())
        }
        Commands::Echo {
            series,
            esn,
            output,
        } => run_echo(&series, &esn, output),
        Commands::Arima {
            series,
            split,
            output,
        } => run_arima(&series, split, output),
        Commands::Project {
            series,
            esn,
            output,
        } => run_project(&series, &esn, output),
    }
}

use analytics::{AnalysisPolicy, SeasonalityAnalyzer, SeasonalityReport};
use api_client::{CachedSource, MarketDataSource, YahooClient};
use chrono::{Local, Months, NaiveDate};
use clap::{Args, Parser, Subcommand};
use configuration::settings::Config;
use configuration::{AnalysisOverrides, MarketDataSettings};
use core_types::{DateRange, PriceSeries};
use ingest::CsvOptions;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

mod error;
mod logging;

use crate::error::AppError;

/// The main entry point for the Seasonal application.
#[tokio::main]
async fn main() -> ExitCode {
    // Load optional overrides from a .env file
    dotenvy::dotenv().ok();

    // Parse command-line arguments
    let cli = Cli::parse();

    let mut config = match configuration::load_config(&cli.config) {
        Ok(config) => config,
        Err(e) => {
            eprintln!("{}", AppError::from(e));
            return ExitCode::FAILURE;
        }
    };
    if let Err(e) = cli.overrides.apply(&mut config.analysis) {
        eprintln!("{}", AppError::from(e));
        return ExitCode::FAILURE;
    }

    let _log_guard = match logging::init_tracing(&config.logging) {
        Ok(guard) => guard,
        Err(e) => {
            eprintln!("Error: {e:#}");
            return ExitCode::FAILURE;
        }
    };

    let today = cli.today.unwrap_or_else(|| Local::now().date_naive());

    // Execute the appropriate command
    let result = match cli.command {
        Commands::Analyze(args) => handle_analyze(args, &config, today).await,
        Commands::Compare(args) => handle_compare(args, &config, today).await,
        Commands::Export(args) => handle_export(args, &config, today).await,
        Commands::Fetch(args) => handle_fetch(args, &config, today).await,
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            tracing::error!(error = %e, "Command failed");
            eprintln!("{e}");
            ExitCode::FAILURE
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Monthly seasonality analysis of daily stock prices.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Path to the configuration file. A missing file means built-in defaults.
    #[arg(long, global = true, default_value = "config.toml")]
    config: PathBuf,

    /// Reference date for "upcoming" months (format: YYYY-MM-DD). Defaults to today.
    #[arg(long, global = true)]
    today: Option<NaiveDate>,

    #[command(flatten)]
    overrides: AnalysisOverrides,
}

#[derive(Subcommand)]
enum Commands {
    /// Print the seasonality report for one price series.
    Analyze(AnalyzeArgs),
    /// Compare monthly seasonality across several price series.
    Compare(CompareArgs),
    /// Write the monthly return table (CSV) and optionally a text report.
    Export(ExportArgs),
    /// Fetch a ticker and print a price summary, to check connectivity.
    Fetch(FetchArgs),
}

/// Where a price series comes from: an uploaded file or a ticker.
#[derive(Args, Clone)]
struct SourceArgs {
    /// CSV file with a date column and a closing-price column.
    #[arg(long, conflicts_with = "ticker", required_unless_present = "ticker")]
    file: Option<PathBuf>,

    /// Ticker symbol to download (e.g., "AAPL", "OGDC.KA").
    #[arg(long)]
    ticker: Option<String>,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    csv: CsvArgs,
}

#[derive(Args, Clone)]
struct RangeArgs {
    /// Start of the period (format: YYYY-MM-DD). Tickers default to five years before --end.
    #[arg(long)]
    start: Option<NaiveDate>,

    /// End of the period (format: YYYY-MM-DD). Tickers default to today.
    #[arg(long)]
    end: Option<NaiveDate>,

    /// Bypass the in-memory market data cache.
    #[arg(long)]
    no_cache: bool,
}

#[derive(Args, Clone)]
struct CsvArgs {
    /// Header of the date column (auto-detected by default).
    #[arg(long)]
    date_column: Option<String>,

    /// Header of the price column (auto-detected by default).
    #[arg(long)]
    price_column: Option<String>,

    /// Field delimiter of the CSV file.
    #[arg(long, default_value_t = ',')]
    delimiter: char,
}

#[derive(Args)]
struct AnalyzeArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Print the report as JSON instead of tables.
    #[arg(long)]
    json: bool,
}

#[derive(Args)]
struct CompareArgs {
    /// CSV files to compare; repeat the flag for each file.
    #[arg(long = "file")]
    files: Vec<PathBuf>,

    /// Tickers to compare; repeat the flag for each ticker.
    #[arg(long = "ticker")]
    tickers: Vec<String>,

    #[command(flatten)]
    range: RangeArgs,

    #[command(flatten)]
    csv: CsvArgs,
}

#[derive(Args)]
struct ExportArgs {
    #[command(flatten)]
    source: SourceArgs,

    /// Destination of the monthly return CSV.
    #[arg(long, default_value = "seasonality.csv")]
    output: PathBuf,

    /// Also write the full text report to this path.
    #[arg(long)]
    report: Option<PathBuf>,
}

#[derive(Args)]
struct FetchArgs {
    /// Ticker symbol to download.
    #[arg(long)]
    ticker: String,

    #[command(flatten)]
    range: RangeArgs,
}

// ==============================================================================
// Command Logic
// ==============================================================================

async fn handle_analyze(args: AnalyzeArgs, config: &Config, today: NaiveDate) -> Result<(), AppError> {
    let source = Source::from_args(&args.source)?;
    let (label, series) = source.load(&args.source.range, &args.source.csv, &config.market_data, today).await?;
    let report = analyzer(config).analyze(&label, &series, today)?;

    if args.json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print!("{}", reporting::render_report(&report, config.analysis.missing_months));
    }
    Ok(())
}

async fn handle_compare(args: CompareArgs, config: &Config, today: NaiveDate) -> Result<(), AppError> {
    if args.files.len() + args.tickers.len() < 2 {
        return Err(AppError::Usage(
            "compare needs at least two series (--file and/or --ticker)".to_string(),
        ));
    }

    // Validate the shared window before reading or fetching anything.
    let range = if args.tickers.is_empty() {
        None
    } else {
        Some(ticker_range(&args.range, today)?)
    };
    // One client for every ticker so repeated symbols are served from the cache.
    let client = match range {
        Some(_) => Some(market_data(&config.market_data, args.range.no_cache)?),
        None => None,
    };
    let analyzer = analyzer(config);
    let mut reports: Vec<SeasonalityReport> = Vec::new();

    for path in &args.files {
        let (label, series) = load_file(path, &args.range, &args.csv)?;
        reports.push(analyzer.analyze(&label, &series, today)?);
    }
    if let (Some(client), Some(range)) = (&client, range) {
        for ticker in &args.tickers {
            let series = client.fetch_daily(ticker, &range).await?;
            reports.push(analyzer.analyze(&ticker.trim().to_uppercase(), &series, today)?);
        }
    }

    let (grid, strategies) = reporting::comparison_tables(&reports, config.analysis.missing_months);
    println!("Average daily return by calendar month (%)");
    println!("{grid}");
    println!("\nFavorable-month strategy (notional {})", config.analysis.notional);
    println!("{strategies}");
    Ok(())
}

async fn handle_export(args: ExportArgs, config: &Config, today: NaiveDate) -> Result<(), AppError> {
    let source = Source::from_args(&args.source)?;
    let (label, series) = source.load(&args.source.range, &args.source.csv, &config.market_data, today).await?;
    let report = analyzer(config).analyze(&label, &series, today)?;
    let policy = config.analysis.missing_months;

    reporting::write_monthly_csv_path(&args.output, &report, policy)?;
    println!("Monthly returns written to {}", args.output.display());

    if let Some(path) = &args.report {
        reporting::write_text_report(path, &report, policy)?;
        println!("Report written to {}", path.display());
    }
    Ok(())
}

async fn handle_fetch(args: FetchArgs, config: &Config, today: NaiveDate) -> Result<(), AppError> {
    let range = ticker_range(&args.range, today)?;
    let client = market_data(&config.market_data, args.range.no_cache)?;
    let series = client.fetch_daily(&args.ticker, &range).await?;

    println!(
        "Fetched {} closes for {} ({} to {}): first {}, last {}",
        series.len(),
        args.ticker.trim().to_uppercase(),
        series.first().date,
        series.last().date,
        series.first().close,
        series.last().close
    );
    Ok(())
}

// ==============================================================================
// Helpers
// ==============================================================================

enum Source {
    File(PathBuf),
    Ticker(String),
}

impl Source {
    fn from_args(args: &SourceArgs) -> Result<Self, AppError> {
        match (&args.file, &args.ticker) {
            (Some(path), None) => Ok(Source::File(path.clone())),
            (None, Some(ticker)) => Ok(Source::Ticker(ticker.clone())),
            _ => Err(AppError::Usage("give exactly one of --file or --ticker".to_string())),
        }
    }

    async fn load(
        &self,
        range: &RangeArgs,
        csv: &CsvArgs,
        settings: &MarketDataSettings,
        today: NaiveDate,
    ) -> Result<(String, PriceSeries), AppError> {
        match self {
            Source::File(path) => load_file(path, range, csv),
            Source::Ticker(ticker) => {
                // Validate the range before touching the network.
                let range_to_fetch = ticker_range(range, today)?;
                let client = market_data(settings, range.no_cache)?;
                let series = client.fetch_daily(ticker, &range_to_fetch).await?;
                Ok((ticker.trim().to_uppercase(), series))
            }
        }
    }
}

fn load_file(path: &Path, range: &RangeArgs, csv: &CsvArgs) -> Result<(String, PriceSeries), AppError> {
    let delimiter = u8::try_from(csv.delimiter)
        .map_err(|_| AppError::Usage(format!("delimiter '{}' must be a single-byte character", csv.delimiter)))?;
    let options = CsvOptions {
        date_column: csv.date_column.clone(),
        price_column: csv.price_column.clone(),
        delimiter,
    };

    let loaded = ingest::load_csv_path(path, &options)?;
    if !loaded.skipped.is_empty() {
        tracing::warn!(
            path = %path.display(),
            skipped = loaded.skipped.len(),
            first_line = loaded.skipped[0].line,
            "Some rows could not be parsed and were ignored"
        );
    }

    let label = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    // Files are only filtered when the caller asks for a window.
    let series = match (range.start, range.end) {
        (None, None) => loaded.series,
        (start, end) => {
            let start = start.unwrap_or(loaded.series.first().date);
            let end = end.unwrap_or(loaded.series.last().date);
            loaded.series.within(&DateRange::new(start, end)?)?
        }
    };
    Ok((label, series))
}

/// The requested window for a remote fetch: five years up to `end` unless
/// given. Fails when start is not before end.
fn ticker_range(range: &RangeArgs, today: NaiveDate) -> Result<DateRange, AppError> {
    let end = range.end.unwrap_or(today);
    let start = range
        .start
        .unwrap_or_else(|| end.checked_sub_months(Months::new(60)).unwrap_or(end));
    Ok(DateRange::new(start, end)?)
}

fn market_data(settings: &MarketDataSettings, no_cache: bool) -> Result<Box<dyn MarketDataSource>, AppError> {
    let client = YahooClient::new(settings)?;
    if settings.cache_enabled && !no_cache {
        Ok(Box::new(CachedSource::new(client)))
    } else {
        Ok(Box::new(client))
    }
}

fn analyzer(config: &Config) -> SeasonalityAnalyzer {
    SeasonalityAnalyzer::new(AnalysisPolicy {
        notional: config.analysis.notional,
        compound_policy: config.analysis.compound_policy,
    })
}

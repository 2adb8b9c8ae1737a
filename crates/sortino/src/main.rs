use std::path::PathBuf;

use clap::Parser;
use color_eyre::eyre::WrapErr;
use jiff::civil::Date;
use sortino::{InputKind, Overrides, RunConfig, RunRequest, init_logging};

#[derive(Parser, Debug)]
#[command(name = "sortino")]
#[command(about = "Search random portfolios for the best Sortino ratio")]
struct Args {
    /// CSV file with a date column followed by one column per asset
    #[arg(short, long)]
    input: PathBuf,

    /// Whether the asset columns hold prices or returns
    #[arg(short, long, value_enum, default_value_t = InputKind::Prices)]
    kind: InputKind,

    /// YAML config file (default: ~/.sortino/config.yaml when present)
    #[arg(short, long)]
    config: Option<PathBuf>,

    /// Number of random portfolios to evaluate
    #[arg(short = 'n', long)]
    trials: Option<usize>,

    /// Annualized risk-free rate, e.g. 0.02 for 2%
    #[arg(short, long)]
    risk_free_rate: Option<f64>,

    /// Periods per year used for annualization
    #[arg(long)]
    periods_per_year: Option<u32>,

    /// Seed for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// First date of the analysis window (YYYY-MM-DD)
    #[arg(long)]
    start: Option<Date>,

    /// Last date of the analysis window (YYYY-MM-DD)
    #[arg(long)]
    end: Option<Date>,

    /// Write every simulated portfolio and the best one's performance as JSON
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Log level (debug, info, warn, error)
    #[arg(short, long, default_value = "info")]
    log_level: String,

    /// Append logs to this file instead of stderr
    #[arg(long)]
    log_file: Option<PathBuf>,
}

impl Args {
    fn overrides(&self) -> Overrides {
        Overrides {
            start_date: self.start,
            end_date: self.end,
            risk_free_rate: self.risk_free_rate,
            num_portfolios: self.trials,
            periods_per_year: self.periods_per_year,
            seed: self.seed,
        }
    }
}

fn main() -> color_eyre::Result<()> {
    color_eyre::install()?;

    let args = Args::parse();
    init_logging(&args.log_level, args.log_file.as_deref())?;

    let mut config = RunConfig::resolve(args.config.as_deref()).wrap_err("failed to load config")?;
    args.overrides().apply(&mut config);
    config.validate().wrap_err("invalid options")?;

    let request = RunRequest {
        input: args.input,
        kind: args.kind,
        output: args.output,
    };
    sortino::run(&config, &request)?;

    tracing::info!("Optimization completed");
    Ok(())
}

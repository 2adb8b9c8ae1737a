//! Wires the data loader, the search engine and the report together

use std::io::Write;
use std::path::{Path, PathBuf};
use std::time::{Duration, Instant};

use color_eyre::eyre::{WrapErr, eyre};
use sortino_core::{
    ResultSet, ReturnMatrix, SimulationConfig, SimulationProgress, run_simulation_with_progress,
    select_best,
};

use crate::config::RunConfig;
use crate::data::{InputKind, load_return_series};
use crate::output::{RunReport, write_summary};

/// How often the progress of a running simulation is logged
const PROGRESS_LOG_INTERVAL: Duration = Duration::from_secs(1);

/// Everything one run needs besides the configuration
#[derive(Debug, Clone)]
pub struct RunRequest {
    pub input: PathBuf,
    pub kind: InputKind,
    pub output: Option<PathBuf>,
}

/// Load the data, search for the best allocation, print it and optionally
/// export the full result set
pub fn run(config: &RunConfig, request: &RunRequest) -> color_eyre::Result<()> {
    let series = load_return_series(
        &request.input,
        request.kind,
        config.start_date,
        config.end_date,
    )
    .wrap_err_with(|| format!("failed to load {}", request.input.display()))?;

    let sim_config = config.simulation_config(fresh_seed());
    tracing::info!(
        portfolios = sim_config.trial_count,
        seed = sim_config.seed,
        risk_free_rate = sim_config.risk_free_rate,
        "Starting Monte Carlo simulation"
    );

    let started = Instant::now();
    let results = simulate(&series.matrix, &sim_config)?;
    tracing::info!(
        trials = results.len(),
        elapsed_ms = started.elapsed().as_millis() as u64,
        "Simulation finished"
    );

    let best = select_best(&results).wrap_err("no portfolio to select")?;
    if best.is_unbounded() {
        tracing::warn!(
            periods = series.matrix.period_count(),
            "Best portfolio never fell below the target; the history may be too short to measure downside risk"
        );
    }

    let stdout = std::io::stdout();
    let mut out = stdout.lock();
    write_summary(
        &mut out,
        &best,
        series.matrix.assets(),
        config.display_threshold,
    )?;
    out.flush()?;

    if let Some(path) = &request.output {
        write_report(path, &RunReport::new(&series, &results, &best, config.risk_free_rate)?)?;
    }

    Ok(())
}

/// Run on a worker thread while this thread reports progress
fn simulate(returns: &ReturnMatrix, config: &SimulationConfig) -> color_eyre::Result<ResultSet> {
    let progress = SimulationProgress::new(config.trial_count);

    let outcome = std::thread::scope(|s| {
        let worker = s.spawn(|| run_simulation_with_progress(returns, config, Some(&progress)));

        let mut last_log = Instant::now();
        while !worker.is_finished() {
            std::thread::sleep(Duration::from_millis(50));
            if last_log.elapsed() >= PROGRESS_LOG_INTERVAL {
                tracing::info!(
                    completed = progress.completed(),
                    total = progress.total(),
                    "Simulating portfolios ({:.0}%)",
                    progress.fraction() * 100.0
                );
                last_log = Instant::now();
            }
        }
        worker.join()
    });

    let outcome = outcome.map_err(|_| eyre!("simulation thread panicked"))?;
    outcome.map_err(|e| {
        tracing::error!(kind = e.kind(), "Simulation failed: {e}");
        eyre!(e).wrap_err("simulation failed")
    })
}

fn write_report(path: &Path, report: &RunReport) -> color_eyre::Result<()> {
    report
        .write_json(path)
        .wrap_err_with(|| format!("failed to write {}", path.display()))?;
    tracing::info!(path = %path.display(), trials = report.trials.len(), "Results exported");
    Ok(())
}

/// Seed for runs that did not configure one; logged so the run can be repeated
fn fresh_seed() -> u64 {
    jiff::Timestamp::now().as_nanosecond() as u64
}

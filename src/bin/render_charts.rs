//! Chart renderer for saved simulation reports
//!
//! Re-draws the bar charts from a JSON report written with `--output`.
//!
//! Usage:
//!   cargo run --bin render_charts -- results.json
//!   cargo run --bin render_charts -- results.json --out showcase/charts --font DejaVuSans.ttf

use clap::Parser;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::{error, info, warn};

use roulette::{ChartRenderer, DEFAULT_CHART_DIR, DebugLogConfig, SimResult, SimulationReport};

#[derive(Debug, Parser)]
#[command(name = "render_charts", about = "Render bar charts from a saved roulette report")]
struct Args {
    /// JSON report written by `roulette --output`
    report: PathBuf,
    /// Output directory for PNG charts
    #[arg(long, default_value = DEFAULT_CHART_DIR)]
    out: PathBuf,
    /// TrueType font for labels
    #[arg(long)]
    font: Option<PathBuf>,
    #[arg(long)]
    debug_log: bool,
}

fn main() -> ExitCode {
    let args = Args::parse();
    DebugLogConfig::load_with_flag(args.debug_log).init_tracing(false);

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{}", e);
            ExitCode::FAILURE
        }
    }
}

fn run(args: &Args) -> SimResult<()> {
    let report = SimulationReport::load_from_file(&args.report)?;
    info!(
        "Loaded report {} ({} participants, {} trials)",
        report.run_id,
        report.participants.len(),
        report.total_trials
    );

    let renderer = match &args.font {
        Some(font) => ChartRenderer::new(&args.out).with_font_file(font)?,
        None => ChartRenderer::new(&args.out).with_system_font(),
    };
    if !renderer.has_font() {
        warn!("No chart font found; charts will have no labels (use --font)");
    }

    for path in renderer.render(&report)? {
        println!("{}", path.display());
    }
    Ok(())
}

//! Output sinks for finished simulation reports
//!
//! The engine hands a [`SimulationReport`] to every configured sink; none of
//! them feed anything back into the simulation.

pub mod charts;

use std::path::PathBuf;
use tracing::{info, warn};

use crate::error::SimResult;
use crate::simulation::{SimConfig, SimulationReport};

pub use charts::{ChartRenderer, ChartSpec};

/// Consumer of a finished report
pub trait StatsSink {
    fn publish(&mut self, report: &SimulationReport) -> SimResult<()>;
}

/// Prints per-participant lines and the summary table
pub struct ConsoleSink;

impl StatsSink for ConsoleSink {
    fn publish(&mut self, report: &SimulationReport) -> SimResult<()> {
        print!("{}", report.format_lines());
        println!("{}", report.format_table());
        Ok(())
    }
}

/// Writes the report as pretty JSON
pub struct JsonSink {
    /// `None` = stdout
    path: Option<PathBuf>,
}

impl JsonSink {
    pub fn new(target: &str) -> Self {
        let path = (target != "-").then(|| PathBuf::from(target));
        Self { path }
    }
}

impl StatsSink for JsonSink {
    fn publish(&mut self, report: &SimulationReport) -> SimResult<()> {
        match &self.path {
            Some(path) => {
                if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
                    std::fs::create_dir_all(parent)?;
                }
                report.write_to_file(path)?;
                info!("Results written to {}", path.display());
            }
            None => println!("{}", serde_json::to_string_pretty(report)?),
        }
        Ok(())
    }
}

impl StatsSink for ChartRenderer {
    fn publish(&mut self, report: &SimulationReport) -> SimResult<()> {
        let written = self.render(report)?;
        info!("Wrote {} charts to {}", written.len(), self.output_dir().display());
        Ok(())
    }
}

/// Sinks requested by `config`, in publishing order
pub fn sinks_for(config: &SimConfig) -> SimResult<Vec<Box<dyn StatsSink>>> {
    let mut sinks: Vec<Box<dyn StatsSink>> = Vec::new();
    let json_to_stdout = config.output_file.as_deref() == Some("-");

    if !config.quiet && !json_to_stdout {
        sinks.push(Box::new(ConsoleSink));
    }
    if let Some(target) = &config.output_file {
        sinks.push(Box::new(JsonSink::new(target)));
    }
    if let Some(dir) = &config.chart_dir {
        let renderer = match &config.font_path {
            Some(font) => ChartRenderer::new(dir).with_font_file(font)?,
            None => {
                let renderer = ChartRenderer::new(dir).with_system_font();
                if !renderer.has_font() {
                    warn!("No chart font found; charts will have no labels (use --font)");
                }
                renderer
            }
        };
        sinks.push(Box::new(renderer));
    }
    Ok(sinks)
}

/// Hand the report to every sink, stopping at the first failure
pub fn publish_all(report: &SimulationReport, sinks: &mut [Box<dyn StatsSink>]) -> SimResult<()> {
    for sink in sinks.iter_mut() {
        sink.publish(report)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::simulation::{Variant, run_simulation};

    use std::cell::RefCell;
    use std::rc::Rc;

    struct Recorder {
        seen: Rc<RefCell<Vec<u64>>>,
    }

    impl StatsSink for Recorder {
        fn publish(&mut self, report: &SimulationReport) -> SimResult<()> {
            self.seen.borrow_mut().push(report.total_trials);
            Ok(())
        }
    }

    fn quick_config() -> SimConfig {
        SimConfig {
            epochs: 200,
            seed: Some(1),
            chart_dir: None,
            quiet: true,
            ..SimConfig::default()
        }
    }

    #[test]
    fn test_quiet_without_outputs_has_no_sinks() {
        assert!(sinks_for(&quick_config()).unwrap().is_empty());
    }

    #[test]
    fn test_sink_selection() {
        let config = SimConfig {
            quiet: false,
            output_file: Some("-".to_string()),
            ..quick_config()
        };
        // JSON on stdout suppresses the console table
        assert_eq!(sinks_for(&config).unwrap().len(), 1);

        let config = SimConfig {
            quiet: false,
            output_file: Some("out/report.json".to_string()),
            chart_dir: Some("charts".to_string()),
            ..quick_config()
        };
        assert_eq!(sinks_for(&config).unwrap().len(), 3);
    }

    #[test]
    fn test_missing_font_file_is_an_error() {
        let config = SimConfig {
            chart_dir: Some("charts".to_string()),
            font_path: Some("no/such/font.ttf".to_string()),
            ..quick_config()
        };
        assert!(sinks_for(&config).is_err());
    }

    #[test]
    fn test_publish_all_reaches_every_sink() {
        let report = run_simulation(&quick_config()).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let mut sinks: Vec<Box<dyn StatsSink>> = vec![
            Box::new(Recorder { seen: Rc::clone(&seen) }),
            Box::new(Recorder { seen: Rc::clone(&seen) }),
        ];
        publish_all(&report, &mut sinks).unwrap();
        assert_eq!(*seen.borrow(), vec![200, 200]);
    }

    #[test]
    fn test_json_sink_writes_nested_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested/report.json");
        let config = SimConfig {
            variant: Variant::Extended,
            epochs: 2,
            games_per_epoch: 5,
            ..quick_config()
        };
        let report = run_simulation(&config).unwrap();

        let mut sink = JsonSink::new(path.to_str().unwrap());
        sink.publish(&report).unwrap();

        let loaded = SimulationReport::load_from_file(&path).unwrap();
        assert_eq!(loaded.run_id, report.run_id);
        assert_eq!(loaded.total_trials, 10);
    }
}

//! Debug logging configuration shared across binaries.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use tracing_subscriber::EnvFilter;

pub const DEBUG_LOG_SETTINGS_FILE: &str = "config/debug_logging.json";

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct DebugLogConfig {
    pub enabled: bool,
    /// Log every elimination (very noisy on large runs)
    pub trace_trials: bool,
}

impl DebugLogConfig {
    pub fn load() -> Self {
        let path = Path::new(DEBUG_LOG_SETTINGS_FILE);
        if !path.exists() {
            return Self::default();
        }
        match fs::read_to_string(path) {
            Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
            Err(_) => Self::default(),
        }
    }

    /// Settings file, with `--debug-log` forcing debug output on
    pub fn load_with_flag(debug_log: bool) -> Self {
        let mut config = Self::load();
        if debug_log {
            config.enabled = true;
        }
        config
    }

    /// Filter used when `RUST_LOG` is not set
    pub fn default_directive(&self, quiet: bool) -> &'static str {
        match (quiet, self.enabled, self.trace_trials) {
            (true, _, _) => "warn",
            (false, true, true) => "roulette=trace,render_charts=trace,info",
            (false, true, false) => "roulette=debug,render_charts=debug,info",
            (false, false, _) => "info",
        }
    }

    pub fn init_tracing(&self, quiet: bool) {
        let filter = EnvFilter::try_from_default_env()
            .unwrap_or_else(|_| EnvFilter::new(self.default_directive(quiet)));
        let _ = tracing_subscriber::fmt()
            .with_env_filter(filter)
            .with_target(false)
            .with_writer(std::io::stderr)
            .try_init();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_directive_levels() {
        let off = DebugLogConfig::default();
        assert_eq!(off.default_directive(false), "info");
        assert_eq!(off.default_directive(true), "warn");

        let debug = DebugLogConfig::load_with_flag(true);
        assert!(debug.enabled);
        assert!(debug.default_directive(false).starts_with("roulette=debug"));

        let trace = DebugLogConfig {
            enabled: true,
            trace_trials: true,
        };
        assert!(trace.default_directive(false).starts_with("roulette=trace"));
        assert_eq!(trace.default_directive(true), "warn");
    }

    #[test]
    fn test_partial_settings_parse() {
        let config: DebugLogConfig = serde_json::from_str(r#"{ "enabled": true }"#).unwrap();
        assert!(config.enabled);
        assert!(!config.trace_trials);
    }
}

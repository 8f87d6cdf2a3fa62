//! Simulation configuration

use clap::{Parser, ValueEnum};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use crate::constants::{
    DEFAULT_CHAMBER_SIZE, DEFAULT_CHART_DIR, DEFAULT_EPOCHS, DEFAULT_GAMES_PER_EPOCH,
    DEFAULT_PARTICIPANTS, MIN_CHAMBER_SIZE, MIN_PARTICIPANTS,
};
use crate::error::{SimError, SimResult};

/// Which engine to run
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ValueEnum)]
#[serde(rename_all = "snake_case")]
pub enum Variant {
    /// One long run, round-robin turns, every chamber fully fired
    #[default]
    Simple,
    /// Epochs of games with stress and reaction-time tracking
    Extended,
}

/// Configuration for a simulation run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SimConfig {
    pub variant: Variant,
    /// Lineup size
    pub participants: u32,
    /// Slots per cylinder
    pub chamber_size: u32,
    /// Simple: number of trials. Extended: number of epochs.
    pub epochs: u64,
    /// Extended only: trials per epoch
    pub games_per_epoch: u64,
    /// RNG seed (None = entropy). Convenience only, no replay guarantee.
    pub seed: Option<u64>,
    /// JSON report path ("-" = stdout, None = no JSON)
    pub output_file: Option<String>,
    /// Directory for PNG charts (None = no charts)
    pub chart_dir: Option<String>,
    /// TrueType font for chart labels (None = probe system fonts)
    pub font_path: Option<String>,
    /// Include per-epoch statistics in the report (extended only)
    pub per_epoch: bool,
    /// Suppress console output
    pub quiet: bool,
}

impl Default for SimConfig {
    fn default() -> Self {
        Self {
            variant: Variant::Simple,
            participants: DEFAULT_PARTICIPANTS,
            chamber_size: DEFAULT_CHAMBER_SIZE,
            epochs: DEFAULT_EPOCHS,
            games_per_epoch: DEFAULT_GAMES_PER_EPOCH,
            seed: None,
            output_file: None,
            chart_dir: Some(DEFAULT_CHART_DIR.to_string()),
            font_path: None,
            per_epoch: false,
            quiet: false,
        }
    }
}

/// Template simulation settings (checked into git)
pub const SIM_SETTINGS_TEMPLATE: &str = "config/roulette_settings.template.json";
/// Local simulation settings (gitignored, user's custom settings)
pub const SIM_SETTINGS_FILE: &str = "config/roulette_settings.json";

impl SimConfig {
    /// Load configuration from a JSON or TOML settings file (by extension)
    pub fn from_file(path: impl AsRef<Path>) -> SimResult<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).map_err(|source| SimError::Read {
            path: path.display().to_string(),
            source,
        })?;
        let parse_error = |message: String| SimError::Parse {
            path: path.display().to_string(),
            message,
        };
        let is_toml = path
            .extension()
            .is_some_and(|ext| ext.eq_ignore_ascii_case("toml"));
        if is_toml {
            toml::from_str(&contents).map_err(|e| parse_error(e.to_string()))
        } else {
            serde_json::from_str(&contents).map_err(|e| parse_error(e.to_string()))
        }
    }

    /// Load configuration from default config files
    /// Priority: local settings > template settings > built-in defaults
    pub fn from_config_files() -> Self {
        for candidate in [SIM_SETTINGS_FILE, SIM_SETTINGS_TEMPLATE] {
            if !Path::new(candidate).exists() {
                continue;
            }
            match Self::from_file(candidate) {
                Ok(config) => {
                    debug!("Loaded settings from {}", candidate);
                    return config;
                }
                Err(e) => warn!("Ignoring settings: {}", e),
            }
        }
        Self::default()
    }

    /// Build from parsed command line: settings files first, then flag overrides
    pub fn from_cli(args: &CliArgs) -> SimResult<Self> {
        let mut config = match &args.settings {
            Some(path) => Self::from_file(path)?,
            None => Self::from_config_files(),
        };
        config.apply_overrides(args);
        config.validate()?;
        Ok(config)
    }

    pub fn apply_overrides(&mut self, args: &CliArgs) {
        if let Some(variant) = args.variant {
            self.variant = variant;
        }
        if let Some(players) = args.players {
            self.participants = players;
        }
        if let Some(chambers) = args.chambers {
            self.chamber_size = chambers;
        }
        if let Some(epochs) = args.epochs {
            self.epochs = epochs;
        }
        if let Some(games) = args.games_per_epoch {
            self.games_per_epoch = games;
        }
        if args.seed.is_some() {
            self.seed = args.seed;
        }
        if args.output.is_some() {
            self.output_file = args.output.clone();
        }
        if args.charts.is_some() {
            self.chart_dir = args.charts.clone();
        }
        if args.no_charts {
            self.chart_dir = None;
        }
        if args.font.is_some() {
            self.font_path = args.font.clone();
        }
        self.per_epoch |= args.per_epoch;
        self.quiet |= args.quiet;
    }

    /// Fail fast on values the engine cannot run with
    pub fn validate(&self) -> SimResult<()> {
        if self.participants < MIN_PARTICIPANTS {
            return Err(SimError::invalid(format!(
                "participants must be at least {}, got {}",
                MIN_PARTICIPANTS, self.participants
            )));
        }
        if self.chamber_size < MIN_CHAMBER_SIZE {
            return Err(SimError::invalid(format!(
                "chamber size must be at least {}, got {}",
                MIN_CHAMBER_SIZE, self.chamber_size
            )));
        }
        if self.epochs == 0 {
            return Err(SimError::invalid("epochs must be positive"));
        }
        if self.variant == Variant::Extended && self.games_per_epoch == 0 {
            return Err(SimError::invalid("games per epoch must be positive"));
        }
        Ok(())
    }

    /// Trials the run will play in total
    pub fn total_trials(&self) -> u64 {
        match self.variant {
            Variant::Simple => self.epochs,
            Variant::Extended => self.epochs.saturating_mul(self.games_per_epoch),
        }
    }
}

/// Command line for the `roulette` binary. Flags override settings files.
#[derive(Debug, Clone, Default, Parser)]
#[command(
    name = "roulette",
    about = "Russian roulette elimination statistics",
    after_help = "SETTINGS FILE FORMAT (JSON or TOML):\n    {\n      \"variant\": \"extended\",\n      \"participants\": 4,\n      \"epochs\": 500,\n      \"games_per_epoch\": 100\n    }"
)]
pub struct CliArgs {
    /// Load settings from a JSON or TOML file
    #[arg(long, value_name = "FILE")]
    pub settings: Option<PathBuf>,
    /// Engine variant
    #[arg(long, value_enum)]
    pub variant: Option<Variant>,
    /// Number of participants
    #[arg(long)]
    pub players: Option<u32>,
    /// Slots per cylinder
    #[arg(long)]
    pub chambers: Option<u32>,
    /// Trials (simple) or epochs (extended)
    #[arg(long)]
    pub epochs: Option<u64>,
    /// Games per epoch (extended)
    #[arg(long)]
    pub games_per_epoch: Option<u64>,
    /// RNG seed
    #[arg(long)]
    pub seed: Option<u64>,
    /// Write the JSON report to FILE ("-" for stdout)
    #[arg(long, value_name = "FILE")]
    pub output: Option<String>,
    /// Write PNG charts into DIR
    #[arg(long, value_name = "DIR")]
    pub charts: Option<String>,
    /// Skip chart rendering
    #[arg(long)]
    pub no_charts: bool,
    /// TrueType font used for chart labels
    #[arg(long, value_name = "FILE")]
    pub font: Option<String>,
    /// Include per-epoch statistics in the JSON report
    #[arg(long)]
    pub per_epoch: bool,
    /// Suppress console output
    #[arg(long, short)]
    pub quiet: bool,
    /// Verbose logging (see config/debug_logging.json)
    #[arg(long)]
    pub debug_log: bool,
}

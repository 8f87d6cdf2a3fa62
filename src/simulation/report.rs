//! Final report of a simulation run

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use uuid::Uuid;

use crate::error::{SimError, SimResult};

use super::config::{SimConfig, Variant};
use super::roster::ParticipantId;
use super::stats::ParticipantStats;

/// Statistics for one epoch of the extended variant
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpochStatistics {
    /// 1-based epoch number
    pub epoch: u64,
    pub participants: BTreeMap<ParticipantId, ParticipantStats>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationReport {
    pub run_id: Uuid,
    pub generated_at: DateTime<Utc>,
    pub variant: Variant,
    pub participants_count: u32,
    pub chamber_size: u32,
    pub epochs: u64,
    /// Extended only
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub games_per_epoch: Option<u64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub seed: Option<u64>,
    pub total_trials: u64,
    pub trials_with_hit: u64,
    pub replacements: u64,
    pub elapsed_ms: u64,
    pub participants: BTreeMap<ParticipantId, ParticipantStats>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub epoch_statistics: Vec<EpochStatistics>,
}

impl SimulationReport {
    /// Empty report shell for `config`, stamped with a fresh id and time
    pub fn for_config(config: &SimConfig) -> Self {
        Self {
            run_id: Uuid::new_v4(),
            generated_at: Utc::now(),
            variant: config.variant,
            participants_count: config.participants,
            chamber_size: config.chamber_size,
            epochs: config.epochs,
            games_per_epoch: (config.variant == Variant::Extended)
                .then_some(config.games_per_epoch),
            seed: config.seed,
            total_trials: 0,
            trials_with_hit: 0,
            replacements: 0,
            elapsed_ms: 0,
            participants: BTreeMap::new(),
            epoch_statistics: Vec::new(),
        }
    }

    pub fn total_deaths(&self) -> u64 {
        self.participants.values().map(|s| s.deaths).sum()
    }

    pub fn is_extended(&self) -> bool {
        self.variant == Variant::Extended
    }

    /// One `Player N -> {...}` line per participant
    pub fn format_lines(&self) -> String {
        let mut output = String::new();
        for stats in self.participants.values() {
            output.push_str(&format!(
                "{} -> {{deaths: {}, death_rate: {:.2}%, survival_rate: {:.2}%",
                stats.name, stats.deaths, stats.death_rate, stats.survival_rate
            ));
            if let Some(avg_time) = stats.avg_time_per_survival {
                output.push_str(&format!(", avg_time_per_survival: {:.4}s", avg_time));
            }
            if let Some(avg_nervosity) = stats.avg_nervosity {
                output.push_str(&format!(", avg_nervosity: {:.4}", avg_nervosity));
            }
            output.push_str("}\n");
        }
        output
    }

    /// Format as ASCII table
    pub fn format_table(&self) -> String {
        let extended = self.is_extended();
        let mut output = String::new();
        output.push_str("\nParticipant Statistics:\n\n");

        output.push_str(&format!(
            "{:>12} | {:>10} | {:>9} | {:>10}",
            "Participant", "Deaths", "Death %", "Survival %"
        ));
        if extended {
            output.push_str(&format!(" | {:>12} | {:>10}", "Avg Time (s)", "Nervosity"));
        }
        output.push('\n');

        output.push_str(&format!("{:-<12}-+-{:-<10}-+-{:-<9}-+-{:-<10}", "", "", "", ""));
        if extended {
            output.push_str(&format!("-+-{:-<12}-+-{:-<10}", "", ""));
        }
        output.push('\n');

        for stats in self.participants.values() {
            output.push_str(&format!(
                "{:>12} | {:>10} | {:>8.2}% | {:>9.2}%",
                &stats.name[..stats.name.len().min(12)],
                stats.deaths,
                stats.death_rate,
                stats.survival_rate
            ));
            if extended {
                output.push_str(&format!(
                    " | {:>12.4} | {:>10.4}",
                    stats.avg_time_per_survival.unwrap_or(0.0),
                    stats.avg_nervosity.unwrap_or(0.0)
                ));
            }
            output.push('\n');
        }

        output.push_str(&format!(
            "\nTrials: {} ({} with a hit, {} deaths recorded)",
            self.total_trials,
            self.trials_with_hit,
            self.total_deaths()
        ));
        if extended {
            output.push_str(&format!(", replacements seated: {}", self.replacements));
        }
        output.push_str(&format!("\nElapsed: {} ms\n", self.elapsed_ms));
        output
    }

    /// Write report to JSON file
    pub fn write_to_file(&self, path: &Path) -> SimResult<()> {
        let json = serde_json::to_string_pretty(self)?;
        let mut file = File::create(path)?;
        file.write_all(json.as_bytes())?;
        Ok(())
    }

    pub fn load_from_file(path: &Path) -> SimResult<Self> {
        let contents = std::fs::read_to_string(path).map_err(|source| SimError::Read {
            path: path.display().to_string(),
            source,
        })?;
        serde_json::from_str(&contents).map_err(|e| SimError::Parse {
            path: path.display().to_string(),
            message: e.to_string(),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn stats(name: &str, deaths: u64, extended: bool) -> ParticipantStats {
        ParticipantStats {
            name: name.to_string(),
            deaths,
            death_rate: deaths as f64,
            survival_rate: 100.0 - deaths as f64,
            avg_time_per_survival: extended.then_some(1.5),
            avg_nervosity: extended.then_some(0.9),
            death_turns: BTreeMap::from([(1, deaths)]),
        }
    }

    fn sample(variant: Variant) -> SimulationReport {
        let config = SimConfig {
            variant,
            participants: 2,
            epochs: 100,
            ..SimConfig::default()
        };
        let mut report = SimulationReport::for_config(&config);
        let extended = variant == Variant::Extended;
        report.participants.insert(ParticipantId(0), stats("Player 1", 40, extended));
        report.participants.insert(ParticipantId(1), stats("Player 2", 60, extended));
        report.total_trials = 100;
        report.trials_with_hit = 100;
        report
    }

    #[test]
    fn test_games_per_epoch_only_for_extended() {
        assert_eq!(sample(Variant::Simple).games_per_epoch, None);
        assert!(sample(Variant::Extended).games_per_epoch.is_some());
    }

    #[test]
    fn test_format_lines() {
        let lines = sample(Variant::Simple).format_lines();
        assert!(lines.contains("Player 1 -> {deaths: 40, death_rate: 40.00%, survival_rate: 60.00%}"));
        assert!(!lines.contains("avg_nervosity"));

        let lines = sample(Variant::Extended).format_lines();
        assert!(lines.contains("avg_time_per_survival: 1.5000s"));
        assert!(lines.contains("avg_nervosity: 0.9000"));
    }

    #[test]
    fn test_format_table_columns() {
        let simple = sample(Variant::Simple).format_table();
        assert!(simple.contains("Player 2"));
        assert!(simple.contains("100 with a hit, 100 deaths recorded"));
        assert!(!simple.contains("Nervosity"));

        let extended = sample(Variant::Extended).format_table();
        assert!(extended.contains("Nervosity"));
        assert!(extended.contains("replacements seated"));
    }

    #[test]
    fn test_json_file_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("report.json");
        let report = sample(Variant::Extended);

        report.write_to_file(&path).unwrap();
        let loaded = SimulationReport::load_from_file(&path).unwrap();
        assert_eq!(loaded, report);

        let raw = std::fs::read_to_string(&path).unwrap();
        assert!(raw.contains("\"variant\": \"extended\""));
    }
}

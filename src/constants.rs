//! Tunable constants for roulette
//!
//! All game and stress-model values are defined here for easy tweaking.

// =============================================================================
// GAME DEFAULTS
// =============================================================================

pub const DEFAULT_PARTICIPANTS: u32 = 3;
pub const DEFAULT_CHAMBER_SIZE: u32 = 6; // Standard revolver cylinder
pub const DEFAULT_EPOCHS: u64 = 100_000;
pub const DEFAULT_GAMES_PER_EPOCH: u64 = 100;
pub const DEFAULT_CHART_DIR: &str = "charts";

pub const MIN_PARTICIPANTS: u32 = 1;
pub const MIN_CHAMBER_SIZE: u32 = 2;

/// Loaded slots per chamber (fixed, not configurable)
pub const LOADED_SLOTS: usize = 1;

// =============================================================================
// STRESS MODEL (extended variant)
// =============================================================================

/// Nervosity is redrawn uniformly from this range at every epoch reset
pub const NERVOSITY_RESET_MIN: f64 = 0.5;
pub const NERVOSITY_RESET_MAX: f64 = 1.0;
pub const NERVOSITY_PER_EMPTY_SHOT: f64 = 0.05; // Pulled the trigger and lived
pub const NERVOSITY_PER_SURVIVED_GAME: f64 = 0.1; // Anticipatory stress after each game

/// Reaction time draw in seconds, scaled by current nervosity
pub const TIME_TAKEN_MIN: f64 = 0.5;
pub const TIME_TAKEN_MAX: f64 = 2.0;

// =============================================================================
// REPORTING
// =============================================================================

pub const PERCENT_DECIMALS: i32 = 2;
pub const AVERAGE_DECIMALS: i32 = 4;

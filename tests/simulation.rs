//! Statistical behaviour of complete simulation runs.

use roulette::simulation::{Roster, Variant};
use roulette::{
    EpochAggregator, NERVOSITY_PER_EMPTY_SHOT, NERVOSITY_PER_SURVIVED_GAME, ParticipantId,
    ScriptedRandom, SimConfig, SystemRandom, run_with_source,
};

fn config(variant: Variant, participants: u32, epochs: u64) -> SimConfig {
    SimConfig {
        variant,
        participants,
        epochs,
        games_per_epoch: 50,
        chart_dir: None,
        quiet: true,
        ..SimConfig::default()
    }
}

#[test]
fn lone_participant_never_survives() {
    let mut rng = SystemRandom::seeded(1234);
    let report = run_with_source(&config(Variant::Simple, 1, 100_000), &mut rng).unwrap();

    let stats = &report.participants[&ParticipantId(0)];
    assert_eq!(stats.deaths, 100_000);
    assert_eq!(stats.death_rate, 100.0);
    assert_eq!(stats.survival_rate, 0.0);
    // Death turn is the loaded slot's position, spread across all six turns
    assert_eq!(stats.death_turns.len(), 6);
}

#[test]
fn three_players_share_deaths_evenly() {
    let mut rng = SystemRandom::seeded(42);
    let report = run_with_source(&config(Variant::Simple, 3, 120_000), &mut rng).unwrap();

    assert_eq!(report.total_deaths(), 120_000);
    for stats in report.participants.values() {
        assert!(
            (stats.death_rate - 100.0 / 3.0).abs() < 1.0,
            "{} death rate {} not near 33.33",
            stats.name,
            stats.death_rate
        );
    }
}

#[test]
fn round_robin_skews_uneven_lineups() {
    // Four players, six slots: positions 0 and 4 fall to Player 1, 1 and 5 to Player 2
    let mut rng = SystemRandom::seeded(7);
    let report = run_with_source(&config(Variant::Simple, 4, 120_000), &mut rng).unwrap();

    let rate = |id: u32| report.participants[&ParticipantId(id)].death_rate;
    assert!((rate(0) - 100.0 / 3.0).abs() < 1.0);
    assert!((rate(1) - 100.0 / 3.0).abs() < 1.0);
    assert!((rate(2) - 100.0 / 6.0).abs() < 1.0);
    assert!((rate(3) - 100.0 / 6.0).abs() < 1.0);
}

#[test]
fn extended_hits_match_deaths() {
    let mut rng = SystemRandom::seeded(99);
    let report = run_with_source(&config(Variant::Extended, 3, 200), &mut rng).unwrap();

    assert_eq!(report.total_trials, 10_000);
    assert_eq!(report.trials_with_hit, report.total_trials);
    assert_eq!(report.total_deaths(), report.trials_with_hit);
    assert_eq!(report.replacements, report.trials_with_hit);
    for stats in report.participants.values() {
        let time = stats.avg_time_per_survival.unwrap();
        let nervosity = stats.avg_nervosity.unwrap();
        assert!(time >= 0.0);
        assert!(nervosity >= 0.5, "{} nervosity {}", stats.name, nervosity);
    }
}

#[test]
fn extended_lone_participant_has_zero_survival_time() {
    // With one shooter every game ends with that shooter dead
    let mut rng = SystemRandom::seeded(5);
    let report = run_with_source(&config(Variant::Extended, 1, 20), &mut rng).unwrap();

    let stats = &report.participants[&ParticipantId(0)];
    assert_eq!(stats.survival_rate, 0.0);
    assert_eq!(stats.avg_time_per_survival, Some(0.0));
}

#[test]
fn survived_empty_shots_and_games_raise_nervosity_exactly() {
    // Two epochs of one game each, two shooters, chamber of three.
    // Loaded slot last: turn 1 (3%2 = P2) empty, turn 2 (2%2 = P1) empty, turn 3 (1%2 = P2) loaded.
    let config = SimConfig {
        chamber_size: 3,
        games_per_epoch: 1,
        ..config(Variant::Extended, 2, 2)
    };
    let aggregator = EpochAggregator::new(&config).unwrap();
    let mut rng = ScriptedRandom::new()
        .with_loaded_positions([2, 2])
        .with_fallback_uniform(0.0);

    let run = aggregator.run(&mut rng).unwrap();
    let p1 = run.roster.accumulators(ParticipantId(0)).unwrap();
    let p2 = run.roster.accumulators(ParticipantId(1)).unwrap();

    let reset = 0.5; // fallback uniform 0.0 maps to the bottom of the reset range
    assert!((p1.nervosity - (reset + NERVOSITY_PER_EMPTY_SHOT + NERVOSITY_PER_SURVIVED_GAME)).abs() < 1e-12);
    assert!((p2.nervosity - (reset + NERVOSITY_PER_EMPTY_SHOT)).abs() < 1e-12);
    assert_eq!(p2.deaths, 1);
    assert_eq!(p2.death_turns.get(&3), Some(&1));

    // Two epochs were folded: P2 died in both, P1 in neither
    assert_eq!(run.totals[&ParticipantId(1)].deaths, 2);
    assert_eq!(run.totals[&ParticipantId(0)].deaths, 0);
    assert_eq!(run.totals[&ParticipantId(0)].nervosity_samples, 2);
}

#[test]
fn roster_ids_stay_stable_across_replacements() {
    let mut roster = Roster::new(2);
    let replacement = roster.spawn_replacement(0.5);
    assert_eq!(roster.lineup(), &[ParticipantId(0), ParticipantId(1)]);
    assert_eq!(replacement.to_string(), "Player 3");
}

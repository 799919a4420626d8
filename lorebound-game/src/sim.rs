//! Simulation driver: the per-trial event loop and Monte Carlo orchestration.

use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::Serialize;
use thiserror::Error;

use crate::archetype::Archetype;
use crate::catalog::Catalog;
use crate::encounter::{choose_mob, resolve_encounter, roll_card_drops, roll_loot};
use crate::player::PlayerState;
use crate::seed::derive_trial_seed;

#[derive(Debug, Error)]
pub enum SimError {
    /// The archetype policy asked for an action the catalog does not
    /// define. The loop cannot advance time without one, so this is fatal.
    #[error("archetype {archetype} selected an action missing from the catalog")]
    MissingAction { archetype: Archetype },
    /// A combat action fired against a catalog with no mobs at all.
    #[error("combat action {action} resolved against an empty mob catalog")]
    NoMobs { action: String },
}

/// Settings for a whole Monte Carlo simulation.
#[derive(Debug, Clone, Copy)]
pub struct SimulationConfig {
    pub runs: u32,
    /// Simulated playtime budget per trial, in hours.
    pub total_hours: f64,
    pub archetype: Archetype,
    /// User seed; per-trial streams are derived from it.
    pub seed: u64,
}

/// One output row, appended after every simulated action.
///
/// The column set is the contract with the downstream analysis tooling;
/// do not reorder or rename fields without updating the CSV header.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SnapshotRow {
    pub run_id: u32,
    /// Cumulative simulated hours, non-decreasing within a run.
    pub hour: f64,
    pub level: u32,
    pub xp: i64,
    pub ip: i64,
    pub player_power_score: f64,
    pub total_gear_score: i64,
    pub might: i64,
    pub finesse: i64,
    pub wits: i64,
    pub grit: i64,
    pub presence: i64,
}

impl SnapshotRow {
    fn capture(run_id: u32, hour: f64, player: &PlayerState) -> Self {
        let totals = player.totals();
        Self {
            run_id,
            hour,
            level: player.level(),
            xp: player.xp(),
            ip: player.ip(),
            player_power_score: player.power_score(),
            total_gear_score: player.total_gear_score(),
            might: totals.might,
            finesse: totals.finesse,
            wits: totals.wits,
            grit: totals.grit,
            presence: totals.presence,
        }
    }
}

/// Run one trial: a fresh character played by the archetype policy until
/// the hour budget is spent. The final action may overshoot the budget;
/// that overshoot is recorded, not corrected.
///
/// # Errors
///
/// Fails when the policy selects an action the catalog lacks, or a combat
/// action fires with no mobs defined.
pub fn run_trial(
    catalog: &Catalog,
    config: &SimulationConfig,
    run_id: u32,
) -> Result<Vec<SnapshotRow>, SimError> {
    let mut rng = ChaCha8Rng::seed_from_u64(derive_trial_seed(config.seed, run_id));
    let mut player = PlayerState::new(config.archetype, catalog);
    let mut rows = Vec::new();
    let mut hour = 0.0_f64;

    while hour < config.total_hours {
        hour += step(catalog, config.archetype, &mut player, &mut rng)?;
        rows.push(SnapshotRow::capture(run_id, hour, &player));
    }

    Ok(rows)
}

/// Execute one action and return the hours it consumed.
fn step<R: Rng>(
    catalog: &Catalog,
    archetype: Archetype,
    player: &mut PlayerState,
    rng: &mut R,
) -> Result<f64, SimError> {
    let action = archetype
        .choose_action(catalog, rng)
        .ok_or(SimError::MissingAction { archetype })?;

    let elapsed = if action.is_combat() {
        let mob = choose_mob(catalog, player.level(), rng).ok_or_else(|| SimError::NoMobs {
            action: action.id.clone(),
        })?;
        let outcome = resolve_encounter(player.power_score(), mob);
        player.gain_experience(catalog, outcome.xp_gain);
        player.earn_currency(action.ip_gain);
        for item_id in roll_loot(mob, rng) {
            player.earn_item(catalog, item_id);
        }
        outcome.time_cost
    } else {
        player.gain_experience(catalog, action.xp_gain);
        player.earn_currency(action.ip_gain);
        action.time_cost
    };

    // Card drops ride along with every action, combat or not.
    for card_id in roll_card_drops(catalog, &action.id, rng) {
        player.earn_card(catalog, card_id);
    }

    Ok(elapsed)
}

/// Run `config.runs` independent trials and concatenate their rows in run
/// order. Each trial gets a fresh character and its own derived RNG
/// stream, so runs are independent regardless of execution order.
///
/// # Errors
///
/// Propagates the first trial failure; see [`run_trial`].
pub fn run_simulation(
    catalog: &Catalog,
    config: &SimulationConfig,
) -> Result<Vec<SnapshotRow>, SimError> {
    let mut rows = Vec::new();
    for run_id in 0..config.runs {
        rows.extend(run_trial(catalog, config, run_id)?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn config(archetype: Archetype, hours: f64) -> SimulationConfig {
        SimulationConfig {
            runs: 1,
            total_hours: hours,
            archetype,
            seed: 1337,
        }
    }

    #[test]
    fn trial_produces_rows_until_budget_spent() {
        let catalog = Catalog::builtin();
        let rows = run_trial(&catalog, &config(Archetype::Balanced, 2.0), 0).unwrap();
        assert!(!rows.is_empty());
        let last = rows.last().unwrap();
        assert!(last.hour >= 2.0);
        // Overshoot is bounded by one action; the slowest possible is an
        // orc fight at the 0.1 power-ratio floor (0.25 / 0.1 hours).
        assert!(last.hour < 2.0 + 2.5);
    }

    #[test]
    fn hours_are_monotone_within_a_run() {
        let catalog = Catalog::builtin();
        let rows = run_trial(&catalog, &config(Archetype::PowerGamer, 5.0), 0).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[1].hour >= pair[0].hour);
        }
    }

    #[test]
    fn ip_is_monotone_within_a_run() {
        let catalog = Catalog::builtin();
        let rows = run_trial(&catalog, &config(Archetype::Roleplayer, 5.0), 0).unwrap();
        for pair in rows.windows(2) {
            assert!(pair[1].ip >= pair[0].ip);
        }
    }

    #[test]
    fn same_seed_reproduces_identical_rows() {
        let catalog = Catalog::builtin();
        let cfg = config(Archetype::Balanced, 1.0);
        let first = run_trial(&catalog, &cfg, 0).unwrap();
        let second = run_trial(&catalog, &cfg, 0).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn different_runs_diverge() {
        let catalog = Catalog::builtin();
        let cfg = config(Archetype::Balanced, 5.0);
        let run_a = run_trial(&catalog, &cfg, 0).unwrap();
        let run_b = run_trial(&catalog, &cfg, 1).unwrap();
        // Identical action sequences across derived streams would defeat
        // the Monte Carlo sampling.
        let hours_a: Vec<f64> = run_a.iter().map(|r| r.hour).collect();
        let hours_b: Vec<f64> = run_b.iter().map(|r| r.hour).collect();
        assert_ne!(hours_a, hours_b);
    }

    #[test]
    fn simulation_tags_rows_with_run_ids() {
        let catalog = Catalog::builtin();
        let cfg = SimulationConfig {
            runs: 3,
            total_hours: 1.0,
            archetype: Archetype::Balanced,
            seed: 7,
        };
        let rows = run_simulation(&catalog, &cfg).unwrap();
        let mut seen: Vec<u32> = rows.iter().map(|r| r.run_id).collect();
        seen.dedup();
        assert_eq!(seen, [0, 1, 2]);
    }

    #[test]
    fn missing_policy_action_is_a_driver_error() {
        let json = r#"{
            "power_weights": {},
            "gear_weights": {},
            "xp_curve": {"base": 100.0, "growth": 1.2, "max_level": 10},
            "power_budget": {"1": 5},
            "cards": [],
            "items": [],
            "mobs": [],
            "actions": [{"id": "social_quest", "xp_gain": 20, "ip_gain": 100, "time_cost": 0.5}],
            "card_drops": []
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let cfg = SimulationConfig {
            runs: 1,
            total_hours: 1.0,
            archetype: Archetype::PowerGamer,
            seed: 7,
        };
        assert!(matches!(
            run_simulation(&catalog, &cfg),
            Err(SimError::MissingAction { .. })
        ));
    }

    #[test]
    fn combat_without_mobs_is_a_driver_error() {
        let json = r#"{
            "power_weights": {},
            "gear_weights": {},
            "xp_curve": {"base": 100.0, "growth": 1.2, "max_level": 10},
            "power_budget": {"1": 5},
            "cards": [],
            "items": [],
            "mobs": [],
            "actions": [
                {"id": "kill_goblin", "xp_gain": 50, "ip_gain": 5, "time_cost": 0.1},
                {"id": "kill_orc", "xp_gain": 150, "ip_gain": 10, "time_cost": 0.25}
            ],
            "card_drops": []
        }"#;
        let catalog = Catalog::from_json(json).unwrap();
        let cfg = SimulationConfig {
            runs: 1,
            total_hours: 1.0,
            archetype: Archetype::PowerGamer,
            seed: 7,
        };
        assert!(matches!(
            run_simulation(&catalog, &cfg),
            Err(SimError::NoMobs { .. })
        ));
    }
}

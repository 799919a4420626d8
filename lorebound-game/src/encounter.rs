//! Pure encounter resolution: fight outcomes, mob selection, drop rolls.

use rand::Rng;

use crate::catalog::{Catalog, MobTemplate};

/// Effective disadvantage is capped at 10x; also guards the division.
const POWER_RATIO_FLOOR: f64 = 0.1;
/// XP bonus slope for fighting above one's power.
const UNDERDOG_XP_BONUS: f64 = 0.5;
/// XP penalty slope for stomping weaker mobs.
const OVERPOWER_XP_PENALTY: f64 = 0.25;
/// Stomping never pays less than 10% of base XP.
const XP_MODIFIER_FLOOR: f64 = 0.1;
/// Mobs within this many levels of the player are fair game.
const MOB_LEVEL_WINDOW: i32 = 7;

/// Result of one resolved fight.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct EncounterOutcome {
    /// Hours the fight took.
    pub time_cost: f64,
    pub xp_gain: i64,
}

/// Resolve a fight between a player at `player_power` and `mob`.
///
/// At exactly even power the outcome is the mob's base time and base XP.
/// Stronger players finish faster for diminishing XP; weaker players fight
/// longer for up to +50% XP.
#[must_use]
pub fn resolve_encounter(player_power: f64, mob: &MobTemplate) -> EncounterOutcome {
    #[allow(clippy::cast_precision_loss)]
    let power_ratio = (player_power / mob.power_score.max(1) as f64).max(POWER_RATIO_FLOOR);
    let time_cost = mob.base_time_cost / power_ratio;

    let xp_modifier = if power_ratio < 1.0 {
        1.0 + UNDERDOG_XP_BONUS * (1.0 - power_ratio)
    } else {
        (1.0 - (power_ratio - 1.0) * OVERPOWER_XP_PENALTY).max(XP_MODIFIER_FLOOR)
    };

    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation)]
    let xp_gain = (mob.xp_reward as f64 * xp_modifier).floor() as i64;

    EncounterOutcome { time_cost, xp_gain }
}

/// Pick a mob for a player at `player_level`: uniform among mobs within
/// the level window, or, when none qualify, the mob with the smallest
/// level gap (first in catalog order on ties). `None` only for an empty
/// mob catalog.
pub fn choose_mob<'a, R: Rng>(
    catalog: &'a Catalog,
    player_level: u32,
    rng: &mut R,
) -> Option<&'a MobTemplate> {
    #[allow(clippy::cast_possible_wrap)]
    let level_gap = |mob: &MobTemplate| (mob.level - player_level as i32).abs();

    let eligible: Vec<&MobTemplate> = catalog
        .mobs()
        .iter()
        .filter(|mob| level_gap(mob) <= MOB_LEVEL_WINDOW)
        .collect();

    if eligible.is_empty() {
        return catalog
            .mobs()
            .iter()
            .enumerate()
            .min_by_key(|(index, mob)| (level_gap(mob), *index))
            .map(|(_, mob)| mob);
    }

    let pick = rng.gen_range(0..eligible.len());
    Some(eligible[pick])
}

/// Roll a mob's loot table: one independent Bernoulli trial per entry, in
/// listed order. Multiple drops per fight are possible.
pub fn roll_loot<'a, R: Rng>(mob: &'a MobTemplate, rng: &mut R) -> Vec<&'a str> {
    mob.loot
        .iter()
        .filter(|entry| rng.r#gen::<f64>() < entry.chance)
        .map(|entry| entry.item.as_str())
        .collect()
}

/// Roll the card drops attached to an action, independent of its outcome.
pub fn roll_card_drops<'a, R: Rng>(
    catalog: &'a Catalog,
    action_id: &str,
    rng: &mut R,
) -> Vec<&'a str> {
    catalog
        .card_drops(action_id)
        .iter()
        .filter(|entry| rng.r#gen::<f64>() < entry.chance)
        .map(|entry| entry.card.as_str())
        .collect()
}

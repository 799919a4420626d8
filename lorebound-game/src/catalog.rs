//! Static content catalog: templates, weight tables, and progression curves.
//!
//! The catalog is built once (from the embedded default content or a
//! caller-supplied JSON string) and is read-only afterwards. Derived values
//! such as item gear scores and the XP curve are materialized at build time
//! and never recomputed elsewhere, so catalog-time and runtime rounding can
//! not drift apart.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;
use thiserror::Error;

use crate::stats::StatBlock;

/// Action ids with this prefix resolve through the mob-fight path.
pub const COMBAT_ACTION_PREFIX: &str = "kill_";

const BUILTIN_CONTENT: &str = include_str!("../assets/content.json");

/// Weight applied to any stat missing from a weight table.
const DEFAULT_STAT_WEIGHT: f64 = 1.0;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("invalid catalog json: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("invalid catalog content: {0}")]
    Invalid(String),
}

/// Equipment slots a single item can occupy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EquipSlot {
    MainHand,
    OffHand,
    Head,
    Chest,
    Legs,
    Feet,
    Hands,
    Ring1,
    Ring2,
}

impl EquipSlot {
    pub const ALL: [Self; 9] = [
        Self::MainHand,
        Self::OffHand,
        Self::Head,
        Self::Chest,
        Self::Legs,
        Self::Feet,
        Self::Hands,
        Self::Ring1,
        Self::Ring2,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::MainHand => "main_hand",
            Self::OffHand => "off_hand",
            Self::Head => "head",
            Self::Chest => "chest",
            Self::Legs => "legs",
            Self::Feet => "feet",
            Self::Hands => "hands",
            Self::Ring1 => "ring1",
            Self::Ring2 => "ring2",
        }
    }
}

impl fmt::Display for EquipSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An equippable item with its precomputed gear score.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ItemTemplate {
    pub id: String,
    pub slot: EquipSlot,
    /// Stat name -> bonus value. May carry stats outside the core five
    /// (e.g. `physical_power`, `armor`); those only feed the gear score.
    pub stats: BTreeMap<String, i64>,
    /// Weighted stat sum, truncated. Computed once at catalog build and
    /// authoritative from then on.
    pub gear_score: i64,
}

#[derive(Debug, Clone, Deserialize)]
struct ItemDef {
    id: String,
    slot: EquipSlot,
    stats: BTreeMap<String, i64>,
}

/// A collectible lore card granting stat bonuses while active.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoreCardTemplate {
    pub id: String,
    pub power_cost: i64,
    #[serde(default)]
    pub bonus: StatBlock,
}

/// A fightable mob with its loot table in definition order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MobTemplate {
    pub id: String,
    pub level: i32,
    pub power_score: i64,
    pub xp_reward: i64,
    /// Hours an even-power fight takes.
    pub base_time_cost: f64,
    #[serde(default)]
    pub loot: Vec<LootEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LootEntry {
    pub item: String,
    pub chance: f64,
}

/// A player action and its fixed outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActionTemplate {
    pub id: String,
    pub xp_gain: i64,
    pub ip_gain: i64,
    /// Hours the action takes (for combat actions, replaced by the
    /// resolved fight time).
    pub time_cost: f64,
}

impl ActionTemplate {
    #[must_use]
    pub fn is_combat(&self) -> bool {
        self.id.starts_with(COMBAT_ACTION_PREFIX)
    }
}

/// Per-action card drops, rolled independently of the action outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDropTable {
    pub action: String,
    pub drops: Vec<CardDropEntry>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CardDropEntry {
    pub card: String,
    pub chance: f64,
}

/// XP curve parameters: requirement(level) = trunc(base * growth^(level-1)).
#[derive(Debug, Clone, Deserialize)]
struct XpCurveDef {
    base: f64,
    growth: f64,
    max_level: u32,
}

#[derive(Debug, Clone, Deserialize)]
struct ContentFile {
    power_weights: BTreeMap<String, f64>,
    gear_weights: BTreeMap<String, f64>,
    xp_curve: XpCurveDef,
    power_budget: BTreeMap<u32, i64>,
    cards: Vec<LoreCardTemplate>,
    items: Vec<ItemDef>,
    mobs: Vec<MobTemplate>,
    actions: Vec<ActionTemplate>,
    card_drops: Vec<CardDropTable>,
}

/// Immutable content catalog, constructed once and shared read-only.
#[derive(Debug, Clone)]
pub struct Catalog {
    power_weights: BTreeMap<String, f64>,
    /// requirement to leave level (index + 1); levels past the end cap out.
    xp_curve: Vec<i64>,
    power_budget: BTreeMap<u32, i64>,
    cards: Vec<LoreCardTemplate>,
    items: Vec<ItemTemplate>,
    mobs: Vec<MobTemplate>,
    actions: Vec<ActionTemplate>,
    card_drops: Vec<CardDropTable>,
}

impl Catalog {
    /// Build the catalog shipped with the crate.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_json(BUILTIN_CONTENT).expect("embedded content is valid")
    }

    /// Build a catalog from a JSON content string.
    ///
    /// # Errors
    ///
    /// Returns an error if the JSON cannot be parsed, or if the content is
    /// structurally unusable (non-positive time costs, drop chances outside
    /// `[0, 1]`).
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let content: ContentFile = serde_json::from_str(json)?;
        validate(&content)?;

        let gear_weights = content.gear_weights;
        let items = content
            .items
            .into_iter()
            .map(|def| {
                let gear_score = gear_score(&def.stats, &gear_weights);
                ItemTemplate {
                    id: def.id,
                    slot: def.slot,
                    stats: def.stats,
                    gear_score,
                }
            })
            .collect();

        let curve = &content.xp_curve;
        #[allow(clippy::cast_possible_truncation)]
        let xp_curve = (1..=curve.max_level)
            .map(|level| (curve.base * curve.growth.powi(level as i32 - 1)) as i64)
            .collect();

        Ok(Self {
            power_weights: content.power_weights,
            xp_curve,
            power_budget: content.power_budget,
            cards: content.cards,
            items,
            mobs: content.mobs,
            actions: content.actions,
            card_drops: content.card_drops,
        })
    }

    #[must_use]
    pub fn card(&self, id: &str) -> Option<&LoreCardTemplate> {
        self.cards.iter().find(|card| card.id == id)
    }

    #[must_use]
    pub fn item(&self, id: &str) -> Option<&ItemTemplate> {
        self.items.iter().find(|item| item.id == id)
    }

    #[must_use]
    pub fn mob(&self, id: &str) -> Option<&MobTemplate> {
        self.mobs.iter().find(|mob| mob.id == id)
    }

    #[must_use]
    pub fn action(&self, id: &str) -> Option<&ActionTemplate> {
        self.actions.iter().find(|action| action.id == id)
    }

    /// All mobs in definition order (the order tie-breaks rely on).
    #[must_use]
    pub fn mobs(&self) -> &[MobTemplate] {
        &self.mobs
    }

    /// All actions in definition order.
    #[must_use]
    pub fn actions(&self) -> &[ActionTemplate] {
        &self.actions
    }

    #[must_use]
    pub fn items(&self) -> &[ItemTemplate] {
        &self.items
    }

    /// Card drops rolled after the given action; empty when none defined.
    #[must_use]
    pub fn card_drops(&self, action_id: &str) -> &[CardDropEntry] {
        self.card_drops
            .iter()
            .find(|table| table.action == action_id)
            .map_or(&[], |table| table.drops.as_slice())
    }

    /// XP required to advance past `level`, or `None` past the curve's end.
    #[must_use]
    pub fn xp_to_next(&self, level: u32) -> Option<i64> {
        if level == 0 {
            return None;
        }
        self.xp_curve.get(level as usize - 1).copied()
    }

    /// Power budget at `level`; `None` when the table has no entry (callers
    /// keep their current budget, so the budget never decreases).
    #[must_use]
    pub fn budget_for(&self, level: u32) -> Option<i64> {
        self.power_budget.get(&level).copied()
    }

    /// Power-score multiplier for a stat, 1.0 when unlisted.
    #[must_use]
    pub fn power_weight(&self, stat: &str) -> f64 {
        self.power_weights
            .get(stat)
            .copied()
            .unwrap_or(DEFAULT_STAT_WEIGHT)
    }
}

#[allow(clippy::cast_possible_truncation)]
fn gear_score(stats: &BTreeMap<String, i64>, weights: &BTreeMap<String, f64>) -> i64 {
    #[allow(clippy::cast_precision_loss)]
    let score: f64 = stats
        .iter()
        .map(|(stat, value)| {
            let weight = weights.get(stat).copied().unwrap_or(DEFAULT_STAT_WEIGHT);
            *value as f64 * weight
        })
        .sum();
    score as i64
}

fn validate(content: &ContentFile) -> Result<(), CatalogError> {
    for action in &content.actions {
        if action.time_cost <= 0.0 {
            return Err(CatalogError::Invalid(format!(
                "action {} has non-positive time_cost",
                action.id
            )));
        }
    }
    for mob in &content.mobs {
        if mob.base_time_cost <= 0.0 {
            return Err(CatalogError::Invalid(format!(
                "mob {} has non-positive base_time_cost",
                mob.id
            )));
        }
        for entry in &mob.loot {
            check_chance(entry.chance, &mob.id, &entry.item)?;
        }
    }
    for table in &content.card_drops {
        for entry in &table.drops {
            check_chance(entry.chance, &table.action, &entry.card)?;
        }
    }
    Ok(())
}

fn check_chance(chance: f64, owner: &str, target: &str) -> Result<(), CatalogError> {
    if !(0.0..=1.0).contains(&chance) {
        return Err(CatalogError::Invalid(format!(
            "{owner}: drop chance for {target} is outside [0, 1]"
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn builtin_content_parses() {
        let catalog = Catalog::builtin();
        assert!(catalog.action("kill_goblin").is_some());
        assert!(catalog.mob("orc").is_some());
        assert!(catalog.card("epic_might_core").is_some());
        assert!(catalog.item("rusty_dagger").is_some());
    }

    #[test]
    fn gear_score_is_truncated_weighted_sum() {
        // physical_power 12 * 2.0 + might 1 * 5.0 = 29.0
        let mut stats = BTreeMap::new();
        stats.insert("physical_power".to_string(), 12);
        stats.insert("might".to_string(), 1);
        let mut weights = BTreeMap::new();
        weights.insert("physical_power".to_string(), 2.0);
        weights.insert("might".to_string(), 5.0);
        assert_eq!(gear_score(&stats, &weights), 29);
    }

    #[test]
    fn gear_score_defaults_unlisted_stats_to_one() {
        let mut stats = BTreeMap::new();
        stats.insert("mystery".to_string(), 3);
        assert_eq!(gear_score(&stats, &BTreeMap::new()), 3);
    }

    #[test]
    fn builtin_gear_scores_match_precomputed_values() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.item("rusty_dagger").unwrap().gear_score, 10);
        assert_eq!(catalog.item("iron_helm").unwrap().gear_score, 12);
        assert_eq!(catalog.item("goblin_slayer_sword").unwrap().gear_score, 29);
        // 15 * 1.5 + 1 * 4.0 = 26.5, truncated
        assert_eq!(catalog.item("orcish_greaves").unwrap().gear_score, 26);
        assert_eq!(catalog.item("elven_gloves").unwrap().gear_score, 10);
        assert_eq!(catalog.item("scholars_circlet").unwrap().gear_score, 8);
    }

    #[test]
    fn xp_curve_follows_geometric_growth() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.xp_to_next(1), Some(100));
        assert_eq!(catalog.xp_to_next(2), Some(120));
        assert_eq!(catalog.xp_to_next(3), Some(144));
        // 100 * 1.2^4 = 207.36, truncated
        assert_eq!(catalog.xp_to_next(5), Some(207));
        assert!(catalog.xp_to_next(100).is_some());
        assert_eq!(catalog.xp_to_next(101), None);
        assert_eq!(catalog.xp_to_next(0), None);
    }

    #[test]
    fn budget_table_covers_first_twenty_levels() {
        let catalog = Catalog::builtin();
        assert_eq!(catalog.budget_for(1), Some(5));
        assert_eq!(catalog.budget_for(20), Some(84));
        assert_eq!(catalog.budget_for(21), None);
    }

    #[test]
    fn unknown_ids_return_none() {
        let catalog = Catalog::builtin();
        assert!(catalog.card("no_such_card").is_none());
        assert!(catalog.item("no_such_item").is_none());
        assert!(catalog.mob("dragon").is_none());
        assert!(catalog.action("kill_dragon").is_none());
        assert!(catalog.card_drops("kill_dragon").is_empty());
    }

    #[test]
    fn combat_routing_keys_off_action_prefix() {
        let catalog = Catalog::builtin();
        assert!(catalog.action("kill_goblin").unwrap().is_combat());
        assert!(catalog.action("kill_orc").unwrap().is_combat());
        assert!(!catalog.action("social_quest").unwrap().is_combat());
    }

    #[test]
    fn rejects_non_positive_time_cost() {
        let json = r#"{
            "power_weights": {},
            "gear_weights": {},
            "xp_curve": {"base": 100.0, "growth": 1.2, "max_level": 10},
            "power_budget": {"1": 5},
            "cards": [],
            "items": [],
            "mobs": [],
            "actions": [{"id": "idle", "xp_gain": 0, "ip_gain": 0, "time_cost": 0.0}],
            "card_drops": []
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn rejects_out_of_range_drop_chance() {
        let json = r#"{
            "power_weights": {},
            "gear_weights": {},
            "xp_curve": {"base": 100.0, "growth": 1.2, "max_level": 10},
            "power_budget": {"1": 5},
            "cards": [],
            "items": [],
            "mobs": [{
                "id": "slime", "level": 1, "power_score": 10, "xp_reward": 5,
                "base_time_cost": 0.1,
                "loot": [{"item": "goo", "chance": 1.5}]
            }],
            "actions": [],
            "card_drops": []
        }"#;
        assert!(matches!(
            Catalog::from_json(json),
            Err(CatalogError::Invalid(_))
        ));
    }

    #[test]
    fn malformed_json_surfaces_parse_error() {
        assert!(matches!(
            Catalog::from_json("{"),
            Err(CatalogError::Parse(_))
        ));
    }
}

//! Mutable progression state for one simulated character.
//!
//! All mutation goes through the methods here; every mutator leaves the
//! derived fields (stat totals, gear score, power score) consistent before
//! returning. One `PlayerState` exists per trial and is discarded with it.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::archetype::Archetype;
use crate::catalog::{Catalog, EquipSlot};
use crate::stats::{StatBlock, StatKey};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlayerState {
    archetype: Archetype,
    level: u32,
    xp: i64,
    ip: i64,
    power_budget: i64,
    /// Every card ever earned, in earn order (the loadout sort tie-break).
    cards_owned: Vec<String>,
    /// Cards currently in effect; total cost never exceeds the budget.
    active_loadout: Vec<String>,
    /// Every item ever earned, in earn order (drives equip evaluation).
    inventory: Vec<String>,
    equipment: BTreeMap<EquipSlot, String>,
    totals: StatBlock,
    total_gear_score: i64,
    player_power_score: f64,
}

impl PlayerState {
    /// Fresh level-1 character with the budget taken from the catalog curve.
    #[must_use]
    pub fn new(archetype: Archetype, catalog: &Catalog) -> Self {
        let mut player = Self {
            archetype,
            level: 1,
            xp: 0,
            ip: 0,
            power_budget: catalog.budget_for(1).unwrap_or(0),
            cards_owned: Vec::new(),
            active_loadout: Vec::new(),
            inventory: Vec::new(),
            equipment: BTreeMap::new(),
            totals: StatBlock::default(),
            total_gear_score: 0,
            player_power_score: 0.0,
        };
        player.recompute_power(catalog);
        player
    }

    /// Add experience, advancing through as many levels as the reward
    /// covers. After every level change the power budget is refreshed
    /// (missing curve entries keep the current budget) and the loadout is
    /// reselected against it.
    pub fn gain_experience(&mut self, catalog: &Catalog, amount: i64) {
        self.xp += amount;
        while let Some(required) = catalog.xp_to_next(self.level) {
            if self.xp < required {
                break;
            }
            self.xp -= required;
            self.level += 1;
            if let Some(budget) = catalog.budget_for(self.level) {
                self.power_budget = budget;
            }
            self.select_loadout(catalog);
        }
    }

    pub fn earn_currency(&mut self, amount: i64) {
        self.ip += amount.max(0);
    }

    /// Add a card to the collection. Unknown ids are ignored.
    pub fn earn_card(&mut self, catalog: &Catalog, card_id: &str) {
        if catalog.card(card_id).is_none() {
            return;
        }
        self.cards_owned.push(card_id.to_string());
        self.select_loadout(catalog);
    }

    /// Add an item to the inventory. Unknown ids are ignored.
    pub fn earn_item(&mut self, catalog: &Catalog, item_id: &str) {
        if catalog.item(item_id).is_none() {
            return;
        }
        self.inventory.push(item_id.to_string());
        self.evaluate_equipment(catalog);
    }

    /// Repack the active loadout: owned cards sorted by power cost
    /// descending (stable, so ties keep earn order), added greedily while
    /// they fit. A card that would overflow the remaining budget is skipped,
    /// not a stopping point, so cheaper cards later in the order still fit.
    pub fn select_loadout(&mut self, catalog: &Catalog) {
        let mut owned: Vec<_> = self
            .cards_owned
            .iter()
            .filter_map(|id| catalog.card(id))
            .collect();
        owned.sort_by(|a, b| b.power_cost.cmp(&a.power_cost));

        let mut loadout = Vec::new();
        let mut spent = 0;
        for card in owned {
            if spent + card.power_cost <= self.power_budget {
                loadout.push(card.id.clone());
                spent += card.power_cost;
            }
        }
        self.active_loadout = loadout;
        self.recompute_power(catalog);
    }

    /// Re-derive equipment from the full earn history: fill empty slots,
    /// replace only on strictly higher gear score. First-earned wins exact
    /// ties, and running this again with no new items changes nothing.
    pub fn evaluate_equipment(&mut self, catalog: &Catalog) {
        for item_id in &self.inventory {
            let Some(item) = catalog.item(item_id) else {
                continue;
            };
            let incumbent_score = self
                .equipment
                .get(&item.slot)
                .and_then(|id| catalog.item(id))
                .map(|current| current.gear_score);
            match incumbent_score {
                Some(score) if item.gear_score <= score => {}
                _ => {
                    self.equipment.insert(item.slot, item.id.clone());
                }
            }
        }
        self.recompute_power(catalog);
    }

    /// Rebuild stat totals and both scores from scratch. Gear score is
    /// tracked for reporting only and is not part of the power score.
    pub fn recompute_power(&mut self, catalog: &Catalog) {
        self.totals = StatBlock::default();
        for card_id in &self.active_loadout {
            if let Some(card) = catalog.card(card_id) {
                self.totals.accumulate(&card.bonus);
            }
        }

        let mut gear_score = 0;
        for item_id in self.equipment.values() {
            if let Some(item) = catalog.item(item_id) {
                for key in StatKey::ALL {
                    if let Some(value) = item.stats.get(key.as_str()) {
                        self.totals.add(key, *value);
                    }
                }
                gear_score += item.gear_score;
            }
        }
        self.total_gear_score = gear_score;

        #[allow(clippy::cast_precision_loss)]
        let power: f64 = StatKey::ALL
            .iter()
            .map(|&key| self.totals.get(key) as f64 * catalog.power_weight(key.as_str()))
            .sum();
        self.player_power_score = power;
    }

    #[must_use]
    pub const fn archetype(&self) -> Archetype {
        self.archetype
    }

    #[must_use]
    pub const fn level(&self) -> u32 {
        self.level
    }

    #[must_use]
    pub const fn xp(&self) -> i64 {
        self.xp
    }

    #[must_use]
    pub const fn ip(&self) -> i64 {
        self.ip
    }

    #[must_use]
    pub const fn power_budget(&self) -> i64 {
        self.power_budget
    }

    #[must_use]
    pub fn cards_owned(&self) -> &[String] {
        &self.cards_owned
    }

    #[must_use]
    pub fn active_loadout(&self) -> &[String] {
        &self.active_loadout
    }

    #[must_use]
    pub fn inventory(&self) -> &[String] {
        &self.inventory
    }

    #[must_use]
    pub fn equipped(&self, slot: EquipSlot) -> Option<&str> {
        self.equipment.get(&slot).map(String::as_str)
    }

    #[must_use]
    pub const fn totals(&self) -> StatBlock {
        self.totals
    }

    #[must_use]
    pub const fn total_gear_score(&self) -> i64 {
        self.total_gear_score
    }

    #[must_use]
    pub const fn power_score(&self) -> f64 {
        self.player_power_score
    }
}

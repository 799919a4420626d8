//! Lorebound Progression Engine
//!
//! Deterministic core logic for simulating character progression: the
//! content catalog, per-character state, encounter resolution, archetype
//! policies, and the Monte Carlo simulation driver. No UI, no file I/O;
//! callers supply a seed and collect snapshot rows.

pub mod archetype;
pub mod catalog;
pub mod encounter;
pub mod player;
pub mod seed;
pub mod sim;
pub mod stats;

// Re-export commonly used types
pub use archetype::Archetype;
pub use catalog::{
    ActionTemplate, COMBAT_ACTION_PREFIX, CardDropEntry, CardDropTable, Catalog, CatalogError,
    EquipSlot, ItemTemplate, LootEntry, LoreCardTemplate, MobTemplate,
};
pub use encounter::{EncounterOutcome, choose_mob, resolve_encounter, roll_card_drops, roll_loot};
pub use player::PlayerState;
pub use seed::derive_trial_seed;
pub use sim::{SimError, SimulationConfig, SnapshotRow, run_simulation, run_trial};
pub use stats::{StatBlock, StatKey};

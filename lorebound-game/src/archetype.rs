//! Play-style policies driving stochastic action selection.

use rand::Rng;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::catalog::{ActionTemplate, Catalog};

const POWER_GAMER_ORC_CHANCE: f64 = 0.8;
const ROLEPLAYER_SOCIAL_CHANCE: f64 = 0.9;

const ACTION_KILL_ORC: &str = "kill_orc";
const ACTION_KILL_GOBLIN: &str = "kill_goblin";
const ACTION_SOCIAL_QUEST: &str = "social_quest";

/// A named action-choice policy. Archetypes only influence which action is
/// taken each iteration; all other progression rules are shared.
///
/// This is also the seam where an external decision service could be
/// plugged in later, replacing [`Archetype::choose_action`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum Archetype {
    #[default]
    Balanced,
    PowerGamer,
    Roleplayer,
}

impl Archetype {
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Balanced => "balanced",
            Self::PowerGamer => "power_gamer",
            Self::Roleplayer => "roleplayer",
        }
    }

    /// Human-facing label for reports.
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Balanced => "Balanced",
            Self::PowerGamer => "PowerGamer",
            Self::Roleplayer => "Roleplayer",
        }
    }

    /// Pick the next action. The only randomness in action selection.
    ///
    /// Returns `None` when the policy's target action is missing from the
    /// catalog (or, for Balanced, when no actions are defined at all);
    /// the driver treats that as a configuration error.
    pub fn choose_action<'a, R: Rng>(
        self,
        catalog: &'a Catalog,
        rng: &mut R,
    ) -> Option<&'a ActionTemplate> {
        match self {
            Self::PowerGamer => {
                let id = if rng.r#gen::<f64>() < POWER_GAMER_ORC_CHANCE {
                    ACTION_KILL_ORC
                } else {
                    ACTION_KILL_GOBLIN
                };
                catalog.action(id)
            }
            Self::Roleplayer => {
                let id = if rng.r#gen::<f64>() < ROLEPLAYER_SOCIAL_CHANCE {
                    ACTION_SOCIAL_QUEST
                } else {
                    ACTION_KILL_GOBLIN
                };
                catalog.action(id)
            }
            Self::Balanced => {
                let actions = catalog.actions();
                if actions.is_empty() {
                    return None;
                }
                actions.get(rng.gen_range(0..actions.len()))
            }
        }
    }
}

impl fmt::Display for Archetype {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Archetype {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "balanced" => Ok(Self::Balanced),
            "power_gamer" => Ok(Self::PowerGamer),
            "roleplayer" => Ok(Self::Roleplayer),
            _ => Err(()),
        }
    }
}

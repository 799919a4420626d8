use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// The five core character stats that feed the power score.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum StatKey {
    Might,
    Finesse,
    Wits,
    Grit,
    Presence,
}

impl StatKey {
    /// Canonical iteration order for "loop over all stats" call sites.
    pub const ALL: [Self; 5] = [
        Self::Might,
        Self::Finesse,
        Self::Wits,
        Self::Grit,
        Self::Presence,
    ];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Might => "might",
            Self::Finesse => "finesse",
            Self::Wits => "wits",
            Self::Grit => "grit",
            Self::Presence => "presence",
        }
    }
}

impl fmt::Display for StatKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for StatKey {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "might" => Ok(Self::Might),
            "finesse" => Ok(Self::Finesse),
            "wits" => Ok(Self::Wits),
            "grit" => Ok(Self::Grit),
            "presence" => Ok(Self::Presence),
            _ => Err(()),
        }
    }
}

/// Fixed block of per-stat integer values.
///
/// Doubles as a sparse bonus record in card definitions (unlisted stats
/// default to zero) and as the aggregated stat totals on a player.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatBlock {
    #[serde(default)]
    pub might: i64,
    #[serde(default)]
    pub finesse: i64,
    #[serde(default)]
    pub wits: i64,
    #[serde(default)]
    pub grit: i64,
    #[serde(default)]
    pub presence: i64,
}

impl StatBlock {
    #[must_use]
    pub const fn get(self, key: StatKey) -> i64 {
        match key {
            StatKey::Might => self.might,
            StatKey::Finesse => self.finesse,
            StatKey::Wits => self.wits,
            StatKey::Grit => self.grit,
            StatKey::Presence => self.presence,
        }
    }

    pub fn add(&mut self, key: StatKey, amount: i64) {
        match key {
            StatKey::Might => self.might += amount,
            StatKey::Finesse => self.finesse += amount,
            StatKey::Wits => self.wits += amount,
            StatKey::Grit => self.grit += amount,
            StatKey::Presence => self.presence += amount,
        }
    }

    /// Add every stat of `other` into this block.
    pub fn accumulate(&mut self, other: &Self) {
        for key in StatKey::ALL {
            self.add(key, other.get(key));
        }
    }
}

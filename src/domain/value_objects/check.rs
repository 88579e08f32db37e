//! Skill check value objects - the flavour axis and the threshold of a roll

use serde::{Deserialize, Serialize};

/// Named skill axis used to flavour the narration
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CheckCategory {
    Dexterity,
    Charisma,
    Luck,
    Perception,
    Intimidation,
    Stealth,
}

impl CheckCategory {
    /// All categories in their fixed order
    pub const ALL: [CheckCategory; 6] = [
        Self::Dexterity,
        Self::Charisma,
        Self::Luck,
        Self::Perception,
        Self::Intimidation,
        Self::Stealth,
    ];

    /// Localized name shown to players and embedded in prompts
    pub fn display_name(&self) -> &'static str {
        match self {
            Self::Dexterity => "Ловкость",
            Self::Charisma => "Харизма",
            Self::Luck => "Удача",
            Self::Perception => "Внимательность",
            Self::Intimidation => "Запугивание",
            Self::Stealth => "Скрытность",
        }
    }
}

impl std::fmt::Display for CheckCategory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.display_name())
    }
}

/// D20 difficulty class, always within [`Difficulty::MIN`, `Difficulty::MAX`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Difficulty(u8);

impl Difficulty {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 20;

    /// Returns `None` when the value falls outside 1..=20
    pub fn new(value: u8) -> Option<Self> {
        (Self::MIN..=Self::MAX).contains(&value).then_some(Self(value))
    }

    /// Clamp an arbitrary roll into the valid range
    pub fn clamped(value: u8) -> Self {
        Self(value.clamp(Self::MIN, Self::MAX))
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    /// A roll meets the check when it is at least the difficulty
    pub fn is_met_by(&self, roll: u8) -> bool {
        roll >= self.0
    }
}

impl std::fmt::Display for Difficulty {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

//! Supported game versions.
//!
//! Games are ordered by release, and format decisions are made by comparing
//! against the first game that introduced a feature.

use std::fmt;
use std::str::FromStr;

use crate::Error;

/// A supported target game.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Game {
    PrimeDemo,
    Prime,
    EchoesDemo,
    Echoes,
    CorruptionProto,
    Corruption,
    DkcReturns,
}

impl Game {
    /// All games in release order.
    pub const ALL: [Game; 7] = [
        Game::PrimeDemo,
        Game::Prime,
        Game::EchoesDemo,
        Game::Echoes,
        Game::CorruptionProto,
        Game::Corruption,
        Game::DkcReturns,
    ];

    /// First game whose property names are looked up by ID.
    pub const ID_NAMING: Game = Game::EchoesDemo;

    /// First game whose cooker omits properties matching their default.
    pub const DEFAULT_ELISION: Game = Game::DkcReturns;

    /// First game with 64-bit asset IDs.
    pub const WIDE_ASSET_IDS: Game = Game::CorruptionProto;

    /// Identifier used in template files.
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PrimeDemo => "PrimeDemo",
            Self::Prime => "Prime",
            Self::EchoesDemo => "EchoesDemo",
            Self::Echoes => "Echoes",
            Self::CorruptionProto => "CorruptionProto",
            Self::Corruption => "Corruption",
            Self::DkcReturns => "DKCReturns",
        }
    }

    /// Whether property names in this game's data are stored by ID.
    #[inline]
    pub fn uses_id_names(&self) -> bool {
        *self >= Self::ID_NAMING
    }
}

impl fmt::Display for Game {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Game {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .iter()
            .copied()
            .find(|game| game.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| Error::UnknownGame(s.to_string()))
    }
}

#[cfg(feature = "serde")]
impl serde::Serialize for Game {
    fn serialize<S>(&self, serializer: S) -> Result<S::Ok, S::Error>
    where
        S: serde::Serializer,
    {
        serializer.serialize_str(self.as_str())
    }
}

//! Module providing the players, fixtures and settings a squad is selected from.

pub mod fixture;
pub mod player;
pub mod settings;

use std::fmt::{Display, Formatter};
use std::str::FromStr;

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// A scoring round of the competition
pub type Round = u32;

/// Last round of the competition, no selection may extend past it
pub const MAX_ROUND: Round = 13;

/// Position categories a player can be selected in
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum Position {
    #[serde(rename = "bwl")]
    Bowler,
    #[serde(rename = "bat")]
    Batter,
    #[serde(rename = "wkp")]
    WicketKeeper,
}

impl Position {
    /// Every position, in canonical order
    pub const ALL: [Position; 3] = [Position::Bowler, Position::Batter, Position::WicketKeeper];

    /// Short code used in variable ids and roster tables
    pub fn code(&self) -> &'static str {
        match self {
            Position::Bowler => "bwl",
            Position::Batter => "bat",
            Position::WicketKeeper => "wkp",
        }
    }
}

impl Display for Position {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.code())
    }
}

impl FromStr for Position {
    type Err = PositionParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "bwl" | "bowler" => Ok(Position::Bowler),
            "bat" | "batter" => Ok(Position::Batter),
            "wkp" | "wicketkeeper" | "wicket_keeper" => Ok(Position::WicketKeeper),
            _ => Err(PositionParseError(s.to_string())),
        }
    }
}

#[derive(Error, Debug, Clone, PartialEq)]
#[error("Unknown position: {0}")]
pub struct PositionParseError(String);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn position_codes() {
        assert_eq!(Position::Bowler.to_string(), "bwl");
        assert_eq!("BAT".parse::<Position>().unwrap(), Position::Batter);
        assert_eq!("wicketkeeper".parse::<Position>().unwrap(), Position::WicketKeeper);
        assert!("spinner".parse::<Position>().is_err());
    }
}

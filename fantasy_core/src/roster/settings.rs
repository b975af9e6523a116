//! Settings controlling a squad selection run
use derive_builder::Builder;
use serde::{Deserialize, Serialize};

use crate::roster::{Position, Round, MAX_ROUND};

/// Number of players required in each position
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Composition {
    pub bowlers: u32,
    pub batters: u32,
    pub wicketkeepers: u32,
}

impl Composition {
    /// The competition's squad: 7 bowlers, 7 batters and 2 wicketkeepers
    pub const SQUAD: Composition = Composition::new(7, 7, 2);
    /// The competition's starting team: 5 bowlers, 5 batters and 1 wicketkeeper
    pub const TEAM: Composition = Composition::new(5, 5, 1);

    pub const fn new(bowlers: u32, batters: u32, wicketkeepers: u32) -> Self {
        Composition {
            bowlers,
            batters,
            wicketkeepers,
        }
    }

    /// Players required in `position`
    pub fn count(&self, position: Position) -> u32 {
        match position {
            Position::Bowler => self.bowlers,
            Position::Batter => self.batters,
            Position::WicketKeeper => self.wicketkeepers,
        }
    }

    /// Total number of players
    pub fn total(&self) -> u32 {
        self.bowlers + self.batters + self.wicketkeepers
    }
}

/// Settings for a selection run
///
/// # Examples
/// ```rust
/// use fantasy_core::roster::settings::SelectionSettingsBuilder;
/// let settings = SelectionSettingsBuilder::default()
///     .budget(1_500_000.0)
///     .last_round(6u32)
///     .n_trading_rounds(Some(3))
///     .build()
///     .unwrap();
/// assert_eq!(settings.first_round, 1);
/// assert_eq!(settings.max_trades_allowed, 3);
/// ```
#[derive(Builder, Debug, Clone, PartialEq, Serialize, Deserialize)]
#[builder(default)]
#[serde(default)]
pub struct SelectionSettings {
    /// Most the squad may cost in any round
    pub budget: f64,
    /// Number of rounds, from the first, after which trades may be made. None allows trades
    /// after every round but the last
    pub n_trading_rounds: Option<usize>,
    /// First round selected for
    pub first_round: Round,
    /// Last round selected for, at most [`MAX_ROUND`]
    pub last_round: Round,
    /// Most players that may be traded in (and out) after a round
    pub max_trades_allowed: u32,
    /// Players required in the squad
    pub squad: Composition,
    /// Players required in the starting team
    pub team: Composition,
}

impl Default for SelectionSettings {
    fn default() -> Self {
        SelectionSettings {
            budget: 2_000_000.0,
            n_trading_rounds: None,
            first_round: 1,
            last_round: MAX_ROUND,
            max_trades_allowed: 3,
            squad: Composition::SQUAD,
            team: Composition::TEAM,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_competition_rules() {
        let settings = SelectionSettings::default();
        assert_eq!(settings.budget, 2_000_000.0);
        assert_eq!(settings.n_trading_rounds, None);
        assert_eq!((settings.first_round, settings.last_round), (1, 13));
        assert_eq!(settings.squad.total(), 16);
        assert_eq!(settings.team.total(), 11);
        assert_eq!(settings.team.count(Position::WicketKeeper), 1);
    }

    #[test]
    fn deserialize_partial() {
        let settings: SelectionSettings =
            serde_json::from_str(r#"{"budget": 100.0, "max_trades_allowed": 1}"#).unwrap();
        assert_eq!(settings.budget, 100.0);
        assert_eq!(settings.max_trades_allowed, 1);
        assert_eq!(settings.squad, Composition::SQUAD);
    }
}

//! This module provides the player struct representing a selectable player

use derive_builder::Builder;

use crate::roster::{Position, Round};

/// Represents a player who can be picked in the squad
///
/// # Examples
/// ```rust
/// use fantasy_core::roster::player::PlayerBuilder;
/// use fantasy_core::roster::Position;
/// let player = PlayerBuilder::default()
///     .id("Steve Smith")
///     .team("SIX")
///     .cost(150_000.0)
///     .expected_points(55.0)
///     .positions(vec![Position::Batter])
///     .build()
///     .unwrap();
/// assert!(player.can_play(Position::Batter));
/// assert!(player.is_available(3));
/// ```
#[derive(Builder, Debug, Clone, PartialEq)]
#[builder(setter(into))]
pub struct Player {
    /// Used to identify the player (must be unique)
    pub id: String,
    /// Team the player plays for, used to look up fixtures
    pub team: String,
    /// Price of the player
    pub cost: f64,
    /// Expected points scored in a round the player's team plays
    pub expected_points: f64,
    /// Positions the player is eligible to be picked in
    #[builder(default = "Vec::new()")]
    pub positions: Vec<Position>,
    /// Rounds in which the player can't be picked
    #[builder(default = "Vec::new()")]
    pub unavailable_rounds: Vec<Round>,
}

impl Player {
    /// Whether the player may be picked in `position`
    pub fn can_play(&self, position: Position) -> bool {
        self.positions.contains(&position)
    }

    /// Whether the player may be picked in `round`
    pub fn is_available(&self, round: Round) -> bool {
        !self.unavailable_rounds.contains(&round)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn eligibility_and_availability() {
        let player = PlayerBuilder::default()
            .id("a")
            .team("HEA")
            .cost(1.0)
            .expected_points(2.0)
            .positions(vec![Position::Batter, Position::WicketKeeper])
            .unavailable_rounds(vec![4])
            .build()
            .unwrap();
        assert!(player.can_play(Position::WicketKeeper));
        assert!(!player.can_play(Position::Bowler));
        assert!(!player.is_available(4));
        assert!(player.is_available(5));
    }

    #[test]
    fn missing_required_field() {
        assert!(PlayerBuilder::default().id("a").build().is_err());
    }
}

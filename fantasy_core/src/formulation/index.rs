//! Index sets and parameters of the selection model
use indexmap::{IndexMap, IndexSet};
use tracing::debug;

use crate::formulation::{ConfigurationError, DataError, FormulationError};
use crate::roster::fixture::Fixtures;
use crate::roster::player::Player;
use crate::roster::settings::SelectionSettings;
use crate::roster::{Position, Round, MAX_ROUND};

/// Key for values indexed by player and round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerRound {
    /// Position of the player in [`Index::players`]
    pub player: usize,
    pub round: Round,
}

/// Key for values indexed by player and position
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct PlayerPosition {
    /// Position of the player in [`Index::players`]
    pub player: usize,
    pub position: Position,
}

/// Key for values indexed by player, position and round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SelectionKey {
    /// Position of the player in [`Index::players`]
    pub player: usize,
    pub position: Position,
    pub round: Round,
}

/// The finite sets the model is defined over
#[derive(Debug, Clone, PartialEq)]
pub struct Index {
    /// Player ids, in input order
    pub players: Vec<String>,
    /// Position categories
    pub positions: Vec<Position>,
    /// Rounds selected for, contiguous and ascending
    pub rounds: Vec<Round>,
    /// Number of leading rounds after which trades are allowed
    pub n_trading_rounds: usize,
}

impl Index {
    /// Build the index sets, validating the settings before anything else
    pub fn build(
        players: &[Player],
        settings: &SelectionSettings,
    ) -> Result<Self, FormulationError> {
        let (rounds, n_trading_rounds) = Self::validate_rounds(settings)?;

        let mut seen = IndexSet::with_capacity(players.len());
        for player in players {
            if !seen.insert(player.id.as_str()) {
                return Err(DataError::DuplicatePlayer(player.id.clone()).into());
            }
        }

        let index = Index {
            players: players.iter().map(|p| p.id.clone()).collect(),
            positions: Position::ALL.to_vec(),
            rounds,
            n_trading_rounds,
        };
        debug!(
            players = index.players.len(),
            rounds = index.rounds.len(),
            trading_rounds = index.n_trading_rounds,
            "Built model index"
        );
        Ok(index)
    }

    /// Check the round range and trading rounds, returning the rounds and the resolved number
    /// of trading rounds
    fn validate_rounds(
        settings: &SelectionSettings,
    ) -> Result<(Vec<Round>, usize), ConfigurationError> {
        if settings.last_round > MAX_ROUND {
            return Err(ConfigurationError::LastRoundTooLate {
                last_round: settings.last_round,
                max_round: MAX_ROUND,
            });
        }
        if settings.first_round < 1 || settings.first_round > settings.last_round {
            return Err(ConfigurationError::EmptyRoundRange {
                first_round: settings.first_round,
                last_round: settings.last_round,
            });
        }
        let rounds: Vec<Round> = (settings.first_round..=settings.last_round).collect();
        let n_trading_rounds = match settings.n_trading_rounds {
            Some(n) if n > rounds.len() - 1 => {
                return Err(ConfigurationError::TooManyTradingRounds {
                    rounds: rounds.len(),
                    n_trading_rounds: n,
                })
            }
            Some(n) => n,
            None => rounds.len() - 1,
        };
        Ok((rounds, n_trading_rounds))
    }

    /// Rounds after which trades can be made, the first `n_trading_rounds` rounds
    pub fn trading_rounds(&self) -> &[Round] {
        &self.rounds[..self.n_trading_rounds]
    }

    /// Rounds after which the squad is frozen, excluding the last round
    pub fn frozen_rounds(&self) -> &[Round] {
        &self.rounds[self.n_trading_rounds..self.rounds.len() - 1]
    }

    /// Every (player, position, round) key
    pub fn selection_keys(&self) -> impl Iterator<Item = SelectionKey> + '_ {
        (0..self.players.len()).flat_map(move |player| {
            self.positions.iter().flat_map(move |&position| {
                self.rounds.iter().map(move |&round| SelectionKey {
                    player,
                    position,
                    round,
                })
            })
        })
    }

    /// Every (player, round) key
    pub fn player_rounds(&self) -> impl Iterator<Item = PlayerRound> + '_ {
        (0..self.players.len()).flat_map(move |player| {
            self.rounds
                .iter()
                .map(move |&round| PlayerRound { player, round })
        })
    }
}

/// Per player parameters of the model
#[derive(Debug, Clone, PartialEq)]
pub struct Parameters {
    /// Cost of each player
    pub cost: IndexMap<usize, f64>,
    /// Expected points of each player in each round, after fixture multipliers
    pub value: IndexMap<PlayerRound, f64>,
    /// Whether each player can be picked in each position
    pub eligible: IndexMap<PlayerPosition, bool>,
    /// Whether each player can be picked in each round
    pub available: IndexMap<PlayerRound, bool>,
}

impl Parameters {
    /// Derive the parameters for the players in `index`
    ///
    /// `players` must be the slice `index` was built from.
    pub fn build(
        index: &Index,
        players: &[Player],
        fixtures: &Fixtures,
    ) -> Result<Self, FormulationError> {
        let mut cost = IndexMap::with_capacity(players.len());
        let mut value = IndexMap::with_capacity(players.len() * index.rounds.len());
        let mut eligible = IndexMap::with_capacity(players.len() * index.positions.len());
        let mut available = IndexMap::with_capacity(players.len() * index.rounds.len());

        for (i, player) in players.iter().enumerate() {
            cost.insert(i, player.cost);
            for &round in &index.rounds {
                let multiplier = fixtures.multiplier(round, &player.team).ok_or_else(|| {
                    DataError::MissingFixture {
                        player: player.id.clone(),
                        team: player.team.clone(),
                        round,
                    }
                })?;
                let key = PlayerRound { player: i, round };
                value.insert(key, player.expected_points * multiplier);
                available.insert(key, player.is_available(round));
            }
            for &position in &index.positions {
                eligible.insert(
                    PlayerPosition {
                        player: i,
                        position,
                    },
                    player.can_play(position),
                );
            }
        }

        Ok(Parameters {
            cost,
            value,
            eligible,
            available,
        })
    }

    pub fn cost(&self, player: usize) -> f64 {
        self.cost.get(&player).copied().unwrap_or(0.0)
    }

    pub fn value(&self, player: usize, round: Round) -> f64 {
        self.value
            .get(&PlayerRound { player, round })
            .copied()
            .unwrap_or(0.0)
    }

    pub fn is_eligible(&self, player: usize, position: Position) -> bool {
        self.eligible
            .get(&PlayerPosition { player, position })
            .copied()
            .unwrap_or(false)
    }

    pub fn is_available(&self, player: usize, round: Round) -> bool {
        self.available
            .get(&PlayerRound { player, round })
            .copied()
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::roster::player::PlayerBuilder;
    use crate::roster::settings::SelectionSettingsBuilder;

    fn player(id: &str, team: &str, positions: Vec<Position>) -> Player {
        PlayerBuilder::default()
            .id(id)
            .team(team)
            .cost(100.0)
            .expected_points(10.0)
            .positions(positions)
            .unavailable_rounds(vec![2])
            .build()
            .unwrap()
    }

    fn settings(first_round: Round, last_round: Round, n_trading: Option<usize>) -> SelectionSettings {
        SelectionSettingsBuilder::default()
            .first_round(first_round)
            .last_round(last_round)
            .n_trading_rounds(n_trading)
            .build()
            .unwrap()
    }

    #[test]
    fn trading_rounds_default_to_all_but_last() {
        let index = Index::build(&[], &settings(1, 5, None)).unwrap();
        assert_eq!(index.rounds, vec![1, 2, 3, 4, 5]);
        assert_eq!(index.n_trading_rounds, 4);
        assert_eq!(index.trading_rounds(), &[1, 2, 3, 4]);
        assert!(index.frozen_rounds().is_empty());
    }

    #[test]
    fn frozen_rounds_follow_trading_rounds() {
        let index = Index::build(&[], &settings(3, 7, Some(2))).unwrap();
        assert_eq!(index.trading_rounds(), &[3, 4]);
        assert_eq!(index.frozen_rounds(), &[5, 6]);

        let index = Index::build(&[], &settings(1, 3, Some(0))).unwrap();
        assert!(index.trading_rounds().is_empty());
        assert_eq!(index.frozen_rounds(), &[1, 2]);
    }

    #[test]
    fn last_round_past_competition_end() {
        let res = Index::build(&[], &settings(1, 14, None));
        assert!(matches!(
            res,
            Err(FormulationError::Configuration(
                ConfigurationError::LastRoundTooLate {
                    last_round: 14,
                    max_round: 13
                }
            ))
        ));
    }

    #[test]
    fn too_many_trading_rounds() {
        let res = Index::build(&[], &settings(1, 4, Some(4)));
        assert!(matches!(
            res,
            Err(FormulationError::Configuration(
                ConfigurationError::TooManyTradingRounds {
                    rounds: 4,
                    n_trading_rounds: 4
                }
            ))
        ));
        assert!(Index::build(&[], &settings(1, 4, Some(3))).is_ok());
    }

    #[test]
    fn empty_round_range() {
        let res = Index::build(&[], &settings(5, 4, None));
        assert!(matches!(
            res,
            Err(FormulationError::Configuration(
                ConfigurationError::EmptyRoundRange { .. }
            ))
        ));
    }

    #[test]
    fn duplicate_players() {
        let players = vec![
            player("a", "HEA", vec![Position::Batter]),
            player("a", "SIX", vec![Position::Bowler]),
        ];
        let res = Index::build(&players, &settings(1, 2, None));
        assert!(matches!(
            res,
            Err(FormulationError::Data(DataError::DuplicatePlayer(_)))
        ));
    }

    #[test]
    fn keys_cover_index() {
        let players = vec![
            player("a", "HEA", vec![Position::Batter]),
            player("b", "SIX", vec![Position::Bowler]),
        ];
        let index = Index::build(&players, &settings(1, 3, None)).unwrap();
        assert_eq!(index.selection_keys().count(), 2 * 3 * 3);
        assert_eq!(index.player_rounds().count(), 2 * 3);
    }

    #[test]
    fn parameters_apply_fixture_multipliers() {
        let players = vec![
            player("a", "HEA", vec![Position::Batter, Position::WicketKeeper]),
            player("b", "SIX", vec![Position::Bowler]),
        ];
        let index = Index::build(&players, &settings(1, 2, None)).unwrap();
        let fixtures: Fixtures = [
            (1, "HEA", 1.0),
            (2, "HEA", 2.0),
            (1, "SIX", 0.0),
            (2, "SIX", 1.0),
        ]
        .into_iter()
        .collect();
        let params = Parameters::build(&index, &players, &fixtures).unwrap();
        assert_eq!(params.cost(0), 100.0);
        assert_eq!(params.value(0, 1), 10.0);
        assert_eq!(params.value(0, 2), 20.0);
        assert_eq!(params.value(1, 1), 0.0);
        assert!(params.is_eligible(0, Position::WicketKeeper));
        assert!(!params.is_eligible(0, Position::Bowler));
        assert!(params.is_available(1, 1));
        assert!(!params.is_available(1, 2));
    }

    #[test]
    fn missing_fixture() {
        let players = vec![player("a", "HEA", vec![Position::Batter])];
        let index = Index::build(&players, &settings(1, 2, None)).unwrap();
        let fixtures: Fixtures = [(1, "HEA", 1.0)].into_iter().collect();
        let res = Parameters::build(&index, &players, &fixtures);
        assert!(matches!(
            res,
            Err(FormulationError::Data(DataError::MissingFixture { round: 2, .. }))
        ));
    }
}

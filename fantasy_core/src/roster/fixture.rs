//! Round by round fixture multipliers for each team
use indexmap::IndexMap;

use crate::roster::Round;

/// Multiplier applied to a player's expected points for each (round, team)
///
/// A multiplier of 1 means the team plays once that round, 0 means it has a bye; values above
/// 1 represent double rounds.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Fixtures {
    /// Multipliers by team, then round
    multipliers: IndexMap<String, IndexMap<Round, f64>>,
}

impl Fixtures {
    pub fn new() -> Self {
        Fixtures::default()
    }

    /// Set the multiplier for a team in a round, replacing any previous value
    pub fn set(&mut self, round: Round, team: impl Into<String>, multiplier: f64) {
        self.multipliers
            .entry(team.into())
            .or_default()
            .insert(round, multiplier);
    }

    /// Multiplier for a team in a round, None if the fixture is unknown
    pub fn multiplier(&self, round: Round, team: &str) -> Option<f64> {
        self.multipliers.get(team)?.get(&round).copied()
    }

    /// Whether the team plays at all in the round
    pub fn plays(&self, round: Round, team: &str) -> bool {
        self.multiplier(round, team).is_some_and(|m| m > 0.0)
    }

    /// Number of (round, team) entries
    pub fn len(&self) -> usize {
        self.multipliers.values().map(IndexMap::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Iterate over (round, team, multiplier) entries, grouped by team
    pub fn iter(&self) -> impl Iterator<Item = (Round, &str, f64)> {
        self.multipliers.iter().flat_map(|(team, rounds)| {
            rounds
                .iter()
                .map(move |(round, multiplier)| (*round, team.as_str(), *multiplier))
        })
    }
}

impl<T: Into<String>> FromIterator<(Round, T, f64)> for Fixtures {
    fn from_iter<I: IntoIterator<Item = (Round, T, f64)>>(iter: I) -> Self {
        let mut fixtures = Fixtures::new();
        for (round, team, multiplier) in iter {
            fixtures.set(round, team, multiplier);
        }
        fixtures
    }
}

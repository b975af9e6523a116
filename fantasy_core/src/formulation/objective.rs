//! Objective of the selection model
use crate::formulation::index::{Index, Parameters};
use crate::formulation::variables::Variables;
use crate::optimize::objective::Objective;

/// Average expected points per round of the starting team, with the captain counted twice
///
/// The captain is already counted through their team variable, so adding the captaincy
/// variable with the same value doubles their score.
pub fn build_objective(index: &Index, parameters: &Parameters, variables: &Variables) -> Objective {
    let mut objective = Objective::new_maximize();
    objective.add_linear_terms(index.selection_keys().map(|key| {
        (
            variables.team(key.player, key.position, key.round),
            parameters.value(key.player, key.round),
        )
    }));
    objective.add_linear_terms(index.player_rounds().map(|key| {
        (
            variables.captain(key.player, key.round),
            parameters.value(key.player, key.round),
        )
    }));
    objective.scale(1.0 / index.rounds.len() as f64);
    objective
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::index::PlayerRound;
    use crate::optimize::objective::ObjectiveSense;
    use crate::roster::Position;
    use indexmap::IndexMap;

    #[test]
    fn captain_counts_double_and_rounds_are_averaged() {
        let index = Index {
            players: vec!["a".to_string()],
            positions: Position::ALL.to_vec(),
            rounds: vec![1, 2],
            n_trading_rounds: 1,
        };
        let mut value = IndexMap::new();
        value.insert(PlayerRound { player: 0, round: 1 }, 10.0);
        value.insert(PlayerRound { player: 0, round: 2 }, 30.0);
        let parameters = Parameters {
            cost: IndexMap::new(),
            value,
            eligible: IndexMap::new(),
            available: IndexMap::new(),
        };
        let variables = Variables::allocate(&index);
        let objective = build_objective(&index, &parameters, &variables);
        assert_eq!(objective.sense(), ObjectiveSense::Maximize);
        assert_eq!(objective.terms().len(), 3 * 2 + 2);

        // Player a in the team as a batter and captain in both rounds
        let mut values = vec![0.0; variables.len()];
        for round in [1, 2] {
            values[variables.team(0, Position::Batter, round)] = 1.0;
            values[variables.captain(0, round)] = 1.0;
        }
        assert!((objective.evaluate(&values) - 40.0).abs() < 1e-9);
    }
}

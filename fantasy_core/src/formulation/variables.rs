//! The four families of binary decision variables
use indexmap::IndexMap;

use crate::formulation::index::{Index, PlayerRound, SelectionKey};
use crate::optimize::variable::Variable;
use crate::roster::{Position, Round};

/// Decision variables of the selection model, as indices into the problem's variables
#[derive(Debug, Clone, PartialEq)]
pub struct Variables {
    /// Player is in the squad, in a position, in a round
    pub squad: IndexMap<SelectionKey, usize>,
    /// Player is in the starting team, in a position, in a round
    pub team: IndexMap<SelectionKey, usize>,
    /// Player is captain in a round
    pub captain: IndexMap<PlayerRound, usize>,
    /// Player's squad membership changes after a round, trading rounds only
    pub trade: IndexMap<PlayerRound, usize>,
    /// Definitions of every variable, in index order
    definitions: Vec<Variable>,
}

impl Variables {
    /// Allocate every variable family over the index
    pub fn allocate(index: &Index) -> Self {
        let mut variables = Variables {
            squad: IndexMap::new(),
            team: IndexMap::new(),
            captain: IndexMap::new(),
            trade: IndexMap::new(),
            definitions: Vec::new(),
        };
        for key in index.selection_keys() {
            let id = variables.push(format!(
                "squad[{},{},{}]",
                index.players[key.player], key.position, key.round
            ));
            variables.squad.insert(key, id);
        }
        for key in index.selection_keys() {
            let id = variables.push(format!(
                "team[{},{},{}]",
                index.players[key.player], key.position, key.round
            ));
            variables.team.insert(key, id);
        }
        for key in index.player_rounds() {
            let id = variables.push(format!(
                "captain[{},{}]",
                index.players[key.player], key.round
            ));
            variables.captain.insert(key, id);
        }
        for player in 0..index.players.len() {
            for &round in index.trading_rounds() {
                let id = variables.push(format!("trade[{},{}]", index.players[player], round));
                variables.trade.insert(PlayerRound { player, round }, id);
            }
        }
        variables
    }

    fn push(&mut self, id: String) -> usize {
        self.definitions.push(Variable::new_binary(id));
        self.definitions.len() - 1
    }

    /// Definitions of every variable, in index order
    pub fn definitions(&self) -> &[Variable] {
        &self.definitions
    }

    /// Total number of variables
    pub fn len(&self) -> usize {
        self.definitions.len()
    }

    pub fn is_empty(&self) -> bool {
        self.definitions.is_empty()
    }

    // Lookups below are only called with keys from the index the variables were allocated
    // over, so a missing key is a bug.

    pub fn squad(&self, player: usize, position: Position, round: Round) -> usize {
        self.squad[&SelectionKey {
            player,
            position,
            round,
        }]
    }

    pub fn team(&self, player: usize, position: Position, round: Round) -> usize {
        self.team[&SelectionKey {
            player,
            position,
            round,
        }]
    }

    pub fn captain(&self, player: usize, round: Round) -> usize {
        self.captain[&PlayerRound { player, round }]
    }

    pub fn trade(&self, player: usize, round: Round) -> Option<usize> {
        self.trade.get(&PlayerRound { player, round }).copied()
    }

    /// Terms summing a player's squad variables over every position in a round
    pub fn squad_membership(
        &self,
        index: &Index,
        player: usize,
        round: Round,
        coefficient: f64,
    ) -> Vec<(usize, f64)> {
        index
            .positions
            .iter()
            .map(|&position| (self.squad(player, position, round), coefficient))
            .collect()
    }

    /// Terms summing a player's team variables over every position in a round
    pub fn team_membership(
        &self,
        index: &Index,
        player: usize,
        round: Round,
        coefficient: f64,
    ) -> Vec<(usize, f64)> {
        index
            .positions
            .iter()
            .map(|&position| (self.team(player, position, round), coefficient))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::optimize::variable::VariableType;

    fn index(n_trading_rounds: usize) -> Index {
        Index {
            players: vec!["a".to_string(), "b".to_string()],
            positions: Position::ALL.to_vec(),
            rounds: vec![1, 2, 3],
            n_trading_rounds,
        }
    }

    #[test]
    fn family_sizes() {
        let vars = Variables::allocate(&index(2));
        assert_eq!(vars.squad.len(), 2 * 3 * 3);
        assert_eq!(vars.team.len(), 2 * 3 * 3);
        assert_eq!(vars.captain.len(), 2 * 3);
        assert_eq!(vars.trade.len(), 2 * 2);
        assert_eq!(vars.len(), 18 + 18 + 6 + 4);
        assert!(vars
            .definitions()
            .iter()
            .all(|v| v.variable_type == VariableType::Binary && v.upper_bound == 1.0));
    }

    #[test]
    fn trades_only_in_trading_rounds() {
        let vars = Variables::allocate(&index(1));
        assert!(vars.trade(0, 1).is_some());
        assert!(vars.trade(0, 2).is_none());
        assert!(vars.trade(1, 3).is_none());

        let vars = Variables::allocate(&index(0));
        assert!(vars.trade.is_empty());
    }

    #[test]
    fn ids_are_descriptive_and_indices_consistent() {
        let vars = Variables::allocate(&index(2));
        let squad = vars.squad(1, Position::WicketKeeper, 3);
        assert_eq!(vars.definitions()[squad].id, "squad[b,wkp,3]");
        let captain = vars.captain(0, 2);
        assert_eq!(vars.definitions()[captain].id, "captain[a,2]");
        let membership = vars.squad_membership(&index(2), 0, 1, -1.0);
        assert_eq!(membership.len(), 3);
        assert!(membership.iter().all(|(_, c)| *c == -1.0));
    }
}

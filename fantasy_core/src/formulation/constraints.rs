//! Constraints encoding the rules of the game
//!
//! Each rule family is built by its own function, returning the constraints as a list so that
//! families can be inspected in isolation. [`build_constraints`] concatenates all of them.
use tracing::debug;

use crate::formulation::index::{Index, Parameters};
use crate::formulation::variables::Variables;
use crate::optimize::constraint::Constraint;
use crate::roster::settings::{Composition, SelectionSettings};

/// Every constraint of the selection model
pub fn build_constraints(
    index: &Index,
    parameters: &Parameters,
    variables: &Variables,
    settings: &SelectionSettings,
) -> Vec<Constraint> {
    let families = [
        ("budget", budget(index, parameters, variables, settings.budget)),
        (
            "composition",
            composition(index, variables, &settings.squad, &settings.team),
        ),
        ("one_captain", one_captain(index, variables)),
        ("position_exclusivity", position_exclusivity(index, variables)),
        ("captain_in_team", captain_in_team(index, variables)),
        ("eligibility", eligibility(index, parameters, variables)),
        ("availability", availability(index, parameters, variables)),
        ("team_within_squad", team_within_squad(index, variables)),
        ("trade_linking", trade_linking(index, variables)),
        (
            "trade_cap",
            trade_cap(index, variables, settings.max_trades_allowed),
        ),
        ("squad_continuity", squad_continuity(index, variables)),
    ];
    let mut constraints = Vec::new();
    for (family, family_constraints) in families {
        debug!(family, count = family_constraints.len(), "Built constraints");
        constraints.extend(family_constraints);
    }
    constraints
}

/// Squad cost can't exceed the budget in any round
pub fn budget(
    index: &Index,
    parameters: &Parameters,
    variables: &Variables,
    budget: f64,
) -> Vec<Constraint> {
    index
        .rounds
        .iter()
        .map(|&round| {
            let terms = (0..index.players.len()).flat_map(|player| {
                index.positions.iter().map(move |&position| {
                    (
                        variables.squad(player, position, round),
                        parameters.cost(player),
                    )
                })
            });
            Constraint::new_less_equal(format!("budget[{}]", round), terms, budget)
        })
        .collect()
}

/// Squad and team have exactly the required number of players in each position, every round
pub fn composition(
    index: &Index,
    variables: &Variables,
    squad: &Composition,
    team: &Composition,
) -> Vec<Constraint> {
    let mut constraints = Vec::with_capacity(index.rounds.len() * index.positions.len() * 2);
    for &round in &index.rounds {
        for &position in &index.positions {
            constraints.push(Constraint::new_equality(
                format!("squad_count[{},{}]", position, round),
                (0..index.players.len()).map(|p| (variables.squad(p, position, round), 1.0)),
                squad.count(position) as f64,
            ));
            constraints.push(Constraint::new_equality(
                format!("team_count[{},{}]", position, round),
                (0..index.players.len()).map(|p| (variables.team(p, position, round), 1.0)),
                team.count(position) as f64,
            ));
        }
    }
    constraints
}

/// Exactly one captain each round
pub fn one_captain(index: &Index, variables: &Variables) -> Vec<Constraint> {
    index
        .rounds
        .iter()
        .map(|&round| {
            Constraint::new_equality(
                format!("one_captain[{}]", round),
                (0..index.players.len()).map(|p| (variables.captain(p, round), 1.0)),
                1.0,
            )
        })
        .collect()
}

/// A player occupies at most one position in the squad each round
pub fn position_exclusivity(index: &Index, variables: &Variables) -> Vec<Constraint> {
    index
        .player_rounds()
        .map(|key| {
            Constraint::new_less_equal(
                format!(
                    "one_position[{},{}]",
                    index.players[key.player], key.round
                ),
                variables.squad_membership(index, key.player, key.round, 1.0),
                1.0,
            )
        })
        .collect()
}

/// The captain must be in the starting team
pub fn captain_in_team(index: &Index, variables: &Variables) -> Vec<Constraint> {
    index
        .player_rounds()
        .map(|key| {
            let mut terms = variables.team_membership(index, key.player, key.round, 1.0);
            terms.push((variables.captain(key.player, key.round), -1.0));
            Constraint::new_greater_equal(
                format!(
                    "captain_in_team[{},{}]",
                    index.players[key.player], key.round
                ),
                terms,
                0.0,
            )
        })
        .collect()
}

/// Players can only be picked, in the squad or the team, in positions they can play
pub fn eligibility(
    index: &Index,
    parameters: &Parameters,
    variables: &Variables,
) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    for key in index.selection_keys() {
        let bound = if parameters.is_eligible(key.player, key.position) {
            1.0
        } else {
            0.0
        };
        let name = &index.players[key.player];
        constraints.push(Constraint::new_less_equal(
            format!("squad_eligible[{},{},{}]", name, key.position, key.round),
            [(variables.squad(key.player, key.position, key.round), 1.0)],
            bound,
        ));
        constraints.push(Constraint::new_less_equal(
            format!("team_eligible[{},{},{}]", name, key.position, key.round),
            [(variables.team(key.player, key.position, key.round), 1.0)],
            bound,
        ));
    }
    constraints
}

/// Unavailable players can't be in the squad that round
pub fn availability(
    index: &Index,
    parameters: &Parameters,
    variables: &Variables,
) -> Vec<Constraint> {
    index
        .player_rounds()
        .filter(|key| !parameters.is_available(key.player, key.round))
        .map(|key| {
            Constraint::new_less_equal(
                format!("unavailable[{},{}]", index.players[key.player], key.round),
                variables.squad_membership(index, key.player, key.round, 1.0),
                0.0,
            )
        })
        .collect()
}

/// Team members must be in the squad, in the same position
pub fn team_within_squad(index: &Index, variables: &Variables) -> Vec<Constraint> {
    index
        .selection_keys()
        .map(|key| {
            Constraint::new_greater_equal(
                format!(
                    "team_in_squad[{},{},{}]",
                    index.players[key.player], key.position, key.round
                ),
                [
                    (variables.squad(key.player, key.position, key.round), 1.0),
                    (variables.team(key.player, key.position, key.round), -1.0),
                ],
                0.0,
            )
        })
        .collect()
}

/// Link the trade variables to changes in squad membership between a trading round and the
/// round after it
///
/// With S(r) the player's squad membership in round r and T the trade variable:
/// - S(r) + T >= S(r+1), a player brought in is a trade
/// - S(r+1) + T >= S(r), a player dropped is a trade
/// - S(r+1) + T + S(r) <= 2, no trade while staying in the squad
/// - T <= S(r) + S(r+1), no trade while staying out of the squad
pub fn trade_linking(index: &Index, variables: &Variables) -> Vec<Constraint> {
    let mut constraints = Vec::with_capacity(index.players.len() * index.n_trading_rounds * 4);
    for (i, &round) in index.trading_rounds().iter().enumerate() {
        let next = index.rounds[i + 1];
        for player in 0..index.players.len() {
            let Some(trade) = variables.trade(player, round) else {
                continue;
            };
            let name = &index.players[player];
            let current = |c| variables.squad_membership(index, player, round, c);
            let following = |c| variables.squad_membership(index, player, next, c);

            constraints.push(Constraint::new_greater_equal(
                format!("trade_in[{},{}]", name, round),
                current(1.0)
                    .into_iter()
                    .chain([(trade, 1.0)])
                    .chain(following(-1.0)),
                0.0,
            ));
            constraints.push(Constraint::new_greater_equal(
                format!("trade_out[{},{}]", name, round),
                following(1.0)
                    .into_iter()
                    .chain([(trade, 1.0)])
                    .chain(current(-1.0)),
                0.0,
            ));
            constraints.push(Constraint::new_less_equal(
                format!("trade_kept[{},{}]", name, round),
                following(1.0)
                    .into_iter()
                    .chain([(trade, 1.0)])
                    .chain(current(1.0)),
                2.0,
            ));
            constraints.push(Constraint::new_less_equal(
                format!("trade_absent[{},{}]", name, round),
                [(trade, 1.0)]
                    .into_iter()
                    .chain(current(-1.0))
                    .chain(following(-1.0)),
                0.0,
            ));
        }
    }
    constraints
}

/// At most `max_trades_allowed` players traded in and out after each trading round
///
/// Each trade flags two players, the one leaving and the one arriving, hence the factor of 2.
pub fn trade_cap(index: &Index, variables: &Variables, max_trades_allowed: u32) -> Vec<Constraint> {
    index
        .trading_rounds()
        .iter()
        .map(|&round| {
            Constraint::new_less_equal(
                format!("trade_cap[{}]", round),
                (0..index.players.len())
                    .filter_map(|player| variables.trade(player, round))
                    .map(|trade| (trade, 1.0)),
                2.0 * max_trades_allowed as f64,
            )
        })
        .collect()
}

/// Squad membership can't change after a round in which trading isn't allowed
///
/// Players may still change position or move between the team and the bench.
pub fn squad_continuity(index: &Index, variables: &Variables) -> Vec<Constraint> {
    let mut constraints = Vec::new();
    for (offset, &round) in index.frozen_rounds().iter().enumerate() {
        let next = index.rounds[index.n_trading_rounds + offset + 1];
        for player in 0..index.players.len() {
            constraints.push(Constraint::new_equality(
                format!("squad_frozen[{},{}]", index.players[player], round),
                variables
                    .squad_membership(index, player, round, 1.0)
                    .into_iter()
                    .chain(variables.squad_membership(index, player, next, -1.0)),
                0.0,
            ));
        }
    }
    constraints
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::formulation::index::{PlayerPosition, PlayerRound};
    use crate::roster::Position;
    use indexmap::IndexMap;

    const PLAYERS: usize = 3;

    fn index(n_trading_rounds: usize) -> Index {
        Index {
            players: vec!["a".to_string(), "b".to_string(), "c".to_string()],
            positions: Position::ALL.to_vec(),
            rounds: vec![1, 2, 3, 4],
            n_trading_rounds,
        }
    }

    fn parameters(index: &Index) -> Parameters {
        let mut cost = IndexMap::new();
        let mut value = IndexMap::new();
        let mut eligible = IndexMap::new();
        let mut available = IndexMap::new();
        for player in 0..index.players.len() {
            cost.insert(player, 10.0 * (player + 1) as f64);
            for &round in &index.rounds {
                value.insert(PlayerRound { player, round }, 1.0);
                available.insert(PlayerRound { player, round }, !(player == 2 && round == 3));
            }
            for &position in &index.positions {
                eligible.insert(
                    PlayerPosition { player, position },
                    position == Position::Batter || player == 0,
                );
            }
        }
        Parameters {
            cost,
            value,
            eligible,
            available,
        }
    }

    /// Values with the given players in the squad as batters each round, and the given
    /// (player, round) trades flagged
    fn squad_values(
        index: &Index,
        variables: &Variables,
        squads: &[Vec<usize>],
        trades: &[(usize, u32)],
    ) -> Vec<f64> {
        let mut values = vec![0.0; variables.len()];
        for (&round, members) in index.rounds.iter().zip(squads) {
            for &player in members.iter() {
                values[variables.squad(player, Position::Batter, round)] = 1.0;
            }
        }
        for &(player, round) in trades {
            values[variables.trade(player, round).unwrap()] = 1.0;
        }
        values
    }

    fn all_satisfied(constraints: &[Constraint], values: &[f64]) -> bool {
        constraints.iter().all(|c| c.is_satisfied(values, 1e-9))
    }

    #[test]
    fn family_sizes() {
        let index = index(2);
        let params = parameters(&index);
        let vars = Variables::allocate(&index);
        let keys = PLAYERS * 3 * 4;
        let player_rounds = PLAYERS * 4;
        assert_eq!(budget(&index, &params, &vars, 100.0).len(), 4);
        assert_eq!(
            composition(&index, &vars, &Composition::SQUAD, &Composition::TEAM).len(),
            4 * 3 * 2
        );
        assert_eq!(one_captain(&index, &vars).len(), 4);
        assert_eq!(position_exclusivity(&index, &vars).len(), player_rounds);
        assert_eq!(captain_in_team(&index, &vars).len(), player_rounds);
        assert_eq!(eligibility(&index, &params, &vars).len(), 2 * keys);
        assert_eq!(availability(&index, &params, &vars).len(), 1);
        assert_eq!(team_within_squad(&index, &vars).len(), keys);
        assert_eq!(trade_linking(&index, &vars).len(), 4 * PLAYERS * 2);
        assert_eq!(trade_cap(&index, &vars, 3).len(), 2);
        // Round 3 is frozen, round 4 is last
        assert_eq!(squad_continuity(&index, &vars).len(), PLAYERS);

        let all = build_constraints(&index, &params, &vars, &SelectionSettings::default());
        assert_eq!(all.len(), 4 + 24 + 4 + 12 + 12 + 72 + 1 + 36 + 24 + 2 + 3);
    }

    #[test]
    fn budget_weights_squad_by_cost() {
        let index = index(3);
        let params = parameters(&index);
        let vars = Variables::allocate(&index);
        let constraints = budget(&index, &params, &vars, 30.0);
        assert_eq!(constraints[0].id(), "budget[1]");
        // a and b cost 10 + 20
        let values = squad_values(&index, &vars, &vec![vec![0, 1]; 4], &[]);
        assert!(all_satisfied(&constraints, &values));
        // b and c cost 20 + 30
        let values = squad_values(&index, &vars, &vec![vec![1, 2]; 4], &[]);
        assert!(!all_satisfied(&constraints, &values));
    }

    #[test]
    fn eligibility_bounds() {
        let index = index(3);
        let params = parameters(&index);
        let vars = Variables::allocate(&index);
        let constraints = eligibility(&index, &params, &vars);
        let mut values = vec![0.0; vars.len()];
        values[vars.squad(0, Position::Bowler, 1)] = 1.0;
        assert!(all_satisfied(&constraints, &values));
        values[vars.team(1, Position::Bowler, 1)] = 1.0;
        assert!(!all_satisfied(&constraints, &values));
    }

    #[test]
    fn unavailable_player_cannot_be_picked() {
        let index = index(3);
        let params = parameters(&index);
        let vars = Variables::allocate(&index);
        let constraints = availability(&index, &params, &vars);
        assert_eq!(constraints[0].id(), "unavailable[c,3]");
        let values = squad_values(&index, &vars, &[vec![2], vec![2], vec![], vec![2]], &[]);
        assert!(all_satisfied(&constraints, &values));
        let values = squad_values(&index, &vars, &[vec![], vec![], vec![2], vec![]], &[]);
        assert!(!all_satisfied(&constraints, &values));
    }

    #[test]
    fn captain_must_start() {
        let index = index(3);
        let vars = Variables::allocate(&index);
        let constraints = captain_in_team(&index, &vars);
        let mut values = vec![0.0; vars.len()];
        values[vars.captain(1, 2)] = 1.0;
        assert!(!all_satisfied(&constraints, &values));
        values[vars.team(1, Position::Batter, 2)] = 1.0;
        assert!(all_satisfied(&constraints, &values));
    }

    #[test]
    fn trades_track_squad_changes() {
        let index = index(3);
        let vars = Variables::allocate(&index);
        let constraints = trade_linking(&index, &vars);

        // a is swapped for b after round 1, both flagged
        let squads = [vec![0], vec![1], vec![1], vec![1]];
        let values = squad_values(&index, &vars, &squads, &[(0, 1), (1, 1)]);
        assert!(all_satisfied(&constraints, &values));

        // An unflagged change is rejected
        let values = squad_values(&index, &vars, &squads, &[(0, 1)]);
        assert!(!all_satisfied(&constraints, &values));

        // A flagged player who stays in the squad is rejected
        let values = squad_values(&index, &vars, &vec![vec![0]; 4], &[(0, 2)]);
        assert!(!all_satisfied(&constraints, &values));

        // A flagged player who is never in the squad is rejected
        let values = squad_values(&index, &vars, &vec![vec![0]; 4], &[(2, 1)]);
        assert!(!all_satisfied(&constraints, &values));
    }

    #[test]
    fn trade_cap_counts_both_directions() {
        let index = index(3);
        let vars = Variables::allocate(&index);
        let constraints = trade_cap(&index, &vars, 1);
        let values = squad_values(&index, &vars, &vec![Vec::new(); 4], &[(0, 1), (1, 1)]);
        assert!(all_satisfied(&constraints, &values));
        let values = squad_values(&index, &vars, &vec![Vec::new(); 4], &[(0, 1), (1, 1), (2, 1)]);
        assert!(!all_satisfied(&constraints, &values));
    }

    #[test]
    fn frozen_rounds_keep_the_squad() {
        let index = index(1);
        let vars = Variables::allocate(&index);
        let constraints = squad_continuity(&index, &vars);
        // Rounds 2 and 3 are frozen
        assert_eq!(constraints.len(), 2 * PLAYERS);
        let values = squad_values(&index, &vars, &[vec![0], vec![1], vec![1], vec![1]], &[]);
        assert!(all_satisfied(&constraints, &values));
        let values = squad_values(&index, &vars, &[vec![0], vec![1], vec![1], vec![2]], &[]);
        assert!(!all_satisfied(&constraints, &values));

        // A change of position is still allowed
        let mut values = squad_values(&index, &vars, &vec![vec![0]; 4], &[]);
        values[vars.squad(0, Position::Batter, 3)] = 0.0;
        values[vars.squad(0, Position::Bowler, 3)] = 1.0;
        assert!(all_satisfied(&constraints, &values));
    }

    #[test]
    fn no_trading_rounds() {
        let index = index(0);
        let vars = Variables::allocate(&index);
        assert!(trade_linking(&index, &vars).is_empty());
        assert!(trade_cap(&index, &vars, 3).is_empty());
        assert_eq!(squad_continuity(&index, &vars).len(), 3 * PLAYERS);
    }
}

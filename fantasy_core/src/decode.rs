//! Module for turning a solved selection problem into a round by round roster
use std::fmt::{Display, Formatter};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tabled::builder::Builder;
use tabled::settings::Style;
use thiserror::Error;

use crate::formulation::Formulation;
use crate::optimize::{OptimizationStatus, ProblemSolution};
use crate::roster::player::Player;
use crate::roster::{Position, Round};

/// Role of a squad member in one round
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Role {
    /// Captain, also in the starting team
    Captain(Position),
    /// In the starting team
    Starting(Position),
    /// In the squad but not the starting team
    Substitute(Position),
}

impl Display for Role {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Role::Captain(p) => write!(f, "{}©", p),
            Role::Starting(p) => write!(f, "{}", p),
            Role::Substitute(p) => write!(f, "sub({})", p),
        }
    }
}

/// A player's role in one round
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterEntry {
    pub player: String,
    pub team: String,
    pub round: Round,
    pub role: Role,
}

/// One player's roles across the selected rounds
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterRow {
    pub team: String,
    pub player: String,
    /// Role labels, one per round in [`RosterTable::rounds`], empty when not in the squad
    pub cells: Vec<String>,
}

/// Selected squad pivoted so each round is a column
///
/// Rows are sorted by team and then player. Only players in the squad for at least one round
/// have a row.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct RosterTable {
    pub rounds: Vec<Round>,
    pub rows: Vec<RosterRow>,
}

impl RosterTable {
    /// Pivot roster entries into a table with one column per round
    pub fn from_entries(rounds: &[Round], entries: &[RosterEntry]) -> Self {
        let mut rows: IndexMap<(&str, &str), Vec<String>> = IndexMap::new();
        for entry in entries {
            let Some(column) = rounds.iter().position(|r| *r == entry.round) else {
                continue;
            };
            let cells = rows
                .entry((entry.team.as_str(), entry.player.as_str()))
                .or_insert_with(|| vec![String::new(); rounds.len()]);
            cells[column] = entry.role.to_string();
        }
        rows.sort_keys();
        RosterTable {
            rounds: rounds.to_vec(),
            rows: rows
                .into_iter()
                .map(|((team, player), cells)| RosterRow {
                    team: team.to_string(),
                    player: player.to_string(),
                    cells,
                })
                .collect(),
        }
    }

    /// Label for a player in a round, None if the player or round isn't in the table
    pub fn cell(&self, player: &str, round: Round) -> Option<&str> {
        let column = self.rounds.iter().position(|r| *r == round)?;
        self.rows
            .iter()
            .find(|row| row.player == player)
            .and_then(|row| row.cells.get(column))
            .map(String::as_str)
    }

    /// Players in the squad in a round
    pub fn squad(&self, round: Round) -> Vec<&str> {
        let Some(column) = self.rounds.iter().position(|r| *r == round) else {
            return Vec::new();
        };
        self.rows
            .iter()
            .filter(|row| row.cells.get(column).is_some_and(|cell| !cell.is_empty()))
            .map(|row| row.player.as_str())
            .collect()
    }

    /// Captain in a round
    pub fn captain(&self, round: Round) -> Option<&str> {
        let column = self.rounds.iter().position(|r| *r == round)?;
        self.rows
            .iter()
            .find(|row| row.cells.get(column).is_some_and(|cell| cell.ends_with('©')))
            .map(|row| row.player.as_str())
    }
}

impl Display for RosterTable {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        let mut builder = Builder::default();
        let mut header = vec!["team".to_string(), "player".to_string()];
        header.extend(self.rounds.iter().map(|r| r.to_string()));
        builder.push_record(header);
        for row in &self.rows {
            let mut record = vec![row.team.clone(), row.player.clone()];
            record.extend(row.cells.iter().cloned());
            builder.push_record(record);
        }
        let mut table = builder.build();
        table.with(Style::psql());
        write!(f, "{}", table)
    }
}

/// Errors raised while decoding a solution
#[derive(Error, Debug, Clone, PartialEq)]
pub enum DecodeError {
    #[error("Solution is not optimal (status: {0})")]
    NotOptimal(OptimizationStatus),
    #[error("Solution has no value for variable {0}")]
    MissingValue(String),
    #[error("Variable {id} has non-integral value {value}")]
    NonIntegral { id: String, value: f64 },
    #[error("Player {player} is captain in round {round} but not in the starting team")]
    CaptainNotInTeam { player: String, round: Round },
    #[error("Player {player} holds more than one squad position in round {round}")]
    ConflictingRoles { player: String, round: Round },
    #[error("Player {0} is not in the player list")]
    UnknownPlayer(String),
}

/// Decode an optimal solution of `formulation` into a roster table
///
/// Binary values further than `tolerance` from 0 or 1 are rejected. The team of each player
/// is looked up in `players`.
pub fn decode(
    formulation: &Formulation,
    players: &[Player],
    solution: &ProblemSolution,
    tolerance: f64,
) -> Result<RosterTable, DecodeError> {
    let entries = decode_entries(formulation, players, solution, tolerance)?;
    Ok(RosterTable::from_entries(&formulation.index.rounds, &entries))
}

/// Decode an optimal solution into one entry per player and round in the squad
pub fn decode_entries(
    formulation: &Formulation,
    players: &[Player],
    solution: &ProblemSolution,
    tolerance: f64,
) -> Result<Vec<RosterEntry>, DecodeError> {
    if !solution.is_optimal() {
        return Err(DecodeError::NotOptimal(solution.status));
    }
    let teams: IndexMap<&str, &str> = players
        .iter()
        .map(|p| (p.id.as_str(), p.team.as_str()))
        .collect();
    let index = &formulation.index;
    let variables = &formulation.variables;
    let is_set = |variable: usize| -> Result<bool, DecodeError> {
        let id = &variables.definitions()[variable].id;
        let value = solution
            .value(id)
            .ok_or_else(|| DecodeError::MissingValue(id.clone()))?;
        if !value.is_finite() || value.abs().min((value - 1.0).abs()) > tolerance {
            return Err(DecodeError::NonIntegral {
                id: id.clone(),
                value,
            });
        }
        Ok(value > 0.5)
    };

    let mut entries = Vec::new();
    for (player, name) in index.players.iter().enumerate() {
        let team = *teams
            .get(name.as_str())
            .ok_or_else(|| DecodeError::UnknownPlayer(name.clone()))?;
        for &round in &index.rounds {
            let captain = is_set(variables.captain(player, round))?;
            let mut squad_position = None;
            let mut in_team = false;
            for &position in &index.positions {
                let starting = is_set(variables.team(player, position, round))?;
                in_team |= starting;
                if !is_set(variables.squad(player, position, round))? {
                    continue;
                }
                if squad_position.is_some() {
                    return Err(DecodeError::ConflictingRoles {
                        player: name.clone(),
                        round,
                    });
                }
                squad_position = Some((position, starting));
            }
            if captain && !in_team {
                return Err(DecodeError::CaptainNotInTeam {
                    player: name.clone(),
                    round,
                });
            }
            let Some((position, starting)) = squad_position else {
                continue;
            };
            let role = if captain {
                Role::Captain(position)
            } else if starting {
                Role::Starting(position)
            } else {
                Role::Substitute(position)
            };
            entries.push(RosterEntry {
                player: name.clone(),
                team: team.to_string(),
                round,
                role,
            });
        }
    }
    Ok(entries)
}

//! Module providing JSON IO for players, fixtures, settings and selected rosters
use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::decode::RosterTable;
use crate::roster::fixture::Fixtures;
use crate::roster::player::Player;
use crate::roster::settings::SelectionSettings;
use crate::roster::{Position, Round};

// region JSON Records
/// Represents a JSON serialized player
#[derive(Serialize, Deserialize)]
struct JsonPlayer {
    name: String,
    team: String,
    cost: f64,
    expected_points: f64,
    positions: Vec<Position>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    unavailable_rounds: Vec<Round>,
}

/// Represents a JSON serialized fixture entry
#[derive(Serialize, Deserialize)]
struct JsonFixture {
    round: Round,
    team: String,
    multiplier: f64,
}
// endregion JSON Records

// region Conversions
impl From<JsonPlayer> for Player {
    fn from(p: JsonPlayer) -> Self {
        Self {
            id: p.name,
            team: p.team,
            cost: p.cost,
            expected_points: p.expected_points,
            positions: p.positions,
            unavailable_rounds: p.unavailable_rounds,
        }
    }
}

impl From<Player> for JsonPlayer {
    fn from(p: Player) -> Self {
        Self {
            name: p.id,
            team: p.team,
            cost: p.cost,
            expected_points: p.expected_points,
            positions: p.positions,
            unavailable_rounds: p.unavailable_rounds,
        }
    }
}
// endregion Conversions

fn read_file<P: AsRef<Path>>(path: P) -> Result<String, JsonError> {
    fs::read_to_string(path).map_err(|err| JsonError::UnableToRead(format!("{:?}", err)))
}

/// Read a list of players from a JSON file
pub fn read_players<P: AsRef<Path>>(path: P) -> Result<Vec<Player>, JsonError> {
    let data = read_file(path)?;
    let players = match serde_json::from_str::<Vec<JsonPlayer>>(&data) {
        Ok(players) => players,
        Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
    };
    Ok(players.into_iter().map(Player::from).collect())
}

/// Write a list of players to a JSON file, in the format read by [`read_players`]
pub fn write_players<P: AsRef<Path>>(players: &[Player], path: P) -> Result<(), JsonError> {
    let json_players: Vec<JsonPlayer> = players.iter().cloned().map(JsonPlayer::from).collect();
    let players_string = serde_json::to_string_pretty(&json_players)?;
    fs::write(path, players_string)?;
    Ok(())
}

/// Read fixture multipliers from a JSON file
///
/// Later entries for the same round and team replace earlier ones.
pub fn read_fixtures<P: AsRef<Path>>(path: P) -> Result<Fixtures, JsonError> {
    let data = read_file(path)?;
    let fixtures = match serde_json::from_str::<Vec<JsonFixture>>(&data) {
        Ok(fixtures) => fixtures,
        Err(err) => return Err(JsonError::UnableToParse(format!("{:?}", err))),
    };
    Ok(fixtures
        .into_iter()
        .map(|f| (f.round, f.team, f.multiplier))
        .collect())
}

/// Read selection settings from a JSON file, missing fields take their default values
pub fn read_settings<P: AsRef<Path>>(path: P) -> Result<SelectionSettings, JsonError> {
    let data = read_file(path)?;
    match serde_json::from_str::<SelectionSettings>(&data) {
        Ok(settings) => Ok(settings),
        Err(err) => Err(JsonError::UnableToParse(format!("{:?}", err))),
    }
}

/// Write a selected roster to a JSON file
pub fn write_roster<P: AsRef<Path>>(roster: &RosterTable, path: P) -> Result<(), JsonError> {
    let roster_string = serde_json::to_string_pretty(roster)?;
    fs::write(path, roster_string)?;
    Ok(())
}

#[derive(Error, Debug)]
pub enum JsonError {
    #[error("Unable to read file due to {0}")]
    UnableToRead(String),
    #[error("Unable to parse json due to {0}")]
    UnableToParse(String),
    #[error("Serde json parse error")]
    SerdeJsonParseError(#[from] serde_json::Error),
    #[error("Unable to write to file")]
    UnableToWrite(#[from] std::io::Error),
}

//! Module for reading selection inputs and writing selected rosters
pub mod json;

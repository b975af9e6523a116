//! Core rust implementation of fantasy squad selection, picking the squad, starting team and
//! captain for every round of a cricket competition by solving a mixed integer linear program.

pub mod configuration;
pub mod decode;
pub mod formulation;
pub mod io;
pub mod optimize;
pub mod roster;
pub mod selection;

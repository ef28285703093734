use std::fmt;

use crate::sim::GamePhase;

/// Misuse of the [`Game`](crate::sim::Game) API.
///
/// The simulation itself never fails; these only come back from the
/// orchestrator's entry points.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum GameError {
    /// `start` was called while a run is active or finished; `restart` first.
    NotIdle { phase: GamePhase },
    /// Level ids outside the catalogue.
    UnknownLevel { id: u8 },
}

impl fmt::Display for GameError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotIdle { phase } => {
                write!(f, "cannot start a run while the game is {phase:?}")
            }
            Self::UnknownLevel { id } => write!(f, "unknown level id: {id}"),
        }
    }
}

impl std::error::Error for GameError {}

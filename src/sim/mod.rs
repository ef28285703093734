//! Deterministic simulation module
//!
//! All gameplay logic lives here. This module must be pure and deterministic:
//! - Fixed timestep only
//! - Seeded RNG only
//! - Integer positions only
//! - Stable iteration order (spawn order)
//! - No rendering or platform dependencies

pub mod autopilot;
pub mod collision;
pub mod game;
pub mod motion;
pub mod snapshot;
pub mod spawn;
pub mod state;
pub mod tick;
pub mod track;

pub use game::Game;
pub use motion::{JUMP_ARC, ScrollX};
pub use snapshot::{EntityPos, PlayerSprite, PlayerView, Snapshot};
pub use state::{Flower, GamePhase, JumpState, LevelId, Note, Pencil, Player, RunState};
pub use tick::{GameEvent, RunOutcome, TickInput, TickOutput, tick};
pub use track::{TRACK_LEN, ToneId, Track};

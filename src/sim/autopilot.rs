//! Demo input policy
//!
//! Presses the action from the ground when a live note is a few units in
//! front of the player, and lets go otherwise. Never floats.

use super::state::RunState;
use crate::consts::*;

/// Nearest note distance (exclusive) that triggers a jump
const TRIGGER_NEAR: i32 = 2;
/// Farthest note distance (inclusive) that triggers a jump
const TRIGGER_FAR: i32 = 14;

/// Action signal for the next tick
pub fn action(run: &RunState) -> bool {
    if run.player.is_airborne() {
        return false;
    }
    run.notes.iter().any(|note| {
        let ahead = note.x() - PLAYER_X;
        !note.cleared && ahead > TRIGGER_NEAR && ahead <= TRIGGER_FAR
    })
}

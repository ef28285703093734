//! Fixed timestep simulation tick
//!
//! Core game loop that advances one run by one logical frame. The order of
//! the steps is fixed: beat clock, level spawners, input and jump, entity
//! motion, collisions, completion.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::collision::{self, Resolution};
use super::motion::{self, JumpTrigger};
use super::spawn;
use super::state::RunState;
use super::track::ToneId;
use crate::audio::ToneEvent;
use crate::consts::*;

/// Input for a single tick
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickInput {
    /// Primary action (jump/float) held this tick
    pub action: bool,
}

impl TickInput {
    pub fn held() -> Self {
        Self { action: true }
    }
}

/// Something that happened during a tick
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum GameEvent {
    /// A note entered on the right edge; it belongs to `beat`
    NoteSpawned { beat: usize },
    NoteCleared { tone: ToneId },
    NoteHit { tone: ToneId },
    PencilSpawned { x: i32 },
    PencilHit,
    FlowerSpawned { x: i32 },
    FlowerCollected { hearts: u8 },
    FlowerMissed,
    Jumped,
    Floated,
    Lost,
    Completed,
}

/// Everything a tick produced for the outside world
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct TickOutput {
    /// Tones to play, in the order they were triggered
    pub tones: Vec<ToneEvent>,
    pub events: Vec<GameEvent>,
    /// Beat that played this tick, if any
    pub beat: Option<usize>,
}

impl TickOutput {
    pub fn clear(&mut self) {
        self.tones.clear();
        self.events.clear();
        self.beat = None;
    }
}

/// How a run ended
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunOutcome {
    Lost,
    Completed,
}

/// Advance a run by one fixed timestep.
///
/// Appends this tick's tones and events to `out`. Returns the outcome when
/// the run ends on this tick; the caller must not tick the run again after
/// that.
pub fn tick<R: Rng + ?Sized>(
    state: &mut RunState,
    input: &TickInput,
    rng: &mut R,
    out: &mut TickOutput,
) -> Option<RunOutcome> {
    state.time_ticks += 1;

    // Beat clock and note spawning
    out.beat = spawn::advance_beat(state, out);

    // Level hazards
    spawn::spawn_pencils(state, rng, out);
    spawn::spawn_flower(state, rng, out);

    // Input and jump
    match motion::apply_input(&mut state.player, input.action) {
        Some(JumpTrigger::Jump) => out.events.push(GameEvent::Jumped),
        Some(JumpTrigger::Float) => out.events.push(GameEvent::Floated),
        None => {}
    }
    motion::advance_jump(&mut state.player);

    // Entity motion
    motion::advance_notes(&mut state.notes);
    motion::advance_pencils(&mut state.pencils);
    if let Some(flower) = state.flower.as_mut() {
        motion::advance_flower(flower);
    }

    // Collisions
    if collision::resolve(state, out) == Resolution::Lost {
        out.events.push(GameEvent::Lost);
        log::info!("Run lost on beat {} (tick {})", state.beat_counter, state.time_ticks);
        return Some(RunOutcome::Lost);
    }

    // Completion: song over and the last note gone
    if state.song_done && state.notes.is_empty() {
        state.song_end_timer += 1;
        if state.song_end_timer >= SONG_END_TICKS {
            out.events.push(GameEvent::Completed);
            log::info!(
                "Song complete with {} hearts{}",
                state.hearts,
                if state.is_perfect() { " (perfect)" } else { "" }
            );
            return Some(RunOutcome::Completed);
        }
    }

    None
}

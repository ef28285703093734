//! Beat clock and spawners
//!
//! Notes come from the obstacle map, `SPAWN_OFFSET` beats ahead of the music,
//! so each one reaches the player exactly when its own beat plays. Pencils and
//! flowers (Pencil Drop only) come from randomized countdowns.

use std::ops::{Range, RangeInclusive};

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::state::{Flower, Note, Pencil, RunState};
use super::tick::{GameEvent, TickOutput};
use crate::audio::ToneEvent;
use crate::consts::*;

/// Tuning for one randomized spawner family
#[derive(Debug, Clone)]
pub struct SpawnRule {
    /// Beats during which the spawner runs
    pub beats: Range<usize>,
    /// Spawns per run
    pub quota: u8,
    /// First countdown, in ticks
    pub initial: RangeInclusive<u32>,
    /// Countdown after a spawn
    pub cooldown: RangeInclusive<u32>,
    /// Countdown when a spawn is blocked by a falling pencil
    pub retry: u32,
    /// Horizontal spawn band
    pub x: RangeInclusive<i32>,
}

pub const PENCIL_SPAWN: SpawnRule = SpawnRule {
    beats: 20..108,
    quota: 2,
    initial: 150..=269,
    cooldown: 300..=479,
    retry: 15,
    x: 100..=159,
};

pub const FLOWER_SPAWN: SpawnRule = SpawnRule {
    beats: 55..95,
    quota: 2,
    initial: 60..=179,
    cooldown: 300..=479,
    retry: 30,
    x: 80..=139,
};

/// Countdown and quota bookkeeping for one spawner
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct SpawnTimer {
    pub countdown: u32,
    pub spawned: u8,
}

impl SpawnTimer {
    pub fn new<R: Rng + ?Sized>(rule: &SpawnRule, rng: &mut R) -> Self {
        Self {
            countdown: rng.random_range(rule.initial.clone()),
            spawned: 0,
        }
    }

    /// Count down one tick. Returns the spawn x when the timer fires and the
    /// way is clear; re-arms the countdown either way.
    fn poll<R: Rng + ?Sized>(&mut self, rule: &SpawnRule, blocked: bool, rng: &mut R) -> Option<i32> {
        self.countdown = self.countdown.saturating_sub(1);
        if self.countdown > 0 {
            return None;
        }
        if blocked {
            self.countdown = rule.retry;
            return None;
        }
        self.spawned += 1;
        self.countdown = rng.random_range(rule.cooldown.clone());
        Some(rng.random_range(rule.x.clone()))
    }

    fn active(&self, rule: &SpawnRule, state: &RunState) -> bool {
        self.spawned < rule.quota && !state.song_done && rule.beats.contains(&state.beat_counter)
    }
}

/// Run the beat clock for one tick.
///
/// Every `FRAMES_PER_NOTE` ticks the current beat plays, the note
/// `SPAWN_OFFSET` beats ahead spawns (if charted) and the counter advances.
/// Returns the beat that played, if any.
pub fn advance_beat(state: &mut RunState, out: &mut TickOutput) -> Option<usize> {
    if state.song_done {
        return None;
    }
    state.spawn_countdown = state.spawn_countdown.saturating_sub(1);
    if state.spawn_countdown > 0 {
        return None;
    }
    state.spawn_countdown = FRAMES_PER_NOTE;

    let beat = state.beat_counter;
    let tone = state.track.tone(beat);
    out.tones.extend(ToneEvent::melody(tone));
    log::trace!("beat {beat} tone {}", tone.0);

    let spawn_beat = beat + SPAWN_OFFSET;
    if state.track.has_obstacle(spawn_beat) {
        state.notes.push(Note::new(state.track.tone(spawn_beat)));
        out.events.push(GameEvent::NoteSpawned { beat: spawn_beat });
    }

    state.beat_counter = (beat + 1).min(state.track.len());
    if state.beat_counter >= state.track.len() {
        state.song_done = true;
        log::debug!("song finished after {} ticks", state.time_ticks);
    }
    Some(beat)
}

/// Pencil spawner; no-op outside Pencil Drop
pub fn spawn_pencils<R: Rng + ?Sized>(state: &mut RunState, rng: &mut R, out: &mut TickOutput) {
    if !state.level.has_hazards() || !state.pencil_timer.active(&PENCIL_SPAWN, state) {
        return;
    }
    let blocked = state.pencil_falling();
    if let Some(x) = state.pencil_timer.poll(&PENCIL_SPAWN, blocked, rng) {
        log::debug!("pencil {} dropped at x={x}", state.pencil_timer.spawned);
        state.pencils.push(Pencil::new(x));
        out.events.push(GameEvent::PencilSpawned { x });
    }
}

/// Flower spawner; only one flower lives at a time, and never alongside a
/// falling pencil
pub fn spawn_flower<R: Rng + ?Sized>(state: &mut RunState, rng: &mut R, out: &mut TickOutput) {
    if !state.level.has_hazards()
        || state.flower.is_some()
        || !state.flower_timer.active(&FLOWER_SPAWN, state)
    {
        return;
    }
    let blocked = state.pencil_falling();
    if let Some(x) = state.flower_timer.poll(&FLOWER_SPAWN, blocked, rng) {
        log::debug!("flower {} spawned at x={x}", state.flower_timer.spawned);
        state.flower = Some(Flower::new(x));
        out.events.push(GameEvent::FlowerSpawned { x });
    }
}

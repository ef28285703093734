//! Collision detection and scoring
//!
//! Notes are a ground threat: they hit unless the player is high enough when
//! they pass. Pencils and flowers only interact with an airborne player, so a
//! grounded runner is safe from pencils but can't catch flowers either.

use super::state::{Player, RunState};
use super::tick::{GameEvent, TickOutput};
use crate::audio::ToneEvent;
use crate::consts::*;

/// Whether the run survives this tick's collisions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resolution {
    Continue,
    /// The last heart was lost; nothing else in the tick is resolved
    Lost,
}

/// Whether an 8x8 sprite with top-left (x, y) overlaps the player's 8x16 box
pub fn sprite_hits_player(player: &Player, x: i32, y: i32) -> bool {
    x + SPRITE_SIZE > PLAYER_X
        && x < PLAYER_X + PLAYER_WIDTH
        && y + SPRITE_SIZE > player.y
        && y < player.y + PLAYER_HEIGHT
}

/// Whether a note at height `note_y` catches the player when it passes.
///
/// Only the lower part of the player's box counts, so a jump only has to
/// lift the feet `NOTE_HIT_DEPTH` units above the note's top.
#[inline]
pub fn note_hits_player(player: &Player, note_y: i32) -> bool {
    player.y + NOTE_HIT_DEPTH > note_y
}

/// Resolve every collision for this tick, in note, pencil, flower order
pub fn resolve(state: &mut RunState, out: &mut TickOutput) -> Resolution {
    if resolve_notes(state, out) == Resolution::Lost {
        return Resolution::Lost;
    }
    if resolve_pencils(state, out) == Resolution::Lost {
        return Resolution::Lost;
    }
    resolve_flower(state, out);
    Resolution::Continue
}

/// Notes that reach the player's column either hit (and are removed) or,
/// once a margin past the player, are marked cleared. Notes that leave the
/// screen are dropped.
pub fn resolve_notes(state: &mut RunState, out: &mut TickOutput) -> Resolution {
    let mut i = 0;
    while i < state.notes.len() {
        let note = &mut state.notes[i];

        if !note.cleared && note.x() < PLAYER_X {
            if note_hits_player(&state.player, note.y) {
                let tone = note.tone;
                state.notes.remove(i);
                out.tones.push(ToneEvent::dud(tone));
                out.events.push(GameEvent::NoteHit { tone });
                log::debug!("hit note (tone {}), {} hearts left", tone.0, state.hearts.saturating_sub(1));
                if state.lose_heart() {
                    return Resolution::Lost;
                }
                continue;
            }
            if note.x() < PLAYER_X - NOTE_CLEAR_MARGIN {
                note.cleared = true;
                out.events.push(GameEvent::NoteCleared { tone: note.tone });
            }
        }

        if note.x() <= OFFSCREEN_LEFT {
            state.notes.remove(i);
            continue;
        }
        i += 1;
    }
    Resolution::Continue
}

/// Falling pencils hurt an airborne player on contact
pub fn resolve_pencils(state: &mut RunState, out: &mut TickOutput) -> Resolution {
    let airborne = state.player.is_airborne();
    let mut i = 0;
    while i < state.pencils.len() {
        let pencil = &mut state.pencils[i];
        if !pencil.is_falling() {
            i += 1;
            continue;
        }

        if !pencil.cleared && airborne && sprite_hits_player(&state.player, pencil.x(), pencil.y) {
            state.pencils.remove(i);
            out.tones.push(ToneEvent::dud(ToneEvent::DUD_FALLBACK));
            out.events.push(GameEvent::PencilHit);
            log::debug!("hit by pencil, {} hearts left", state.hearts.saturating_sub(1));
            if state.lose_heart() {
                return Resolution::Lost;
            }
            continue;
        }

        // Below the player's feet there is nothing left to hit
        if pencil.y >= GROUND_Y + PLAYER_HEIGHT {
            pencil.cleared = true;
        }

        if pencil.y > SCREEN_HEIGHT || pencil.x() < OFFSCREEN_LEFT {
            state.pencils.remove(i);
            continue;
        }
        i += 1;
    }
    Resolution::Continue
}

/// An airborne player touching the flower collects it for a heart
pub fn resolve_flower(state: &mut RunState, out: &mut TickOutput) {
    let Some(flower) = &state.flower else {
        return;
    };

    if state.player.is_airborne() && sprite_hits_player(&state.player, flower.x, flower.y) {
        state.flower = None;
        state.gain_heart();
        out.tones.push(ToneEvent::pickup());
        out.events.push(GameEvent::FlowerCollected {
            hearts: state.hearts,
        });
        log::debug!("flower collected, {} hearts", state.hearts);
        return;
    }

    if flower.y > FLOWER_FLOOR || flower.x < OFFSCREEN_LEFT {
        state.flower = None;
        out.events.push(GameEvent::FlowerMissed);
    }
}

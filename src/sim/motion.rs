//! Jump physics and entity motion
//!
//! All motion is integer. Scrolling uses a fractional accumulator in 1/256
//! units so the average speed of ~1.668 units per tick never drifts.

use serde::{Deserialize, Serialize};

use super::state::{Flower, JumpState, Note, Pencil, Player};
use crate::consts::*;

/// Jump height above ground per arc frame (symmetric, peak 20)
pub const JUMP_ARC: [i32; JUMP_FRAMES] = [
    0, 2, 4, 6, 8, 10, 11, 13, 14, 15, 16, 17, 18, 19, 19, 20, 20, 20, //
    20, 20, 20, 19, 19, 18, 17, 16, 15, 14, 13, 11, 10, 8, 6, 4, 2, 0,
];

/// What an action press did this tick
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JumpTrigger {
    Jump,
    Float,
}

/// Horizontal position with a sub-unit accumulator
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScrollX {
    pub x: i32,
    /// Fraction of a unit in 1/256ths
    pub frac: u16,
}

impl ScrollX {
    pub fn new(x: i32) -> Self {
        Self { x, frac: 0 }
    }

    /// Units to move left this tick (1, or 2 when the fraction overflows)
    #[inline]
    fn next_step(&mut self) -> i32 {
        self.frac += SCROLL_FRAC_STEP;
        if self.frac >= SCROLL_FRAC_ONE {
            self.frac -= SCROLL_FRAC_ONE;
            2
        } else {
            1
        }
    }

    /// Scroll one tick to the left
    pub fn advance(&mut self) {
        self.x -= self.next_step();
    }

    /// Scroll one tick to the left, stopping at the screen edge
    pub fn advance_clamped(&mut self) {
        self.x = (self.x - self.next_step()).max(0);
    }
}

/// Feed one tick of the action signal into the trigger latch.
///
/// A release re-arms the latch. While held and armed, the first thing the
/// press can do (start a jump, or float near the peak) fires and disarms it.
/// A held press that fires nothing stays armed, so it can still become a
/// float once the window opens.
pub fn apply_input(player: &mut Player, action_held: bool) -> Option<JumpTrigger> {
    if !action_held {
        player.trigger_armed = true;
        return None;
    }
    if !player.trigger_armed {
        return None;
    }

    match player.jump {
        JumpState::Grounded => {
            player.jump = JumpState::Airborne { frame: 0 };
            player.floats_used = 0;
            player.trigger_armed = false;
            Some(JumpTrigger::Jump)
        }
        JumpState::Airborne { frame }
            if player.floats_used < MAX_FLOATS
                && (FLOAT_WINDOW_START..=FLOAT_WINDOW_END).contains(&frame) =>
        {
            player.jump = JumpState::Floating {
                ticks_left: FLOAT_TICKS,
            };
            player.floats_used += 1;
            player.trigger_armed = false;
            Some(JumpTrigger::Float)
        }
        _ => None,
    }
}

/// Advance the jump state machine one tick and update the player's height
pub fn advance_jump(player: &mut Player) {
    match player.jump {
        JumpState::Grounded => {
            player.y = GROUND_Y;
        }
        JumpState::Airborne { frame } => {
            player.y = GROUND_Y - JUMP_ARC.get(frame).copied().unwrap_or(0);
            let next = frame + 1;
            if next >= JUMP_FRAMES {
                player.jump = JumpState::Grounded;
                player.y = GROUND_Y;
            } else {
                player.jump = JumpState::Airborne { frame: next };
            }
        }
        JumpState::Floating { ticks_left } => {
            player.y = GROUND_Y - FLOAT_HEIGHT;
            let left = ticks_left.saturating_sub(1);
            player.jump = if left == 0 {
                JumpState::Airborne {
                    frame: FLOAT_RESUME_FRAME,
                }
            } else {
                JumpState::Floating { ticks_left: left }
            };
        }
    }
}

pub fn advance_notes(notes: &mut [Note]) {
    for note in notes {
        note.pos.advance();
    }
}

/// Pencils scroll with the notes (clamped at the left edge) while falling
pub fn advance_pencils(pencils: &mut [Pencil]) {
    for pencil in pencils.iter_mut().filter(|p| p.is_falling()) {
        pencil.pos.advance_clamped();
        pencil.y += PENCIL_FALL_SPEED;
    }
}

/// Flowers drift on a three-tick cycle: left on odd phases, down on the third
pub fn advance_flower(flower: &mut Flower) {
    flower.drift_phase += 1;
    if flower.drift_phase & 1 == 1 {
        flower.x = (flower.x - 1).max(0);
    }
    if flower.drift_phase >= 3 {
        flower.drift_phase = 0;
        flower.y += 1;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::track::ToneId;

    fn step(player: &mut Player, held: bool) -> Option<JumpTrigger> {
        let trigger = apply_input(player, held);
        advance_jump(player);
        trigger
    }

    #[test]
    fn test_arc_is_symmetric() {
        for i in 0..JUMP_FRAMES {
            assert_eq!(JUMP_ARC[i], JUMP_ARC[JUMP_FRAMES - 1 - i]);
        }
        assert_eq!(JUMP_ARC.iter().max(), Some(&FLOAT_HEIGHT));
    }

    #[test]
    fn test_plain_jump_follows_arc() {
        let mut player = Player::default();
        assert_eq!(step(&mut player, true), Some(JumpTrigger::Jump));
        let mut heights = vec![GROUND_Y - player.y];
        for _ in 1..JUMP_FRAMES {
            assert!(player.is_airborne());
            step(&mut player, false);
            heights.push(GROUND_Y - player.y);
        }
        assert_eq!(heights, JUMP_ARC.to_vec());
        assert_eq!(player.jump, JumpState::Grounded);
        assert_eq!(player.y, GROUND_Y);
    }

    #[test]
    fn test_held_button_does_not_retrigger() {
        let mut player = Player::default();
        assert_eq!(step(&mut player, true), Some(JumpTrigger::Jump));
        for _ in 1..JUMP_FRAMES {
            assert_eq!(step(&mut player, true), None);
        }
        assert_eq!(player.jump, JumpState::Grounded);
        // Still held after landing: no new jump until a release
        assert_eq!(step(&mut player, true), None);
        assert_eq!(player.jump, JumpState::Grounded);
        step(&mut player, false);
        assert_eq!(step(&mut player, true), Some(JumpTrigger::Jump));
    }

    #[test]
    fn test_grounded_idle_is_stable() {
        let mut player = Player::default();
        for _ in 0..100 {
            step(&mut player, false);
            assert_eq!(player.jump, JumpState::Grounded);
            assert_eq!(player.y, GROUND_Y);
        }
    }

    #[test]
    fn test_float_window() {
        for press_at in 1..JUMP_FRAMES {
            let mut player = Player::default();
            step(&mut player, true);
            step(&mut player, false);
            for _ in 2..press_at {
                step(&mut player, false);
            }
            let frame = match player.jump {
                JumpState::Airborne { frame } => frame,
                other => panic!("unexpected {other:?}"),
            };
            let trigger = apply_input(&mut player, true);
            let in_window = (FLOAT_WINDOW_START..=FLOAT_WINDOW_END).contains(&frame);
            assert_eq!(trigger == Some(JumpTrigger::Float), in_window, "frame {frame}");
        }
    }

    #[test]
    fn test_float_pins_then_resumes_at_frame_18() {
        let mut player = Player::default();
        step(&mut player, true);
        // Release and ride the arc to frame 16
        while player.jump != (JumpState::Airborne { frame: 16 }) {
            step(&mut player, false);
        }
        assert_eq!(step(&mut player, true), Some(JumpTrigger::Float));
        assert_eq!(player.floats_used, 1);
        let mut pinned = 1;
        while matches!(player.jump, JumpState::Floating { .. }) {
            assert_eq!(player.y, GROUND_Y - FLOAT_HEIGHT);
            step(&mut player, true);
            pinned += 1;
        }
        assert_eq!(pinned, FLOAT_TICKS as usize);
        assert_eq!(player.y, GROUND_Y - FLOAT_HEIGHT);
        assert_eq!(
            player.jump,
            JumpState::Airborne {
                frame: FLOAT_RESUME_FRAME
            }
        );
        step(&mut player, false);
        assert_eq!(player.y, GROUND_Y - JUMP_ARC[FLOAT_RESUME_FRAME]);
    }

    #[test]
    fn test_three_floats_per_jump() {
        let mut player = Player::default();
        step(&mut player, true);
        step(&mut player, false);
        let mut floats = 0;
        while player.is_airborne() {
            // Tap on every window frame
            let in_window = matches!(
                player.jump,
                JumpState::Airborne { frame } if (FLOAT_WINDOW_START..=FLOAT_WINDOW_END).contains(&frame)
            );
            if step(&mut player, in_window) == Some(JumpTrigger::Float) {
                floats += 1;
            }
            step(&mut player, false);
        }
        assert_eq!(floats, MAX_FLOATS);
        assert_eq!(player.floats_used, MAX_FLOATS);

        // A new jump gets fresh charges
        step(&mut player, true);
        assert_eq!(player.floats_used, 0);
    }

    #[test]
    fn test_early_press_held_into_window_floats() {
        let mut player = Player::default();
        step(&mut player, true);
        step(&mut player, false);
        // Press at frame 10: too early, latch stays armed
        while player.jump != (JumpState::Airborne { frame: 10 }) {
            step(&mut player, false);
        }
        let mut fired = None;
        while fired.is_none() && player.is_airborne() {
            fired = step(&mut player, true);
        }
        assert_eq!(fired, Some(JumpTrigger::Float));
    }

    #[test]
    fn test_scroll_average_speed() {
        let mut pos = ScrollX::new(0);
        for _ in 0..256 {
            pos.advance();
        }
        // 256 ticks move 256 + 171 units exactly
        assert_eq!(pos.x, -(256 + 171));
        assert_eq!(pos.frac, 0);
    }

    #[test]
    fn test_scroll_step_pattern() {
        let mut pos = ScrollX::new(NOTE_SPAWN_X);
        pos.advance();
        assert_eq!(pos.x, NOTE_SPAWN_X - 1);
        assert_eq!(pos.frac, 171);
        pos.advance();
        assert_eq!(pos.x, NOTE_SPAWN_X - 3);
        assert_eq!(pos.frac, 86);
    }

    #[test]
    fn test_pencil_clamps_and_falls() {
        let mut pencils = vec![Pencil::new(1)];
        advance_pencils(&mut pencils);
        advance_pencils(&mut pencils);
        assert_eq!(pencils[0].x(), 0);
        assert_eq!(pencils[0].y, 2 * PENCIL_FALL_SPEED);
    }

    #[test]
    fn test_flower_drift_cycle() {
        let mut flower = Flower::new(100);
        let mut trail = Vec::new();
        for _ in 0..6 {
            advance_flower(&mut flower);
            trail.push((flower.x, flower.y));
        }
        assert_eq!(
            trail,
            vec![(99, 0), (99, 0), (98, 1), (97, 1), (97, 1), (96, 2)]
        );
    }

    #[test]
    fn test_notes_scroll_in_order() {
        let mut notes = vec![Note::new(ToneId(360)), Note::new(ToneId(539))];
        notes[1].pos.x += 15;
        advance_notes(&mut notes);
        assert_eq!(notes[0].x(), NOTE_SPAWN_X - 1);
        assert_eq!(notes[1].x(), NOTE_SPAWN_X + 14);
    }
}

//! Downbeat - a ragtime rhythm runner
//!
//! Core modules:
//! - `sim`: Deterministic simulation (track data, spawning, jump physics, collisions)
//! - `audio`: Tone events and emitter adapters
//! - `settings`: Player preferences (volumes, level, fixed seed)

pub mod audio;
pub mod error;
pub mod settings;
pub mod sim;

pub use audio::{ToneEvent, ToneLog, ToneSink};
pub use error::GameError;
pub use settings::Settings;
pub use sim::{Game, GamePhase, LevelId, Snapshot};

/// Game configuration constants
///
/// Coordinates are in logical screen units on a 160x96 field, y growing down.
pub mod consts {
    /// Logical ticks per second (one per display refresh)
    pub const TICK_RATE_HZ: u32 = 60;

    /// Player sprite column (fixed)
    pub const PLAYER_X: i32 = 40;
    /// Player top edge when standing
    pub const GROUND_Y: i32 = 40;
    pub const PLAYER_WIDTH: i32 = 8;
    /// Player sprite is 8x8 stretched to double height
    pub const PLAYER_HEIGHT: i32 = 16;
    /// Notes only hit when the player's top edge is within this many units of the note top
    pub const NOTE_HIT_DEPTH: i32 = 12;

    /// Every entity sprite except the player is 8x8
    pub const SPRITE_SIZE: i32 = 8;
    pub const SCREEN_HEIGHT: i32 = 96;
    /// Entities at or left of this column have fully left the screen
    pub const OFFSCREEN_LEFT: i32 = -8;

    /// Note top edge (bottom sits on the ground line)
    pub const NOTE_Y: i32 = 48;
    pub const NOTE_SPAWN_X: i32 = 168;
    /// Distance past the player after which a note counts as cleared
    pub const NOTE_CLEAR_MARGIN: i32 = 10;

    /// Scroll speed as a fraction of 256: 1 + 171/256 ~= 1.668 units per tick
    pub const SCROLL_FRAC_STEP: u16 = 171;
    pub const SCROLL_FRAC_ONE: u16 = 256;

    pub const MAX_HEARTS: u8 = 5;
    pub const STARTING_HEARTS: u8 = 3;

    /// Ticks per beat
    pub const FRAMES_PER_NOTE: u32 = 9;
    /// Beats between a note spawning and reaching the player
    pub const SPAWN_OFFSET: usize = 9;

    /// Ticks after the last note leaves before the song counts as complete
    pub const SONG_END_TICKS: u32 = 30;

    /// Jump arc length in ticks
    pub const JUMP_FRAMES: usize = 36;
    pub const MAX_FLOATS: u8 = 3;
    pub const FLOAT_WINDOW_START: usize = 15;
    pub const FLOAT_WINDOW_END: usize = 20;
    pub const FLOAT_TICKS: u8 = 10;
    pub const FLOAT_RESUME_FRAME: usize = 18;
    pub const FLOAT_HEIGHT: i32 = 20;

    pub const PENCIL_FALL_SPEED: i32 = 2;
    /// Flowers below this line are gone
    pub const FLOWER_FLOOR: i32 = 90;
}

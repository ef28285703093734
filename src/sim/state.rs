//! Run state and entity types
//!
//! Everything a single run of a level mutates lives in [`RunState`]. It is
//! owned by the [`Game`](super::Game) orchestrator and only changed inside a
//! tick.

use rand::Rng;
use serde::{Deserialize, Serialize};

use super::motion::ScrollX;
use super::spawn::{FLOWER_SPAWN, PENCIL_SPAWN, SpawnTimer};
use super::track::{ToneId, Track};
use crate::consts::*;
use crate::error::GameError;

/// Phase of the orchestrator's state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum GamePhase {
    /// No run in progress; waiting for `start`
    #[default]
    Idle,
    /// Ticking
    Running,
    /// Hearts ran out
    Lost,
    /// Song finished with hearts left
    Completed,
}

impl GamePhase {
    /// Lost and Completed end a run until an explicit restart
    pub fn is_terminal(self) -> bool {
        matches!(self, GamePhase::Lost | GamePhase::Completed)
    }
}

/// Level catalogue
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LevelId {
    /// Notes only
    #[default]
    MapleLeafRag,
    /// Notes plus falling pencils and drifting flowers
    PencilDrop,
}

impl LevelId {
    pub const ALL: [LevelId; 2] = [LevelId::MapleLeafRag, LevelId::PencilDrop];

    pub fn as_str(&self) -> &'static str {
        match self {
            LevelId::MapleLeafRag => "Maple Leaf Rag",
            LevelId::PencilDrop => "Pencil Drop",
        }
    }

    pub fn index(self) -> u8 {
        match self {
            LevelId::MapleLeafRag => 0,
            LevelId::PencilDrop => 1,
        }
    }

    /// Whether pencils and flowers spawn on this level
    pub fn has_hazards(self) -> bool {
        self == LevelId::PencilDrop
    }
}

impl TryFrom<u8> for LevelId {
    type Error = GameError;

    fn try_from(id: u8) -> Result<Self, Self::Error> {
        match id {
            0 => Ok(LevelId::MapleLeafRag),
            1 => Ok(LevelId::PencilDrop),
            _ => Err(GameError::UnknownLevel { id }),
        }
    }
}

/// Jump state machine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum JumpState {
    #[default]
    Grounded,
    /// Following the jump arc; `frame` is the next arc entry to apply
    Airborne { frame: usize },
    /// Hovering at float height
    Floating { ticks_left: u8 },
}

/// The runner
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Player {
    /// Top edge of the sprite
    pub y: i32,
    pub jump: JumpState,
    /// Floats spent in the current jump
    pub floats_used: u8,
    /// Set when the action has been seen released; a trigger consumes it
    pub trigger_armed: bool,
}

impl Default for Player {
    fn default() -> Self {
        Self {
            y: GROUND_Y,
            jump: JumpState::Grounded,
            floats_used: 0,
            trigger_armed: true,
        }
    }
}

impl Player {
    #[inline]
    pub fn x(&self) -> i32 {
        PLAYER_X
    }

    /// Any jump state other than standing on the ground, floats included
    #[inline]
    pub fn is_airborne(&self) -> bool {
        !matches!(self.jump, JumpState::Grounded)
    }
}

/// An obstacle note scrolling toward the player
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Note {
    pub pos: ScrollX,
    pub y: i32,
    /// Already passed the player safely
    pub cleared: bool,
    /// Pitch this note stands for (used for the dud sound)
    pub tone: ToneId,
}

impl Note {
    pub fn new(tone: ToneId) -> Self {
        Self {
            pos: ScrollX::new(NOTE_SPAWN_X),
            y: NOTE_Y,
            cleared: false,
            tone,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }
}

/// Lifecycle of a pencil
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum PencilState {
    #[default]
    Falling,
}

/// A falling pencil (level hazard)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Pencil {
    pub pos: ScrollX,
    pub y: i32,
    pub state: PencilState,
    /// Fallen below anything the player can reach
    pub cleared: bool,
}

impl Pencil {
    pub fn new(x: i32) -> Self {
        Self {
            pos: ScrollX::new(x),
            y: 0,
            state: PencilState::Falling,
            cleared: false,
        }
    }

    #[inline]
    pub fn x(&self) -> i32 {
        self.pos.x
    }

    pub fn is_falling(&self) -> bool {
        self.state == PencilState::Falling
    }
}

/// A drifting flower worth one heart
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Flower {
    pub x: i32,
    pub y: i32,
    /// Cycles 0..=3; odd phases drift left, reaching 3 drifts down
    pub drift_phase: u8,
}

impl Flower {
    pub fn new(x: i32) -> Self {
        Self {
            x,
            y: 0,
            drift_phase: 0,
        }
    }
}

/// Complete state of one run (created at level start)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunState {
    #[serde(skip)]
    pub track: Track,
    pub level: LevelId,
    /// Simulation tick counter
    pub time_ticks: u64,
    /// Beats played so far; the next beat to play
    pub beat_counter: usize,
    /// Ticks until the next beat
    pub spawn_countdown: u32,
    pub hearts: u8,
    pub song_done: bool,
    /// Ticks since the song finished and the last note left
    pub song_end_timer: u32,
    pub player: Player,
    /// Live notes in spawn order
    pub notes: Vec<Note>,
    /// Live pencils in spawn order
    pub pencils: Vec<Pencil>,
    pub flower: Option<Flower>,
    pub pencil_timer: SpawnTimer,
    pub flower_timer: SpawnTimer,
}

impl RunState {
    /// Fresh run on the given level, spawn timers rolled from `rng`
    pub fn new<R: Rng + ?Sized>(level: LevelId, track: Track, rng: &mut R) -> Self {
        Self {
            track,
            level,
            time_ticks: 0,
            beat_counter: 0,
            spawn_countdown: FRAMES_PER_NOTE,
            hearts: STARTING_HEARTS,
            song_done: false,
            song_end_timer: 0,
            player: Player::default(),
            notes: Vec::new(),
            pencils: Vec::new(),
            flower: None,
            pencil_timer: SpawnTimer::new(&PENCIL_SPAWN, rng),
            flower_timer: SpawnTimer::new(&FLOWER_SPAWN, rng),
        }
    }

    /// Remove one heart; returns true when that was the last one
    pub fn lose_heart(&mut self) -> bool {
        self.hearts = self.hearts.saturating_sub(1);
        self.hearts == 0
    }

    /// Add one heart, clamped at the maximum
    pub fn gain_heart(&mut self) {
        self.hearts = self.hearts.saturating_add(1).min(MAX_HEARTS);
    }

    /// Whether any pencil is still on its way down
    pub fn pencil_falling(&self) -> bool {
        self.pencils.iter().any(Pencil::is_falling)
    }

    /// Post-song victory window (drives the celebration sprite)
    pub fn celebrating(&self) -> bool {
        self.song_end_timer > 0 && self.hearts > 0
    }

    pub fn is_perfect(&self) -> bool {
        self.hearts == MAX_HEARTS
    }
}

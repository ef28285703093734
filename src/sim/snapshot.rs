//! Read-only view of a run for presentation
//!
//! Built from the run state after each whole tick. Renderers and the headless
//! driver only ever see this, never the live [`RunState`].

use serde::Serialize;

use super::state::{GamePhase, LevelId, RunState};
use crate::consts::*;

/// Which player sprite to draw
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub enum PlayerSprite {
    #[default]
    Normal,
    /// Victory pose after the song ends with hearts left
    Celebrating,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct PlayerView {
    pub x: i32,
    pub y: i32,
    pub sprite: PlayerSprite,
    pub airborne: bool,
}

impl Default for PlayerView {
    fn default() -> Self {
        Self {
            x: PLAYER_X,
            y: GROUND_Y,
            sprite: PlayerSprite::Normal,
            airborne: false,
        }
    }
}

/// Top-left corner of an 8x8 sprite
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct EntityPos {
    pub x: i32,
    pub y: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Snapshot {
    pub phase: GamePhase,
    /// `None` while idle
    pub level: Option<LevelId>,
    pub tick: u64,
    pub beat: usize,
    pub hearts: u8,
    /// All hearts filled (only meaningful once completed)
    pub perfect: bool,
    pub player: PlayerView,
    /// Notes in spawn order
    pub notes: Vec<EntityPos>,
    /// Pencils in spawn order
    pub pencils: Vec<EntityPos>,
    pub flower: Option<EntityPos>,
}

impl Snapshot {
    /// Nothing running
    pub fn idle() -> Self {
        Self {
            phase: GamePhase::Idle,
            level: None,
            tick: 0,
            beat: 0,
            hearts: 0,
            perfect: false,
            player: PlayerView::default(),
            notes: Vec::new(),
            pencils: Vec::new(),
            flower: None,
        }
    }

    pub fn capture(phase: GamePhase, run: &RunState) -> Self {
        let sprite = if run.celebrating() {
            PlayerSprite::Celebrating
        } else {
            PlayerSprite::Normal
        };
        Self {
            phase,
            level: Some(run.level),
            tick: run.time_ticks,
            beat: run.beat_counter,
            hearts: run.hearts,
            perfect: run.is_perfect(),
            player: PlayerView {
                x: run.player.x(),
                y: run.player.y,
                sprite,
                airborne: run.player.is_airborne(),
            },
            notes: run
                .notes
                .iter()
                .map(|n| EntityPos { x: n.x(), y: n.y })
                .collect(),
            pencils: run
                .pencils
                .iter()
                .map(|p| EntityPos { x: p.x(), y: p.y })
                .collect(),
            flower: run.flower.as_ref().map(|f| EntityPos { x: f.x, y: f.y }),
        }
    }
}

impl Default for Snapshot {
    fn default() -> Self {
        Self::idle()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sim::state::{Flower, Note, Pencil};
    use crate::sim::track::{ToneId, Track};
    use rand::SeedableRng;
    use rand_pcg::Pcg32;

    #[test]
    fn test_capture_keeps_entity_order() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut run = RunState::new(LevelId::PencilDrop, Track::MAPLE_LEAF_RAG, &mut rng);
        let mut a = Note::new(ToneId(360));
        a.pos.x = 60;
        run.notes.push(a);
        run.notes.push(Note::new(ToneId(539)));
        run.pencils.push(Pencil::new(120));
        run.flower = Some(Flower::new(90));

        let snap = Snapshot::capture(GamePhase::Running, &run);
        assert_eq!(snap.level, Some(LevelId::PencilDrop));
        assert_eq!(
            snap.notes,
            vec![
                EntityPos { x: 60, y: NOTE_Y },
                EntityPos { x: NOTE_SPAWN_X, y: NOTE_Y }
            ]
        );
        assert_eq!(snap.pencils, vec![EntityPos { x: 120, y: 0 }]);
        assert_eq!(snap.flower, Some(EntityPos { x: 90, y: 0 }));
        assert_eq!(snap.player, PlayerView::default());
    }

    #[test]
    fn test_celebration_sprite() {
        let mut rng = Pcg32::seed_from_u64(3);
        let mut run = RunState::new(LevelId::MapleLeafRag, Track::MAPLE_LEAF_RAG, &mut rng);
        run.song_end_timer = 1;
        let snap = Snapshot::capture(GamePhase::Running, &run);
        assert_eq!(snap.player.sprite, PlayerSprite::Celebrating);

        run.hearts = 0;
        let snap = Snapshot::capture(GamePhase::Lost, &run);
        assert_eq!(snap.player.sprite, PlayerSprite::Normal);
    }

    #[test]
    fn test_snapshot_serializes() {
        let json = serde_json::to_string(&Snapshot::idle()).unwrap();
        assert!(json.contains("\"phase\":\"Idle\""));
        assert!(json.contains("\"level\":null"));
    }
}

//! Game loop orchestrator
//!
//! Owns the phase state machine, the seeded RNG and the current run. A host
//! calls [`Game::tick`] at the fixed tick rate with the action signal and
//! reads back the snapshot and the tick's tone events.

use rand::SeedableRng;
use rand_pcg::Pcg32;

use super::snapshot::Snapshot;
use super::state::{GamePhase, LevelId, RunState};
use super::tick::{self, RunOutcome, TickInput, TickOutput};
use super::track::Track;
use crate::audio::ToneSink;
use crate::error::GameError;

pub struct Game {
    seed: u64,
    rng: Pcg32,
    track: Track,
    phase: GamePhase,
    run: Option<RunState>,
    output: TickOutput,
    snapshot: Snapshot,
}

impl Game {
    /// Idle game with a fixed seed; the same seed and inputs replay a run
    /// exactly
    pub fn new(seed: u64) -> Self {
        Self::with_track(seed, Track::MAPLE_LEAF_RAG)
    }

    pub fn from_entropy() -> Self {
        Self::new(rand::random())
    }

    /// Idle game playing a custom chart
    pub fn with_track(seed: u64, track: Track) -> Self {
        Self {
            seed,
            rng: Pcg32::seed_from_u64(seed),
            track,
            phase: GamePhase::Idle,
            run: None,
            output: TickOutput::default(),
            snapshot: Snapshot::idle(),
        }
    }

    /// Begin a run. Only valid while idle.
    pub fn start(&mut self, level: LevelId) -> Result<(), GameError> {
        if self.phase != GamePhase::Idle {
            return Err(GameError::NotIdle { phase: self.phase });
        }
        let run = RunState::new(level, self.track, &mut self.rng);
        self.snapshot = Snapshot::capture(GamePhase::Running, &run);
        self.run = Some(run);
        self.phase = GamePhase::Running;
        self.output.clear();
        log::info!("Starting {} (seed {})", level.as_str(), self.seed);
        Ok(())
    }

    /// Drop the current run, whatever its phase, and go back to idle
    pub fn restart(&mut self) {
        if let Some(run) = self.run.take() {
            log::info!(
                "Restarting from {:?} on {} at beat {}",
                self.phase,
                run.level.as_str(),
                run.beat_counter
            );
        }
        self.phase = GamePhase::Idle;
        self.output.clear();
        self.snapshot = Snapshot::idle();
    }

    /// Advance one tick. A no-op (with empty output) unless running.
    pub fn tick(&mut self, action_held: bool) -> &TickOutput {
        self.output.clear();
        if self.phase != GamePhase::Running {
            return &self.output;
        }
        let Some(run) = self.run.as_mut() else {
            return &self.output;
        };

        let input = TickInput {
            action: action_held,
        };
        match tick::tick(run, &input, &mut self.rng, &mut self.output) {
            Some(RunOutcome::Lost) => self.phase = GamePhase::Lost,
            Some(RunOutcome::Completed) => self.phase = GamePhase::Completed,
            None => {}
        }
        self.snapshot = Snapshot::capture(self.phase, run);
        &self.output
    }

    /// Advance one tick and play its tones through `sink`
    pub fn tick_into<S: ToneSink + ?Sized>(&mut self, action_held: bool, sink: &mut S) -> GamePhase {
        self.tick(action_held);
        for tone in &self.output.tones {
            sink.emit(tone);
        }
        self.phase
    }

    pub fn phase(&self) -> GamePhase {
        self.phase
    }

    pub fn seed(&self) -> u64 {
        self.seed
    }

    /// Snapshot as of the end of the last tick
    pub fn snapshot(&self) -> &Snapshot {
        &self.snapshot
    }

    /// Output of the last tick
    pub fn output(&self) -> &TickOutput {
        &self.output
    }

    /// Current run, kept after it ends until `restart`
    pub fn run(&self) -> Option<&RunState> {
        self.run.as_ref()
    }

    /// Mutable access to the current run, for scripted setups. Changes show
    /// up in the snapshot after the next tick.
    pub fn run_mut(&mut self) -> Option<&mut RunState> {
        self.run.as_mut()
    }

    /// Completed with every heart filled
    pub fn is_perfect(&self) -> bool {
        self.phase == GamePhase::Completed && self.run.as_ref().is_some_and(RunState::is_perfect)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::audio::{ToneKind, ToneLog};
    use crate::consts::*;

    #[test]
    fn test_start_requires_idle() {
        let mut game = Game::new(1);
        assert_eq!(game.phase(), GamePhase::Idle);
        game.start(LevelId::MapleLeafRag).unwrap();
        assert_eq!(game.phase(), GamePhase::Running);
        assert_eq!(
            game.start(LevelId::PencilDrop),
            Err(GameError::NotIdle {
                phase: GamePhase::Running
            })
        );
    }

    #[test]
    fn test_idle_tick_is_noop() {
        let mut game = Game::new(1);
        let out = game.tick(true);
        assert!(out.tones.is_empty() && out.events.is_empty());
        assert_eq!(game.snapshot(), &Snapshot::idle());
        assert!(game.run().is_none());
    }

    #[test]
    fn test_restart_returns_to_idle() {
        let mut game = Game::new(2);
        game.start(LevelId::PencilDrop).unwrap();
        for _ in 0..50 {
            game.tick(false);
        }
        game.restart();
        assert_eq!(game.phase(), GamePhase::Idle);
        assert!(game.run().is_none());
        assert_eq!(game.snapshot().level, None);
        game.start(LevelId::MapleLeafRag).unwrap();
        assert_eq!(game.run().map(|r| r.hearts), Some(STARTING_HEARTS));
        assert_eq!(game.run().map(|r| r.time_ticks), Some(0));
    }

    #[test]
    fn test_snapshot_follows_ticks() {
        let mut game = Game::new(3);
        game.start(LevelId::MapleLeafRag).unwrap();
        for _ in 0..FRAMES_PER_NOTE {
            game.tick(false);
        }
        let snap = game.snapshot();
        assert_eq!(snap.tick, FRAMES_PER_NOTE as u64);
        assert_eq!(snap.beat, 1);
        assert_eq!(snap.hearts, STARTING_HEARTS);
        assert_eq!(snap.phase, GamePhase::Running);
    }

    #[test]
    fn test_tick_into_forwards_tones() {
        let mut game = Game::new(4);
        game.start(LevelId::MapleLeafRag).unwrap();
        let mut log = ToneLog::new();
        for _ in 0..(4 * FRAMES_PER_NOTE) {
            game.tick_into(false, &mut log);
        }
        // Beats 0..4 with beat 1 a rest
        assert_eq!(log.count(ToneKind::Melody), 3);
    }
}

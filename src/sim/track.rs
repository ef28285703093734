//! Track data: the Maple Leaf Rag melody and its obstacle map
//!
//! Both tables are indexed by beat. Lookups past the end of the track return
//! "nothing here" rather than panicking, so timer arithmetic can overshoot.

use serde::{Deserialize, Serialize};

/// Number of beats in the track
pub const TRACK_LEN: usize = 128;

/// A pitch as a PSG period value; 0 is a rest.
///
/// Lower values are higher pitches. The audio side converts with
/// [`ToneId::frequency_hz`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ToneId(pub u16);

impl ToneId {
    pub const REST: ToneId = ToneId(0);

    /// Clock of the programmable sound generator the periods are tuned for
    const PSG_CLOCK_HZ: f32 = 3_579_545.0;

    #[inline]
    pub fn is_rest(self) -> bool {
        self.0 == 0
    }

    /// Audible frequency, or 0 for a rest
    pub fn frequency_hz(self) -> f32 {
        if self.is_rest() {
            0.0
        } else {
            Self::PSG_CLOCK_HZ / (16.0 * self.0 as f32)
        }
    }

    /// Same note pushed flat by 1/16 of its period (the "wrong note" sound)
    #[inline]
    pub fn detuned(self) -> ToneId {
        ToneId(self.0.saturating_add(self.0 / 16))
    }
}

#[rustfmt::skip]
const MELODY: [u16; TRACK_LEN] = [
    1438,0,1077,539, 360,539,428,360, 1017,571,360,571, 480,360,807,0,
    1438,0,1077,539, 360,539,428,360, 1017,571,360,571, 480,360,807,0,
    1438,360,1357,539, 453,339,1438,360, 1438,360,1357,539, 453,339,1438,360,
    0,0,2155,2155, 1812,1077,2155,1077, 906,539,1077,539, 453,269,539,269,
    226,135,135,0, 135,0,135,0, 135,135,428,180, 160,214,180,160,
    428,269,453,240, 226,269,240,214, 428,269,214,269, 240,0,269,0,
    0,269,906,0, 269,0,269,0, 269,269,855,360, 320,428,360,320,
    855,539,906,480, 453,539,480,428, 855,539,428,539, 480,0,539,0,
];

#[rustfmt::skip]
const OBSTACLES: [u8; TRACK_LEN] = [
    0,0,0,0,0,0,0,0,0,0,1,0,0,0,0,0,
    0,0,0,0,1,0,0,0,0,0,1,0,0,0,0,0,
    0,1,0,1,0,0,0,0,0,1,0,0,0,0,0,1,
    0,0,0,0,0,1,0,0,0,0,0,0,1,0,0,0,
    0,0,0,0,1,0,1,0,0,0,0,0,1,0,0,0,
    0,0,1,0,1,0,0,0,0,0,0,1,0,0,0,0,
    0,1,0,1,0,0,0,0,0,1,0,0,0,0,0,0,
    1,0,1,0,0,0,0,0,0,1,0,0,0,0,0,0,
];

/// The melody and obstacle tables as one value, so tests can swap in a
/// custom chart.
#[derive(Debug, Clone, Copy)]
pub struct Track {
    melody: &'static [u16],
    obstacles: &'static [u8],
}

impl Track {
    /// The Maple Leaf Rag chart
    pub const MAPLE_LEAF_RAG: Track = Track {
        melody: &MELODY,
        obstacles: &OBSTACLES,
    };

    /// Build a track from raw tables. Both must have the same length.
    pub const fn new(melody: &'static [u16], obstacles: &'static [u8]) -> Option<Self> {
        if melody.len() != obstacles.len() {
            return None;
        }
        Some(Self { melody, obstacles })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.melody.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.melody.is_empty()
    }

    /// Tone for a beat; rests and out-of-range beats are both silent.
    pub fn tone(&self, beat: usize) -> ToneId {
        self.melody.get(beat).map_or(ToneId::REST, |&t| ToneId(t))
    }

    /// Whether an obstacle note belongs on this beat
    pub fn has_obstacle(&self, beat: usize) -> bool {
        self.obstacles.get(beat).is_some_and(|&bit| bit != 0)
    }

    /// Number of obstacle notes in the whole chart
    pub fn obstacle_count(&self) -> usize {
        self.obstacles.iter().filter(|&&bit| bit != 0).count()
    }
}

impl Default for Track {
    fn default() -> Self {
        Self::MAPLE_LEAF_RAG
    }
}

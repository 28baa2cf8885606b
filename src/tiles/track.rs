//! Animation tracks and the hold-frame policy.
//!
//! Tracks live in the arena of the tileset that authored them and are
//! addressed by [`TrackRef`]; tiles and cursors never copy frame data, so one
//! authored track is the single timing source for every tile using it.

use super::{LocalId, TilesetId};

/// Default duration at or above which a frame parks playback.
pub const DEFAULT_HOLD_THRESHOLD_MS: u32 = 10_000;

/// Decides which frame durations are hold frames.
///
/// The data has no explicit hold marker; a long duration is used as one. A
/// cutoff set too low turns ordinary slow frames into holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HoldPolicy {
    pub threshold_ms: u32,
    /// Treat a zero duration as "indefinite".
    pub zero_is_hold: bool,
}

impl Default for HoldPolicy {
    fn default() -> Self {
        Self {
            threshold_ms: DEFAULT_HOLD_THRESHOLD_MS,
            zero_is_hold: true,
        }
    }
}

impl HoldPolicy {
    pub fn is_hold(&self, duration_ms: u32) -> bool {
        duration_ms >= self.threshold_ms || (duration_ms == 0 && self.zero_is_hold)
    }
}

/// A single animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Frame {
    pub tile: LocalId,
    pub duration_ms: u32,
    pub hold: bool,
}

/// Index of a track in its tileset's arena.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TrackId(pub u32);

/// Non-owning handle to a track: owning tileset plus arena slot.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackRef {
    pub tileset: TilesetId,
    pub track: TrackId,
}

impl TrackRef {
    pub fn new(tileset: TilesetId, track: TrackId) -> Self {
        Self { tileset, track }
    }
}

/// Ordered, non-empty frame sequence. Loops unless it reaches a hold frame.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AnimationTrack {
    frames: Vec<Frame>,
    /// Sum of all frame durations when the track has no hold frame.
    period_ms: u64,
    has_hold: bool,
    hold_clamp_ms: u32,
}

impl AnimationTrack {
    /// Build a track from `(tile, duration)` pairs. Returns `None` when empty.
    pub fn new(frames: impl IntoIterator<Item = (LocalId, u32)>, policy: &HoldPolicy) -> Option<Self> {
        let frames: Vec<Frame> = frames
            .into_iter()
            .map(|(tile, duration_ms)| Frame {
                tile,
                duration_ms,
                hold: policy.is_hold(duration_ms),
            })
            .collect();
        if frames.is_empty() {
            return None;
        }
        let has_hold = frames.iter().any(|f| f.hold);
        let period_ms = frames.iter().map(|f| u64::from(f.duration_ms)).sum();
        Some(Self {
            frames,
            period_ms,
            has_hold,
            hold_clamp_ms: policy.threshold_ms,
        })
    }

    pub fn frames(&self) -> &[Frame] {
        &self.frames
    }

    pub fn len(&self) -> usize {
        self.frames.len()
    }

    /// Always false; tracks are non-empty by construction.
    pub fn is_empty(&self) -> bool {
        self.frames.is_empty()
    }

    pub fn frame(&self, index: usize) -> Option<&Frame> {
        self.frames.get(index)
    }

    pub fn has_hold(&self) -> bool {
        self.has_hold
    }

    /// Total duration of one loop, in milliseconds.
    pub fn period_ms(&self) -> u64 {
        self.period_ms
    }

    /// Value `elapsed_in_frame` is clamped to while parked on a hold frame.
    pub fn hold_clamp_ms(&self) -> u32 {
        self.hold_clamp_ms
    }

    pub fn contains_tile(&self, tile: LocalId) -> bool {
        self.frames.iter().any(|f| f.tile == tile)
    }
}

//! Per-instance animation state.
//!
//! [`AnimationCursor`] is the playback position of one instance inside a
//! shared [`AnimationTrack`]. [`AnimationController`] picks which tile (and
//! therefore which track) an instance should play from its [`Signals`].
//!
//! [`Signals`]: crate::components::signals::Signals

use bevy_ecs::prelude::Component;
use serde::{Deserialize, Serialize};

use crate::tiles::{AnimationTrack, LocalId, TilesetId, TrackRef};

#[derive(Debug, Clone, PartialEq, Eq, Component)]
pub struct AnimationCursor {
    pub track: TrackRef,
    pub frame_index: usize,
    pub elapsed_in_frame: u32,
    /// Set once the current hold frame has been announced.
    pub held_notified: bool,
}

impl AnimationCursor {
    pub fn new(track: TrackRef) -> Self {
        Self {
            track,
            frame_index: 0,
            elapsed_in_frame: 0,
            held_notified: false,
        }
    }

    /// Advance playback by `delta_ms` and return the tile now shown.
    ///
    /// `track` must be the track named by `self.track`. Tracks loop until a
    /// hold frame is reached; a hold frame parks the cursor until
    /// [`switch_track`](Self::switch_track). A call takes at most
    /// `track.len()` steps.
    pub fn advance(&mut self, track: &AnimationTrack, delta_ms: u32) -> LocalId {
        let frames = track.frames();
        let len = frames.len();
        if len == 0 {
            return 0;
        }
        if self.frame_index >= len {
            self.frame_index = 0;
            self.elapsed_in_frame = 0;
        }

        // all-zero track: one frame per call
        if !track.has_hold() && track.period_ms() == 0 {
            self.frame_index = (self.frame_index + 1) % len;
            self.elapsed_in_frame = 0;
            return frames[self.frame_index].tile;
        }

        let mut elapsed = u64::from(self.elapsed_in_frame) + u64::from(delta_ms);
        if !track.has_hold() {
            elapsed %= track.period_ms();
        }

        for _ in 0..len {
            let frame = &frames[self.frame_index];
            if frame.hold {
                elapsed = elapsed.min(u64::from(track.hold_clamp_ms()));
                break;
            }
            let duration = u64::from(frame.duration_ms);
            if elapsed < duration {
                break;
            }
            elapsed -= duration;
            self.frame_index = (self.frame_index + 1) % len;
        }

        self.elapsed_in_frame = u32::try_from(elapsed).unwrap_or(u32::MAX);
        frames[self.frame_index].tile
    }

    /// Restart playback from the first frame of `track`.
    pub fn switch_track(&mut self, track: TrackRef) {
        self.track = track;
        self.frame_index = 0;
        self.elapsed_in_frame = 0;
        self.held_notified = false;
    }

    pub fn current_tile(&self, track: &AnimationTrack) -> Option<LocalId> {
        track.frame(self.frame_index).map(|f| f.tile)
    }

    pub fn is_holding(&self, track: &AnimationTrack) -> bool {
        track.frame(self.frame_index).is_some_and(|f| f.hold)
    }
}

// Animation Controller Component

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CmpOp {
    Lt,
    Le,
    Gt,
    Ge,
    Eq,
    Ne,
}

impl CmpOp {
    pub fn compare<T: PartialOrd>(self, lhs: T, rhs: T) -> bool {
        match self {
            CmpOp::Lt => lhs < rhs,
            CmpOp::Le => lhs <= rhs,
            CmpOp::Gt => lhs > rhs,
            CmpOp::Ge => lhs >= rhs,
            CmpOp::Eq => lhs == rhs,
            CmpOp::Ne => lhs != rhs,
        }
    }

    /// Like [`compare`](Self::compare), but `Eq`/`Ne` treat values closer
    /// than `f32::EPSILON` as equal.
    pub fn compare_scalar(self, lhs: f32, rhs: f32) -> bool {
        match self {
            CmpOp::Eq => (lhs - rhs).abs() < f32::EPSILON,
            CmpOp::Ne => (lhs - rhs).abs() >= f32::EPSILON,
            op => op.compare(lhs, rhs),
        }
    }
}

/// Condition over an entity's signals.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Condition {
    ScalarCmp { key: String, op: CmpOp, value: f32 },
    IntegerCmp { key: String, op: CmpOp, value: i32 },
    HasFlag { key: String },
    LacksFlag { key: String },
    All(Vec<Condition>),
    Any(Vec<Condition>),
    Not(Box<Condition>),
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnimRule {
    pub when: Condition,
    /// Tile to show when `when` holds; its animation, if any, is played.
    pub tile: LocalId,
}

/// State machine selecting the tile an instance shows.
///
/// Rules are checked in order; the first match wins, otherwise `fallback`.
/// Target tiles belong to `tileset`, even while the instance plays a track
/// borrowed from another tileset.
#[derive(Debug, Clone, Component)]
pub struct AnimationController {
    pub tileset: TilesetId,
    pub current: LocalId,
    pub rules: Vec<AnimRule>,
    pub fallback: LocalId,
}

impl AnimationController {
    pub fn new(tileset: impl Into<TilesetId>, fallback: LocalId) -> Self {
        Self {
            tileset: tileset.into(),
            current: fallback,
            rules: Vec::new(),
            fallback,
        }
    }

    pub fn with_rule(mut self, when: Condition, tile: LocalId) -> Self {
        self.rules.push(AnimRule { when, tile });
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tiles::{HoldPolicy, TilesetId, TrackId};

    fn cursor() -> AnimationCursor {
        AnimationCursor::new(TrackRef::new(TilesetId::from("t.json"), TrackId(0)))
    }

    fn track(frames: &[(LocalId, u32)]) -> AnimationTrack {
        AnimationTrack::new(frames.iter().copied(), &HoldPolicy::default()).unwrap()
    }

    #[test]
    fn test_advance_reaches_hold_and_stays() {
        let track = track(&[(10, 200), (11, 10_000)]);
        let mut c = cursor();
        assert_eq!(c.advance(&track, 150), 10);
        assert_eq!(c.advance(&track, 100), 11);
        assert_eq!(c.elapsed_in_frame, 50);
        for _ in 0..20 {
            assert_eq!(c.advance(&track, 5_000), 11);
        }
        assert_eq!(c.elapsed_in_frame, 10_000);
        assert!(c.is_holding(&track));
    }

    #[test]
    fn test_advance_loops() {
        let track = track(&[(1, 100), (2, 100), (3, 100)]);
        let mut c = cursor();
        assert_eq!(c.advance(&track, 100), 2);
        assert_eq!(c.advance(&track, 199), 3);
        assert_eq!(c.advance(&track, 1), 1);
        assert_eq!(c.frame_index, 0);
    }

    #[test]
    fn test_large_delta_removes_whole_periods() {
        let track = track(&[(1, 100), (2, 50)]);
        let mut c = cursor();
        assert_eq!(c.advance(&track, u32::MAX), {
            let rem = u64::from(u32::MAX) % 150;
            if rem < 100 { 1 } else { 2 }
        });
        assert!(c.elapsed_in_frame < 100);
    }

    #[test]
    fn test_all_zero_track_steps_once_per_call() {
        let policy = HoldPolicy {
            zero_is_hold: false,
            ..HoldPolicy::default()
        };
        let track = AnimationTrack::new([(4, 0), (5, 0), (6, 0)], &policy).unwrap();
        let mut c = cursor();
        assert_eq!(c.advance(&track, 0), 5);
        assert_eq!(c.advance(&track, 1_000), 6);
        assert_eq!(c.advance(&track, 0), 4);
    }

    #[test]
    fn test_zero_duration_hold_by_default() {
        let track = track(&[(7, 30), (8, 0)]);
        let mut c = cursor();
        assert_eq!(c.advance(&track, 31), 8);
        assert_eq!(c.advance(&track, 100_000), 8);
        assert!(c.elapsed_in_frame <= 10_000);
    }

    #[test]
    fn test_switch_track_resets() {
        let track = track(&[(1, 10), (2, 10_000)]);
        let mut c = cursor();
        c.advance(&track, 50);
        let other = TrackRef::new(TilesetId::from("u.json"), TrackId(3));
        c.switch_track(other.clone());
        assert_eq!(c.track, other);
        assert_eq!(c.frame_index, 0);
        assert_eq!(c.elapsed_in_frame, 0);
        assert!(!c.held_notified);
    }

    #[test]
    fn test_cmp_op() {
        assert!(CmpOp::Lt.compare(1, 2));
        assert!(CmpOp::Ge.compare(2.0, 2.0));
        assert!(CmpOp::Ne.compare(1, 2));
        assert!(!CmpOp::Eq.compare(1, 2));
    }

    #[test]
    fn test_scalar_eq_tolerates_rounding() {
        let nearly = 0.25 + f32::EPSILON / 4.0;
        assert_ne!(nearly, 0.25);
        assert!(CmpOp::Eq.compare_scalar(nearly, 0.25));
        assert!(!CmpOp::Ne.compare_scalar(nearly, 0.25));
        assert!(CmpOp::Ne.compare_scalar(0.5, 0.25));
        assert!(CmpOp::Lt.compare_scalar(0.25, 0.5));
    }

    #[test]
    fn test_controller_builder() {
        let ctrl = AnimationController::new("actors/yellow.json", 0).with_rule(
            Condition::HasFlag {
                key: "attacking".into(),
            },
            9,
        );
        assert_eq!(ctrl.current, 0);
        assert_eq!(ctrl.rules[0].tile, 9);
    }
}

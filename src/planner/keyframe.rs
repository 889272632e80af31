//! Keyframe-snap optimization for cut start points
//!
//! When the source was encoded with a fixed keyframe interval, moving a
//! start onto that grid keeps a stream-copy cut from beginning mid-GOP.
//! Stop points are never snapped; only where a cut *begins* matters.

use tracing::debug;

use crate::error::{CutSplitError, CutSplitResult};
use crate::timestamp::{SeekPoint, SubSecondTime};

/// Safety margin subtracted after snapping, in seconds.
///
/// Landing a hair before the keyframe rather than on it keeps the tool
/// from pulling the boundary frame into the wrong segment. The value is a
/// heuristic carried over unchanged; nothing derives it.
pub const DEFAULT_SNAP_MARGIN_SECS: f64 = 0.1;

/// Keyframe interval configuration, set once at startup and read-only
/// thereafter.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyframeConfig {
    interval_secs: f64,
    margin_secs: f64,
}

impl KeyframeConfig {
    /// Create a config with the default snap margin.
    pub fn new(interval_secs: f64) -> CutSplitResult<Self> {
        Self::with_margin(interval_secs, DEFAULT_SNAP_MARGIN_SECS)
    }

    /// Create a config with an explicit snap margin.
    ///
    /// A zero or negative interval is a configuration error, not a
    /// runtime one.
    pub fn with_margin(interval_secs: f64, margin_secs: f64) -> CutSplitResult<Self> {
        if interval_secs <= 0.0 {
            return Err(CutSplitError::Configuration {
                message: format!("keyframe interval must be positive, got {}", interval_secs),
            });
        }
        if margin_secs < 0.0 {
            return Err(CutSplitError::Configuration {
                message: format!("snap margin must not be negative, got {}", margin_secs),
            });
        }
        Ok(Self {
            interval_secs,
            margin_secs,
        })
    }

    /// Keyframe interval in seconds.
    pub fn interval_secs(&self) -> f64 {
        self.interval_secs
    }

    /// Snap a seconds value to the keyframe grid.
    ///
    /// Moves to whichever grid point is nearer, rounds to a whole second,
    /// then backs off by the margin.
    pub fn snap_seconds(&self, seconds: f64) -> f64 {
        let k = self.interval_secs;
        let diff = seconds % k;
        let snapped = if diff > k / 2.0 {
            seconds + (k - diff)
        } else {
            seconds - diff
        };
        snapped.round() - self.margin_secs
    }

    /// Snap a start timestamp, recomposing it as a total-seconds decimal.
    ///
    /// The result can only move the start of a segment, so a snap that
    /// would land before the head of the file clamps to zero.
    pub fn snap_start(&self, start: &SubSecondTime) -> SeekPoint {
        let adjusted = self.snap_seconds(start.seconds_component());
        let total =
            start.hours() as f64 * 3600.0 + start.minutes() as f64 * 60.0 + adjusted;
        let total = total.max(0.0);
        debug!("Snapped start {} -> {}s (interval {}s)", start, total, self.interval_secs);
        SeekPoint::Seconds(total)
    }
}

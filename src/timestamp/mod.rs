//! Timestamp parsing and conversion
//!
//! Two textual time forms appear in editorial input: frame-indexed
//! `HH:MM:SS:FF` stamps (EDL files, relative to a frame rate) and
//! sub-second `HH:MM:SS.mmm` stamps (split files, and what ffmpeg
//! consumes for `-ss`/`-to`).

use std::fmt;
use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

use crate::error::{CutSplitError, CutSplitResult};

/// Frame rate assumed when the input does not specify one.
pub const DEFAULT_FRAME_RATE: f64 = 60.0;

fn frame_stamp_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2,}):(\d{2}):(\d{2}):(\d{2,})$").unwrap())
}

fn sub_second_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(\d{2,}):(\d{2}):(\d{2})(?:\.(\d{1,3}))?$").unwrap())
}

fn parse_field(digits: &str, stamp: &str) -> CutSplitResult<u32> {
    digits
        .parse()
        .map_err(|_| CutSplitError::InvalidTimestamp {
            text: stamp.to_string(),
        })
}

/// A frame-indexed timestamp: `HH:MM:SS:FF` relative to a frame rate.
#[derive(Debug, Clone, PartialEq)]
pub struct FrameTimestamp {
    hours: u32,
    minutes: u32,
    seconds: u32,
    frame: u32,
    rate: f64,
}

impl FrameTimestamp {
    /// Parse `HH:MM:SS:FF` text against the given frame rate.
    ///
    /// The frame index must be below the frame rate; anything else is a
    /// malformed stamp, not a runtime condition.
    pub fn parse(text: &str, rate: f64) -> CutSplitResult<Self> {
        let caps = frame_stamp_pattern()
            .captures(text.trim())
            .ok_or_else(|| CutSplitError::InvalidTimestamp {
                text: text.to_string(),
            })?;

        // The pattern admits arbitrarily wide hour and frame fields, so a
        // parse can still overflow; that is malformed input, not a panic.
        let hours = parse_field(&caps[1], text)?;
        let minutes = parse_field(&caps[2], text)?;
        let seconds = parse_field(&caps[3], text)?;
        let frame = parse_field(&caps[4], text)?;

        if (frame as f64) >= rate {
            return Err(CutSplitError::InvalidTimestamp {
                text: text.to_string(),
            });
        }

        Ok(Self {
            hours,
            minutes,
            seconds,
            frame,
            rate,
        })
    }

    /// Convert the frame index to milliseconds, keeping the clock fields.
    ///
    /// Milliseconds are `round(1000/rate * frame)`; with `frame < rate`
    /// this always lands below 1000.
    pub fn to_sub_second(&self) -> SubSecondTime {
        let millis = (1000.0 / self.rate * self.frame as f64).round() as u32;
        SubSecondTime {
            hours: self.hours,
            minutes: self.minutes,
            seconds: self.seconds,
            millis,
        }
    }

    /// Frame rate this stamp was parsed against.
    pub fn rate(&self) -> f64 {
        self.rate
    }
}

impl fmt::Display for FrameTimestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}:{:02}",
            self.hours, self.minutes, self.seconds, self.frame
        )
    }
}

/// A sub-second timestamp: `HH:MM:SS.mmm`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubSecondTime {
    hours: u32,
    minutes: u32,
    seconds: u32,
    millis: u32,
}

impl SubSecondTime {
    /// The zero point of the timeline, `00:00:00.000`.
    pub fn zero() -> Self {
        Self {
            hours: 0,
            minutes: 0,
            seconds: 0,
            millis: 0,
        }
    }

    /// Parse `HH:MM:SS.mmm` text. The fractional field is optional and
    /// may carry one to three digits.
    pub fn parse(text: &str) -> CutSplitResult<Self> {
        let caps = sub_second_pattern()
            .captures(text.trim())
            .ok_or_else(|| CutSplitError::InvalidTimestamp {
                text: text.to_string(),
            })?;

        let hours = parse_field(&caps[1], text)?;
        let minutes = parse_field(&caps[2], text)?;
        let seconds = parse_field(&caps[3], text)?;
        let millis = match caps.get(4) {
            Some(frac) => {
                let digits = frac.as_str();
                let value = parse_field(digits, text)?;
                // ".5" means 500 ms, ".05" means 50 ms
                value * 10u32.pow(3 - digits.len() as u32)
            }
            None => 0,
        };

        Ok(Self {
            hours,
            minutes,
            seconds,
            millis,
        })
    }

    /// The seconds field including the fractional part, e.g. `03.400` -> 3.4.
    pub fn seconds_component(&self) -> f64 {
        self.seconds as f64 + self.millis as f64 / 1000.0
    }

    /// Hours component.
    pub fn hours(&self) -> u32 {
        self.hours
    }

    /// Minutes component.
    pub fn minutes(&self) -> u32 {
        self.minutes
    }

    /// Total position on the timeline in seconds.
    pub fn total_seconds(&self) -> f64 {
        self.hours as f64 * 3600.0 + self.minutes as f64 * 60.0 + self.seconds_component()
    }
}

impl fmt::Display for SubSecondTime {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{:02}:{:02}:{:02}.{:03}",
            self.hours, self.minutes, self.seconds, self.millis
        )
    }
}

impl Serialize for SubSecondTime {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// A resolved cut point in the form handed to the media tool.
///
/// Cut points start life as clock times; the keyframe optimizer rewrites
/// starts into a bare total-seconds decimal.
#[derive(Debug, Clone, PartialEq)]
pub enum SeekPoint {
    /// `HH:MM:SS.mmm` clock time
    Clock(SubSecondTime),
    /// Total seconds from the head of the file, e.g. `119.9`
    Seconds(f64),
}

impl SeekPoint {
    /// Position in seconds, regardless of representation.
    pub fn total_seconds(&self) -> f64 {
        match self {
            SeekPoint::Clock(ts) => ts.total_seconds(),
            SeekPoint::Seconds(secs) => *secs,
        }
    }
}

impl fmt::Display for SeekPoint {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SeekPoint::Clock(ts) => ts.fmt(f),
            SeekPoint::Seconds(secs) => write!(f, "{}", secs),
        }
    }
}

impl Serialize for SeekPoint {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_frame_timestamp() {
        let ts = FrameTimestamp::parse("00:00:10:03", 60.0).unwrap();
        assert_eq!(ts.to_string(), "00:00:10:03");
        assert_eq!(ts.rate(), 60.0);
    }

    #[test]
    fn parse_frame_timestamp_wide_hours() {
        // EDLs for long recordings carry 3-digit hour fields
        let ts = FrameTimestamp::parse("100:59:59:59", 60.0).unwrap();
        assert_eq!(ts.to_string(), "100:59:59:59");
    }

    #[test]
    fn reject_malformed_frame_timestamp() {
        assert!(FrameTimestamp::parse("00:00:10", 60.0).is_err());
        assert!(FrameTimestamp::parse("0:00:10:03", 60.0).is_err());
        assert!(FrameTimestamp::parse("00:00:10.500", 60.0).is_err());
        assert!(FrameTimestamp::parse("garbage", 60.0).is_err());
    }

    #[test]
    fn overflowing_fields_are_format_errors_not_panics() {
        // wide hour/frame fields can exceed u32; still malformed input
        let err = FrameTimestamp::parse("9999999999:00:00:00", 60.0).unwrap_err();
        assert!(matches!(err, CutSplitError::InvalidTimestamp { .. }));

        let err = FrameTimestamp::parse("00:00:00:9999999999", 60.0).unwrap_err();
        assert!(matches!(err, CutSplitError::InvalidTimestamp { .. }));

        let err = SubSecondTime::parse("9999999999:00:00.000").unwrap_err();
        assert!(matches!(err, CutSplitError::InvalidTimestamp { .. }));
    }

    #[test]
    fn reject_frame_index_at_or_above_rate() {
        assert!(FrameTimestamp::parse("00:00:10:60", 60.0).is_err());
        assert!(FrameTimestamp::parse("00:00:10:75", 60.0).is_err());
        // 59 is the last valid index at 60 fps
        assert!(FrameTimestamp::parse("00:00:10:59", 60.0).is_ok());
    }

    #[test]
    fn frame_to_sub_second_conversion() {
        // round(1000/60 * 3) = 50
        let ts = FrameTimestamp::parse("00:00:10:03", 60.0).unwrap();
        assert_eq!(ts.to_sub_second().to_string(), "00:00:10.050");

        // round(1000/30 * 7) = 233
        let ts = FrameTimestamp::parse("01:02:03:07", 30.0).unwrap();
        assert_eq!(ts.to_sub_second().to_string(), "01:02:03.233");

        // frame 0 pads to .000
        let ts = FrameTimestamp::parse("00:10:00:00", 60.0).unwrap();
        assert_eq!(ts.to_sub_second().to_string(), "00:10:00.000");
    }

    #[test]
    fn conversion_millis_stay_below_1000() {
        // the largest frame index at 24 fps: round(1000/24 * 23) = 958
        let ts = FrameTimestamp::parse("00:00:01:23", 24.0).unwrap();
        assert_eq!(ts.to_sub_second().to_string(), "00:00:01.958");
    }

    #[test]
    fn parse_sub_second_time() {
        let ts = SubSecondTime::parse("00:02:03.400").unwrap();
        assert_eq!(ts.seconds_component(), 3.4);
        assert_eq!(ts.total_seconds(), 123.4);
        assert_eq!(ts.to_string(), "00:02:03.400");
    }

    #[test]
    fn parse_sub_second_short_fraction() {
        assert_eq!(SubSecondTime::parse("00:00:01.5").unwrap().to_string(), "00:00:01.500");
        assert_eq!(SubSecondTime::parse("00:00:01.05").unwrap().to_string(), "00:00:01.050");
        assert_eq!(SubSecondTime::parse("00:00:01").unwrap().to_string(), "00:00:01.000");
    }

    #[test]
    fn reject_malformed_sub_second_time() {
        assert!(SubSecondTime::parse("00:00").is_err());
        assert!(SubSecondTime::parse("00:00:01.1234").is_err());
        assert!(SubSecondTime::parse("00:00:01:05").is_err());
    }

    #[test]
    fn seek_point_display() {
        let clock = SeekPoint::Clock(SubSecondTime::parse("00:00:10.050").unwrap());
        assert_eq!(clock.to_string(), "00:00:10.050");

        let secs = SeekPoint::Seconds(119.9);
        assert_eq!(secs.to_string(), "119.9");
    }

    #[test]
    fn seek_point_total_seconds() {
        let clock = SeekPoint::Clock(SubSecondTime::parse("00:02:03.400").unwrap());
        assert!((clock.total_seconds() - 123.4).abs() < 1e-9);
        assert_eq!(SeekPoint::Seconds(119.9).total_seconds(), 119.9);
    }
}

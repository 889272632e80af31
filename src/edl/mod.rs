//! EDL (editorial decision log) reading
//!
//! An EDL line carries up to four timestamps: source in/out followed by
//! record in/out. Only the first pair matters here; it is the range on the
//! record timeline that gets extracted.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::error::{CutSplitError, CutSplitResult};
use crate::timestamp::FrameTimestamp;

/// A (start, stop) pair lifted from one EDL line.
#[derive(Debug, Clone)]
pub struct FrameCutRange {
    pub start: FrameTimestamp,
    pub stop: FrameTimestamp,
}

fn timestamp_token_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"\d{2,}:\d{2}:\d{2}:\d{2,}").unwrap())
}

/// Scan an EDL file for cut ranges, in file order.
///
/// A line contributes a range only when it carries at least two
/// timestamp-shaped tokens; the first two are taken as (start, stop) and
/// any further tokens are ignored. Lines with fewer matches are header or
/// comment lines and are skipped silently. An empty result is valid here;
/// rejecting it is the planner's call.
pub fn read_cut_list(path: &Path, rate: f64) -> CutSplitResult<Vec<FrameCutRange>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);
    let pattern = timestamp_token_pattern();

    let mut ranges = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let tokens: Vec<&str> = pattern.find_iter(&line).map(|m| m.as_str()).collect();
        if tokens.len() < 2 {
            debug!("Skipping EDL line without a timestamp pair: {}", line);
            continue;
        }

        let start = FrameTimestamp::parse(tokens[0], rate)?;
        let stop = FrameTimestamp::parse(tokens[1], rate)?;
        // a backwards range would hand ffmpeg a negative duration; fail
        // here rather than mid-extraction
        if stop.to_sub_second().total_seconds() < start.to_sub_second().total_seconds() {
            return Err(CutSplitError::InvalidRange {
                start: start.to_string(),
                stop: stop.to_string(),
            });
        }

        info!("Cut range added: {} to {}", start, stop);
        ranges.push(FrameCutRange { start, stop });
    }

    Ok(ranges)
}

//! Segment planning module
//!
//! Turns a timestamp list (EDL cut ranges or split points) into an ordered
//! list of extraction jobs for the engine. Planning is pure bookkeeping:
//! nothing here touches the media tool.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::{debug, info};

use crate::edl;
use crate::error::{CutSplitError, CutSplitResult};
use crate::timestamp::{SeekPoint, SubSecondTime};

pub mod keyframe;

pub use keyframe::{KeyframeConfig, DEFAULT_SNAP_MARGIN_SECS};

/// Fallback container extension when the output path carries none.
const DEFAULT_EXTENSION: &str = "mp4";

/// One segment to extract: a half-open time range on the source timeline.
///
/// A `None` stop means "to end of file" (the trailing segment in split
/// mode).
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CutRange {
    pub start: SeekPoint,
    pub stop: Option<SeekPoint>,
}

/// A planned extraction, consumed exactly once by the engine.
#[derive(Debug, Clone, Serialize)]
pub struct SegmentJob {
    /// Source media file
    pub source: PathBuf,
    /// Where the extracted segment lands
    pub output: PathBuf,
    /// Time range to extract
    pub range: CutRange,
    /// Whether the start was snapped to the keyframe grid
    pub optimized: bool,
}

/// Planner configuration, assembled once at startup.
#[derive(Debug, Clone)]
pub struct PlannerConfig {
    /// Frame rate used to interpret HH:MM:SS:FF stamps
    pub frame_rate: f64,
    /// Keyframe snapping; `None` leaves starts untouched
    pub keyframe: Option<KeyframeConfig>,
    /// Directory for intermediate segment files (EDL mode)
    pub temp_dir: PathBuf,
}

/// Segment planner for both entry modes.
pub struct SegmentPlanner {
    config: PlannerConfig,
}

impl SegmentPlanner {
    /// Create a planner from configuration.
    pub fn new(config: PlannerConfig) -> Self {
        Self { config }
    }

    /// Plan extraction jobs from an EDL file.
    ///
    /// Fails with `NoSegments` when the EDL yields zero usable ranges;
    /// extraction must not start in that case.
    pub fn plan_edl_cuts(
        &self,
        edl_path: &Path,
        source: &Path,
        outfile: &Path,
    ) -> CutSplitResult<Vec<SegmentJob>> {
        ensure_readable(source)?;

        let ranges = edl::read_cut_list(edl_path, self.config.frame_rate)?;
        if ranges.is_empty() {
            return Err(CutSplitError::NoSegments {
                path: edl_path.display().to_string(),
            });
        }

        let ext = extension_of(outfile);
        let stem = file_stem_of(outfile);

        let mut jobs = Vec::with_capacity(ranges.len());
        for (index, range) in ranges.iter().enumerate() {
            let start = range.start.to_sub_second();
            let stop = range.stop.to_sub_second();
            let (start, optimized) = self.resolve_start(start);

            let output = self
                .config
                .temp_dir
                .join(format!("{}_tmp_{}.{}", stem, index + 1, ext));

            info!(
                "Planned segment {}: {} -> {} into {}",
                index + 1,
                start,
                stop,
                output.display()
            );

            jobs.push(SegmentJob {
                source: source.to_path_buf(),
                output,
                range: CutRange {
                    start,
                    stop: Some(SeekPoint::Clock(stop)),
                },
                optimized,
            });
        }

        Ok(jobs)
    }

    /// Plan extraction jobs from a split-point file.
    ///
    /// Consecutive ranges share boundaries: each start is the previous
    /// stop, the first start is the head of the file, and the final range
    /// runs open-ended to EOF. Output names are `<outbase><n>.<ext>`,
    /// one-indexed, the trailing open-ended segment numbered one past the
    /// last split.
    pub fn plan_split_points(
        &self,
        splits_path: &Path,
        source: &Path,
        outbase: &Path,
    ) -> CutSplitResult<Vec<SegmentJob>> {
        ensure_readable(source)?;

        let points = read_split_points(splits_path)?;
        let ext = extension_of(outbase);
        let base = base_without_extension(outbase);

        let mut jobs = Vec::with_capacity(points.len() + 1);
        let mut cursor = SubSecondTime::zero();

        for (index, point) in points.iter().enumerate() {
            let (start, optimized) = self.resolve_start(cursor.clone());
            let output = numbered_output(&base, index + 1, &ext);

            info!(
                "Planned split {}: {} -> {} into {}",
                index + 1,
                start,
                point,
                output.display()
            );

            jobs.push(SegmentJob {
                source: source.to_path_buf(),
                output,
                range: CutRange {
                    start,
                    stop: Some(SeekPoint::Clock(point.clone())),
                },
                optimized,
            });
            cursor = point.clone();
        }

        // Trailing segment runs from the last split point to EOF
        let (start, optimized) = self.resolve_start(cursor);
        let output = numbered_output(&base, points.len() + 1, &ext);
        info!(
            "Planned split {}: {} -> EOF into {}",
            points.len() + 1,
            start,
            output.display()
        );
        jobs.push(SegmentJob {
            source: source.to_path_buf(),
            output,
            range: CutRange { start, stop: None },
            optimized,
        });

        Ok(jobs)
    }

    /// Apply keyframe snapping to a start point when configured.
    fn resolve_start(&self, start: SubSecondTime) -> (SeekPoint, bool) {
        match &self.config.keyframe {
            Some(cfg) => (cfg.snap_start(&start), true),
            None => (SeekPoint::Clock(start), false),
        }
    }
}

/// Read split points, one `HH:MM:SS.mmm` stamp per line.
///
/// Blank lines are tolerated. Ordering is taken on faith: the format
/// promises strictly increasing stamps and this reader does not verify it.
pub fn read_split_points(path: &Path) -> CutSplitResult<Vec<SubSecondTime>> {
    let file = File::open(path)?;
    let reader = BufReader::new(file);

    let mut points = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let trimmed = line.trim();
        if trimmed.is_empty() {
            continue;
        }
        let point = SubSecondTime::parse(trimmed)?;
        debug!("Split point: {}", point);
        points.push(point);
    }

    Ok(points)
}

fn ensure_readable(source: &Path) -> CutSplitResult<()> {
    // Surfaces a missing/unreadable source before any planning output
    std::fs::metadata(source)?;
    Ok(())
}

fn extension_of(path: &Path) -> String {
    path.extension()
        .map(|ext| ext.to_string_lossy().into_owned())
        .unwrap_or_else(|| DEFAULT_EXTENSION.to_string())
}

fn file_stem_of(path: &Path) -> String {
    path.file_stem()
        .map(|stem| stem.to_string_lossy().into_owned())
        .unwrap_or_else(|| "out".to_string())
}

fn base_without_extension(path: &Path) -> PathBuf {
    match path.parent() {
        Some(parent) => parent.join(file_stem_of(path)),
        None => PathBuf::from(file_stem_of(path)),
    }
}

fn numbered_output(base: &Path, number: usize, ext: &str) -> PathBuf {
    let mut name = base.as_os_str().to_os_string();
    name.push(format!("{}.{}", number, ext));
    PathBuf::from(name)
}

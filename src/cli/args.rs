//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

use crate::planner::DEFAULT_SNAP_MARGIN_SECS;
use crate::timestamp::DEFAULT_FRAME_RATE;

/// Arguments for the cut command
#[derive(Args, Debug)]
pub struct CutArgs {
    /// EDL file with From and To timestamps (HH:MM:SS:FF) per line
    #[arg(short, long)]
    pub edl: PathBuf,

    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Output video file path
    #[arg(short, long)]
    pub output: PathBuf,

    /// Directory for intermediate segment files
    #[arg(short, long, default_value = ".")]
    pub temp_dir: PathBuf,

    /// Keyframe interval in seconds; cuts snap onto this grid
    /// (OBS default is one keyframe every 2 seconds)
    #[arg(short = 'k', long)]
    pub keyframe_interval: Option<f64>,

    /// Safety margin subtracted after a keyframe snap, in seconds
    #[arg(long, default_value_t = DEFAULT_SNAP_MARGIN_SECS)]
    pub snap_margin: f64,

    /// Frame rate used to interpret EDL frame indices
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    pub fps: f64,

    /// Print the planned segments as JSON without invoking ffmpeg
    #[arg(long)]
    pub dry_run: bool,
}

/// Arguments for the split command
#[derive(Args, Debug)]
pub struct SplitArgs {
    /// Split-point file, one HH:MM:SS.mmm timestamp per line
    #[arg(short, long)]
    pub splits: PathBuf,

    /// Input video file path
    #[arg(short, long)]
    pub input: PathBuf,

    /// Base name for the numbered output files
    #[arg(short, long)]
    pub output_base: PathBuf,

    /// Keyframe interval in seconds; cuts snap onto this grid
    #[arg(short = 'k', long)]
    pub keyframe_interval: Option<f64>,

    /// Safety margin subtracted after a keyframe snap, in seconds
    #[arg(long, default_value_t = DEFAULT_SNAP_MARGIN_SECS)]
    pub snap_margin: f64,

    /// Frame rate used to interpret EDL frame indices
    #[arg(long, default_value_t = DEFAULT_FRAME_RATE)]
    pub fps: f64,

    /// Print the planned segments as JSON without invoking ffmpeg
    #[arg(long)]
    pub dry_run: bool,
}

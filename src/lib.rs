//! cutsplit library
//!
//! An EDL-driven lossless video cutter and splitter. The core turns an
//! editorial timestamp list into precisely bounded stream-copy extraction
//! jobs and recombines the results into a single output file; ffmpeg does
//! the byte-level work as an external collaborator.

pub mod cli;
pub mod edl;
pub mod engine;
pub mod error;
pub mod planner;
pub mod timestamp;

// Re-export commonly used types
pub use engine::{FfmpegTool, MediaTool, SegmentRunner};
pub use error::{CutSplitError, CutSplitResult};
pub use planner::{CutRange, KeyframeConfig, PlannerConfig, SegmentJob, SegmentPlanner};
pub use timestamp::{FrameTimestamp, SeekPoint, SubSecondTime, DEFAULT_FRAME_RATE};

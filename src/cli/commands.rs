//! Command implementations

use anyhow::{Context, Result};
use tracing::info;

use crate::cli::args::{CutArgs, SplitArgs};
use crate::engine::{FfmpegTool, SegmentRunner};
use crate::error::CutSplitResult;
use crate::planner::{KeyframeConfig, PlannerConfig, SegmentJob, SegmentPlanner};

/// Execute the cut command: EDL ranges extracted and joined into one file.
pub fn cut(args: CutArgs) -> Result<()> {
    info!("Starting cut operation");
    info!("EDL: {}", args.edl.display());
    info!("Input: {}", args.input.display());
    info!("Output: {}", args.output.display());

    let config = PlannerConfig {
        frame_rate: args.fps,
        keyframe: keyframe_config(args.keyframe_interval, args.snap_margin)?,
        temp_dir: args.temp_dir.clone(),
    };

    let planner = SegmentPlanner::new(config);
    let jobs = planner
        .plan_edl_cuts(&args.edl, &args.input, &args.output)
        .context("Failed to plan segments from EDL")?;

    info!("Planned {} segment(s)", jobs.len());

    if args.dry_run {
        print_plan(&jobs)?;
        return Ok(());
    }

    let tool = FfmpegTool::new();
    let runner = SegmentRunner::new(&tool);
    runner
        .run(&jobs, &args.output)
        .context("Failed to extract and join segments")?;

    info!("Cut operation completed successfully");
    Ok(())
}

/// Execute the split command: the source carved into numbered standalone
/// files, no join pass.
pub fn split(args: SplitArgs) -> Result<()> {
    info!("Starting split operation");
    info!("Splits: {}", args.splits.display());
    info!("Input: {}", args.input.display());
    info!("Output base: {}", args.output_base.display());

    let config = PlannerConfig {
        frame_rate: args.fps,
        keyframe: keyframe_config(args.keyframe_interval, args.snap_margin)?,
        // split outputs are final files, no temp staging involved
        temp_dir: std::env::temp_dir(),
    };

    let planner = SegmentPlanner::new(config);
    let jobs = planner
        .plan_split_points(&args.splits, &args.input, &args.output_base)
        .context("Failed to plan segments from split points")?;

    info!("Planned {} segment(s)", jobs.len());

    if args.dry_run {
        print_plan(&jobs)?;
        return Ok(());
    }

    let tool = FfmpegTool::new();
    let runner = SegmentRunner::new(&tool);
    runner
        .extract_all(&jobs)
        .context("Failed to extract segments")?;

    info!("Split operation completed successfully");
    Ok(())
}

fn keyframe_config(
    interval: Option<f64>,
    margin: f64,
) -> CutSplitResult<Option<KeyframeConfig>> {
    interval
        .map(|secs| KeyframeConfig::with_margin(secs, margin))
        .transpose()
}

fn print_plan(jobs: &[SegmentJob]) -> Result<()> {
    let json = serde_json::to_string_pretty(jobs).context("Failed to serialize plan")?;
    println!("{}", json);
    Ok(())
}

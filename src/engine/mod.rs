//! Segment extraction and joining engine
//!
//! The engine consumes planned jobs in order, one blocking external
//! invocation per segment, then recombines the results. It only decides
//! what time ranges to request and how to combine the outputs; the media
//! tool owns the bytes.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::{debug, info, warn};

use crate::error::CutSplitResult;
use crate::planner::{CutRange, SegmentJob};

pub mod ffmpeg;

pub use ffmpeg::FfmpegTool;

/// Joined outputs longer than this draw a warning (upload ceilings on
/// most video sites sit around the 11 hour mark).
const UPLOAD_LENGTH_WARN_SECS: f64 = 39_600.0;

/// The three capabilities required of the external media tool.
///
/// Everything else about the tool (flag syntax, codecs, containers) is its
/// own business.
pub trait MediaTool {
    /// Stream-copy the given time range from `source` into `dest`.
    fn extract(&self, source: &Path, dest: &Path, range: &CutRange) -> CutSplitResult<()>;

    /// Losslessly concatenate the files enumerated in `list_file` into
    /// `dest`.
    fn concat(&self, list_file: &Path, dest: &Path) -> CutSplitResult<()>;

    /// Total duration of `path` in seconds, read from the tool's
    /// diagnostics.
    fn duration(&self, path: &Path) -> CutSplitResult<f64>;
}

/// Executes planned segment jobs against a media tool and joins the
/// results.
pub struct SegmentRunner<'a, T: MediaTool> {
    tool: &'a T,
}

impl<'a, T: MediaTool> SegmentRunner<'a, T> {
    /// Create a runner over the given tool.
    pub fn new(tool: &'a T) -> Self {
        Self { tool }
    }

    /// Extract every job in plan order, each awaited to completion.
    ///
    /// The first failed extraction aborts the run; files already produced
    /// stay on disk for diagnosis.
    pub fn extract_all(&self, jobs: &[SegmentJob]) -> CutSplitResult<()> {
        for (index, job) in jobs.iter().enumerate() {
            info!(
                "Extracting segment {}/{}: {}",
                index + 1,
                jobs.len(),
                job.output.display()
            );
            self.tool.extract(&job.source, &job.output, &job.range)?;
        }
        Ok(())
    }

    /// Extract all jobs and recombine them into `outfile`.
    ///
    /// A single planned segment is renamed straight to `outfile` with no
    /// join pass. Multiple segments go through the tool's lossless concat
    /// with a list file in plan order; reordering would corrupt the
    /// timeline. Intermediates and the list file are removed only after a
    /// successful join, and `outfile` is never produced on a failed run.
    pub fn run(&self, jobs: &[SegmentJob], outfile: &Path) -> CutSplitResult<()> {
        if jobs.is_empty() {
            warn!("Nothing to extract");
            return Ok(());
        }

        self.extract_all(jobs)?;
        self.join(jobs, outfile)?;
        self.check_output_length(outfile);
        Ok(())
    }

    fn join(&self, jobs: &[SegmentJob], outfile: &Path) -> CutSplitResult<()> {
        if let [job] = jobs {
            info!(
                "Single segment, renaming {} -> {}",
                job.output.display(),
                outfile.display()
            );
            move_file(&job.output, outfile)?;
            return Ok(());
        }

        let list_path = segment_list_path(outfile);
        write_segment_list(&list_path, jobs)?;
        info!(
            "Joining {} segments into {}",
            jobs.len(),
            outfile.display()
        );
        self.tool.concat(&list_path, outfile)?;

        for job in jobs {
            debug!("Removing intermediate {}", job.output.display());
            fs::remove_file(&job.output)?;
        }
        fs::remove_file(&list_path)?;
        Ok(())
    }

    fn check_output_length(&self, outfile: &Path) {
        match self.tool.duration(outfile) {
            Ok(secs) if secs > UPLOAD_LENGTH_WARN_SECS => {
                warn!(
                    "Output {} is {:.0}s long (over 11 hours), uploads may be rejected",
                    outfile.display(),
                    secs
                );
            }
            Ok(secs) => info!("Output duration: {:.3}s", secs),
            Err(err) => warn!("Could not probe output duration: {}", err),
        }
    }
}

/// List file handed to the tool's concat mode, `<outfile>.segmentlist`.
pub fn segment_list_path(outfile: &Path) -> PathBuf {
    let mut name = outfile.as_os_str().to_os_string();
    name.push(".segmentlist");
    PathBuf::from(name)
}

fn write_segment_list(list_path: &Path, jobs: &[SegmentJob]) -> CutSplitResult<()> {
    let mut file = fs::File::create(list_path)?;
    for job in jobs {
        writeln!(file, "file '{}'", job.output.display())?;
    }
    Ok(())
}

/// Move a file, falling back to copy-and-delete when a straight rename is
/// not possible (the temp dir may sit on a different filesystem from the
/// output).
fn move_file(from: &Path, to: &Path) -> CutSplitResult<()> {
    if fs::rename(from, to).is_ok() {
        return Ok(());
    }
    copy_and_remove(from, to)
}

fn copy_and_remove(from: &Path, to: &Path) -> CutSplitResult<()> {
    debug!(
        "Rename {} -> {} failed, copying across filesystems",
        from.display(),
        to.display()
    );
    fs::copy(from, to)?;
    fs::remove_file(from)?;
    Ok(())
}

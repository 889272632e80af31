//! ffmpeg adapter
//!
//! Invocations are built as argument vectors so nothing ever passes
//! through a shell. Extraction and concatenation inherit stdio, letting
//! ffmpeg's own progress output reach the console.

use std::path::Path;
use std::process::Command;
use std::sync::OnceLock;

use regex::Regex;
use tracing::{debug, info};

use crate::engine::MediaTool;
use crate::error::{CutSplitError, CutSplitResult};
use crate::planner::CutRange;

fn duration_pattern() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"Duration:\s*(\d+):(\d+):(\d+(?:\.\d+)?)").unwrap())
}

/// Stream-copy extraction, concat and duration probing via the ffmpeg
/// binary.
pub struct FfmpegTool {
    program: String,
}

impl FfmpegTool {
    /// Use `ffmpeg` from `PATH`.
    pub fn new() -> Self {
        Self::with_program("ffmpeg")
    }

    /// Use an explicit ffmpeg binary.
    pub fn with_program(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
        }
    }

    fn run(&self, command: &mut Command, stage: &str) -> CutSplitResult<()> {
        debug!("Calling: {:?}", command);
        let status = command.status().map_err(|e| CutSplitError::ExternalTool {
            tool: self.program.clone(),
            stage: stage.to_string(),
            message: e.to_string(),
        })?;

        if !status.success() {
            return Err(CutSplitError::ExternalTool {
                tool: self.program.clone(),
                stage: stage.to_string(),
                message: format!("exit status {}", status.code().unwrap_or(-1)),
            });
        }
        Ok(())
    }
}

impl Default for FfmpegTool {
    fn default() -> Self {
        Self::new()
    }
}

impl MediaTool for FfmpegTool {
    fn extract(&self, source: &Path, dest: &Path, range: &CutRange) -> CutSplitResult<()> {
        info!(
            "Extracting {} from {} ({} -> {})",
            dest.display(),
            source.display(),
            range.start,
            range
                .stop
                .as_ref()
                .map(|s| s.to_string())
                .unwrap_or_else(|| "EOF".to_string())
        );

        let mut command = Command::new(&self.program);
        command
            .arg("-hide_banner")
            .arg("-nostdin")
            .arg("-i")
            .arg(source)
            .args(["-acodec", "copy", "-vcodec", "copy"])
            .args(["-bsf:a", "aac_adtstoasc"])
            .arg("-ss")
            .arg(range.start.to_string());
        if let Some(stop) = &range.stop {
            command.arg("-to").arg(stop.to_string());
        }
        command.arg("-y").arg(dest);

        self.run(&mut command, "extract")
    }

    fn concat(&self, list_file: &Path, dest: &Path) -> CutSplitResult<()> {
        let mut command = Command::new(&self.program);
        command
            .arg("-hide_banner")
            .arg("-nostdin")
            .args(["-f", "concat", "-safe", "0"])
            .arg("-i")
            .arg(list_file)
            .args(["-c", "copy"])
            .args(["-bsf:a", "aac_adtstoasc"])
            .args(["-movflags", "faststart"])
            .arg("-y")
            .arg(dest);

        self.run(&mut command, "concat")
    }

    fn duration(&self, path: &Path) -> CutSplitResult<f64> {
        // `ffmpeg -i` with no output file always exits non-zero; the
        // duration line lands on stderr regardless.
        let output = Command::new(&self.program)
            .arg("-hide_banner")
            .arg("-i")
            .arg(path)
            .output()
            .map_err(|e| CutSplitError::ExternalTool {
                tool: self.program.clone(),
                stage: "probe".to_string(),
                message: e.to_string(),
            })?;

        let stderr = String::from_utf8_lossy(&output.stderr);
        parse_duration(&stderr).ok_or_else(|| CutSplitError::DurationParse {
            path: path.display().to_string(),
        })
    }
}

/// Pull total seconds out of a `Duration: HH:MM:SS.cc` diagnostic line.
pub fn parse_duration(diagnostics: &str) -> Option<f64> {
    let caps = duration_pattern().captures(diagnostics)?;
    let hours: f64 = caps[1].parse().ok()?;
    let minutes: f64 = caps[2].parse().ok()?;
    let seconds: f64 = caps[3].parse().ok()?;
    Some(hours * 3600.0 + minutes * 60.0 + seconds)
}

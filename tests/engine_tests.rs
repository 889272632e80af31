use std::fs;
use std::path::Path;
use std::sync::Mutex;

use tempfile::TempDir;

use cutsplit::engine::segment_list_path;
use cutsplit::*;

/// A recording stand-in for ffmpeg. Extractions and concats create real
/// files so the runner's rename/cleanup logic runs against the actual
/// filesystem.
struct RecordingTool {
    calls: Mutex<Vec<String>>,
    fail_extract_at: Option<usize>,
    fail_concat: bool,
}

impl RecordingTool {
    fn new() -> Self {
        Self {
            calls: Mutex::new(Vec::new()),
            fail_extract_at: None,
            fail_concat: false,
        }
    }

    fn failing_extract_at(index: usize) -> Self {
        Self {
            fail_extract_at: Some(index),
            ..Self::new()
        }
    }

    fn failing_concat() -> Self {
        Self {
            fail_concat: true,
            ..Self::new()
        }
    }

    fn calls(&self) -> Vec<String> {
        self.calls.lock().unwrap().clone()
    }

    fn extract_count(&self) -> usize {
        self.calls
            .lock()
            .unwrap()
            .iter()
            .filter(|c| c.starts_with("extract"))
            .count()
    }
}

impl MediaTool for RecordingTool {
    fn extract(&self, _source: &Path, dest: &Path, range: &CutRange) -> CutSplitResult<()> {
        let index = self.extract_count();
        if self.fail_extract_at == Some(index) {
            return Err(CutSplitError::ExternalTool {
                tool: "mock".to_string(),
                stage: "extract".to_string(),
                message: "exit status 1".to_string(),
            });
        }
        self.calls.lock().unwrap().push(format!(
            "extract {} {}",
            range.start,
            dest.display()
        ));
        fs::write(dest, format!("segment starting at {}", range.start)).unwrap();
        Ok(())
    }

    fn concat(&self, list_file: &Path, dest: &Path) -> CutSplitResult<()> {
        if self.fail_concat {
            return Err(CutSplitError::ExternalTool {
                tool: "mock".to_string(),
                stage: "concat".to_string(),
                message: "exit status 1".to_string(),
            });
        }
        let list = fs::read_to_string(list_file).unwrap();
        self.calls
            .lock()
            .unwrap()
            .push(format!("concat {}", dest.display()));
        fs::write(dest, list).unwrap();
        Ok(())
    }

    fn duration(&self, _path: &Path) -> CutSplitResult<f64> {
        Ok(30.0)
    }
}

fn make_jobs(dir: &TempDir, count: usize) -> Vec<SegmentJob> {
    let source = dir.path().join("stream.mp4");
    fs::write(&source, "fake video bytes").unwrap();

    (0..count)
        .map(|n| {
            let start =
                SubSecondTime::parse(&format!("00:00:{:02}.000", n * 10)).unwrap();
            let stop =
                SubSecondTime::parse(&format!("00:00:{:02}.000", n * 10 + 5)).unwrap();
            SegmentJob {
                source: source.clone(),
                output: dir.path().join(format!("out_tmp_{}.mp4", n + 1)),
                range: CutRange {
                    start: SeekPoint::Clock(start),
                    stop: Some(SeekPoint::Clock(stop)),
                },
                optimized: false,
            }
        })
        .collect()
}

#[test]
fn single_segment_is_renamed_not_joined() {
    let dir = TempDir::new().unwrap();
    let jobs = make_jobs(&dir, 1);
    let outfile = dir.path().join("final.mp4");

    let tool = RecordingTool::new();
    SegmentRunner::new(&tool).run(&jobs, &outfile).unwrap();

    assert!(outfile.exists());
    assert!(!jobs[0].output.exists());
    // no concat call, and no list file was ever written
    assert!(tool.calls().iter().all(|c| !c.starts_with("concat")));
    assert!(!segment_list_path(&outfile).exists());
}

#[test]
fn multiple_segments_concat_in_plan_order() {
    let dir = TempDir::new().unwrap();
    let jobs = make_jobs(&dir, 3);
    let outfile = dir.path().join("final.mp4");

    let tool = RecordingTool::new();
    SegmentRunner::new(&tool).run(&jobs, &outfile).unwrap();

    // extraction order followed plan order
    let extracts: Vec<String> = tool
        .calls()
        .into_iter()
        .filter(|c| c.starts_with("extract"))
        .collect();
    assert_eq!(extracts.len(), 3);
    assert!(extracts[0].contains("out_tmp_1.mp4"));
    assert!(extracts[1].contains("out_tmp_2.mp4"));
    assert!(extracts[2].contains("out_tmp_3.mp4"));

    // the concat list preserved plan order exactly (the mock copied it
    // into the output file)
    let joined = fs::read_to_string(&outfile).unwrap();
    let lines: Vec<&str> = joined.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].contains("out_tmp_1.mp4"));
    assert!(lines[1].contains("out_tmp_2.mp4"));
    assert!(lines[2].contains("out_tmp_3.mp4"));
    assert!(lines.iter().all(|l| l.starts_with("file '")));
}

#[test]
fn intermediates_and_list_file_are_cleaned_up_on_success() {
    let dir = TempDir::new().unwrap();
    let jobs = make_jobs(&dir, 2);
    let outfile = dir.path().join("final.mp4");

    let tool = RecordingTool::new();
    SegmentRunner::new(&tool).run(&jobs, &outfile).unwrap();

    assert!(outfile.exists());
    for job in &jobs {
        assert!(!job.output.exists());
    }
    assert!(!segment_list_path(&outfile).exists());
}

#[test]
fn failed_extraction_aborts_and_preserves_intermediates() {
    let dir = TempDir::new().unwrap();
    let jobs = make_jobs(&dir, 3);
    let outfile = dir.path().join("final.mp4");

    let tool = RecordingTool::failing_extract_at(1);
    let err = SegmentRunner::new(&tool).run(&jobs, &outfile).unwrap_err();
    assert!(matches!(err, CutSplitError::ExternalTool { .. }));

    // the first segment survives for diagnosis, the rest never ran
    assert!(jobs[0].output.exists());
    assert!(!jobs[2].output.exists());
    assert_eq!(tool.extract_count(), 1);
    // the final output must not appear on a failed run
    assert!(!outfile.exists());
}

#[test]
fn failed_join_preserves_intermediates_and_list_file() {
    let dir = TempDir::new().unwrap();
    let jobs = make_jobs(&dir, 2);
    let outfile = dir.path().join("final.mp4");

    let tool = RecordingTool::failing_concat();
    let err = SegmentRunner::new(&tool).run(&jobs, &outfile).unwrap_err();
    assert!(matches!(err, CutSplitError::ExternalTool { .. }));

    for job in &jobs {
        assert!(job.output.exists());
    }
    assert!(segment_list_path(&outfile).exists());
    assert!(!outfile.exists());
}

#[test]
fn extract_all_leaves_outputs_in_place() {
    // split mode: numbered outputs are the deliverables, nothing joined
    let dir = TempDir::new().unwrap();
    let jobs = make_jobs(&dir, 2);

    let tool = RecordingTool::new();
    SegmentRunner::new(&tool).extract_all(&jobs).unwrap();

    for job in &jobs {
        assert!(job.output.exists());
    }
}

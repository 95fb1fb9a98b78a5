//! Render planning for committed arrangements.
//!
//! Turns the committed segment list of one track into FFmpeg work: one
//! stream-copy trim per segment, then a concat of the trimmed parts. The
//! plan is plain data; building it never touches FFmpeg, so hosts can
//! inspect or serialize it before running anything.

use std::path::{Path, PathBuf};
use std::process::{Command, Stdio};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use ffmpeg_sidecar::paths::ffmpeg_path;
use quickcut_core::{QuickCutError, Result, Seconds};
use quickcut_engine::{SourceCatalog, Timeline};
use serde::{Deserialize, Serialize};
use tracing::info;

/// One stream-copy trim of a source window to a part file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CutStep {
    /// Source media file
    pub input: PathBuf,
    /// Window start within the source
    pub source_start: Seconds,
    /// Window length
    pub duration: Seconds,
    /// Trimmed part file
    pub output: PathBuf,
}

impl CutStep {
    /// Build the FFmpeg command arguments for this trim.
    pub fn ffmpeg_args(&self) -> Vec<String> {
        vec![
            "-y".into(),
            "-ss".into(),
            format!("{:.3}", self.source_start.to_f64()),
            "-t".into(),
            format!("{:.3}", self.duration.to_f64()),
            "-i".into(),
            self.input.to_string_lossy().into_owned(),
            "-c".into(),
            "copy".into(),
            self.output.to_string_lossy().into_owned(),
        ]
    }
}

/// Concatenation of the trimmed parts into the final output.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ConcatStep {
    /// Part files in playback order
    pub parts: Vec<PathBuf>,
    /// Final output file
    pub output: PathBuf,
}

impl ConcatStep {
    /// Contents of the concat list file FFmpeg reads.
    pub fn list_file_contents(&self) -> String {
        self.parts
            .iter()
            .map(|p| format!("file '{}'\n", p.to_string_lossy()))
            .collect()
    }

    /// Build the FFmpeg command arguments for the concat pass.
    pub fn ffmpeg_args(&self, list_path: &Path) -> Vec<String> {
        vec![
            "-y".into(),
            "-f".into(),
            "concat".into(),
            "-safe".into(),
            "0".into(),
            "-i".into(),
            list_path.to_string_lossy().into_owned(),
            "-c".into(),
            "copy".into(),
            self.output.to_string_lossy().into_owned(),
        ]
    }
}

/// The full FFmpeg work plan for one track's program.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RenderPlan {
    /// Scratch directory for part files and the concat list
    pub work_dir: PathBuf,
    /// Trim passes, in playback order
    pub cuts: Vec<CutStep>,
    /// Final concat pass
    pub concat: ConcatStep,
}

impl RenderPlan {
    /// Build the plan for one track of a committed arrangement.
    ///
    /// Overlay segments are skipped and gaps between segments are squeezed
    /// out: parts concatenate back-to-back in `track_position` order.
    pub fn for_track(
        timeline: &Timeline,
        track_index: usize,
        catalog: &dyn SourceCatalog,
        work_dir: impl Into<PathBuf>,
        output: impl Into<PathBuf>,
    ) -> Result<Self> {
        let work_dir = work_dir.into();
        let mut cuts = Vec::new();
        let mut parts = Vec::new();

        let ordered = timeline.segments_on_track(track_index);
        for (i, segment) in ordered.iter().filter(|s| !s.is_overlay).enumerate() {
            let source = catalog.source(segment.source_id).ok_or_else(|| {
                QuickCutError::NotFound(format!("source {} not in catalog", segment.source_id))
            })?;
            let part = work_dir.join(format!("part-{i:03}.mp4"));
            cuts.push(CutStep {
                input: PathBuf::from(&source.path),
                source_start: segment.source_start,
                duration: segment.duration(),
                output: part.clone(),
            });
            parts.push(part);
        }

        Ok(Self {
            work_dir,
            cuts,
            concat: ConcatStep {
                parts,
                output: output.into(),
            },
        })
    }

    /// Number of FFmpeg invocations this plan performs.
    pub fn step_count(&self) -> usize {
        self.cuts.len() + 1
    }

    /// Execute the plan, one ffmpeg process per step.
    ///
    /// * `on_step` – called with (completed, total) after each step.
    /// * `cancel` – checked between steps; a cancelled plan aborts early.
    pub fn run(&self, on_step: impl Fn(usize, usize), cancel: &RenderCancel) -> Result<()> {
        let total = self.step_count();
        for (i, cut) in self.cuts.iter().enumerate() {
            if cancel.is_cancelled() {
                return Err(QuickCutError::Export("render cancelled".into()));
            }
            run_ffmpeg(&cut.ffmpeg_args())?;
            on_step(i + 1, total);
        }

        if cancel.is_cancelled() {
            return Err(QuickCutError::Export("render cancelled".into()));
        }
        let list_path = self.work_dir.join("concat.txt");
        std::fs::write(&list_path, self.concat.list_file_contents())?;
        run_ffmpeg(&self.concat.ffmpeg_args(&list_path))?;
        on_step(total, total);

        info!(output = %self.concat.output.display(), "render complete");
        Ok(())
    }
}

fn run_ffmpeg(args: &[String]) -> Result<()> {
    let status = Command::new(ffmpeg_path())
        .args(args)
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map_err(|e| QuickCutError::Export(format!("failed to spawn ffmpeg: {e}")))?;
    if !status.success() {
        return Err(QuickCutError::Export(format!(
            "ffmpeg exited with status: {status}"
        )));
    }
    Ok(())
}

/// Handle for cancelling an in-progress render.
#[derive(Debug, Clone, Default)]
pub struct RenderCancel(Arc<AtomicBool>);

impl RenderCancel {
    /// Create a new cancel handle.
    pub fn new() -> Self {
        Self::default()
    }

    /// Signal cancellation.
    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    /// Check if cancelled.
    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

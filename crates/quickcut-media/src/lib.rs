//! QuickCut Media - FFmpeg collaborator boundary
//!
//! This crate handles the two places QuickCut talks to FFmpeg binaries:
//! - Probing media files for duration and stream layout (ffprobe)
//! - Turning a committed arrangement into trim + concat work (ffmpeg)
//!
//! Nothing here decodes media in-process.

pub mod plan;
pub mod probe;

pub use plan::{ConcatStep, CutStep, RenderCancel, RenderPlan};
pub use probe::{AudioStreamInfo, MediaProbe, VideoStreamInfo};

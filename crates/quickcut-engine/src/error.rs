//! Errors surfaced by arrangement operations.

use thiserror::Error;
use uuid::Uuid;

/// Error type for the arrangement engine.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum ArrangeError {
    #[error("segment not found: {0}")]
    SegmentNotFound(Uuid),

    #[error("source not found: {0}")]
    SourceNotFound(Uuid),

    #[error("source {0} is shorter than the minimum segment duration")]
    SourceTooShort(Uuid),

    #[error("a drag session is already active")]
    SessionActive,

    #[error("no drag session is active")]
    NoActiveSession,

    #[error("a collision is awaiting resolution")]
    ResolutionPending,

    #[error("no collision is pending resolution")]
    NoPendingCollision,

    #[error("track index {index} out of range (timeline has {num_tracks} tracks)")]
    TrackOutOfRange { index: usize, num_tracks: usize },

    #[error("mapper reports {mapper} tracks but timeline has {timeline}")]
    TrackCountMismatch { mapper: usize, timeline: usize },

    #[error("arrangement invariant violated: {0}")]
    InvariantViolation(String),
}

//! Segments: placed, trimmed references to a source on one track.

use quickcut_core::{Seconds, TimeSpan};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::source::Source;

/// Minimum duration any engine operation may produce.
/// Splits reject cuts closer than this to a segment edge, and replace
/// resolutions drop remnants thinner than this.
pub const MIN_DURATION: Seconds = Seconds::from_raw(1, 10);

/// A segment on the timeline.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Segment {
    /// Unique segment ID, stable across moves
    pub id: Uuid,
    /// Source this segment plays from (catalog lookup only)
    pub source_id: Uuid,
    /// Trimmed window start within the source
    pub source_start: Seconds,
    /// Trimmed window end within the source (exclusive)
    pub source_end: Seconds,
    /// Track the segment sits on
    pub track_index: usize,
    /// Offset from the timeline origin
    pub track_position: Seconds,
    /// Overlay segments are exempt from the per-track no-overlap rule
    /// (an audio bed riding over a video segment)
    pub is_overlay: bool,
}

impl Segment {
    /// Place a whole source as one segment.
    pub fn from_source(source: &Source, track_index: usize, track_position: Seconds) -> Self {
        Self {
            id: Uuid::new_v4(),
            source_id: source.id,
            source_start: Seconds::ZERO,
            source_end: source.duration,
            track_index,
            track_position,
            is_overlay: false,
        }
    }

    /// Duration on the timeline. Always recomputed, never stored.
    #[inline]
    pub fn duration(&self) -> Seconds {
        self.source_end - self.source_start
    }

    /// The interval this segment occupies on its track.
    #[inline]
    pub fn span(&self) -> TimeSpan {
        TimeSpan::new(self.track_position, self.duration())
    }

    /// The trimmed window within the source.
    #[inline]
    pub fn source_window(&self) -> TimeSpan {
        TimeSpan::from_start_end(self.source_start, self.source_end)
    }

    /// Split into two pieces at `offset` seconds from the segment start.
    ///
    /// Both pieces get fresh ids; their source windows are disjoint and sum
    /// to this segment's window. The first piece keeps this segment's
    /// `track_position`, the second starts where the cut lands. Returns
    /// `None` when either piece would be thinner than [`MIN_DURATION`].
    pub fn split_at(&self, offset: Seconds) -> Option<(Segment, Segment)> {
        if offset < MIN_DURATION || self.duration() - offset < MIN_DURATION {
            return None;
        }
        let cut = self.source_start + offset;
        let front = Segment {
            id: Uuid::new_v4(),
            source_id: self.source_id,
            source_start: self.source_start,
            source_end: cut,
            track_index: self.track_index,
            track_position: self.track_position,
            is_overlay: self.is_overlay,
        };
        let back = Segment {
            id: Uuid::new_v4(),
            source_id: self.source_id,
            source_start: cut,
            source_end: self.source_end,
            track_index: self.track_index,
            track_position: self.track_position + offset,
            is_overlay: self.is_overlay,
        };
        Some((front, back))
    }
}

//! The timeline aggregate.
//!
//! Owns every segment and exposes the committed, read-only view that
//! rendering and export consume. All position mutation funnels through the
//! drag session and the collision resolver; there is no public entry point
//! that moves a segment without invariant checks.

use quickcut_core::Seconds;
use tracing::debug;
use uuid::Uuid;

use crate::error::ArrangeError;
use crate::segment::{Segment, MIN_DURATION};
use crate::source::{Source, SourceCatalog};

/// A fixed set of parallel tracks holding segments.
#[derive(Debug, Clone)]
pub struct Timeline {
    num_tracks: usize,
    segments: Vec<Segment>,
}

impl Timeline {
    /// Create an empty timeline with a fixed number of tracks.
    pub fn new(num_tracks: usize) -> Self {
        Self {
            num_tracks,
            segments: Vec::new(),
        }
    }

    /// Number of tracks.
    pub fn num_tracks(&self) -> usize {
        self.num_tracks
    }

    /// The full committed segment set, unordered.
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Look up a segment by id.
    pub fn segment(&self, id: Uuid) -> Option<&Segment> {
        self.segments.iter().find(|s| s.id == id)
    }

    /// Segments on one track, ordered by `track_position`.
    pub fn segments_on_track(&self, track_index: usize) -> Vec<&Segment> {
        let mut on_track: Vec<&Segment> = self
            .segments
            .iter()
            .filter(|s| s.track_index == track_index)
            .collect();
        on_track.sort_by_key(|s| s.track_position);
        on_track
    }

    /// Total duration: the latest end over all segments, zero when empty.
    pub fn total_duration(&self) -> Seconds {
        self.segments
            .iter()
            .map(|s| s.span().end())
            .max()
            .unwrap_or(Seconds::ZERO)
    }

    /// The segment whose interval contains `time` on the given track.
    /// When a regular segment and an overlay both cover the time, the
    /// regular segment wins.
    pub fn segment_at(&self, track_index: usize, time: Seconds) -> Option<&Segment> {
        let mut overlay_hit = None;
        for seg in &self.segments {
            if seg.track_index != track_index || !seg.span().contains(time) {
                continue;
            }
            if seg.is_overlay {
                overlay_hit = Some(seg);
            } else {
                return Some(seg);
            }
        }
        overlay_hit
    }

    /// End of the latest segment on a track, zero when the track is empty.
    pub fn track_end(&self, track_index: usize) -> Seconds {
        self.segments
            .iter()
            .filter(|s| s.track_index == track_index)
            .map(|s| s.span().end())
            .max()
            .unwrap_or(Seconds::ZERO)
    }

    // ── Lifecycle (crate-internal; the Arranger is the public surface) ──

    /// Place a whole source as one segment at the end of a track.
    pub(crate) fn import_source(
        &mut self,
        source: &Source,
        track_index: usize,
    ) -> Result<Uuid, ArrangeError> {
        self.check_track(track_index)?;
        if source.duration < MIN_DURATION {
            return Err(ArrangeError::SourceTooShort(source.id));
        }
        let position = self.track_end(track_index);
        let segment = Segment::from_source(source, track_index, position);
        let id = segment.id;
        debug!(segment = %id, track = track_index, at = %position, "imported source");
        self.segments.push(segment);
        Ok(id)
    }

    /// Place a whole source as an overlay at an explicit position.
    /// Overlays are exempt from the no-overlap rule on their track.
    pub(crate) fn import_overlay(
        &mut self,
        source: &Source,
        track_index: usize,
        track_position: Seconds,
    ) -> Result<Uuid, ArrangeError> {
        self.check_track(track_index)?;
        if source.duration < MIN_DURATION {
            return Err(ArrangeError::SourceTooShort(source.id));
        }
        if track_position < Seconds::ZERO {
            return Err(ArrangeError::InvariantViolation(
                "track position must be non-negative".into(),
            ));
        }
        let mut segment = Segment::from_source(source, track_index, track_position);
        segment.is_overlay = true;
        let id = segment.id;
        debug!(segment = %id, track = track_index, at = %track_position, "imported overlay");
        self.segments.push(segment);
        Ok(id)
    }

    /// Remove a segment, returning it.
    pub(crate) fn remove_segment(&mut self, id: Uuid) -> Result<Segment, ArrangeError> {
        let index = self
            .segments
            .iter()
            .position(|s| s.id == id)
            .ok_or(ArrangeError::SegmentNotFound(id))?;
        Ok(self.segments.remove(index))
    }

    /// Move a segment in place, keeping its identity. Used only for
    /// provisional drag previews and snapshot restores; skips validation.
    pub(crate) fn set_position(
        &mut self,
        id: Uuid,
        track_index: usize,
        track_position: Seconds,
    ) -> Result<(), ArrangeError> {
        let segment = self
            .segments
            .iter_mut()
            .find(|s| s.id == id)
            .ok_or(ArrangeError::SegmentNotFound(id))?;
        segment.track_index = track_index;
        segment.track_position = track_position;
        Ok(())
    }

    /// Validate the current segment set against the committed-state
    /// invariants.
    pub(crate) fn validate_with(&self, catalog: &dyn SourceCatalog) -> Result<(), ArrangeError> {
        validate_segments(&self.segments, self.num_tracks, catalog)
    }

    /// Atomically replace the whole segment set. Either the candidate
    /// passes every invariant and becomes the committed state, or the
    /// timeline is left untouched.
    pub(crate) fn commit(
        &mut self,
        candidate: Vec<Segment>,
        catalog: &dyn SourceCatalog,
    ) -> Result<(), ArrangeError> {
        validate_segments(&candidate, self.num_tracks, catalog)?;
        self.segments = candidate;
        Ok(())
    }

    fn check_track(&self, index: usize) -> Result<(), ArrangeError> {
        if index >= self.num_tracks {
            return Err(ArrangeError::TrackOutOfRange {
                index,
                num_tracks: self.num_tracks,
            });
        }
        Ok(())
    }
}

/// Check every committed-state invariant over a segment set.
fn validate_segments(
    segments: &[Segment],
    num_tracks: usize,
    catalog: &dyn SourceCatalog,
) -> Result<(), ArrangeError> {
    for seg in segments {
        let source = catalog
            .source(seg.source_id)
            .ok_or(ArrangeError::SourceNotFound(seg.source_id))?;
        if seg.source_start < Seconds::ZERO
            || seg.source_start >= seg.source_end
            || seg.source_end > source.duration
        {
            return Err(ArrangeError::InvariantViolation(format!(
                "segment {} has source window {}..{} outside 0..{}",
                seg.id, seg.source_start, seg.source_end, source.duration
            )));
        }
        if seg.duration() < MIN_DURATION {
            return Err(ArrangeError::InvariantViolation(format!(
                "segment {} is thinner than the minimum duration",
                seg.id
            )));
        }
        if seg.track_position < Seconds::ZERO {
            return Err(ArrangeError::InvariantViolation(format!(
                "segment {} has a negative track position",
                seg.id
            )));
        }
        if seg.track_index >= num_tracks {
            return Err(ArrangeError::InvariantViolation(format!(
                "segment {} sits on track {} of {}",
                seg.id, seg.track_index, num_tracks
            )));
        }
    }

    // No two regular segments may overlap on one track.
    for track in 0..num_tracks {
        let mut spans: Vec<_> = segments
            .iter()
            .filter(|s| s.track_index == track && !s.is_overlay)
            .map(|s| (s.span(), s.id))
            .collect();
        spans.sort_by_key(|(span, _)| span.start);
        for pair in spans.windows(2) {
            let (a, a_id) = pair[0];
            let (b, b_id) = pair[1];
            if a.overlaps(b) {
                return Err(ArrangeError::InvariantViolation(format!(
                    "segments {a_id} and {b_id} overlap on track {track}"
                )));
            }
        }
    }

    Ok(())
}

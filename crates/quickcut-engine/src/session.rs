//! The drag session state machine and the `Arranger` facade.
//!
//! A session is the bounded sequence from grabbing a segment to releasing
//! it: `Idle → Dragging → {Resolving, Idle}`. Only one session can exist at
//! a time. While dragging, the segment set is updated live so a host can
//! render the provisional position; nothing survives the session unless it
//! commits. Cancellation always restores the exact pre-drag snapshot.

use glam::Vec2;
use quickcut_core::{Seconds, TimeSpan};
use tracing::{debug, warn};
use uuid::Uuid;

use crate::error::ArrangeError;
use crate::mapper::CoordinateMapper;
use crate::resolve::{self, ResolvePolicy};
use crate::segment::Segment;
use crate::source::{Source, SourceCatalog};
use crate::timeline::Timeline;

/// Collision descriptor handed to the caller while a drop awaits a policy
/// choice.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PendingCollision {
    /// The segment the drop landed on
    pub target_id: Uuid,
    /// The segment that was dragged
    pub dropped_id: Uuid,
    /// Candidate position of the dragged segment's left edge
    pub drop_time: Seconds,
}

/// Cut position surfaced while a drag hovers over another segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SplitPreview {
    pub target_id: Uuid,
    pub cut_time: Seconds,
}

/// What happened when a drag was released.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DropOutcome {
    /// No collision at the release point; the move is committed.
    Committed,
    /// The drop was disallowed; the segment is back at its pre-drag
    /// position.
    Reverted,
    /// The drop landed on another segment; a policy choice is awaited.
    Collision(PendingCollision),
}

/// What happened when a pending collision was resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ResolveOutcome {
    /// The policy was applied and the new arrangement committed.
    Applied,
    /// The policy rejected the geometry; the pre-drag arrangement is kept.
    Rejected,
    /// A participant went missing; treated as cancel.
    Cancelled,
}

/// Snapshot captured when a drag starts, enough to revert it exactly.
#[derive(Debug, Clone)]
struct ActiveDrag {
    segment_id: Uuid,
    origin_track: usize,
    origin_position: Seconds,
    /// Pointer position minus the segment's content position at grab time,
    /// so the segment's left edge defines its timeline position.
    grab_offset: Vec2,
}

#[derive(Debug, Clone)]
enum SessionState {
    Idle,
    Dragging(ActiveDrag),
    Resolving {
        drag: ActiveDrag,
        pending: PendingCollision,
    },
}

/// The arrangement engine: a timeline, a coordinate mapper, and at most one
/// drag session.
#[derive(Debug)]
pub struct Arranger {
    timeline: Timeline,
    mapper: CoordinateMapper,
    state: SessionState,
}

impl Arranger {
    /// Create an engine whose timeline has as many tracks as the mapper.
    pub fn new(mapper: CoordinateMapper) -> Self {
        Self {
            timeline: Timeline::new(mapper.num_tracks),
            mapper,
            state: SessionState::Idle,
        }
    }

    /// The committed (or, mid-drag, provisional) segment view.
    pub fn timeline(&self) -> &Timeline {
        &self.timeline
    }

    /// The active coordinate mapper.
    pub fn mapper(&self) -> &CoordinateMapper {
        &self.mapper
    }

    /// Swap the mapper (zoom change). Only allowed between sessions, and
    /// the track count must not change.
    pub fn set_mapper(&mut self, mapper: CoordinateMapper) -> Result<(), ArrangeError> {
        self.ensure_idle()?;
        if mapper.num_tracks != self.timeline.num_tracks() {
            return Err(ArrangeError::TrackCountMismatch {
                mapper: mapper.num_tracks,
                timeline: self.timeline.num_tracks(),
            });
        }
        self.mapper = mapper;
        Ok(())
    }

    /// The collision awaiting a policy choice, if any.
    pub fn pending_collision(&self) -> Option<PendingCollision> {
        match &self.state {
            SessionState::Resolving { pending, .. } => Some(*pending),
            _ => None,
        }
    }

    pub fn is_idle(&self) -> bool {
        matches!(self.state, SessionState::Idle)
    }

    pub fn is_dragging(&self) -> bool {
        matches!(self.state, SessionState::Dragging(_))
    }

    pub fn is_resolving(&self) -> bool {
        matches!(self.state, SessionState::Resolving { .. })
    }

    // ── Lifecycle ──────────────────────────────────────────────────

    /// Place a whole source at the end of a track.
    pub fn import_source(
        &mut self,
        source: &Source,
        track_index: usize,
    ) -> Result<Uuid, ArrangeError> {
        self.ensure_idle()?;
        self.timeline.import_source(source, track_index)
    }

    /// Place a whole source as an overlay at an explicit position.
    pub fn import_overlay(
        &mut self,
        source: &Source,
        track_index: usize,
        track_position: Seconds,
    ) -> Result<Uuid, ArrangeError> {
        self.ensure_idle()?;
        self.timeline.import_overlay(source, track_index, track_position)
    }

    /// Remove a segment from the timeline.
    pub fn remove_segment(&mut self, id: Uuid) -> Result<Segment, ArrangeError> {
        self.ensure_idle()?;
        self.timeline.remove_segment(id)
    }

    // ── Drag session ───────────────────────────────────────────────

    /// Start dragging a segment. Captures the pre-drag snapshot and the
    /// grab offset between the pointer and the segment's left edge.
    pub fn begin_drag(&mut self, segment_id: Uuid, pointer: Vec2) -> Result<(), ArrangeError> {
        self.ensure_idle()?;
        let segment = self
            .timeline
            .segment(segment_id)
            .ok_or(ArrangeError::SegmentNotFound(segment_id))?;
        let screen = self
            .mapper
            .content_pos(segment.track_position, segment.track_index);
        debug!(segment = %segment_id, "drag started");
        self.state = SessionState::Dragging(ActiveDrag {
            segment_id,
            origin_track: segment.track_index,
            origin_position: segment.track_position,
            grab_offset: pointer - screen,
        });
        Ok(())
    }

    /// Process one pointer move: apply the candidate position to the
    /// dragged segment and report the split preview when the candidate
    /// left edge sits inside another segment's committed interval.
    ///
    /// Every move must be handled in full; coalescing events could change
    /// which target a release detects.
    pub fn update_drag(&mut self, pointer: Vec2) -> Result<Option<SplitPreview>, ArrangeError> {
        let drag = match &self.state {
            SessionState::Idle => return Err(ArrangeError::NoActiveSession),
            SessionState::Resolving { .. } => return Err(ArrangeError::ResolutionPending),
            SessionState::Dragging(d) => d.clone(),
        };
        let (time, track) = self.candidate(&drag, pointer);

        let is_overlay = match self.timeline.segment(drag.segment_id) {
            Some(seg) => seg.is_overlay,
            None => {
                self.state = SessionState::Idle;
                return Err(ArrangeError::SegmentNotFound(drag.segment_id));
            }
        };
        self.timeline.set_position(drag.segment_id, track, time)?;

        if is_overlay {
            return Ok(None);
        }
        Ok(self
            .hover_target(drag.segment_id, track, time)
            .map(|target_id| SplitPreview {
                target_id,
                cut_time: time,
            }))
    }

    /// Release the drag. Either commits a plain reposition, reverts a
    /// disallowed drop, or freezes into `Resolving` with a pending
    /// collision for the caller to resolve.
    pub fn end_drag(
        &mut self,
        pointer: Vec2,
        catalog: &dyn SourceCatalog,
    ) -> Result<DropOutcome, ArrangeError> {
        let drag = match &self.state {
            SessionState::Idle => return Err(ArrangeError::NoActiveSession),
            SessionState::Resolving { .. } => return Err(ArrangeError::ResolutionPending),
            SessionState::Dragging(d) => d.clone(),
        };
        let (time, track) = self.candidate(&drag, pointer);

        let (is_overlay, duration) = match self.timeline.segment(drag.segment_id) {
            Some(seg) => (seg.is_overlay, seg.duration()),
            None => {
                self.state = SessionState::Idle;
                return Err(ArrangeError::SegmentNotFound(drag.segment_id));
            }
        };
        self.timeline.set_position(drag.segment_id, track, time)?;

        if !is_overlay {
            if let Some(target_id) = self.hover_target(drag.segment_id, track, time) {
                let pending = PendingCollision {
                    target_id,
                    dropped_id: drag.segment_id,
                    drop_time: time,
                };
                debug!(target_segment = %target_id, dropped = %drag.segment_id, at = %time, "drop collided; awaiting policy");
                self.state = SessionState::Resolving { drag, pending };
                return Ok(DropOutcome::Collision(pending));
            }
        } else {
            // Overlay-on-overlay arrangements are undefined; refuse the drop.
            let span = TimeSpan::new(time, duration);
            let clash = self.timeline.segments().iter().any(|s| {
                s.id != drag.segment_id
                    && s.is_overlay
                    && s.track_index == track
                    && s.span().overlaps(span)
            });
            if clash {
                self.restore_origin(&drag)?;
                self.state = SessionState::Idle;
                debug!(segment = %drag.segment_id, "overlay drop refused; pre-drag position restored");
                return Ok(DropOutcome::Reverted);
            }
        }

        match self.timeline.validate_with(catalog) {
            Ok(()) => {
                self.state = SessionState::Idle;
                debug!(segment = %drag.segment_id, track, at = %time, "reposition committed");
                Ok(DropOutcome::Committed)
            }
            Err(err) => {
                self.restore_origin(&drag)?;
                self.state = SessionState::Idle;
                warn!(%err, "commit rejected; pre-drag position restored");
                Err(err)
            }
        }
    }

    /// Resolve the pending collision with one of the four policies. The
    /// whole operation commits atomically or the pre-resolution set,
    /// including the dragged segment's original placement, is kept.
    pub fn resolve_collision(
        &mut self,
        policy: ResolvePolicy,
        catalog: &dyn SourceCatalog,
    ) -> Result<ResolveOutcome, ArrangeError> {
        let (drag, pending) = match &self.state {
            SessionState::Resolving { drag, pending } => (drag.clone(), *pending),
            _ => return Err(ArrangeError::NoPendingCollision),
        };

        // A participant removed out from under us is treated as cancel.
        if self.timeline.segment(pending.target_id).is_none()
            || self.timeline.segment(pending.dropped_id).is_none()
        {
            if self.timeline.segment(drag.segment_id).is_some() {
                self.restore_origin(&drag)?;
            }
            self.state = SessionState::Idle;
            debug!("collision participant missing; session cancelled");
            return Ok(ResolveOutcome::Cancelled);
        }

        // The pre-resolution committed set has the dragged segment at its
        // original placement, not the drag preview.
        self.restore_origin(&drag)?;

        let base = self.timeline.segments().to_vec();
        let dragged = base
            .iter()
            .find(|s| s.id == pending.dropped_id)
            .cloned()
            .ok_or(ArrangeError::SegmentNotFound(pending.dropped_id))?;
        let target = base
            .iter()
            .find(|s| s.id == pending.target_id)
            .cloned()
            .ok_or(ArrangeError::SegmentNotFound(pending.target_id))?;

        match resolve::apply(policy, &base, &dragged, &target, pending.drop_time) {
            None => {
                self.state = SessionState::Idle;
                debug!(?policy, "resolution degenerate; pre-drag arrangement kept");
                Ok(ResolveOutcome::Rejected)
            }
            Some(candidate) => match self.timeline.commit(candidate, catalog) {
                Ok(()) => {
                    self.state = SessionState::Idle;
                    debug!(?policy, target_segment = %pending.target_id, "resolution committed");
                    Ok(ResolveOutcome::Applied)
                }
                Err(err) => {
                    // The failed commit left the set untouched and the
                    // dragged segment is already back at its origin.
                    self.state = SessionState::Idle;
                    warn!(%err, ?policy, "resolution rejected; pre-resolution arrangement kept");
                    Err(err)
                }
            },
        }
    }

    /// Abandon the session, restoring the dragged segment's pre-drag
    /// `track_index`/`track_position` exactly.
    pub fn cancel_drag(&mut self) -> Result<(), ArrangeError> {
        let drag = match &self.state {
            SessionState::Idle => return Err(ArrangeError::NoActiveSession),
            SessionState::Dragging(d) => d.clone(),
            SessionState::Resolving { drag, .. } => drag.clone(),
        };
        self.restore_origin(&drag)?;
        self.state = SessionState::Idle;
        debug!(segment = %drag.segment_id, "drag cancelled; pre-drag position restored");
        Ok(())
    }

    // ── Internals ──────────────────────────────────────────────────

    fn ensure_idle(&self) -> Result<(), ArrangeError> {
        match self.state {
            SessionState::Idle => Ok(()),
            SessionState::Dragging(_) => Err(ArrangeError::SessionActive),
            SessionState::Resolving { .. } => Err(ArrangeError::ResolutionPending),
        }
    }

    /// Candidate (time, track) for the dragged segment's left edge.
    fn candidate(&self, drag: &ActiveDrag, pointer: Vec2) -> (Seconds, usize) {
        let content = pointer - drag.grab_offset;
        (
            self.mapper.time_from_content_x(content.x),
            self.mapper.track_from_content_y(content.y),
        )
    }

    /// The committed segment under a candidate left edge, if any.
    fn hover_target(&self, dragged_id: Uuid, track: usize, time: Seconds) -> Option<Uuid> {
        self.timeline
            .segments()
            .iter()
            .find(|s| {
                s.id != dragged_id
                    && !s.is_overlay
                    && s.track_index == track
                    && s.span().contains(time)
            })
            .map(|s| s.id)
    }

    fn restore_origin(&mut self, drag: &ActiveDrag) -> Result<(), ArrangeError> {
        self.timeline
            .set_position(drag.segment_id, drag.origin_track, drag.origin_position)
    }
}

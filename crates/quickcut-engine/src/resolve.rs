//! Collision resolution policies.
//!
//! Each policy turns the committed segment set plus a (dragged, target,
//! drop time) triple into a candidate set. Policies never mutate anything:
//! the drag session commits the candidate atomically or discards it.

use quickcut_core::{Seconds, TimeSpan};
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use uuid::Uuid;

use crate::segment::{Segment, MIN_DURATION};

/// How a drop onto an occupied interval is arranged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ResolvePolicy {
    /// Dragged plays first: target and everything after it shifts later.
    InsertBefore,
    /// Dragged plays right after target: later segments shift.
    InsertAfter,
    /// Target is cut at the drop time and dragged goes in the middle.
    SplitInsert,
    /// Dragged overwrites the matching window of target in place.
    ReplaceSegment,
}

/// Apply a policy, producing the candidate segment set.
///
/// `dragged` and `target` must be members of `segments` (the dragged one at
/// whatever position it currently holds; every policy re-places it).
/// Returns `None` when the policy rejects the geometry as degenerate, in
/// which case the caller keeps the pre-drag arrangement.
pub(crate) fn apply(
    policy: ResolvePolicy,
    segments: &[Segment],
    dragged: &Segment,
    target: &Segment,
    drop_time: Seconds,
) -> Option<Vec<Segment>> {
    match policy {
        ResolvePolicy::InsertBefore => Some(insert_at(
            segments,
            dragged,
            target,
            target.track_position,
        )),
        ResolvePolicy::InsertAfter => {
            Some(insert_at(segments, dragged, target, target.span().end()))
        }
        ResolvePolicy::SplitInsert => split_insert(segments, dragged, target, drop_time),
        ResolvePolicy::ReplaceSegment => Some(replace_segment(segments, dragged, target, drop_time)),
    }
}

/// Shared shape of insert-before and insert-after: everything on target's
/// track at or past `anchor` moves later by the dragged duration, and the
/// dragged segment lands at `anchor`.
fn insert_at(
    segments: &[Segment],
    dragged: &Segment,
    target: &Segment,
    anchor: Seconds,
) -> Vec<Segment> {
    let shift = dragged.duration();
    let track = target.track_index;

    let mut out = Vec::with_capacity(segments.len());
    for seg in segments {
        if seg.id == dragged.id {
            continue;
        }
        let mut seg = seg.clone();
        if seg.track_index == track && seg.track_position >= anchor {
            seg.track_position = seg.track_position + shift;
        }
        out.push(seg);
    }

    let mut moved = dragged.clone();
    moved.track_index = track;
    moved.track_position = anchor;
    out.push(moved);
    out
}

/// Cut target at the drop time, put dragged between the two pieces, and
/// ripple everything after target later by the dragged duration.
fn split_insert(
    segments: &[Segment],
    dragged: &Segment,
    target: &Segment,
    drop_time: Seconds,
) -> Option<Vec<Segment>> {
    let offset = drop_time - target.track_position;
    let (front, mut back) = target.split_at(offset)?;

    let shift = dragged.duration();
    let tail_anchor = target.span().end();
    let track = target.track_index;

    let mut out = Vec::with_capacity(segments.len() + 1);
    for seg in segments {
        if seg.id == dragged.id || seg.id == target.id {
            continue;
        }
        let mut seg = seg.clone();
        if seg.track_index == track && seg.track_position >= tail_anchor {
            seg.track_position = seg.track_position + shift;
        }
        out.push(seg);
    }

    back.track_position = back.track_position + shift;

    let mut moved = dragged.clone();
    moved.track_index = track;
    moved.track_position = drop_time;

    out.push(front);
    out.push(moved);
    out.push(back);
    Some(out)
}

/// Overwrite the window of target that dragged covers, starting at the drop
/// time, without shifting anything else. Target yields up to two remnants;
/// remnants thinner than the minimum duration are dropped rather than
/// created.
fn replace_segment(
    segments: &[Segment],
    dragged: &Segment,
    target: &Segment,
    drop_time: Seconds,
) -> Vec<Segment> {
    let window = TimeSpan::new(drop_time, dragged.duration());

    let mut out = Vec::with_capacity(segments.len() + 1);
    for seg in segments {
        if seg.id == dragged.id || seg.id == target.id {
            continue;
        }
        out.push(seg.clone());
    }

    for remnant in remnants(target, window) {
        out.push(remnant);
    }

    let mut moved = dragged.clone();
    moved.track_index = target.track_index;
    moved.track_position = drop_time;
    out.push(moved);
    out
}

/// The pieces of `target` left on either side of the replaced `window`.
fn remnants(target: &Segment, window: TimeSpan) -> SmallVec<[Segment; 2]> {
    let mut out = SmallVec::new();

    let before_len = window.start - target.track_position;
    if before_len >= MIN_DURATION {
        out.push(Segment {
            id: Uuid::new_v4(),
            source_id: target.source_id,
            source_start: target.source_start,
            source_end: target.source_start + before_len,
            track_index: target.track_index,
            track_position: target.track_position,
            is_overlay: target.is_overlay,
        });
    }

    let after_len = target.span().end() - window.end();
    if after_len >= MIN_DURATION {
        out.push(Segment {
            id: Uuid::new_v4(),
            source_id: target.source_id,
            source_start: target.source_end - after_len,
            source_end: target.source_end,
            track_index: target.track_index,
            track_position: window.end(),
            is_overlay: target.is_overlay,
        });
    }

    out
}

//! End-to-end tests for the arrangement engine.
//!
//! Drives the `Arranger` the way a host would: pointer positions in, the
//! committed segment view out.

use glam::Vec2;
use proptest::prelude::*;
use quickcut_core::Seconds;
use quickcut_engine::{
    ArrangeError, Arranger, CoordinateMapper, DropOutcome, MemoryCatalog, ResolveOutcome,
    ResolvePolicy, Source,
};
use uuid::Uuid;

// ── Helpers ────────────────────────────────────────────────────

fn secs(num: i64, den: i64) -> Seconds {
    Seconds::new(num, den)
}

/// Arranger with A (10s) on track 0 at 0 and B (4s) on track 1 at 0.
fn two_clip_setup() -> (Arranger, MemoryCatalog, Uuid, Uuid) {
    let mut catalog = MemoryCatalog::new();
    let src_a = Source::new("media/a.mp4", "a", secs(10, 1), true, true);
    let src_b = Source::new("media/b.mp4", "b", secs(4, 1), true, true);
    catalog.add(src_a.clone());
    catalog.add(src_b.clone());

    let mut arranger = Arranger::new(CoordinateMapper::new(1.0, 40.0, 8.0, 3));
    let a = arranger.import_source(&src_a, 0).unwrap();
    let b = arranger.import_source(&src_b, 1).unwrap();
    (arranger, catalog, a, b)
}

/// Pointer position whose content coordinates put a zero-offset grab's
/// left edge at (time, track).
fn at(arranger: &Arranger, num: i64, den: i64, track: usize) -> Vec2 {
    arranger.mapper().content_pos(secs(num, den), track)
}

/// Grab a segment by its left edge and release it at (time, track).
fn drop_at(
    arranger: &mut Arranger,
    catalog: &MemoryCatalog,
    id: Uuid,
    num: i64,
    den: i64,
    track: usize,
) -> DropOutcome {
    let grab = {
        let seg = arranger.timeline().segment(id).unwrap();
        arranger
            .mapper()
            .content_pos(seg.track_position, seg.track_index)
    };
    arranger.begin_drag(id, grab).unwrap();
    arranger.end_drag(at(arranger, num, den, track), catalog).unwrap()
}

/// Non-overlay segments on a track, ordered by position.
fn track_order(arranger: &Arranger, track: usize) -> Vec<(Seconds, Seconds, Seconds)> {
    arranger
        .timeline()
        .segments_on_track(track)
        .into_iter()
        .filter(|s| !s.is_overlay)
        .map(|s| (s.track_position, s.source_start, s.source_end))
        .collect()
}

fn assert_no_overlap(arranger: &Arranger) {
    let timeline = arranger.timeline();
    for track in 0..timeline.num_tracks() {
        let on_track: Vec<_> = timeline
            .segments_on_track(track)
            .into_iter()
            .filter(|s| !s.is_overlay)
            .collect();
        for pair in on_track.windows(2) {
            assert!(
                pair[0].span().end() <= pair[1].span().start,
                "segments overlap on track {track}"
            );
        }
    }
}

// ── Scenario table ─────────────────────────────────────────────

#[test]
fn insert_before_shifts_target_by_dropped_duration() {
    let (mut arranger, catalog, a, b) = two_clip_setup();

    let outcome = drop_at(&mut arranger, &catalog, b, 5, 1, 0);
    assert!(matches!(outcome, DropOutcome::Collision(_)));
    let applied = arranger
        .resolve_collision(ResolvePolicy::InsertBefore, &catalog)
        .unwrap();
    assert_eq!(applied, ResolveOutcome::Applied);

    assert_eq!(
        arranger.timeline().segment(b).unwrap().track_position,
        Seconds::ZERO
    );
    assert_eq!(
        arranger.timeline().segment(a).unwrap().track_position,
        secs(4, 1)
    );
    assert_eq!(arranger.timeline().total_duration(), secs(14, 1));
}

#[test]
fn insert_after_places_dropped_behind_target() {
    let (mut arranger, catalog, a, b) = two_clip_setup();

    drop_at(&mut arranger, &catalog, b, 5, 1, 0);
    arranger
        .resolve_collision(ResolvePolicy::InsertAfter, &catalog)
        .unwrap();

    assert_eq!(
        arranger.timeline().segment(a).unwrap().track_position,
        Seconds::ZERO
    );
    assert_eq!(
        arranger.timeline().segment(b).unwrap().track_position,
        secs(10, 1)
    );
}

#[test]
fn split_insert_cuts_target_around_dropped() {
    let (mut arranger, catalog, _, b) = two_clip_setup();

    drop_at(&mut arranger, &catalog, b, 5, 1, 0);
    arranger
        .resolve_collision(ResolvePolicy::SplitInsert, &catalog)
        .unwrap();

    // A-part1 [0,5) at 0, B at 5 (duration 4), A-part2 [5,10) at 9
    let order = track_order(&arranger, 0);
    assert_eq!(order.len(), 3);
    assert_eq!(order[0], (Seconds::ZERO, Seconds::ZERO, secs(5, 1)));
    assert_eq!(order[1].0, secs(5, 1));
    assert_eq!(order[2], (secs(9, 1), secs(5, 1), secs(10, 1)));
    assert_eq!(arranger.timeline().total_duration(), secs(14, 1));
}

#[test]
fn replace_segment_overwrites_matching_window_in_place() {
    let (mut arranger, catalog, _, b) = two_clip_setup();

    drop_at(&mut arranger, &catalog, b, 1, 1, 0);
    arranger
        .resolve_collision(ResolvePolicy::ReplaceSegment, &catalog)
        .unwrap();

    // A-remnant [0,1) at 0, B at 1, A-remnant [5,10) at 5: nothing shifted
    let order = track_order(&arranger, 0);
    assert_eq!(order.len(), 3);
    assert_eq!(order[0], (Seconds::ZERO, Seconds::ZERO, secs(1, 1)));
    assert_eq!(order[1].0, secs(1, 1));
    assert_eq!(order[2], (secs(5, 1), secs(5, 1), secs(10, 1)));
    assert_eq!(arranger.timeline().total_duration(), secs(10, 1));
}

#[test]
fn split_near_edge_is_a_no_op() {
    let (mut arranger, catalog, a, b) = two_clip_setup();

    // Cut point 0.05s into A: within the minimum of the start edge
    drop_at(&mut arranger, &catalog, b, 1, 20, 0);
    let outcome = arranger
        .resolve_collision(ResolvePolicy::SplitInsert, &catalog)
        .unwrap();

    assert_eq!(outcome, ResolveOutcome::Rejected);
    assert_eq!(arranger.timeline().segments().len(), 2);
    assert_eq!(
        arranger.timeline().segment(a).unwrap().source_window().end(),
        secs(10, 1)
    );
    let seg = arranger.timeline().segment(b).unwrap();
    assert_eq!(seg.track_index, 1);
    assert_eq!(seg.track_position, Seconds::ZERO);
}

// ── Laws ───────────────────────────────────────────────────────

#[test]
fn cancel_round_trip_restores_exact_placement() {
    let (mut arranger, _, _, b) = two_clip_setup();

    // Grab B somewhere inside its body, not at the left edge
    let grab = at(&arranger, 2, 1, 1) + Vec2::new(0.0, 12.0);
    arranger.begin_drag(b, grab).unwrap();
    for i in 0..15 {
        arranger
            .update_drag(Vec2::new(17.0 * i as f32, 3.0 * i as f32))
            .unwrap();
    }
    arranger.cancel_drag().unwrap();

    let seg = arranger.timeline().segment(b).unwrap();
    assert_eq!(seg.track_index, 1);
    assert_eq!(seg.track_position, Seconds::ZERO);
}

#[test]
fn split_then_remove_reconstructs_target_window() {
    let (mut arranger, catalog, a, b) = two_clip_setup();
    let original = arranger.timeline().segment(a).unwrap().source_window();

    drop_at(&mut arranger, &catalog, b, 7, 2, 0);
    arranger
        .resolve_collision(ResolvePolicy::SplitInsert, &catalog)
        .unwrap();
    arranger.remove_segment(b).unwrap();

    let order = track_order(&arranger, 0);
    assert_eq!(order.len(), 2);
    let (_, front_start, front_end) = order[0];
    let (_, back_start, back_end) = order[1];

    // Concatenated back-to-back the remnants are exactly the original
    assert_eq!(front_end, back_start);
    assert_eq!(front_start, original.start);
    assert_eq!(back_end, original.end());
}

#[test]
fn grab_offset_keeps_left_edge_authoritative() {
    let (mut arranger, catalog, a, b) = two_clip_setup();

    // Grab B two seconds into its body
    let grab = at(&arranger, 2, 1, 1);
    arranger.begin_drag(b, grab).unwrap();
    // Pointer over A at 9s; B's left edge lands at 7s
    let outcome = arranger.end_drag(at(&arranger, 9, 1, 0), &catalog).unwrap();

    match outcome {
        DropOutcome::Collision(pending) => {
            assert_eq!(pending.target_id, a);
            assert_eq!(pending.drop_time, secs(7, 1));
        }
        other => panic!("expected collision, got {other:?}"),
    }
}

#[test]
fn identity_is_stable_across_moves_and_resolutions() {
    let (mut arranger, catalog, a, b) = two_clip_setup();

    drop_at(&mut arranger, &catalog, b, 20, 1, 2);
    assert!(arranger.timeline().segment(b).is_some());

    drop_at(&mut arranger, &catalog, b, 5, 1, 0);
    arranger
        .resolve_collision(ResolvePolicy::SplitInsert, &catalog)
        .unwrap();

    // The dragged segment keeps its id; the split target does not survive
    assert!(arranger.timeline().segment(b).is_some());
    assert!(arranger.timeline().segment(a).is_none());
}

// ── Randomized invariant harness ───────────────────────────────

fn many_clip_setup() -> (Arranger, MemoryCatalog) {
    let mut catalog = MemoryCatalog::new();
    let mut arranger = Arranger::new(CoordinateMapper::new(1.0, 40.0, 8.0, 3));
    for (i, dur) in [10i64, 4, 6, 3].into_iter().enumerate() {
        let source = Source::new(
            format!("media/{i}.mp4"),
            format!("clip{i}"),
            secs(dur, 1),
            true,
            true,
        );
        catalog.add(source.clone());
        arranger.import_source(&source, i % 3).unwrap();
    }
    (arranger, catalog)
}

const POLICIES: [ResolvePolicy; 4] = [
    ResolvePolicy::InsertBefore,
    ResolvePolicy::InsertAfter,
    ResolvePolicy::SplitInsert,
    ResolvePolicy::ReplaceSegment,
];

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    /// Arbitrary drag/resolve/cancel interleavings never commit a state
    /// with two overlapping non-overlay segments on one track, and always
    /// return the session to idle.
    #[test]
    fn random_sequences_never_commit_overlap(
        ops in prop::collection::vec(
            (0usize..8, 0f32..1200.0, -40f32..200.0, 0usize..5),
            1..40,
        )
    ) {
        let (mut arranger, catalog) = many_clip_setup();

        for (pick, x, y, choice) in ops {
            let ids: Vec<Uuid> =
                arranger.timeline().segments().iter().map(|s| s.id).collect();
            let id = ids[pick % ids.len()];
            let grab = {
                let seg = arranger.timeline().segment(id).unwrap();
                arranger
                    .mapper()
                    .content_pos(seg.track_position, seg.track_index)
            };

            arranger.begin_drag(id, grab).unwrap();
            arranger.update_drag(Vec2::new(x * 0.5, y)).unwrap();
            match arranger.end_drag(Vec2::new(x, y), &catalog) {
                Ok(DropOutcome::Committed) | Ok(DropOutcome::Reverted) => {}
                Ok(DropOutcome::Collision(_)) => {
                    if choice == 4 {
                        arranger.cancel_drag().unwrap();
                    } else {
                        match arranger.resolve_collision(POLICIES[choice], &catalog) {
                            Ok(_) => {}
                            // A rejected commit keeps the old arrangement
                            Err(ArrangeError::InvariantViolation(_)) => {}
                            Err(e) => panic!("unexpected resolve error: {e}"),
                        }
                    }
                }
                // A rejected commit restores the pre-drag snapshot
                Err(ArrangeError::InvariantViolation(_)) => {}
                Err(e) => panic!("unexpected drop error: {e}"),
            }

            prop_assert!(arranger.is_idle());
            assert_no_overlap(&arranger);
        }
    }
}

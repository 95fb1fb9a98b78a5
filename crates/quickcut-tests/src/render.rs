//! Probe → arrange → render-plan integration.

use std::path::PathBuf;

use quickcut_core::{QuickCutError, Seconds};
use quickcut_engine::{Arranger, CoordinateMapper, MemoryCatalog, ResolvePolicy, Source};
use quickcut_media::{MediaProbe, RenderPlan};

const PROBE_JSON: &str = r#"{
    "streams": [
        {
            "index": 0,
            "codec_name": "h264",
            "codec_type": "video",
            "width": 1280,
            "height": 720,
            "r_frame_rate": "25/1"
        },
        {
            "index": 1,
            "codec_name": "aac",
            "codec_type": "audio",
            "sample_rate": "48000",
            "channels": 2
        }
    ],
    "format": {
        "format_name": "mov,mp4,m4a,3gp,3g2,mj2",
        "duration": "10.000000"
    }
}"#;

fn mapper() -> CoordinateMapper {
    CoordinateMapper::new(1.0, 40.0, 8.0, 2)
}

#[test]
fn probed_file_becomes_a_usable_source() {
    let probe = MediaProbe::from_json("media/intro.mp4", PROBE_JSON).unwrap();
    let source = probe.to_source();
    assert_eq!(source.name, "intro");
    assert!(source.has_video);

    let mut catalog = MemoryCatalog::new();
    catalog.add(source.clone());

    let mut arranger = Arranger::new(mapper());
    let id = arranger.import_source(&source, 0).unwrap();
    assert_eq!(
        arranger.timeline().segment(id).unwrap().duration(),
        Seconds::new(10, 1)
    );
}

#[test]
fn plan_lists_cuts_in_track_order() {
    let mut catalog = MemoryCatalog::new();
    let intro = Source::new("media/intro.mp4", "intro", Seconds::new(10, 1), true, true);
    let outro = Source::new("media/outro.mp4", "outro", Seconds::new(6, 1), true, true);
    catalog.add(intro.clone());
    catalog.add(outro.clone());

    let mut arranger = Arranger::new(mapper());
    arranger.import_source(&intro, 0).unwrap();
    arranger.import_source(&outro, 0).unwrap();

    let plan = RenderPlan::for_track(
        arranger.timeline(),
        0,
        &catalog,
        "/tmp/quickcut",
        "/tmp/out.mp4",
    )
    .unwrap();

    assert_eq!(plan.cuts.len(), 2);
    assert_eq!(plan.cuts[0].input, PathBuf::from("media/intro.mp4"));
    assert_eq!(plan.cuts[0].duration, Seconds::new(10, 1));
    assert_eq!(plan.cuts[1].input, PathBuf::from("media/outro.mp4"));
    assert_eq!(plan.concat.parts, vec![
        PathBuf::from("/tmp/quickcut/part-000.mp4"),
        PathBuf::from("/tmp/quickcut/part-001.mp4"),
    ]);
    assert_eq!(plan.step_count(), 3);
}

#[test]
fn plan_reflects_a_split_resolution() {
    let mut catalog = MemoryCatalog::new();
    let main = Source::new("media/main.mp4", "main", Seconds::new(10, 1), true, true);
    let cutaway = Source::new("media/cut.mp4", "cut", Seconds::new(4, 1), true, true);
    catalog.add(main.clone());
    catalog.add(cutaway.clone());

    let mut arranger = Arranger::new(mapper());
    arranger.import_source(&main, 0).unwrap();
    let b = arranger.import_source(&cutaway, 1).unwrap();

    let grab = arranger.mapper().content_pos(Seconds::ZERO, 1);
    arranger.begin_drag(b, grab).unwrap();
    let drop = arranger.mapper().content_pos(Seconds::new(5, 1), 0);
    arranger.end_drag(drop, &catalog).unwrap();
    arranger
        .resolve_collision(ResolvePolicy::SplitInsert, &catalog)
        .unwrap();

    let plan = RenderPlan::for_track(
        arranger.timeline(),
        0,
        &catalog,
        "/tmp/quickcut",
        "/tmp/out.mp4",
    )
    .unwrap();

    // main[0..5), cutaway[0..4), main[5..10)
    assert_eq!(plan.cuts.len(), 3);
    assert_eq!(plan.cuts[0].source_start, Seconds::ZERO);
    assert_eq!(plan.cuts[0].duration, Seconds::new(5, 1));
    assert_eq!(plan.cuts[1].input, PathBuf::from("media/cut.mp4"));
    assert_eq!(plan.cuts[1].duration, Seconds::new(4, 1));
    assert_eq!(plan.cuts[2].source_start, Seconds::new(5, 1));
    assert_eq!(plan.cuts[2].duration, Seconds::new(5, 1));
}

#[test]
fn overlays_are_left_out_of_the_program() {
    let mut catalog = MemoryCatalog::new();
    let video = Source::new("media/v.mp4", "v", Seconds::new(10, 1), true, true);
    let music = Source::new("media/m.flac", "m", Seconds::new(8, 1), false, true);
    catalog.add(video.clone());
    catalog.add(music.clone());

    let mut arranger = Arranger::new(mapper());
    arranger.import_source(&video, 0).unwrap();
    arranger
        .import_overlay(&music, 0, Seconds::new(1, 1))
        .unwrap();

    let plan = RenderPlan::for_track(
        arranger.timeline(),
        0,
        &catalog,
        "/tmp/quickcut",
        "/tmp/out.mp4",
    )
    .unwrap();
    assert_eq!(plan.cuts.len(), 1);
    assert_eq!(plan.cuts[0].input, PathBuf::from("media/v.mp4"));
}

#[test]
fn uncataloged_source_aborts_the_plan() {
    let catalog = MemoryCatalog::new();
    let stray = Source::new("media/x.mp4", "x", Seconds::new(5, 1), true, false);

    let mut arranger = Arranger::new(mapper());
    arranger.import_source(&stray, 0).unwrap();

    let err = RenderPlan::for_track(
        arranger.timeline(),
        0,
        &catalog,
        "/tmp/quickcut",
        "/tmp/out.mp4",
    )
    .unwrap_err();
    assert!(matches!(err, QuickCutError::NotFound(_)));
}

use super::*;
use crate::{
    foundation::core::{Millis, Viewport},
    page::model::{ElementSeed, PageDoc},
    page::ops::{DomOp, RecordingSink},
};

const VH: f64 = 800.0;

#[test]
fn region_is_anchored_one_viewport_early() {
    let region = effect_region(2000.0, VH);
    assert_eq!(region.start, 1200.0);
    assert_eq!(region.range, 2000.0);
    assert_eq!(region.end, 3200.0);
}

#[test]
fn targets_at_region_start_are_opposed_extremes() {
    let region = effect_region(2000.0, VH);
    let (first, second) = target_offsets(region.start, region).unwrap();
    assert_eq!(first, -MAX_MOVE_PX);
    assert_eq!(second, MAX_MOVE_PX);
}

#[test]
fn targets_sweep_linearly_to_the_opposite_extreme() {
    let region = effect_region(2000.0, VH);
    let mid = region.start + region.range / 2.0;
    assert_eq!(target_offsets(mid, region).unwrap(), (0.0, 0.0));
    let (first, second) = target_offsets(region.end, region).unwrap();
    assert_eq!(first, MAX_MOVE_PX);
    assert_eq!(second, -MAX_MOVE_PX);
}

#[test]
fn outside_the_region_targets_freeze() {
    let region = effect_region(2000.0, VH);
    assert_eq!(target_offsets(region.start - 1.0, region), None);
    assert_eq!(target_offsets(region.end + 1.0, region), None);
}

#[test]
fn smoothing_converges_and_keeps_exact_opposition() {
    let mut offsets = OffsetPair::new(LERP_FACTOR);
    offsets.retarget(250.0, -250.0);
    let mut previous_gap = (offsets.current1 - 250.0).abs();
    for _ in 0..300 {
        offsets.step();
        let gap = (offsets.current1 - 250.0).abs();
        assert!(gap <= previous_gap);
        previous_gap = gap;
        assert_eq!(offsets.current2, -offsets.current1);
    }
    assert!((offsets.current1 - 250.0).abs() < 1e-3);
}

fn gallery_doc() -> (PageDoc, ElementId, ElementId) {
    let mut doc = PageDoc::new();
    let root = doc.insert(ElementSeed::div().rect(0.0, 0.0, 1280.0, 8000.0));
    let gallery1 = doc.insert(
        ElementSeed::div()
            .class("gallery1")
            .parent(root)
            .rect(0.0, 2000.0, 1280.0, 600.0),
    );
    let content1 = doc.insert(ElementSeed::div().parent(gallery1));
    let gallery2 = doc.insert(
        ElementSeed::div()
            .class("gallery2")
            .parent(root)
            .rect(0.0, 2700.0, 1280.0, 600.0),
    );
    let _content2 = doc.insert(ElementSeed::div().parent(gallery2));
    (doc, content1, _content2)
}

#[test]
fn controller_requires_both_galleries_and_children() {
    let (doc, ..) = gallery_doc();
    assert!(ParallaxController::try_new(&doc).is_some());

    let mut missing_child = PageDoc::new();
    let root = missing_child.insert(ElementSeed::div());
    missing_child.insert(ElementSeed::div().class("gallery1").parent(root));
    missing_child.insert(ElementSeed::div().class("gallery2").parent(root));
    assert!(ParallaxController::try_new(&missing_child).is_none());

    assert!(ParallaxController::try_new(&PageDoc::new()).is_none());
}

#[test]
fn frames_write_opposed_margins() {
    let (mut doc, content1, content2) = gallery_doc();
    let mut sink = RecordingSink::new();
    let mut controller = ParallaxController::try_new(&doc).unwrap();

    // Scroll to the region start: targets are (-400, 400).
    let region = effect_region(2000.0, VH);
    for frame in 0..200u64 {
        let mut cx = EffectCx {
            doc: &mut doc,
            sink: &mut sink,
            engine: None,
            viewport: Viewport::new(1280.0, VH).unwrap(),
            scroll_y: region.start,
            now: Millis(frame * 16),
        };
        controller.handle(&PageEvent::FrameTick, &mut cx).unwrap();
    }

    let first = sink.last_matching(
        |op| matches!(op, DomOp::SetMarginLeft { element, .. } if *element == content1),
    );
    let Some(DomOp::SetMarginLeft { px: px1, .. }) = first else {
        panic!("no margin write for content1");
    };
    let second = sink.last_matching(
        |op| matches!(op, DomOp::SetMarginLeft { element, .. } if *element == content2),
    );
    let Some(DomOp::SetMarginLeft { px: px2, .. }) = second else {
        panic!("no margin write for content2");
    };
    assert!((px1 + MAX_MOVE_PX).abs() < 1.0, "px1 = {px1}");
    assert_eq!(*px2, -*px1);
}

#[test]
fn out_of_range_scroll_freezes_at_last_targets() {
    let (mut doc, ..) = gallery_doc();
    let mut sink = RecordingSink::new();
    let mut controller = ParallaxController::try_new(&doc).unwrap();
    let region = effect_region(2000.0, VH);

    let mut run = |controller: &mut ParallaxController,
                   doc: &mut PageDoc,
                   sink: &mut RecordingSink,
                   scroll_y: f64,
                   frames: u64| {
        for frame in 0..frames {
            let mut cx = EffectCx {
                doc: &mut *doc,
                sink: &mut *sink,
                engine: None,
                viewport: Viewport::new(1280.0, VH).unwrap(),
                scroll_y,
                now: Millis(frame * 16),
            };
            controller.handle(&PageEvent::FrameTick, &mut cx).unwrap();
        }
    };

    run(&mut controller, &mut doc, &mut sink, region.end, 100);
    let at_end = controller.offsets();
    assert!((at_end.target1 - MAX_MOVE_PX).abs() < 1e-9);

    // Far past the region: the stored targets do not snap back.
    run(&mut controller, &mut doc, &mut sink, region.end + 5000.0, 10);
    let past_end = controller.offsets();
    assert_eq!(past_end.target1, at_end.target1);
    assert_eq!(past_end.target2, at_end.target2);
}

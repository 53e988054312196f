use super::*;
use crate::{
    animation::engine::InlineEngine,
    animation::tween::Prop,
    page::model::ElementSeed,
    page::ops::{DomOp, RecordingSink},
};

const VW: f64 = 1280.0;
const VH: f64 = 800.0;

fn viewport() -> Viewport {
    Viewport::new(VW, VH).unwrap()
}

/// A page exercising every activation marker at once.
fn full_doc() -> PageDoc {
    let mut doc = PageDoc::new();
    let root = doc.insert(ElementSeed::div().rect(0.0, 0.0, VW, 20_000.0));

    let preloader = doc.insert(
        ElementSeed::div()
            .dom_id("preloadercanvas-1")
            .parent(root)
            .rect(0.0, 0.0, VW, VH),
    );
    doc.insert(
        ElementSeed::div()
            .class("animated-preloader-object")
            .parent(preloader)
            .rect(600.0, 360.0, 80.0, 80.0),
    );

    let textfill = doc.insert(
        ElementSeed::div()
            .class("textfill")
            .parent(root)
            .rect(0.0, 1200.0, VW, 300.0),
    );
    doc.insert(
        ElementSeed::new("h2")
            .parent(textfill)
            .text("Studio")
            .rect(100.0, 1250.0, 800.0, 100.0),
    );

    let gallery1 = doc.insert(
        ElementSeed::div()
            .class("gallery1")
            .parent(root)
            .rect(0.0, 2000.0, VW, 600.0),
    );
    doc.insert(ElementSeed::div().parent(gallery1));
    let gallery2 = doc.insert(
        ElementSeed::div()
            .class("gallery2")
            .parent(root)
            .rect(0.0, 2700.0, VW, 600.0),
    );
    doc.insert(ElementSeed::div().parent(gallery2));

    let container = doc.insert(
        ElementSeed::div()
            .class("container")
            .parent(root)
            .rect(0.0, 3500.0, VW, 1500.0),
    );
    for i in 0..2 {
        doc.insert(
            ElementSeed::div()
                .class("hovertitle")
                .parent(container)
                .rect(100.0, 3600.0 + 200.0 * i as f64, 600.0, 120.0),
        );
    }
    for i in 0..2 {
        doc.insert(
            ElementSeed::div()
                .class("hoverphoto")
                .parent(container)
                .rect(800.0, 3600.0 + 200.0 * i as f64, 300.0, 200.0),
        );
    }

    let logo_section = doc.insert(
        ElementSeed::div()
            .class("sb")
            .parent(root)
            .rect(0.0, 5200.0, VW, VH),
    );
    doc.insert(
        ElementSeed::div()
            .class("animated-logo")
            .parent(logo_section)
            .rect(440.0, 5400.0, 400.0, 200.0),
    );

    for i in 0..3 {
        doc.insert(
            ElementSeed::div()
                .dom_id(format!("horizontalscroll-{i}"))
                .parent(root)
                .rect(0.0, 6500.0 + 500.0 * i as f64, VW, 500.0),
        );
    }

    let grow_section = doc.insert(
        ElementSeed::div()
            .class("sb")
            .parent(root)
            .rect(0.0, 9000.0, VW, 900.0),
    );
    let bg = doc.insert(
        ElementSeed::div()
            .class("ss-bg")
            .parent(grow_section)
            .rect(0.0, 9000.0, VW, 900.0),
    );
    let grow = doc.insert(
        ElementSeed::div()
            .class("grow-image")
            .parent(bg)
            .rect(0.0, 9000.0, VW, 900.0),
    );
    doc.insert(ElementSeed::div().parent(grow));

    let theme_section = doc.insert(
        ElementSeed::div()
            .class("sb")
            .parent(root)
            .rect(0.0, 11_000.0, VW, 1000.0),
    );
    let bgchange = doc.insert(
        ElementSeed::div()
            .class("bgchange")
            .parent(theme_section)
            .rect(0.0, 11_100.0, VW, 800.0),
    );
    doc.insert(
        ElementSeed::new("svg")
            .parent(bgchange)
            .rect(400.0, 11_200.0, 480.0, 200.0),
    );

    doc
}

fn tokens() -> StyleTokens {
    let mut t = StyleTokens::new();
    t.insert("--activate-preloader", "true");
    t.insert("--preloader-animation", "pulse");
    t.insert("--min-display-time", "1s");
    t
}

#[test]
fn activates_one_task_per_present_marker() {
    let mut sink = RecordingSink::new();
    let runtime = EffectsRuntime::new(
        full_doc(),
        &tokens(),
        viewport(),
        Some(InlineEngine::new()),
        Millis(0),
        &mut sink,
    )
    .unwrap();

    assert_eq!(
        runtime.task_names(),
        vec![
            "preloader",
            "parallax",
            "horizontal-scroll",
            "hover-exclusivity",
            "textfill",
            "logo-reveal",
            "grow-image",
            "theme-crossfade",
        ]
    );
}

#[test]
fn an_empty_page_activates_nothing() {
    let mut doc = PageDoc::new();
    doc.insert(ElementSeed::div().rect(0.0, 0.0, VW, 2000.0));
    let mut sink = RecordingSink::new();
    let runtime = EffectsRuntime::new(
        doc,
        &StyleTokens::new(),
        viewport(),
        Some(InlineEngine::new()),
        Millis(0),
        &mut sink,
    )
    .unwrap();
    assert!(runtime.task_names().is_empty());
    assert!(sink.ops.is_empty());
}

#[test]
fn scroll_events_coalesce_to_the_latest_position() {
    let mut sink = RecordingSink::new();
    let mut runtime = EffectsRuntime::new(
        full_doc(),
        &tokens(),
        viewport(),
        Some(InlineEngine::new()),
        Millis(0),
        &mut sink,
    )
    .unwrap();

    runtime
        .dispatch(PageEvent::Scroll { y: 100.0 }, Millis(10), &mut sink)
        .unwrap();
    runtime
        .dispatch(PageEvent::Scroll { y: 9999.0 }, Millis(11), &mut sink)
        .unwrap();
    runtime
        .dispatch(PageEvent::Scroll { y: 1200.0 }, Millis(12), &mut sink)
        .unwrap();
    assert_eq!(runtime.scroll_y(), 1200.0);
}

#[test]
fn preloader_lifecycle_runs_end_to_end_through_the_runtime() {
    let mut sink = RecordingSink::new();
    let mut runtime = EffectsRuntime::new(
        full_doc(),
        &tokens(),
        viewport(),
        Some(InlineEngine::new()),
        Millis(0),
        &mut sink,
    )
    .unwrap();
    let section = runtime.doc().find_id_contains("preloadercanvas")[0];

    runtime
        .dispatch(PageEvent::WindowLoad, Millis(200), &mut sink)
        .unwrap();
    // Min display is 1 s; ride frames past it and past the 0.5 s fade.
    for t in (250..=2000).step_by(50) {
        runtime.frame(Millis(t), &mut sink).unwrap();
    }
    assert!(
        sink.ops
            .contains(&DomOp::SetDisplayNone { element: section }),
        "fade completion must turn the overlay off"
    );
    assert_eq!(
        runtime.engine().unwrap().scalar_of(section, &Prop::Opacity),
        Some(0.0)
    );
}

#[test]
fn parallax_margins_flow_during_frames() {
    let mut sink = RecordingSink::new();
    let mut runtime = EffectsRuntime::new(
        full_doc(),
        &tokens(),
        viewport(),
        Some(InlineEngine::new()),
        Millis(0),
        &mut sink,
    )
    .unwrap();
    let gallery1 = runtime.doc().first_by_class("gallery1").unwrap();
    let content1 = runtime.doc().first_child(gallery1).unwrap();

    // Gallery top 2000: region starts at 1200.
    runtime
        .dispatch(PageEvent::Scroll { y: 1200.0 }, Millis(0), &mut sink)
        .unwrap();
    for t in (0..3200u64).step_by(16) {
        runtime.frame(Millis(t), &mut sink).unwrap();
    }
    let margin = sink
        .last_matching(
            |op| matches!(op, DomOp::SetMarginLeft { element, .. } if *element == content1),
        )
        .and_then(|op| match op {
            DomOp::SetMarginLeft { px, .. } => Some(*px),
            _ => None,
        })
        .unwrap();
    assert!((margin + 400.0).abs() < 1.0, "margin = {margin}");
}

#[test]
fn resize_refresh_is_debounced_globally() {
    let mut sink = RecordingSink::new();
    let mut runtime = EffectsRuntime::new(
        full_doc(),
        &tokens(),
        viewport(),
        Some(InlineEngine::new()),
        Millis(0),
        &mut sink,
    )
    .unwrap();

    let vp = Viewport::new(1440.0, 900.0).unwrap();
    runtime
        .dispatch(PageEvent::Resize { viewport: vp }, Millis(1000), &mut sink)
        .unwrap();
    assert_eq!(runtime.viewport(), vp);

    // Refresh settles after the 250 ms quiet window; riding frames
    // through it must not disturb any task.
    runtime.frame(Millis(1100), &mut sink).unwrap();
    runtime.frame(Millis(1300), &mut sink).unwrap();
    runtime.frame(Millis(1400), &mut sink).unwrap();
}

#[test]
fn late_engine_attach_builds_the_deferred_tasks() {
    let mut sink = RecordingSink::new();
    let mut runtime = EffectsRuntime::<InlineEngine>::new(
        full_doc(),
        &tokens(),
        viewport(),
        None,
        Millis(0),
        &mut sink,
    )
    .unwrap();
    assert_eq!(
        runtime.task_names(),
        vec![
            "preloader",
            "parallax",
            "horizontal-scroll",
            "hover-exclusivity",
        ]
    );

    runtime
        .attach_engine(InlineEngine::new(), &tokens(), Millis(700), &mut sink)
        .unwrap();
    assert_eq!(runtime.task_names().len(), 8);

    // Hover replayed its hidden state into the late engine.
    let photo = runtime.doc().first_by_class("hoverphoto").unwrap();
    assert!(!runtime.engine().unwrap().is_visible(photo));

    // A second attach is a contract violation.
    let err = runtime
        .attach_engine(InlineEngine::new(), &tokens(), Millis(800), &mut sink)
        .unwrap_err();
    assert!(matches!(err, WeaveError::Validation(_)));
}

#[test]
fn image_settled_events_update_the_document() {
    let mut doc = PageDoc::new();
    let root = doc.insert(ElementSeed::div().rect(0.0, 0.0, VW, 2000.0));
    let img = doc.insert(ElementSeed::new("img").parent(root));
    let mut sink = RecordingSink::new();
    let mut runtime = EffectsRuntime::new(
        doc,
        &StyleTokens::new(),
        viewport(),
        Some(InlineEngine::new()),
        Millis(0),
        &mut sink,
    )
    .unwrap();

    assert!(!runtime.doc().is_image_complete(img));
    runtime
        .dispatch(PageEvent::ImageSettled { element: img }, Millis(10), &mut sink)
        .unwrap();
    assert!(runtime.doc().is_image_complete(img));
}

use super::*;
use crate::{
    animation::engine::{AnimationEngine, InlineEngine},
    foundation::core::{Millis, Viewport},
    page::model::{ElementSeed, PageDoc},
    page::ops::RecordingSink,
};

fn textfill_doc(text: &str) -> (PageDoc, ElementId) {
    let mut doc = PageDoc::new();
    let root = doc.insert(ElementSeed::div().rect(0.0, 0.0, 1280.0, 6000.0));
    let container = doc.insert(
        ElementSeed::div()
            .class("textfill")
            .parent(root)
            .rect(0.0, 2400.0, 1280.0, 400.0),
    );
    doc.insert(
        ElementSeed::new("h2")
            .parent(container)
            .text(text)
            .rect(100.0, 2500.0, 1000.0, 120.0),
    );
    (doc, container)
}

struct Harness {
    doc: PageDoc,
    sink: RecordingSink,
    engine: InlineEngine,
}

impl Harness {
    fn with<R>(&mut self, f: impl FnOnce(&mut EffectCx<'_>) -> R) -> R {
        let mut cx = EffectCx {
            doc: &mut self.doc,
            sink: &mut self.sink,
            engine: Some(&mut self.engine as &mut dyn AnimationEngine),
            viewport: Viewport::new(1280.0, 800.0).unwrap(),
            scroll_y: 0.0,
            now: Millis(0),
        };
        f(&mut cx)
    }
}

#[test]
fn splits_text_and_dims_every_char() {
    let (doc, _) = textfill_doc("Hi yo");
    let mut h = Harness {
        doc,
        sink: RecordingSink::new(),
        engine: InlineEngine::new(),
    };
    let controller = h.with(TextfillController::new);
    assert_eq!(controller.entry_count(), 1);

    let chars = h
        .sink
        .ops
        .iter()
        .find_map(|op| match op {
            DomOp::SplitChars { chars, .. } => Some(chars.clone()),
            _ => None,
        })
        .expect("split op emitted");
    assert_eq!(chars.len(), 4);

    // Registered at progress 0: every char sits at the dimmed floor.
    for &ch in &chars {
        assert_eq!(h.engine.scalar_of(ch, &Prop::Opacity), Some(0.2));
    }
}

#[test]
fn scrubbing_brightens_front_chars_first() {
    let (doc, _) = textfill_doc("Hello");
    let mut h = Harness {
        doc,
        sink: RecordingSink::new(),
        engine: InlineEngine::new(),
    };
    let _controller = h.with(TextfillController::new);
    let chars = h
        .sink
        .ops
        .iter()
        .find_map(|op| match op {
            DomOp::SplitChars { chars, .. } => Some(chars.clone()),
            _ => None,
        })
        .unwrap();

    // Trigger: container top (2400) against 80% / 10% viewport lines ->
    // region 1760..2320. Scrub midway and settle.
    h.engine.drive(Millis(5000), 2040.0);
    h.engine.drive(Millis(10_000), 2040.0);
    let first = h.engine.scalar_of(chars[0], &Prop::Opacity).unwrap();
    let last = h.engine.scalar_of(chars[4], &Prop::Opacity).unwrap();
    assert!(first > last, "{first} vs {last}");

    // Fully through the region: everything is at full opacity.
    h.engine.drive(Millis(20_000), 2320.0);
    h.engine.drive(Millis(30_000), 2320.0);
    for &ch in &chars {
        assert_eq!(h.engine.scalar_of(ch, &Prop::Opacity), Some(1.0));
    }
}

#[test]
fn container_without_text_child_is_skipped() {
    let mut doc = PageDoc::new();
    let root = doc.insert(ElementSeed::div().rect(0.0, 0.0, 1280.0, 6000.0));
    doc.insert(ElementSeed::div().class("textfill").parent(root));
    let mut h = Harness {
        doc,
        sink: RecordingSink::new(),
        engine: InlineEngine::new(),
    };
    let controller = h.with(TextfillController::new);
    assert_eq!(controller.entry_count(), 0);
}

#[test]
fn whitespace_only_text_is_skipped() {
    let (doc, _) = textfill_doc("   ");
    let mut h = Harness {
        doc,
        sink: RecordingSink::new(),
        engine: InlineEngine::new(),
    };
    let controller = h.with(TextfillController::new);
    assert_eq!(controller.entry_count(), 0);
}

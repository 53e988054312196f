use crate::{page::model::ElementId, style::color::Rgba8};

/// Direct DOM write emitted by a controller.
///
/// Ops are the core's half of the page contract: everything the
/// controllers decide (margins, scroll offsets, classes, custom
/// properties, synthesized structure) leaves through here, so an
/// embedder can mirror it onto a real document and tests can assert on
/// it. Tween-driven property changes travel through the animation
/// engine instead.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum DomOp {
    SetMarginLeft {
        element: ElementId,
        px: f64,
    },
    SetScrollLeft {
        element: ElementId,
        px: f64,
    },
    SetOpacity {
        element: ElementId,
        value: f64,
    },
    /// visibility:hidden + pointer-events:none (and back).
    SetHidden {
        element: ElementId,
        hidden: bool,
    },
    SetDisplayNone {
        element: ElementId,
    },
    AddClass {
        element: ElementId,
        class: String,
    },
    RemoveClass {
        element: ElementId,
        class: String,
    },
    SetHeightPx {
        element: ElementId,
        px: f64,
    },
    /// Root-level custom property carrying a theme color.
    SetCustomColor {
        name: String,
        value: Rgba8,
    },
    /// Wrapper structure synthesized around the horizontal-scroll targets.
    SynthesizeWrapper {
        container: ElementId,
        pinned: ElementId,
        track: ElementId,
        targets: Vec<ElementId>,
    },
    /// Text content split into per-character child elements.
    SplitChars {
        element: ElementId,
        chars: Vec<ElementId>,
    },
}

/// Receiver for [`DomOp`] writes.
pub trait DomSink {
    fn apply(&mut self, op: DomOp);
}

/// Sink that keeps every op, for tests and embedder debugging.
#[derive(Debug, Default)]
pub struct RecordingSink {
    pub ops: Vec<DomOp>,
}

impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last op matching `pred`, if any.
    pub fn last_matching(&self, pred: impl Fn(&DomOp) -> bool) -> Option<&DomOp> {
        self.ops.iter().rev().find(|op| pred(op))
    }
}

impl DomSink for RecordingSink {
    fn apply(&mut self, op: DomOp) {
        self.ops.push(op);
    }
}

/// Sink that drops every op (headless runs that only care about the
/// engine-side values).
#[derive(Debug, Default)]
pub struct NullSink;

impl DomSink for NullSink {
    fn apply(&mut self, _op: DomOp) {}
}

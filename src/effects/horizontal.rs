use crate::{
    foundation::core::{Rect, Viewport, clamp01},
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::{ElementId, ElementSeed, PageDoc},
    page::ops::{DomOp, DomSink},
    runtime::task::{EffectCx, EffectTask},
};

/// Id fragment that marks an element as a horizontal-scroll page.
pub const TARGET_ID_FRAGMENT: &str = "horizontalscroll";
const STICKY_CLASS: &str = "sticky-fixed";

/// Vertical progress through the pinned region, clamped to [0, 1].
///
/// `container_top` is the wrapper's top edge relative to the viewport
/// (negative once scrolled past).
pub fn scroll_progress(container_top: f64, container_height: f64, viewport_height: f64) -> f64 {
    let scrollable = container_height - viewport_height;
    if scrollable <= 0.0 {
        return if container_top <= 0.0 { 1.0 } else { 0.0 };
    }
    clamp01(-container_top / scrollable)
}

/// Maps vertical scroll inside a pinned region onto horizontal scroll of
/// an inner track, giving horizontal paging during vertical scrolling.
/// Needs no animation engine.
pub struct HorizontalScrollController {
    container: ElementId,
    pinned: ElementId,
    count: usize,
    pinned_active: bool,
    last_scroll_left: Option<f64>,
}

impl HorizontalScrollController {
    /// Synthesize the wrapper structure around the target elements and
    /// run one immediate scroll pass (the page may load mid-scroll).
    ///
    /// `None` when no targets exist or a wrapper is already in place
    /// (initialization is idempotent).
    pub fn try_init(
        doc: &mut PageDoc,
        viewport: Viewport,
        scroll_y: f64,
        sink: &mut dyn DomSink,
    ) -> Option<Self> {
        let targets = doc.find_id_contains(TARGET_ID_FRAGMENT);
        if targets.is_empty() || doc.first_by_class("fixed-container").is_some() {
            return None;
        }

        let count = targets.len();
        let first_rect = doc.rect(targets[0])?;
        let container_height = count as f64 * viewport.height;

        let container = doc.insert(
            ElementSeed::div().class("fixed-container").rect(
                first_rect.x0,
                first_rect.y0,
                viewport.width,
                container_height,
            ),
        );
        let pinned = doc.insert(
            ElementSeed::div()
                .class("fixed")
                .parent(container)
                .rect(first_rect.x0, first_rect.y0, viewport.width, viewport.height)
                .scroll_width(count as f64 * viewport.width),
        );
        let track = doc.insert(ElementSeed::div().class("horizontal").parent(pinned));
        for &target in &targets {
            doc.reparent(target, track);
        }

        sink.apply(DomOp::SynthesizeWrapper {
            container,
            pinned,
            track,
            targets,
        });
        sink.apply(DomOp::SetHeightPx {
            element: container,
            px: container_height,
        });

        let mut controller = Self {
            container,
            pinned,
            count,
            pinned_active: false,
            last_scroll_left: None,
        };
        controller.update(doc, viewport, scroll_y, sink);
        Some(controller)
    }

    fn set_scroll_left(&mut self, sink: &mut dyn DomSink, px: f64) {
        if self.last_scroll_left != Some(px) {
            self.last_scroll_left = Some(px);
            sink.apply(DomOp::SetScrollLeft {
                element: self.pinned,
                px,
            });
        }
    }

    fn update(&mut self, doc: &PageDoc, viewport: Viewport, scroll_y: f64, sink: &mut dyn DomSink) {
        let Some(rect) = doc.rect(self.container) else {
            return;
        };
        let container_top = rect.y0 - scroll_y;

        if container_top > 0.0 {
            if self.pinned_active {
                self.pinned_active = false;
                sink.apply(DomOp::RemoveClass {
                    element: self.pinned,
                    class: STICKY_CLASS.to_string(),
                });
            }
            self.set_scroll_left(sink, 0.0);
            return;
        }

        if !self.pinned_active {
            self.pinned_active = true;
            sink.apply(DomOp::AddClass {
                element: self.pinned,
                class: STICKY_CLASS.to_string(),
            });
        }

        let progress = scroll_progress(container_top, rect.height(), viewport.height);
        let scroll_width = doc.get(self.pinned).map_or(0.0, |n| n.scroll_width);
        let scrollable_width = (scroll_width - viewport.width).max(0.0);
        self.set_scroll_left(sink, progress * scrollable_width);
    }

    /// Re-derive viewport-relative sizes after a resize (the wrapper is
    /// sized in viewport units).
    fn resize(&mut self, cx: &mut EffectCx<'_>) {
        let viewport = cx.viewport;
        let Some(rect) = cx.doc.rect(self.container) else {
            return;
        };
        let container_height = self.count as f64 * viewport.height;
        cx.doc.set_rect(
            self.container,
            Rect::new(
                rect.x0,
                rect.y0,
                rect.x0 + viewport.width,
                rect.y0 + container_height,
            ),
        );
        cx.doc
            .set_scroll_width(self.pinned, self.count as f64 * viewport.width);
        cx.sink.apply(DomOp::SetHeightPx {
            element: self.container,
            px: container_height,
        });
    }
}

impl EffectTask for HorizontalScrollController {
    fn name(&self) -> &'static str {
        "horizontal-scroll"
    }

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        match event {
            PageEvent::Scroll { .. } => {
                self.update(cx.doc, cx.viewport, cx.scroll_y, cx.sink);
            }
            PageEvent::Resize { .. } => {
                self.resize(cx);
                self.update(cx.doc, cx.viewport, cx.scroll_y, cx.sink);
            }
            _ => {}
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/horizontal.rs"]
mod tests;

use crate::{
    foundation::core::smooth_toward,
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::{ElementId, PageDoc},
    page::ops::DomOp,
    runtime::task::{EffectCx, EffectTask},
};

pub const MAX_MOVE_PX: f64 = 400.0;
pub const LERP_FACTOR: f64 = 0.08;
pub const RANGE_VIEWPORTS: f64 = 2.5;

/// Scroll interval over which the galleries slide, derived from element
/// geometry plus viewport height; recomputed every frame.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ScrollRegion {
    pub start: f64,
    pub end: f64,
    pub range: f64,
}

/// Region anchored one viewport above the first gallery, spanning 2.5
/// viewport heights.
pub fn effect_region(gallery_top: f64, viewport_height: f64) -> ScrollRegion {
    let start = gallery_top - viewport_height;
    let range = viewport_height * RANGE_VIEWPORTS;
    ScrollRegion {
        start,
        end: start + range,
        range,
    }
}

/// Opposed target offsets for a scroll position inside the region.
///
/// `None` outside the region: targets are left unchanged there, so the
/// offsets freeze at their last in-range value instead of snapping back.
pub fn target_offsets(scroll_y: f64, region: ScrollRegion) -> Option<(f64, f64)> {
    if scroll_y < region.start || scroll_y > region.end {
        return None;
    }
    let progress = (scroll_y - region.start) / region.range;
    let first = progress * 2.0 * MAX_MOVE_PX - MAX_MOVE_PX;
    Some((first, -first))
}

/// Smoothed offset state for the linked gallery pair.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct OffsetPair {
    pub current1: f64,
    pub current2: f64,
    pub target1: f64,
    pub target2: f64,
    pub lerp_factor: f64,
}

impl OffsetPair {
    pub fn new(lerp_factor: f64) -> Self {
        Self {
            current1: 0.0,
            current2: 0.0,
            target1: 0.0,
            target2: 0.0,
            lerp_factor,
        }
    }

    pub fn retarget(&mut self, target1: f64, target2: f64) {
        self.target1 = target1;
        self.target2 = target2;
    }

    /// One smoothing step toward the stored targets.
    pub fn step(&mut self) {
        self.current1 = smooth_toward(self.current1, self.target1, self.lerp_factor);
        self.current2 = smooth_toward(self.current2, self.target2, self.lerp_factor);
    }
}

/// Continuous per-frame engine driving the counter-sliding gallery pair.
///
/// Needs no animation engine: it owns the smoothing loop and writes
/// margins directly.
pub struct ParallaxController {
    gallery1: ElementId,
    content1: ElementId,
    content2: ElementId,
    offsets: OffsetPair,
}

impl ParallaxController {
    /// `None` when either gallery or its first content child is absent;
    /// the engine then never starts.
    pub fn try_new(doc: &PageDoc) -> Option<Self> {
        let gallery1 = doc.first_by_class("gallery1")?;
        let gallery2 = doc.first_by_class("gallery2")?;
        let content1 = doc.first_child(gallery1)?;
        let content2 = doc.first_child(gallery2)?;
        Some(Self {
            gallery1,
            content1,
            content2,
            offsets: OffsetPair::new(LERP_FACTOR),
        })
    }

    pub fn offsets(&self) -> OffsetPair {
        self.offsets
    }

    fn frame(&mut self, cx: &mut EffectCx<'_>) {
        let Some(rect) = cx.doc.rect(self.gallery1) else {
            return;
        };
        let region = effect_region(rect.y0, cx.viewport.height);
        if let Some((t1, t2)) = target_offsets(cx.scroll_y, region) {
            self.offsets.retarget(t1, t2);
        }
        self.offsets.step();
        cx.sink.apply(DomOp::SetMarginLeft {
            element: self.content1,
            px: self.offsets.current1,
        });
        cx.sink.apply(DomOp::SetMarginLeft {
            element: self.content2,
            px: self.offsets.current2,
        });
    }
}

impl EffectTask for ParallaxController {
    fn name(&self) -> &'static str {
        "parallax"
    }

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        if matches!(event, PageEvent::FrameTick) {
            self.frame(cx);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/parallax.rs"]
mod tests;

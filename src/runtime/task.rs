use crate::{
    animation::engine::AnimationEngine,
    foundation::core::{Millis, Viewport},
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::PageDoc,
    page::ops::DomSink,
};

/// Per-dispatch context handed to every effect task.
pub struct EffectCx<'a> {
    pub doc: &'a mut PageDoc,
    pub sink: &'a mut dyn DomSink,
    pub engine: Option<&'a mut dyn AnimationEngine>,
    pub viewport: Viewport,
    /// Most recent scroll position (coalesced, last event wins).
    pub scroll_y: f64,
    pub now: Millis,
}

impl EffectCx<'_> {
    /// Reborrow the optional engine for a single call site.
    pub fn engine(&mut self) -> Option<&mut dyn AnimationEngine> {
        match &mut self.engine {
            Some(engine) => Some(&mut **engine),
            None => None,
        }
    }
}

/// An independent page effect with its own setup and event handling.
///
/// Tasks never observe each other; they share only the document and the
/// engine. A task whose activation markers are absent is simply never
/// constructed.
pub trait EffectTask {
    fn name(&self) -> &'static str;

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()>;

    /// Recompute scroll-trigger boundaries after a reflow. Called by the
    /// runtime once per debounced resize settle.
    fn refresh(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        let _ = cx;
        Ok(())
    }

    /// The animation engine became available after this task was
    /// constructed. Tasks that seeded visual state through the sink can
    /// replay it into the engine here.
    fn on_engine_attached(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        let _ = cx;
        Ok(())
    }
}

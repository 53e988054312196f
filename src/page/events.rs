use crate::{
    animation::tween::TweenHandle, foundation::core::Viewport, page::model::ElementId,
};

/// Input alphabet of an effects session.
///
/// Scroll positions are coalesced last-event-wins: the runtime stores
/// the most recent value and the per-frame work reads it on the next
/// [`PageEvent::FrameTick`]; intermediate positions are never replayed.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum PageEvent {
    /// Animation-frame tick; all per-frame work hangs off this.
    FrameTick,
    Scroll {
        y: f64,
    },
    Resize {
        viewport: Viewport,
    },
    /// The one-shot full page "load" event.
    WindowLoad,
    /// An image element reported loaded-or-errored.
    ImageSettled {
        element: ElementId,
    },
    PointerEnter {
        element: ElementId,
    },
    PointerLeave {
        element: ElementId,
    },
    WindowBlur,
    /// A tween finished (reported by the engine, or by the embedder when
    /// a real animation library drives the page).
    TweenCompleted {
        handle: TweenHandle,
    },
}

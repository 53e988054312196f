use crate::{
    animation::ease::Ease,
    animation::tween::{Prop, Value},
    foundation::core::{Rect, Viewport, clamp01},
    foundation::error::{WeaveError, WeaveResult},
    page::model::ElementId,
};

/// A point where an element edge meets a viewport line, expressed as
/// fractions: `element_fraction` 0.0 = top edge, 1.0 = bottom edge;
/// `viewport_fraction` 0.0 = viewport top, 1.0 = viewport bottom.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerEdge {
    pub element_fraction: f64,
    pub viewport_fraction: f64,
}

impl TriggerEdge {
    pub const fn new(element_fraction: f64, viewport_fraction: f64) -> Self {
        Self {
            element_fraction,
            viewport_fraction,
        }
    }

    /// Element top meets viewport bottom ("top bottom").
    pub const TOP_BOTTOM: TriggerEdge = TriggerEdge::new(0.0, 1.0);
    /// Element top meets viewport top ("top top").
    pub const TOP_TOP: TriggerEdge = TriggerEdge::new(0.0, 0.0);
    /// Element top meets viewport center ("top center").
    pub const TOP_CENTER: TriggerEdge = TriggerEdge::new(0.0, 0.5);
    /// Element bottom meets viewport center ("bottom center").
    pub const BOTTOM_CENTER: TriggerEdge = TriggerEdge::new(1.0, 0.5);
}

/// End boundary of a scroll trigger.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum TriggerEnd {
    Edge(TriggerEdge),
    /// A fixed scroll distance past the start, in viewport heights.
    AfterStart { viewports: f64 },
}

/// Trigger definition against a marker element.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerSpec {
    pub element: ElementId,
    pub start: TriggerEdge,
    pub end: TriggerEnd,
}

impl TriggerSpec {
    pub const fn new(element: ElementId, start: TriggerEdge, end: TriggerEnd) -> Self {
        Self {
            element,
            start,
            end,
        }
    }

    /// Resolve against the marker's current geometry; `None` when the
    /// marker no longer exists.
    pub fn resolve(
        &self,
        doc: &crate::page::model::PageDoc,
        viewport: Viewport,
    ) -> Option<TriggerBounds> {
        let rect = doc.rect(self.element)?;
        Some(resolve_trigger_bounds(rect, viewport, self.start, self.end))
    }
}

/// Absolute scroll-position boundaries of a trigger region.
///
/// Derived from element geometry and viewport height; recomputed on any
/// reflow that can move trigger positions.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TriggerBounds {
    pub start_y: f64,
    pub end_y: f64,
}

impl TriggerBounds {
    /// Linear progress of `scroll_y` through the region, clamped to [0, 1].
    pub fn progress(self, scroll_y: f64) -> f64 {
        let range = self.end_y - self.start_y;
        if range <= 0.0 {
            return if scroll_y >= self.start_y { 1.0 } else { 0.0 };
        }
        clamp01((scroll_y - self.start_y) / range)
    }
}

/// Map a marker's document rect and the viewport onto absolute scrollY
/// boundaries for the given edges.
pub fn resolve_trigger_bounds(
    rect: Rect,
    viewport: Viewport,
    start: TriggerEdge,
    end: TriggerEnd,
) -> TriggerBounds {
    let edge_y = |edge: TriggerEdge| {
        rect.y0 + rect.height() * edge.element_fraction
            - viewport.height * edge.viewport_fraction
    };
    let start_y = edge_y(start);
    let end_y = match end {
        TriggerEnd::Edge(edge) => edge_y(edge),
        TriggerEnd::AfterStart { viewports } => start_y + viewport.height * viewports,
    };
    TriggerBounds { start_y, end_y }
}

/// Boundary-crossing events emitted by [`TriggerState`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TriggerEvent {
    /// Crossed the start boundary scrolling forward.
    Enter,
    /// Crossed the end boundary scrolling forward.
    Leave,
    /// Crossed the end boundary scrolling backward.
    EnterBack,
    /// Crossed the start boundary scrolling backward.
    LeaveBack,
}

/// Two-way boundary state machine over a trigger region.
///
/// Starts "before" the region; the first update from an already-scrolled
/// position therefore fires the crossings needed to reach that position.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct TriggerState {
    past_start: bool,
    past_end: bool,
}

impl TriggerState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed the current scroll position; returns crossings in the order
    /// they occurred (at most two per update).
    pub fn update(&mut self, scroll_y: f64, bounds: TriggerBounds) -> Vec<TriggerEvent> {
        let mut fired = Vec::new();
        let now_past_start = scroll_y >= bounds.start_y;
        let now_past_end = scroll_y >= bounds.end_y;

        if now_past_start && !self.past_start {
            fired.push(TriggerEvent::Enter);
        }
        if now_past_end && !self.past_end {
            fired.push(TriggerEvent::Leave);
        }
        if !now_past_end && self.past_end {
            fired.push(TriggerEvent::EnterBack);
        }
        if !now_past_start && self.past_start {
            fired.push(TriggerEvent::LeaveBack);
        }

        self.past_start = now_past_start;
        self.past_end = now_past_end;
        fired
    }
}

/// Cancellable handle to an engine-owned scrubbed timeline.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TimelineHandle(pub u64);

/// One sequenced step of a scrubbed timeline.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineStep {
    /// One element, or several animated with a per-target stagger.
    pub targets: Vec<ElementId>,
    pub from: Option<Vec<(Prop, Value)>>,
    pub to: Vec<(Prop, Value)>,
    /// Step length in timeline-local units.
    pub duration: f64,
    /// Offset between consecutive targets, timeline-local units.
    pub stagger: f64,
    pub ease: Ease,
}

/// A scroll-scrubbed sequence of steps bound to a trigger region.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TimelineSpec {
    /// Resolved scroll boundaries; the owning controller recomputes and
    /// refreshes these on reflow.
    pub bounds: TriggerBounds,
    /// Scrub lag factor; 0 pins progress directly to scroll.
    pub scrub: f64,
    /// Whether the trigger element is pinned while the region is active.
    pub pin: bool,
    pub steps: Vec<TimelineStep>,
    /// Progress to apply immediately on registration.
    pub initial_progress: Option<f64>,
}

impl TimelineSpec {
    pub fn validate(&self) -> WeaveResult<()> {
        if self.steps.is_empty() {
            return Err(WeaveError::validation("timeline must have steps"));
        }
        for step in &self.steps {
            if step.targets.is_empty() {
                return Err(WeaveError::validation("timeline step must have targets"));
            }
            if !(step.duration.is_finite() && step.duration > 0.0) {
                return Err(WeaveError::validation(
                    "timeline step duration must be finite and > 0",
                ));
            }
            if !(step.stagger.is_finite() && step.stagger >= 0.0) {
                return Err(WeaveError::validation(
                    "timeline step stagger must be finite and >= 0",
                ));
            }
        }
        if !(self.scrub.is_finite() && self.scrub >= 0.0) {
            return Err(WeaveError::validation("scrub must be finite and >= 0"));
        }
        Ok(())
    }

    /// Total length in timeline-local units, stagger included.
    pub fn total_duration(&self) -> f64 {
        self.steps
            .iter()
            .map(|s| s.duration + s.stagger * (s.targets.len().saturating_sub(1)) as f64)
            .sum()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/timeline.rs"]
mod tests;

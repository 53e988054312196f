use crate::{
    animation::ease::Ease,
    animation::timeline::{
        TimelineHandle, TimelineSpec, TimelineStep, TriggerEdge, TriggerEnd, TriggerSpec,
    },
    animation::tween::{Prop, TweenHandle, TweenSpec, Value},
    foundation::core::Viewport,
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::ElementId,
    runtime::task::{EffectCx, EffectTask},
    runtime::timer::Debouncer,
};

/// The reveal is inert at or below this viewport width.
pub const DESKTOP_BREAKPOINT_PX: f64 = 768.0;
pub const SCALE_MIN: f64 = 0.5;
pub const SCALE_MAX: f64 = 4.0;
const REBUILD_DEBOUNCE_MS: u64 = 150;
const RISE_Y_PERCENT: f64 = -350.0;

/// Uniform scale at which the element covers `ratio` of the viewport on
/// its tighter axis, clamped to `[0.5, 4.0]`.
pub fn viewport_relative_scale(
    element_width: f64,
    element_height: f64,
    viewport: Viewport,
    ratio: f64,
) -> f64 {
    if !(element_width.is_finite() && element_width > 0.0)
        || !(element_height.is_finite() && element_height > 0.0)
    {
        return 1.0;
    }
    let scale_x = viewport.width * ratio / element_width;
    let scale_y = viewport.height * ratio / element_height;
    scale_x.min(scale_y).clamp(SCALE_MIN, SCALE_MAX)
}

/// Scroll-linked reveal: the element rises into place while scaling from
/// its viewport-relative size down to 1, scrubbed across the trigger
/// section's entry. Rebuilt on debounced resize above the breakpoint.
pub struct LogoRevealController {
    target: ElementId,
    trigger: ElementId,
    ratio: f64,
    timeline: Option<TimelineHandle>,
    intro: Option<TweenHandle>,
    rebuild: Debouncer,
}

impl LogoRevealController {
    pub fn new(target: ElementId, trigger: ElementId, ratio: f64, cx: &mut EffectCx<'_>) -> Self {
        let mut controller = Self {
            target,
            trigger,
            ratio,
            timeline: None,
            intro: None,
            rebuild: Debouncer::new(REBUILD_DEBOUNCE_MS),
        };
        if cx.viewport.width > DESKTOP_BREAKPOINT_PX {
            controller.build(cx);
        }
        controller
    }

    fn trigger_spec(&self) -> TriggerSpec {
        TriggerSpec::new(
            self.trigger,
            TriggerEdge::TOP_BOTTOM,
            TriggerEnd::Edge(TriggerEdge::TOP_TOP),
        )
    }

    fn build(&mut self, cx: &mut EffectCx<'_>) {
        let Some(target_rect) = cx.doc.rect(self.target) else {
            return;
        };
        let Some(bounds) = self.trigger_spec().resolve(cx.doc, cx.viewport) else {
            return;
        };
        let viewport = cx.viewport;
        let ratio = self.ratio;
        let now = cx.now;
        let base_scale = viewport_relative_scale(
            target_rect.width(),
            target_rect.height(),
            viewport,
            ratio,
        );

        let Some(engine) = cx.engine() else {
            return;
        };
        if let Some(handle) = self.timeline.take() {
            engine.kill_timeline(handle);
        }
        if let Some(handle) = self.intro.take() {
            engine.kill(handle);
        }

        engine.set(self.target, &[(Prop::Opacity, Value::Scalar(0.0))]);
        let intro = TweenSpec::from_to(
            vec![(Prop::Opacity, Value::Scalar(0.0))],
            vec![(Prop::Opacity, Value::Scalar(1.0))],
            1.0,
            Ease::OutCubic,
        );
        match engine.tween(self.target, intro, now) {
            Ok(handle) => self.intro = Some(handle),
            Err(err) => tracing::warn!(%err, "logo intro tween rejected"),
        }

        let spec = TimelineSpec {
            bounds,
            scrub: 1.0,
            pin: false,
            steps: vec![TimelineStep {
                targets: vec![self.target],
                from: Some(vec![
                    (Prop::YPercent, Value::Scalar(RISE_Y_PERCENT)),
                    (Prop::Scale, Value::Scalar(base_scale)),
                ]),
                to: vec![
                    (Prop::YPercent, Value::Scalar(0.0)),
                    (Prop::Scale, Value::Scalar(1.0)),
                ],
                duration: 2.0,
                stagger: 0.0,
                ease: Ease::Linear,
            }],
            initial_progress: None,
        };
        match engine.add_timeline(spec) {
            Ok(handle) => self.timeline = Some(handle),
            Err(err) => tracing::warn!(%err, "logo timeline rejected"),
        }
    }
}

impl EffectTask for LogoRevealController {
    fn name(&self) -> &'static str {
        "logo-reveal"
    }

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        match event {
            PageEvent::Resize { .. } => {
                // Below the breakpoint the effect is inert by design.
                if cx.viewport.width > DESKTOP_BREAKPOINT_PX {
                    self.rebuild.trigger(cx.now);
                }
            }
            PageEvent::FrameTick => {
                if self.rebuild.fire_if_due(cx.now) {
                    self.build(cx);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn refresh(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        let Some(handle) = self.timeline else {
            return Ok(());
        };
        let Some(bounds) = self.trigger_spec().resolve(cx.doc, cx.viewport) else {
            return Ok(());
        };
        if let Some(engine) = cx.engine() {
            engine.refresh_timeline_bounds(handle, bounds)?;
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/logo.rs"]
mod tests;

use std::collections::BTreeMap;

use crate::{
    animation::timeline::{TimelineHandle, TimelineSpec, TriggerBounds},
    animation::tween::{Prop, TweenHandle, TweenSpec, Value},
    foundation::core::Millis,
    foundation::error::{WeaveError, WeaveResult},
    page::model::ElementId,
    style::units::secs_to_millis,
};

/// External animation-primitive capability consumed by the controllers.
///
/// The contract mirrors what a scroll-effects page asks of its tween
/// library: property tweens with cancellable handles, immediate sets,
/// kill-by-handle and kill-by-target, scroll-scrubbed timelines with
/// refreshable boundaries, and completion reporting. Implementations are
/// driven cooperatively from the frame stream — nothing here blocks.
pub trait AnimationEngine {
    fn tween(
        &mut self,
        target: ElementId,
        spec: TweenSpec,
        now: Millis,
    ) -> WeaveResult<TweenHandle>;

    /// Write property values immediately, without animation.
    fn set(&mut self, target: ElementId, props: &[(Prop, Value)]);

    /// Cancel one tween. A killed tween never reports completion.
    fn kill(&mut self, handle: TweenHandle);

    /// Cancel every active tween on `target`.
    fn kill_tweens_of(&mut self, target: ElementId);

    fn add_timeline(&mut self, spec: TimelineSpec) -> WeaveResult<TimelineHandle>;

    fn kill_timeline(&mut self, handle: TimelineHandle);

    /// Re-anchor a timeline after a reflow moved its trigger.
    fn refresh_timeline_bounds(
        &mut self,
        handle: TimelineHandle,
        bounds: TriggerBounds,
    ) -> WeaveResult<()>;

    /// Advance internal clocks and scrub positions. Called once per frame.
    fn drive(&mut self, now: Millis, scroll_y: f64);

    /// Drain tweens that finished since the last poll, in completion order.
    fn poll_completed(&mut self) -> Vec<TweenHandle>;
}

struct ActiveTween {
    handle: TweenHandle,
    target: ElementId,
    spec: TweenSpec,
    start: Millis,
    /// Start values resolved when the tween was registered.
    from: Vec<(Prop, Value)>,
    done: bool,
}

struct ActiveTimeline {
    handle: TimelineHandle,
    spec: TimelineSpec,
    /// Start values per (target, prop), resolved at registration.
    from: BTreeMap<(ElementId, Prop), Value>,
    /// Progress currently rendered (lags the scroll when scrub > 0).
    displayed: f64,
}

/// Reference [`AnimationEngine`] driven by the session clock.
///
/// Good enough to run a whole page session headlessly: tweens advance on
/// [`AnimationEngine::drive`], scrubbed timelines follow the scroll
/// position (with exponential lag when `scrub > 0`), and current property
/// values are queryable. Not a rendering engine — values land in a store,
/// not on a screen.
pub struct InlineEngine {
    now: Millis,
    scroll_y: f64,
    next_id: u64,
    tweens: Vec<ActiveTween>,
    timelines: Vec<ActiveTimeline>,
    values: BTreeMap<(ElementId, Prop), Value>,
    completed: Vec<TweenHandle>,
}

impl Default for InlineEngine {
    fn default() -> Self {
        Self::new()
    }
}

impl InlineEngine {
    pub fn new() -> Self {
        Self {
            now: Millis(0),
            scroll_y: 0.0,
            next_id: 1,
            tweens: Vec::new(),
            timelines: Vec::new(),
            values: BTreeMap::new(),
            completed: Vec::new(),
        }
    }

    /// Current value of a property, if anything ever wrote it.
    pub fn value_of(&self, target: ElementId, prop: &Prop) -> Option<Value> {
        self.values.get(&(target, prop.clone())).copied()
    }

    /// Scalar shortcut for [`InlineEngine::value_of`].
    pub fn scalar_of(&self, target: ElementId, prop: &Prop) -> Option<f64> {
        match self.value_of(target, prop) {
            Some(Value::Scalar(v)) => Some(v),
            _ => None,
        }
    }

    /// Visibility with the page's static default (visible).
    pub fn is_visible(&self, target: ElementId) -> bool {
        match self.value_of(target, &Prop::Visibility) {
            Some(Value::Visible(v)) => v,
            _ => true,
        }
    }

    pub fn active_tween_count(&self) -> usize {
        self.tweens.iter().filter(|t| !t.done).count()
    }

    pub fn timeline_progress(&self, handle: TimelineHandle) -> Option<f64> {
        self.timelines
            .iter()
            .find(|t| t.handle == handle)
            .map(|t| t.displayed)
    }

    fn write(&mut self, target: ElementId, prop: &Prop, value: Value) {
        self.values.insert((target, prop.clone()), value);
    }

    fn resolve_from(&self, target: ElementId, spec: &TweenSpec) -> Vec<(Prop, Value)> {
        spec.to
            .iter()
            .map(|(prop, to_value)| {
                let explicit = spec.from.as_ref().and_then(|from| {
                    from.iter()
                        .find(|(p, _)| p == prop)
                        .map(|(_, v)| *v)
                });
                let value = explicit
                    .or_else(|| self.value_of(target, prop))
                    .or_else(|| prop.initial_value())
                    .unwrap_or(*to_value);
                (prop.clone(), value)
            })
            .collect()
    }

    fn sample_tween(tween: &ActiveTween, now: Millis) -> (f64, bool) {
        let dur_ms = secs_to_millis(tween.spec.duration_s);
        let elapsed = now.since(tween.start);

        if dur_ms == 0 {
            return (1.0, tween.spec.repeat >= 0);
        }

        if tween.spec.repeat >= 0 {
            let total = dur_ms * (tween.spec.repeat as u64 + 1);
            if elapsed >= total {
                let last_cycle_odd = tween.spec.repeat % 2 == 1;
                let t = if tween.spec.yoyo && last_cycle_odd {
                    0.0
                } else {
                    1.0
                };
                return (t, true);
            }
        }

        let cycle = elapsed / dur_ms;
        let local = (elapsed % dur_ms) as f64 / dur_ms as f64;
        let t = if tween.spec.yoyo && cycle % 2 == 1 {
            1.0 - local
        } else {
            local
        };
        (t, false)
    }

    fn sample_timeline_into(
        spec: &TimelineSpec,
        from: &BTreeMap<(ElementId, Prop), Value>,
        progress: f64,
        out: &mut Vec<(ElementId, Prop, Value)>,
    ) {
        let pos = progress.clamp(0.0, 1.0) * spec.total_duration();
        let mut cursor = 0.0;
        for step in &spec.steps {
            let span = step.duration + step.stagger * (step.targets.len().saturating_sub(1)) as f64;
            for (k, target) in step.targets.iter().enumerate() {
                let local_start = cursor + step.stagger * k as f64;
                let t = ((pos - local_start) / step.duration).clamp(0.0, 1.0);
                let eased = step.ease.apply(t);
                for (prop, to_value) in &step.to {
                    let from_value = from
                        .get(&(*target, prop.clone()))
                        .copied()
                        .unwrap_or(*to_value);
                    out.push((*target, prop.clone(), from_value.lerp(*to_value, eased)));
                }
            }
            cursor += span;
        }
    }

    fn render_timeline(&mut self, index: usize) {
        let mut writes = Vec::new();
        {
            let tl = &self.timelines[index];
            Self::sample_timeline_into(&tl.spec, &tl.from, tl.displayed, &mut writes);
        }
        for (target, prop, value) in writes {
            self.write(target, &prop, value);
        }
    }
}

impl AnimationEngine for InlineEngine {
    fn tween(
        &mut self,
        target: ElementId,
        spec: TweenSpec,
        now: Millis,
    ) -> WeaveResult<TweenHandle> {
        spec.validate()?;
        let handle = TweenHandle(self.next_id);
        self.next_id += 1;

        let from = self.resolve_from(target, &spec);
        // Explicit from-values render immediately, like a fromTo tween.
        if spec.from.is_some() {
            for (prop, value) in &from {
                self.write(target, prop, *value);
            }
        }

        tracing::debug!(handle = handle.0, target = target.0, "tween registered");
        self.tweens.push(ActiveTween {
            handle,
            target,
            spec,
            start: now,
            from,
            done: false,
        });
        Ok(handle)
    }

    fn set(&mut self, target: ElementId, props: &[(Prop, Value)]) {
        for (prop, value) in props {
            self.write(target, prop, *value);
        }
    }

    fn kill(&mut self, handle: TweenHandle) {
        self.tweens.retain(|t| t.handle != handle);
    }

    fn kill_tweens_of(&mut self, target: ElementId) {
        self.tweens.retain(|t| t.target != target);
    }

    fn add_timeline(&mut self, spec: TimelineSpec) -> WeaveResult<TimelineHandle> {
        spec.validate()?;
        let handle = TimelineHandle(self.next_id);
        self.next_id += 1;

        let mut from = BTreeMap::new();
        for step in &spec.steps {
            for target in &step.targets {
                for (prop, to_value) in &step.to {
                    let explicit = step.from.as_ref().and_then(|f| {
                        f.iter()
                            .find(|(p, _)| p == prop)
                            .map(|(_, v)| *v)
                    });
                    let value = explicit
                        .or_else(|| self.value_of(*target, prop))
                        .or_else(|| prop.initial_value())
                        .unwrap_or(*to_value);
                    from.insert((*target, prop.clone()), value);
                }
            }
        }

        let displayed = spec
            .initial_progress
            .unwrap_or_else(|| spec.bounds.progress(self.scroll_y));
        self.timelines.push(ActiveTimeline {
            handle,
            spec,
            from,
            displayed,
        });
        self.render_timeline(self.timelines.len() - 1);
        Ok(handle)
    }

    fn kill_timeline(&mut self, handle: TimelineHandle) {
        self.timelines.retain(|t| t.handle != handle);
    }

    fn refresh_timeline_bounds(
        &mut self,
        handle: TimelineHandle,
        bounds: TriggerBounds,
    ) -> WeaveResult<()> {
        let tl = self
            .timelines
            .iter_mut()
            .find(|t| t.handle == handle)
            .ok_or_else(|| WeaveError::engine("refresh of unknown timeline handle"))?;
        tl.spec.bounds = bounds;
        Ok(())
    }

    fn drive(&mut self, now: Millis, scroll_y: f64) {
        let dt_s = now.since(self.now) as f64 / 1000.0;
        self.now = now;
        self.scroll_y = scroll_y;

        let mut writes = Vec::new();
        for tween in &mut self.tweens {
            if tween.done {
                continue;
            }
            let (t, finished) = Self::sample_tween(tween, now);
            let eased = tween.spec.ease.apply(t);
            for ((prop, to_value), (_, from_value)) in tween.spec.to.iter().zip(&tween.from) {
                // Visibility steps on raw progress, not the eased curve.
                let progress = if matches!(prop, Prop::Visibility) { t } else { eased };
                writes.push((tween.target, prop.clone(), from_value.lerp(*to_value, progress)));
            }
            if finished {
                tween.done = true;
                self.completed.push(tween.handle);
            }
        }
        for (target, prop, value) in writes {
            self.write(target, &prop, value);
        }
        self.tweens.retain(|t| !t.done);

        for i in 0..self.timelines.len() {
            let target_p = {
                let tl = &self.timelines[i];
                tl.spec.bounds.progress(scroll_y)
            };
            let tl = &mut self.timelines[i];
            if tl.spec.scrub <= 0.0 {
                tl.displayed = target_p;
            } else {
                let alpha = (dt_s / tl.spec.scrub).clamp(0.0, 1.0);
                tl.displayed += (target_p - tl.displayed) * alpha;
                if (target_p - tl.displayed).abs() < 1e-4 {
                    tl.displayed = target_p;
                }
            }
            self.render_timeline(i);
        }
    }

    fn poll_completed(&mut self) -> Vec<TweenHandle> {
        std::mem::take(&mut self.completed)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/engine.rs"]
mod tests;

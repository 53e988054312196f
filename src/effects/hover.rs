use crate::{
    animation::ease::Ease,
    animation::tween::{Prop, TweenHandle, TweenSpec, Value},
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::{ElementId, PageDoc},
    page::ops::DomOp,
    runtime::task::{EffectCx, EffectTask},
    runtime::timer::Debouncer,
};

const SHOW_DURATION_S: f64 = 0.5;
const HIDE_PREVIOUS_S: f64 = 0.2;
const HIDE_ON_LEAVE_S: f64 = 0.4;
const HIDE_ALL_S: f64 = 0.3;
const HIDDEN_SCALE: f64 = 0.6;
const HIDE_TARGET_SCALE: f64 = 0.7;
const SCROLL_HIDE_DEBOUNCE_MS: u64 = 100;

/// What to do when a hide tween finishes.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
enum PendingHide {
    /// Make the photo non-interactive.
    Hide { index: usize },
    /// Same, then clear the active index — unless another entry has
    /// since become active.
    HideAndClear { index: usize },
}

impl PendingHide {
    fn index(self) -> usize {
        match self {
            PendingHide::Hide { index } | PendingHide::HideAndClear { index } => index,
        }
    }
}

/// Ensures at most one hover-revealed photo is visible at a time.
///
/// Works without the animation engine (reveals snap instead of tween);
/// with it, any in-flight tween on a photo is killed before a
/// replacement starts on the same element.
pub struct HoverController {
    pairs: Vec<(ElementId, ElementId)>,
    container: Option<ElementId>,
    active: Option<usize>,
    pending: Vec<(TweenHandle, PendingHide)>,
    scroll_hide: Debouncer,
}

impl HoverController {
    /// Pair titles and photos by index; unmatched extras are ignored.
    pub fn discover(doc: &PageDoc) -> Option<Vec<(ElementId, ElementId)>> {
        let titles = doc.find_by_class("hovertitle");
        let photos = doc.find_by_class("hoverphoto");
        if titles.is_empty() || photos.is_empty() {
            return None;
        }
        Some(titles.into_iter().zip(photos).collect())
    }

    pub fn new(
        pairs: Vec<(ElementId, ElementId)>,
        container: Option<ElementId>,
        cx: &mut EffectCx<'_>,
    ) -> Self {
        let controller = Self {
            pairs,
            container,
            active: None,
            pending: Vec::new(),
            scroll_hide: Debouncer::new(SCROLL_HIDE_DEBOUNCE_MS),
        };
        controller.apply_initial_state(cx);
        controller
    }

    pub fn active_index(&self) -> Option<usize> {
        self.active
    }

    fn apply_initial_state(&self, cx: &mut EffectCx<'_>) {
        let photos: Vec<ElementId> = self.pairs.iter().map(|&(_, photo)| photo).collect();
        if cx.engine.is_none() {
            for photo in photos {
                cx.sink.apply(DomOp::SetOpacity {
                    element: photo,
                    value: 0.0,
                });
                cx.sink.apply(DomOp::SetHidden {
                    element: photo,
                    hidden: true,
                });
            }
            return;
        }
        if let Some(engine) = cx.engine() {
            for photo in photos {
                engine.set(
                    photo,
                    &[
                        (Prop::Opacity, Value::Scalar(0.0)),
                        (Prop::Scale, Value::Scalar(HIDDEN_SCALE)),
                        (Prop::Visibility, Value::Visible(false)),
                    ],
                );
            }
        }
    }

    fn title_index(&self, element: ElementId) -> Option<usize> {
        self.pairs.iter().position(|&(title, _)| title == element)
    }

    fn purge_pending_for(&mut self, index: usize) {
        self.pending.retain(|&(_, action)| action.index() != index);
    }

    fn start_hide_tween(
        &mut self,
        cx: &mut EffectCx<'_>,
        index: usize,
        duration_s: f64,
        ease: Ease,
        clear_active: bool,
    ) {
        let photo = self.pairs[index].1;
        self.purge_pending_for(index);
        let now = cx.now;

        if cx.engine.is_none() {
            cx.sink.apply(DomOp::SetOpacity {
                element: photo,
                value: 0.0,
            });
            cx.sink.apply(DomOp::SetHidden {
                element: photo,
                hidden: true,
            });
            if clear_active && self.active == Some(index) {
                self.active = None;
            }
            return;
        }

        let result = {
            let Some(engine) = cx.engine() else {
                return;
            };
            engine.kill_tweens_of(photo);
            let spec = TweenSpec::to(
                vec![
                    (Prop::Opacity, Value::Scalar(0.0)),
                    (Prop::Scale, Value::Scalar(HIDE_TARGET_SCALE)),
                ],
                duration_s,
                ease,
            );
            engine.tween(photo, spec, now)
        };
        match result {
            Ok(handle) => {
                let action = if clear_active {
                    PendingHide::HideAndClear { index }
                } else {
                    PendingHide::Hide { index }
                };
                self.pending.push((handle, action));
            }
            Err(err) => tracing::warn!(%err, "hover hide tween rejected"),
        }
    }

    fn enter(&mut self, cx: &mut EffectCx<'_>, index: usize) {
        if let Some(previous) = self.active {
            if previous != index {
                self.start_hide_tween(cx, previous, HIDE_PREVIOUS_S, Ease::InCubic, false);
            }
        }
        self.active = Some(index);

        let photo = self.pairs[index].1;
        self.purge_pending_for(index);
        let now = cx.now;

        if cx.engine.is_none() {
            cx.sink.apply(DomOp::SetHidden {
                element: photo,
                hidden: false,
            });
            cx.sink.apply(DomOp::SetOpacity {
                element: photo,
                value: 1.0,
            });
            return;
        }

        if let Some(engine) = cx.engine() {
            engine.kill_tweens_of(photo);
            let spec = TweenSpec::to(
                vec![
                    (Prop::Opacity, Value::Scalar(1.0)),
                    (Prop::Scale, Value::Scalar(1.0)),
                    (Prop::Visibility, Value::Visible(true)),
                ],
                SHOW_DURATION_S,
                Ease::OutQuart,
            );
            if let Err(err) = engine.tween(photo, spec, now) {
                tracing::warn!(%err, "hover show tween rejected");
            }
        }
    }

    fn leave(&mut self, cx: &mut EffectCx<'_>, index: usize) {
        if self.active != Some(index) {
            return;
        }
        self.start_hide_tween(cx, index, HIDE_ON_LEAVE_S, Ease::InQuart, true);
    }

    fn hide_all(&mut self, cx: &mut EffectCx<'_>) {
        for index in 0..self.pairs.len() {
            self.start_hide_tween(cx, index, HIDE_ALL_S, Ease::InCubic, false);
        }
        self.active = None;
    }

    fn on_tween_completed(&mut self, cx: &mut EffectCx<'_>, handle: TweenHandle) {
        let Some(position) = self.pending.iter().position(|&(h, _)| h == handle) else {
            return;
        };
        let (_, action) = self.pending.remove(position);
        let index = action.index();
        let photo = self.pairs[index].1;
        if let Some(engine) = cx.engine() {
            engine.set(photo, &[(Prop::Visibility, Value::Visible(false))]);
        }
        cx.sink.apply(DomOp::SetHidden {
            element: photo,
            hidden: true,
        });
        if let PendingHide::HideAndClear { index } = action {
            // Guard: a faster re-enter may already own the active slot.
            if self.active == Some(index) {
                self.active = None;
            }
        }
    }
}

impl EffectTask for HoverController {
    fn name(&self) -> &'static str {
        "hover-exclusivity"
    }

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        match event {
            PageEvent::PointerEnter { element } => {
                if let Some(index) = self.title_index(*element) {
                    self.enter(cx, index);
                }
            }
            PageEvent::PointerLeave { element } => {
                if let Some(index) = self.title_index(*element) {
                    self.leave(cx, index);
                } else if self.container == Some(*element) {
                    self.hide_all(cx);
                }
            }
            PageEvent::WindowBlur => self.hide_all(cx),
            PageEvent::Scroll { .. } => self.scroll_hide.trigger(cx.now),
            PageEvent::FrameTick => {
                if self.scroll_hide.fire_if_due(cx.now) {
                    self.hide_all(cx);
                }
            }
            PageEvent::TweenCompleted { handle } => self.on_tween_completed(cx, *handle),
            _ => {}
        }
        Ok(())
    }

    fn on_engine_attached(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        // Late-attached engine: seed its store with the hidden state.
        self.apply_initial_state(cx);
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/hover.rs"]
mod tests;

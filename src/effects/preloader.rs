use std::collections::BTreeSet;

use crate::{
    animation::ease::Ease,
    animation::tween::{Prop, TweenHandle, TweenSpec, Value},
    foundation::core::Millis,
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::ElementId,
    page::ops::DomOp,
    runtime::task::{EffectCx, EffectTask},
    runtime::timer::Deadline,
    style::tokens::{StyleTokens, names},
    style::units::secs_to_millis,
};

pub const DEFAULT_MIN_DISPLAY_MS: u64 = 3000;
pub const DEFAULT_ANIMATION_DURATION_S: f64 = 1.5;
pub const DEFAULT_FADE_DURATION_S: f64 = 0.5;
const PULSE_SCALE: f64 = 1.05;
const ENGINE_RETRY_MS: u64 = 500;
const MAX_ENGINE_RETRIES: u32 = 20;

/// Looping animation shown on the preloader object while waiting.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub enum PreloaderAnimation {
    Pulse,
    Rotate,
    None,
    Default,
}

impl PreloaderAnimation {
    pub fn parse(raw: &str) -> Self {
        match raw.trim() {
            "pulse" => Self::Pulse,
            "rotate" => Self::Rotate,
            "none" => Self::None,
            _ => Self::Default,
        }
    }
}

/// Preloader tunables, read once from the design tokens.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct PreloaderConfig {
    pub enabled: bool,
    pub animation: PreloaderAnimation,
    pub min_display_ms: u64,
    pub animation_duration_s: f64,
    pub fade_duration_s: f64,
}

impl PreloaderConfig {
    pub fn from_tokens(tokens: &StyleTokens) -> Self {
        let min_display_secs = tokens.raw(names::MIN_DISPLAY_TIME).and_then(
            crate::style::units::parse_positive_scalar,
        );
        Self {
            enabled: tokens.flag_enabled(names::ACTIVATE_PRELOADER),
            animation: PreloaderAnimation::parse(
                tokens.raw(names::PRELOADER_ANIMATION).unwrap_or_default(),
            ),
            min_display_ms: min_display_secs
                .map(secs_to_millis)
                .unwrap_or(DEFAULT_MIN_DISPLAY_MS),
            animation_duration_s: tokens
                .scalar_or(names::ANIMATION_DURATION, DEFAULT_ANIMATION_DURATION_S),
            fade_duration_s: tokens.scalar_or(names::FADE_DURATION, DEFAULT_FADE_DURATION_S),
        }
    }
}

/// Lifecycle of the full-screen overlay. `Hidden` is terminal.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum PreloaderState {
    Disabled,
    Active,
    Hidden,
}

/// Controller for the loading overlay.
///
/// Races two readiness signals — the page-load event followed by every
/// image settling, and the minimum-display deadline — and hides only
/// when both have settled. The runtime constructs at most one instance
/// per page.
pub struct PreloaderController {
    section: ElementId,
    object: Option<ElementId>,
    config: PreloaderConfig,
    state: PreloaderState,
    started_at: Millis,
    page_loaded: bool,
    tracking_started: bool,
    pending_images: BTreeSet<ElementId>,
    engine_retry: Deadline,
    retries_left: u32,
    min_display: Deadline,
    loop_tween: Option<TweenHandle>,
    fade_tween: Option<TweenHandle>,
}

impl PreloaderController {
    pub fn new(
        section: ElementId,
        object: Option<ElementId>,
        config: PreloaderConfig,
        cx: &mut EffectCx<'_>,
    ) -> Self {
        let mut controller = Self {
            section,
            object,
            config,
            state: PreloaderState::Disabled,
            started_at: cx.now,
            page_loaded: false,
            tracking_started: false,
            pending_images: BTreeSet::new(),
            engine_retry: Deadline::new(),
            retries_left: MAX_ENGINE_RETRIES,
            min_display: Deadline::new(),
            loop_tween: None,
            fade_tween: None,
        };

        if !config.enabled {
            cx.sink.apply(DomOp::SetDisplayNone { element: section });
            return controller;
        }

        controller.state = PreloaderState::Active;
        cx.sink.apply(DomOp::AddClass {
            element: section,
            class: "preloader-active".to_string(),
        });
        cx.sink.apply(DomOp::SetOpacity {
            element: section,
            value: 1.0,
        });
        controller.min_display.arm(cx.now.plus(config.min_display_ms));
        controller.start_animation(cx);
        controller
    }

    pub fn state(&self) -> PreloaderState {
        self.state
    }

    pub fn is_hidden(&self) -> bool {
        self.state == PreloaderState::Hidden
    }

    fn start_animation(&mut self, cx: &mut EffectCx<'_>) {
        let now = cx.now;
        if let Some(handle) = self.loop_tween.take() {
            if let Some(engine) = cx.engine() {
                engine.kill(handle);
            }
        }

        let Some(object) = self.object else {
            return;
        };
        cx.sink.apply(DomOp::SetOpacity {
            element: object,
            value: 1.0,
        });

        let spec = match self.config.animation {
            PreloaderAnimation::Pulse => TweenSpec::to(
                vec![(Prop::Scale, Value::Scalar(PULSE_SCALE))],
                self.config.animation_duration_s,
                Ease::InOutSine,
            )
            .looped(true),
            PreloaderAnimation::Rotate => TweenSpec::to(
                vec![(Prop::RotationDeg, Value::Scalar(360.0))],
                self.config.animation_duration_s,
                Ease::Linear,
            )
            .looped(false),
            PreloaderAnimation::None | PreloaderAnimation::Default => return,
        };

        if let Some(engine) = cx.engine() {
            match engine.tween(object, spec, now) {
                Ok(handle) => self.loop_tween = Some(handle),
                Err(err) => tracing::warn!(%err, "preloader loop animation rejected"),
            }
        }
    }

    fn begin_image_tracking(&mut self, cx: &mut EffectCx<'_>) {
        if self.state != PreloaderState::Active || self.tracking_started {
            return;
        }

        if cx.engine.is_none() && self.retries_left > 0 {
            self.retries_left -= 1;
            self.engine_retry.arm(cx.now.plus(ENGINE_RETRY_MS));
            tracing::debug!(
                retries_left = self.retries_left,
                "engine not attached; retrying image tracking"
            );
            return;
        }

        self.tracking_started = true;
        self.pending_images = cx
            .doc
            .images()
            .into_iter()
            .filter(|&img| !cx.doc.is_image_complete(img))
            .collect();
        if self.pending_images.is_empty() {
            self.mark_loaded(cx);
        }
    }

    fn mark_loaded(&mut self, cx: &mut EffectCx<'_>) {
        self.page_loaded = true;
        self.check_hide(cx);
    }

    /// Hide-gate check; safe to call any number of times.
    pub fn check_hide(&mut self, cx: &mut EffectCx<'_>) {
        if self.state != PreloaderState::Active {
            return;
        }
        let elapsed = cx.now.since(self.started_at);
        if self.page_loaded && elapsed >= self.config.min_display_ms {
            self.hide(cx);
        }
    }

    fn hide(&mut self, cx: &mut EffectCx<'_>) {
        self.state = PreloaderState::Hidden;
        self.min_display.cancel();
        self.engine_retry.cancel();

        let now = cx.now;
        let loop_tween = self.loop_tween.take();
        if cx.engine.is_none() {
            self.finish_hide(cx);
            return;
        }

        let result = {
            let Some(engine) = cx.engine() else {
                return;
            };
            if let Some(handle) = loop_tween {
                engine.kill(handle);
            }
            let spec = TweenSpec::to(
                vec![(Prop::Opacity, Value::Scalar(0.0))],
                self.config.fade_duration_s,
                Ease::OutCubic,
            );
            engine.tween(self.section, spec, now)
        };
        match result {
            Ok(handle) => self.fade_tween = Some(handle),
            Err(err) => {
                tracing::warn!(%err, "preloader fade rejected; hiding immediately");
                self.finish_hide(cx);
            }
        }
    }

    fn finish_hide(&mut self, cx: &mut EffectCx<'_>) {
        self.fade_tween = None;
        cx.sink.apply(DomOp::SetHidden {
            element: self.section,
            hidden: true,
        });
        cx.sink.apply(DomOp::SetDisplayNone {
            element: self.section,
        });
    }
}

impl EffectTask for PreloaderController {
    fn name(&self) -> &'static str {
        "preloader"
    }

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        match event {
            PageEvent::WindowLoad => self.begin_image_tracking(cx),
            PageEvent::ImageSettled { element } => {
                if self.tracking_started
                    && self.pending_images.remove(element)
                    && self.pending_images.is_empty()
                {
                    self.mark_loaded(cx);
                }
            }
            PageEvent::FrameTick => {
                if self.engine_retry.fire_if_due(cx.now) {
                    self.begin_image_tracking(cx);
                }
                if self.min_display.fire_if_due(cx.now) {
                    self.check_hide(cx);
                }
            }
            PageEvent::TweenCompleted { handle } => {
                if self.fade_tween == Some(*handle) {
                    self.finish_hide(cx);
                }
            }
            _ => {}
        }
        Ok(())
    }

    fn on_engine_attached(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        if self.state == PreloaderState::Active && self.loop_tween.is_none() {
            self.start_animation(cx);
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/preloader.rs"]
mod tests;

use crate::{
    animation::engine::AnimationEngine,
    effects::grow::{GrowConfig, GrowImageController},
    effects::horizontal::HorizontalScrollController,
    effects::hover::HoverController,
    effects::logo::LogoRevealController,
    effects::parallax::ParallaxController,
    effects::preloader::{PreloaderConfig, PreloaderController},
    effects::textfill::TextfillController,
    effects::theme::{ThemeColors, ThemeCrossfadeController},
    foundation::core::{Millis, Viewport},
    foundation::error::{WeaveError, WeaveResult},
    page::events::PageEvent,
    page::model::PageDoc,
    page::ops::DomSink,
    runtime::task::{EffectCx, EffectTask},
    runtime::timer::Debouncer,
    style::tokens::{StyleTokens, names},
};

/// Quiet window before scroll-trigger boundaries are recomputed after a
/// resize.
const REFRESH_DEBOUNCE_MS: u64 = 250;

/// Cooperative scheduler for a page's effects.
///
/// Each effect is an independent task, constructed only when its
/// activation markers are present in the document (absence means the
/// effect is entirely inert, never an error). Events are dispatched to
/// every task; scroll positions are coalesced last-event-wins; per-frame
/// work (smoothing steps, debouncers, engine advancement, completion
/// routing) hangs off [`PageEvent::FrameTick`].
///
/// Exactly one preloader controller exists per runtime.
pub struct EffectsRuntime<E: AnimationEngine> {
    doc: PageDoc,
    viewport: Viewport,
    scroll_y: f64,
    engine: Option<E>,
    tasks: Vec<Box<dyn EffectTask>>,
    engine_tasks_built: bool,
    refresh_debounce: Debouncer,
}

impl<E: AnimationEngine> EffectsRuntime<E> {
    /// Build the runtime and every activatable task. Engine-dependent
    /// effects are skipped (with one log line) until an engine is
    /// attached.
    #[tracing::instrument(skip_all)]
    pub fn new(
        doc: PageDoc,
        tokens: &StyleTokens,
        viewport: Viewport,
        engine: Option<E>,
        now: Millis,
        sink: &mut dyn DomSink,
    ) -> WeaveResult<Self> {
        doc.validate()?;
        let mut runtime = Self {
            doc,
            viewport,
            scroll_y: 0.0,
            engine,
            tasks: Vec::new(),
            engine_tasks_built: false,
            refresh_debounce: Debouncer::new(REFRESH_DEBOUNCE_MS),
        };

        runtime.build_base_tasks(tokens, now, sink);
        if runtime.engine.is_some() {
            runtime.build_engine_tasks(tokens, now, sink);
        } else {
            tracing::warn!("animation engine not attached; dependent effects deferred");
        }
        Ok(runtime)
    }

    /// Attach the animation engine after construction (it may load
    /// later than the page). Builds the deferred engine-dependent tasks
    /// and lets existing tasks replay state into the engine.
    pub fn attach_engine(
        &mut self,
        engine: E,
        tokens: &StyleTokens,
        now: Millis,
        sink: &mut dyn DomSink,
    ) -> WeaveResult<()> {
        if self.engine.is_some() {
            return Err(WeaveError::validation("animation engine already attached"));
        }
        self.engine = Some(engine);

        let Self {
            doc,
            engine,
            viewport,
            scroll_y,
            tasks,
            ..
        } = self;
        for task in tasks.iter_mut() {
            let mut cx = EffectCx {
                doc: &mut *doc,
                sink: &mut *sink,
                engine: engine.as_mut().map(|e| e as &mut dyn AnimationEngine),
                viewport: *viewport,
                scroll_y: *scroll_y,
                now,
            };
            task.on_engine_attached(&mut cx)?;
        }

        self.build_engine_tasks(tokens, now, sink);
        Ok(())
    }

    pub fn doc(&self) -> &PageDoc {
        &self.doc
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn scroll_y(&self) -> f64 {
        self.scroll_y
    }

    pub fn engine(&self) -> Option<&E> {
        self.engine.as_ref()
    }

    pub fn engine_mut(&mut self) -> Option<&mut E> {
        self.engine.as_mut()
    }

    /// Names of the tasks that activated, in construction order.
    pub fn task_names(&self) -> Vec<&'static str> {
        self.tasks.iter().map(|t| t.name()).collect()
    }

    /// Feed one event into the session.
    #[tracing::instrument(skip(self, sink))]
    pub fn dispatch(
        &mut self,
        event: PageEvent,
        now: Millis,
        sink: &mut dyn DomSink,
    ) -> WeaveResult<()> {
        match &event {
            PageEvent::Scroll { y } => self.scroll_y = *y,
            PageEvent::Resize { viewport } => {
                self.viewport = *viewport;
                self.refresh_debounce.trigger(now);
            }
            PageEvent::ImageSettled { element } => self.doc.set_image_complete(*element),
            _ => {}
        }

        if matches!(event, PageEvent::FrameTick) {
            let completions = match &mut self.engine {
                Some(engine) => {
                    engine.drive(now, self.scroll_y);
                    engine.poll_completed()
                }
                None => Vec::new(),
            };
            for handle in completions {
                self.dispatch_to_tasks(&PageEvent::TweenCompleted { handle }, now, sink)?;
            }
            if self.refresh_debounce.fire_if_due(now) {
                self.refresh_tasks(now, sink)?;
            }
        }

        self.dispatch_to_tasks(&event, now, sink)
    }

    /// Convenience for the per-frame tick.
    pub fn frame(&mut self, now: Millis, sink: &mut dyn DomSink) -> WeaveResult<()> {
        self.dispatch(PageEvent::FrameTick, now, sink)
    }

    fn dispatch_to_tasks(
        &mut self,
        event: &PageEvent,
        now: Millis,
        sink: &mut dyn DomSink,
    ) -> WeaveResult<()> {
        let Self {
            doc,
            engine,
            viewport,
            scroll_y,
            tasks,
            ..
        } = self;
        for task in tasks.iter_mut() {
            let mut cx = EffectCx {
                doc: &mut *doc,
                sink: &mut *sink,
                engine: engine.as_mut().map(|e| e as &mut dyn AnimationEngine),
                viewport: *viewport,
                scroll_y: *scroll_y,
                now,
            };
            task.handle(event, &mut cx)?;
        }
        Ok(())
    }

    fn refresh_tasks(&mut self, now: Millis, sink: &mut dyn DomSink) -> WeaveResult<()> {
        let Self {
            doc,
            engine,
            viewport,
            scroll_y,
            tasks,
            ..
        } = self;
        for task in tasks.iter_mut() {
            let mut cx = EffectCx {
                doc: &mut *doc,
                sink: &mut *sink,
                engine: engine.as_mut().map(|e| e as &mut dyn AnimationEngine),
                viewport: *viewport,
                scroll_y: *scroll_y,
                now,
            };
            task.refresh(&mut cx)?;
        }
        Ok(())
    }

    fn build_base_tasks(&mut self, tokens: &StyleTokens, now: Millis, sink: &mut dyn DomSink) {
        // Preloader: one instance per page, gated on its canvas section.
        let section = self
            .doc
            .find_id_contains("preloadercanvas")
            .into_iter()
            .next();
        if let Some(section) = section {
            let object = self.doc.first_by_class("animated-preloader-object");
            let config = PreloaderConfig::from_tokens(tokens);
            let task = {
                let mut cx = self.cx(now, sink);
                PreloaderController::new(section, object, config, &mut cx)
            };
            self.tasks.push(Box::new(task));
        }

        if let Some(task) = ParallaxController::try_new(&self.doc) {
            self.tasks.push(Box::new(task));
        }

        {
            let Self {
                doc,
                viewport,
                scroll_y,
                ..
            } = self;
            if let Some(task) =
                HorizontalScrollController::try_init(doc, *viewport, *scroll_y, sink)
            {
                self.tasks.push(Box::new(task));
            }
        }

        if let Some(pairs) = HoverController::discover(&self.doc) {
            let container = self.doc.first_by_class("container");
            let task = {
                let mut cx = self.cx(now, sink);
                HoverController::new(pairs, container, &mut cx)
            };
            self.tasks.push(Box::new(task));
        }
    }

    fn build_engine_tasks(&mut self, tokens: &StyleTokens, now: Millis, sink: &mut dyn DomSink) {
        if self.engine_tasks_built || self.engine.is_none() {
            return;
        }
        self.engine_tasks_built = true;

        if !self.doc.find_by_class("textfill").is_empty() {
            let task = {
                let mut cx = self.cx(now, sink);
                TextfillController::new(&mut cx)
            };
            self.tasks.push(Box::new(task));
        }

        if let Some(target) = self.doc.first_by_class("animated-logo") {
            if let Some(trigger) = self.doc.closest_with_class(target, "sb") {
                let ratio = tokens.scalar_or(names::VIEWPORT_PERCENTAGE, 1.0);
                let task = {
                    let mut cx = self.cx(now, sink);
                    LogoRevealController::new(target, trigger, ratio, &mut cx)
                };
                self.tasks.push(Box::new(task));
            }
        }

        if let Some(pairs) = GrowImageController::discover(&self.doc) {
            let config = GrowConfig::from_tokens(tokens);
            let task = {
                let mut cx = self.cx(now, sink);
                GrowImageController::new(pairs, config, &mut cx)
            };
            self.tasks.push(Box::new(task));
        }

        let markers = ThemeCrossfadeController::discover_markers(&self.doc);
        if !markers.is_empty() {
            if let Some(root) = self.doc.root() {
                let colors = ThemeColors::from_tokens(tokens);
                let task = {
                    let mut cx = self.cx(now, sink);
                    ThemeCrossfadeController::new(root, markers, colors, &mut cx)
                };
                self.tasks.push(Box::new(task));
            }
        }
    }

    fn cx<'a>(&'a mut self, now: Millis, sink: &'a mut dyn DomSink) -> EffectCx<'a> {
        EffectCx {
            doc: &mut self.doc,
            sink,
            engine: self
                .engine
                .as_mut()
                .map(|e| e as &mut dyn AnimationEngine),
            viewport: self.viewport,
            scroll_y: self.scroll_y,
            now,
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/runtime/effects_runtime.rs"]
mod tests;

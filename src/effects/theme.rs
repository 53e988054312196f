use crate::{
    animation::ease::Ease,
    animation::timeline::{
        TriggerBounds, TriggerEdge, TriggerEnd, TriggerEvent, TriggerSpec, TriggerState,
    },
    animation::tween::{Prop, TweenHandle, TweenSpec, Value},
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::{ElementId, PageDoc},
    page::ops::DomOp,
    runtime::task::{EffectCx, EffectTask},
    style::color::Rgba8,
    style::tokens::{StyleTokens, names},
};

pub const THEME_BG: &str = "--theme-bg";
pub const THEME_TEXT: &str = "--theme-text";
pub const THEME_BORDER: &str = "--theme-border";
pub const CROSSFADE_DURATION_S: f64 = 0.5;

/// The two named theme colors, read once from the design tokens.
#[derive(Clone, Copy, Debug, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
pub struct ThemeColors {
    pub start: Rgba8,
    pub end: Rgba8,
}

impl ThemeColors {
    pub fn from_tokens(tokens: &StyleTokens) -> Self {
        Self {
            start: tokens.color_or(names::START_COLOR, Rgba8::BLACK),
            end: tokens.color_or(names::END_COLOR, Rgba8::WHITE),
        }
    }
}

/// Which of the two stable theme mappings is active.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ThemePhase {
    Start,
    End,
}

struct ThemeTrigger {
    marker: ElementId,
    bounds: TriggerBounds,
    state: TriggerState,
}

/// "top center" -> "bottom center" over the marker svg.
fn marker_trigger(marker: ElementId) -> TriggerSpec {
    TriggerSpec::new(
        marker,
        TriggerEdge::TOP_CENTER,
        TriggerEnd::Edge(TriggerEdge::BOTTOM_CENTER),
    )
}

/// Two-state theme crossfade driven by marker scroll intersections.
///
/// Entering forward swaps to the end mapping, leaving backward reverts;
/// the crossfade itself is a timed 0.5 s tween, never scroll-scrubbed.
pub struct ThemeCrossfadeController {
    root: ElementId,
    colors: ThemeColors,
    triggers: Vec<ThemeTrigger>,
    phase: ThemePhase,
    active_tween: Option<TweenHandle>,
}

impl ThemeCrossfadeController {
    /// Marker elements: the first `svg` descendant of each `.bgchange`.
    /// A `.bgchange` without one is skipped silently.
    pub fn discover_markers(doc: &PageDoc) -> Vec<ElementId> {
        doc.find_by_class("bgchange")
            .into_iter()
            .filter_map(|el| doc.descendant_with_tag(el, "svg"))
            .collect()
    }

    pub fn new(
        root: ElementId,
        markers: Vec<ElementId>,
        colors: ThemeColors,
        cx: &mut EffectCx<'_>,
    ) -> Self {
        let triggers = markers
            .into_iter()
            .filter_map(|marker| {
                let bounds = marker_trigger(marker).resolve(cx.doc, cx.viewport)?;
                Some(ThemeTrigger {
                    marker,
                    bounds,
                    state: TriggerState::new(),
                })
            })
            .collect();

        let mut controller = Self {
            root,
            colors,
            triggers,
            phase: ThemePhase::Start,
            active_tween: None,
        };
        controller.apply_immediate(cx, ThemePhase::Start);
        controller
    }

    pub fn phase(&self) -> ThemePhase {
        self.phase
    }

    fn mapping(colors: ThemeColors, phase: ThemePhase) -> [(Prop, Value); 3] {
        let (bg, fg) = match phase {
            ThemePhase::Start => (colors.start, colors.end),
            ThemePhase::End => (colors.end, colors.start),
        };
        [
            (Prop::Custom(THEME_BG.to_string()), Value::Color(bg)),
            (Prop::Custom(THEME_TEXT.to_string()), Value::Color(fg)),
            (Prop::Custom(THEME_BORDER.to_string()), Value::Color(fg)),
        ]
    }

    fn apply_immediate(&mut self, cx: &mut EffectCx<'_>, phase: ThemePhase) {
        self.phase = phase;
        let props = Self::mapping(self.colors, phase);
        for (prop, value) in &props {
            if let (Prop::Custom(name), Value::Color(color)) = (prop, value) {
                cx.sink.apply(DomOp::SetCustomColor {
                    name: name.clone(),
                    value: *color,
                });
            }
        }
        let root = self.root;
        if let Some(engine) = cx.engine() {
            engine.set(root, &props);
        }
    }

    fn crossfade_to(&mut self, cx: &mut EffectCx<'_>, phase: ThemePhase) {
        if self.phase == phase {
            return;
        }
        self.phase = phase;
        let props = Self::mapping(self.colors, phase);
        let root = self.root;
        let now = cx.now;

        if cx.engine.is_none() {
            // Degraded path: snap to the target mapping.
            for (prop, value) in &props {
                if let (Prop::Custom(name), Value::Color(color)) = (prop, value) {
                    cx.sink.apply(DomOp::SetCustomColor {
                        name: name.clone(),
                        value: *color,
                    });
                }
            }
            return;
        }

        let previous = self.active_tween.take();
        let result = {
            let Some(engine) = cx.engine() else {
                return;
            };
            if let Some(handle) = previous {
                engine.kill(handle);
            }
            let spec = TweenSpec::to(props.to_vec(), CROSSFADE_DURATION_S, Ease::InOutCubic);
            engine.tween(root, spec, now)
        };
        match result {
            Ok(handle) => self.active_tween = Some(handle),
            Err(err) => tracing::warn!(%err, "theme crossfade rejected"),
        }
    }

    fn on_scroll(&mut self, cx: &mut EffectCx<'_>) {
        let scroll_y = cx.scroll_y;
        let mut fired = Vec::new();
        for trigger in &mut self.triggers {
            fired.extend(trigger.state.update(scroll_y, trigger.bounds));
        }
        for event in fired {
            match event {
                TriggerEvent::Enter => self.crossfade_to(cx, ThemePhase::End),
                TriggerEvent::LeaveBack => self.crossfade_to(cx, ThemePhase::Start),
                TriggerEvent::Leave | TriggerEvent::EnterBack => {}
            }
        }
    }
}

impl EffectTask for ThemeCrossfadeController {
    fn name(&self) -> &'static str {
        "theme-crossfade"
    }

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        if matches!(event, PageEvent::Scroll { .. }) {
            self.on_scroll(cx);
        }
        Ok(())
    }

    fn refresh(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        for trigger in &mut self.triggers {
            if let Some(bounds) = marker_trigger(trigger.marker).resolve(cx.doc, cx.viewport) {
                trigger.bounds = bounds;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/theme.rs"]
mod tests;

use crate::{
    animation::ease::Ease,
    animation::timeline::{
        TimelineHandle, TimelineSpec, TimelineStep, TriggerEdge, TriggerEnd, TriggerSpec,
    },
    animation::tween::{Prop, Value},
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::{ElementId, PageDoc},
    runtime::task::{EffectCx, EffectTask},
    style::tokens::{StyleTokens, names},
};

/// The grow effect only runs at or above this viewport width.
pub const GROW_BREAKPOINT_PX: f64 = 1025.0;
/// Scroll distance of the pinned region, in viewport heights.
const PIN_VIEWPORTS: f64 = 1.5;

/// Initial framing for grow images, read once from the design tokens.
/// Crop insets are percentages.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct GrowConfig {
    pub initial_scale: f64,
    pub crop_top: f64,
    pub crop_right: f64,
    pub crop_bottom: f64,
    pub crop_left: f64,
}

impl GrowConfig {
    pub fn from_tokens(tokens: &StyleTokens) -> Self {
        Self {
            initial_scale: tokens.scalar_or(names::INITIAL_IMAGE_SCALE, 1.0),
            crop_top: tokens.non_negative_or(names::INITIAL_CROP_TOP, 0.0),
            crop_right: tokens.non_negative_or(names::INITIAL_CROP_RIGHT, 0.0),
            crop_bottom: tokens.non_negative_or(names::INITIAL_CROP_BOTTOM, 0.0),
            crop_left: tokens.non_negative_or(names::INITIAL_CROP_LEFT, 0.0),
        }
    }
}

struct GrowEntry {
    image: ElementId,
    section: ElementId,
    timeline: Option<TimelineHandle>,
}

fn section_trigger(section: ElementId) -> TriggerSpec {
    TriggerSpec::new(
        section,
        TriggerEdge::TOP_TOP,
        TriggerEnd::AfterStart {
            viewports: PIN_VIEWPORTS,
        },
    )
}

/// Pinned scrubbed reveal: each image scales from its configured initial
/// framing down to identity while its crop insets open to zero.
pub struct GrowImageController {
    entries: Vec<GrowEntry>,
    config: GrowConfig,
    active: bool,
}

impl GrowImageController {
    /// Collect `.grow-image` containers that sit inside both a `.sb`
    /// section and an `.ss-bg` wrapper; others are skipped silently.
    pub fn discover(doc: &PageDoc) -> Option<Vec<(ElementId, ElementId)>> {
        let containers = doc.find_by_class("grow-image");
        if containers.is_empty() {
            return None;
        }
        let mut found = Vec::new();
        for container in containers {
            let Some(image) = doc.first_child(container) else {
                continue;
            };
            let Some(section) = doc.closest_with_class(container, "sb") else {
                continue;
            };
            if doc.closest_with_class(container, "ss-bg").is_none() {
                continue;
            }
            found.push((image, section));
        }
        (!found.is_empty()).then_some(found)
    }

    pub fn new(
        pairs: Vec<(ElementId, ElementId)>,
        config: GrowConfig,
        cx: &mut EffectCx<'_>,
    ) -> Self {
        let mut controller = Self {
            entries: pairs
                .into_iter()
                .map(|(image, section)| GrowEntry {
                    image,
                    section,
                    timeline: None,
                })
                .collect(),
            config,
            active: false,
        };
        if cx.viewport.width >= GROW_BREAKPOINT_PX {
            controller.activate(cx);
        }
        controller
    }

    fn activate(&mut self, cx: &mut EffectCx<'_>) {
        self.active = true;
        for index in 0..self.entries.len() {
            self.build_entry(index, cx);
        }
    }

    fn deactivate(&mut self, cx: &mut EffectCx<'_>) {
        self.active = false;
        let handles: Vec<_> = self
            .entries
            .iter_mut()
            .filter_map(|entry| entry.timeline.take())
            .collect();
        if let Some(engine) = cx.engine() {
            for handle in handles {
                engine.kill_timeline(handle);
            }
        }
    }

    fn build_entry(&mut self, index: usize, cx: &mut EffectCx<'_>) {
        let (image, section) = {
            let entry = &self.entries[index];
            (entry.image, entry.section)
        };
        let Some(bounds) = section_trigger(section).resolve(cx.doc, cx.viewport) else {
            return;
        };
        let config = self.config;

        let Some(engine) = cx.engine() else {
            return;
        };
        if let Some(handle) = self.entries[index].timeline.take() {
            engine.kill_timeline(handle);
        }

        let spec = TimelineSpec {
            bounds,
            scrub: 1.0,
            pin: true,
            steps: vec![TimelineStep {
                targets: vec![image],
                from: Some(vec![
                    (Prop::Scale, Value::Scalar(config.initial_scale)),
                    (Prop::ClipTopPercent, Value::Scalar(config.crop_top)),
                    (Prop::ClipRightPercent, Value::Scalar(config.crop_right)),
                    (Prop::ClipBottomPercent, Value::Scalar(config.crop_bottom)),
                    (Prop::ClipLeftPercent, Value::Scalar(config.crop_left)),
                ]),
                to: vec![
                    (Prop::Scale, Value::Scalar(1.0)),
                    (Prop::ClipTopPercent, Value::Scalar(0.0)),
                    (Prop::ClipRightPercent, Value::Scalar(0.0)),
                    (Prop::ClipBottomPercent, Value::Scalar(0.0)),
                    (Prop::ClipLeftPercent, Value::Scalar(0.0)),
                ],
                duration: 1.0,
                stagger: 0.0,
                ease: Ease::Linear,
            }],
            initial_progress: None,
        };
        match engine.add_timeline(spec) {
            Ok(handle) => self.entries[index].timeline = Some(handle),
            Err(err) => tracing::warn!(%err, "grow timeline rejected"),
        }
    }
}

impl EffectTask for GrowImageController {
    fn name(&self) -> &'static str {
        "grow-image"
    }

    fn handle(&mut self, event: &PageEvent, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        if let PageEvent::Resize { .. } = event {
            let should_be_active = cx.viewport.width >= GROW_BREAKPOINT_PX;
            if should_be_active && !self.active {
                self.activate(cx);
            } else if !should_be_active && self.active {
                self.deactivate(cx);
            }
        }
        Ok(())
    }

    fn refresh(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        if !self.active {
            return Ok(());
        }
        for index in 0..self.entries.len() {
            let entry = &self.entries[index];
            let Some(handle) = entry.timeline else {
                continue;
            };
            let Some(bounds) = section_trigger(entry.section).resolve(cx.doc, cx.viewport)
            else {
                continue;
            };
            if let Some(engine) = cx.engine() {
                engine.refresh_timeline_bounds(handle, bounds)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/grow.rs"]
mod tests;

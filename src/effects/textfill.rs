use crate::{
    animation::ease::Ease,
    animation::timeline::{
        TimelineHandle, TimelineSpec, TimelineStep, TriggerEdge, TriggerEnd, TriggerSpec,
    },
    animation::tween::{Prop, Value},
    foundation::error::WeaveResult,
    page::events::PageEvent,
    page::model::ElementId,
    page::ops::DomOp,
    runtime::task::{EffectCx, EffectTask},
};

const DIMMED_OPACITY: f64 = 0.2;
const CHAR_STAGGER: f64 = 0.3;
const CHAR_DURATION: f64 = 1.0;
const TEXT_TAGS: &[&str] = &["p", "h1", "h2", "h3", "h4", "h5", "h6", "span"];

struct TextfillEntry {
    container: ElementId,
    timeline: TimelineHandle,
}

/// "top 80%" -> "top 10%": the block brightens while rising through the
/// upper viewport.
fn container_trigger(container: ElementId) -> TriggerSpec {
    TriggerSpec::new(
        container,
        TriggerEdge::new(0.0, 0.8),
        TriggerEnd::Edge(TriggerEdge::new(0.0, 0.1)),
    )
}

/// Character-level reveal: each `.textfill` block's text is split into
/// addressable characters that brighten from dimmed to full opacity as
/// the block scrolls up through the viewport.
pub struct TextfillController {
    entries: Vec<TextfillEntry>,
}

impl TextfillController {
    /// Requires the engine; the runtime only constructs this task once
    /// one is attached. Containers without a text child, or whose split
    /// yields no characters, are skipped with a log line.
    pub fn new(cx: &mut EffectCx<'_>) -> Self {
        let containers = cx.doc.find_by_class("textfill");
        let mut entries = Vec::new();

        for container in containers {
            let Some(text_el) = cx.doc.child_with_tag_in(container, TEXT_TAGS) else {
                tracing::debug!(container = container.0, "textfill: no text element");
                continue;
            };
            let chars = cx.doc.split_text_chars(text_el);
            if chars.is_empty() {
                tracing::debug!(container = container.0, "textfill: split yielded no chars");
                continue;
            }
            cx.sink.apply(DomOp::SplitChars {
                element: text_el,
                chars: chars.clone(),
            });

            let Some(bounds) = container_trigger(container).resolve(cx.doc, cx.viewport) else {
                continue;
            };

            let Some(engine) = cx.engine() else {
                break;
            };
            for &ch in &chars {
                engine.set(ch, &[(Prop::Opacity, Value::Scalar(DIMMED_OPACITY))]);
            }
            let spec = TimelineSpec {
                bounds,
                scrub: 1.0,
                pin: false,
                steps: vec![TimelineStep {
                    targets: chars,
                    from: None,
                    to: vec![(Prop::Opacity, Value::Scalar(1.0))],
                    duration: CHAR_DURATION,
                    stagger: CHAR_STAGGER,
                    ease: Ease::OutQuad,
                }],
                initial_progress: Some(0.0),
            };
            match engine.add_timeline(spec) {
                Ok(timeline) => entries.push(TextfillEntry {
                    container,
                    timeline,
                }),
                Err(err) => tracing::warn!(%err, "textfill timeline rejected"),
            }
        }

        Self { entries }
    }

    pub fn entry_count(&self) -> usize {
        self.entries.len()
    }
}

impl EffectTask for TextfillController {
    fn name(&self) -> &'static str {
        "textfill"
    }

    fn handle(&mut self, _event: &PageEvent, _cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        // Scrubbing is engine-side; nothing to do per event.
        Ok(())
    }

    fn refresh(&mut self, cx: &mut EffectCx<'_>) -> WeaveResult<()> {
        for entry in &self.entries {
            let Some(bounds) = container_trigger(entry.container).resolve(cx.doc, cx.viewport)
            else {
                continue;
            };
            if let Some(engine) = cx.engine() {
                engine.refresh_timeline_bounds(entry.timeline, bounds)?;
            }
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/effects/textfill.rs"]
mod tests;

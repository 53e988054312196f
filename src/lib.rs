//! Scrollweave is a headless orchestration engine for scroll-driven and
//! time-driven page effects.
//!
//! It owns the parts of a scroll-effects page that have actual
//! algorithmic content — numeric smoothing, progress mapping, state
//! transitions, lifecycle timing — while the rendering substrate and the
//! external tween library sit behind explicit seams.
//!
//! # Session overview
//!
//! 1. **Snapshot**: build or deserialize a [`PageDoc`] (elements,
//!    classes, document-coordinate geometry, image readiness) and a
//!    [`StyleTokens`] map of design tokens.
//! 2. **Construct**: [`EffectsRuntime::new`] reads the tokens once and
//!    activates one independent task per effect whose page markers are
//!    present; absent markers mean the effect is inert, never an error.
//! 3. **Drive**: feed [`PageEvent`]s (scroll, resize, load, pointer,
//!    frame ticks). Scroll positions are coalesced last-event-wins;
//!    per-frame work hangs off the frame tick.
//! 4. **Observe**: direct writes leave through a [`DomSink`] as
//!    [`DomOp`] values; tween-driven values live in the attached
//!    [`AnimationEngine`] ([`InlineEngine`] is a clock-driven reference
//!    implementation good enough to run whole sessions headlessly).
//!
//! The key design constraints:
//!
//! - **No unsafe**: `unsafe` is forbidden in this crate.
//! - **Single-threaded, cooperative**: no locks, no blocking; timers are
//!   polled from the frame stream.
//! - **Config is read once**: controllers get typed config structs, not
//!   live style lookups.
//! - **No fatal path in normal operation**: a missing element skips one
//!   effect, a missing engine degrades or defers, an invalid token falls
//!   back to its documented default.
#![forbid(unsafe_code)]

mod animation;
mod effects;
mod foundation;
mod page;
mod runtime;
mod style;

pub use animation::ease::Ease;
pub use animation::engine::{AnimationEngine, InlineEngine};
pub use animation::timeline::{
    TimelineHandle, TimelineSpec, TimelineStep, TriggerBounds, TriggerEdge, TriggerEnd,
    TriggerEvent, TriggerSpec, TriggerState, resolve_trigger_bounds,
};
pub use animation::tween::{Prop, TweenHandle, TweenSpec, Value};
pub use effects::grow::{GROW_BREAKPOINT_PX, GrowConfig, GrowImageController};
pub use effects::horizontal::{
    HorizontalScrollController, TARGET_ID_FRAGMENT, scroll_progress,
};
pub use effects::hover::HoverController;
pub use effects::logo::{
    DESKTOP_BREAKPOINT_PX, LogoRevealController, SCALE_MAX, SCALE_MIN, viewport_relative_scale,
};
pub use effects::parallax::{
    LERP_FACTOR, MAX_MOVE_PX, OffsetPair, ParallaxController, RANGE_VIEWPORTS, ScrollRegion,
    effect_region, target_offsets,
};
pub use effects::preloader::{
    PreloaderAnimation, PreloaderConfig, PreloaderController, PreloaderState,
};
pub use effects::textfill::TextfillController;
pub use effects::theme::{
    CROSSFADE_DURATION_S, THEME_BG, THEME_BORDER, THEME_TEXT, ThemeColors,
    ThemeCrossfadeController, ThemePhase,
};
pub use foundation::core::{Millis, Point, Rect, Vec2, Viewport, clamp01, smooth_toward};
pub use foundation::error::{WeaveError, WeaveResult};
pub use page::events::PageEvent;
pub use page::model::{ElementId, ElementNode, ElementSeed, PageDoc};
pub use page::ops::{DomOp, DomSink, NullSink, RecordingSink};
pub use runtime::effects_runtime::EffectsRuntime;
pub use runtime::task::{EffectCx, EffectTask};
pub use runtime::timer::{Deadline, Debouncer};
pub use style::color::Rgba8;
pub use style::tokens::{StyleTokens, names as token_names};
pub use style::units::{
    parse_non_negative_scalar, parse_or, parse_positive_scalar, secs_to_millis,
};

use crate::foundation::error::{WeaveError, WeaveResult};

pub use kurbo::{Point, Rect, Vec2};

/// Monotonic timestamp in milliseconds since session start.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct Millis(pub u64);

impl Millis {
    /// Milliseconds elapsed since `earlier`, saturating at zero.
    pub fn since(self, earlier: Millis) -> u64 {
        self.0.saturating_sub(earlier.0)
    }

    /// This timestamp shifted forward by `ms`.
    pub fn plus(self, ms: u64) -> Millis {
        Millis(self.0.saturating_add(ms))
    }
}

/// Visible viewport dimensions in CSS pixels.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct Viewport {
    pub width: f64,
    pub height: f64,
}

impl Viewport {
    pub fn new(width: f64, height: f64) -> WeaveResult<Self> {
        if !(width.is_finite() && width > 0.0) {
            return Err(WeaveError::validation("Viewport width must be > 0"));
        }
        if !(height.is_finite() && height > 0.0) {
            return Err(WeaveError::validation("Viewport height must be > 0"));
        }
        Ok(Self { width, height })
    }
}

/// Clamp a progress ratio into `[0, 1]`.
pub fn clamp01(t: f64) -> f64 {
    t.clamp(0.0, 1.0)
}

/// Per-step exponential smoothing: `current + (target - current) * factor`.
///
/// With a constant target this converges geometrically; the caller owns
/// the stored `current`.
pub fn smooth_toward(current: f64, target: f64, factor: f64) -> f64 {
    current + (target - current) * factor
}

use crate::{
    animation::ease::Ease,
    foundation::error::{WeaveError, WeaveResult},
    style::color::Rgba8,
};

/// Animatable property on a page element.
#[derive(
    Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub enum Prop {
    Opacity,
    Scale,
    RotationDeg,
    /// Vertical translation as a percentage of the element's own height.
    YPercent,
    Visibility,
    ClipTopPercent,
    ClipRightPercent,
    ClipBottomPercent,
    ClipLeftPercent,
    /// A named custom property on the document root (theme colors).
    Custom(String),
}

impl Prop {
    /// Implicit starting value when the engine has never written the
    /// property (the page's static default).
    pub fn initial_value(&self) -> Option<Value> {
        match self {
            Prop::Opacity | Prop::Scale => Some(Value::Scalar(1.0)),
            Prop::RotationDeg
            | Prop::YPercent
            | Prop::ClipTopPercent
            | Prop::ClipRightPercent
            | Prop::ClipBottomPercent
            | Prop::ClipLeftPercent => Some(Value::Scalar(0.0)),
            Prop::Visibility => Some(Value::Visible(true)),
            Prop::Custom(_) => None,
        }
    }
}

/// Property value carried by tweens and set operations.
#[derive(Clone, Copy, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub enum Value {
    Scalar(f64),
    Color(Rgba8),
    Visible(bool),
}

impl Value {
    /// Interpolate from `self` toward `to` at eased progress `t`.
    ///
    /// Visibility is not interpolable: becoming visible applies as soon
    /// as the tween starts, becoming hidden only once it ends.
    pub fn lerp(self, to: Value, t: f64) -> Value {
        match (self, to) {
            (Value::Scalar(a), Value::Scalar(b)) => Value::Scalar(a + (b - a) * t),
            (Value::Color(a), Value::Color(b)) => Value::Color(a.lerp(b, t)),
            (Value::Visible(_), Value::Visible(true)) => Value::Visible(t > 0.0),
            (Value::Visible(from), Value::Visible(false)) => {
                Value::Visible(if t >= 1.0 { false } else { from })
            }
            // Mismatched kinds hold the target; specs are validated
            // before they reach sampling.
            (_, to) => to,
        }
    }
}

/// Cancellable handle to an engine-owned tween.
#[derive(
    Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, serde::Serialize, serde::Deserialize,
)]
pub struct TweenHandle(pub u64);

/// Declarative tween request handed across the engine seam.
#[derive(Clone, Debug, PartialEq, serde::Serialize, serde::Deserialize)]
pub struct TweenSpec {
    /// Target property values.
    pub to: Vec<(Prop, Value)>,
    /// Explicit starting values; omitted properties start from the
    /// engine's current value (or the property's static default).
    pub from: Option<Vec<(Prop, Value)>>,
    /// Duration of one cycle in seconds.
    pub duration_s: f64,
    pub ease: Ease,
    /// Extra cycles after the first; `-1` loops until killed.
    pub repeat: i32,
    /// Reverse direction on every other cycle.
    pub yoyo: bool,
}

impl TweenSpec {
    pub fn to(props: Vec<(Prop, Value)>, duration_s: f64, ease: Ease) -> Self {
        Self {
            to: props,
            from: None,
            duration_s,
            ease,
            repeat: 0,
            yoyo: false,
        }
    }

    pub fn from_to(
        from: Vec<(Prop, Value)>,
        to: Vec<(Prop, Value)>,
        duration_s: f64,
        ease: Ease,
    ) -> Self {
        Self {
            to,
            from: Some(from),
            duration_s,
            ease,
            repeat: 0,
            yoyo: false,
        }
    }

    pub fn looped(mut self, yoyo: bool) -> Self {
        self.repeat = -1;
        self.yoyo = yoyo;
        self
    }

    pub fn validate(&self) -> WeaveResult<()> {
        if self.to.is_empty() {
            return Err(WeaveError::validation("tween must target a property"));
        }
        if !(self.duration_s.is_finite() && self.duration_s >= 0.0) {
            return Err(WeaveError::validation(
                "tween duration must be finite and >= 0",
            ));
        }
        if self.repeat < -1 {
            return Err(WeaveError::validation("tween repeat must be >= -1"));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../../tests/unit/animation/tween.rs"]
mod tests;

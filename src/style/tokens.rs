use std::collections::BTreeMap;

use crate::{
    foundation::error::{WeaveError, WeaveResult},
    style::color::Rgba8,
    style::units,
};

/// Custom-property names the page exposes as design tokens.
///
/// Values are read once at initialization into typed config structs;
/// unrecognized or missing entries fall back to documented defaults.
pub mod names {
    pub const ACTIVATE_PRELOADER: &str = "--activate-preloader";
    pub const PRELOADER_ANIMATION: &str = "--preloader-animation";
    pub const MIN_DISPLAY_TIME: &str = "--min-display-time";
    pub const ANIMATION_DURATION: &str = "--animation-duration";
    pub const FADE_DURATION: &str = "--fade-duration";
    pub const VIEWPORT_PERCENTAGE: &str = "--viewport-percentage";
    pub const INITIAL_IMAGE_SCALE: &str = "--initial-image-scale";
    pub const INITIAL_CROP_TOP: &str = "--initial-crop-top";
    pub const INITIAL_CROP_RIGHT: &str = "--initial-crop-right";
    pub const INITIAL_CROP_BOTTOM: &str = "--initial-crop-bottom";
    pub const INITIAL_CROP_LEFT: &str = "--initial-crop-left";
    pub const START_COLOR: &str = "--start-color";
    pub const END_COLOR: &str = "--end-color";
}

/// Read-once snapshot of the page's computed-style design tokens.
#[derive(Clone, Debug, Default, serde::Serialize, serde::Deserialize)]
#[serde(transparent)]
pub struct StyleTokens {
    values: BTreeMap<String, String>,
}

impl StyleTokens {
    pub fn new() -> Self {
        Self::default()
    }

    /// Load a token map from a JSON object of string values.
    pub fn from_json_str(json: &str) -> WeaveResult<Self> {
        serde_json::from_str(json).map_err(|e| WeaveError::serde(e.to_string()))
    }

    pub fn insert(&mut self, name: impl Into<String>, value: impl Into<String>) {
        self.values.insert(name.into(), value.into());
    }

    /// Raw trimmed value, if the token is present and non-empty.
    pub fn raw(&self, name: &str) -> Option<&str> {
        self.values
            .get(name)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }

    /// True only when the token is exactly the enabled sentinel `"true"`.
    pub fn flag_enabled(&self, name: &str) -> bool {
        self.raw(name) == Some("true")
    }

    /// Positive scalar with unit suffix stripped, or `default`.
    pub fn scalar_or(&self, name: &str, default: f64) -> f64 {
        self.raw(name)
            .and_then(units::parse_positive_scalar)
            .unwrap_or(default)
    }

    /// Non-negative scalar (crop insets may be zero), or `default`.
    pub fn non_negative_or(&self, name: &str, default: f64) -> f64 {
        self.raw(name)
            .and_then(units::parse_non_negative_scalar)
            .unwrap_or(default)
    }

    /// Hex color value, or `default`.
    pub fn color_or(&self, name: &str, default: Rgba8) -> Rgba8 {
        self.raw(name)
            .and_then(Rgba8::parse_hex)
            .unwrap_or(default)
    }
}

#[cfg(test)]
#[path = "../../tests/unit/style/tokens.rs"]
mod tests;

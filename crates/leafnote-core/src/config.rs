//! Tunable constants for hit-testing and stroke styling.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

/// Hit box half-size around a sticker's position.
pub const STICKER_HIT_HALF_SIZE: f64 = 80.0;
/// Hit box half-size around an emoji's position.
pub const EMOJI_HIT_HALF_SIZE: f64 = 32.0;
/// Hit box half-size around a text label's position.
pub const TEXT_HIT_HALF_SIZE: f64 = 100.0;
/// Hit box half-size around a note's position.
pub const NOTE_HIT_HALF_SIZE: f64 = 100.0;
/// Minimum distance (logical units) that still hits a stroke.
pub const DRAWING_HIT_MIN_TOLERANCE: f64 = 10.0;
/// Stroke hit tolerance as a multiple of the stroke width.
pub const DRAWING_HIT_WIDTH_FACTOR: f64 = 2.0;
/// Opacity forced onto highlighter strokes.
pub const HIGHLIGHTER_OPACITY: f64 = 0.35;
/// Highlighter stroke width relative to the controller's base width.
pub const HIGHLIGHTER_WIDTH_MULTIPLIER: f64 = 4.0;
/// Height of the clickable header strip at the top of a note.
pub const NOTE_HEADER_HEIGHT: f64 = 28.0;

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
    #[error("Invalid config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error("Invalid value for {field}: {value}")]
    InvalidValue { field: &'static str, value: f64 },
}

/// Geometry and styling knobs shared by the surface and the renderer.
///
/// Every field has a default, so a config file only needs the fields it
/// overrides.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct SurfaceConfig {
    pub sticker_hit_half_size: f64,
    pub emoji_hit_half_size: f64,
    pub text_hit_half_size: f64,
    pub note_hit_half_size: f64,
    pub drawing_hit_min_tolerance: f64,
    pub drawing_hit_width_factor: f64,
    pub highlighter_opacity: f64,
    pub highlighter_width_multiplier: f64,
    pub note_header_height: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            sticker_hit_half_size: STICKER_HIT_HALF_SIZE,
            emoji_hit_half_size: EMOJI_HIT_HALF_SIZE,
            text_hit_half_size: TEXT_HIT_HALF_SIZE,
            note_hit_half_size: NOTE_HIT_HALF_SIZE,
            drawing_hit_min_tolerance: DRAWING_HIT_MIN_TOLERANCE,
            drawing_hit_width_factor: DRAWING_HIT_WIDTH_FACTOR,
            highlighter_opacity: HIGHLIGHTER_OPACITY,
            highlighter_width_multiplier: HIGHLIGHTER_WIDTH_MULTIPLIER,
            note_header_height: NOTE_HEADER_HEIGHT,
        }
    }
}

impl SurfaceConfig {
    /// Parse a (possibly partial) JSON config.
    pub fn from_json(json: &str) -> Result<Self, ConfigError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Load a JSON config file.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let json = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_json(&json)
    }

    /// Reject negative or non-finite sizes and out-of-range opacity.
    pub fn validate(&self) -> Result<(), ConfigError> {
        let sizes = [
            ("stickerHitHalfSize", self.sticker_hit_half_size),
            ("emojiHitHalfSize", self.emoji_hit_half_size),
            ("textHitHalfSize", self.text_hit_half_size),
            ("noteHitHalfSize", self.note_hit_half_size),
            ("drawingHitMinTolerance", self.drawing_hit_min_tolerance),
            ("drawingHitWidthFactor", self.drawing_hit_width_factor),
            ("highlighterWidthMultiplier", self.highlighter_width_multiplier),
            ("noteHeaderHeight", self.note_header_height),
        ];
        for (field, value) in sizes {
            if !value.is_finite() || value < 0.0 {
                return Err(ConfigError::InvalidValue { field, value });
            }
        }
        let opacity = self.highlighter_opacity;
        if !(0.0..=1.0).contains(&opacity) {
            return Err(ConfigError::InvalidValue {
                field: "highlighterOpacity",
                value: opacity,
            });
        }
        Ok(())
    }
}

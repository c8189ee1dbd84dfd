//! Emoji and sticker placements.

use super::AnnotationId;
use crate::catalog::StickerId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// An emoji glyph stamped on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Emoji {
    pub(crate) id: AnnotationId,
    /// Center of the glyph in logical coordinates.
    pub position: Point,
    pub emoji: String,
    /// Glyph size in logical units.
    pub size: f64,
}

impl Emoji {
    pub const DEFAULT_SIZE: f64 = 32.0;

    pub fn new(position: Point, emoji: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            emoji: emoji.into(),
            size: Self::DEFAULT_SIZE,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }
}

/// A catalog sticker stamped on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sticker {
    pub(crate) id: AnnotationId,
    /// Center of the badge in logical coordinates.
    pub position: Point,
    /// Catalog id; display metadata is resolved at render time.
    pub sticker: StickerId,
    /// Nominal size recorded at placement. The badge is laid out in the
    /// configured sticker hit box.
    pub size: f64,
}

impl Sticker {
    pub const DEFAULT_SIZE: f64 = 80.0;

    pub fn new(position: Point, sticker: StickerId) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            sticker,
            size: Self::DEFAULT_SIZE,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }
}

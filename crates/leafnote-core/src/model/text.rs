//! Text labels and collapsible sticky notes.

use super::AnnotationId;
use kurbo::Point;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A free text label placed on the page.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Text {
    pub(crate) id: AnnotationId,
    /// Anchor point in logical coordinates.
    pub position: Point,
    /// The text content (may be empty while being typed).
    pub content: String,
    /// Text color (CSS color string).
    pub color: String,
    /// Font size in logical units.
    pub font_size: f64,
}

impl Text {
    /// Default font size.
    pub const DEFAULT_FONT_SIZE: f64 = 16.0;

    /// Create an empty text label at `position`.
    pub fn new(position: Point, color: impl Into<String>, font_size: f64) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: String::new(),
            color: color.into(),
            font_size,
        }
    }

    /// Set the content.
    pub fn with_content(mut self, content: impl Into<String>) -> Self {
        self.content = content.into();
        self
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }
}

/// A sticky note. Content is only shown (and editable) while expanded.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Note {
    pub(crate) id: AnnotationId,
    /// Anchor point in logical coordinates.
    pub position: Point,
    pub content: String,
    /// Header / card color (CSS color string).
    pub color: String,
    pub is_expanded: bool,
}

impl Note {
    /// Create a collapsed, empty note at `position`.
    pub fn new(position: Point, color: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            position,
            content: String::new(),
            color: color.into(),
            is_expanded: false,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }
}

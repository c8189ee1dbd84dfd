//! Annotation data model.
//!
//! Every annotation kind is one variant of the closed [`Annotation`] enum, so
//! rendering and hit-testing dispatch is an exhaustive `match` and adding a
//! kind is a compile-checked change.

mod drawing;
mod glyph;
mod text;

pub use drawing::{DrawTool, Drawing, smooth_path};
pub use glyph::{Emoji, Sticker};
pub use text::{Note, Text};

use kurbo::Point;
use serde::{Deserialize, Serialize};
use std::fmt;
use uuid::Uuid;

/// Unique identifier for annotations.
pub type AnnotationId = Uuid;

/// An annotation on one page, discriminated by `type` when serialized.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Annotation {
    Drawing(Drawing),
    Text(Text),
    Note(Note),
    Emoji(Emoji),
    Sticker(Sticker),
}

/// Discriminant of an [`Annotation`], handy for logging and filtering.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AnnotationKind {
    Drawing,
    Text,
    Note,
    Emoji,
    Sticker,
}

impl fmt::Display for AnnotationKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AnnotationKind::Drawing => "drawing",
            AnnotationKind::Text => "text",
            AnnotationKind::Note => "note",
            AnnotationKind::Emoji => "emoji",
            AnnotationKind::Sticker => "sticker",
        };
        f.write_str(name)
    }
}

impl Annotation {
    pub fn id(&self) -> AnnotationId {
        match self {
            Annotation::Drawing(a) => a.id,
            Annotation::Text(a) => a.id,
            Annotation::Note(a) => a.id,
            Annotation::Emoji(a) => a.id,
            Annotation::Sticker(a) => a.id,
        }
    }

    /// False for strokes too short to have been committed.
    pub fn is_well_formed(&self) -> bool {
        match self {
            Annotation::Drawing(d) => d.is_complete(),
            _ => true,
        }
    }

    pub fn kind(&self) -> AnnotationKind {
        match self {
            Annotation::Drawing(_) => AnnotationKind::Drawing,
            Annotation::Text(_) => AnnotationKind::Text,
            Annotation::Note(_) => AnnotationKind::Note,
            Annotation::Emoji(_) => AnnotationKind::Emoji,
            Annotation::Sticker(_) => AnnotationKind::Sticker,
        }
    }

    /// Anchor position. Drawings have none; they are located by their points.
    pub fn position(&self) -> Option<Point> {
        match self {
            Annotation::Drawing(_) => None,
            Annotation::Text(a) => Some(a.position),
            Annotation::Note(a) => Some(a.position),
            Annotation::Emoji(a) => Some(a.position),
            Annotation::Sticker(a) => Some(a.position),
        }
    }

    /// Move a position-bearing annotation. Returns false for drawings.
    pub fn set_position(&mut self, position: Point) -> bool {
        match self {
            Annotation::Drawing(_) => false,
            Annotation::Text(a) => {
                a.position = position;
                true
            }
            Annotation::Note(a) => {
                a.position = position;
                true
            }
            Annotation::Emoji(a) => {
                a.position = position;
                true
            }
            Annotation::Sticker(a) => {
                a.position = position;
                true
            }
        }
    }

    /// Editable content, for the kinds that have any.
    pub fn content(&self) -> Option<&str> {
        match self {
            Annotation::Text(a) => Some(&a.content),
            Annotation::Note(a) => Some(&a.content),
            Annotation::Drawing(_) | Annotation::Emoji(_) | Annotation::Sticker(_) => None,
        }
    }

    /// Apply a partial update. Fields the variant does not have are ignored.
    ///
    /// Returns true if anything changed.
    pub fn apply(&mut self, patch: &AnnotationPatch) -> bool {
        let mut changed = false;
        if let Some(position) = patch.position {
            if self.position() != Some(position) {
                changed |= self.set_position(position);
            }
        }
        if let Some(content) = &patch.content {
            match self {
                Annotation::Text(a) if a.content != *content => {
                    a.content.clone_from(content);
                    changed = true;
                }
                Annotation::Note(a) if a.content != *content => {
                    a.content.clone_from(content);
                    changed = true;
                }
                _ => {}
            }
        }
        if let Some(expanded) = patch.is_expanded {
            if let Annotation::Note(a) = self {
                if a.is_expanded != expanded {
                    a.is_expanded = expanded;
                    changed = true;
                }
            }
        }
        changed
    }

    pub fn as_drawing(&self) -> Option<&Drawing> {
        match self {
            Annotation::Drawing(d) => Some(d),
            _ => None,
        }
    }

    pub fn as_note(&self) -> Option<&Note> {
        match self {
            Annotation::Note(n) => Some(n),
            _ => None,
        }
    }
}

impl From<Drawing> for Annotation {
    fn from(a: Drawing) -> Self {
        Annotation::Drawing(a)
    }
}

impl From<Text> for Annotation {
    fn from(a: Text) -> Self {
        Annotation::Text(a)
    }
}

impl From<Note> for Annotation {
    fn from(a: Note) -> Self {
        Annotation::Note(a)
    }
}

impl From<Emoji> for Annotation {
    fn from(a: Emoji) -> Self {
        Annotation::Emoji(a)
    }
}

impl From<Sticker> for Annotation {
    fn from(a: Sticker) -> Self {
        Annotation::Sticker(a)
    }
}

/// Partial update of an annotation's mutable fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AnnotationPatch {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub position: Option<Point>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub content: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_expanded: Option<bool>,
}

impl AnnotationPatch {
    pub fn position(position: Point) -> Self {
        Self {
            position: Some(position),
            ..Self::default()
        }
    }

    pub fn content(content: impl Into<String>) -> Self {
        Self {
            content: Some(content.into()),
            ..Self::default()
        }
    }

    pub fn expanded(is_expanded: bool) -> Self {
        Self {
            is_expanded: Some(is_expanded),
            ..Self::default()
        }
    }

    pub fn is_empty(&self) -> bool {
        self.position.is_none() && self.content.is_none() && self.is_expanded.is_none()
    }
}

/// Serialize one page's annotation set.
pub fn annotations_to_json(annotations: &[Annotation]) -> Result<String, serde_json::Error> {
    serde_json::to_string_pretty(annotations)
}

/// Deserialize one page's annotation set.
pub fn annotations_from_json(json: &str) -> Result<Vec<Annotation>, serde_json::Error> {
    serde_json::from_str(json)
}

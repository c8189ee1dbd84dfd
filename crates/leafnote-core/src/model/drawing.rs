//! Freehand pen and highlighter strokes.

use super::AnnotationId;
use kurbo::{BezPath, Point, Rect};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Which drawing tool produced a stroke.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DrawTool {
    #[default]
    Pen,
    Highlighter,
}

/// A committed freehand stroke.
///
/// `points` is the source of truth and is never rewritten by rendering.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Drawing {
    pub(crate) id: AnnotationId,
    /// Sampled pointer positions in logical coordinates.
    pub points: Vec<Point>,
    /// Stroke color (CSS color string).
    pub color: String,
    /// Stroke width in logical units.
    pub stroke_width: f64,
    /// Stroke opacity (0.0 - 1.0).
    pub opacity: f64,
    /// Tool that produced the stroke.
    pub tool: DrawTool,
}

impl Drawing {
    /// Fewest samples a committed stroke may have.
    pub const MIN_POINTS: usize = 2;

    /// Create a stroke with a fresh id.
    pub fn new(
        points: Vec<Point>,
        color: impl Into<String>,
        stroke_width: f64,
        opacity: f64,
        tool: DrawTool,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            points,
            color: color.into(),
            stroke_width,
            opacity,
            tool,
        }
    }

    pub fn id(&self) -> AnnotationId {
        self.id
    }

    /// Whether the stroke has enough samples to be kept.
    pub fn is_complete(&self) -> bool {
        self.points.len() >= Self::MIN_POINTS
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// Bounding box of the sampled points (not inflated by stroke width).
    pub fn bounds(&self) -> Rect {
        match self.points.split_first() {
            Some((first, rest)) => rest
                .iter()
                .fold(Rect::from_points(*first, *first), |r, p| r.union_pt(*p)),
            None => Rect::ZERO,
        }
    }

    /// Smoothed outline of the stroke.
    pub fn to_path(&self) -> BezPath {
        smooth_path(&self.points)
    }
}

/// Build the smoothed curve through a point sequence.
///
/// The first point is a move-to. Each interior point becomes the control
/// point of a quadratic segment ending at the midpoint to its successor.
/// The last point is a line-to.
pub fn smooth_path(points: &[Point]) -> BezPath {
    let mut path = BezPath::new();
    let Some((first, rest)) = points.split_first() else {
        return path;
    };
    path.move_to(*first);
    let Some((last, interior)) = rest.split_last() else {
        return path;
    };

    for (i, ctrl) in interior.iter().enumerate() {
        let next = if i + 1 < interior.len() {
            interior[i + 1]
        } else {
            *last
        };
        path.quad_to(*ctrl, ctrl.midpoint(next));
    }
    path.line_to(*last);
    path
}

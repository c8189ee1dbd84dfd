//! Point-containment queries against a page's annotation set.

use crate::config::SurfaceConfig;
use crate::model::{Annotation, AnnotationId, Drawing, Note};
use kurbo::{Point, Rect, Vec2};

/// Which part of a note a point landed on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoteRegion {
    /// The title strip; clicking it toggles expansion.
    Header,
    /// The content area (only exists while expanded).
    Body,
}

/// Distance from a point to a line segment (a→b).
pub fn point_to_segment_dist(point: Point, a: Point, b: Point) -> f64 {
    let seg = b - a;
    let pv = point - a;
    let len_sq = seg.hypot2();
    if len_sq < f64::EPSILON {
        return pv.hypot();
    }
    let t = (pv.dot(seg) / len_sq).clamp(0.0, 1.0);
    let proj = a + Vec2::new(t * seg.x, t * seg.y);
    point.distance(proj)
}

/// Minimum distance from a point to a polyline.
///
/// A single-point polyline degenerates to point distance; an empty one is
/// infinitely far away.
pub fn point_to_polyline_dist(point: Point, points: &[Point]) -> f64 {
    match points {
        [] => f64::INFINITY,
        [only] => point.distance(*only),
        _ => points
            .windows(2)
            .map(|w| point_to_segment_dist(point, w[0], w[1]))
            .fold(f64::INFINITY, f64::min),
    }
}

/// How close a point must be to a stroke to hit it.
pub fn drawing_tolerance(drawing: &Drawing, cfg: &SurfaceConfig) -> f64 {
    (drawing.stroke_width * cfg.drawing_hit_width_factor).max(cfg.drawing_hit_min_tolerance)
}

/// Sticker badge height as a fraction of its width.
pub const STICKER_BADGE_ASPECT: f64 = 0.3;

/// Axis-aligned hit box of a position-bearing annotation.
///
/// This is also the box the renderer lays the item out in. Drawings return
/// `None`; they are hit by distance to their path.
pub fn hit_box(annotation: &Annotation, cfg: &SurfaceConfig) -> Option<Rect> {
    let (center, half) = match annotation {
        Annotation::Drawing(_) => return None,
        Annotation::Text(t) => (t.position, cfg.text_hit_half_size),
        Annotation::Note(n) => return Some(note_card_rect(n, cfg)),
        Annotation::Emoji(e) => (e.position, cfg.emoji_hit_half_size),
        Annotation::Sticker(s) => {
            let width = cfg.sticker_hit_half_size * 2.0;
            return Some(Rect::from_center_size(s.position, (width, width * STICKER_BADGE_ASPECT)));
        }
    };
    Some(Rect::from_center_size(center, (half * 2.0, half * 2.0)))
}

/// Outline shown around a selected annotation.
pub fn selection_bounds(annotation: &Annotation, cfg: &SurfaceConfig) -> Rect {
    match annotation {
        Annotation::Drawing(d) => {
            let pad = drawing_tolerance(d, cfg);
            d.bounds().inflate(pad, pad)
        }
        _ => hit_box(annotation, cfg).unwrap_or(Rect::ZERO),
    }
}

/// Whether `point` hits a single annotation.
pub fn hits(annotation: &Annotation, point: Point, cfg: &SurfaceConfig) -> bool {
    match annotation {
        Annotation::Drawing(d) => {
            point_to_polyline_dist(point, &d.points) <= drawing_tolerance(d, cfg)
        }
        Annotation::Text(_) | Annotation::Note(_) | Annotation::Emoji(_) | Annotation::Sticker(_) => {
            hit_box(annotation, cfg).is_some_and(|r| contains_inclusive(r, point))
        }
    }
}

fn contains_inclusive(rect: Rect, point: Point) -> bool {
    point.x >= rect.x0 && point.x <= rect.x1 && point.y >= rect.y0 && point.y <= rect.y1
}

/// Find the topmost annotation at `point`.
///
/// The set is in render order (back to front), so it is walked in reverse
/// and the first match wins.
pub fn hit_test(annotations: &[Annotation], point: Point, cfg: &SurfaceConfig) -> Option<AnnotationId> {
    annotations
        .iter()
        .rev()
        .find(|a| hits(a, point, cfg))
        .map(Annotation::id)
}

/// All annotations at `point`, topmost first.
pub fn hit_test_all(annotations: &[Annotation], point: Point, cfg: &SurfaceConfig) -> Vec<AnnotationId> {
    annotations
        .iter()
        .rev()
        .filter(|a| hits(a, point, cfg))
        .map(Annotation::id)
        .collect()
}

/// The note card, centered on its position. Same size in both states.
pub fn note_card_rect(note: &Note, cfg: &SurfaceConfig) -> Rect {
    let half = cfg.note_hit_half_size;
    Rect::from_center_size(note.position, (half * 2.0, half * 2.0))
}

/// Title strip across the top of the note card.
pub fn note_header_rect(note: &Note, cfg: &SurfaceConfig) -> Rect {
    let card = note_card_rect(note, cfg);
    Rect::new(
        card.x0,
        card.y0,
        card.x1,
        card.y0 + cfg.note_header_height.min(card.height()),
    )
}

/// Classify a point inside a note. `None` if the point misses the card.
///
/// A collapsed card has no body, so every hit on it is a header hit.
pub fn note_region(note: &Note, point: Point, cfg: &SurfaceConfig) -> Option<NoteRegion> {
    if !contains_inclusive(note_card_rect(note, cfg), point) {
        return None;
    }
    if !note.is_expanded || point.y <= note_header_rect(note, cfg).y1 {
        Some(NoteRegion::Header)
    } else {
        Some(NoteRegion::Body)
    }
}

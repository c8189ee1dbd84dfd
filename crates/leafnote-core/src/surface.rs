//! Pointer interpretation for one page.
//!
//! The surface maps client-space pointer events into page-logical space,
//! runs the per-tool interaction state machine, and answers hit-test
//! queries. It never mutates annotations itself: every change is returned
//! as an [`AnnotationIntent`] for the page store to apply, and the store's
//! current list is passed back in on the next event.
//!
//! Malformed sequences (a move with no button down, an eraser click on empty
//! space, a drag whose target vanished) are silent no-ops.

use crate::config::SurfaceConfig;
use crate::controller::{StyleContext, ToolKind};
use crate::geometry::{PageGeometry, Viewport};
use crate::hit::{NoteRegion, hit_test, note_region};
use crate::model::{
    Annotation, AnnotationId, AnnotationPatch, DrawTool, Drawing, Emoji, Note, Sticker, Text,
};
use kurbo::{Point, Rect, Vec2};
use serde::{Deserialize, Serialize};

/// A mutation the surface wants applied to the page store.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnnotationIntent {
    /// Page the mutation targets.
    pub page: u32,
    pub op: IntentOp,
}

/// The mutation itself.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum IntentOp {
    /// Append a new annotation (topmost).
    Create(Annotation),
    /// Partially update an existing annotation.
    Update {
        id: AnnotationId,
        patch: AnnotationPatch,
    },
    /// Delete an annotation.
    Remove(AnnotationId),
}

impl AnnotationIntent {
    /// Append `annotation` to `page`.
    pub fn create(page: u32, annotation: impl Into<Annotation>) -> Self {
        Self {
            page,
            op: IntentOp::Create(annotation.into()),
        }
    }

    /// Apply `patch` to an existing annotation.
    pub fn update(page: u32, id: AnnotationId, patch: AnnotationPatch) -> Self {
        Self {
            page,
            op: IntentOp::Update { id, patch },
        }
    }

    pub fn remove(page: u32, id: AnnotationId) -> Self {
        Self {
            page,
            op: IntentOp::Remove(id),
        }
    }
}

/// What is being edited through the overlay text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EditingKind {
    /// A text label's content.
    Text,
    /// An expanded note's body.
    NoteBody,
}

/// The annotation currently bound to the overlay text input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Editing {
    pub id: AnnotationId,
    pub kind: EditingKind,
}

/// Ephemeral pointer interaction. Never persisted.
#[derive(Debug, Clone, PartialEq, Default)]
pub enum Interaction {
    #[default]
    Idle,
    /// Accumulating a freehand stroke.
    Drawing { tool: DrawTool, points: Vec<Point> },
    /// Moving a position-bearing annotation.
    Dragging {
        id: AnnotationId,
        /// Pointer minus the annotation's position at grab time.
        offset: Vec2,
    },
}

/// Interaction state for the page currently on screen.
#[derive(Debug, Clone)]
pub struct AnnotationSurface {
    viewport: Viewport,
    config: SurfaceConfig,
    interaction: Interaction,
    pointer_down: bool,
    selected: Option<AnnotationId>,
    editing: Option<Editing>,
}

fn find(annotations: &[Annotation], id: AnnotationId) -> Option<&Annotation> {
    annotations.iter().find(|a| a.id() == id)
}

impl AnnotationSurface {
    /// Create a surface for `page` rendered into the client rect `container`.
    pub fn new(page: PageGeometry, container: Rect, config: SurfaceConfig) -> Self {
        Self {
            viewport: Viewport::new(page, container),
            config,
            interaction: Interaction::Idle,
            pointer_down: false,
            selected: None,
            editing: None,
        }
    }

    /// Geometry of the page being annotated.
    pub fn page(&self) -> PageGeometry {
        self.viewport.page
    }

    fn page_number(&self) -> u32 {
        self.viewport.page.page_number
    }

    /// Client-to-page mapping.
    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Hit-test and stroke tuning in effect.
    pub fn config(&self) -> &SurfaceConfig {
        &self.config
    }

    /// The container was resized or zoomed. Stored coordinates are untouched.
    pub fn resize(&mut self, container: Rect) {
        self.viewport.resize(container);
    }

    /// The selected annotation. Survives tool switches.
    pub fn selected(&self) -> Option<AnnotationId> {
        self.selected
    }

    /// The annotation bound to the overlay text input.
    pub fn editing(&self) -> Option<Editing> {
        self.editing
    }

    /// Current gesture state.
    pub fn interaction(&self) -> &Interaction {
        &self.interaction
    }

    /// Whether a stroke is being recorded.
    pub fn is_drawing(&self) -> bool {
        matches!(self.interaction, Interaction::Drawing { .. })
    }

    /// Whether an annotation is being moved.
    pub fn is_dragging(&self) -> bool {
        matches!(self.interaction, Interaction::Dragging { .. })
    }

    /// The stroke being drawn right now, for live rendering.
    pub fn in_progress(&self) -> Option<(DrawTool, &[Point])> {
        match &self.interaction {
            Interaction::Drawing { tool, points } => Some((*tool, points.as_slice())),
            _ => None,
        }
    }

    /// Topmost annotation under a client-space point.
    pub fn annotation_at(&self, client: Point, annotations: &[Annotation]) -> Option<AnnotationId> {
        let point = self.viewport.to_logical(client)?;
        hit_test(annotations, point, &self.config)
    }

    /// Select an annotation programmatically.
    pub fn select(&mut self, id: AnnotationId) {
        self.selected = Some(id);
    }

    /// Drop every reference to an annotation that no longer exists.
    pub fn forget(&mut self, id: AnnotationId) {
        if self.selected == Some(id) {
            self.selected = None;
        }
        if self.editing.is_some_and(|e| e.id == id) {
            self.editing = None;
        }
        if matches!(self.interaction, Interaction::Dragging { id: dragged, .. } if dragged == id) {
            self.interaction = Interaction::Idle;
        }
    }

    fn drop_stale_refs(&mut self, annotations: &[Annotation]) {
        if let Some(id) = self.selected {
            if find(annotations, id).is_none() {
                self.forget(id);
            }
        }
        if let Some(editing) = self.editing {
            if find(annotations, editing.id).is_none() {
                self.forget(editing.id);
            }
        }
    }

    /// Primary button pressed at a client-space point.
    ///
    /// Ignored entirely while the viewport has no area.
    pub fn pointer_down(
        &mut self,
        client: Point,
        style: &StyleContext,
        annotations: &[Annotation],
    ) -> Vec<AnnotationIntent> {
        let Some(point) = self.viewport.to_logical(client) else {
            log::debug!("pointer down ignored: viewport has no area");
            return Vec::new();
        };
        self.drop_stale_refs(annotations);
        // Pressing on the page blurs the overlay input.
        self.editing = None;
        self.interaction = Interaction::Idle;
        self.pointer_down = true;
        let page = self.page_number();

        match style.tool {
            ToolKind::Select => {
                self.selected = hit_test(annotations, point, &self.config);
                if let Some(id) = self.selected {
                    if let Some(position) = find(annotations, id).and_then(Annotation::position) {
                        self.interaction = Interaction::Dragging {
                            id,
                            offset: point - position,
                        };
                    }
                    log::debug!("selected {} on page {}", id, page);
                }
                Vec::new()
            }
            ToolKind::Pen | ToolKind::Highlighter => {
                if let Some(tool) = style.tool.draw_tool() {
                    self.interaction = Interaction::Drawing {
                        tool,
                        points: vec![point],
                    };
                }
                Vec::new()
            }
            ToolKind::Text => {
                let text = Text::new(point, style.color.clone(), style.font_size);
                self.editing = Some(Editing {
                    id: text.id(),
                    kind: EditingKind::Text,
                });
                log::debug!("text {} placed on page {}", text.id(), page);
                vec![AnnotationIntent::create(page, text)]
            }
            ToolKind::Note => self.note_down(point, style, annotations),
            ToolKind::Emoji => match &style.emoji {
                Some(glyph) => vec![AnnotationIntent::create(page, Emoji::new(point, glyph.clone()))],
                None => Vec::new(),
            },
            ToolKind::Sticker => match &style.sticker {
                Some(sticker) => vec![AnnotationIntent::create(
                    page,
                    Sticker::new(point, sticker.clone()),
                )],
                None => Vec::new(),
            },
            ToolKind::Eraser => match hit_test(annotations, point, &self.config) {
                Some(id) => {
                    self.forget(id);
                    log::debug!("erased {} on page {}", id, page);
                    vec![AnnotationIntent::remove(page, id)]
                }
                None => Vec::new(),
            },
        }
    }

    fn note_down(
        &mut self,
        point: Point,
        style: &StyleContext,
        annotations: &[Annotation],
    ) -> Vec<AnnotationIntent> {
        let page = self.page_number();
        let existing = hit_test(annotations, point, &self.config)
            .and_then(|id| find(annotations, id))
            .and_then(Annotation::as_note);

        if let Some(note) = existing {
            return match note_region(note, point, &self.config) {
                Some(NoteRegion::Header) => vec![AnnotationIntent::update(
                    page,
                    note.id(),
                    AnnotationPatch::expanded(!note.is_expanded),
                )],
                Some(NoteRegion::Body) => {
                    self.editing = Some(Editing {
                        id: note.id(),
                        kind: EditingKind::NoteBody,
                    });
                    Vec::new()
                }
                None => Vec::new(),
            };
        }

        let note = Note::new(point, style.color.clone());
        log::debug!("note {} placed on page {}", note.id(), page);
        vec![AnnotationIntent::create(page, note)]
    }

    /// Pointer moved. Only acts while a button is held.
    pub fn pointer_move(
        &mut self,
        client: Point,
        _style: &StyleContext,
        annotations: &[Annotation],
    ) -> Vec<AnnotationIntent> {
        if !self.pointer_down {
            return Vec::new();
        }
        let Some(point) = self.viewport.to_logical(client) else {
            return Vec::new();
        };
        let page = self.page_number();

        match &mut self.interaction {
            Interaction::Idle => Vec::new(),
            Interaction::Drawing { points, .. } => {
                points.push(point);
                log::trace!("stroke sample {} at ({:.1}, {:.1})", points.len(), point.x, point.y);
                Vec::new()
            }
            Interaction::Dragging { id, offset } => {
                let (id, offset) = (*id, *offset);
                if find(annotations, id).is_none() {
                    self.interaction = Interaction::Idle;
                    return Vec::new();
                }
                let position = point - offset;
                log::trace!("drag {} to ({:.1}, {:.1})", id, position.x, position.y);
                vec![AnnotationIntent::update(page, id, AnnotationPatch::position(position))]
            }
        }
    }

    /// Primary button released. Commits a stroke with at least two samples.
    ///
    /// If the viewport lost its area mid-gesture the stroke is dropped.
    pub fn pointer_up(
        &mut self,
        _client: Point,
        style: &StyleContext,
        _annotations: &[Annotation],
    ) -> Vec<AnnotationIntent> {
        if !self.viewport.has_area() {
            self.reset_transient();
            return Vec::new();
        }
        self.pointer_down = false;
        match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { tool, points } => self
                .commit_stroke(tool, points, style)
                .into_iter()
                .collect(),
            Interaction::Dragging { .. } | Interaction::Idle => Vec::new(),
        }
    }

    fn commit_stroke(
        &self,
        tool: DrawTool,
        points: Vec<Point>,
        style: &StyleContext,
    ) -> Option<AnnotationIntent> {
        let page = self.page_number();
        if points.len() < Drawing::MIN_POINTS {
            log::debug!("discarded {}-point stroke on page {}", points.len(), page);
            return None;
        }
        let (stroke_width, opacity) = match tool {
            DrawTool::Pen => (style.stroke_width, 1.0),
            DrawTool::Highlighter => (
                style.stroke_width * self.config.highlighter_width_multiplier,
                self.config.highlighter_opacity,
            ),
        };
        let drawing = Drawing::new(points, style.color.clone(), stroke_width, opacity, tool);
        log::debug!(
            "committed {:?} stroke {} ({} points) on page {}",
            tool,
            drawing.id(),
            drawing.len(),
            page
        );
        Some(AnnotationIntent::create(page, drawing))
    }

    /// Pointer left the capture area. Drops the stroke and drag.
    pub fn pointer_leave(&mut self) {
        self.reset_transient();
    }

    /// Surface lost focus. Drops the stroke and drag.
    pub fn blur(&mut self) {
        self.reset_transient();
    }

    /// Discard the stroke buffer and drag offset; keep selection.
    pub fn reset_transient(&mut self) {
        if let Interaction::Drawing { points, .. } = &self.interaction {
            log::debug!("dropped in-progress stroke ({} points)", points.len());
        }
        self.interaction = Interaction::Idle;
        self.pointer_down = false;
    }

    /// Annotation mode was switched off: drop everything ephemeral.
    pub fn deactivate(&mut self) {
        self.reset_transient();
        self.selected = None;
        self.editing = None;
    }

    /// Present another page.
    ///
    /// A stroke in progress on the old page is finalized first; the returned
    /// intents target the old page.
    pub fn set_page(&mut self, page: PageGeometry, style: &StyleContext) -> Vec<AnnotationIntent> {
        let finished = match std::mem::take(&mut self.interaction) {
            Interaction::Drawing { tool, points } => self.commit_stroke(tool, points, style),
            _ => None,
        };
        self.pointer_down = false;
        self.selected = None;
        self.editing = None;
        self.viewport.set_page(page);
        finished.into_iter().collect()
    }

    /// Replace the content of the annotation bound to the text input.
    pub fn edit_content(&mut self, content: &str, annotations: &[Annotation]) -> Vec<AnnotationIntent> {
        let Some(editing) = self.editing else {
            return Vec::new();
        };
        match find(annotations, editing.id).and_then(Annotation::content) {
            Some(current) if current == content => Vec::new(),
            Some(_) => vec![AnnotationIntent::update(
                self.page_number(),
                editing.id,
                AnnotationPatch::content(content),
            )],
            None => {
                self.forget(editing.id);
                Vec::new()
            }
        }
    }

    /// Enter pressed in the text input. Ends text editing unless Shift is held.
    ///
    /// Returns true if editing ended. Note bodies keep Enter as a newline.
    pub fn key_enter(&mut self, shift: bool) -> bool {
        match self.editing {
            Some(Editing {
                kind: EditingKind::Text,
                ..
            }) if !shift => {
                self.end_editing();
                true
            }
            _ => false,
        }
    }

    /// The text input lost focus. The (possibly empty) annotation stays.
    pub fn end_editing(&mut self) {
        if let Some(editing) = self.editing.take() {
            log::debug!("finished editing {}", editing.id);
        }
    }

    /// Start editing an existing text label.
    pub fn begin_text_edit(&mut self, id: AnnotationId, annotations: &[Annotation]) -> bool {
        match find(annotations, id) {
            Some(Annotation::Text(_)) => {
                self.editing = Some(Editing {
                    id,
                    kind: EditingKind::Text,
                });
                true
            }
            _ => false,
        }
    }

    /// Start editing a note's body. Only expanded notes can be edited.
    pub fn begin_note_edit(&mut self, id: AnnotationId, annotations: &[Annotation]) -> bool {
        match find(annotations, id) {
            Some(Annotation::Note(note)) if note.is_expanded => {
                self.editing = Some(Editing {
                    id,
                    kind: EditingKind::NoteBody,
                });
                true
            }
            _ => false,
        }
    }

    /// Flip a note between collapsed and expanded.
    pub fn toggle_note(&mut self, id: AnnotationId, annotations: &[Annotation]) -> Vec<AnnotationIntent> {
        let Some(note) = find(annotations, id).and_then(Annotation::as_note) else {
            return Vec::new();
        };
        if note.is_expanded
            && self.editing == Some(Editing {
                id,
                kind: EditingKind::NoteBody,
            })
        {
            self.editing = None;
        }
        vec![AnnotationIntent::update(
            self.page_number(),
            id,
            AnnotationPatch::expanded(!note.is_expanded),
        )]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::StickerId;

    const W: f64 = 800.0;
    const H: f64 = 1000.0;

    fn surface() -> AnnotationSurface {
        AnnotationSurface::new(
            PageGeometry::new(1, W, H),
            Rect::new(0.0, 0.0, W, H),
            SurfaceConfig::default(),
        )
    }

    fn pt(x: f64, y: f64) -> Point {
        Point::new(x, y)
    }

    /// Apply intents the way the page store would.
    fn apply(set: &mut Vec<Annotation>, intents: Vec<AnnotationIntent>) {
        for intent in intents {
            match intent.op {
                IntentOp::Create(a) => set.push(a),
                IntentOp::Update { id, patch } => {
                    if let Some(a) = set.iter_mut().find(|a| a.id() == id) {
                        a.apply(&patch);
                    }
                }
                IntentOp::Remove(id) => set.retain(|a| a.id() != id),
            }
        }
    }

    #[test]
    fn test_tap_does_not_create_drawing() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Pen);
        assert!(s.pointer_down(pt(10.0, 10.0), &style, &[]).is_empty());
        assert!(s.is_drawing());
        assert!(s.pointer_up(pt(10.0, 10.0), &style, &[]).is_empty());
        assert!(!s.is_drawing());
    }

    #[test]
    fn test_stroke_commits_recorded_samples() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Pen);
        s.pointer_down(pt(10.0, 10.0), &style, &[]);
        s.pointer_move(pt(20.0, 15.0), &style, &[]);
        s.pointer_move(pt(30.0, 25.0), &style, &[]);
        assert_eq!(s.in_progress().map(|(_, p)| p.len()), Some(3));

        let intents = s.pointer_up(pt(30.0, 25.0), &style, &[]);
        assert_eq!(intents.len(), 1);
        let IntentOp::Create(Annotation::Drawing(d)) = &intents[0].op else {
            panic!("expected a drawing");
        };
        assert_eq!(d.points, vec![pt(10.0, 10.0), pt(20.0, 15.0), pt(30.0, 25.0)]);
        assert_eq!(d.tool, DrawTool::Pen);
        assert_eq!(d.opacity, 1.0);
        assert_eq!(d.stroke_width, style.stroke_width);
        assert_eq!(intents[0].page, 1);
    }

    #[test]
    fn test_highlighter_styling() {
        let mut s = surface();
        let mut style = StyleContext::with_tool(ToolKind::Highlighter);
        style.stroke_width = 5.0;
        s.pointer_down(pt(0.0, 0.0), &style, &[]);
        s.pointer_move(pt(50.0, 0.0), &style, &[]);
        let intents = s.pointer_up(pt(50.0, 0.0), &style, &[]);

        let IntentOp::Create(Annotation::Drawing(d)) = &intents[0].op else {
            panic!("expected a drawing");
        };
        assert_eq!(d.tool, DrawTool::Highlighter);
        assert!((d.opacity - 0.35).abs() < 1e-9);
        assert_eq!(d.stroke_width, 20.0);
    }

    #[test]
    fn test_points_are_mapped_to_logical_space() {
        // Page rendered at half size, offset by (100, 50).
        let mut s = AnnotationSurface::new(
            PageGeometry::new(2, W, H),
            Rect::new(100.0, 50.0, 100.0 + W / 2.0, 50.0 + H / 2.0),
            SurfaceConfig::default(),
        );
        let style = StyleContext::with_tool(ToolKind::Pen);
        s.pointer_down(pt(100.0, 50.0), &style, &[]);
        s.pointer_move(pt(300.0, 300.0), &style, &[]);
        let intents = s.pointer_up(pt(300.0, 300.0), &style, &[]);
        let IntentOp::Create(Annotation::Drawing(d)) = &intents[0].op else {
            panic!("expected a drawing");
        };
        assert_eq!(d.points, vec![pt(0.0, 0.0), pt(400.0, 500.0)]);
        assert_eq!(intents[0].page, 2);
    }

    #[test]
    fn test_drag_preserves_offset() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Select);
        let emoji: Annotation = Emoji::new(pt(40.0, 40.0), "👍").into();
        let id = emoji.id();
        let mut set = vec![emoji];

        assert!(s.pointer_down(pt(50.0, 50.0), &style, &set).is_empty());
        assert_eq!(s.selected(), Some(id));
        assert!(s.is_dragging());

        let intents = s.pointer_move(pt(80.0, 80.0), &style, &set);
        assert_eq!(
            intents,
            vec![AnnotationIntent::update(1, id, AnnotationPatch::position(pt(70.0, 70.0)))]
        );
        apply(&mut set, intents);
        assert_eq!(set[0].position(), Some(pt(70.0, 70.0)));

        s.pointer_up(pt(80.0, 80.0), &style, &set);
        assert!(!s.is_dragging());
        assert_eq!(s.selected(), Some(id));
        // Moving without a button held does nothing.
        assert!(s.pointer_move(pt(200.0, 200.0), &style, &set).is_empty());
    }

    #[test]
    fn test_select_miss_clears_selection() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Select);
        let set: Vec<Annotation> = vec![Emoji::new(pt(40.0, 40.0), "👍").into()];
        s.pointer_down(pt(40.0, 40.0), &style, &set);
        s.pointer_up(pt(40.0, 40.0), &style, &set);
        assert!(s.selected().is_some());

        s.pointer_down(pt(600.0, 600.0), &style, &set);
        assert_eq!(s.selected(), None);
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_selecting_a_drawing_does_not_arm_drag() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Select);
        let set: Vec<Annotation> = vec![
            Drawing::new(vec![pt(0.0, 0.0), pt(100.0, 0.0)], "#000", 2.0, 1.0, DrawTool::Pen).into(),
        ];
        s.pointer_down(pt(50.0, 2.0), &style, &set);
        assert_eq!(s.selected(), Some(set[0].id()));
        assert!(s.pointer_move(pt(60.0, 30.0), &style, &set).is_empty());
    }

    #[test]
    fn test_eraser_on_empty_space_is_noop() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Eraser);
        let mut set: Vec<Annotation> = vec![Emoji::new(pt(40.0, 40.0), "👍").into()];
        let before = set.clone();

        let intents = s.pointer_down(pt(500.0, 500.0), &style, &set);
        assert!(intents.is_empty());
        apply(&mut set, intents);
        assert_eq!(set, before);
    }

    #[test]
    fn test_eraser_removes_topmost() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Eraser);
        let a: Annotation = Emoji::new(pt(40.0, 40.0), "👍").into();
        let b: Annotation = Emoji::new(pt(45.0, 45.0), "🔥").into();
        let (a_id, b_id) = (a.id(), b.id());
        let mut set = vec![a, b];
        s.select(b_id);

        let intents = s.pointer_down(pt(42.0, 42.0), &style, &set);
        assert_eq!(intents, vec![AnnotationIntent::remove(1, b_id)]);
        assert_eq!(s.selected(), None);
        apply(&mut set, intents);
        assert_eq!(set.len(), 1);
        assert_eq!(set[0].id(), a_id);
    }

    #[test]
    fn test_text_tool_creates_and_edits() {
        let mut s = surface();
        let mut style = StyleContext::with_tool(ToolKind::Text);
        style.font_size = 24.0;
        let mut set = Vec::new();

        let intents = s.pointer_down(pt(100.0, 120.0), &style, &set);
        apply(&mut set, intents);
        let Annotation::Text(text) = &set[0] else {
            panic!("expected text");
        };
        assert!(text.content.is_empty());
        assert_eq!(text.font_size, 24.0);
        assert_eq!(
            s.editing(),
            Some(Editing {
                id: text.id(),
                kind: EditingKind::Text
            })
        );

        let intents = s.edit_content("Hello", &set);
        apply(&mut set, intents);
        assert_eq!(set[0].content(), Some("Hello"));

        assert!(!s.key_enter(true));
        assert!(s.editing().is_some());
        assert!(s.key_enter(false));
        assert!(s.editing().is_none());
    }

    #[test]
    fn test_blur_keeps_empty_text() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Text);
        let mut set = Vec::new();
        let intents = s.pointer_down(pt(10.0, 10.0), &style, &set);
        apply(&mut set, intents);
        s.end_editing();
        assert_eq!(set.len(), 1);
        assert!(s.edit_content("late", &set).is_empty());
    }

    #[test]
    fn test_note_tool_flow() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Note);
        let mut set = Vec::new();

        let intents = s.pointer_down(pt(300.0, 300.0), &style, &set);
        apply(&mut set, intents);
        s.pointer_up(pt(300.0, 300.0), &style, &set);
        let id = set[0].id();
        assert!(!set[0].as_note().unwrap().is_expanded);

        // Clicking a collapsed note anywhere hits its header.
        let intents = s.pointer_down(pt(300.0, 350.0), &style, &set);
        assert_eq!(
            intents,
            vec![AnnotationIntent::update(1, id, AnnotationPatch::expanded(true))]
        );
        apply(&mut set, intents);
        assert_eq!(set.len(), 1);

        // Body click on the expanded note starts editing.
        assert!(s.pointer_down(pt(300.0, 350.0), &style, &set).is_empty());
        assert_eq!(s.editing().map(|e| e.kind), Some(EditingKind::NoteBody));
        assert!(!s.key_enter(false));

        let intents = s.edit_content("line one\nline two", &set);
        apply(&mut set, intents);
        assert_eq!(set[0].content(), Some("line one\nline two"));

        // Header click collapses again.
        let intents = s.toggle_note(id, &set);
        apply(&mut set, intents);
        assert!(!set[0].as_note().unwrap().is_expanded);
        assert!(!s.begin_note_edit(id, &set));
    }

    #[test]
    fn test_emoji_and_sticker_need_staged_choice() {
        let mut s = surface();
        let mut style = StyleContext::with_tool(ToolKind::Emoji);
        assert!(s.pointer_down(pt(10.0, 10.0), &style, &[]).is_empty());

        style.emoji = Some("⭐".into());
        let intents = s.pointer_down(pt(10.0, 10.0), &style, &[]);
        assert!(matches!(&intents[0].op, IntentOp::Create(Annotation::Emoji(e)) if e.emoji == "⭐"));

        style.tool = ToolKind::Sticker;
        assert!(s.pointer_down(pt(10.0, 10.0), &style, &[]).is_empty());
        style.sticker = Some(StickerId::new("idea"));
        let intents = s.pointer_down(pt(10.0, 10.0), &style, &[]);
        assert!(
            matches!(&intents[0].op, IntentOp::Create(Annotation::Sticker(st)) if st.sticker.as_str() == "idea")
        );
    }

    #[test]
    fn test_pointer_leave_discards_stroke_and_drag() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Pen);
        s.pointer_down(pt(0.0, 0.0), &style, &[]);
        s.pointer_move(pt(10.0, 10.0), &style, &[]);
        s.pointer_leave();
        assert!(!s.is_drawing());
        assert!(s.pointer_up(pt(10.0, 10.0), &style, &[]).is_empty());

        let select = StyleContext::with_tool(ToolKind::Select);
        let set: Vec<Annotation> = vec![Emoji::new(pt(40.0, 40.0), "👍").into()];
        s.pointer_down(pt(40.0, 40.0), &select, &set);
        s.blur();
        assert!(!s.is_dragging());
        assert!(s.pointer_move(pt(90.0, 90.0), &select, &set).is_empty());
        assert!(s.selected().is_some());
    }

    #[test]
    fn test_page_switch_finalizes_stroke_for_old_page() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Pen);
        s.pointer_down(pt(0.0, 0.0), &style, &[]);
        s.pointer_move(pt(10.0, 10.0), &style, &[]);

        let intents = s.set_page(PageGeometry::new(2, W, H), &style);
        assert_eq!(intents.len(), 1);
        assert_eq!(intents[0].page, 1);
        assert_eq!(s.page().page_number, 2);
        assert!(!s.is_drawing());
        // The release that follows is not a second commit.
        assert!(s.pointer_up(pt(10.0, 10.0), &style, &[]).is_empty());
    }

    #[test]
    fn test_drag_target_removed_mid_drag() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Select);
        let set: Vec<Annotation> = vec![Emoji::new(pt(40.0, 40.0), "👍").into()];
        s.pointer_down(pt(40.0, 40.0), &style, &set);
        assert!(s.pointer_move(pt(60.0, 60.0), &style, &[]).is_empty());
        assert!(!s.is_dragging());
    }

    #[test]
    fn test_deactivate_clears_everything() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Text);
        s.pointer_down(pt(10.0, 10.0), &style, &[]);
        s.select(AnnotationId::nil());
        s.deactivate();
        assert!(s.editing().is_none());
        assert!(s.selected().is_none());
        assert_eq!(s.interaction(), &Interaction::Idle);
    }

    #[test]
    fn test_zero_area_container_ignores_pointer_input() {
        let mut s = AnnotationSurface::new(PageGeometry::new(1, W, H), Rect::ZERO, SurfaceConfig::default());
        let pen = StyleContext::with_tool(ToolKind::Pen);
        assert!(s.pointer_down(pt(10.0, 10.0), &pen, &[]).is_empty());
        assert!(!s.is_drawing());
        assert!(s.pointer_move(pt(20.0, 20.0), &pen, &[]).is_empty());
        assert!(s.pointer_up(pt(20.0, 20.0), &pen, &[]).is_empty());

        let text = StyleContext::with_tool(ToolKind::Text);
        assert!(s.pointer_down(pt(10.0, 10.0), &text, &[]).is_empty());
        assert!(s.editing().is_none());

        let set: Vec<Annotation> = vec![Emoji::new(pt(0.0, 0.0), "👍").into()];
        assert_eq!(s.annotation_at(pt(0.0, 0.0), &set), None);
        let eraser = StyleContext::with_tool(ToolKind::Eraser);
        assert!(s.pointer_down(pt(0.0, 0.0), &eraser, &set).is_empty());
    }

    #[test]
    fn test_container_collapsing_mid_stroke_drops_it() {
        let mut s = surface();
        let style = StyleContext::with_tool(ToolKind::Pen);
        s.pointer_down(pt(10.0, 10.0), &style, &[]);
        s.pointer_move(pt(20.0, 20.0), &style, &[]);
        s.resize(Rect::new(5.0, 5.0, 5.0, 5.0));
        assert!(s.pointer_move(pt(30.0, 30.0), &style, &[]).is_empty());
        assert_eq!(s.in_progress().map(|(_, p)| p.len()), Some(2));
        assert!(s.pointer_up(pt(30.0, 30.0), &style, &[]).is_empty());
        assert!(!s.is_drawing());
    }
}

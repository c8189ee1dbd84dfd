//! Session glue between the controller, the surface, and the page store.

use crate::catalog::StickerId;
use crate::config::SurfaceConfig;
use crate::controller::{ClearScope, ControllerEvent, Panel, ToolController, ToolKind};
use crate::geometry::PageGeometry;
use crate::model::{Annotation, AnnotationId};
use crate::store::{FlushReport, Notice, PageBackend, PageStore, StorageResult};
use crate::surface::{AnnotationIntent, AnnotationSurface};
use kurbo::{Point, Rect};

/// One user's annotation session over a paginated document.
///
/// Host events go in; the store holds the result. Pointer events are
/// ignored while annotation mode is off.
#[derive(Debug, Clone)]
pub struct Annotator {
    controller: ToolController,
    surface: AnnotationSurface,
    store: PageStore,
}

impl Annotator {
    /// Start a session on `page`, rendered into the client rect `container`.
    pub fn new(page: PageGeometry, container: Rect, config: SurfaceConfig) -> Self {
        Self {
            controller: ToolController::new(),
            surface: AnnotationSurface::new(page, container, config),
            store: PageStore::new(),
        }
    }

    /// Start a session with annotations already loaded.
    pub fn with_store(mut self, store: PageStore) -> Self {
        self.store = store;
        self
    }

    /// Toolbar state: tool, style, open panel, mode.
    pub fn controller(&self) -> &ToolController {
        &self.controller
    }

    /// Pointer state for the page on screen.
    pub fn surface(&self) -> &AnnotationSurface {
        &self.surface
    }

    /// Annotations for every page seen so far.
    pub fn store(&self) -> &PageStore {
        &self.store
    }

    /// Number of the page currently presented.
    pub fn current_page(&self) -> u32 {
        self.surface.page().page_number
    }

    /// Annotations on the page currently presented.
    pub fn annotations(&self) -> &[Annotation] {
        self.store.annotations(self.current_page())
    }

    /// Topmost annotation under a client-space point on the current page.
    pub fn annotation_at(&self, client: Point) -> Option<AnnotationId> {
        self.surface.annotation_at(client, self.annotations())
    }

    fn apply(&mut self, intents: Vec<AnnotationIntent>) -> bool {
        intents
            .into_iter()
            .fold(false, |changed, intent| self.store.apply(intent) | changed)
    }

    // --- pointer input ---

    /// Primary button pressed. Returns true if the page changed.
    pub fn pointer_down(&mut self, client: Point) -> bool {
        if !self.controller.is_active() {
            return false;
        }
        let page = self.current_page();
        let intents =
            self.surface
                .pointer_down(client, self.controller.style(), self.store.annotations(page));
        self.apply(intents)
    }

    /// Pointer moved. Returns true if a drag moved something.
    pub fn pointer_move(&mut self, client: Point) -> bool {
        if !self.controller.is_active() {
            return false;
        }
        let page = self.current_page();
        let intents =
            self.surface
                .pointer_move(client, self.controller.style(), self.store.annotations(page));
        self.apply(intents)
    }

    /// Primary button released. Returns true if a stroke was committed.
    pub fn pointer_up(&mut self, client: Point) -> bool {
        if !self.controller.is_active() {
            return false;
        }
        let page = self.current_page();
        let intents =
            self.surface
                .pointer_up(client, self.controller.style(), self.store.annotations(page));
        self.apply(intents)
    }

    pub fn pointer_leave(&mut self) {
        self.surface.pointer_leave();
    }

    pub fn blur(&mut self) {
        self.surface.blur();
    }

    // --- overlay text input ---

    /// New content from the overlay text input.
    pub fn input_text(&mut self, content: &str) -> bool {
        let page = self.current_page();
        let intents = self.surface.edit_content(content, self.store.annotations(page));
        self.apply(intents)
    }

    pub fn key_enter(&mut self, shift: bool) -> bool {
        self.surface.key_enter(shift)
    }

    pub fn end_editing(&mut self) {
        self.surface.end_editing();
    }

    /// Expand or collapse a note on the current page.
    pub fn toggle_note(&mut self, id: AnnotationId) -> bool {
        let page = self.current_page();
        let intents = self.surface.toggle_note(id, self.store.annotations(page));
        self.apply(intents)
    }

    pub fn begin_note_edit(&mut self, id: AnnotationId) -> bool {
        let page = self.current_page();
        self.surface.begin_note_edit(id, self.store.annotations(page))
    }

    pub fn begin_text_edit(&mut self, id: AnnotationId) -> bool {
        let page = self.current_page();
        self.surface.begin_text_edit(id, self.store.annotations(page))
    }

    // --- viewer ---

    /// The page container moved or changed size.
    pub fn resize(&mut self, container: Rect) {
        self.surface.resize(container);
    }

    /// Present another page. A stroke in progress lands on the old page.
    pub fn set_page(&mut self, page: PageGeometry) -> bool {
        let intents = self.surface.set_page(page, self.controller.style());
        log::debug!("presenting page {}", page.page_number);
        self.apply(intents)
    }

    // --- toolbar ---

    pub fn set_tool(&mut self, tool: ToolKind) {
        if let Some(event) = self.controller.set_tool(tool) {
            self.handle(event);
        }
    }

    pub fn set_color(&mut self, color: &str) {
        self.controller.set_color(color);
    }

    pub fn set_stroke_width(&mut self, width: f64) {
        self.controller.set_stroke_width(width);
    }

    pub fn set_font_size(&mut self, size: f64) {
        self.controller.set_font_size(size);
    }

    pub fn choose_emoji(&mut self, emoji: &str) {
        self.controller.choose_emoji(emoji);
    }

    pub fn choose_sticker(&mut self, sticker: StickerId) {
        self.controller.choose_sticker(sticker);
    }

    pub fn toggle_panel(&mut self, panel: Panel) {
        self.controller.toggle_panel(panel);
    }

    /// Close whatever toolbar panel is open.
    pub fn close_panel(&mut self) {
        self.controller.close_panel();
    }

    /// Turning the mode off drops selection, editing and any stroke.
    pub fn set_annotation_mode(&mut self, active: bool) {
        if let Some(event) = self.controller.set_annotation_mode(active) {
            self.handle(event);
        }
    }

    /// The toolbar's mode button.
    pub fn toggle_annotation_mode(&mut self) {
        if let Some(event) = self.controller.toggle_annotation_mode() {
            self.handle(event);
        }
    }

    /// Remove every annotation on the current page.
    pub fn clear_page(&mut self) -> usize {
        let page = self.current_page();
        let event = self.controller.request_clear_page(page);
        self.handle(event)
    }

    /// Remove every annotation on every page.
    pub fn clear_all(&mut self) -> usize {
        let event = self.controller.request_clear_all();
        self.handle(event)
    }

    /// React to a controller event. Returns how many annotations a clear removed.
    pub fn handle(&mut self, event: ControllerEvent) -> usize {
        match event {
            ControllerEvent::ToolChanged { .. } => {
                self.surface.reset_transient();
                0
            }
            ControllerEvent::ModeChanged { active } => {
                if !active {
                    self.surface.deactivate();
                }
                0
            }
            ControllerEvent::ClearRequested(scope) => {
                let removed = match scope {
                    ClearScope::Page(page) => {
                        if page == self.current_page() {
                            self.surface.deactivate();
                        }
                        self.store.clear_page(page)
                    }
                    ClearScope::All => {
                        self.surface.deactivate();
                        self.store.clear_all()
                    }
                };
                if removed > 0 {
                    self.store
                        .push_notice(Notice::info(format!("Removed {removed} annotations")));
                }
                removed
            }
        }
    }

    // --- persistence ---

    /// Save dirty pages and delete cleared ones.
    pub async fn flush(&mut self, backend: &dyn PageBackend) -> FlushReport {
        self.store.flush(backend).await
    }

    pub async fn load_page(&mut self, backend: &dyn PageBackend, page: u32) -> StorageResult<()> {
        self.store.load_page(backend, page).await
    }

    /// Drain pending user-facing notices.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        self.store.take_notices()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::DrawTool;
    use crate::store::{MemoryBackend, NoticeLevel};

    fn annotator() -> Annotator {
        let mut a = Annotator::new(
            PageGeometry::new(1, 800.0, 1000.0),
            Rect::new(0.0, 0.0, 400.0, 500.0),
            SurfaceConfig::default(),
        );
        a.set_annotation_mode(true);
        a
    }

    fn stroke(a: &mut Annotator, from: (f64, f64), to: (f64, f64)) {
        a.pointer_down(Point::new(from.0, from.1));
        a.pointer_move(Point::new(to.0, to.1));
        a.pointer_up(Point::new(to.0, to.1));
    }

    #[test]
    fn test_pointer_ignored_when_mode_off() {
        let mut a = annotator();
        a.set_tool(ToolKind::Pen);
        a.set_annotation_mode(false);
        stroke(&mut a, (10.0, 10.0), (50.0, 50.0));
        assert!(a.annotations().is_empty());
    }

    #[test]
    fn test_stroke_lands_in_logical_space() {
        let mut a = annotator();
        a.set_tool(ToolKind::Pen);
        stroke(&mut a, (10.0, 10.0), (200.0, 250.0));

        let drawing = a.annotations()[0].as_drawing().unwrap();
        assert_eq!(drawing.points, vec![Point::new(20.0, 20.0), Point::new(400.0, 500.0)]);
        assert_eq!(drawing.tool, DrawTool::Pen);
    }

    #[test]
    fn test_clear_scoping_across_pages() {
        let mut a = annotator();
        a.set_tool(ToolKind::Pen);
        stroke(&mut a, (10.0, 10.0), (50.0, 50.0));
        a.set_page(PageGeometry::new(2, 800.0, 1000.0));
        stroke(&mut a, (10.0, 10.0), (50.0, 50.0));
        stroke(&mut a, (60.0, 60.0), (90.0, 90.0));

        assert_eq!(a.clear_page(), 2);
        assert!(a.store().annotations(2).is_empty());
        assert_eq!(a.store().annotations(1).len(), 1);

        let notices = a.take_notices();
        assert_eq!(notices[0].level, NoticeLevel::Info);

        a.set_page(PageGeometry::new(1, 800.0, 1000.0));
        assert_eq!(a.clear_all(), 1);
        assert!(a.store().is_empty());
    }

    #[test]
    fn test_tool_switch_keeps_selection() {
        let mut a = annotator();
        a.set_tool(ToolKind::Emoji);
        a.choose_emoji("🔥");
        a.pointer_down(Point::new(100.0, 100.0));
        a.pointer_up(Point::new(100.0, 100.0));
        let id = a.annotations()[0].id();

        a.set_tool(ToolKind::Select);
        a.pointer_down(Point::new(100.0, 100.0));
        assert_eq!(a.surface().selected(), Some(id));
        assert!(a.surface().is_dragging());

        a.set_tool(ToolKind::Pen);
        assert_eq!(a.surface().selected(), Some(id));
        assert!(!a.surface().is_dragging());

        a.set_annotation_mode(false);
        assert_eq!(a.surface().selected(), None);
    }

    #[test]
    fn test_erase_selected_then_drag_is_noop() {
        let mut a = annotator();
        a.set_tool(ToolKind::Emoji);
        a.choose_emoji("⭐");
        a.pointer_down(Point::new(100.0, 100.0));
        a.pointer_up(Point::new(100.0, 100.0));

        a.set_tool(ToolKind::Eraser);
        assert!(a.pointer_down(Point::new(100.0, 100.0)));
        a.pointer_up(Point::new(100.0, 100.0));
        assert!(a.annotations().is_empty());

        a.set_tool(ToolKind::Select);
        assert!(!a.pointer_down(Point::new(100.0, 100.0)));
        assert!(!a.pointer_move(Point::new(150.0, 150.0)));
    }

    #[test]
    fn test_text_entry_roundtrip() {
        let mut a = annotator();
        a.set_tool(ToolKind::Text);
        a.set_font_size(20.0);
        a.pointer_down(Point::new(50.0, 50.0));
        a.pointer_up(Point::new(50.0, 50.0));
        assert!(a.input_text("Check this"));
        assert!(a.key_enter(false));
        assert!(!a.input_text("ignored"));

        let id = a.annotations()[0].id();
        assert_eq!(a.annotations()[0].content(), Some("Check this"));
        assert!(a.begin_text_edit(id));
    }

    #[test]
    fn test_flush_and_reload() {
        let backend = MemoryBackend::new();
        let mut a = annotator();
        a.set_tool(ToolKind::Note);
        a.pointer_down(Point::new(200.0, 200.0));
        a.pointer_up(Point::new(200.0, 200.0));
        let id = a.annotations()[0].id();
        assert!(a.toggle_note(id));
        assert!(a.begin_note_edit(id));
        assert!(a.input_text("Ask about §3"));

        let report = pollster::block_on(a.flush(&backend));
        assert_eq!(report.failed, 0);

        let mut b = annotator();
        pollster::block_on(b.load_page(&backend, 1)).unwrap();
        assert_eq!(b.annotations(), a.annotations());
    }

    #[test]
    fn test_zero_size_container_creates_nothing() {
        let mut a = Annotator::new(
            PageGeometry::new(1, 800.0, 1000.0),
            Rect::ZERO,
            SurfaceConfig::default(),
        );
        a.set_annotation_mode(true);
        a.set_tool(ToolKind::Pen);
        stroke(&mut a, (10.0, 10.0), (50.0, 50.0));
        a.set_tool(ToolKind::Text);
        assert!(!a.pointer_down(Point::new(10.0, 10.0)));
        assert!(a.annotations().is_empty());

        a.resize(Rect::new(0.0, 0.0, 400.0, 500.0));
        assert!(a.pointer_down(Point::new(10.0, 10.0)));
        assert_eq!(a.annotations()[0].position(), Some(Point::new(20.0, 20.0)));
    }
}

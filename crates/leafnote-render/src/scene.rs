//! Back-to-front display list for one page.

use crate::color::resolve_color;
use crate::renderer::{RenderError, RenderResult};
use kurbo::{BezPath, Rect, Size};
use leafnote_core::catalog::StickerCatalog;
use leafnote_core::config::SurfaceConfig;
use leafnote_core::controller::StyleContext;
use leafnote_core::geometry::PageGeometry;
use leafnote_core::hit::{hit_box, note_header_rect, selection_bounds};
use leafnote_core::model::{Annotation, AnnotationId, DrawTool, smooth_path};
use leafnote_core::session::Annotator;
use leafnote_core::surface::{AnnotationSurface, EditingKind};
use peniko::Color;

/// Selection outline color (blue).
pub const SELECTION_COLOR: Color = Color::from_rgba8(59, 130, 246, 255);

/// One drawable item, in logical page coordinates.
#[derive(Debug, Clone)]
pub enum SceneItem {
    /// A smoothed freehand stroke. `id` is `None` for the live stroke.
    Stroke {
        id: Option<AnnotationId>,
        path: BezPath,
        color: Color,
        width: f64,
        opacity: f64,
    },
    TextLabel {
        id: AnnotationId,
        /// Layout box; the label is centered in it.
        rect: Rect,
        content: String,
        color: Color,
        font_size: f64,
        editing: bool,
    },
    /// A note card. Collapsed notes hide their body text.
    NoteCard {
        id: AnnotationId,
        rect: Rect,
        header: Rect,
        color: Color,
        /// Body text, present only while expanded.
        content: Option<String>,
        editing: bool,
    },
    Glyph {
        id: AnnotationId,
        emoji: String,
        /// Layout box; the glyph is centered in it.
        rect: Rect,
        size: f64,
    },
    StickerBadge {
        id: AnnotationId,
        rect: Rect,
        label: String,
        background: Color,
        foreground: Color,
    },
    SelectionOutline {
        rect: Rect,
        color: Color,
    },
}

impl SceneItem {
    /// Annotation the item draws. `None` for the live stroke and the outline.
    pub fn id(&self) -> Option<AnnotationId> {
        match self {
            SceneItem::Stroke { id, .. } => *id,
            SceneItem::TextLabel { id, .. }
            | SceneItem::NoteCard { id, .. }
            | SceneItem::Glyph { id, .. }
            | SceneItem::StickerBadge { id, .. } => Some(*id),
            SceneItem::SelectionOutline { .. } => None,
        }
    }

    /// Box the item occupies on the page. Strokes have none.
    pub fn rect(&self) -> Option<Rect> {
        match self {
            SceneItem::Stroke { .. } => None,
            SceneItem::TextLabel { rect, .. }
            | SceneItem::NoteCard { rect, .. }
            | SceneItem::Glyph { rect, .. }
            | SceneItem::StickerBadge { rect, .. }
            | SceneItem::SelectionOutline { rect, .. } => Some(*rect),
        }
    }
}

/// Display list for a single page.
#[derive(Debug, Clone)]
pub struct Scene {
    /// Logical page size (the SVG viewBox).
    pub size: Size,
    /// Items in paint order, back to front.
    pub items: Vec<SceneItem>,
}

impl Scene {
    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }
}

/// Everything needed to build one page's scene.
pub struct RenderContext<'a> {
    pub page: PageGeometry,
    /// The page's annotations in render order.
    pub annotations: &'a [Annotation],
    pub catalog: &'a dyn StickerCatalog,
    pub config: &'a SurfaceConfig,
    /// Live surface state (selection, editing, stroke in progress).
    pub surface: Option<&'a AnnotationSurface>,
    /// Style for the live stroke.
    pub style: Option<&'a StyleContext>,
    pub selection_color: Color,
}

impl<'a> RenderContext<'a> {
    /// Context for committed annotations only.
    pub fn new(
        page: PageGeometry,
        annotations: &'a [Annotation],
        catalog: &'a dyn StickerCatalog,
        config: &'a SurfaceConfig,
    ) -> Self {
        Self {
            page,
            annotations,
            catalog,
            config,
            surface: None,
            style: None,
            selection_color: SELECTION_COLOR,
        }
    }

    /// Context for the page an annotator is presenting, including live state.
    pub fn for_session(annotator: &'a Annotator, catalog: &'a dyn StickerCatalog) -> Self {
        let surface = annotator.surface();
        Self {
            page: surface.page(),
            annotations: annotator.annotations(),
            catalog,
            config: surface.config(),
            surface: Some(surface),
            style: Some(annotator.controller().style()),
            selection_color: SELECTION_COLOR,
        }
    }
}

/// Builds [`Scene`]s from annotation sets.
#[derive(Debug, Default)]
pub struct SceneBuilder;

impl SceneBuilder {
    pub fn new() -> Self {
        Self
    }

    /// Committed annotations in order, then the live stroke, then the
    /// selection outline.
    pub fn build(&self, ctx: &RenderContext) -> RenderResult<Scene> {
        if !ctx.page.is_valid() {
            return Err(RenderError::InvalidPage {
                page: ctx.page.page_number,
                width: ctx.page.width,
                height: ctx.page.height,
            });
        }

        let editing = ctx.surface.and_then(|s| s.editing());
        let mut items = Vec::with_capacity(ctx.annotations.len() + 2);

        for annotation in ctx.annotations {
            let is_editing = |kind: EditingKind| {
                editing.is_some_and(|e| e.id == annotation.id() && e.kind == kind)
            };
            // Position-bearing items are laid out in their hit box.
            let layout = || hit_box(annotation, ctx.config).unwrap_or(Rect::ZERO);
            match annotation {
                Annotation::Drawing(d) => {
                    if d.len() < 2 {
                        log::warn!("skipping drawing {} with {} points", d.id(), d.len());
                        continue;
                    }
                    items.push(SceneItem::Stroke {
                        id: Some(d.id()),
                        path: d.to_path(),
                        color: resolve_color(&d.color),
                        width: d.stroke_width,
                        opacity: d.opacity,
                    });
                }
                Annotation::Text(t) => items.push(SceneItem::TextLabel {
                    id: t.id(),
                    rect: layout(),
                    content: t.content.clone(),
                    color: resolve_color(&t.color),
                    font_size: t.font_size,
                    editing: is_editing(EditingKind::Text),
                }),
                Annotation::Note(n) => {
                    items.push(SceneItem::NoteCard {
                        id: n.id(),
                        rect: layout(),
                        header: note_header_rect(n, ctx.config),
                        color: resolve_color(&n.color),
                        content: n.is_expanded.then(|| n.content.clone()),
                        editing: is_editing(EditingKind::NoteBody),
                    });
                }
                Annotation::Emoji(e) => items.push(SceneItem::Glyph {
                    id: e.id(),
                    emoji: e.emoji.clone(),
                    rect: layout(),
                    size: e.size,
                }),
                Annotation::Sticker(s) => {
                    let info = ctx.catalog.resolve(&s.sticker);
                    items.push(SceneItem::StickerBadge {
                        id: s.id(),
                        rect: layout(),
                        label: info.label,
                        background: resolve_color(&info.background_color),
                        foreground: resolve_color(&info.text_color),
                    });
                }
            }
        }

        if let (Some(surface), Some(style)) = (ctx.surface, ctx.style) {
            if let Some((tool, points)) = surface.in_progress() {
                if points.len() >= 2 {
                    let (width, opacity) = match tool {
                        DrawTool::Pen => (style.stroke_width, 1.0),
                        DrawTool::Highlighter => (
                            style.stroke_width * ctx.config.highlighter_width_multiplier,
                            ctx.config.highlighter_opacity,
                        ),
                    };
                    items.push(SceneItem::Stroke {
                        id: None,
                        path: smooth_path(points),
                        color: resolve_color(&style.color),
                        width,
                        opacity,
                    });
                }
            }
        }

        let selected = ctx
            .surface
            .and_then(AnnotationSurface::selected)
            .and_then(|id| ctx.annotations.iter().find(|a| a.id() == id));
        if let Some(annotation) = selected {
            items.push(SceneItem::SelectionOutline {
                rect: selection_bounds(annotation, ctx.config),
                color: ctx.selection_color,
            });
        }

        Ok(Scene {
            size: ctx.page.size(),
            items,
        })
    }
}

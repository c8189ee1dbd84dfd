//! Event scripts: a recorded annotation session as JSON.

use anyhow::{Context, Result, bail};
use kurbo::{Point, Rect};
use leafnote_core::catalog::StickerId;
use leafnote_core::config::SurfaceConfig;
use leafnote_core::controller::{Panel, ToolKind};
use leafnote_core::geometry::PageGeometry;
use leafnote_core::session::Annotator;
use serde::{Deserialize, Serialize};

/// Where the page is rendered on screen, in client pixels.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Container {
    pub left: f64,
    pub top: f64,
    pub width: f64,
    pub height: f64,
}

impl Container {
    pub fn rect(&self) -> Rect {
        Rect::new(self.left, self.top, self.left + self.width, self.top + self.height)
    }
}

/// One host event. Pointer coordinates are client pixels.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "event", rename_all = "camelCase")]
pub enum ReplayEvent {
    PointerDown { x: f64, y: f64 },
    PointerMove { x: f64, y: f64 },
    PointerUp { x: f64, y: f64 },
    PointerLeave,
    Blur,
    Mode { active: bool },
    ToggleMode,
    Tool { tool: ToolKind },
    Color { color: String },
    StrokeWidth { width: f64 },
    FontSize { size: f64 },
    Emoji { emoji: String },
    Sticker { sticker: StickerId },
    #[serde(rename = "panel")]
    TogglePanel { panel: Panel },
    ClosePanel,
    Page { page: u32 },
    Resize(Container),
    Input { text: String },
    Enter {
        #[serde(default)]
        shift: bool,
    },
    EndEditing,
    /// Toggle the note under a client point.
    ToggleNote { x: f64, y: f64 },
    ClearPage,
    ClearAll,
}

/// A complete replay script.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReplayScript {
    /// Page geometries. The first one is presented initially.
    pub pages: Vec<PageGeometry>,
    pub container: Container,
    #[serde(default)]
    pub events: Vec<ReplayEvent>,
}

impl ReplayScript {
    pub fn from_json(json: &str) -> Result<Self> {
        let script: Self = serde_json::from_str(json).context("failed to parse replay script")?;
        if script.pages.is_empty() {
            bail!("replay script declares no pages");
        }
        Ok(script)
    }

    pub fn page(&self, number: u32) -> Option<PageGeometry> {
        self.pages.iter().copied().find(|p| p.page_number == number)
    }

    /// Build an annotator for the first page and feed it every event.
    pub fn replay(&self, config: SurfaceConfig) -> Result<Annotator> {
        let Some(first) = self.pages.first().copied() else {
            bail!("replay script declares no pages");
        };
        let mut annotator = Annotator::new(first, self.container.rect(), config);
        for (index, event) in self.events.iter().enumerate() {
            self.dispatch(&mut annotator, event)
                .with_context(|| format!("event #{index} ({event:?})"))?;
        }
        Ok(annotator)
    }

    fn dispatch(&self, annotator: &mut Annotator, event: &ReplayEvent) -> Result<()> {
        log::trace!("replay {:?}", event);
        match event {
            ReplayEvent::PointerDown { x, y } => {
                annotator.pointer_down(Point::new(*x, *y));
            }
            ReplayEvent::PointerMove { x, y } => {
                annotator.pointer_move(Point::new(*x, *y));
            }
            ReplayEvent::PointerUp { x, y } => {
                annotator.pointer_up(Point::new(*x, *y));
            }
            ReplayEvent::PointerLeave => annotator.pointer_leave(),
            ReplayEvent::Blur => annotator.blur(),
            ReplayEvent::Mode { active } => annotator.set_annotation_mode(*active),
            ReplayEvent::ToggleMode => annotator.toggle_annotation_mode(),
            ReplayEvent::Tool { tool } => annotator.set_tool(*tool),
            ReplayEvent::Color { color } => annotator.set_color(color),
            ReplayEvent::StrokeWidth { width } => annotator.set_stroke_width(*width),
            ReplayEvent::FontSize { size } => annotator.set_font_size(*size),
            ReplayEvent::Emoji { emoji } => annotator.choose_emoji(emoji),
            ReplayEvent::Sticker { sticker } => annotator.choose_sticker(sticker.clone()),
            ReplayEvent::TogglePanel { panel } => annotator.toggle_panel(*panel),
            ReplayEvent::ClosePanel => annotator.close_panel(),
            ReplayEvent::Page { page } => {
                let geometry = self
                    .page(*page)
                    .with_context(|| format!("page {page} is not declared in the script"))?;
                annotator.set_page(geometry);
            }
            ReplayEvent::Resize(container) => annotator.resize(container.rect()),
            ReplayEvent::Input { text } => {
                annotator.input_text(text);
            }
            ReplayEvent::Enter { shift } => {
                annotator.key_enter(*shift);
            }
            ReplayEvent::EndEditing => annotator.end_editing(),
            ReplayEvent::ToggleNote { x, y } => {
                if let Some(id) = annotator.annotation_at(Point::new(*x, *y)) {
                    annotator.toggle_note(id);
                }
            }
            ReplayEvent::ClearPage => {
                annotator.clear_page();
            }
            ReplayEvent::ClearAll => {
                annotator.clear_all();
            }
        }
        Ok(())
    }
}

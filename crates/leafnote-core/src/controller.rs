//! Tool and style state for the annotation toolbar.
//!
//! The controller knows nothing about geometry. It holds the active tool and
//! style, decides which auxiliary pickers are relevant, and reports changes
//! as [`ControllerEvent`]s for the session to act on.

use crate::catalog::StickerId;
use crate::model::DrawTool;
use serde::{Deserialize, Serialize};

/// Minimum stroke width.
pub const MIN_STROKE_WIDTH: f64 = 1.0;
/// Maximum stroke width.
pub const MAX_STROKE_WIDTH: f64 = 20.0;
/// Minimum font size.
pub const MIN_FONT_SIZE: f64 = 10.0;
/// Maximum font size.
pub const MAX_FONT_SIZE: f64 = 48.0;

/// Default stroke width.
pub const DEFAULT_STROKE_WIDTH: f64 = 3.0;
/// Default font size.
pub const DEFAULT_FONT_SIZE: f64 = 16.0;
/// Default ink color.
pub const DEFAULT_COLOR: &str = "#ef4444";

/// Swatches offered by the color picker.
pub const DEFAULT_COLORS: &[&str] = &[
    "#ef4444", "#f97316", "#eab308", "#22c55e", "#3b82f6", "#8b5cf6", "#ec4899", "#000000",
];

/// Available annotation tools.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ToolKind {
    #[default]
    Select,
    Pen,
    Highlighter,
    Text,
    Note,
    Emoji,
    Sticker,
    Eraser,
}

impl ToolKind {
    /// The drawing tool this maps to, for freehand tools.
    pub fn draw_tool(&self) -> Option<DrawTool> {
        match self {
            ToolKind::Pen => Some(DrawTool::Pen),
            ToolKind::Highlighter => Some(DrawTool::Highlighter),
            _ => None,
        }
    }

    /// Tools that draw or write in the current color.
    pub fn shows_color_picker(&self) -> bool {
        matches!(
            self,
            ToolKind::Pen | ToolKind::Highlighter | ToolKind::Text | ToolKind::Note
        )
    }

    pub fn shows_stroke_width(&self) -> bool {
        matches!(self, ToolKind::Pen | ToolKind::Highlighter)
    }

    pub fn shows_font_size(&self) -> bool {
        matches!(self, ToolKind::Text)
    }

    /// Picker panel that opens when this tool is chosen.
    pub fn picker(&self) -> Option<Panel> {
        match self {
            ToolKind::Emoji => Some(Panel::EmojiPicker),
            ToolKind::Sticker => Some(Panel::StickerPicker),
            _ => None,
        }
    }
}

/// Style context handed to the surface with every event.
///
/// Constructed directly in tests; the surface never reads global state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StyleContext {
    pub tool: ToolKind,
    pub color: String,
    pub stroke_width: f64,
    pub font_size: f64,
    /// Staged emoji for the next emoji placement.
    pub emoji: Option<String>,
    /// Staged sticker for the next sticker placement.
    pub sticker: Option<StickerId>,
}

impl Default for StyleContext {
    fn default() -> Self {
        Self {
            tool: ToolKind::default(),
            color: DEFAULT_COLOR.to_string(),
            stroke_width: DEFAULT_STROKE_WIDTH,
            font_size: DEFAULT_FONT_SIZE,
            emoji: None,
            sticker: None,
        }
    }
}

impl StyleContext {
    /// Default style with a specific tool.
    pub fn with_tool(tool: ToolKind) -> Self {
        Self {
            tool,
            ..Self::default()
        }
    }
}

/// Auxiliary panels hanging off the toolbar.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Panel {
    EmojiPicker,
    StickerPicker,
    ClearMenu,
}

/// Target of a bulk delete.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ClearScope {
    Page(u32),
    All,
}

/// Something the rest of the session must react to.
#[derive(Debug, Clone, PartialEq)]
pub enum ControllerEvent {
    ToolChanged { from: ToolKind, to: ToolKind },
    ModeChanged { active: bool },
    ClearRequested(ClearScope),
}

/// Holds the active tool, style, staged glyphs, and open panel.
#[derive(Debug, Clone, Default)]
pub struct ToolController {
    style: StyleContext,
    annotation_mode: bool,
    open_panel: Option<Panel>,
}

impl ToolController {
    /// Select tool, default style, annotation mode off.
    pub fn new() -> Self {
        Self::default()
    }

    /// Current style, as passed to the surface.
    pub fn style(&self) -> &StyleContext {
        &self.style
    }

    /// The active tool.
    pub fn tool(&self) -> ToolKind {
        self.style.tool
    }

    /// Whether annotation mode is on.
    pub fn is_active(&self) -> bool {
        self.annotation_mode
    }

    /// The picker or menu currently shown, if any.
    pub fn open_panel(&self) -> Option<Panel> {
        self.open_panel
    }

    /// Switch tools. Returns an event only when the tool actually changed.
    ///
    /// Picking the emoji or sticker tool opens its picker; any other tool
    /// closes an open picker.
    pub fn set_tool(&mut self, tool: ToolKind) -> Option<ControllerEvent> {
        let from = self.style.tool;
        match tool.picker() {
            Some(panel) => self.open_panel = Some(panel),
            None if matches!(
                self.open_panel,
                Some(Panel::EmojiPicker | Panel::StickerPicker)
            ) =>
            {
                self.open_panel = None
            }
            None => {}
        }
        if from == tool {
            return None;
        }
        log::debug!("tool changed: {:?} -> {:?}", from, tool);
        self.style.tool = tool;
        Some(ControllerEvent::ToolChanged { from, to: tool })
    }

    /// Set the ink color. Blank strings are ignored.
    pub fn set_color(&mut self, color: impl Into<String>) {
        let color = color.into();
        let trimmed = color.trim();
        if trimmed.is_empty() {
            return;
        }
        self.style.color = trimmed.to_string();
    }

    /// Set the stroke width, clamped to the supported range.
    pub fn set_stroke_width(&mut self, width: f64) {
        if width.is_nan() {
            return;
        }
        self.style.stroke_width = width.clamp(MIN_STROKE_WIDTH, MAX_STROKE_WIDTH);
    }

    /// Set the font size, clamped to the supported range.
    pub fn set_font_size(&mut self, size: f64) {
        if size.is_nan() {
            return;
        }
        self.style.font_size = size.clamp(MIN_FONT_SIZE, MAX_FONT_SIZE);
    }

    /// Stage an emoji for the next placement and close the picker.
    pub fn choose_emoji(&mut self, emoji: impl Into<String>) {
        let emoji = emoji.into();
        if emoji.is_empty() {
            return;
        }
        self.style.emoji = Some(emoji);
        if self.open_panel == Some(Panel::EmojiPicker) {
            self.open_panel = None;
        }
    }

    /// Stage a sticker for the next placement and close the picker.
    pub fn choose_sticker(&mut self, sticker: StickerId) {
        self.style.sticker = Some(sticker);
        if self.open_panel == Some(Panel::StickerPicker) {
            self.open_panel = None;
        }
    }

    /// Open a panel, replacing any other.
    pub fn show_panel(&mut self, panel: Panel) {
        self.open_panel = Some(panel);
    }

    /// Close whatever panel is open.
    pub fn close_panel(&mut self) {
        self.open_panel = None;
    }

    /// Open `panel`, or close it if it is already open.
    pub fn toggle_panel(&mut self, panel: Panel) {
        if self.open_panel == Some(panel) {
            self.open_panel = None;
        } else {
            self.open_panel = Some(panel);
        }
    }

    /// Turn annotation mode on or off. Turning it off closes any panel.
    pub fn set_annotation_mode(&mut self, active: bool) -> Option<ControllerEvent> {
        if self.annotation_mode == active {
            return None;
        }
        self.annotation_mode = active;
        if !active {
            self.open_panel = None;
        }
        log::debug!("annotation mode {}", if active { "on" } else { "off" });
        Some(ControllerEvent::ModeChanged { active })
    }

    /// Flip annotation mode.
    pub fn toggle_annotation_mode(&mut self) -> Option<ControllerEvent> {
        self.set_annotation_mode(!self.annotation_mode)
    }

    /// Ask for the given page to be cleared.
    pub fn request_clear_page(&mut self, page: u32) -> ControllerEvent {
        self.close_clear_menu();
        ControllerEvent::ClearRequested(ClearScope::Page(page))
    }

    /// Ask for every page to be cleared.
    pub fn request_clear_all(&mut self) -> ControllerEvent {
        self.close_clear_menu();
        ControllerEvent::ClearRequested(ClearScope::All)
    }

    fn close_clear_menu(&mut self) {
        if self.open_panel == Some(Panel::ClearMenu) {
            self.open_panel = None;
        }
    }

    /// Whether the color picker applies to the active tool.
    pub fn shows_color_picker(&self) -> bool {
        self.style.tool.shows_color_picker()
    }

    pub fn shows_stroke_width(&self) -> bool {
        self.style.tool.shows_stroke_width()
    }

    pub fn shows_font_size(&self) -> bool {
        self.style.tool.shows_font_size()
    }
}

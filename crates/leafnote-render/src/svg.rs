//! SVG overlay output.
//!
//! The document's viewBox is the page's logical size, so a host can stack
//! the overlay on the page image at any pixel size and the annotations line
//! up without re-projecting anything.

use crate::color::svg_paint;
use crate::renderer::{RenderResult, Renderer};
use crate::scene::{Scene, SceneItem};
use kurbo::Rect;
use leafnote_core::model::AnnotationId;
use peniko::Color;
use std::borrow::Cow;
use std::fmt::Write;

const NOTE_FONT_SIZE: f64 = 14.0;
const NOTE_PADDING: f64 = 8.0;
const NOTE_CORNER_RADIUS: f64 = 6.0;
const NOTE_COLLAPSED_OPACITY: f64 = 0.6;
const NOTE_HEADER_LABEL: &str = "Note";
const SELECTION_STROKE_WIDTH: f64 = 1.5;

/// Escape text for use in SVG character data and attribute values.
pub fn escape_xml(text: &str) -> Cow<'_, str> {
    if !text.contains(['&', '<', '>', '"', '\'']) {
        return Cow::Borrowed(text);
    }
    let mut out = String::with_capacity(text.len() + 8);
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            _ => out.push(c),
        }
    }
    Cow::Owned(out)
}

/// ` fill="#rrggbb"` plus an opacity attribute when not fully opaque.
fn paint(attr: &str, color: Color, opacity: f64) -> String {
    let (hex, alpha) = svg_paint(color);
    let opacity = alpha * opacity;
    if opacity < 1.0 {
        format!(r#" {attr}="{hex}" {attr}-opacity="{opacity:.3}""#)
    } else {
        format!(r#" {attr}="{hex}""#)
    }
}

fn id_attr(id: Option<AnnotationId>) -> String {
    id.map(|id| format!(r#" data-id="{id}""#)).unwrap_or_default()
}

fn rect_attrs(rect: Rect) -> String {
    format!(
        r#"x="{}" y="{}" width="{}" height="{}""#,
        rect.x0,
        rect.y0,
        rect.width(),
        rect.height()
    )
}

/// Serializes scenes as standalone SVG documents.
#[derive(Debug, Clone)]
pub struct SvgWriter {
    /// Page backdrop. `None` leaves the overlay transparent.
    pub background: Option<Color>,
    pub font_family: String,
}

impl Default for SvgWriter {
    fn default() -> Self {
        Self {
            background: None,
            font_family: "sans-serif".to_string(),
        }
    }
}

impl SvgWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_background(mut self, color: Color) -> Self {
        self.background = Some(color);
        self
    }

    /// Write a scene to a string.
    pub fn write(&self, scene: &Scene) -> RenderResult<String> {
        let (w, h) = (scene.size.width, scene.size.height);
        let mut out = String::new();
        writeln!(
            out,
            r#"<svg xmlns="http://www.w3.org/2000/svg" viewBox="0 0 {w} {h}" width="{w}" height="{h}" font-family="{}">"#,
            escape_xml(&self.font_family)
        )?;
        if let Some(bg) = self.background {
            writeln!(out, r#"  <rect {}{}/>"#, rect_attrs(Rect::new(0.0, 0.0, w, h)), paint("fill", bg, 1.0))?;
        }
        for item in &scene.items {
            self.write_item(&mut out, item)?;
        }
        out.push_str("</svg>\n");
        Ok(out)
    }

    fn write_item(&self, out: &mut String, item: &SceneItem) -> RenderResult<()> {
        match item {
            SceneItem::Stroke {
                id,
                path,
                color,
                width,
                opacity,
            } => {
                writeln!(
                    out,
                    r#"  <path{} d="{}" fill="none"{} stroke-width="{}" stroke-linecap="round" stroke-linejoin="round"/>"#,
                    id_attr(*id),
                    path.to_svg(),
                    paint("stroke", *color, *opacity),
                    width
                )?;
            }
            SceneItem::TextLabel {
                id,
                rect,
                content,
                color,
                font_size,
                editing,
            } => {
                let anchor = rect.center();
                let class = if *editing {
                    // Frame the box the text input is bound to.
                    writeln!(
                        out,
                        r##"  <rect class="text-frame" {} fill="none" stroke="#9ca3af" stroke-width="1" stroke-dasharray="2 2"/>"##,
                        rect_attrs(*rect)
                    )?;
                    r#" class="editing""#
                } else {
                    ""
                };
                writeln!(
                    out,
                    r#"  <text{}{} x="{}" y="{}" font-size="{}"{} text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    id_attr(Some(*id)),
                    class,
                    anchor.x,
                    anchor.y,
                    font_size,
                    paint("fill", *color, 1.0),
                    escape_xml(content)
                )?;
            }
            SceneItem::NoteCard {
                id,
                rect,
                header,
                color,
                content,
                editing,
            } => {
                let class = if *editing { r#" class="editing""# } else { "" };
                writeln!(out, r#"  <g{}{}>"#, id_attr(Some(*id)), class)?;
                // Collapsed cards are tinted; expanded ones get a white body.
                let body = if content.is_some() {
                    r##" fill="#ffffff""##.to_string()
                } else {
                    paint("fill", *color, NOTE_COLLAPSED_OPACITY)
                };
                writeln!(
                    out,
                    r#"    <rect {} rx="{NOTE_CORNER_RADIUS}"{body}{} stroke-width="1"/>"#,
                    rect_attrs(*rect),
                    paint("stroke", *color, 1.0)
                )?;
                writeln!(
                    out,
                    r#"    <rect {} rx="{NOTE_CORNER_RADIUS}"{}/>"#,
                    rect_attrs(*header),
                    paint("fill", *color, 1.0)
                )?;
                writeln!(
                    out,
                    r#"    <text x="{}" y="{}" font-size="{NOTE_FONT_SIZE}" dominant-baseline="central">{NOTE_HEADER_LABEL}</text>"#,
                    header.x0 + NOTE_PADDING,
                    header.center().y
                )?;
                if let Some(body) = content.as_deref().filter(|b| !b.is_empty()) {
                    let x = rect.x0 + NOTE_PADDING;
                    writeln!(
                        out,
                        r#"    <text x="{x}" y="{}" font-size="{NOTE_FONT_SIZE}">"#,
                        header.y1 + NOTE_PADDING
                    )?;
                    for line in body.lines() {
                        writeln!(out, r#"      <tspan x="{x}" dy="1.2em">{}</tspan>"#, escape_xml(line))?;
                    }
                    writeln!(out, "    </text>")?;
                }
                writeln!(out, "  </g>")?;
            }
            SceneItem::Glyph {
                id,
                emoji,
                rect,
                size,
            } => {
                let center = rect.center();
                writeln!(
                    out,
                    r#"  <text{} x="{}" y="{}" font-size="{}" text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    id_attr(Some(*id)),
                    center.x,
                    center.y,
                    size,
                    escape_xml(emoji)
                )?;
            }
            SceneItem::StickerBadge {
                id,
                rect,
                label,
                background,
                foreground,
            } => {
                let radius = rect.height() / 2.0;
                let center = rect.center();
                writeln!(out, r#"  <g{}>"#, id_attr(Some(*id)))?;
                writeln!(
                    out,
                    r#"    <rect {} rx="{radius}"{}/>"#,
                    rect_attrs(*rect),
                    paint("fill", *background, 1.0)
                )?;
                writeln!(
                    out,
                    r#"    <text x="{}" y="{}" font-size="{}" font-weight="bold"{} text-anchor="middle" dominant-baseline="central">{}</text>"#,
                    center.x,
                    center.y,
                    rect.height() * 0.4,
                    paint("fill", *foreground, 1.0),
                    escape_xml(label)
                )?;
                writeln!(out, "  </g>")?;
            }
            SceneItem::SelectionOutline { rect, color } => {
                writeln!(
                    out,
                    r#"  <rect class="selection" {} fill="none"{} stroke-width="{SELECTION_STROKE_WIDTH}" stroke-dasharray="4 4"/>"#,
                    rect_attrs(*rect),
                    paint("stroke", *color, 1.0)
                )?;
            }
        }
        Ok(())
    }
}

impl Renderer for SvgWriter {
    type Output = String;

    fn render(&mut self, scene: &Scene) -> RenderResult<String> {
        self.write(scene)
    }
}

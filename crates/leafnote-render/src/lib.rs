//! Leafnote Render Library
//!
//! Turns a page's annotations and live surface state into a display list,
//! and serializes display lists as SVG overlays.

pub mod color;
mod renderer;
pub mod scene;
pub mod svg;

pub use renderer::{RenderError, RenderResult, Renderer};
pub use scene::{RenderContext, Scene, SceneBuilder, SceneItem};
pub use svg::SvgWriter;

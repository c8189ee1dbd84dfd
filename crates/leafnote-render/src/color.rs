//! CSS color strings to paint values.

use peniko::Color;
use peniko::color::{Srgb, parse_color};

/// Color used when an annotation carries an unparseable color string.
pub const FALLBACK_COLOR: Color = Color::from_rgba8(0, 0, 0, 255);

/// Parse a CSS color string, falling back to opaque black.
pub fn resolve_color(css: &str) -> Color {
    match parse_color(css.trim()) {
        Ok(color) => color.to_alpha_color::<Srgb>(),
        Err(e) => {
            log::warn!("invalid color {:?} ({}), using black", css, e);
            FALLBACK_COLOR
        }
    }
}

/// `#rrggbb` and alpha in `[0, 1]`, as SVG paint attributes want them.
pub fn svg_paint(color: Color) -> (String, f64) {
    let rgba = color.to_rgba8();
    (
        format!("#{:02x}{:02x}{:02x}", rgba.r, rgba.g, rgba.b),
        f64::from(rgba.a) / 255.0,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_colors() {
        assert_eq!(svg_paint(resolve_color("#ef4444")), ("#ef4444".to_string(), 1.0));
        assert_eq!(svg_paint(resolve_color(" #FFF ")).0, "#ffffff");
    }

    #[test]
    fn test_named_and_functional_colors() {
        assert_eq!(svg_paint(resolve_color("red")).0, "#ff0000");
        let (hex, alpha) = svg_paint(resolve_color("rgba(0, 0, 255, 0.5)"));
        assert_eq!(hex, "#0000ff");
        assert!((alpha - 0.5).abs() < 0.01);
    }

    #[test]
    fn test_invalid_falls_back_to_black() {
        assert_eq!(svg_paint(resolve_color("not-a-color")), ("#000000".to_string(), 1.0));
        assert_eq!(svg_paint(resolve_color("")).0, "#000000");
    }
}

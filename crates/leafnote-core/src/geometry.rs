//! Page geometry and client-to-logical coordinate mapping.
//!
//! Annotations are stored in the page's logical coordinate space (the
//! declared page width and height). The container the page is rendered
//! into can be any pixel size; every pointer event is mapped through the
//! [`Viewport`] so stored coordinates never need re-normalizing after a
//! zoom or resize.

use kurbo::{Point, Rect, Size};
use serde::{Deserialize, Serialize};

/// Logical dimensions of one page, as declared by the hosting viewer.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PageGeometry {
    /// Page number the geometry belongs to.
    pub page_number: u32,
    /// Logical width (viewBox width).
    pub width: f64,
    /// Logical height (viewBox height).
    pub height: f64,
}

impl PageGeometry {
    pub fn new(page_number: u32, width: f64, height: f64) -> Self {
        Self {
            page_number,
            width,
            height,
        }
    }

    /// Logical size of the page.
    pub fn size(&self) -> Size {
        Size::new(self.width, self.height)
    }

    /// Whether the page has a usable (positive, finite) logical area.
    pub fn is_valid(&self) -> bool {
        self.width.is_finite() && self.height.is_finite() && self.width > 0.0 && self.height > 0.0
    }
}

/// Maps between client (device pixel) space and page-logical space.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Viewport {
    /// Page currently presented.
    pub page: PageGeometry,
    /// Container rectangle in client coordinates.
    pub container: Rect,
}

impl Viewport {
    /// Create a viewport for a page rendered into `container`.
    pub fn new(page: PageGeometry, container: Rect) -> Self {
        Self { page, container }
    }

    /// Replace the container rectangle (window resize, zoom).
    pub fn resize(&mut self, container: Rect) {
        self.container = container;
    }

    /// Switch to another page, keeping the container.
    pub fn set_page(&mut self, page: PageGeometry) {
        self.page = page;
    }

    /// Whether both the container and the page have a usable area.
    pub fn has_area(&self) -> bool {
        self.container.width() > 0.0 && self.container.height() > 0.0 && self.page.is_valid()
    }

    /// Convert a client point to page-logical coordinates.
    ///
    /// `None` while the viewport has no area; there is no meaningful page
    /// point under the pointer then.
    pub fn to_logical(&self, client: Point) -> Option<Point> {
        if !self.has_area() {
            return None;
        }
        let c = self.container;
        Some(Point::new(
            (client.x - c.x0) / c.width() * self.page.width,
            (client.y - c.y0) / c.height() * self.page.height,
        ))
    }

    /// Convert a page-logical point back to client coordinates.
    pub fn to_client(&self, logical: Point) -> Point {
        if !self.has_area() {
            return Point::new(self.container.x0, self.container.y0);
        }
        let c = self.container;
        Point::new(
            c.x0 + logical.x / self.page.width * c.width(),
            c.y0 + logical.y / self.page.height * c.height(),
        )
    }

    /// Client pixels per logical unit along x and y.
    pub fn scale(&self) -> (f64, f64) {
        if !self.has_area() {
            return (0.0, 0.0);
        }
        (
            self.container.width() / self.page.width,
            self.container.height() / self.page.height,
        )
    }
}

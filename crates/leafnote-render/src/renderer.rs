//! Renderer trait abstraction.

use crate::scene::Scene;
use thiserror::Error;

/// Renderer errors.
#[derive(Debug, Error)]
pub enum RenderError {
    #[error("Invalid geometry for page {page}: {width}x{height}")]
    InvalidPage { page: u32, width: f64, height: f64 },
    #[error("Write failed: {0}")]
    Write(#[from] std::fmt::Error),
}

/// Result type for renderer operations.
pub type RenderResult<T> = Result<T, RenderError>;

/// Turns a built [`Scene`] into some output format.
pub trait Renderer {
    type Output;

    fn render(&mut self, scene: &Scene) -> RenderResult<Self::Output>;
}

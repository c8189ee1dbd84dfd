//! Leafnote Core Library
//!
//! Per-page annotation engine for paginated document viewers: data model,
//! client-to-page coordinate mapping, hit-testing, the pointer state machine,
//! tool and style state, and page-indexed persistence.

pub mod catalog;
pub mod config;
pub mod controller;
pub mod geometry;
pub mod hit;
pub mod model;
pub mod session;
pub mod store;
pub mod surface;

pub use catalog::{BuiltinStickers, DEFAULT_EMOJIS, StickerCatalog, StickerId, StickerInfo};
pub use config::{ConfigError, SurfaceConfig};
pub use controller::{ClearScope, ControllerEvent, Panel, StyleContext, ToolController, ToolKind};
pub use geometry::{PageGeometry, Viewport};
pub use hit::{NoteRegion, hit_box, hit_test};
pub use model::{Annotation, AnnotationId, AnnotationKind, AnnotationPatch, DrawTool};
pub use session::Annotator;
pub use store::{FlushReport, MemoryBackend, Notice, NoticeLevel, PageBackend, PageStore, StorageError};
pub use surface::{AnnotationIntent, AnnotationSurface, Editing, EditingKind, Interaction, IntentOp};

#[cfg(not(target_arch = "wasm32"))]
pub use store::FileBackend;

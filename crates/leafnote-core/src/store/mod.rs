//! Page-indexed annotation store and persistence backends.
//!
//! [`PageStore`] holds every page's annotation list in memory and is the
//! session's source of truth. Mutations apply immediately; persistence
//! happens on [`PageStore::flush`] through a [`PageBackend`]. A failed save
//! is logged and queued as a [`Notice`] for the host to show. In-memory
//! state is never rolled back and the save is not retried.

mod memory;

#[cfg(not(target_arch = "wasm32"))]
mod file;

pub use memory::MemoryBackend;

#[cfg(not(target_arch = "wasm32"))]
pub use file::FileBackend;

use crate::model::{Annotation, AnnotationId, AnnotationPatch};
use crate::surface::{AnnotationIntent, IntentOp};
use std::collections::{BTreeMap, BTreeSet};
use std::future::Future;
use std::pin::Pin;
use thiserror::Error;

/// Storage errors.
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Page not found: {0}")]
    NotFound(u32),
    #[error("Serialization error: {0}")]
    Serialization(String),
    #[error("IO error: {0}")]
    Io(String),
    #[error("Storage error: {0}")]
    Other(String),
}

/// Result type for storage operations.
pub type StorageResult<T> = Result<T, StorageError>;

/// Boxed future for async operations (compatible with WASM).
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + 'a>>;

/// Persistence for per-page annotation lists.
///
/// On native platforms implementations must be Send + Sync.
#[cfg(not(target_arch = "wasm32"))]
pub trait PageBackend: Send + Sync {
    /// Persist a page's full annotation list.
    fn save_page<'a>(&'a self, page: u32, annotations: &'a [Annotation]) -> BoxFuture<'a, StorageResult<()>>;

    /// Load a page's annotation list.
    fn load_page(&self, page: u32) -> BoxFuture<'_, StorageResult<Vec<Annotation>>>;

    /// Delete a page's annotation list. Deleting a missing page succeeds.
    fn delete_page(&self, page: u32) -> BoxFuture<'_, StorageResult<()>>;

    /// Pages that currently have stored annotations.
    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<u32>>>;
}

/// Persistence for per-page annotation lists (WASM version without Send + Sync).
#[cfg(target_arch = "wasm32")]
pub trait PageBackend {
    /// Persist a page's full annotation list.
    fn save_page<'a>(&'a self, page: u32, annotations: &'a [Annotation]) -> BoxFuture<'a, StorageResult<()>>;

    /// Load a page's annotation list.
    fn load_page(&self, page: u32) -> BoxFuture<'_, StorageResult<Vec<Annotation>>>;

    /// Delete a page's annotation list. Deleting a missing page succeeds.
    fn delete_page(&self, page: u32) -> BoxFuture<'_, StorageResult<()>>;

    /// Pages that currently have stored annotations.
    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<u32>>>;
}

/// Severity of a [`Notice`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NoticeLevel {
    Info,
    Error,
}

/// A transient, non-blocking message for the user (toast).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Notice {
    pub level: NoticeLevel,
    pub message: String,
}

impl Notice {
    pub fn info(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Info,
            message: message.into(),
        }
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self {
            level: NoticeLevel::Error,
            message: message.into(),
        }
    }
}

/// Outcome of a [`PageStore::flush`].
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct FlushReport {
    /// Pages written or deleted successfully.
    pub saved: usize,
    /// Pages whose persistence failed.
    pub failed: usize,
}

/// In-memory annotation lists keyed by page number.
///
/// Each list is in render order (back to front); creates append.
#[derive(Debug, Clone, Default)]
pub struct PageStore {
    pages: BTreeMap<u32, Vec<Annotation>>,
    dirty: BTreeSet<u32>,
    purge_backend: bool,
    notices: Vec<Notice>,
}

impl PageStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Annotations on `page`, back to front.
    pub fn annotations(&self, page: u32) -> &[Annotation] {
        self.pages.get(&page).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn get(&self, page: u32, id: AnnotationId) -> Option<&Annotation> {
        self.annotations(page).iter().find(|a| a.id() == id)
    }

    /// Pages that hold at least one annotation.
    pub fn pages(&self) -> Vec<u32> {
        self.pages
            .iter()
            .filter(|(_, list)| !list.is_empty())
            .map(|(page, _)| *page)
            .collect()
    }

    /// Total annotation count across pages.
    pub fn len(&self) -> usize {
        self.pages.values().map(Vec::len).sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Apply a surface intent. Returns true if the store changed.
    pub fn apply(&mut self, intent: AnnotationIntent) -> bool {
        match intent.op {
            IntentOp::Create(annotation) => self.create(intent.page, annotation),
            IntentOp::Update { id, patch } => self.update(intent.page, id, &patch),
            IntentOp::Remove(id) => self.remove(intent.page, id).is_some(),
        }
    }

    /// Append an annotation to a page (it becomes topmost).
    ///
    /// An annotation whose id is already on the page replaces nothing and is
    /// dropped, as is a stroke with fewer than two points. Returns true if
    /// the annotation was added.
    pub fn create(&mut self, page: u32, annotation: Annotation) -> bool {
        if !annotation.is_well_formed() {
            log::warn!("malformed {} {} on page {} ignored", annotation.kind(), annotation.id(), page);
            return false;
        }
        let list = self.pages.entry(page).or_default();
        if list.iter().any(|a| a.id() == annotation.id()) {
            log::warn!("duplicate annotation id {} on page {} ignored", annotation.id(), page);
            return false;
        }
        log::debug!("page {}: + {} {}", page, annotation.kind(), annotation.id());
        list.push(annotation);
        self.dirty.insert(page);
        true
    }

    /// Partially update an annotation. Unknown ids are ignored.
    pub fn update(&mut self, page: u32, id: AnnotationId, patch: &AnnotationPatch) -> bool {
        let changed = self
            .pages
            .get_mut(&page)
            .and_then(|list| list.iter_mut().find(|a| a.id() == id))
            .is_some_and(|a| a.apply(patch));
        if changed {
            self.dirty.insert(page);
        }
        changed
    }

    /// Remove an annotation. Unknown ids are ignored.
    pub fn remove(&mut self, page: u32, id: AnnotationId) -> Option<Annotation> {
        let list = self.pages.get_mut(&page)?;
        let index = list.iter().position(|a| a.id() == id)?;
        let removed = list.remove(index);
        log::debug!("page {}: - {} {}", page, removed.kind(), id);
        self.dirty.insert(page);
        Some(removed)
    }

    /// Remove every annotation on one page. Returns how many were removed.
    pub fn clear_page(&mut self, page: u32) -> usize {
        let removed = self.pages.remove(&page).map(|l| l.len()).unwrap_or(0);
        self.dirty.insert(page);
        log::debug!("page {}: cleared {} annotations", page, removed);
        removed
    }

    /// Remove every annotation on every page. Returns how many were removed.
    pub fn clear_all(&mut self) -> usize {
        let removed = self.len();
        let pages: Vec<u32> = self.pages.keys().copied().collect();
        self.dirty.extend(pages);
        self.pages.clear();
        self.purge_backend = true;
        log::debug!("cleared {} annotations on all pages", removed);
        removed
    }

    /// Replace a page's list wholesale (e.g. after loading it).
    pub fn replace_page(&mut self, page: u32, annotations: Vec<Annotation>) {
        self.pages.insert(page, annotations);
        self.dirty.remove(&page);
    }

    pub fn is_dirty(&self) -> bool {
        !self.dirty.is_empty() || self.purge_backend
    }

    /// Pending user notices, oldest first. Draining clears the queue.
    pub fn take_notices(&mut self) -> Vec<Notice> {
        std::mem::take(&mut self.notices)
    }

    pub fn push_notice(&mut self, notice: Notice) {
        self.notices.push(notice);
    }

    /// Load one page from the backend, replacing the in-memory list.
    ///
    /// A page the backend has never seen loads as empty. Strokes with fewer
    /// than two points are dropped and the page is marked dirty so the next
    /// flush writes the cleaned list back.
    pub async fn load_page(&mut self, backend: &dyn PageBackend, page: u32) -> StorageResult<()> {
        match backend.load_page(page).await {
            Ok(mut list) => {
                let loaded = list.len();
                list.retain(|a| {
                    let keep = a.is_well_formed();
                    if !keep {
                        log::warn!("page {}: dropped malformed {} {}", page, a.kind(), a.id());
                    }
                    keep
                });
                log::debug!("page {}: loaded {} annotations", page, list.len());
                let dropped = loaded != list.len();
                self.replace_page(page, list);
                if dropped {
                    self.dirty.insert(page);
                }
                Ok(())
            }
            Err(StorageError::NotFound(_)) => {
                self.replace_page(page, Vec::new());
                Ok(())
            }
            Err(e) => {
                log::warn!("failed to load page {}: {}", page, e);
                self.notices
                    .push(Notice::error(format!("Could not load annotations for page {page}")));
                Err(e)
            }
        }
    }

    /// Persist every dirty page. Failures become notices; nothing is rolled back.
    pub async fn flush(&mut self, backend: &dyn PageBackend) -> FlushReport {
        let mut report = FlushReport::default();

        if std::mem::take(&mut self.purge_backend) {
            match backend.list_pages().await {
                Ok(stored) => self.dirty.extend(stored),
                Err(e) => {
                    log::warn!("failed to list stored pages: {}", e);
                    self.notices
                        .push(Notice::error("Could not clear saved annotations"));
                    report.failed += 1;
                }
            }
        }

        for page in std::mem::take(&mut self.dirty) {
            let result = match self.pages.get(&page) {
                Some(list) if !list.is_empty() => backend.save_page(page, list).await,
                _ => backend.delete_page(page).await,
            };
            match result {
                Ok(()) => report.saved += 1,
                Err(e) => {
                    log::warn!("failed to persist page {}: {}", page, e);
                    self.notices
                        .push(Notice::error(format!("Could not save annotations for page {page}")));
                    report.failed += 1;
                }
            }
        }
        report
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DrawTool, Drawing, Emoji, Note};
    use kurbo::Point;

    fn emoji(x: f64) -> Annotation {
        Emoji::new(Point::new(x, x), "👍").into()
    }

    struct FailingBackend;

    impl PageBackend for FailingBackend {
        fn save_page<'a>(&'a self, _page: u32, _annotations: &'a [Annotation]) -> BoxFuture<'a, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("disk full".into())) })
        }

        fn load_page(&self, _page: u32) -> BoxFuture<'_, StorageResult<Vec<Annotation>>> {
            Box::pin(async { Err(StorageError::Io("unreadable".into())) })
        }

        fn delete_page(&self, _page: u32) -> BoxFuture<'_, StorageResult<()>> {
            Box::pin(async { Err(StorageError::Io("read-only".into())) })
        }

        fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<u32>>> {
            Box::pin(async { Err(StorageError::Io("unreadable".into())) })
        }
    }

    #[test]
    fn test_create_appends_in_render_order() {
        let mut store = PageStore::new();
        let (a, b) = (emoji(1.0), emoji(2.0));
        let (a_id, b_id) = (a.id(), b.id());
        store.create(1, a);
        store.create(1, b);

        let ids: Vec<_> = store.annotations(1).iter().map(Annotation::id).collect();
        assert_eq!(ids, vec![a_id, b_id]);
        assert!(store.annotations(2).is_empty());
    }

    #[test]
    fn test_duplicate_id_is_dropped() {
        let mut store = PageStore::new();
        let a = emoji(1.0);
        store.create(1, a.clone());
        store.create(1, a);
        assert_eq!(store.annotations(1).len(), 1);
    }

    #[test]
    fn test_update_and_remove_unknown_ids_are_noops() {
        let mut store = PageStore::new();
        store.create(1, emoji(1.0));
        let before = store.annotations(1).to_vec();

        let ghost = AnnotationId::new_v4();
        assert!(!store.update(1, ghost, &AnnotationPatch::position(Point::ZERO)));
        assert!(store.remove(1, ghost).is_none());
        assert!(store.remove(9, ghost).is_none());
        assert_eq!(store.annotations(1), before.as_slice());
    }

    #[test]
    fn test_apply_intents() {
        let mut store = PageStore::new();
        let note: Annotation = Note::new(Point::ZERO, "yellow").into();
        let id = note.id();

        assert!(store.apply(AnnotationIntent::create(3, note)));
        assert!(store.apply(AnnotationIntent::update(3, id, AnnotationPatch::expanded(true))));
        assert!(store.get(3, id).and_then(Annotation::as_note).unwrap().is_expanded);
        assert!(store.apply(AnnotationIntent::remove(3, id)));
        assert!(store.annotations(3).is_empty());
    }

    #[test]
    fn test_clear_scoping() {
        let mut store = PageStore::new();
        store.create(1, emoji(1.0));
        store.create(1, emoji(2.0));
        store.create(2, emoji(3.0));
        store.create(5, emoji(4.0));

        assert_eq!(store.clear_page(1), 2);
        assert!(store.annotations(1).is_empty());
        assert_eq!(store.annotations(2).len(), 1);
        assert_eq!(store.annotations(5).len(), 1);
        assert_eq!(store.pages(), vec![2, 5]);

        assert_eq!(store.clear_all(), 2);
        assert!(store.is_empty());
        assert!(store.pages().is_empty());
    }

    #[test]
    fn test_failed_flush_keeps_local_state_and_reports() {
        let mut store = PageStore::new();
        store.create(1, emoji(1.0));

        let report = pollster::block_on(store.flush(&FailingBackend));
        assert_eq!(report, FlushReport { saved: 0, failed: 1 });
        assert_eq!(store.annotations(1).len(), 1);
        assert!(!store.is_dirty());

        let notices = store.take_notices();
        assert_eq!(notices.len(), 1);
        assert_eq!(notices[0].level, NoticeLevel::Error);
        assert!(store.take_notices().is_empty());
    }

    #[test]
    fn test_failed_load_reports() {
        let mut store = PageStore::new();
        store.create(1, emoji(1.0));
        let result = pollster::block_on(store.load_page(&FailingBackend, 1));
        assert!(result.is_err());
        assert_eq!(store.annotations(1).len(), 1);
        assert_eq!(store.take_notices().len(), 1);
    }

    #[test]
    fn test_flush_roundtrip_through_memory_backend() {
        let backend = MemoryBackend::new();
        let mut store = PageStore::new();
        store.create(1, emoji(1.0));
        store.create(4, emoji(2.0));

        let report = pollster::block_on(store.flush(&backend));
        assert_eq!(report, FlushReport { saved: 2, failed: 0 });

        let mut fresh = PageStore::new();
        pollster::block_on(fresh.load_page(&backend, 4)).unwrap();
        pollster::block_on(fresh.load_page(&backend, 7)).unwrap();
        assert_eq!(fresh.annotations(4), store.annotations(4));
        assert!(fresh.annotations(7).is_empty());
    }

    #[test]
    fn test_clear_all_purges_unloaded_pages() {
        let backend = MemoryBackend::new();
        let mut seeded = PageStore::new();
        seeded.create(8, emoji(1.0));
        pollster::block_on(seeded.flush(&backend));

        let mut store = PageStore::new();
        store.create(1, emoji(2.0));
        store.clear_all();
        pollster::block_on(store.flush(&backend));

        let stored = pollster::block_on(backend.list_pages()).unwrap();
        assert!(stored.is_empty());
    }

    #[test]
    fn test_short_strokes_never_enter_the_store() {
        let dot: Annotation = Drawing::new(vec![Point::new(5.0, 5.0)], "#000", 2.0, 1.0, DrawTool::Pen).into();
        let line: Annotation = Drawing::new(
            vec![Point::new(0.0, 0.0), Point::new(9.0, 9.0)],
            "#000",
            2.0,
            1.0,
            DrawTool::Pen,
        )
        .into();

        let mut store = PageStore::new();
        assert!(!store.create(1, dot.clone()));
        assert!(!store.is_dirty());

        let backend = MemoryBackend::new();
        pollster::block_on(backend.save_page(2, &[dot, line.clone(), emoji(3.0)])).unwrap();
        pollster::block_on(store.load_page(&backend, 2)).unwrap();
        assert_eq!(store.annotations(2).len(), 2);
        assert_eq!(store.annotations(2)[0], line);
        assert!(store.is_dirty());

        pollster::block_on(store.flush(&backend));
        let saved = pollster::block_on(backend.load_page(2)).unwrap();
        assert!(saved.iter().all(Annotation::is_well_formed));
    }
}

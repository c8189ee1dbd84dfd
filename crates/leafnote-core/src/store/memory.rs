//! In-memory page backend.

use super::{BoxFuture, PageBackend, StorageError, StorageResult};
use crate::model::Annotation;
use std::collections::HashMap;
use std::sync::{PoisonError, RwLock};

/// Backend for tests and sessions that do not outlive the process.
#[derive(Default)]
pub struct MemoryBackend {
    pages: RwLock<HashMap<u32, Vec<Annotation>>>,
}

fn poisoned<T>(_: PoisonError<T>) -> StorageError {
    StorageError::Other("page map lock poisoned".to_string())
}

impl MemoryBackend {
    pub fn new() -> Self {
        Self::default()
    }
}

impl PageBackend for MemoryBackend {
    fn save_page<'a>(&'a self, page: u32, annotations: &'a [Annotation]) -> BoxFuture<'a, StorageResult<()>> {
        Box::pin(async move {
            self.pages
                .write()
                .map_err(poisoned)?
                .insert(page, annotations.to_vec());
            Ok(())
        })
    }

    fn load_page(&self, page: u32) -> BoxFuture<'_, StorageResult<Vec<Annotation>>> {
        Box::pin(async move {
            self.pages
                .read()
                .map_err(poisoned)?
                .get(&page)
                .cloned()
                .ok_or(StorageError::NotFound(page))
        })
    }

    fn delete_page(&self, page: u32) -> BoxFuture<'_, StorageResult<()>> {
        Box::pin(async move {
            self.pages.write().map_err(poisoned)?.remove(&page);
            Ok(())
        })
    }

    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<u32>>> {
        Box::pin(async move {
            let mut list: Vec<u32> = self.pages.read().map_err(poisoned)?.keys().copied().collect();
            list.sort_unstable();
            Ok(list)
        })
    }
}

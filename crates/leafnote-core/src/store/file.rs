//! File-based page backend for native platforms.

use super::{BoxFuture, PageBackend, StorageError, StorageResult};
use crate::model::{Annotation, annotations_from_json, annotations_to_json};
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

const PAGE_FILE_PREFIX: &str = "page-";

/// Stores each page's annotations as `page-<n>.json` in a directory.
pub struct FileBackend {
    root: PathBuf,
}

fn io_error(action: &str, path: &Path, e: io::Error) -> StorageError {
    StorageError::Io(format!("{action} {}: {e}", path.display()))
}

fn page_from_file_name(path: &Path) -> Option<u32> {
    if path.extension().is_none_or(|e| e != "json") {
        return None;
    }
    path.file_stem()?
        .to_str()?
        .strip_prefix(PAGE_FILE_PREFIX)?
        .parse()
        .ok()
}

impl FileBackend {
    /// Create a backend rooted at `root`, creating the directory if needed.
    pub fn new(root: impl Into<PathBuf>) -> StorageResult<Self> {
        let root = root.into();
        fs::create_dir_all(&root).map_err(|e| io_error("Cannot create", &root, e))?;
        Ok(Self { root })
    }

    pub fn base_path(&self) -> &Path {
        &self.root
    }

    fn page_path(&self, page: u32) -> PathBuf {
        self.root.join(format!("{PAGE_FILE_PREFIX}{page}.json"))
    }
}

impl PageBackend for FileBackend {
    fn save_page<'a>(&'a self, page: u32, annotations: &'a [Annotation]) -> BoxFuture<'a, StorageResult<()>> {
        let path = self.page_path(page);
        Box::pin(async move {
            let json = annotations_to_json(annotations)
                .map_err(|e| StorageError::Serialization(format!("page {page}: {e}")))?;
            fs::write(&path, json).map_err(|e| io_error("Cannot write", &path, e))
        })
    }

    fn load_page(&self, page: u32) -> BoxFuture<'_, StorageResult<Vec<Annotation>>> {
        let path = self.page_path(page);
        Box::pin(async move {
            let json = match fs::read_to_string(&path) {
                Ok(json) => json,
                Err(e) if e.kind() == io::ErrorKind::NotFound => {
                    return Err(StorageError::NotFound(page));
                }
                Err(e) => return Err(io_error("Cannot read", &path, e)),
            };
            annotations_from_json(&json).map_err(|e| {
                StorageError::Serialization(format!("{}: {e}", path.display()))
            })
        })
    }

    fn delete_page(&self, page: u32) -> BoxFuture<'_, StorageResult<()>> {
        let path = self.page_path(page);
        Box::pin(async move {
            match fs::remove_file(&path) {
                Ok(()) => Ok(()),
                Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
                Err(e) => Err(io_error("Cannot delete", &path, e)),
            }
        })
    }

    fn list_pages(&self) -> BoxFuture<'_, StorageResult<Vec<u32>>> {
        Box::pin(async move {
            let entries = match fs::read_dir(&self.root) {
                Ok(entries) => entries,
                Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Vec::new()),
                Err(e) => return Err(io_error("Cannot list", &self.root, e)),
            };
            let mut pages: Vec<u32> = entries
                .flatten()
                .filter_map(|entry| page_from_file_name(&entry.path()))
                .collect();
            pages.sort_unstable();
            Ok(pages)
        })
    }
}

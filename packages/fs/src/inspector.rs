//! Directory inspection: `list`, `count` and `info` over a resolved directory.

use std::fs;
use std::io;

use walkdir::WalkDir;

use crate::error::InspectError;
use crate::record::{FileRecord, ListingResult};
use crate::rootfs::ResolvedPath;
use crate::walk::{ListingVisitor, Walk};

/// Produces file metadata for a resolved directory.
///
/// Implementors only provide [`Inspector::walk`]; the derived operations
/// are built on top of it. Nothing is cached between calls.
pub trait Inspector: Send + Sync {
    /// Walk every descendant of `directory`, excluding the directory itself.
    fn walk(&self, directory: &ResolvedPath) -> Result<Walk, InspectError>;

    /// List every descendant, in traversal order.
    fn list(&self, directory: &ResolvedPath) -> Result<ListingResult, InspectError> {
        let walk = self.walk(directory)?;
        for skipped in &walk.diagnostics {
            log::warn!(
                "Error accessing path {}: {}",
                skipped.path.display(),
                skipped.message
            );
        }
        log::debug!(
            "Found {} entries in directory {} ({} skipped)",
            walk.records.len(),
            directory.logical(),
            walk.diagnostics.len()
        );
        Ok(ListingResult::new(directory.logical(), walk.records))
    }

    /// Number of entries `list` would return.
    fn count(&self, directory: &ResolvedPath) -> Result<usize, InspectError> {
        Ok(self.list(directory)?.file_count)
    }

    /// The entry whose relative name equals `filename` exactly.
    fn info(&self, directory: &ResolvedPath, filename: &str) -> Result<FileRecord, InspectError> {
        let listing = self.list(directory)?;
        listing
            .files
            .into_iter()
            .find(|f| f.name == filename)
            .ok_or_else(|| InspectError::NotFound {
                directory: directory.logical().to_string(),
                name: filename.to_string(),
            })
    }
}

impl<T: Inspector + ?Sized> Inspector for &T {
    fn walk(&self, directory: &ResolvedPath) -> Result<Walk, InspectError> {
        (**self).walk(directory)
    }
}

impl<T: Inspector + ?Sized> Inspector for Box<T> {
    fn walk(&self, directory: &ResolvedPath) -> Result<Walk, InspectError> {
        (**self).walk(directory)
    }
}

impl<T: Inspector + ?Sized> Inspector for std::sync::Arc<T> {
    fn walk(&self, directory: &ResolvedPath) -> Result<Walk, InspectError> {
        (**self).walk(directory)
    }
}

/// Inspector backed by the local filesystem.
#[derive(Clone, Copy, Debug, Default)]
pub struct LocalInspector;

impl LocalInspector {
    pub fn new() -> Self {
        Self
    }
}

impl Inspector for LocalInspector {
    fn walk(&self, directory: &ResolvedPath) -> Result<Walk, InspectError> {
        let root = directory.concrete();

        if let Err(error) = fs::metadata(root) {
            return Err(if error.kind() == io::ErrorKind::NotFound {
                InspectError::NotExist {
                    directory: directory.logical().to_string(),
                }
            } else {
                InspectError::Access {
                    directory: directory.logical().to_string(),
                    source: error,
                }
            });
        }

        let mut visitor = ListingVisitor::new(root);
        for entry in WalkDir::new(root).min_depth(1) {
            match entry {
                Ok(entry) => visitor.visit_entry(&entry),
                // Failing to read the root itself means nothing was walked.
                Err(err) if err.depth() == 0 => {
                    return Err(InspectError::Access {
                        directory: directory.logical().to_string(),
                        source: err.into(),
                    });
                }
                Err(err) => visitor.visit_error(err),
            }
        }
        Ok(visitor.finish())
    }
}

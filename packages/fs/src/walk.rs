//! Directory traversal that tolerates per-entry failures.
//!
//! A walk never aborts because one child is unreadable. The visitor keeps
//! the records it could build and a separate list of diagnostics for the
//! entries it had to skip.

use std::path::{Component, Path, PathBuf};

use crate::record::FileRecord;

/// An entry skipped during a walk.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub path: PathBuf,
    pub message: String,
}

/// The outcome of a walk: records in traversal order plus skipped entries.
#[derive(Clone, Debug, Default)]
pub struct Walk {
    pub records: Vec<FileRecord>,
    pub diagnostics: Vec<Diagnostic>,
}

/// Visitor fed by a `walkdir` traversal rooted at `root`.
pub struct ListingVisitor<'a> {
    root: &'a Path,
    walk: Walk,
}

impl<'a> ListingVisitor<'a> {
    pub fn new(root: &'a Path) -> Self {
        Self {
            root,
            walk: Walk::default(),
        }
    }

    pub fn visit_entry(&mut self, entry: &walkdir::DirEntry) {
        let path = entry.path();
        let Some(name) = relative_name(self.root, path) else {
            // The walk root itself.
            return;
        };

        let metadata = match entry.metadata() {
            Ok(metadata) => metadata,
            Err(err) => return self.skip(path, err.to_string()),
        };

        match FileRecord::from_metadata(name, &metadata) {
            Ok(record) => self.walk.records.push(record),
            Err(err) => self.skip(path, err.to_string()),
        }
    }

    pub fn visit_error(&mut self, err: walkdir::Error) {
        let path = err
            .path()
            .map(Path::to_path_buf)
            .unwrap_or_else(|| self.root.to_path_buf());
        self.skip(&path, err.to_string());
    }

    pub fn finish(self) -> Walk {
        self.walk
    }

    fn skip(&mut self, path: &Path, message: String) {
        self.walk.diagnostics.push(Diagnostic {
            path: path.to_path_buf(),
            message,
        });
    }
}

/// The `/`-joined path of `path` below `root`, or `None` for `root` itself
/// and for paths outside it.
pub fn relative_name(root: &Path, path: &Path) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let parts: Vec<String> = relative
        .components()
        .filter_map(|c| match c {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    if parts.is_empty() {
        None
    } else {
        Some(parts.join("/"))
    }
}

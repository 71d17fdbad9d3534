//! Resolution of logical filesystem paths against a configured root.
//!
//! In containerized deployments the host filesystem is mounted somewhere
//! below the agent's own root (e.g. `/mnt/host`). Callers always speak in
//! host paths; `RootFs` maps them into the mount and never lets the result
//! climb out of it.

use std::path::{Component, Path, PathBuf};

/// The configured filesystem root.
///
/// An empty root or `/` means no confinement.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RootFs {
    root: Option<PathBuf>,
}

impl RootFs {
    pub fn new(root: impl AsRef<Path>) -> Self {
        let root = normalize(root.as_ref());
        if root.as_os_str().is_empty() || root == Path::new("/") {
            return Self::unconfined();
        }
        Self { root: Some(root) }
    }

    pub fn unconfined() -> Self {
        Self { root: None }
    }

    /// The normalized root, or `None` when unconfined.
    pub fn root(&self) -> Option<&Path> {
        self.root.as_deref()
    }

    pub fn is_confined(&self) -> bool {
        self.root.is_some()
    }

    /// Map a logical path to the concrete path to operate on.
    ///
    /// - unconfined: the logical path is returned unchanged
    /// - absolute path already under the root: returned as is (normalized)
    /// - other absolute path: joined under the root, `..` clamped at the root
    /// - relative path: returned unchanged
    pub fn resolve(&self, logical: &str) -> PathBuf {
        let Some(root) = &self.root else {
            return PathBuf::from(logical);
        };

        let logical_path = Path::new(logical);
        if !logical_path.has_root() {
            log::debug!("relative path {} passed through without confinement", logical);
            return logical_path.to_path_buf();
        }

        let normalized = normalize(logical_path);
        if normalized.starts_with(root) {
            return normalized;
        }

        match normalized.strip_prefix("/") {
            Ok(relative) if !relative.as_os_str().is_empty() => root.join(relative),
            _ => root.clone(),
        }
    }

    /// Resolve a logical path, keeping both forms together.
    pub fn locate(&self, logical: &str) -> ResolvedPath {
        let concrete = self.resolve(logical);
        log::debug!(
            "resolved {} -> {} (rootfs: {})",
            logical,
            concrete.display(),
            self.root
                .as_deref()
                .map(|r| r.display().to_string())
                .unwrap_or_else(|| "/".to_string())
        );
        ResolvedPath {
            logical: logical.to_string(),
            concrete,
        }
    }
}

/// Resolve `logical` against `root` without building a [`RootFs`].
pub fn resolve(logical: &str, root: &str) -> PathBuf {
    RootFs::new(root).resolve(logical)
}

/// A logical path paired with the concrete path it resolved to.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedPath {
    logical: String,
    concrete: PathBuf,
}

impl ResolvedPath {
    /// Pair paths directly, for callers that did their own resolution.
    pub fn new(logical: impl Into<String>, concrete: impl Into<PathBuf>) -> Self {
        Self {
            logical: logical.into(),
            concrete: concrete.into(),
        }
    }

    pub fn logical(&self) -> &str {
        &self.logical
    }

    pub fn concrete(&self) -> &Path {
        &self.concrete
    }
}

/// Lexically remove `.` and `..` components. `..` never climbs above the
/// first component of an absolute path.
fn normalize(path: &Path) -> PathBuf {
    let mut out: Vec<Component<'_>> = Vec::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => match out.last() {
                Some(Component::Normal(_)) => {
                    out.pop();
                }
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => out.push(component),
            },
            _ => out.push(component),
        }
    }
    out.iter().collect()
}

//! Storage capacity of the filesystem holding a path.

use serde::{Deserialize, Serialize};

use crate::error::CapacityError;
use crate::rootfs::ResolvedPath;

const MB: u64 = 1024 * 1024;

/// Total and available space, in mebibytes.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Capacity {
    pub total_mb: u64,
    pub available_mb: u64,
}

impl Capacity {
    /// Build from block counts as reported by `statvfs`.
    pub fn from_blocks(block_size: u64, total_blocks: u64, available_blocks: u64) -> Self {
        Self {
            total_mb: total_blocks.saturating_mul(block_size) / MB,
            available_mb: available_blocks.saturating_mul(block_size) / MB,
        }
    }
}

/// Source of storage capacity figures.
pub trait CapacityProvider: Send + Sync {
    fn capacity(&self, path: &ResolvedPath) -> Result<Capacity, CapacityError>;
}

impl<T: CapacityProvider + ?Sized> CapacityProvider for std::sync::Arc<T> {
    fn capacity(&self, path: &ResolvedPath) -> Result<Capacity, CapacityError> {
        (**self).capacity(path)
    }
}

impl<T: CapacityProvider + ?Sized> CapacityProvider for Box<T> {
    fn capacity(&self, path: &ResolvedPath) -> Result<Capacity, CapacityError> {
        (**self).capacity(path)
    }
}

/// Capacity read with `statvfs(2)`.
///
/// "Available" is the space usable by unprivileged processes (`f_bavail`).
#[derive(Clone, Copy, Debug, Default)]
pub struct StatvfsCapacity;

impl CapacityProvider for StatvfsCapacity {
    #[cfg(unix)]
    fn capacity(&self, path: &ResolvedPath) -> Result<Capacity, CapacityError> {
        let stat = rustix::fs::statvfs(path.concrete()).map_err(|e| CapacityError::Io {
            path: path.concrete().to_path_buf(),
            source: e.into(),
        })?;

        let block_size = if stat.f_frsize > 0 {
            stat.f_frsize
        } else {
            stat.f_bsize
        };
        Ok(Capacity::from_blocks(
            block_size,
            stat.f_blocks,
            stat.f_bavail,
        ))
    }

    #[cfg(not(unix))]
    fn capacity(&self, _path: &ResolvedPath) -> Result<Capacity, CapacityError> {
        Err(CapacityError::Unsupported)
    }
}

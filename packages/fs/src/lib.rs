//! # fsquery-fs
//!
//! Read-only filesystem inspection confined to a configured root.
//!
//! - [`RootFs`] maps logical paths into the configured root
//! - [`Inspector`] walks a resolved directory into [`FileRecord`]s
//! - [`CapacityProvider`] reports total and available space
//!
//! ## Example
//!
//! ```rust,no_run
//! use fsquery_fs::{Inspector, LocalInspector, RootFs};
//!
//! let rootfs = RootFs::new("/mnt/host");
//! let dir = rootfs.locate("/lib/firmware");
//! let listing = LocalInspector.list(&dir).unwrap();
//! println!("{} files under {}", listing.file_count, listing.directory);
//! ```

mod capacity;
mod error;
mod inspector;
mod record;
mod rootfs;
mod walk;

pub use capacity::{Capacity, CapacityProvider, StatvfsCapacity};
pub use error::{CapacityError, InspectError};
pub use inspector::{Inspector, LocalInspector};
pub use record::{FileRecord, ListingResult};
pub use rootfs::{resolve, ResolvedPath, RootFs};
pub use walk::{relative_name, Diagnostic, ListingVisitor, Walk};

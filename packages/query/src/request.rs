//! Builders for the canonical query paths, for clients of the dispatcher.

use fsquery_core::{Elem, Path};

use crate::classify::{
    DiskMetric, ListingKind, AVAILABLE_MB, COUNT, DIRECTORY_KEY, DISK_SPACE, FILENAME, FILES,
    FILESYSTEM, PATH_KEY, ROOT, TOTAL_MB,
};
use crate::error::QueryError;

fn rooted(resource: Elem) -> Path {
    Path::new(vec![Elem::new(ROOT[0]), Elem::new(ROOT[1]), resource])
}

/// `/sonic/system/<kind>[directory=<directory>]/files`
pub fn listing(kind: ListingKind, directory: &str) -> Result<Path, QueryError> {
    if directory.is_empty() {
        return Err(QueryError::missing(
            rooted(Elem::new(kind.resource_name())),
            DIRECTORY_KEY,
        ));
    }
    let resource = Elem::new(kind.resource_name()).with_key(DIRECTORY_KEY, directory);
    Ok(rooted(resource).child(Elem::new(FILES)))
}

/// `/sonic/system/<kind>[directory=<directory>]/files/count`
pub fn listing_count(kind: ListingKind, directory: &str) -> Result<Path, QueryError> {
    Ok(listing(kind, directory)?.child(Elem::new(COUNT)))
}

/// `/sonic/system/<kind>[directory=<directory>]/files/<filename>`
///
/// `filename` may name a nested entry such as `sub/c.bin`. The name `count`
/// is reserved for [`listing_count`] and refused here.
pub fn listing_file(
    kind: ListingKind,
    directory: &str,
    filename: &str,
) -> Result<Path, QueryError> {
    let base = listing(kind, directory)?;
    if filename.is_empty() {
        return Err(QueryError::missing(base, FILENAME));
    }
    if filename == COUNT {
        return Err(QueryError::invalid_shape(
            base,
            "'count' selects the entry count, not a file",
        ));
    }
    Ok(base.child(Elem::new(filename)))
}

/// `/sonic/system/filesystem[path=<fs_path>]/disk-space[/total-mb|/available-mb]`
pub fn disk_space(fs_path: &str, metric: DiskMetric) -> Result<Path, QueryError> {
    if fs_path.is_empty() {
        return Err(QueryError::missing(rooted(Elem::new(FILESYSTEM)), PATH_KEY));
    }
    let base = rooted(Elem::new(FILESYSTEM).with_key(PATH_KEY, fs_path))
        .child(Elem::new(DISK_SPACE));
    Ok(match metric {
        DiskMetric::Both => base,
        DiskMetric::Total => base.child(Elem::new(TOTAL_MB)),
        DiskMetric::Available => base.child(Elem::new(AVAILABLE_MB)),
    })
}

//! Routing of classified queries to their handlers.

use std::sync::Arc;

use fsquery_core::{Path, Value};
use fsquery_fs::{CapacityProvider, Inspector, LocalInspector, RootFs, StatvfsCapacity};

use crate::classify::{classify, DiskMetric, ListingKind, ResourceQuery, Selector};
use crate::config::Config;
use crate::error::QueryError;
use crate::response;

/// Model advertised for disk-space queries, always available.
pub const FILESYSTEM_MODEL: &str = "sonic-filesystem";
pub const MODEL_ORGANIZATION: &str = "SONiC";

/// A data model the dispatcher can answer for.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ModelInfo {
    pub name: &'static str,
    pub organization: &'static str,
}

/// One answered path of a multi-path get.
#[derive(Clone, Debug, PartialEq)]
pub struct Update {
    pub path: Path,
    pub value: Value,
}

/// Answers query paths against the local filesystem.
///
/// Holds only read-only state, so one dispatcher can be shared across
/// threads and serve requests in parallel.
#[derive(Clone)]
pub struct Dispatcher {
    config: Arc<Config>,
    rootfs: RootFs,
    inspector: Arc<dyn Inspector>,
    capacity: Arc<dyn CapacityProvider>,
}

impl Dispatcher {
    /// Dispatcher over the local filesystem.
    pub fn new(config: Config) -> Self {
        Self::with_backends(config, Arc::new(LocalInspector), Arc::new(StatvfsCapacity))
    }

    pub fn with_backends(
        config: Config,
        inspector: Arc<dyn Inspector>,
        capacity: Arc<dyn CapacityProvider>,
    ) -> Self {
        let rootfs = config.rootfs();
        Self {
            config: Arc::new(config),
            rootfs,
            inspector,
            capacity,
        }
    }

    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Classify `path` and run the matching handler.
    pub fn dispatch(&self, path: &Path) -> Result<Value, QueryError> {
        let query = classify(path)?;
        log::debug!("Dispatching {} as {:?}", path, query);

        let result = match &query {
            ResourceQuery::DiskSpace { fs_path, metric } => self.disk_space(fs_path, *metric),
            ResourceQuery::FileListing {
                kind,
                directory,
                selector,
            } => self.file_listing(*kind, directory, selector),
        };

        if let Err(err) = &result {
            log::error!("Failed to handle {}: {}", path, err);
        }
        result
    }

    /// Answer several paths, stopping at the first failure.
    pub fn get(&self, paths: &[Path]) -> Result<Vec<Update>, QueryError> {
        paths
            .iter()
            .map(|path| {
                Ok(Update {
                    path: path.clone(),
                    value: self.dispatch(path)?,
                })
            })
            .collect()
    }

    /// Models served with the current configuration.
    pub fn supported_models(&self) -> Vec<ModelInfo> {
        let mut models = vec![ModelInfo {
            name: FILESYSTEM_MODEL,
            organization: MODEL_ORGANIZATION,
        }];
        models.extend(
            ListingKind::ALL
                .into_iter()
                .filter(|kind| self.config.is_enabled(*kind))
                .map(|kind| ModelInfo {
                    name: kind.model_name(),
                    organization: MODEL_ORGANIZATION,
                }),
        );
        models
    }

    fn disk_space(&self, fs_path: &str, metric: DiskMetric) -> Result<Value, QueryError> {
        let target = self.rootfs.locate(fs_path);
        log::debug!(
            "Getting disk space for filesystem path: {} (resolved: {})",
            fs_path,
            target.concrete().display()
        );

        let capacity = self
            .capacity
            .capacity(&target)
            .map_err(|source| QueryError::Capacity {
                path: fs_path.to_string(),
                source,
            })?;
        Ok(response::disk_space(fs_path, metric, capacity))
    }

    fn file_listing(
        &self,
        kind: ListingKind,
        directory: &str,
        selector: &Selector,
    ) -> Result<Value, QueryError> {
        if !self.config.is_enabled(kind) {
            return Err(QueryError::PreconditionFailed {
                resource: kind.resource_name().to_string(),
            });
        }

        let target = self.rootfs.locate(directory);
        log::debug!("Listing {} files in directory: {}", kind, directory);

        Ok(match selector {
            Selector::Count => response::count(self.inspector.count(&target)?),
            Selector::List => response::listing(&self.inspector.list(&target)?)?,
            Selector::File(name) => {
                response::single_file(directory, &self.inspector.info(&target, name)?)?
            }
        })
    }
}

impl std::fmt::Debug for Dispatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Dispatcher")
            .field("config", &self.config)
            .field("rootfs", &self.rootfs)
            .finish_non_exhaustive()
    }
}

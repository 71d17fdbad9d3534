//! # fsquery-query
//!
//! Classification and dispatch of structured filesystem queries.
//!
//! A query is a [`Path`](fsquery_core::Path) such as
//! `/sonic/system/firmware[directory=/lib/firmware]/files/count`. The
//! [`Dispatcher`] classifies it into a [`ResourceQuery`], checks that the
//! resource is enabled, resolves the directory against the configured
//! rootfs and returns a [`Value`](fsquery_core::Value) for the transport to
//! encode.
//!
//! ## Example
//!
//! ```rust,no_run
//! use fsquery_query::{request, Config, Dispatcher, ListingKind};
//!
//! let config = Config::new("/mnt/host").enable(ListingKind::Firmware);
//! let dispatcher = Dispatcher::new(config);
//!
//! let path = request::listing_count(ListingKind::Firmware, "/lib/firmware").unwrap();
//! let count = dispatcher.dispatch(&path).unwrap();
//! println!("{}", serde_json::to_string(&count).unwrap());
//! ```

pub mod classify;
mod config;
mod dispatch;
mod error;
pub mod request;
pub mod response;

pub use classify::{classify, DiskMetric, ListingKind, ResourceQuery, Selector};
pub use config::{Config, ConfigError};
pub use dispatch::{Dispatcher, ModelInfo, Update, FILESYSTEM_MODEL, MODEL_ORGANIZATION};
pub use error::{QueryError, StatusCode};
pub use response::{DiskSpaceResponse, FileResponse};

//! fsquery core: the query path model and response values.
//!
//! - `Path`: an ordered sequence of `Elem`s, each a name plus keyed parameters
//! - `Value`: the generic structured value handlers return to the transport
//!
//! # Example
//!
//! ```rust
//! use fsquery_core::{Elem, Path};
//!
//! let path = Path::new(vec![
//!     Elem::new("sonic"),
//!     Elem::new("system"),
//!     Elem::new("firmware").with_key("directory", "/lib/firmware"),
//!     Elem::new("files"),
//! ]);
//! assert_eq!(path.to_string(), "/sonic/system/firmware[directory=/lib/firmware]/files");
//! ```

mod path;
mod value;

pub use path::{Elem, Path, PathError};
pub use value::Value;

//! Type-safe key-value persistence for the Larek storefront.
//!
//! The storefront core only needs "save/load this value under this key".
//! [`KeyValueStore`] is that seam; [`Cache`] layers JSON serialization on
//! top of any store.
//!
//! # Example
//!
//! ```rust
//! use larek_cache::{Cache, MemoryStore};
//! use std::rc::Rc;
//!
//! let cache = Cache::new(Rc::new(MemoryStore::new()));
//! cache.set("basket", &vec!["854cef69".to_string()]).unwrap();
//!
//! let ids: Option<Vec<String>> = cache.get("basket").unwrap();
//! assert_eq!(ids.unwrap().len(), 1);
//! ```

mod error;
mod file;
mod kv;
mod memory;

pub use error::CacheError;
pub use file::FileStore;
pub use kv::{Cache, KeyValueStore};
pub use memory::MemoryStore;

/// Prelude for convenient imports.
pub mod prelude {
    pub use crate::{Cache, CacheError, FileStore, KeyValueStore, MemoryStore};
}

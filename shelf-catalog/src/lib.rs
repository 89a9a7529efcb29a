//! Metadata catalog: the public slug → title list used to give library
//! folders their proper display names.
//!
//! The list is downloaded from a public HTTP endpoint and cached as a JSON
//! file; [`cache::ensure_fresh`] refreshes it once it is older than the
//! configured interval and falls back to the stale copy when the download
//! fails.

pub mod cache;
pub mod catalog;
pub mod error;

pub use cache::{CacheInfo, clear, default_cache_path, ensure_fresh, fetch, info, is_stale};
pub use catalog::MetadataCatalog;
pub use error::CatalogError;

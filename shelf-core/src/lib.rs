//! Pure naming rules for the game library: folder-name normalization,
//! parenthesized tag parsing, and duplicate detection.
//!
//! Nothing in this crate touches the filesystem or the network. The
//! sweeping, transferring and remote reconciliation built on top of these
//! rules live in `shelf-lib`, `shelf-torrent` and `shelf-romm`.

pub mod duplicates;
pub mod normalize;
pub mod retry;
pub mod tags;
pub mod util;

use serde::{Deserialize, Serialize};

pub use duplicates::{DuplicateGroup, find_duplicates};
pub use normalize::{NormalizeOptions, Normalizer, catalog_slug, normalize_name, strip_trademarks};
pub use retry::RetryPolicy;
pub use tags::{base_name, is_catalog_id, numeric_tag, tag};

/// One record of the metadata catalog: a slug and its display title.
///
/// The public catalog carries many more fields per game; only these two
/// are needed for name lookups, the rest are ignored on deserialization.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CatalogTitle {
    pub slug: String,
    pub title: String,
}

impl CatalogTitle {
    pub fn new(slug: impl Into<String>, title: impl Into<String>) -> Self {
        Self {
            slug: slug.into(),
            title: title.into(),
        }
    }
}

use std::fs;
use std::path::Path;

use serde::Deserialize;
use shelf_core::CatalogTitle;
use shelf_core::normalize::lookup_title;

use crate::error::CatalogError;

/// An in-memory snapshot of the metadata catalog.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MetadataCatalog {
    pub entries: Vec<CatalogTitle>,
}

/// A record as published. Records lacking a slug or a title are skipped.
#[derive(Debug, Deserialize)]
struct RawRecord {
    #[serde(default)]
    slug: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

impl MetadataCatalog {
    pub fn new(entries: Vec<CatalogTitle>) -> Self {
        Self { entries }
    }

    /// Parse the catalog from its JSON array form.
    pub fn from_json(json: &str) -> Result<Self, CatalogError> {
        let records: Vec<RawRecord> = serde_json::from_str(json)?;
        let entries = records
            .into_iter()
            .filter_map(|r| match (r.slug, r.title) {
                (Some(slug), Some(title)) if !slug.is_empty() && !title.is_empty() => {
                    Some(CatalogTitle { slug, title })
                }
                _ => None,
            })
            .collect();
        Ok(Self { entries })
    }

    /// Load a cached catalog file.
    pub fn load(path: &Path) -> Result<Self, CatalogError> {
        if !path.exists() {
            return Err(CatalogError::cache(format!(
                "Catalog file not found: {}",
                path.display()
            )));
        }
        let contents = fs::read_to_string(path)?;
        Self::from_json(&contents)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Title for a folder slug: exact match first, then substring match.
    pub fn lookup(&self, slug: &str) -> Option<&str> {
        lookup_title(&self.entries, slug)
    }

    pub fn titles(&self) -> &[CatalogTitle] {
        &self.entries
    }
}

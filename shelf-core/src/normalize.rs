//! Folder-name normalization.
//!
//! Download folders arrive as underscored slugs with platform markers and a
//! trailing catalog id:
//! ```text
//! stalker_2_heart_of_chornobyl_windows_gog_(83415)
//! ```
//! and leave as display names:
//! ```text
//! Stalker 2 Heart Of Chornobyl (Windows) (GOG)
//! ```
//! When a metadata catalog snapshot is available, a matching catalog title
//! replaces the locally derived name entirely.

use crate::CatalogTitle;
use crate::tags::{is_catalog_id, tag};

/// Platform markers and the tag each one becomes, applied in this order.
const PLATFORM_MARKERS: &[(&str, &str)] = &[("_gog", "GOG"), ("_windows", "Windows")];

/// Markers that end the catalog slug portion of a raw folder name.
const SLUG_MARKERS: &[&str] = &["_windows_gog_", "_gog_", "_windows_"];

/// Platform suffixes stripped from a raw name that has no slug marker.
const SLUG_SUFFIXES: &[&str] = &["_windows_gog", "_gog", "_windows"];

const TRADEMARK_GLYPHS: &[char] = &['©', '®', '™'];

/// Which optional normalization steps run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct NormalizeOptions {
    /// Turn `_gog` / `_windows` markers into `(GOG)` / `(Windows)` tags.
    pub insert_platform_tags: bool,
    /// Drop `(NNNNN)` catalog id tokens.
    pub strip_catalog_ids: bool,
}

impl Default for NormalizeOptions {
    fn default() -> Self {
        Self {
            insert_platform_tags: true,
            strip_catalog_ids: true,
        }
    }
}

impl NormalizeOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_platform_tags(mut self, enabled: bool) -> Self {
        self.insert_platform_tags = enabled;
        self
    }

    pub fn strip_catalog_ids(mut self, enabled: bool) -> Self {
        self.strip_catalog_ids = enabled;
        self
    }
}

/// Normalize a raw folder name without catalog assistance.
///
/// Total over any input; the empty string maps to itself.
pub fn normalize_name(raw: &str, options: &NormalizeOptions) -> String {
    let mut name = raw.to_string();

    if options.insert_platform_tags {
        for (marker, label) in PLATFORM_MARKERS {
            let annotation = tag(Some(label)).unwrap_or_default();
            name = name.replace(marker, &annotation);
        }
    }

    let name = name.replace('_', " ");

    name.split_whitespace()
        .filter(|token| !(options.strip_catalog_ids && is_catalog_id(token)))
        .map(capitalize_token)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Uppercase the first letter of a token and lowercase the rest;
/// parenthetical tags pass through.
fn capitalize_token(token: &str) -> String {
    if token.starts_with('(') || token.ends_with(')') {
        return token.to_string();
    }
    let mut chars = token.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// The catalog lookup key for a raw folder name.
///
/// - `"stalker_2_windows_gog_(83415)"` → `"stalker_2"`
/// - `"stalker_2_gog"` → `"stalker_2"`
/// - `"stalker_2"` → `"stalker_2"`
pub fn catalog_slug(raw: &str) -> &str {
    for marker in SLUG_MARKERS {
        if let Some(pos) = raw.find(marker) {
            return &raw[..pos];
        }
    }

    let mut slug = raw;
    if let Some(pos) = slug.rfind("_(") {
        if is_catalog_id(&slug[pos + 1..]) {
            slug = &slug[..pos];
        }
    }
    for suffix in SLUG_SUFFIXES {
        if let Some(stripped) = slug.strip_suffix(suffix) {
            return stripped;
        }
    }
    slug
}

/// Remove `©`, `®` and `™` and collapse the whitespace left behind.
pub fn strip_trademarks(s: &str) -> String {
    s.replace(TRADEMARK_GLYPHS, "")
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
}

/// Find the catalog title for a slug.
///
/// An exact slug match wins. Otherwise the longest catalog slug contained
/// in `slug` is used, ties going to the earlier catalog record.
pub fn lookup_title<'c>(catalog: &'c [CatalogTitle], slug: &str) -> Option<&'c str> {
    if slug.is_empty() {
        return None;
    }
    if let Some(exact) = catalog.iter().find(|entry| entry.slug == slug) {
        return Some(&exact.title);
    }

    let mut best: Option<&CatalogTitle> = None;
    for entry in catalog {
        if entry.slug.is_empty() || !slug.contains(entry.slug.as_str()) {
            continue;
        }
        if best.is_none_or(|b| entry.slug.len() > b.slug.len()) {
            best = Some(entry);
        }
    }
    best.map(|entry| entry.title.as_str())
}

/// Keep a catalog title usable as a single path component.
fn path_safe(title: &str) -> String {
    title.replace(['/', '\\'], "-")
}

/// The folder name a catalog title becomes.
fn display_title(title: &str) -> String {
    path_safe(&strip_trademarks(title))
}

/// Folder-name normalizer with optional catalog assistance.
#[derive(Debug, Clone, Copy, Default)]
pub struct Normalizer<'a> {
    options: NormalizeOptions,
    catalog: Option<&'a [CatalogTitle]>,
}

impl<'a> Normalizer<'a> {
    pub fn new(options: NormalizeOptions) -> Self {
        Self {
            options,
            catalog: None,
        }
    }

    /// Attach a catalog snapshot. An empty snapshot disables lookups.
    pub fn with_catalog(mut self, catalog: &'a [CatalogTitle]) -> Self {
        self.catalog = if catalog.is_empty() {
            None
        } else {
            Some(catalog)
        };
        self
    }

    pub fn options(&self) -> &NormalizeOptions {
        &self.options
    }

    pub fn has_catalog(&self) -> bool {
        self.catalog.is_some()
    }

    /// Whether `name` is still a raw download name. Names without
    /// underscores are display names already, and so is any name that is
    /// exactly a catalog title.
    pub fn needs_normalizing(&self, name: &str) -> bool {
        if !name.contains('_') {
            return false;
        }
        !self
            .catalog
            .is_some_and(|catalog| catalog.iter().any(|e| display_title(&e.title) == name))
    }

    /// Normalize a raw folder name.
    pub fn normalize(&self, raw: &str) -> String {
        let local = normalize_name(raw, &self.options);

        let Some(catalog) = self.catalog else {
            return local;
        };
        match lookup_title(catalog, catalog_slug(raw)) {
            Some(title) => {
                let cleaned = display_title(title);
                if cleaned.is_empty() { local } else { cleaned }
            }
            None => local,
        }
    }
}

#[cfg(test)]
#[path = "tests/normalize_tests.rs"]
mod tests;

use serde::Deserialize;

/// A file belonging to a catalog entry.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct RomFile {
    pub file_name: String,
    #[serde(default)]
    pub file_size_bytes: u64,
}

/// A catalog entry as returned by `/api/roms`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct CatalogItem {
    pub id: u64,
    #[serde(default)]
    pub name: Option<String>,
    #[serde(default)]
    pub fs_name: String,
    #[serde(default)]
    pub fs_size_bytes: u64,
    #[serde(default)]
    pub platform_id: Option<u64>,
    #[serde(default)]
    pub files: Vec<RomFile>,
}

impl CatalogItem {
    /// Display name, falling back to the on-disk name when unmatched.
    pub fn display_name(&self) -> &str {
        match self.name.as_deref() {
            Some(name) if !name.is_empty() => name,
            _ => &self.fs_name,
        }
    }

    /// Whether any file name ends with `extension` (case-insensitive).
    pub fn has_file_with_extension(&self, extension: &str) -> bool {
        let ext = extension.to_lowercase();
        self.files
            .iter()
            .any(|f| f.file_name.to_lowercase().ends_with(&ext))
    }
}

/// One page of `/api/roms`.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RomPage {
    #[serde(default)]
    pub items: Vec<CatalogItem>,
    #[serde(default)]
    pub total: Option<u64>,
    #[serde(default)]
    pub limit: Option<u64>,
    #[serde(default)]
    pub offset: Option<u64>,
}

/// Older servers return a bare array instead of a page object.
#[derive(Debug, Deserialize)]
#[serde(untagged)]
pub(crate) enum RomListing {
    Page(RomPage),
    Items(Vec<CatalogItem>),
}

impl From<RomListing> for RomPage {
    fn from(listing: RomListing) -> Self {
        match listing {
            RomListing::Page(page) => page,
            RomListing::Items(items) => RomPage {
                total: Some(items.len() as u64),
                items,
                ..Default::default()
            },
        }
    }
}

/// A platform as returned by `/api/platforms`.
#[derive(Debug, Clone, Deserialize)]
pub struct Platform {
    pub id: u64,
    #[serde(default)]
    pub slug: String,
    #[serde(default)]
    pub fs_slug: String,
    #[serde(default)]
    pub name: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDir {
    #[default]
    Asc,
    Desc,
}

impl OrderDir {
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Asc => "asc",
            Self::Desc => "desc",
        }
    }
}

/// Filter and paging parameters for `/api/roms`.
#[derive(Debug, Clone)]
pub struct RomQuery {
    pub platform_id: Option<u64>,
    pub limit: u32,
    pub offset: u64,
    pub order_by: String,
    pub order_dir: OrderDir,
    pub group_by_meta_id: bool,
}

impl Default for RomQuery {
    fn default() -> Self {
        Self {
            platform_id: None,
            limit: 250,
            offset: 0,
            order_by: "fs_size_bytes".to_string(),
            order_dir: OrderDir::Asc,
            group_by_meta_id: true,
        }
    }
}

impl RomQuery {
    pub fn platform(mut self, platform_id: Option<u64>) -> Self {
        self.platform_id = platform_id;
        self
    }

    pub fn limit(mut self, limit: u32) -> Self {
        self.limit = limit;
        self
    }

    pub fn offset(mut self, offset: u64) -> Self {
        self.offset = offset;
        self
    }

    /// Query string pairs, as sent to the server.
    pub fn to_params(&self) -> Vec<(&'static str, String)> {
        let mut params = vec![
            ("limit", self.limit.to_string()),
            ("offset", self.offset.to_string()),
            ("order_by", self.order_by.clone()),
            ("order_dir", self.order_dir.as_str().to_string()),
            ("group_by_meta_id", self.group_by_meta_id.to_string()),
        ];
        if let Some(id) = self.platform_id {
            params.push(("platform_id", id.to_string()));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_page_object() {
        let json = r#"{
            "items": [{"id": 1, "name": null, "fs_name": "game_a", "fs_size_bytes": 0, "files": []}],
            "total": 1, "limit": 50, "offset": 0
        }"#;
        let page: RomPage = serde_json::from_str::<RomListing>(json).unwrap().into();
        assert_eq!(page.items.len(), 1);
        assert_eq!(page.items[0].display_name(), "game_a");
        assert_eq!(page.total, Some(1));
    }

    #[test]
    fn parses_bare_array() {
        let json = r#"[{"id": 7, "name": "Game", "files": [{"file_name": "setup.exe"}]}]"#;
        let page: RomPage = serde_json::from_str::<RomListing>(json).unwrap().into();
        assert_eq!(page.items[0].id, 7);
        assert_eq!(page.total, Some(1));
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let item = CatalogItem {
            id: 1,
            files: vec![RomFile {
                file_name: "SETUP.EXE".to_string(),
                file_size_bytes: 10,
            }],
            ..Default::default()
        };
        assert!(item.has_file_with_extension(".exe"));
        assert!(!item.has_file_with_extension(".bat"));
    }

    #[test]
    fn query_params() {
        let params = RomQuery::default().platform(Some(3)).offset(500).to_params();
        assert!(params.contains(&("platform_id", "3".to_string())));
        assert!(params.contains(&("offset", "500".to_string())));
        assert!(params.contains(&("order_by", "fs_size_bytes".to_string())));
        assert!(params.contains(&("group_by_meta_id", "true".to_string())));
    }
}

//! Duplicate detection across library folder names.
//!
//! Two folders are duplicates when their names agree once every
//! parenthesized tag is removed. Within a group the folder carrying the
//! highest numeric tag survives; a folder without one ranks as 0.

use std::collections::BTreeMap;

use crate::tags::{base_name, numeric_tag};

/// Folders sharing one base name.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DuplicateGroup {
    pub base_name: String,
    /// The folder that is kept.
    pub survivor: String,
    /// Every other member, lowest rank first.
    pub superseded: Vec<String>,
}

/// Group names by base name and pick a survivor for each group of two or more.
///
/// Members are ordered by numeric tag, then by name, so the result never
/// depends on the order the names were listed in. Names whose base name is
/// empty (a folder named only by tags) are never grouped.
pub fn find_duplicates<S: AsRef<str>>(names: &[S]) -> Vec<DuplicateGroup> {
    let mut groups: BTreeMap<String, Vec<&str>> = BTreeMap::new();
    for name in names {
        let name = name.as_ref();
        let base = base_name(name);
        if base.is_empty() {
            continue;
        }
        groups.entry(base).or_default().push(name);
    }

    groups
        .into_iter()
        .filter(|(_, members)| members.len() > 1)
        .filter_map(|(base_name, mut members)| {
            members.sort_by(|a, b| rank(a).cmp(&rank(b)).then_with(|| a.cmp(b)));
            let survivor = members.pop()?.to_string();
            Some(DuplicateGroup {
                base_name,
                survivor,
                superseded: members.into_iter().map(str::to_string).collect(),
            })
        })
        .collect()
}

fn rank(name: &str) -> u64 {
    numeric_tag(name).unwrap_or(0)
}

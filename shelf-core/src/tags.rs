//! Parenthesized tag utilities.
//!
//! Library folder names carry their annotations as trailing parenthesized
//! tags, e.g. `Stalker 2 (Windows) (GOG) (83415)`. The helpers here build
//! such tags and take them apart again.

/// Width of a volatile catalog id tag such as `(83415)`, parentheses included.
pub const CATALOG_ID_WIDTH: usize = 7;

/// Format a value as a name annotation: `Some("GOG")` → `" (GOG)"`.
///
/// Empty or absent values produce no annotation.
pub fn tag(value: Option<&str>) -> Option<String> {
    match value {
        Some(v) if !v.is_empty() => Some(format!(" ({v})")),
        _ => None,
    }
}

/// Returns true for a token that is exactly `(` + 5 digits + `)`.
pub fn is_catalog_id(token: &str) -> bool {
    token.len() == CATALOG_ID_WIDTH
        && token.starts_with('(')
        && token.ends_with(')')
        && token[1..CATALOG_ID_WIDTH - 1]
            .bytes()
            .all(|b| b.is_ascii_digit())
}

/// Strip every balanced `( … )` group from a name and collapse whitespace.
///
/// Examples:
/// - `"Game (Windows) (GOG) (83415)"` → `"Game"`
/// - `"Game (Deluxe Edition) 2"` → `"Game 2"`
///
/// An unclosed `(` swallows the rest of the name.
pub fn base_name(name: &str) -> String {
    let mut out = String::with_capacity(name.len());
    let mut depth = 0u32;
    for ch in name.chars() {
        match ch {
            '(' => depth += 1,
            ')' if depth > 0 => depth -= 1,
            _ if depth == 0 => out.push(ch),
            _ => {}
        }
    }
    out.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Integer inside the last all-digit parenthesized group of a name.
///
/// - `"Game (Windows) (83415)"` → `Some(83415)`
/// - `"Game (GOG)"` → `None`
pub fn numeric_tag(name: &str) -> Option<u64> {
    paren_groups(name)
        .filter(|g| !g.is_empty() && g.bytes().all(|b| b.is_ascii_digit()))
        .last()
        .and_then(|g| g.parse().ok())
}

/// Iterate the contents of top-level `( … )` groups, left to right.
fn paren_groups(name: &str) -> impl Iterator<Item = &str> {
    let mut groups = Vec::new();
    let mut depth = 0u32;
    let mut start = 0;
    for (i, ch) in name.char_indices() {
        match ch {
            '(' => {
                if depth == 0 {
                    start = i + 1;
                }
                depth += 1;
            }
            ')' if depth > 0 => {
                depth -= 1;
                if depth == 0 {
                    groups.push(&name[start..i]);
                }
            }
            _ => {}
        }
    }
    groups.into_iter()
}

#[cfg(test)]
#[path = "tests/tags_tests.rs"]
mod tests;

use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};

use shelf_core::Normalizer;

/// A planned folder rename.
#[derive(Debug, Clone)]
pub struct RenameAction {
    /// Current folder path
    pub source: PathBuf,
    /// Target folder path (same parent, normalized name)
    pub target: PathBuf,
    pub new_name: String,
}

/// Result of planning renames for one root.
#[derive(Debug, Default)]
pub struct RenamePlan {
    pub renames: Vec<RenameAction>,
    pub already_correct: Vec<PathBuf>,
    pub conflicts: Vec<(PathBuf, String)>,
}

/// Summary of an executed rename plan.
#[derive(Debug, Clone, Default)]
pub struct RenameSummary {
    pub renamed: usize,
    pub already_correct: usize,
    pub errors: Vec<String>,
    pub conflicts: Vec<String>,
}

/// Plan renames for every top-level folder of `root`.
///
/// Only raw download names are renamed; display names, including catalog
/// titles, count as already correct. Folders that would collide, with each other or with an existing folder,
/// are reported as conflicts and left out of the plan.
pub fn plan_renames(root: &Path, normalizer: &Normalizer<'_>) -> std::io::Result<RenamePlan> {
    let mut folders: Vec<PathBuf> = fs::read_dir(root)?
        .filter_map(|e| e.ok())
        .filter(|e| e.file_type().map(|t| t.is_dir()).unwrap_or(false))
        .map(|e| e.path())
        .collect();
    folders.sort();

    let mut plan = RenamePlan::default();
    let mut candidates = Vec::new();

    for folder in folders {
        let Some(name) = folder.file_name().and_then(|n| n.to_str()) else {
            plan.conflicts.push((
                folder.clone(),
                format!("Folder name is not valid UTF-8: {}", folder.display()),
            ));
            continue;
        };
        if !normalizer.needs_normalizing(name) {
            plan.already_correct.push(folder);
            continue;
        }
        let new_name = normalizer.normalize(name);
        if new_name.is_empty() {
            plan.conflicts
                .push((folder.clone(), format!("{name:?} normalizes to an empty name")));
        } else if new_name == name {
            plan.already_correct.push(folder);
        } else {
            candidates.push(RenameAction {
                target: root.join(&new_name),
                source: folder,
                new_name,
            });
        }
    }

    // Multiple folders mapping to the same target
    let mut target_map: HashMap<PathBuf, Vec<usize>> = HashMap::new();
    for (i, action) in candidates.iter().enumerate() {
        target_map.entry(action.target.clone()).or_default().push(i);
    }

    for (i, action) in candidates.iter().enumerate() {
        let siblings = &target_map[&action.target];
        if siblings.len() > 1 {
            if siblings[0] == i {
                let names: Vec<String> = siblings
                    .iter()
                    .map(|&j| display_name(&candidates[j].source))
                    .collect();
                plan.conflicts.push((
                    action.target.clone(),
                    format!("Multiple folders map to {:?}: {}", action.new_name, names.join(", ")),
                ));
            }
            continue;
        }
        if action.target.exists() && !is_case_only(&action.source, &action.target) {
            plan.conflicts.push((
                action.target.clone(),
                format!(
                    "{:?} -> {:?}: target already exists",
                    display_name(&action.source),
                    action.new_name
                ),
            ));
            continue;
        }
        plan.renames.push(action.clone());
    }

    Ok(plan)
}

/// Execute a rename plan. Failures are collected, never fatal.
pub fn execute_renames(plan: &RenamePlan) -> RenameSummary {
    let mut summary = RenameSummary {
        already_correct: plan.already_correct.len(),
        ..Default::default()
    };

    for (_, msg) in &plan.conflicts {
        summary.conflicts.push(msg.clone());
    }

    for rename in &plan.renames {
        if rename.target.exists() && !is_case_only(&rename.source, &rename.target) {
            summary
                .errors
                .push(format!("Target already exists: {}", rename.target.display()));
            continue;
        }

        match fs::rename(&rename.source, &rename.target) {
            Ok(()) => {
                log::info!(
                    "Renamed {:?} -> {:?}",
                    display_name(&rename.source),
                    rename.new_name
                );
                summary.renamed += 1;
            }
            Err(e) => {
                summary.errors.push(format!(
                    "Failed to rename {:?} -> {:?}: {}",
                    display_name(&rename.source),
                    rename.new_name,
                    e,
                ));
            }
        }
    }

    summary
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

/// On case-insensitive filesystems `Game` already "exists" as `game`.
fn is_case_only(source: &Path, target: &Path) -> bool {
    display_name(source).to_lowercase() == display_name(target).to_lowercase()
}

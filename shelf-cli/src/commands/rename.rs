use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_core::Normalizer;
use shelf_lib::{Settings, execute_renames, load_catalog, plan_renames};

use crate::error::CliError;

pub(crate) fn run_rename(settings: &Settings, dry_run: bool) -> Result<(), CliError> {
    let root = &settings.admin.library_root;
    log::info!(
        "Renaming folders in: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if dry_run {
        log::info!(
            "{}",
            "Dry run: no folders will be renamed".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let catalog = load_catalog(settings);
    let titles = catalog.as_ref().map(|c| c.titles()).unwrap_or_default();
    let normalizer = Normalizer::new(settings.normalize_options()).with_catalog(titles);

    let plan = plan_renames(root, &normalizer)?;

    for action in &plan.renames {
        log::info!(
            "  {} {} {}",
            action
                .source
                .file_name()
                .unwrap_or_default()
                .to_string_lossy()
                .if_supports_color(Stdout, |t| t.dimmed()),
            "\u{2192}".if_supports_color(Stdout, |t| t.dimmed()),
            action.new_name.if_supports_color(Stdout, |t| t.bold()),
        );
    }
    for (_, msg) in &plan.conflicts {
        log::warn!(
            "  {} {}",
            "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
            msg,
        );
    }

    if dry_run {
        log::info!("");
        log::info!(
            "{} to rename, {} already correct, {} conflicts",
            plan.renames.len(),
            plan.already_correct.len(),
            plan.conflicts.len(),
        );
        return Ok(());
    }

    let summary = execute_renames(&plan);
    for err in &summary.errors {
        log::warn!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            err,
        );
    }
    log::info!("");
    log::info!(
        "{} renamed, {} already correct, {} conflicts, {} errors",
        summary.renamed.if_supports_color(Stdout, |t| t.green()),
        summary.already_correct,
        summary.conflicts.len(),
        summary.errors.len(),
    );
    Ok(())
}

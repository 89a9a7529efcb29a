use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_core::util::format_bytes_approx;
use shelf_lib::{CleanupOptions, Settings, run_cleanup};

pub(crate) fn run_clean(settings: &Settings, dry_run: bool) {
    let root = &settings.admin.library_root;
    log::info!(
        "Cleaning library: {}",
        root.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    if dry_run {
        log::info!(
            "{}",
            "Dry run: nothing will be deleted".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let options = CleanupOptions::from(&settings.cleanup).dry_run(dry_run);
    let report = run_cleanup(root, &options);

    for err in &report.errors {
        log::warn!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            err,
        );
    }
    log::info!("");
    log::info!(
        "{} {} files, {} empty folders, {} duplicates{} ({})",
        if dry_run { "Would remove" } else { "Removed" },
        report.files_removed,
        report.dirs_removed,
        report.duplicates_removed,
        if report.errors.is_empty() {
            String::new()
        } else {
            format!(", {} errors", report.errors.len())
        },
        format_bytes_approx(report.bytes_freed).if_supports_color(Stdout, |t| t.bold()),
    );
}

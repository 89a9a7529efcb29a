use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_lib::Settings;
use shelf_romm::{PassAction, RommClient, reconcile};

use crate::error::CliError;

pub(crate) fn run_reconcile(settings: &Settings, dry_run: bool) -> Result<(), CliError> {
    if !settings.romm.enabled {
        log::warn!("RomM is disabled in settings; running anyway");
    }
    let client = RommClient::new(&settings.romm_config())?;
    let options = settings.reconcile_options(dry_run);

    log::info!(
        "Reconciling RomM catalog at {}",
        settings.romm.url.if_supports_color(Stdout, |t| t.cyan()),
    );
    if dry_run {
        log::info!(
            "{}",
            "Dry run: nothing will be deleted".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }
    log::info!("");

    let report = reconcile(&client, &options);

    log::info!("");
    for pass in &report.passes {
        let action = match pass.action {
            PassAction::Delete => "delete",
            PassAction::Log => "log",
            PassAction::Off => "off",
        };
        match &pass.error {
            Some(err) => log::warn!(
                "  {} {}: {} flagged, delete failed: {}",
                "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                pass.pass,
                pass.flagged.len(),
                err,
            ),
            None => log::info!(
                "  {:<20} {} flagged, {} deleted [{}]",
                pass.pass.to_string(),
                pass.flagged.len(),
                pass.deleted,
                action.if_supports_color(Stdout, |t| t.dimmed()),
            ),
        }
    }
    log::info!(
        "{} entries scanned, {} deleted",
        report.items_scanned,
        report.total_deleted().if_supports_color(Stdout, |t| t.bold()),
    );
    Ok(())
}

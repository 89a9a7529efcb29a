use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_core::Normalizer;
use shelf_lib::{PipelineError, Settings, load_catalog, transfer_completed, transfer_staging};
use shelf_torrent::QbitClient;

use crate::error::CliError;

pub(crate) fn run_transfer(settings: &Settings) -> Result<(), CliError> {
    let catalog = load_catalog(settings);
    let titles = catalog.as_ref().map(|c| c.titles()).unwrap_or_default();
    let normalizer = Normalizer::new(settings.normalize_options()).with_catalog(titles);
    let options = settings.transfer_options();

    let summary = if settings.qbittorrent.enabled {
        let client = QbitClient::login(&settings.qbit_config()).map_err(PipelineError::from)?;
        transfer_completed(&client, &options, &normalizer).map_err(PipelineError::from)?
    } else {
        log::info!(
            "{}",
            "qBittorrent disabled: moving everything in the staging area"
                .if_supports_color(Stdout, |t| t.dimmed()),
        );
        transfer_staging(&options, &normalizer)
    };

    for err in &summary.errors {
        log::warn!(
            "  {} {}",
            "\u{2718}".if_supports_color(Stdout, |t| t.red()),
            err,
        );
    }
    log::info!(
        "{} moved, {} failed, {} torrent records removed",
        summary.moved.if_supports_color(Stdout, |t| t.green()),
        summary.failed,
        summary.forgotten,
    );
    Ok(())
}

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_core::util::format_bytes_approx;
use shelf_lib::Settings;

use crate::error::CliError;
use crate::spinner::spinner;

/// Download the metadata catalog now.
pub(crate) fn run_cache_fetch(settings: &Settings, quiet: bool) -> Result<(), CliError> {
    let gog = &settings.gog;
    let pb = spinner(quiet, &format!("Downloading {}", gog.all_games_url));
    let result = shelf_catalog::fetch(&gog.all_games_url, &gog.all_games_file);
    pb.finish_and_clear();

    let catalog = result?;
    log::info!(
        "{} Cached {} titles to {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        catalog.len(),
        gog.all_games_file
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

/// Describe the cached catalog.
pub(crate) fn run_cache_info(settings: &Settings) -> Result<(), CliError> {
    let gog = &settings.gog;
    let Some(info) = shelf_catalog::info(&gog.all_games_file)? else {
        log::info!(
            "{}",
            "No cached metadata catalog.".if_supports_color(Stdout, |t| t.dimmed()),
        );
        log::info!("Run 'shelf cache fetch' to download it.");
        return Ok(());
    };

    let stale = shelf_catalog::is_stale(&info.path, gog.cache_refresh_hours);
    log::info!(
        "{}",
        "Metadata catalog".if_supports_color(Stdout, |t| t.bold()),
    );
    log::info!(
        "  Path:     {}",
        info.path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!("  Titles:   {}", info.entries);
    log::info!("  Size:     {}", format_bytes_approx(info.file_size));
    log::info!(
        "  Updated:  {} {}",
        info.modified.format("%Y-%m-%d %H:%M"),
        if stale {
            format!("{}", "(stale)".if_supports_color(Stdout, |t| t.yellow()))
        } else {
            format!("{}", "(fresh)".if_supports_color(Stdout, |t| t.green()))
        },
    );
    log::info!("  Refresh:  every {}h", gog.cache_refresh_hours);
    Ok(())
}

/// Delete the cached catalog.
pub(crate) fn run_cache_clear(settings: &Settings) -> Result<(), CliError> {
    let freed = shelf_catalog::clear(&settings.gog.all_games_file)?;
    log::info!(
        "{} Cache cleared ({} freed)",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        format_bytes_approx(freed),
    );
    Ok(())
}

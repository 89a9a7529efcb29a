use std::path::Path;

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_lib::{Settings, save_default};
use shelf_romm::RommClient;
use shelf_torrent::QbitClient;

use crate::error::CliError;
use crate::spinner::spinner;

/// Print the effective settings with passwords masked.
pub(crate) fn run_config_show(settings: &Settings, path: &Path) -> Result<(), CliError> {
    log::info!(
        "Settings file: {} {}",
        path.display().if_supports_color(Stdout, |t| t.cyan()),
        if path.exists() {
            format!("{}", "(exists)".if_supports_color(Stdout, |t| t.green()))
        } else {
            format!("{}", "(not found, using defaults)".if_supports_color(Stdout, |t| t.dimmed()))
        },
    );
    log::info!("");
    log::info!("{}", settings.redacted().to_toml_string()?);
    Ok(())
}

pub(crate) fn run_config_path(path: &Path) {
    log::info!("{}", path.display());
}

/// Write a starter settings file.
pub(crate) fn run_config_init(path: &Path, force: bool) -> Result<(), CliError> {
    if path.exists() && !force {
        return Err(CliError::config(format!(
            "{} already exists (use --force to overwrite)",
            path.display()
        )));
    }
    save_default(path)?;
    log::info!(
        "{} Wrote {}",
        "\u{2714}".if_supports_color(Stdout, |t| t.green()),
        path.display().if_supports_color(Stdout, |t| t.cyan()),
    );
    Ok(())
}

/// Check both remote services. Fails if any enabled service is unreachable.
pub(crate) fn run_config_test(settings: &Settings, quiet: bool) -> Result<(), CliError> {
    let mut failures = 0;

    if settings.qbittorrent.enabled {
        let cfg = settings.qbit_config();
        let pb = spinner(
            quiet,
            &format!("Connecting to qBittorrent at {}", cfg.base_url()),
        );
        let result = QbitClient::login(&cfg).and_then(|c| c.version());
        pb.finish_and_clear();
        match result {
            Ok(version) => log::info!(
                "{} qBittorrent {} at {}",
                "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                version,
                cfg.base_url(),
            ),
            Err(e) => {
                failures += 1;
                log::warn!(
                    "{} qBittorrent: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
            }
        }
    } else {
        log::info!(
            "{}",
            "qBittorrent: disabled".if_supports_color(Stdout, |t| t.dimmed()),
        );
    }

    if settings.romm.enabled {
        let pb = spinner(quiet, &format!("Connecting to RomM at {}", settings.romm.url));
        let result = RommClient::new(&settings.romm_config()).and_then(|c| {
            c.heartbeat()?;
            let platform = if settings.romm.platform_slug.is_empty() {
                None
            } else {
                c.platform_id_by_slug(&settings.romm.platform_slug)?
            };
            Ok(platform)
        });
        pb.finish_and_clear();
        match result {
            Ok(platform) => {
                log::info!(
                    "{} RomM at {}",
                    "\u{2714}".if_supports_color(Stdout, |t| t.green()),
                    settings.romm.url,
                );
                if platform.is_none() && !settings.romm.platform_slug.is_empty() {
                    log::warn!(
                        "  {} platform '{}' not found",
                        "\u{26A0}".if_supports_color(Stdout, |t| t.yellow()),
                        settings.romm.platform_slug,
                    );
                }
            }
            Err(e) => {
                failures += 1;
                log::warn!(
                    "{} RomM: {}",
                    "\u{2718}".if_supports_color(Stdout, |t| t.red()),
                    e,
                );
            }
        }
    } else {
        log::info!("{}", "RomM: disabled".if_supports_color(Stdout, |t| t.dimmed()));
    }

    if failures > 0 {
        return Err(CliError::config(format!("{failures} service check(s) failed")));
    }
    Ok(())
}

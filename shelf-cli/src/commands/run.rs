use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_lib::{Settings, run_cycle, run_forever};

use crate::error::CliError;

pub(crate) fn run_pipeline(settings: &Settings, once: bool) -> Result<(), CliError> {
    log::info!(
        "Library: {}",
        settings
            .admin
            .library_root
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );
    log::info!(
        "Staging: {}",
        settings
            .admin
            .staging_root
            .display()
            .if_supports_color(Stdout, |t| t.cyan()),
    );

    if once {
        let started = chrono::Local::now();
        run_cycle(settings)?;
        let elapsed = chrono::Local::now() - started;
        log::info!(
            "{} Cycle finished in {}s",
            "\u{2714}".if_supports_color(Stdout, |t| t.green()),
            elapsed.num_seconds(),
        );
        return Ok(());
    }

    log::info!(
        "Running every {}h{}",
        settings.admin.wait_time_hours.max(1),
        if settings.admin.on_startup {
            ", starting now"
        } else {
            ""
        },
    );
    run_forever(settings)?;
    Ok(())
}

use owo_colors::OwoColorize;
use owo_colors::Stream::Stdout;

use shelf_core::Normalizer;
use shelf_lib::{Settings, load_catalog};

pub(crate) fn run_normalize(settings: &Settings, names: &[String], offline: bool) {
    let catalog = if offline {
        None
    } else {
        load_catalog(settings)
    };
    let titles = catalog.as_ref().map(|c| c.titles()).unwrap_or_default();
    let normalizer = Normalizer::new(settings.normalize_options()).with_catalog(titles);

    for name in names {
        log::info!(
            "{} {} {}",
            name.if_supports_color(Stdout, |t| t.dimmed()),
            "\u{2192}".if_supports_color(Stdout, |t| t.dimmed()),
            normalizer.normalize(name).if_supports_color(Stdout, |t| t.bold()),
        );
    }
}

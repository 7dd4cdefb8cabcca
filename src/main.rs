use anyhow::{Context, Result};
use clap::Parser;
use fontbook::cli::Cli;
use fontbook::{commands, debug};
use fontbook_config::Config;

fn main() -> Result<()> {
    let cli = Cli::parse();

    // Route log::info!() etc. to the debug log file in the temp directory.
    // CLI --log-level flag takes highest precedence, then RUST_LOG, then config.
    debug::init_log_bridge(cli.log_level);

    let config = match &cli.config {
        Some(path) => Config::load_from(path)
            .with_context(|| format!("failed to load config {}", path.display()))?,
        None => Config::load().context("failed to load config")?,
    };
    debug::apply_config_level(config.log_level.to_level_filter());

    log::info!("Starting fontbook {}", fontbook::VERSION);

    let result = commands::run(&cli, &config);
    if let Err(ref e) = result {
        log::error!("fontbook failed: {e:#}");
        eprintln!("fontbook: error: {e:#}");
        if e.chain().any(|cause| {
            cause
                .downcast_ref::<fontbook_fonts::FontError>()
                .is_some_and(fontbook_fonts::FontError::is_fatal)
        }) {
            eprintln!("fontbook: hint: a registered font became unusable; try another family");
        }
    }
    result
}

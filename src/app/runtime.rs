use anyhow::Result;
use clap::Parser;
use tracing::debug;

use crate::app::{config_runtime, terminal};
use crate::cli::{Cli, Command};
use crate::{ProcessExit, app_config, commands};

pub(crate) async fn run_papers_dl() -> Result<ProcessExit> {
    let cli = Cli::parse();

    let loaded = app_config::load_config(cli.config.as_deref())?;
    let file_config = loaded.config.as_ref();

    let default_level = config_runtime::resolve_default_log_level(&cli, file_config);
    let force_cli_log_level = config_runtime::should_force_cli_log_level(&cli);
    terminal::init_tracing(
        default_level,
        force_cli_log_level,
        terminal::is_no_color_requested(),
    );

    debug!(
        config_path = ?loaded.path,
        loaded_from_file = loaded.loaded_from_file,
        verbosity = file_config
            .and_then(|config| config.verbosity)
            .map(|verbosity| verbosity.as_str()),
        "configuration resolved"
    );

    match &cli.command {
        Command::Parse(args) => commands::run_parse_command(args),
        Command::Fetch(args) => {
            let settings = config_runtime::resolve_fetch_settings(args, file_config);
            commands::run_fetch_command(args, &settings).await
        }
    }
}

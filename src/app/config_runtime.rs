use std::path::PathBuf;

use papers_dl_core::fetch::{CONNECT_TIMEOUT_SECS, READ_TIMEOUT_SECS};
use papers_dl_core::resolver::DEFAULT_MATCH_KINDS;
use papers_dl_core::{ClientOptions, IdKind, ProviderSettings, default_user_agent};

use crate::app_config::{FileConfig, VerbositySetting};
use crate::cli::{Cli, FetchArgs, match_kinds};

/// Effective settings for one `fetch` run, after merging CLI and file config.
#[derive(Debug, Clone)]
pub(crate) struct FetchSettings {
    pub(crate) output_dir: PathBuf,
    pub(crate) client: ClientOptions,
    pub(crate) providers: ProviderSettings,
    pub(crate) match_kinds: Vec<IdKind>,
}

/// CLI values win; file values fill the gaps; built-in defaults cover the rest.
pub(crate) fn resolve_fetch_settings(
    args: &FetchArgs,
    file_config: Option<&FileConfig>,
) -> FetchSettings {
    let empty = FileConfig::default();
    let file_config = file_config.unwrap_or(&empty);

    let output_dir = args
        .output_dir
        .clone()
        .or_else(|| file_config.output_dir.clone())
        .unwrap_or_else(|| PathBuf::from("."));

    let client = ClientOptions {
        user_agent: args
            .user_agent
            .clone()
            .or_else(|| file_config.user_agent.clone())
            .unwrap_or_else(default_user_agent),
        connect_timeout_secs: file_config
            .connect_timeout_secs
            .unwrap_or(CONNECT_TIMEOUT_SECS),
        read_timeout_secs: file_config.read_timeout_secs.unwrap_or(READ_TIMEOUT_SECS),
    };

    let mut providers = ProviderSettings::default();
    if let Some(kinds) = &file_config.providers {
        providers.providers.clone_from(kinds);
    }
    if let Some(base_url) = &file_config.scidb_base_url {
        providers.scidb_base_url.clone_from(base_url);
    }
    if let Some(mirrors) = &file_config.scihub_mirrors {
        providers.scihub_mirrors.clone_from(mirrors);
    }

    FetchSettings {
        output_dir,
        client,
        providers,
        match_kinds: match_kinds(&args.matches, &DEFAULT_MATCH_KINDS),
    }
}

pub(crate) fn resolve_default_log_level(cli: &Cli, file_config: Option<&FileConfig>) -> &'static str {
    if cli.quiet {
        return "error";
    }
    match cli.verbose {
        0 => {}
        1 => return "debug",
        _ => return "trace",
    }
    match file_config.and_then(|config| config.verbosity) {
        Some(VerbositySetting::Quiet) => "error",
        Some(VerbositySetting::Verbose) => "debug",
        Some(VerbositySetting::Debug) => "trace",
        Some(VerbositySetting::Default) | None => "info",
    }
}

pub(crate) fn should_force_cli_log_level(cli: &Cli) -> bool {
    cli.quiet || cli.verbose > 0
}

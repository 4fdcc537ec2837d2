//! `papers-dl fetch`: resolve queries and download their PDFs.

use std::fs;
use std::io::{self, IsTerminal, Read};

use anyhow::{Context, Result, bail};
use papers_dl_core::{
    BatchEntry, BatchOptions, BatchReport, Fetcher, HttpClient, IdentifierResolver,
    build_default_registry, read_queries, run_batch,
};
use tracing::{debug, info};

use crate::ProcessExit;
use crate::app::config_runtime::FetchSettings;
use crate::app::exit_handler;
use crate::cli::FetchArgs;

pub(crate) async fn run_fetch_command(
    args: &FetchArgs,
    settings: &FetchSettings,
) -> Result<ProcessExit> {
    let queries = collect_queries(args)?;
    if queries.is_empty() {
        info!("No queries given. Pass DOIs, PMIDs, ISBNs, or URLs as arguments or with --input.");
        return Ok(ProcessExit::Success);
    }
    if args.name.is_some() && queries.len() != 1 {
        bail!(
            "--name can only be used with a single query ({} given)",
            queries.len()
        );
    }

    let client = HttpClient::with_options(&settings.client).context("Failed to build HTTP client")?;
    let resolver =
        IdentifierResolver::new(client.clone()).with_match_kinds(settings.match_kinds.clone());
    let fetcher = Fetcher::new(client, build_default_registry(&settings.providers));
    debug!(
        queries = queries.len(),
        output_dir = %settings.output_dir.display(),
        providers = ?settings.providers.providers,
        "starting fetch"
    );

    let report = run_batch(
        &resolver,
        &fetcher,
        &queries,
        BatchOptions {
            output_dir: &settings.output_dir,
            name: args.name.as_deref(),
        },
    )
    .await;

    for line in summary_lines(&report) {
        println!("{line}");
    }

    Ok(exit_handler::determine_exit_outcome(
        report.completed(),
        report.failed(),
    ))
}

/// Positional queries first, then the input file; stdin only when neither is given.
fn collect_queries(args: &FetchArgs) -> Result<Vec<String>> {
    let mut queries: Vec<String> = args
        .queries
        .iter()
        .map(|query| query.trim())
        .filter(|query| !query.is_empty())
        .map(ToString::to_string)
        .collect();

    if let Some(path) = &args.input {
        let text = fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display()))?;
        queries.extend(read_queries(&text));
    } else if queries.is_empty() && !io::stdin().is_terminal() {
        let mut buffer = String::new();
        io::stdin()
            .read_to_string(&mut buffer)
            .context("Failed to read stdin")?;
        queries.extend(read_queries(&buffer));
    }

    Ok(queries)
}

fn summary_lines(report: &BatchReport) -> Vec<String> {
    let mut lines: Vec<String> = report.entries().iter().map(entry_line).collect();
    lines.push(format!(
        "{} downloaded, {} failed",
        report.completed(),
        report.failed()
    ));
    lines
}

fn entry_line(entry: &BatchEntry) -> String {
    match &entry.result {
        Ok(outcome) => format!(
            "OK {} -> {} ({} bytes via {})",
            outcome.identifier,
            outcome.path.display(),
            outcome.bytes,
            outcome.source
        ),
        Err(error) => {
            let subject = entry
                .identifier
                .as_ref()
                .map_or_else(|| entry.query.clone(), ToString::to_string);
            format!("FAILED {subject} [{}]: {error}", error.kind())
        }
    }
}

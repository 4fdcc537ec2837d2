//! `papers-dl parse`: print the identifiers found in a file or stdin.

use std::fs;
use std::io::{self, Read};

use anyhow::{Context, Result};
use papers_dl_core::parser::DEFAULT_SCAN_KINDS;
use papers_dl_core::{format_output, parse_ids_from_text};
use tracing::debug;

use crate::ProcessExit;
use crate::cli::{ParseArgs, match_kinds};

pub(crate) fn run_parse_command(args: &ParseArgs) -> Result<ProcessExit> {
    let text = match &args.path {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("Failed to read input file '{}'", path.display()))?,
        None => {
            let mut buffer = String::new();
            io::stdin()
                .read_to_string(&mut buffer)
                .context("Failed to read stdin")?;
            buffer
        }
    };

    let rendered = render_matches(&text, args)?;
    if !rendered.is_empty() {
        println!("{rendered}");
    }
    Ok(ProcessExit::Success)
}

fn render_matches(text: &str, args: &ParseArgs) -> Result<String> {
    let kinds = match_kinds(&args.matches, &DEFAULT_SCAN_KINDS);
    let ids = parse_ids_from_text(text, &kinds);
    debug!(count = ids.len(), ?kinds, "parse matches");
    format_output(&ids, args.format.into()).context("Failed to encode identifiers")
}

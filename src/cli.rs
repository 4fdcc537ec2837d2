//! CLI argument definitions using clap derive.

use std::path::PathBuf;

use clap::{ArgAction, Args, Parser, Subcommand, ValueEnum};
use papers_dl_core::{IdKind, OutputFormat};

/// Download academic papers by DOI, PMID, ISBN, or article URL.
///
/// Identifiers are looked up on mirror services and the resulting PDFs are
/// written to the output directory.
#[derive(Parser, Debug)]
#[command(name = "papers-dl")]
#[command(author, version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Increase output verbosity (-v for debug, -vv for trace)
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Suppress all output except errors
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Read defaults from this config file instead of the standard location
    #[arg(long, value_name = "FILE", global = true)]
    pub config: Option<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

/// Top-level subcommands.
#[derive(Subcommand, Debug)]
pub enum Command {
    /// Print the identifiers found in a file or stdin
    Parse(ParseArgs),

    /// Resolve queries and download their PDFs
    Fetch(FetchArgs),
}

/// Arguments for `papers-dl parse`.
#[derive(Args, Debug, Clone)]
pub struct ParseArgs {
    /// Text file to scan (reads stdin when omitted)
    #[arg(short, long, value_name = "FILE")]
    pub path: Option<PathBuf>,

    /// Identifier type to look for; repeatable (default: doi and isbn)
    #[arg(short = 'm', long = "match", value_enum, value_name = "TYPE")]
    pub matches: Vec<MatchType>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = FormatArg::Raw)]
    pub format: FormatArg,
}

/// Arguments for `papers-dl fetch`.
#[derive(Args, Debug, Clone)]
pub struct FetchArgs {
    /// DOIs, PMIDs, ISBNs, or URLs to fetch
    #[arg(value_name = "QUERY")]
    pub queries: Vec<String>,

    /// File of queries, one per line ('#' starts a comment line)
    #[arg(short, long, value_name = "FILE")]
    pub input: Option<PathBuf>,

    /// Directory to write PDFs into (default: current directory)
    #[arg(short = 'o', long = "output", value_name = "DIR")]
    pub output_dir: Option<PathBuf>,

    /// File name for the PDF; only valid with a single query
    #[arg(short, long, value_name = "NAME")]
    pub name: Option<String>,

    /// User-Agent header to send
    #[arg(short = 'A', long, value_name = "UA")]
    pub user_agent: Option<String>,

    /// Identifier type to extract from fetched pages; repeatable (default: doi)
    #[arg(short = 'm', long = "match", value_enum, value_name = "TYPE")]
    pub matches: Vec<MatchType>,
}

/// Identifier types selectable on the command line.
///
/// PMIDs are accepted as direct queries but never scanned for in free text.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum MatchType {
    Doi,
    Isbn,
    Url,
}

impl From<MatchType> for IdKind {
    fn from(value: MatchType) -> Self {
        match value {
            MatchType::Doi => Self::Doi,
            MatchType::Isbn => Self::Isbn,
            MatchType::Url => Self::Url,
        }
    }
}

/// Output formats for `parse`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FormatArg {
    #[default]
    Raw,
    Jsonl,
    Csv,
}

impl From<FormatArg> for OutputFormat {
    fn from(value: FormatArg) -> Self {
        match value {
            FormatArg::Raw => Self::Raw,
            FormatArg::Jsonl => Self::Jsonl,
            FormatArg::Csv => Self::Csv,
        }
    }
}

/// Converts repeated `-m` flags into identifier kinds, falling back to `default`.
pub fn match_kinds(matches: &[MatchType], default: &[IdKind]) -> Vec<IdKind> {
    if matches.is_empty() {
        return default.to_vec();
    }
    let mut kinds: Vec<IdKind> = Vec::with_capacity(matches.len());
    for kind in matches.iter().copied().map(IdKind::from) {
        if !kinds.contains(&kind) {
            kinds.push(kind);
        }
    }
    kinds
}

//! Rendering of parsed identifiers for the `parse` command.

use std::fmt;

use super::input::Identifier;

/// Output format for identifier listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    /// One identifier per line, type omitted
    #[default]
    Raw,
    /// One `{"id": ..., "type": ...}` object per line
    Jsonl,
    /// `id,type` per line
    Csv,
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Raw => write!(f, "raw"),
            Self::Jsonl => write!(f, "jsonl"),
            Self::Csv => write!(f, "csv"),
        }
    }
}

/// Formats identifiers one per line in the requested format.
///
/// An empty slice renders as an empty string.
///
/// # Errors
///
/// Returns a `serde_json` error if JSON encoding fails (`Jsonl` only).
pub fn format_output(ids: &[Identifier], format: OutputFormat) -> Result<String, serde_json::Error> {
    let lines: Vec<String> = match format {
        OutputFormat::Raw => ids.iter().map(|id| id.value().to_string()).collect(),
        OutputFormat::Jsonl => ids
            .iter()
            .map(serde_json::to_string)
            .collect::<Result<_, _>>()?,
        OutputFormat::Csv => ids
            .iter()
            .map(|id| format!("{},{}", id.value(), id.kind()))
            .collect(),
    };
    Ok(lines.join("\n"))
}

//! Subcommand handlers.

mod fetch;
mod parse;

pub(crate) use fetch::run_fetch_command;
pub(crate) use parse::run_parse_command;

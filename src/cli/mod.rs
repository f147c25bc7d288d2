//! CLI module for hostfacts
//!
//! A thin layer over the registry: parse flags, load configuration,
//! register the catalog, print facts.

mod args;
mod commands;
mod errors;
mod io;

pub use args::Cli;
pub use commands::{build_registry, execute, report, resolve_config};
pub use errors::{CliError, CliErrorCode, CliResult};
pub use io::{write_facts, write_value};

/// Parse process arguments and run
pub fn run() -> CliResult<()> {
    execute(Cli::parse_args())
}

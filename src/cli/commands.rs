//! CLI command implementation
//!
//! Builds a registry from configuration, registers the catalog, and prints
//! the requested facts. Formatting stays here; the engine only hands back
//! strings.

use std::io::Write;

use crate::catalog;
use crate::config::FactsConfig;
use crate::facts::FactRegistry;
use crate::observability::Logger;

use super::args::Cli;
use super::errors::CliResult;
use super::io::{stdout, write_facts, write_value};

/// Run the CLI against parsed arguments
pub fn execute(cli: Cli) -> CliResult<()> {
    let config = resolve_config(&cli)?;
    Logger::set_debug(config.debug);

    let registry = build_registry(&config)?;
    report(&registry, &cli.names, &cli.tags, &mut stdout())
}

/// Merge the config file, environment and flags, in that order
pub fn resolve_config(cli: &Cli) -> CliResult<FactsConfig> {
    let mut config = match &cli.config {
        Some(path) => FactsConfig::load(path)?,
        None => FactsConfig::default(),
    };
    config.apply_env();
    if cli.debug {
        config.debug = true;
    }
    if cli.no_catalog {
        config.load_catalog = false;
    }
    Ok(config)
}

/// Create a registry and, unless disabled, register the built-in catalog
pub fn build_registry(config: &FactsConfig) -> CliResult<FactRegistry> {
    let registry = FactRegistry::with_config(config);
    if config.load_catalog {
        catalog::load(&registry, &config.root_dir)?;
    }
    Ok(registry)
}

/// Print facts for `names`, or every tagged fact when no names are given
pub fn report<W: Write>(
    registry: &FactRegistry,
    names: &[String],
    tags: &[String],
    out: &mut W,
) -> CliResult<()> {
    match names {
        [] => write_facts(out, registry.export(tags)),
        [name] => match registry.value(name) {
            Some(value) => write_value(out, &value),
            None => Ok(()),
        },
        _ => {
            let found = names.iter().filter_map(|name| {
                let fact = registry.lookup(name)?;
                let value = fact.value(registry)?;
                Some((fact.name().to_string(), value))
            });
            write_facts(out, found)
        }
    }
}

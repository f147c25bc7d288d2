//! CLI argument definitions using clap
//!
//! - hostfacts                      every fact with a value
//! - hostfacts kernel               just that value
//! - hostfacts kernel hostname      `name => value` per name
//! - hostfacts --tag network        facts carrying every given tag

use clap::Parser;
use std::path::PathBuf;

/// hostfacts - report facts about this host
#[derive(Parser, Debug)]
#[command(name = "hostfacts")]
#[command(version, about, long_about = None)]
pub struct Cli {
    /// Path to a JSON configuration file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Emit debug diagnostics on stderr
    #[arg(long)]
    pub debug: bool,

    /// Only report facts carrying this tag (repeatable; all must match)
    #[arg(long = "tag", value_name = "TAG")]
    pub tags: Vec<String>,

    /// Skip the built-in fact catalog
    #[arg(long)]
    pub no_catalog: bool,

    /// Facts to report; all facts when omitted
    pub names: Vec<String>,
}

impl Cli {
    /// Parse command line arguments
    pub fn parse_args() -> Self {
        Cli::parse()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_names_and_tags() {
        let cli = Cli::parse_from([
            "hostfacts", "--tag", "network", "--tag", "os", "--debug", "kernel", "hostname",
        ]);
        assert_eq!(cli.tags, vec!["network", "os"]);
        assert_eq!(cli.names, vec!["kernel", "hostname"]);
        assert!(cli.debug);
        assert!(!cli.no_catalog);
        assert!(cli.config.is_none());
    }

    #[test]
    fn test_parse_config_path() {
        let cli = Cli::parse_from(["hostfacts", "--config", "/etc/hostfacts.json", "--no-catalog"]);
        assert_eq!(cli.config, Some(PathBuf::from("/etc/hostfacts.json")));
        assert!(cli.no_catalog);
        assert!(cli.names.is_empty());
    }
}

//! hostfacts - a lazy, rule-driven registry of facts about the host
//!
//! Facts are resolved on demand from competing resolutions, the most
//! specific suitable one winning, and memoized until flushed.

pub mod catalog;
pub mod cli;
pub mod config;
pub mod facts;
pub mod observability;

/// Library version, also reported as the `facterversion` fact
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

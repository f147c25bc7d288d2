//! Diagnostic events emitted while registering and resolving facts
//!
//! Events are explicit and typed. None of them are fatal: probing the
//! host never aborts the registry.

use std::fmt;

use super::logger::Severity;

/// Observable events in hostfacts
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Event {
    // Confinement
    /// A confine names a fact that was never registered
    ConfineFactMissing,

    // Fact evaluation
    /// A fact was re-entered while it was already being resolved
    FactRecursion,
    /// A fact has no resolutions at all
    FactNoResolutions,
    /// None of a fact's resolutions were suitable
    FactNoSuitableResolution,
    /// Every suitable resolution produced nothing
    FactValueNil,

    // Registration
    /// A resolution was unsuitable at registration time and dropped
    ResolutionDiscarded,

    // Command execution
    /// The command's executable could not be located
    CommandNotFound,
    /// The command could not be run or exited unsuccessfully
    CommandFailed,
    /// The command exceeded its time bound and was killed
    CommandTimeout,

    // Registry lifecycle
    /// All memoized values were flushed
    RegistryFlushed,
    /// All facts were removed
    RegistryCleared,

    // Startup
    /// Configuration loaded
    ConfigLoaded,
    /// Built-in fact catalog registered
    CatalogLoaded,
}

impl Event {
    /// Returns the string representation of the event
    pub fn as_str(&self) -> &'static str {
        match self {
            Event::ConfineFactMissing => "CONFINE_FACT_MISSING",

            Event::FactRecursion => "FACT_RECURSION",
            Event::FactNoResolutions => "FACT_NO_RESOLUTIONS",
            Event::FactNoSuitableResolution => "FACT_NO_SUITABLE_RESOLUTION",
            Event::FactValueNil => "FACT_VALUE_NIL",

            Event::ResolutionDiscarded => "RESOLUTION_DISCARDED",

            Event::CommandNotFound => "COMMAND_NOT_FOUND",
            Event::CommandFailed => "COMMAND_FAILED",
            Event::CommandTimeout => "COMMAND_TIMEOUT",

            Event::RegistryFlushed => "REGISTRY_FLUSHED",
            Event::RegistryCleared => "REGISTRY_CLEARED",

            Event::ConfigLoaded => "CONFIG_LOADED",
            Event::CatalogLoaded => "CATALOG_LOADED",
        }
    }

    /// Severity the event is logged at
    ///
    /// Execution problems are always visible; everything else belongs to
    /// the debug channel.
    pub fn severity(&self) -> Severity {
        match self {
            Event::CommandFailed | Event::CommandTimeout => Severity::Warn,
            Event::ConfigLoaded | Event::CatalogLoaded => Severity::Info,
            _ => Severity::Trace,
        }
    }
}

impl fmt::Display for Event {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

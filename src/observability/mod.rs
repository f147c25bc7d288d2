//! Observability for hostfacts
//!
//! Structured JSON diagnostics on stderr. Environmental trouble found while
//! probing the host (missing facts, failing commands, recursive confines)
//! is reported here and never propagated as an error.
//!
//! # Usage
//!
//! ```ignore
//! use hostfacts::observability::{log_event_with_fields, Event, Logger};
//!
//! Logger::set_debug(true);
//! log_event_with_fields(Event::FactRecursion, &[("fact", "operatingsystem")]);
//! ```

use std::io::{self, Write};

mod events;
mod logger;

pub use events::Event;
pub use logger::{parse_debug_flag, Logger, Severity};

/// Log a diagnostic event at its own severity
pub fn log_event(event: Event) {
    log_event_with_fields(event, &[]);
}

/// Log a diagnostic event with fields
pub fn log_event_with_fields(event: Event, fields: &[(&str, &str)]) {
    log_event_to(event, fields, &mut io::stderr());
}

/// Log a diagnostic event to `writer`
pub fn log_event_to<W: Write>(event: Event, fields: &[(&str, &str)], writer: &mut W) {
    Logger::log_to(event.severity(), event.as_str(), fields, writer);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn captured(event: Event, fields: &[(&str, &str)]) -> String {
        let mut buffer = Vec::new();
        log_event_to(event, fields, &mut buffer);
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn test_trace_events_follow_debug_switch() {
        Logger::set_debug(false);
        assert!(captured(Event::RegistryFlushed, &[]).is_empty());
        assert!(captured(Event::ConfineFactMissing, &[("fact", "kernel")]).is_empty());

        Logger::set_debug(true);
        let output = captured(Event::ConfineFactMissing, &[("fact", "kernel")]);
        Logger::set_debug(false);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "CONFINE_FACT_MISSING");
        assert_eq!(parsed["severity"], "TRACE");
        assert_eq!(parsed["fact"], "kernel");
        assert!(parsed.get("ts").is_some());
    }

    #[test]
    fn test_info_events_ignore_debug_switch() {
        let output = captured(Event::CatalogLoaded, &[("facts", "12")]);
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "CATALOG_LOADED");
        assert_eq!(parsed["severity"], "INFO");
        assert_eq!(parsed["facts"], "12");
    }
}

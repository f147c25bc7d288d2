//! Structured JSON logger for hostfacts
//!
//! - One log line = one event
//! - Event first, severity second, timestamp third, then fields by key
//! - Synchronous, no buffering
//! - Written to stderr so fact output on stdout stays clean
//!
//! `Trace` is the debug channel: it is dropped unless debugging has been
//! switched on with [`Logger::set_debug`].

use std::fmt;
use std::io::{self, Write};
use std::sync::atomic::{AtomicBool, Ordering};

use chrono::{SecondsFormat, Utc};

static DEBUG_ENABLED: AtomicBool = AtomicBool::new(false);

/// Log severity levels
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Debug-level detail, only emitted while debugging is on
    Trace = 0,
    /// Normal operations
    Info = 1,
    /// Recoverable issues
    Warn = 2,
    /// Operation failures
    Error = 3,
    /// Unrecoverable, process exits
    Fatal = 4,
}

impl Severity {
    /// Returns the string representation
    pub fn as_str(&self) -> &'static str {
        match self {
            Severity::Trace => "TRACE",
            Severity::Info => "INFO",
            Severity::Warn => "WARN",
            Severity::Error => "ERROR",
            Severity::Fatal => "FATAL",
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Interpret a user-supplied debug switch.
///
/// Integers enable debugging when greater than zero. The words `off`,
/// `false` and `no` (any case) disable it; every other non-empty word
/// enables it.
pub fn parse_debug_flag(raw: &str) -> bool {
    let raw = raw.trim();
    if raw.is_empty() {
        return false;
    }
    if let Ok(n) = raw.parse::<i64>() {
        return n > 0;
    }
    !matches!(raw.to_ascii_lowercase().as_str(), "off" | "false" | "no")
}

/// A structured logger that outputs JSON logs
pub struct Logger;

impl Logger {
    /// Switch the debug channel on or off for the whole process
    pub fn set_debug(enabled: bool) {
        DEBUG_ENABLED.store(enabled, Ordering::Relaxed);
    }

    /// Whether `Trace` events are currently emitted
    pub fn debug_enabled() -> bool {
        DEBUG_ENABLED.load(Ordering::Relaxed)
    }

    /// Log an event with the given severity and fields
    pub fn log(severity: Severity, event: &str, fields: &[(&str, &str)]) {
        Self::log_to(severity, event, fields, &mut io::stderr());
    }

    /// Like [`Logger::log`], but writes to `writer` instead of stderr
    pub fn log_to<W: Write>(severity: Severity, event: &str, fields: &[(&str, &str)], writer: &mut W) {
        if severity == Severity::Trace && !Self::debug_enabled() {
            return;
        }
        let ts = Utc::now().to_rfc3339_opts(SecondsFormat::Millis, true);
        Self::log_to_writer(severity, event, Some(&ts), fields, writer);
    }

    fn log_to_writer<W: Write>(
        severity: Severity,
        event: &str,
        timestamp: Option<&str>,
        fields: &[(&str, &str)],
        writer: &mut W,
    ) {
        let mut output = String::with_capacity(256);

        output.push('{');

        output.push_str("\"event\":\"");
        Self::escape_json_string(&mut output, event);
        output.push('"');

        output.push_str(",\"severity\":\"");
        output.push_str(severity.as_str());
        output.push('"');

        if let Some(ts) = timestamp {
            output.push_str(",\"ts\":\"");
            Self::escape_json_string(&mut output, ts);
            output.push('"');
        }

        let mut sorted_fields: Vec<_> = fields.iter().collect();
        sorted_fields.sort_by_key(|(k, _)| *k);

        for (key, value) in sorted_fields {
            output.push_str(",\"");
            Self::escape_json_string(&mut output, key);
            output.push_str("\":\"");
            Self::escape_json_string(&mut output, value);
            output.push('"');
        }

        output.push('}');
        output.push('\n');

        // one syscall per line
        let _ = writer.write_all(output.as_bytes());
        let _ = writer.flush();
    }

    fn escape_json_string(output: &mut String, s: &str) {
        for c in s.chars() {
            match c {
                '"' => output.push_str("\\\""),
                '\\' => output.push_str("\\\\"),
                '\n' => output.push_str("\\n"),
                '\r' => output.push_str("\\r"),
                '\t' => output.push_str("\\t"),
                c if c.is_control() => {
                    output.push_str(&format!("\\u{:04x}", c as u32));
                }
                c => output.push(c),
            }
        }
    }

    /// Log at TRACE level (debug channel)
    pub fn trace(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Trace, event, fields);
    }

    /// Log at INFO level
    pub fn info(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Info, event, fields);
    }

    /// Log at WARN level
    pub fn warn(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Warn, event, fields);
    }

    /// Log at ERROR level
    pub fn error(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Error, event, fields);
    }

    /// Log at FATAL level
    pub fn fatal(event: &str, fields: &[(&str, &str)]) {
        Self::log(Severity::Fatal, event, fields);
    }
}

/// Capture a log line to a buffer for testing
#[cfg(test)]
pub fn capture_log(severity: Severity, event: &str, fields: &[(&str, &str)]) -> String {
    let mut buffer = Vec::new();
    Logger::log_to_writer(severity, event, None, fields, &mut buffer);
    String::from_utf8(buffer).unwrap()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_severity_ordering() {
        assert!(Severity::Trace < Severity::Info);
        assert!(Severity::Info < Severity::Warn);
        assert!(Severity::Warn < Severity::Error);
        assert!(Severity::Error < Severity::Fatal);
    }

    #[test]
    fn test_log_json_format() {
        let output = capture_log(Severity::Warn, "CONFINE_FACT_MISSING", &[]);

        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["event"], "CONFINE_FACT_MISSING");
        assert_eq!(parsed["severity"], "WARN");
        assert!(parsed.get("ts").is_none());
    }

    #[test]
    fn test_log_with_timestamp() {
        let mut buffer = Vec::new();
        Logger::log_to_writer(
            Severity::Info,
            "CATALOG_LOADED",
            Some("2024-01-01T00:00:00.000Z"),
            &[("facts", "12")],
            &mut buffer,
        );
        let output = String::from_utf8(buffer).unwrap();
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["ts"], "2024-01-01T00:00:00.000Z");
        assert_eq!(parsed["facts"], "12");
    }

    #[test]
    fn test_log_deterministic_ordering() {
        let output1 = capture_log(
            Severity::Trace,
            "FACT_RECURSION",
            &[("zebra", "1"), ("apple", "2"), ("mango", "3")],
        );
        let output2 = capture_log(
            Severity::Trace,
            "FACT_RECURSION",
            &[("apple", "2"), ("mango", "3"), ("zebra", "1")],
        );
        assert_eq!(output1, output2);

        let apple_pos = output1.find("apple").unwrap();
        let mango_pos = output1.find("mango").unwrap();
        let zebra_pos = output1.find("zebra").unwrap();
        assert!(apple_pos < mango_pos);
        assert!(mango_pos < zebra_pos);
    }

    #[test]
    fn test_log_escapes_special_chars() {
        let output = capture_log(
            Severity::Error,
            "COMMAND_FAILED",
            &[("stderr", "sh: \"bogus\": not found\n")],
        );
        let parsed: serde_json::Value = serde_json::from_str(&output).unwrap();
        assert_eq!(parsed["stderr"], "sh: \"bogus\": not found\n");
        assert_eq!(output.chars().filter(|c| *c == '\n').count(), 1);
    }

    #[test]
    fn test_parse_debug_flag() {
        assert!(parse_debug_flag("1"));
        assert!(parse_debug_flag("on"));
        assert!(parse_debug_flag("TRUE"));
        assert!(parse_debug_flag("verbose"));
        assert!(!parse_debug_flag("0"));
        assert!(!parse_debug_flag("-3"));
        assert!(!parse_debug_flag("Off"));
        assert!(!parse_debug_flag("false"));
        assert!(!parse_debug_flag("no"));
        assert!(!parse_debug_flag(""));
    }
}

//! Confinement predicates
//!
//! A confine restricts a resolution to hosts where another fact currently
//! has one of a set of accepted values. The target fact is referenced by
//! name only and looked up through the registry on every evaluation.

use std::fmt;

use crate::observability::{log_event_with_fields, Event};

use super::registry::FactRegistry;

/// Predicate comparing another fact's value against accepted values
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Confine {
    fact: String,
    values: Vec<String>,
}

impl Confine {
    /// Create a confine on `fact` accepting any of `values`
    pub fn new<I, V>(fact: impl Into<String>, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        Self {
            fact: fact.into(),
            values: values.into_iter().map(Into::into).collect(),
        }
    }

    /// Name of the fact this confine inspects
    pub fn fact(&self) -> &str {
        &self.fact
    }

    /// Accepted values, as given
    pub fn values(&self) -> &[String] {
        &self.values
    }

    /// True iff the target fact exists, has a value, and that value matches
    /// one of the accepted values ignoring case.
    pub fn evaluate(&self, registry: &FactRegistry) -> bool {
        let Some(target) = registry.lookup(&self.fact) else {
            log_event_with_fields(Event::ConfineFactMissing, &[("fact", &self.fact)]);
            return false;
        };

        match target.value(registry) {
            Some(value) => self.accepts(&value),
            None => false,
        }
    }

    /// Case-insensitive membership test against the accepted values
    pub fn accepts(&self, value: &str) -> bool {
        let value = value.to_lowercase();
        self.values.iter().any(|v| v.to_lowercase() == value)
    }
}

impl fmt::Display for Confine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "'{}' '{}'", self.fact, self.values.join(","))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_accepts_ignores_case() {
        let confine = Confine::new("kernel", ["Linux", "FreeBSD"]);
        assert!(confine.accepts("linux"));
        assert!(confine.accepts("FREEBSD"));
        assert!(!confine.accepts("Darwin"));
    }

    #[test]
    fn test_display() {
        let confine = Confine::new("operatingsystem", ["FreeBSD", "Darwin"]);
        assert_eq!(confine.to_string(), "'operatingsystem' 'FreeBSD,Darwin'");
    }

    #[test]
    fn test_missing_fact_is_false() {
        let registry = FactRegistry::new();
        let confine = Confine::new("kernel", ["Linux"]);
        assert!(!confine.evaluate(&registry));
    }

    #[test]
    fn test_nil_value_is_false() {
        let registry = FactRegistry::new();
        registry.register("kernel", |r| {
            r.set_code(|_| None);
        }).unwrap();
        let confine = Confine::new("kernel", ["Linux"]);
        assert!(!confine.evaluate(&registry));
    }

    #[test]
    fn test_matching_value_is_true() {
        let registry = FactRegistry::new();
        registry.register("Kernel", |r| {
            r.set_code(|_| Some("Linux".to_string()));
        }).unwrap();
        assert!(Confine::new("KERNEL", ["linux"]).evaluate(&registry));
        assert!(!Confine::new("kernel", ["SunOS"]).evaluate(&registry));
    }
}

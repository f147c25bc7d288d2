//! Facts: named, lazily computed pieces of host information
//!
//! A fact keeps its resolutions sorted by descending specificity (number of
//! confines), with ties left in registration order. Its value is found by
//! walking that list and taking the first suitable resolution that yields a
//! non-empty result, and is memoized until the next flush.
//!
//! Suitability is memoized too, but a flush does not reset it: once a fact
//! has been classified it stays classified for its lifetime.

use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::observability::{log_event_with_fields, Event};

use super::registry::FactRegistry;
use super::resolution::Resolution;

/// Memoized value of a fact
#[derive(Debug, Clone, PartialEq, Eq)]
enum Memo {
    Unknown,
    Settled(Option<String>),
}

/// A named fact and its competing resolutions
pub struct Fact {
    name: String,
    ldap_name: RefCell<String>,
    resolutions: RefCell<Vec<Rc<Resolution>>>,
    tags: RefCell<Vec<String>>,
    value: RefCell<Memo>,
    searching: Cell<bool>,
    suitable: Cell<Option<bool>>,
}

/// Normalize a fact or tag name
pub(crate) fn normalize(name: &str) -> String {
    name.trim().to_lowercase()
}

impl Fact {
    pub(crate) fn new(name: &str) -> Self {
        let name = normalize(name);
        Self {
            ldap_name: RefCell::new(name.clone()),
            name,
            resolutions: RefCell::new(Vec::new()),
            tags: RefCell::new(Vec::new()),
            value: RefCell::new(Memo::Unknown),
            searching: Cell::new(false),
            suitable: Cell::new(None),
        }
    }

    /// Normalized (lower-case) name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Name used when exporting to a directory service; defaults to the
    /// fact name.
    pub fn ldap_name(&self) -> String {
        self.ldap_name.borrow().clone()
    }

    pub(crate) fn set_ldap_name(&self, alias: impl Into<String>) {
        *self.ldap_name.borrow_mut() = alias.into();
    }

    /// Insert before the first resolution with fewer confines, else append.
    ///
    /// A memoized nil is forgotten so the new resolution gets a chance to
    /// answer; a memoized value stands until the next flush.
    pub(crate) fn add_resolution(&self, resolution: Rc<Resolution>) {
        let mut resolutions = self.resolutions.borrow_mut();
        let position = resolutions
            .iter()
            .position(|existing| resolution.length() > existing.length())
            .unwrap_or(resolutions.len());
        resolutions.insert(position, resolution);

        let mut memo = self.value.borrow_mut();
        if matches!(*memo, Memo::Settled(None)) {
            *memo = Memo::Unknown;
        }
    }

    /// Number of resolutions
    pub fn count(&self) -> usize {
        self.resolutions.borrow().len()
    }

    /// Resolutions in evaluation order
    pub fn resolutions(&self) -> Vec<Rc<Resolution>> {
        self.resolutions.borrow().clone()
    }

    /// Add tags. Tags are case-insensitive and stored once.
    pub fn tag<I, T>(&self, tags: I)
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let mut current = self.tags.borrow_mut();
        for tag in tags {
            let tag = normalize(tag.as_ref());
            if !current.contains(&tag) {
                current.push(tag);
            }
        }
    }

    /// True only if every given tag is present. No tags matches anything.
    pub fn tagged<I, T>(&self, tags: I) -> bool
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let current = self.tags.borrow();
        tags.into_iter()
            .all(|tag| current.contains(&normalize(tag.as_ref())))
    }

    pub fn tags(&self) -> Vec<String> {
        self.tags.borrow().clone()
    }

    /// Whether any resolution is suitable on this host.
    ///
    /// A fact without resolutions is never suitable. The first answer is
    /// kept and [`Fact::flush`] does not clear it.
    pub fn suitable(&self, registry: &FactRegistry) -> bool {
        if let Some(known) = self.suitable.get() {
            return known;
        }
        if self.resolutions.borrow().is_empty() {
            return false;
        }
        let result = self.resolutions().iter().any(|r| r.suitable(registry));
        self.suitable.set(Some(result));
        result
    }

    /// Resolve this fact's value.
    ///
    /// Re-entering a fact that is already being resolved returns whatever
    /// is memoized (usually nothing) instead of recursing.
    pub fn value(&self, registry: &FactRegistry) -> Option<String> {
        if let Memo::Settled(value) = &*self.value.borrow() {
            return value.clone();
        }

        if self.searching.get() {
            log_event_with_fields(Event::FactRecursion, &[("fact", &self.name)]);
            return None;
        }

        // cloned so computations may register or look up facts freely
        let resolutions = self.resolutions();
        if resolutions.is_empty() {
            log_event_with_fields(Event::FactNoResolutions, &[("fact", &self.name)]);
            *self.value.borrow_mut() = Memo::Settled(None);
            return None;
        }

        self.searching.set(true);
        let mut found_suitable = false;
        let mut result = None;
        for resolution in &resolutions {
            if !resolution.suitable(registry) {
                continue;
            }
            found_suitable = true;
            if let Some(value) = resolution.value(registry) {
                result = Some(value);
                break;
            }
        }
        self.searching.set(false);

        if !found_suitable {
            let count = resolutions.len().to_string();
            log_event_with_fields(
                Event::FactNoSuitableResolution,
                &[("fact", &self.name), ("resolutions", &count)],
            );
        } else if result.is_none() {
            log_event_with_fields(Event::FactValueNil, &[("fact", &self.name)]);
        }

        *self.value.borrow_mut() = Memo::Settled(result.clone());
        result
    }

    /// Case-insensitive comparison of the current value against `accepted`
    pub fn matches<I, V>(&self, registry: &FactRegistry, accepted: I) -> bool
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        let Some(value) = self.value(registry) else {
            return false;
        };
        let value = value.to_lowercase();
        accepted
            .into_iter()
            .any(|candidate| candidate.as_ref().to_lowercase() == value)
    }

    /// Forget the memoized value so the next read resolves again
    pub fn flush(&self) {
        *self.value.borrow_mut() = Memo::Unknown;
    }
}

impl fmt::Debug for Fact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Fact")
            .field("name", &self.name)
            .field("tags", &self.tags.borrow())
            .field("resolutions", &self.count())
            .field("value", &self.value.borrow())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_name_is_normalized() {
        let fact = Fact::new("  OperatingSystem ");
        assert_eq!(fact.name(), "operatingsystem");
        assert_eq!(fact.ldap_name(), "operatingsystem");
    }

    #[test]
    fn test_tags_are_a_set() {
        let fact = Fact::new("kernel");
        fact.tag(["Core", "core", "OS"]);
        fact.tag(["os"]);
        assert_eq!(fact.tags(), vec!["core", "os"]);
    }

    #[test]
    fn test_tagged_is_conjunctive() {
        let fact = Fact::new("kernel");
        fact.tag(["core", "os"]);
        assert!(fact.tagged(["CORE"]));
        assert!(fact.tagged(["core", "os"]));
        assert!(!fact.tagged(["core", "network"]));
        assert!(fact.tagged(Vec::<&str>::new()));
    }

    #[test]
    fn test_empty_fact_unsuitable_and_nil() {
        let registry = FactRegistry::new();
        let fact = Fact::new("nothing");
        assert!(!fact.suitable(&registry));
        assert_eq!(fact.value(&registry), None);
        assert_eq!(fact.count(), 0);
    }

    #[test]
    fn test_empty_answers_are_not_kept() {
        let registry = FactRegistry::new();
        let fact = registry.declare("kernel").unwrap();
        assert!(!fact.suitable(&registry));
        assert_eq!(fact.value(&registry), None);
        assert_eq!(fact.suitable.get(), None);
        assert_eq!(*fact.value.borrow(), Memo::Settled(None));

        registry
            .register("kernel", |r| {
                r.set_code(|_| Some("Linux".into()));
            })
            .unwrap();
        assert_eq!(*fact.value.borrow(), Memo::Unknown);
        assert!(fact.suitable(&registry));
        assert_eq!(fact.suitable.get(), Some(true));
        assert_eq!(fact.value(&registry).as_deref(), Some("Linux"));
    }

    #[test]
    fn test_flush_clears_value_only() {
        let registry = FactRegistry::new();
        let fact = registry
            .register("kernel", |r| {
                r.set_code(|_| Some("Linux".into()));
            })
            .unwrap();
        assert!(fact.suitable(&registry));
        assert_eq!(fact.value(&registry).as_deref(), Some("Linux"));

        fact.flush();
        assert_eq!(*fact.value.borrow(), Memo::Unknown);
        assert_eq!(fact.suitable.get(), Some(true));
    }

    #[test]
    fn test_matches() {
        let registry = FactRegistry::new();
        let fact = registry
            .register("kernel", |r| {
                r.set_code(|_| Some("Linux".into()));
            })
            .unwrap();
        assert!(fact.matches(&registry, ["sunos", "LINUX"]));
        assert!(!fact.matches(&registry, ["darwin"]));
    }
}

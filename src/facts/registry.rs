//! Fact registry
//!
//! Maps lower-cased fact names to facts, in registration order. The
//! registry is constructed explicitly and handed to every collaborator;
//! there is no process-wide instance.
//!
//! Evaluation is single-threaded and re-entrant: confines and computations
//! call back into the registry while a fact is being resolved, so the map is
//! never borrowed across a resolution.

use std::cell::RefCell;
use std::rc::Rc;

use indexmap::IndexMap;

use crate::config::FactsConfig;
use crate::observability::{log_event, log_event_with_fields, Event};

use super::errors::{FactError, FactResult};
use super::exec::ExecSettings;
use super::fact::{normalize, Fact};
use super::resolution::Resolution;

/// Registry of facts
#[derive(Debug, Default)]
pub struct FactRegistry {
    facts: RefCell<IndexMap<String, Rc<Fact>>>,
    settings: ExecSettings,
}

impl FactRegistry {
    /// Create an empty registry with default execution settings
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty registry with the given execution settings
    pub fn with_settings(settings: ExecSettings) -> Self {
        Self {
            facts: RefCell::new(IndexMap::new()),
            settings,
        }
    }

    /// Create an empty registry configured from `config`
    pub fn with_config(config: &FactsConfig) -> Self {
        Self::with_settings(config.exec_settings())
    }

    pub fn settings(&self) -> &ExecSettings {
        &self.settings
    }

    /// Add a resolution to the fact `name`, creating the fact if needed.
    ///
    /// `setup` configures a fresh resolution. If that resolution is not
    /// suitable right now it is dropped and never becomes visible. Fails
    /// only when `setup` leaves the resolution without exactly one
    /// execution.
    pub fn register<F>(&self, name: &str, setup: F) -> FactResult<Rc<Fact>>
    where
        F: FnOnce(&mut Resolution),
    {
        let (fact, created) = self.fact_entry(name)?;

        let mut resolution = Resolution::new(&fact, self.settings.clone());
        setup(&mut resolution);

        if let Err(e) = resolution.validate() {
            if created {
                self.facts.borrow_mut().shift_remove(fact.name());
            }
            return Err(e);
        }

        if !resolution.suitable(self) {
            let confines = resolution
                .confines()
                .iter()
                .map(ToString::to_string)
                .collect::<Vec<_>>()
                .join(" ");
            log_event_with_fields(
                Event::ResolutionDiscarded,
                &[("confines", &confines), ("fact", fact.name())],
            );
            return Ok(fact);
        }

        fact.add_resolution(Rc::new(resolution));
        Ok(fact)
    }

    /// Get the fact `name`, creating it without resolutions if absent
    pub fn declare(&self, name: &str) -> FactResult<Rc<Fact>> {
        self.fact_entry(name).map(|(fact, _)| fact)
    }

    /// Create the fact `name`; it must not exist yet
    pub fn create(&self, name: &str) -> FactResult<Rc<Fact>> {
        let key = normalize(name);
        if self.facts.borrow().contains_key(&key) {
            return Err(FactError::DuplicateFact(key));
        }
        self.declare(&key)
    }

    fn fact_entry(&self, name: &str) -> FactResult<(Rc<Fact>, bool)> {
        let key = normalize(name);
        if key.is_empty() {
            return Err(FactError::EmptyName);
        }
        let mut facts = self.facts.borrow_mut();
        if let Some(fact) = facts.get(&key) {
            return Ok((Rc::clone(fact), false));
        }
        let fact = Rc::new(Fact::new(&key));
        facts.insert(key, Rc::clone(&fact));
        Ok((fact, true))
    }

    /// Case-insensitive lookup
    pub fn lookup(&self, name: &str) -> Option<Rc<Fact>> {
        self.facts.borrow().get(&normalize(name)).cloned()
    }

    /// Value of the fact `name`; `None` if unknown or unresolvable
    pub fn value(&self, name: &str) -> Option<String> {
        self.lookup(name)?.value(self)
    }

    /// True iff `name` exists and its value matches one of `accepted`,
    /// ignoring case
    pub fn matches<I, V>(&self, name: &str, accepted: I) -> bool
    where
        I: IntoIterator<Item = V>,
        V: AsRef<str>,
    {
        self.lookup(name)
            .map_or(false, |fact| fact.matches(self, accepted))
    }

    /// Lazily yield `(name, value)` for every suitable fact with a value
    pub fn iter(&self) -> FactIter<'_> {
        FactIter {
            registry: self,
            index: 0,
        }
    }

    /// Snapshot of suitable facts carrying every tag in `tags`.
    ///
    /// An empty tag list selects every suitable fact. Facts without a value
    /// are left out.
    pub fn export<I, T>(&self, tags: I) -> IndexMap<String, String>
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        let tags: Vec<String> = tags.into_iter().map(|t| t.as_ref().to_string()).collect();
        let mut out = IndexMap::new();
        for fact in self.snapshot() {
            if !fact.suitable(self) || !fact.tagged(&tags) {
                continue;
            }
            if let Some(value) = fact.value(self) {
                out.insert(fact.name().to_string(), value);
            }
        }
        out
    }

    /// Forget every memoized value
    pub fn flush_all(&self) {
        for fact in self.snapshot() {
            fact.flush();
        }
        log_event(Event::RegistryFlushed);
    }

    /// Flush, then remove every fact
    pub fn clear(&self) {
        self.flush_all();
        self.facts.borrow_mut().clear();
        log_event(Event::RegistryCleared);
    }

    /// Registered fact names in registration order
    pub fn names(&self) -> Vec<String> {
        self.facts.borrow().keys().cloned().collect()
    }

    pub fn len(&self) -> usize {
        self.facts.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    fn snapshot(&self) -> Vec<Rc<Fact>> {
        self.facts.borrow().values().cloned().collect()
    }
}

/// Lazy iterator over `(name, value)` pairs; see [`FactRegistry::iter`]
pub struct FactIter<'a> {
    registry: &'a FactRegistry,
    index: usize,
}

impl Iterator for FactIter<'_> {
    type Item = (String, String);

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            let fact = {
                let facts = self.registry.facts.borrow();
                let (_, fact) = facts.get_index(self.index)?;
                Rc::clone(fact)
            };
            self.index += 1;

            if !fact.suitable(self.registry) {
                continue;
            }
            if let Some(value) = fact.value(self.registry) {
                return Some((fact.name().to_string(), value));
            }
        }
    }
}

impl<'a> IntoIterator for &'a FactRegistry {
    type Item = (String, String);
    type IntoIter = FactIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

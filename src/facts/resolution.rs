//! Resolutions: one candidate way of computing a fact
//!
//! A resolution owns its confines and exactly one execution: an external
//! command run through an interpreter, or a computation closure. Confines
//! are ANDed; a resolution with none is always suitable.

use std::cell::Cell;
use std::fmt;
use std::rc::{Rc, Weak};

use super::confine::Confine;
use super::errors::{FactError, FactResult};
use super::exec::{self, ExecSettings};
use super::fact::Fact;
use super::registry::FactRegistry;

/// Computation backing a resolution.
///
/// The registry is passed in so a computation can derive its value from
/// other facts.
pub type Computation = Box<dyn Fn(&FactRegistry) -> Option<String>>;

/// How a resolution produces its value
pub enum Execution {
    /// Shell out to `command` via `interpreter`
    Command { command: String, interpreter: String },
    /// Call a closure
    Computation(Computation),
}

impl fmt::Debug for Execution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Execution::Command { command, interpreter } => f
                .debug_struct("Command")
                .field("command", command)
                .field("interpreter", interpreter)
                .finish(),
            Execution::Computation(_) => f.write_str("Computation(..)"),
        }
    }
}

/// A single candidate mechanism for a fact
pub struct Resolution {
    fact: Weak<Fact>,
    name: String,
    confines: Vec<Confine>,
    execution: Option<Execution>,
    execution_set_twice: bool,
    settings: ExecSettings,
    suitable: Cell<Option<bool>>,
}

impl Resolution {
    pub(crate) fn new(fact: &Rc<Fact>, settings: ExecSettings) -> Self {
        Self {
            fact: Rc::downgrade(fact),
            name: fact.name().to_string(),
            confines: Vec::new(),
            execution: None,
            execution_set_twice: false,
            settings,
            suitable: Cell::new(None),
        }
    }

    /// Name of the owning fact
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Require `fact` to equal one of `values`
    pub fn confine<I, V>(&mut self, fact: impl Into<String>, values: I) -> &mut Self
    where
        I: IntoIterator<Item = V>,
        V: Into<String>,
    {
        self.confines.push(Confine::new(fact, values));
        self
    }

    /// Add one confine per `(fact, accepted values)` entry
    pub fn confine_all<I, K, V>(&mut self, entries: I) -> &mut Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: IntoIterator,
        V::Item: Into<String>,
    {
        for (fact, values) in entries {
            self.confines.push(Confine::new(fact, values));
        }
        self
    }

    /// Resolve by running `command` through the default interpreter
    pub fn set_command(&mut self, command: impl Into<String>) -> &mut Self {
        let interpreter = self.settings.default_interpreter.clone();
        self.set_command_with(command, interpreter)
    }

    /// Resolve by running `command` through `interpreter`
    pub fn set_command_with(
        &mut self,
        command: impl Into<String>,
        interpreter: impl Into<String>,
    ) -> &mut Self {
        self.store(Execution::Command {
            command: command.into(),
            interpreter: interpreter.into(),
        })
    }

    /// Resolve by calling `code`
    pub fn set_code<F>(&mut self, code: F) -> &mut Self
    where
        F: Fn(&FactRegistry) -> Option<String> + 'static,
    {
        self.store(Execution::Computation(Box::new(code)))
    }

    fn store(&mut self, execution: Execution) -> &mut Self {
        if self.execution.is_some() {
            self.execution_set_twice = true;
        }
        self.execution = Some(execution);
        self
    }

    /// Set the directory alias of the owning fact
    pub fn set_ldap_alias(&mut self, alias: impl Into<String>) -> &mut Self {
        if let Some(fact) = self.fact.upgrade() {
            fact.set_ldap_name(alias);
        }
        self
    }

    /// Tag the owning fact
    pub fn tag<I, T>(&mut self, tags: I) -> &mut Self
    where
        I: IntoIterator<Item = T>,
        T: AsRef<str>,
    {
        if let Some(fact) = self.fact.upgrade() {
            fact.tag(tags);
        }
        self
    }

    /// Number of confines; the specificity used for ordering
    pub fn length(&self) -> usize {
        self.confines.len()
    }

    pub fn confines(&self) -> &[Confine] {
        &self.confines
    }

    pub fn execution(&self) -> Option<&Execution> {
        self.execution.as_ref()
    }

    pub(crate) fn validate(&self) -> FactResult<()> {
        if self.execution_set_twice {
            return Err(FactError::ConflictingExecution(self.name.clone()));
        }
        match &self.execution {
            None => Err(FactError::MissingExecution(self.name.clone())),
            Some(Execution::Command { interpreter, .. }) if interpreter.trim().is_empty() => {
                Err(FactError::UnsupportedInterpreter(interpreter.clone()))
            }
            Some(_) => Ok(()),
        }
    }

    /// Whether every confine holds. Evaluated once, then remembered.
    pub fn suitable(&self, registry: &FactRegistry) -> bool {
        if let Some(known) = self.suitable.get() {
            return known;
        }
        let result = self.confines.iter().all(|c| c.evaluate(registry));
        self.suitable.set(Some(result));
        result
    }

    /// Compute this resolution's value. Empty results become `None`.
    pub fn value(&self, registry: &FactRegistry) -> Option<String> {
        let value = match self.execution.as_ref()? {
            Execution::Computation(code) => code(registry),
            Execution::Command { command, interpreter } => {
                exec::run_command(command, interpreter, self.settings.timeout)
            }
        };
        value.filter(|v| !v.is_empty())
    }
}

impl fmt::Debug for Resolution {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Resolution")
            .field("name", &self.name)
            .field("confines", &self.confines)
            .field("execution", &self.execution)
            .field("suitable", &self.suitable.get())
            .finish()
    }
}

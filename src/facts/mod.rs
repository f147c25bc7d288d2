//! Fact resolution engine
//!
//! # Model
//!
//! - A [`FactRegistry`] maps names to [`Fact`]s.
//! - A fact owns competing [`Resolution`]s, most specific first.
//! - A resolution is gated by [`Confine`]s, each comparing another fact's
//!   value against accepted values.
//!
//! # Usage
//!
//! ```
//! use hostfacts::facts::FactRegistry;
//!
//! let registry = FactRegistry::new();
//! registry.register("kernel", |r| {
//!     r.set_code(|_| Some("Linux".to_string()));
//! }).unwrap();
//! registry.register("operatingsystem", |r| {
//!     r.confine("kernel", ["SunOS"]).set_code(|_| Some("Solaris".to_string()));
//! }).unwrap();
//! registry.register("operatingsystem", |r| {
//!     r.confine("kernel", ["Linux"]).set_code(|_| Some("Debian".to_string()));
//! }).unwrap();
//!
//! assert_eq!(registry.value("operatingsystem").as_deref(), Some("Debian"));
//! ```

mod confine;
mod errors;
pub mod exec;
mod fact;
mod registry;
mod resolution;

pub use confine::Confine;
pub use errors::{FactError, FactResult};
pub use exec::{run_command, ExecSettings, DEFAULT_INTERPRETER};
pub use fact::Fact;
pub use registry::{FactIter, FactRegistry};
pub use resolution::{Computation, Execution, Resolution};

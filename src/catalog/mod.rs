//! Built-in fact catalog
//!
//! A representative set of host facts registered purely through the public
//! [`FactRegistry::register`] contract. Nothing here is special to the
//! engine; third-party catalogs register the same way.
//!
//! File probes are resolved against a root directory so a catalog can be
//! pointed at a chroot or a test fixture.

pub mod kernel;
pub mod keys;
pub mod network;
pub mod os;

use std::path::Path;

use crate::facts::{FactRegistry, FactResult};
use crate::observability::{log_event_with_fields, Event};

/// Register every built-in fact.
///
/// Order matters: facts that others confine on are registered first.
pub fn load(registry: &FactRegistry, root: &Path) -> FactResult<()> {
    kernel::register(registry)?;
    os::register(registry, root)?;
    network::register(registry, root)?;
    keys::register(registry, root)?;

    let count = registry.len().to_string();
    log_event_with_fields(Event::CatalogLoaded, &[("facts", &count)]);
    Ok(())
}

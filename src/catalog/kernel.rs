//! Kernel and hardware facts

use crate::facts::{FactRegistry, FactResult};
use crate::VERSION;

pub fn register(registry: &FactRegistry) -> FactResult<()> {
    registry.register("facterversion", |r| {
        r.set_code(|_| Some(VERSION.to_string()));
    })?;

    for (name, command) in [
        ("kernel", "uname -s"),
        ("kernelrelease", "uname -r"),
        ("hardwaremodel", "uname -m"),
    ] {
        registry.register(name, |r| {
            r.tag(["kernel"]).set_command(command);
        })?;
    }

    Ok(())
}

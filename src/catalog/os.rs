//! Operating system facts
//!
//! `operatingsystem` falls back to the kernel name; more specific
//! resolutions confined on `kernel` override it on Solaris and on Linux
//! distributions identified by their release marker files.

use std::fs;
use std::path::{Path, PathBuf};

use crate::facts::{FactRegistry, FactResult};

const BSD_FAMILY: [&str; 4] = ["FreeBSD", "NetBSD", "OpenBSD", "Darwin"];

pub fn register(registry: &FactRegistry, root: &Path) -> FactResult<()> {
    registry.register("operatingsystem", |r| {
        r.tag(["os"]).set_code(|facts| facts.value("kernel"));
    })?;
    registry.register("operatingsystem", |r| {
        r.confine("kernel", ["SunOS"])
            .set_code(|_| Some("Solaris".to_string()));
    })?;
    let root_dir = root.to_path_buf();
    registry.register("operatingsystem", move |r| {
        r.confine("kernel", ["Linux"])
            .set_code(move |_| linux_distribution(&root_dir));
    })?;

    registry.register("operatingsystemrelease", |r| {
        r.tag(["os"]).set_code(|facts| facts.value("kernelrelease"));
    })?;

    registry.register("architecture", |r| {
        r.confine("operatingsystem", ["Debian"])
            .set_code(|facts| facts.value("hardwaremodel").map(|m| debian_architecture(&m)));
    })?;

    registry.register("id", |r| {
        r.confine("kernel", ["Linux"]).set_command("whoami");
    })?;

    registry.register("ps", |r| {
        r.set_code(|_| Some("ps -ef".to_string()));
    })?;
    registry.register("ps", |r| {
        r.confine("operatingsystem", BSD_FAMILY)
            .set_code(|_| Some("ps -auxwww".to_string()));
    })?;

    registry.register("uniqueid", |r| {
        r.confine("operatingsystem", ["Solaris"]).set_command("hostid");
    })?;
    registry.register("hardwareisa", |r| {
        r.confine("operatingsystem", ["Solaris"]).set_command("uname -p");
    })?;

    Ok(())
}

/// Identify a Linux distribution from release files under `root`
pub fn linux_distribution(root: &Path) -> Option<String> {
    let etc = |file: &str| -> PathBuf { root.join("etc").join(file) };

    let name = if etc("debian_version").exists() {
        "Debian"
    } else if etc("gentoo-release").exists() {
        "Gentoo"
    } else if etc("fedora-release").exists() {
        "Fedora"
    } else if etc("redhat-release").exists() {
        let release = fs::read_to_string(etc("redhat-release")).unwrap_or_default();
        if release.to_lowercase().contains("centos") {
            "CentOS"
        } else {
            "RedHat"
        }
    } else if etc("SuSE-release").exists() {
        "SuSE"
    } else {
        return None;
    };
    Some(name.to_string())
}

/// Map a hardware model onto Debian's architecture names
pub fn debian_architecture(model: &str) -> String {
    if model == "x86_64" {
        return "amd64".to_string();
    }
    let is_x86_32 = model.contains("pentium")
        || model.as_bytes().windows(4).any(|w| {
            w[0] == b'i' && (b'3'..=b'6').contains(&w[1]) && &w[2..] == b"86"
        });
    if is_x86_32 {
        "i386".to_string()
    } else {
        model.to_string()
    }
}

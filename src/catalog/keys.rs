//! Host key facts
//!
//! Each candidate location is its own unconfined resolution, so the first
//! readable key in registration order wins.

use std::fs;
use std::path::{Path, PathBuf};

use crate::facts::{FactRegistry, FactResult};

const SSH_KEY_DIRS: [&str; 4] = ["etc/ssh", "usr/local/etc/ssh", "etc", "usr/local/etc"];

const SSH_KEYS: [(&str, &str); 2] = [
    ("sshdsakey", "ssh_host_dsa_key.pub"),
    ("sshrsakey", "ssh_host_rsa_key.pub"),
];

const CFKEY_FILES: [&str; 4] = [
    "usr/local/etc/cfkey.pub",
    "etc/cfkey.pub",
    "var/cfng/keys/localhost.pub",
    "var/cfengine/ppkeys/localhost.pub",
];

pub fn register(registry: &FactRegistry, root: &Path) -> FactResult<()> {
    for dir in SSH_KEY_DIRS {
        for (name, file) in SSH_KEYS {
            let path = root.join(dir).join(file);
            registry.register(name, move |r| {
                r.tag(["security"])
                    .set_code(move |_| read_public_key(&path));
            })?;
        }
    }

    let candidates: Vec<PathBuf> = CFKEY_FILES.iter().map(|f| root.join(f)).collect();
    registry.register("cfkey", move |r| {
        r.tag(["security"])
            .set_code(move |_| candidates.iter().find_map(|p| read_cfkey(p)));
    })?;

    Ok(())
}

/// Contents of a public key file with trailing whitespace removed
pub fn read_public_key(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    fs::read_to_string(path)
        .ok()
        .map(|key| key.trim_end().to_string())
}

/// A cfengine key body: every line except the PEM armour, joined
pub fn read_cfkey(path: &Path) -> Option<String> {
    if !path.is_file() {
        return None;
    }
    let content = fs::read_to_string(path).ok()?;
    Some(
        content
            .lines()
            .filter(|line| !line.contains("PUBLIC KEY"))
            .collect::<String>(),
    )
}

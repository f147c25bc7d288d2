//! Host naming facts
//!
//! `fqdn` holds the raw output of `hostname`. `hostname` and `domain` are
//! both derived from it through the registry.

use std::fs;
use std::path::Path;

use crate::facts::{run_command, FactRegistry, FactResult};

pub fn register(registry: &FactRegistry, root: &Path) -> FactResult<()> {
    registry.register("fqdn", |r| {
        r.tag(["network"]).set_command("hostname");
    })?;

    registry.register("hostname", |r| {
        r.tag(["network"])
            .set_ldap_alias("cn")
            .set_code(|facts| {
                let fqdn = facts.value("fqdn")?;
                Some(split_fqdn(&fqdn).0.to_string())
            });
    })?;
    registry.register("hostname", |r| {
        r.confine_all([("kernel", ["Darwin"]), ("kernelrelease", ["R7"])])
            .set_command("/usr/sbin/scutil --get LocalHostName");
    })?;

    registry.register("domain", |r| {
        r.tag(["network"]).set_code(|facts| {
            let fqdn = facts.value("fqdn")?;
            split_fqdn(&fqdn).1.map(str::to_string)
        });
    })?;
    registry.register("domain", |r| {
        r.set_code(|facts| {
            let settings = facts.settings();
            run_command("domainname", &settings.default_interpreter, settings.timeout)
                .filter(|d| is_qualified(d))
        });
    })?;
    let resolv_conf = root.join("etc").join("resolv.conf");
    registry.register("domain", move |r| {
        r.set_code(move |_| {
            let content = fs::read_to_string(&resolv_conf).ok()?;
            parse_resolv_conf(&content)
        });
    })?;

    Ok(())
}

/// Split `host.example.com` into `("host", Some("example.com"))`.
///
/// The host part must be a single label of word characters or dashes;
/// anything else is returned whole with no domain.
pub fn split_fqdn(name: &str) -> (&str, Option<&str>) {
    match name.split_once('.') {
        Some((host, domain))
            if !host.is_empty()
                && !domain.is_empty()
                && host.chars().all(|c| c.is_alphanumeric() || c == '_' || c == '-') =>
        {
            (host, Some(domain))
        }
        _ => (name, None),
    }
}

/// True if `name` has at least one dot with text on both sides
pub fn is_qualified(name: &str) -> bool {
    name.char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < name.len())
}

/// Domain from resolv.conf text: the `domain` entry, else the first
/// `search` entry.
pub fn parse_resolv_conf(content: &str) -> Option<String> {
    let first_arg = |keyword: &str| {
        content.lines().find_map(|line| {
            let mut words = line.split_whitespace();
            if words.next() == Some(keyword) {
                words.next().map(str::to_string)
            } else {
                None
            }
        })
    };
    first_arg("domain").or_else(|| first_arg("search"))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_fqdn() {
        assert_eq!(split_fqdn("web01.example.com"), ("web01", Some("example.com")));
        assert_eq!(split_fqdn("build-host.lan"), ("build-host", Some("lan")));
        assert_eq!(split_fqdn("localhost"), ("localhost", None));
        assert_eq!(split_fqdn("trailing."), ("trailing.", None));
        assert_eq!(split_fqdn(".hidden"), (".hidden", None));
    }

    #[test]
    fn test_is_qualified() {
        assert!(is_qualified("example.com"));
        assert!(!is_qualified("(none)"));
        assert!(!is_qualified("example."));
        assert!(!is_qualified(".com"));
    }

    #[test]
    fn test_parse_resolv_conf_prefers_domain() {
        let content = "search corp.example.com example.com\ndomain example.org\nnameserver 10.0.0.1\n";
        assert_eq!(parse_resolv_conf(content).as_deref(), Some("example.org"));
    }

    #[test]
    fn test_parse_resolv_conf_falls_back_to_search() {
        let content = "# domain commented.out\nsearch corp.example.com example.com\n";
        assert_eq!(parse_resolv_conf(content).as_deref(), Some("corp.example.com"));
        assert_eq!(parse_resolv_conf("nameserver 1.1.1.1\n"), None);
    }

    #[test]
    fn test_hostname_and_domain_derive_from_fqdn() {
        let registry = FactRegistry::new();
        registry.register("fqdn", |r| {
            r.set_code(|_| Some("web01.example.com".to_string()));
        }).unwrap();
        let tmp = tempfile::TempDir::new().unwrap();
        register(&registry, tmp.path()).unwrap();

        assert_eq!(registry.value("hostname").as_deref(), Some("web01"));
        assert_eq!(registry.value("domain").as_deref(), Some("example.com"));
        assert_eq!(registry.lookup("hostname").unwrap().ldap_name(), "cn");
    }

    #[test]
    fn test_unqualified_fqdn_is_whole_hostname() {
        let registry = FactRegistry::new();
        registry.register("fqdn", |r| {
            r.set_code(|_| Some("buildbox".to_string()));
        }).unwrap();
        let tmp = tempfile::TempDir::new().unwrap();
        register(&registry, tmp.path()).unwrap();

        assert_eq!(registry.value("hostname").as_deref(), Some("buildbox"));
        assert_eq!(registry.lookup("domain").unwrap().count(), 3);
    }
}

//! Catalog Fact Tests
//!
//! The built-in catalog registered against a fake host: kernel and
//! hardware facts are pinned first, file probes point at a temp root.

use std::fs;

use hostfacts::catalog;
use hostfacts::facts::FactRegistry;
use tempfile::TempDir;

// =============================================================================
// Helper Functions
// =============================================================================

/// Registry whose kernel facts are fixed before the catalog sees them.
fn fake_host(kernel: &'static str, model: &'static str) -> FactRegistry {
    let registry = FactRegistry::new();
    registry
        .register("kernel", move |r| {
            r.set_code(move |_| Some(kernel.to_string()));
        })
        .unwrap();
    registry
        .register("kernelrelease", |r| {
            r.set_code(|_| Some("6.1.0".to_string()));
        })
        .unwrap();
    registry
        .register("hardwaremodel", move |r| {
            r.set_code(move |_| Some(model.to_string()));
        })
        .unwrap();
    registry
}

fn root_with(files: &[&str]) -> TempDir {
    let tmp = TempDir::new().unwrap();
    fs::create_dir_all(tmp.path().join("etc")).unwrap();
    for file in files {
        fs::write(tmp.path().join("etc").join(file), "marker\n").unwrap();
    }
    tmp
}

// =============================================================================
// Operating System
// =============================================================================

#[test]
fn test_debian_host() {
    let root = root_with(&["debian_version"]);
    let registry = fake_host("Linux", "x86_64");
    catalog::os::register(&registry, root.path()).unwrap();

    assert_eq!(registry.value("operatingsystem").as_deref(), Some("Debian"));
    assert_eq!(registry.value("operatingsystemrelease").as_deref(), Some("6.1.0"));
    assert_eq!(registry.value("architecture").as_deref(), Some("amd64"));
    assert_eq!(registry.value("ps").as_deref(), Some("ps -ef"));
}

#[test]
fn test_unknown_linux_falls_back_to_kernel() {
    let root = root_with(&[]);
    let registry = fake_host("Linux", "aarch64");
    catalog::os::register(&registry, root.path()).unwrap();

    assert_eq!(registry.value("operatingsystem").as_deref(), Some("Linux"));
    // architecture is only defined for Debian
    assert_eq!(registry.lookup("architecture").unwrap().count(), 0);
    assert_eq!(registry.value("architecture"), None);
}

#[test]
fn test_solaris_host() {
    let root = root_with(&[]);
    let registry = fake_host("SunOS", "sun4u");
    catalog::os::register(&registry, root.path()).unwrap();

    assert_eq!(registry.value("operatingsystem").as_deref(), Some("Solaris"));
    assert_eq!(registry.lookup("id").unwrap().count(), 0);
    assert_eq!(registry.lookup("uniqueid").unwrap().count(), 1);
}

#[test]
fn test_bsd_family_ps() {
    let root = root_with(&[]);
    let registry = fake_host("Darwin", "arm64");
    catalog::os::register(&registry, root.path()).unwrap();

    assert_eq!(registry.value("operatingsystem").as_deref(), Some("Darwin"));
    assert_eq!(registry.value("ps").as_deref(), Some("ps -auxwww"));
}

// =============================================================================
// Tags
// =============================================================================

#[test]
fn test_os_tag_export() {
    let root = root_with(&["fedora-release"]);
    let registry = fake_host("Linux", "x86_64");
    catalog::os::register(&registry, root.path()).unwrap();

    let exported = registry.export(["os"]);
    assert_eq!(exported.get("operatingsystem").map(String::as_str), Some("Fedora"));
    assert_eq!(exported.get("operatingsystemrelease").map(String::as_str), Some("6.1.0"));
    assert!(!exported.contains_key("kernel"));
}

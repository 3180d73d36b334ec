//! Shared fixtures for integration tests.

use std::fs;
use std::path::Path;

use app_container::config::ContainerConfig;

/// Lay down a scan tree matching the demo registration table, plus one
/// helper unit that has no definition and must be skipped quietly.
pub fn write_demo_tree(root: &Path) {
    for unit in ["users.rs", "greeting.rs", "status.rs", "mod.rs"] {
        fs::write(root.join(unit), "// demo unit\n").unwrap();
    }
    fs::create_dir_all(root.join("support")).unwrap();
    fs::write(root.join("support/format.rs"), "// helper\n").unwrap();
    fs::write(root.join("support/NOTES.txt"), "not a source unit\n").unwrap();
}

/// Default config pointed at the given scan root.
#[allow(dead_code)]
pub fn demo_config(root: &Path) -> ContainerConfig {
    let mut config = ContainerConfig::default();
    config.scan.package_scan = "demo".to_string();
    config.scan.source_root = root.display().to_string();
    config
}

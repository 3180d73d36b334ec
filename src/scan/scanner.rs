//! Recursive source-unit discovery.

use std::collections::BTreeSet;
use std::path::{Path, PathBuf};

use thiserror::Error;
use walkdir::WalkDir;

const SOURCE_EXTENSION: &str = "rs";

#[derive(Debug, Error)]
pub enum ScanError {
    #[error("scan root `{path}` is missing or not a directory")]
    RootUnavailable { path: PathBuf },
    #[error("failed to walk `{path}`: {source}")]
    Walk {
        path: PathBuf,
        #[source]
        source: walkdir::Error,
    },
}

/// Discover every source unit under `root`, qualified with `namespace`.
///
/// A file `users/controller.rs` under the root becomes
/// `<namespace>::users::controller`. Directories are recursed into
/// unconditionally; files without the source extension are skipped. The
/// result is an ordered set, so an unchanged tree always scans to the same
/// identifiers.
///
/// The container cannot run without a component universe, so an unreadable
/// root (or an error partway through the walk) is fatal.
pub fn scan_units(root: &Path, namespace: &str) -> Result<BTreeSet<String>, ScanError> {
    if !root.is_dir() {
        return Err(ScanError::RootUnavailable {
            path: root.to_path_buf(),
        });
    }

    let mut units = BTreeSet::new();
    for entry in WalkDir::new(root) {
        let entry = entry.map_err(|source| ScanError::Walk {
            path: root.to_path_buf(),
            source,
        })?;
        if !entry.file_type().is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some(SOURCE_EXTENSION) {
            continue;
        }
        if let Some(unit) = qualify(root, path, namespace) {
            units.insert(unit);
        }
    }

    tracing::debug!(root = %root.display(), units = units.len(), "source tree scanned");
    Ok(units)
}

/// Turn a source file path into its fully-qualified unit identifier,
/// converting path separators to `::` and dropping the extension.
fn qualify(root: &Path, path: &Path, namespace: &str) -> Option<String> {
    let relative = path.strip_prefix(root).ok()?;
    let mut unit = String::from(namespace);
    for component in relative.parent().into_iter().flat_map(Path::components) {
        unit.push_str("::");
        unit.push_str(component.as_os_str().to_str()?);
    }
    unit.push_str("::");
    unit.push_str(relative.file_stem()?.to_str()?);
    Some(unit)
}

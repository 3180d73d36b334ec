//! Source-tree discovery subsystem.
//!
//! # Data Flow
//! ```text
//! scan.source_root (directory) + scan.package_scan (namespace)
//!     → scanner.rs (recursive walk, extension filter)
//!     → BTreeSet<String> of fully-qualified unit identifiers
//!     → consumed once by the registry's instantiation pass
//! ```

pub mod scanner;

pub use scanner::{scan_units, ScanError};

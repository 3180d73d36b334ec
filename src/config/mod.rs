//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → validation.rs (semantic checks)
//!     → ContainerConfig (validated, immutable)
//!     → consumed by startup and the HTTP adapter
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded; components never see it change
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::ContainerConfig;
pub use schema::ListenerConfig;
pub use schema::ScanConfig;

//! Lifecycle management subsystem.
//!
//! # Data Flow
//! ```text
//! Startup (startup.rs):
//!     Load config → Scan units → Instantiate → Wire → Build routes
//!     → "container initialized" → accept traffic
//!
//! Shutdown (shutdown.rs):
//!     Ctrl+C / trigger → broadcast → HTTP server drains and exits
//! ```
//!
//! # Design Decisions
//! - Ordered startup; traffic only after the whole pipeline finished
//! - Initialization never re-runs; there is no hot reload of components

pub mod shutdown;
pub mod startup;

pub use shutdown::Shutdown;
pub use startup::{start, start_from_file, Container, StartupError};

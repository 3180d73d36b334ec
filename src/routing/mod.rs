//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Route compilation (at startup):
//!     Registered components with route metadata
//!     → table.rs (prefix + suffix concatenation, pattern compilation)
//!     → handler.rs (instance + invoker + parameter-binding table)
//!     → Freeze as immutable RouteTable
//!
//! Per request:
//!     request path → table.rs (exact lookup) → Handler or no-match
//! ```
//!
//! # Design Decisions
//! - Routes compiled once at startup, immutable at runtime
//! - Exact-match lookup; the compiled pattern stays on the handler so path
//!   variables can land without changing the table shape
//! - Collisions are construction errors, not silent overwrites

pub mod handler;
pub mod table;

pub use handler::{Handler, HandlerFault};
pub use table::{RouteError, RouteTable};

//! Dispatch subsystem.
//!
//! # Data Flow
//! ```text
//! Inbound request path
//!     → dispatcher.rs (exact route lookup)
//!     → argument assembly from the handler's binding table
//!     → invoker call on the bound singleton
//!     → HttpResponse, or a typed not-found / fault outcome
//! ```

pub mod dispatcher;

pub use dispatcher::{DispatchError, Dispatcher};

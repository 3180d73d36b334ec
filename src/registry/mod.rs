//! Component registry subsystem.
//!
//! # Data Flow
//! ```text
//! Scanned units + definition table
//!     → store.rs (instantiate: construct + bind singletons)
//!     → store.rs (wire: one injection pass over all components)
//!     → Frozen ComponentRegistry, shared read-only with routing/dispatch
//! ```
//!
//! # Design Decisions
//! - Components self-describe through a static definition table instead of
//!   runtime type lookup
//! - Instantiation and wiring are decoupled phases; wiring never constructs
//! - Interface bindings are extra names for one shared instance

pub mod component;
pub mod definition;
pub mod naming;
pub mod store;

pub use component::Component;
pub use definition::{BoxError, ComponentDefinition, ConstructFn, Constructed, Role};
pub use store::{BindingKind, ComponentRegistry, RegistryError};

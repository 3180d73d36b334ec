//! The managed component contract.

use std::any::Any;

use crate::registry::ComponentRegistry;

/// A singleton managed by the container.
///
/// Implementations are constructed once during initialization, shared across
/// all requests afterwards, and must therefore be stateless or internally
/// synchronized (`OnceLock`, atomics, locks).
pub trait Component: Send + Sync + 'static {
    /// Borrow the component as [`Any`] so route handlers can recover the
    /// concrete type.
    fn as_any(&self) -> &dyn Any;

    /// Dependency injection hook.
    ///
    /// Called exactly once per component, after every singleton has been
    /// constructed, so a dependency declared here always refers to an
    /// already-existing instance regardless of instantiation order. A lookup
    /// that finds no matching binding leaves the dependency unset; that is
    /// quiet degradation, not an error.
    fn wire(&self, registry: &ComponentRegistry) {
        let _ = registry;
    }
}

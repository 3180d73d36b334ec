//! Declarative component registration.
//!
//! # Responsibilities
//! - Describe each managed type: source unit, role, constructor, routes
//! - Capture interface exposures with their concrete type still known
//!
//! # Design Decisions
//! - A static definition table replaces runtime type lookup by string;
//!   the scanner gates which definitions are eligible for instantiation
//! - Constructors are zero-argument; dependencies arrive later via wiring

use std::any::Any;
use std::sync::Arc;

use crate::registry::component::Component;
use crate::registry::naming;
use crate::routing::handler::RouteSpec;

/// Boxed error produced by a failing constructor.
pub type BoxError = Box<dyn std::error::Error + Send + Sync>;

/// Zero-argument constructor for a managed component.
pub type ConstructFn = fn() -> Result<Constructed, BoxError>;

/// Role tag deciding how a component is bound into the registry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Role {
    /// Bound only under its derived name; eligible for route registration.
    Controller,
    /// Bound under its alias (or derived name) plus every exposed interface.
    Service {
        /// Optional binding alias; blank values fall back to the derived name.
        alias: Option<&'static str>,
    },
}

/// One entry in the registration table.
pub struct ComponentDefinition {
    /// Fully-qualified source unit the type lives in, e.g. `demo::users`.
    /// Only definitions whose unit was discovered by the scanner are
    /// instantiated.
    pub unit: &'static str,
    /// Simple name of the concrete type, e.g. `UserController`.
    pub type_name: &'static str,
    pub role: Role,
    pub construct: ConstructFn,
    /// Route metadata; `None` for components without handler methods.
    pub routes: Option<&'static RouteSpec>,
}

/// A freshly constructed singleton plus its registry exposures.
pub struct Constructed {
    pub(crate) component: Arc<dyn Component>,
    /// The concrete `Arc<C>`, type-erased for name-based lookup.
    pub(crate) exposed_self: Box<dyn Any + Send + Sync>,
    pub(crate) interfaces: Vec<InterfaceExposure>,
}

pub(crate) struct InterfaceExposure {
    /// Simple name of the exposed trait.
    pub(crate) name: &'static str,
    /// `Arc<dyn Trait>` coerced at construction time, type-erased.
    pub(crate) handle: Box<dyn Any + Send + Sync>,
}

impl Constructed {
    /// Start building the exposures for a freshly constructed component.
    pub fn of<C: Component>(component: C) -> ConstructedBuilder<C> {
        ConstructedBuilder {
            concrete: Arc::new(component),
            interfaces: Vec::new(),
        }
    }
}

/// Builder keeping the concrete type around so trait coercions can happen
/// at the registration site instead of through downcasts at lookup time.
pub struct ConstructedBuilder<C: Component> {
    concrete: Arc<C>,
    interfaces: Vec<InterfaceExposure>,
}

impl<C: Component> ConstructedBuilder<C> {
    /// Expose the component under one of the interfaces it implements.
    ///
    /// The cast is a plain unsizing coercion written by the caller, e.g.
    /// `.exposing(|c| c as Arc<dyn UserDirectory>)`. The binding name is
    /// derived from the trait's simple name.
    pub fn exposing<T>(mut self, cast: fn(Arc<C>) -> Arc<T>) -> Self
    where
        T: ?Sized + Send + Sync + 'static,
    {
        let handle: Arc<T> = cast(self.concrete.clone());
        self.interfaces.push(InterfaceExposure {
            name: naming::simple_name(std::any::type_name::<T>()),
            handle: Box::new(handle),
        });
        self
    }

    pub fn build(self) -> Constructed {
        Constructed {
            exposed_self: Box::new(self.concrete.clone()),
            component: self.concrete,
            interfaces: self.interfaces,
        }
    }
}

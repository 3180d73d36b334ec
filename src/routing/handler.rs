//! Handler descriptors and the invocation contract.
//!
//! # Responsibilities
//! - Describe route metadata attached to a component (prefix + methods)
//! - Bind a compiled route to its instance, invoker, and parameter table
//! - Carry arguments into an invoker in declared call order
//!
//! # Design Decisions
//! - Invokers are plain function pointers written next to the component;
//!   they recover the concrete type with a checked downcast
//! - Transport parameters bind under the fixed identifiers `request` and
//!   `response`; everything else binds under its own name
//! - The compiled pattern is kept on the handler for future path variables;
//!   table lookup itself is exact-match

use std::sync::Arc;

use regex::Regex;
use serde_json::Value;
use thiserror::Error;

use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::registry::Component;

/// Fixed binding identifier for an injected request object.
pub const REQUEST_PARAM: &str = "request";
/// Fixed binding identifier for an injected response object.
pub const RESPONSE_PARAM: &str = "response";

/// Class-level route metadata: path prefix plus the tagged methods.
pub struct RouteSpec {
    pub prefix: &'static str,
    pub methods: &'static [MethodRoute],
}

/// One tagged method: path suffix, declared parameters, and its invoker.
pub struct MethodRoute {
    pub name: &'static str,
    pub path: &'static str,
    /// Parameters in declaration order; positions in the binding table
    /// follow this order.
    pub params: &'static [ParamSpec],
    pub invoke: InvokeFn,
}

/// Declared parameter of a handler method.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamSpec {
    Request,
    Response,
    Named(&'static str),
}

/// Invoker signature: the component the handler was bound to, plus the
/// arguments assembled by the dispatcher.
pub type InvokeFn = fn(&dyn Component, &mut CallArgs<'_>) -> Result<Value, HandlerFault>;

/// Fault raised by (or on behalf of) a handler method.
#[derive(Debug, Error)]
pub enum HandlerFault {
    #[error("handler bound to unexpected component type (expected {expected})")]
    ComponentType { expected: &'static str },
    #[error("argument slot {position} does not hold a {expected} value")]
    Slot {
        position: usize,
        expected: &'static str,
    },
    #[error("{0}")]
    Failed(String),
}

impl HandlerFault {
    pub fn failed(message: impl Into<String>) -> Self {
        HandlerFault::Failed(message.into())
    }
}

/// Recover the concrete component type inside an invoker.
pub fn expect_component<C: Component>(component: &dyn Component) -> Result<&C, HandlerFault> {
    component
        .as_any()
        .downcast_ref::<C>()
        .ok_or(HandlerFault::ComponentType {
            expected: std::any::type_name::<C>(),
        })
}

/// How one parameter slot is filled at dispatch time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParamKind {
    Request,
    Response,
    Named,
}

/// One row of a handler's parameter-binding table.
#[derive(Debug, Clone)]
pub struct ParamBinding {
    /// `request`, `response`, or the parameter's own name.
    pub identifier: String,
    pub kind: ParamKind,
    /// Positional slot in the call, following declaration order.
    pub position: usize,
}

/// A positional argument value assembled for one invocation.
pub enum CallValue<'a> {
    Request(&'a HttpRequest),
    Response(&'a mut HttpResponse),
    /// Named parameter resolved from the request; `None` when absent.
    Param(Option<String>),
}

/// Positional argument frame handed to an invoker.
pub struct CallArgs<'a> {
    slots: Vec<CallValue<'a>>,
}

impl<'a> CallArgs<'a> {
    pub(crate) fn new(slots: Vec<CallValue<'a>>) -> Self {
        Self { slots }
    }

    pub fn request(&self, position: usize) -> Result<&HttpRequest, HandlerFault> {
        match self.slots.get(position) {
            Some(CallValue::Request(request)) => Ok(request),
            _ => Err(HandlerFault::Slot {
                position,
                expected: "request",
            }),
        }
    }

    pub fn response(&mut self, position: usize) -> Result<&mut HttpResponse, HandlerFault> {
        match self.slots.get_mut(position) {
            Some(CallValue::Response(response)) => Ok(response),
            _ => Err(HandlerFault::Slot {
                position,
                expected: "response",
            }),
        }
    }

    pub fn named(&self, position: usize) -> Result<Option<&str>, HandlerFault> {
        match self.slots.get(position) {
            Some(CallValue::Param(value)) => Ok(value.as_deref()),
            _ => Err(HandlerFault::Slot {
                position,
                expected: "named parameter",
            }),
        }
    }
}

/// A compiled route bound to its singleton and invoker.
///
/// Built once while the route table is constructed, immutable afterwards.
/// The instance is shared with the registry, never owned here.
pub struct Handler {
    pub(crate) route: String,
    pub(crate) component: &'static str,
    pub(crate) method: &'static str,
    pub(crate) instance: Arc<dyn Component>,
    pub(crate) invoke: InvokeFn,
    pub(crate) pattern: Regex,
    pub(crate) params: Vec<ParamBinding>,
}

impl Handler {
    pub fn route(&self) -> &str {
        &self.route
    }

    /// Simple name of the owning component type.
    pub fn component_name(&self) -> &'static str {
        self.component
    }

    pub fn method_name(&self) -> &'static str {
        self.method
    }

    /// Match against the compiled pattern (anchored to the full path).
    pub fn matches(&self, path: &str) -> bool {
        self.pattern.is_match(path)
    }

    pub fn params(&self) -> &[ParamBinding] {
        &self.params
    }

    pub fn position_of(&self, identifier: &str) -> Option<usize> {
        self.params
            .iter()
            .find(|binding| binding.identifier == identifier)
            .map(|binding| binding.position)
    }
}

//! Route table construction and lookup.
//!
//! # Responsibilities
//! - Concatenate class-level prefixes with method-level suffixes
//! - Compile each full route into an anchored pattern
//! - Build per-method parameter-binding tables
//! - Reject duplicate routes and duplicate parameter identifiers
//!
//! # Design Decisions
//! - Keys are the raw full route strings; lookup is exact-match
//! - Collisions fail construction instead of silently overwriting

use std::collections::hash_map::Entry;
use std::collections::{HashMap, HashSet};

use regex::Regex;
use thiserror::Error;

use crate::registry::store::ManagedComponent;
use crate::registry::ComponentRegistry;
use crate::routing::handler::{
    Handler, MethodRoute, ParamBinding, ParamKind, ParamSpec, RouteSpec, REQUEST_PARAM,
    RESPONSE_PARAM,
};

#[derive(Debug, Error)]
pub enum RouteError {
    #[error("route `{route}` is not a valid pattern: {source}")]
    InvalidPattern {
        route: String,
        #[source]
        source: Box<regex::Error>,
    },
    #[error("route `{route}` registered by both {existing} and {incoming}")]
    DuplicateRoute {
        route: String,
        existing: String,
        incoming: String,
    },
    #[error("route `{route}` binds parameter `{identifier}` more than once")]
    DuplicateParam { route: String, identifier: String },
}

/// Mapping from full route string to its handler.
///
/// Built once from the wired registry, read-only during serving.
pub struct RouteTable {
    routes: HashMap<String, Handler>,
}

impl std::fmt::Debug for RouteTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RouteTable")
            .field("routes", &self.routes.len())
            .finish()
    }
}

impl RouteTable {
    /// Compile a handler for every tagged method on every registered
    /// component that carries route metadata.
    pub fn build(registry: &ComponentRegistry) -> Result<Self, RouteError> {
        let mut routes: HashMap<String, Handler> = HashMap::new();

        for managed in registry.managed() {
            let Some(spec) = managed.definition.routes else {
                continue;
            };
            for method in spec.methods {
                let handler = compile(spec, method, managed)?;
                let route = handler.route.clone();
                match routes.entry(route) {
                    Entry::Occupied(occupied) => {
                        return Err(RouteError::DuplicateRoute {
                            route: occupied.key().clone(),
                            existing: format!(
                                "{}::{}",
                                occupied.get().component,
                                occupied.get().method
                            ),
                            incoming: format!(
                                "{}::{}",
                                managed.definition.type_name, method.name
                            ),
                        });
                    }
                    Entry::Vacant(vacant) => {
                        tracing::debug!(
                            route = %vacant.key(),
                            component = managed.definition.type_name,
                            method = method.name,
                            "route registered"
                        );
                        vacant.insert(handler);
                    }
                }
            }
        }

        Ok(Self { routes })
    }

    /// Exact-match lookup by request path.
    pub fn find(&self, path: &str) -> Option<&Handler> {
        self.routes.get(path)
    }

    pub fn len(&self) -> usize {
        self.routes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.routes.is_empty()
    }

    pub fn handlers(&self) -> impl Iterator<Item = &Handler> {
        self.routes.values()
    }
}

fn compile(
    spec: &RouteSpec,
    method: &MethodRoute,
    managed: &ManagedComponent,
) -> Result<Handler, RouteError> {
    let route = format!("{}{}", spec.prefix, method.path);
    let pattern = Regex::new(&format!("^{route}$")).map_err(|source| RouteError::InvalidPattern {
        route: route.clone(),
        source: Box::new(source),
    })?;
    let params = bind_params(&route, method.params)?;
    Ok(Handler {
        route,
        component: managed.definition.type_name,
        method: method.name,
        instance: managed.instance.clone(),
        invoke: method.invoke,
        pattern,
        params,
    })
}

/// Build the binding table in declaration order, recording each parameter's
/// positional slot for call assembly.
fn bind_params(route: &str, specs: &[ParamSpec]) -> Result<Vec<ParamBinding>, RouteError> {
    let mut seen = HashSet::new();
    let mut bindings = Vec::with_capacity(specs.len());

    for (position, spec) in specs.iter().enumerate() {
        let (identifier, kind) = match spec {
            ParamSpec::Request => (REQUEST_PARAM.to_owned(), ParamKind::Request),
            ParamSpec::Response => (RESPONSE_PARAM.to_owned(), ParamKind::Response),
            ParamSpec::Named(name) => ((*name).to_owned(), ParamKind::Named),
        };
        if !seen.insert(identifier.clone()) {
            return Err(RouteError::DuplicateParam {
                route: route.to_owned(),
                identifier,
            });
        }
        bindings.push(ParamBinding {
            identifier,
            kind,
            position,
        });
    }

    Ok(bindings)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BoxError, Component, ComponentDefinition, Constructed, Role};
    use crate::routing::handler::{expect_component, CallArgs, HandlerFault, MethodRoute};
    use serde_json::{json, Value};
    use std::collections::BTreeSet;

    struct PingController;

    impl PingController {
        fn ping(&self) -> Value {
            json!("pong")
        }
    }

    impl Component for PingController {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn invoke_ping(
        component: &dyn Component,
        _args: &mut CallArgs<'_>,
    ) -> Result<Value, HandlerFault> {
        Ok(expect_component::<PingController>(component)?.ping())
    }

    const PING_ROUTES: RouteSpec = RouteSpec {
        prefix: "/user",
        methods: &[
            MethodRoute {
                name: "list",
                path: "/list",
                params: &[],
                invoke: invoke_ping,
            },
            MethodRoute {
                name: "find",
                path: "/find",
                params: &[ParamSpec::Named("name"), ParamSpec::Response],
                invoke: invoke_ping,
            },
        ],
    };

    fn construct_ping() -> Result<Constructed, BoxError> {
        Ok(Constructed::of(PingController).build())
    }

    const PING: ComponentDefinition = ComponentDefinition {
        unit: "fixture::ping",
        type_name: "PingController",
        role: Role::Controller,
        construct: construct_ping,
        routes: Some(&PING_ROUTES),
    };

    fn registry_with(defs: &'static [ComponentDefinition]) -> ComponentRegistry {
        let units: BTreeSet<String> =
            defs.iter().map(|d| d.unit.to_owned()).collect();
        ComponentRegistry::instantiate(&units, defs).unwrap()
    }

    #[test]
    fn concatenates_prefix_and_suffix_into_the_full_route() {
        static DEFS: [ComponentDefinition; 1] = [PING];
        let registry = registry_with(&DEFS);
        let table = RouteTable::build(&registry).unwrap();

        assert_eq!(table.len(), 2);
        let handler = table.find("/user/list").unwrap();
        assert_eq!(handler.route(), "/user/list");
        assert_eq!(handler.component_name(), "PingController");
        assert_eq!(handler.method_name(), "list");
        assert!(handler.matches("/user/list"));
    }

    #[test]
    fn lookup_is_exact_match() {
        static DEFS: [ComponentDefinition; 1] = [PING];
        let registry = registry_with(&DEFS);
        let table = RouteTable::build(&registry).unwrap();

        assert!(table.find("/user/list").is_some());
        assert!(table.find("/user/list/").is_none());
        assert!(table.find("/user").is_none());
        assert!(table.find("/USER/LIST").is_none());
    }

    #[test]
    fn binding_table_records_identifiers_and_positions() {
        static DEFS: [ComponentDefinition; 1] = [PING];
        let registry = registry_with(&DEFS);
        let table = RouteTable::build(&registry).unwrap();

        let handler = table.find("/user/find").unwrap();
        let params = handler.params();
        assert_eq!(params.len(), 2);
        assert_eq!(params[0].identifier, "name");
        assert_eq!(params[0].kind, ParamKind::Named);
        assert_eq!(params[0].position, 0);
        assert_eq!(params[1].identifier, RESPONSE_PARAM);
        assert_eq!(params[1].kind, ParamKind::Response);
        assert_eq!(params[1].position, 1);
        assert_eq!(handler.position_of("response"), Some(1));
        assert_eq!(handler.position_of("absent"), None);
    }

    #[test]
    fn duplicate_routes_fail_construction() {
        const CLASHING_ROUTES: RouteSpec = RouteSpec {
            prefix: "/user",
            methods: &[MethodRoute {
                name: "also_list",
                path: "/list",
                params: &[],
                invoke: invoke_ping,
            }],
        };
        const CLASH: ComponentDefinition = ComponentDefinition {
            unit: "fixture::clash",
            type_name: "ClashController",
            role: Role::Controller,
            construct: construct_ping,
            routes: Some(&CLASHING_ROUTES),
        };
        static DEFS: [ComponentDefinition; 2] = [PING, CLASH];

        let registry = registry_with(&DEFS);
        let error = RouteTable::build(&registry).unwrap_err();

        match error {
            RouteError::DuplicateRoute { route, .. } => assert_eq!(route, "/user/list"),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn duplicate_parameter_identifiers_fail_construction() {
        const DOUBLED_ROUTES: RouteSpec = RouteSpec {
            prefix: "/broken",
            methods: &[MethodRoute {
                name: "doubled",
                path: "/doubled",
                params: &[ParamSpec::Named("name"), ParamSpec::Named("name")],
                invoke: invoke_ping,
            }],
        };
        const DOUBLED: ComponentDefinition = ComponentDefinition {
            unit: "fixture::doubled",
            type_name: "DoubledController",
            role: Role::Controller,
            construct: construct_ping,
            routes: Some(&DOUBLED_ROUTES),
        };
        static DEFS: [ComponentDefinition; 1] = [DOUBLED];

        let registry = registry_with(&DEFS);
        let error = RouteTable::build(&registry).unwrap_err();

        assert!(matches!(
            error,
            RouteError::DuplicateParam { identifier, .. } if identifier == "name"
        ));
    }

    #[test]
    fn components_without_route_metadata_contribute_nothing() {
        const SILENT: ComponentDefinition = ComponentDefinition {
            unit: "fixture::silent",
            type_name: "SilentService",
            role: Role::Service { alias: None },
            construct: construct_ping,
            routes: None,
        };
        static DEFS: [ComponentDefinition; 1] = [SILENT];

        let registry = registry_with(&DEFS);
        let table = RouteTable::build(&registry).unwrap();

        assert!(table.is_empty());
    }
}

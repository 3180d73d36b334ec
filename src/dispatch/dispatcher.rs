//! Request dispatch against the route table.

use std::sync::Arc;

use thiserror::Error;

use crate::http::request::HttpRequest;
use crate::http::response::HttpResponse;
use crate::routing::handler::{CallArgs, CallValue, Handler, HandlerFault, ParamKind};
use crate::routing::RouteTable;

#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("no handler registered for path `{path}`")]
    NotFound { path: String },
    #[error("handler {component}::{method} for route `{route}` failed: {source}")]
    Handler {
        route: String,
        component: &'static str,
        method: &'static str,
        #[source]
        source: HandlerFault,
    },
}

/// Resolves inbound request paths to handlers and invokes them.
///
/// Cheap to clone; safe to call concurrently once initialization finished,
/// since the table it reads never changes afterwards.
#[derive(Clone)]
pub struct Dispatcher {
    routes: Arc<RouteTable>,
}

impl Dispatcher {
    pub fn new(routes: Arc<RouteTable>) -> Self {
        Self { routes }
    }

    /// Dispatch one request.
    ///
    /// Arguments are assembled from the handler's binding table: the request
    /// itself and a response slot under their fixed identifiers, named
    /// parameters resolved from the request (absent ones stay `None`). A
    /// handler fault is reported to the caller; it never unwinds into the
    /// serving loop.
    pub fn dispatch(&self, request: &HttpRequest) -> Result<HttpResponse, DispatchError> {
        let Some(handler) = self.routes.find(request.path()) else {
            tracing::debug!(path = request.path(), "no handler for path");
            return Err(DispatchError::NotFound {
                path: request.path().to_owned(),
            });
        };

        tracing::debug!(
            route = handler.route(),
            component = handler.component_name(),
            method = handler.method_name(),
            "dispatching request"
        );

        let mut response = HttpResponse::new();
        let outcome = {
            let mut args = assemble(handler, request, &mut response);
            (handler.invoke)(handler.instance.as_ref(), &mut args)
        };

        match outcome {
            Ok(value) => {
                if response.body().is_empty() && !value.is_null() {
                    response.set_body(value.to_string());
                }
                Ok(response)
            }
            Err(fault) => {
                tracing::error!(
                    route = handler.route(),
                    component = handler.component_name(),
                    method = handler.method_name(),
                    error = %fault,
                    "handler invocation failed"
                );
                Err(DispatchError::Handler {
                    route: handler.route().to_owned(),
                    component: handler.component_name(),
                    method: handler.method_name(),
                    source: fault,
                })
            }
        }
    }
}

/// Fill the positional argument frame from the handler's binding table.
fn assemble<'a>(
    handler: &Handler,
    request: &'a HttpRequest,
    response: &'a mut HttpResponse,
) -> CallArgs<'a> {
    // Bindings are ordered by position; the table builder rejects duplicate
    // identifiers, so each transport slot appears at most once.
    let mut response_slot = Some(response);
    let slots = handler
        .params()
        .iter()
        .map(|binding| match binding.kind {
            ParamKind::Request => CallValue::Request(request),
            ParamKind::Response => CallValue::Response(
                response_slot
                    .take()
                    .expect("response parameter bound at most once"),
            ),
            ParamKind::Named => {
                CallValue::Param(request.param(&binding.identifier).map(str::to_owned))
            }
        })
        .collect();
    CallArgs::new(slots)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::{BoxError, Component, ComponentDefinition, Constructed, Role};
    use crate::routing::handler::{
        expect_component, MethodRoute, ParamSpec, RouteSpec,
    };
    use serde_json::{json, Value};
    use std::collections::BTreeSet;
    use crate::registry::ComponentRegistry;

    struct EchoController;

    impl Component for EchoController {
        fn as_any(&self) -> &dyn std::any::Any {
            self
        }
    }

    fn invoke_plain(
        component: &dyn Component,
        _args: &mut CallArgs<'_>,
    ) -> Result<Value, HandlerFault> {
        expect_component::<EchoController>(component)?;
        Ok(json!({ "ok": true }))
    }

    fn invoke_echo(
        component: &dyn Component,
        args: &mut CallArgs<'_>,
    ) -> Result<Value, HandlerFault> {
        expect_component::<EchoController>(component)?;
        let path = args.request(0)?.path().to_owned();
        let name = args.named(1)?.map(str::to_owned);
        let response = args.response(2)?;
        match name {
            Some(name) => Ok(json!({ "path": path, "name": name })),
            None => {
                response.set_status(400);
                Ok(json!({ "error": "missing name" }))
            }
        }
    }

    fn invoke_faulty(
        _component: &dyn Component,
        _args: &mut CallArgs<'_>,
    ) -> Result<Value, HandlerFault> {
        Err(HandlerFault::failed("boom"))
    }

    const ECHO_ROUTES: RouteSpec = RouteSpec {
        prefix: "/echo",
        methods: &[
            MethodRoute {
                name: "plain",
                path: "/plain",
                params: &[],
                invoke: invoke_plain,
            },
            MethodRoute {
                name: "named",
                path: "/named",
                params: &[
                    ParamSpec::Request,
                    ParamSpec::Named("name"),
                    ParamSpec::Response,
                ],
                invoke: invoke_echo,
            },
            MethodRoute {
                name: "faulty",
                path: "/faulty",
                params: &[],
                invoke: invoke_faulty,
            },
        ],
    };

    fn construct_echo() -> Result<Constructed, BoxError> {
        Ok(Constructed::of(EchoController).build())
    }

    const ECHO: ComponentDefinition = ComponentDefinition {
        unit: "fixture::echo",
        type_name: "EchoController",
        role: Role::Controller,
        construct: construct_echo,
        routes: Some(&ECHO_ROUTES),
    };

    static DEFS: [ComponentDefinition; 1] = [ECHO];

    fn dispatcher() -> Dispatcher {
        let units: BTreeSet<String> = std::iter::once("fixture::echo".to_owned()).collect();
        let registry = ComponentRegistry::instantiate(&units, &DEFS).unwrap();
        registry.wire();
        let table = RouteTable::build(&registry).unwrap();
        Dispatcher::new(Arc::new(table))
    }

    #[test]
    fn return_value_becomes_the_body() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch(&HttpRequest::new("/echo/plain")).unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), r#"{"ok":true}"#);
    }

    #[test]
    fn named_parameters_and_transport_objects_are_injected() {
        let dispatcher = dispatcher();
        let request = HttpRequest::new("/echo/named").with_param("name", "ada");
        let response = dispatcher.dispatch(&request).unwrap();

        assert_eq!(response.status(), 200);
        assert_eq!(response.body(), r#"{"name":"ada","path":"/echo/named"}"#);
    }

    #[test]
    fn absent_named_parameters_arrive_as_none() {
        let dispatcher = dispatcher();
        let response = dispatcher.dispatch(&HttpRequest::new("/echo/named")).unwrap();

        assert_eq!(response.status(), 400);
        assert_eq!(response.body(), r#"{"error":"missing name"}"#);
    }

    #[test]
    fn unknown_paths_report_not_found() {
        let dispatcher = dispatcher();

        let error = dispatcher.dispatch(&HttpRequest::new("/nope")).unwrap_err();
        assert!(matches!(error, DispatchError::NotFound { path } if path == "/nope"));

        let error = dispatcher
            .dispatch(&HttpRequest::new("/echo/plain/"))
            .unwrap_err();
        assert!(matches!(error, DispatchError::NotFound { .. }));
    }

    #[test]
    fn handler_faults_are_reported_not_propagated() {
        let dispatcher = dispatcher();

        let error = dispatcher.dispatch(&HttpRequest::new("/echo/faulty")).unwrap_err();
        match error {
            DispatchError::Handler { route, component, method, .. } => {
                assert_eq!(route, "/echo/faulty");
                assert_eq!(component, "EchoController");
                assert_eq!(method, "faulty");
            }
            other => panic!("unexpected error: {other}"),
        }

        // The dispatcher keeps serving after a fault.
        assert!(dispatcher.dispatch(&HttpRequest::new("/echo/plain")).is_ok());
    }
}

//! Status controller: liveness, greetings, directory statistics.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use serde_json::{json, Value};

use crate::demo::greeting::GreetingService;
use crate::demo::users::DirectoryStats;
use crate::registry::{BoxError, Component, ComponentRegistry, Constructed};
use crate::routing::handler::{
    expect_component, CallArgs, HandlerFault, MethodRoute, ParamSpec, RouteSpec,
};

/// Controller behind the `/status` routes.
pub struct StatusController {
    greeter: OnceLock<Arc<GreetingService>>,
    stats: OnceLock<Arc<dyn DirectoryStats>>,
}

impl StatusController {
    fn new() -> Self {
        Self {
            greeter: OnceLock::new(),
            stats: OnceLock::new(),
        }
    }

    fn ping(&self, path: &str) -> Value {
        json!({ "status": "ok", "path": path })
    }

    fn greet(&self, name: Option<&str>) -> Result<Value, HandlerFault> {
        let greeter = self
            .greeter
            .get()
            .ok_or_else(|| HandlerFault::failed("greeting service not wired"))?;
        let name = name.unwrap_or("anonymous");
        Ok(json!({ "greeting": greeter.greet(name) }))
    }

    fn stats(&self) -> Result<Value, HandlerFault> {
        let stats = self
            .stats
            .get()
            .ok_or_else(|| HandlerFault::failed("directory stats not wired"))?;
        Ok(json!({ "users": stats.user_count() }))
    }
}

impl Component for StatusController {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn wire(&self, registry: &ComponentRegistry) {
        // The greeting service lives under its alias, not its derived name.
        if let Some(greeter) = registry.resolve_named::<GreetingService>("greeter") {
            let _ = self.greeter.set(greeter);
        }
        if let Some(stats) = registry.resolve::<dyn DirectoryStats>() {
            let _ = self.stats.set(stats);
        }
    }
}

pub(crate) fn construct_status() -> Result<Constructed, BoxError> {
    Ok(Constructed::of(StatusController::new()).build())
}

fn invoke_ping(component: &dyn Component, args: &mut CallArgs<'_>) -> Result<Value, HandlerFault> {
    let controller = expect_component::<StatusController>(component)?;
    let request = args.request(0)?;
    Ok(controller.ping(request.path()))
}

fn invoke_greet(component: &dyn Component, args: &mut CallArgs<'_>) -> Result<Value, HandlerFault> {
    let controller = expect_component::<StatusController>(component)?;
    let name = args.named(0)?.map(str::to_owned);
    controller.greet(name.as_deref())
}

fn invoke_stats(component: &dyn Component, _args: &mut CallArgs<'_>) -> Result<Value, HandlerFault> {
    expect_component::<StatusController>(component)?.stats()
}

pub(crate) static ROUTES: RouteSpec = RouteSpec {
    prefix: "/status",
    methods: &[
        MethodRoute {
            name: "ping",
            path: "/ping",
            params: &[ParamSpec::Request],
            invoke: invoke_ping,
        },
        MethodRoute {
            name: "greet",
            path: "/greet",
            params: &[ParamSpec::Named("name")],
            invoke: invoke_greet,
        },
        MethodRoute {
            name: "stats",
            path: "/stats",
            params: &[],
            invoke: invoke_stats,
        },
    ],
};

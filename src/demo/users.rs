//! User directory components.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use serde_json::{json, Value};

use crate::http::HttpResponse;
use crate::registry::{BoxError, Component, ComponentRegistry, Constructed};
use crate::routing::handler::{
    expect_component, CallArgs, HandlerFault, MethodRoute, ParamSpec, RouteSpec,
};

/// Abstraction over the user store; dependents resolve this, not the
/// concrete service.
pub trait UserDirectory: Send + Sync {
    fn all(&self) -> Vec<String>;
    fn find(&self, name: &str) -> Option<String>;
}

/// Read-only statistics about the directory.
pub trait DirectoryStats: Send + Sync {
    fn user_count(&self) -> usize;
}

/// In-memory directory backing the demo routes.
pub struct StaticUserDirectory {
    users: Vec<String>,
}

impl StaticUserDirectory {
    pub fn new() -> Self {
        Self {
            users: ["ada", "grace", "linus"].map(String::from).to_vec(),
        }
    }
}

impl Default for StaticUserDirectory {
    fn default() -> Self {
        Self::new()
    }
}

impl UserDirectory for StaticUserDirectory {
    fn all(&self) -> Vec<String> {
        self.users.clone()
    }

    fn find(&self, name: &str) -> Option<String> {
        self.users.iter().find(|user| user.as_str() == name).cloned()
    }
}

impl DirectoryStats for StaticUserDirectory {
    fn user_count(&self) -> usize {
        self.users.len()
    }
}

impl Component for StaticUserDirectory {
    fn as_any(&self) -> &dyn Any {
        self
    }
}

pub(crate) fn construct_directory() -> Result<Constructed, BoxError> {
    Ok(Constructed::of(StaticUserDirectory::new())
        .exposing(|c| c as Arc<dyn UserDirectory>)
        .exposing(|c| c as Arc<dyn DirectoryStats>)
        .build())
}

/// Controller behind the `/user` routes.
pub struct UserController {
    directory: OnceLock<Arc<dyn UserDirectory>>,
}

impl UserController {
    fn new() -> Self {
        Self {
            directory: OnceLock::new(),
        }
    }

    fn directory(&self) -> Result<&Arc<dyn UserDirectory>, HandlerFault> {
        self.directory
            .get()
            .ok_or_else(|| HandlerFault::failed("user directory not wired"))
    }

    fn list(&self) -> Result<Value, HandlerFault> {
        Ok(json!(self.directory()?.all()))
    }

    fn find(
        &self,
        name: Option<&str>,
        response: &mut HttpResponse,
    ) -> Result<Value, HandlerFault> {
        let Some(name) = name else {
            response.set_status(400);
            return Ok(json!({ "error": "missing `name` parameter" }));
        };
        match self.directory()?.find(name) {
            Some(user) => Ok(json!({ "user": user })),
            None => {
                response.set_status(404);
                Ok(json!({ "error": "unknown user" }))
            }
        }
    }
}

impl Component for UserController {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn wire(&self, registry: &ComponentRegistry) {
        if let Some(directory) = registry.resolve::<dyn UserDirectory>() {
            let _ = self.directory.set(directory);
        }
    }
}

pub(crate) fn construct_controller() -> Result<Constructed, BoxError> {
    Ok(Constructed::of(UserController::new()).build())
}

fn invoke_list(component: &dyn Component, _args: &mut CallArgs<'_>) -> Result<Value, HandlerFault> {
    expect_component::<UserController>(component)?.list()
}

fn invoke_find(component: &dyn Component, args: &mut CallArgs<'_>) -> Result<Value, HandlerFault> {
    let controller = expect_component::<UserController>(component)?;
    let name = args.named(0)?.map(str::to_owned);
    let response = args.response(1)?;
    controller.find(name.as_deref(), response)
}

pub(crate) static ROUTES: RouteSpec = RouteSpec {
    prefix: "/user",
    methods: &[
        MethodRoute {
            name: "list",
            path: "/list",
            params: &[],
            invoke: invoke_list,
        },
        MethodRoute {
            name: "find",
            path: "/find",
            params: &[ParamSpec::Named("name"), ParamSpec::Response],
            invoke: invoke_find,
        },
    ],
};

//! Demo application managed by the container.
//!
//! Three source units under this directory form the scanned component
//! universe of the default configuration; the table below is their
//! registration manifest. Integration tests reuse the same components
//! against scan trees of their own.

pub mod greeting;
pub mod status;
pub mod users;

use crate::registry::{ComponentDefinition, Role};

static DEFINITIONS: &[ComponentDefinition] = &[
    ComponentDefinition {
        unit: "demo::users",
        type_name: "StaticUserDirectory",
        role: Role::Service { alias: None },
        construct: users::construct_directory,
        routes: None,
    },
    ComponentDefinition {
        unit: "demo::users",
        type_name: "UserController",
        role: Role::Controller,
        construct: users::construct_controller,
        routes: Some(&users::ROUTES),
    },
    ComponentDefinition {
        unit: "demo::greeting",
        type_name: "GreetingService",
        role: Role::Service { alias: Some("greeter") },
        construct: greeting::construct_greeter,
        routes: None,
    },
    ComponentDefinition {
        unit: "demo::status",
        type_name: "StatusController",
        role: Role::Controller,
        construct: status::construct_status,
        routes: Some(&status::ROUTES),
    },
];

/// The demo registration table.
pub fn definitions() -> &'static [ComponentDefinition] {
    DEFINITIONS
}

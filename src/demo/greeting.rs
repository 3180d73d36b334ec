//! Greeting service, wired against the user directory abstraction.

use std::any::Any;
use std::sync::{Arc, OnceLock};

use crate::demo::users::UserDirectory;
use crate::registry::{BoxError, Component, ComponentRegistry, Constructed};

/// Builds greetings for known and unknown users. Registered under the
/// alias `greeter`.
pub struct GreetingService {
    directory: OnceLock<Arc<dyn UserDirectory>>,
}

impl GreetingService {
    fn new() -> Self {
        Self {
            directory: OnceLock::new(),
        }
    }

    pub fn greet(&self, name: &str) -> String {
        let known = self
            .directory
            .get()
            .and_then(|directory| directory.find(name));
        match known {
            Some(user) => format!("hello, {user}"),
            None => format!("hello, stranger {name}"),
        }
    }
}

impl Component for GreetingService {
    fn as_any(&self) -> &dyn Any {
        self
    }

    fn wire(&self, registry: &ComponentRegistry) {
        if let Some(directory) = registry.resolve::<dyn UserDirectory>() {
            let _ = self.directory.set(directory);
        }
    }
}

pub(crate) fn construct_greeter() -> Result<Constructed, BoxError> {
    Ok(Constructed::of(GreetingService::new()).build())
}

//! Startup orchestration.
//!
//! # Responsibilities
//! - Run the initialization pipeline in order: load config, scan,
//!   instantiate, wire, build routes
//! - Emit a completion signal once every stage finished
//!
//! # Design Decisions
//! - Strictly single-threaded and run-to-completion; no request is served
//!   before the pipeline finishes
//! - Fail fast on discovery and collision errors; skip-and-continue on
//!   individual construction failures (handled inside the registry)

use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

use crate::config::loader::{self, ConfigError};
use crate::config::ContainerConfig;
use crate::dispatch::Dispatcher;
use crate::registry::{ComponentDefinition, ComponentRegistry, RegistryError};
use crate::routing::{RouteError, RouteTable};
use crate::scan::{scan_units, ScanError};

#[derive(Debug, Error)]
pub enum StartupError {
    #[error("configuration load failed: {0}")]
    Config(#[from] ConfigError),
    #[error("component scan failed: {0}")]
    Scan(#[from] ScanError),
    #[error("component instantiation failed: {0}")]
    Registry(#[from] RegistryError),
    #[error("route table construction failed: {0}")]
    Routes(#[from] RouteError),
}

/// The fully initialized container.
///
/// Owns the registry and route table; handed by reference to whatever
/// serves requests. There is no global state behind it.
pub struct Container {
    config: ContainerConfig,
    registry: ComponentRegistry,
    routes: Arc<RouteTable>,
}

impl std::fmt::Debug for Container {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Container")
            .field("config", &self.config)
            .field("registry", &self.registry)
            .field("routes", &self.routes)
            .finish()
    }
}

impl Container {
    pub fn config(&self) -> &ContainerConfig {
        &self.config
    }

    pub fn registry(&self) -> &ComponentRegistry {
        &self.registry
    }

    pub fn routes(&self) -> &RouteTable {
        &self.routes
    }

    /// A dispatcher sharing this container's route table.
    pub fn dispatcher(&self) -> Dispatcher {
        Dispatcher::new(self.routes.clone())
    }
}

/// Load configuration from a file, then run the remaining pipeline.
pub fn start_from_file(
    path: &Path,
    definitions: &'static [ComponentDefinition],
) -> Result<Container, StartupError> {
    let config = loader::load_config(path)?;
    tracing::info!(config = %path.display(), "configuration loaded");
    start(config, definitions)
}

/// Run the initialization pipeline over an already-loaded configuration.
pub fn start(
    config: ContainerConfig,
    definitions: &'static [ComponentDefinition],
) -> Result<Container, StartupError> {
    tracing::info!(
        namespace = %config.scan.package_scan,
        source_root = %config.scan.source_root,
        "scanning component universe"
    );
    let units = scan_units(Path::new(&config.scan.source_root), &config.scan.package_scan)?;
    tracing::info!(units = units.len(), "scan complete");

    let registry = ComponentRegistry::instantiate(&units, definitions)?;
    tracing::info!(
        components = registry.component_count(),
        bindings = registry.binding_count(),
        "components instantiated"
    );

    registry.wire();
    tracing::info!("dependencies wired");

    let routes = RouteTable::build(&registry)?;
    tracing::info!(routes = routes.len(), "route table built");

    tracing::info!("container initialized");
    Ok(Container {
        config,
        registry,
        routes: Arc::new(routes),
    })
}

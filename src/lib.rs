//! Minimal application container: component discovery, a singleton
//! registry with dependency wiring, and route dispatch for inbound
//! HTTP request paths.

pub mod config;
pub mod demo;
pub mod dispatch;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod registry;
pub mod routing;
pub mod scan;

pub use config::ContainerConfig;
pub use dispatch::Dispatcher;
pub use http::HttpServer;
pub use lifecycle::{start, Container, Shutdown};
pub use registry::ComponentRegistry;
pub use routing::RouteTable;

//! HTTP surface of the container.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware, request ID)
//!     → request.rs (path + query → HttpRequest)
//!     → dispatcher (route lookup, handler invocation)
//!     → response.rs (HttpResponse → status + body)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{HttpRequest, X_REQUEST_ID};
pub use response::HttpResponse;
pub use server::HttpServer;

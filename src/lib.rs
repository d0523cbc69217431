//! Lesson content gateway library.
//!
//! Republishes the lesson content API under a stable local route
//! hierarchy, with permissive CORS and a binary image relay.

pub mod config;
pub mod error;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;
pub mod upstream;

pub use config::GatewayConfig;
pub use error::GatewayError;
pub use http::HttpServer;
pub use lifecycle::Shutdown;

//! Upstream subsystem.
//!
//! # Data Flow
//! ```text
//! RouteMatch → upstream URL
//!     → client.rs (one GET, bounded by timeout)
//!     → Ok(JSON) | Status(non-2xx) | Transport(message)
//!     → http::response (translate to local response)
//! ```

pub mod client;

pub use client::{FetchError, UpstreamClient};

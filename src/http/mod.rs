//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → middleware/cors.rs (CORS headers, preflight short-circuit)
//!     → request.rs (request ID)
//!     → server.rs (Axum setup)
//!         /proxy-image → relay.rs (stream arbitrary URL)
//!         anything else → dispatcher (routing table → upstream)
//!     → response.rs (JSON success / ErrorBody)
//!     → Send to client
//! ```

pub mod middleware;
pub mod relay;
pub mod request;
pub mod response;
pub mod server;

pub use request::{MakeRequestUuidV4, X_REQUEST_ID};
pub use response::ErrorBody;
pub use server::{AppState, HttpServer, ServerError};

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path)
//!     → router.rs (route lookup, most specific first)
//!     → pattern.rs (segment match, capture variables)
//!     → template.rs (interpolate captures into upstream URL)
//!     → Return: matched Route + upstream URL, or NoMatch
//!
//! Route Compilation (at startup):
//!     (pattern, template) pairs
//!     → Parse and cross-check variables
//!     → Reject same-specificity overlaps
//!     → Sort by segment count
//!     → Freeze as immutable Router
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex in hot path (segment comparison only)
//! - Deterministic: same input always matches same route
//! - First match wins (ordered by specificity)

use thiserror::Error;

pub mod pattern;
pub mod router;
pub mod template;

pub use pattern::{Captures, PathPattern};
pub use router::{Route, RouteMatch, Router};
pub use template::UpstreamTemplate;

/// Errors raised while compiling the route table.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    #[error("invalid pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },

    #[error("invalid upstream template '{template}': {reason}")]
    InvalidTemplate { template: String, reason: String },

    #[error("'{pattern}' binds variable '{name}' more than once")]
    DuplicateVariable { pattern: String, name: String },

    #[error("upstream template '{template}' uses unbound variable '{name}'")]
    UnboundVariable { template: String, name: String },

    #[error("patterns '{first}' and '{second}' have equal specificity and overlap")]
    Overlap { first: String, second: String },
}

//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming Request (path, query)
//!     → router.rs (ordered rule scan)
//!     → matcher.rs (segment-aligned prefix match, yields remaining suffix)
//!     → rewrite.rs (single substitution on the suffix)
//!     → target.rs (join with backend base URL)
//!     → Return: RouteMatch or NoMatch (static/SPA fallback)
//!
//! Route Compilation (at startup):
//!     GatewayConfig.backends
//!     → Parse targets, compile rewrites
//!     → Reject shadowed rules
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - Declaration order is priority order; no specificity sorting
//! - Deterministic: same input always matches same route
//! - First match wins

pub mod matcher;
pub mod rewrite;
pub mod router;
pub mod target;

pub use matcher::PathPrefixMatcher;
pub use rewrite::PathRewrite;
pub use router::{RouteMatch, RouteRule, RouteSummary, RouteTable, RouteTableError};
pub use target::{TargetError, UpstreamTarget};

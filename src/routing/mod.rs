//! Routing subsystem.
//!
//! # Data Flow
//! ```text
//! Incoming request path
//!     → router.rs (ordered rule scan, quick filter)
//!     → matcher.rs (segment-window match, capture groups)
//!     → rewrite.rs (expand rewrite template against captures)
//!     → dispatch.rs (controller / action / params)
//!
//! Route Compilation (at startup):
//!     RouteConfig[]
//!     → pattern.rs (classify literal and placeholder segments)
//!     → rewrite.rs (tokenize template, validate references)
//!     → Freeze as immutable RouteTable
//! ```
//!
//! # Design Decisions
//! - Routes compiled at startup, immutable at runtime
//! - No regex: literal anchors located by plain segment comparison
//! - Deterministic: same input always yields the same rewritten path
//! - First match wins (registration order), no longest-match heuristic
//! - Matcher never backtracks to a later occurrence of a literal anchor

pub mod dispatch;
pub mod matcher;
pub mod pattern;
pub mod rewrite;
pub mod router;

use thiserror::Error;

pub use dispatch::{slugify, Dispatch, LinkBuilder};
pub use matcher::{match_segments, MatchCapture};
pub use pattern::{Bounds, Placeholder, RoutePattern, Segment};
pub use rewrite::{RewriteSource, RewriteTemplate, RewriteToken};
pub use router::{RouteMatch, RouteRule, RouteTable};

/// Marker that opens a placeholder or a rewrite reference (`[*...]`).
pub const PLACEHOLDER_OPEN: &str = "[*";

/// Marker that closes a placeholder or a rewrite reference.
pub const PLACEHOLDER_CLOSE: char = ']';

/// Configuration errors raised while compiling route rules.
///
/// These are programmer errors from misconfigured routes. They surface at
/// registration time and abort startup; matching itself never fails.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RouteError {
    /// The pattern is empty once its leading and trailing slash are stripped.
    #[error("route pattern is empty")]
    EmptyPattern,

    /// A pattern segment looks like a placeholder but cannot be parsed.
    #[error("invalid placeholder `{segment}` in pattern `{pattern}`")]
    InvalidPlaceholder { pattern: String, segment: String },

    /// A rewrite token looks like a reference but cannot be parsed.
    #[error("invalid rewrite reference `{0}`")]
    InvalidReference(String),

    /// A rewrite reference addresses a capture group the pattern does not have.
    #[error("rewrite reference `{token}` targets group {group}, but only {available} group(s) exist")]
    UnknownGroup {
        token: String,
        group: usize,
        available: usize,
    },

    /// A rewrite reference reads past the segments its group can capture.
    #[error("rewrite reference `{token}` reads position {position} of group {group}, but only {limit} segment(s) are guaranteed")]
    PositionOutOfRange {
        token: String,
        group: usize,
        position: usize,
        limit: usize,
    },
}

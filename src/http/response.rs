//! Response shaping.
//!
//! # Responsibilities
//! - Describe the dispatch decision for a request as JSON
//!
//! # Design Decisions
//! - Unmatched paths are not errors: `rule` is null and `resolved` equals the
//!   normalized request path

use serde::Serialize;

use crate::routing::Dispatch;

/// Body returned for every dispatched request.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchResponse {
    pub request_id: Option<String>,
    /// Request path as received.
    pub path: String,
    /// Path after route rewriting.
    pub resolved: String,
    /// Index of the matching rule, if any.
    pub rule: Option<usize>,
    /// Name of the matching rule, if it has one.
    pub rule_name: Option<String>,
    #[serde(flatten)]
    pub dispatch: Dispatch,
    /// Canonical link to the dispatched action.
    pub link: String,
}

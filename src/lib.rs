//! Dispersion: a path rewriting engine and front controller.
//!
//! Requests are matched against an ordered table of wildcard patterns such as
//! `shop/[*]/item/[*1]`, rewritten through a template, and split into the
//! controller, action and parameters that should handle them.

pub mod config;
pub mod http;
pub mod lifecycle;
pub mod observability;
pub mod routing;

pub use config::AppConfig;
pub use http::HttpServer;
pub use lifecycle::Shutdown;
pub use routing::{RouteError, RouteTable};

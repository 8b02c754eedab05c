//! HTTP protocol handling subsystem.
//!
//! # Data Flow
//! ```text
//! TCP connection
//!     → server.rs (Axum setup, middleware)
//!     → request.rs (request ID assigned and propagated)
//!     → routing engine (resolve path, split into dispatch)
//!     → response.rs (dispatch decision as JSON)
//!     → Send to client
//! ```

pub mod request;
pub mod response;
pub mod server;

pub use request::{UuidRequestId, X_REQUEST_ID};
pub use response::DispatchResponse;
pub use server::{AppState, HttpServer, Runtime};

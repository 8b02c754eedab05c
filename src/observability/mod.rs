//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured fields)
//!     → tower-http TraceLayer spans per request
//!
//! Consumers:
//!     → logging.rs subscriber (stdout, pretty or JSON)
//! ```
//!
//! # Design Decisions
//! - Structured logging (JSON) for machine parsing
//! - Request ID flows through request spans and responses
//! - Route match failures are expected and never logged

pub mod logging;

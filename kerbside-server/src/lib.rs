//! HTTP facade and process wiring for kerbside.

/// Router, handlers, and error-to-status mapping.
pub mod api;
/// Command-line configuration and service assembly.
pub mod wiring;

pub use api::{ApiError, build_router, serve};
pub use wiring::{ConnectionArgs, build_service};

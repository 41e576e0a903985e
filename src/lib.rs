//! Budget Gate - admission-control ingress for the Monthly Budget API
//!
//! The gate sits in front of the backend and decides, per inbound request,
//! whether the originating client may proceed. Two fixed-window policies
//! apply: a strict one for authentication endpoints (brute-force
//! protection) and a loose one covering the whole API surface. Rejected
//! requests are answered with a fixed 429 JSON body before any
//! authentication work happens downstream; everything else is forwarded to
//! the configured upstream unchanged.

pub mod app;
pub mod config;
pub mod infrastructure;
pub mod logging;
pub mod presentation;

pub use app::{AppState, create_app};
pub use config::Config;
pub use logging::init_tracing;

//! Rate Limiting Infrastructure
//!
//! Fixed-window admission control partitioned by client key:
//! - One concurrent window store per policy, created lazily per client
//! - A strict authentication tier checked ahead of the general API tier
//! - Lazy per-key window reset plus a periodic background sweep

pub mod service;
pub mod store;
pub mod types;

pub use service::{AdmissionDecision, RateLimiterService};
pub use store::WindowStore;
pub use types::{Decision, Policy, PolicyKind, WindowBucket};

//! Gridway client-side load balancer
//!
//! Provides:
//! - Smooth weighted round-robin selection (nginx algorithm)
//! - Warm-up weight ramping for freshly started instances
//! - Per-candidate bookkeeping with pruning of departed instances
//! - Prometheus counters for selection outcomes

pub mod algorithms;
pub mod config;
pub mod metrics;
pub mod types;
pub mod warmup;

pub use algorithms::*;
pub use config::*;
pub use types::*;
pub use warmup::*;

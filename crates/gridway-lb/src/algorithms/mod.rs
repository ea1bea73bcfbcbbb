//! Candidate selection strategies.
//!
//! The trait keeps the pick logic swappable and lets each downstream
//! service own an independent balancer instance instead of sharing one
//! ambient registry.

use crate::types::Candidate;

pub trait Balancer: Send + Sync {
    fn name(&self) -> &'static str;

    /// Picks one candidate from the currently eligible list, or `None`
    /// when the list is empty or nothing is eligible. The list is
    /// already filtered and weighted by the caller.
    fn select<'a>(&self, candidates: &'a [Candidate]) -> Option<&'a Candidate>;
}

pub mod smooth_wrr;

pub use smooth_wrr::SmoothWeightedRR;

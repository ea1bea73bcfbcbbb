use serde::{Deserialize, Serialize};
use std::fmt;
use std::sync::atomic::{AtomicI64, AtomicU32, AtomicU64, Ordering};
use std::sync::Arc;

use crate::config::SelectorConfig;

/// Identity of a backend instance, unique within one balancer.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct CandidateId(pub String);

impl fmt::Display for CandidateId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CandidateId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for CandidateId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Candidate description as supplied by the discovery/configuration layer.
/// `weight` falls back to the configured default when absent.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CandidateConfig {
    pub id: String,
    pub weight: Option<u32>,
    pub start_ms: u64,
}

/// A backend instance eligible to receive a request.
///
/// Supplied by value on every selection call; the selector never
/// discovers candidates itself.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Candidate {
    pub id: CandidateId,
    /// Configured steady-state weight. Zero means ineligible.
    pub weight: u32,
    /// Unix millis at which the instance became eligible for traffic.
    pub start_ms: u64,
}

impl Candidate {
    pub fn new(id: impl Into<CandidateId>, weight: u32, start_ms: u64) -> Self {
        Self {
            id: id.into(),
            weight,
            start_ms,
        }
    }

    pub fn with_default_weight(
        id: impl Into<CandidateId>,
        start_ms: u64,
        cfg: &SelectorConfig,
    ) -> Self {
        Self::new(id, cfg.default_weight, start_ms)
    }
}

/// Builds the candidate list from configuration, applying the default
/// weight where none is set.
pub fn candidates_from_config(
    cfgs: &[CandidateConfig],
    cfg: &SelectorConfig,
) -> anyhow::Result<Vec<Candidate>> {
    let mut out = Vec::with_capacity(cfgs.len());
    for c in cfgs {
        anyhow::ensure!(!c.id.is_empty(), "candidate id must be non-empty");
        out.push(Candidate::new(
            c.id.as_str(),
            c.weight.unwrap_or(cfg.default_weight),
            c.start_ms,
        ));
    }
    Ok(out)
}

/// Per-candidate bookkeeping for smooth weighted round-robin.
///
/// One entry exists per live candidate identity; all fields except `id`
/// are updated concurrently through atomics so unrelated candidates
/// never contend on a shared lock.
#[derive(Debug)]
pub struct WrrEntry {
    pub id: CandidateId,
    /// Effective weight from the most recent refresh.
    pub weight: AtomicU32,
    /// Configured weight observed at the most recent refresh; a change
    /// here means operator reconfiguration and resets `current`.
    pub configured: AtomicU32,
    /// Running accumulator: raised by `weight` on each pick round,
    /// discharged by the round's total weight when this entry wins.
    pub current: AtomicI64,
    /// Unix millis of the most recent refresh; entries that stop being
    /// refreshed are pruned.
    pub last_update: AtomicU64,
}

impl WrrEntry {
    pub fn new(id: CandidateId, now_ms: u64) -> Arc<Self> {
        Arc::new(Self {
            id,
            weight: AtomicU32::new(0),
            configured: AtomicU32::new(0),
            current: AtomicI64::new(0),
            last_update: AtomicU64::new(now_ms),
        })
    }

    /// Stores this round's effective weight and refresh timestamp. A
    /// configured-weight change zeroes the accumulator so stale credit
    /// from the old weight cannot bias upcoming rounds.
    pub fn refresh(&self, effective: u32, configured: u32, now_ms: u64) {
        if self.configured.swap(configured, Ordering::Relaxed) != configured {
            self.current.store(0, Ordering::Relaxed);
        }
        self.weight.store(effective, Ordering::Relaxed);
        self.last_update.store(now_ms, Ordering::Relaxed);
    }

    pub fn effective_weight(&self) -> u32 {
        self.weight.load(Ordering::Relaxed)
    }
}

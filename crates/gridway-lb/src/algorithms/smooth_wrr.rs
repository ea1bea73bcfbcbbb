use super::Balancer;
use crate::config::SelectorConfig;
use crate::metrics;
use crate::types::{Candidate, CandidateId, WrrEntry};
use crate::warmup::effective_weight;
use dashmap::DashMap;
use parking_lot::RwLock;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};
use tracing::{debug, trace};

// Smooth Weighted Round Robin per Nginx algorithm, with per-candidate
// warm-up ramping. Bookkeeping is keyed by candidate identity so the
// caller may hand in a different (already health-filtered) list on
// every call; entries for departed candidates are pruned.
pub struct SmoothWeightedRR {
    entries: DashMap<CandidateId, Arc<WrrEntry>>,
    config: RwLock<SelectorConfig>,
}

impl SmoothWeightedRR {
    pub fn new(config: SelectorConfig) -> Self {
        Self {
            entries: DashMap::new(),
            config: RwLock::new(config),
        }
    }

    /// Swaps in reloaded tunables; takes effect on the next call.
    pub fn update_config(&self, config: SelectorConfig) {
        *self.config.write() = config;
    }

    /// Number of candidate identities currently tracked.
    pub fn tracked(&self) -> usize {
        self.entries.len()
    }

    fn now_ms() -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }

    /// `select` with an explicit clock, for deterministic callers and
    /// tests. `now_ms` must be non-decreasing across calls for pruning
    /// to observe staleness.
    pub fn select_at<'a>(&self, candidates: &'a [Candidate], now_ms: u64) -> Option<&'a Candidate> {
        if candidates.is_empty() {
            metrics::NO_CANDIDATE_TOTAL.inc();
            return None;
        }
        let warmup_ms = self.config.read().warmup_ms;

        // Refresh: recompute every candidate's effective weight and stamp
        // its entry with this call's timestamp. Zero-weight candidates
        // are refreshed too so pruning stays consistent.
        let mut refreshed: Vec<(Arc<WrrEntry>, i64)> = Vec::with_capacity(candidates.len());
        for c in candidates {
            let entry = self
                .entries
                .entry(c.id.clone())
                .or_insert_with(|| {
                    debug!(id = %c.id, "tracking new candidate");
                    WrrEntry::new(c.id.clone(), now_ms)
                })
                .value()
                .clone();
            let ew = effective_weight(c.start_ms, now_ms, c.weight, warmup_ms);
            entry.refresh(ew, c.weight, now_ms);
            refreshed.push((entry, ew as i64));
        }

        // Pick: raise each eligible accumulator by its own weight and
        // take the maximum; ties go to the earliest list position.
        let mut total: i64 = 0;
        let mut best: Option<usize> = None;
        let mut best_current = i64::MIN;
        for (i, (entry, ew)) in refreshed.iter().enumerate() {
            if *ew == 0 {
                continue;
            }
            total += ew;
            let current = entry.current.fetch_add(*ew, Ordering::Relaxed) + ew;
            if best.is_none() || current > best_current {
                best = Some(i);
                best_current = current;
            }
        }

        // Settle: discharge the winner by the round's total weight. Over
        // a full cycle every accumulator oscillates around zero.
        if let Some(i) = best {
            refreshed[i].0.current.fetch_sub(total, Ordering::Relaxed);
        }

        self.prune(candidates, now_ms);

        match best {
            Some(i) => {
                metrics::SELECTIONS_TOTAL.inc();
                trace!(id = %candidates[i].id, "selected candidate");
                Some(&candidates[i])
            }
            None => {
                metrics::NO_CANDIDATE_TOTAL.inc();
                None
            }
        }
    }

    // Entries not in the input list whose last refresh predates this
    // call belong to departed candidates. Every input entry was stamped
    // with `now_ms` above, so a strictly older stamp is sufficient.
    fn prune(&self, candidates: &[Candidate], now_ms: u64) {
        if self.entries.len() > candidates.len() {
            let before = self.entries.len();
            self.entries.retain(|id, entry| {
                entry.last_update.load(Ordering::Relaxed) >= now_ms
                    || candidates.iter().any(|c| &c.id == id)
            });
            let removed = before.saturating_sub(self.entries.len());
            if removed > 0 {
                debug!(removed, "pruned departed candidates");
                metrics::PRUNED_TOTAL.inc_by(removed as u64);
            }
        }
        metrics::TRACKED_CANDIDATES.set(self.entries.len() as i64);
    }
}

impl Default for SmoothWeightedRR {
    fn default() -> Self {
        Self::new(SelectorConfig::default())
    }
}

impl Balancer for SmoothWeightedRR {
    fn name(&self) -> &'static str {
        "smooth_wrr_warmup"
    }

    fn select<'a>(&self, candidates: &'a [Candidate]) -> Option<&'a Candidate> {
        self.select_at(candidates, Self::now_ms())
    }
}

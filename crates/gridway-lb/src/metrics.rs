use once_cell::sync::Lazy;
use prometheus::{IntCounter, IntGauge, Registry};

pub static SELECTIONS_TOTAL: Lazy<IntCounter> = Lazy::new(|| IntCounter::new("lb_selections_total", "Total successful candidate selections").unwrap());
pub static NO_CANDIDATE_TOTAL: Lazy<IntCounter> = Lazy::new(|| IntCounter::new("lb_no_candidate_total", "Selection calls with no eligible candidate").unwrap());
pub static PRUNED_TOTAL: Lazy<IntCounter> = Lazy::new(|| IntCounter::new("lb_entries_pruned_total", "Bookkeeping entries removed for departed candidates").unwrap());
pub static TRACKED_CANDIDATES: Lazy<IntGauge> = Lazy::new(|| IntGauge::new("lb_tracked_candidates", "Candidate identities currently tracked").unwrap());

pub fn register(reg: &Registry) {
    reg.register(Box::new(SELECTIONS_TOTAL.clone())).ok();
    reg.register(Box::new(NO_CANDIDATE_TOTAL.clone())).ok();
    reg.register(Box::new(PRUNED_TOTAL.clone())).ok();
    reg.register(Box::new(TRACKED_CANDIDATES.clone())).ok();
}

//! Warm-up weight ramping.
//!
//! A freshly started instance should not receive its full traffic share
//! the moment it joins: caches are cold and JITted/ pooled resources are
//! not settled. While `now - start < warmup`, the weight used for
//! selection ramps linearly from a floor of 1 up to the configured value.

/// Effective weight of a candidate at `now_ms`.
///
/// Pure function of its inputs; safe from any number of concurrent
/// callers. For a fixed start time and configured weight the result is
/// non-decreasing in `now_ms` and always within `[1, configured_weight]`
/// while warm-up is in progress.
///
/// A configured weight of 0 stays 0: the candidate is ineligible and
/// never enters a pick round.
pub fn effective_weight(start_ms: u64, now_ms: u64, configured_weight: u32, warmup_ms: u64) -> u32 {
    if configured_weight == 0 {
        return 0;
    }
    if warmup_ms == 0 {
        return configured_weight;
    }
    // Clock skew can put start_ms in the future; treat it as zero uptime.
    let uptime = now_ms.saturating_sub(start_ms);
    if uptime >= warmup_ms {
        return configured_weight;
    }
    let ramped = (uptime as u128 * configured_weight as u128 / warmup_ms as u128) as u32;
    ramped.clamp(1, configured_weight)
}

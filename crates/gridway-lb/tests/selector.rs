use gridway_lb::*;
use std::collections::HashMap;
use std::sync::Arc;

fn no_warmup() -> SelectorConfig {
    SelectorConfig {
        warmup_ms: 0,
        ..SelectorConfig::default()
    }
}

fn count_picks(
    sel: &SmoothWeightedRR,
    cands: &[Candidate],
    start_ms: u64,
    rounds: u64,
) -> HashMap<String, u64> {
    let mut counts = HashMap::new();
    for t in 0..rounds {
        let picked = sel.select_at(cands, start_ms + t).expect("candidate");
        *counts.entry(picked.id.0.clone()).or_default() += 1;
    }
    counts
}

#[test]
fn empty_list_yields_none() {
    let sel = SmoothWeightedRR::new(no_warmup());
    assert!(sel.select(&[]).is_none());
}

#[test]
fn single_candidate_is_always_selected() {
    let sel = SmoothWeightedRR::new(no_warmup());
    for weight in [1, 7, 100] {
        let cands = vec![Candidate::new("only", weight, 0)];
        for t in 1..=10 {
            assert_eq!(sel.select_at(&cands, t).unwrap().id, cands[0].id);
        }
    }
}

#[test]
fn picks_are_proportional_to_weights() {
    let sel = SmoothWeightedRR::new(no_warmup());
    let cands = vec![
        Candidate::new("a", 5, 0),
        Candidate::new("b", 1, 0),
        Candidate::new("c", 2, 0),
    ];
    // One full cycle of sum(w) picks hands each candidate exactly w picks.
    let counts = count_picks(&sel, &cands, 1, 8);
    assert_eq!(counts["a"], 5);
    assert_eq!(counts["b"], 1);
    assert_eq!(counts["c"], 2);
}

#[test]
fn uniform_weights_reduce_to_plain_round_robin() {
    let sel = SmoothWeightedRR::new(no_warmup());
    let cands = vec![
        Candidate::new("a", 10, 0),
        Candidate::new("b", 10, 0),
        Candidate::new("c", 10, 0),
    ];
    let picks: Vec<String> = (1..=6)
        .map(|t| sel.select_at(&cands, t).unwrap().id.0.clone())
        .collect();
    assert_eq!(picks, vec!["a", "b", "c", "a", "b", "c"]);
}

#[test]
fn low_weight_candidate_is_not_starved_across_rounds() {
    let sel = SmoothWeightedRR::new(no_warmup());
    let cands = vec![Candidate::new("a", 3, 0), Candidate::new("b", 1, 0)];
    let picks: Vec<String> = (1..=12)
        .map(|t| sel.select_at(&cands, t).unwrap().id.0.clone())
        .collect();
    // Every 4-pick round contains b exactly once.
    for round in picks.chunks(4) {
        assert_eq!(round.iter().filter(|id| *id == "b").count(), 1);
    }
}

#[test]
fn departed_candidate_is_pruned_and_rejoins_fresh() {
    let sel = SmoothWeightedRR::new(no_warmup());
    let both = vec![Candidate::new("a", 3, 0), Candidate::new("b", 1, 0)];
    let only_a = vec![Candidate::new("a", 3, 0)];

    sel.select_at(&both, 1);
    assert_eq!(sel.tracked(), 2);

    sel.select_at(&only_a, 2);
    assert_eq!(sel.tracked(), 1);

    // Rejoining restarts accumulator bookkeeping from zero; the 3:1
    // schedule resumes as if b had just been seen for the first time.
    let picks: Vec<String> = (3..=6)
        .map(|t| sel.select_at(&both, t).unwrap().id.0.clone())
        .collect();
    assert_eq!(picks.iter().filter(|id| *id == "b").count(), 1);
    assert_eq!(sel.tracked(), 2);
}

#[test]
fn rejoined_candidate_keeps_warmup_progress_from_its_start_time() {
    let warmup = 10_000;
    let sel = SmoothWeightedRR::new(SelectorConfig {
        warmup_ms: warmup,
        default_weight: 100,
    });
    let old = Candidate::new("old", 100, 0);
    // Started at t=100_000, so fully warmed from t=110_000 on.
    let fresh = Candidate::new("fresh", 100, 100_000);

    let both = vec![old.clone(), fresh.clone()];
    sel.select_at(&both, 100_000);
    assert_eq!(sel.tracked(), 2);

    // fresh drops out and is pruned.
    sel.select_at(&[old.clone()], 100_001);
    assert_eq!(sel.tracked(), 1);

    // It rejoins after its warm-up window has elapsed: effective weight
    // is governed only by its own start time, not by the visibility gap.
    let counts = count_picks(&sel, &both, 120_000, 100);
    let fresh_share = counts.get("fresh").copied().unwrap_or(0);
    assert!(
        (45..=55).contains(&fresh_share),
        "fully warmed rejoiner should get an equal share, got {fresh_share}/100"
    );
}

#[test]
fn warming_candidate_receives_reduced_share() {
    let warmup = 100_000;
    let sel = SmoothWeightedRR::new(SelectorConfig {
        warmup_ms: warmup,
        default_weight: 100,
    });
    let cands = vec![
        Candidate::new("steady", 100, 0),
        // Half-way through warm-up: effective weight 50.
        Candidate::new("fresh", 100, 150_000),
    ];
    let counts = count_picks(&sel, &cands, 200_000, 150);
    // 100:50 split over 150 picks.
    assert_eq!(counts["steady"], 100);
    assert_eq!(counts["fresh"], 50);
}

#[test]
fn concurrent_selection_converges_to_weight_ratios() {
    let sel = Arc::new(SmoothWeightedRR::new(no_warmup()));
    let cands: Arc<Vec<Candidate>> =
        Arc::new(vec![Candidate::new("a", 3, 0), Candidate::new("b", 1, 0)]);

    const THREADS: usize = 8;
    const PICKS_PER_THREAD: usize = 500;

    let mut a_total = 0usize;
    let mut picks_total = 0usize;
    std::thread::scope(|s| {
        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let sel = Arc::clone(&sel);
                let cands = Arc::clone(&cands);
                s.spawn(move || {
                    let mut a = 0usize;
                    let mut n = 0usize;
                    for _ in 0..PICKS_PER_THREAD {
                        let picked = sel.select(&cands).expect("candidate");
                        if picked.id.0 == "a" {
                            a += 1;
                        }
                        n += 1;
                    }
                    (a, n)
                })
            })
            .collect();
        for h in handles {
            let (a, n) = h.join().unwrap();
            a_total += a;
            picks_total += n;
        }
    });

    assert_eq!(picks_total, THREADS * PICKS_PER_THREAD);
    let share = a_total as f64 / picks_total as f64;
    // Expected 0.75; allow slack for racing rounds.
    assert!(
        (0.65..=0.85).contains(&share),
        "weight-3 candidate share drifted to {share}"
    );
}

#[test]
fn balancer_trait_object_is_usable() {
    let sel: Box<dyn Balancer> = Box::new(SmoothWeightedRR::new(no_warmup()));
    assert_eq!(sel.name(), "smooth_wrr_warmup");
    let cands = vec![Candidate::new("a", 1, 0)];
    assert!(sel.select(&cands).is_some());
}

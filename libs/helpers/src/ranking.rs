use std::collections::HashSet;

use ntest::assert_about_eq;

use aggregate_topk::{base::RowId, search::ScoredRow};

/// Checks that two rankings have the same scores, rank by rank
pub fn check_same_scores(observed: &[ScoredRow], expected: &[ScoredRow], eps: f64) {
    assert!(
        observed.len() == expected.len(),
        "Size differ {} vs {}",
        observed.len(),
        expected.len()
    );
    for (a, b) in observed.iter().zip(expected.iter()) {
        assert_about_eq!(a.score, b.score, eps);
    }
}

/// Checks that two rankings have the same scores and return the same rows
pub fn check_same_ranking(observed: &[ScoredRow], expected: &[ScoredRow], eps: f64) {
    check_same_scores(observed, expected, eps);

    let a: HashSet<RowId> = observed.iter().map(|r| r.row).collect();
    let b: HashSet<RowId> = expected.iter().map(|r| r.row).collect();
    assert!(a == b, "Rows differ: {:?} vs {:?}", a, b);
}

/// Checks that the k-th best score is strictly greater than the next one
/// (in which case any correct strategy returns the same rows)
pub fn has_strict_boundary(ranking: &[ScoredRow], k: usize) -> bool {
    k == 0 || k >= ranking.len() || ranking[k - 1].score > ranking[k].score
}

//! Threshold algorithm (TA)
//!
//!  Fagin, R., Lotem, A. & Naor, M. Optimal aggregation algorithms for
//!  middleware. Journal of Computer and System Sciences 66, 614–656 (2003).

use log::debug;

use crate::{
    base::{AttributeValue, Len},
    cost::StepCounter,
    error::Result,
    search::{into_top_k, rank, ScoredRow, SearchContext, Strategy},
};

/// Search using the threshold algorithm
///
/// Each round reads one position of every sorted list and scores the rows
/// seen for the first time. The threshold, i.e. the aggregation of the
/// values just read, bounds the score of any row not seen yet: the search
/// stops as soon as the k-th best score reaches it.
pub fn search_threshold(
    context: &SearchContext,
    top_k: usize,
    counter: &mut StepCounter,
) -> Result<Vec<ScoredRow>> {
    let lists = context.sorted_lists(Strategy::Threshold)?;
    let k = context.clamp(top_k);
    if k == 0 {
        return Ok(Vec::new());
    }

    let mode = context.scorer.mode();
    let depth = lists[0].len();

    let mut visited = vec![false; context.view.len()];
    let mut candidates: Vec<ScoredRow> = Vec::new();
    let mut boundary: Vec<AttributeValue> = Vec::with_capacity(lists.len());

    for round in 0..depth {
        boundary.clear();
        for list in lists.iter() {
            if let Some(entry) = list.get(round) {
                counter.sorted_access();
                boundary.push(entry.value);

                if !visited[entry.row] {
                    visited[entry.row] = true;
                    candidates.push(context.score(entry.row));
                    counter.random_access();
                }
            }
        }

        let threshold = mode.aggregate(boundary.iter().copied())?;
        counter.set_threshold(threshold);
        counter.round();

        if candidates.len() >= k {
            rank(&mut candidates, k);
            let min_score = candidates[k - 1].score;
            if min_score >= threshold {
                debug!(
                    "Stopping after {} rounds: k-th score {} >= threshold {}",
                    round + 1,
                    min_score,
                    threshold
                );
                break;
            }
        }
    }

    Ok(into_top_k(candidates, k, counter))
}

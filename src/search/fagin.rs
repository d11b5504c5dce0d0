//! Fagin's algorithm
//!
//!  Fagin, R. Combining fuzzy information from multiple systems.
//!  Journal of Computer and System Sciences 58, 83–99 (1999).
//!
//! Sorted access proceeds in rounds (one position of every list per round)
//! until k rows have been seen in all the lists. Every row seen at least
//! once is then scored from the normalized view; the direct lookup stands
//! in for the random access phase and is counted as a random access.

use log::debug;

use crate::{
    base::Len,
    cost::StepCounter,
    error::Result,
    search::{into_top_k, ScoredRow, SearchContext, Strategy},
};

pub fn search_fagin(
    context: &SearchContext,
    top_k: usize,
    counter: &mut StepCounter,
) -> Result<Vec<ScoredRow>> {
    let lists = context.sorted_lists(Strategy::Fagin)?;
    let k = context.clamp(top_k);
    if k == 0 {
        return Ok(Vec::new());
    }

    let m = lists.len();
    // All the lists have the same length (checked by the context)
    let depth = lists[0].len();

    // Number of lists that yielded each row, and rows by first sighting
    let mut occurrences = vec![0usize; context.view.len()];
    let mut seen = Vec::new();
    let mut seen_in_all = 0;

    let mut round = 0;
    while round < depth {
        for list in lists.iter() {
            if let Some(entry) = list.get(round) {
                counter.sorted_access();
                let count = &mut occurrences[entry.row];
                if *count == 0 {
                    seen.push(entry.row);
                }
                *count += 1;
                if *count == m {
                    seen_in_all += 1;
                }
            }
        }

        round += 1;
        counter.round();

        if seen_in_all >= k {
            debug!(
                "{} rows seen in all {} lists after {} rounds",
                seen_in_all, m, round
            );
            break;
        }
    }

    debug!("Scoring {} rows seen in at least one list", seen.len());
    let mut candidates = Vec::with_capacity(seen.len());
    for &row in seen.iter() {
        candidates.push(context.score(row));
        counter.random_access();
        counter.step();
    }

    Ok(into_top_k(candidates, k, counter))
}

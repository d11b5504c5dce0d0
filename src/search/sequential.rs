//! Sequential (full scan) baseline

use log::debug;

use crate::{
    base::Len,
    cost::StepCounter,
    error::Result,
    search::{into_top_k, ScoredRow, SearchContext},
};

/// Scores every row, then keeps the `top_k` best ones
///
/// One step per row scored and one per result row
pub fn search_sequential(
    context: &SearchContext,
    top_k: usize,
    counter: &mut StepCounter,
) -> Result<Vec<ScoredRow>> {
    let k = context.clamp(top_k);
    if k == 0 {
        return Ok(Vec::new());
    }

    let mut scored = Vec::with_capacity(context.view.len());
    for row in 0..context.view.len() {
        scored.push(context.score(row));
        counter.step();
    }
    debug!("Scored {} rows sequentially", scored.len());

    Ok(into_top_k(scored, k, counter))
}

//! Top-k strategies
//!
//! All strategies share the [`SearchFn`] signature so that they can be
//! swapped and measured uniformly:
//!
//! - [`sequential`]: scores every row (baseline)
//! - [`fagin`]: Fagin's algorithm, sorted access until k rows have been
//!   seen in every list
//! - [`threshold`]: the threshold algorithm (TA), sorted access until the
//!   k-th best score reaches the threshold

pub mod fagin;
pub mod sequential;
pub mod threshold;

use std::{collections::HashSet, fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    base::{AttributeValue, Len, RowId},
    cost::StepCounter,
    error::{Error, Result},
    normalize::NormalizedView,
    score::ScoreFunction,
    sorted::SortedAccessList,
};

pub use fagin::search_fagin;
pub use sequential::search_sequential;
pub use threshold::search_threshold;

#[derive(Serialize, Clone, Copy, Debug, PartialEq)]
pub struct ScoredRow {
    pub row: RowId,
    pub score: AttributeValue,
}

impl fmt::Display for ScoredRow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({},{})", self.row, self.score)
    }
}

/// A search function
pub type SearchFn =
    fn(context: &SearchContext, top_k: usize, counter: &mut StepCounter) -> Result<Vec<ScoredRow>>;

/// Everything a strategy reads: the normalized view, the scoring function
/// and (for Fagin and TA) one sorted access list per scored column
pub struct SearchContext<'a> {
    pub view: &'a NormalizedView,
    pub scorer: &'a ScoreFunction,
    lists: Vec<&'a SortedAccessList>,
}

impl<'a> SearchContext<'a> {
    /// Creates a search context, checking that the sorted lists (if any)
    /// all cover the dataset and match the scored columns
    pub fn new(
        view: &'a NormalizedView,
        scorer: &'a ScoreFunction,
        lists: Vec<&'a SortedAccessList>,
    ) -> Result<Self> {
        if !lists.is_empty() {
            for list in lists.iter() {
                list.validate(view.len())?;
            }

            let list_columns: HashSet<&str> = lists.iter().map(|l| l.column.as_str()).collect();
            let scored_columns: HashSet<&str> = scorer.names().iter().map(|c| c.as_str()).collect();
            if list_columns.len() != lists.len() || list_columns != scored_columns {
                return Err(Error::ListColumnMismatch {
                    lists: lists.iter().map(|l| l.column.clone()).collect(),
                    columns: scorer.names().to_vec(),
                });
            }
        }

        Ok(Self {
            view,
            scorer,
            lists,
        })
    }

    /// Returns the sorted lists, failing if there are none
    pub fn sorted_lists(&self, strategy: Strategy) -> Result<&[&'a SortedAccessList]> {
        if self.lists.is_empty() {
            return Err(Error::MissingSortedLists(strategy.to_string()));
        }
        Ok(&self.lists)
    }

    /// Number of rows to return: `top_k` clamped to the dataset size
    pub fn clamp(&self, top_k: usize) -> usize {
        top_k.min(self.view.len())
    }

    #[inline]
    pub(crate) fn score(&self, row: RowId) -> ScoredRow {
        ScoredRow {
            row,
            score: self.scorer.score(self.view, row),
        }
    }
}

/// Sorts candidates by decreasing score (ties keep their order) and keeps
/// the first `k`
pub(crate) fn rank(candidates: &mut Vec<ScoredRow>, k: usize) {
    candidates.sort_by(|a, b| b.score.total_cmp(&a.score));
    candidates.truncate(k);
}

/// Ranks the candidates and assembles the result, one step per row
pub(crate) fn into_top_k(
    mut candidates: Vec<ScoredRow>,
    k: usize,
    counter: &mut StepCounter,
) -> Vec<ScoredRow> {
    rank(&mut candidates, k);
    for _ in candidates.iter() {
        counter.step();
    }
    candidates
}

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Strategy {
    Sequential,
    Fagin,
    Threshold,
}

impl Strategy {
    pub const ALL: [Strategy; 3] = [Strategy::Sequential, Strategy::Fagin, Strategy::Threshold];

    pub fn search_fn(&self) -> SearchFn {
        match self {
            Strategy::Sequential => search_sequential,
            Strategy::Fagin => search_fagin,
            Strategy::Threshold => search_threshold,
        }
    }

    pub fn needs_sorted_lists(&self) -> bool {
        !matches!(self, Strategy::Sequential)
    }
}

impl FromStr for Strategy {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sequential" | "seq" => Ok(Strategy::Sequential),
            "fagin" => Ok(Strategy::Fagin),
            "threshold" | "ta" => Ok(Strategy::Threshold),
            _ => Err(Error::UnknownStrategy(s.to_string())),
        }
    }
}

impl fmt::Display for Strategy {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            Strategy::Sequential => "sequential",
            Strategy::Fagin => "fagin",
            Strategy::Threshold => "threshold",
        };
        write!(f, "{}", name)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        data::Row,
        normalize::{normalize, NormalizeOptions},
        score::AggregationMode,
    };

    fn view() -> NormalizedView {
        let rows: Vec<Row> = [(1., 3.), (2., 1.), (3., 2.)]
            .iter()
            .map(|&(a, b)| Row::new().with("a", a).with("b", b))
            .collect();
        normalize(&rows, &NormalizeOptions::new(&["a", "b"], &[])).unwrap()
    }

    #[test]
    fn test_rank_is_stable() {
        let mut candidates = vec![
            ScoredRow { row: 3, score: 0.5 },
            ScoredRow { row: 1, score: 0.9 },
            ScoredRow { row: 0, score: 0.5 },
            ScoredRow { row: 2, score: 0.1 },
        ];
        rank(&mut candidates, 3);
        let rows: Vec<RowId> = candidates.iter().map(|c| c.row).collect();
        assert_eq!(rows, vec![1, 3, 0]);
    }

    #[test]
    fn test_context_validation() {
        let view = view();
        let scorer = ScoreFunction::new(&view, &["a_norm", "b_norm"], AggregationMode::Sum).unwrap();
        let a = SortedAccessList::from_view(&view, "a_norm").unwrap();
        let b = SortedAccessList::from_view(&view, "b_norm").unwrap();

        // Any order
        assert!(SearchContext::new(&view, &scorer, vec![&b, &a]).is_ok());

        assert!(matches!(
            SearchContext::new(&view, &scorer, vec![&a, &a]),
            Err(Error::ListColumnMismatch { .. })
        ));
        assert!(matches!(
            SearchContext::new(&view, &scorer, vec![&a]),
            Err(Error::ListColumnMismatch { .. })
        ));

        let context = SearchContext::new(&view, &scorer, vec![]).unwrap();
        assert!(matches!(
            context.sorted_lists(Strategy::Fagin),
            Err(Error::MissingSortedLists(s)) if s == "fagin"
        ));
        assert_eq!(context.clamp(10), 3);
    }

    #[test]
    fn test_strategy_names() {
        for strategy in Strategy::ALL {
            assert_eq!(strategy.to_string().parse::<Strategy>().unwrap(), strategy);
        }
        assert_eq!("ta".parse::<Strategy>().unwrap(), Strategy::Threshold);
        assert!(matches!(
            "nra".parse::<Strategy>(),
            Err(Error::UnknownStrategy(_))
        ));
    }
}

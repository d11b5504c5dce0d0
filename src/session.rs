//! A query session: a dataset, its normalized view and the sorted access
//! lists built for it, shared by all the strategy invocations

use std::collections::HashMap;
use std::time::Duration;

use log::{debug, info};
use serde::{Deserialize, Serialize};

use crate::{
    base::{Len, SCORE_FIELD},
    cost::{measure, StepCounter},
    data::Row,
    error::{Error, Result},
    normalize::{normalize, NormalizeOptions, NormalizedView},
    score::{AggregationMode, ScoreFunction},
    search::{ScoredRow, SearchContext, Strategy},
    sorted::SortedAccessList,
};

/// What to search for
#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct TopKQuery {
    /// Normalized columns to aggregate
    pub columns: Vec<String>,
    pub mode: AggregationMode,
    pub k: usize,
}

impl TopKQuery {
    pub fn new(columns: &[&str], mode: AggregationMode, k: usize) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            mode,
            k,
        }
    }
}

pub struct TopKResult {
    pub strategy: Strategy,
    pub ranked: Vec<ScoredRow>,
    pub elapsed: Duration,
    pub counter: StepCounter,
}

impl TopKResult {
    pub fn elapsed_ms(&self) -> f64 {
        self.elapsed.as_secs_f64() * 1000.
    }

    pub fn steps(&self) -> u64 {
        self.counter.steps()
    }
}

pub struct Session {
    rows: Vec<Row>,
    view: NormalizedView,

    /// Sorted lists, by normalized column name
    lists: HashMap<String, SortedAccessList>,
}

impl Session {
    /// Normalizes the dataset and starts a session
    pub fn new(rows: Vec<Row>, options: &NormalizeOptions) -> Result<Self> {
        let view = normalize(&rows, options)?;
        info!(
            "New session with {} rows and {} normalized columns",
            rows.len(),
            view.num_columns()
        );
        Ok(Self {
            rows,
            view,
            lists: HashMap::new(),
        })
    }

    /// Starts a session over rows that already carry the given normalized
    /// fields
    pub fn from_normalized<S: AsRef<str>>(rows: Vec<Row>, columns: &[S]) -> Result<Self> {
        let view = NormalizedView::from_fields(&rows, columns)?;
        info!(
            "New session with {} pre-normalized rows and {} columns",
            rows.len(),
            view.num_columns()
        );
        Ok(Self {
            rows,
            view,
            lists: HashMap::new(),
        })
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn view(&self) -> &NormalizedView {
        &self.view
    }

    /// Builds the sorted lists of the given columns (if not already there)
    pub fn prepare<S: AsRef<str>>(&mut self, columns: &[S]) -> Result<()> {
        for column in columns {
            let ix = self.view.column_index(column.as_ref())?;
            let name = &self.view.columns()[ix];
            if !self.lists.contains_key(name) {
                debug!("Building the sorted list of {}", name);
                let list = SortedAccessList::from_view(&self.view, name)?;
                self.lists.insert(name.clone(), list);
            }
        }
        Ok(())
    }

    /// Adds a sorted list built elsewhere (e.g. loaded from disk)
    pub fn insert_list(&mut self, list: SortedAccessList) -> Result<()> {
        let ix = self.view.column_index(&list.column)?;
        if self.view.columns()[ix] != list.column {
            return Err(Error::UnknownColumn(list.column));
        }
        list.validate(self.view.len())?;
        self.lists.insert(list.column.clone(), list);
        Ok(())
    }

    pub fn list(&self, column: &str) -> Option<&SortedAccessList> {
        self.lists.get(column)
    }

    pub fn lists(&self) -> impl Iterator<Item = &SortedAccessList> {
        self.lists.values()
    }

    /// Runs a strategy, measuring its cost
    ///
    /// Fagin and TA need the sorted lists of the queried columns to have
    /// been prepared (or inserted) beforehand.
    pub fn top_k(&self, strategy: Strategy, query: &TopKQuery) -> Result<TopKResult> {
        let scorer = ScoreFunction::new(&self.view, query.columns.as_slice(), query.mode)?;

        let lists = if strategy.needs_sorted_lists() {
            scorer
                .names()
                .iter()
                .map(|name| {
                    self.lists
                        .get(name)
                        .ok_or_else(|| Error::MissingSortedList(name.clone()))
                })
                .collect::<Result<Vec<_>>>()?
        } else {
            Vec::new()
        };

        let context = SearchContext::new(&self.view, &scorer, lists)?;
        let search = strategy.search_fn();
        let measured = measure(|counter| search(&context, query.k, counter))?;

        info!(
            "{} top-{} ({} over {:?}): {} rows in {:.3} ms, {}",
            strategy,
            query.k,
            query.mode,
            scorer.names(),
            measured.result.len(),
            measured.elapsed_ms(),
            measured.counter
        );

        Ok(TopKResult {
            strategy,
            ranked: measured.result,
            elapsed: measured.elapsed,
            counter: measured.counter,
        })
    }

    /// Returns copies of the ranked rows with their score
    pub fn materialize(&self, result: &TopKResult) -> Vec<Row> {
        result
            .ranked
            .iter()
            .map(|scored| {
                let mut row = self.rows[scored.row].clone();
                row.insert(SCORE_FIELD, scored.score);
                row
            })
            .collect()
    }
}

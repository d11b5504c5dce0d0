//! Monotone aggregation of normalized attributes

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::{
    base::{AttributeValue, RowId},
    data::Row,
    error::{Error, Result},
    normalize::NormalizedView,
};

/// Aggregation function; all of them are monotone (non-decreasing in
/// each of their inputs)
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum AggregationMode {
    Sum,
    Avg,
    Max,
    Min,
}

impl AggregationMode {
    pub const ALL: [AggregationMode; 4] = [
        AggregationMode::Sum,
        AggregationMode::Avg,
        AggregationMode::Max,
        AggregationMode::Min,
    ];

    /// Aggregates the values
    pub fn aggregate<I>(&self, values: I) -> Result<AttributeValue>
    where
        I: IntoIterator<Item = AttributeValue>,
    {
        let mut iter = values.into_iter();
        let first = iter.next().ok_or(Error::EmptyAggregation)?;

        let (acc, count) = iter.fold((first, 1usize), |(acc, count), v| {
            let acc = match self {
                AggregationMode::Sum | AggregationMode::Avg => acc + v,
                AggregationMode::Max => acc.max(v),
                AggregationMode::Min => acc.min(v),
            };
            (acc, count + 1)
        });

        Ok(match self {
            AggregationMode::Avg => acc / count as AttributeValue,
            _ => acc,
        })
    }
}

impl FromStr for AggregationMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s {
            "sum" => Ok(AggregationMode::Sum),
            "avg" => Ok(AggregationMode::Avg),
            "max" => Ok(AggregationMode::Max),
            "min" => Ok(AggregationMode::Min),
            _ => Err(Error::UnknownAggregation(s.to_string())),
        }
    }
}

impl fmt::Display for AggregationMode {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let name = match self {
            AggregationMode::Sum => "sum",
            AggregationMode::Avg => "avg",
            AggregationMode::Max => "max",
            AggregationMode::Min => "min",
        };
        write!(f, "{}", name)
    }
}

/// Scoring function over a normalized view, with the columns resolved
/// once
#[derive(Clone, Debug)]
pub struct ScoreFunction {
    columns: Vec<usize>,
    names: Vec<String>,
    mode: AggregationMode,
}

impl ScoreFunction {
    pub fn new<S: AsRef<str>>(
        view: &NormalizedView,
        columns: &[S],
        mode: AggregationMode,
    ) -> Result<Self> {
        if columns.is_empty() {
            return Err(Error::EmptyAggregation);
        }

        let mut indices = Vec::with_capacity(columns.len());
        for name in columns {
            let ix = view.column_index(name.as_ref())?;
            // Aliases (source and normalized names) resolve to the same index
            if indices.contains(&ix) {
                return Err(Error::DuplicateColumn(view.columns()[ix].clone()));
            }
            indices.push(ix);
        }
        let columns = indices;

        Ok(Self {
            names: columns.iter().map(|&c| view.columns()[c].clone()).collect(),
            columns,
            mode,
        })
    }

    pub fn mode(&self) -> AggregationMode {
        self.mode
    }

    /// Indices of the scored columns within the view
    pub fn columns(&self) -> &[usize] {
        &self.columns
    }

    /// Names of the scored (normalized) columns
    pub fn names(&self) -> &[String] {
        &self.names
    }

    #[inline]
    pub fn score(&self, view: &NormalizedView, row: RowId) -> AttributeValue {
        self.mode
            .aggregate(self.columns.iter().map(|&c| view.value(row, c)))
            .expect("columns cannot be empty")
    }
}

/// Scores a row holding normalized fields
///
/// `id` is the position of the row in its dataset (used to report errors)
pub fn score<S: AsRef<str>>(
    row: &Row,
    id: RowId,
    columns: &[S],
    mode: AggregationMode,
) -> Result<AttributeValue> {
    let values = columns
        .iter()
        .map(|c| row.number(id, c.as_ref()))
        .collect::<Result<Vec<_>>>()?;
    mode.aggregate(values)
}

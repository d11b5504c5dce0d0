//! Min-max normalization of attribute columns
//!
//! Normalization produces a [`NormalizedView`], a dense matrix of values in
//! [0,1] (one row per dataset row, one column per normalized attribute),
//! rather than mutating the rows. [`normalize_in_place`] writes the
//! `<column>_norm` fields into the rows for callers that need them.

use std::collections::HashSet;
use std::fmt;

use derivative::Derivative;
use log::{debug, info};
use ndarray::{Array2, ArrayView1, Axis};
use serde::{Deserialize, Serialize};

use crate::{
    base::{normalized_name, AttributeValue, Len, RowId, NORM_SUFFIX},
    data::Row,
    error::{Error, Result},
};

/// What to do with a column whose minimum equals its maximum
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Default)]
#[serde(rename_all = "lowercase")]
pub enum DegeneratePolicy {
    /// Fail with [`Error::DegenerateDomain`]
    #[default]
    Reject,

    /// Every row gets this value (not inverted)
    Constant(AttributeValue),
}

#[derive(Derivative, Serialize, Deserialize, Clone, Debug)]
#[derivative(Default)]
#[serde(default)]
pub struct NormalizeOptions {
    /// Source columns to normalize
    #[derivative(Default(
        value = "[\"price\", \"battery\", \"ram\", \"size\", \"camera_res\", \"display_freq\"].iter().map(|s| s.to_string()).collect()"
    ))]
    pub columns: Vec<String>,

    /// Source columns for which lower is better
    #[derivative(Default(value = "vec![\"price\".to_string()]"))]
    pub inverted: Vec<String>,

    pub degenerate: DegeneratePolicy,
}

impl NormalizeOptions {
    pub fn new(columns: &[&str], inverted: &[&str]) -> Self {
        Self {
            columns: columns.iter().map(|s| s.to_string()).collect(),
            inverted: inverted.iter().map(|s| s.to_string()).collect(),
            degenerate: DegeneratePolicy::Reject,
        }
    }
}

/// Range of the raw values of a column
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct Domain {
    pub min: AttributeValue,
    pub max: AttributeValue,
}

impl Domain {
    pub fn is_degenerate(&self) -> bool {
        self.min == self.max
    }
}

impl fmt::Display for Domain {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {}]", self.min, self.max)
    }
}

/// Normalized values of a dataset
pub struct NormalizedView {
    /// Names of the normalized columns (`<source>_norm`)
    columns: Vec<String>,

    /// Source column names
    sources: Vec<String>,

    /// Domains of the source columns (none if the dataset is empty)
    domains: Vec<Option<Domain>>,

    inverted: Vec<bool>,

    /// Rows x columns
    values: Array2<AttributeValue>,
}

impl NormalizedView {
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn num_columns(&self) -> usize {
        self.columns.len()
    }

    /// Index of a normalized column, given either its normalized or its
    /// source name
    pub fn column_index(&self, name: &str) -> Result<usize> {
        self.columns
            .iter()
            .position(|c| c == name)
            .or_else(|| self.sources.iter().position(|c| c == name))
            .ok_or_else(|| Error::UnknownColumn(name.to_string()))
    }

    pub fn domain(&self, column: usize) -> Option<Domain> {
        self.domains[column]
    }

    pub fn is_inverted(&self, column: usize) -> bool {
        self.inverted[column]
    }

    #[inline]
    pub fn value(&self, row: RowId, column: usize) -> AttributeValue {
        self.values[[row, column]]
    }

    /// All the values of a normalized column, in row order
    pub fn column(&self, column: usize) -> ArrayView1<'_, AttributeValue> {
        self.values.index_axis(Axis(1), column)
    }

    /// All the normalized values of a row
    pub fn row(&self, row: RowId) -> ArrayView1<'_, AttributeValue> {
        self.values.index_axis(Axis(0), row)
    }

    /// Writes the normalized fields into the rows
    pub fn apply(&self, rows: &mut [Row]) -> Result<()> {
        if rows.len() != self.len() {
            return Err(Error::RowCountMismatch {
                expected: self.len(),
                actual: rows.len(),
            });
        }
        for (ix, row) in rows.iter_mut().enumerate() {
            for (col, name) in self.columns.iter().enumerate() {
                row.insert(name, self.values[[ix, col]]);
            }
        }
        Ok(())
    }

    /// Returns copies of the rows augmented with their normalized fields
    pub fn augment(&self, rows: &[Row]) -> Result<Vec<Row>> {
        let mut augmented = rows.to_vec();
        self.apply(&mut augmented)?;
        Ok(augmented)
    }

    /// Reads a view from rows that already carry normalized fields
    /// (e.g. a dataset saved after [`normalize_in_place`]); values are
    /// taken as they are
    pub fn from_fields<S: AsRef<str>>(rows: &[Row], columns: &[S]) -> Result<Self> {
        let mut seen = HashSet::new();
        let mut values = Array2::<AttributeValue>::zeros((rows.len(), columns.len()));

        for (col, column) in columns.iter().enumerate() {
            let column = column.as_ref();
            if !seen.insert(column) {
                return Err(Error::DuplicateColumn(column.to_string()));
            }
            for (ix, row) in rows.iter().enumerate() {
                values[[ix, col]] = row.number(ix, column)?;
            }
        }

        let columns: Vec<String> = columns.iter().map(|c| c.as_ref().to_string()).collect();
        Ok(Self {
            sources: columns
                .iter()
                .map(|c| c.strip_suffix(NORM_SUFFIX).unwrap_or(c.as_str()).to_string())
                .collect(),
            domains: vec![None; columns.len()],
            inverted: vec![false; columns.len()],
            columns,
            values,
        })
    }
}

impl Len for NormalizedView {
    fn len(&self) -> usize {
        self.values.nrows()
    }
}

fn check_options(options: &NormalizeOptions) -> Result<()> {
    if let DegeneratePolicy::Constant(c) = options.degenerate {
        if !(0. ..=1.).contains(&c) {
            return Err(Error::ConstantOutOfRange(c));
        }
    }

    let mut seen = HashSet::new();
    for column in options.columns.iter() {
        if !seen.insert(column.as_str()) {
            return Err(Error::DuplicateColumn(column.clone()));
        }
    }
    for column in options.inverted.iter() {
        if !seen.contains(column.as_str()) {
            return Err(Error::UnknownColumn(column.clone()));
        }
    }
    Ok(())
}

/// Computes the normalized view of a dataset
///
/// Each value `v` of a column with domain `[min, max]` becomes
/// `(v - min) / (max - min)`, or `1 - (v - min) / (max - min)` if the column
/// is inverted.
pub fn normalize(rows: &[Row], options: &NormalizeOptions) -> Result<NormalizedView> {
    check_options(options)?;

    let inverted: HashSet<&str> = options.inverted.iter().map(|s| s.as_str()).collect();
    let mut values = Array2::<AttributeValue>::zeros((rows.len(), options.columns.len()));
    let mut domains = Vec::with_capacity(options.columns.len());

    for (col, column) in options.columns.iter().enumerate() {
        let raw = rows
            .iter()
            .enumerate()
            .map(|(ix, row)| row.number(ix, column))
            .collect::<Result<Vec<_>>>()?;

        let domain = raw.iter().fold(None, |domain: Option<Domain>, &v| {
            Some(match domain {
                None => Domain { min: v, max: v },
                Some(d) => Domain {
                    min: d.min.min(v),
                    max: d.max.max(v),
                },
            })
        });
        let invert = inverted.contains(column.as_str());

        if let Some(domain) = domain {
            debug!("Domain of {} is {} (inverted: {})", column, domain, invert);
            let mut target = values.index_axis_mut(Axis(1), col);

            if domain.is_degenerate() {
                match options.degenerate {
                    DegeneratePolicy::Reject => {
                        return Err(Error::DegenerateDomain {
                            column: column.clone(),
                            value: domain.min,
                        })
                    }
                    DegeneratePolicy::Constant(c) => target.fill(c),
                }
            } else {
                let range = domain.max - domain.min;
                for (x, &v) in target.iter_mut().zip(raw.iter()) {
                    let x_norm = (v - domain.min) / range;
                    *x = if invert { 1. - x_norm } else { x_norm };
                }
            }
        }

        domains.push(domain);
    }

    info!(
        "Normalized {} columns over {} rows",
        options.columns.len(),
        rows.len()
    );

    Ok(NormalizedView {
        columns: options.columns.iter().map(|c| normalized_name(c)).collect(),
        sources: options.columns.clone(),
        inverted: options
            .columns
            .iter()
            .map(|c| inverted.contains(c.as_str()))
            .collect(),
        domains,
        values,
    })
}

/// Adds the `<column>_norm` fields to the rows (source fields are kept)
pub fn normalize_in_place(rows: &mut [Row], options: &NormalizeOptions) -> Result<()> {
    let view = normalize(rows, options)?;
    view.apply(rows)
}

use rand::{rngs::StdRng, Rng, SeedableRng};
use rand_distr::{Distribution, LogNormal};

use aggregate_topk::{
    base::{normalized_name, AttributeValue},
    data::Row,
    normalize::NormalizeOptions,
    session::Session,
};

fn rng(seed: Option<u64>) -> StdRng {
    if let Some(seed) = seed {
        StdRng::seed_from_u64(seed)
    } else {
        StdRng::from_entropy()
    }
}

/// Creates rows with a text `name` and log-normally distributed numeric
/// columns (ties are very unlikely)
pub fn create_rows(count: usize, columns: &[&str], seed: Option<u64>) -> Vec<Row> {
    let mut rng = rng(seed);
    let log_normal = LogNormal::new(0., 1.).unwrap();

    (0..count)
        .map(|ix| {
            let mut row = Row::new().with("name", format!("row {}", ix).as_str());
            for column in columns {
                row.insert(column, log_normal.sample(&mut rng) as AttributeValue);
            }
            row
        })
        .collect()
}

/// Creates rows whose values are integers in `0..levels` (many ties)
pub fn create_discrete_rows(
    count: usize,
    columns: &[&str],
    levels: u32,
    seed: Option<u64>,
) -> Vec<Row> {
    let mut rng = rng(seed);

    (0..count)
        .map(|_| {
            let mut row = Row::new();
            for column in columns {
                row.insert(column, rng.gen_range(0..levels) as AttributeValue);
            }
            row
        })
        .collect()
}

/// A session over random rows, with the sorted lists of all its columns
pub struct TestSession {
    pub session: Session,
    pub columns: Vec<String>,
}

impl TestSession {
    pub fn new(count: usize, columns: &[&str], inverted: &[&str], seed: Option<u64>) -> Self {
        let rows = create_rows(count, columns, seed);
        Self::from_rows(rows, columns, inverted)
    }

    pub fn from_rows(rows: Vec<Row>, columns: &[&str], inverted: &[&str]) -> Self {
        let mut session = Session::new(rows, &NormalizeOptions::new(columns, inverted))
            .expect("Error while normalizing the test rows");
        session
            .prepare(columns)
            .expect("Error while building the sorted lists");

        Self {
            session,
            columns: columns.iter().map(|c| normalized_name(c)).collect(),
        }
    }

    /// Names of the first `count` normalized columns
    pub fn selected(&self, count: usize) -> Vec<&str> {
        self.columns[..count].iter().map(|c| c.as_str()).collect()
    }
}

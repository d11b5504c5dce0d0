use std::{fs::File, io::BufReader, path::Path};

use derivative::Derivative;
use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    error::{Error, Result},
    normalize::NormalizeOptions,
    score::AggregationMode,
    search::Strategy,
    session::TopKQuery,
};

/// Query parameters, as read from a JSON file (missing fields take their
/// default value)
#[derive(Derivative, Serialize, Deserialize, Clone, Debug)]
#[derivative(Default)]
#[serde(default)]
pub struct QueryConfig {
    pub normalize: NormalizeOptions,

    /// Normalized columns to aggregate
    #[derivative(Default(
        value = "vec![\"display_freq_norm\".to_string(), \"battery_norm\".to_string()]"
    ))]
    pub select: Vec<String>,

    #[derivative(Default(value = "AggregationMode::Avg"))]
    pub aggregation: AggregationMode,

    #[derivative(Default(value = "Strategy::Sequential"))]
    pub strategy: Strategy,

    #[derivative(Default(value = "5"))]
    pub k: usize,
}

impl QueryConfig {
    pub fn load(path: &Path) -> Result<Self> {
        let file = File::open(path)?;
        let config: QueryConfig = serde_json::from_reader(BufReader::new(file))
            .map_err(|e| Error::Serialization(e.to_string()))?;
        info!("Read query configuration from {}", path.display());
        Ok(config)
    }

    pub fn query(&self) -> TopKQuery {
        TopKQuery {
            columns: self.select.clone(),
            mode: self.aggregation,
            k: self.k,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::DegeneratePolicy;

    #[test]
    fn test_defaults() {
        let config = QueryConfig::default();
        assert_eq!(config.k, 5);
        assert_eq!(config.aggregation, AggregationMode::Avg);
        assert_eq!(config.strategy, Strategy::Sequential);
        assert_eq!(config.select, vec!["display_freq_norm", "battery_norm"]);
        assert_eq!(config.normalize.columns.len(), 6);
        assert_eq!(config.normalize.inverted, vec!["price"]);
        assert_eq!(config.normalize.degenerate, DegeneratePolicy::Reject);
    }

    #[test]
    fn test_partial_json() {
        let config: QueryConfig = serde_json::from_str(
            r#"{"strategy": "threshold", "k": 3, "normalize": {"inverted": [], "degenerate": {"constant": 0.0}}}"#,
        )
        .unwrap();

        assert_eq!(config.strategy, Strategy::Threshold);
        assert_eq!(config.k, 3);
        assert_eq!(config.aggregation, AggregationMode::Avg);
        assert!(config.normalize.inverted.is_empty());
        assert_eq!(config.normalize.columns.len(), 6);
        assert_eq!(config.normalize.degenerate, DegeneratePolicy::Constant(0.));
        assert_eq!(config.query().columns, config.select);
    }

    #[test]
    fn test_unknown_aggregation() {
        assert!(serde_json::from_str::<QueryConfig>(r#"{"aggregation": "median"}"#).is_err());
    }
}

pub type RowId = usize;
pub type AttributeValue = f64;
pub type BoxResult<T> = Result<T, Box<dyn std::error::Error>>;

/// Suffix appended to a source column to name its normalized companion
pub const NORM_SUFFIX: &str = "_norm";

/// Name of the field added to materialized result rows
pub const SCORE_FIELD: &str = "score";

/// Marks object that have a length
pub trait Len {
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Returns the name of the normalized companion of a column
/// (e.g. `price` gives `price_norm`)
pub fn normalized_name(column: &str) -> String {
    format!("{}{}", column, NORM_SUFFIX)
}

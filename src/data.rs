//! Rows of a dataset and their (JSON) storage

use std::{
    collections::BTreeMap,
    fmt,
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    base::{AttributeValue, RowId},
    error::{Error, Result},
};

/// An attribute value, either numeric or textual
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(untagged)]
pub enum Value {
    Number(AttributeValue),
    Text(String),
}

impl Value {
    pub fn as_number(&self) -> Option<AttributeValue> {
        match self {
            Value::Number(v) if v.is_finite() => Some(*v),
            _ => None,
        }
    }
}

impl From<AttributeValue> for Value {
    fn from(value: AttributeValue) -> Self {
        Value::Number(value)
    }
}

impl From<&str> for Value {
    fn from(value: &str) -> Self {
        Value::Text(value.to_string())
    }
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Value::Number(v) => write!(f, "{}", v),
            Value::Text(s) => write!(f, "{}", s),
        }
    }
}

/// A dataset row: attribute name to value. The identity of a row is its
/// position in the dataset.
#[derive(Serialize, Deserialize, Clone, Debug, Default, PartialEq)]
#[serde(transparent)]
pub struct Row {
    fields: BTreeMap<String, Value>,
}

impl Row {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder-style insertion
    pub fn with(mut self, name: &str, value: impl Into<Value>) -> Self {
        self.insert(name, value);
        self
    }

    pub fn insert(&mut self, name: &str, value: impl Into<Value>) {
        self.fields.insert(name.to_string(), value.into());
    }

    pub fn get(&self, name: &str) -> Option<&Value> {
        self.fields.get(name)
    }

    /// Returns the numeric value of an attribute
    ///
    /// `row` is only used to report errors
    pub fn number(&self, row: RowId, column: &str) -> Result<AttributeValue> {
        match self.fields.get(column) {
            None => Err(Error::MissingAttribute {
                row,
                column: column.to_string(),
            }),
            Some(value) => value.as_number().ok_or_else(|| Error::NotNumeric {
                row,
                column: column.to_string(),
            }),
        }
    }

    pub fn iter(&self) -> impl Iterator<Item = (&String, &Value)> {
        self.fields.iter()
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }
}

impl fmt::Display for Row {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{{")?;
        for (ix, (name, value)) in self.fields.iter().enumerate() {
            if ix > 0 {
                write!(f, ", ")?;
            }
            write!(f, "{}: {}", name, value)?;
        }
        write!(f, "}}")
    }
}

/// Loads a dataset stored as a JSON array of records
pub fn load_dataset(path: &Path) -> Result<Vec<Row>> {
    let file = File::open(path)?;
    let rows: Vec<Row> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::Serialization(e.to_string()))?;
    info!("Loaded {} rows from {}", rows.len(), path.display());
    Ok(rows)
}

/// Saves a dataset as a JSON array of records
pub fn save_dataset(path: &Path, rows: &[Row]) -> Result<()> {
    let file = File::options()
        .write(true)
        .create(true)
        .truncate(true)
        .open(path)?;
    let mut writer = BufWriter::new(file);
    serde_json::to_writer(&mut writer, rows).map_err(|e| Error::Serialization(e.to_string()))?;
    writer.flush()?;
    info!("Saved {} rows into {}", rows.len(), path.display());
    Ok(())
}

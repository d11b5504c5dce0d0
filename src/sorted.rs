//! Sorted access lists: for one normalized column, the (row, value) pairs
//! by decreasing value

use std::{
    fmt,
    fs::{create_dir_all, File},
    io::{BufReader, BufWriter, Write},
    path::{Path, PathBuf},
};

use log::info;
use serde::{Deserialize, Serialize};

use crate::{
    base::{AttributeValue, Len, RowId},
    error::{Error, Result},
    normalize::NormalizedView,
};

/// Sorted access entry = row ID + normalized value
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
pub struct SortedEntry {
    pub row: RowId,
    pub value: AttributeValue,
}

impl fmt::Display for SortedEntry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "({},{})", self.row, self.value)
    }
}

#[derive(Serialize, Deserialize, Clone, Debug)]
pub struct SortedAccessList {
    /// Name of the normalized column
    pub column: String,
    entries: Vec<SortedEntry>,
}

impl SortedAccessList {
    /// Builds a list from entries, sorting them by decreasing value. Entries
    /// with the same value keep their relative order.
    pub fn new(column: &str, mut entries: Vec<SortedEntry>) -> Self {
        entries.sort_by(|a, b| b.value.total_cmp(&a.value));
        Self {
            column: column.to_string(),
            entries,
        }
    }

    /// Builds the list of a normalized column
    pub fn from_view(view: &NormalizedView, column: &str) -> Result<Self> {
        let ix = view.column_index(column)?;
        let entries = view
            .column(ix)
            .iter()
            .enumerate()
            .map(|(row, &value)| SortedEntry { row, value })
            .collect();
        Ok(Self::new(&view.columns()[ix], entries))
    }

    #[inline]
    pub fn get(&self, position: usize) -> Option<&SortedEntry> {
        self.entries.get(position)
    }

    pub fn iter(&self) -> std::slice::Iter<'_, SortedEntry> {
        self.entries.iter()
    }

    /// Checks that the list covers a dataset of `len` rows
    pub fn validate(&self, len: usize) -> Result<()> {
        if self.entries.len() != len {
            return Err(Error::ListLengthMismatch {
                column: self.column.clone(),
                expected: len,
                actual: self.entries.len(),
            });
        }
        let mut seen = vec![false; len];
        for entry in self.entries.iter() {
            if entry.row >= len {
                return Err(Error::RowOutOfRange {
                    row: entry.row,
                    len,
                });
            }
            if std::mem::replace(&mut seen[entry.row], true) {
                return Err(Error::DuplicateRow {
                    column: self.column.clone(),
                    row: entry.row,
                });
            }
        }
        Ok(())
    }
}

impl Len for SortedAccessList {
    fn len(&self) -> usize {
        self.entries.len()
    }
}

/// Path of the file holding the sorted list of a column
pub fn sorted_list_path(dir: &Path, column: &str) -> PathBuf {
    dir.join(format!("sorted_{}.cbor", column))
}

pub fn save_sorted_list(dir: &Path, list: &SortedAccessList) -> Result<()> {
    create_dir_all(dir)?;
    let path = sorted_list_path(dir, &list.column);
    let file = File::options()
        .write(true)
        .truncate(true)
        .create(true)
        .open(&path)?;

    let mut writer = BufWriter::new(file);
    ciborium::ser::into_writer(list, &mut writer)
        .map_err(|e| Error::Serialization(e.to_string()))?;
    writer.flush()?;
    info!("Saved sorted list {} ({} entries)", path.display(), list.len());
    Ok(())
}

pub fn save_sorted_lists<'a, I>(dir: &Path, lists: I) -> Result<()>
where
    I: IntoIterator<Item = &'a SortedAccessList>,
{
    for list in lists {
        save_sorted_list(dir, list)?;
    }
    Ok(())
}

pub fn load_sorted_list(dir: &Path, column: &str) -> Result<SortedAccessList> {
    let path = sorted_list_path(dir, column);
    let file = File::options().read(true).open(&path)?;

    let list: SortedAccessList = ciborium::de::from_reader(BufReader::new(file))
        .map_err(|e| Error::Serialization(e.to_string()))?;
    if list.column != column {
        return Err(Error::Serialization(format!(
            "{} holds the list of {}",
            path.display(),
            list.column
        )));
    }
    info!("Loaded sorted list {} ({} entries)", path.display(), list.len());
    Ok(list)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_stable_order() {
        let list = SortedAccessList::new(
            "ram_norm",
            [0.5, 1., 0.5, 0., 1.]
                .iter()
                .enumerate()
                .map(|(row, &value)| SortedEntry { row, value })
                .collect(),
        );

        let rows: Vec<RowId> = list.iter().map(|e| e.row).collect();
        assert_eq!(rows, vec![1, 4, 0, 2, 3]);
        assert_eq!(list.get(2), Some(&SortedEntry { row: 0, value: 0.5 }));
        assert_eq!(list.get(5), None);
    }

    #[test]
    fn test_validate() {
        let list = SortedAccessList::new(
            "size_norm",
            vec![SortedEntry { row: 0, value: 1. }, SortedEntry { row: 3, value: 0. }],
        );

        assert!(matches!(
            list.validate(3),
            Err(Error::ListLengthMismatch { expected: 3, actual: 2, .. })
        ));
        assert!(matches!(
            list.validate(2),
            Err(Error::RowOutOfRange { row: 3, len: 2 })
        ));

        let duplicated = SortedAccessList::new(
            "size_norm",
            vec![SortedEntry { row: 1, value: 1. }, SortedEntry { row: 1, value: 0. }],
        );
        assert!(matches!(
            duplicated.validate(2),
            Err(Error::DuplicateRow { row: 1, .. })
        ));
    }
}

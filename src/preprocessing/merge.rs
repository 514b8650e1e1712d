//! Left-join merge that preserves the primary table's dtypes

use crate::error::{Result, TabularError};
use crate::table::{Column, ColumnData, Table};
use std::collections::HashMap;
use tracing::debug;

/// Hashable join key component; integers and floats are widened per kind
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
enum JoinKey {
    Int(i64),
    Float(u64),
    Bool(bool),
    Str(String),
}

impl JoinKey {
    /// Key at `row`, `None` for missing values and NaN
    fn at(data: &ColumnData, row: usize) -> Option<Self> {
        match data {
            ColumnData::Int8(v) => v[row].map(|x| JoinKey::Int(x.into())),
            ColumnData::Int16(v) => v[row].map(|x| JoinKey::Int(x.into())),
            ColumnData::Int32(v) => v[row].map(|x| JoinKey::Int(x.into())),
            ColumnData::Int64(v) => v[row].map(JoinKey::Int),
            ColumnData::Float16(v) => v[row].and_then(|x| Self::float(x.to_f64())),
            ColumnData::Float32(v) => v[row].and_then(|x| Self::float(x.into())),
            ColumnData::Float64(v) => v[row].and_then(Self::float),
            ColumnData::Boolean(v) => v[row].map(JoinKey::Bool),
            ColumnData::Utf8(v) => v[row].clone().map(JoinKey::Str),
        }
    }

    fn float(x: f64) -> Option<Self> {
        if x.is_nan() {
            return None;
        }
        // -0.0 and 0.0 compare equal
        let x = if x == 0.0 { 0.0 } else { x };
        Some(JoinKey::Float(x.to_bits()))
    }
}

fn row_key(keys: &[&ColumnData], row: usize) -> Option<Vec<JoinKey>> {
    keys.iter().map(|data| JoinKey::at(data, row)).collect()
}

/// Left-join `secondary` onto `primary` on `on`, appending only the new columns.
///
/// The primary's columns keep their order and dtypes, and the result has
/// exactly `primary.height()` rows. Unmatched rows get missing values in the
/// appended columns, which keep the secondary's dtypes. Rows with a missing
/// key component never match. A primary row whose key is held by several
/// secondary rows fails with `DuplicateJoinKey`; unmatched duplicates are fine.
pub fn merge_preserving_types(primary: Table, secondary: &Table, on: &[&str]) -> Result<Table> {
    if on.is_empty() {
        return Err(TabularError::InvalidInput(
            "at least one join key is required".to_string(),
        ));
    }
    for (i, key) in on.iter().enumerate() {
        if on[..i].contains(key) {
            return Err(TabularError::InvalidInput(format!("join key '{key}' given twice")));
        }
    }

    let left_keys = key_columns(&primary, on)?;
    let right_keys = key_columns(secondary, on)?;

    // `None` marks a key held by more than one secondary row
    let mut index: HashMap<Vec<JoinKey>, Option<usize>> = HashMap::with_capacity(secondary.height());
    for row in 0..secondary.height() {
        let Some(key) = row_key(&right_keys, row) else {
            continue;
        };
        index
            .entry(key)
            .and_modify(|slot| *slot = None)
            .or_insert(Some(row));
    }

    let matches: Vec<Option<usize>> = (0..primary.height())
        .map(|row| {
            let Some(key) = row_key(&left_keys, row) else {
                return Ok(None);
            };
            match index.get(&key) {
                None => Ok(None),
                Some(Some(matched)) => Ok(Some(*matched)),
                Some(None) => Err(TabularError::DuplicateJoinKey { row }),
            }
        })
        .collect::<Result<_>>()?;

    let new_columns: Vec<Column> = secondary
        .columns()
        .iter()
        .filter(|c| !on.contains(&c.name()))
        .map(|c| Column::new(c.name(), c.data().take(&matches)))
        .collect();

    debug!(
        rows = primary.height(),
        matched = matches.iter().filter(|m| m.is_some()).count(),
        added = new_columns.len(),
        "merged tables"
    );

    primary.hstack(new_columns)
}

fn key_columns<'a>(table: &'a Table, on: &[&str]) -> Result<Vec<&'a ColumnData>> {
    on.iter()
        .map(|name| table.column(name).map(Column::data))
        .collect()
}

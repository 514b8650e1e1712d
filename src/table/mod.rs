//! In-memory table model
//!
//! A [`Table`] is an ordered set of uniquely named [`Column`]s of equal
//! length. Columns carry typed, nullable storage ([`ColumnData`]) so that
//! half precision floats can be represented alongside the usual integer,
//! float, boolean and string kinds.

mod column;
mod convert;
pub mod dtype;

pub use column::ColumnData;
pub use dtype::{BoundPolicy, DType, NumericKind, Range, TypeDescriptor, FLOAT_LADDER, INTEGER_LADDER};

use crate::error::{Result, TabularError};
use std::collections::HashSet;

/// A named, typed column
#[derive(Debug, Clone, PartialEq)]
pub struct Column {
    name: String,
    data: ColumnData,
}

impl Column {
    /// Create a new column
    pub fn new(name: impl Into<String>, data: impl Into<ColumnData>) -> Self {
        Self {
            name: name.into(),
            data: data.into(),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn data(&self) -> &ColumnData {
        &self.data
    }

    pub fn dtype(&self) -> DType {
        self.data.dtype()
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Replace the storage, keeping the name
    pub fn with_data(self, data: ColumnData) -> Self {
        Self { name: self.name, data }
    }
}

/// Ordered collection of equally sized, uniquely named columns
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Table {
    columns: Vec<Column>,
}

impl Table {
    /// Create a table, validating column lengths and names
    pub fn new(columns: Vec<Column>) -> Result<Self> {
        let mut seen = HashSet::with_capacity(columns.len());
        let expected = columns.first().map(Column::len).unwrap_or(0);

        for column in &columns {
            if !seen.insert(column.name()) {
                return Err(TabularError::DuplicateColumn(column.name().to_string()));
            }
            if column.len() != expected {
                return Err(TabularError::LengthMismatch {
                    column: column.name().to_string(),
                    expected,
                    actual: column.len(),
                });
            }
        }

        Ok(Self { columns })
    }

    /// Number of rows
    pub fn height(&self) -> usize {
        self.columns.first().map(Column::len).unwrap_or(0)
    }

    /// Number of columns
    pub fn width(&self) -> usize {
        self.columns.len()
    }

    pub fn columns(&self) -> &[Column] {
        &self.columns
    }

    /// Look up a column by name
    pub fn column(&self, name: &str) -> Result<&Column> {
        self.columns
            .iter()
            .find(|c| c.name() == name)
            .ok_or_else(|| TabularError::ColumnNotFound(name.to_string()))
    }

    pub fn get_column_names(&self) -> Vec<&str> {
        self.columns.iter().map(Column::name).collect()
    }

    pub fn dtypes(&self) -> Vec<DType> {
        self.columns.iter().map(Column::dtype).collect()
    }

    /// Append columns on the right, validating them against the existing ones
    pub fn hstack(self, columns: Vec<Column>) -> Result<Self> {
        let mut all = self.columns;
        all.extend(columns);
        Self::new(all)
    }

    /// Approximate bytes of value storage across all columns
    pub fn estimated_size(&self) -> usize {
        self.columns.iter().map(|c| c.data().estimated_size()).sum()
    }

    pub(crate) fn into_columns(self) -> Vec<Column> {
        self.columns
    }

    /// Caller guarantees equal lengths and unique names
    pub(crate) fn from_columns_unchecked(columns: Vec<Column>) -> Self {
        Self { columns }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> Table {
        Table::new(vec![
            Column::new("id", vec![1i64, 2, 3]),
            Column::new("label", vec!["a", "b", "c"]),
        ])
        .unwrap()
    }

    #[test]
    fn test_shape() {
        let table = sample();
        assert_eq!(table.height(), 3);
        assert_eq!(table.width(), 2);
        assert_eq!(table.get_column_names(), vec!["id", "label"]);
        assert_eq!(table.dtypes(), vec![DType::Int64, DType::Utf8]);
    }

    #[test]
    fn test_empty_table() {
        let table = Table::default();
        assert_eq!(table.height(), 0);
        assert_eq!(table.estimated_size(), 0);
    }

    #[test]
    fn test_length_mismatch() {
        let result = Table::new(vec![
            Column::new("a", vec![1i32, 2]),
            Column::new("b", vec![1i32]),
        ]);
        assert!(matches!(
            result,
            Err(TabularError::LengthMismatch { expected: 2, actual: 1, .. })
        ));
    }

    #[test]
    fn test_duplicate_names() {
        let result = Table::new(vec![
            Column::new("a", vec![1i32]),
            Column::new("a", vec![2i32]),
        ]);
        assert!(matches!(result, Err(TabularError::DuplicateColumn(name)) if name == "a"));
    }

    #[test]
    fn test_column_lookup() {
        let table = sample();
        assert_eq!(table.column("id").unwrap().dtype(), DType::Int64);
        assert!(matches!(table.column("missing"), Err(TabularError::ColumnNotFound(_))));
    }

    #[test]
    fn test_hstack_rejects_existing_name() {
        let result = sample().hstack(vec![Column::new("id", vec![9i64, 9, 9])]);
        assert!(matches!(result, Err(TabularError::DuplicateColumn(_))));
    }
}

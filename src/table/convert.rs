//! Conversion between [`Table`] and polars `DataFrame`

use super::{Column, ColumnData, Table};
use crate::error::{Result, TabularError};
use half::f16;
use polars::prelude::{Column as FrameColumn, DataFrame, DataType};

impl Table {
    /// Convert a polars frame.
    ///
    /// Supports signed integers, `Float32`/`Float64`, `Boolean` and `String`
    /// columns; anything else is an `InvalidColumnType`.
    pub fn from_dataframe(df: &DataFrame) -> Result<Self> {
        let columns = df
            .get_columns()
            .iter()
            .map(column_from_frame)
            .collect::<Result<Vec<_>>>()?;
        Table::new(columns)
    }

    /// Convert to a polars frame. `Float16` columns are exported as `Float32`.
    pub fn to_dataframe(&self) -> Result<DataFrame> {
        let columns: Vec<FrameColumn> = self.columns().iter().map(column_to_frame).collect();
        Ok(DataFrame::new(columns)?)
    }
}

fn column_from_frame(col: &FrameColumn) -> Result<Column> {
    let name = col.name().to_string();
    let series = col.as_materialized_series();

    let data = match series.dtype() {
        DataType::Int8 => ColumnData::Int8(series.i8()?.into_iter().collect()),
        DataType::Int16 => ColumnData::Int16(series.i16()?.into_iter().collect()),
        DataType::Int32 => ColumnData::Int32(series.i32()?.into_iter().collect()),
        DataType::Int64 => ColumnData::Int64(series.i64()?.into_iter().collect()),
        DataType::Float32 => ColumnData::Float32(series.f32()?.into_iter().collect()),
        DataType::Float64 => ColumnData::Float64(series.f64()?.into_iter().collect()),
        DataType::Boolean => ColumnData::Boolean(series.bool()?.into_iter().collect()),
        DataType::String => ColumnData::Utf8(
            series
                .str()?
                .into_iter()
                .map(|v| v.map(str::to_string))
                .collect(),
        ),
        other => {
            return Err(TabularError::InvalidColumnType {
                column: name,
                dtype: other.to_string(),
            })
        }
    };

    Ok(Column::new(name, data))
}

fn column_to_frame(column: &Column) -> FrameColumn {
    let name = column.name().into();
    match column.data() {
        ColumnData::Int8(values) => FrameColumn::new(name, values.clone()),
        ColumnData::Int16(values) => FrameColumn::new(name, values.clone()),
        ColumnData::Int32(values) => FrameColumn::new(name, values.clone()),
        ColumnData::Int64(values) => FrameColumn::new(name, values.clone()),
        ColumnData::Float16(values) => {
            let widened: Vec<Option<f32>> = values.iter().map(|v| v.map(f16::to_f32)).collect();
            FrameColumn::new(name, widened)
        }
        ColumnData::Float32(values) => FrameColumn::new(name, values.clone()),
        ColumnData::Float64(values) => FrameColumn::new(name, values.clone()),
        ColumnData::Boolean(values) => FrameColumn::new(name, values.clone()),
        ColumnData::Utf8(values) => FrameColumn::new(name, values.clone()),
    }
}

//! Typed, nullable column storage

use super::dtype::DType;
use crate::error::{Result, TabularError};
use half::f16;

/// Column values; `None` is a missing value
#[derive(Debug, Clone, PartialEq)]
pub enum ColumnData {
    Int8(Vec<Option<i8>>),
    Int16(Vec<Option<i16>>),
    Int32(Vec<Option<i32>>),
    Int64(Vec<Option<i64>>),
    Float16(Vec<Option<f16>>),
    Float32(Vec<Option<f32>>),
    Float64(Vec<Option<f64>>),
    Boolean(Vec<Option<bool>>),
    Utf8(Vec<Option<String>>),
}

/// Applies `$body` to the inner vector of any variant
macro_rules! with_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ColumnData::Int8($values) => $body,
            ColumnData::Int16($values) => $body,
            ColumnData::Int32($values) => $body,
            ColumnData::Int64($values) => $body,
            ColumnData::Float16($values) => $body,
            ColumnData::Float32($values) => $body,
            ColumnData::Float64($values) => $body,
            ColumnData::Boolean($values) => $body,
            ColumnData::Utf8($values) => $body,
        }
    };
}

/// Same as `with_values!` but rebuilds a column of the same variant
macro_rules! map_values {
    ($data:expr, $values:ident => $body:expr) => {
        match $data {
            ColumnData::Int8($values) => ColumnData::Int8($body),
            ColumnData::Int16($values) => ColumnData::Int16($body),
            ColumnData::Int32($values) => ColumnData::Int32($body),
            ColumnData::Int64($values) => ColumnData::Int64($body),
            ColumnData::Float16($values) => ColumnData::Float16($body),
            ColumnData::Float32($values) => ColumnData::Float32($body),
            ColumnData::Float64($values) => ColumnData::Float64($body),
            ColumnData::Boolean($values) => ColumnData::Boolean($body),
            ColumnData::Utf8($values) => ColumnData::Utf8($body),
        }
    };
}

impl ColumnData {
    /// Declared type of the values
    pub fn dtype(&self) -> DType {
        match self {
            ColumnData::Int8(_) => DType::Int8,
            ColumnData::Int16(_) => DType::Int16,
            ColumnData::Int32(_) => DType::Int32,
            ColumnData::Int64(_) => DType::Int64,
            ColumnData::Float16(_) => DType::Float16,
            ColumnData::Float32(_) => DType::Float32,
            ColumnData::Float64(_) => DType::Float64,
            ColumnData::Boolean(_) => DType::Boolean,
            ColumnData::Utf8(_) => DType::Utf8,
        }
    }

    pub fn len(&self) -> usize {
        with_values!(self, values => values.len())
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Approximate bytes of value storage.
    ///
    /// Every row takes one slot of the type's width, nulls included; strings
    /// add their byte length on top of the offset slot.
    pub fn estimated_size(&self) -> usize {
        let slots = self.len() * self.dtype().byte_width();
        match self {
            ColumnData::Utf8(values) => slots + values.iter().flatten().map(String::len).sum::<usize>(),
            _ => slots,
        }
    }

    /// Gather rows by index; `None` produces a missing value
    pub fn take(&self, indices: &[Option<usize>]) -> Self {
        map_values!(self, values => indices
            .iter()
            .map(|idx| idx.and_then(|i| values.get(i).cloned().flatten()))
            .collect())
    }

    /// Integer values widened to `i64`, `None` for non-integer columns
    pub fn to_i64_values(&self) -> Option<Vec<Option<i64>>> {
        match self {
            ColumnData::Int8(values) => Some(widen(values, i64::from)),
            ColumnData::Int16(values) => Some(widen(values, i64::from)),
            ColumnData::Int32(values) => Some(widen(values, i64::from)),
            ColumnData::Int64(values) => Some(values.clone()),
            _ => None,
        }
    }

    /// Float values widened to `f64`, `None` for non-float columns
    pub fn to_f64_values(&self) -> Option<Vec<Option<f64>>> {
        match self {
            ColumnData::Float16(values) => Some(widen(values, f16::to_f64)),
            ColumnData::Float32(values) => Some(widen(values, f64::from)),
            ColumnData::Float64(values) => Some(values.clone()),
            _ => None,
        }
    }

    /// Build an integer column of `dtype`; fails if a value does not fit
    pub fn from_i64_values(dtype: DType, values: &[Option<i64>]) -> Result<Self> {
        let data = match dtype {
            DType::Int8 => ColumnData::Int8(narrow(values, dtype)?),
            DType::Int16 => ColumnData::Int16(narrow(values, dtype)?),
            DType::Int32 => ColumnData::Int32(narrow(values, dtype)?),
            DType::Int64 => ColumnData::Int64(values.to_vec()),
            other => return Err(invalid_type(other, "expected an integer type")),
        };
        Ok(data)
    }

    /// Build a float column of `dtype`, rounding to the target precision
    pub fn from_f64_values(dtype: DType, values: &[Option<f64>]) -> Result<Self> {
        let data = match dtype {
            DType::Float16 => ColumnData::Float16(widen(values, f16::from_f64)),
            DType::Float32 => ColumnData::Float32(widen(values, |v| v as f32)),
            DType::Float64 => ColumnData::Float64(values.to_vec()),
            other => return Err(invalid_type(other, "expected a float type")),
        };
        Ok(data)
    }
}

fn widen<T: Copy, U>(values: &[Option<T>], f: impl Fn(T) -> U) -> Vec<Option<U>> {
    values.iter().map(|v| v.map(&f)).collect()
}

fn narrow<T: TryFrom<i64>>(values: &[Option<i64>], dtype: DType) -> Result<Vec<Option<T>>> {
    values
        .iter()
        .map(|v| match v {
            Some(v) => T::try_from(*v).map(Some).map_err(|_| TabularError::RangeOverflow {
                column: String::new(),
                min: v.to_string(),
                max: v.to_string(),
                widest: dtype.to_string(),
            }),
            None => Ok(None),
        })
        .collect()
}

fn invalid_type(dtype: DType, reason: &str) -> TabularError {
    TabularError::InvalidColumnType {
        column: String::new(),
        dtype: format!("{dtype} ({reason})"),
    }
}

macro_rules! impl_from_vec {
    ($($native:ty => $variant:ident),* $(,)?) => {
        $(
            impl From<Vec<Option<$native>>> for ColumnData {
                fn from(values: Vec<Option<$native>>) -> Self {
                    ColumnData::$variant(values)
                }
            }

            impl From<Vec<$native>> for ColumnData {
                fn from(values: Vec<$native>) -> Self {
                    ColumnData::$variant(values.into_iter().map(Some).collect())
                }
            }
        )*
    };
}

impl_from_vec!(
    i8 => Int8,
    i16 => Int16,
    i32 => Int32,
    i64 => Int64,
    f16 => Float16,
    f32 => Float32,
    f64 => Float64,
    bool => Boolean,
    String => Utf8,
);

impl From<Vec<&str>> for ColumnData {
    fn from(values: Vec<&str>) -> Self {
        ColumnData::Utf8(values.into_iter().map(|s| Some(s.to_string())).collect())
    }
}

impl From<Vec<Option<&str>>> for ColumnData {
    fn from(values: Vec<Option<&str>>) -> Self {
        ColumnData::Utf8(values.into_iter().map(|s| s.map(str::to_string)).collect())
    }
}

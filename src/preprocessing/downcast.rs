//! Numeric downcasting
//!
//! Rewrites each numeric column to the narrowest type on its ladder whose
//! range holds the column's observed `[min, max]`:
//!
//! - integers: `Int8 -> Int16 -> Int32 -> Int64`
//! - floats: `Float16 -> Float32 -> Float64`
//!
//! Bounds are exclusive by default, so a column whose maximum is exactly
//! `127` does not stay `Int8`. Columns are independent of each other and are
//! processed in parallel unless disabled in [`DowncastConfig`].

use super::config::{DowncastConfig, NonFinitePolicy, OverflowPolicy};
use crate::error::{Result, TabularError};
use crate::table::{Column, ColumnData, DType, NumericKind, Table, FLOAT_LADDER, INTEGER_LADDER};
use crate::utils::format::format_bytes;
use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

const MB: f64 = 1024.0 * 1024.0;

/// What happened to a single column
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum DowncastAction {
    /// Storage type changed
    Retyped,
    /// Already the narrowest fitting type
    Unchanged,
    /// Boolean or string column
    NotNumeric,
    /// Numeric, but already the narrowest type of its kind (`Int8`)
    NotCandidate,
    /// Empty or all-null; min/max undefined
    Empty,
    /// Contains NaN or infinities and the policy keeps such columns
    NonFinite,
    /// No candidate fit; the widest type of the kind was used
    Overflow,
}

/// Per-column result of a downcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ColumnOutcome {
    pub name: String,
    pub from: DType,
    pub to: DType,
    pub action: DowncastAction,
}

/// Memory and per-column summary of a downcast
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DowncastReport {
    pub start_bytes: usize,
    pub end_bytes: usize,
    pub columns: Vec<ColumnOutcome>,
}

impl DowncastReport {
    pub fn start_mb(&self) -> f64 {
        self.start_bytes as f64 / MB
    }

    pub fn end_mb(&self) -> f64 {
        self.end_bytes as f64 / MB
    }

    /// Percentage reduction, `None` when the starting size is zero
    pub fn reduction_pct(&self) -> Option<f64> {
        if self.start_bytes == 0 {
            return None;
        }
        Some(100.0 * (self.start_bytes as f64 - self.end_bytes as f64) / self.start_bytes as f64)
    }

    /// Columns whose storage type changed
    pub fn retyped(&self) -> impl Iterator<Item = &ColumnOutcome> {
        self.columns
            .iter()
            .filter(|c| c.action == DowncastAction::Retyped)
    }

    fn log(&self) {
        match self.reduction_pct() {
            Some(pct) => info!(
                start = %format_bytes(self.start_bytes as f64),
                end = %format_bytes(self.end_bytes as f64),
                "Mem. usage decreased to {:5.2} Mb ({:.1}% reduction)",
                self.end_mb(),
                pct
            ),
            None => info!("Mem. usage decreased to {:5.2} Mb", self.end_mb()),
        }
    }
}

/// Downcast numeric columns with the default configuration
pub fn downcast(table: Table) -> Result<Table> {
    Downcaster::default().downcast(table)
}

/// Numeric column downcaster
#[derive(Debug, Clone, Default)]
pub struct Downcaster {
    config: DowncastConfig,
}

impl Downcaster {
    pub fn new(config: DowncastConfig) -> Self {
        Self { config }
    }

    /// Narrow the table's numeric columns and return it
    pub fn downcast(&self, table: Table) -> Result<Table> {
        self.downcast_with_report(table).map(|(table, _)| table)
    }

    /// Narrow the table's numeric columns, also returning what changed
    pub fn downcast_with_report(&self, table: Table) -> Result<(Table, DowncastReport)> {
        self.config.validate()?;

        let start_bytes = table.estimated_size();
        let columns = table.into_columns();

        let results = if self.config.parallel {
            self.downcast_parallel(columns)?
        } else {
            columns
                .into_iter()
                .map(|c| self.downcast_column(c))
                .collect::<Result<Vec<_>>>()?
        };

        let (columns, outcomes): (Vec<Column>, Vec<ColumnOutcome>) = results.into_iter().unzip();
        let table = Table::from_columns_unchecked(columns);

        let report = DowncastReport {
            start_bytes,
            end_bytes: table.estimated_size(),
            columns: outcomes,
        };
        if self.config.verbose {
            report.log();
        }

        Ok((table, report))
    }

    fn downcast_parallel(&self, columns: Vec<Column>) -> Result<Vec<(Column, ColumnOutcome)>> {
        let work = move || {
            columns
                .into_par_iter()
                .map(|c| self.downcast_column(c))
                .collect::<Result<Vec<_>>>()
        };

        match self.config.n_jobs {
            Some(n) => {
                let pool = rayon::ThreadPoolBuilder::new()
                    .num_threads(n)
                    .build()
                    .map_err(|e| TabularError::ConfigError(e.to_string()))?;
                pool.install(work)
            }
            None => work(),
        }
    }

    /// Downcast a single column
    pub fn downcast_column(&self, column: Column) -> Result<(Column, ColumnOutcome)> {
        let dtype = column.dtype();
        match dtype.kind() {
            None => Ok(keep(column, DowncastAction::NotNumeric)),
            Some(_) if !dtype.is_downcast_candidate() => {
                Ok(keep(column, DowncastAction::NotCandidate))
            }
            Some(NumericKind::Integer) => self.downcast_integers(column),
            Some(NumericKind::Float) => self.downcast_floats(column),
        }
    }

    fn downcast_integers(&self, column: Column) -> Result<(Column, ColumnOutcome)> {
        let Some(values) = column.data().to_i64_values() else {
            return Err(invalid_type(&column));
        };
        let Some((min, max)) = integer_bounds(&values) else {
            return Ok(keep(column, DowncastAction::Empty));
        };

        let rung = INTEGER_LADDER
            .iter()
            .find(|rung| rung.contains_int(min, max, self.config.bounds));

        let (target, action) = match rung {
            Some(rung) => (rung.dtype, retype_action(column.dtype(), rung.dtype)),
            None => match self.config.overflow {
                OverflowPolicy::Widest => {
                    warn!(column = column.name(), min, max, "no integer type fits; keeping Int64");
                    (DType::Int64, DowncastAction::Overflow)
                }
                OverflowPolicy::Reject => {
                    return Err(TabularError::RangeOverflow {
                        column: column.name().to_string(),
                        min: min.to_string(),
                        max: max.to_string(),
                        widest: DType::Int64.to_string(),
                    })
                }
            },
        };

        let data = ColumnData::from_i64_values(target, &values).map_err(|e| with_column(e, column.name()))?;
        Ok(retype(column, data, action))
    }

    fn downcast_floats(&self, column: Column) -> Result<(Column, ColumnOutcome)> {
        let Some(values) = column.data().to_f64_values() else {
            return Err(invalid_type(&column));
        };

        if values.iter().flatten().any(|v| !v.is_finite()) {
            match self.config.non_finite {
                NonFinitePolicy::Skip => {}
                NonFinitePolicy::Reject => {
                    return Err(TabularError::NonFiniteValue {
                        column: column.name().to_string(),
                    })
                }
                NonFinitePolicy::Keep => return Ok(keep(column, DowncastAction::NonFinite)),
            }
        }

        let Some((min, max)) = float_bounds(&values) else {
            return Ok(keep(column, DowncastAction::Empty));
        };

        // Checked against the stored (rounded) bounds so a second pass picks the same rung.
        let rung = FLOAT_LADDER.iter().find(|rung| {
            rung.contains_float(rung.quantize(min), rung.quantize(max), self.config.bounds)
                && (!self.config.lossless_floats
                    || values.iter().flatten().all(|v| rung.represents_exactly(*v)))
        });

        let (target, action) = match rung {
            Some(rung) => (rung.dtype, retype_action(column.dtype(), rung.dtype)),
            None => match self.config.overflow {
                OverflowPolicy::Widest => (DType::Float64, DowncastAction::Overflow),
                OverflowPolicy::Reject => {
                    return Err(TabularError::RangeOverflow {
                        column: column.name().to_string(),
                        min: min.to_string(),
                        max: max.to_string(),
                        widest: DType::Float64.to_string(),
                    })
                }
            },
        };

        let data = ColumnData::from_f64_values(target, &values).map_err(|e| with_column(e, column.name()))?;
        Ok(retype(column, data, action))
    }
}

/// Min and max over non-null values
fn integer_bounds(values: &[Option<i64>]) -> Option<(i64, i64)> {
    values.iter().flatten().fold(None, |acc, &v| match acc {
        None => Some((v, v)),
        Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
    })
}

/// Min and max over non-null, non-NaN values
fn float_bounds(values: &[Option<f64>]) -> Option<(f64, f64)> {
    values
        .iter()
        .flatten()
        .filter(|v| !v.is_nan())
        .fold(None, |acc, &v| match acc {
            None => Some((v, v)),
            Some((lo, hi)) => Some((lo.min(v), hi.max(v))),
        })
}

fn retype_action(from: DType, to: DType) -> DowncastAction {
    if from == to {
        DowncastAction::Unchanged
    } else {
        DowncastAction::Retyped
    }
}

fn keep(column: Column, action: DowncastAction) -> (Column, ColumnOutcome) {
    let outcome = ColumnOutcome {
        name: column.name().to_string(),
        from: column.dtype(),
        to: column.dtype(),
        action,
    };
    (column, outcome)
}

fn retype(column: Column, data: ColumnData, action: DowncastAction) -> (Column, ColumnOutcome) {
    let from = column.dtype();
    let column = if data.dtype() == from { column } else { column.with_data(data) };

    if action == DowncastAction::Retyped {
        debug!(column = column.name(), from = %from, to = %column.dtype(), "downcast column");
    }

    let outcome = ColumnOutcome {
        name: column.name().to_string(),
        from,
        to: column.dtype(),
        action,
    };
    (column, outcome)
}

fn invalid_type(column: &Column) -> TabularError {
    TabularError::InvalidColumnType {
        column: column.name().to_string(),
        dtype: column.dtype().to_string(),
    }
}

fn with_column(err: TabularError, name: &str) -> TabularError {
    match err {
        TabularError::RangeOverflow { min, max, widest, .. } => TabularError::RangeOverflow {
            column: name.to_string(),
            min,
            max,
            widest,
        },
        TabularError::InvalidColumnType { dtype, .. } => TabularError::InvalidColumnType {
            column: name.to_string(),
            dtype,
        },
        other => other,
    }
}

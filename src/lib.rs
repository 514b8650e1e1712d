//! Kolosal Tabular - memory-lean table preprocessing helpers
//!
//! This crate provides:
//! - [`table`] - Typed, nullable in-memory tables with polars interop
//! - [`preprocessing`] - Numeric downcasting and dtype-preserving merges
//! - [`utils`] - Byte size formatting and process memory readings

// Core error handling
pub mod error;

pub mod table;
pub mod preprocessing;
pub mod utils;

pub use error::{TabularError, Result};

/// Re-export commonly used types
pub mod prelude {
    pub use crate::error::{TabularError, Result};
    pub use crate::table::{BoundPolicy, Column, ColumnData, DType, NumericKind, Table, TypeDescriptor};
    pub use crate::preprocessing::{
        downcast, merge_preserving_types, ColumnOutcome, DowncastAction, DowncastConfig,
        DowncastReport, Downcaster, NonFinitePolicy, OverflowPolicy,
    };
    pub use crate::utils::{format_bytes, format_bytes_with_suffix, process_memory_gb};
}

//! Data preprocessing module
//!
//! Provides memory-oriented table preprocessing:
//! - Numeric downcasting to the narrowest fitting type
//! - Left-join merges that preserve the primary table's dtypes

mod config;
pub mod downcast;
pub mod merge;

pub use config::{DowncastConfig, NonFinitePolicy, OverflowPolicy};
pub use downcast::{downcast, ColumnOutcome, DowncastAction, DowncastReport, Downcaster};
pub use merge::merge_preserving_types;

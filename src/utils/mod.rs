//! Utility functions

pub mod format;
pub mod memory;

pub use format::{format_bytes, format_bytes_with_suffix};
pub use memory::{process_memory_bytes, process_memory_gb};

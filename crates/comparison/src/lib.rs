//! Comparison of two algorithms' result pages.
//!
//! This crate provides:
//! - `ComparisonEngine` for merging two pages keyed by movie id
//! - `ComparisonRow`, one ranked row with normalized bar widths
//! - `Comparison`, the ranked rows plus overlap statistics
//!
//! Everything here is pure: no I/O, no clock, no shared state. Calling
//! `compare` twice on the same pages yields the same rows in the same order.
//!
//! ## Example Usage
//! ```ignore
//! use comparison::ComparisonEngine;
//!
//! let result = ComparisonEngine::new().compare(&page_a, &page_b);
//! println!("overlap: {}/{} ({:.1}%)",
//!     result.intersection_count, result.union_count, result.jaccard_percent);
//! ```

pub mod engine;

// Re-export main types
pub use engine::{compare, Comparison, ComparisonEngine, ComparisonRow, DEFAULT_TOP_N};

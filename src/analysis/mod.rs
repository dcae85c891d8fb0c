//! Analysis modules.
//!
//! Read-only computations over report records.

pub mod aggregator;

pub use aggregator::*;

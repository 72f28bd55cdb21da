//! Command implementations.

pub mod diff;
pub mod report;

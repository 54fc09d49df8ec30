//! Functional units used by the Execute and Memory stages.

/// Integer arithmetic logic unit.
pub mod alu;

/// Address generation and checking for loads and stores.
pub mod lsu;

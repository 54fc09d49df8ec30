//! Simulation harness.
//!
//! Program loading and the sequential reference interpreter used to
//! verify pipelined runs.

/// Sequential reference interpreter.
pub mod golden;

/// Program file loading.
pub mod loader;

pub use golden::{compare, Mismatch, Reference};
pub use loader::load_program;

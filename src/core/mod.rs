//! Processor core.
//!
//! The pipeline engine ([`Cpu`]), main memory, the pipeline itself, and
//! the functional units the stages use.

/// Pipeline engine.
pub mod cpu;

/// Main memory.
pub mod memory;

/// Five-stage pipeline: latches, hazards, control signals, stages.
pub mod pipeline;

/// ALU and load/store address unit.
pub mod units;

pub use cpu::{Cpu, PIPELINE_DEPTH};
pub use memory::MainMemory;

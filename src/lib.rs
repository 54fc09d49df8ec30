//! Cycle-Accurate 5-Stage Pipeline Simulator Library.
//!
//! This crate simulates a small in-order pipeline (Fetch, Decode, Execute,
//! Memory, Writeback) running a six-instruction assembly language. It
//! models read-after-write data hazards, operand forwarding from the
//! Memory and Writeback latches, load-use stalls, and the flush that
//! follows an unconditional jump.
//!
//! # Architecture
//!
//! * **Core**: Five latches advanced back to front each cycle, a FIFO
//!   hazard queue of in-flight destinations, and one stall flag.
//! * **Memory**: A read-only code region followed by sparse word-addressed
//!   data memory.
//! * **Verification**: A sequential reference interpreter that the
//!   pipelined run must agree with.
//!
//! # Modules
//!
//! * `common`: Registers, addresses, and error types.
//! * `config`: Configuration loading and parsing.
//! * `core`: Pipeline engine, memory, and functional units.
//! * `isa`: Instruction model and assembly parser.
//! * `sim`: Program loading and the reference interpreter.
//! * `stats`: Simulation statistics.

/// Shared types, constants, error handling, and register definitions.
///
/// Provides the register identifier and register file, word addresses,
/// and the error types returned by the parser and the engine.
pub mod common;

/// Configuration system for memory layout, register seed, and run limits.
///
/// Loads and parses TOML configuration files. Every field has a default,
/// and the defaults reproduce the demo setup.
pub mod config;

/// CPU core implementation including pipeline stages and execution units.
///
/// Implements the 5-stage pipeline, its latches and hazard tracking, and
/// the cycle-by-cycle engine that drives them.
pub mod core;

/// Instruction set definitions and the assembly parser.
pub mod isa;

/// Simulation harness: program loader and sequential reference model.
pub mod sim;

/// Simulation statistics collection and reporting.
///
/// Tracks cycles, fetched and retired instructions, stalls, flushes, and
/// forwarded operands.
pub mod stats;

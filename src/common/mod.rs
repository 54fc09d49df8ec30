//! Common types shared across the simulator.
//!
//! Register identifiers and the register file, word addresses, memory
//! access classification, and the error types reported by the parser and
//! the pipeline engine.

/// Word addresses and alignment helpers.
pub mod addr;

/// Memory access type definitions.
pub mod data;

/// Error types for parsing and simulation.
pub mod error;

/// Register identifiers and the register file.
pub mod reg;

pub use addr::{Address, WORD_SIZE};
pub use data::AccessType;
pub use error::{LoadError, ParseError, ParseErrorKind, SimError};
pub use reg::{Reg, RegisterFile, NUM_REGS};

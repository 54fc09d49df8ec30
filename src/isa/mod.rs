//! Instruction set definitions.
//!
//! The simulated machine understands six mnemonics: `add`, `sub`, `mult`,
//! `lw`, `sw` and `j`. This module holds the decoded instruction record
//! that travels down the pipeline and the text parser that produces it.

/// Decoded instruction record and its runtime operand slots.
pub mod instruction;

/// Program text parser.
pub mod parser;

pub use instruction::{Instruction, Kind, Operand, Slot};
pub use parser::{parse_line, parse_program};

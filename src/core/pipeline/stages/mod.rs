//! Pipeline stage implementations.
//!
//! Contains the five stages of the instruction pipeline:
//! - Fetch: Reads the next instruction from the code region
//! - Decode: Reads source registers and resolves jumps
//! - Execute: Resolves data hazards and runs the ALU
//! - Memory: Handles load/store operations
//! - Writeback: Commits results to the register file
//!
//! Each stage reads the instruction in its own latch, computes a new
//! instruction value, and stores that value back into the latch.

/// Instruction decode stage implementation.
pub mod decode;

/// Instruction execute stage implementation.
pub mod execute;

/// Instruction fetch stage implementation.
pub mod fetch;

/// Memory access stage implementation.
pub mod memory;

/// Writeback stage implementation.
pub mod writeback;

pub use decode::decode_stage;
pub use execute::execute_stage;
pub use fetch::fetch_stage;
pub use memory::mem_stage;
pub use writeback::wb_stage;

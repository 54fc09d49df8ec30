//! Arithmetic Logic Unit (ALU).
//!
//! This module implements the integer ALU used in the Execute stage. The
//! operation is selected from a closed [`AluOp`] table; arithmetic wraps on
//! overflow.

use crate::core::pipeline::signals::AluOp;

/// Arithmetic Logic Unit (ALU) for integer operations.
#[derive(Debug)]
pub struct Alu;

impl Alu {
    /// Executes an integer ALU operation on operands `a` and `b`.
    ///
    /// # Arguments
    ///
    /// * `op` - The ALU operation to perform
    /// * `a` - First operand (`rv1`)
    /// * `b` - Second operand (`rv2`)
    ///
    /// # Returns
    ///
    /// The 64-bit two's complement result.
    pub fn execute(op: AluOp, a: i64, b: i64) -> i64 {
        match op {
            AluOp::Add => a.wrapping_add(b),
            AluOp::Sub => a.wrapping_sub(b),
            AluOp::Mult => a.wrapping_mul(b),
        }
    }
}

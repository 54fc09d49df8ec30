//! Writeback (WB) Stage.

use log::trace;

use crate::common::SimError;
use crate::core::Cpu;
use crate::isa::{Kind, Slot};

/// Commits the instruction in the Writeback latch.
///
/// Hazard-queue retirement is done by the engine after all stages have
/// run, not here.
///
/// # Errors
///
/// Fails if a register-writing instruction arrives without a result.
pub fn wb_stage(cpu: &mut Cpu) -> Result<(), SimError> {
    let wb = cpu.latches.writeback;
    if wb.is_empty() {
        return Ok(());
    }

    cpu.stats.instructions_retired += 1;
    match wb.kind() {
        Kind::Arithmetic { .. } => cpu.stats.inst_alu += 1,
        Kind::Load { .. } => cpu.stats.inst_load += 1,
        Kind::Store { .. } => cpu.stats.inst_store += 1,
        Kind::Jump { .. } => cpu.stats.inst_jump += 1,
        Kind::Empty => {}
    }

    if let Some(dest) = wb.dest() {
        let val = wb.require(Slot::Result, "WB")?;
        trace!("WB  pc={:#x} {dest} <= {val}", wb.pc());
        cpu.regs.write(dest, val);
    }
    Ok(())
}

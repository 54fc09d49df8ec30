//! Memory Access (MEM) Stage.

use log::trace;

use crate::common::SimError;
use crate::core::Cpu;
use crate::isa::Slot;

const STAGE: &str = "MEM";

/// Performs the data access of the instruction in the Memory latch.
///
/// Stores write `rv1` to the effective address in `rv2`; loads read the
/// effective address in `rv1` into `result`.
///
/// # Errors
///
/// Propagates address faults from main memory.
pub fn mem_stage(cpu: &mut Cpu) -> Result<(), SimError> {
    let inst = cpu.latches.memory;
    let ctrl = inst.ctrl();

    if ctrl.mem_write {
        let value = inst.require(Slot::Rv1, STAGE)?;
        let addr = inst.require(Slot::Rv2, STAGE)?;
        trace!("MEM pc={:#x} STORE addr={addr:#x} data={value}", inst.pc());
        cpu.memory.store(addr, value)?;
    } else if ctrl.mem_read {
        let addr = inst.require(Slot::Rv1, STAGE)?;
        let value = cpu.memory.load(addr)?;
        trace!("MEM pc={:#x} LOAD addr={addr:#x} data={value}", inst.pc());
        cpu.latches.memory = inst.with_slot(Slot::Result, value);
    }
    Ok(())
}

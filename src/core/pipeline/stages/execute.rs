//! Execute (EX) Stage.
//!
//! This module implements the execution stage of the pipeline. It is responsible for:
//! - Detecting read-after-write hazards against the hazard queue.
//! - Substituting forwarded values for at-risk operands, or requesting a stall.
//! - Registering the instruction's destination as in flight.
//! - Running the ALU and generating load/store effective addresses.

use log::{debug, trace};

use crate::common::SimError;
use crate::core::pipeline::hazards::Forward;
use crate::core::units::alu::Alu;
use crate::core::units::lsu::Lsu;
use crate::core::Cpu;
use crate::isa::{Instruction, Kind, Slot};

const STAGE: &str = "EX";

/// Runs the Execute stage on the instruction in the Execute latch.
///
/// # Logic Flow
/// 1. **Hazards**: Every source register pending in the hazard queue is
///    looked up in the forwarding network. Values found replace the
///    operand; any operand without a ready value raises a stall.
/// 2. **Stall**: The instruction stays in the latch, keeping whatever was
///    forwarded, and nothing else happens this cycle.
/// 3. **Reserve**: The destination register joins the hazard queue.
/// 4. **Compute**: ALU result for arithmetic, effective address for
///    loads (into `rv1`) and stores (into `rv2`).
///
/// # Errors
///
/// Fails on a hazard no forwarding source can satisfy, or when an operand
/// slot was never filled by Decode.
pub fn execute_stage(cpu: &mut Cpu) -> Result<(), SimError> {
    let mut inst = cpu.latches.execute;
    if inst.is_empty() || !inst.ctrl().alu {
        return Ok(());
    }

    let mut stalled = false;
    for (slot, reg) in [Slot::Rv1, Slot::Rv2].into_iter().zip(inst.source_regs()) {
        let Some(reg) = reg else { continue };
        if !cpu.hazards.contains(reg) {
            continue;
        }
        match cpu.forward(reg) {
            Forward::Value { value, source } => {
                trace!("EX  pc={:#x} forward {reg} <- {source} ({value})", inst.pc());
                cpu.stats.forwards += 1;
                inst = inst.with_slot(slot, value);
            }
            Forward::NotReady { source } => {
                debug!("EX  pc={:#x} {reg} not ready in {source}", inst.pc());
                stalled = true;
            }
            Forward::NoSource => return Err(SimError::UnresolvedHazard(reg)),
        }
    }

    if stalled {
        debug!("stall: {inst} held in EX");
        cpu.stall = true;
        cpu.stats.stalls_data += 1;
        cpu.latches.execute = inst;
        return Ok(());
    }

    if let Some(dest) = inst.dest() {
        cpu.hazards.reserve(dest);
    }

    let inst = compute(inst)?;
    trace!("EX  pc={:#x} {inst}", inst.pc());
    cpu.latches.execute = inst;
    Ok(())
}

fn compute(inst: Instruction) -> Result<Instruction, SimError> {
    let next = match *inst.kind() {
        Kind::Arithmetic { op, .. } => {
            let a = inst.require(Slot::Rv1, STAGE)?;
            let b = inst.require(Slot::Rv2, STAGE)?;
            inst.with_slot(Slot::Result, Alu::execute(op, a, b))
        }
        Kind::Load { offset, .. } => {
            let base = inst.require(Slot::Rv1, STAGE)?;
            inst.with_slot(Slot::Rv1, Lsu::effective_address(base, offset))
        }
        Kind::Store { offset, .. } => {
            let base = inst.require(Slot::Rv2, STAGE)?;
            inst.with_slot(Slot::Rv2, Lsu::effective_address(base, offset))
        }
        Kind::Jump { .. } | Kind::Empty => inst,
    };
    Ok(next)
}

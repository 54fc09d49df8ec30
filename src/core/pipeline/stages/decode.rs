//! Instruction Decode (ID) Stage.
//!
//! Reads source operands from the register file and resolves jumps. Jumps
//! are taken here unconditionally: the program counter is redirected and
//! the one instruction already fetched behind the jump is flushed.

use log::{debug, trace};

use crate::core::Cpu;
use crate::isa::{Instruction, Kind, Operand};

/// Runs the Decode stage on the instruction in the Decode latch.
pub fn decode_stage(cpu: &mut Cpu) {
    let inst = cpu.latches.decode;
    let ctrl = inst.ctrl();

    let inst = if ctrl.reg_read {
        read_operands(cpu, inst)
    } else {
        inst
    };

    if let Kind::Jump { target } = *inst.kind() {
        trace!("ID  pc={:#x} jump -> {target:#x}", inst.pc());
        cpu.pc = target;
        let flushed = std::mem::take(&mut cpu.latches.fetch);
        if !flushed.is_empty() && !cpu.replay {
            debug!("flush {flushed} at {:#x}", flushed.pc());
            cpu.stats.flushes_control += 1;
        }
    }

    cpu.latches.decode = inst;
}

/// Fills `rv1`/`rv2` from the register file. An immediate second operand
/// is taken from the instruction itself; memory offsets are not operands
/// and are applied in Execute.
fn read_operands(cpu: &Cpu, inst: Instruction) -> Instruction {
    let regs = &cpu.regs;
    let (rv1, rv2) = match *inst.kind() {
        Kind::Arithmetic { src1, src2, .. } => {
            let b = match src2 {
                Operand::Reg(r) => regs.read(r),
                Operand::Imm(v) => v,
            };
            (Some(regs.read(src1)), Some(b))
        }
        Kind::Load { base, .. } => (Some(regs.read(base)), None),
        Kind::Store { src, base, .. } => (Some(regs.read(src)), Some(regs.read(base))),
        Kind::Jump { .. } | Kind::Empty => (None, None),
    };

    trace!("ID  pc={:#x} {inst} rv1={rv1:?} rv2={rv2:?}", inst.pc());
    inst.with_operands(rv1, rv2)
}

//! Instruction Fetch (IF) Stage.

use log::trace;

use crate::common::WORD_SIZE;
use crate::core::Cpu;
use crate::isa::Instruction;

/// Fetches the instruction at the program counter into the Fetch latch.
///
/// Outside the loaded program the stage produces a bubble. The program
/// counter advances by one word every cycle regardless, which keeps the
/// one-word roll-back applied on a stall exact.
pub fn fetch_stage(cpu: &mut Cpu) {
    let pc = cpu.pc;
    let inst = match cpu.memory.fetch(pc) {
        Some(inst) => {
            cpu.stats.instructions_fetched += 1;
            inst.at(pc)
        }
        None => Instruction::empty(),
    };

    if !inst.is_empty() {
        trace!("IF  pc={pc:#x} {inst}");
    }

    cpu.pc = pc.wrapping_add(WORD_SIZE);
    cpu.latches.fetch = inst;
}

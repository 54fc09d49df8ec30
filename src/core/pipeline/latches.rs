//! Pipeline latches.
//!
//! Five slots, one per stage, each holding the instruction that stage
//! produced (or is retrying) this cycle. Latches advance back to front so
//! that every stage reads last cycle's value before it is replaced.

use std::fmt;

use crate::isa::Instruction;

/// Identifies a pipeline stage (and the latch holding its output).
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Stage {
    /// Instruction fetch.
    Fetch,
    /// Decode and register read.
    Decode,
    /// Hazard resolution and ALU.
    Execute,
    /// Data memory access.
    Memory,
    /// Register writeback.
    Writeback,
}

impl Stage {
    /// Short stage label used in traces.
    pub fn label(self) -> &'static str {
        match self {
            Self::Fetch => "IF",
            Self::Decode => "ID",
            Self::Execute => "EX",
            Self::Memory => "MEM",
            Self::Writeback => "WB",
        }
    }
}

impl fmt::Display for Stage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// The five pipeline latches L0..L4.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct Latches {
    /// L0: output of Fetch.
    pub fetch: Instruction,
    /// L1: output of Decode.
    pub decode: Instruction,
    /// L2: output of Execute.
    pub execute: Instruction,
    /// L3: output of Memory.
    pub memory: Instruction,
    /// L4: input of Writeback.
    pub writeback: Instruction,
}

impl Latches {
    /// Shifts every instruction one stage forward.
    ///
    /// Updates run from Writeback back to Fetch. When `stall` is set the
    /// Memory latch receives a bubble and Execute, Decode and Fetch keep
    /// their instructions so they are retried next cycle. The Fetch latch
    /// is left for the Fetch stage to refill.
    pub fn advance(&mut self, stall: bool) {
        self.writeback = self.memory;
        if stall {
            self.memory = Instruction::empty();
        } else {
            self.memory = self.execute;
            self.execute = self.decode;
            self.decode = self.fetch;
            self.fetch = Instruction::empty();
        }
    }

    /// Returns `true` when every latch holds a bubble.
    pub fn is_drained(&self) -> bool {
        self.iter().all(|(_, inst)| inst.is_empty())
    }

    /// Forwarding candidates for Execute, nearest producer first.
    pub fn forwarding_sources(&self) -> [(Stage, &Instruction); 2] {
        [
            (Stage::Memory, &self.memory),
            (Stage::Writeback, &self.writeback),
        ]
    }

    /// All latches in pipeline order.
    pub fn iter(&self) -> impl Iterator<Item = (Stage, &Instruction)> {
        [
            (Stage::Fetch, &self.fetch),
            (Stage::Decode, &self.decode),
            (Stage::Execute, &self.execute),
            (Stage::Memory, &self.memory),
            (Stage::Writeback, &self.writeback),
        ]
        .into_iter()
    }
}

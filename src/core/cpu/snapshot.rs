//! Serializable view of the simulator state.

use std::collections::BTreeMap;

use serde::Serialize;

use super::Cpu;
use crate::common::{Address, RegisterFile};
use crate::stats::SimStats;

/// Borrowed snapshot of registers, data memory, PC and statistics.
#[derive(Debug, Serialize)]
pub struct Snapshot<'a> {
    /// Program counter.
    pub pc: Address,
    /// Cycles simulated.
    pub cycles: u64,
    /// Whether the pipeline has drained.
    pub halted: bool,
    /// Register values by name.
    pub registers: &'a RegisterFile,
    /// Data words written so far, by address.
    pub memory: &'a BTreeMap<Address, i64>,
    /// Statistics.
    pub stats: &'a SimStats,
}

impl<'a> Snapshot<'a> {
    pub(super) fn of(cpu: &'a Cpu) -> Self {
        Self {
            pc: cpu.pc,
            cycles: cpu.stats.cycles,
            halted: cpu.halted,
            registers: &cpu.regs,
            memory: cpu.memory.data(),
            stats: &cpu.stats,
        }
    }
}

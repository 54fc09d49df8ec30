//! Pipeline engine.
//!
//! [`Cpu`] owns the architectural state (register file, main memory,
//! program counter) and the pipeline state (five latches, hazard queue,
//! stall flag) and advances all of it one clock cycle per [`Cpu::step`].

mod snapshot;

pub use snapshot::Snapshot;

use log::{debug, info, log_enabled, Level};

use crate::common::{Address, Reg, RegisterFile, SimError, WORD_SIZE};
use crate::config::{self, Config};
use crate::core::memory::MainMemory;
use crate::core::pipeline::hazards::{self, Forward, HazardQueue};
use crate::core::pipeline::latches::Latches;
use crate::core::pipeline::stages;
use crate::isa::Instruction;
use crate::stats::SimStats;

/// Number of pipeline stages.
pub const PIPELINE_DEPTH: u64 = 5;

/// The simulated processor.
#[derive(Debug)]
pub struct Cpu {
    /// Register file, written only by Writeback.
    pub regs: RegisterFile,
    /// Code region and data memory, data written only by Memory.
    pub memory: MainMemory,
    /// Address of the next instruction to fetch.
    pub pc: Address,
    /// Pipeline latches L0..L4.
    pub latches: Latches,
    /// Destinations of in-flight register writes.
    pub hazards: HazardQueue,
    /// Raised by Execute when an operand is not yet available; consumed
    /// at the start of the next cycle.
    pub stall: bool,
    /// True during a cycle that replays the held Fetch, Decode and Execute
    /// latches after a stall.
    pub replay: bool,
    /// Set once every latch holds a bubble.
    pub halted: bool,
    /// Statistics.
    pub stats: SimStats,
    max_cycles: Option<u64>,
}

impl Cpu {
    /// Loads `program` with the demo configuration.
    ///
    /// # Errors
    ///
    /// Fails if the program does not fit in memory.
    pub fn load(program: &[Instruction]) -> Result<Self, SimError> {
        let memory = MainMemory::new(config::DEFAULT_CODE_BASE, program)?;
        Ok(Self::build(memory, config::demo_registers(), None))
    }

    /// Loads `program` with an explicit configuration.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for an invalid code base or register
    /// seed, or a program that does not fit in memory.
    pub fn new(program: &[Instruction], config: &Config) -> Result<Self, SimError> {
        let memory = MainMemory::new(config.memory.code_base_val()?, program)?;
        let regs = config.registers.register_file()?;
        Ok(Self::build(memory, regs, config.general.max_cycles))
    }

    fn build(memory: MainMemory, regs: RegisterFile, max_cycles: Option<u64>) -> Self {
        info!(
            "loaded {} instructions at {:#x}",
            memory.program().len(),
            memory.code_base()
        );
        Self {
            regs,
            pc: memory.code_base(),
            memory,
            latches: Latches::default(),
            hazards: HazardQueue::new(),
            stall: false,
            replay: false,
            halted: false,
            stats: SimStats::default(),
            max_cycles,
        }
    }

    /// Overrides the cycle limit applied by [`Cpu::run`].
    pub fn set_max_cycles(&mut self, limit: Option<u64>) {
        self.max_cycles = limit;
    }

    /// Advances the pipeline by one clock cycle.
    ///
    /// # Behavior
    ///
    /// 1. **Stall**: Consumes the stall flag raised by last cycle's Execute.
    /// 2. **Advance**: Shifts latches back to front. On a stall the Memory
    ///    latch gets a bubble, Execute/Decode/Fetch hold, and the PC rolls
    ///    back one word so Fetch re-reads the instruction it already holds.
    /// 3. **Stages**: Writeback commits first, so Decode in the same cycle
    ///    reads the committed value. Fetch, Decode, Execute and Memory
    ///    follow in pipeline order.
    /// 4. **Retire**: A register-writing instruction in Writeback removes
    ///    the oldest hazard-queue entry.
    /// 5. **Drain**: The CPU halts once every latch holds a bubble.
    ///
    /// # Errors
    ///
    /// Returns the first fatal [`SimError`] raised by a stage or by
    /// retirement. The CPU state is then unspecified.
    pub fn step(&mut self) -> Result<(), SimError> {
        self.stats.cycles += 1;

        let stall = std::mem::take(&mut self.stall);
        self.replay = stall;
        self.latches.advance(stall);
        if stall {
            debug!("cycle {}: bubble into MEM", self.stats.cycles);
            self.pc = self.pc.wrapping_sub(WORD_SIZE);
        }

        stages::wb_stage(self)?;
        stages::fetch_stage(self);
        stages::decode_stage(self);
        stages::execute_stage(self)?;
        stages::mem_stage(self)?;

        if let Some(dest) = self.latches.writeback.dest() {
            self.hazards.retire(dest)?;
            debug!("retire {dest}");
        }

        self.print_pipeline_diagram();
        self.halted = self.latches.is_drained();
        Ok(())
    }

    /// Steps until the pipeline drains.
    ///
    /// # Errors
    ///
    /// Propagates errors from [`Cpu::step`], and returns
    /// [`SimError::CycleLimit`] if a cycle limit is set and reached first.
    pub fn run(&mut self) -> Result<(), SimError> {
        while !self.halted {
            if let Some(limit) = self.max_cycles {
                if self.stats.cycles >= limit {
                    return Err(SimError::CycleLimit(limit));
                }
            }
            self.step()?;
        }
        info!(
            "drained after {} cycles ({} retired, {} stalls)",
            self.stats.cycles, self.stats.instructions_retired, self.stats.stalls_data
        );
        Ok(())
    }

    /// Looks up an in-flight value of `reg` in the Memory latch, then the
    /// Writeback latch.
    pub fn forward(&self, reg: Reg) -> Forward {
        hazards::forward(&self.latches.forwarding_sources(), reg)
    }

    /// The register file.
    pub fn registers(&self) -> &RegisterFile {
        &self.regs
    }

    /// Main memory.
    pub fn memory(&self) -> &MainMemory {
        &self.memory
    }

    /// Cycles simulated so far.
    pub fn cycles(&self) -> u64 {
        self.stats.cycles
    }

    /// Returns `true` once the pipeline has drained.
    pub fn is_halted(&self) -> bool {
        self.halted
    }

    /// Read-only view of the architectural state.
    pub fn snapshot(&self) -> Snapshot<'_> {
        Snapshot::of(self)
    }

    /// Prints the PC and register file to stdout.
    pub fn dump_state(&self) {
        println!("PC = {:#x}", self.pc);
        self.regs.dump();
    }

    /// Logs the latch contents at debug level.
    pub fn print_pipeline_diagram(&self) {
        if !log_enabled!(Level::Debug) {
            return;
        }
        let cells: Vec<String> = self
            .latches
            .iter()
            .map(|(stage, inst)| format!("{stage}:{inst}"))
            .collect();
        debug!("cycle {:>4} | {}", self.stats.cycles, cells.join(" -> "));
    }
}

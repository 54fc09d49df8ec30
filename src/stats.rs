//! Simulation statistics collection and reporting.
//!
//! Tracks cycle and instruction counts, stall and flush events, forwarded
//! operands, and the retired instruction mix.

use std::time::Instant;

use serde::Serialize;

/// Simulation statistics.
#[derive(Clone, Debug, Serialize)]
pub struct SimStats {
    #[serde(skip)]
    start_time: Instant,
    /// Clock cycles simulated.
    pub cycles: u64,
    /// Instructions read from the code region, including re-fetches
    /// during stalls.
    pub instructions_fetched: u64,
    /// Non-bubble instructions that reached Writeback.
    pub instructions_retired: u64,

    /// Retired arithmetic instructions.
    pub inst_alu: u64,
    /// Retired loads.
    pub inst_load: u64,
    /// Retired stores.
    pub inst_store: u64,
    /// Retired jumps.
    pub inst_jump: u64,

    /// Cycles lost to data-hazard stalls.
    pub stalls_data: u64,
    /// Instructions discarded after a jump.
    pub flushes_control: u64,
    /// Operands supplied by the forwarding network.
    pub forwards: u64,
}

impl Default for SimStats {
    fn default() -> Self {
        Self {
            start_time: Instant::now(),
            cycles: 0,
            instructions_fetched: 0,
            instructions_retired: 0,
            inst_alu: 0,
            inst_load: 0,
            inst_store: 0,
            inst_jump: 0,
            stalls_data: 0,
            flushes_control: 0,
            forwards: 0,
        }
    }
}

impl SimStats {
    /// Cycles per retired instruction, or 0 before anything retires.
    pub fn cpi(&self) -> f64 {
        if self.instructions_retired == 0 {
            0.0
        } else {
            self.cycles as f64 / self.instructions_retired as f64
        }
    }

    /// Prints a formatted summary of the statistics.
    pub fn print(&self) {
        let seconds = self.start_time.elapsed().as_secs_f64();
        let cyc = self.cycles.max(1) as f64;
        let instr = self.instructions_retired.max(1) as f64;
        let pct = |n: u64, of: f64| (n as f64 / of) * 100.0;

        println!("\n==========================================================");
        println!("PIPELINE SIMULATION STATISTICS");
        println!("==========================================================");
        println!("host_seconds             {seconds:.4} s");
        println!("sim_cycles               {}", self.cycles);
        println!("sim_insts_fetched        {}", self.instructions_fetched);
        println!("sim_insts                {}", self.instructions_retired);
        println!("sim_ipc                  {:.4}", self.instructions_retired as f64 / cyc);
        println!("sim_cpi                  {:.4}", self.cpi());
        println!("----------------------------------------------------------");
        println!("HAZARDS");
        println!(
            "  stalls.data            {} ({:.2}%)",
            self.stalls_data,
            pct(self.stalls_data, cyc)
        );
        println!("  flushes.control        {}", self.flushes_control);
        println!("  forwards               {}", self.forwards);
        println!("----------------------------------------------------------");
        println!("INSTRUCTION MIX");
        println!(
            "  op.alu                 {} ({:.2}%)",
            self.inst_alu,
            pct(self.inst_alu, instr)
        );
        println!(
            "  op.load                {} ({:.2}%)",
            self.inst_load,
            pct(self.inst_load, instr)
        );
        println!(
            "  op.store               {} ({:.2}%)",
            self.inst_store,
            pct(self.inst_store, instr)
        );
        println!(
            "  op.jump                {} ({:.2}%)",
            self.inst_jump,
            pct(self.inst_jump, instr)
        );
        println!("==========================================================");
    }
}

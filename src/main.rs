//! Pipeline Simulator CLI.
//!
//! Loads an assembly program, runs it through the 5-stage pipeline until
//! the pipeline drains, and reports the architectural state before and
//! after along with statistics.

use std::fs;
use std::process;

use anyhow::{bail, Context, Result};
use clap::Parser;
use log::warn;

use pipeline_sim::config::Config;
use pipeline_sim::core::Cpu;
use pipeline_sim::sim::{self, Reference};

/// Fallback bound on simulated cycles when neither the CLI nor the
/// configuration sets one.
const DEFAULT_MAX_CYCLES: u64 = 1_000_000;

/// Command-line arguments for the pipeline simulator.
#[derive(Parser, Debug)]
#[command(author, version, about = "Cycle-accurate 5-stage pipeline simulator")]
struct Args {
    /// Assembly program to run.
    program: String,

    /// TOML configuration file; defaults apply when omitted.
    #[arg(short, long)]
    config: Option<String>,

    /// Log every stage of every cycle.
    #[arg(short, long)]
    trace: bool,

    /// Log level (error, warn, info, debug, trace).
    #[arg(long)]
    log_level: Option<String>,

    /// Stop with an error after this many cycles.
    #[arg(long)]
    max_cycles: Option<u64>,

    /// Print the final state as JSON instead of the text report.
    #[arg(long)]
    json: bool,

    /// Check the final state against a sequential run of the same program.
    #[arg(long)]
    verify: bool,
}

/// Main entry point for the pipeline simulator.
///
/// # Behavior
///
/// 1. **Configuration**: Parses arguments, loads the optional TOML file,
///    and starts the logger.
/// 2. **Loader**: Parses the program and echoes its disassembly.
/// 3. **Simulation Loop**: Runs the pipeline until it drains or the cycle
///    limit is hit.
/// 4. **Teardown**: Prints the final state and statistics, and optionally
///    verifies against the reference interpreter.
fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => {
            let text = fs::read_to_string(path)
                .with_context(|| format!("failed to read config '{path}'"))?;
            Config::from_toml(&text).with_context(|| format!("failed to parse config '{path}'"))?
        }
        None => Config::default(),
    };

    let trace = args.trace || config.general.trace || cfg!(feature = "always-trace");
    let level = match (&args.log_level, trace) {
        (Some(level), _) => level.clone(),
        (None, true) => "trace".to_string(),
        (None, false) => "warn".to_string(),
    };
    let _logger = flexi_logger::Logger::try_with_str(&level)?.start()?;

    let program = sim::load_program(&args.program)
        .with_context(|| format!("failed to load program '{}'", args.program))?;

    let mut cpu = Cpu::new(&program, &config)?;
    cpu.set_max_cycles(
        args.max_cycles
            .or(config.general.max_cycles)
            .or(Some(DEFAULT_MAX_CYCLES)),
    );
    let mut reference = args.verify.then(|| Reference::from_cpu(&cpu));

    if !args.json {
        println!("Program");
        println!("--------------------");
        for inst in cpu.memory().program() {
            println!("  {:#06x}:  {}", inst.pc(), inst);
        }
        println!("--------------------");
        println!("Initial state:");
        cpu.dump_state();
    }

    if let Err(e) = cpu.run() {
        eprintln!("\n[!] FATAL: {e}");
        cpu.dump_state();
        cpu.stats.print();
        process::exit(1);
    }

    if args.json {
        println!("{}", serde_json::to_string_pretty(&cpu.snapshot())?);
    } else {
        println!("\nFinal state:");
        cpu.dump_state();
        cpu.stats.print();
    }

    if let Some(reference) = reference.as_mut() {
        reference.run(cpu.stats.instructions_retired.max(1) * 4 + 16)?;
        let mismatches = sim::compare(&cpu, reference);
        if !mismatches.is_empty() {
            for m in &mismatches {
                warn!("{m}");
                eprintln!("  mismatch {m}");
            }
            bail!("pipeline disagrees with reference in {} place(s)", mismatches.len());
        }
        if !args.json {
            println!("[*] Verified against sequential reference");
        }
    }

    Ok(())
}

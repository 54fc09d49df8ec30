//! Sequential reference interpreter.
//!
//! Executes the same program one instruction at a time with no pipeline,
//! using the same ALU, address unit and memory model as the pipelined
//! core. A correct pipeline leaves registers and data memory exactly as
//! this interpreter does.

use std::fmt;

use crate::common::{Address, Reg, RegisterFile, SimError, WORD_SIZE};
use crate::core::memory::MainMemory;
use crate::core::units::alu::Alu;
use crate::core::units::lsu::Lsu;
use crate::core::Cpu;
use crate::isa::{Kind, Operand};

/// Sequential machine state.
#[derive(Clone, Debug)]
pub struct Reference {
    /// Register file.
    pub regs: RegisterFile,
    /// Code and data memory.
    pub memory: MainMemory,
    /// Address of the next instruction.
    pub pc: Address,
    /// Instructions executed.
    pub executed: u64,
}

impl Reference {
    /// Starts from `cpu`'s current architectural state. Call before
    /// running the pipeline.
    pub fn from_cpu(cpu: &Cpu) -> Self {
        Self {
            regs: cpu.regs.clone(),
            memory: cpu.memory.clone(),
            pc: cpu.pc,
            executed: 0,
        }
    }

    /// Executes one instruction. Returns `false` once the PC has left the
    /// program.
    ///
    /// # Errors
    ///
    /// Returns the same address errors the pipelined Memory stage raises.
    pub fn step(&mut self) -> Result<bool, SimError> {
        let Some(inst) = self.memory.fetch(self.pc) else {
            return Ok(false);
        };
        let mut next = self.pc.wrapping_add(WORD_SIZE);

        match *inst.kind() {
            Kind::Arithmetic {
                op,
                dest,
                src1,
                src2,
            } => {
                let b = match src2 {
                    Operand::Reg(r) => self.regs.read(r),
                    Operand::Imm(imm) => imm,
                };
                let val = Alu::execute(op, self.regs.read(src1), b);
                self.regs.write(dest, val);
            }
            Kind::Load { dest, base, offset } => {
                let addr = Lsu::effective_address(self.regs.read(base), offset);
                let val = self.memory.load(addr)?;
                self.regs.write(dest, val);
            }
            Kind::Store { src, base, offset } => {
                let addr = Lsu::effective_address(self.regs.read(base), offset);
                self.memory.store(addr, self.regs.read(src))?;
            }
            Kind::Jump { target } => next = target,
            Kind::Empty => {}
        }

        self.executed += 1;
        self.pc = next;
        Ok(true)
    }

    /// Runs until the PC leaves the program or `limit` instructions have
    /// executed.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::CycleLimit`] if `limit` is reached first.
    pub fn run(&mut self, limit: u64) -> Result<(), SimError> {
        while self.step()? {
            if self.executed >= limit {
                return Err(SimError::CycleLimit(limit));
            }
        }
        Ok(())
    }
}

/// One difference between the pipelined and sequential final states.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Mismatch {
    /// A register holds different values.
    Register {
        /// The register.
        reg: Reg,
        /// Pipelined value.
        pipeline: i64,
        /// Sequential value.
        reference: i64,
    },
    /// A data word holds different values.
    Memory {
        /// Word address.
        addr: Address,
        /// Pipelined value.
        pipeline: i64,
        /// Sequential value.
        reference: i64,
    },
}

impl fmt::Display for Mismatch {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Mismatch::Register {
                reg,
                pipeline,
                reference,
            } => write!(f, "{reg}: pipeline {pipeline}, reference {reference}"),
            Mismatch::Memory {
                addr,
                pipeline,
                reference,
            } => write!(
                f,
                "mem[{addr:#x}]: pipeline {pipeline}, reference {reference}"
            ),
        }
    }
}

/// Lists every register and data word on which `cpu` and `reference`
/// disagree.
pub fn compare(cpu: &Cpu, reference: &Reference) -> Vec<Mismatch> {
    let mut out: Vec<Mismatch> = Reg::all()
        .filter_map(|reg| {
            let (p, r) = (cpu.regs.read(reg), reference.regs.read(reg));
            (p != r).then_some(Mismatch::Register {
                reg,
                pipeline: p,
                reference: r,
            })
        })
        .collect();

    let addrs: std::collections::BTreeSet<Address> = cpu
        .memory
        .data()
        .keys()
        .chain(reference.memory.data().keys())
        .copied()
        .collect();
    for addr in addrs {
        let (p, r) = (cpu.memory.read_word(addr), reference.memory.read_word(addr));
        if p != r {
            out.push(Mismatch::Memory {
                addr,
                pipeline: p,
                reference: r,
            });
        }
    }
    out
}

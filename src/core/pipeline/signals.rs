//! Pipeline control signals and operation types.
//!
//! This module defines the ALU operation table and the micro-op flags that
//! steer an instruction through the stages. Flags are never stored on the
//! instruction: they are derived from its [`Kind`] every time they are
//! asked for, so they can never disagree with the decoded operation.

use serde::Serialize;

use crate::isa::Kind;

/// ALU operation for arithmetic instructions.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
pub enum AluOp {
    /// Integer addition (`add`).
    Add,
    /// Integer subtraction (`sub`).
    Sub,
    /// Integer multiplication (`mult`).
    Mult,
}

impl AluOp {
    /// Assembly mnemonic of the operation.
    pub fn mnemonic(self) -> &'static str {
        match self {
            Self::Add => "add",
            Self::Sub => "sub",
            Self::Mult => "mult",
        }
    }

    /// Looks up an operation by mnemonic.
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        match s {
            "add" => Some(Self::Add),
            "sub" => Some(Self::Sub),
            "mult" => Some(Self::Mult),
            _ => None,
        }
    }
}

/// Micro-op flags for one instruction.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ControlSignals {
    /// Decode reads source registers.
    pub reg_read: bool,
    /// Writeback writes the destination register.
    pub reg_write: bool,
    /// Memory stage performs a load.
    pub mem_read: bool,
    /// Memory stage performs a store.
    pub mem_write: bool,
    /// Execute does work (arithmetic or address generation).
    pub alu: bool,
    /// Decode redirects the program counter.
    pub jump: bool,
}

impl ControlSignals {
    /// Derives the flags implied by an instruction kind.
    pub fn for_kind(kind: &Kind) -> Self {
        match kind {
            Kind::Arithmetic { .. } => Self {
                reg_read: true,
                reg_write: true,
                alu: true,
                ..Self::default()
            },
            Kind::Load { .. } => Self {
                reg_read: true,
                reg_write: true,
                mem_read: true,
                alu: true,
                ..Self::default()
            },
            Kind::Store { .. } => Self {
                reg_read: true,
                mem_write: true,
                alu: true,
                ..Self::default()
            },
            Kind::Jump { .. } => Self {
                jump: true,
                ..Self::default()
            },
            Kind::Empty => Self::default(),
        }
    }
}

//! Decoded instruction record.
//!
//! An [`Instruction`] pairs an immutable decoded operation ([`Kind`]) with
//! three runtime slots filled in as it moves down the pipeline:
//!
//! * `rv1` / `rv2`: resolved source operands, written by Decode and
//!   possibly replaced by forwarded values in Execute. For loads `rv1`
//!   becomes the effective address; for stores `rv2` does.
//! * `result`: the value to write back, produced by Execute (arithmetic)
//!   or Memory (loads).
//!
//! Instructions are plain `Copy` values. Every stage receives its own copy
//! and hands a new value to the next latch, so no two latches ever share
//! one instruction.

use std::fmt;

use crate::common::{Address, Reg, SimError};
use crate::core::pipeline::signals::{AluOp, ControlSignals};

/// Second source operand of an arithmetic instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Operand {
    /// Value read from a register.
    Reg(Reg),
    /// Immediate literal encoded in the instruction.
    Imm(i64),
}

impl Operand {
    /// The register this operand reads, if any.
    pub fn reg(self) -> Option<Reg> {
        match self {
            Self::Reg(r) => Some(r),
            Self::Imm(_) => None,
        }
    }
}

impl fmt::Display for Operand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Reg(r) => write!(f, "{r}"),
            Self::Imm(v) => write!(f, "{v}"),
        }
    }
}

/// Decoded operation, carrying only the operands its kind needs.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum Kind {
    /// `add` / `sub` / `mult dest, src1, src2`.
    Arithmetic {
        /// ALU operation.
        op: AluOp,
        /// Destination register.
        dest: Reg,
        /// First source register.
        src1: Reg,
        /// Second source, register or immediate.
        src2: Operand,
    },
    /// `lw dest, offset(base)`.
    Load {
        /// Destination register.
        dest: Reg,
        /// Base address register.
        base: Reg,
        /// Byte offset added to the base.
        offset: i64,
    },
    /// `sw src, offset(base)`.
    Store {
        /// Register holding the value to store.
        src: Reg,
        /// Base address register.
        base: Reg,
        /// Byte offset added to the base.
        offset: i64,
    },
    /// `j target`, an absolute byte address.
    Jump {
        /// Address of the next instruction to execute.
        target: Address,
    },
    /// Pipeline bubble.
    #[default]
    Empty,
}

/// Names one of the runtime slots of an instruction.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Slot {
    /// First resolved source (`rv1`).
    Rv1,
    /// Second resolved source (`rv2`).
    Rv2,
    /// Computed or loaded result.
    Result,
}

impl Slot {
    fn name(self) -> &'static str {
        match self {
            Self::Rv1 => "rv1",
            Self::Rv2 => "rv2",
            Self::Result => "result",
        }
    }
}

/// An instruction in flight, or a bubble.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct Instruction {
    kind: Kind,
    pc: Address,
    rv1: Option<i64>,
    rv2: Option<i64>,
    result: Option<i64>,
}

impl Instruction {
    /// Creates an instruction with empty runtime slots.
    pub fn new(kind: Kind) -> Self {
        Self {
            kind,
            ..Self::default()
        }
    }

    /// Creates a pipeline bubble.
    pub fn empty() -> Self {
        Self::default()
    }

    /// `add`/`sub`/`mult` with a register second operand.
    pub fn arith(op: AluOp, dest: Reg, src1: Reg, src2: Reg) -> Self {
        Self::new(Kind::Arithmetic {
            op,
            dest,
            src1,
            src2: Operand::Reg(src2),
        })
    }

    /// `add`/`sub`/`mult` with an immediate second operand.
    pub fn arith_imm(op: AluOp, dest: Reg, src1: Reg, imm: i64) -> Self {
        Self::new(Kind::Arithmetic {
            op,
            dest,
            src1,
            src2: Operand::Imm(imm),
        })
    }

    /// `lw dest, offset(base)`.
    pub fn load(dest: Reg, base: Reg, offset: i64) -> Self {
        Self::new(Kind::Load { dest, base, offset })
    }

    /// `sw src, offset(base)`.
    pub fn store(src: Reg, base: Reg, offset: i64) -> Self {
        Self::new(Kind::Store { src, base, offset })
    }

    /// `j target`.
    pub fn jump(target: Address) -> Self {
        Self::new(Kind::Jump { target })
    }

    /// The decoded operation.
    pub fn kind(&self) -> &Kind {
        &self.kind
    }

    /// Address the instruction was fetched from (0 for bubbles and
    /// instructions that have not been fetched).
    pub fn pc(&self) -> Address {
        self.pc
    }

    /// Returns `true` for a bubble. Bubbles are recognised by tag only.
    pub fn is_empty(&self) -> bool {
        matches!(self.kind, Kind::Empty)
    }

    /// Micro-op flags implied by the instruction kind.
    pub fn ctrl(&self) -> ControlSignals {
        ControlSignals::for_kind(&self.kind)
    }

    /// Destination register, for instructions that write one.
    pub fn dest(&self) -> Option<Reg> {
        match self.kind {
            Kind::Arithmetic { dest, .. } | Kind::Load { dest, .. } => Some(dest),
            _ => None,
        }
    }

    /// Registers read into the `rv1` and `rv2` slots, in that order.
    pub fn source_regs(&self) -> [Option<Reg>; 2] {
        match self.kind {
            Kind::Arithmetic { src1, src2, .. } => [Some(src1), src2.reg()],
            Kind::Load { base, .. } => [Some(base), None],
            Kind::Store { src, base, .. } => [Some(src), Some(base)],
            Kind::Jump { .. } | Kind::Empty => [None, None],
        }
    }

    /// Current value of a runtime slot.
    pub fn slot(&self, slot: Slot) -> Option<i64> {
        match slot {
            Slot::Rv1 => self.rv1,
            Slot::Rv2 => self.rv2,
            Slot::Result => self.result,
        }
    }

    /// Reads a slot that an earlier stage must have filled.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::MissingOperand`] if the slot is still unset,
    /// which means the pipeline broke its own ordering contract.
    pub fn require(&self, slot: Slot, stage: &'static str) -> Result<i64, SimError> {
        self.slot(slot).ok_or_else(|| SimError::MissingOperand {
            stage,
            slot: slot.name(),
            inst: self.to_string(),
        })
    }

    /// Copy of this instruction tagged with its fetch address.
    #[must_use]
    pub fn at(self, pc: Address) -> Self {
        Self { pc, ..self }
    }

    /// Copy of this instruction with one slot replaced.
    #[must_use]
    pub fn with_slot(self, slot: Slot, val: i64) -> Self {
        let mut next = self;
        match slot {
            Slot::Rv1 => next.rv1 = Some(val),
            Slot::Rv2 => next.rv2 = Some(val),
            Slot::Result => next.result = Some(val),
        }
        next
    }

    /// Copy of this instruction with both source slots replaced.
    #[must_use]
    pub fn with_operands(self, rv1: Option<i64>, rv2: Option<i64>) -> Self {
        Self { rv1, rv2, ..self }
    }
}

impl From<Kind> for Instruction {
    fn from(kind: Kind) -> Self {
        Self::new(kind)
    }
}

impl fmt::Display for Instruction {
    /// Disassembles the instruction in source syntax.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            Kind::Arithmetic {
                op,
                dest,
                src1,
                src2,
            } => write!(f, "{} {dest}, {src1}, {src2}", op.mnemonic()),
            Kind::Load { dest, base, offset } => write!(f, "lw {dest}, {offset}({base})"),
            Kind::Store { src, base, offset } => write!(f, "sw {src}, {offset}({base})"),
            Kind::Jump { target } => write!(f, "j {target:#x}"),
            Kind::Empty => f.write_str("nop"),
        }
    }
}

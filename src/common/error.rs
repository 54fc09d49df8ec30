//! Error definitions.
//!
//! Two families of errors exist. [`ParseError`] reports malformed program
//! text and names the offending line. [`SimError`] reports conditions that
//! stop the pipeline engine: bad data addresses, configuration problems,
//! and violations of the engine's own contracts. Data hazards are never
//! errors; they are resolved by forwarding or stalling.

use thiserror::Error;

use super::addr::Address;
use super::data::AccessType;
use super::reg::Reg;

/// Reason a program line failed to parse.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum ParseErrorKind {
    /// The mnemonic is not part of the instruction set.
    #[error("unknown mnemonic '{0}'")]
    UnknownMnemonic(String),

    /// The mnemonic was given the wrong number of operands.
    #[error("'{mnemonic}' expects {expected} operand(s), found {found}")]
    OperandCount {
        /// Mnemonic being parsed.
        mnemonic: String,
        /// Number of operands the mnemonic takes.
        expected: usize,
        /// Number of operands present on the line.
        found: usize,
    },

    /// An operand that should name a register does not.
    #[error("invalid register '{0}'")]
    InvalidRegister(String),

    /// An immediate or offset literal could not be parsed.
    #[error("invalid immediate '{0}'")]
    InvalidImmediate(String),

    /// A memory operand is not of the form `offset(base)`.
    #[error("invalid memory operand '{0}', expected offset(base)")]
    InvalidMemOperand(String),

    /// A jump target is not a word-aligned address.
    #[error("invalid jump target '{0}'")]
    InvalidTarget(String),
}

/// A malformed line in program text.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
#[error("line {line}: {kind} in `{text}`")]
pub struct ParseError {
    /// 1-based line number in the source text.
    pub line: usize,
    /// The offending line, trimmed.
    pub text: String,
    /// What was wrong with it.
    pub kind: ParseErrorKind,
}

/// Fatal simulation errors.
#[derive(Clone, Debug, PartialEq, Eq, Error)]
pub enum SimError {
    /// Effective address is not a multiple of the word size.
    #[error("misaligned {access} at address {addr:#x}")]
    MisalignedAccess {
        /// Kind of access.
        access: AccessType,
        /// The faulting address.
        addr: Address,
    },

    /// Effective address is negative or does not fit the address space.
    #[error("{access} address {value} is outside the address space")]
    AddressOutOfRange {
        /// Kind of access.
        access: AccessType,
        /// The computed effective address.
        value: i64,
    },

    /// A load or store targeted the code region.
    #[error("{access} at {addr:#x} falls inside the code region")]
    CodeRegionAccess {
        /// Kind of access.
        access: AccessType,
        /// The faulting address.
        addr: Address,
    },

    /// An instruction slot was read before any stage wrote it.
    #[error("{stage} stage read unset {slot} of `{inst}`")]
    MissingOperand {
        /// Stage that performed the read.
        stage: &'static str,
        /// Name of the slot.
        slot: &'static str,
        /// Disassembly of the instruction.
        inst: String,
    },

    /// A retiring instruction's destination does not match the oldest
    /// hazard-queue entry.
    #[error("retirement of {reg} out of order (oldest pending: {pending:?})")]
    RetireOrder {
        /// Destination of the retiring instruction.
        reg: Reg,
        /// Oldest pending hazard entry, if any.
        pending: Option<Reg>,
    },

    /// A register is pending in the hazard queue but no forwarding source
    /// writes it.
    #[error("hazard on {0} has no forwarding source")]
    UnresolvedHazard(Reg),

    /// The simulation did not drain within the configured cycle limit.
    #[error("pipeline did not drain within {0} cycles")]
    CycleLimit(u64),

    /// Invalid configuration value.
    #[error("configuration error: {0}")]
    Config(String),
}

/// Failure to load a program file.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The file could not be read.
    #[error("could not read '{path}': {source}")]
    Io {
        /// Path that was opened.
        path: String,
        /// Underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The file contents did not parse.
    #[error(transparent)]
    Parse(#[from] ParseError),
}

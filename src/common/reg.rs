//! General-Purpose Register File.
//!
//! This module implements the register file of the simulated machine: 32
//! integer registers named `r0`..`r31`. Unlike RISC-V, `r0` is an ordinary
//! register and may be written. The register file is mutated only by the
//! Writeback stage.

use std::fmt;
use std::str::FromStr;

use serde::{Serialize, Serializer};

/// Number of general-purpose registers.
pub const NUM_REGS: usize = 32;

/// A register identifier in the range `r0`..`r31`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Reg(u8);

impl Reg {
    /// Creates a register identifier, or `None` if `idx` is out of range.
    pub fn new(idx: usize) -> Option<Self> {
        if idx < NUM_REGS {
            u8::try_from(idx).ok().map(Self)
        } else {
            None
        }
    }

    /// Index of the register in the register file.
    pub fn index(self) -> usize {
        self.0 as usize
    }

    /// Iterates over every register in index order.
    pub fn all() -> impl Iterator<Item = Self> {
        (0..NUM_REGS).filter_map(Self::new)
    }
}

impl fmt::Display for Reg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "r{}", self.0)
    }
}

/// Error returned when a token does not name a register.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InvalidReg(pub String);

impl fmt::Display for InvalidReg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid register name '{}'", self.0)
    }
}

impl std::error::Error for InvalidReg {}

impl FromStr for Reg {
    type Err = InvalidReg;

    /// Accepts `rN` as well as the `$rN` spelling.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let t = s.trim();
        let digits = t
            .strip_prefix('$')
            .unwrap_or(t)
            .strip_prefix(['r', 'R'])
            .ok_or_else(|| InvalidReg(s.to_string()))?;
        if digits.is_empty() || !digits.bytes().all(|b| b.is_ascii_digit()) {
            return Err(InvalidReg(s.to_string()));
        }
        digits
            .parse::<usize>()
            .ok()
            .and_then(Self::new)
            .ok_or_else(|| InvalidReg(s.to_string()))
    }
}

impl Serialize for Reg {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// Register file holding 32 signed integer registers.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct RegisterFile {
    regs: [i64; NUM_REGS],
}

impl RegisterFile {
    /// Creates a register file with every register set to zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Reads a register value.
    pub fn read(&self, reg: Reg) -> i64 {
        self.regs[reg.index()]
    }

    /// Writes a register value.
    pub fn write(&mut self, reg: Reg, val: i64) {
        self.regs[reg.index()] = val;
    }

    /// Iterates over `(register, value)` pairs in index order.
    pub fn iter(&self) -> impl Iterator<Item = (Reg, i64)> + '_ {
        Reg::all().map(move |r| (r, self.read(r)))
    }

    /// Dumps the register file to stdout, four registers per line.
    pub fn dump(&self) {
        for (row, vals) in self.regs.chunks(4).enumerate() {
            let line: Vec<String> = vals
                .iter()
                .enumerate()
                .map(|(i, v)| format!("r{:<2} = {:<12}", row * 4 + i, v))
                .collect();
            println!("{}", line.join(" "));
        }
    }
}

impl Serialize for RegisterFile {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_map(self.iter().map(|(r, v)| (r.to_string(), v)))
    }
}

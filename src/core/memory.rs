//! Main memory.
//!
//! A word-addressed store with two regions: the code region, holding the
//! loaded program starting at a fixed base address, and data memory, used
//! by loads and stores. Data words that were never written read as zero.
//! Only the Memory stage mutates data memory.

use std::collections::BTreeMap;

use crate::common::{AccessType, Address, SimError, WORD_SIZE};
use crate::core::units::lsu::Lsu;
use crate::isa::Instruction;

/// Main memory: code region plus sparse data words.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MainMemory {
    code_base: Address,
    code: Vec<Instruction>,
    data: BTreeMap<Address, i64>,
}

impl MainMemory {
    /// Loads `program` into the code region starting at `code_base`.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the base is misaligned or the
    /// program does not fit in the address space.
    pub fn new(code_base: Address, program: &[Instruction]) -> Result<Self, SimError> {
        if code_base % WORD_SIZE != 0 {
            return Err(SimError::Config(format!(
                "code base {code_base:#x} is not word-aligned"
            )));
        }
        let len = Address::try_from(program.len())
            .ok()
            .and_then(|n| n.checked_mul(WORD_SIZE))
            .and_then(|bytes| code_base.checked_add(bytes));
        if len.is_none() {
            return Err(SimError::Config(format!(
                "program of {} instructions does not fit above {code_base:#x}",
                program.len()
            )));
        }
        Ok(Self {
            code_base,
            code: program
                .iter()
                .zip((code_base..).step_by(WORD_SIZE as usize))
                .map(|(inst, pc)| Instruction::new(*inst.kind()).at(pc))
                .collect(),
            data: BTreeMap::new(),
        })
    }

    /// First address of the code region.
    pub fn code_base(&self) -> Address {
        self.code_base
    }

    /// One past the last address of the code region.
    pub fn code_end(&self) -> Address {
        // Cannot overflow: checked in `new`.
        self.code_base + self.code.len() as Address * WORD_SIZE
    }

    /// The loaded program, in address order.
    pub fn program(&self) -> &[Instruction] {
        &self.code
    }

    /// Returns `true` if `addr` lies inside the code region.
    pub fn in_code_region(&self, addr: Address) -> bool {
        (self.code_base..self.code_end()).contains(&addr)
    }

    /// Reads the instruction at `pc`, or `None` outside the program.
    pub fn fetch(&self, pc: Address) -> Option<Instruction> {
        if !self.in_code_region(pc) || pc % WORD_SIZE != 0 {
            return None;
        }
        let idx = ((pc - self.code_base) / WORD_SIZE) as usize;
        self.code.get(idx).copied()
    }

    /// Loads the data word at effective address `value`.
    ///
    /// # Errors
    ///
    /// Fails on a negative, misaligned, or code-region address.
    pub fn load(&self, value: i64) -> Result<i64, SimError> {
        let addr = self.data_address(value, AccessType::Read)?;
        Ok(self.read_word(addr))
    }

    /// Stores `val` to the data word at effective address `value`.
    ///
    /// # Errors
    ///
    /// Fails on a negative, misaligned, or code-region address.
    pub fn store(&mut self, value: i64, val: i64) -> Result<(), SimError> {
        let addr = self.data_address(value, AccessType::Write)?;
        self.data.insert(addr, val);
        Ok(())
    }

    /// Reads a data word without access checks; unwritten words are zero.
    pub fn read_word(&self, addr: Address) -> i64 {
        self.data.get(&addr).copied().unwrap_or(0)
    }

    /// Every data word written so far, by address.
    pub fn data(&self) -> &BTreeMap<Address, i64> {
        &self.data
    }

    fn data_address(&self, value: i64, access: AccessType) -> Result<Address, SimError> {
        let addr = Lsu::translate(value, access)?;
        if self.in_code_region(addr) {
            return Err(SimError::CodeRegionAccess { access, addr });
        }
        Ok(addr)
    }
}

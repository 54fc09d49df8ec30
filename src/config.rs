//! Simulator configuration.
//!
//! Configuration is read from TOML. Every section and field is optional;
//! missing values fall back to the demo setup: program loaded at `0x1000`,
//! `r1 = 100`, `r3 = 5`, `r5 = 7`, everything else zero.
//!
//! ```toml
//! [general]
//! trace = false
//! max_cycles = 100000
//!
//! [memory]
//! code_base = "0x1000"
//!
//! [registers.initial]
//! r1 = 100
//! r3 = 5
//! ```

use std::collections::BTreeMap;

use serde::Deserialize;

use crate::common::addr::parse_address;
use crate::common::{Address, Reg, RegisterFile, SimError};

/// Default base address of the code region.
pub const DEFAULT_CODE_BASE: Address = 0x1000;

/// Registers preset by the demo configuration as `(index, value)`.
pub const DEMO_SEED: [(usize, i64); 3] = [(1, 100), (3, 5), (5, 7)];

/// Top-level configuration.
#[derive(Debug, Default, Deserialize)]
pub struct Config {
    /// General simulation options.
    #[serde(default)]
    pub general: GeneralConfig,
    /// Memory layout.
    #[serde(default)]
    pub memory: MemoryConfig,
    /// Initial register state.
    #[serde(default)]
    pub registers: RegisterConfig,
}

/// General simulation options.
#[derive(Debug, Default, Deserialize)]
pub struct GeneralConfig {
    /// Emit per-stage trace logging.
    #[serde(default)]
    pub trace: bool,
    /// Abort `run()` after this many cycles.
    #[serde(default)]
    pub max_cycles: Option<u64>,
}

/// Memory layout.
#[derive(Debug, Deserialize)]
pub struct MemoryConfig {
    /// Base address of the code region, decimal or `0x` hex.
    #[serde(default = "default_code_base")]
    pub code_base: String,
}

impl Default for MemoryConfig {
    fn default() -> Self {
        Self {
            code_base: default_code_base(),
        }
    }
}

impl MemoryConfig {
    /// Parsed code base address.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] if the value is not an address.
    pub fn code_base_val(&self) -> Result<Address, SimError> {
        parse_address(&self.code_base)
            .ok_or_else(|| SimError::Config(format!("invalid code_base '{}'", self.code_base)))
    }
}

/// Initial register state.
#[derive(Debug, Deserialize)]
pub struct RegisterConfig {
    /// Register name to initial value; unnamed registers start at zero.
    #[serde(default = "default_initial")]
    pub initial: BTreeMap<String, i64>,
}

impl Default for RegisterConfig {
    fn default() -> Self {
        Self {
            initial: default_initial(),
        }
    }
}

impl RegisterConfig {
    /// Builds the initial register file.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] for an unknown register name.
    pub fn register_file(&self) -> Result<RegisterFile, SimError> {
        let mut regs = RegisterFile::new();
        for (name, &val) in &self.initial {
            let reg: Reg = name
                .parse()
                .map_err(|e| SimError::Config(format!("registers.initial: {e}")))?;
            regs.write(reg, val);
        }
        Ok(regs)
    }
}

impl Config {
    /// Parses a configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::Config`] on malformed TOML or field types.
    pub fn from_toml(text: &str) -> Result<Self, SimError> {
        toml::from_str(text).map_err(|e| SimError::Config(e.to_string()))
    }
}

/// Register file holding the demo seed.
pub fn demo_registers() -> RegisterFile {
    let mut regs = RegisterFile::new();
    for (idx, val) in DEMO_SEED {
        if let Some(reg) = Reg::new(idx) {
            regs.write(reg, val);
        }
    }
    regs
}

fn default_code_base() -> String {
    format!("{DEFAULT_CODE_BASE:#x}")
}

fn default_initial() -> BTreeMap<String, i64> {
    DEMO_SEED
        .iter()
        .map(|&(idx, val)| (format!("r{idx}"), val))
        .collect()
}

//! Memory Access Types.
//!
//! Classifies data accesses so that address faults can say whether a
//! load or a store tripped them.

use std::fmt;

/// Type of memory access operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum AccessType {
    /// Data read performed by a load in the Memory stage.
    Read,

    /// Data write performed by a store in the Memory stage.
    Write,
}

impl fmt::Display for AccessType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Read => "load",
            Self::Write => "store",
        };
        f.write_str(s)
    }
}

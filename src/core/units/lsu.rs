//! Load/Store Unit (LSU) Helpers.
//!
//! Address generation for loads and stores, and the checks that turn a
//! computed effective address into a valid word address.

use crate::common::addr::is_word_aligned;
use crate::common::{AccessType, Address, SimError};

/// Load/Store Unit address helpers.
#[derive(Debug)]
pub struct Lsu;

impl Lsu {
    /// Effective address of a memory operand: base register value plus
    /// the instruction's byte offset.
    pub fn effective_address(base: i64, offset: i64) -> i64 {
        base.wrapping_add(offset)
    }

    /// Converts a computed effective address into a word address.
    ///
    /// # Errors
    ///
    /// * [`SimError::AddressOutOfRange`] if the value is negative or too
    ///   large for the address space.
    /// * [`SimError::MisalignedAccess`] if it is not a multiple of the word
    ///   size.
    pub fn translate(value: i64, access: AccessType) -> Result<Address, SimError> {
        let addr =
            Address::try_from(value).map_err(|_| SimError::AddressOutOfRange { access, value })?;
        if !is_word_aligned(addr) {
            return Err(SimError::MisalignedAccess { access, addr });
        }
        Ok(addr)
    }
}

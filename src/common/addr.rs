//! Word addressing.
//!
//! Main memory is word-addressed with a 4-byte stride: every valid
//! instruction or data address is a multiple of [`WORD_SIZE`].

/// Byte address into main memory.
pub type Address = u32;

/// Size of one memory word (and one instruction) in bytes.
pub const WORD_SIZE: Address = 4;

/// Returns `true` if `addr` falls on a word boundary.
pub const fn is_word_aligned(addr: Address) -> bool {
    addr % WORD_SIZE == 0
}

/// Parses an unsigned address literal in decimal or `0x` hex.
pub fn parse_address(s: &str) -> Option<Address> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => Address::from_str_radix(hex, 16).ok(),
        None => s.parse().ok(),
    }
}

//! Instruction pipeline implementation.
//!
//! This module contains the five-stage instruction pipeline (fetch, decode,
//! execute, memory, writeback), the latches between stages, hazard
//! tracking with operand forwarding, and the per-instruction control
//! signals.

/// Hazard queue and forwarding network.
pub mod hazards;

/// Pipeline latches L0..L4.
pub mod latches;

/// Control signals and ALU operations.
pub mod signals;

/// Pipeline stage implementations (fetch, decode, execute, memory, writeback).
pub mod stages;

pub use hazards::{Forward, HazardQueue};
pub use latches::{Latches, Stage};
pub use signals::{AluOp, ControlSignals};

//! Data Hazard Detection and Forwarding.
//!
//! The hazard queue records, in program order, the destination registers of
//! instructions that have passed Execute but not yet retired. Execute uses
//! it to decide whether a source operand is at risk, and then asks the
//! forwarding network for the in-flight value.

use std::collections::VecDeque;

use crate::common::{Reg, SimError};
use crate::core::pipeline::latches::Stage;
use crate::isa::{Instruction, Slot};

/// FIFO of destinations whose values are not yet committed.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct HazardQueue {
    pending: VecDeque<Reg>,
}

impl HazardQueue {
    /// Creates an empty queue.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns `true` if a write to `reg` is still in flight.
    pub fn contains(&self, reg: Reg) -> bool {
        self.pending.contains(&reg)
    }

    /// Records a new in-flight write. Called by Execute once the
    /// instruction's own operand hazards are cleared.
    pub fn reserve(&mut self, reg: Reg) {
        self.pending.push_back(reg);
    }

    /// Removes the oldest entry when its instruction retires.
    ///
    /// # Errors
    ///
    /// Returns [`SimError::RetireOrder`] if the oldest entry is not `reg`;
    /// writes retire strictly in issue order.
    pub fn retire(&mut self, reg: Reg) -> Result<(), SimError> {
        match self.pending.front() {
            Some(&front) if front == reg => {
                self.pending.pop_front();
                Ok(())
            }
            front => Err(SimError::RetireOrder {
                reg,
                pending: front.copied(),
            }),
        }
    }

    /// Number of in-flight writes.
    pub fn len(&self) -> usize {
        self.pending.len()
    }

    /// Returns `true` if nothing is in flight.
    pub fn is_empty(&self) -> bool {
        self.pending.is_empty()
    }

    /// Pending destinations, oldest first.
    pub fn iter(&self) -> impl Iterator<Item = Reg> + '_ {
        self.pending.iter().copied()
    }
}

/// Outcome of a forwarding query.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Forward {
    /// The nearest producer has its result; use it.
    Value {
        /// Forwarded value.
        value: i64,
        /// Latch the value was taken from.
        source: Stage,
    },
    /// The nearest producer has not computed its result yet.
    NotReady {
        /// Latch holding the producer.
        source: Stage,
    },
    /// No candidate writes the register.
    NoSource,
}

/// Searches forwarding candidates, nearest producer first.
///
/// The first candidate whose destination is `reg` decides the outcome.
/// Older candidates are never consulted past a nearer writer, even if that
/// writer has no result yet: its value is the one the consumer must see.
pub fn forward(sources: &[(Stage, &Instruction)], reg: Reg) -> Forward {
    for &(stage, inst) in sources {
        if inst.dest() != Some(reg) {
            continue;
        }
        return match inst.slot(Slot::Result) {
            Some(value) => Forward::Value {
                value,
                source: stage,
            },
            None => Forward::NotReady { source: stage },
        };
    }
    Forward::NoSource
}

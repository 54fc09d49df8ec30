//! Tests for the hazard queue and the forwarding network.

use pipeline_sim::common::{Reg, SimError};
use pipeline_sim::core::pipeline::hazards::{forward, Forward, HazardQueue};
use pipeline_sim::core::pipeline::latches::{Latches, Stage};
use pipeline_sim::core::pipeline::signals::AluOp;
use pipeline_sim::isa::{Instruction, Slot};

fn r(n: usize) -> Reg {
    Reg::new(n).unwrap()
}

/// Arithmetic instruction writing `dest` with its result already computed.
fn computed(dest: usize, result: i64) -> Instruction {
    Instruction::arith(AluOp::Add, r(dest), r(1), r(3)).with_slot(Slot::Result, result)
}

/// Tests FIFO reservation and in-order retirement.
#[test]
fn test_queue_fifo() {
    let mut q = HazardQueue::new();
    assert!(q.is_empty());

    q.reserve(r(2));
    q.reserve(r(4));
    assert_eq!(q.len(), 2);
    assert!(q.contains(r(2)) && q.contains(r(4)));
    assert!(!q.contains(r(3)));

    q.retire(r(2)).unwrap();
    assert!(!q.contains(r(2)));
    assert_eq!(q.iter().collect::<Vec<_>>(), vec![r(4)]);

    q.retire(r(4)).unwrap();
    assert!(q.is_empty());
}

/// Tests that the same register may be pending twice and retires twice.
#[test]
fn test_queue_duplicate_register() {
    let mut q = HazardQueue::new();
    q.reserve(r(2));
    q.reserve(r(2));
    q.retire(r(2)).unwrap();
    assert!(q.contains(r(2)));
    q.retire(r(2)).unwrap();
    assert!(!q.contains(r(2)));
}

/// Tests that out-of-order retirement is reported.
#[test]
fn test_queue_retire_order_violation() {
    let mut q = HazardQueue::new();
    q.reserve(r(2));
    q.reserve(r(4));
    assert_eq!(
        q.retire(r(4)),
        Err(SimError::RetireOrder {
            reg: r(4),
            pending: Some(r(2))
        })
    );

    let mut empty = HazardQueue::new();
    assert_eq!(
        empty.retire(r(1)),
        Err(SimError::RetireOrder {
            reg: r(1),
            pending: None
        })
    );
}

/// Tests forwarding from the Memory latch.
#[test]
fn test_forward_from_memory() {
    let mem = computed(2, 105);
    let wb = Instruction::empty();
    let sources = [(Stage::Memory, &mem), (Stage::Writeback, &wb)];
    assert_eq!(
        forward(&sources, r(2)),
        Forward::Value {
            value: 105,
            source: Stage::Memory
        }
    );
}

/// Tests forwarding from the Writeback latch when Memory does not write
/// the register.
#[test]
fn test_forward_from_writeback() {
    let mem = Instruction::store(r(1), r(2), 0);
    let wb = computed(2, 7);
    let sources = [(Stage::Memory, &mem), (Stage::Writeback, &wb)];
    assert_eq!(
        forward(&sources, r(2)),
        Forward::Value {
            value: 7,
            source: Stage::Writeback
        }
    );
}

/// Tests that the nearer producer wins when both latches write the
/// register.
#[test]
fn test_forward_prefers_nearest() {
    let mem = computed(2, 20);
    let wb = computed(2, 10);
    let sources = [(Stage::Memory, &mem), (Stage::Writeback, &wb)];
    assert_eq!(
        forward(&sources, r(2)),
        Forward::Value {
            value: 20,
            source: Stage::Memory
        }
    );
}

/// Tests that a load still in Memory is not ready, even when an older
/// writer of the same register sits in Writeback.
#[test]
fn test_forward_pending_load_blocks_older_writer() {
    let mem = Instruction::load(r(3), r(2), 0);
    let wb = computed(3, 99);
    let sources = [(Stage::Memory, &mem), (Stage::Writeback, &wb)];
    assert_eq!(
        forward(&sources, r(3)),
        Forward::NotReady {
            source: Stage::Memory
        }
    );
}

/// Tests the no-candidate outcome.
#[test]
fn test_forward_no_source() {
    let mem = computed(2, 1);
    let wb = Instruction::empty();
    let sources = [(Stage::Memory, &mem), (Stage::Writeback, &wb)];
    assert_eq!(forward(&sources, r(5)), Forward::NoSource);
}

/// Tests latch advancement with and without a stall.
#[test]
fn test_latch_advance() {
    let a = computed(2, 1);
    let b = computed(4, 2);
    let c = Instruction::load(r(3), r(2), 0);
    let d = Instruction::jump(0x1000);
    let e = Instruction::store(r(1), r(2), 0);

    let mut l = Latches {
        fetch: e,
        decode: d,
        execute: c,
        memory: b,
        writeback: a,
    };
    l.advance(false);
    assert_eq!(l.writeback, b);
    assert_eq!(l.memory, c);
    assert_eq!(l.execute, d);
    assert_eq!(l.decode, e);
    assert!(l.fetch.is_empty());

    let mut l = Latches {
        fetch: e,
        decode: d,
        execute: c,
        memory: b,
        writeback: a,
    };
    l.advance(true);
    assert_eq!(l.writeback, b);
    assert!(l.memory.is_empty());
    assert_eq!(l.execute, c);
    assert_eq!(l.decode, d);
    assert_eq!(l.fetch, e);
}

/// Tests drain detection and forwarding-source order.
#[test]
fn test_latch_drain_and_sources() {
    let mut l = Latches::default();
    assert!(l.is_drained());

    l.writeback = computed(2, 1);
    assert!(!l.is_drained());

    let sources = l.forwarding_sources();
    assert_eq!(sources[0].0, Stage::Memory);
    assert_eq!(sources[1].0, Stage::Writeback);
    assert_eq!(Stage::Memory.to_string(), "MEM");
}

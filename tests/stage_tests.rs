//! Tests for the individual pipeline stages, driven on a hand-built
//! latch state.

use pipeline_sim::common::{AccessType, Reg, SimError};
use pipeline_sim::core::pipeline::signals::AluOp;
use pipeline_sim::core::pipeline::stages::{
    decode_stage, execute_stage, fetch_stage, mem_stage, wb_stage,
};
use pipeline_sim::core::Cpu;
use pipeline_sim::isa::{Instruction, Slot};

fn r(n: usize) -> Reg {
    Reg::new(n).unwrap()
}

fn cpu_with(program: &[Instruction]) -> Cpu {
    Cpu::load(program).unwrap()
}

/// Tests that Fetch reads at the PC and advances it.
#[test]
fn test_fetch_reads_and_advances() {
    let add = Instruction::arith(AluOp::Add, r(2), r(1), r(3));
    let mut cpu = cpu_with(&[add]);
    assert_eq!(cpu.pc, 0x1000);

    fetch_stage(&mut cpu);
    assert_eq!(cpu.latches.fetch, add.at(0x1000));
    assert_eq!(cpu.pc, 0x1004);
    assert_eq!(cpu.stats.instructions_fetched, 1);
}

/// Tests that Fetch past the program yields a bubble and still advances.
#[test]
fn test_fetch_past_end() {
    let mut cpu = cpu_with(&[Instruction::jump(0x1000)]);
    cpu.pc = 0x1004;

    fetch_stage(&mut cpu);
    assert!(cpu.latches.fetch.is_empty());
    assert_eq!(cpu.pc, 0x1008);
    assert_eq!(cpu.stats.instructions_fetched, 0);
}

/// Tests register reads in Decode, including the immediate operand.
#[test]
fn test_decode_reads_operands() {
    let mut cpu = cpu_with(&[]);
    cpu.latches.decode = Instruction::arith(AluOp::Add, r(2), r(1), r(3));
    decode_stage(&mut cpu);
    assert_eq!(cpu.latches.decode.slot(Slot::Rv1), Some(100));
    assert_eq!(cpu.latches.decode.slot(Slot::Rv2), Some(5));

    cpu.latches.decode = Instruction::arith_imm(AluOp::Sub, r(2), r(5), 3);
    decode_stage(&mut cpu);
    assert_eq!(cpu.latches.decode.slot(Slot::Rv1), Some(7));
    assert_eq!(cpu.latches.decode.slot(Slot::Rv2), Some(3));

    cpu.latches.decode = Instruction::store(r(1), r(3), 0);
    decode_stage(&mut cpu);
    assert_eq!(cpu.latches.decode.slot(Slot::Rv1), Some(100));
    assert_eq!(cpu.latches.decode.slot(Slot::Rv2), Some(5));

    cpu.latches.decode = Instruction::load(r(4), r(5), 8);
    decode_stage(&mut cpu);
    assert_eq!(cpu.latches.decode.slot(Slot::Rv1), Some(7));
    assert_eq!(cpu.latches.decode.slot(Slot::Rv2), None);
}

/// Tests that a jump in Decode redirects the PC and flushes Fetch.
#[test]
fn test_decode_jump_flushes_fetch() {
    let mut cpu = cpu_with(&[]);
    cpu.pc = 0x1008;
    cpu.latches.decode = Instruction::jump(0x100c).at(0x1000);
    cpu.latches.fetch = Instruction::arith(AluOp::Add, r(2), r(1), r(1)).at(0x1004);

    decode_stage(&mut cpu);
    assert_eq!(cpu.pc, 0x100c);
    assert!(cpu.latches.fetch.is_empty());
    assert_eq!(cpu.stats.flushes_control, 1);
}

/// Tests arithmetic and address generation in Execute.
#[test]
fn test_execute_computes() {
    let mut cpu = cpu_with(&[]);
    cpu.latches.execute =
        Instruction::arith(AluOp::Mult, r(2), r(1), r(3)).with_operands(Some(100), Some(5));
    execute_stage(&mut cpu).unwrap();
    assert_eq!(cpu.latches.execute.slot(Slot::Result), Some(500));
    assert!(cpu.hazards.contains(r(2)));

    cpu.latches.execute = Instruction::load(r(3), r(2), -4).with_operands(Some(64), None);
    execute_stage(&mut cpu).unwrap();
    assert_eq!(cpu.latches.execute.slot(Slot::Rv1), Some(60));

    cpu.latches.execute = Instruction::store(r(1), r(2), 8).with_operands(Some(100), Some(64));
    execute_stage(&mut cpu).unwrap();
    assert_eq!(cpu.latches.execute.slot(Slot::Rv1), Some(100));
    assert_eq!(cpu.latches.execute.slot(Slot::Rv2), Some(72));

    assert_eq!(cpu.hazards.iter().collect::<Vec<_>>(), vec![r(2), r(3)]);
}

/// Tests that Execute ignores bubbles and jumps.
#[test]
fn test_execute_skips_non_alu() {
    let mut cpu = cpu_with(&[]);
    cpu.latches.execute = Instruction::jump(0x1000);
    execute_stage(&mut cpu).unwrap();
    assert_eq!(cpu.latches.execute, Instruction::jump(0x1000));
    assert!(cpu.hazards.is_empty());
}

/// Tests that Execute forwards a pending value from the Memory latch.
#[test]
fn test_execute_forwards() {
    let mut cpu = cpu_with(&[]);
    cpu.hazards.reserve(r(2));
    cpu.latches.memory =
        Instruction::arith(AluOp::Add, r(2), r(1), r(3)).with_slot(Slot::Result, 105);
    cpu.latches.execute =
        Instruction::arith(AluOp::Add, r(4), r(2), r(2)).with_operands(Some(0), Some(0));

    execute_stage(&mut cpu).unwrap();
    assert!(!cpu.stall);
    assert_eq!(cpu.latches.execute.slot(Slot::Result), Some(210));
    assert_eq!(cpu.stats.forwards, 2);
}

/// Tests that Execute stalls behind a load that has not read memory yet.
#[test]
fn test_execute_stalls_on_load() {
    let mut cpu = cpu_with(&[]);
    cpu.hazards.reserve(r(3));
    cpu.latches.memory = Instruction::load(r(3), r(2), 0).with_operands(Some(0), None);
    let held = Instruction::arith(AluOp::Add, r(4), r(3), r(3)).with_operands(Some(0), Some(0));
    cpu.latches.execute = held;

    execute_stage(&mut cpu).unwrap();
    assert!(cpu.stall);
    assert_eq!(cpu.stats.stalls_data, 1);
    assert_eq!(cpu.latches.execute.slot(Slot::Result), None);
    assert_eq!(cpu.hazards.len(), 1);
}

/// Tests that a queued register nobody in flight writes is an error.
#[test]
fn test_execute_unresolved_hazard() {
    let mut cpu = cpu_with(&[]);
    cpu.hazards.reserve(r(6));
    cpu.latches.execute =
        Instruction::arith(AluOp::Add, r(4), r(6), r(1)).with_operands(Some(0), Some(100));

    assert_eq!(
        execute_stage(&mut cpu),
        Err(SimError::UnresolvedHazard(r(6)))
    );
}

/// Tests a store followed by a load of the same word.
#[test]
fn test_memory_store_then_load() {
    let mut cpu = cpu_with(&[]);
    cpu.latches.memory = Instruction::store(r(1), r(2), 0).with_operands(Some(100), Some(64));
    mem_stage(&mut cpu).unwrap();
    assert_eq!(cpu.memory.read_word(64), 100);

    cpu.latches.memory = Instruction::load(r(3), r(2), 0).with_operands(Some(64), None);
    mem_stage(&mut cpu).unwrap();
    assert_eq!(cpu.latches.memory.slot(Slot::Result), Some(100));

    cpu.latches.memory = Instruction::load(r(3), r(2), 0).with_operands(Some(128), None);
    mem_stage(&mut cpu).unwrap();
    assert_eq!(cpu.latches.memory.slot(Slot::Result), Some(0));
}

/// Tests data address faults raised by the Memory stage.
#[test]
fn test_memory_faults() {
    let mut cpu = cpu_with(&[Instruction::jump(0x1000)]);

    cpu.latches.memory = Instruction::load(r(3), r(2), 0).with_operands(Some(6), None);
    assert_eq!(
        mem_stage(&mut cpu),
        Err(SimError::MisalignedAccess {
            access: AccessType::Read,
            addr: 6
        })
    );

    cpu.latches.memory = Instruction::store(r(1), r(2), 0).with_operands(Some(1), Some(-4));
    assert_eq!(
        mem_stage(&mut cpu),
        Err(SimError::AddressOutOfRange {
            access: AccessType::Write,
            value: -4
        })
    );

    cpu.latches.memory = Instruction::store(r(1), r(2), 0).with_operands(Some(1), Some(0x1000));
    assert_eq!(
        mem_stage(&mut cpu),
        Err(SimError::CodeRegionAccess {
            access: AccessType::Write,
            addr: 0x1000
        })
    );
}

/// Tests Writeback commits results and counts retirements.
#[test]
fn test_writeback_commits() {
    let mut cpu = cpu_with(&[]);
    cpu.latches.writeback =
        Instruction::arith(AluOp::Sub, r(9), r(1), r(3)).with_slot(Slot::Result, 95);
    wb_stage(&mut cpu).unwrap();
    assert_eq!(cpu.regs.read(r(9)), 95);
    assert_eq!(cpu.stats.instructions_retired, 1);
    assert_eq!(cpu.stats.inst_alu, 1);

    cpu.latches.writeback = Instruction::store(r(1), r(2), 0).with_operands(Some(1), Some(64));
    wb_stage(&mut cpu).unwrap();
    assert_eq!(cpu.stats.inst_store, 1);

    cpu.latches.writeback = Instruction::empty();
    wb_stage(&mut cpu).unwrap();
    assert_eq!(cpu.stats.instructions_retired, 2);
}

/// Tests that a register write without a result is reported.
#[test]
fn test_writeback_missing_result() {
    let mut cpu = cpu_with(&[]);
    cpu.latches.writeback = Instruction::load(r(3), r(2), 0);
    assert!(matches!(
        wb_stage(&mut cpu),
        Err(SimError::MissingOperand { stage: "WB", .. })
    ));
}

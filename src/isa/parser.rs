//! Program text parser.
//!
//! One instruction per line. Operands are separated by commas or
//! whitespace, `#` and `//` start a comment, and blank lines are skipped.
//!
//! ```text
//! add  r2, r1, r3      # r2 <- r1 + r3
//! sub  $r4 $r2 16      // immediate third operand
//! lw   r3, 0(r2)
//! sw   r1, -8(r2)
//! j    0x100c
//! ```

use once_cell::sync::Lazy;
use regex::Regex;

use crate::common::addr::{is_word_aligned, parse_address};
use crate::common::{ParseError, ParseErrorKind, Reg};
use crate::core::pipeline::AluOp;
use crate::isa::instruction::Instruction;

const MEM_OPERAND_REGEX: &str = r"(?i)^(-?(?:0x[0-9a-f]+|\d+))?\((\$?r\d+)\)$";

/// Parses a whole program, one instruction per non-blank line.
///
/// # Errors
///
/// Returns the first malformed line.
pub fn parse_program(text: &str) -> Result<Vec<Instruction>, ParseError> {
    let mut program = Vec::new();
    for (idx, line) in text.lines().enumerate() {
        if let Some(inst) = parse_line(idx + 1, line)? {
            program.push(inst);
        }
    }
    Ok(program)
}

/// Parses one source line. Returns `Ok(None)` for blank or comment-only
/// lines.
///
/// # Errors
///
/// Returns a [`ParseError`] carrying `line_no` and the trimmed line text.
pub fn parse_line(line_no: usize, line: &str) -> Result<Option<Instruction>, ParseError> {
    let code = strip_comment(line).replace(',', " ");
    let mut tokens = code.split_whitespace();
    let Some(mnemonic) = tokens.next() else {
        return Ok(None);
    };
    let operands: Vec<&str> = tokens.collect();
    let mnemonic = mnemonic.to_ascii_lowercase();

    parse_instruction(&mnemonic, &operands)
        .map(Some)
        .map_err(|kind| ParseError {
            line: line_no,
            text: line.trim().to_string(),
            kind,
        })
}

fn strip_comment(line: &str) -> &str {
    let end = [line.find('#'), line.find("//")]
        .into_iter()
        .flatten()
        .min()
        .unwrap_or(line.len());
    &line[..end]
}

fn parse_instruction(mnemonic: &str, ops: &[&str]) -> Result<Instruction, ParseErrorKind> {
    if let Some(op) = AluOp::from_mnemonic(mnemonic) {
        expect_operands(mnemonic, ops, 3)?;
        let dest = parse_reg(ops[0])?;
        let src1 = parse_reg(ops[1])?;
        return Ok(if looks_like_reg(ops[2]) {
            Instruction::arith(op, dest, src1, parse_reg(ops[2])?)
        } else {
            Instruction::arith_imm(op, dest, src1, parse_imm(ops[2])?)
        });
    }

    match mnemonic {
        "lw" => {
            expect_operands(mnemonic, ops, 2)?;
            let dest = parse_reg(ops[0])?;
            let (offset, base) = parse_mem_operand(ops[1])?;
            Ok(Instruction::load(dest, base, offset))
        }
        "sw" => {
            expect_operands(mnemonic, ops, 2)?;
            let src = parse_reg(ops[0])?;
            let (offset, base) = parse_mem_operand(ops[1])?;
            Ok(Instruction::store(src, base, offset))
        }
        "j" => {
            expect_operands(mnemonic, ops, 1)?;
            match parse_address(ops[0]) {
                Some(target) if is_word_aligned(target) => Ok(Instruction::jump(target)),
                _ => Err(ParseErrorKind::InvalidTarget(ops[0].to_string())),
            }
        }
        _ => Err(ParseErrorKind::UnknownMnemonic(mnemonic.to_string())),
    }
}

fn expect_operands(mnemonic: &str, ops: &[&str], expected: usize) -> Result<(), ParseErrorKind> {
    if ops.len() == expected {
        Ok(())
    } else {
        Err(ParseErrorKind::OperandCount {
            mnemonic: mnemonic.to_string(),
            expected,
            found: ops.len(),
        })
    }
}

fn looks_like_reg(tok: &str) -> bool {
    tok.starts_with(['$', 'r', 'R'])
}

fn parse_reg(tok: &str) -> Result<Reg, ParseErrorKind> {
    tok.parse()
        .map_err(|_| ParseErrorKind::InvalidRegister(tok.to_string()))
}

fn parse_imm(tok: &str) -> Result<i64, ParseErrorKind> {
    let (neg, digits) = match tok.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, tok),
    };
    let magnitude = match digits
        .strip_prefix("0x")
        .or_else(|| digits.strip_prefix("0X"))
    {
        Some(hex) => i64::from_str_radix(hex, 16),
        None => digits.parse::<i64>(),
    }
    .map_err(|_| ParseErrorKind::InvalidImmediate(tok.to_string()))?;
    Ok(if neg { -magnitude } else { magnitude })
}

fn parse_mem_operand(tok: &str) -> Result<(i64, Reg), ParseErrorKind> {
    static MEM_OPERAND: Lazy<Regex> =
        Lazy::new(|| Regex::new(MEM_OPERAND_REGEX).expect("memory operand pattern is valid"));

    let Some(caps) = MEM_OPERAND.captures(tok) else {
        return Err(ParseErrorKind::InvalidMemOperand(tok.to_string()));
    };
    let offset = match caps.get(1) {
        Some(m) => parse_imm(m.as_str())?,
        None => 0,
    };
    let base = parse_reg(&caps[2])?;
    Ok((offset, base))
}

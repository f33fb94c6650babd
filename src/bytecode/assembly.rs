/*!
  The human readable textual form of machine code is called assembly. This module turns one line
  of assembly into a `Syntax` value: either a placement directive or an unencoded `Instruction`.
  Mnemonics and registers are resolved through the catalog; numeric literals are read by
  `binary::parse_literal`.

  A line has the form

  ```text
    .ORG <address>                       # placement directive
    MNEMONIC operand, operand, ...       # instruction
  ```

  where an operand is a register, an integer, a `0x` hexadecimal integer, or `offset(register)`.
*/

use std::convert::TryFrom;
use std::fmt::{Display, Formatter};

use super::binary::{parse_integer, parse_literal};
use super::catalog::{lookup_operation, lookup_register, CatalogEntry};
use super::{Instruction, InterruptIndex, Register, Shape, Word};
use crate::address::AddressNumberType;
use crate::error::ErrorKind;

pub const COMMENT_MARKER: char = '#';
pub const ORG_DIRECTIVE: &str = ".ORG";

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Syntax {
  /// Moves the write cursor to an absolute address.
  Org(AddressNumberType),
  Instruction(Instruction)
}

impl Display for Syntax {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {
      Syntax::Org(address) => {
        write!(f, "{} {}", ORG_DIRECTIVE, address)
      }
      Syntax::Instruction(i) => {
        write!(f, "{}", i)
      }
    }
  }
}

/// Strips a trailing comment and surrounding whitespace.
pub fn clean_line(line: &str) -> &str {
  line.split(COMMENT_MARKER).next().unwrap_or("").trim()
}

/// Splits a cleaned line into tokens. Commas and `(` separate tokens and `)` is dropped, so
/// `LDD R1, 4(R2)` becomes `["LDD", "R1", "4", "R2"]`.
pub fn tokenize(line: &str) -> Vec<String> {
  line
    .replace(',', " ")
    .replace('(', " ")
    .replace(')', "")
    .split_whitespace()
    .map(String::from)
    .collect()
}

/// Returns `Ok(None)` for lines with nothing left after removing the comment.
pub fn parse_line(line: &str) -> Result<Option<Syntax>, ErrorKind> {
  let line = clean_line(line);
  if line.is_empty() {
    return Ok(None);
  }

  let mut words = line.split_whitespace();
  if words.next() == Some(ORG_DIRECTIVE) {
    let arguments: Vec<&str> = words.collect();
    return match arguments.as_slice() {
      [address] => Ok(Some(Syntax::Org(parse_address(address)?))),
      _ => Err(ErrorKind::MalformedOperand {
        operand: arguments.join(" "),
        reason: ".ORG takes exactly one address"
      })
    };
  }

  let tokens = tokenize(line);
  let (mnemonic, operands) = match tokens.split_first() {
    Some(split) => split,
    None => return Ok(None)
  };
  let entry = lookup_operation(mnemonic)?;

  if operands.len() != entry.shape.arity() {
    return Err(ErrorKind::WrongArity {
      operation: entry.operation,
      expected: entry.shape.arity(),
      found: operands.len(),
      args: operands.to_vec()
    });
  }

  build_instruction(entry, operands).map(|i| Some(Syntax::Instruction(i)))
}

/// Builds the instruction for `entry` from operands already checked against the shape's arity.
fn build_instruction(entry: CatalogEntry, operands: &[String]) -> Result<Instruction, ErrorKind> {
  let opcode = entry.operation;
  let register = |i: usize| -> Result<Register, ErrorKind> { lookup_register(&operands[i]) };
  let literal  = |i: usize| -> Result<Word, ErrorKind> { parse_literal(&operands[i]) };

  let instruction =
    match entry.shape {

      Shape::Nullary => Instruction::Nullary(opcode),

      Shape::Unary => Instruction::Unary { opcode, register: register(0)? },

      // Source is written first.
      Shape::Move => Instruction::Move {
        opcode,
        source: register(0)?,
        destination: register(1)?
      },

      Shape::Swap => Instruction::Swap {
        opcode,
        first: register(0)?,
        second: register(1)?
      },

      Shape::Ternary => Instruction::Ternary {
        opcode,
        destination: register(0)?,
        first: register(1)?,
        second: register(2)?
      },

      Shape::ImmediateAlu => Instruction::ImmediateAlu {
        opcode,
        destination: register(0)?,
        source: register(1)?,
        immediate: literal(2)?
      },

      Shape::LoadImmediate => Instruction::LoadImmediate {
        opcode,
        destination: register(0)?,
        immediate: literal(1)?
      },

      // `LDD Rdst, offset(Rsrc)`
      Shape::LoadDisplaced => Instruction::LoadDisplaced {
        opcode,
        destination: register(0)?,
        offset: literal(1)?,
        base: register(2)?
      },

      // `STD Rsrc1, offset(Rsrc2)`
      Shape::StoreDisplaced => Instruction::StoreDisplaced {
        opcode,
        source: register(0)?,
        offset: literal(1)?,
        base: register(2)?
      },

      Shape::Branch => Instruction::Branch { opcode, target: literal(0)? },

      Shape::Interrupt => Instruction::Interrupt { opcode, index: parse_interrupt_index(&operands[0])? },

    };

  Ok(instruction)
}

fn parse_interrupt_index(token: &str) -> Result<InterruptIndex, ErrorKind> {
  match token {
    "0" => Ok(InterruptIndex::Zero),
    "1" => Ok(InterruptIndex::One),
    _ => Err(ErrorKind::MalformedOperand {
      operand: token.to_string(),
      reason: "an interrupt index must be 0 or 1"
    })
  }
}

/// Addresses use the literal syntax of immediates but are neither negative nor truncated to a
/// word. Whether the address lies inside memory is decided by the assembler.
fn parse_address(token: &str) -> Result<AddressNumberType, ErrorKind> {
  let value = parse_integer(token)?;
  if value < 0 {
    return Err(ErrorKind::MalformedOperand {
      operand: token.to_string(),
      reason: "an address cannot be negative"
    });
  }
  AddressNumberType::try_from(value).map_err(|_e| ErrorKind::MalformedOperand {
    operand: token.to_string(),
    reason: "an address must fit in the host address width"
  })
}

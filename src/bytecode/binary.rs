/*!
  This module is responsible for the encoding of binary instructions and of the numeric
  literals that follow some of them in memory.

*/
use nom::{
  branch::alt,
  bytes::complete::tag,
  character::complete::{digit1, hex_digit1, one_of},
  combinator::{all_consuming, map_res, opt, recognize},
  sequence::{pair, preceded},
  IResult
};

use super::{Instruction, Register};
use crate::error::ErrorKind;

// If you change this you must also change `encode_instruction` and `word_to_bits`.
pub type Word = u32;

pub const WORD_BITS     : u32 = 32;
pub const OPCODE_BITS   : u32 = 10;
pub const REGISTER_BITS : u32 = 3;

const OPCODE_SHIFT: u32 = WORD_BITS - OPCODE_BITS;

/// An `Either` type for an encoded instruction, allowing the instruction to be
/// either one word or an instruction word followed by a raw 32 bit immediate.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum EncodedInstruction {
  Word(Word),
  DoubleWord {
    word: Word,
    immediate: Word
  }
}

impl EncodedInstruction {
  /// The words in the order they are laid out in memory.
  pub fn words(&self) -> Vec<Word> {
    match self {
      EncodedInstruction::Word(word) => vec![*word],
      EncodedInstruction::DoubleWord { word, immediate } => vec![*word, *immediate]
    }
  }

  pub fn len(&self) -> usize {
    match self {
      EncodedInstruction::Word(_) => 1,
      EncodedInstruction::DoubleWord { .. } => 2
    }
  }
}

fn opcode_field(instruction: &Instruction) -> Word {
  (instruction.operation().code() as Word) << OPCODE_SHIFT
}

/// Places a register in one of the three 3 bit slots that directly follow the opcode.
fn register_field(register: Register, slot: u32) -> Word {
  debug_assert!(slot < 3);
  (register.index() as Word) << (OPCODE_SHIFT - REGISTER_BITS * (slot + 1))
}

/**
  Encodes the instruction into machine words. The variant of `Instruction` fixes the layout:

  ```text
    [Op:10][F0:3][F1:3][F2:3][Zero:13]    register fields, unused slots are zero
    [Op:10][Zero:21][Index:1]             interrupt
  ```

  Shapes that carry an immediate emit it unchanged as the second word.
*/
pub fn encode_instruction(instruction: &Instruction) -> EncodedInstruction {
  let opcode = opcode_field(instruction);

  match *instruction {

    Instruction::Nullary(_) => {
      EncodedInstruction::Word(opcode)
    }

    // The single register is written to both the first and the second slot.
    Instruction::Unary { register, .. } => {
      EncodedInstruction::Word(
        opcode | register_field(register, 0) | register_field(register, 1)
      )
    }

    Instruction::Move { destination, source, .. } => {
      EncodedInstruction::Word(
        opcode | register_field(destination, 0) | register_field(source, 1)
      )
    }

    Instruction::Swap { first, second, .. } => {
      EncodedInstruction::Word(
        opcode | register_field(first, 1) | register_field(second, 2)
      )
    }

    Instruction::Ternary { destination, first, second, .. } => {
      EncodedInstruction::Word(
        opcode
          | register_field(destination, 0)
          | register_field(first, 1)
          | register_field(second, 2)
      )
    }

    Instruction::ImmediateAlu { destination, source, immediate, .. } => {
      EncodedInstruction::DoubleWord {
        word: opcode | register_field(destination, 0) | register_field(source, 1),
        immediate
      }
    }

    Instruction::LoadImmediate { destination, immediate, .. } => {
      EncodedInstruction::DoubleWord {
        word: opcode | register_field(destination, 0),
        immediate
      }
    }

    Instruction::LoadDisplaced { destination, base, offset, .. } => {
      EncodedInstruction::DoubleWord {
        word: opcode | register_field(destination, 0) | register_field(base, 1),
        immediate: offset
      }
    }

    Instruction::StoreDisplaced { source, base, offset, .. } => {
      EncodedInstruction::DoubleWord {
        word: opcode | register_field(source, 1) | register_field(base, 2),
        immediate: offset
      }
    }

    Instruction::Branch { target, .. } => {
      EncodedInstruction::DoubleWord {
        word: opcode,
        immediate: target
      }
    }

    Instruction::Interrupt { index, .. } => {
      EncodedInstruction::Word(opcode | index.bit())
    }

  }
}

fn hexadecimal(input: &str) -> IResult<&str, i64> {
  map_res(
    preceded(tag("0x"), hex_digit1),
    |digits: &str| i64::from_str_radix(digits, 16)
  )(input)
}

fn decimal(input: &str) -> IResult<&str, i64> {
  map_res(
    recognize(pair(opt(one_of("+-")), digit1)),
    |digits: &str| digits.parse::<i64>()
  )(input)
}

/// Parses an integer token with the literal syntax but without truncating it.
pub fn parse_integer(token: &str) -> Result<i64, ErrorKind> {
  match all_consuming(alt((hexadecimal, decimal)))(token) {
    Ok((_rest, value)) => Ok(value),
    Err(_e) => Err(ErrorKind::MalformedOperand {
      operand: token.to_string(),
      reason: "expected a decimal or 0x-prefixed hexadecimal integer"
    })
  }
}

/**
  Parses an immediate, offset, or address token. A `0x` prefix selects hexadecimal, anything
  else is read as (optionally signed) decimal. The value is truncated to the low 32 bits, so
  negative values come out in two's complement: `-1` is all ones.
*/
pub fn parse_literal(token: &str) -> Result<Word, ErrorKind> {
  // `as` between integer types truncates, which is exactly the 32 bit mask.
  parse_integer(token).map(|value| value as Word)
}

/// Renders a word as exactly `WORD_BITS` binary digits, most significant first.
pub fn word_to_bits(word: Word) -> String {
  format!("{:032b}", word)
}

/// The inverse of `word_to_bits`. Returns `None` unless given exactly 32 binary digits.
pub fn bits_to_word(bits: &str) -> Option<Word> {
  if bits.len() != WORD_BITS as usize || !bits.chars().all(|c| c == '0' || c == '1') {
    return None;
  }
  Word::from_str_radix(bits, 2).ok()
}


#[cfg(test)]
mod tests {
  use super::*;
  use crate::bytecode::{InterruptIndex, Operation};
  use proptest::prelude::*;

  fn bits(encoded: EncodedInstruction) -> Vec<String> {
    encoded.words().into_iter().map(word_to_bits).collect()
  }

  #[test]
  fn move_puts_destination_first(){
    let mov = Instruction::Move {
      opcode: Operation::Mov,
      destination: Register::R2,
      source: Register::R1
    };
    assert_eq!(bits(encode_instruction(&mov)), vec!["01000001100100010000000000000000"]);
  }

  #[test]
  fn immediate_add_emits_two_words(){
    let iadd = Instruction::ImmediateAlu {
      opcode: Operation::Iadd,
      destination: Register::R0,
      source: Register::R1,
      immediate: 5
    };
    assert_eq!(
      bits(encode_instruction(&iadd)),
      vec![
        "01101011100000010000000000000000",
        "00000000000000000000000000000101"
      ]
    );
  }

  #[test]
  fn interrupt_index_is_last_bit(){
    let int = Instruction::Interrupt { opcode: Operation::Int, index: InterruptIndex::One };
    assert_eq!(bits(encode_instruction(&int)), vec!["11110010000000000000000000000001"]);
    let int = Instruction::Interrupt { opcode: Operation::Int, index: InterruptIndex::Zero };
    assert_eq!(bits(encode_instruction(&int)), vec!["11110010000000000000000000000000"]);
  }

  #[test]
  fn unary_duplicates_register(){
    let push = Instruction::Unary { opcode: Operation::Push, register: Register::R5 };
    assert_eq!(bits(encode_instruction(&push)), vec!["10000001001011010000000000000000"]);
  }

  #[test]
  fn swap_and_store_skip_first_slot(){
    let swap = Instruction::Swap {
      opcode: Operation::Swap,
      first: Register::R3,
      second: Register::R7
    };
    assert_eq!(bits(encode_instruction(&swap)), vec!["01001001100000111110000000000000"]);

    let std = Instruction::StoreDisplaced {
      opcode: Operation::Std,
      source: Register::R1,
      base: Register::R2,
      offset: 8
    };
    assert_eq!(
      bits(encode_instruction(&std)),
      vec![
        "10100100110000010100000000000000",
        "00000000000000000000000000001000"
      ]
    );
  }

  #[test]
  fn ternary_and_load(){
    let add = Instruction::Ternary {
      opcode: Operation::Add,
      destination: Register::R1,
      first: Register::R2,
      second: Register::R3
    };
    assert_eq!(bits(encode_instruction(&add)), vec!["01010001110010100110000000000000"]);

    let ldm = Instruction::LoadImmediate {
      opcode: Operation::Ldm,
      destination: Register::R7,
      immediate: 0xFF
    };
    assert_eq!(
      bits(encode_instruction(&ldm)),
      vec![
        "10010011001110000000000000000000",
        "00000000000000000000000011111111"
      ]
    );
  }

  #[test]
  fn branch_and_nullary(){
    let jmp = Instruction::Branch { opcode: Operation::Jmp, target: 500 };
    let encoded = encode_instruction(&jmp);
    assert_eq!(encoded.len(), 2);
    assert_eq!(
      bits(encoded),
      vec![
        "11011010000000000000000000000000",
        "00000000000000000000000111110100"
      ]
    );
    assert_eq!(
      bits(encode_instruction(&Instruction::Nullary(Operation::Hlt))),
      vec!["00001000000000000000000000000000"]
    );
  }

  #[test]
  fn literals(){
    assert_eq!(parse_literal("5"), Ok(5));
    assert_eq!(parse_literal("+5"), Ok(5));
    assert_eq!(parse_literal("0x1F"), Ok(31));
    assert_eq!(parse_literal("0xffffffff"), Ok(Word::max_value()));
    assert_eq!(parse_literal("-1"), Ok(0xFFFF_FFFF));
    assert_eq!(parse_literal("-2147483648"), Ok(0x8000_0000));
    assert_eq!(parse_literal("4294967296"), Ok(0));
  }

  #[test]
  fn malformed_literals(){
    for token in &["", "0x", "x10", "12a", "-0x5", "0X10", "1.5", "R1", "99999999999999999999"] {
      match parse_literal(token) {
        Err(ErrorKind::MalformedOperand { operand, .. }) => assert_eq!(&operand, token),
        other => panic!("{} parsed as {:?}", token, other)
      }
    }
  }

  #[test]
  fn integers_are_not_truncated(){
    assert_eq!(parse_integer("4294967296"), Ok(1 << 32));
    assert_eq!(parse_integer("0x100000005"), Ok(0x1_0000_0005));
    assert_eq!(parse_integer("-1"), Ok(-1));
    assert!(matches!(parse_integer("0x"), Err(ErrorKind::MalformedOperand { .. })));
  }

  #[test]
  fn bits_width(){
    assert_eq!(word_to_bits(0).len(), 32);
    assert_eq!(word_to_bits(Word::max_value()), "1".repeat(32));
    assert_eq!(bits_to_word("101"), None);
    assert_eq!(bits_to_word(&"2".repeat(32)), None);
  }

  proptest! {
    #[test]
    fn twos_complement_round_trip(value in any::<i32>()) {
      let rendered = word_to_bits(parse_literal(&value.to_string()).unwrap());
      prop_assert_eq!(rendered.len(), 32);
      let decoded = bits_to_word(&rendered).unwrap() as i32;
      prop_assert_eq!(decoded, value);
    }

    #[test]
    fn hex_literals_match_decimal(value in any::<u32>()) {
      prop_assert_eq!(parse_literal(&format!("0x{:x}", value)), parse_literal(&value.to_string()));
    }
  }
}

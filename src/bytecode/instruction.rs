use std::fmt::{Display, Formatter};

use strum_macros::{Display as StrumDisplay, EnumIter, EnumString, IntoStaticStr};
use num_enum::{TryFromPrimitive, IntoPrimitive};

use super::binary::{Word, OPCODE_BITS};

/**
  Operations of the instruction set.

  The discriminant of each variant is its 10 bit opcode, so converting an `Operation` into a
  `u16` yields exactly the bits that lead the encoded word. The opcodes are grouped by the
  two leading "instruction type" bits:

  ```text
      00  no operand and one operand
      01  two and three operand ALU
      10  memory
      11  branch and change of control
  ```
*/
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u16)]
pub enum Operation {
  // Zero and one operand //
  #[strum(serialize = "NOP")]  Nop  = 0b00_000_0_0_000,
  #[strum(serialize = "HLT")]  Hlt  = 0b00_001_0_0_000,
  #[strum(serialize = "SETC")] Setc = 0b00_010_0_0_000,
  #[strum(serialize = "NOT")]  Not  = 0b00_011_0_0_100,
  #[strum(serialize = "INC")]  Inc  = 0b00_100_0_0_100,
  #[strum(serialize = "OUT")]  Out  = 0b00_101_0_0_100,
  #[strum(serialize = "IN")]   In   = 0b00_110_0_0_100,

  // Two and three operand //
  #[strum(serialize = "MOV")]  Mov  = 0b01_000_0_0_110,
  #[strum(serialize = "SWAP")] Swap = 0b01_001_0_0_110,
  #[strum(serialize = "ADD")]  Add  = 0b01_010_0_0_111,
  #[strum(serialize = "SUB")]  Sub  = 0b01_011_0_0_111,
  #[strum(serialize = "AND")]  And  = 0b01_100_0_0_111,
  #[strum(serialize = "IADD")] Iadd = 0b01_101_0_1_110,

  // Memory //
  #[strum(serialize = "PUSH")] Push = 0b10_000_0_0_100,
  #[strum(serialize = "POP")]  Pop  = 0b10_001_0_0_100,
  #[strum(serialize = "LDM")]  Ldm  = 0b10_010_0_1_100,
  #[strum(serialize = "LDD")]  Ldd  = 0b10_011_1_0_110,
  #[strum(serialize = "STD")]  Std  = 0b10_100_1_0_011,

  // Branch and change of control //
  #[strum(serialize = "JZ")]   Jz   = 0b11_000_0_1_000,
  #[strum(serialize = "JN")]   Jn   = 0b11_001_0_1_000,
  #[strum(serialize = "JC")]   Jc   = 0b11_010_0_1_000,
  #[strum(serialize = "JMP")]  Jmp  = 0b11_011_0_1_000,
  #[strum(serialize = "CALL")] Call = 0b11_100_0_1_000,
  #[strum(serialize = "RET")]  Ret  = 0b11_101_0_0_000,
  #[strum(serialize = "INT")]  Int  = 0b11_110_0_1_000,
  #[strum(serialize = "RTI")]  Rti  = 0b11_111_0_0_000,
}

impl Operation {
  pub fn code(&self) -> u16 {
    Into::<u16>::into(*self)
  }

  /// The opcode as it appears in a listing, always `OPCODE_BITS` characters wide.
  pub fn code_bits(&self) -> String {
    format!("{:0width$b}", self.code(), width = OPCODE_BITS as usize)
  }

  /// The operand shape of the operation. Every operation has exactly one.
  pub fn shape(&self) -> Shape {
    use Operation::*;

    match self {
      Nop | Hlt | Setc | Ret | Rti              => Shape::Nullary,
      Not | Inc | Out | In | Push | Pop         => Shape::Unary,
      Mov                                       => Shape::Move,
      Swap                                      => Shape::Swap,
      Add | Sub | And                           => Shape::Ternary,
      Iadd                                      => Shape::ImmediateAlu,
      Ldm                                       => Shape::LoadImmediate,
      Ldd                                       => Shape::LoadDisplaced,
      Std                                       => Shape::StoreDisplaced,
      Jz | Jn | Jc | Jmp | Call                 => Shape::Branch,
      Int                                       => Shape::Interrupt,
    }
  }
}

/// The operand shape classes. Each has a fixed field layout after the opcode.
#[derive(StrumDisplay, Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum Shape {
  /// [Op:10][Zero:22]
  Nullary,
  /// [Op:10][Rdst:3][Rdst:3][Zero:16]
  Unary,
  /// [Op:10][Rdst:3][Rsrc:3][Zero:16], written `MOV Rsrc, Rdst`
  Move,
  /// [Op:10][Zero:3][R1:3][R2:3][Zero:13]
  Swap,
  /// [Op:10][Rdst:3][R1:3][R2:3][Zero:13]
  Ternary,
  /// [Op:10][Rdst:3][Rsrc:3][Zero:16] [Imm:32]
  ImmediateAlu,
  /// [Op:10][Rdst:3][Zero:19] [Imm:32]
  LoadImmediate,
  /// [Op:10][Rdst:3][Rsrc:3][Zero:16] [Offset:32], written `LDD Rdst, offset(Rsrc)`
  LoadDisplaced,
  /// [Op:10][Zero:3][R1:3][R2:3][Zero:13] [Offset:32], written `STD R1, offset(R2)`
  StoreDisplaced,
  /// [Op:10][Zero:22] [Target:32]
  Branch,
  /// [Op:10][Zero:21][Index:1]
  Interrupt,
}

impl Shape {
  /// The number of operand tokens the shape takes after the mnemonic.
  pub fn arity(&self) -> usize {
    match self {
      Shape::Nullary => 0,
      Shape::Unary | Shape::Branch | Shape::Interrupt => 1,
      Shape::Move | Shape::Swap | Shape::LoadImmediate => 2,
      Shape::Ternary | Shape::ImmediateAlu | Shape::LoadDisplaced | Shape::StoreDisplaced => 3,
    }
  }

  /// The number of memory words an instruction of this shape occupies.
  pub fn word_count(&self) -> usize {
    match self {
      Shape::ImmediateAlu
      | Shape::LoadImmediate
      | Shape::LoadDisplaced
      | Shape::StoreDisplaced
      | Shape::Branch => 2,
      _ => 1
    }
  }
}

/// The eight architectural registers. The discriminant is the 3 bit register field.
#[derive(
StrumDisplay, IntoStaticStr, EnumString, EnumIter, TryFromPrimitive, IntoPrimitive,
Clone,        Copy,          Eq,         PartialEq, Debug,            Hash
)]
#[repr(u8)]
pub enum Register {
  R0 = 0b000,
  R1 = 0b001,
  R2 = 0b010,
  R3 = 0b011,
  R4 = 0b100,
  R5 = 0b101,
  R6 = 0b110,
  R7 = 0b111,
}

impl Register {
  pub fn index(&self) -> u8 {
    Into::<u8>::into(*self)
  }
}

/// A software interrupt takes a single bit index.
#[derive(Clone, Copy, Eq, PartialEq, Debug, Hash)]
pub enum InterruptIndex {
  Zero,
  One
}

impl InterruptIndex {
  pub fn bit(&self) -> Word {
    match self {
      InterruptIndex::Zero => 0,
      InterruptIndex::One  => 1
    }
  }
}

/// Holds the unencoded components of an instruction. There is one variant per operand shape,
/// so the variant alone decides the field layout. Immediates are already masked to a `Word`.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub enum Instruction {
  Nullary(Operation),
  Unary {
    opcode: Operation,
    register: Register
  },
  Move {
    opcode: Operation,
    destination: Register,
    source: Register
  },
  Swap {
    opcode: Operation,
    first: Register,
    second: Register
  },
  Ternary {
    opcode: Operation,
    destination: Register,
    first: Register,
    second: Register
  },
  ImmediateAlu {
    opcode: Operation,
    destination: Register,
    source: Register,
    immediate: Word
  },
  LoadImmediate {
    opcode: Operation,
    destination: Register,
    immediate: Word
  },
  LoadDisplaced {
    opcode: Operation,
    destination: Register,
    base: Register,
    offset: Word
  },
  StoreDisplaced {
    opcode: Operation,
    source: Register,
    base: Register,
    offset: Word
  },
  Branch {
    opcode: Operation,
    target: Word
  },
  Interrupt {
    opcode: Operation,
    index: InterruptIndex
  },
}

impl Instruction {
  pub fn operation(&self) -> Operation {
    match self {
      Instruction::Nullary(opcode)                 => *opcode,
      Instruction::Unary { opcode, .. }
      | Instruction::Move { opcode, .. }
      | Instruction::Swap { opcode, .. }
      | Instruction::Ternary { opcode, .. }
      | Instruction::ImmediateAlu { opcode, .. }
      | Instruction::LoadImmediate { opcode, .. }
      | Instruction::LoadDisplaced { opcode, .. }
      | Instruction::StoreDisplaced { opcode, .. }
      | Instruction::Branch { opcode, .. }
      | Instruction::Interrupt { opcode, .. }      => *opcode,
    }
  }
}

// Immediates are printed as the signed value they were most likely written as.
impl Display for Instruction {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    match self {

      Instruction::Nullary(opcode) => {
        write!(f, "{}", opcode)
      }

      Instruction::Unary { opcode, register } => {
        write!(f, "{} {}", opcode, register)
      }

      Instruction::Move { opcode, destination, source } => {
        write!(f, "{} {}, {}", opcode, source, destination)
      }

      Instruction::Swap { opcode, first, second } => {
        write!(f, "{} {}, {}", opcode, first, second)
      }

      Instruction::Ternary { opcode, destination, first, second } => {
        write!(f, "{} {}, {}, {}", opcode, destination, first, second)
      }

      Instruction::ImmediateAlu { opcode, destination, source, immediate } => {
        write!(f, "{} {}, {}, {}", opcode, destination, source, *immediate as i32)
      }

      Instruction::LoadImmediate { opcode, destination, immediate } => {
        write!(f, "{} {}, {}", opcode, destination, *immediate as i32)
      }

      Instruction::LoadDisplaced { opcode, destination, base, offset } => {
        write!(f, "{} {}, {}({})", opcode, destination, *offset as i32, base)
      }

      Instruction::StoreDisplaced { opcode, source, base, offset } => {
        write!(f, "{} {}, {}({})", opcode, source, *offset as i32, base)
      }

      Instruction::Branch { opcode, target } => {
        write!(f, "{} {:#x}", opcode, target)
      }

      Instruction::Interrupt { opcode, index } => {
        write!(f, "{} {}", opcode, index.bit())
      }

    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;
  use std::convert::TryFrom;
  use std::str::FromStr;
  use strum::IntoEnumIterator;

  #[test]
  fn opcode_bits(){
    assert_eq!(Operation::Mov.code_bits(), "0100000110");
    assert_eq!(Operation::Iadd.code_bits(), "0110101110");
    assert_eq!(Operation::Std.code_bits(), "1010010011");
    assert_eq!(Operation::Int.code_bits(), "1111001000");
    assert_eq!(Operation::Nop.code_bits(), "0000000000");
  }

  #[test]
  fn opcodes_are_distinct_and_fit(){
    let codes: Vec<u16> = Operation::iter().map(|op| op.code()).collect();
    assert_eq!(codes.len(), 26);
    for (i, code) in codes.iter().enumerate() {
      assert!(*code < (1 << OPCODE_BITS));
      assert!(!codes[i + 1..].contains(code));
      assert_eq!(Operation::try_from(*code).ok(), Operation::iter().nth(i));
    }
  }

  #[test]
  fn mnemonic_text(){
    assert_eq!(Operation::from_str("SETC"), Ok(Operation::Setc));
    assert_eq!(Operation::Call.to_string(), "CALL");
    assert!(Operation::from_str("setc").is_err());
    assert!(Operation::from_str("Setc").is_err());
  }

  #[test]
  fn register_indices(){
    assert_eq!(Register::from_str("R5"), Ok(Register::R5));
    assert_eq!(Register::R6.index(), 0b110);
    assert!(Register::from_str("R8").is_err());
    assert!(Register::from_str("r1").is_err());
  }

  #[test]
  fn shape_word_counts(){
    assert_eq!(Operation::Iadd.shape().word_count(), 2);
    assert_eq!(Operation::Int.shape().word_count(), 1);
    assert_eq!(Operation::Call.shape().word_count(), 2);
    assert_eq!(Operation::Ret.shape().word_count(), 1);
    assert_eq!(Operation::Std.shape().arity(), 3);
  }

  #[test]
  fn display_round_trips_syntax(){
    let ldd = Instruction::LoadDisplaced {
      opcode: Operation::Ldd,
      destination: Register::R1,
      base: Register::R2,
      offset: -4i32 as Word
    };
    assert_eq!(ldd.to_string(), "LDD R1, -4(R2)");

    let mov = Instruction::Move {
      opcode: Operation::Mov,
      destination: Register::R2,
      source: Register::R1
    };
    assert_eq!(mov.to_string(), "MOV R1, R2");
    assert_eq!(mov.operation(), Operation::Mov);
  }
}

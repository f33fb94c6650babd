//! Translation errors. Every error is fatal: the first one stops the assembler.

use thiserror::Error;

use crate::bytecode::Operation;

/// What went wrong, independent of where in the source it happened.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
pub enum ErrorKind {
  #[error("{name} is not an operation.")]
  UnknownMnemonic {
    name: String
  },

  #[error("{name} is not a register.")]
  UnknownRegister {
    name: String
  },

  #[error("malformed operand {operand:?}: {reason}.")]
  MalformedOperand {
    operand: String,
    reason: &'static str
  },

  #[error("{operation} requires {expected} operands but was given {found}: ({})", .args.join(", "))]
  WrongArity {
    operation: Operation,
    expected: usize,
    found: usize,
    args: Vec<String>
  },

  #[error("address {address} is outside of memory of {capacity} words.")]
  CursorOverflow {
    address: usize,
    capacity: usize
  },
}

/// An `ErrorKind` together with the source line that caused it.
#[derive(Error, Clone, Debug, Eq, PartialEq)]
#[error("Error on line {line}: {kind}\n    {text}")]
pub struct LineError {
  /// Line numbers count from 1.
  pub line: usize,
  pub text: String,
  pub kind: ErrorKind
}

impl LineError {
  pub fn new(line: usize, text: &str, kind: ErrorKind) -> LineError {
    LineError {
      line,
      text: text.trim_end().to_string(),
      kind
    }
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn line_error_message(){
    let error = LineError::new(
      3,
      "MOV R9, R1   \n",
      ErrorKind::UnknownRegister { name: "R9".to_string() }
    );
    assert_eq!(error.to_string(), "Error on line 3: R9 is not a register.\n    MOV R9, R1");
  }

  #[test]
  fn arity_message(){
    let kind = ErrorKind::WrongArity {
      operation: Operation::Add,
      expected: 3,
      found: 2,
      args: vec!["R1".to_string(), "R2".to_string()]
    };
    assert_eq!(kind.to_string(), "ADD requires 3 operands but was given 2: (R1, R2)");
  }
}

/*!
  The instruction catalog answers the two questions the assembler asks of the ISA: what is the
  opcode and operand shape of a mnemonic, and what is the index of a register. It is built once,
  on first use, and never changes afterward, so it can be shared freely.
*/

use std::collections::HashMap;
use std::str::FromStr;

use strum::IntoEnumIterator;

use super::{Operation, Register, Shape};
use crate::error::ErrorKind;

/// Everything the encoder needs to know about a mnemonic.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash)]
pub struct CatalogEntry {
  pub operation : Operation,
  pub opcode    : u16,
  pub shape     : Shape
}

lazy_static! {
  static ref CATALOG: HashMap<&'static str, CatalogEntry> =
    Operation::iter()
      .map(|operation| {
        let name: &'static str = operation.into();
        let entry = CatalogEntry {
          operation,
          opcode: operation.code(),
          shape: operation.shape()
        };
        (name, entry)
      })
      .collect();
}

/// Looks up a mnemonic. Mnemonics are case-insensitive.
pub fn lookup_operation(mnemonic: &str) -> Result<CatalogEntry, ErrorKind> {
  CATALOG
    .get(mnemonic.to_uppercase().as_str())
    .copied()
    .ok_or_else(|| ErrorKind::UnknownMnemonic { name: mnemonic.to_uppercase() })
}

/// Looks up a register by its exact name, `R0` through `R7`.
pub fn lookup_register(name: &str) -> Result<Register, ErrorKind> {
  Register::from_str(name).map_err(|_e| ErrorKind::UnknownRegister { name: name.to_string() })
}

/// The number of mnemonics the ISA defines.
pub fn len() -> usize {
  CATALOG.len()
}

/*!

  Instructions are one or two 32 bit words. The first word always begins with a 10 bit opcode,
  followed by up to three 3 bit register fields, and is zero filled to 32 bits:

    Opcode:   10 bits
    Register:  3 bits (R0-R7)
    Padding:  the remainder, always zero

  Instructions that take an immediate, an offset, or a branch target are followed in memory by
  a second word holding that value in 32 bit two's complement. The only instruction that uses
  the low bit of the first word is `INT`, whose index (0 or 1) is stored there.

  There are no labels or expressions. Every address and immediate is a literal, so each line
  can be encoded on its own without a second pass.

  The `Instruction` enum has one variant per operand shape rather than one per opcode. The shape
  of each opcode is fixed in `Operation::shape` and cached in the catalog, which keeps the
  arity of every mnemonic in exactly one place.

*/

mod binary;
mod instruction;
mod assembly;
pub mod catalog;

pub use binary::{encode_instruction, parse_integer, parse_literal, word_to_bits, bits_to_word,
                 EncodedInstruction, Word, WORD_BITS, OPCODE_BITS, REGISTER_BITS};
pub use instruction::{Instruction, InterruptIndex, Operation, Register, Shape};
pub use assembly::{clean_line, parse_line, tokenize, Syntax, COMMENT_MARKER, ORG_DIRECTIVE};
pub use catalog::CatalogEntry;

/*!
  The memory image is the assembler's output: a fixed number of 32 bit words, all zero until
  written. It can be dumped in two formats:

  - a flat dump, one 32 character binary word per line, in address order;
  - a memory initialization file (MIF) with a `WIDTH`/`DEPTH`/radix header.

  Both formats always include every address, written or not.
*/

use std::io::{self, Write};

use crate::address::Address;
use crate::bytecode::{word_to_bits, Word, WORD_BITS};
use crate::error::ErrorKind;

/// Word count used when none is configured.
pub const DEFAULT_CAPACITY: usize = 1024;

#[derive(Clone, Debug, Eq, PartialEq)]
pub struct MemoryImage {
  words: Vec<Word>
}

impl MemoryImage {

  pub fn new(capacity: usize) -> MemoryImage {
    MemoryImage {
      words: vec![0; capacity]
    }
  }

  pub fn capacity(&self) -> usize {
    self.words.len()
  }

  pub fn get(&self, address: Address) -> Option<Word> {
    self.words.get(address.idx()).copied()
  }

  /// Stores a word. Memory is left untouched if `address` is out of range.
  pub fn set(&mut self, address: Address, word: Word) -> Result<(), ErrorKind> {
    let capacity = self.capacity();
    match self.words.get_mut(address.idx()) {
      Some(slot) => {
        *slot = word;
        Ok(())
      }
      None => Err(ErrorKind::CursorOverflow { address: address.idx(), capacity })
    }
  }

  pub fn words(&self) -> &[Word] {
    &self.words
  }

  /// Writes the flat dump: one binary word per line, no header, no addresses.
  pub fn write_words<W: Write>(&self, out: &mut W) -> io::Result<()> {
    for word in &self.words {
      writeln!(out, "{}", word_to_bits(*word))?;
    }
    Ok(())
  }

  /// Writes the image as a memory initialization file.
  pub fn write_mif<W: Write>(&self, out: &mut W) -> io::Result<()> {
    writeln!(out, "WIDTH={};", WORD_BITS)?;
    writeln!(out, "DEPTH={};", self.capacity())?;
    writeln!(out, "ADDRESS_RADIX=UNS;")?;
    writeln!(out, "DATA_RADIX=BIN;")?;
    writeln!(out, "CONTENT BEGIN")?;
    for (address, word) in self.words.iter().enumerate() {
      writeln!(out, "  {} : {};", address, word_to_bits(*word))?;
    }
    writeln!(out, "END;")
  }
}

impl Default for MemoryImage {
  fn default() -> Self {
    MemoryImage::new(DEFAULT_CAPACITY)
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  fn small_image() -> MemoryImage {
    let mut image = MemoryImage::new(3);
    image.set(Address(1), 0b101).unwrap();
    image
  }

  #[test]
  fn starts_zeroed(){
    let image = MemoryImage::default();
    assert_eq!(image.capacity(), DEFAULT_CAPACITY);
    assert!(image.words().iter().all(|w| *w == 0));
  }

  #[test]
  fn set_out_of_range(){
    let mut image = MemoryImage::new(2);
    assert_eq!(image.set(Address(2), 1), Err(ErrorKind::CursorOverflow { address: 2, capacity: 2 }));
    assert_eq!(image.get(Address(2)), None);
    assert_eq!(image.words(), &[0, 0]);
  }

  #[test]
  fn flat_dump(){
    let mut out = Vec::new();
    small_image().write_words(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    assert_eq!(
      text,
      format!("{}\n{}\n{}\n", "0".repeat(32), format!("{}101", "0".repeat(29)), "0".repeat(32))
    );
  }

  #[test]
  fn mif_dump(){
    let mut out = Vec::new();
    small_image().write_mif(&mut out).unwrap();
    let text = String::from_utf8(out).unwrap();
    let expected = format!(
      "WIDTH=32;\nDEPTH=3;\nADDRESS_RADIX=UNS;\nDATA_RADIX=BIN;\nCONTENT BEGIN\n  0 : {zero};\n  1 : {five};\n  2 : {zero};\nEND;\n",
      zero = "0".repeat(32),
      five = format!("{}101", "0".repeat(29))
    );
    assert_eq!(text, expected);
  }
}

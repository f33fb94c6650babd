//! The translation session. An `Assembler` owns the memory image and the write cursor and
//! feeds source lines through the parser and encoder in order, stopping at the first error.

use std::fmt::{Display, Formatter};

#[cfg(feature = "trace_assembly")]
use prettytable::{format as TableFormat, Table};
use tracing::{debug, info, trace};

use crate::address::Address;
use crate::bytecode::{encode_instruction, parse_line, word_to_bits, EncodedInstruction, Syntax};
#[cfg(feature = "trace_assembly")]
use crate::bytecode::Word;
use crate::error::{ErrorKind, LineError};
use crate::image::MemoryImage;

/// One written word, remembered for the listing.
#[cfg(feature = "trace_assembly")]
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ListingEntry {
  pub address : Address,
  pub word    : Word,
  pub line    : usize,
  pub source  : String
}

pub struct Assembler {
  image  : MemoryImage,
  cursor : Address, // Next address to write, a cursor
  written: usize,   // Words written so far, counting rewrites of the same address

  // Every word written, in the order written:
  #[cfg(feature = "trace_assembly")] listing : Vec<ListingEntry>
}

impl Assembler {

  pub fn new(capacity: usize) -> Assembler {
    Assembler {
      image  : MemoryImage::new(capacity),
      cursor : Address::default(),
      written: 0,
      #[cfg(feature = "trace_assembly")] listing : Vec::new()
    }
  }

  pub fn cursor(&self) -> Address {
    self.cursor
  }

  /// Moves the write cursor. The cursor may point one past the last word, but no further.
  pub fn set_cursor(&mut self, address: Address) -> Result<(), ErrorKind> {
    if !address.fits(0, self.image.capacity()) {
      return Err(ErrorKind::CursorOverflow {
        address: address.idx(),
        capacity: self.image.capacity()
      });
    }
    self.cursor = address;
    Ok(())
  }

  pub fn image(&self) -> &MemoryImage {
    &self.image
  }

  pub fn into_image(self) -> MemoryImage {
    self.image
  }

  pub fn written(&self) -> usize {
    self.written
  }

  #[cfg(feature = "trace_assembly")]
  pub fn listing(&self) -> &[ListingEntry] {
    &self.listing
  }

  /// Assembles a whole program. Lines are numbered from 1.
  pub fn assemble(&mut self, text: &str) -> Result<(), LineError> {
    for (i, line) in text.lines().enumerate() {
      self.assemble_line(i + 1, line)?;
    }
    info!(words = self.written, cursor = self.cursor.idx(), "assembly finished");
    Ok(())
  }

  /// Assembles a single source line at the current cursor and returns the number of words
  /// written.
  pub fn assemble_line(&mut self, line_number: usize, line: &str) -> Result<usize, LineError> {
    let result =
      match parse_line(line) {
        Ok(Some(syntax)) => self.apply(&syntax, line_number),
        Ok(None) => Ok(0),
        Err(kind) => Err(kind)
      };
    result.map_err(|kind| LineError::new(line_number, line, kind))
  }

  fn apply(&mut self, syntax: &Syntax, line_number: usize) -> Result<usize, ErrorKind> {
    match syntax {

      Syntax::Org(address) => {
        trace!(line = line_number, from = self.cursor.idx(), to = *address, "repositioning cursor");
        self.set_cursor(Address(*address))?;
        Ok(0)
      }

      Syntax::Instruction(instruction) => {
        let encoded = encode_instruction(instruction);
        self.write(&encoded)?;

        #[cfg(feature = "trace_assembly")]
        self.record(&encoded, line_number, instruction.to_string());

        Ok(encoded.len())
      }

    }
  }

  /// Writes every word of `encoded` or, if they do not all fit, none of them.
  fn write(&mut self, encoded: &EncodedInstruction) -> Result<(), ErrorKind> {
    let capacity = self.image.capacity();
    if !self.cursor.fits(encoded.len(), capacity) {
      return Err(ErrorKind::CursorOverflow {
        address: self.cursor.idx() + encoded.len() - 1,
        capacity
      });
    }

    for word in encoded.words() {
      debug!(address = self.cursor.idx(), word = %word_to_bits(word), "write");
      self.image.set(self.cursor, word)?;
      self.cursor = self.cursor + 1;
      self.written += 1;
    }
    Ok(())
  }

  #[cfg(feature = "trace_assembly")]
  fn record(&mut self, encoded: &EncodedInstruction, line: usize, source: String) {
    let words = encoded.words();
    let start = self.cursor.idx() - words.len();
    for (i, word) in words.into_iter().enumerate() {
      let source = match i {
        0 => source.clone(),
        _ => format!("  {}", word as i32)
      };
      self.listing.push(ListingEntry { address: Address(start + i), word, line, source });
    }
  }
}

#[cfg(feature = "trace_assembly")]
lazy_static! {
  static ref TABLE_DISPLAY_FORMAT: TableFormat::TableFormat =
    TableFormat::FormatBuilder::new()
      .column_separator('│')
      .borders(' ')
      .separator(
        TableFormat::LinePosition::Title,
        TableFormat::LineSeparator::new('─', '┼', ' ', ' ')
      )
      .separator(
        TableFormat::LinePosition::Bottom,
        TableFormat::LineSeparator::new('─', '┴', ' ', ' ')
      )
      .padding(1, 1)
      .build();
}

impl Display for Assembler {

  // The listing is only available if `trace_assembly` is on.
  #[cfg(feature = "trace_assembly")]
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    let mut table = Table::new();

    table.set_format(*TABLE_DISPLAY_FORMAT);
    table.set_titles(row![ubr->"Address", ub->"Word", ubr->"Line", ubl->"Source"]);

    for entry in &self.listing {
      table.add_row(
        row![
          r->entry.address.idx(),
          word_to_bits(entry.word),
          r->entry.line,
          entry.source
        ]
      );
    }

    write!(
      f,
      "{} words written, cursor at {} of {}\n{}",
      self.written, self.cursor, self.image.capacity(), table
    )
  }

  #[cfg(not(feature = "trace_assembly"))]
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(
      f,
      "{} words written, cursor at {} of {}",
      self.written, self.cursor, self.image.capacity()
    )
  }
}

//! An assembler for a small fixed-format ISA. Each source line is translated on its own into
//! one or two 32 bit words written into a fixed size memory image, which can then be dumped as
//! plain binary text or as a memory initialization file.

#[cfg(feature = "trace_assembly")]
#[macro_use] extern crate prettytable;
#[macro_use] extern crate lazy_static;

pub mod address;
pub mod assembler;
pub mod bytecode;
pub mod error;
pub mod image;

pub use assembler::Assembler;
pub use error::{ErrorKind, LineError};
pub use image::{MemoryImage, DEFAULT_CAPACITY};

//! Word addresses into the memory image, with some convenience functions. The write cursor of
//! the assembler is an `Address`.

use std::ops::Add;
use std::fmt::{Display, Formatter};

// `AddressNumberType` is `usize`, as it is naturally an index into a memory store.
pub type AddressNumberType = usize;

#[derive(Copy, Clone, Ord, PartialOrd, Eq, PartialEq, Hash, Debug, Default)]
pub struct Address(pub AddressNumberType);

impl Address {
  /// Converts the address to an index into the memory vector.
  pub fn idx(&self) -> AddressNumberType {
    self.0
  }

  /// Whether a block of `length` words starting here fits in a memory of `capacity` words.
  pub fn fits(&self, length: usize, capacity: usize) -> bool {
    match self.0.checked_add(length) {
      Some(end) => end <= capacity,
      None => false
    }
  }
}

impl Display for Address {
  fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
    write!(f, "MEM[{}]", self.0)
  }
}

impl From<AddressNumberType> for Address {
  fn from(idx: AddressNumberType) -> Address {
    Address(idx)
  }
}

// Increment an address
impl Add<AddressNumberType> for Address {
  type Output = Address;
  fn add(self, rhs: AddressNumberType) -> Address {
    Address(self.0 + rhs)
  }
}


#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn fits_in_capacity(){
    assert!(Address(0).fits(2, 2));
    assert!(Address(1023).fits(1, 1024));
    assert!(!Address(1023).fits(2, 1024));
    assert!(Address(1024).fits(0, 1024));
    assert!(!Address(usize::max_value()).fits(1, 1024));
  }

  #[test]
  fn increments(){
    assert_eq!(Address(4) + 2, Address(6));
    assert_eq!(Address::from(9).idx(), 9);
    assert_eq!(Address(3).to_string(), "MEM[3]");
  }
}

//! Fixed bit widths and two's-complement helpers.

use std::fmt;

use crate::error::{IrError, Result};

/// Bit width of an expression, between 1 and 64 bits.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Width(u8);

impl Width {
    /// Result width of comparisons and boolean operators.
    pub const BOOL: Width = Width(1);
    pub const W8: Width = Width(8);
    pub const W16: Width = Width(16);
    pub const W32: Width = Width(32);
    pub const W64: Width = Width(64);

    /// Creates a width from a bit count.
    pub fn new(bits: u32) -> Result<Self> {
        if (1..=64).contains(&bits) {
            Ok(Self(bits as u8))
        } else {
            Err(IrError::UnsupportedWidth(bits))
        }
    }

    /// Number of bits.
    pub const fn bits(self) -> u32 {
        self.0 as u32
    }

    /// Mask with the low `bits()` bits set.
    pub const fn mask(self) -> u64 {
        if self.0 >= 64 {
            u64::MAX
        } else {
            (1u64 << self.0) - 1
        }
    }

    /// Reduces a value modulo 2^bits, returning the unsigned representative.
    pub fn truncate(self, value: i128) -> u64 {
        // `as u64` keeps the low 64 bits of the two's-complement encoding.
        (value as u64) & self.mask()
    }

    /// Keeps `value` if it is representable at this width as either a signed
    /// or an unsigned integer, otherwise wraps it to the unsigned range.
    pub fn normalize(self, value: i128) -> i128 {
        let bits = self.bits();
        let min = -(1i128 << (bits - 1));
        let max = (1i128 << bits) - 1;
        if (min..=max).contains(&value) {
            value
        } else {
            self.truncate(value) as i128
        }
    }

    /// Widths used by the property tests and the fuzzer.
    pub fn common() -> &'static [Width] {
        &[Width::W8, Width::W16, Width::W32, Width::W64]
    }
}

impl fmt::Display for Width {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "i{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_rejects_out_of_range() {
        assert_eq!(Width::new(0), Err(IrError::UnsupportedWidth(0)));
        assert_eq!(Width::new(65), Err(IrError::UnsupportedWidth(65)));
        assert_eq!(Width::new(32), Ok(Width::W32));
    }

    #[test]
    fn test_mask() {
        assert_eq!(Width::BOOL.mask(), 1);
        assert_eq!(Width::W8.mask(), 0xff);
        assert_eq!(Width::W32.mask(), 0xffff_ffff);
        assert_eq!(Width::W64.mask(), u64::MAX);
    }

    #[test]
    fn test_truncate_wraps_negative() {
        assert_eq!(Width::W8.truncate(-1), 0xff);
        assert_eq!(Width::W32.truncate(-8), 0xffff_fff8);
        assert_eq!(Width::W16.truncate(0x1_0005), 5);
        assert_eq!(Width::W64.truncate(-1), u64::MAX);
    }

    #[test]
    fn test_normalize() {
        // Representable values are left alone, in either signedness.
        assert_eq!(Width::W8.normalize(-5), -5);
        assert_eq!(Width::W8.normalize(200), 200);
        assert_eq!(Width::W8.normalize(-128), -128);
        // Out of range values wrap.
        assert_eq!(Width::W8.normalize(256 + 3), 3);
        assert_eq!(Width::W8.normalize(-129), 127);
    }
}

// this_file: crates/gridfont-core/src/fixed.rs

//! 26.6 fixed-point helpers
//!
//! Sub-pixel arithmetic at the rasterizer boundary uses the classic 26.6
//! format: 26 integer bits, 6 fractional bits, 64 units to the pixel. The
//! portable backend converts sizes through this type so its rounding
//! matches what a fixed-point rasterizer would produce.

use std::ops::{Add, Neg, Sub};

#[derive(Copy, Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[repr(transparent)]
pub struct F26Dot6(i32);

impl F26Dot6 {
    pub const FRAC_BITS: u32 = 6;
    pub const FRAC_MASK: i32 = (1 << Self::FRAC_BITS) - 1;
    pub const ONE: F26Dot6 = F26Dot6(1 << Self::FRAC_BITS);
    pub const ZERO: F26Dot6 = F26Dot6(0);
    pub const HALF: F26Dot6 = F26Dot6(1 << (Self::FRAC_BITS - 1));

    #[inline]
    pub const fn from_int(x: i32) -> Self {
        F26Dot6(x << Self::FRAC_BITS)
    }

    #[inline]
    pub fn from_f32(x: f32) -> Self {
        F26Dot6((x * 64.0) as i32)
    }

    #[inline]
    pub const fn to_int(self) -> i32 {
        self.0 >> Self::FRAC_BITS
    }

    /// Round to nearest, halves away from zero for positive values.
    #[inline]
    pub const fn to_int_round(self) -> i32 {
        (self.0 + Self::HALF.0) >> Self::FRAC_BITS
    }

    #[inline]
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / 64.0
    }

    #[inline]
    pub const fn floor(self) -> F26Dot6 {
        F26Dot6(self.0 & !Self::FRAC_MASK)
    }

    #[inline]
    pub const fn ceil(self) -> F26Dot6 {
        if self.0 & Self::FRAC_MASK == 0 {
            self
        } else {
            F26Dot6((self.0 & !Self::FRAC_MASK) + Self::ONE.0)
        }
    }

    #[inline]
    pub const fn raw(self) -> i32 {
        self.0
    }

    #[inline]
    pub const fn from_raw(raw: i32) -> Self {
        F26Dot6(raw)
    }
}

impl Add for F26Dot6 {
    type Output = F26Dot6;
    fn add(self, rhs: Self) -> Self {
        F26Dot6(self.0 + rhs.0)
    }
}

impl Sub for F26Dot6 {
    type Output = F26Dot6;
    fn sub(self, rhs: Self) -> Self {
        F26Dot6(self.0 - rhs.0)
    }
}

impl Neg for F26Dot6 {
    type Output = F26Dot6;
    fn neg(self) -> Self {
        F26Dot6(-self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn conversion_round_trips() {
        assert_eq!(F26Dot6::from_int(5).to_int(), 5);
        assert_eq!(F26Dot6::from_f32(5.5).raw(), 5 * 64 + 32);
        assert!((F26Dot6::from_f32(12.25).to_f32() - 12.25).abs() < f32::EPSILON);
    }

    #[test]
    fn rounding_behaves() {
        assert_eq!(F26Dot6::from_f32(2.49).to_int_round(), 2);
        assert_eq!(F26Dot6::from_f32(2.5).to_int_round(), 3);
        assert_eq!(F26Dot6::from_f32(2.9).floor().to_int(), 2);
        assert_eq!(F26Dot6::from_f32(2.1).ceil().to_int(), 3);
        assert_eq!(F26Dot6::from_int(3).ceil(), F26Dot6::from_int(3));
    }

    #[test]
    fn arithmetic_stays_in_fixed_space() {
        let a = F26Dot6::from_f32(1.5);
        let b = F26Dot6::from_f32(0.25);
        assert_eq!((a + b).to_f32(), 1.75);
        assert_eq!((a - b).to_f32(), 1.25);
        assert_eq!((-a).to_f32(), -1.5);
    }
}

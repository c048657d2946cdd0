//! The 10.6 fixed point type used for IBMF metrics.

use core::ops::{Add, AddAssign, Neg, Sub, SubAssign};

/// 16-bit signed fixed point number with 6 bits of fraction.
///
/// Advance widths, the x-height, em size, slant correction and kerning
/// displacements are all stored in this representation.
#[derive(Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Default, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Fix16(i16);

impl Fix16 {
    /// Minimum value.
    pub const MIN: Self = Self(i16::MIN);

    /// Maximum value.
    pub const MAX: Self = Self(i16::MAX);

    /// Zero.
    pub const ZERO: Self = Self(0);

    /// One.
    pub const ONE: Self = Self(1 << Self::FRACT_BITS);

    /// This type's smallest representable value
    pub const EPSILON: Self = Self(1);

    /// The smallest value that fits the 14-bit kerning field.
    pub const KERN_MIN: Self = Self(-(1 << 13));

    /// The largest value that fits the 14-bit kerning field.
    pub const KERN_MAX: Self = Self((1 << 13) - 1);

    const FRACT_BITS: u32 = 6;
    const INT_MASK: i16 = !0 << Self::FRACT_BITS;
    const ROUND: i16 = 1 << (Self::FRACT_BITS - 1);
    const KERN_MASK: u16 = 0x3FFF;

    /// Creates a new value from its raw bit representation.
    pub const fn from_bits(bits: i16) -> Self {
        Self(bits)
    }

    /// Returns the raw bit representation.
    pub const fn to_bits(self) -> i16 {
        self.0
    }

    /// Creates a value from an integer, saturating on overflow.
    pub const fn from_i32(value: i32) -> Self {
        let scaled = value.saturating_mul(1 << Self::FRACT_BITS);
        if scaled > i16::MAX as i32 {
            Self::MAX
        } else if scaled < i16::MIN as i32 {
            Self::MIN
        } else {
            Self(scaled as i16)
        }
    }

    /// Creates a value from a float, saturating on overflow.
    pub fn from_f32(value: f32) -> Self {
        let scaled = value * (1 << Self::FRACT_BITS) as f32;
        // `as` saturates for floats
        let rounded = if scaled < 0.0 {
            scaled - 0.5
        } else {
            scaled + 0.5
        };
        Self(rounded as i16)
    }

    /// Returns the value as a float.
    pub fn to_f32(self) -> f32 {
        self.0 as f32 / (1 << Self::FRACT_BITS) as f32
    }

    /// Returns the nearest integer value.
    pub fn round(self) -> Self {
        Self(self.0.wrapping_add(Self::ROUND) & Self::INT_MASK)
    }

    /// Returns the integer part, rounded to the nearest integer.
    pub fn to_i32(self) -> i32 {
        (self.0 as i32 + Self::ROUND as i32) >> Self::FRACT_BITS
    }

    /// Returns the largest integer less than or equal to the number.
    pub fn floor(self) -> Self {
        Self(self.0 & Self::INT_MASK)
    }

    /// Returns the absolute value of the number.
    pub fn abs(self) -> Self {
        Self(self.0.saturating_abs())
    }

    /// Saturating addition.
    pub fn saturating_add(self, other: Self) -> Self {
        Self(self.0.saturating_add(other.0))
    }

    /// Saturating subtraction.
    pub fn saturating_sub(self, other: Self) -> Self {
        Self(self.0.saturating_sub(other.0))
    }

    /// Decodes a kerning displacement from its 14-bit two's complement field.
    ///
    /// Only the low 14 bits of `bits` are considered; the two flag bits that
    /// share the word are ignored.
    pub const fn from_kern_bits(bits: u16) -> Self {
        Self((((bits & Self::KERN_MASK) << 2) as i16) >> 2)
    }

    /// Encodes this value into a 14-bit two's complement field.
    ///
    /// Returns `None` if the value is outside of
    /// [`KERN_MIN`](Self::KERN_MIN)..=[`KERN_MAX`](Self::KERN_MAX).
    pub const fn to_kern_bits(self) -> Option<u16> {
        if self.0 < Self::KERN_MIN.0 || self.0 > Self::KERN_MAX.0 {
            return None;
        }
        Some(self.0 as u16 & Self::KERN_MASK)
    }

    /// Clamps the value into the range representable by the kerning field.
    pub fn clamp_kern(self) -> Self {
        Self(self.0.clamp(Self::KERN_MIN.0, Self::KERN_MAX.0))
    }
}

impl Add for Fix16 {
    type Output = Self;
    #[inline(always)]
    fn add(self, other: Self) -> Self {
        // same overflow semantics as std: panic in debug, wrap in release
        Self(self.0 + other.0)
    }
}

impl AddAssign for Fix16 {
    fn add_assign(&mut self, other: Self) {
        *self = *self + other;
    }
}

impl Sub for Fix16 {
    type Output = Self;
    #[inline(always)]
    fn sub(self, other: Self) -> Self {
        Self(self.0 - other.0)
    }
}

impl SubAssign for Fix16 {
    fn sub_assign(&mut self, other: Self) {
        *self = *self - other;
    }
}

impl Neg for Fix16 {
    type Output = Self;
    fn neg(self) -> Self {
        Self(-self.0)
    }
}

impl core::fmt::Debug for Fix16 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

impl core::fmt::Display for Fix16 {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "{}", self.to_f32())
    }
}

crate::newtype_scalar!(Fix16, [u8; 2]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn integer_conversions() {
        assert_eq!(Fix16::from_i32(3).to_bits(), 3 << 6);
        assert_eq!(Fix16::from_i32(-2).to_i32(), -2);
        assert_eq!(Fix16::from_i32(10_000), Fix16::MAX);
        assert_eq!(Fix16::from_bits(0x60).to_i32(), 2);
        assert_eq!(Fix16::from_f32(1.5).to_bits(), 96);
        assert_eq!(Fix16::from_f32(-0.25).to_bits(), -16);
    }

    #[test]
    fn kern_field_sign_extension() {
        for bits in [0i16, 1, -1, 64, -64, 8191, -8192] {
            let value = Fix16::from_bits(bits);
            let encoded = value.to_kern_bits().unwrap();
            assert_eq!(encoded & 0xC000, 0);
            assert_eq!(Fix16::from_kern_bits(encoded), value);
            // flag bits sharing the word must not leak into the value
            assert_eq!(Fix16::from_kern_bits(encoded | 0x8000), value);
        }
        assert_eq!(Fix16::from_bits(8192).to_kern_bits(), None);
        assert_eq!(Fix16::from_bits(-8193).to_kern_bits(), None);
        assert_eq!(Fix16::from_bits(9000).clamp_kern(), Fix16::KERN_MAX);
    }

    #[test]
    fn rounding() {
        assert_eq!(Fix16::from_f32(2.5).round(), Fix16::from_i32(3));
        assert_eq!(Fix16::from_f32(2.25).floor(), Fix16::from_i32(2));
        assert_eq!(Fix16::from_i32(-3).abs(), Fix16::from_i32(3));
    }
}

/// Packing parameters of a run-length compressed glyph.
///
/// Bits 0-3 hold the packing parameter `dyn_f`, bit 4 is set when the first
/// run of the bitmap is black. The remaining bits are unused.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RleMetrics(u8);

impl RleMetrics {
    /// The `dyn_f` value marking an uncompressed, one bit per pixel bitmap.
    pub const RAW_DYN_F: u8 = 14;

    const DYN_F_MASK: u8 = 0x0F;
    const FIRST_IS_BLACK: u8 = 0x10;

    /// Packs a `dyn_f` value and the first run colour.
    pub const fn new(dyn_f: u8, first_is_black: bool) -> Self {
        let black = if first_is_black {
            Self::FIRST_IS_BLACK
        } else {
            0
        };
        Self((dyn_f & Self::DYN_F_MASK) | black)
    }

    /// Construct from the raw byte.
    pub const fn from_bits(bits: u8) -> Self {
        Self(bits)
    }

    /// The raw byte.
    pub const fn to_bits(self) -> u8 {
        self.0
    }

    /// The packing parameter, `0..=13` for compressed data.
    pub const fn dyn_f(self) -> u8 {
        self.0 & Self::DYN_F_MASK
    }

    /// `true` if the first decoded run is black.
    pub const fn first_is_black(self) -> bool {
        self.0 & Self::FIRST_IS_BLACK != 0
    }

    /// `true` if the glyph is stored without compression.
    pub const fn is_raw(self) -> bool {
        self.dyn_f() == Self::RAW_DYN_F
    }
}

impl core::fmt::Debug for RleMetrics {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.debug_struct("RleMetrics")
            .field("dyn_f", &self.dyn_f())
            .field("first_is_black", &self.first_is_black())
            .finish()
    }
}

crate::newtype_scalar!(RleMetrics, [u8; 1]);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bit_layout() {
        let metrics = RleMetrics::new(9, true);
        assert_eq!(metrics.to_bits(), 0x19);
        assert_eq!(metrics.dyn_f(), 9);
        assert!(metrics.first_is_black());
        assert!(!metrics.is_raw());
        assert!(RleMetrics::new(RleMetrics::RAW_DYN_F, false).is_raw());
    }
}

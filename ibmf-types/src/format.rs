//! The character set model of a font file.

/// The format version written into new files.
pub const IBMF_VERSION: u8 = 4;

/// The character set model used by a font.
///
/// This is stored in the top three bits of the preamble's packed byte.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[repr(u8)]
pub enum FontFormat {
    /// A fixed 174 glyph alphabet covering ASCII, Latin-1 and Latin Extended-A.
    ///
    /// Accented letters are composed at render time from a base glyph and a
    /// mark glyph.
    #[default]
    Latin = 0,
    /// Code points are mapped to glyphs through plane and bundle tables.
    Utf32 = 1,
    /// Per-glyph backups of hand edited glyphs.
    Backup = 7,
}

/// The packed format value is not a known [`FontFormat`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct InvalidFontFormat(pub u8);

impl FontFormat {
    /// The raw three bit tag.
    pub const fn to_u8(self) -> u8 {
        self as u8
    }

    /// Returns `true` if faces in this format must share a glyph count.
    pub const fn has_uniform_glyph_count(self) -> bool {
        !matches!(self, FontFormat::Backup)
    }
}

impl TryFrom<u8> for FontFormat {
    type Error = InvalidFontFormat;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(FontFormat::Latin),
            1 => Ok(FontFormat::Utf32),
            7 => Ok(FontFormat::Backup),
            other => Err(InvalidFontFormat(other)),
        }
    }
}

impl core::fmt::Display for FontFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        let name = match self {
            FontFormat::Latin => "Latin",
            FontFormat::Utf32 => "UTF32",
            FontFormat::Backup => "Backup",
        };
        f.write_str(name)
    }
}

impl core::fmt::Display for InvalidFontFormat {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        write!(f, "invalid font format {}", self.0)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for InvalidFontFormat {}

//! selecting a glyph from the command line

use std::{fmt, str::FromStr};

use ibmf_types::GlyphCode;
use read_ibmf::Charmap;

/// A glyph, named by character, code point or glyph code.
///
/// Accepted forms are a single character (`A`), a code point (`U+00E9`) or a
/// glyph code (`#12`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum GlyphQuery {
    CodePoint(u32),
    Code(GlyphCode),
}

impl GlyphQuery {
    pub fn resolve(&self, charmap: &Charmap) -> GlyphCode {
        match self {
            GlyphQuery::CodePoint(cp) => charmap.map(*cp),
            GlyphQuery::Code(code) => *code,
        }
    }

    pub fn code_point(&self) -> Option<u32> {
        match self {
            GlyphQuery::CodePoint(cp) => Some(*cp),
            GlyphQuery::Code(_) => None,
        }
    }
}

impl fmt::Display for GlyphQuery {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GlyphQuery::CodePoint(cp) => write!(f, "U+{cp:04X}"),
            GlyphQuery::Code(code) => write!(f, "#{code}"),
        }
    }
}

impl FromStr for GlyphQuery {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if let Some(hex) = s.strip_prefix("U+").or_else(|| s.strip_prefix("u+")) {
            return u32::from_str_radix(hex, 16)
                .map(GlyphQuery::CodePoint)
                .map_err(|_| format!("invalid code point '{s}'"));
        }
        if let Some(code) = s.strip_prefix('#') {
            return code
                .parse::<u16>()
                .ok()
                .map(GlyphCode::new)
                .filter(|code| code.is_glyph())
                .map(GlyphQuery::Code)
                .ok_or_else(|| format!("invalid glyph code '{code}'"));
        }
        let mut chars = s.chars();
        match (chars.next(), chars.next()) {
            (Some(ch), None) => Ok(GlyphQuery::CodePoint(ch as u32)),
            (None, _) => Err("empty glyph query".into()),
            _ => Err(format!(
                "'{}' is not a character, code point or glyph code",
                s.escape_default()
            )),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse() {
        assert_eq!("A".parse(), Ok(GlyphQuery::CodePoint(0x41)));
        assert_eq!("é".parse(), Ok(GlyphQuery::CodePoint(0xE9)));
        assert_eq!("U+1F600".parse(), Ok(GlyphQuery::CodePoint(0x1F600)));
        assert_eq!("#12".parse(), Ok(GlyphQuery::Code(GlyphCode::new(12))));
        assert!("#32767".parse::<GlyphQuery>().is_err());
        assert!("U+XYZ".parse::<GlyphQuery>().is_err());
        assert!("AV".parse::<GlyphQuery>().is_err());
        assert!("".parse::<GlyphQuery>().is_err());
    }

    #[test]
    fn resolve_against_font() {
        let font = read_ibmf::FontRef::new(ibmf_test_data::UTF32_TWO_FACES).unwrap();
        let charmap = font.charmap().unwrap();
        let query: GlyphQuery = "V".parse().unwrap();
        assert_eq!(query.resolve(&charmap), GlyphCode::new(1));
        assert_eq!(query.to_string(), "U+0056");
        let query: GlyphQuery = "#2".parse().unwrap();
        assert_eq!(query.resolve(&charmap), GlyphCode::new(2));
        assert_eq!(query.code_point(), None);
    }
}

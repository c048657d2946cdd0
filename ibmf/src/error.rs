//! Errors raised by the font model

use read_ibmf::ReadError;
use write_ibmf::tables::planes::PlaneTableError;

use crate::GlyphCode;

/// An error raised while loading, editing or saving a font.
#[derive(Debug)]
pub enum Error {
    /// The font data could not be parsed.
    Read(ReadError),
    /// The font could not be compiled or written.
    Write(write_ibmf::error::Error),
    FaceOutOfRange(usize),
    GlyphOutOfRange {
        face: usize,
        glyph: GlyphCode,
    },
    /// The glyph has no code point and cannot be backed up.
    NoCodePoint(GlyphCode),
    Planes(PlaneTableError),
    /// The glyph source of an import failed.
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::Read(error) => write!(f, "failed to read font: {error}"),
            Error::Write(error) => write!(f, "failed to write font: {error}"),
            Error::FaceOutOfRange(face) => write!(f, "no face at index {face}"),
            Error::GlyphOutOfRange { face, glyph } => {
                write!(f, "face {face} has no glyph {glyph}")
            }
            Error::NoCodePoint(glyph) => write!(f, "glyph {glyph} has no code point"),
            Error::Planes(error) => error.fmt(f),
            Error::Source(error) => write!(f, "glyph source failed: {error}"),
        }
    }
}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::Read(error) => Some(error),
            Error::Write(error) => Some(error),
            Error::Planes(error) => Some(error),
            Error::Source(error) => Some(error.as_ref()),
            _ => None,
        }
    }
}

impl From<ReadError> for Error {
    fn from(error: ReadError) -> Self {
        Error::Read(error)
    }
}

impl From<write_ibmf::error::Error> for Error {
    fn from(error: write_ibmf::error::Error) -> Self {
        Error::Write(error)
    }
}

impl From<PlaneTableError> for Error {
    fn from(error: PlaneTableError) -> Self {
        Error::Planes(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Write(error.into())
    }
}

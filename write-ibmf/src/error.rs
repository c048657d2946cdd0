//! Errors that occur during writing

use types::GlyphCode;

use crate::validate::ValidationReport;

/// The lig/kern compiler could not keep every program entry point in range.
///
/// This signals a defect in the compiler rather than a problem with the
/// input.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CompilerInvariantError {
    pub(crate) message: String,
}

impl CompilerInvariantError {
    pub(crate) fn new(message: impl Into<String>) -> Self {
        CompilerInvariantError {
            message: message.into(),
        }
    }
}

/// An error occured while writing a font
#[derive(Debug)]
pub enum Error {
    ValidationFailed(ValidationReport),
    /// A glyph with a zero sized bitmap was passed to the encoder.
    EmptyBitmap(Option<GlyphCode>),
    CompilerInvariant(CompilerInvariantError),
    Io(std::io::Error),
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Error::ValidationFailed(report) => report.fmt(f),
            Error::EmptyBitmap(Some(glyph)) => write!(f, "glyph {glyph} has an empty bitmap"),
            Error::EmptyBitmap(None) => write!(f, "empty bitmap"),
            Error::CompilerInvariant(error) => error.fmt(f),
            Error::Io(error) => error.fmt(f),
        }
    }
}

impl std::fmt::Display for CompilerInvariantError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "lig/kern compiler invariant violated: {}", self.message)
    }
}

impl std::error::Error for CompilerInvariantError {}

impl std::error::Error for Error {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            Error::CompilerInvariant(error) => Some(error),
            Error::Io(error) => Some(error),
            _ => None,
        }
    }
}

impl From<ValidationReport> for Error {
    fn from(report: ValidationReport) -> Self {
        Error::ValidationFailed(report)
    }
}

impl From<CompilerInvariantError> for Error {
    fn from(error: CompilerInvariantError) -> Self {
        Error::CompilerInvariant(error)
    }
}

impl From<std::io::Error> for Error {
    fn from(error: std::io::Error) -> Self {
        Error::Io(error)
    }
}

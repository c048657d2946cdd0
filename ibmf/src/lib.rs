//! Loading, editing and saving IBMF bitmap fonts.
//!
//! This crate sits above the parsing provided by [`read-ibmf`](raw) and the
//! compilation provided by [`write-ibmf`](write). Its central type,
//! [`FontContainer`], owns a decoded copy of every face and glyph of a font.
//!
//! ```
//! use ibmf::{FontContainer, LigKern};
//!
//! let font = FontContainer::load(ibmf_test_data::UTF32_TWO_FACES).unwrap();
//! let a = font.translate('A');
//! let v = font.translate('V');
//! assert!(matches!(font.lig_kern(0, a, v), Ok(Some(LigKern::Kern(_)))));
//! ```

#![forbid(unsafe_code)]

/// Expose our underlying parser crate.
pub extern crate read_ibmf as raw;

/// Expose our underlying compiler crate.
pub extern crate write_ibmf as write;

mod backup;
mod container;
mod error;
mod import;

pub use backup::BackupSet;
pub use container::{FontContainer, LigKern};
pub use error::Error;
pub use import::{GlyphMetrics, GlyphSource, ImportedGlyph};

/// Type for a glyph code.
pub type GlyphCode = read_ibmf::types::GlyphCode;

/// Type for the 10.6 fixed point values used in metrics.
pub type Fix16 = read_ibmf::types::Fix16;

pub use read_ibmf::types::FontFormat;

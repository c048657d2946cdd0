//! Common scalar data types used in IBMF font files
//!
//! IBMF files store every multi-byte integer in little-endian order. The
//! [`LittleEndian`] wrapper and the [`Scalar`] trait describe how each type
//! maps to its raw bytes; the remaining types give meaning to the handful of
//! bit-packed and fixed point fields that appear in the format.

#![deny(rustdoc::broken_intra_doc_links)]
#![cfg_attr(not(feature = "std"), no_std)]

#[cfg(any(feature = "std", test))]
#[macro_use]
extern crate std;

#[cfg(all(not(feature = "std"), not(test)))]
#[macro_use]
extern crate core as std;

mod fixed;
mod format;
mod glyph_code;
mod raw;
mod rle_metrics;


pub use fixed::Fix16;
pub use format::{FontFormat, InvalidFontFormat, IBMF_VERSION};
pub use glyph_code::{GlyphCode, LATIN_GLYPH_CODE_MASK};
pub use raw::{FixedSize, LittleEndian, Scalar};
pub use rle_metrics::RleMetrics;

/// The four byte marker at the start of every IBMF file.
pub const IBMF_MARKER: [u8; 4] = *b"IBMF";

/// The `lig_kern_pgm_index` value of a glyph without a ligature/kerning program.
pub const NO_LIG_KERN_PGM: u8 = 255;

/// The number of glyphs in a font using the [`FontFormat::Latin`] character set.
pub const LATIN_GLYPH_COUNT: u16 = 174;

//! Reading IBMF bitmap font files
//!
//! This crate provides memory safe zero-allocation parsing of IBMF font
//! files. It attempts to provide raw access to the underlying data as it is
//! laid out on disk, along with the reference implementations of the
//! algorithms needed to make that data useful:
//!
//! - decoding the run-length compressed glyph bitmaps ([`rle`]),
//! - walking the shared ligature/kerning program ([`tables::lig_kern`]),
//! - mapping code points to glyph codes ([`charmap`]).
//!
//! For an editable, owned model of a font you may want to look into using
//! the `ibmf` crate instead. The `write-ibmf` crate is the companion crate
//! for creating font files.
//!
//! # Example
//!
//! ```no_run
//! # let path_to_my_font_file = std::path::Path::new("");
//! use read_ibmf::FontRef;
//! let font_bytes = std::fs::read(path_to_my_font_file).unwrap();
//! let font = FontRef::new(&font_bytes).expect("failed to read font data");
//! let face = font.face(0).expect("missing face");
//! println!("{} pt face with {} glyphs", face.header().point_size(), face.glyph_count());
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]
#![deny(rustdoc::broken_intra_doc_links)]

pub mod bitmap;
pub mod charmap;
mod font_data;
mod font_ref;
mod read;
pub mod rle;
pub mod tables;

#[cfg(any(test, feature = "test_helpers"))]
pub mod test_helpers;

pub use bitmap::{Bitmap, Canvas, PackedBitmap};
pub use charmap::Charmap;
pub use font_data::{Cursor, FontData};
pub use font_ref::FontRef;
pub use read::{FontRead, ReadError};
pub use rle::{DecodeError, RleBitmap};

/// Public re-export of the ibmf-types crate.
pub extern crate ibmf_types as types;

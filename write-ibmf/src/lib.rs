//! Writing IBMF bitmap font files
//!
//! This crate contains owned, editable versions of the structures found in an
//! IBMF file, along with the logic to compile them back into bytes.
//!
//! Compiling a face involves two passes that rebuild derived data from
//! scratch: every glyph bitmap is run-length encoded by [`rle::encode`] and
//! the per glyph ligature/kerning steps are merged into one shared program by
//! [`lig_kern::compile`].
//!
//! # Example
//!
//! ```
//! use write_ibmf::{
//!     read::{tables::lig_kern::GlyphLigKern, Bitmap},
//!     tables::face::{Face, FaceHeader, Glyph, GlyphInfo},
//!     types::{FontFormat, GlyphCode},
//!     FontBuilder,
//! };
//!
//! let glyph = Glyph {
//!     info: GlyphInfo::new(GlyphCode::new(0)),
//!     bitmap: Bitmap::from_ascii_rows(&["#"]),
//!     lig_kern: GlyphLigKern::default(),
//! };
//! let face = Face::new(FaceHeader::new(12, 75), vec![glyph]);
//! let mut builder = FontBuilder::new(FontFormat::Utf32);
//! builder.set_code_points([0x2022]).unwrap();
//! builder.add_face(&face).unwrap();
//! let bytes = builder.build();
//! assert!(write_ibmf::read::FontRef::new(&bytes).is_ok());
//! ```

#![cfg_attr(docsrs, feature(doc_auto_cfg))]

pub mod error;
mod font_builder;
pub mod from_obj;
pub mod lig_kern;
pub mod rle;
pub mod tables;
pub mod validate;
mod write;

pub use font_builder::FontBuilder;
pub use validate::{Validate, ValidationCtx, ValidationReport};
pub use write::{dump_table, FontWrite, TableWriter};

/// Public re-export of the read-ibmf crate.
pub extern crate read_ibmf as read;

/// Public re-export of the ibmf-types crate.
pub extern crate ibmf_types as types;

//! Keeping hand edited glyphs across font regenerations.
//!
//! A font is often rebuilt from its source (see
//! [`FontContainer::import`]), which would lose any glyph touched up by hand.
//! A [`BackupSet`] records such glyphs by code point so they can be applied
//! again to the new font, whatever its glyph numbering.

use read_ibmf::{
    tables::lig_kern::{GlyphKernStep, GlyphLigKern, GlyphLigStep},
    types::FontFormat,
    FontRef, ReadError,
};
use write_ibmf::{
    from_obj::TryFromObjRef,
    tables::backup::{BackupFace, BackupGlyph},
    FontBuilder,
};

use crate::{Error, FontContainer, GlyphCode};

/// The backed up glyphs of every face of a font.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BackupSet {
    faces: Vec<BackupFace>,
}

impl BackupSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn load(data: &[u8]) -> Result<Self, Error> {
        let font = FontRef::new(data)?;
        if font.format() != FontFormat::Backup {
            return Err(ReadError::UnsupportedFormat(font.format()).into());
        }
        let faces = (0..font.face_count())
            .map(|ix| BackupFace::try_from_obj_ref(&font.backup_face(ix)?))
            .collect::<Result<_, ReadError>>()?;
        Ok(BackupSet { faces })
    }

    pub fn to_bytes(&self) -> Result<Vec<u8>, Error> {
        let mut builder = FontBuilder::new(FontFormat::Backup);
        for face in &self.faces {
            builder.add_backup_face(face)?;
        }
        Ok(builder.build())
    }

    pub fn faces(&self) -> &[BackupFace] {
        &self.faces
    }

    /// `true` if no glyph was recorded.
    pub fn is_empty(&self) -> bool {
        self.faces.iter().all(BackupFace::is_empty)
    }

    pub fn get(&self, face: usize, code_point: u32) -> Option<&BackupGlyph> {
        self.faces.get(face)?.get(code_point)
    }

    /// Records the current state of a glyph, replacing an earlier record of
    /// the same code point.
    pub fn record(
        &mut self,
        font: &FontContainer,
        face: usize,
        glyph: GlyphCode,
    ) -> Result<(), Error> {
        let source = font.glyph(face, glyph)?;
        let code_point = font.code_point(glyph).ok_or(Error::NoCodePoint(glyph))?;
        while self.faces.len() <= face {
            let header = font.face_header(self.faces.len())?;
            self.faces.push(BackupFace::new(header.clone()));
        }
        let to_code_point = |code: GlyphCode| {
            let code_point = font.code_point(code);
            if code_point.is_none() {
                log::warn!("glyph {code} has no code point, dropped from backup of {glyph}");
            }
            code_point
        };
        let backup = BackupGlyph {
            info: source.info.clone(),
            bitmap: source.bitmap.clone(),
            ligatures: source
                .lig_kern
                .ligatures
                .iter()
                .filter_map(|lig| to_code_point(lig.next).zip(to_code_point(lig.replacement)))
                .collect(),
            kerns: source
                .lig_kern
                .kerns
                .iter()
                .filter_map(|kern| Some((to_code_point(kern.next)?, kern.kern)))
                .collect(),
        };
        self.faces[face].insert(code_point, backup);
        Ok(())
    }
}

impl FontContainer {
    /// Replaces glyphs with their backed up versions.
    ///
    /// Entries whose code point, or lig/kern partner, is not in the font are
    /// skipped. The main code of a restored glyph is kept from the font, as
    /// glyph codes of the backup may no longer be valid. Returns the number
    /// of glyphs restored.
    pub fn apply_backup(&mut self, backup: &BackupSet) -> Result<usize, Error> {
        let mut restored = 0;
        for (face, entries) in backup.faces.iter().enumerate().take(self.face_count()) {
            for (code_point, entry) in &entries.entries {
                let glyph = self.translate(*code_point);
                let Ok(current) = self.glyph(face, glyph) else {
                    log::debug!("face {face}: U+{code_point:04X} not in font, not restored");
                    continue;
                };
                let mut info = entry.info.clone();
                info.main_code = current.info.main_code;
                let lig_kern = self.lig_kern_from_code_points(face, entry);
                self.save_glyph(face, glyph, info, entry.bitmap.clone(), lig_kern)?;
                restored += 1;
            }
        }
        log::debug!("restored {restored} glyphs from backup");
        Ok(restored)
    }

    fn lig_kern_from_code_points(&self, face: usize, entry: &BackupGlyph) -> GlyphLigKern {
        let resolve = |code_point: u32| {
            let code = self.translate(code_point);
            self.glyph(face, code).is_ok().then_some(code)
        };
        GlyphLigKern {
            ligatures: entry
                .ligatures
                .iter()
                .filter_map(|(next, replacement)| {
                    Some(GlyphLigStep {
                        next: resolve(*next)?,
                        replacement: resolve(*replacement)?,
                    })
                })
                .collect(),
            kerns: entry
                .kerns
                .iter()
                .filter_map(|(next, kern)| {
                    Some(GlyphKernStep {
                        next: resolve(*next)?,
                        kern: *kern,
                    })
                })
                .collect(),
        }
    }
}

//! The shared ligature/kerning program.
//!
//! All glyphs of a face share one array of [`LigKernStep`]s. A glyph's
//! program starts at its `lig_kern_pgm_index` and runs up to and including
//! the first step with the stop flag set. Because the entry point is a single
//! byte, programs that start beyond index 254 are reached through a goto step
//! placed below that limit.

use types::{Fix16, FixedSize, GlyphCode, LittleEndian, NO_LIG_KERN_PGM};

use crate::ReadError;

const STOP_FLAG: u16 = 0x8000;
const CODE_MASK: u16 = 0x7FFF;
const KERN_FLAG: u16 = 0x8000;
const GOTO_FLAGS: u16 = 0xC000;

/// One instruction of the program.
#[derive(Copy, Clone, PartialEq, Eq, Hash, bytemuck::AnyBitPattern)]
#[repr(C, packed)]
pub struct LigKernStep {
    /// Next glyph code (or goto target) and stop flag.
    pub a: LittleEndian<u16>,
    /// Action: replacement glyph, kerning value or goto marker.
    pub b: LittleEndian<u16>,
}

impl FixedSize for LigKernStep {
    const RAW_BYTE_LEN: usize = std::mem::size_of::<Self>();
}

/// What a step does when its next glyph matches.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum StepAction {
    Ligature(GlyphCode),
    Kern(Fix16),
    /// Continue at this absolute step index.
    Goto(usize),
}

impl LigKernStep {
    /// Construct a step from its two raw words.
    pub fn from_words(a: u16, b: u16) -> Self {
        LigKernStep {
            a: a.into(),
            b: b.into(),
        }
    }

    pub fn a(&self) -> u16 {
        self.a.get()
    }

    pub fn b(&self) -> u16 {
        self.b.get()
    }

    pub fn is_stop(&self) -> bool {
        self.a() & STOP_FLAG != 0
    }

    pub fn is_goto(&self) -> bool {
        self.b() & GOTO_FLAGS == GOTO_FLAGS
    }

    /// The glyph that must follow for this step to apply.
    pub fn next_glyph(&self) -> GlyphCode {
        GlyphCode::new(self.a() & CODE_MASK)
    }

    pub fn action(&self) -> StepAction {
        let b = self.b();
        if b & GOTO_FLAGS == GOTO_FLAGS {
            StepAction::Goto((self.a() & CODE_MASK) as usize)
        } else if b & KERN_FLAG != 0 {
            StepAction::Kern(Fix16::from_kern_bits(b))
        } else {
            StepAction::Ligature(GlyphCode::new(b & CODE_MASK))
        }
    }
}

impl std::fmt::Debug for LigKernStep {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let stop = if self.is_stop() { " stop" } else { "" };
        match self.action() {
            StepAction::Goto(target) => write!(f, "goto {target}"),
            StepAction::Ligature(code) => write!(f, "{} lig {code}{stop}", self.next_glyph()),
            StepAction::Kern(kern) => write!(f, "{} kern {kern}{stop}", self.next_glyph()),
        }
    }
}

/// A ligature: `next` following the glyph is replaced, together with the
/// glyph itself, by `replacement`.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphLigStep {
    pub next: GlyphCode,
    pub replacement: GlyphCode,
}

/// A kerning pair: `kern` is added to the advance when `next` follows.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphKernStep {
    pub next: GlyphCode,
    pub kern: Fix16,
}

/// The ligature and kerning steps of one glyph, in program order.
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GlyphLigKern {
    pub ligatures: Vec<GlyphLigStep>,
    pub kerns: Vec<GlyphKernStep>,
}

impl GlyphLigKern {
    pub fn is_empty(&self) -> bool {
        self.ligatures.is_empty() && self.kerns.is_empty()
    }

    /// The ligature formed with `next`, if any.
    pub fn ligature(&self, next: GlyphCode) -> Option<GlyphCode> {
        self.ligatures
            .iter()
            .find(|step| step.next == next)
            .map(|step| step.replacement)
    }

    /// The kerning adjustment applied before `next`, if any.
    pub fn kern(&self, next: GlyphCode) -> Option<Fix16> {
        self.kerns
            .iter()
            .find(|step| step.next == next)
            .map(|step| step.kern)
    }

    /// Collects the steps of the program starting at `pgm_index`.
    pub fn read(steps: &[LigKernStep], pgm_index: u8) -> Result<Self, ReadError> {
        let mut result = GlyphLigKern::default();
        for step in program(steps, pgm_index)? {
            match step.action() {
                StepAction::Ligature(replacement) => result.ligatures.push(GlyphLigStep {
                    next: step.next_glyph(),
                    replacement,
                }),
                StepAction::Kern(kern) => result.kerns.push(GlyphKernStep {
                    next: step.next_glyph(),
                    kern,
                }),
                StepAction::Goto(_) => {
                    return Err(ReadError::MalformedLigKern("goto inside a program"))
                }
            }
        }
        Ok(result)
    }
}

/// Returns the steps of the program starting at `pgm_index`.
///
/// An initial goto is followed; the returned slice ends with the first step
/// carrying the stop flag. [`NO_LIG_KERN_PGM`] yields an empty program.
pub fn program(steps: &[LigKernStep], pgm_index: u8) -> Result<&[LigKernStep], ReadError> {
    if pgm_index == NO_LIG_KERN_PGM {
        return Ok(&[]);
    }
    let mut start = pgm_index as usize;
    let first = steps.get(start).ok_or(ReadError::OutOfBounds)?;
    if let StepAction::Goto(target) = first.action() {
        start = target;
    }
    let tail = steps.get(start..).ok_or(ReadError::OutOfBounds)?;
    let len = tail
        .iter()
        .position(|step| step.is_goto() || step.is_stop())
        .ok_or(ReadError::MalformedLigKern("program without a stop step"))?;
    if tail[len].is_goto() {
        return Err(ReadError::MalformedLigKern("goto inside a program"));
    }
    Ok(&tail[..=len])
}

#[cfg(test)]
mod tests {
    use super::*;

    fn lig(next: u16, replacement: u16, stop: bool) -> LigKernStep {
        LigKernStep::from_words(next | if stop { STOP_FLAG } else { 0 }, replacement)
    }

    fn kern(next: u16, kern: i16, stop: bool) -> LigKernStep {
        let bits = Fix16::from_bits(kern).to_kern_bits().unwrap();
        LigKernStep::from_words(next | if stop { STOP_FLAG } else { 0 }, KERN_FLAG | bits)
    }

    fn goto(target: u16) -> LigKernStep {
        LigKernStep::from_words(target, GOTO_FLAGS)
    }

    #[test]
    fn decode_actions() {
        assert_eq!(
            lig(0x41, 0x1C, true).action(),
            StepAction::Ligature(GlyphCode::new(0x1C))
        );
        assert_eq!(
            kern(7, -64, false).action(),
            StepAction::Kern(Fix16::from_i32(-1))
        );
        assert_eq!(goto(300).action(), StepAction::Goto(300));
        assert!(lig(0, 0, true).is_stop());
        assert!(!goto(300).is_stop());
    }

    #[test]
    fn kern_sign_extension() {
        let min = LigKernStep::from_words(0, 0xA000);
        assert_eq!(min.action(), StepAction::Kern(Fix16::KERN_MIN));
        let max = LigKernStep::from_words(0, 0x9FFF);
        assert_eq!(max.action(), StepAction::Kern(Fix16::KERN_MAX));
    }

    #[test]
    fn walk_program() {
        let steps = [
            kern(1, 10, true),
            lig(2, 20, false),
            kern(3, -5, true),
        ];
        let view = GlyphLigKern::read(&steps, 1).unwrap();
        assert_eq!(
            view.ligatures,
            vec![GlyphLigStep {
                next: GlyphCode::new(2),
                replacement: GlyphCode::new(20)
            }]
        );
        assert_eq!(view.kern(GlyphCode::new(3)), Some(Fix16::from_bits(-5)));
        assert_eq!(view.kern(GlyphCode::new(1)), None);
        assert!(GlyphLigKern::read(&steps, NO_LIG_KERN_PGM).unwrap().is_empty());
    }

    #[test]
    fn follows_initial_goto() {
        let steps = [goto(2), kern(9, 1, true), kern(4, 2, true)];
        let view = GlyphLigKern::read(&steps, 0).unwrap();
        assert_eq!(view.kern(GlyphCode::new(4)), Some(Fix16::from_bits(2)));
        assert_eq!(view.kerns.len(), 1);
    }

    #[test]
    fn malformed_programs() {
        let steps = [kern(1, 10, false)];
        assert!(matches!(
            program(&steps, 0),
            Err(ReadError::MalformedLigKern(_))
        ));
        let steps = [goto(1), goto(0)];
        assert!(matches!(
            program(&steps, 0),
            Err(ReadError::MalformedLigKern(_))
        ));
        assert_eq!(program(&steps, 5).unwrap_err(), ReadError::OutOfBounds);
        assert_eq!(program(&[goto(7)], 0).unwrap_err(), ReadError::OutOfBounds);
    }
}

//! Compilation of the shared ligature/kerning program.
//!
//! Every glyph contributes its ligature steps followed by its kerning steps,
//! the last one carrying the stop flag. A glyph whose instructions already
//! appear somewhere in the program reuses them instead of appending a copy.
//!
//! Entry points are stored in a byte, and 255 means "no program", so every
//! program has to start below 255. Programs that end up beyond that limit
//! are reached through goto stubs inserted below it.

use read::tables::lig_kern::{GlyphLigKern, LigKernStep};
use types::{Fix16, GlyphCode, NO_LIG_KERN_PGM};

use crate::error::CompilerInvariantError;

const STOP_FLAG: u16 = 0x8000;
const KERN_FLAG: u16 = 0x8000;
const GOTO_FLAGS: u16 = 0xC000;
const MAX_GOTO_TARGET: usize = 0x7FFF;

/// Where a glyph's program lives in the step array.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ProgramRef {
    /// The glyph has neither ligatures nor kerning.
    None,
    /// The program was appended at this index.
    Unique(usize),
    /// The program reuses identical steps starting at this index.
    Alias(usize),
    /// The program is reached through the goto stub at this index.
    Relocated(usize),
}

impl ProgramRef {
    fn index(self) -> Option<usize> {
        match self {
            ProgramRef::None => None,
            ProgramRef::Unique(ix) | ProgramRef::Alias(ix) | ProgramRef::Relocated(ix) => Some(ix),
        }
    }
}

/// The output of the compiler.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct CompiledLigKern {
    pub steps: Vec<LigKernStep>,
    /// Final reference of each glyph, in input order.
    pub refs: Vec<ProgramRef>,
}

impl CompiledLigKern {
    /// The entry point byte of each glyph.
    pub fn pgm_indices(&self) -> impl Iterator<Item = u8> + '_ {
        self.refs.iter().map(|r| match r.index() {
            // compile() checked the range
            Some(ix) => ix as u8,
            None => NO_LIG_KERN_PGM,
        })
    }
}

fn ligature_step(next: GlyphCode, replacement: GlyphCode) -> LigKernStep {
    LigKernStep::from_words(next.to_u16() & !STOP_FLAG, replacement.to_u16() & !KERN_FLAG)
}

fn kern_step(next: GlyphCode, kern: Fix16) -> LigKernStep {
    let bits = kern.to_kern_bits().unwrap_or_else(|| {
        let clamped = kern.clamp_kern();
        log::warn!("kerning {kern} before glyph {next} out of range, clamped to {clamped}");
        clamped.to_kern_bits().unwrap_or_default()
    });
    LigKernStep::from_words(next.to_u16() & !STOP_FLAG, KERN_FLAG | bits)
}

fn goto_step(target: usize) -> LigKernStep {
    LigKernStep::from_words(target as u16, GOTO_FLAGS)
}

fn with_stop(step: LigKernStep) -> LigKernStep {
    LigKernStep::from_words(step.a() | STOP_FLAG, step.b())
}

/// The instructions of one glyph, stop flag included.
fn instructions(lig_kern: &GlyphLigKern) -> Vec<LigKernStep> {
    let mut steps: Vec<_> = lig_kern
        .ligatures
        .iter()
        .map(|lig| ligature_step(lig.next, lig.replacement))
        .chain(
            lig_kern
                .kerns
                .iter()
                .map(|kern| kern_step(kern.next, kern.kern)),
        )
        .collect();
    if let Some(last) = steps.last_mut() {
        *last = with_stop(*last);
    }
    steps
}

/// Builds the shared program for a face's glyphs.
pub fn compile<'a>(
    glyphs: impl IntoIterator<Item = &'a GlyphLigKern>,
) -> Result<CompiledLigKern, CompilerInvariantError> {
    let mut steps: Vec<LigKernStep> = Vec::new();
    let mut refs = Vec::new();
    for glyph in glyphs {
        let program = instructions(glyph);
        if program.is_empty() {
            refs.push(ProgramRef::None);
            continue;
        }
        match steps
            .windows(program.len())
            .position(|window| window == program.as_slice())
        {
            Some(ix) => refs.push(ProgramRef::Alias(ix)),
            None => {
                refs.push(ProgramRef::Unique(steps.len()));
                steps.extend(program);
            }
        }
    }
    let mut compiled = CompiledLigKern { steps, refs };
    relocate(&mut compiled)?;
    if compiled.steps.len() > u16::MAX as usize {
        return Err(CompilerInvariantError::new(format!(
            "{} steps do not fit the step count field",
            compiled.steps.len()
        )));
    }
    if let Some(ix) = compiled
        .refs
        .iter()
        .filter_map(|r| r.index())
        .find(|ix| *ix >= NO_LIG_KERN_PGM as usize)
    {
        return Err(CompilerInvariantError::new(format!(
            "entry point {ix} still out of range after relocation"
        )));
    }
    Ok(compiled)
}

/// The number of goto stubs needed so that every entry point fits.
///
/// With `n` stubs below the limit, only entries at or above `255 - n` need
/// one; the smallest `n` covering all of them is found by iterating to a
/// fixpoint.
fn stub_count(entries: &[usize]) -> usize {
    let mut n = 0;
    loop {
        let limit = (NO_LIG_KERN_PGM as usize).saturating_sub(n);
        let needed = entries.iter().rev().take_while(|e| **e >= limit).count();
        if needed <= n {
            return n;
        }
        n = needed;
    }
}

fn relocate(compiled: &mut CompiledLigKern) -> Result<(), CompilerInvariantError> {
    let mut entries: Vec<usize> = compiled.refs.iter().filter_map(|r| r.index()).collect();
    entries.sort_unstable();
    entries.dedup();
    let n = stub_count(&entries);
    if n == 0 {
        return Ok(());
    }
    if n > NO_LIG_KERN_PGM as usize {
        return Err(CompilerInvariantError::new(format!(
            "{n} programs need relocation"
        )));
    }
    let limit = NO_LIG_KERN_PGM as usize - n;
    // stubs go at the last program boundary not above the limit
    let insert_at = (1..=limit.min(compiled.steps.len()))
        .rev()
        .find(|ix| compiled.steps[ix - 1].is_stop())
        .unwrap_or(0);
    let relocated: Vec<usize> = entries.into_iter().filter(|e| *e >= limit).collect();
    let mut stubs = Vec::with_capacity(n);
    for entry in &relocated {
        let target = entry + n;
        if target > MAX_GOTO_TARGET {
            return Err(CompilerInvariantError::new(format!(
                "goto target {target} does not fit in 15 bits"
            )));
        }
        stubs.push(goto_step(target));
    }
    compiled.steps.splice(insert_at..insert_at, stubs);
    for r in compiled.refs.iter_mut() {
        let Some(ix) = r.index() else {
            continue;
        };
        if let Ok(stub) = relocated.binary_search(&ix) {
            *r = ProgramRef::Relocated(insert_at + stub);
        } else if ix >= insert_at {
            *r = match *r {
                ProgramRef::Alias(_) => ProgramRef::Alias(ix + n),
                _ => ProgramRef::Unique(ix + n),
            };
        }
    }
    log::debug!(
        "relocated {n} lig/kern programs through stubs at {insert_at}..{}",
        insert_at + n
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::{rngs::StdRng, Rng, SeedableRng};
    use read::tables::lig_kern::{GlyphKernStep, GlyphLigStep};

    fn kerns(pairs: &[(u16, i16)]) -> GlyphLigKern {
        GlyphLigKern {
            ligatures: vec![],
            kerns: pairs
                .iter()
                .map(|(next, kern)| GlyphKernStep {
                    next: GlyphCode::new(*next),
                    kern: Fix16::from_bits(*kern),
                })
                .collect(),
        }
    }

    fn check_views(glyphs: &[GlyphLigKern], compiled: &CompiledLigKern) {
        for (glyph, pgm_index) in glyphs.iter().zip(compiled.pgm_indices()) {
            assert!(pgm_index < 255 || glyph.is_empty());
            let view = GlyphLigKern::read(&compiled.steps, pgm_index).unwrap();
            assert_eq!(&view, glyph);
        }
    }

    #[test]
    fn shared_program() {
        let _ = env_logger::builder().is_test(true).try_init();
        let glyphs = [
            kerns(&[(1, 64), (2, -64)]),
            GlyphLigKern::default(),
            kerns(&[(1, 64), (2, -64)]),
        ];
        let compiled = compile(&glyphs).unwrap();
        assert_eq!(compiled.steps.len(), 2);
        assert_eq!(
            compiled.refs,
            vec![ProgramRef::Unique(0), ProgramRef::None, ProgramRef::Alias(0)]
        );
        assert_eq!(compiled.pgm_indices().collect::<Vec<_>>(), vec![0, 255, 0]);
        check_views(&glyphs, &compiled);
    }

    #[test]
    fn ligatures_come_first() {
        let glyph = GlyphLigKern {
            ligatures: vec![GlyphLigStep {
                next: GlyphCode::new(b'i' as u16),
                replacement: GlyphCode::new(0x1C),
            }],
            kerns: vec![GlyphKernStep {
                next: GlyphCode::new(b'o' as u16),
                kern: Fix16::from_i32(-1),
            }],
        };
        let compiled = compile([&glyph]).unwrap();
        assert_eq!(compiled.steps.len(), 2);
        assert!(!compiled.steps[0].is_stop());
        assert!(compiled.steps[1].is_stop());
        check_views(&[glyph], &compiled);
    }

    #[test]
    fn alias_into_the_middle_of_a_program() {
        let glyphs = [kerns(&[(1, 1), (2, 2), (3, 3)]), kerns(&[(2, 2), (3, 3)])];
        let compiled = compile(&glyphs).unwrap();
        assert_eq!(compiled.steps.len(), 3);
        assert_eq!(compiled.refs[1], ProgramRef::Alias(1));
        check_views(&glyphs, &compiled);
    }

    #[test]
    fn out_of_range_kern_is_clamped() {
        let _ = env_logger::builder().is_test(true).try_init();
        let glyphs = [kerns(&[(1, 9000), (2, -9000)])];
        let compiled = compile(&glyphs).unwrap();
        let view = GlyphLigKern::read(&compiled.steps, 0).unwrap();
        assert_eq!(view.kerns[0].kern, Fix16::KERN_MAX);
        assert_eq!(view.kerns[1].kern, Fix16::KERN_MIN);
    }

    #[test]
    fn relocation_past_255() {
        let _ = env_logger::builder().is_test(true).try_init();
        let glyphs: Vec<_> = (0..200)
            .map(|i| kerns(&[(i, 1), (i, 2), (i, 3)]))
            .collect();
        let compiled = compile(&glyphs).unwrap();
        let stubs = compiled.steps.iter().filter(|s| s.is_goto()).count();
        assert_eq!(stubs, 172);
        assert_eq!(compiled.steps.len(), 772);
        assert!(matches!(compiled.refs[199], ProgramRef::Relocated(_)));
        assert_eq!(compiled.refs[0], ProgramRef::Unique(0));
        check_views(&glyphs, &compiled);
    }

    #[test]
    fn too_many_programs() {
        // every program needs its own entry point below 255
        let glyphs: Vec<_> = (0..300).map(|i| kerns(&[(i, 1)])).collect();
        assert!(compile(&glyphs).is_err());
    }

    #[test]
    fn randomized_programs() {
        let mut rng = StdRng::seed_from_u64(2);
        for _ in 0..50 {
            let mut pool: Vec<GlyphLigKern> = Vec::new();
            let glyphs: Vec<_> = (0..rng.gen_range(1..300))
                .map(|_| {
                    let roll: f64 = rng.gen();
                    if roll < 0.2 {
                        return GlyphLigKern::default();
                    }
                    if roll < 0.4 && !pool.is_empty() {
                        return pool[rng.gen_range(0..pool.len())].clone();
                    }
                    let glyph = GlyphLigKern {
                        ligatures: (0..rng.gen_range(0..3))
                            .map(|_| GlyphLigStep {
                                next: GlyphCode::new(rng.gen_range(0..50)),
                                replacement: GlyphCode::new(rng.gen_range(0..50)),
                            })
                            .collect(),
                        kerns: (0..rng.gen_range(0..5))
                            .map(|_| GlyphKernStep {
                                next: GlyphCode::new(rng.gen_range(0..50)),
                                kern: Fix16::from_bits(rng.gen_range(-100..100)),
                            })
                            .collect(),
                    };
                    pool.push(glyph.clone());
                    glyph
                })
                .collect();
            let compiled = compile(&glyphs).unwrap();
            check_views(&glyphs, &compiled);
        }
    }
}

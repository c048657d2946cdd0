//! Print the contents of IBMF files.
//!
//! Shows face headers, glyph metrics, bitmaps and the ligature/kerning
//! programs of each glyph, for regular fonts as well as backup files.

use read_ibmf::{
    tables::{backup::BackupFace, face::Face},
    Charmap, FontRef, ReadError,
};
use ibmf_types::{FontFormat, GlyphCode};

mod print;
mod query;

use print::PrettyPrinter;
use query::GlyphQuery;

fn main() -> Result<(), Error> {
    let args = flags::Args::from_env().map_err(Error::new)?;
    let bytes = std::fs::read(&args.input)
        .map_err(|e| Error(format!("failed to read {}: {e}", args.input.display())))?;
    let font = FontRef::new(&bytes).map_err(Error::new)?;
    if args.list {
        list_faces(&font);
        return Ok(());
    }
    if let Some(face) = args.face.filter(|face| *face >= font.face_count()) {
        return Err(Error(format!(
            "face {face} out of range, the font has {}",
            font.face_count()
        )));
    }
    let faces = (0..font.face_count()).filter(|ix| args.face.is_none_or(|face| face == *ix));
    let stdout = std::io::stdout();
    let mut locked = stdout.lock();
    let mut printer = PrettyPrinter::new(&mut locked);
    for ix in faces {
        let result = match font.format() {
            FontFormat::Backup => font
                .backup_face(ix)
                .map_err(Error::new)
                .and_then(|face| print_backup_face(&mut printer, ix, &face, args.glyph.as_ref())),
            _ => font.face(ix).map_err(Error::new).and_then(|face| {
                let charmap = font.charmap().map_err(Error::new)?;
                print_face(&mut printer, ix, &face, &charmap, args.glyph.as_ref())
            }),
        };
        if let Err(e) = result {
            println!("face {ix}: Error '{e}'");
        }
    }
    Ok(())
}

fn list_faces(font: &FontRef) {
    println!("{} font, version {}", font.format(), font.preamble().version());
    println!("Face  Size  Offset  Glyphs  Steps  Pool");
    println!("-----------------------------------------");

    let header = font.file_header();
    let offset_pad = hex_width(
        header
            .face_offsets()
            .iter()
            .map(|off| off.get())
            .max()
            .unwrap_or_default(),
    );
    for (ix, point_size) in font.point_sizes().iter().enumerate() {
        let offset = header.face_offset(ix).unwrap_or_default();
        let face_header = match font.format() {
            FontFormat::Backup => font.backup_face(ix).map(|face| face.header()),
            _ => font.face(ix).map(|face| face.header()),
        };
        match face_header {
            Ok(face) => println!(
                "{ix:4} {point_size:4}pt 0x{offset:0offset_pad$X} {:7} {:6} {:5}",
                face.glyph_count(),
                face.lig_kern_step_count(),
                face.pixels_pool_size()
            ),
            Err(e) => println!("{ix:4} {point_size:4}pt 0x{offset:0offset_pad$X} Error '{e}'"),
        }
    }
}

fn hex_width(val: u32) -> usize {
    match val {
        0..=0xffff => 4usize,
        0x10000..=0xffff_ff => 6,
        0x1000000.. => 8,
    }
}

fn print_face(
    printer: &mut PrettyPrinter,
    index: usize,
    face: &Face,
    charmap: &Charmap,
    query: Option<&GlyphQuery>,
) -> Result<(), Error> {
    let glyphs: Vec<GlyphCode> = match query {
        Some(query) => {
            let code = query.resolve(charmap);
            if face.glyph_info(code).is_err() {
                return Err(Error(format!("no glyph for {query}")));
            }
            vec![code]
        }
        None => (0..face.glyph_count()).map(GlyphCode::new).collect(),
    };
    printer.print_face_header(index, face.header())?;
    for code in glyphs {
        let info = face.glyph_info(code).map_err(Error::new)?;
        let glyph = print::GlyphView {
            label: glyph_label(code, charmap.code_point(code)),
            info,
            packet: face.rle_bitmap(code).map_err(Error::new)?.data,
            bitmap: face.bitmap(code),
            lig_kern: face.lig_kern(code).map(|pgm| {
                let name = |code| glyph_label(code, charmap.code_point(code));
                pgm.ligatures
                    .iter()
                    .map(|lig| format!("{} => {}", name(lig.next), name(lig.replacement)))
                    .chain(
                        pgm.kerns
                            .iter()
                            .map(|kern| format!("{} kern {}", name(kern.next), kern.kern)),
                    )
                    .collect()
            }),
        };
        printer.print_glyph(&glyph)?;
    }
    printer.print_table_footer()?;
    Ok(())
}

fn print_backup_face(
    printer: &mut PrettyPrinter,
    index: usize,
    face: &BackupFace,
    query: Option<&GlyphQuery>,
) -> Result<(), Error> {
    printer.print_face_header(index, face.header())?;
    let wanted = query.and_then(GlyphQuery::code_point);
    for entry in face
        .entries()
        .iter()
        .filter(|entry| wanted.is_none_or(|cp| cp == entry.code_point))
    {
        let rle = entry.rle_bitmap();
        let glyph = print::GlyphView {
            label: code_point_label(entry.code_point),
            info: entry.info,
            packet: rle.data,
            bitmap: read_ibmf::rle::decode(&rle).map_err(|error| ReadError::MalformedBitmap {
                glyph: GlyphCode::NO_GLYPH,
                error,
            }),
            lig_kern: Ok(entry
                .ligatures
                .iter()
                .map(|lig| {
                    format!(
                        "{} => {}",
                        code_point_label(lig.next_code_point()),
                        code_point_label(lig.replacement_code_point())
                    )
                })
                .chain(entry.kerns.iter().map(|kern| {
                    format!("{} kern {}", code_point_label(kern.next_code_point()), kern.kern())
                }))
                .collect()),
        };
        printer.print_glyph(&glyph)?;
    }
    printer.print_table_footer()?;
    Ok(())
}

fn glyph_label(code: GlyphCode, code_point: Option<u32>) -> String {
    match code_point {
        Some(cp) => format!("#{code} {}", code_point_label(cp)),
        None => format!("#{code}"),
    }
}

fn code_point_label(code_point: u32) -> String {
    match char::from_u32(code_point).filter(|ch| !ch.is_control()) {
        Some(ch) => format!("U+{code_point:04X} '{ch}'"),
        None => format!("U+{code_point:04X}"),
    }
}

#[derive(Debug, Clone)]
struct Error(String);

impl Error {
    fn new(t: impl std::fmt::Display) -> Self {
        Self(t.to_string())
    }
}

impl std::fmt::Display for Error {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        self.0.fmt(f)
    }
}

impl std::error::Error for Error {}

impl From<std::io::Error> for Error {
    fn from(e: std::io::Error) -> Self {
        Error::new(e)
    }
}

mod flags {
    use super::GlyphQuery;
    use std::path::PathBuf;

    xflags::xflags! {
        /// Print the faces and glyphs of an IBMF file
        cmd args {
                required input: PathBuf
                optional -l, --list
                optional -f, --face face: usize
                optional -g, --glyph glyph: GlyphQuery
            }

    }
}

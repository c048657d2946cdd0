//! pretty printing implementation

use std::io::Write;

use ansi_term::{Color, Style};
use read_ibmf::{
    tables::face::{FaceHeader, GlyphInfo},
    Bitmap, ReadError,
};

static MANY_SPACES: [u8; 200] = [0x20; 200];
// width of the left column, which contains the textual representation.
const L_COLUMN_WIDTH: usize = 62;
const HEX_PER_LINE: usize = 4;

/// Everything printed for one glyph.
pub struct GlyphView<'a> {
    pub label: String,
    pub info: &'a GlyphInfo,
    pub packet: &'a [u8],
    pub bitmap: Result<Bitmap, ReadError>,
    /// One line per ligature or kerning step.
    pub lig_kern: Result<Vec<String>, ReadError>,
}

pub struct PrettyPrinter<'a> {
    depth: usize,
    line_pos: usize,
    is_tty: bool,
    indent_size: usize,
    writer: &'a mut (dyn std::io::Write + 'a),
}

impl std::io::Write for PrettyPrinter<'_> {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        let len = self.writer.write(buf)?;
        let wrote_buf = &buf[..len];
        let wrote_str = String::from_utf8_lossy(wrote_buf);
        self.line_pos = match wrote_str.rsplit_once('\n') {
            Some((_, tail)) => tail.chars().count(),
            None => self.line_pos + wrote_str.chars().count(),
        };
        Ok(len)
    }

    fn flush(&mut self) -> std::io::Result<()> {
        self.writer.flush()
    }
}

impl<'a> PrettyPrinter<'a> {
    pub fn new(writer: &'a mut (dyn std::io::Write + 'a)) -> Self {
        PrettyPrinter {
            depth: 0,
            line_pos: 0,
            is_tty: atty::is(atty::Stream::Stdout),
            indent_size: 2,
            writer,
        }
    }

    pub fn print_table_header(&mut self) -> std::io::Result<()> {
        writeln!(
            self,
            "┌─────────────────────────────────────────────────────────────┬─────────────┐"
        )
    }

    pub fn print_table_footer(&mut self) -> std::io::Result<()> {
        writeln!(
            self,
            "└─────────────────────────────────────────────────────────────┴─────────────┘"
        )
    }

    fn print_separator(&mut self) -> std::io::Result<()> {
        writeln!(
            self,
            "├─────────────────────────────────────────────────────────────┼─────────────┤"
        )
    }

    fn print_indent(&mut self) -> std::io::Result<()> {
        let indent_len = (self.depth * self.indent_size)
            .min(MANY_SPACES.len())
            .saturating_sub(1);
        write!(self, "│")?;
        self.write_all(&MANY_SPACES[..indent_len])
    }

    fn indented(
        &mut self,
        f: impl FnOnce(&mut PrettyPrinter) -> std::io::Result<()>,
    ) -> std::io::Result<()> {
        self.depth += 1;
        let r = f(self);
        self.depth -= 1;
        r
    }

    fn print_with_style(
        &mut self,
        style: Style,
        f: impl FnOnce(&mut PrettyPrinter) -> std::io::Result<()>,
    ) -> std::io::Result<()> {
        if !self.is_tty {
            f(self)?;
        } else {
            // ansi styles aren't counted for the purpose of width calculations
            let pos = self.line_pos;
            write!(self, "{}", style.prefix())?;
            self.line_pos = pos;
            f(self)?;
            let pos = self.line_pos;
            write!(self, "{}", style.suffix())?;
            self.line_pos = pos;
        }
        Ok(())
    }

    /// One `name: value` line, with the raw bytes in the right column.
    fn print_field(
        &mut self,
        name: &str,
        value: impl std::fmt::Display,
        bytes: &[u8],
    ) -> std::io::Result<()> {
        self.print_indent()?;
        self.print_with_style(Color::Cyan.into(), |this| write!(this, "{name}"))?;
        write!(self, ": {value}")?;
        self.print_hex(bytes)?;
        writeln!(self)
    }

    pub fn print_face_header(&mut self, index: usize, header: &FaceHeader) -> std::io::Result<()> {
        self.print_table_header()?;
        self.print_indent()?;
        self.print_with_style(Style::default().bold(), |this| {
            write!(this, "Face {index}, {}pt", header.point_size())
        })?;
        self.print_hex(&[])?;
        writeln!(self)?;
        self.indented(|this| {
            this.print_field("line_height", header.line_height(), &[header.line_height()])?;
            this.print_field("dpi", header.dpi(), &header.dpi().to_le_bytes())?;
            for (name, value) in [
                ("x_height", header.x_height()),
                ("em_size", header.em_size()),
                ("slant_correction", header.slant_correction()),
            ] {
                this.print_field(name, value, &value.to_bits().to_le_bytes())?;
            }
            this.print_field(
                "descender_height",
                header.descender_height(),
                &[header.descender_height()],
            )?;
            this.print_field("space_size", header.space_size(), &[header.space_size()])?;
            this.print_field(
                "glyph_count",
                header.glyph_count(),
                &header.glyph_count().to_le_bytes(),
            )?;
            this.print_field(
                "lig_kern_step_count",
                header.lig_kern_step_count(),
                &header.lig_kern_step_count().to_le_bytes(),
            )?;
            this.print_field(
                "pixels_pool_size",
                header.pixels_pool_size(),
                &header.pixels_pool_size().to_le_bytes(),
            )
        })
    }

    pub fn print_glyph(&mut self, glyph: &GlyphView) -> std::io::Result<()> {
        let info = glyph.info;
        self.print_separator()?;
        self.print_indent()?;
        self.print_with_style(Color::Yellow.into(), |this| write!(this, "{}", glyph.label))?;
        self.print_hex(&[])?;
        writeln!(self)?;
        self.indented(|this| {
            this.print_field(
                "size",
                format_args!("{}x{}", info.bitmap_width(), info.bitmap_height()),
                &[info.bitmap_width(), info.bitmap_height()],
            )?;
            this.print_field(
                "offsets",
                format_args!("({}, {})", info.horizontal_offset(), info.vertical_offset()),
                &[info.horizontal_offset() as u8, info.vertical_offset() as u8],
            )?;
            this.print_field(
                "advance",
                info.advance(),
                &info.advance().to_bits().to_le_bytes(),
            )?;
            this.print_field(
                "rle_metrics",
                format_args!("{:?}", info.rle_metrics()),
                &[info.rle_metrics().to_bits()],
            )?;
            this.print_field(
                "main_code",
                info.main_code(),
                &info.main_code().to_u16().to_le_bytes(),
            )?;
            this.print_packet(glyph)?;
            this.print_lig_kern(glyph)
        })
    }

    // the bitmap on the left, its packed bytes on the right
    fn print_packet(&mut self, glyph: &GlyphView) -> std::io::Result<()> {
        let rows: Vec<String> = match &glyph.bitmap {
            Ok(bitmap) => (0..bitmap.height())
                .filter_map(|y| bitmap.row(y))
                .map(|row| {
                    row.iter()
                        .map(|pixel| if *pixel != 0 { '█' } else { '·' })
                        .collect()
                })
                .collect(),
            Err(e) => vec![format!("Error '{e}'")],
        };
        let chunks: Vec<&[u8]> = glyph.packet.chunks(HEX_PER_LINE).collect();
        for line in 0..rows.len().max(chunks.len()) {
            self.print_indent()?;
            if let Some(row) = rows.get(line) {
                write!(self, "{row}")?;
            }
            self.print_hex(chunks.get(line).copied().unwrap_or_default())?;
            writeln!(self)?;
        }
        Ok(())
    }

    fn print_lig_kern(&mut self, glyph: &GlyphView) -> std::io::Result<()> {
        match &glyph.lig_kern {
            Ok(steps) => {
                for step in steps {
                    self.print_indent()?;
                    self.print_with_style(Color::Blue.into(), |this| write!(this, "{step}"))?;
                    self.print_hex(&[])?;
                    writeln!(self)?;
                }
                Ok(())
            }
            Err(e) => {
                self.print_indent()?;
                write!(self, "lig/kern: Error '{e}'")?;
                self.print_hex(&[])?;
                writeln!(self)
            }
        }
    }

    fn print_hex(&mut self, bytes: &[u8]) -> std::io::Result<()> {
        if bytes.len() > HEX_PER_LINE {
            let (head, tail) = bytes.split_at(HEX_PER_LINE);
            self.print_hex(head)?;
            writeln!(self)?;
            self.print_indent()?;
            self.print_hex(tail)?;
            return Ok(());
        }
        let padding = L_COLUMN_WIDTH.saturating_sub(self.line_pos);
        let wspace = &MANY_SPACES[..padding.min(MANY_SPACES.len())];
        self.write_all(wspace)?;
        self.print_with_style(Color::Fixed(250).into(), |this| {
            write!(this, "│")?;
            for b in bytes {
                write!(this, " {b:02X}")?
            }
            Ok(())
        })?;
        let padding = (HEX_PER_LINE - bytes.len()) * 3;
        let wspace = &MANY_SPACES[..padding];
        self.write_all(wspace)?;
        write!(self, " │")
    }
}

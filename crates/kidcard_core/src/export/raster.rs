//! Raster snapshot artifact.
//!
//! # Responsibility
//! - Define the platform rasterization seam ([`CardRasterizer`]).
//! - Provide a deterministic built-in backend composing the card bitmap
//!   from the shared layout.
//!
//! # Invariants
//! - Rasterization is pure: same layout, same pixels.
//! - Every layout row appears on the bitmap; field content never
//!   diverges from the document artifact.

use crate::export::layout::{CardLayout, NOTES_HEADING};
use crate::export::{ExportError, ExportResult};
use font8x8::{UnicodeFonts, BASIC_FONTS};
use image::{ImageFormat, Rgba, RgbaImage};
use std::io::Cursor;

const CARD_WIDTH: u32 = 560;
const MARGIN: u32 = 24;
const HEADER_PAD: u32 = 14;

const BACKGROUND: Rgba<u8> = Rgba([255, 255, 255, 255]);
const HEADER: Rgba<u8> = Rgba([86, 140, 216, 255]);
const HEADER_TEXT: Rgba<u8> = Rgba([255, 255, 255, 255]);
const TEXT: Rgba<u8> = Rgba([40, 44, 52, 255]);
const LABEL: Rgba<u8> = Rgba([110, 118, 129, 255]);
const SEPARATOR: Rgba<u8> = Rgba([229, 231, 235, 255]);

/// Platform rasterization seam.
///
/// The built-in [`BitmapCardRasterizer`] covers headless use and tests;
/// a host app may substitute its own view-capture backend.
pub trait CardRasterizer {
    fn rasterize(&self, layout: &CardLayout) -> ExportResult<RgbaImage>;
}

/// Built-in raster backend drawing the card with embedded 8x8 glyphs.
#[derive(Debug, Clone, Copy)]
pub struct BitmapCardRasterizer {
    /// Glyph scale factor for body text; the name renders one step larger.
    pub text_scale: u32,
}

impl Default for BitmapCardRasterizer {
    fn default() -> Self {
        Self { text_scale: 2 }
    }
}

impl CardRasterizer for BitmapCardRasterizer {
    fn rasterize(&self, layout: &CardLayout) -> ExportResult<RgbaImage> {
        let s = self.text_scale.max(1);
        let line = 8 * s;
        let name_scale = s + 1;
        let name_line = 8 * name_scale;
        let row_h = line + 14;
        let notes_line_h = line + 4;
        let header_h = line + 2 * HEADER_PAD;

        let cols = (((CARD_WIDTH - 2 * MARGIN) / (8 * s)) as usize).max(1);
        let note_lines = wrap_text(&layout.notes, cols);

        let height = header_h
            + MARGIN
            + name_line
            + MARGIN
            + layout.rows.len() as u32 * row_h
            + 18
            + line
            + 8
            + note_lines.len() as u32 * notes_line_h
            + MARGIN;

        let mut canvas = RgbaImage::from_pixel(CARD_WIDTH, height, BACKGROUND);

        fill_rect(&mut canvas, 0, 0, CARD_WIDTH, header_h, HEADER);
        draw_text(&mut canvas, MARGIN, HEADER_PAD, s, HEADER_TEXT, &layout.title);

        let mut y = header_h + MARGIN;
        draw_text(&mut canvas, MARGIN, y, name_scale, TEXT, &layout.name);
        y += name_line + MARGIN;

        for row in &layout.rows {
            fill_rect(&mut canvas, MARGIN, y, CARD_WIDTH - 2 * MARGIN, 1, SEPARATOR);
            draw_text(&mut canvas, MARGIN, y + 7, s, LABEL, row.label);
            let value_w = row.value.chars().count() as u32 * 8 * s;
            let value_x = CARD_WIDTH
                .saturating_sub(MARGIN + value_w)
                .max(CARD_WIDTH / 2);
            draw_text(&mut canvas, value_x, y + 7, s, TEXT, &row.value);
            y += row_h;
        }

        y += 18;
        draw_text(&mut canvas, MARGIN, y, s, LABEL, NOTES_HEADING);
        y += line + 8;
        for note_line in &note_lines {
            draw_text(&mut canvas, MARGIN, y, s, TEXT, note_line);
            y += notes_line_h;
        }

        Ok(canvas)
    }
}

/// Encodes a composed card image as PNG bytes.
pub fn encode_png(image: &RgbaImage) -> ExportResult<Vec<u8>> {
    let mut bytes = Vec::new();
    image
        .write_to(&mut Cursor::new(&mut bytes), ImageFormat::Png)
        .map_err(|err| ExportError::Encode(err.to_string()))?;
    Ok(bytes)
}

fn draw_text(canvas: &mut RgbaImage, x: u32, y: u32, scale: u32, color: Rgba<u8>, text: &str) {
    let mut pen_x = x;
    for ch in text.chars() {
        if pen_x + 8 * scale > canvas.width() {
            break;
        }
        let glyph = BASIC_FONTS
            .get(ch)
            .or_else(|| BASIC_FONTS.get('?'))
            .unwrap_or([0; 8]);
        for (row, bits) in glyph.iter().enumerate() {
            for col in 0..8u32 {
                if bits >> col & 1 == 1 {
                    fill_rect(
                        canvas,
                        pen_x + col * scale,
                        y + row as u32 * scale,
                        scale,
                        scale,
                        color,
                    );
                }
            }
        }
        pen_x += 8 * scale;
    }
}

fn fill_rect(canvas: &mut RgbaImage, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
    let x_end = (x + w).min(canvas.width());
    let y_end = (y + h).min(canvas.height());
    for py in y..y_end {
        for px in x..x_end {
            canvas.put_pixel(px, py, color);
        }
    }
}

fn wrap_text(text: &str, cols: usize) -> Vec<String> {
    let mut lines = Vec::new();
    for source_line in text.lines() {
        let mut current = String::new();
        for word in source_line.split_whitespace() {
            let word_len = word.chars().count();
            let current_len = current.chars().count();
            if current.is_empty() {
                current.push_str(word);
            } else if current_len + 1 + word_len <= cols {
                current.push(' ');
                current.push_str(word);
            } else {
                lines.push(std::mem::take(&mut current));
                current.push_str(word);
            }
            // Hard-split anything longer than one line.
            while current.chars().count() > cols {
                let head: String = current.chars().take(cols).collect();
                let tail: String = current.chars().skip(cols).collect();
                lines.push(head);
                current = tail;
            }
        }
        if !current.is_empty() {
            lines.push(current);
        }
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::{encode_png, wrap_text, BitmapCardRasterizer, CardRasterizer};
    use crate::export::layout::{CardLayout, CardRow};

    fn layout() -> CardLayout {
        CardLayout {
            title: "Child Profile".to_string(),
            name: "Mia Park".to_string(),
            rows: vec![CardRow {
                label: "Age",
                value: "4".to_string(),
            }],
            notes: "Peanut allergy".to_string(),
        }
    }

    #[test]
    fn rasterize_is_deterministic() {
        let rasterizer = BitmapCardRasterizer::default();
        let first = rasterizer.rasterize(&layout()).unwrap();
        let second = rasterizer.rasterize(&layout()).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn longer_notes_grow_the_canvas() {
        let rasterizer = BitmapCardRasterizer::default();
        let short = rasterizer.rasterize(&layout()).unwrap();
        let mut long_layout = layout();
        long_layout.notes = "peanut allergy ".repeat(20);
        let long = rasterizer.rasterize(&long_layout).unwrap();
        assert!(long.height() > short.height());
        assert_eq!(long.width(), short.width());
    }

    #[test]
    fn encode_png_emits_png_signature() {
        let rasterizer = BitmapCardRasterizer::default();
        let image = rasterizer.rasterize(&layout()).unwrap();
        let bytes = encode_png(&image).unwrap();
        assert_eq!(&bytes[..8], &[0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1a, b'\n']);
    }

    #[test]
    fn wrap_splits_on_words_and_hard_splits_long_words() {
        assert_eq!(wrap_text("a b c", 3), vec!["a b", "c"]);
        assert_eq!(wrap_text("abcdef", 4), vec!["abcd", "ef"]);
        assert!(wrap_text("", 10).is_empty());
    }
}

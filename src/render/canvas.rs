use image::codecs::png::PngEncoder;
use image::{ColorType, GenericImage, ImageEncoder, Rgba, RgbaImage};

use crate::error::HpiError;

pub const TRANSPARENT: Rgba<u8> = Rgba([0, 0, 0, 0]);

/// Width and height of one digit glyph, in pixels.
pub const GLYPH_W: u32 = 3;
pub const GLYPH_H: u32 = 5;

/// 3×5 bitmaps for `0`..=`9`; each row uses the low three bits, MSB on the left.
const DIGITS: [[u8; 5]; 10] = [
    [0b111, 0b101, 0b101, 0b101, 0b111],
    [0b010, 0b110, 0b010, 0b010, 0b111],
    [0b111, 0b001, 0b111, 0b100, 0b111],
    [0b111, 0b001, 0b111, 0b001, 0b111],
    [0b101, 0b101, 0b111, 0b001, 0b001],
    [0b111, 0b100, 0b111, 0b001, 0b111],
    [0b111, 0b100, 0b111, 0b101, 0b111],
    [0b111, 0b001, 0b001, 0b001, 0b001],
    [0b111, 0b101, 0b111, 0b101, 0b111],
    [0b111, 0b101, 0b111, 0b001, 0b111],
];

/// A private RGBA drawing surface.
///
/// Every render call creates its own canvas and consumes it when cropping,
/// so no drawing state outlives or is shared between calls.
pub struct Canvas {
    img: RgbaImage,
}

impl Canvas {
    /// Fully transparent canvas.
    pub fn new(width: u32, height: u32) -> Canvas {
        Canvas { img: RgbaImage::from_pixel(width, height, TRANSPARENT) }
    }

    pub fn width(&self) -> u32 {
        self.img.width()
    }

    pub fn height(&self) -> u32 {
        self.img.height()
    }

    /// Sets one pixel; coordinates outside the canvas are ignored.
    pub fn put(&mut self, x: u32, y: u32, color: Rgba<u8>) {
        if x < self.img.width() && y < self.img.height() {
            self.img.put_pixel(x, y, color);
        }
    }

    pub fn fill_rect(&mut self, x: u32, y: u32, w: u32, h: u32, color: Rgba<u8>) {
        for yy in y..y.saturating_add(h) {
            for xx in x..x.saturating_add(w) {
                self.put(xx, yy, color);
            }
        }
    }

    /// Pixel width of `text` drawn with `draw_text`.
    pub fn text_width(text: &str) -> u32 {
        let n = text.chars().count() as u32;
        if n == 0 { 0 } else { n * (GLYPH_W + 1) - 1 }
    }

    /// Draws decimal digits with the top-left corner at `(x, y)`.
    /// Non-digit characters leave a blank cell.
    pub fn draw_text(&mut self, x: u32, y: u32, text: &str, color: Rgba<u8>) {
        for (i, ch) in text.chars().enumerate() {
            let Some(d) = ch.to_digit(10) else { continue };
            let gx = x + i as u32 * (GLYPH_W + 1);
            for (row, bits) in DIGITS[d as usize].iter().enumerate() {
                for col in 0..GLYPH_W {
                    if bits & (1 << (GLYPH_W - 1 - col)) != 0 {
                        self.put(gx + col, y + row as u32, color);
                    }
                }
            }
        }
    }

    /// Tight bounding box `(x, y, w, h)` of every pixel with non-zero alpha.
    pub fn content_bounds(&self) -> Option<(u32, u32, u32, u32)> {
        let mut bounds: Option<(u32, u32, u32, u32)> = None;
        for (x, y, p) in self.img.enumerate_pixels() {
            if p.0[3] == 0 {
                continue;
            }
            bounds = Some(match bounds {
                None => (x, y, x, y),
                Some((x0, y0, x1, y1)) => (x0.min(x), y0.min(y), x1.max(x), y1.max(y)),
            });
        }
        bounds.map(|(x0, y0, x1, y1)| (x0, y0, x1 - x0 + 1, y1 - y0 + 1))
    }

    /// Crops to the content bounds and surrounds the result with `padding`
    /// transparent pixels.  A canvas with no content crops to a
    /// `padding`-sized empty square (at least 1×1).
    pub fn into_cropped(self, padding: u32) -> Result<RgbaImage, HpiError> {
        let Some((x, y, w, h)) = self.content_bounds() else {
            let side = (2 * padding).max(1);
            return Ok(RgbaImage::from_pixel(side, side, TRANSPARENT));
        };
        let content = image::imageops::crop_imm(&self.img, x, y, w, h).to_image();
        let mut out = RgbaImage::from_pixel(w + 2 * padding, h + 2 * padding, TRANSPARENT);
        out.copy_from(&content, padding, padding)
            .map_err(|e| HpiError::Render(e.to_string()))?;
        Ok(out)
    }
}

/// Encodes an RGBA image as PNG.
pub fn encode_png(img: &RgbaImage) -> Result<Vec<u8>, HpiError> {
    let mut buf = Vec::new();
    PngEncoder::new(&mut buf)
        .write_image(img.as_raw(), img.width(), img.height(), ColorType::Rgba8)
        .map_err(|e| HpiError::Render(format!("PNG encoding failed: {}", e)))?;
    Ok(buf)
}

#[cfg(test)]
mod tests {
    use super::*;

    const RED: Rgba<u8> = Rgba([255, 0, 0, 255]);

    #[test]
    fn new_canvas_is_transparent() {
        let c = Canvas::new(4, 3);
        assert_eq!((c.width(), c.height()), (4, 3));
        assert_eq!(c.content_bounds(), None);
    }

    #[test]
    fn crop_is_tight_then_padded() {
        let mut c = Canvas::new(10, 10);
        c.fill_rect(2, 3, 4, 2, RED);
        assert_eq!(c.content_bounds(), Some((2, 3, 4, 2)));

        let img = c.into_cropped(1).unwrap();
        assert_eq!(img.dimensions(), (6, 4));
        assert_eq!(*img.get_pixel(0, 0), TRANSPARENT);
        assert_eq!(*img.get_pixel(1, 1), RED);
        assert_eq!(*img.get_pixel(4, 2), RED);
        assert_eq!(*img.get_pixel(5, 3), TRANSPARENT);
    }

    #[test]
    fn out_of_bounds_writes_are_ignored() {
        let mut c = Canvas::new(2, 2);
        c.put(5, 5, RED);
        c.fill_rect(1, 1, 10, 10, RED);
        assert_eq!(c.content_bounds(), Some((1, 1, 1, 1)));
    }

    #[test]
    fn digits_render_within_glyph_cells() {
        let mut c = Canvas::new(20, 10);
        c.draw_text(0, 0, "100", RED);
        assert_eq!(Canvas::text_width("100"), 11);
        let (x, y, w, h) = c.content_bounds().unwrap();
        assert_eq!((x, y), (0, 0));
        assert!(w <= Canvas::text_width("100"));
        assert_eq!(h, GLYPH_H);
    }

    #[test]
    fn png_has_signature() {
        let bytes = encode_png(&RgbaImage::from_pixel(2, 2, RED)).unwrap();
        assert_eq!(&bytes[..8], b"\x89PNG\r\n\x1a\n");
    }
}

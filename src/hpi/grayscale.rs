//! Grayscale conversion: any decodable raster image to an `IntensityMatrix`.
//!
//! Luminance uses the ITU-R BT.601 weights
//!
//! ```text
//! L = 0.299 R + 0.587 G + 0.114 B
//! ```
//!
//! evaluated in 16-bit fixed point (`19595`, `38470`, `7471`, which sum to
//! `65536`) with round-half-up.  Pure gray pixels therefore map to
//! themselves exactly.  Alpha is ignored.

use image::{DynamicImage, GenericImageView};
use log::debug;

use crate::error::HpiError;
use crate::math::intensity::IntensityMatrix;

const WEIGHT_R: u32 = 19_595;
const WEIGHT_G: u32 = 38_470;
const WEIGHT_B: u32 = 7_471;
const ROUND_HALF: u32 = 1 << 15;

/// Decodes PNG/JPEG/BMP/GIF bytes.
///
/// Fails with `HpiError::Decode` on unrecognized or corrupt data, and on
/// images with zero width or height.
pub fn decode(bytes: &[u8]) -> Result<DynamicImage, HpiError> {
    if bytes.is_empty() {
        return Err(HpiError::Decode("image data is empty".into()));
    }
    let img = image::load_from_memory(bytes).map_err(|e| HpiError::Decode(e.to_string()))?;
    let (width, height) = img.dimensions();
    if width == 0 || height == 0 {
        return Err(HpiError::Decode(format!("image has zero area ({}x{})", width, height)));
    }
    debug!("decoded {}x{} image ({:?})", width, height, img.color());
    Ok(img)
}

/// Luminance of one RGB triple.
pub fn luminance(r: u8, g: u8, b: u8) -> u8 {
    let l = r as u32 * WEIGHT_R + g as u32 * WEIGHT_G + b as u32 * WEIGHT_B + ROUND_HALF;
    (l >> 16) as u8
}

/// Reduces `image` to one intensity per pixel.
///
/// The result has `height` rows and `width` columns.
pub fn to_grayscale(image: &DynamicImage) -> Result<IntensityMatrix, HpiError> {
    let (width, height) = image.dimensions();
    let data: Vec<u8> = match image {
        // Already single-channel; keep the stored intensities.
        DynamicImage::ImageLuma8(gray) => gray.as_raw().clone(),
        DynamicImage::ImageLumaA8(gray) => gray.pixels().map(|p| p.0[0]).collect(),
        _ => image
            .to_rgb8()
            .pixels()
            .map(|p| luminance(p.0[0], p.0[1], p.0[2]))
            .collect(),
    };
    IntensityMatrix::from_raw(height as usize, width as usize, data)
}

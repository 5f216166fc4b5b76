use image::{GrayImage, Rgba, RgbaImage};
use imageproc::filter::gaussian_blur_f32;

use crate::color::{BlendMode, clamp_for_blend, select_blend_mode};
use crate::{RetintError, RetintResult};

/// Default Gaussian sigma applied to refined masks before blending.
pub const DEFAULT_BLUR_SIGMA: f32 = 1.5;

/// Decode refined-mask bytes into the per-pixel alpha map used for blending.
///
/// The dimension check runs before any pixel work; a mismatch is an error,
/// never a silent resize. A sigma of zero skips the blur, keeping hard mask
/// edges (useful for exact-output tests).
pub fn prepare_refined_mask(
    mask_bytes: &[u8],
    expected: (u32, u32),
    blur_sigma: f32,
) -> RetintResult<GrayImage> {
    let decoded = image::load_from_memory(mask_bytes)
        .map_err(|e| RetintError::MaskDecode(e.to_string()))?;
    let found = (decoded.width(), decoded.height());
    if found != expected {
        return Err(RetintError::MaskSizeMismatch { expected, found });
    }

    let gray = decoded.to_luma8();
    if blur_sigma > 0.0 {
        Ok(gaussian_blur_f32(&gray, blur_sigma))
    } else {
        Ok(gray)
    }
}

/// Shift masked pixels of the original toward the target color.
///
/// The blend mode is auto-selected from the unclamped target; the target is
/// then clamped into the usable mid-range for multiply blending. Each pixel
/// with mask intensity above zero is interpolated between its original color
/// and the blended color with `alpha = intensity / 255`; zero-intensity
/// pixels are copied verbatim. The original's alpha channel is always
/// preserved.
pub fn blend_recolor(
    original: &RgbaImage,
    mask: &GrayImage,
    target: [u8; 3],
) -> RetintResult<RgbaImage> {
    let expected = original.dimensions();
    let found = mask.dimensions();
    if expected != found {
        return Err(RetintError::MaskSizeMismatch { expected, found });
    }

    let mode = select_blend_mode(target);
    let clamped = clamp_for_blend(target);

    let (w, h) = expected;
    let mut output = RgbaImage::new(w, h);
    for ((source, mask_px), out_px) in original
        .pixels()
        .zip(mask.pixels())
        .zip(output.pixels_mut())
    {
        let intensity = mask_px[0];
        if intensity == 0 {
            *out_px = *source;
            continue;
        }

        let blended = match mode {
            BlendMode::Multiply => [
                multiply(source[0], clamped[0]),
                multiply(source[1], clamped[1]),
                multiply(source[2], clamped[2]),
            ],
            BlendMode::Grayscale => {
                let avg =
                    ((source[0] as u16 + source[1] as u16 + source[2] as u16) / 3) as u8;
                [avg, avg, avg]
            }
        };

        let alpha = intensity as f32 / 255.0;
        *out_px = Rgba([
            lerp(source[0], blended[0], alpha),
            lerp(source[1], blended[1], alpha),
            lerp(source[2], blended[2], alpha),
            source[3],
        ]);
    }
    Ok(output)
}

/// Encode the blended output as PNG, mapping encoder failures to the blend
/// error category.
pub fn encode_output(image: &RgbaImage) -> RetintResult<Vec<u8>> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    image
        .write_to(&mut cursor, image::ImageFormat::Png)
        .map_err(|e| RetintError::Blend(e.to_string()))?;
    Ok(cursor.into_inner())
}

fn multiply(original: u8, target: u8) -> u8 {
    ((original as u16 * target as u16) / 255) as u8
}

fn lerp(original: u8, blended: u8, alpha: f32) -> u8 {
    ((1.0 - alpha) * original as f32 + alpha * blended as f32).floor() as u8
}

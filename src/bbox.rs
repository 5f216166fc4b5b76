use image::GrayImage;

use crate::{RetintError, RetintResult};

/// Inclusive axis-aligned pixel bounds of the selected mask region, in
/// source-image space.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoundingBox {
    pub min_x: u32,
    pub min_y: u32,
    pub max_x: u32,
    pub max_y: u32,
}

impl BoundingBox {
    /// Width of the box in pixels (bounds are inclusive).
    pub fn width(&self) -> u32 {
        self.max_x - self.min_x + 1
    }

    /// Height of the box in pixels (bounds are inclusive).
    pub fn height(&self) -> u32 {
        self.max_y - self.min_y + 1
    }
}

/// Scan a grayscale mask for the tight bounding box of selected pixels.
///
/// A pixel is selected when its intensity is greater than zero. Returns
/// `None` when no pixel qualifies. Single linear pass; no early exit, since
/// the mask may occupy the full image.
pub fn scan(mask: &GrayImage) -> Option<BoundingBox> {
    let mut bounds: Option<BoundingBox> = None;
    for (x, y, pixel) in mask.enumerate_pixels() {
        if pixel[0] == 0 {
            continue;
        }
        match &mut bounds {
            None => {
                bounds = Some(BoundingBox {
                    min_x: x,
                    min_y: y,
                    max_x: x,
                    max_y: y,
                });
            }
            Some(b) => {
                b.min_x = b.min_x.min(x);
                b.min_y = b.min_y.min(y);
                b.max_x = b.max_x.max(x);
                b.max_y = b.max_y.max(y);
            }
        }
    }
    bounds
}

/// Decode mask bytes to grayscale and estimate the bounding box.
///
/// Decode failures surface as [`RetintError::BoundingBox`], distinct from the
/// compositor's mask-loading errors.
pub fn estimate_bounding_box(mask_bytes: &[u8]) -> RetintResult<Option<BoundingBox>> {
    let decoded = image::load_from_memory(mask_bytes)
        .map_err(|e| RetintError::BoundingBox(e.to_string()))?;
    Ok(scan(&decoded.to_luma8()))
}

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD;
use image::{Rgba, RgbaImage};
use tiny_skia::{FillRule, Paint, PathBuilder, Pixmap, Transform};

use crate::selection::{PathKind, SelectionPath};
use crate::{RetintError, RetintResult};

/// Raster convention for marking selected pixels, chosen per downstream
/// collaborator contract.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MaskEncoding {
    /// Opaque white foreground on an opaque black background. The recolor
    /// pipeline and bounding-box estimator consume this convention.
    ForegroundWhiteOpaque,
    /// Opaque black foreground on an opaque white background.
    ForegroundBlackOpaque,
    /// Opaque white foreground on a fully transparent background, for
    /// backends that read the selection from the alpha channel.
    ForegroundAlpha,
}

impl MaskEncoding {
    /// Map fill coverage (0 = background, 255 = selected) to an output pixel.
    fn encode(self, coverage: u8) -> Rgba<u8> {
        match self {
            MaskEncoding::ForegroundWhiteOpaque => Rgba([coverage, coverage, coverage, 255]),
            MaskEncoding::ForegroundBlackOpaque => {
                let v = 255 - coverage;
                Rgba([v, v, v, 255])
            }
            MaskEncoding::ForegroundAlpha => Rgba([255, 255, 255, coverage]),
        }
    }
}

/// Rasterize an ordered path list into a mask the size of the source image.
///
/// Each non-rubber path is filled independently with the nonzero rule, so
/// repeated drawing unions the regions. Anti-aliasing is off to keep the
/// mask binary; identical input always yields an identical raster.
pub fn rasterize_paths(
    paths: &[SelectionPath],
    width: u32,
    height: u32,
    encoding: MaskEncoding,
) -> RetintResult<RgbaImage> {
    let mut pixmap = Pixmap::new(width, height).ok_or(RetintError::Canvas { width, height })?;
    let paint = mask_paint();

    for path in paths.iter().filter(|p| p.kind.fills()) {
        if let Some(outline) = build_path(path) {
            pixmap.fill_path(&outline, &paint, FillRule::Winding, Transform::identity(), None);
        }
    }

    let data = pixmap.data();
    let mut mask = RgbaImage::new(width, height);
    for (index, pixel) in mask.pixels_mut().enumerate() {
        *pixel = encoding.encode(data[index * 4 + 3]);
    }
    Ok(mask)
}

/// Test whether a point lies inside a single path's filled region.
///
/// Fills the path into a throwaway canvas and samples the anchor pixel, the
/// same containment the rasterizer will later produce. Rubber paths and
/// out-of-canvas anchors never match.
pub fn hit_test(path: &SelectionPath, width: u32, height: u32, anchor: [f32; 2]) -> bool {
    if !path.kind.fills() {
        return false;
    }
    if anchor[0] < 0.0 || anchor[1] < 0.0 {
        return false;
    }
    let (x, y) = (anchor[0] as u32, anchor[1] as u32);
    if x >= width || y >= height {
        return false;
    }

    let Some(mut pixmap) = Pixmap::new(width, height) else {
        return false;
    };
    let Some(outline) = build_path(path) else {
        return false;
    };
    pixmap.fill_path(
        &outline,
        &mask_paint(),
        FillRule::Winding,
        Transform::identity(),
        None,
    );
    pixmap.pixel(x, y).is_some_and(|pixel| pixel.alpha() > 0)
}

/// Encode a raster mask (or any RGBA image) as a PNG buffer.
pub fn encode_png(image: &RgbaImage) -> RetintResult<Vec<u8>> {
    let mut cursor = std::io::Cursor::new(Vec::new());
    image.write_to(&mut cursor, image::ImageFormat::Png)?;
    Ok(cursor.into_inner())
}

/// Wrap a PNG buffer as a `data:` URI suitable for inline submission.
pub fn png_data_uri(png: &[u8]) -> String {
    format!("data:image/png;base64,{}", STANDARD.encode(png))
}

fn mask_paint() -> Paint<'static> {
    let mut paint = Paint::default();
    paint.set_color_rgba8(255, 255, 255, 255);
    paint.anti_alias = false;
    paint
}

/// Build the closed fill outline for one path. Returns `None` for rubber
/// paths, degenerate rectangles, and too-short polylines, all of which fill
/// nothing.
fn build_path(path: &SelectionPath) -> Option<tiny_skia::Path> {
    match path.kind {
        PathKind::Rubber => None,
        PathKind::Rectangle => {
            if path.points.len() != 2 {
                return None;
            }
            rect_outline(path.points[0], path.points[1])
        }
        PathKind::Freehand | PathKind::Point2Point => polyline_outline(&path.points),
    }
}

/// Axis-aligned rectangle from two opposite corners, normalized so the
/// corners may arrive in any order. Zero-area boxes fill nothing.
fn rect_outline(a: [f32; 2], b: [f32; 2]) -> Option<tiny_skia::Path> {
    let (left, right) = (a[0].min(b[0]), a[0].max(b[0]));
    let (top, bottom) = (a[1].min(b[1]), a[1].max(b[1]));
    if left >= right || top >= bottom {
        return None;
    }
    let mut builder = PathBuilder::new();
    builder.move_to(left, top);
    builder.line_to(right, top);
    builder.line_to(right, bottom);
    builder.line_to(left, bottom);
    builder.close();
    builder.finish()
}

/// Polyline through all points, closed for fill purposes.
fn polyline_outline(points: &[[f32; 2]]) -> Option<tiny_skia::Path> {
    if points.len() < 2 {
        return None;
    }
    let mut builder = PathBuilder::new();
    builder.move_to(points[0][0], points[0][1]);
    for point in &points[1..] {
        builder.line_to(point[0], point[1]);
    }
    builder.close();
    builder.finish()
}

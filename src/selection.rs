use serde::{Deserialize, Serialize};

use crate::RetintResult;
use crate::raster;

/// Distance (per axis, in image pixels) at which a lasso click counts as
/// closing the loop.
pub const CLOSE_THRESHOLD: f32 = 5.0;

/// Identifier assigned to a committed selection path, used for removal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PathId(pub u64);

/// Drawing tool that produced a selection path.
///
/// `Rubber` is a pseudo-kind: rubber strokes are never stored or rasterized;
/// applying one deletes the first existing path containing its anchor.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum PathKind {
    #[serde(rename = "freehand")]
    Freehand,
    #[serde(rename = "rubber")]
    Rubber,
    #[serde(rename = "rectangle")]
    Rectangle,
    #[serde(rename = "point2point")]
    Point2Point,
}

impl PathKind {
    /// Whether paths of this kind contribute filled area to the mask.
    pub fn fills(self) -> bool {
        !matches!(self, PathKind::Rubber)
    }
}

/// A single committed selection stroke, with points in source-image pixel
/// space.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SelectionPath {
    pub id: PathId,
    #[serde(rename = "type")]
    pub kind: PathKind,
    pub points: Vec<[f32; 2]>,
}

/// Wire form of a not-yet-committed stroke, as produced by drawing front
/// ends: `{"type": "...", "points": [[x, y], ...]}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PathSpec {
    #[serde(rename = "type")]
    pub kind: PathKind,
    pub points: Vec<[f32; 2]>,
}

/// One editing session over a single source image: the image dimensions plus
/// the live, ordered list of committed selection paths.
///
/// Owned and passed explicitly by whichever component drives the edit; there
/// is no shared global path store.
#[derive(Debug, Clone)]
pub struct EditSession {
    width: u32,
    height: u32,
    paths: Vec<SelectionPath>,
    next_id: u64,
}

impl EditSession {
    /// Start a session for a source image of known pixel dimensions.
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            paths: Vec::new(),
            next_id: 0,
        }
    }

    /// Start a session sized from a decoded image, so the mask canvas always
    /// matches the real pixel dimensions rather than a caller-supplied guess.
    pub fn for_image_bytes(bytes: &[u8]) -> RetintResult<Self> {
        let decoded = image::load_from_memory(bytes)?;
        Ok(Self::new(decoded.width(), decoded.height()))
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    /// Committed paths in insertion order.
    pub fn paths(&self) -> &[SelectionPath] {
        &self.paths
    }

    /// True when no stored path would contribute area to the mask.
    ///
    /// Callers should treat this as "nothing selected" and withhold
    /// mask-based actions instead of submitting an all-background mask.
    pub fn is_empty(&self) -> bool {
        !self.paths.iter().any(|p| p.kind.fills())
    }

    /// Map a point from displayed-canvas coordinates into image coordinates.
    pub fn map_display_point(&self, display: [f32; 2], display_size: [f32; 2]) -> [f32; 2] {
        let scale_x = self.width as f32 / display_size[0];
        let scale_y = self.height as f32 / display_size[1];
        [display[0] * scale_x, display[1] * scale_y]
    }

    /// Whether a candidate point is close enough to a stroke's start point to
    /// close the loop.
    pub fn is_near_start(points: &[[f32; 2]], candidate: [f32; 2]) -> bool {
        points.first().is_some_and(|start| {
            (start[0] - candidate[0]).abs() < CLOSE_THRESHOLD
                && (start[1] - candidate[1]).abs() < CLOSE_THRESHOLD
        })
    }

    /// Commit a freehand stroke. Strokes with fewer than two points are
    /// discarded and return `None`.
    pub fn add_freehand(&mut self, points: Vec<[f32; 2]>) -> Option<PathId> {
        if points.len() < 2 {
            return None;
        }
        Some(self.push(PathKind::Freehand, points))
    }

    /// Commit a rectangle from two opposite corners, in any order.
    pub fn add_rectangle(&mut self, corner_a: [f32; 2], corner_b: [f32; 2]) -> PathId {
        self.push(PathKind::Rectangle, vec![corner_a, corner_b])
    }

    /// Commit a closed lasso polygon. The loop is closed by duplicating the
    /// first point if the caller has not already done so. Strokes with fewer
    /// than two distinct points are discarded.
    pub fn add_polygon(&mut self, mut points: Vec<[f32; 2]>) -> Option<PathId> {
        if points.len() < 2 {
            return None;
        }
        if points.first() != points.last() {
            points.push(points[0]);
        }
        Some(self.push(PathKind::Point2Point, points))
    }

    /// Apply a drawn stroke with its tool's draw-time semantics: rubber
    /// strokes erase at their anchor, every other kind commits a path.
    pub fn add_spec(&mut self, spec: PathSpec) -> Option<PathId> {
        match spec.kind {
            PathKind::Freehand => self.add_freehand(spec.points),
            PathKind::Point2Point => self.add_polygon(spec.points),
            PathKind::Rectangle => {
                if spec.points.len() != 2 {
                    return None;
                }
                Some(self.add_rectangle(spec.points[0], spec.points[1]))
            }
            PathKind::Rubber => {
                if let Some(anchor) = spec.points.first() {
                    self.erase_at(*anchor);
                }
                None
            }
        }
    }

    /// Delete the first path (in insertion order) whose filled region
    /// contains the anchor point. Returns the removed path's id, or `None`
    /// when the anchor lies outside every path.
    pub fn erase_at(&mut self, anchor: [f32; 2]) -> Option<PathId> {
        let hit = self
            .paths
            .iter()
            .position(|p| raster::hit_test(p, self.width, self.height, anchor));
        hit.map(|index| self.paths.remove(index).id)
    }

    /// Remove a path by id. Returns false when no path carries the id.
    pub fn remove(&mut self, id: PathId) -> bool {
        let before = self.paths.len();
        self.paths.retain(|p| p.id != id);
        self.paths.len() != before
    }

    /// Drop every committed path.
    pub fn clear(&mut self) {
        self.paths.clear();
    }

    /// Rasterize the current selection into a mask with the requested
    /// encoding convention.
    pub fn rasterize(&self, encoding: raster::MaskEncoding) -> RetintResult<image::RgbaImage> {
        raster::rasterize_paths(&self.paths, self.width, self.height, encoding)
    }

    /// Rasterize and encode the current selection as a PNG buffer.
    pub fn mask_png(&self, encoding: raster::MaskEncoding) -> RetintResult<Vec<u8>> {
        raster::encode_png(&self.rasterize(encoding)?)
    }

    /// Rasterize and encode the current selection as a PNG data URI.
    pub fn mask_data_uri(&self, encoding: raster::MaskEncoding) -> RetintResult<String> {
        Ok(raster::png_data_uri(&self.mask_png(encoding)?))
    }

    fn push(&mut self, kind: PathKind, points: Vec<[f32; 2]>) -> PathId {
        let id = PathId(self.next_id);
        self.next_id += 1;
        self.paths.push(SelectionPath { id, kind, points });
        id
    }
}

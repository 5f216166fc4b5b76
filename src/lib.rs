//! Selection-mask rasterization and segmentation-guided recoloring.
//!
//! Two loosely related pixel-geometry cores back a photo-editing front end:
//!
//! - [`selection`] and [`raster`] turn user-drawn selection strokes
//!   (freehand, rectangle, lasso, eraser) into a raster mask aligned with
//!   the source photo, in the color convention a downstream backend expects.
//! - [`pipeline`] runs the recolor workflow: bounding box from the drawn
//!   mask ([`bbox`]), refined mask from an external segmentation service
//!   ([`segment`]), then an alpha-weighted color blend ([`blend`], [`color`]).
//!
//! [`request`] and [`inpaint`] cover the thin route-boundary contracts
//! around the cores; the services behind them stay opaque.

pub mod bbox;
pub mod blend;
pub mod color;
pub mod config;
pub mod error;
pub mod inpaint;
pub mod pipeline;
pub mod raster;
pub mod request;
pub mod segment;
pub mod selection;

pub use bbox::{BoundingBox, estimate_bounding_box};
pub use blend::{DEFAULT_BLUR_SIGMA, blend_recolor, encode_output, prepare_refined_mask};
pub use color::{BlendMode, parse_hex_color};
pub use config::{
    ENV_API_KEY, ENV_SEGMENT_ENDPOINT, ENV_UPLOAD_ENDPOINT, RecolorOptions, SegmentSettings,
};
pub use error::{RetintError, RetintResult};
pub use inpaint::{InpaintBackend, InpaintRequest};
pub use pipeline::{RecolorOutcome, RecolorPipeline, RecoloredImage};
pub use raster::{MaskEncoding, encode_png, png_data_uri, rasterize_paths};
pub use request::{EditAction, EditRequest, UseFor, missing_fields, plan};
pub use segment::{BoxPrompt, HttpSegmentClient, SegmentProvider, SegmentResponse};
pub use selection::{EditSession, PathId, PathKind, PathSpec, SelectionPath};

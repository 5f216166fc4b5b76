use thiserror::Error;

/// Result type alias for operations that may fail with [`RetintError`].
pub type RetintResult<T> = std::result::Result<T, RetintError>;

/// Error types that can occur during mask rasterization and recoloring.
///
/// Each pipeline stage fails with its own variant so callers can tell the
/// stages apart; none of the stages retries or recovers on its own.
#[derive(Debug, Error)]
pub enum RetintError {
    /// Image loading, decoding, or encoding error.
    #[error("Image processing failed: {0}")]
    Image(#[from] image::ImageError),
    /// File system I/O error.
    #[error(transparent)]
    Io(#[from] std::io::Error),
    /// Mask canvas dimensions cannot back a raster surface.
    #[error("Cannot allocate a {width}x{height} mask canvas")]
    Canvas { width: u32, height: u32 },
    /// Drawn or refined mask bytes failed to decode as an image.
    #[error("Could not decode mask image: {0}")]
    MaskDecode(String),
    /// Mask dimensions do not match the source image.
    #[error("Mask size {found:?} does not match source image size {expected:?}")]
    MaskSizeMismatch {
        expected: (u32, u32),
        found: (u32, u32),
    },
    /// Failure while estimating the bounding box of the drawn mask.
    #[error("Bounding box estimation failed: {0}")]
    BoundingBox(String),
    /// Failure pushing the original image to object storage.
    #[error("Image upload failed: {0}")]
    Upload(String),
    /// The segmentation service call failed (including upload as the
    /// proximate cause).
    #[error("Segmentation failed: {0}")]
    Segmentation(String),
    /// A remote image fetch answered with a non-success HTTP status.
    #[error("Fetching {url} failed with HTTP status {status}")]
    RemoteStatus { url: String, status: u16 },
    /// A remote image fetch failed before an HTTP status was available.
    #[error("Fetching {url} failed: {message}")]
    RemoteFetch { url: String, message: String },
    /// A target color code could not be parsed.
    #[error("Invalid color code `{0}`: expected 6 hex digits")]
    ColorParse(String),
    /// Failure during per-pixel compositing or output re-encoding.
    #[error("Recolor blend failed: {0}")]
    Blend(String),
}

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use retint::MaskEncoding;

/// Command line interface definition.
#[derive(Parser, Debug)]
#[command(author, version, about, propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Rasterize a selection file into a mask PNG
    Mask(MaskCommand),
    /// Print the bounding box of a mask's selected pixels
    Bbox(BboxCommand),
    /// Recolor an image locally using an already-refined mask
    Blend(BlendCommand),
    /// Run the full segmentation-guided recolor pipeline
    Recolor(RecolorCommand),
}

/// Mask color conventions selectable on the command line.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum EncodingArg {
    /// White foreground on opaque black (recolor pipeline convention)
    WhiteOpaque,
    /// Black foreground on opaque white
    BlackOpaque,
    /// White foreground on a transparent background
    Alpha,
}

impl From<EncodingArg> for MaskEncoding {
    /// Convert EncodingArg to retint::MaskEncoding.
    fn from(value: EncodingArg) -> Self {
        match value {
            EncodingArg::WhiteOpaque => MaskEncoding::ForegroundWhiteOpaque,
            EncodingArg::BlackOpaque => MaskEncoding::ForegroundBlackOpaque,
            EncodingArg::Alpha => MaskEncoding::ForegroundAlpha,
        }
    }
}

#[derive(Args, Debug)]
pub struct MaskCommand {
    /// Selection strokes JSON file (array of {"type", "points"} objects)
    pub selections: PathBuf,
    /// Source image; its decoded dimensions size the mask canvas
    #[arg(short, long)]
    pub image: PathBuf,
    /// Output path (defaults to `<image>-mask.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    /// Mask color convention
    #[arg(long, value_enum, default_value_t = EncodingArg::WhiteOpaque)]
    pub encoding: EncodingArg,
    /// Print the mask as a PNG data URI instead of writing a file
    #[arg(long = "data-uri")]
    pub data_uri: bool,
}

#[derive(Args, Debug)]
pub struct BboxCommand {
    /// Mask image path (white foreground on black)
    pub mask: PathBuf,
}

#[derive(Args, Debug)]
pub struct BlendCommand {
    /// Original image path
    pub image: PathBuf,
    /// Refined mask image path
    #[arg(short, long)]
    pub mask: PathBuf,
    /// Target color as #RRGGBB
    #[arg(short, long)]
    pub color: String,
    /// Output path (defaults to `<image>-recolored.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub blur: BlurArgs,
}

#[derive(Args, Debug)]
pub struct RecolorCommand {
    /// Original image path
    pub image: PathBuf,
    /// Drawn selection mask path (white foreground on black)
    #[arg(short, long)]
    pub mask: PathBuf,
    /// Target color as #RRGGBB
    #[arg(short, long)]
    pub color: String,
    /// Output path (defaults to `<image>-recolored.png`)
    #[arg(short, long)]
    pub output: Option<PathBuf>,
    #[command(flatten)]
    pub blur: BlurArgs,
    #[command(flatten)]
    pub service: ServiceArgs,
}

#[derive(Args, Debug)]
pub struct BlurArgs {
    /// Gaussian sigma applied to the refined mask before blending (0 disables)
    #[arg(long = "blur-sigma", default_value_t = retint::DEFAULT_BLUR_SIGMA)]
    pub blur_sigma: f32,
}

#[derive(Args, Debug)]
pub struct ServiceArgs {
    /// Segmentation endpoint URL
    #[arg(long, env = "RETINT_SEGMENT_ENDPOINT")]
    pub endpoint: String,
    /// Object-storage upload endpoint URL
    #[arg(long = "upload-endpoint", env = "RETINT_UPLOAD_ENDPOINT")]
    pub upload_endpoint: String,
    /// API key for the segmentation service
    #[arg(long = "api-key", env = "RETINT_API_KEY", hide_env_values = true)]
    pub api_key: Option<String>,
    /// Per-request timeout in seconds
    #[arg(long = "timeout-secs", default_value_t = 30)]
    pub timeout_secs: u64,
    /// Disable the single retry on transient network failures
    #[arg(long = "no-retry")]
    pub no_retry: bool,
}

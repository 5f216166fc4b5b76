use std::fs;

use retint::{RetintResult, blend_recolor, encode_output, parse_hex_color, prepare_refined_mask};

use crate::cli::BlendCommand;

use super::utils::derive_variant_path;

/// The main function to run the blend command: a local recolor with a mask
/// that has already been refined, no segmentation round trip.
pub fn run(cmd: BlendCommand) -> RetintResult<()> {
    let original = image::load_from_memory(&fs::read(&cmd.image)?)?.to_rgba8();
    let mask_bytes = fs::read(&cmd.mask)?;
    let mask = prepare_refined_mask(&mask_bytes, original.dimensions(), cmd.blur.blur_sigma)?;
    let target = parse_hex_color(&cmd.color)?;

    let blended = blend_recolor(&original, &mask, target)?;
    let output_path = cmd
        .output
        .unwrap_or_else(|| derive_variant_path(&cmd.image, "recolored", "png"));
    fs::write(&output_path, encode_output(&blended)?)?;
    println!("Recolored PNG saved to {}", output_path.display());

    Ok(())
}

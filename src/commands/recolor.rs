use std::fs;

use retint::{
    HttpSegmentClient, RecolorOptions, RecolorOutcome, RecolorPipeline, RetintResult,
};

use crate::cli::RecolorCommand;

use super::utils::{build_settings, derive_variant_path};

/// The main function to run the recolor command: the full pipeline against a
/// live segmentation service.
pub fn run(cmd: RecolorCommand) -> RetintResult<()> {
    let original = fs::read(&cmd.image)?;
    let mask = fs::read(&cmd.mask)?;

    let client = HttpSegmentClient::new(build_settings(&cmd.service));
    let pipeline = RecolorPipeline::new(client)
        .with_options(RecolorOptions::default().with_blur_sigma(cmd.blur.blur_sigma));

    match pipeline.run(&original, &mask, &cmd.color)? {
        RecolorOutcome::NothingSelected => {
            println!("Nothing selected: no output written.");
        }
        RecolorOutcome::Recolored(result) => {
            for line in result.segmentation_logs() {
                eprintln!("[segmentation] {line}");
            }
            let output_path = cmd
                .output
                .unwrap_or_else(|| derive_variant_path(&cmd.image, "recolored", "png"));
            fs::write(&output_path, result.as_bytes())?;
            println!("Recolored PNG saved to {}", output_path.display());
        }
    }

    Ok(())
}

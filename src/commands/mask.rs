use std::fs;

use retint::RetintResult;

use crate::cli::MaskCommand;

use super::utils::{derive_variant_path, load_session};

/// The main function to run the mask command.
pub fn run(cmd: MaskCommand) -> RetintResult<()> {
    let (session, discarded) = load_session(&cmd.selections, &cmd.image)?;
    if discarded > 0 {
        eprintln!("Discarded {discarded} invalid stroke(s).");
    }
    if session.is_empty() {
        eprintln!("Warning: nothing selected; the mask is all background.");
    }

    let encoding = cmd.encoding.into();
    if cmd.data_uri {
        println!("{}", session.mask_data_uri(encoding)?);
        return Ok(());
    }

    let output_path = cmd
        .output
        .unwrap_or_else(|| derive_variant_path(&cmd.image, "mask", "png"));
    fs::write(&output_path, session.mask_png(encoding)?)?;
    println!("Mask PNG saved to {}", output_path.display());

    Ok(())
}

use std::fs;

use retint::{RetintResult, estimate_bounding_box};

use crate::cli::BboxCommand;

/// The main function to run the bbox command.
pub fn run(cmd: BboxCommand) -> RetintResult<()> {
    let bytes = fs::read(&cmd.mask)?;
    match estimate_bounding_box(&bytes)? {
        Some(b) => println!(
            "Bounding box: ({}, {}) .. ({}, {}) — {}x{} px",
            b.min_x,
            b.min_y,
            b.max_x,
            b.max_y,
            b.width(),
            b.height()
        ),
        None => println!("No selection: every pixel is background."),
    }
    Ok(())
}

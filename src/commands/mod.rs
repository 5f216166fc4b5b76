mod bbox;
mod blend;
mod mask;
mod recolor;
mod utils;

use retint::RetintResult;

use crate::cli::{Cli, Commands};

/// The main function to run the command based on CLI input.
pub fn run(cli: Cli) -> RetintResult<()> {
    match cli.command {
        Commands::Mask(cmd) => mask::run(cmd),
        Commands::Bbox(cmd) => bbox::run(cmd),
        Commands::Blend(cmd) => blend::run(cmd),
        Commands::Recolor(cmd) => recolor::run(cmd),
    }
}

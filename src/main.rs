mod cli;
mod commands;
mod report;

use clap::Parser;

fn main() {
    let cli = cli::Cli::parse();
    if let Err(error) = commands::run(cli) {
        report::report_error(&error);
        std::process::exit(1);
    }
}

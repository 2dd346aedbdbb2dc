//! Conjure CLI - convert survey exports into surveys and results.

mod cli;
mod commands;
mod logging;

use clap::Parser;
use cli::{Cli, Commands};

fn main() {
    let cli = Cli::parse();
    logging::init(cli.verbose);

    let result = match cli.command {
        Commands::Convert {
            file,
            edits,
            output,
            sample_size,
            seed,
        } => commands::convert::run(file, edits, output, sample_size, seed),

        Commands::Survey { file, edits } => commands::survey::run(file, edits),

        Commands::Inspect { file, json } => commands::inspect::run(file, json),
    };

    if let Err(e) = result {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

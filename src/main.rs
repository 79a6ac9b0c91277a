//! identrefs CLI binary
//!
//! This is the main entry point for the identrefs command-line interface.
//! The CLI is a thin adapter over the library - NO logic is implemented here.

use clap::CommandFactory;
use identrefs::cli::Cli;
use identrefs::{run_query, CancelToken, ConsoleSink, TreeSitterResolver};
use std::io;
use std::process::ExitCode;

fn main() -> ExitCode {
    // Parse CLI arguments
    let cli = identrefs::cli::parse_args();

    // Initialize logger if verbose
    if cli.verbose {
        env_logger::init();
    }

    // Missing file or position is a usage error, not a failure
    let Some(config) = cli.to_config() else {
        if let Err(e) = Cli::command().print_help() {
            eprintln!("error: {}", e);
        }
        return ExitCode::SUCCESS;
    };

    let resolver = TreeSitterResolver::new(config.jobs);
    let mut sink = ConsoleSink::new(io::stdout().lock(), io::stderr(), config.format);

    match run_query(&config, &resolver, &mut sink, &CancelToken::new()) {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::from(1)
        }
    }
}

use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::{EnvFilter, fmt, prelude::*};

use bookmarklet_packer::cli::Cli;

fn main() -> ExitCode {
    let args = Cli::parse();
    init_tracing(&args);

    match bookmarklet_packer::run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("Error: {e:#}");
            ExitCode::FAILURE
        }
    }
}

fn init_tracing(args: &Cli) {
    if args.quiet {
        return;
    }

    let filter = match args.verbose {
        0 => "warn,bookmarklet_packer=info",
        1 => "info,bookmarklet_packer=debug",
        _ => "debug,bookmarklet_packer=trace",
    };
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

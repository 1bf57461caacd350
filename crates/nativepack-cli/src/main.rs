// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

mod demo;
mod error;
mod package;
mod platform;
mod resolve;
mod utils;

use clap::{Parser, Subcommand};
use error::result_to_exit_code;
use std::process::ExitCode;

/// nativepack CLI - Resolve, package and load bundled native libraries
#[derive(Parser)]
#[command(name = "nativepack")]
#[command(version)]
#[command(about = "nativepack CLI - Resolve, package and load bundled native libraries")]
#[command(long_about = None)]
#[command(propagate_version = true)]
struct Cli {
    /// Enable verbose logging (use RUST_LOG=debug for more)
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Suppress non-error output
    #[arg(short, long, global = true)]
    quiet: bool,

    /// Output results in JSON format
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the detected operating system and architecture
    Platform(platform::Args),

    /// Show the file name and resource path of a library
    Resolve(resolve::Args),

    /// Copy a built library into the resource layout
    Package(package::Args),

    /// Load the demo library and call into it
    Demo(demo::Args),
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Initialize logging based on verbosity
    init_logging(cli.verbose, cli.quiet);

    let result = match cli.command {
        Commands::Platform(args) => platform::execute(args, cli.json),
        Commands::Resolve(args) => resolve::execute(args, cli.json),
        Commands::Package(args) => package::execute(args, cli.json),
        Commands::Demo(args) => demo::execute(args, cli.json),
    };

    result_to_exit_code(result)
}

/// Initialize env_logger based on verbosity flags
fn init_logging(verbose: bool, quiet: bool) {
    let env = env_logger::Env::default();

    let env = if quiet {
        env.default_filter_or("error")
    } else if verbose {
        env.default_filter_or("debug")
    } else {
        env.default_filter_or("info")
    };

    env_logger::Builder::from_env(env)
        .format_timestamp(None)
        .format_target(false)
        .init();

    log::debug!("Logging initialized");
}

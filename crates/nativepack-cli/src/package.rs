// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils::{self, print_json, TargetArgs};
use clap::Args as ClapArgs;
use nativepack::{resource, DirectoryResources};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Built shared library to package (e.g. target/release/libhello_native.so)
    library: PathBuf,

    /// Logical library name the file is packaged as
    #[arg(short, long)]
    name: String,

    /// Resource root directory [default: $NATIVEPACK_RESOURCES or resources/ next to the binary]
    #[arg(short, long)]
    resources: Option<PathBuf>,

    #[command(flatten)]
    target: TargetArgs,

    /// Replace an existing packaged library
    #[arg(short, long)]
    force: bool,
}

#[derive(Debug, Serialize)]
struct Packaged {
    name: String,
    source: String,
    destination: String,
    resource_path: String,
    bytes: u64,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing package command: {:?}", args);

    let platform = args.target.platform();
    let resolved = utils::resolve(&platform, &args.name)?;

    if !args.library.is_file() {
        return Err(CliError::InvalidArgs(format!(
            "library file not found: {}",
            args.library.display()
        )));
    }

    let root = args
        .resources
        .unwrap_or_else(resource::resource_dir_from_env);
    let destination = DirectoryResources::new(&root)
        .file_path(&resolved.resource_path)
        .ok_or_else(|| {
            CliError::InvalidArgs(format!("invalid library name: {}", args.name))
        })?;

    if destination.exists() && !args.force {
        return Err(CliError::InvalidArgs(format!(
            "{} already exists (use --force to replace it)",
            destination.display()
        )));
    }

    if let Some(parent) = destination.parent() {
        fs::create_dir_all(parent).map_err(|e| {
            CliError::General(format!("Failed to create {}: {}", parent.display(), e))
        })?;
    }

    let bytes = fs::copy(&args.library, &destination).map_err(|e| {
        CliError::General(format!(
            "Failed to copy {} to {}: {}",
            args.library.display(),
            destination.display(),
            e
        ))
    })?;

    log::info!(
        "Packaged {} as '{}' for {}",
        args.library.display(),
        args.name,
        platform
    );

    let packaged = Packaged {
        name: args.name,
        source: args.library.display().to_string(),
        destination: destination.display().to_string(),
        resource_path: resolved.resource_path,
        bytes,
    };

    if json {
        print_json(&packaged)?;
    } else {
        println!("{}", packaged.destination);
    }

    Ok(())
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils::{self, print_json, TargetArgs};
use clap::Args as ClapArgs;
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Logical library name (e.g. "HelloNative")
    name: String,

    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Serialize)]
struct Resolution {
    name: String,
    os: String,
    arch: String,
    file_name: String,
    resource_path: String,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing resolve command: {:?}", args);

    let platform = args.target.platform();
    let resolved = utils::resolve(&platform, &args.name)?;

    let resolution = Resolution {
        name: resolved.logical_name,
        os: platform.os_name().to_string(),
        arch: platform.arch_name().to_string(),
        file_name: resolved.file_name,
        resource_path: resolved.resource_path,
    };

    if json {
        print_json(&resolution)?;
    } else {
        println!("{}", resolution.resource_path);
        log::info!(
            "{} -> {} on {} ({})",
            resolution.name,
            resolution.file_name,
            resolution.os,
            resolution.arch
        );
    }

    Ok(())
}

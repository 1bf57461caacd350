// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils::{print_json, TargetArgs};
use clap::Args as ClapArgs;
use nativepack::{resource, Platform};
use serde::Serialize;

#[derive(ClapArgs, Debug)]
pub struct Args {
    #[command(flatten)]
    target: TargetArgs,
}

#[derive(Debug, Serialize)]
struct PlatformInfo {
    os_name: String,
    arch_name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    os_segment: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    arch_segment: Option<&'static str>,
    supported: bool,
    resource_dir: String,
}

impl PlatformInfo {
    fn new(platform: &Platform) -> Self {
        PlatformInfo {
            os_name: platform.os_name().to_string(),
            arch_name: platform.arch_name().to_string(),
            os_segment: platform.os().map(|os| os.segment()),
            arch_segment: platform.arch().map(|arch| arch.segment()),
            supported: platform.is_supported(),
            resource_dir: resource::resource_dir_from_env().display().to_string(),
        }
    }
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing platform command: {:?}", args);

    let info = PlatformInfo::new(&args.target.platform());

    if json {
        print_json(&info)?;
    } else {
        print_text_info(&info);
    }

    Ok(())
}

fn print_text_info(info: &PlatformInfo) {
    println!("OS:           {}", info.os_name);
    println!("Architecture: {}", info.arch_name);
    println!(
        "Resource dir: /{}/{}/",
        info.os_segment.unwrap_or("?"),
        info.arch_segment.unwrap_or("?")
    );
    println!("Supported:    {}", if info.supported { "yes" } else { "no" });
    println!("Resources:    {}", info.resource_dir);
}

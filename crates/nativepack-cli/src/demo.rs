// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::error::CliError;
use crate::utils::print_json;
use clap::Args as ClapArgs;
use nativepack::{libloading, resource, DirectoryResources, NativeLibrary, Registry};
use serde::Serialize;
use std::ffi::CStr;
use std::os::raw::{c_char, c_int};
use std::path::PathBuf;

#[derive(ClapArgs, Debug)]
pub struct Args {
    /// Resource root directory [default: $NATIVEPACK_RESOURCES or resources/ next to the binary]
    #[arg(short, long)]
    resources: Option<PathBuf>,

    /// Logical name of the demo library
    #[arg(short, long, default_value = "HelloNative")]
    name: String,

    /// Number of greetings to request
    #[arg(short, long, default_value = "3")]
    times: c_int,
}

pub type SayHelloFn = unsafe extern "C" fn(times: c_int);
pub type VersionFn = unsafe extern "C" fn() -> *const c_char;

/// Functions exported by the demo library
struct HelloNative<'lib> {
    say_hello: libloading::Symbol<'lib, SayHelloFn>,
    version: Option<libloading::Symbol<'lib, VersionFn>>,
}

impl<'lib> HelloNative<'lib> {
    fn bind(library: &'lib NativeLibrary) -> Result<Self, nativepack::Error> {
        unsafe {
            Ok(HelloNative {
                say_hello: library.get(b"say_hello")?,
                version: library.get(b"hello_native_version").ok(),
            })
        }
    }

    fn version(&self) -> Option<String> {
        let version = self.version.as_ref()?;
        let ptr = unsafe { version() };
        if ptr.is_null() {
            return None;
        }
        let cstr = unsafe { CStr::from_ptr(ptr) };
        Some(cstr.to_string_lossy().into_owned())
    }

    fn say_hello(&self, times: c_int) {
        unsafe { (self.say_hello)(times) }
    }
}

#[derive(Debug, Serialize)]
struct DemoResult {
    name: String,
    resource_path: String,
    extracted_to: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    version: Option<String>,
    times: c_int,
}

pub fn execute(args: Args, json: bool) -> Result<(), CliError> {
    log::debug!("Executing demo command: {:?}", args);

    if args.times < 0 {
        return Err(CliError::InvalidArgs(format!(
            "--times must not be negative: {}",
            args.times
        )));
    }

    let root = args
        .resources
        .unwrap_or_else(resource::resource_dir_from_env);
    let registry = Registry::new(DirectoryResources::new(root));

    let handle = registry.load(&args.name)?;
    let hello = HelloNative::bind(handle.library())?;

    let version = hello.version();
    if let Some(version) = &version {
        log::info!("{} version {}", args.name, version);
    }

    let result = DemoResult {
        name: args.name.clone(),
        resource_path: handle.resource_path().to_string(),
        extracted_to: handle.library().path().display().to_string(),
        version,
        times: args.times,
    };

    hello.say_hello(args.times);

    if json {
        print_json(&result)?;
    }

    Ok(())
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! Demo native library.
//!
//! Built as a `cdylib`, packaged with `nativepack package` and called from
//! `nativepack demo`.

use std::{
    io::{self, Write},
    os::raw::{c_char, c_int},
};

pub const GREETING: &str = "Hello from Rust!";

static VERSION: &str = concat!(env!("CARGO_PKG_VERSION"), "\0");

fn write_greetings<W: Write>(out: &mut W, times: c_int) -> io::Result<()> {
    for _ in 0..times.max(0) {
        writeln!(out, "{}", GREETING)?;
    }
    out.flush()
}

/// Print the greeting `times` times to stdout.
#[no_mangle]
pub extern "C" fn say_hello(times: c_int) {
    let stdout = io::stdout();
    let _ = write_greetings(&mut stdout.lock(), times);
}

/// NUL-terminated version string of this library.
#[no_mangle]
pub extern "C" fn hello_native_version() -> *const c_char {
    VERSION.as_ptr().cast()
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::CStr;

    #[test]
    fn test_greetings() {
        let mut out = Vec::new();
        write_greetings(&mut out, 3).unwrap();
        assert_eq!(
            String::from_utf8(out).unwrap(),
            "Hello from Rust!\nHello from Rust!\nHello from Rust!\n"
        );
    }

    #[test]
    fn test_no_greetings() {
        let mut out = Vec::new();
        write_greetings(&mut out, 0).unwrap();
        write_greetings(&mut out, -5).unwrap();
        assert!(out.is_empty());
    }

    #[test]
    fn test_version() {
        let version = unsafe { CStr::from_ptr(hello_native_version()) };
        assert_eq!(version.to_str().unwrap(), env!("CARGO_PKG_VERSION"));
    }
}

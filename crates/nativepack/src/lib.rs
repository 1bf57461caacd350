// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

//! nativepack
//!
//! Load platform-specific native shared libraries that ship inside an
//! application's packaged resources.
//!
//! Libraries are stored below a resource root using the layout
//! `/<os>/<arch>/<file>`, for example `/linux/x86-64/libJniDemo.so` or
//! `/windows/x86-64/JniDemo.dll`. Loading a library by its logical name
//! resolves that path for the running platform, extracts the bytes to a
//! temporary file and links it into the process with the system dynamic
//! loader. Every logical name is loaded at most once.
//!
//! # Quick Start
//!
//! ```no_run
//! use std::os::raw::c_int;
//!
//! let _cleanup = nativepack::cleanup_guard();
//! let lib = nativepack::load("JniDemo")?;
//! unsafe {
//!     let say_hello = lib.library().get::<unsafe extern "C" fn(c_int)>(b"say_hello")?;
//!     say_hello(3);
//! }
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! Use a [`Registry`] directly to load from another [`ResourceProvider`],
//! such as libraries embedded with `include_bytes!`:
//!
//! ```no_run
//! use nativepack::{EmbeddedResources, Registry};
//!
//! let resources = EmbeddedResources::new()
//!     .with("/linux/x86-64/libJniDemo.so", &b"..."[..]);
//! let registry = Registry::new(resources);
//! let lib = registry.load("JniDemo")?;
//! # Ok::<(), Box<dyn std::error::Error>>(())
//! ```
//!
//! # Configuration
//!
//! - `NATIVEPACK_RESOURCES`: resource root used by [`global`] and [`load`].
//!   Defaults to `resources/` next to the executable.
//! - `NATIVEPACK_OS`, `NATIVEPACK_ARCH`: override the detected platform.

use std::{error, fmt, io, sync::OnceLock};

/// The platform module maps OS and architecture names to resource locations.
pub mod platform;

/// The resource module provides the sources libraries are extracted from.
pub mod resource;

/// The loader module links extracted files into the process.
pub mod loader;

/// The registry module caches loaded libraries by logical name.
pub mod registry;

pub use loader::{DynamicLoader, NativeLibrary, SystemLoader};
pub use platform::{Arch, OsFamily, Platform, ResolvedLibrary};
pub use registry::{LibraryHandle, LoadedLibrary, Registry};
pub use resource::{DirectoryResources, EmbeddedResources, ResourceProvider};

// Re-export libloading for symbol types
pub use libloading;

/// Error type for nativepack operations
#[derive(Debug)]
pub enum Error {
    /// A library could not be loaded
    Link(LinkError),

    /// A loaded library does not export the requested symbol
    SymbolNotFound(String),

    /// I/O error outside of library loading
    Io(io::Error),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Error::Link(err) => write!(f, "{}", err),
            Error::SymbolNotFound(sym) => write!(f, "Symbol not found: {}", sym),
            Error::Io(err) => write!(f, "I/O error: {}", err),
        }
    }
}

impl error::Error for Error {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        match self {
            Error::Link(err) => Some(err),
            Error::SymbolNotFound(_) => None,
            Error::Io(err) => Some(err),
        }
    }
}

impl From<LinkError> for Error {
    fn from(err: LinkError) -> Self {
        Error::Link(err)
    }
}

impl From<io::Error> for Error {
    fn from(err: io::Error) -> Self {
        Error::Io(err)
    }
}

/// The stage at which loading a library failed.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum LinkErrorKind {
    /// The logical name was empty
    InvalidName,
    /// The OS or architecture is not in the platform tables
    UnsupportedPlatform,
    /// No resource exists at the resolved path
    ResourceNotFound,
    /// Reading the resource or writing the temporary file failed
    Io,
    /// The dynamic loader rejected the extracted file
    Link,
}

impl fmt::Display for LinkErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            LinkErrorKind::InvalidName => "invalid library name",
            LinkErrorKind::UnsupportedPlatform => "unsupported platform",
            LinkErrorKind::ResourceNotFound => "resource not found",
            LinkErrorKind::Io => "I/O error",
            LinkErrorKind::Link => "link error",
        };
        f.write_str(s)
    }
}

/// A library could not be loaded.
///
/// Carries the logical name, the resource path it resolved to (if the
/// platform is supported) and the underlying cause.
#[derive(Debug)]
pub struct LinkError {
    logical_name: String,
    resource_path: Option<String>,
    platform: Option<String>,
    kind: LinkErrorKind,
    source: Option<loader::LoaderError>,
}

impl LinkError {
    pub(crate) fn new(
        logical_name: &str,
        resource_path: Option<&str>,
        kind: LinkErrorKind,
        source: Option<loader::LoaderError>,
    ) -> Self {
        LinkError {
            logical_name: logical_name.to_string(),
            resource_path: resource_path.map(str::to_string),
            platform: None,
            kind,
            source,
        }
    }

    pub(crate) fn with_platform(mut self, platform: &Platform) -> Self {
        self.platform = Some(platform.to_string());
        self
    }

    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    pub fn resource_path(&self) -> Option<&str> {
        self.resource_path.as_deref()
    }

    pub fn kind(&self) -> LinkErrorKind {
        self.kind
    }
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(
            f,
            "could not load library '{}' from '{}': {}",
            self.logical_name,
            self.resource_path.as_deref().unwrap_or("<unresolved>"),
            self.kind
        )?;
        if let Some(platform) = &self.platform {
            write!(f, " {}", platform)?;
        }
        if let Some(source) = &self.source {
            write!(f, ": {}", source)?;
        }
        Ok(())
    }
}

impl error::Error for LinkError {
    fn source(&self) -> Option<&(dyn error::Error + 'static)> {
        self.source
            .as_deref()
            .map(|err| err as &(dyn error::Error + 'static))
    }
}

static GLOBAL: OnceLock<Registry<DirectoryResources>> = OnceLock::new();

/// The process-wide registry, reading resources from
/// [`resource::resource_dir_from_env`].
pub fn global() -> &'static Registry<DirectoryResources> {
    GLOBAL.get_or_init(|| {
        let resources = DirectoryResources::from_env();
        log::debug!("using resources from {}", resources.root().display());
        Registry::new(resources)
    })
}

/// Load `name` through the process-wide registry.
pub fn load(name: &str) -> Result<LibraryHandle<NativeLibrary>, LinkError> {
    global().load(name)
}

/// Removes the temporary files of the process-wide registry when dropped.
///
/// Statics are never dropped, so `main` should hold this guard for as long
/// as the libraries are in use.
#[must_use = "temporary files are removed when the guard is dropped"]
#[derive(Debug)]
pub struct ExitGuard(());

impl Drop for ExitGuard {
    fn drop(&mut self) {
        if let Some(registry) = GLOBAL.get() {
            registry.remove_temp_files();
        }
    }
}

pub fn cleanup_guard() -> ExitGuard {
    ExitGuard(())
}

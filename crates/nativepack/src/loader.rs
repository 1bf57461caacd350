// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{platform::split_file_name, Error};
use std::{
    error,
    ffi::OsStr,
    fmt,
    io::{self, Read, Write},
    path::{Path, PathBuf},
};
use tempfile::TempPath;

/// Boxed error returned by a [`DynamicLoader`].
pub type LoaderError = Box<dyn error::Error + Send + Sync + 'static>;

/// The step that links a shared library file into the running process.
///
/// [`SystemLoader`] is the real implementation; tests substitute their own to
/// observe how often loading happens.
pub trait DynamicLoader: Send + Sync {
    type Library: Send + Sync + 'static;

    fn open(&self, path: &Path) -> Result<Self::Library, LoaderError>;
}

/// Loads libraries with the operating system's dynamic loader.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemLoader;

impl DynamicLoader for SystemLoader {
    type Library = NativeLibrary;

    fn open(&self, path: &Path) -> Result<NativeLibrary, LoaderError> {
        Ok(unsafe { NativeLibrary::open(path)? })
    }
}

/// A shared library linked into the process.
pub struct NativeLibrary {
    library: libloading::Library,
    path: PathBuf,
}

impl NativeLibrary {
    /// Load the shared library at `path`.
    ///
    /// # Safety
    ///
    /// Loading a library runs its initialization routines, which may do
    /// anything. The caller must trust the library.
    pub unsafe fn open<P: AsRef<OsStr>>(path: P) -> Result<Self, libloading::Error> {
        let path = PathBuf::from(path.as_ref());
        let library = unsafe { libloading::Library::new(&path)? };
        Ok(NativeLibrary { library, path })
    }

    /// Path the library was loaded from.
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Look up `symbol` in the library.
    ///
    /// # Safety
    ///
    /// `T` must match the actual type of the exported symbol.
    pub unsafe fn get<T>(&self, symbol: &[u8]) -> Result<libloading::Symbol<'_, T>, Error> {
        unsafe { self.library.get(symbol) }
            .map_err(|_| Error::SymbolNotFound(String::from_utf8_lossy(symbol).into_owned()))
    }

    /// Check whether the library exports `symbol`.
    pub fn has_symbol(&self, symbol: &str) -> bool {
        unsafe { self.library.get::<*const ()>(symbol.as_bytes()).is_ok() }
    }
}

impl fmt::Debug for NativeLibrary {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("NativeLibrary")
            .field("path", &self.path)
            .finish()
    }
}

/// Copy `reader` into a new uniquely named temporary file.
///
/// The temporary file name starts with the stem of `file_name` and ends with
/// its extension, so the dynamic loader sees the expected suffix. The file is
/// closed before returning and deleted when the returned [`TempPath`] drops.
pub fn materialize<R: Read + ?Sized>(
    reader: &mut R,
    file_name: &str,
    temp_dir: Option<&Path>,
) -> io::Result<TempPath> {
    let (stem, extension) = split_file_name(file_name);

    let mut builder = tempfile::Builder::new();
    builder.prefix(stem).suffix(extension);
    let mut file = match temp_dir {
        Some(dir) => builder.tempfile_in(dir)?,
        None => builder.tempfile()?,
    };

    let copied = io::copy(reader, &mut file)?;
    file.flush()?;
    log::debug!("extracted {} bytes to {}", copied, file.path().display());

    Ok(file.into_temp_path())
}

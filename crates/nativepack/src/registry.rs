// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use crate::{
    loader::{materialize, DynamicLoader, SystemLoader},
    resource::ResourceProvider,
    LinkError, LinkErrorKind, Platform,
};
use std::{
    collections::HashMap,
    fmt, io,
    ops::Deref,
    path::PathBuf,
    sync::{Arc, Mutex, MutexGuard, PoisonError},
};
use tempfile::TempPath;

/// A library loaded through a [`Registry`].
#[derive(Debug)]
pub struct LoadedLibrary<L> {
    logical_name: String,
    file_name: String,
    resource_path: String,
    library: L,
}

impl<L> LoadedLibrary<L> {
    /// Name the library was requested by, e.g. `"JniDemo"`.
    pub fn logical_name(&self) -> &str {
        &self.logical_name
    }

    /// Platform specific file name, e.g. `"libJniDemo.so"`.
    pub fn file_name(&self) -> &str {
        &self.file_name
    }

    /// Resource path the library was extracted from.
    pub fn resource_path(&self) -> &str {
        &self.resource_path
    }

    pub fn library(&self) -> &L {
        &self.library
    }
}

/// Shared handle to a cached library. Handles obtained for the same logical
/// name from the same registry compare equal.
pub struct LibraryHandle<L>(Arc<LoadedLibrary<L>>);

impl<L> Clone for LibraryHandle<L> {
    fn clone(&self) -> Self {
        LibraryHandle(Arc::clone(&self.0))
    }
}

impl<L> PartialEq for LibraryHandle<L> {
    fn eq(&self, other: &Self) -> bool {
        Arc::ptr_eq(&self.0, &other.0)
    }
}

impl<L> Eq for LibraryHandle<L> {}

impl<L> Deref for LibraryHandle<L> {
    type Target = LoadedLibrary<L>;

    fn deref(&self) -> &LoadedLibrary<L> {
        &self.0
    }
}

impl<L: fmt::Debug> fmt::Debug for LibraryHandle<L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        self.0.fmt(f)
    }
}

type Slot<L> = Arc<Mutex<Option<LibraryHandle<L>>>>;

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(PoisonError::into_inner)
}

/// Loads packaged native libraries and caches them by logical name.
///
/// Each logical name is loaded at most once per registry: concurrent
/// [`Registry::load`] calls for the same name block until the first one
/// finishes and then share its result. Failed loads are not cached.
///
/// Extracted temporary files are removed when the registry is dropped or
/// [`Registry::remove_temp_files`] is called. Nothing is removed if the
/// process dies without unwinding.
pub struct Registry<P, L: DynamicLoader = SystemLoader> {
    provider: P,
    loader: L,
    platform: Platform,
    temp_dir: Option<PathBuf>,
    slots: Mutex<HashMap<String, Slot<L::Library>>>,
    temp_files: Mutex<Vec<TempPath>>,
}

impl<P: ResourceProvider> Registry<P, SystemLoader> {
    pub fn new(provider: P) -> Self {
        Registry::with_loader(provider, SystemLoader)
    }
}

impl<P: ResourceProvider, L: DynamicLoader> Registry<P, L> {
    pub fn with_loader(provider: P, loader: L) -> Self {
        Registry {
            provider,
            loader,
            platform: Platform::current().clone(),
            temp_dir: None,
            slots: Mutex::new(HashMap::new()),
            temp_files: Mutex::new(Vec::new()),
        }
    }

    /// Resolve libraries for `platform` instead of the running one.
    pub fn platform(mut self, platform: Platform) -> Self {
        self.platform = platform;
        self
    }

    /// Extract libraries into `dir` instead of the system temp directory.
    pub fn temp_dir<D: Into<PathBuf>>(mut self, dir: D) -> Self {
        self.temp_dir = Some(dir.into());
        self
    }

    pub fn provider(&self) -> &P {
        &self.provider
    }

    pub fn loader(&self) -> &L {
        &self.loader
    }

    pub fn target_platform(&self) -> &Platform {
        &self.platform
    }

    /// Load the library `name`, or return the cached handle if it is already
    /// loaded.
    pub fn load(&self, name: &str) -> Result<LibraryHandle<L::Library>, LinkError> {
        if name.is_empty() {
            return Err(LinkError::new(name, None, LinkErrorKind::InvalidName, None));
        }

        let slot = Arc::clone(lock(&self.slots).entry(name.to_string()).or_default());

        let mut entry = lock(&slot);
        if let Some(handle) = entry.as_ref() {
            log::debug!("library '{}' already loaded", name);
            return Ok(handle.clone());
        }

        let handle = self.load_uncached(name)?;
        *entry = Some(handle.clone());
        Ok(handle)
    }

    /// Cached handle for `name`, without loading.
    pub fn get(&self, name: &str) -> Option<LibraryHandle<L::Library>> {
        let slot = lock(&self.slots).get(name).cloned()?;
        let entry = lock(&slot);
        entry.clone()
    }

    /// Logical names of all loaded libraries, sorted.
    pub fn loaded(&self) -> Vec<String> {
        let slots: Vec<_> = lock(&self.slots)
            .iter()
            .map(|(name, slot)| (name.clone(), Arc::clone(slot)))
            .collect();

        let mut names: Vec<_> = slots
            .into_iter()
            .filter(|(_, slot)| lock(slot).is_some())
            .map(|(name, _)| name)
            .collect();
        names.sort();
        names
    }

    fn load_uncached(&self, name: &str) -> Result<LibraryHandle<L::Library>, LinkError> {
        let resolved = self.platform.resolve(name).ok_or_else(|| {
            LinkError::new(name, None, LinkErrorKind::UnsupportedPlatform, None)
                .with_platform(&self.platform)
        })?;
        log::debug!(
            "resolved library '{}' to {} for {}",
            name,
            resolved.resource_path,
            self.platform
        );

        let fail = |kind: LinkErrorKind, source: crate::loader::LoaderError| {
            LinkError::new(name, Some(&resolved.resource_path), kind, Some(source))
        };

        let mut reader = self.provider.open(&resolved.resource_path).map_err(|err| {
            let kind = match err.kind() {
                io::ErrorKind::NotFound => LinkErrorKind::ResourceNotFound,
                _ => LinkErrorKind::Io,
            };
            fail(kind, err.into())
        })?;

        let temp = materialize(&mut *reader, &resolved.file_name, self.temp_dir.as_deref())
            .map_err(|err| fail(LinkErrorKind::Io, err.into()))?;
        drop(reader);

        let library = match self.loader.open(&temp) {
            Ok(library) => library,
            Err(err) => return Err(fail(LinkErrorKind::Link, err)),
        };

        log::info!(
            "loaded library '{}' from {} ({})",
            name,
            resolved.resource_path,
            self.provider.describe()
        );
        lock(&self.temp_files).push(temp);

        Ok(LibraryHandle(Arc::new(LoadedLibrary {
            logical_name: resolved.logical_name,
            file_name: resolved.file_name,
            resource_path: resolved.resource_path,
            library,
        })))
    }
}

impl<P, L: DynamicLoader> Registry<P, L> {
    /// Delete every temporary file extracted so far.
    ///
    /// Failures are logged and otherwise ignored; a library that is still
    /// mapped cannot be deleted on some platforms.
    pub fn remove_temp_files(&self) {
        let temp_files = std::mem::take(&mut *lock(&self.temp_files));
        for temp in temp_files {
            let path = temp.to_path_buf();
            match temp.close() {
                Ok(()) => log::debug!("removed {}", path.display()),
                Err(err) => log::warn!("could not remove {}: {}", path.display(), err),
            }
        }
    }
}

impl<P, L: DynamicLoader> Drop for Registry<P, L> {
    fn drop(&mut self) {
        // Release our references before deleting the files they were loaded from.
        lock(&self.slots).clear();
        self.remove_temp_files();
    }
}

impl<P: ResourceProvider, L: DynamicLoader> fmt::Debug for Registry<P, L> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.debug_struct("Registry")
            .field("provider", &self.provider.describe())
            .field("platform", &self.platform)
            .field("temp_dir", &self.temp_dir)
            .finish()
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::{
    borrow::Cow,
    collections::HashMap,
    env,
    fs::File,
    io::{self, Read},
    path::{Path, PathBuf},
};

/// Environment variable naming the resource root directory.
pub const RESOURCES_ENV: &str = "NATIVEPACK_RESOURCES";

/// A source of packaged resources addressed by `/`-separated paths such as
/// `/linux/x86-64/libDemo.so`.
///
/// A resource that does not exist must be reported as
/// [`io::ErrorKind::NotFound`].
pub trait ResourceProvider: Send + Sync {
    /// Open the resource at `resource_path` as a byte stream.
    fn open(&self, resource_path: &str) -> io::Result<Box<dyn Read + Send + '_>>;

    /// Short human readable description used in log messages.
    fn describe(&self) -> String;
}

fn not_found(resource_path: &str) -> io::Error {
    io::Error::new(
        io::ErrorKind::NotFound,
        format!("resource '{}' not found", resource_path),
    )
}

/// Resources stored as plain files below a root directory.
#[derive(Clone, Debug)]
pub struct DirectoryResources {
    root: PathBuf,
}

impl DirectoryResources {
    pub fn new<P: Into<PathBuf>>(root: P) -> Self {
        DirectoryResources { root: root.into() }
    }

    /// Resource root named by `NATIVEPACK_RESOURCES`, falling back to
    /// `resources/` next to the running executable.
    pub fn from_env() -> Self {
        DirectoryResources::new(resource_dir_from_env())
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Map a resource path onto the filesystem below the root.
    ///
    /// Returns `None` for paths with empty, `.` or `..` segments.
    pub fn file_path(&self, resource_path: &str) -> Option<PathBuf> {
        let relative = resource_path.strip_prefix('/').unwrap_or(resource_path);
        let mut path = self.root.clone();
        for segment in relative.split('/') {
            if segment.is_empty() || segment == "." || segment == ".." || segment.contains('\\')
            {
                return None;
            }
            path.push(segment);
        }
        Some(path)
    }
}

impl ResourceProvider for DirectoryResources {
    fn open(&self, resource_path: &str) -> io::Result<Box<dyn Read + Send + '_>> {
        let path = self
            .file_path(resource_path)
            .ok_or_else(|| not_found(resource_path))?;

        if !path.is_file() {
            return Err(not_found(resource_path));
        }

        Ok(Box::new(File::open(path)?))
    }

    fn describe(&self) -> String {
        format!("directory {}", self.root.display())
    }
}

/// Resources held in memory, typically compiled into the binary with
/// `include_bytes!`.
#[derive(Clone, Debug, Default)]
pub struct EmbeddedResources {
    entries: HashMap<String, Cow<'static, [u8]>>,
}

impl EmbeddedResources {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert<B>(&mut self, resource_path: &str, bytes: B)
    where
        B: Into<Cow<'static, [u8]>>,
    {
        self.entries.insert(resource_path.to_string(), bytes.into());
    }

    pub fn with<B>(mut self, resource_path: &str, bytes: B) -> Self
    where
        B: Into<Cow<'static, [u8]>>,
    {
        self.insert(resource_path, bytes);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl ResourceProvider for EmbeddedResources {
    fn open(&self, resource_path: &str) -> io::Result<Box<dyn Read + Send + '_>> {
        match self.entries.get(resource_path) {
            Some(bytes) => Ok(Box::new(&bytes[..])),
            None => Err(not_found(resource_path)),
        }
    }

    fn describe(&self) -> String {
        format!("{} embedded resources", self.entries.len())
    }
}

/// Resource root configured for the process.
pub fn resource_dir_from_env() -> PathBuf {
    if let Some(dir) = env::var_os(RESOURCES_ENV) {
        return PathBuf::from(dir);
    }

    env::current_exe()
        .ok()
        .and_then(|exe| exe.parent().map(|dir| dir.join("resources")))
        .unwrap_or_else(|| PathBuf::from("resources"))
}

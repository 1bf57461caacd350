// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use std::{env, fmt, sync::OnceLock};

/// Environment variable overriding the detected operating system name.
pub const OS_ENV: &str = "NATIVEPACK_OS";

/// Environment variable overriding the detected CPU architecture name.
pub const ARCH_ENV: &str = "NATIVEPACK_ARCH";

/// Operating system family, selecting both the library naming convention and
/// the resource subdirectory.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum OsFamily {
    Windows,
    MacOs,
    Linux,
}

/// CPU architecture, selecting the second resource subdirectory.
#[allow(non_camel_case_types)]
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Arch {
    X86,
    X86_64,
    Aarch64,
}

const OS_ALIASES: &[(&str, OsFamily)] = &[
    ("windows", OsFamily::Windows),
    ("windows 7", OsFamily::Windows),
    ("windows 8", OsFamily::Windows),
    ("windows 8.1", OsFamily::Windows),
    ("windows 10", OsFamily::Windows),
    ("windows 11", OsFamily::Windows),
    ("mac os x", OsFamily::MacOs),
    ("darwin", OsFamily::MacOs),
    ("macos", OsFamily::MacOs),
    ("linux", OsFamily::Linux),
];

const ARCH_ALIASES: &[(&str, Arch)] = &[
    ("x86", Arch::X86),
    ("i386", Arch::X86),
    ("i686", Arch::X86),
    ("amd64", Arch::X86_64),
    ("x86_64", Arch::X86_64),
    ("arm64", Arch::Aarch64),
    ("aarch64", Arch::Aarch64),
];

impl OsFamily {
    pub const ALL: [OsFamily; 3] = [OsFamily::Windows, OsFamily::MacOs, OsFamily::Linux];

    /// Classify an operating system name such as `"windows 10"` or `"darwin"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        OS_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, family)| *family)
    }

    /// Resource subdirectory segment for this family.
    pub fn segment(self) -> &'static str {
        match self {
            OsFamily::Windows => "windows",
            OsFamily::MacOs => "macos",
            OsFamily::Linux => "linux",
        }
    }

    /// Physical file name of the logical library `name` on this family.
    pub fn library_file_name(self, name: &str) -> String {
        match self {
            OsFamily::Windows => format!("{}.dll", name),
            OsFamily::MacOs => format!("lib{}.dylib", name),
            OsFamily::Linux => format!("lib{}.so", name),
        }
    }
}

impl Arch {
    pub const ALL: [Arch; 3] = [Arch::X86, Arch::X86_64, Arch::Aarch64];

    /// Classify an architecture name such as `"amd64"` or `"aarch64"`.
    pub fn from_name(name: &str) -> Option<Self> {
        let name = name.trim().to_lowercase();
        ARCH_ALIASES
            .iter()
            .find(|(alias, _)| *alias == name)
            .map(|(_, arch)| *arch)
    }

    /// Resource subdirectory segment for this architecture.
    pub fn segment(self) -> &'static str {
        match self {
            Arch::X86 => "x86",
            Arch::X86_64 => "x86-64",
            Arch::Aarch64 => "aarch64",
        }
    }
}

impl fmt::Display for OsFamily {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.segment())
    }
}

impl fmt::Display for Arch {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        f.write_str(self.segment())
    }
}

/// The (OS, architecture) pair a process runs on.
///
/// Keeps the raw lower-cased names next to their classification so that an
/// unrecognized platform can still be reported by name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Platform {
    os_name: String,
    arch_name: String,
    os: Option<OsFamily>,
    arch: Option<Arch>,
}

/// Physical file name and resource path computed for a logical library name.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ResolvedLibrary {
    pub logical_name: String,
    pub file_name: String,
    pub resource_path: String,
}

static CURRENT: OnceLock<Platform> = OnceLock::new();

impl Platform {
    /// Build a platform from arbitrary OS and architecture names.
    pub fn from_names(os_name: &str, arch_name: &str) -> Self {
        let os_name = os_name.trim().to_lowercase();
        let arch_name = arch_name.trim().to_lowercase();
        Platform {
            os: OsFamily::from_name(&os_name),
            arch: Arch::from_name(&arch_name),
            os_name,
            arch_name,
        }
    }

    /// The platform of the running process, computed once.
    ///
    /// `NATIVEPACK_OS` and `NATIVEPACK_ARCH` take precedence over the values
    /// the Rust runtime reports.
    pub fn current() -> &'static Platform {
        CURRENT.get_or_init(Platform::detect)
    }

    /// Detect the platform without caching the result.
    pub fn detect() -> Platform {
        let os_name = env::var(OS_ENV).unwrap_or_else(|_| env::consts::OS.to_string());
        let arch_name = env::var(ARCH_ENV).unwrap_or_else(|_| env::consts::ARCH.to_string());
        Platform::from_names(&os_name, &arch_name)
    }

    pub fn os_name(&self) -> &str {
        &self.os_name
    }

    pub fn arch_name(&self) -> &str {
        &self.arch_name
    }

    pub fn os(&self) -> Option<OsFamily> {
        self.os
    }

    pub fn arch(&self) -> Option<Arch> {
        self.arch
    }

    pub fn is_supported(&self) -> bool {
        self.os.is_some() && self.arch.is_some()
    }

    /// Compute the physical file name and the resource path of `name`.
    ///
    /// Returns `None` when either the OS or the architecture is unrecognized.
    pub fn resolve(&self, name: &str) -> Option<ResolvedLibrary> {
        let os = self.os?;
        let arch = self.arch?;
        let file_name = os.library_file_name(name);
        let resource_path = format!("/{}/{}/{}", os.segment(), arch.segment(), file_name);

        Some(ResolvedLibrary {
            logical_name: name.to_string(),
            file_name,
            resource_path,
        })
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{} ({})", self.os_name, self.arch_name)
    }
}

/// Split a physical file name at its last `.` into stem and extension.
///
/// The extension keeps its leading dot; a name without a dot has an empty
/// extension.
pub fn split_file_name(file_name: &str) -> (&str, &str) {
    match file_name.rfind('.') {
        Some(idx) => file_name.split_at(idx),
        None => (file_name, ""),
    }
}

// SPDX-License-Identifier: Apache-2.0
// Copyright 2025 Au-Zone Technologies

use nativepack::{LinkError, LinkErrorKind};
use std::fmt;
use std::process::ExitCode;

/// CLI-specific error type with exit code mapping
#[derive(Debug)]
pub enum CliError {
    /// Invalid command-line arguments
    InvalidArgs(String),
    /// OS or architecture not in the platform tables
    UnsupportedPlatform(String),
    /// Library resource missing from the resource root
    ResourceNotFound(String),
    /// Dynamic loader rejected the library
    LinkFailed(String),
    /// Library loaded but a required symbol is missing
    SymbolNotFound(String),
    /// General error
    General(String),
}

impl fmt::Display for CliError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CliError::InvalidArgs(msg) => write!(f, "Invalid arguments: {}", msg),
            CliError::UnsupportedPlatform(msg) => write!(f, "Unsupported platform: {}", msg),
            CliError::ResourceNotFound(msg) => write!(f, "Resource not found: {}", msg),
            CliError::LinkFailed(msg) => write!(f, "Link failed: {}", msg),
            CliError::SymbolNotFound(msg) => write!(f, "Symbol not found: {}", msg),
            CliError::General(msg) => write!(f, "Error: {}", msg),
        }
    }
}

impl std::error::Error for CliError {}

impl CliError {
    /// Get the exit code for this error
    pub fn exit_code(&self) -> ExitCode {
        ExitCode::from(self.code())
    }

    fn code(&self) -> u8 {
        match self {
            CliError::InvalidArgs(_) => 2,
            CliError::UnsupportedPlatform(_) => 3,
            CliError::ResourceNotFound(_) => 4,
            CliError::LinkFailed(_) => 5,
            CliError::SymbolNotFound(_) => 6,
            CliError::General(_) => 1,
        }
    }
}

/// Map load failures to the matching exit code
impl From<LinkError> for CliError {
    fn from(err: LinkError) -> Self {
        let msg = err.to_string();
        match err.kind() {
            LinkErrorKind::InvalidName => CliError::InvalidArgs(msg),
            LinkErrorKind::UnsupportedPlatform => CliError::UnsupportedPlatform(msg),
            LinkErrorKind::ResourceNotFound => CliError::ResourceNotFound(msg),
            LinkErrorKind::Link => CliError::LinkFailed(msg),
            LinkErrorKind::Io => CliError::General(msg),
        }
    }
}

impl From<nativepack::Error> for CliError {
    fn from(err: nativepack::Error) -> Self {
        use nativepack::Error;

        match err {
            Error::Link(link_err) => link_err.into(),
            Error::SymbolNotFound(sym) => CliError::SymbolNotFound(sym),
            Error::Io(io_err) => CliError::General(format!("I/O error: {}", io_err)),
        }
    }
}

/// Helper function to convert result to exit code
pub fn result_to_exit_code<T>(result: Result<T, CliError>) -> ExitCode {
    match result {
        Ok(_) => ExitCode::SUCCESS,
        Err(e) => {
            log::debug!("{:?}", e);
            eprintln!("{}", e);
            e.exit_code()
        }
    }
}

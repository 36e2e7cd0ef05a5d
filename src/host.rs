//! Facts about the invoking host: its name and where programs live.
//!
//! These are read once at startup and handed to the rest of the crate as
//! plain values.

use std::ffi::{OsStr, OsString};
use std::path::Path;

use camino::Utf8PathBuf;
use thiserror::Error;

/// Errors raised while inspecting the host.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum HostError {
    /// Raised when the operating system cannot report a hostname.
    #[error("failed to determine hostname: {message}")]
    Lookup {
        /// Underlying error message.
        message: String,
    },
    /// Raised when the reported hostname is empty.
    #[error("failed to determine hostname: the system reported an empty name")]
    EmptyHostname,
    /// Raised when the reported hostname is not valid UTF-8.
    #[error("failed to determine hostname: {name:?} is not valid UTF-8")]
    NonUtf8Hostname {
        /// Name as reported, lossily decoded.
        name: String,
    },
    /// Raised when a required program is not on `PATH`.
    #[error("can not find {program}")]
    ProgramNotFound {
        /// Program that was searched for.
        program: String,
    },
}

/// Asks the operating system for the hostname.
///
/// # Errors
///
/// Returns [`HostError`] when the lookup fails or yields an unusable name.
#[cfg(unix)]
pub fn system_hostname() -> Result<String, HostError> {
    let raw = nix::unistd::gethostname().map_err(|err| HostError::Lookup {
        message: err.to_string(),
    })?;
    hostname_from(raw)
}

/// Asks the operating system for the hostname.
///
/// # Errors
///
/// Always returns [`HostError::Lookup`]; pass the hostname explicitly on this
/// platform.
#[cfg(not(unix))]
pub fn system_hostname() -> Result<String, HostError> {
    Err(HostError::Lookup {
        message: String::from("unsupported platform"),
    })
}

#[cfg(any(unix, test))]
fn hostname_from(raw: OsString) -> Result<String, HostError> {
    let name = raw.into_string().map_err(|raw_name| HostError::NonUtf8Hostname {
        name: raw_name.to_string_lossy().into_owned(),
    })?;
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(HostError::EmptyHostname);
    }
    Ok(trimmed.to_owned())
}

/// Resolves `program` to an executable file.
///
/// Names containing a `/` are checked as given; bare names are searched for
/// in each directory of `path_var`, in order. Directories that are not valid
/// UTF-8 are skipped.
///
/// # Errors
///
/// Returns [`HostError::ProgramNotFound`] when no executable candidate exists.
pub fn locate_program(program: &str, path_var: Option<&OsStr>) -> Result<Utf8PathBuf, HostError> {
    let not_found = || HostError::ProgramNotFound {
        program: program.to_owned(),
    };

    if program.contains('/') {
        let candidate = Utf8PathBuf::from(program);
        return is_executable(candidate.as_std_path())
            .then_some(candidate)
            .ok_or_else(not_found);
    }

    let search = path_var.map_or_else(OsString::new, OsStr::to_os_string);
    std::env::split_paths(&search)
        .filter(|dir| !dir.as_os_str().is_empty())
        .filter_map(|dir| Utf8PathBuf::from_path_buf(dir).ok())
        .map(|dir| dir.join(program))
        .find(|candidate| is_executable(candidate.as_std_path()))
        .ok_or_else(not_found)
}

#[cfg(unix)]
fn is_executable(path: &Path) -> bool {
    use std::os::unix::fs::PermissionsExt;

    path.metadata()
        .is_ok_and(|meta| meta.is_file() && meta.permissions().mode() & 0o111 != 0)
}

#[cfg(not(unix))]
fn is_executable(path: &Path) -> bool {
    path.is_file()
}

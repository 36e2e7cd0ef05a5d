//! Maps source paths onto the per-host mirror tree.

use camino::{Utf8Path, Utf8PathBuf};
use thiserror::Error;

/// Errors raised while computing a destination.
#[derive(Clone, Debug, Error, Eq, PartialEq)]
pub enum MappingError {
    /// Raised when a list entry is not an absolute path.
    #[error("not an absolute path: {path}")]
    NotAbsolute {
        /// Offending path.
        path: Utf8PathBuf,
    },
}

/// A source file paired with its location in the mirror tree.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct BackupTarget {
    /// File on the live system.
    pub source: Utf8PathBuf,
    /// Mirror location `{target_directory}/{hostname}/{source without its leading /}`.
    pub destination: Utf8PathBuf,
}

impl BackupTarget {
    /// Maps `source` under `target_directory/hostname`.
    ///
    /// # Errors
    ///
    /// Returns [`MappingError::NotAbsolute`] for relative sources.
    pub fn new(
        target_directory: &Utf8Path,
        hostname: &str,
        source: &Utf8Path,
    ) -> Result<Self, MappingError> {
        Ok(Self {
            source: source.to_path_buf(),
            destination: destination_for(target_directory, hostname, source)?,
        })
    }
}

/// Root of the mirror tree for one host: `{target_directory}/{hostname}`.
#[must_use]
pub fn host_root(target_directory: &Utf8Path, hostname: &str) -> Utf8PathBuf {
    Utf8PathBuf::from(format!("{}/{hostname}", trimmed_root(target_directory)))
}

/// Computes the mirror location for `source`.
///
/// Exactly one leading separator is removed and the rest is appended as text,
/// so no other component of the source is altered.
///
/// # Errors
///
/// Returns [`MappingError::NotAbsolute`] when `source` does not start with `/`.
///
/// # Examples
///
/// ```
/// # use camino::Utf8Path;
/// # use system_file_saver::mapping::destination_for;
/// let dest = destination_for(
///     Utf8Path::new("/home/me/.systemfiles/"),
///     "desktop",
///     Utf8Path::new("/etc/ssh/sshd_config"),
/// )
/// .expect("absolute source");
/// assert_eq!(dest.as_str(), "/home/me/.systemfiles/desktop/etc/ssh/sshd_config");
/// ```
pub fn destination_for(
    target_directory: &Utf8Path,
    hostname: &str,
    source: &Utf8Path,
) -> Result<Utf8PathBuf, MappingError> {
    let Some(relative) = source.as_str().strip_prefix('/') else {
        return Err(MappingError::NotAbsolute {
            path: source.to_path_buf(),
        });
    };
    Ok(Utf8PathBuf::from(format!(
        "{}/{hostname}/{relative}",
        trimmed_root(target_directory)
    )))
}

fn trimmed_root(target_directory: &Utf8Path) -> &str {
    target_directory.as_str().trim_end_matches('/')
}

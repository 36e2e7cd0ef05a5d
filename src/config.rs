//! Configuration loading via `ortho-config`.
//!
//! [`SaverConfig`] merges defaults, configuration files and `SFS_*`
//! environment variables. Command-line flags are layered on top with
//! [`SaverConfig::with_overrides`], and [`SaverConfig::resolve`] turns the
//! result into the immutable [`RunConfiguration`] used for one run.

use camino::{Utf8Path, Utf8PathBuf};
use ortho_config::OrthoConfig;
use serde::Deserialize;
use thiserror::Error;

use crate::mapping::host_root;
use crate::sync::{DEFAULT_RSYNC_BIN, SyncOptions};

/// Default location of the backup list.
pub const DEFAULT_INPUT_FILE: &str = "~/.systemfiles/systemfile_list.txt";

/// Default backup root.
pub const DEFAULT_TARGET_DIRECTORY: &str = "~/.systemfiles/";

/// Settings loaded via `ortho-config`.
#[derive(Clone, Debug, Deserialize, OrthoConfig, PartialEq, Eq)]
#[ortho_config(
    prefix = "SFS",
    discovery(
        app_name = "sfs",
        env_var = "SFS_CONFIG_PATH",
        config_file_name = "sfs.toml",
        dotfile_name = ".sfs.toml",
        project_file_name = "sfs.toml"
    )
)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "configuration struct with user-facing toggle settings that are naturally expressed as booleans"
)]
pub struct SaverConfig {
    /// Path to the `rsync` executable.
    #[ortho_config(default = DEFAULT_RSYNC_BIN.to_owned())]
    pub rsync_bin: String,
    /// List of files to back up. Supports a leading `~/`.
    #[ortho_config(default = DEFAULT_INPUT_FILE.to_owned())]
    pub input_file: String,
    /// Backup root. Supports a leading `~/`.
    #[ortho_config(default = DEFAULT_TARGET_DIRECTORY.to_owned())]
    pub target_directory: String,
    /// Host directory name; the system hostname is used when unset.
    pub hostname: Option<String>,
    /// Pass `--dry-run` to rsync.
    #[ortho_config(default = false)]
    pub dry_run: bool,
    /// Show rsync's itemized changes at info level.
    #[ortho_config(default = false)]
    pub itemize_changes: bool,
    /// Pass `--checksum` to rsync.
    #[ortho_config(default = false)]
    pub checksum: bool,
    /// Pass `--delete-after` to rsync.
    #[ortho_config(default = false)]
    pub delete_after: bool,
}

/// Values supplied on the command line. `None` and `false` leave the loaded
/// configuration untouched.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
#[expect(
    clippy::struct_excessive_bools,
    reason = "mirrors the boolean command-line switches"
)]
pub struct ConfigOverrides {
    /// `-f/--input-file`.
    pub input_file: Option<String>,
    /// `-t/--target-directory`.
    pub target_directory: Option<String>,
    /// `-o/--hostname`.
    pub hostname: Option<String>,
    /// `--dry-run`.
    pub dry_run: bool,
    /// `--itemize-changes`.
    pub itemize_changes: bool,
    /// `--checksum`.
    pub checksum: bool,
    /// `--delete-after`.
    pub delete_after: bool,
}

/// Process-wide facts the configuration depends on, gathered once by the
/// caller.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct HostEnvironment {
    /// Home directory used to expand `~/`.
    pub home: Option<Utf8PathBuf>,
    /// System hostname, used when no hostname is configured.
    pub hostname: Option<String>,
}

/// Fully resolved settings for one run.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct RunConfiguration {
    /// List of files to back up.
    pub input_file: Utf8PathBuf,
    /// Backup root.
    pub target_directory: Utf8PathBuf,
    /// Name of the per-host directory under the backup root.
    pub hostname: String,
    /// Options passed through to rsync.
    pub options: SyncOptions,
}

impl RunConfiguration {
    /// Returns `{target_directory}/{hostname}`.
    #[must_use]
    pub fn host_root(&self) -> Utf8PathBuf {
        host_root(&self.target_directory, &self.hostname)
    }
}

/// Metadata for a configuration field, used to generate actionable error messages.
struct FieldMetadata {
    description: &'static str,
    env_var: &'static str,
    toml_key: &'static str,
}

impl FieldMetadata {
    const fn new(description: &'static str, env_var: &'static str, toml_key: &'static str) -> Self {
        Self {
            description,
            env_var,
            toml_key,
        }
    }
}

impl SaverConfig {
    fn require_field(value: &str, metadata: &FieldMetadata) -> Result<(), ConfigError> {
        if value.trim().is_empty() {
            return Err(ConfigError::MissingField(format!(
                "missing {}: set {} or add {} to sfs.toml",
                metadata.description, metadata.env_var, metadata.toml_key
            )));
        }
        Ok(())
    }

    /// Loads configuration without attempting to parse CLI arguments. Values
    /// still merge defaults, configuration files, and environment variables.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] when the merge fails.
    pub fn load_without_cli_args() -> Result<Self, ConfigError> {
        Self::load_from_iter([std::ffi::OsString::from("sfs")])
            .map_err(|err| ConfigError::Parse(err.to_string()))
    }

    /// Applies command-line overrides on top of the loaded values.
    #[must_use]
    pub fn with_overrides(self, overrides: ConfigOverrides) -> Self {
        Self {
            input_file: overrides.input_file.unwrap_or(self.input_file),
            target_directory: overrides.target_directory.unwrap_or(self.target_directory),
            hostname: overrides.hostname.or(self.hostname),
            dry_run: self.dry_run || overrides.dry_run,
            itemize_changes: self.itemize_changes || overrides.itemize_changes,
            checksum: self.checksum || overrides.checksum,
            delete_after: self.delete_after || overrides.delete_after,
            ..self
        }
    }

    /// Returns the rsync switches selected by this configuration.
    #[must_use]
    pub const fn sync_options(&self) -> SyncOptions {
        SyncOptions {
            dry_run: self.dry_run,
            itemize_changes: self.itemize_changes,
            checksum: self.checksum,
            delete_after: self.delete_after,
        }
    }

    /// Performs semantic validation on required fields. Error messages include
    /// guidance on how to provide missing values via environment variables or
    /// configuration files.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingField`] when a required field is empty and
    /// [`ConfigError::InvalidHostname`] when a configured hostname cannot name
    /// a directory.
    pub fn validate(&self) -> Result<(), ConfigError> {
        Self::require_field(
            &self.rsync_bin,
            &FieldMetadata::new("rsync executable", "SFS_RSYNC_BIN", "rsync_bin"),
        )?;
        Self::require_field(
            &self.input_file,
            &FieldMetadata::new("input file", "SFS_INPUT_FILE", "input_file"),
        )?;
        Self::require_field(
            &self.target_directory,
            &FieldMetadata::new("target directory", "SFS_TARGET_DIRECTORY", "target_directory"),
        )?;
        if let Some(hostname) = &self.hostname {
            validate_hostname(hostname)?;
        }
        Ok(())
    }

    /// Resolves home-relative paths and the hostname into a
    /// [`RunConfiguration`].
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when validation fails, a `~/` path is used
    /// without a known home directory, or no hostname is available.
    pub fn resolve(&self, host: &HostEnvironment) -> Result<RunConfiguration, ConfigError> {
        self.validate()?;

        let hostname = self
            .hostname
            .as_deref()
            .or(host.hostname.as_deref())
            .ok_or(ConfigError::MissingHostname)?;
        validate_hostname(hostname)?;

        let home = host.home.as_deref();
        Ok(RunConfiguration {
            input_file: expand_tilde(&self.input_file, home)?,
            target_directory: expand_tilde(&self.target_directory, home)?,
            hostname: hostname.to_owned(),
            options: self.sync_options(),
        })
    }
}

fn validate_hostname(hostname: &str) -> Result<(), ConfigError> {
    let trimmed = hostname.trim();
    let reason = if trimmed.is_empty() {
        Some("must not be empty")
    } else if trimmed != hostname {
        Some("must not start or end with whitespace")
    } else if hostname.contains('/') {
        Some("must not contain '/'")
    } else if hostname == "." || hostname == ".." {
        Some("must not be '.' or '..'")
    } else {
        None
    };

    reason.map_or(Ok(()), |message| {
        Err(ConfigError::InvalidHostname {
            hostname: hostname.to_owned(),
            reason: message,
        })
    })
}

/// Expands a leading `~` or `~/` to `home`.
///
/// Other paths, including `~user/...`, are returned unchanged.
///
/// # Errors
///
/// Returns [`ConfigError::HomeDirectoryUnknown`] when expansion is needed but
/// `home` is `None`.
///
/// # Examples
///
/// ```
/// # use camino::Utf8Path;
/// # use system_file_saver::config::expand_tilde;
/// let home = Utf8Path::new("/home/me");
/// let expanded = expand_tilde("~/.systemfiles/", Some(home)).expect("home is known");
/// assert_eq!(expanded.as_str(), "/home/me/.systemfiles/");
/// assert_eq!(expand_tilde("/etc", None).expect("absolute").as_str(), "/etc");
/// ```
pub fn expand_tilde(path: &str, home: Option<&Utf8Path>) -> Result<Utf8PathBuf, ConfigError> {
    let rest = if path == "~" {
        ""
    } else if let Some(rest) = path.strip_prefix("~/") {
        rest
    } else {
        return Ok(Utf8PathBuf::from(path));
    };

    let home_dir = home.ok_or_else(|| ConfigError::HomeDirectoryUnknown {
        path: path.to_owned(),
    })?;
    if rest.is_empty() {
        return Ok(home_dir.to_path_buf());
    }
    Ok(Utf8PathBuf::from(format!(
        "{}/{rest}",
        home_dir.as_str().trim_end_matches('/')
    )))
}

/// Errors raised during configuration loading and validation.
#[derive(Debug, Error, Eq, PartialEq)]
pub enum ConfigError {
    /// Indicates a required configuration field is empty or missing.
    #[error("missing configuration field: {0}")]
    MissingField(String),
    /// Indicates the hostname cannot be used as a directory name.
    #[error("invalid hostname {hostname:?}: {reason}")]
    InvalidHostname {
        /// Hostname as configured.
        hostname: String,
        /// Why it was rejected.
        reason: &'static str,
    },
    /// Indicates no hostname was configured or discovered.
    #[error("no hostname available: pass --hostname or set SFS_HOSTNAME")]
    MissingHostname,
    /// Indicates a `~/` path could not be expanded.
    #[error("cannot expand {path}: home directory is unknown")]
    HomeDirectoryUnknown {
        /// Path that needed expansion.
        path: String,
    },
    /// Surfaces errors from the `ortho-config` loader.
    #[error("configuration parsing failed: {0}")]
    Parse(String),
}

impl From<ortho_config::OrthoError> for ConfigError {
    fn from(value: ortho_config::OrthoError) -> Self {
        Self::Parse(value.to_string())
    }
}
